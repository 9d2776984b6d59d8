use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::radial::{Priority, TaskKind, TaskSpec};
use crate::scene::Rgba;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Layers {
    Field,
    Map,
    #[default]
    Both,
}

impl Layers {
    pub fn field(self) -> bool {
        matches!(self, Self::Field | Self::Both)
    }

    pub fn map(self) -> bool {
        matches!(self, Self::Map | Self::Both)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub seed: Option<u64>,
    pub field: FieldConfig,
    pub map: MapConfig,
    pub cursor: CursorConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub max_particles: usize,
    /// Square pixels of viewport per particle.
    pub density_factor: f32,
    /// Each velocity axis is drawn from `-max_speed..=max_speed`.
    pub max_speed: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub hexagon_share: f32,
    pub connection_threshold: f32,
    pub line_opacity: f32,
    pub line_width: f32,
    pub palette: Vec<Rgba>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_particles: 100,
            density_factor: 10_000.0,
            max_speed: 0.25,
            size_min: 1.0,
            size_max: 5.0,
            hexagon_share: 0.3,
            connection_threshold: 150.0,
            line_opacity: 0.3,
            line_width: 0.5,
            palette: vec![
                Rgba::new(77, 157, 224, 0.6),
                Rgba::new(120, 192, 145, 0.6),
                Rgba::new(255, 255, 255, 0.3),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub radius_factor: f32,
    /// Extra angle per index in radians; zero keeps the even ring.
    pub skew: f32,
    pub amplitude: f32,
    pub small_angle_degrees: f32,
    pub node_size: f32,
    pub center_size: f32,
    pub label_chars: usize,
    pub tasks: Vec<TaskSpec>,
}

impl MapConfig {
    pub fn small_angle(&self) -> f32 {
        self.small_angle_degrees.to_radians()
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            radius_factor: 0.35,
            skew: 0.0,
            amplitude: 8.0,
            small_angle_degrees: 5.0,
            node_size: 60.0,
            center_size: 80.0,
            label_chars: 8,
            tasks: sample_tasks(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub enabled: bool,
    pub trail_delay_ms: f64,
    pub dot_radius: f32,
    pub ring_radius: f32,
    pub active_scale: f32,
    pub color: Rgba,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trail_delay_ms: 100.0,
            dot_radius: 8.0,
            ring_radius: 16.0,
            active_scale: 1.5,
            color: Rgba::new(96, 165, 250, 1.0),
        }
    }
}

fn sample_tasks() -> Vec<TaskSpec> {
    let task = |id, title: &str, kind, priority, detail: &str| TaskSpec {
        id,
        title: title.to_owned(),
        kind,
        priority,
        detail: Some(detail.to_owned()),
    };

    vec![
        task(1, "Team Meeting", TaskKind::Calendar, Priority::High, "10:00 AM"),
        task(2, "Grocery Shopping", TaskKind::Location, Priority::Medium, "Supermarket"),
        task(3, "Pick up Kids", TaskKind::Location, Priority::High, "School"),
        task(4, "Workout", TaskKind::Calendar, Priority::Medium, "5:30 PM"),
        task(5, "Call Mom", TaskKind::Reminder, Priority::Low, "Today"),
        task(6, "Project Deadline", TaskKind::Calendar, Priority::High, "Tomorrow"),
    ]
}

impl AmbientConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("config is not valid JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let field = &self.field;
        let finite = [
            ("field.density_factor", field.density_factor),
            ("field.max_speed", field.max_speed),
            ("field.size_min", field.size_min),
            ("field.size_max", field.size_max),
            ("field.connection_threshold", field.connection_threshold),
            ("field.line_opacity", field.line_opacity),
            ("field.line_width", field.line_width),
            ("map.radius_factor", self.map.radius_factor),
            ("map.skew", self.map.skew),
            ("map.amplitude", self.map.amplitude),
            ("map.small_angle_degrees", self.map.small_angle_degrees),
            ("map.node_size", self.map.node_size),
            ("map.center_size", self.map.center_size),
            ("cursor.dot_radius", self.cursor.dot_radius),
            ("cursor.ring_radius", self.cursor.ring_radius),
            ("cursor.active_scale", self.cursor.active_scale),
        ];
        for (name, value) in finite {
            ensure!(value.is_finite(), "{name} must be finite, got {value}");
        }
        ensure!(
            self.cursor.trail_delay_ms.is_finite(),
            "cursor.trail_delay_ms must be finite"
        );

        ensure!(
            field.density_factor > 0.0,
            "field.density_factor must be positive, got {}",
            field.density_factor
        );
        ensure!(
            field.connection_threshold > 0.0,
            "field.connection_threshold must be positive, got {}",
            field.connection_threshold
        );
        ensure!(
            field.size_min >= 0.0 && field.size_min <= field.size_max,
            "field size range {}..{} is reversed or negative",
            field.size_min,
            field.size_max
        );
        ensure!(
            field.max_speed >= 0.0,
            "field.max_speed must not be negative"
        );
        ensure!(
            (0.0..=1.0).contains(&field.hexagon_share),
            "field.hexagon_share must be within 0..=1"
        );
        ensure!(!field.palette.is_empty(), "field.palette must not be empty");
        ensure!(
            self.map.radius_factor >= 0.0,
            "map.radius_factor must not be negative"
        );
        ensure!(
            self.cursor.trail_delay_ms >= 0.0,
            "cursor.trail_delay_ms must not be negative"
        );
        Ok(())
    }
}
