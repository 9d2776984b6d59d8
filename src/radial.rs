//! "Life Map": task hexagons floating on a ring around a center hub.

use eframe::egui::{Pos2, pos2, vec2};
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationController, FrameHost, Lifecycle};
use crate::config::MapConfig;
use crate::layout::{FloatOffset, Spoke, base_angle, fit_radius, float_offset, radial_layout, spoke};
use crate::scene::{IconGlyph, Rgba, Scene, SceneItem, Viewport, point};
use crate::util::truncate_label;

const HUB_COLOR: Rgba = Rgba::new(77, 157, 224, 1.0);
const SPOKE_COLOR: Rgba = Rgba::new(255, 255, 255, 0.1);
const LABEL_COLOR: Rgba = Rgba::new(255, 255, 255, 1.0);
const NODE_FILL_ALPHA: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Calendar,
    Location,
    Reminder,
}

impl TaskKind {
    pub fn glyph(self) -> IconGlyph {
        match self {
            Self::Calendar => IconGlyph::Calendar,
            Self::Location => IconGlyph::Pin,
            Self::Reminder => IconGlyph::Bell,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Location => "location",
            Self::Reminder => "reminder",
        }
    }
}

/// Node category; only used to pick a color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn color(self) -> Rgba {
        match self {
            Self::High => Rgba::new(239, 68, 68, 1.0),
            Self::Medium => Rgba::new(120, 192, 145, 1.0),
            Self::Low => Rgba::new(77, 157, 224, 1.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub id: u32,
    pub title: String,
    pub kind: TaskKind,
    pub priority: Priority,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadialNode {
    pub id: u32,
    pub label: String,
    pub category: Priority,
    pub kind: TaskKind,
    pub detail: Option<String>,
    pub index: usize,
}

pub struct RadialMap {
    config: MapConfig,
    nodes: Vec<RadialNode>,
    center: Pos2,
    radius: f32,
    base_positions: Vec<Pos2>,
    offsets: Vec<FloatOffset>,
    elapsed_ms: f64,
    controller: AnimationController,
}

impl RadialMap {
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            center: Pos2::ZERO,
            radius: 0.0,
            base_positions: Vec::new(),
            offsets: Vec::new(),
            elapsed_ms: 0.0,
            controller: AnimationController::new("life map"),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.controller.lifecycle()
    }

    pub fn frames(&self) -> u64 {
        self.controller.frames()
    }

    pub fn nodes(&self) -> &[RadialNode] {
        &self.nodes
    }

    pub fn center(&self) -> Pos2 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn base_positions(&self) -> &[Pos2] {
        &self.base_positions
    }

    pub fn offsets(&self) -> &[FloatOffset] {
        &self.offsets
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.config.amplitude = amplitude.max(0.0);
    }

    /// Changing the skew moves the base positions, so the ring is laid out
    /// again around the current center.
    pub fn set_skew(&mut self, skew: f32) {
        if self.config.skew == skew {
            return;
        }
        self.config.skew = skew;
        self.relayout(self.center, self.radius);
    }

    /// Lays the configured tasks out inside `viewport`. Without a container
    /// nothing is created and the map stays uninitialized.
    pub fn mount(&mut self, viewport: Option<Viewport>) -> bool {
        let Some(viewport) = viewport else {
            log::debug!("life map: no container, not starting");
            return false;
        };

        let tasks = self.config.tasks.clone();
        let radius = fit_radius(viewport, self.config.radius_factor);
        self.layout(&tasks, viewport.center(), radius)
    }

    /// Creates one node per task, in order, at its base position on the ring.
    pub fn layout(&mut self, tasks: &[TaskSpec], center: Pos2, radius: f32) -> bool {
        if self.controller.is_torn_down() {
            log::debug!("life map: layout after teardown, ignoring");
            return false;
        }

        self.nodes = tasks
            .iter()
            .enumerate()
            .map(|(index, task)| RadialNode {
                id: task.id,
                label: task.title.clone(),
                category: task.priority,
                kind: task.kind,
                detail: task.detail.clone(),
                index,
            })
            .collect();
        self.offsets = vec![FloatOffset::default(); self.nodes.len()];
        self.relayout(center, radius);

        log::info!(
            "life map: {} nodes on radius {radius:.1}",
            self.nodes.len()
        );
        self.controller.start();
        true
    }

    /// Moves the ring without recreating nodes, e.g. when the container
    /// changes size.
    pub fn relayout(&mut self, center: Pos2, radius: f32) {
        self.center = center;
        self.radius = radius;
        self.base_positions = radial_layout(self.nodes.len(), center, radius, self.config.skew);
    }

    pub fn resize(&mut self, viewport: Option<Viewport>) {
        if self.controller.is_torn_down() {
            return;
        }
        match (self.controller.lifecycle(), viewport) {
            (Lifecycle::Uninitialized, _) => {
                self.mount(viewport);
            }
            (_, Some(viewport)) => {
                let radius = fit_radius(viewport, self.config.radius_factor);
                self.relayout(viewport.center(), radius);
            }
            (_, None) => {}
        }
    }

    pub fn base_angle(&self, index: usize) -> f32 {
        base_angle(index, self.nodes.len(), self.config.skew)
    }

    pub fn animate_frame(&self, elapsed_ms: f64, index: usize) -> FloatOffset {
        float_offset(
            elapsed_ms,
            index,
            self.config.amplitude,
            self.config.small_angle(),
        )
    }

    /// Recomputes every node's float offset from the shared clock.
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        if !self.controller.begin_frame() {
            return false;
        }

        self.elapsed_ms = elapsed_ms;
        for index in 0..self.offsets.len() {
            let offset = self.animate_frame(elapsed_ms, index);
            self.offsets[index] = offset;
        }
        true
    }

    /// The spoke ignores the float offset, so lines stay put while the
    /// hexagons bob.
    pub fn connect_to_center(&self, index: usize) -> Option<Spoke> {
        if index >= self.nodes.len() {
            return None;
        }
        Some(spoke(self.center, self.radius, self.base_angle(index)))
    }

    /// Base position plus the current float offset.
    pub fn node_position(&self, index: usize) -> Option<Pos2> {
        let base = *self.base_positions.get(index)?;
        let dy = self.offsets.get(index).map_or(0.0, |offset| offset.dy);
        Some(base + vec2(0.0, dy))
    }

    pub fn node_at(&self, position: Pos2) -> Option<usize> {
        let reach = self.config.node_size * 0.5;
        (0..self.nodes.len())
            .filter_map(|index| {
                let distance = self.node_position(index)?.distance(position);
                (distance <= reach).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub fn schedule(&self, host: &impl FrameHost) {
        self.controller.schedule(host);
    }

    pub fn teardown(&mut self) -> bool {
        self.controller.teardown()
    }

    pub fn extend_scene(&self, scene: &mut Scene) {
        if self.controller.lifecycle() == Lifecycle::Uninitialized {
            return;
        }

        for index in 0..self.nodes.len() {
            if let Some(spoke) = self.connect_to_center(index) {
                scene.push(SceneItem::Line {
                    from: point(spoke.from),
                    to: point(spoke.to),
                    width: 1.0,
                    start_color: SPOKE_COLOR,
                    end_color: SPOKE_COLOR,
                });
            }
        }

        let hub = point(self.center);
        scene.push(SceneItem::Hexagon {
            center: hub,
            radius: self.config.center_size * 0.5,
            rotation: 0.0,
            fill: HUB_COLOR.with_alpha(0.15),
            stroke: Some(HUB_COLOR.with_alpha(0.5)),
        });
        scene.push(SceneItem::Circle {
            center: hub,
            radius: 24.0,
            fill: HUB_COLOR,
        });
        scene.push(SceneItem::Icon {
            center: hub,
            size: 24.0,
            glyph: IconGlyph::Clock,
            color: LABEL_COLOR,
        });

        let hex_radius = self.config.node_size * 0.5;
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(position) = self.node_position(index) else {
                continue;
            };
            let rotation = self.offsets.get(index).map_or(0.0, |offset| offset.rotation);
            let color = node.category.color();

            scene.push(SceneItem::Hexagon {
                center: point(position),
                radius: hex_radius,
                rotation,
                fill: color.with_alpha(NODE_FILL_ALPHA),
                stroke: None,
            });
            scene.push(SceneItem::Icon {
                center: point(position - vec2(0.0, hex_radius * 0.25)),
                size: 20.0,
                glyph: node.kind.glyph(),
                color,
            });
            scene.push(SceneItem::Label {
                anchor: point(pos2(position.x, position.y + hex_radius * 0.4)),
                text: truncate_label(&node.label, self.config.label_chars),
                size: 11.0,
                color: LABEL_COLOR,
            });
        }
    }
}
