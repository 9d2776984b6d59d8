use eframe::egui::{Pos2, Vec2, pos2, vec2};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::config::FieldConfig;
use crate::scene::{Rgba, Viewport};

const FALLBACK_COLOR: Rgba = Rgba::new(255, 255, 255, 0.3);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleShape {
    Circle,
    Hexagon,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: usize,
    pub position: Pos2,
    pub velocity: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub color: Rgba,
    pub shape: ParticleShape,
}

impl Particle {
    pub(super) fn spawn(
        id: usize,
        viewport: Viewport,
        config: &FieldConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let position = pos2(
            rng.random_range(0.0..viewport.width),
            rng.random_range(0.0..viewport.height),
        );
        let speed = config.max_speed.max(0.0);
        let velocity = vec2(
            rng.random_range(-speed..=speed),
            rng.random_range(-speed..=speed),
        );
        let radius = rng.random_range(config.size_min..=config.size_max);
        let color = config
            .palette
            .choose(rng)
            .copied()
            .unwrap_or(FALLBACK_COLOR);
        let shape = if rng.random::<f32>() < config.hexagon_share {
            ParticleShape::Hexagon
        } else {
            ParticleShape::Circle
        };

        Self {
            id,
            position,
            velocity,
            radius,
            opacity: color.a,
            color,
            shape,
        }
    }

    /// Moves by one frame of velocity. An axis that left `[0, extent]` has
    /// its velocity reversed; the position is left where it landed so the
    /// particle drifts past the edge for a frame before coming back.
    pub(super) fn advance(&mut self, viewport: Viewport) -> bool {
        self.position += self.velocity;

        let mut bounced = false;
        if self.position.x < 0.0 || self.position.x > viewport.width {
            self.velocity.x = -self.velocity.x;
            bounced = true;
        }
        if self.position.y < 0.0 || self.position.y > viewport.height {
            self.velocity.y = -self.velocity.y;
            bounced = true;
        }
        bounced
    }
}
