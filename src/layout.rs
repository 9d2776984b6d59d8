use std::f32::consts::TAU;

use eframe::egui::{Pos2, vec2};

use crate::scene::Viewport;

/// Angle of node `index` out of `count`, with `skew` radians added per index
/// for the spiral variant. `skew == 0` splits the circle evenly.
pub fn base_angle(index: usize, count: usize, skew: f32) -> f32 {
    if count == 0 {
        return 0.0;
    }
    let step = TAU / count as f32;
    index as f32 * step + index as f32 * skew
}

pub fn orbit_position(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + vec2(angle.cos(), angle.sin()) * radius
}

/// Base positions for `count` nodes around `center`. Pure; the same input
/// always yields the same positions.
pub fn radial_layout(count: usize, center: Pos2, radius: f32, skew: f32) -> Vec<Pos2> {
    (0..count)
        .map(|index| orbit_position(center, radius, base_angle(index, count, skew)))
        .collect()
}

pub fn fit_radius(viewport: Viewport, radius_factor: f32) -> f32 {
    viewport.min_side() * radius_factor
}

/// Per-node floating transform layered over the base position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatOffset {
    pub dy: f32,
    pub rotation: f32,
}

/// Bob and sway for node `index` at `elapsed_ms`. The period grows with the
/// index so neighbours drift out of phase.
pub fn float_offset(
    elapsed_ms: f64,
    index: usize,
    amplitude: f32,
    small_angle: f32,
) -> FloatOffset {
    let bob_period = 1000.0 + index as f64 * 200.0;
    let sway_period = 2000.0 + index as f64 * 100.0;

    FloatOffset {
        dy: ((elapsed_ms / bob_period).sin() * amplitude as f64) as f32,
        rotation: ((elapsed_ms / sway_period).sin() * small_angle as f64) as f32,
    }
}

/// Static line from the map center to a node's base position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spoke {
    pub from: Pos2,
    pub to: Pos2,
    pub angle: f32,
    pub length: f32,
}

pub fn spoke(center: Pos2, radius: f32, angle: f32) -> Spoke {
    Spoke {
        from: center,
        to: orbit_position(center, radius, angle),
        angle,
        length: radius,
    }
}
