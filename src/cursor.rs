use std::collections::VecDeque;

use eframe::egui::Pos2;

use crate::animation::{AnimationController, FrameHost, Lifecycle};
use crate::config::CursorConfig;
use crate::scene::{Scene, SceneItem, point};

const MAX_SAMPLES: usize = 256;

/// Dot that follows the pointer, plus a ring that replays the pointer path
/// `trail_delay_ms` late.
pub struct TrailingCursor {
    config: CursorConfig,
    samples: VecDeque<(f64, Pos2)>,
    dot: Option<Pos2>,
    ring: Option<Pos2>,
    active: bool,
    controller: AnimationController,
}

impl TrailingCursor {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            config,
            samples: VecDeque::new(),
            dot: None,
            ring: None,
            active: false,
            controller: AnimationController::new("cursor"),
        }
    }

    pub fn start(&mut self) -> bool {
        self.controller.start()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.controller.lifecycle()
    }

    pub fn dot_position(&self) -> Option<Pos2> {
        self.dot
    }

    pub fn ring_position(&self) -> Option<Pos2> {
        self.ring
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        if self.controller.is_running() {
            self.active = active;
        }
    }

    /// `now` is in seconds on the host clock.
    pub fn pointer_moved(&mut self, position: Pos2, now: f64) {
        if !self.controller.is_running() {
            return;
        }
        if self.samples.back().is_some_and(|(_, last)| *last == position) {
            return;
        }

        self.dot = Some(position);
        self.samples.push_back((now, position));
        while self.samples.len() > MAX_SAMPLES {
            self.samples.pop_front();
        }
    }

    pub fn pointer_left(&mut self) {
        self.dot = None;
        self.ring = None;
        self.samples.clear();
    }

    /// Moves the ring to the newest sample that is at least the trail delay
    /// old, dropping anything older than that.
    pub fn advance(&mut self, now: f64) -> bool {
        if !self.controller.begin_frame() {
            return false;
        }

        let cutoff = now - self.config.trail_delay_ms / 1000.0;
        while let Some(&(time, position)) = self.samples.front() {
            if time > cutoff {
                break;
            }
            self.ring = Some(position);
            if self.samples.len() == 1 {
                break;
            }
            self.samples.pop_front();
        }
        true
    }

    pub fn schedule(&self, host: &impl FrameHost) {
        self.controller.schedule(host);
    }

    pub fn teardown(&mut self) -> bool {
        let stopped = self.controller.teardown();
        if stopped {
            self.pointer_left();
            self.active = false;
        }
        stopped
    }

    pub fn extend_scene(&self, scene: &mut Scene) {
        let scale = if self.active {
            self.config.active_scale
        } else {
            1.0
        };

        if let Some(ring) = self.ring {
            scene.push(SceneItem::Ring {
                center: point(ring),
                radius: self.config.ring_radius * scale,
                width: 2.0,
                color: self.config.color,
            });
        }
        if let Some(dot) = self.dot {
            scene.push(SceneItem::Circle {
                center: point(dot),
                radius: self.config.dot_radius * 0.5 * scale,
                fill: self.config.color,
            });
        }
    }
}
