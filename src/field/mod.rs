//! Ambient particle field: drifting points that bounce off the viewport edges
//! and link up with faint lines when they pass close to each other.

mod connections;
mod particle;

use rand::Rng;

use crate::animation::{AnimationController, FrameHost, Lifecycle};
use crate::config::FieldConfig;
use crate::scene::{Scene, SceneItem, Viewport, point};

pub use connections::{Connection, connect_into, falloff};
pub use particle::{Particle, ParticleShape};

/// Hexagons are drawn with the particle's size as circumradius, circles with
/// half of it, so a hexagon reads twice as large as a circle of equal radius.
const HEXAGON_SCALE: f32 = 2.0;

pub fn particle_count(viewport: Viewport, config: &FieldConfig) -> usize {
    if config.density_factor <= 0.0 {
        return 0;
    }

    let by_area = (viewport.area() / config.density_factor as f64).floor();
    (by_area as usize).min(config.max_particles)
}

pub struct ParticleField {
    config: FieldConfig,
    viewport: Option<Viewport>,
    particles: Vec<Particle>,
    connections: Vec<Connection>,
    controller: AnimationController,
}

impl ParticleField {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            viewport: None,
            particles: Vec::new(),
            connections: Vec::new(),
            controller: AnimationController::new("particle field"),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn set_connection_threshold(&mut self, threshold: f32) {
        self.config.connection_threshold = threshold.max(1.0);
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.controller.lifecycle()
    }

    pub fn frames(&self) -> u64 {
        self.controller.frames()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Particles indexed by id; `particles()[id].id == id`.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Builds a fresh particle set for `viewport` and starts the loop.
    ///
    /// A missing surface leaves the field without particles and, if it was
    /// never started, still uninitialized.
    pub fn initialize(&mut self, viewport: Option<Viewport>, rng: &mut impl Rng) -> bool {
        if self.controller.is_torn_down() {
            log::debug!("particle field: initialize after teardown, ignoring");
            return false;
        }

        self.particles.clear();
        self.connections.clear();
        self.viewport = viewport;

        let Some(viewport) = viewport else {
            log::debug!("particle field: no rendering surface, not starting");
            return false;
        };

        let count = particle_count(viewport, &self.config);
        self.particles.reserve(count);
        for id in 0..count {
            self.particles
                .push(Particle::spawn(id, viewport, &self.config, rng));
        }

        log::info!(
            "particle field: {count} particles for {}x{}",
            viewport.width,
            viewport.height
        );
        self.controller.start();
        true
    }

    /// Discards every particle and initializes again at the new size.
    pub fn resize(&mut self, viewport: Option<Viewport>, rng: &mut impl Rng) -> bool {
        if let (Some(old), Some(new)) = (self.viewport, viewport) {
            log::debug!(
                "particle field: resize {}x{} -> {}x{}",
                old.width,
                old.height,
                new.width,
                new.height
            );
        }
        self.initialize(viewport, rng)
    }

    /// Advances one frame: all positions first, then the connection pass
    /// against the updated positions.
    pub fn tick(&mut self) -> bool {
        let Some(viewport) = self.viewport else {
            return false;
        };
        if !self.controller.begin_frame() {
            return false;
        }

        for particle in &mut self.particles {
            particle.advance(viewport);
        }

        connect_into(
            &self.particles,
            self.config.connection_threshold,
            &mut self.connections,
        );
        true
    }

    /// Keeps the token while the surface is gone so a later resize can pick
    /// the loop back up, but asks for no frames in the meantime.
    pub fn schedule(&self, host: &impl FrameHost) {
        if self.viewport.is_some() {
            self.controller.schedule(host);
        }
    }

    /// Stops the loop and lets go of the surface. Particle state is left as
    /// it was on the last frame.
    pub fn teardown(&mut self) -> bool {
        let stopped = self.controller.teardown();
        if stopped {
            self.viewport = None;
        }
        stopped
    }

    /// Lines go down first so the particles sit on top of them.
    pub fn extend_scene(&self, scene: &mut Scene) {
        let line_opacity = self.config.line_opacity;
        for connection in &self.connections {
            let (Some(a), Some(b)) = (
                self.particles.get(connection.a),
                self.particles.get(connection.b),
            ) else {
                continue;
            };

            let alpha = connection.alpha * line_opacity;
            scene.push(SceneItem::Line {
                from: point(a.position),
                to: point(b.position),
                width: self.config.line_width,
                start_color: a.color.with_alpha(alpha),
                end_color: b.color.with_alpha(alpha),
            });
        }

        for particle in &self.particles {
            let center = point(particle.position);
            let fill = particle.color.with_alpha(particle.opacity);
            scene.push(match particle.shape {
                ParticleShape::Circle => SceneItem::Circle {
                    center,
                    radius: particle.radius,
                    fill,
                },
                ParticleShape::Hexagon => SceneItem::Hexagon {
                    center,
                    radius: particle.radius * HEXAGON_SCALE,
                    rotation: 0.0,
                    fill,
                    stroke: None,
                },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::animation::tests::CountingHost;

    fn config(density_factor: f32, max_particles: usize) -> FieldConfig {
        FieldConfig {
            density_factor,
            max_particles,
            ..FieldConfig::default()
        }
    }

    fn viewport(width: f32, height: f32) -> Option<Viewport> {
        Viewport::new(width, height)
    }

    #[test]
    fn landing_page_viewport_gets_sixty_four_particles() {
        let mut field = ParticleField::new(config(15_000.0, 100));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(field.initialize(viewport(1200.0, 800.0), &mut rng));
        assert_eq!(field.particles().len(), 64);
        assert_eq!(field.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn count_follows_area_and_cap() {
        let cases = [
            (1200.0, 800.0, 15_000.0, 100, 64),
            (1920.0, 1080.0, 10_000.0, 100, 100),
            (320.0, 240.0, 10_000.0, 100, 7),
            (90.0, 90.0, 10_000.0, 100, 0),
            (1000.0, 1000.0, 1_000.0, 250, 250),
        ];

        for (width, height, density, max, expected) in cases {
            let viewport = Viewport::new(width, height).expect("valid viewport");
            assert_eq!(
                particle_count(viewport, &config(density, max)),
                expected,
                "{width}x{height} density {density} max {max}"
            );
        }
    }

    #[test]
    fn initial_positions_lie_inside_the_viewport_and_ids_are_indices() {
        let mut field = ParticleField::new(config(1_000.0, 100));
        let mut rng = StdRng::seed_from_u64(42);
        field.initialize(viewport(640.0, 360.0), &mut rng);

        for (index, particle) in field.particles().iter().enumerate() {
            assert_eq!(particle.id, index);
            assert!(particle.position.x >= 0.0 && particle.position.x < 640.0);
            assert!(particle.position.y >= 0.0 && particle.position.y < 360.0);
        }
    }

    #[test]
    fn same_seed_gives_the_same_field() {
        let mut first = ParticleField::new(FieldConfig::default());
        let mut second = ParticleField::new(FieldConfig::default());
        first.initialize(viewport(800.0, 600.0), &mut StdRng::seed_from_u64(9));
        second.initialize(viewport(800.0, 600.0), &mut StdRng::seed_from_u64(9));
        assert_eq!(first.particles(), second.particles());
    }

    #[test]
    fn missing_surface_does_not_start() {
        let mut field = ParticleField::new(FieldConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(!field.initialize(None, &mut rng));
        assert_eq!(field.lifecycle(), Lifecycle::Uninitialized);
        assert!(!field.tick());

        let host = CountingHost::default();
        field.schedule(&host);
        assert_eq!(host.requests.get(), 0);
    }

    #[test]
    fn tick_moves_every_particle_by_its_velocity_and_bounces_without_clamping() {
        let mut field = ParticleField::new(config(1_000.0, 100));
        let mut rng = StdRng::seed_from_u64(7);
        field.initialize(viewport(200.0, 150.0), &mut rng);

        for _ in 0..2_000 {
            let before = field.particles().to_vec();
            assert!(field.tick());

            for (old, new) in before.iter().zip(field.particles()) {
                let expected = old.position + old.velocity;
                assert_eq!(new.position, expected);

                let out_x = expected.x < 0.0 || expected.x > 200.0;
                let out_y = expected.y < 0.0 || expected.y > 150.0;
                let want_x = if out_x { -old.velocity.x } else { old.velocity.x };
                let want_y = if out_y { -old.velocity.y } else { old.velocity.y };
                assert_eq!(new.velocity.x, want_x);
                assert_eq!(new.velocity.y, want_y);
            }
        }
    }

    #[test]
    fn connections_match_the_threshold_after_each_tick() {
        let mut field = ParticleField::new(config(500.0, 60));
        let mut rng = StdRng::seed_from_u64(21);
        field.initialize(viewport(400.0, 300.0), &mut rng);
        field.tick();

        let threshold = field.config().connection_threshold;
        let particles = field.particles();
        let mut expected = 0;
        for i in 0..particles.len() {
            for j in (i + 1)..particles.len() {
                if particles[i].position.distance(particles[j].position) < threshold {
                    expected += 1;
                }
            }
        }

        assert_eq!(field.connections().len(), expected);
        for connection in field.connections() {
            assert!(connection.distance < threshold);
            assert!((connection.alpha - falloff(connection.distance, threshold)).abs() < 1e-6);
        }
    }

    #[test]
    fn resize_rebuilds_from_scratch() {
        let mut field = ParticleField::new(config(10_000.0, 100));
        let mut rng = StdRng::seed_from_u64(4);
        field.initialize(viewport(1000.0, 500.0), &mut rng);
        assert_eq!(field.particles().len(), 50);
        field.tick();

        assert!(field.resize(viewport(400.0, 500.0), &mut rng));
        assert_eq!(field.particles().len(), 20);
        assert!(field.connections().is_empty());
        assert!(
            field
                .particles()
                .iter()
                .all(|particle| particle.position.x < 400.0)
        );
        assert_eq!(field.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn resize_can_start_a_field_that_had_no_surface() {
        let mut field = ParticleField::new(FieldConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        field.initialize(None, &mut rng);
        assert!(field.resize(viewport(500.0, 400.0), &mut rng));
        assert_eq!(field.lifecycle(), Lifecycle::Running);
        assert_eq!(field.particles().len(), 20);
    }

    #[test]
    fn lost_surface_stops_frame_requests_until_it_returns() {
        let host = CountingHost::default();
        let mut field = ParticleField::new(FieldConfig::default());
        let mut rng = StdRng::seed_from_u64(8);
        field.initialize(viewport(800.0, 600.0), &mut rng);
        field.schedule(&host);
        assert_eq!(host.requests.get(), 1);

        assert!(!field.resize(None, &mut rng));
        assert!(field.particles().is_empty());
        assert!(!field.tick());
        field.schedule(&host);
        assert_eq!(host.requests.get(), 1);
        assert_eq!(field.lifecycle(), Lifecycle::Running);

        assert!(field.resize(viewport(800.0, 600.0), &mut rng));
        assert_eq!(field.particles().len(), 48);
        field.schedule(&host);
        assert_eq!(host.requests.get(), 2);
    }

    #[test]
    fn teardown_freezes_state() {
        let host = CountingHost::default();
        let mut field = ParticleField::new(FieldConfig::default());
        let mut rng = StdRng::seed_from_u64(13);
        field.initialize(viewport(800.0, 600.0), &mut rng);
        field.tick();

        assert!(field.teardown());
        let frozen = field.particles().to_vec();
        let frames = field.frames();

        for _ in 0..10 {
            assert!(!field.tick());
            field.schedule(&host);
        }
        assert!(!field.resize(viewport(300.0, 300.0), &mut rng));

        assert_eq!(field.particles(), frozen.as_slice());
        assert_eq!(field.frames(), frames);
        assert_eq!(host.requests.get(), 0);
        assert_eq!(field.lifecycle(), Lifecycle::TornDown);
        assert!(field.viewport().is_none());
    }

    #[test]
    fn scene_draws_lines_before_particles() {
        let mut field = ParticleField::new(config(2_000.0, 40));
        let mut rng = StdRng::seed_from_u64(2);
        field.initialize(viewport(300.0, 300.0), &mut rng);
        field.tick();

        let mut scene = Scene::new(Viewport::new(300.0, 300.0).expect("valid viewport"));
        field.extend_scene(&mut scene);

        let lines = field.connections().len();
        assert_eq!(scene.line_count(), lines);
        assert_eq!(scene.len(), lines + field.particles().len());
        assert!(
            scene.items[..lines]
                .iter()
                .all(|item| matches!(item, SceneItem::Line { .. }))
        );

        for item in &scene.items[..lines] {
            if let SceneItem::Line { start_color, .. } = item {
                assert!(start_color.a <= field.config().line_opacity);
            }
        }
    }
}
