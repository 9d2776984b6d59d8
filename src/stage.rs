use eframe::egui::Pos2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animation::{FrameHost, Lifecycle};
use crate::config::{AmbientConfig, Layers};
use crate::cursor::TrailingCursor;
use crate::field::ParticleField;
use crate::radial::RadialMap;
use crate::scene::{Scene, Viewport};

/// Every animated layer of the page, sharing one viewport and one frame
/// clock. Each layer still owns its own controller.
pub struct Stage {
    rng: StdRng,
    viewport: Option<Viewport>,
    field: Option<ParticleField>,
    map: Option<RadialMap>,
    cursor: Option<TrailingCursor>,
}

impl Stage {
    pub fn new(config: &AmbientConfig, layers: Layers, seed: u64, with_cursor: bool) -> Self {
        let field = layers
            .field()
            .then(|| ParticleField::new(config.field.clone()));
        let map = layers.map().then(|| RadialMap::new(config.map.clone()));
        let cursor = (with_cursor && config.cursor.enabled)
            .then(|| TrailingCursor::new(config.cursor.clone()));

        Self {
            rng: StdRng::seed_from_u64(seed),
            viewport: None,
            field,
            map,
            cursor,
        }
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    pub fn field_mut(&mut self) -> Option<&mut ParticleField> {
        self.field.as_mut()
    }

    pub fn map(&self) -> Option<&RadialMap> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut RadialMap> {
        self.map.as_mut()
    }

    pub fn cursor(&self) -> Option<&TrailingCursor> {
        self.cursor.as_ref()
    }

    pub fn cursor_mut(&mut self) -> Option<&mut TrailingCursor> {
        self.cursor.as_mut()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Feeds the current surface size to every layer. The first usable size
    /// mounts the layers; later changes resize them.
    pub fn sync_viewport(&mut self, viewport: Option<Viewport>) {
        if viewport == self.viewport {
            return;
        }

        let first_mount = self.viewport.is_none();
        self.viewport = viewport;

        if let Some(field) = self.field.as_mut() {
            if first_mount {
                field.initialize(viewport, &mut self.rng);
            } else {
                field.resize(viewport, &mut self.rng);
            }
        }
        if let Some(map) = self.map.as_mut() {
            map.resize(viewport);
        }
        if let Some(cursor) = self.cursor.as_mut()
            && viewport.is_some()
            && cursor.lifecycle() == Lifecycle::Uninitialized
        {
            cursor.start();
        }
    }

    pub fn pointer(&mut self, position: Option<Pos2>, now: f64) {
        let hovered_node = position.and_then(|position| {
            self.map
                .as_ref()
                .and_then(|map| map.node_at(position))
        });

        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        match position {
            Some(position) => cursor.pointer_moved(position, now),
            None => cursor.pointer_left(),
        }
        cursor.set_active(hovered_node.is_some());
    }

    /// One frame on the shared clock; `now` is seconds since start.
    pub fn frame(&mut self, now: f64) -> bool {
        let mut advanced = false;
        if let Some(field) = self.field.as_mut() {
            advanced |= field.tick();
        }
        if let Some(map) = self.map.as_mut() {
            advanced |= map.advance(now * 1000.0);
        }
        if let Some(cursor) = self.cursor.as_mut() {
            advanced |= cursor.advance(now);
        }
        advanced
    }

    /// Nothing asks for frames while the surface is gone.
    pub fn schedule(&self, host: &impl FrameHost) {
        if self.viewport.is_none() {
            return;
        }
        if let Some(field) = &self.field {
            field.schedule(host);
        }
        if let Some(map) = &self.map {
            map.schedule(host);
        }
        if let Some(cursor) = &self.cursor {
            cursor.schedule(host);
        }
    }

    pub fn is_running(&self) -> bool {
        let running = |lifecycle: Lifecycle| lifecycle == Lifecycle::Running;
        self.field
            .as_ref()
            .is_some_and(|field| running(field.lifecycle()))
            || self.map.as_ref().is_some_and(|map| running(map.lifecycle()))
            || self
                .cursor
                .as_ref()
                .is_some_and(|cursor| running(cursor.lifecycle()))
    }

    pub fn total_frames(&self) -> u64 {
        let field = self.field.as_ref().map_or(0, ParticleField::frames);
        let map = self.map.as_ref().map_or(0, RadialMap::frames);
        field.max(map)
    }

    pub fn teardown(&mut self) {
        if let Some(field) = self.field.as_mut() {
            field.teardown();
        }
        if let Some(map) = self.map.as_mut() {
            map.teardown();
        }
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.teardown();
        }
    }

    /// Field at the back, map above it, cursor on top.
    pub fn scene(&self) -> Scene {
        let mut scene = self.viewport.map(Scene::new).unwrap_or_default();
        if let Some(field) = &self.field {
            field.extend_scene(&mut scene);
        }
        if let Some(map) = &self.map {
            map.extend_scene(&mut scene);
        }
        if let Some(cursor) = &self.cursor {
            cursor.extend_scene(&mut scene);
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::animation::tests::CountingHost;

    fn stage(layers: Layers) -> Stage {
        Stage::new(&AmbientConfig::default(), layers, 17, true)
    }

    #[test]
    fn nothing_runs_until_a_surface_arrives() {
        let host = CountingHost::default();
        let mut stage = stage(Layers::Both);
        assert!(!stage.frame(0.0));
        stage.schedule(&host);
        assert_eq!(host.requests.get(), 0);
        assert!(!stage.is_running());

        stage.sync_viewport(Viewport::new(1200.0, 800.0));
        assert!(stage.is_running());
        assert!(stage.frame(0.016));
        stage.schedule(&host);
        assert_eq!(host.requests.get(), 3);
    }

    #[test]
    fn losing_the_surface_pauses_frame_requests() {
        let host = CountingHost::default();
        let mut stage = stage(Layers::Both);
        stage.sync_viewport(Viewport::new(1200.0, 800.0));
        stage.sync_viewport(None);
        assert!(stage.is_running());
        stage.schedule(&host);
        assert_eq!(host.requests.get(), 0);

        stage.sync_viewport(Viewport::new(1200.0, 800.0));
        assert_eq!(stage.field().map(|field| field.particles().len()), Some(96));
        stage.schedule(&host);
        assert_eq!(host.requests.get(), 3);
    }

    #[test]
    fn layer_selection_limits_components() {
        let mut stage = stage(Layers::Map);
        stage.sync_viewport(Viewport::new(600.0, 400.0));
        assert!(stage.field().is_none());
        assert_eq!(stage.map().map(|map| map.nodes().len()), Some(6));
    }

    #[test]
    fn resize_rebuilds_the_field_and_recenters_the_map() {
        let mut stage = stage(Layers::Both);
        stage.sync_viewport(Viewport::new(1000.0, 1000.0));
        assert_eq!(stage.field().map(|field| field.particles().len()), Some(100));

        stage.sync_viewport(Viewport::new(400.0, 250.0));
        assert_eq!(stage.field().map(|field| field.particles().len()), Some(10));
        assert_eq!(stage.map().map(RadialMap::center), Some(pos2(200.0, 125.0)));
    }

    #[test]
    fn hovering_a_node_activates_the_cursor() {
        let mut stage = stage(Layers::Map);
        stage.sync_viewport(Viewport::new(600.0, 600.0));
        stage.frame(0.0);
        let node = stage
            .map()
            .and_then(|map| map.node_position(0))
            .expect("node exists");

        stage.pointer(Some(node), 0.0);
        assert_eq!(stage.cursor_mut().map(|cursor| cursor.is_active()), Some(true));

        stage.pointer(Some(pos2(300.0, 300.0)), 0.1);
        assert_eq!(stage.cursor_mut().map(|cursor| cursor.is_active()), Some(false));
    }

    #[test]
    fn teardown_stops_every_layer() {
        let host = CountingHost::default();
        let mut stage = stage(Layers::Both);
        stage.sync_viewport(Viewport::new(800.0, 600.0));
        stage.frame(0.0);
        stage.teardown();

        let frames = stage.total_frames();
        assert!(!stage.frame(1.0));
        stage.schedule(&host);
        assert_eq!(host.requests.get(), 0);
        assert_eq!(stage.total_frames(), frames);
        assert!(!stage.is_running());
    }

    #[test]
    fn scene_stacks_field_under_map() {
        let mut stage = stage(Layers::Both);
        stage.sync_viewport(Viewport::new(800.0, 600.0));
        stage.frame(0.5);
        let scene = stage.scene();

        let particles = stage.field().map_or(0, |field| field.particles().len());
        let connections = stage.field().map_or(0, |field| field.connections().len());
        assert_eq!(scene.width, 800.0);
        assert_eq!(scene.line_count(), connections + 6);
        assert!(scene.len() > particles + connections);
    }
}
