use std::cell::Cell;
use std::io::Write;

use anyhow::{Context, Result, anyhow};

use crate::animation::FrameHost;
use crate::config::{AmbientConfig, Layers};
use crate::scene::{Scene, Viewport};
use crate::stage::Stage;

const FRAME_SECONDS: f64 = 1.0 / 60.0;

/// Frame clock for runs without a window: it only counts requests and the
/// loop below decides when the next frame happens.
#[derive(Default)]
pub struct RecordingHost {
    requests: Cell<u64>,
}

impl RecordingHost {
    pub fn take_request(&self) -> bool {
        let pending = self.requests.get();
        self.requests.set(0);
        pending > 0
    }
}

impl FrameHost for RecordingHost {
    fn request_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HeadlessRun {
    pub frames: u64,
    pub width: f32,
    pub height: f32,
    pub seed: u64,
    pub layers: Layers,
}

/// Drives the stage at a fixed 60 Hz clock for `run.frames` frames and
/// returns the last scene.
pub fn simulate(config: &AmbientConfig, run: HeadlessRun) -> Result<Scene> {
    let viewport = Viewport::new(run.width, run.height)
        .ok_or_else(|| anyhow!("viewport {}x{} has no area", run.width, run.height))?;

    let host = RecordingHost::default();
    let mut stage = Stage::new(config, run.layers, run.seed, false);
    stage.sync_viewport(Some(viewport));
    stage.schedule(&host);

    let mut frame = 0u64;
    while frame < run.frames && host.take_request() {
        frame += 1;
        stage.frame(frame as f64 * FRAME_SECONDS);
        stage.schedule(&host);
    }

    log::info!("headless run finished after {frame} frames");
    Ok(stage.scene())
}

pub fn write_scene(scene: &Scene, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, scene).context("failed to serialize scene")?;
    writeln!(out).context("failed to write scene")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneItem;

    fn run(frames: u64, layers: Layers) -> HeadlessRun {
        HeadlessRun {
            frames,
            width: 1200.0,
            height: 800.0,
            seed: 99,
            layers,
        }
    }

    #[test]
    fn same_seed_same_scene() {
        let config = AmbientConfig::default();
        let first = simulate(&config, run(30, Layers::Both)).expect("run succeeds");
        let second = simulate(&config, run(30, Layers::Both)).expect("run succeeds");
        assert_eq!(first, second);
    }

    #[test]
    fn field_only_run_has_one_record_per_particle_plus_lines() {
        let config = AmbientConfig::from_json(r#"{ "field": { "density_factor": 15000.0 } }"#)
            .expect("config parses");
        let scene = simulate(&config, run(5, Layers::Field)).expect("run succeeds");

        let shapes = scene
            .items
            .iter()
            .filter(|item| matches!(item, SceneItem::Circle { .. } | SceneItem::Hexagon { .. }))
            .count();
        assert_eq!(shapes, 64);
        assert_eq!(scene.len(), 64 + scene.line_count());
    }

    #[test]
    fn empty_viewport_is_an_error() {
        let config = AmbientConfig::default();
        let mut bad = run(1, Layers::Both);
        bad.width = 0.0;
        assert!(simulate(&config, bad).is_err());
    }

    #[test]
    fn scene_is_written_as_json() {
        let config = AmbientConfig::default();
        let scene = simulate(&config, run(2, Layers::Map)).expect("run succeeds");
        let mut out = Vec::new();
        write_scene(&scene, &mut out).expect("write succeeds");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
        assert_eq!(value["width"], 1200.0);
        assert_eq!(value["items"][0]["kind"], "line");
    }
}
