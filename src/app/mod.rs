use eframe::egui::{self, Context};

use crate::config::{AmbientConfig, Layers};
use crate::stage::Stage;
use crate::util::format_millis;

use ui::FrameRate;

mod render_utils;
mod ui;
mod view;

pub struct AmbientApp {
    config: AmbientConfig,
    layers: Layers,
    with_cursor: bool,
    state: AppState,
}

enum AppState {
    Live(Box<ViewModel>),
    Stopped { seed: u64, frames: u64 },
}

/// What the panels asked for during this frame; applied after drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StageRequest {
    Reseed,
    Stop,
}

struct ViewModel {
    stage: Stage,
    seed: u64,
    selected: Option<usize>,
    show_field: bool,
    show_map: bool,
    show_cursor: bool,
    connection_threshold: f32,
    amplitude: f32,
    skew: f32,
    show_fps_bar: bool,
    fps_show_current: bool,
    fps_show_average: bool,
    fps_show_low: bool,
    fps_show_high: bool,
    fps_show_frame_time: bool,
    frame_rate: FrameRate,
}

impl AmbientApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AmbientConfig,
        layers: Layers,
        seed: u64,
        with_cursor: bool,
    ) -> Self {
        let state = Self::start(&config, layers, seed, with_cursor);
        Self {
            config,
            layers,
            with_cursor,
            state,
        }
    }

    fn start(config: &AmbientConfig, layers: Layers, seed: u64, with_cursor: bool) -> AppState {
        log::info!("starting stage with seed {seed}");
        AppState::Live(Box::new(ViewModel::new(config, layers, seed, with_cursor)))
    }
}

impl eframe::App for AmbientApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Live(model) => {
                let mut request = None;
                model.show(ctx, &mut request);

                match request {
                    Some(StageRequest::Reseed) => {
                        model.stage.teardown();
                        transition = Some(Self::start(
                            &self.config,
                            self.layers,
                            rand::random(),
                            self.with_cursor,
                        ));
                    }
                    Some(StageRequest::Stop) => {
                        model.stage.teardown();
                        transition = Some(AppState::Stopped {
                            seed: model.seed,
                            frames: model.stage.total_frames(),
                        });
                    }
                    None => {}
                }
            }
            AppState::Stopped { seed, frames } => {
                let (seed, frames) = (*seed, *frames);
                let delay = format_millis(self.config.cursor.trail_delay_ms / 1000.0);
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Animation stopped");
                        ui.add_space(6.0);
                        ui.label(format!("seed {seed}, {frames} frames rendered"));
                        ui.label(format!("cursor trail delay {delay}"));
                        ui.add_space(10.0);
                        if ui.button("Restart").clicked() {
                            transition = Some(Self::start(
                                &self.config,
                                self.layers,
                                seed,
                                self.with_cursor,
                            ));
                        }
                        if ui.button("Restart with new seed").clicked() {
                            transition = Some(Self::start(
                                &self.config,
                                self.layers,
                                rand::random(),
                                self.with_cursor,
                            ));
                        }
                    });
                });
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
