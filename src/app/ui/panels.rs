use eframe::egui::{self, Align, Context, Layout};

use crate::config::{AmbientConfig, Layers};
use crate::stage::Stage;

use super::super::{FrameRate, StageRequest, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(
        config: &AmbientConfig,
        layers: Layers,
        seed: u64,
        with_cursor: bool,
    ) -> Self {
        Self {
            stage: Stage::new(config, layers, seed, with_cursor),
            seed,
            selected: None,
            show_field: layers.field(),
            show_map: layers.map(),
            show_cursor: with_cursor && config.cursor.enabled,
            connection_threshold: config.field.connection_threshold,
            amplitude: config.map.amplitude,
            skew: config.map.skew,
            show_fps_bar: true,
            fps_show_current: true,
            fps_show_average: true,
            fps_show_low: false,
            fps_show_high: false,
            fps_show_frame_time: true,
            frame_rate: FrameRate::default(),
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, request: &mut Option<StageRequest>) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("navNote ambient");
                    ui.separator();
                    ui.label(format!("seed: {}", self.seed));
                    if let Some(viewport) = self.stage.viewport() {
                        ui.label(format!(
                            "surface: {:.0}x{:.0}",
                            viewport.width, viewport.height
                        ));
                    }
                    if ui
                        .button("Reseed")
                        .on_hover_text("Tear the animation down and start again with a new seed.")
                        .clicked()
                    {
                        *request = Some(StageRequest::Reseed);
                    }
                    if ui
                        .add_enabled(self.stage.is_running(), egui::Button::new("Stop"))
                        .on_hover_text("Tear every layer down and stop requesting frames.")
                        .clicked()
                    {
                        *request = Some(StageRequest::Stop);
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.stage_stats_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.stage.map().is_some() {
            egui::SidePanel::right("tasks")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| self.draw_tasks(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_stage(ui));
    }
}
