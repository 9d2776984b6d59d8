use eframe::egui::{self, Key, Response, Ui};

use super::super::ViewModel;

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

const THRESHOLD_RANGE: (f32, f32) = (20.0, 300.0);
const AMPLITUDE_RANGE: (f32, f32) = (0.0, 24.0);
const SKEW_RANGE: (f32, f32) = (-1.0, 1.0);

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

fn default_slider_key_step(min: f32, max: f32) -> f32 {
    ((max - min) / 200.0).max(0.0005)
}

/// Holding an arrow key on a focused slider speeds up the longer it is held.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    (min, max): (f32, f32),
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        return false;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction as f32 * default_slider_key_step(min, max) * speed * delta_time;

    let old_value = *value;
    *value = (*value + delta).clamp(min, max);
    ui.ctx().request_repaint();
    (*value - old_value).abs() > f32::EPSILON
}

fn tuning_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: (f32, f32),
    text: &str,
    hover: &str,
) -> bool {
    let response = ui
        .add(
            egui::Slider::new(&mut *value, range.0..=range.1)
                .text(text)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hover);
    if response.hovered() {
        response.request_focus();
    }
    let keyed = apply_slider_arrow_acceleration(ui, &response, value, range);
    response.changed() || keyed
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Animation Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.add_enabled_ui(self.stage.field().is_some(), |ui| {
            ui.checkbox(&mut self.show_field, "Particle field")
                .on_hover_text("Draw the drifting particles and their connections.");
        });
        ui.add_enabled_ui(self.stage.map().is_some(), |ui| {
            ui.checkbox(&mut self.show_map, "Life map")
                .on_hover_text("Draw the hub and the floating task nodes.");
        });
        ui.add_enabled_ui(self.stage.cursor().is_some(), |ui| {
            ui.checkbox(&mut self.show_cursor, "Trailing cursor")
                .on_hover_text("Replace the pointer with a dot and a lagging ring.");
        });

        ui.checkbox(&mut self.show_fps_bar, "FPS Display")
            .on_hover_text("Show a live FPS readout in the header.");

        ui.collapsing("FPS Display tuning", |ui| {
            ui.add_enabled_ui(self.show_fps_bar, |ui| {
                ui.checkbox(&mut self.fps_show_current, "Show current FPS")
                    .on_hover_text("Display the most recent frame rate sample.");
                ui.checkbox(&mut self.fps_show_average, "Show average FPS")
                    .on_hover_text("Display the running average FPS over recent samples.");
                ui.checkbox(&mut self.fps_show_low, "Show low FPS")
                    .on_hover_text("Display the minimum FPS from the recent sample window.");
                ui.checkbox(&mut self.fps_show_high, "Show high FPS")
                    .on_hover_text("Display the maximum FPS from the recent sample window.");
                ui.checkbox(&mut self.fps_show_frame_time, "Show frame time")
                    .on_hover_text("Display frame duration in milliseconds.");
            });
        });

        ui.collapsing("Layer status", |ui| {
            if let Some(field) = self.stage.field() {
                ui.label(format!(
                    "field: {}, {} frames",
                    field.lifecycle().label(),
                    field.frames()
                ));
            }
            if let Some(map) = self.stage.map() {
                ui.label(format!(
                    "life map: {}, {} frames, clock {:.1} s",
                    map.lifecycle().label(),
                    map.frames(),
                    map.elapsed_ms() / 1000.0
                ));
            }
            if let Some(cursor) = self.stage.cursor() {
                ui.label(format!("cursor: {}", cursor.lifecycle().label()));
                let lag = cursor
                    .dot_position()
                    .zip(cursor.ring_position())
                    .map_or(0.0, |(dot, ring)| dot.distance(ring));
                ui.small(format!("ring lag {lag:.1} px"));
            }
        });

        if self.stage.field().is_some() {
            ui.collapsing("Field tuning", |ui| {
                let changed = tuning_slider(
                    ui,
                    &mut self.connection_threshold,
                    THRESHOLD_RANGE,
                    "Connection distance",
                    "Particles closer than this are joined by a fading line.",
                );
                if changed && let Some(field) = self.stage.field_mut() {
                    field.set_connection_threshold(self.connection_threshold);
                }
            });
        }

        if self.stage.map().is_some() {
            ui.collapsing("Life map tuning", |ui| {
                let amplitude_changed = tuning_slider(
                    ui,
                    &mut self.amplitude,
                    AMPLITUDE_RANGE,
                    "Float amplitude",
                    "How far nodes bob up and down, in pixels.",
                );
                let skew_changed = tuning_slider(
                    ui,
                    &mut self.skew,
                    SKEW_RANGE,
                    "Spiral skew",
                    "Extra angle per node; zero keeps the ring evenly spaced.",
                );

                if let Some(map) = self.stage.map_mut() {
                    if amplitude_changed {
                        map.set_amplitude(self.amplitude);
                    }
                    if skew_changed {
                        map.set_skew(self.skew);
                    }
                }
            });
        }
    }
}
