use std::collections::VecDeque;

use eframe::egui::Context;

use super::super::ViewModel;

const SAMPLE_WINDOW: usize = 180;

/// Rolling frame-rate window fed from egui's smoothed frame delta.
#[derive(Debug, Default)]
pub(in crate::app) struct FrameRate {
    current: f32,
    samples: VecDeque<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameRateSummary {
    current: f32,
    average: f32,
    low: f32,
    high: f32,
}

impl FrameRate {
    fn record(&mut self, delta_seconds: f32) {
        if delta_seconds <= f32::EPSILON {
            return;
        }

        self.current = (1.0 / delta_seconds).clamp(0.0, 1000.0);
        if self.samples.len() == SAMPLE_WINDOW {
            self.samples.pop_front();
        }
        self.samples.push_back(self.current);
    }

    fn summary(&self) -> Option<FrameRateSummary> {
        if self.samples.is_empty() {
            return None;
        }

        let (low, high, sum) = self.samples.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY, 0.0),
            |(low, high, sum), &sample| (low.min(sample), high.max(sample), sum + sample),
        );
        Some(FrameRateSummary {
            current: self.current,
            average: sum / self.samples.len() as f32,
            low,
            high,
        })
    }
}

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        let delta = ctx.input(|input| input.stable_dt);
        self.frame_rate.record(delta);
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps_bar {
            return None;
        }
        let summary = self.frame_rate.summary()?;

        let parts = [
            (self.fps_show_current, format!("FPS {:.0}", summary.current)),
            (self.fps_show_average, format!("avg {:.1}", summary.average)),
            (self.fps_show_low, format!("low {:.0}", summary.low)),
            (self.fps_show_high, format!("high {:.0}", summary.high)),
            (
                self.fps_show_frame_time,
                format!("{:.1} ms", 1000.0 / summary.current.max(f32::EPSILON)),
            ),
        ];
        let text = parts
            .into_iter()
            .filter_map(|(shown, part)| shown.then_some(part))
            .collect::<Vec<_>>()
            .join(" | ");

        (!text.is_empty()).then_some(text)
    }

    pub(in crate::app) fn stage_stats_text(&self) -> String {
        let (particles, connections) = self.stage.field().map_or((0, 0), |field| {
            (field.particles().len(), field.connections().len())
        });
        let nodes = self.stage.map().map_or(0, |map| map.nodes().len());

        format!(
            "{particles} particles / {connections} links / {nodes} nodes / frame {}",
            self.stage.total_frames()
        )
    }
}
