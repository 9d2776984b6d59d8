use eframe::egui::{self, Sense, Stroke, Ui, Vec2};

use crate::scene::{Scene, Viewport};

use super::ViewModel;
use super::render_utils::{draw_background, paint_scene, to_color32};

impl ViewModel {
    pub(in crate::app) fn draw_stage(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        self.stage.sync_viewport(Viewport::from_rect(rect));

        let now = ui.input(|input| input.time);
        let pointer = response
            .hover_pos()
            .map(|position| (position - rect.min).to_pos2());
        self.stage.pointer(pointer, now);

        if response.clicked()
            && let Some(position) = pointer
        {
            let hit = self.stage.map().and_then(|map| map.node_at(position));
            if hit.is_some() {
                self.selected = hit;
            }
        }

        let cursor_visible = self.show_cursor && self.stage.cursor().is_some();
        if pointer.is_some() && cursor_visible {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::None;
            });
        }

        self.stage.frame(now);

        let Some(viewport) = self.stage.viewport() else {
            ui.label("Waiting for a drawable surface.");
            return;
        };

        let mut scene = Scene::new(viewport);
        if self.show_field
            && let Some(field) = self.stage.field()
        {
            field.extend_scene(&mut scene);
        }
        if self.show_map
            && let Some(map) = self.stage.map()
        {
            map.extend_scene(&mut scene);
        }

        let offset = rect.min.to_vec2();
        paint_scene(&painter, offset, &scene);
        self.draw_selection(&painter, offset);

        if cursor_visible && let Some(cursor) = self.stage.cursor() {
            let mut overlay = Scene::new(viewport);
            cursor.extend_scene(&mut overlay);
            paint_scene(&painter, offset, &overlay);
        }

        self.stage.schedule(ui.ctx());
    }

    fn draw_selection(&self, painter: &egui::Painter, offset: Vec2) {
        if !self.show_map {
            return;
        }
        let Some((map, index)) = self.stage.map().zip(self.selected) else {
            return;
        };
        let (Some(position), Some(node)) = (map.node_position(index), map.nodes().get(index))
        else {
            return;
        };

        let color = to_color32(node.category.color());
        painter.circle_stroke(position + offset, 38.0, Stroke::new(2.0, color));
        if let Some(spoke) = map.connect_to_center(index) {
            painter.line_segment(
                [spoke.from + offset, spoke.to + offset],
                Stroke::new(1.5, color.gamma_multiply(0.6)),
            );
        }
    }
}
