use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;
use super::super::render_utils::to_color32;

impl ViewModel {
    pub(in crate::app) fn draw_tasks(&mut self, ui: &mut Ui) {
        ui.heading("Life Map");
        ui.add_space(6.0);

        let Some(map) = self.stage.map() else {
            ui.label("The life map is not part of this scene.");
            return;
        };
        if map.nodes().is_empty() {
            ui.label("Waiting for a surface to lay tasks out on.");
            return;
        }

        ui.label(format!(
            "{} tasks on radius {:.0} px around ({:.0}, {:.0})",
            map.nodes().len(),
            map.radius(),
            map.center().x,
            map.center().y
        ));
        ui.separator();

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("task_list_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for node in map.nodes() {
                    let selected = self.selected == Some(node.index);
                    let title = RichText::new(&node.label)
                        .strong()
                        .color(to_color32(node.category.color()));
                    if ui.selectable_label(selected, title).clicked() {
                        clicked = Some(node.index);
                    }
                    ui.small(format!(
                        "{} / {} priority / {:.0}°",
                        node.kind.label(),
                        node.category.label(),
                        map.base_angle(node.index).to_degrees()
                    ));
                    if selected && let Some(detail) = &node.detail {
                        ui.label(detail);
                    }
                    ui.add_space(4.0);
                }
            });

        if let Some(index) = clicked {
            self.selected = if self.selected == Some(index) {
                None
            } else {
                Some(index)
            };
        }
    }
}
