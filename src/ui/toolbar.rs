use egui::Ui;

use crate::state::{AppState, DisplayMode};
use crate::viewport::camera::ViewPreset;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        if ui.button("XY").on_hover_text("Top view").clicked() {
            state.camera.apply_preset(ViewPreset::Xy);
        }
        if ui.button("XZ").on_hover_text("Front view").clicked() {
            state.camera.apply_preset(ViewPreset::Xz);
        }
        if ui.button("YZ").on_hover_text("Side view").clicked() {
            state.camera.apply_preset(ViewPreset::Yz);
        }
        if ui.button("Fit").on_hover_text("Frame the model").clicked() {
            let bbox = *state.viewer.aabb();
            state.camera.fit(&bbox);
        }
        if ui.button("Reset").clicked() {
            state.camera.reset();
        }

        ui.separator();

        let mut mode = state.settings.display_mode;
        egui::ComboBox::from_id_salt("display_mode")
            .selected_text(mode.display_name())
            .show_ui(ui, |ui| {
                for m in DisplayMode::all() {
                    ui.selectable_value(&mut mode, *m, m.display_name());
                }
            });
        if mode != state.settings.display_mode {
            state.settings.display_mode = mode;
            state.settings.save();
        }
    });
}
