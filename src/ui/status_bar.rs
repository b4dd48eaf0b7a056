use egui::Ui;

use crate::state::{AppState, Status};

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        match state.watched_path() {
            Some(path) => ui.weak(format!("Watching {}", path.display())),
            None => ui.weak("No file open"),
        };

        ui.separator();

        match &state.status {
            Status::Placeholder => {
                ui.weak("Showing placeholder cube — File ▸ Open to start watching");
            }
            Status::Loaded { mesh_path } => {
                ui.label(format!("Loaded {}", mesh_path.display()));
            }
            Status::Error(msg) => {
                ui.colored_label(egui::Color32::from_rgb(240, 100, 90), msg);
            }
        }

        ui.separator();
        ui.weak(format!("{} triangles", state.viewer.triangle_count()));

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak("meshview v0.1");
        });
    });
}
