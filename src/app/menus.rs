//! Application menu bar

use eframe::egui;

use crate::state::AppState;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button("File", |ui| {
        if ui.button("Open…").clicked() {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title("Select file to view")
                .add_filter("SolidPython script", &["py"])
                .add_filter("CAD files", &["scad", "stl", "obj"])
                .add_filter("all files", &["*"])
                .pick_file()
            {
                state.open_path(&path);
            }
        }
        ui.separator();
        if ui.button("Exit").clicked() {
            ui.close_menu();
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button("View", |ui| {
        let mut changed = false;

        changed |= ui.checkbox(&mut state.settings.grid.visible, "Grid").changed();
        changed |= ui.checkbox(&mut state.settings.axes.visible, "Axes").changed();

        ui.separator();

        changed |= ui
            .add(
                egui::Slider::new(&mut state.settings.watch.poll_interval_ms, 100..=5000)
                    .text("Poll interval (ms)"),
            )
            .changed();

        if changed {
            state.settings.save();
        }
    });
}
