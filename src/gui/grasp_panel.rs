//! The grasp controller panel: slide between two stored grasps.
//!
//! Layout mirrors the workflow: a "From" chooser, the blend slider with a
//! Set Reference / Save button row, and a "To" chooser. Single-click
//! selects an endpoint, double-click moves straight to it. The slider runs
//! -100..100 around the reference and resets to 0 whenever the reference
//! is recaptured.

use crate::control::GraspController;
use crate::core::FINGERS;
use tokio::runtime::Handle;
use tracing::error;

/// State of the save-grasp dialog.
struct SaveDialog {
    name: String,
    joints: Vec<(String, bool)>,
    /// Set once a save hit an existing name; the next accept overwrites.
    confirm_overwrite: bool,
}

/// Stateful grasp controller tab.
pub struct GraspPanel {
    controller: GraspController,
    names: Vec<String>,
    from_selection: Option<String>,
    to_selection: Option<String>,
    slider_value: i32,
    save_dialog: Option<SaveDialog>,
    status: Option<String>,
}

impl GraspPanel {
    /// Builds the panel, seeds the reference from the current pose and
    /// selects the first stored grasp for both endpoints.
    pub fn new(mut controller: GraspController, runtime: &Handle) -> Self {
        let names = controller.grasp_names();
        let mut from_selection = None;
        let mut to_selection = None;
        let mut status = None;

        if let Some(first) = names.first() {
            match controller
                .select_from(first)
                .and_then(|()| controller.select_to(first))
            {
                Ok(()) => {
                    from_selection = Some(first.clone());
                    to_selection = Some(first.clone());
                }
                Err(e) => status = Some(e.to_string()),
            }
        }
        if let Err(e) = runtime.block_on(controller.capture_current_pose()) {
            status = Some(e.to_string());
        }

        Self {
            controller,
            names,
            from_selection,
            to_selection,
            slider_value: 0,
            save_dialog: None,
            status,
        }
    }

    /// Renders the panel.
    pub fn ui(&mut self, ui: &mut egui::Ui, runtime: &Handle) {
        ui.columns(3, |columns| {
            self.chooser_ui(&mut columns[0], runtime, ChooserSide::From);
            self.center_ui(&mut columns[1], runtime);
            self.chooser_ui(&mut columns[2], runtime, ChooserSide::To);
        });

        if let Some(message) = &self.status {
            ui.separator();
            ui.colored_label(egui::Color32::YELLOW, message);
        }

        self.save_dialog_ui(ui, runtime);
    }

    fn chooser_ui(&mut self, ui: &mut egui::Ui, runtime: &Handle, side: ChooserSide) {
        ui.label(match side {
            ChooserSide::From => "From:",
            ChooserSide::To => "To:",
        });
        egui::ScrollArea::vertical()
            .id_salt(match side {
                ChooserSide::From => "from_chooser",
                ChooserSide::To => "to_chooser",
            })
            .max_height(220.0)
            .show(ui, |ui| {
                for name in self.names.clone() {
                    let selected = match side {
                        ChooserSide::From => self.from_selection.as_deref() == Some(&*name),
                        ChooserSide::To => self.to_selection.as_deref() == Some(&*name),
                    };
                    let response = ui.selectable_label(selected, &name);
                    if response.clicked() {
                        self.select(&name, side);
                    }
                    if response.double_clicked() {
                        self.move_to(&name, runtime);
                    }
                }
            });
    }

    fn center_ui(&mut self, ui: &mut egui::Ui, runtime: &Handle) {
        ui.horizontal(|ui| {
            ui.label("From");
            ui.separator();
            ui.label("Reference");
            ui.separator();
            ui.label("To");
        });

        let response = ui.add(
            egui::Slider::new(&mut self.slider_value, -100..=100).show_value(true),
        );
        if response.changed() {
            match runtime.block_on(self.controller.slide(self.slider_value)) {
                Ok(_) => self.status = None,
                Err(e) => {
                    error!(error = %e, "blend dispatch failed");
                    self.status = Some(e.to_string());
                }
            }
        }

        ui.horizontal(|ui| {
            if ui.button("Set Reference").clicked() {
                self.slider_value = 0;
                match runtime.block_on(self.controller.capture_current_pose()) {
                    Ok(()) => self.status = None,
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
            if ui.button("Save").clicked() && self.save_dialog.is_none() {
                self.save_dialog = Some(SaveDialog {
                    name: String::new(),
                    joints: self
                        .controller
                        .joint_names()
                        .into_iter()
                        .map(|joint| (joint, false))
                        .collect(),
                    confirm_overwrite: false,
                });
            }
        });
    }

    fn select(&mut self, name: &str, side: ChooserSide) {
        let result = match side {
            ChooserSide::From => {
                self.from_selection = Some(name.to_owned());
                self.controller.select_from(name)
            }
            ChooserSide::To => {
                self.to_selection = Some(name.to_owned());
                self.controller.select_to(name)
            }
        };
        self.slider_value = 0;
        if let Err(e) = result {
            self.status = Some(e.to_string());
        }
    }

    fn move_to(&mut self, name: &str, runtime: &Handle) {
        self.slider_value = 0;
        match runtime.block_on(self.controller.move_to_named(name)) {
            Ok(()) => self.status = None,
            Err(e) => {
                error!(grasp = name, error = %e, "move to named grasp failed");
                self.status = Some(e.to_string());
            }
        }
    }

    fn save_dialog_ui(&mut self, ui: &mut egui::Ui, runtime: &Handle) {
        let Some(dialog) = &mut self.save_dialog else {
            return;
        };

        let mut accepted = false;
        let mut cancelled = false;
        egui::Window::new("Save Grasp")
            .collapsible(false)
            .resizable(false)
            .show(ui.ctx(), |ui| {
                ui.horizontal(|ui| {
                    ui.label("Grasp Name:");
                    ui.text_edit_singleline(&mut dialog.name);
                });

                ui.horizontal(|ui| {
                    if ui.button("Select All").clicked() {
                        for (_, checked) in &mut dialog.joints {
                            *checked = true;
                        }
                    }
                    if ui.button("Deselect All").clicked() {
                        for (_, checked) in &mut dialog.joints {
                            *checked = false;
                        }
                    }
                });

                // One column per finger, leftovers (wrist) in the last.
                ui.columns(FINGERS.len() + 1, |columns| {
                    for (joint, checked) in &mut dialog.joints {
                        let lower = joint.to_lowercase();
                        let column = FINGERS
                            .iter()
                            .position(|finger| lower.contains(finger))
                            .unwrap_or(FINGERS.len());
                        columns[column].checkbox(checked, joint.clone());
                    }
                });

                if dialog.confirm_overwrite {
                    ui.colored_label(
                        egui::Color32::YELLOW,
                        format!("'{}' already exists. OK again to overwrite.", dialog.name),
                    );
                }

                ui.horizontal(|ui| {
                    let ok = ui.add_enabled(!dialog.name.is_empty(), egui::Button::new("OK"));
                    if ok.clicked() {
                        accepted = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if cancelled {
            self.save_dialog = None;
            return;
        }
        if !accepted {
            return;
        }

        let Some(dialog) = self.save_dialog.take() else {
            return;
        };
        let selected: Vec<String> = dialog
            .joints
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(joint, _)| joint.clone())
            .collect();
        let result = runtime.block_on(self.controller.save_grasp(
            &dialog.name,
            &selected,
            dialog.confirm_overwrite,
        ));
        match result {
            Ok(()) => {
                self.names = self.controller.grasp_names();
                self.status = None;
            }
            Err(e @ crate::error::HandError::GraspExists(_)) => {
                // Re-open with the overwrite confirmation armed.
                self.status = Some(e.to_string());
                self.save_dialog = Some(SaveDialog {
                    confirm_overwrite: true,
                    ..dialog
                });
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }
}

#[derive(Clone, Copy)]
enum ChooserSide {
    From,
    To,
}
