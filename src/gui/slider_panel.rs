//! Per-joint position sliders.
//!
//! One vertical slider per running position controller, bounded by the
//! joint limits from the robot description. A checkbox under each slider
//! marks it for the selection slider, which drags every marked joint to
//! the same percentage of its range. "Send on release" defers dispatch
//! until the drag ends, for hands that should not chase every pixel.

use crate::control::joints::Joint;
use crate::core::JointSnapshot;
use crate::hardware::HandCommander;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::error;

struct JointRow {
    joint: Joint,
    value: f64,
    selected: bool,
}

/// Stateful joint slider tab.
pub struct SliderPanel {
    rows: Vec<JointRow>,
    send_on_release: bool,
    selection_pct: f64,
    status: Option<String>,
}

impl SliderPanel {
    /// Builds one row per joint, seeded from `initial` positions.
    pub fn new(joints: Vec<Joint>, initial: &JointSnapshot) -> Self {
        Self {
            rows: joints
                .into_iter()
                .map(|joint| JointRow {
                    value: initial.get(&joint.name).unwrap_or(0.0),
                    joint,
                    selected: false,
                })
                .collect(),
            send_on_release: false,
            selection_pct: 0.0,
            status: None,
        }
    }

    /// Re-seeds every slider from the hand's current pose.
    pub fn refresh(&mut self, pose: &JointSnapshot) {
        for row in &mut self.rows {
            if let Some(position) = pose.get(&row.joint.name) {
                row.value = position;
            }
        }
    }

    /// Renders the panel.
    pub fn ui(&mut self, ui: &mut egui::Ui, commander: &Arc<dyn HandCommander>, runtime: &Handle) {
        ui.horizontal(|ui| {
            if ui.button("Refresh").clicked() {
                match runtime.block_on(commander.current_pose()) {
                    Ok(pose) => {
                        self.refresh(&pose);
                        self.status = None;
                    }
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
            ui.checkbox(&mut self.send_on_release, "Send on release only");
        });
        ui.separator();

        let mut targets = JointSnapshot::new();
        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal(|ui| {
                for row in &mut self.rows {
                    ui.vertical(|ui| {
                        ui.set_width(90.0);
                        ui.label(&row.joint.name);
                        let limits = row.joint.limits;
                        let response = ui.add(
                            egui::Slider::new(&mut row.value, limits.lower..=limits.upper)
                                .vertical()
                                .show_value(true),
                        );
                        let send_now = if self.send_on_release {
                            response.drag_stopped()
                        } else {
                            response.changed()
                        };
                        if send_now {
                            targets.insert(row.joint.name.clone(), row.value);
                        }
                        ui.checkbox(&mut row.selected, "sel.");
                    });
                }

                // Selection slider drives every marked joint together.
                ui.vertical(|ui| {
                    ui.set_width(90.0);
                    ui.label("Change sel.");
                    let response = ui.add(
                        egui::Slider::new(&mut self.selection_pct, 0.0..=100.0)
                            .vertical()
                            .show_value(true),
                    );
                    let send_now = if self.send_on_release {
                        response.drag_stopped()
                    } else {
                        response.changed()
                    };
                    if send_now {
                        for row in &mut self.rows {
                            if row.selected {
                                row.value =
                                    row.joint.limits.position_at_percentage(self.selection_pct);
                                targets.insert(row.joint.name.clone(), row.value);
                            }
                        }
                    }
                });
            });
        });

        if !targets.is_empty() {
            if let Err(e) = runtime.block_on(commander.send_joint_targets(&targets)) {
                error!(error = %e, "slider dispatch failed");
                self.status = Some(e.to_string());
            } else {
                self.status = None;
            }
        }

        if let Some(message) = &self.status {
            ui.separator();
            ui.colored_label(egui::Color32::YELLOW, message);
        }
    }
}
