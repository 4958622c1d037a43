//! The eframe/egui implementation for the console.
//!
//! Dashboards live in dockable tabs. Telemetry arrives on a broadcast
//! receiver and is drained into the rolling trace groups once per frame,
//! before any tab renders.

pub mod grasp_panel;
pub mod plots;
pub mod slider_panel;

use crate::config::Settings;
use crate::control::joints::Joint;
use crate::control::GraspController;
use crate::core::FINGERS;
use crate::hardware::HandCommander;
use crate::telemetry::{TelemetryEvent, TelemetrySource};
use egui_dock::{DockArea, DockState, Style, TabViewer};
use grasp_panel::GraspPanel;
use plots::Dashboard;
use slider_panel::SliderPanel;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::broadcast;

/// A dockable console tab.
pub enum Tab {
    /// Position/velocity/effort for one joint.
    JointStates {
        /// The joint being plotted.
        joint: String,
    },
    /// Control-loop traces for one joint.
    Pid {
        /// The joint being plotted.
        joint: String,
    },
    /// Actuator diagnostics for one motor.
    MotorStats {
        /// The motor being plotted.
        motor: String,
    },
    /// Palm auxiliary sensors.
    PalmExtras,
    /// Fingertip tactile traces.
    Tactile {
        /// Index into [`FINGERS`].
        finger: usize,
    },
    /// The grasp blend teleoperation panel.
    GraspController,
    /// The per-joint slider panel.
    JointSliders,
}

/// The console application.
pub struct ConsoleApp {
    runtime: Handle,
    commander: Arc<dyn HandCommander>,
    telemetry_rx: broadcast::Receiver<TelemetryEvent>,
    data: Dashboard,
    dock_state: DockState<Tab>,
    grasp_panel: GraspPanel,
    slider_panel: SliderPanel,
    selected_joint: String,
}

impl ConsoleApp {
    /// Wires the app to a hand driver.
    pub fn new(
        settings: &Settings,
        runtime: Handle,
        commander: Arc<dyn HandCommander>,
        telemetry: &dyn TelemetrySource,
        controller: GraspController,
        joints: Vec<Joint>,
    ) -> Self {
        let joint_names: Vec<String> = joints.iter().map(|j| j.name.clone()).collect();
        let data = Dashboard::new(settings, &joint_names);

        let initial_pose = runtime
            .block_on(commander.current_pose())
            .unwrap_or_default();
        let grasp_panel = GraspPanel::new(controller, &runtime);
        let slider_panel = SliderPanel::new(joints, &initial_pose);

        let mut dock_state = DockState::new(vec![Tab::GraspController, Tab::JointSliders]);
        let surface = dock_state.main_surface_mut();
        let first_joint = joint_names.first().cloned().unwrap_or_default();
        let [_, right] = surface.split_right(
            egui_dock::NodeIndex::root(),
            0.5,
            vec![
                Tab::JointStates {
                    joint: first_joint.clone(),
                },
                Tab::Pid {
                    joint: first_joint.clone(),
                },
                Tab::MotorStats {
                    motor: first_joint.clone(),
                },
            ],
        );
        surface.split_below(
            right,
            0.5,
            vec![Tab::Tactile { finger: 0 }, Tab::PalmExtras],
        );

        Self {
            runtime,
            commander,
            telemetry_rx: telemetry.subscribe(),
            data,
            dock_state,
            grasp_panel,
            slider_panel,
            selected_joint: first_joint,
        }
    }

    /// Pulls telemetry off the channel and rolls it into the windows.
    fn update_data(&mut self) {
        while let Ok(event) = self.telemetry_rx.try_recv() {
            self.data.ingest(event);
        }
        self.data.drain();
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_data();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Hand Console");
                ui.separator();

                egui::ComboBox::from_label("Joint")
                    .selected_text(self.selected_joint.clone())
                    .show_ui(ui, |ui| {
                        for joint in self.data.joint_states.keys() {
                            ui.selectable_value(
                                &mut self.selected_joint,
                                joint.clone(),
                                joint.clone(),
                            );
                        }
                    });
                if ui.button("Add Joint Plot").clicked() {
                    self.dock_state.push_to_focused_leaf(Tab::JointStates {
                        joint: self.selected_joint.clone(),
                    });
                }
                if ui.button("Add PID Plot").clicked() {
                    self.dock_state.push_to_focused_leaf(Tab::Pid {
                        joint: self.selected_joint.clone(),
                    });
                }
                if ui.button("Add Motor Plot").clicked() {
                    self.dock_state.push_to_focused_leaf(Tab::MotorStats {
                        motor: self.selected_joint.clone(),
                    });
                }
            });
        });

        let mut viewer = ConsoleTabViewer {
            runtime: &self.runtime,
            commander: &self.commander,
            data: &mut self.data,
            grasp_panel: &mut self.grasp_panel,
            slider_panel: &mut self.slider_panel,
        };
        egui::CentralPanel::default().show(ctx, |ui| {
            DockArea::new(&mut self.dock_state)
                .style(Style::from_egui(ctx.style().as_ref()))
                .show_inside(ui, &mut viewer);
        });

        // Telemetry keeps flowing whether or not the mouse moves.
        ctx.request_repaint();
    }
}

struct ConsoleTabViewer<'a> {
    runtime: &'a Handle,
    commander: &'a Arc<dyn HandCommander>,
    data: &'a mut Dashboard,
    grasp_panel: &'a mut GraspPanel,
    slider_panel: &'a mut SliderPanel,
}

impl TabViewer for ConsoleTabViewer<'_> {
    type Tab = Tab;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        match tab {
            Tab::JointStates { joint } => format!("{joint} state").into(),
            Tab::Pid { joint } => format!("{joint} PID").into(),
            Tab::MotorStats { motor } => format!("{motor} motor").into(),
            Tab::PalmExtras => "Palm extras".into(),
            Tab::Tactile { finger } => {
                format!("Tactile {}", FINGERS.get(*finger).unwrap_or(&"?")).into()
            }
            Tab::GraspController => "Grasp controller".into(),
            Tab::JointSliders => "Joint sliders".into(),
        }
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Self::Tab) {
        match tab {
            Tab::JointStates { joint } => {
                joint_combo(ui, joint, self.data.joint_states.keys());
                if let Some(group) = self.data.joint_states.get_mut(joint) {
                    plots::trace_group_ui(ui, &format!("joint_states_{joint}"), group);
                }
            }
            Tab::Pid { joint } => {
                joint_combo(ui, joint, self.data.pid.keys());
                if let Some(group) = self.data.pid.get_mut(joint) {
                    plots::trace_group_ui(ui, &format!("pid_{joint}"), group);
                }
            }
            Tab::MotorStats { motor } => {
                joint_combo(ui, motor, self.data.motor_stats.keys());
                if let Some(group) = self.data.motor_stats.get_mut(motor) {
                    plots::trace_group_ui(ui, &format!("motor_{motor}"), group);
                }
            }
            Tab::PalmExtras => {
                plots::trace_group_ui(ui, "palm_extras", &mut self.data.palm_extras);
            }
            Tab::Tactile { finger } => {
                egui::ComboBox::from_label("Finger")
                    .selected_text(*FINGERS.get(*finger).unwrap_or(&"?"))
                    .show_ui(ui, |ui| {
                        for (index, name) in FINGERS.iter().enumerate() {
                            ui.selectable_value(finger, index, *name);
                        }
                    });
                if let Some(group) = self.data.tactile.get_mut(*finger) {
                    plots::trace_group_ui(ui, &format!("tactile_{finger}"), group);
                }
            }
            Tab::GraspController => self.grasp_panel.ui(ui, self.runtime),
            Tab::JointSliders => self.slider_panel.ui(ui, self.commander, self.runtime),
        }
    }
}

fn joint_combo<'k>(
    ui: &mut egui::Ui,
    selection: &mut String,
    joints: impl Iterator<Item = &'k String>,
) {
    egui::ComboBox::from_label("Joint")
        .selected_text(selection.clone())
        .show_ui(ui, |ui| {
            for joint in joints {
                ui.selectable_value(selection, joint.clone(), joint.clone());
            }
        });
}
