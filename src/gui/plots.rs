//! Trace storage behind the dashboard tabs, and the shared plot renderer.

use crate::config::Settings;
use crate::core::FINGERS;
use crate::telemetry::trace::TraceGroup;
use crate::telemetry::{TactileSample, TelemetryEvent};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use std::collections::BTreeMap;

const JOINT_STATE_TRACES: [&str; 3] = ["position", "velocity", "effort"];
const PID_TRACES: [&str; 5] = [
    "set_point",
    "process_value",
    "process_value_dot",
    "error",
    "command",
];
const MOTOR_TRACES: [&str; 11] = [
    "strain_gauge_left",
    "strain_gauge_right",
    "measured_pwm",
    "measured_current",
    "measured_voltage",
    "measured_effort",
    "temperature",
    "unfiltered_position",
    "unfiltered_force",
    "last_commanded_effort",
    "encoder_position",
];
const PALM_TRACES: [&str; 10] = [
    "accel_x", "accel_y", "accel_z", "gyro_x", "gyro_y", "gyro_z", "adc_0", "adc_1", "adc_2",
    "adc_3",
];
const PST_TRACES: [&str; 2] = ["pressure", "temperature"];
const BIOTAC_TRACES: [&str; 5] = ["pac0", "pac1", "pdc", "tac", "tdc"];

/// All rolling trace groups fed by the telemetry stream.
pub struct Dashboard {
    window: usize,
    effort_scale: f64,
    pid_output_scale: f64,
    biotac: bool,
    /// Per-joint position/velocity/effort.
    pub joint_states: BTreeMap<String, TraceGroup>,
    /// Per-joint control-loop traces.
    pub pid: BTreeMap<String, TraceGroup>,
    /// Per-actuator diagnostics.
    pub motor_stats: BTreeMap<String, TraceGroup>,
    /// Palm auxiliary sensors.
    pub palm_extras: TraceGroup,
    /// One group per finger, [`FINGERS`] order.
    pub tactile: Vec<TraceGroup>,
}

impl Dashboard {
    /// Builds empty trace groups for the given joints.
    pub fn new(settings: &Settings, joints: &[String]) -> Self {
        let window = settings.telemetry.window;
        let biotac = settings.hand.biotac;
        let tactile_traces: &[&str] = if biotac { &BIOTAC_TRACES } else { &PST_TRACES };
        Self {
            window,
            effort_scale: settings.telemetry.effort_scale,
            pid_output_scale: settings.telemetry.pid_output_scale,
            biotac,
            joint_states: joints
                .iter()
                .map(|j| (j.clone(), TraceGroup::new(&JOINT_STATE_TRACES, window, 0.0)))
                .collect(),
            pid: joints
                .iter()
                .map(|j| (j.clone(), TraceGroup::new(&PID_TRACES, window, 0.0)))
                .collect(),
            motor_stats: joints
                .iter()
                .map(|j| (j.clone(), TraceGroup::new(&MOTOR_TRACES, window, 0.0)))
                .collect(),
            palm_extras: TraceGroup::new(&PALM_TRACES, window, 0.0),
            tactile: FINGERS
                .iter()
                .map(|_| TraceGroup::new(tactile_traces, window, 0.0))
                .collect(),
        }
    }

    /// Routes one telemetry event into its trace group(s).
    pub fn ingest(&mut self, event: TelemetryEvent) {
        match event {
            TelemetryEvent::JointStates(sample) => {
                for joint in sample.joints {
                    let group = self
                        .joint_states
                        .entry(joint.name.clone())
                        .or_insert_with(|| TraceGroup::new(&JOINT_STATE_TRACES, self.window, 0.0));
                    group.push(0, joint.position);
                    group.push(1, joint.velocity);
                    group.push(2, joint.effort * self.effort_scale);
                }
            }
            TelemetryEvent::Pid(sample) => {
                let group = self
                    .pid
                    .entry(sample.joint.clone())
                    .or_insert_with(|| TraceGroup::new(&PID_TRACES, self.window, 0.0));
                group.push(0, sample.set_point);
                group.push(1, sample.process_value);
                group.push(2, sample.process_value_dot);
                group.push(3, sample.error);
                group.push(4, sample.command * self.pid_output_scale);
            }
            TelemetryEvent::MotorStat(sample) => {
                let group = self
                    .motor_stats
                    .entry(sample.motor.clone())
                    .or_insert_with(|| TraceGroup::new(&MOTOR_TRACES, self.window, 0.0));
                group.push(0, sample.strain_gauge_left);
                group.push(1, sample.strain_gauge_right);
                group.push(2, sample.measured_pwm);
                group.push(3, sample.measured_current);
                group.push(4, sample.measured_voltage);
                group.push(5, sample.measured_effort);
                group.push(6, sample.temperature);
                group.push(7, sample.unfiltered_position);
                group.push(8, sample.unfiltered_force);
                group.push(9, sample.last_commanded_effort);
                group.push(10, sample.encoder_position);
            }
            TelemetryEvent::PalmExtras(sample) => {
                for (index, value) in sample
                    .accel
                    .iter()
                    .chain(sample.gyro.iter())
                    .chain(sample.analog.iter())
                    .enumerate()
                {
                    self.palm_extras.push(index, *value);
                }
            }
            TelemetryEvent::Tactile(TactileSample::Pst(sample)) => {
                if !self.biotac {
                    for (finger, group) in self.tactile.iter_mut().enumerate() {
                        group.push(0, sample.pressure[finger]);
                        group.push(1, sample.temperature[finger]);
                    }
                }
            }
            TelemetryEvent::Tactile(TactileSample::Biotac(sample)) => {
                if self.biotac {
                    for (finger, group) in self.tactile.iter_mut().enumerate() {
                        let reading = &sample.tactiles[finger];
                        group.push(0, reading.pac0);
                        group.push(1, reading.pac1);
                        group.push(2, reading.pdc);
                        group.push(3, reading.tac);
                        group.push(4, reading.tdc);
                    }
                }
            }
        }
    }

    /// Rolls all pending samples into the windows. Call once per frame.
    pub fn drain(&mut self) {
        for group in self.joint_states.values_mut() {
            group.drain();
        }
        for group in self.pid.values_mut() {
            group.drain();
        }
        for group in self.motor_stats.values_mut() {
            group.drain();
        }
        self.palm_extras.drain();
        for group in &mut self.tactile {
            group.drain();
        }
    }
}

/// Renders one trace group: visibility checkboxes above an animated plot.
pub fn trace_group_ui(ui: &mut egui::Ui, plot_id: &str, group: &mut TraceGroup) {
    ui.horizontal_wrapped(|ui| {
        for trace in group.traces_mut() {
            ui.checkbox(&mut trace.visible, trace.name.clone());
        }
    });

    Plot::new(plot_id.to_owned())
        .legend(Legend::default())
        .view_aspect(2.0)
        .show(ui, |plot_ui| {
            for trace in group.traces() {
                if !trace.visible {
                    continue;
                }
                let points = PlotPoints::from_iter(
                    trace
                        .buffer
                        .window()
                        .iter()
                        .enumerate()
                        .map(|(i, y)| [i as f64, *y]),
                );
                plot_ui.line(Line::new(points).name(trace.name.clone()));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{JointState, JointStatesSample, PidStateSample};

    fn dashboard() -> Dashboard {
        Dashboard::new(&Settings::default(), &["rh_FFJ3".to_owned()])
    }

    #[test]
    fn joint_states_are_scaled_and_routed() {
        let mut dash = dashboard();
        dash.ingest(TelemetryEvent::JointStates(JointStatesSample {
            timestamp: chrono::Utc::now(),
            joints: vec![JointState {
                name: "rh_FFJ3".into(),
                position: 1.0,
                velocity: 2.0,
                effort: 600.0,
            }],
        }));
        dash.drain();

        let group = &dash.joint_states["rh_FFJ3"];
        assert_eq!(group.traces()[0].buffer.latest(), 1.0);
        assert_eq!(group.traces()[1].buffer.latest(), 2.0);
        // Effort is scaled onto the radian axis: 600 * pi/600 = pi.
        assert!((group.traces()[2].buffer.latest() - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn unseen_joints_get_groups_lazily() {
        let mut dash = dashboard();
        dash.ingest(TelemetryEvent::Pid(PidStateSample {
            timestamp: chrono::Utc::now(),
            joint: "rh_THJ5".into(),
            set_point: 0.5,
            process_value: 0.25,
            process_value_dot: 0.0,
            error: 0.25,
            command: 75.0,
        }));
        dash.drain();

        let group = &dash.pid["rh_THJ5"];
        assert_eq!(group.traces()[0].buffer.latest(), 0.5);
        assert_eq!(group.traces()[3].buffer.latest(), 0.25);
        assert!((group.traces()[4].buffer.latest() - 1.0).abs() < 1e-6);
    }
}
