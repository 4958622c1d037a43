//! Telemetry samples and the in-process subscription bus.
//!
//! The original middleware topics are re-architected as an explicit
//! subscription interface: a producer (the hand driver) publishes
//! [`TelemetryEvent`]s on a `tokio::sync::broadcast` channel and consumers
//! subscribe through [`TelemetrySource`]. The GUI drains its receiver once
//! per frame; a slow consumer only loses samples, never blocks the
//! producer.

pub mod trace;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Channel depth for telemetry fan-out. Samples beyond this lag are
/// dropped for that subscriber.
pub const TELEMETRY_CHANNEL_CAPACITY: usize = 256;

/// State of one joint at one instant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JointState {
    /// Joint name.
    pub name: String,
    /// Position in radians.
    pub position: f64,
    /// Velocity in radians per second.
    pub velocity: f64,
    /// Applied effort in newton-metres.
    pub effort: f64,
}

/// Position/velocity/effort for every joint, published as one sample.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JointStatesSample {
    /// Capture time.
    pub timestamp: DateTime<Utc>,
    /// Per-joint state.
    pub joints: Vec<JointState>,
}

/// One position-control loop update.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PidStateSample {
    /// Capture time.
    pub timestamp: DateTime<Utc>,
    /// The controlled joint.
    pub joint: String,
    /// Commanded set point.
    pub set_point: f64,
    /// Measured process value.
    pub process_value: f64,
    /// Derivative of the process value.
    pub process_value_dot: f64,
    /// Loop error.
    pub error: f64,
    /// Raw controller output.
    pub command: f64,
}

/// Motor diagnostics for one actuator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotorStatSample {
    /// Capture time.
    pub timestamp: DateTime<Utc>,
    /// Actuator name.
    pub motor: String,
    /// Left strain gauge reading.
    pub strain_gauge_left: f64,
    /// Right strain gauge reading.
    pub strain_gauge_right: f64,
    /// Measured PWM duty.
    pub measured_pwm: f64,
    /// Measured current in amperes.
    pub measured_current: f64,
    /// Measured voltage in volts.
    pub measured_voltage: f64,
    /// Measured effort.
    pub measured_effort: f64,
    /// Motor temperature in degrees Celsius.
    pub temperature: f64,
    /// Unfiltered encoder position.
    pub unfiltered_position: f64,
    /// Unfiltered force reading.
    pub unfiltered_force: f64,
    /// Last commanded effort.
    pub last_commanded_effort: f64,
    /// Encoder position.
    pub encoder_position: f64,
}

/// Palm-mounted auxiliary sensors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PalmExtrasSample {
    /// Capture time.
    pub timestamp: DateTime<Utc>,
    /// Accelerometer x/y/z.
    pub accel: [f64; 3],
    /// Gyroscope x/y/z.
    pub gyro: [f64; 3],
    /// Auxiliary analog inputs.
    pub analog: [f64; 4],
}

/// One pressure/temperature tactile sensor array (five fingertips).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PstSample {
    /// Capture time.
    pub timestamp: DateTime<Utc>,
    /// Pressure per fingertip, in [`crate::core::FINGERS`] order.
    pub pressure: [f64; 5],
    /// Temperature per fingertip, in [`crate::core::FINGERS`] order.
    pub temperature: [f64; 5],
}

/// Readings of one impedance-sensing fingertip.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct BiotacReading {
    /// Dynamic pressure, first sample.
    pub pac0: f64,
    /// Dynamic pressure, second sample.
    pub pac1: f64,
    /// Static pressure.
    pub pdc: f64,
    /// Dynamic temperature.
    pub tac: f64,
    /// Static temperature.
    pub tdc: f64,
}

/// Readings for all five impedance-sensing fingertips.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiotacSample {
    /// Capture time.
    pub timestamp: DateTime<Utc>,
    /// Per-fingertip readings, in [`crate::core::FINGERS`] order.
    pub tactiles: [BiotacReading; 5],
}

/// Tactile telemetry, whichever sensor family the hand carries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TactileSample {
    /// Pressure/temperature arrays.
    Pst(PstSample),
    /// Impedance-sensing fingertips.
    Biotac(BiotacSample),
}

/// A telemetry sample from the hand.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TelemetryEvent {
    /// Joint position/velocity/effort for all joints.
    JointStates(JointStatesSample),
    /// One control-loop update.
    Pid(PidStateSample),
    /// Motor diagnostics for one actuator.
    MotorStat(MotorStatSample),
    /// Palm auxiliary sensors.
    PalmExtras(PalmExtrasSample),
    /// Fingertip tactile sensors.
    Tactile(TactileSample),
}

/// Anything that publishes telemetry.
pub trait TelemetrySource: Send + Sync {
    /// Subscribes to the event stream. Each receiver sees every event
    /// published after the call, subject to channel lag.
    fn subscribe(&self) -> broadcast::Receiver<TelemetryEvent>;
}
