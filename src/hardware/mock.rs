//! Simulated hand driver.
//!
//! `MockHand` stands in for the real hand so the console runs and is
//! testable without hardware. It tracks commanded targets, slews the
//! published joint positions toward them at a bounded rate, and publishes
//! synthetic telemetry (sinusoid + noise) from a background tokio task.
//! All waiting uses `tokio::time`, never `std::thread::sleep`.

use crate::core::JointSnapshot;
use crate::error::HandResult;
use crate::hardware::HandCommander;
use crate::telemetry::{
    BiotacReading, BiotacSample, JointState, JointStatesSample, MotorStatSample, PalmExtrasSample,
    PidStateSample, PstSample, TactileSample, TelemetryEvent, TelemetrySource,
    TELEMETRY_CHANNEL_CAPACITY,
};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How fast published positions approach their targets, rad/s.
const SLEW_RATE: f64 = 2.0;

/// Simulated multi-fingered hand.
pub struct MockHand {
    joints: Vec<String>,
    targets: Arc<RwLock<JointSnapshot>>,
    positions: Arc<RwLock<JointSnapshot>>,
    event_tx: broadcast::Sender<TelemetryEvent>,
    publish_rate_hz: f64,
    biotac: bool,
}

impl MockHand {
    /// Creates a hand over `joints`, all at position zero.
    ///
    /// `biotac` selects the impedance-sensing tactile family instead of the
    /// pressure/temperature arrays.
    pub fn new(joints: Vec<String>, publish_rate_hz: f64, biotac: bool) -> Self {
        let zero: JointSnapshot = joints.iter().map(|j| (j.as_str(), 0.0)).collect();
        let (event_tx, _) = broadcast::channel(TELEMETRY_CHANNEL_CAPACITY);
        Self {
            joints,
            targets: Arc::new(RwLock::new(zero.clone())),
            positions: Arc::new(RwLock::new(zero)),
            event_tx,
            publish_rate_hz: publish_rate_hz.max(1.0),
            biotac,
        }
    }

    /// Starts the telemetry publisher. The task runs until aborted.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let hand = self;
        tokio::spawn(async move {
            let period = std::time::Duration::from_secs_f64(1.0 / hand.publish_rate_hz);
            let mut ticker = tokio::time::interval(period);
            let start = tokio::time::Instant::now();
            loop {
                ticker.tick().await;
                hand.step(start.elapsed().as_secs_f64(), period.as_secs_f64())
                    .await;
            }
        })
    }

    /// One simulation tick: slew positions toward targets, then publish a
    /// full set of telemetry samples.
    async fn step(&self, elapsed: f64, dt: f64) {
        let targets = self.targets.read().await.clone();
        let mut velocities: Vec<(String, f64)> = Vec::with_capacity(self.joints.len());

        {
            let mut positions = self.positions.write().await;
            let max_step = SLEW_RATE * dt;
            for joint in &self.joints {
                let current = positions.get(joint).unwrap_or(0.0);
                let target = targets.get(joint).unwrap_or(current);
                let step = (target - current).clamp(-max_step, max_step);
                positions.insert(joint.clone(), current + step);
                velocities.push((joint.clone(), step / dt));
            }
        }

        let positions = self.positions.read().await.clone();
        let now = chrono::Utc::now();
        let mut rng = rand::thread_rng();

        let joints: Vec<JointState> = self
            .joints
            .iter()
            .zip(&velocities)
            .map(|(joint, (_, velocity))| JointState {
                name: joint.clone(),
                position: positions.get(joint).unwrap_or(0.0) + rng.gen_range(-0.002..0.002),
                velocity: *velocity,
                effort: (elapsed + positions.get(joint).unwrap_or(0.0)).sin() * 20.0
                    + rng.gen_range(-1.0..1.0),
            })
            .collect();
        self.publish(TelemetryEvent::JointStates(JointStatesSample {
            timestamp: now,
            joints,
        }));

        for joint in &self.joints {
            let set_point = targets.get(joint).unwrap_or(0.0);
            let process_value = positions.get(joint).unwrap_or(0.0);
            let error = set_point - process_value;
            self.publish(TelemetryEvent::Pid(PidStateSample {
                timestamp: now,
                joint: joint.clone(),
                set_point,
                process_value,
                process_value_dot: velocities
                    .iter()
                    .find(|(name, _)| name == joint)
                    .map(|(_, v)| *v)
                    .unwrap_or(0.0),
                error,
                command: (error * 300.0).clamp(-600.0, 600.0),
            }));
        }

        for (index, joint) in self.joints.iter().enumerate() {
            let phase = elapsed + index as f64;
            let effort = phase.sin() * 10.0;
            self.publish(TelemetryEvent::MotorStat(MotorStatSample {
                timestamp: now,
                motor: joint.clone(),
                strain_gauge_left: effort * 7.5 + rng.gen_range(-0.5..0.5),
                strain_gauge_right: -effort * 7.5 + rng.gen_range(-0.5..0.5),
                measured_pwm: (phase * 2.0).sin() * 100.0,
                measured_current: 0.05 + rng.gen_range(0.0..0.01),
                measured_voltage: 24.0 + rng.gen_range(-0.2..0.2),
                measured_effort: effort,
                temperature: 31.0 + phase.cos() + rng.gen_range(-0.1..0.1),
                unfiltered_position: positions.get(joint).unwrap_or(0.0),
                unfiltered_force: effort + rng.gen_range(-1.0..1.0),
                last_commanded_effort: effort,
                encoder_position: positions.get(joint).unwrap_or(0.0),
            }));
        }

        self.publish(TelemetryEvent::PalmExtras(PalmExtrasSample {
            timestamp: now,
            accel: [
                rng.gen_range(-0.05..0.05),
                rng.gen_range(-0.05..0.05),
                9.81 + rng.gen_range(-0.05..0.05),
            ],
            gyro: [
                rng.gen_range(-0.01..0.01),
                rng.gen_range(-0.01..0.01),
                rng.gen_range(-0.01..0.01),
            ],
            analog: [
                rng.gen_range(0.0..3.3),
                rng.gen_range(0.0..3.3),
                rng.gen_range(0.0..3.3),
                rng.gen_range(0.0..3.3),
            ],
        }));

        let tactile = if self.biotac {
            let mut tactiles = [BiotacReading::default(); 5];
            for (index, reading) in tactiles.iter_mut().enumerate() {
                let phase = elapsed * 2.0 + index as f64;
                *reading = BiotacReading {
                    pac0: 2000.0 + phase.sin() * 50.0 + rng.gen_range(-5.0..5.0),
                    pac1: 2000.0 + phase.cos() * 50.0 + rng.gen_range(-5.0..5.0),
                    pdc: 2500.0 + phase.sin() * 20.0,
                    tac: 2000.0 + rng.gen_range(-3.0..3.0),
                    tdc: 2600.0 + rng.gen_range(-3.0..3.0),
                };
            }
            TactileSample::Biotac(BiotacSample {
                timestamp: now,
                tactiles,
            })
        } else {
            let mut pressure = [0.0; 5];
            let mut temperature = [0.0; 5];
            for index in 0..5 {
                let phase = elapsed * 2.0 + index as f64;
                pressure[index] = 350.0 + phase.sin() * 40.0 + rng.gen_range(-2.0..2.0);
                temperature[index] = 28.0 + rng.gen_range(-0.2..0.2);
            }
            TactileSample::Pst(PstSample {
                timestamp: now,
                pressure,
                temperature,
            })
        };
        self.publish(TelemetryEvent::Tactile(tactile));
    }

    fn publish(&self, event: TelemetryEvent) {
        // Send only fails with no subscribers, which is fine at startup.
        let _ = self.event_tx.send(event);
    }
}

#[async_trait]
impl HandCommander for MockHand {
    fn joint_names(&self) -> Vec<String> {
        self.joints.clone()
    }

    async fn current_pose(&self) -> HandResult<JointSnapshot> {
        Ok(self.positions.read().await.clone())
    }

    async fn send_joint_targets(&self, targets: &JointSnapshot) -> HandResult<()> {
        let mut stored = self.targets.write().await;
        for (joint, angle) in targets.iter() {
            if stored.contains(joint) {
                stored.insert(joint, angle);
            } else {
                warn!(joint, "ignoring target for unknown joint");
            }
        }
        debug!(joints = targets.len(), "joint targets accepted");
        Ok(())
    }
}

impl TelemetrySource for MockHand {
    fn subscribe(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.event_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand() -> Arc<MockHand> {
        Arc::new(MockHand::new(
            vec!["rh_FFJ3".into(), "rh_THJ4".into()],
            50.0,
            false,
        ))
    }

    #[tokio::test]
    async fn pose_starts_at_zero() {
        let hand = hand();
        let pose = hand.current_pose().await.unwrap();
        assert_eq!(pose.get("rh_FFJ3"), Some(0.0));
        assert_eq!(pose.get("rh_THJ4"), Some(0.0));
    }

    #[tokio::test]
    async fn targets_slew_rather_than_jump() {
        let hand = hand();
        let targets: JointSnapshot = [("rh_FFJ3", 1.0)].into_iter().collect();
        hand.send_joint_targets(&targets).await.unwrap();

        hand.step(0.0, 0.02).await;
        let pose = hand.current_pose().await.unwrap();
        let position = pose.get("rh_FFJ3").unwrap();
        assert!(position > 0.0);
        assert!(position <= SLEW_RATE * 0.02 + 1e-9);
    }

    #[tokio::test]
    async fn unknown_joint_targets_are_ignored() {
        let hand = hand();
        let targets: JointSnapshot = [("rh_nonexistent", 1.0)].into_iter().collect();
        hand.send_joint_targets(&targets).await.unwrap();

        hand.step(0.0, 0.02).await;
        let pose = hand.current_pose().await.unwrap();
        assert!(!pose.contains("rh_nonexistent"));
    }

    #[tokio::test]
    async fn step_publishes_every_sample_family() {
        let hand = hand();
        let mut rx = hand.subscribe();
        hand.step(0.1, 0.02).await;

        let mut saw_joint_states = false;
        let mut saw_pid = false;
        let mut saw_motor = false;
        let mut saw_palm = false;
        let mut saw_tactile = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                TelemetryEvent::JointStates(_) => saw_joint_states = true,
                TelemetryEvent::Pid(_) => saw_pid = true,
                TelemetryEvent::MotorStat(_) => saw_motor = true,
                TelemetryEvent::PalmExtras(_) => saw_palm = true,
                TelemetryEvent::Tactile(TactileSample::Pst(_)) => saw_tactile = true,
                TelemetryEvent::Tactile(TactileSample::Biotac(_)) => {
                    panic!("configured for PST, got biotac")
                }
            }
        }
        assert!(saw_joint_states && saw_pid && saw_motor && saw_palm && saw_tactile);
    }
}
