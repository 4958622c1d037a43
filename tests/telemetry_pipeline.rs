//! Telemetry source -> subscription -> dashboard trace fill.

use hand_console::config::Settings;
use hand_console::gui::plots::Dashboard;
use hand_console::hardware::mock::MockHand;
use hand_console::telemetry::{TactileSample, TelemetryEvent, TelemetrySource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

#[tokio::test]
async fn publisher_feeds_every_dashboard_family() {
    let joints = vec!["rh_FFJ3".to_owned(), "rh_THJ4".to_owned()];
    let hand = Arc::new(MockHand::new(joints.clone(), 100.0, false));
    let mut rx = hand.subscribe();
    let publisher = hand.clone().start();

    let mut dashboard = Dashboard::new(&Settings::default(), &joints);
    let mut received = 0usize;
    while received < 50 {
        match tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("telemetry stalled")
        {
            Ok(event) => {
                dashboard.ingest(event);
                received += 1;
            }
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => panic!("telemetry channel closed"),
        }
    }
    publisher.abort();
    dashboard.drain();

    let motor = &dashboard.motor_stats["rh_FFJ3"];
    // Voltage rides around 24 V in the simulation.
    let voltage = motor.traces()[4].buffer.latest();
    assert!((23.0..25.0).contains(&voltage), "voltage was {voltage}");

    let pst = &dashboard.tactile[0];
    let pressure = pst.traces()[0].buffer.latest();
    assert!(pressure > 250.0, "pressure was {pressure}");

    assert!(dashboard.joint_states.contains_key("rh_THJ4"));
    assert!(dashboard.pid.contains_key("rh_FFJ3"));
}

#[tokio::test]
async fn late_subscribers_only_see_new_events() {
    let hand = Arc::new(MockHand::new(vec!["rh_FFJ3".to_owned()], 100.0, true));
    let publisher = hand.clone().start();

    // Subscribe after the publisher has been running for a while.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let mut rx = hand.subscribe();

    let mut saw_biotac = false;
    for _ in 0..20 {
        match tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("telemetry stalled")
        {
            Ok(TelemetryEvent::Tactile(TactileSample::Biotac(sample))) => {
                assert!(sample.tactiles[0].pdc > 2000.0);
                saw_biotac = true;
            }
            Ok(_) => {}
            Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => panic!("telemetry channel closed"),
        }
    }
    publisher.abort();
    assert!(saw_biotac);
}
