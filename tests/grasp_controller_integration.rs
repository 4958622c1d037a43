//! End-to-end test of the teleoperation path: grasp selection, reference
//! capture, slider blending and dispatch through the mock hand.

use hand_console::control::GraspController;
use hand_console::core::{Grasp, JointSnapshot};
use hand_console::error::HandError;
use hand_console::hardware::mock::MockHand;
use hand_console::hardware::HandCommander;
use hand_console::warehouse::GraspWarehouse;
use std::sync::Arc;

const JOINTS: [&str; 3] = ["rh_FFJ3", "rh_THJ4", "rh_WRJ1"];

fn snapshot(angles: [f64; 3]) -> JointSnapshot {
    JOINTS.iter().copied().zip(angles).collect()
}

fn controller(dir: &tempfile::TempDir) -> (Arc<MockHand>, GraspController) {
    let mut warehouse = GraspWarehouse::open(dir.path().join("grasps.json")).unwrap();
    // Replace the built-ins with endpoints over the test joint set.
    for name in warehouse.list() {
        warehouse.remove(&name).unwrap();
    }
    warehouse
        .save(Grasp::new("open", snapshot([0.0, 0.0, 0.0])), false)
        .unwrap();
    warehouse
        .save(Grasp::new("fist", snapshot([1.5, 1.2, 0.4])), false)
        .unwrap();

    let hand = Arc::new(MockHand::new(
        JOINTS.iter().map(|j| (*j).to_owned()).collect(),
        50.0,
        false,
    ));
    let commander: Arc<dyn HandCommander> = hand.clone();
    (hand, GraspController::new(commander, warehouse))
}

#[tokio::test]
async fn slide_without_reference_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_hand, mut controller) = controller(&dir);

    match controller.slide(50).await {
        Err(HandError::ReferenceNotSet) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn full_slide_reaches_the_to_grasp() {
    let dir = tempfile::tempdir().unwrap();
    let (_hand, mut controller) = controller(&dir);

    controller.select_from("open").unwrap();
    controller.select_to("fist").unwrap();
    controller.capture_current_pose().await.unwrap();

    let targets = controller.slide(100).await.unwrap();
    assert_eq!(targets, snapshot([1.5, 1.2, 0.4]));
    // The dispatched target became the new reference.
    assert_eq!(controller.last_target(), &targets);
}

#[tokio::test]
async fn negative_slide_blends_toward_the_from_grasp() {
    let dir = tempfile::tempdir().unwrap();
    let (_hand, mut controller) = controller(&dir);

    controller.select_from("fist").unwrap();
    controller.select_to("open").unwrap();
    controller.capture_current_pose().await.unwrap();

    // Reference is the zero pose, so -100 lands on the `fist` endpoint and
    // -50 halfway between `fist` and the reference.
    let targets = controller.slide(-100).await.unwrap();
    assert_eq!(targets, snapshot([1.5, 1.2, 0.4]));

    controller.capture_current_pose().await.unwrap();
    let _ = controller.slide(0).await.unwrap();
}

#[tokio::test]
async fn slid_targets_drive_the_hand() {
    let dir = tempfile::tempdir().unwrap();
    let (hand, mut controller) = controller(&dir);

    controller.select_from("open").unwrap();
    controller.select_to("fist").unwrap();
    controller.capture_current_pose().await.unwrap();
    controller.slide(100).await.unwrap();

    // Let the simulated hand slew toward the commanded pose.
    let publisher = hand.clone().start();
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    publisher.abort();

    let pose = hand.current_pose().await.unwrap();
    assert!(pose.get("rh_FFJ3").unwrap() > 0.1);
}

#[tokio::test]
async fn move_to_named_resets_the_reference() {
    let dir = tempfile::tempdir().unwrap();
    let (_hand, mut controller) = controller(&dir);

    controller.select_from("open").unwrap();
    controller.select_to("fist").unwrap();
    controller.capture_current_pose().await.unwrap();

    controller.move_to_named("fist").await.unwrap();
    assert_eq!(controller.last_target(), &snapshot([1.5, 1.2, 0.4]));

    // Slider 0 now means "stay at fist".
    let targets = controller.slide(0).await.unwrap();
    assert_eq!(targets, snapshot([1.5, 1.2, 0.4]));
}

#[tokio::test]
async fn save_grasp_with_subset_and_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let (_hand, mut controller) = controller(&dir);

    // Empty subset saves the whole pose.
    controller.save_grasp("rest", &[], false).await.unwrap();
    let names = controller.grasp_names();
    assert!(names.contains(&"rest".to_owned()));

    // A subset saves only the named joints.
    controller
        .save_grasp("wrist_only", &["rh_WRJ1".to_owned()], false)
        .await
        .unwrap();
    controller.select_from("wrist_only").unwrap();
    assert_eq!(controller.from_grasp().unwrap().joints.len(), 1);

    // Saving the same name again needs the overwrite flag.
    match controller.save_grasp("rest", &[], false).await {
        Err(HandError::GraspExists(name)) => assert_eq!(name, "rest"),
        other => panic!("unexpected result: {:?}", other),
    }
    controller.save_grasp("rest", &[], true).await.unwrap();
}
