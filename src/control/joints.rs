//! Joint and controller model backing the slider panel.
//!
//! A slider exists per running joint controller whose type we know how to
//! categorize. Limits come from a robot description file; coupled distal
//! joints (the `J0` pair) report the summed range of their `J1` and `J2`
//! segments, matching how the firmware drives them as one tendon.

use crate::error::{HandError, HandResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// What quantity a joint controller commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerCategory {
    /// Commands joint position.
    Position,
    /// Commands joint velocity.
    Velocity,
    /// Commands joint effort.
    Effort,
}

/// Controller type id -> category table. Types absent from this table are
/// not supported by the slider panel.
const CONTROLLER_CATEGORIES: &[(&str, ControllerCategory)] = &[
    ("hand_controllers/JointPositionController", ControllerCategory::Position),
    ("hand_controllers/EffortJointController", ControllerCategory::Effort),
    ("hand_controllers/JointVelocityController", ControllerCategory::Velocity),
    (
        "hand_controllers/MixedPositionVelocityJointController",
        ControllerCategory::Position,
    ),
    (
        "hand_controllers/MuscleJointPositionController",
        ControllerCategory::Position,
    ),
];

/// Looks up the category for a controller type id.
pub fn category_for(type_id: &str) -> HandResult<ControllerCategory> {
    CONTROLLER_CATEGORIES
        .iter()
        .find(|(id, _)| *id == type_id)
        .map(|(_, category)| *category)
        .ok_or_else(|| HandError::ControllerNotSupported(type_id.to_owned()))
}

/// A running controller as reported by the controller manager.
#[derive(Clone, Debug, Deserialize)]
pub struct ControllerInfo {
    /// Controller instance name.
    pub name: String,
    /// Controller type id (see [`category_for`]).
    pub type_id: String,
    /// The joint this controller drives.
    pub joint: String,
}

/// A controller bound to a slider.
#[derive(Clone, Debug)]
pub struct JointController {
    /// Controller instance name.
    pub name: String,
    /// Controller type id.
    pub type_id: String,
    /// Commanded quantity.
    pub category: ControllerCategory,
}

/// Position limits and maximum velocity for one joint.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct JointLimits {
    /// Lower position limit in radians.
    pub lower: f64,
    /// Upper position limit in radians.
    pub upper: f64,
    /// Maximum velocity in radians per second.
    pub velocity: f64,
}

impl JointLimits {
    /// Maps a selection percentage in [0, 100] onto the joint range.
    pub fn position_at_percentage(&self, percentage: f64) -> f64 {
        self.lower + (self.upper - self.lower) * percentage / 100.0
    }
}

/// One slider's worth of model: a joint, its limits and its controller.
#[derive(Clone, Debug)]
pub struct Joint {
    /// Joint name.
    pub name: String,
    /// Position limits and max velocity.
    pub limits: JointLimits,
    /// The controller driving this joint.
    pub controller: JointController,
}

/// Robot description: per-joint limits plus the controllers that drive
/// them. The original system queried a controller manager and a URDF
/// separately; both collapse into one TOML document here.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RobotDescription {
    joints: BTreeMap<String, JointLimits>,
    #[serde(default)]
    controllers: Vec<ControllerInfo>,
}

impl RobotDescription {
    /// Parses a description from TOML text.
    pub fn from_toml_str(text: &str) -> HandResult<Self> {
        toml::from_str(text)
            .map_err(|e| HandError::Configuration(format!("robot description: {e}")))
    }

    /// Loads a description from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> HandResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Joint names present in the description, sorted.
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.joints.keys().map(String::as_str)
    }

    /// The controllers declared by the description, in declaration order.
    pub fn controllers(&self) -> &[ControllerInfo] {
        &self.controllers
    }

    /// Limits for `joint`.
    ///
    /// Falls back to the upper-cased name (some descriptions carry
    /// upper-case joint names). Joints named with `J0` are the coupled
    /// distal pair and report the summed `J1` + `J2` limits.
    pub fn limits(&self, joint: &str) -> HandResult<JointLimits> {
        if joint.contains("J0") {
            let first = self.limits_direct(&joint.replace("J0", "J1"))?;
            let second = self.limits_direct(&joint.replace("J0", "J2"))?;
            return Ok(JointLimits {
                lower: first.lower + second.lower,
                upper: first.upper + second.upper,
                velocity: first.velocity + second.velocity,
            });
        }
        self.limits_direct(joint)
    }

    fn limits_direct(&self, joint: &str) -> HandResult<JointLimits> {
        self.joints
            .get(joint)
            .or_else(|| self.joints.get(&joint.to_uppercase()))
            .copied()
            .ok_or_else(|| HandError::JointLimitsNotFound(joint.to_owned()))
    }
}

/// Builds the slider model from the running controllers.
///
/// Controllers with unsupported types or missing limits are skipped with a
/// warning; joints whose name does not contain `name_filter` are skipped
/// silently. The result keeps the input controller order.
pub fn build_joints(
    description: &RobotDescription,
    controllers: &[ControllerInfo],
    name_filter: &str,
) -> Vec<Joint> {
    let mut joints = Vec::new();
    for info in controllers {
        let category = match category_for(&info.type_id) {
            Ok(category) => category,
            Err(_) => {
                warn!(
                    controller = %info.name,
                    type_id = %info.type_id,
                    "controller type not supported, skipping"
                );
                continue;
            }
        };
        if !info.joint.contains(name_filter) {
            continue;
        }
        let limits = match description.limits(&info.joint) {
            Ok(limits) => limits,
            Err(e) => {
                warn!(joint = %info.joint, error = %e, "no limits for joint, skipping");
                continue;
            }
        };
        joints.push(Joint {
            name: info.joint.clone(),
            limits,
            controller: JointController {
                name: info.name.clone(),
                type_id: info.type_id.clone(),
                category,
            },
        });
    }
    joints
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = r#"
        [joints.rh_FFJ1]
        lower = 0.0
        upper = 1.5708
        velocity = 2.0

        [joints.rh_FFJ2]
        lower = 0.0
        upper = 1.5708
        velocity = 2.0

        [joints.rh_FFJ3]
        lower = -0.2618
        upper = 1.5708
        velocity = 2.0

        [joints.RH_WRJ1]
        lower = -0.698
        upper = 0.489
        velocity = 1.0
    "#;

    fn controllers() -> Vec<ControllerInfo> {
        vec![
            ControllerInfo {
                name: "sh_rh_ffj3_position_controller".into(),
                type_id: "hand_controllers/JointPositionController".into(),
                joint: "rh_FFJ3".into(),
            },
            ControllerInfo {
                name: "sh_rh_ffj0_position_controller".into(),
                type_id: "hand_controllers/MixedPositionVelocityJointController".into(),
                joint: "rh_FFJ0".into(),
            },
            ControllerInfo {
                name: "sh_rh_wrj1_unknown_controller".into(),
                type_id: "hand_controllers/SomethingElse".into(),
                joint: "rh_WRJ1".into(),
            },
        ]
    }

    #[test]
    fn category_table_covers_the_known_types() {
        assert_eq!(
            category_for("hand_controllers/JointVelocityController").unwrap(),
            ControllerCategory::Velocity
        );
        assert_eq!(
            category_for("hand_controllers/MuscleJointPositionController").unwrap(),
            ControllerCategory::Position
        );
        assert!(matches!(
            category_for("hand_controllers/SomethingElse"),
            Err(HandError::ControllerNotSupported(_))
        ));
    }

    #[test]
    fn coupled_joint_sums_both_segments() {
        let description = RobotDescription::from_toml_str(DESCRIPTION).unwrap();
        let limits = description.limits("rh_FFJ0").unwrap();
        assert!((limits.upper - 2.0 * 1.5708).abs() < 1e-9);
        assert!((limits.velocity - 4.0).abs() < 1e-9);
    }

    #[test]
    fn lookup_falls_back_to_uppercase() {
        let description = RobotDescription::from_toml_str(DESCRIPTION).unwrap();
        // Only the upper-cased entry exists; the lower-case name resolves
        // through the fallback.
        let limits = description.limits("rh_wrj1").unwrap();
        assert!((limits.upper - 0.489).abs() < 1e-9);
        assert!(description.limits("rh_wrj2").is_err());
    }

    #[test]
    fn build_joints_skips_unsupported_and_keeps_order() {
        let description = RobotDescription::from_toml_str(DESCRIPTION).unwrap();
        let joints = build_joints(&description, &controllers(), "");
        let names: Vec<&str> = joints.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["rh_FFJ3", "rh_FFJ0"]);
    }

    #[test]
    fn build_joints_applies_the_name_filter() {
        let description = RobotDescription::from_toml_str(DESCRIPTION).unwrap();
        let joints = build_joints(&description, &controllers(), "FFJ3");
        assert_eq!(joints.len(), 1);
        assert_eq!(joints[0].name, "rh_FFJ3");
    }

    #[test]
    fn percentage_maps_onto_the_joint_range() {
        let limits = JointLimits {
            lower: -1.0,
            upper: 3.0,
            velocity: 2.0,
        };
        assert_eq!(limits.position_at_percentage(0.0), -1.0);
        assert_eq!(limits.position_at_percentage(100.0), 3.0);
        assert_eq!(limits.position_at_percentage(50.0), 1.0);
    }
}
