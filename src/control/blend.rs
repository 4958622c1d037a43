//! Slider-driven blending between a "from" grasp, a reference pose and a
//! "to" grasp.
//!
//! The teleoperation slider runs from -100 to 100 around the *reference*
//! pose (the last commanded target). Negative values blend from the `from`
//! grasp toward the reference; non-negative values blend from the reference
//! toward the `to` grasp. Two interpolators are built around the reference
//! so neither is ever asked for a negative percentage.

use crate::control::interpolator::GraspInterpolator;
use crate::core::{Grasp, JointSnapshot};
use crate::error::{HandError, HandResult};
use crate::hardware::HandCommander;
use crate::warehouse::GraspWarehouse;
use std::sync::Arc;
use tracing::{debug, info};

/// A pair of interpolators around a fixed reference pose.
#[derive(Clone, Debug)]
pub struct GraspBlender {
    /// Blends `from` toward the reference as the slider rises from -100 to 0.
    toward_reference: GraspInterpolator,
    /// Blends the reference toward `to` as the slider rises from 0 to 100.
    from_reference: GraspInterpolator,
}

impl GraspBlender {
    /// Builds the interpolator pair `from -> reference` and `reference -> to`.
    pub fn new(from: JointSnapshot, reference: JointSnapshot, to: JointSnapshot) -> Self {
        Self {
            toward_reference: GraspInterpolator::new(from, reference.clone()),
            from_reference: GraspInterpolator::new(reference, to),
        }
    }

    /// Joint target for a slider value in [-100, 100].
    ///
    /// -100 is the `from` grasp, 0 the reference, 100 the `to` grasp.
    pub fn target_for(&self, value: i32) -> JointSnapshot {
        if value < 0 {
            self.toward_reference.interpolate(f64::from(100 + value))
        } else {
            self.from_reference.interpolate(f64::from(value))
        }
    }

    /// Mismatched joints of either interpolator, for callers that want to
    /// refuse partial commands.
    pub fn missing_joints(&self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .toward_reference
            .missing_joints()
            .iter()
            .chain(self.from_reference.missing_joints())
            .cloned()
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}

/// Teleoperation controller tying grasp selection, reference capture and
/// slider dispatch together.
///
/// Owns the grasp library and a handle to the hand commander. The commander
/// stays responsible for safety-checking the targets it is sent.
pub struct GraspController {
    commander: Arc<dyn HandCommander>,
    warehouse: GraspWarehouse,
    from: Option<Grasp>,
    to: Option<Grasp>,
    last_target: JointSnapshot,
    blender: Option<GraspBlender>,
}

impl GraspController {
    /// Creates a controller with no selections and an empty reference.
    ///
    /// Call [`capture_current_pose`](Self::capture_current_pose) (or
    /// [`slide`](Self::slide) after a selection) to seed the reference.
    pub fn new(commander: Arc<dyn HandCommander>, warehouse: GraspWarehouse) -> Self {
        Self {
            commander,
            warehouse,
            from: None,
            to: None,
            last_target: JointSnapshot::new(),
            blender: None,
        }
    }

    /// Stored grasp names, sorted.
    pub fn grasp_names(&self) -> Vec<String> {
        self.warehouse.list()
    }

    /// The joints the commander drives.
    pub fn joint_names(&self) -> Vec<String> {
        self.commander.joint_names()
    }

    /// The currently selected `from` grasp, if any.
    pub fn from_grasp(&self) -> Option<&Grasp> {
        self.from.as_ref()
    }

    /// The currently selected `to` grasp, if any.
    pub fn to_grasp(&self) -> Option<&Grasp> {
        self.to.as_ref()
    }

    /// The last commanded target (the blend reference).
    pub fn last_target(&self) -> &JointSnapshot {
        &self.last_target
    }

    /// Selects the `from` endpoint by name and rebuilds the blend.
    pub fn select_from(&mut self, name: &str) -> HandResult<()> {
        self.from = Some(self.warehouse.get(name)?);
        self.rebuild_blender()
    }

    /// Selects the `to` endpoint by name and rebuilds the blend.
    pub fn select_to(&mut self, name: &str) -> HandResult<()> {
        self.to = Some(self.warehouse.get(name)?);
        self.rebuild_blender()
    }

    /// Seeds the reference from the commander's current pose and rebuilds
    /// the blend.
    pub async fn capture_current_pose(&mut self) -> HandResult<()> {
        self.last_target = self.commander.current_pose().await?;
        self.set_reference()
    }

    /// Re-captures the blend reference from the last commanded target.
    ///
    /// Both endpoint grasps and the reference are first restricted to the
    /// joints the commander drives, then the interpolator pair is rebuilt.
    /// Requires both endpoints to be selected.
    pub fn set_reference(&mut self) -> HandResult<()> {
        let (Some(from), Some(to)) = (self.from.as_ref(), self.to.as_ref()) else {
            return Err(HandError::Configuration(
                "both a 'from' and a 'to' grasp must be selected before setting a reference".into(),
            ));
        };

        let known = self.commander.joint_names();
        let keep = |name: &str| known.iter().any(|j| j == name);

        let mut from_joints = from.joints.clone();
        from_joints.retain_joints(keep);
        let mut to_joints = to.joints.clone();
        to_joints.retain_joints(keep);
        let mut reference = self.last_target.clone();
        reference.retain_joints(keep);

        debug!(
            from = %from.name,
            to = %to.name,
            joints = reference.len(),
            "rebuilding grasp blend around reference"
        );
        self.blender = Some(GraspBlender::new(from_joints, reference, to_joints));
        Ok(())
    }

    /// Computes the blend target for a slider value and dispatches it.
    ///
    /// The dispatched target becomes the new last target (and therefore the
    /// reference the next [`set_reference`](Self::set_reference) captures).
    /// Fails with [`HandError::ReferenceNotSet`] until a reference exists.
    pub async fn slide(&mut self, value: i32) -> HandResult<JointSnapshot> {
        let blender = self.blender.as_ref().ok_or(HandError::ReferenceNotSet)?;
        let targets = blender.target_for(value);
        self.commander.send_joint_targets(&targets).await?;
        self.last_target = targets.clone();
        Ok(targets)
    }

    /// Moves straight to a stored grasp and makes it the new reference.
    pub async fn move_to_named(&mut self, name: &str) -> HandResult<()> {
        let grasp = self.warehouse.get(name)?;
        self.commander.send_joint_targets(&grasp.joints).await?;
        info!(grasp = name, "moved to named grasp");
        self.last_target = grasp.joints;
        self.set_reference()
    }

    /// Saves the current pose under `name`.
    ///
    /// `selected_joints` restricts the saved grasp to a subset; an empty
    /// slice saves every joint of the current pose. Refuses to replace an
    /// existing grasp unless `overwrite` is set.
    pub async fn save_grasp(
        &mut self,
        name: &str,
        selected_joints: &[String],
        overwrite: bool,
    ) -> HandResult<()> {
        let pose = self.commander.current_pose().await?;
        let joints: JointSnapshot = if selected_joints.is_empty() {
            pose
        } else {
            pose.iter()
                .filter(|(joint, _)| selected_joints.iter().any(|s| s == joint))
                .collect()
        };
        self.warehouse.save(Grasp::new(name, joints), overwrite)?;
        info!(grasp = name, "saved grasp");
        Ok(())
    }

    fn rebuild_blender(&mut self) -> HandResult<()> {
        // Selections made before the first reference capture are fine; the
        // blend appears once both endpoints and a reference exist.
        if self.from.is_some() && self.to.is_some() && !self.last_target.is_empty() {
            self.set_reference()
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, f64)]) -> JointSnapshot {
        pairs.iter().map(|(name, angle)| (*name, *angle)).collect()
    }

    fn blender() -> GraspBlender {
        GraspBlender::new(
            snapshot(&[("j1", 0.0), ("j2", 0.0)]),
            snapshot(&[("j1", 1.0), ("j2", 2.0)]),
            snapshot(&[("j1", 4.0), ("j2", -2.0)]),
        )
    }

    #[test]
    fn slider_extremes_hit_the_endpoints() {
        let blend = blender();
        assert_eq!(blend.target_for(-100), snapshot(&[("j1", 0.0), ("j2", 0.0)]));
        assert_eq!(blend.target_for(100), snapshot(&[("j1", 4.0), ("j2", -2.0)]));
    }

    #[test]
    fn slider_zero_is_the_reference() {
        let blend = blender();
        assert_eq!(blend.target_for(0), snapshot(&[("j1", 1.0), ("j2", 2.0)]));
    }

    #[test]
    fn negative_values_index_the_first_interpolator() {
        let blend = blender();
        // -50 is halfway from `from` to the reference.
        assert_eq!(blend.target_for(-50), snapshot(&[("j1", 0.5), ("j2", 1.0)]));
        // 50 is halfway from the reference to `to`.
        assert_eq!(blend.target_for(50), snapshot(&[("j1", 2.5), ("j2", 0.0)]));
    }

    #[test]
    fn missing_joints_merge_both_sides() {
        let blend = GraspBlender::new(
            snapshot(&[("j1", 0.0), ("only_from", 1.0)]),
            snapshot(&[("j1", 1.0)]),
            snapshot(&[("j1", 2.0), ("only_to", 3.0)]),
        );
        assert_eq!(
            blend.missing_joints(),
            vec!["only_from".to_owned(), "only_to".to_owned()]
        );
    }
}
