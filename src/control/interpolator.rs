//! Linear interpolation between two grasp endpoints.
//!
//! A [`GraspInterpolator`] owns two joint snapshots, `from` and `to`,
//! captured at construction time and immutable for its lifetime. Selecting
//! a new endpoint means building a new interpolator; the blend controller
//! does exactly that whenever the reference pose or a chooser changes.
//!
//! Joints present in one endpoint but not the other are detected once, at
//! construction, logged at `warn` and exposed via
//! [`GraspInterpolator::missing_joints`]. [`GraspInterpolator::interpolate`]
//! yields the intersection (a partial command the slider path tolerates),
//! while [`GraspInterpolator::interpolate_strict`] refuses to produce one.

use crate::core::JointSnapshot;
use crate::error::{HandError, HandResult};
use tracing::warn;

/// Produces intermediate joint targets between two fixed endpoint snapshots.
#[derive(Clone, Debug)]
pub struct GraspInterpolator {
    from: JointSnapshot,
    to: JointSnapshot,
    missing: Vec<String>,
}

impl GraspInterpolator {
    /// Captures the two endpoints and records any joint-set mismatch.
    pub fn new(from: JointSnapshot, to: JointSnapshot) -> Self {
        let mut missing: Vec<String> = from
            .names()
            .filter(|name| !to.contains(name))
            .chain(to.names().filter(|name| !from.contains(name)))
            .map(str::to_owned)
            .collect();
        missing.sort();
        missing.dedup();

        if !missing.is_empty() {
            warn!(
                joints = ?missing,
                "grasp endpoints do not share a joint set; mismatched joints will be \
                 omitted from interpolated targets"
            );
        }

        Self { from, to, missing }
    }

    /// The `from` endpoint.
    pub fn from_snapshot(&self) -> &JointSnapshot {
        &self.from
    }

    /// The `to` endpoint.
    pub fn to_snapshot(&self) -> &JointSnapshot {
        &self.to
    }

    /// Joints present in exactly one endpoint, sorted. Empty when the
    /// endpoints share an identical joint set.
    pub fn missing_joints(&self) -> &[String] {
        &self.missing
    }

    /// Linear blend of the endpoints at `percentage`.
    ///
    /// For every joint present in both endpoints the output angle is
    /// `from + (to - from) * percentage / 100`. Pure function of the stored
    /// endpoints and the input. `percentage` is not clamped: 0 returns the
    /// `from` pose, 100 the `to` pose, and 150 extrapolates linearly past
    /// `to`. Mismatched joints are omitted from the result.
    pub fn interpolate(&self, percentage: f64) -> JointSnapshot {
        self.from
            .iter()
            .filter_map(|(joint, from_angle)| {
                self.to.get(joint).map(|to_angle| {
                    let angle = from_angle + (to_angle - from_angle) * percentage / 100.0;
                    (joint, angle)
                })
            })
            .collect()
    }

    /// Like [`interpolate`](Self::interpolate), but fails with
    /// [`HandError::MissingJoints`] when the endpoints do not share an
    /// identical joint set, for dispatchers that must not send a partial
    /// command.
    pub fn interpolate_strict(&self, percentage: f64) -> HandResult<JointSnapshot> {
        if !self.missing.is_empty() {
            return Err(HandError::MissingJoints(self.missing.clone()));
        }
        Ok(self.interpolate(percentage))
    }
}
