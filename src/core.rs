//! Core data types shared across the application.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fingers of the hand, in sensor-array order.
pub const FINGERS: [&str; 5] = ["ff", "mf", "rf", "lf", "th"];

/// A snapshot of joint positions: joint name to angle in radians.
///
/// Iteration order is the sorted joint-name order, so snapshots compare and
/// display deterministically. All snapshots participating in one
/// interpolation are expected to share an identical joint set; see
/// [`crate::control::interpolator::GraspInterpolator`] for how mismatches
/// are reported.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointSnapshot(BTreeMap<String, f64>);

impl JointSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the angle for `joint`, if present.
    pub fn get(&self, joint: &str) -> Option<f64> {
        self.0.get(joint).copied()
    }

    /// Sets the angle for `joint`.
    pub fn insert(&mut self, joint: impl Into<String>, angle: f64) {
        self.0.insert(joint.into(), angle);
    }

    /// Removes `joint` from the snapshot, returning its angle if present.
    pub fn remove(&mut self, joint: &str) -> Option<f64> {
        self.0.remove(joint)
    }

    /// Whether the snapshot contains `joint`.
    pub fn contains(&self, joint: &str) -> bool {
        self.0.contains_key(joint)
    }

    /// Number of joints in the snapshot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joint names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(name, angle)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, angle)| (name.as_str(), *angle))
    }

    /// Keeps only the joints for which `keep` returns true.
    ///
    /// Used to restrict endpoint grasps to the joints the commander actually
    /// drives before building an interpolation.
    pub fn retain_joints(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|name, _| keep(name));
    }
}

impl FromIterator<(String, f64)> for JointSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for JointSnapshot {
    fn from_iter<T: IntoIterator<Item = (&'a str, f64)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, angle)| (name.to_owned(), angle))
                .collect(),
        )
    }
}

/// A named set of joint-angle targets representing a hand pose.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Grasp {
    /// Name the grasp is stored under.
    pub name: String,
    /// Target angle per joint.
    pub joints: JointSnapshot,
}

impl Grasp {
    /// Creates a grasp from a name and snapshot.
    pub fn new(name: impl Into<String>, joints: JointSnapshot) -> Self {
        Self {
            name: name.into(),
            joints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_iterates_in_sorted_order() {
        let snapshot: JointSnapshot = [("rh_THJ1", 0.5), ("rh_FFJ3", 1.0), ("rh_MFJ3", 0.2)]
            .into_iter()
            .collect();
        let names: Vec<&str> = snapshot.names().collect();
        assert_eq!(names, vec!["rh_FFJ3", "rh_MFJ3", "rh_THJ1"]);
    }

    #[test]
    fn retain_joints_drops_unknown_names() {
        let mut snapshot: JointSnapshot = [("rh_FFJ3", 1.0), ("rh_arm_elbow", 0.3)]
            .into_iter()
            .collect();
        snapshot.retain_joints(|name| name.starts_with("rh_FF"));
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains("rh_FFJ3"));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let snapshot: JointSnapshot = [("rh_FFJ3", 1.25)].into_iter().collect();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: JointSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
