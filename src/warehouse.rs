//! Persisted library of named grasps.
//!
//! The "named target" lookup service the blend controller draws its
//! endpoints from. Grasps live in one JSON file; a missing file is an empty
//! library seeded with a few built-in poses so a fresh install has
//! endpoints to blend between.

use crate::core::{Grasp, JointSnapshot};
use crate::error::{HandError, HandResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Library {
    grasps: BTreeMap<String, JointSnapshot>,
}

/// JSON-file-backed store of named grasps.
#[derive(Debug)]
pub struct GraspWarehouse {
    path: PathBuf,
    library: Library,
}

impl GraspWarehouse {
    /// Opens the library at `path`, creating an empty one seeded with the
    /// built-in poses if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> HandResult<Self> {
        let path = path.into();
        let library = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            debug!(path = %path.display(), "no grasp library file, seeding built-in poses");
            builtin_library()
        };
        Ok(Self { path, library })
    }

    /// Default library location under the user data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hand_console")
            .join("grasps.json")
    }

    /// Stored grasp names, sorted.
    pub fn list(&self) -> Vec<String> {
        self.library.grasps.keys().cloned().collect()
    }

    /// Whether a grasp named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.library.grasps.contains_key(name)
    }

    /// Fetches a grasp by name.
    pub fn get(&self, name: &str) -> HandResult<Grasp> {
        self.library
            .grasps
            .get(name)
            .map(|joints| Grasp::new(name, joints.clone()))
            .ok_or_else(|| HandError::UnknownGrasp(name.to_owned()))
    }

    /// Stores a grasp and writes the library to disk.
    ///
    /// Refuses to replace an existing grasp unless `overwrite` is set.
    pub fn save(&mut self, grasp: Grasp, overwrite: bool) -> HandResult<()> {
        if !overwrite && self.contains(&grasp.name) {
            return Err(HandError::GraspExists(grasp.name));
        }
        self.library.grasps.insert(grasp.name.clone(), grasp.joints);
        self.persist()?;
        info!(grasp = %grasp.name, path = %self.path.display(), "grasp stored");
        Ok(())
    }

    /// Removes a grasp by name and writes the library to disk.
    pub fn remove(&mut self, name: &str) -> HandResult<()> {
        if self.library.grasps.remove(name).is_none() {
            return Err(HandError::UnknownGrasp(name.to_owned()));
        }
        self.persist()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> HandResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.library)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Built-in poses for a fresh library: everything open, a closed fist and a
/// pointing pose, over the coupled-joint slider set.
fn builtin_library() -> Library {
    let joints = [
        "rh_FFJ0", "rh_FFJ3", "rh_FFJ4", "rh_MFJ0", "rh_MFJ3", "rh_MFJ4", "rh_RFJ0", "rh_RFJ3",
        "rh_RFJ4", "rh_LFJ0", "rh_LFJ3", "rh_LFJ4", "rh_LFJ5", "rh_THJ1", "rh_THJ2", "rh_THJ3",
        "rh_THJ4", "rh_THJ5", "rh_WRJ1", "rh_WRJ2",
    ];

    let open: JointSnapshot = joints.iter().map(|j| (*j, 0.0)).collect();

    let mut fist = JointSnapshot::new();
    for joint in joints {
        let angle = match joint {
            j if j.ends_with("J0") => 3.14,
            j if j.ends_with("J3") => 1.57,
            "rh_THJ1" => 1.0,
            "rh_THJ2" => 0.6,
            "rh_THJ4" => 1.2,
            _ => 0.0,
        };
        fist.insert(joint, angle);
    }

    let mut point = fist.clone();
    point.insert("rh_FFJ0", 0.0);
    point.insert("rh_FFJ3", 0.0);

    let mut grasps = BTreeMap::new();
    grasps.insert("open".to_owned(), open);
    grasps.insert("fist".to_owned(), fist);
    grasps.insert("point".to_owned(), point);
    Library { grasps }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_warehouse() -> (tempfile::TempDir, GraspWarehouse) {
        let dir = tempfile::tempdir().unwrap();
        let warehouse = GraspWarehouse::open(dir.path().join("grasps.json")).unwrap();
        (dir, warehouse)
    }

    #[test]
    fn fresh_library_has_builtin_poses_sorted() {
        let (_dir, warehouse) = temp_warehouse();
        assert_eq!(warehouse.list(), vec!["fist", "open", "point"]);
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grasps.json");

        let grasp = Grasp::new("pinch", [("rh_FFJ3", 1.1), ("rh_THJ4", 1.2)].into_iter().collect());
        {
            let mut warehouse = GraspWarehouse::open(&path).unwrap();
            warehouse.save(grasp.clone(), false).unwrap();
        }

        let warehouse = GraspWarehouse::open(&path).unwrap();
        assert_eq!(warehouse.get("pinch").unwrap(), grasp);
        // Built-ins were persisted along with the new grasp.
        assert!(warehouse.contains("open"));
    }

    #[test]
    fn save_refuses_overwrite_unless_asked() {
        let (_dir, mut warehouse) = temp_warehouse();
        let grasp = Grasp::new("open", [("rh_FFJ3", 0.5)].into_iter().collect());

        match warehouse.save(grasp.clone(), false) {
            Err(HandError::GraspExists(name)) => assert_eq!(name, "open"),
            other => panic!("unexpected result: {:?}", other),
        }

        warehouse.save(grasp.clone(), true).unwrap();
        assert_eq!(warehouse.get("open").unwrap().joints, grasp.joints);
    }

    #[test]
    fn unknown_grasp_is_an_error() {
        let (_dir, warehouse) = temp_warehouse();
        assert!(matches!(
            warehouse.get("no_such_pose"),
            Err(HandError::UnknownGrasp(_))
        ));
    }

    #[test]
    fn remove_deletes_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grasps.json");

        {
            let mut warehouse = GraspWarehouse::open(&path).unwrap();
            warehouse.remove("point").unwrap();
        }
        let warehouse = GraspWarehouse::open(&path).unwrap();
        assert!(!warehouse.contains("point"));
    }
}
