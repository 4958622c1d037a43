//! Custom error types for the application.
//!
//! This module defines the primary error type, `HandError`, for the entire
//! application. Using the `thiserror` crate, it provides a centralized and
//! consistent way to handle the different kinds of errors that can occur,
//! from configuration and persistence issues to teleoperation-specific
//! problems such as mismatched grasp endpoints.
//!
//! The one failure class with real design content lives in
//! [`HandError::MissingJoints`]: two grasp endpoints handed to an
//! interpolator do not share the same joint set. Mismatches are *reported*
//! when the interpolator is built and only become a hard error through the
//! strict interpolation path, so callers can decide between a partial
//! command and an abort.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type HandResult<T> = std::result::Result<T, HandError>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum HandError {
    /// Failed to load or parse a configuration file.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration parsed but failed semantic validation.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// File or terminal I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Grasp library (de)serialization failure.
    #[error("Grasp library error: {0}")]
    Persistence(#[from] serde_json::Error),

    /// Joints present in one interpolation endpoint but not the other.
    #[error("Joints missing from one interpolation endpoint: {}", .0.join(", "))]
    MissingJoints(Vec<String>),

    /// Lookup of a named grasp failed.
    #[error("No grasp named '{0}' in the library")]
    UnknownGrasp(String),

    /// Refusing to silently replace a stored grasp.
    #[error("A grasp named '{0}' already exists (pass overwrite to replace it)")]
    GraspExists(String),

    /// The blend controller was used before a reference pose was captured.
    #[error("No reference pose set. Check that the hand controllers are running, then set a reference")]
    ReferenceNotSet,

    /// A controller type id with no entry in the category table.
    #[error("Controller type '{0}' is not supported")]
    ControllerNotSupported(String),

    /// The robot description has no limits for this joint.
    #[error("Joint limits not found for joint '{0}'")]
    JointLimitsNotFound(String),

    /// Failure reported by the hand commander.
    #[error("Hand commander error: {0}")]
    Commander(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_joints_lists_names() {
        let err = HandError::MissingJoints(vec!["rh_FFJ3".into(), "rh_THJ2".into()]);
        let msg = err.to_string();
        assert!(msg.contains("rh_FFJ3"));
        assert!(msg.contains("rh_THJ2"));
    }

    #[test]
    fn grasp_exists_names_the_grasp() {
        let err = HandError::GraspExists("power_grasp".into());
        assert!(err.to_string().contains("power_grasp"));
    }
}
