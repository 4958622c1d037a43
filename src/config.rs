//! Configuration management.

use crate::error::HandError;
use serde::Deserialize;
use std::f64::consts::PI;
use std::path::PathBuf;

/// Top-level application settings, loaded from `config/<name>.toml`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    /// Default tracing filter, e.g. `info` or `hand_console=debug`.
    pub log_level: String,
    /// Hand identity.
    pub hand: HandSettings,
    /// Telemetry display tuning.
    pub telemetry: TelemetrySettings,
    /// Grasp library location.
    pub warehouse: WarehouseSettings,
    /// Robot description and slider filtering.
    pub robot: RobotSettings,
}

/// Which hand the console talks to.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HandSettings {
    /// Topic/name prefix, `rh` or `lh`.
    pub side: String,
    /// Whether the fingertips carry impedance-sensing tactiles instead of
    /// pressure/temperature arrays.
    pub biotac: bool,
}

/// Telemetry window and display scaling.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Rolling window length in samples.
    pub window: usize,
    /// Mock driver publish rate in Hz.
    pub publish_rate_hz: f64,
    /// Scale applied to joint efforts before plotting, so effort shares an
    /// axis with position in radians.
    pub effort_scale: f64,
    /// Scale applied to raw PID outputs before plotting.
    pub pid_output_scale: f64,
}

/// Where the grasp library lives.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WarehouseSettings {
    /// Library file path; defaults to the user data directory.
    pub path: Option<PathBuf>,
}

/// Robot description input for the slider model.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RobotSettings {
    /// Path of the TOML robot description.
    pub description: PathBuf,
    /// Substring filter applied to joint names when building sliders.
    pub joint_name_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            hand: HandSettings::default(),
            telemetry: TelemetrySettings::default(),
            warehouse: WarehouseSettings::default(),
            robot: RobotSettings::default(),
        }
    }
}

impl Default for HandSettings {
    fn default() -> Self {
        Self {
            side: "rh".to_owned(),
            biotac: false,
        }
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            window: 200,
            publish_rate_hz: 50.0,
            effort_scale: PI / 600.0,
            pid_output_scale: 0.013333333,
        }
    }
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self {
            description: PathBuf::from("config/hand_description.toml"),
            joint_name_filter: String::new(),
        }
    }
}

impl Settings {
    /// Loads settings from `config/<name>.toml` (default `config/default`).
    pub fn new(config_name: Option<&str>) -> Result<Self, HandError> {
        let config_path = format!("config/{}", config_name.unwrap_or("default"));
        let s = config::Config::builder()
            .add_source(config::File::with_name(&config_path))
            .build()
            .map_err(HandError::Config)?;

        let settings: Settings = s.try_deserialize().map_err(HandError::Config)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), HandError> {
        if self.hand.side != "rh" && self.hand.side != "lh" {
            return Err(HandError::Configuration(format!(
                "hand.side must be 'rh' or 'lh', got '{}'",
                self.hand.side
            )));
        }
        if self.telemetry.window == 0 {
            return Err(HandError::Configuration(
                "telemetry.window must be at least 1".into(),
            ));
        }
        if self.telemetry.publish_rate_hz <= 0.0 {
            return Err(HandError::Configuration(
                "telemetry.publish_rate_hz must be positive".into(),
            ));
        }
        Ok(())
    }
}
