//! # Hand Console Core Library
//!
//! This crate is the core library for the `hand-console` application: a
//! desktop console for visualizing and teleoperating a multi-fingered
//! robotic hand. Organizing the project as a library keeps the control and
//! telemetry logic reusable outside the native GUI (the `poses` CLI uses it
//! headlessly, and the integration tests drive it against the mock hand).
//!
//! ## Crate Structure
//!
//! - **`config`**: Settings loaded from TOML files. See [`config::Settings`].
//! - **`control`**: The teleoperation core: grasp interpolation
//!   ([`control::GraspInterpolator`]), slider blending
//!   ([`control::GraspController`]) and the joint/controller model behind
//!   the slider panel.
//! - **`core`**: Fundamental data types: [`core::JointSnapshot`] and
//!   [`core::Grasp`].
//! - **`error`**: The [`error::HandError`] enum for centralized error
//!   handling.
//! - **`gui`**: The native user interface built with `eframe`/`egui`:
//!   dockable dashboard tabs, the grasp controller panel and the joint
//!   slider panel.
//! - **`hardware`**: The [`hardware::HandCommander`] dispatch seam and the
//!   mock hand driver.
//! - **`logging`**: Tracing initialization.
//! - **`telemetry`**: Telemetry sample types, the broadcast subscription
//!   bus and the rolling trace buffers feeding the plots.
//! - **`warehouse`**: The persisted library of named grasps.

pub mod config;
pub mod control;
pub mod core;
pub mod error;
pub mod gui;
pub mod hardware;
pub mod logging;
pub mod telemetry;
pub mod warehouse;
