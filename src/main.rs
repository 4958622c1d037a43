//! CLI entry point for hand-console.
//!
//! Launches the console against the mock hand driver, or lists the grasp
//! library headlessly:
//!
//! ```bash
//! hand-console                  # run the console
//! hand-console --config lab     # run with config/lab.toml
//! hand-console poses            # list stored grasps
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use hand_console::config::Settings;
use hand_console::control::joints::{build_joints, RobotDescription};
use hand_console::control::GraspController;
use hand_console::gui::ConsoleApp;
use hand_console::hardware::mock::MockHand;
use hand_console::hardware::HandCommander;
use hand_console::warehouse::GraspWarehouse;
use hand_console::{logging, telemetry::TelemetrySource};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "hand-console")]
#[command(about = "Telemetry and teleoperation console for a multi-fingered robotic hand", long_about = None)]
struct Cli {
    /// Config name under config/ (without extension).
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the grasps stored in the library and exit.
    Poses,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new(cli.config.as_deref())?;
    logging::init(&settings)?;

    match cli.command {
        Some(Commands::Poses) => list_poses(&settings),
        None => run_console(settings),
    }
}

fn list_poses(settings: &Settings) -> Result<()> {
    let path = settings
        .warehouse
        .path
        .clone()
        .unwrap_or_else(GraspWarehouse::default_path);
    let warehouse = GraspWarehouse::open(path)?;
    println!("Grasp library: {}", warehouse.path().display());
    for name in warehouse.list() {
        let grasp = warehouse.get(&name)?;
        println!("  {name}  ({} joints)", grasp.joints.len());
    }
    Ok(())
}

fn run_console(settings: Settings) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let description = RobotDescription::load(&settings.robot.description)?;
    let joints = build_joints(
        &description,
        description.controllers(),
        &settings.robot.joint_name_filter,
    );
    if joints.is_empty() {
        return Err(anyhow!(
            "no usable joints in {}",
            settings.robot.description.display()
        ));
    }
    let joint_names: Vec<String> = joints.iter().map(|j| j.name.clone()).collect();

    let warehouse_path = settings
        .warehouse
        .path
        .clone()
        .unwrap_or_else(GraspWarehouse::default_path);
    let warehouse = GraspWarehouse::open(warehouse_path)?;

    let hand = Arc::new(MockHand::new(
        joint_names,
        settings.telemetry.publish_rate_hz,
        settings.hand.biotac,
    ));
    {
        let _guard = runtime.enter();
        hand.clone().start();
    }

    let commander: Arc<dyn HandCommander> = hand.clone();
    let controller = GraspController::new(commander.clone(), warehouse);
    let app = ConsoleApp::new(
        &settings,
        runtime.handle().clone(),
        commander,
        hand.as_ref() as &dyn TelemetrySource,
        controller,
        joints,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Hand Console"),
        ..Default::default()
    };
    eframe::run_native(
        "Hand Console",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("eframe error: {e}"))
}
