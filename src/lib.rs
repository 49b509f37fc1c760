//! Posemark: pose landmarks and red-marker fallback for single images.
//!
//! Posemark runs a pose model on one image and writes the detected joints to
//! a CSV file next to the image, together with an annotated copy. When the
//! model finds nobody, hand-drawn red dots on the image can stand in for the
//! skeleton (`-p`).
//!
//! # Modules
//!
//! - [`markers`]: red marker detection and annotation
//! - [`pose`]: pose model seam, joint naming, skeleton overlay
//! - [`report`]: outcome selection, output paths, CSV writing
//! - [`display`]: showing the annotated result
//! - [`coord`]: typed pixel and normalized coordinates
//! - [`error`]: error types for posemark operations

pub mod coord;
pub mod display;
pub mod draw;
pub mod error;
pub mod logger;
pub mod markers;
pub mod pose;
pub mod report;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use image::{ImageError, ImageReader};
use log::{info, warn};

pub use error::PosemarkError;

use display::{NoViewer, SystemViewer, Viewer, WINDOW_TITLE};
use markers::MarkerParams;
use pose::{CommandPoseEstimator, NoPoseModel, PoseEstimator, PoseOptions};
use report::{Outcome, OutputPaths};

/// The posemark CLI application.
#[derive(Parser)]
#[command(name = "posemark")]
#[command(version, author, about)]
struct Cli {
    /// Image to analyse.
    image_path: PathBuf,

    /// Detect hand-drawn red marks and report them when no pose is found.
    #[arg(short = 'p', long = "marks")]
    marks: bool,

    /// Pose model program (reads a PNG on stdin, writes landmark JSON).
    #[arg(long, value_name = "PROGRAM")]
    pose_command: Option<PathBuf>,

    /// Extra argument for the pose model program (repeatable).
    #[arg(
        long = "pose-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        requires = "pose_command"
    )]
    pose_args: Vec<String>,

    /// Minimum confidence for the model to report a pose.
    #[arg(long, default_value_t = 0.5, value_name = "CONFIDENCE")]
    min_detection_confidence: f64,

    /// Write the outputs without opening a viewer.
    #[arg(long)]
    no_display: bool,

    /// Increase log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Settings for processing one image.
#[derive(Clone, Debug, Default)]
pub struct ProcessOptions {
    /// Run red marker detection and use markers as a fallback report.
    pub marker_mode: bool,
    pub markers: MarkerParams,
    pub pose: PoseOptions,
}

/// Run the posemark CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PosemarkError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage problems end the run without processing, but not as a failure.
            let _ = err.print();
            return Ok(());
        }
    };

    logger::init(cli.verbose);

    let mut estimator: Box<dyn PoseEstimator> = match &cli.pose_command {
        Some(program) => Box::new(CommandPoseEstimator::new(program).with_args(&cli.pose_args)),
        None => {
            warn!("no --pose-command given; pose detection will report no pose");
            Box::new(NoPoseModel)
        }
    };
    let mut viewer: Box<dyn Viewer> = if cli.no_display {
        Box::new(NoViewer)
    } else {
        Box::new(SystemViewer)
    };

    let options = ProcessOptions {
        marker_mode: cli.marks,
        markers: MarkerParams::default(),
        pose: PoseOptions {
            min_detection_confidence: cli.min_detection_confidence,
            ..PoseOptions::default()
        },
    };

    let outcome = process_image(
        &cli.image_path,
        &options,
        estimator.as_mut(),
        viewer.as_mut(),
    )?;
    info!("{}: {}", cli.image_path.display(), outcome);
    Ok(())
}

/// Processes one image end to end.
///
/// Reads the image, optionally detects and draws red markers, runs the pose
/// model, then writes the CSV and annotated image and shows the result for
/// whichever [`Outcome`] applies. Nothing is written when nothing was
/// detected.
///
/// # Errors
/// Fails before any detection if the input cannot be decoded, and afterwards
/// if the pose model, the output files or the viewer fail.
pub fn process_image<E, V>(
    path: &Path,
    options: &ProcessOptions,
    estimator: &mut E,
    viewer: &mut V,
) -> Result<Outcome, PosemarkError>
where
    E: PoseEstimator + ?Sized,
    V: Viewer + ?Sized,
{
    let paths = OutputPaths::for_input(path)?;

    let decode_err = |source| PosemarkError::ImageDecode {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| decode_err(ImageError::IoError(e)))?;
    let format = reader.format();
    let mut image = reader.decode().map_err(decode_err)?.to_rgb8();
    info!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    let found_markers = if options.marker_mode {
        let found = markers::detect_markers(&image, &options.markers);
        info!("found {} red markers", found.len());
        markers::annotate_markers(&mut image, &found);
        found
    } else {
        Vec::new()
    };

    let joints = pose::detect_pose(estimator, &image, &options.pose)?;
    if let Some(joints) = &joints {
        pose::annotate_pose(&mut image, joints);
    }

    let outcome = Outcome::decide(joints, found_markers, options.marker_mode);
    if let Some(notice) = outcome.notice() {
        println!("{notice}");
    }

    if let Some(report) = outcome.report() {
        // Image before CSV: a failed encode must not leave a CSV behind.
        let encode_err = |source| PosemarkError::ImageEncode {
            path: paths.image.clone(),
            source,
        };
        match format {
            Some(format) => image.save_with_format(&paths.image, format),
            None => image.save(&paths.image),
        }
        .map_err(encode_err)?;
        info!("wrote annotated image to {}", paths.image.display());

        report::write_report(&paths.csv, report)?;
        info!("wrote {} rows to {}", report.row_count(), paths.csv.display());

        viewer.show(WINDOW_TITLE, &paths.image)?;
    }

    Ok(outcome)
}
