//! Deciding what to report and where to write it.
//!
//! [`Outcome::decide`] picks one of three results, in order:
//! 1. a pose was found: report its joints;
//! 2. no pose, marker mode on, at least one marker: report the markers;
//! 3. otherwise nothing is written.

mod io_csv;

pub use io_csv::{report_to_csv_string, write_report};

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PosemarkError;
use crate::markers::Marker;
use crate::pose::Joint;

/// Rows destined for the output CSV.
#[derive(Clone, Debug, PartialEq)]
pub enum Report {
    /// Pose joints in normalized coordinates.
    Joints(Vec<Joint>),
    /// Red markers in pixel coordinates.
    Markers(Vec<Marker>),
}

impl Report {
    /// CSV header row for this kind of report.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Report::Joints(_) => &["Joint", "Index", "X", "Y"],
            Report::Markers(_) => &["Marker", "X", "Y"],
        }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        match self {
            Report::Joints(j) => j.len(),
            Report::Markers(m) => m.len(),
        }
    }
}

/// The result of processing one image.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    PoseFound(Report),
    MarkersOnly(Report),
    NothingDetected,
}

impl Outcome {
    /// Chooses the report for the available detections.
    pub fn decide(joints: Option<Vec<Joint>>, markers: Vec<Marker>, marker_mode: bool) -> Self {
        match joints {
            Some(joints) => Outcome::PoseFound(Report::Joints(joints)),
            None if marker_mode && !markers.is_empty() => {
                Outcome::MarkersOnly(Report::Markers(markers))
            }
            None => Outcome::NothingDetected,
        }
    }

    /// The report to write, if any.
    pub fn report(&self) -> Option<&Report> {
        match self {
            Outcome::PoseFound(r) | Outcome::MarkersOnly(r) => Some(r),
            Outcome::NothingDetected => None,
        }
    }

    /// Console notice printed for this outcome, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Outcome::PoseFound(_) => None,
            Outcome::MarkersOnly(_) => Some("Pose could not be detected, but red marks were found."),
            Outcome::NothingDetected => Some("Pose could not be detected in the image."),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::PoseFound(r) => write!(f, "pose found ({} joints)", r.row_count()),
            Outcome::MarkersOnly(r) => write!(f, "markers only ({} markers)", r.row_count()),
            Outcome::NothingDetected => write!(f, "nothing detected"),
        }
    }
}

/// Files written next to the input image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    /// `<dir>/<stem>.csv`
    pub csv: PathBuf,
    /// `<dir>/p_<file name>`
    pub image: PathBuf,
}

impl OutputPaths {
    pub fn for_input(input: &Path) -> Result<Self, PosemarkError> {
        let file_name = input
            .file_name()
            .ok_or_else(|| PosemarkError::InvalidInputPath(input.to_path_buf()))?;
        let dir = input.parent().unwrap_or_else(|| Path::new(""));

        let mut prefixed = std::ffi::OsString::from("p_");
        prefixed.push(file_name);

        Ok(Self {
            csv: dir.join(file_name).with_extension("csv"),
            image: dir.join(prefixed),
        })
    }
}
