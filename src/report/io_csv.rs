//! CSV rendering of reports.
//!
//! Joints and markers use separate row types, so each CSV carries a header
//! that names its own coordinate space:
//! - joints: `Joint,Index,X,Y` with normalized floats;
//! - markers: `Marker,X,Y` with integer pixels.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::Report;
use crate::error::PosemarkError;
use crate::markers::Marker;
use crate::pose::Joint;

#[derive(Debug, Serialize)]
struct JointRow<'a> {
    #[serde(rename = "Joint")]
    joint: &'a str,
    #[serde(rename = "Index")]
    index: usize,
    #[serde(rename = "X")]
    x: f64,
    #[serde(rename = "Y")]
    y: f64,
}

impl<'a> From<&'a Joint> for JointRow<'a> {
    fn from(j: &'a Joint) -> Self {
        Self {
            joint: j.name(),
            index: j.index(),
            x: j.position.x,
            y: j.position.y,
        }
    }
}

#[derive(Debug, Serialize)]
struct MarkerRow {
    #[serde(rename = "Marker")]
    marker: String,
    #[serde(rename = "X")]
    x: i32,
    #[serde(rename = "Y")]
    y: i32,
}

impl From<&Marker> for MarkerRow {
    fn from(m: &Marker) -> Self {
        let (x, y) = m.centroid.to_i32();
        Self {
            marker: m.label(),
            x,
            y,
        }
    }
}

/// Writes `report` to `path`, replacing any existing file.
pub fn write_report(path: &Path, report: &Report) -> Result<(), PosemarkError> {
    let file = File::create(path).map_err(PosemarkError::Io)?;
    let writer = BufWriter::new(file);

    let mut csv_writer = headerless(writer);
    serialize_rows(&mut csv_writer, report, path)?;

    csv_writer
        .into_inner()
        .map_err(|e| PosemarkError::Io(e.into_error()))?
        .flush()
        .map_err(PosemarkError::Io)?;

    Ok(())
}

/// Renders `report` to a CSV string.
///
/// Useful for testing without file I/O.
pub fn report_to_csv_string(report: &Report) -> Result<String, PosemarkError> {
    let dummy_path = Path::new("<string>");
    let mut csv_writer = headerless(Vec::new());
    serialize_rows(&mut csv_writer, report, dummy_path)?;

    let bytes = csv_writer
        .into_inner()
        .map_err(|e| PosemarkError::Io(e.into_error()))?;

    String::from_utf8(bytes)
        .map_err(|e| PosemarkError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

// The header is written by hand so it is present even for an empty report.
fn headerless<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer)
}

fn serialize_rows<W: Write>(
    csv_writer: &mut csv::Writer<W>,
    report: &Report,
    path: &Path,
) -> Result<(), PosemarkError> {
    let wrap = |source| PosemarkError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };
    csv_writer.write_record(report.header()).map_err(wrap)?;
    match report {
        Report::Joints(joints) => {
            for joint in joints {
                csv_writer.serialize(JointRow::from(joint)).map_err(wrap)?;
            }
        }
        Report::Markers(markers) => {
            for marker in markers {
                csv_writer.serialize(MarkerRow::from(marker)).map_err(wrap)?;
            }
        }
    }
    Ok(())
}
