//! Pose estimation adapter.
//!
//! The model itself is an external collaborator behind [`PoseEstimator`].
//! This module turns whatever landmark list a backend returns into typed
//! [`Joint`] records and draws the skeleton overlay.
//!
//! Backends:
//! - [`CommandPoseEstimator`]: runs an external model process per image and
//!   exchanges PNG in / JSON out over stdio.
//! - [`NoPoseModel`]: reports no pose; used when no model is configured.

mod command;
mod landmark;

pub use command::{parse_landmarks, CommandPoseEstimator};
pub use landmark::{PoseLandmark, POSE_CONNECTIONS};

use image::{Rgb, RgbImage};
use log::{debug, info};
use serde::Deserialize;

use crate::coord::{Coord, Normalized};
use crate::draw;
use crate::error::PosemarkError;

/// Joints below this visibility are not drawn.
pub const VISIBILITY_THRESHOLD: f64 = 0.5;

const JOINT_RADIUS: i32 = 2;
const JOINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const JOINT_BORDER_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const EDGE_COLOR: Rgb<u8> = Rgb([224, 224, 224]);

/// Options passed to the pose model.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseOptions {
    /// Treat every call as an unrelated still image (no tracking).
    pub static_image_mode: bool,
    /// Minimum person-detection confidence for a pose to be reported.
    pub min_detection_confidence: f64,
}

impl Default for PoseOptions {
    fn default() -> Self {
        Self {
            static_image_mode: true,
            min_detection_confidence: 0.5,
        }
    }
}

/// One raw landmark as produced by a model, in normalized image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

fn default_visibility() -> f64 {
    1.0
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: default_visibility(),
        }
    }
}

/// A named landmark with its position in normalized coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub landmark: PoseLandmark,
    pub position: Coord<Normalized>,
    pub visibility: f64,
}

impl Joint {
    #[inline]
    pub fn index(&self) -> usize {
        self.landmark.index()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.landmark.name()
    }

    fn is_drawable(&self) -> bool {
        self.visibility >= VISIBILITY_THRESHOLD && self.position.is_in_unit_square()
    }
}

/// A pose model that finds at most one person in a still image.
pub trait PoseEstimator {
    /// Returns the landmarks of the detected pose, or `None` if no pose was
    /// found. Implementations acquire and release any model resources within
    /// the call.
    fn estimate(
        &mut self,
        image: &RgbImage,
        options: &PoseOptions,
    ) -> Result<Option<Vec<Landmark>>, PosemarkError>;

    /// Short description for log output.
    fn describe(&self) -> String;
}

/// Backend used when no model is configured: never finds a pose.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPoseModel;

impl PoseEstimator for NoPoseModel {
    fn estimate(
        &mut self,
        _image: &RgbImage,
        _options: &PoseOptions,
    ) -> Result<Option<Vec<Landmark>>, PosemarkError> {
        Ok(None)
    }

    fn describe(&self) -> String {
        "no pose model".to_string()
    }
}

/// Runs `estimator` on `image` and names the returned landmarks.
///
/// An empty landmark list counts as "no pose". A list whose length differs
/// from [`PoseLandmark::COUNT`] is rejected, since joints could not be named
/// reliably.
pub fn detect_pose<E: PoseEstimator + ?Sized>(
    estimator: &mut E,
    image: &RgbImage,
    options: &PoseOptions,
) -> Result<Option<Vec<Joint>>, PosemarkError> {
    debug!("running pose estimation with {}", estimator.describe());
    let Some(landmarks) = estimator.estimate(image, options)? else {
        info!("pose model found no pose");
        return Ok(None);
    };
    if landmarks.is_empty() {
        info!("pose model returned an empty landmark set");
        return Ok(None);
    }
    if landmarks.len() != PoseLandmark::COUNT {
        return Err(PosemarkError::PoseBackend(format!(
            "expected {} landmarks, got {}",
            PoseLandmark::COUNT,
            landmarks.len()
        )));
    }

    let joints = PoseLandmark::ALL
        .iter()
        .zip(landmarks)
        .map(|(&landmark, lm)| Joint {
            landmark,
            position: Coord::new(lm.x, lm.y),
            visibility: lm.visibility,
        })
        .collect::<Vec<_>>();
    info!("pose found with {} joints", joints.len());
    Ok(Some(joints))
}

/// Draws skeleton edges and joint dots for a detected pose.
///
/// Joints with low visibility or outside the image are skipped along with
/// every edge that touches them.
pub fn annotate_pose(image: &mut RgbImage, joints: &[Joint]) {
    let (w, h) = image.dimensions();
    let pixel = |j: &Joint| {
        let p = j.position.to_pixel_clamped(w, h);
        (p.x as f32, p.y as f32)
    };

    for &(a, b) in POSE_CONNECTIONS.iter() {
        let (Some(ja), Some(jb)) = (joints.get(a), joints.get(b)) else {
            continue;
        };
        if ja.is_drawable() && jb.is_drawable() {
            draw::thick_line(image, pixel(ja), pixel(jb), EDGE_COLOR);
        }
    }

    for joint in joints {
        if !joint.is_drawable() {
            debug!(
                "not drawing {} (visibility {:.2})",
                joint.landmark, joint.visibility
            );
            continue;
        }
        let (x, y) = pixel(joint);
        let center = (x as i32, y as i32);
        draw::filled_circle(image, center, JOINT_RADIUS + 1, JOINT_BORDER_COLOR);
        draw::filled_circle(image, center, JOINT_RADIUS, JOINT_COLOR);
    }
}
