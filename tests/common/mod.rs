#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use posemark::display::Viewer;
use posemark::pose::PoseLandmark;
use posemark::PosemarkError;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const MARKER_RED: Rgb<u8> = Rgb([220, 20, 20]);

pub fn white_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

/// Paints a solid disk of `radius` pixels centered on `(cx, cy)`.
pub fn paint_disk(img: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= radius * radius
                && x >= 0
                && y >= 0
                && (x as u32) < img.width()
                && (y as u32) < img.height()
            {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

pub fn paint_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, color);
        }
    }
}

/// A 100x100 image with two red dots, the upper one on the right.
pub fn two_marker_image() -> RgbImage {
    let mut img = white_image(100, 100);
    paint_disk(&mut img, 70, 20, 5, MARKER_RED);
    paint_disk(&mut img, 30, 75, 5, MARKER_RED);
    img
}

pub fn write_png(path: &Path, img: &RgbImage) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    img.save(path).expect("write png file");
}

/// JSON bridge output with one landmark per known joint.
pub fn full_pose_json() -> String {
    let landmarks: Vec<String> = (0..PoseLandmark::COUNT)
        .map(|i| {
            format!(
                r#"{{"x": {}, "y": {}, "z": 0.0, "visibility": 0.9}}"#,
                0.2 + i as f64 * 0.01,
                0.3 + i as f64 * 0.015
            )
        })
        .collect();
    format!(r#"{{"landmarks": [{}]}}"#, landmarks.join(", "))
}

/// Writes a shell script that swallows stdin and prints `stdout`.
///
/// Run it as `--pose-command /bin/sh --pose-arg <script>`, so the script
/// itself never needs to be executable.
pub fn write_pose_script(dir: &Path, stdout: &str, exit_code: i32) -> PathBuf {
    let answer = dir.join("pose_answer.json");
    fs::write(&answer, stdout).expect("write pose answer");
    let script = dir.join("pose_model.sh");
    let body = format!(
        "cat > /dev/null\ncat '{}'\nexit {}\n",
        answer.display(),
        exit_code
    );
    fs::write(&script, body).expect("write pose script");
    script
}

pub fn csv_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read csv")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Viewer that records every shown path instead of displaying anything.
#[derive(Debug, Default)]
pub struct RecordingViewer {
    pub shown: Vec<PathBuf>,
}

impl Viewer for RecordingViewer {
    fn show(&mut self, _title: &str, image_path: &Path) -> Result<(), PosemarkError> {
        self.shown.push(image_path.to_path_buf());
        Ok(())
    }
}
