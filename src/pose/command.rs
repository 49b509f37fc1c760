//! Pose model bridge over a child process.
//!
//! Protocol, one process per image:
//! - argv: configured arguments, then `--static-image-mode` (still images
//!   only) and `--min-detection-confidence <c>`;
//! - stdin: the image, PNG encoded; closed after writing. The model must
//!   consume all of stdin before writing its answer;
//! - stdout: `{"landmarks": [{"x": .., "y": .., "z": .., "visibility": ..}, ..]}`,
//!   with `null` or `[]` meaning no pose was found;
//! - exit status 0 on success. stderr is passed through to the terminal.

use std::ffi::OsString;
use std::io::{Cursor, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use image::{ImageFormat, RgbImage};
use log::{debug, warn};
use serde::Deserialize;

use super::{Landmark, PoseEstimator, PoseOptions};
use crate::error::PosemarkError;

/// Runs an external pose model once per image.
#[derive(Clone, Debug)]
pub struct CommandPoseEstimator {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandPoseEstimator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends arguments passed before the protocol flags.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command(&self, options: &PoseOptions) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if options.static_image_mode {
            cmd.arg("--static-image-mode");
        }
        cmd.arg("--min-detection-confidence")
            .arg(options.min_detection_confidence.to_string());
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl PoseEstimator for CommandPoseEstimator {
    fn estimate(
        &mut self,
        image: &RgbImage,
        options: &PoseOptions,
    ) -> Result<Option<Vec<Landmark>>, PosemarkError> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| PosemarkError::PoseBackend(format!("failed to encode frame: {e}")))?;

        let session = ModelSession::spawn(self.command(options), &self.program)?;
        let output = session.run(&png)?;
        debug!("pose model wrote {} bytes", output.len());
        parse_landmarks(&output)
    }

    fn describe(&self) -> String {
        format!("command `{}`", self.program.display())
    }
}

/// A running model process, killed and reaped when dropped unless it
/// already exited.
struct ModelSession {
    child: Child,
    program: PathBuf,
    reaped: bool,
}

impl ModelSession {
    fn spawn(mut cmd: Command, program: &Path) -> Result<Self, PosemarkError> {
        let child = cmd.spawn().map_err(|e| {
            PosemarkError::PoseBackend(format!("failed to start {}: {e}", program.display()))
        })?;
        Ok(Self {
            child,
            program: program.to_path_buf(),
            reaped: false,
        })
    }

    fn run(mut self, input: &[u8]) -> Result<Vec<u8>, PosemarkError> {
        {
            let mut stdin = self.child.stdin.take().ok_or_else(|| {
                PosemarkError::PoseBackend("model process has no stdin".to_string())
            })?;
            match stdin.write_all(input) {
                Ok(()) => {}
                // The exit status decides whether an early exit was a failure.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("pose model closed stdin early");
                }
                Err(e) => {
                    return Err(PosemarkError::PoseBackend(format!(
                        "failed to send image to model: {e}"
                    )));
                }
            }
        }

        let mut output = Vec::new();
        self.child
            .stdout
            .take()
            .ok_or_else(|| PosemarkError::PoseBackend("model process has no stdout".to_string()))?
            .read_to_end(&mut output)
            .map_err(|e| PosemarkError::PoseBackend(format!("failed to read model output: {e}")))?;

        let status = self.child.wait()?;
        self.reaped = true;
        if !status.success() {
            return Err(PosemarkError::PoseBackend(format!(
                "{} exited with {status}",
                self.program.display()
            )));
        }
        Ok(output)
    }
}

impl Drop for ModelSession {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        if let Err(e) = self.child.kill() {
            warn!("failed to stop pose model process: {e}");
        }
        let _ = self.child.wait();
    }
}

#[derive(Deserialize)]
struct BridgeOutput {
    #[serde(default)]
    landmarks: Option<Vec<Landmark>>,
}

/// Parses the model's stdout. `null` and `[]` both mean no pose.
pub fn parse_landmarks(bytes: &[u8]) -> Result<Option<Vec<Landmark>>, PosemarkError> {
    let out: BridgeOutput =
        serde_json::from_slice(bytes).map_err(|source| PosemarkError::PoseProtocol { source })?;
    Ok(out.landmarks.filter(|l| !l.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_landmark_list() {
        let json = br#"{"landmarks": [{"x": 0.25, "y": 0.5, "z": -0.1, "visibility": 0.9},
                                      {"x": 0.75, "y": 0.5}]}"#;
        let lms = parse_landmarks(json).unwrap().unwrap();
        assert_eq!(lms.len(), 2);
        assert_eq!(lms[0].visibility, 0.9);
        assert_eq!(lms[1].z, 0.0);
        assert_eq!(lms[1].visibility, 1.0);
    }

    #[test]
    fn null_empty_or_missing_landmarks_mean_no_pose() {
        assert!(parse_landmarks(br#"{"landmarks": null}"#).unwrap().is_none());
        assert!(parse_landmarks(br#"{"landmarks": []}"#).unwrap().is_none());
        assert!(parse_landmarks(b"{}").unwrap().is_none());
    }

    #[test]
    fn malformed_output_is_a_protocol_error() {
        let err = parse_landmarks(b"pose: none").unwrap_err();
        assert!(matches!(err, PosemarkError::PoseProtocol { .. }));
    }

    #[test]
    fn protocol_flags_follow_configured_args() {
        let est = CommandPoseEstimator::new("pose-model").with_args(["--model", "heavy"]);
        let cmd = est.command(&PoseOptions::default());
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "--model",
                "heavy",
                "--static-image-mode",
                "--min-detection-confidence",
                "0.5"
            ]
        );
    }

    #[test]
    fn missing_program_is_a_backend_error() {
        let mut est = CommandPoseEstimator::new("/nonexistent/posemark-model");
        let err = est
            .estimate(&RgbImage::new(4, 4), &PoseOptions::default())
            .unwrap_err();
        assert!(matches!(err, PosemarkError::PoseBackend(_)));
    }
}
