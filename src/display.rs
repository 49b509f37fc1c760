//! Showing the annotated result to the user.
//!
//! Display is an external collaborator: [`SystemViewer`] hands the saved file
//! to the desktop's default image viewer and then blocks until the user
//! presses Enter in the terminal.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use log::{debug, warn};

use crate::error::PosemarkError;

/// Title shown alongside the result.
pub const WINDOW_TITLE: &str = "Pose Detection";

/// Shows an annotated image and waits for the user to dismiss it.
pub trait Viewer {
    fn show(&mut self, title: &str, image_path: &Path) -> Result<(), PosemarkError>;
}

/// Opens the image with the platform viewer, then waits for Enter on stdin.
#[derive(Debug, Default)]
pub struct SystemViewer;

impl SystemViewer {
    fn open_command(path: &Path) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(path);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }
}

impl Viewer for SystemViewer {
    fn show(&mut self, title: &str, image_path: &Path) -> Result<(), PosemarkError> {
        let mut cmd = Self::open_command(image_path);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        debug!("opening {} with {:?}", image_path.display(), cmd.get_program());
        // A missing viewer only warns.
        let opener = match cmd.spawn() {
            Ok(child) => Some(child),
            Err(e) => {
                warn!("could not open an image viewer: {e}");
                None
            }
        };

        let waited = wait_for_enter(title, image_path);

        if let Some(child) = opener {
            match close_opener(child) {
                Ok(status) => debug!("image opener finished with {status}"),
                Err(e) => warn!("could not reap image opener: {e}"),
            }
        }
        waited.map_err(|e| PosemarkError::Display(e.to_string()))
    }
}

/// Shows nothing; used for `--no-display`.
#[derive(Debug, Default)]
pub struct NoViewer;

impl Viewer for NoViewer {
    fn show(&mut self, _title: &str, _image_path: &Path) -> Result<(), PosemarkError> {
        Ok(())
    }
}

fn wait_for_enter(title: &str, image_path: &Path) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(
        stdout,
        "{title}: {} (press Enter to close)",
        image_path.display()
    )?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    println!();
    Ok(())
}

/// Stops the opener if it is still running and reaps it.
fn close_opener(mut child: Child) -> io::Result<ExitStatus> {
    if let Some(status) = child.try_wait()? {
        return Ok(status);
    }
    child.kill()?;
    child.wait()
}
