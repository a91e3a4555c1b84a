use std::process::Command;

use url::Url;

use crate::error::LinkError;

pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &Url) -> Result<(), LinkError>;
}

/// Hands urls to the desktop's default handler.
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &Url) -> Result<(), LinkError> {
        let launch_error = |source: std::io::Error| LinkError::Launch { url: url.to_string(), source };

        let status = launch_command(url.as_str())
            .status()
            .map_err(launch_error)?;

        if !status.success() {
            let message = format!("opener exited with {status}");
            return Err(launch_error(std::io::Error::new(std::io::ErrorKind::Other, message)));
        }

        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn launch_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn launch_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launch_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
