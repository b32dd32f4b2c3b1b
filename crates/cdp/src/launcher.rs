//! Browser process launch with remote debugging enabled.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use crate::endpoint::{VersionInfo, fetch_version};
use crate::error::{CdpError, Result};
use crate::finder::find_browser_executable;

const ENDPOINT_POLL_INTERVAL: Duration = Duration::from_millis(200);
const ENDPOINT_POLL_ATTEMPTS: u32 = 25;

/// How a browser process should be launched.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
	/// Explicit executable path; discovered via [`find_browser_executable`] when unset.
	pub executable: Option<PathBuf>,
	/// Persisted profile directory, shared across launches.
	pub profile_dir: PathBuf,
	/// DevTools port; `0` picks a free ephemeral port.
	pub port: u16,
	pub headless: bool,
	pub window_size: (u32, u32),
}

impl LaunchConfig {
	pub fn new(profile_dir: impl Into<PathBuf>) -> Self {
		Self {
			executable: None,
			profile_dir: profile_dir.into(),
			port: 0,
			headless: true,
			window_size: (1920, 1080),
		}
	}
}

/// A spawned browser process plus the DevTools endpoint it answered on.
pub struct BrowserProcess {
	child: Child,
	port: u16,
	version: VersionInfo,
}

impl BrowserProcess {
	/// Spawns the browser and waits until its DevTools endpoint is reachable.
	pub async fn launch(config: &LaunchConfig) -> Result<Self> {
		let executable = match &config.executable {
			Some(path) => path.to_string_lossy().to_string(),
			None => find_browser_executable().ok_or(CdpError::NoExecutable)?,
		};
		let port = if config.port == 0 { pick_free_port()? } else { config.port };

		std::fs::create_dir_all(&config.profile_dir)?;

		let (width, height) = config.window_size;
		let mut args = vec![
			format!("--remote-debugging-port={port}"),
			format!("--user-data-dir={}", config.profile_dir.display()),
			format!("--window-size={width},{height}"),
			"--no-first-run".to_string(),
			"--no-default-browser-check".to_string(),
		];
		if config.headless {
			args.push("--headless=new".to_string());
		}

		let mut command = Command::new(&executable);
		command.args(&args).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

		#[cfg(unix)]
		std::os::unix::process::CommandExt::process_group(&mut command, 0);

		tracing::info!(
			target = "livechat.cdp",
			%executable,
			port,
			headless = config.headless,
			profile = %config.profile_dir.display(),
			"launching browser"
		);

		let mut child = command
			.spawn()
			.map_err(|e| CdpError::Launch(format!("failed to spawn {executable}: {e}")))?;

		let mut last_error = "endpoint not reachable".to_string();
		for _ in 0..ENDPOINT_POLL_ATTEMPTS {
			tokio::time::sleep(ENDPOINT_POLL_INTERVAL).await;

			if let Ok(Some(status)) = child.try_wait() {
				return Err(CdpError::Launch(format!(
					"browser exited before the debugging endpoint came up (status: {status})"
				)));
			}

			match fetch_version(port).await {
				Ok(version) => {
					return Ok(Self { child, port, version });
				}
				Err(e) => {
					last_error = e.to_string();
				}
			}
		}

		let _ = child.kill();
		Err(CdpError::Launch(format!(
			"browser launched but the debugging endpoint never became reachable on port {port}: {last_error}"
		)))
	}

	pub fn port(&self) -> u16 {
		self.port
	}

	pub fn version(&self) -> &VersionInfo {
		&self.version
	}

	/// Blocks (cooperatively) until the process exits. The exit of a visible
	/// session is how a human operator signals "login done".
	pub async fn wait_exit(&mut self) -> Result<()> {
		loop {
			if self.child.try_wait()?.is_some() {
				return Ok(());
			}
			tokio::time::sleep(Duration::from_millis(500)).await;
		}
	}

	/// Force-terminates the process if it is still running.
	pub fn kill(&mut self) {
		if matches!(self.child.try_wait(), Ok(None)) {
			let _ = self.child.kill();
			let _ = self.child.wait();
		}
	}
}

impl Drop for BrowserProcess {
	fn drop(&mut self) {
		self.kill();
	}
}

fn pick_free_port() -> Result<u16> {
	let listener = std::net::TcpListener::bind(("127.0.0.1", 0))?;
	Ok(listener.local_addr()?.port())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn free_port_is_bindable_after_release() {
		let port = pick_free_port().unwrap();
		assert_ne!(port, 0);
		assert!(std::net::TcpListener::bind(("127.0.0.1", port)).is_ok());
	}

	#[test]
	fn launch_config_defaults_are_headless_ephemeral() {
		let profile = tempfile::tempdir().unwrap();
		let config = LaunchConfig::new(profile.path());
		assert!(config.headless);
		assert_eq!(config.port, 0);
		assert_eq!(config.window_size, (1920, 1080));
		assert!(config.executable.is_none());
	}
}
