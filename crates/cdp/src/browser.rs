//! Browser session handle: process + browser-level connection + page reuse.

use std::time::Duration;

use serde_json::json;

use crate::connection::Connection;
use crate::endpoint::fetch_targets;
use crate::error::{CdpError, Result};
use crate::launcher::{BrowserProcess, LaunchConfig};
use crate::page::Page;

const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// One live browser session.
///
/// Owns the spawned process and a connection to the browser-level DevTools
/// target. Dropping the session kills the process; [`Browser::close`] is the
/// graceful path.
pub struct Browser {
	process: BrowserProcess,
	connection: Connection,
}

impl Browser {
	/// Launches a browser per `config` and connects to its DevTools endpoint.
	pub async fn launch(config: &LaunchConfig) -> Result<Self> {
		let process = BrowserProcess::launch(config).await?;
		let ws_url = process.version().web_socket_debugger_url.clone();
		let connection = Connection::connect(&ws_url).await?;
		Ok(Self { process, connection })
	}

	/// Default user agent reported by the browser, when the endpoint exposed it.
	pub fn user_agent(&self) -> Option<&str> {
		self.process.version().user_agent.as_deref()
	}

	/// Attaches to the browser's initial page target.
	///
	/// The startup tab is reused rather than opening a second one, so the
	/// profile's window count stays at one across headless and interactive
	/// launches.
	pub async fn initial_page(&self) -> Result<Page> {
		let targets = fetch_targets(self.process.port()).await?;
		let target = targets
			.into_iter()
			.find(|target| target.is_page() && target.web_socket_debugger_url.is_some())
			.ok_or(CdpError::NoPageTarget)?;
		// Presence checked above.
		let ws_url = target.web_socket_debugger_url.ok_or(CdpError::NoPageTarget)?;
		Page::attach(&ws_url).await
	}

	/// Resolves when the browser process exits (e.g. the operator closed the
	/// visible window).
	pub async fn wait_disconnected(&mut self) -> Result<()> {
		self.process.wait_exit().await
	}

	/// Asks the browser to shut down, then makes sure the process is gone.
	pub async fn close(mut self) -> Result<()> {
		let closed = self
			.connection
			.send_with_timeout("Browser.close", json!({}), CLOSE_GRACE)
			.await;
		if let Err(e) = closed {
			tracing::debug!(target = "livechat.cdp", error = %e, "graceful close failed, killing");
		}
		let wait = tokio::time::timeout(CLOSE_GRACE, self.process.wait_exit()).await;
		if wait.is_err() {
			self.process.kill();
		}
		Ok(())
	}
}
