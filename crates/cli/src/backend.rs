//! DevTools-backed implementation of the session backend.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use livechat_cdp::{Browser, LaunchConfig, Page};
use tracing::debug;

use crate::error::{LiveError, Result};
use crate::platform::PlatformDom;
use crate::script::login_probe_js;
use crate::session::SessionBackend;
use crate::target::StreamTarget;

const PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// A live browser + page pair driving the stream.
pub struct CdpSession {
	pub browser: Browser,
	pub page: Page,
}

/// Launches real browser sessions against one persisted profile directory.
pub struct CdpBackend {
	uri: String,
	login_probe: String,
	profile_dir: PathBuf,
	port: u16,
	/// Deadline for the login probe after navigation; rendering is
	/// client-side, so the probe polls rather than sleeping once.
	probe_deadline: Duration,
}

impl CdpBackend {
	pub fn new(
		target: &StreamTarget,
		dom: &PlatformDom,
		profile_dir: PathBuf,
		port: u16,
		probe_deadline: Duration,
	) -> Self {
		Self {
			uri: target.room_uri(),
			login_probe: login_probe_js(dom),
			profile_dir,
			port,
			probe_deadline,
		}
	}
}

#[async_trait]
impl SessionBackend for CdpBackend {
	type Session = CdpSession;

	async fn launch(&mut self, headless: bool) -> Result<CdpSession> {
		let mut config = LaunchConfig::new(&self.profile_dir);
		config.port = self.port;
		config.headless = headless;

		let browser = Browser::launch(&config).await?;
		let page = browser.initial_page().await?;

		// Headless builds advertise themselves in the UA; live pages treat
		// that as a bot signal.
		if let Some(user_agent) = browser.user_agent() {
			let user_agent = user_agent.replace("HeadlessChrome", "Chrome");
			page.set_user_agent(&user_agent).await?;
		}

		page.navigate(&self.uri).await.map_err(|e| LiveError::Navigation {
			url: self.uri.clone(),
			source: anyhow::Error::new(e),
		})?;

		Ok(CdpSession { browser, page })
	}

	async fn probe_login(&mut self, session: &CdpSession) -> Result<bool> {
		let deadline = Instant::now() + self.probe_deadline;
		loop {
			// Evaluation can race client-side rendering; a failed probe is
			// "not ready yet", not fatal.
			match session.page.evaluate_bool(&self.login_probe).await {
				Ok(true) => return Ok(true),
				Ok(false) => {}
				Err(e) => debug!(target = "livechat.session", error = %e, "login probe not ready"),
			}
			if Instant::now() >= deadline {
				return Ok(false);
			}
			tokio::time::sleep(PROBE_INTERVAL).await;
		}
	}

	async fn close(&mut self, session: CdpSession) -> Result<()> {
		session.browser.close().await?;
		Ok(())
	}

	async fn wait_disconnected(&mut self, session: CdpSession) -> Result<()> {
		let CdpSession { mut browser, page } = session;
		drop(page);
		browser.wait_disconnected().await?;
		Ok(())
	}
}
