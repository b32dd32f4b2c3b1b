//! Session acquisition state machine.
//!
//! Probes a headless session against the persisted profile first; only when
//! the viewer turns out to be logged out does it fall back to a visible
//! session for manual login, relaunch headless, and re-probe. Most runs
//! reuse an already-authenticated profile and never show a window.
//!
//! The browser side sits behind [`SessionBackend`] so the machine is
//! exercisable without a browser.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{LiveError, Result};

/// Browser operations the acquisition machine needs.
#[async_trait]
pub trait SessionBackend {
	type Session: Send;

	/// Launches a session (headless or visible) already navigated to the
	/// stream target.
	async fn launch(&mut self, headless: bool) -> Result<Self::Session>;

	/// True when the page's DOM shows the viewer as logged in. Implementations
	/// poll up to their readiness deadline before answering `false`.
	async fn probe_login(&mut self, session: &Self::Session) -> Result<bool>;

	/// Releases a session and all its resources.
	async fn close(&mut self, session: Self::Session) -> Result<()>;

	/// Resolves when the session's browser process has exited. Consumes the
	/// session: a disconnected browser has nothing left to release.
	async fn wait_disconnected(&mut self, session: Self::Session) -> Result<()>;
}

/// Drives `ProbingHeadless → {Authenticated, NeedsLogin} → InteractiveWait →
/// Relaunching → Ready`.
pub struct SessionController<B: SessionBackend> {
	backend: B,
	/// Pause between the login window closing and the headless relaunch.
	login_settle: Duration,
	/// Interactive rounds to allow before giving up on login.
	max_login_rounds: u32,
}

impl<B: SessionBackend> SessionController<B> {
	pub fn new(backend: B, login_settle: Duration, max_login_rounds: u32) -> Self {
		Self {
			backend,
			login_settle,
			max_login_rounds,
		}
	}

	/// Runs the machine to `Ready` and hands back the live session.
	///
	/// Any launch/navigation/evaluation failure is fatal; there is no retry
	/// below the login loop. Exactly one session is live at any point.
	pub async fn acquire(mut self) -> Result<B::Session> {
		let session = self.backend.launch(true).await?;
		if self.backend.probe_login(&session).await? {
			info!(target = "livechat.session", "profile already authenticated");
			return Ok(session);
		}

		let mut session = session;
		for round in 1..=self.max_login_rounds {
			self.backend.close(session).await?;

			info!(
				target = "livechat.session",
				round, "not logged in; opening a visible window for manual login"
			);
			let visible = self.backend.launch(false).await?;
			self.backend.wait_disconnected(visible).await?;
			tokio::time::sleep(self.login_settle).await;

			session = self.backend.launch(true).await?;
			if self.backend.probe_login(&session).await? {
				info!(target = "livechat.session", round, "login completed");
				return Ok(session);
			}
			warn!(
				target = "livechat.session",
				round, "window closed but still not logged in"
			);
		}

		self.backend.close(session).await?;
		Err(LiveError::LoginTimeout {
			rounds: self.max_login_rounds,
		})
	}
}

#[cfg(test)]
mod tests {
	use std::collections::VecDeque;

	use super::*;

	/// Scripted backend: answers probes from a queue and records the launch
	/// sequence.
	struct FakeBackend {
		probes: VecDeque<bool>,
		launches: Vec<bool>,
		closed: u32,
		disconnect_waits: u32,
	}

	impl FakeBackend {
		fn new(probes: &[bool]) -> Self {
			Self {
				probes: probes.iter().copied().collect(),
				launches: Vec::new(),
				closed: 0,
				disconnect_waits: 0,
			}
		}
	}

	#[async_trait]
	impl SessionBackend for &mut FakeBackend {
		type Session = u32;

		async fn launch(&mut self, headless: bool) -> Result<u32> {
			self.launches.push(headless);
			Ok(self.launches.len() as u32)
		}

		async fn probe_login(&mut self, _session: &u32) -> Result<bool> {
			Ok(self.probes.pop_front().unwrap_or(false))
		}

		async fn close(&mut self, _session: u32) -> Result<()> {
			self.closed += 1;
			Ok(())
		}

		async fn wait_disconnected(&mut self, _session: u32) -> Result<()> {
			self.disconnect_waits += 1;
			Ok(())
		}
	}

	fn controller(backend: &mut FakeBackend) -> SessionController<&mut FakeBackend> {
		SessionController::new(backend, Duration::from_millis(0), 3)
	}

	#[tokio::test]
	async fn authenticated_profile_never_opens_a_window() {
		let mut backend = FakeBackend::new(&[true]);
		controller(&mut backend).acquire().await.unwrap();

		assert_eq!(backend.launches, vec![true]);
		assert_eq!(backend.closed, 0);
		assert_eq!(backend.disconnect_waits, 0);
	}

	#[tokio::test]
	async fn logged_out_profile_runs_one_interactive_round() {
		let mut backend = FakeBackend::new(&[false, true]);
		controller(&mut backend).acquire().await.unwrap();

		// headless probe, visible login, headless relaunch
		assert_eq!(backend.launches, vec![true, false, true]);
		assert_eq!(backend.closed, 1);
		assert_eq!(backend.disconnect_waits, 1);
	}

	#[tokio::test]
	async fn ready_only_after_disconnect_signal() {
		let mut backend = FakeBackend::new(&[false, true]);
		controller(&mut backend).acquire().await.unwrap();
		// The visible session was awaited, not closed by us.
		assert_eq!(backend.disconnect_waits, 1);
	}

	#[tokio::test]
	async fn abandoned_login_loops_then_fails() {
		let mut backend = FakeBackend::new(&[false, false, false, false]);
		let err = controller(&mut backend).acquire().await.unwrap_err();

		assert!(matches!(err, LiveError::LoginTimeout { rounds: 3 }));
		// Initial probe launch plus one visible + one headless per round.
		assert_eq!(backend.launches, vec![true, false, true, false, true, false, true]);
		assert_eq!(backend.disconnect_waits, 3);
		// Every headless session was released, including the last one.
		assert_eq!(backend.closed, 4);
	}
}
