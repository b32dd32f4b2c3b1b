//! Chat observer installation with bounded container-presence polling.

use std::time::Duration;

use livechat_cdp::Page;
use tracing::{debug, info};

use crate::error::{LiveError, Result};
use crate::platform::PlatformDom;
use crate::script::observer_js;

const CONTAINER_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Installs the chat MutationObserver on the page.
///
/// The container renders client-side, possibly seconds after navigation, so
/// the install expression is polled once per second for `wait`. If the
/// container never appears this fails loudly naming the selector; a feed
/// that silently produces nothing is indistinguishable from a quiet room.
pub async fn install_observer(page: &Page, dom: &PlatformDom, wait: Duration) -> Result<()> {
	let script = observer_js(dom);
	let attempts = wait.as_secs().max(1);

	for attempt in 1..=attempts {
		match page.evaluate_bool(&script).await {
			Ok(true) => {
				info!(target = "livechat.extract", attempt, "chat observer installed");
				return Ok(());
			}
			Ok(false) => {
				debug!(target = "livechat.extract", attempt, "chat container not rendered yet");
			}
			Err(e) => {
				debug!(target = "livechat.extract", attempt, error = %e, "observer install attempt failed");
			}
		}
		tokio::time::sleep(CONTAINER_POLL_INTERVAL).await;
	}

	Err(LiveError::ContainerNotFound {
		selector: dom.container.to_string(),
		waited: wait,
	})
}
