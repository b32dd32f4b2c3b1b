//! End-to-end capture flow: target → session acquisition → observer →
//! relay.

use std::time::Duration;

use tracing::info;

use crate::backend::CdpBackend;
use crate::cli::Cli;
use crate::error::Result;
use crate::extract::install_observer;
use crate::platform::PlatformDom;
use crate::relay::Relay;
use crate::session::SessionController;
use crate::target::StreamTarget;

/// Interactive login rounds to allow before giving up.
const MAX_LOGIN_ROUNDS: u32 = 3;
/// How long to wait for the chat container to render.
const CONTAINER_WAIT: Duration = Duration::from_secs(30);

pub async fn run(cli: Cli) -> Result<()> {
	let target = StreamTarget::new(cli.kind, cli.room);
	let dom = PlatformDom::of(target.platform);
	info!(
		target = "livechat",
		platform = %target.platform,
		uri = %target.room_uri(),
		"capturing live chat"
	);

	let backend = CdpBackend::new(
		&target,
		dom,
		cli.profile_dir,
		cli.port,
		Duration::from_secs(cli.settle_secs),
	);
	let controller = SessionController::new(
		backend,
		Duration::from_secs(cli.login_settle_secs),
		MAX_LOGIN_ROUNDS,
	);
	let session = controller.acquire().await?;

	// Subscribe before installing so no early event is lost.
	let mut events = session.page.console_events().await;
	install_observer(&session.page, dom, CONTAINER_WAIT).await?;

	// Runs until the browser goes away; the session handle stays alive for
	// exactly that long.
	Relay::new(dom, std::io::stdout()).run(&mut events).await
}
