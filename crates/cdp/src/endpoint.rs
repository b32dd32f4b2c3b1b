//! DevTools HTTP endpoint probing (`/json/version`, `/json/list`).

use std::time::Duration;

use serde::Deserialize;

use crate::error::{CdpError, Result};

/// `/json/version` response subset.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
	#[serde(rename = "webSocketDebuggerUrl")]
	pub web_socket_debugger_url: String,
	#[serde(rename = "Browser")]
	pub browser: Option<String>,
	#[serde(rename = "User-Agent")]
	pub user_agent: Option<String>,
}

/// One entry of the `/json/list` target inventory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub url: String,
	pub web_socket_debugger_url: Option<String>,
}

impl TargetInfo {
	pub fn is_page(&self) -> bool {
		self.kind == "page"
	}
}

fn probe_client() -> Result<reqwest::Client> {
	reqwest::Client::builder()
		.timeout(Duration::from_millis(400))
		.build()
		.map_err(CdpError::Http)
}

/// Resolves version metadata from `/json/version` on `port`.
pub async fn fetch_version(port: u16) -> Result<VersionInfo> {
	let client = probe_client()?;
	let mut last_error = "no response".to_string();

	for url in [
		format!("http://127.0.0.1:{port}/json/version"),
		format!("http://localhost:{port}/json/version"),
		format!("http://[::1]:{port}/json/version"),
	] {
		let response = match client.get(&url).send().await {
			Ok(response) => response,
			Err(e) => {
				last_error = e.to_string();
				continue;
			}
		};

		if !response.status().is_success() {
			last_error = format!("unexpected status {}", response.status());
			continue;
		}

		return Ok(response.json().await?);
	}

	Err(CdpError::Protocol(format!("DevTools endpoint unreachable on port {port}: {last_error}")))
}

/// Lists debuggable targets from `/json/list` on `port`.
pub async fn fetch_targets(port: u16) -> Result<Vec<TargetInfo>> {
	let client = probe_client()?;
	let url = format!("http://127.0.0.1:{port}/json/list");
	let response = client.get(&url).send().await?;
	if !response.status().is_success() {
		return Err(CdpError::Protocol(format!(
			"target listing failed on port {port}: status {}",
			response.status()
		)));
	}
	Ok(response.json().await?)
}
