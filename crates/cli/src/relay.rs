//! Event relay: page console channel to stdout, one JSON line per chat event.
//!
//! This is the only place chat events cross the page/host boundary. Only
//! `log`-level messages carrying the chat marker are considered; everything
//! else on the console channel is discarded. Emission order equals the
//! page's emission order, which equals DOM insertion order.

use std::io::Write;

use livechat_cdp::{ConsoleEvents, ConsoleMessage};
use tracing::{debug, info};

use crate::chat::{CHAT_MARKER, Candidate, classify};
use crate::error::{LiveError, Result};
use crate::platform::PlatformDom;

pub struct Relay<'a, W: Write> {
	dom: &'a PlatformDom,
	out: W,
	accepted: u64,
	malformed: u64,
}

impl<'a, W: Write> Relay<'a, W> {
	pub fn new(dom: &'a PlatformDom, out: W) -> Self {
		Self {
			dom,
			out,
			accepted: 0,
			malformed: 0,
		}
	}

	/// Processes one console message; writes at most one output line.
	pub fn handle(&mut self, message: &ConsoleMessage) -> Result<()> {
		if message.level != "log" {
			return Ok(());
		}
		let Some(payload) = message.text.strip_prefix(CHAT_MARKER) else {
			return Ok(());
		};

		match classify(self.dom, payload) {
			Candidate::Chat(event) => {
				writeln!(self.out, "{}", serde_json::to_string(&event)?)?;
				self.out.flush()?;
				self.accepted += 1;
			}
			Candidate::Noise => {}
			Candidate::Malformed => {
				self.malformed += 1;
				debug!(target = "livechat.relay", payload, "skipping malformed candidate");
			}
		}
		Ok(())
	}

	/// Drains the console stream until the browser disconnects.
	pub async fn run(mut self, events: &mut ConsoleEvents) -> Result<()> {
		while let Some(message) = events.recv().await {
			self.handle(&message)?;
		}
		info!(
			target = "livechat.relay",
			accepted = self.accepted,
			malformed = self.malformed,
			"console stream ended"
		);
		Err(LiveError::Disconnected)
	}
}

#[cfg(test)]
mod tests {
	use livechat_cdp::ConsoleMessage;

	use super::*;
	use crate::chat::CHAT_MARKER;
	use crate::platform::PlatformDom;
	use crate::target::Platform;

	fn log(text: String) -> ConsoleMessage {
		ConsoleMessage {
			level: "log".to_string(),
			text,
		}
	}

	fn chat(username: &str, message: &str) -> ConsoleMessage {
		log(format!(r#"{CHAT_MARKER}{{"username":"{username}","message":"{message}"}}"#))
	}

	fn relay_output(platform: Platform, messages: &[ConsoleMessage]) -> String {
		let dom = PlatformDom::of(platform);
		let mut out = Vec::new();
		let mut relay = Relay::new(dom, &mut out);
		for message in messages {
			relay.handle(message).unwrap();
		}
		String::from_utf8(out).unwrap()
	}

	#[test]
	fn accepted_event_is_one_json_line() {
		let output = relay_output(Platform::Tiktok, &[chat("alice", "hello")]);
		assert_eq!(output, "{\"username\":\"alice\",\"message\":\"hello\"}\n");
	}

	#[test]
	fn non_log_levels_and_unmarked_text_are_discarded() {
		let output = relay_output(
			Platform::Tiktok,
			&[
				ConsoleMessage {
					level: "warning".to_string(),
					text: format!(r#"{CHAT_MARKER}{{"username":"a","message":"b"}}"#),
				},
				log("[vite] hot update".to_string()),
				log(r#"{"username":"a","message":"b"}"#.to_string()),
			],
		);
		assert!(output.is_empty());
	}

	#[test]
	fn noise_candidates_produce_no_output() {
		let output = relay_output(
			Platform::Douyin,
			&[chat("a", "送出了 ×5"), chat("b", "@bob hi")],
		);
		assert!(output.is_empty());
	}

	#[test]
	fn order_is_preserved_and_duplicates_pass_through() {
		let output = relay_output(
			Platform::Douyin,
			&[
				chat("a", "first"),
				chat("b", "second"),
				chat("a", "first"),
			],
		);
		let lines: Vec<&str> = output.lines().collect();
		assert_eq!(lines.len(), 3);
		assert!(lines[0].contains("first"));
		assert!(lines[1].contains("second"));
		assert_eq!(lines[0], lines[2]);
	}

	#[test]
	fn malformed_payload_is_counted_not_fatal() {
		let dom = PlatformDom::of(Platform::Tiktok);
		let mut out = Vec::new();
		let mut relay = Relay::new(dom, &mut out);
		relay.handle(&log(format!("{CHAT_MARKER}not json"))).unwrap();
		relay.handle(&chat("alice", "still works")).unwrap();
		assert_eq!(relay.malformed, 1);
		assert_eq!(relay.accepted, 1);
	}
}
