//! Per-platform DOM contracts.
//!
//! The two platforms render structurally different chat feeds, so each gets
//! one profile with the selector chains for its containers and fields.
//! Selected once at startup; never branched on inline elsewhere. The
//! selector strings are an unstable external contract with the platform
//! front ends and are kept literal on purpose.

use crate::target::Platform;

/// Structural description of one platform's live-room DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDom {
	/// Path to the chat-message container node.
	pub container: &'static str,
	/// Element that only exists when the viewer is logged in.
	pub login_probe: &'static str,
	/// Attribute (name, value) marking a child as a chat message. Platforms
	/// whose container holds only message-shaped children have none.
	pub candidate_marker: Option<(&'static str, &'static str)>,
	/// Username field within a chat node.
	pub username: &'static str,
	/// Message-text field within a chat node.
	pub message: &'static str,
	/// Whether the username field carries a trailing colon-like separator.
	pub strip_username_separator: bool,
}

const DOUYIN: PlatformDom = PlatformDom {
	container: "main > div:nth-of-type(3) > div > div:nth-of-type(2) > div > \
	            div:nth-of-type(2) > div:nth-of-type(2) > div > div > div > div > \
	            div > div > div",
	login_probe: "#douyin-header > header > div:nth-of-type(2) > div:nth-of-type(2) > \
	              div > div > div > div:nth-of-type(6) > div > a",
	candidate_marker: None,
	username: "div > span:nth-of-type(2)",
	message: "div > span:nth-of-type(3) > span",
	strip_username_separator: true,
};

const TIKTOK: PlatformDom = PlatformDom {
	container: "main > div:nth-of-type(2) > div:nth-of-type(2) > div > div > \
	            div > div:nth-of-type(2) > div > div > div:nth-of-type(2) > div > \
	            div:nth-of-type(2) > div:nth-of-type(2)",
	login_probe: "main > div > div > div:nth-of-type(3) > div:nth-of-type(5)",
	candidate_marker: Some(("data-e2e", "chat-message")),
	username: "div:nth-of-type(2) > div > span",
	message: "div:nth-of-type(2) > span",
	strip_username_separator: false,
};

impl PlatformDom {
	/// Profile for `platform`; tagged-variant dispatch, resolved once.
	pub fn of(platform: Platform) -> &'static PlatformDom {
		match platform {
			Platform::Douyin => &DOUYIN,
			Platform::Tiktok => &TIKTOK,
		}
	}
}
