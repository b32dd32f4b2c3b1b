//! Stream target resolution: platform + room identifier to a live-room URI.

use clap::ValueEnum;

/// Supported livestreaming platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
	Douyin,
	Tiktok,
}

impl std::fmt::Display for Platform {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Platform::Douyin => write!(f, "douyin"),
			Platform::Tiktok => write!(f, "tiktok"),
		}
	}
}

/// The one room this process captures. Immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTarget {
	pub platform: Platform,
	pub room: String,
}

impl StreamTarget {
	pub fn new(platform: Platform, room: impl Into<String>) -> Self {
		Self {
			platform,
			room: room.into(),
		}
	}

	/// Canonical live-room URI for the target.
	///
	/// The room identifier is passed through unescaped; it is the operator's
	/// input and the platforms 404 on junk.
	pub fn room_uri(&self) -> String {
		match self.platform {
			Platform::Douyin => format!("https://live.douyin.com/{}", self.room),
			Platform::Tiktok => format!("https://www.tiktok.com/@{}/live", self.room),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn douyin_uri_has_platform_prefix_and_verbatim_room() {
		let target = StreamTarget::new(Platform::Douyin, "123456");
		assert_eq!(target.room_uri(), "https://live.douyin.com/123456");
	}

	#[test]
	fn tiktok_uri_wraps_handle_in_live_path() {
		let target = StreamTarget::new(Platform::Tiktok, "somecreator");
		assert_eq!(target.room_uri(), "https://www.tiktok.com/@somecreator/live");
	}

	#[test]
	fn room_passes_through_unescaped() {
		// Injection-shaped input surface: deliberately not sanitized.
		let target = StreamTarget::new(Platform::Douyin, "../other?x=1");
		assert_eq!(target.room_uri(), "https://live.douyin.com/../other?x=1");
	}

	#[test]
	fn resolution_is_idempotent() {
		let target = StreamTarget::new(Platform::Tiktok, "abc");
		assert_eq!(target.room_uri(), target.room_uri());
	}
}
