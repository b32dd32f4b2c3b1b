//! Chat event shape, candidate classification, and the noise filter.

use serde::{Deserialize, Serialize};

use crate::platform::PlatformDom;

/// Console-text prefix marking a payload as ours. Everything else on the
/// page's console channel is discarded.
pub const CHAT_MARKER: &str = "livechat#";

/// Substring marking a gift notification rendered into the chat feed.
pub const GIFT_MARKER: &str = "送出了 ×";

/// One genuine chat line. Value equality only; never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEvent {
	pub username: String,
	pub message: String,
}

/// Raw fields as extracted in page context, before normalization.
#[derive(Debug, Deserialize)]
struct RawChat {
	username: String,
	message: String,
}

/// Outcome of classifying one extracted candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
	/// Passed every filter; emit it.
	Chat(ChatEvent),
	/// A gift notification or an @-mention line; drop silently.
	Noise,
	/// Unparseable payload or empty fields; drop and count.
	Malformed,
}

/// True when the message text denotes a non-chat system event: a gift
/// notification, or a line addressed at another viewer via `@`.
pub fn is_noise(message: &str) -> bool {
	message.contains(GIFT_MARKER) || message.starts_with('@')
}

/// Classifies a marker-stripped payload into chat, noise, or malformed.
pub fn classify(dom: &PlatformDom, payload: &str) -> Candidate {
	let raw: RawChat = match serde_json::from_str(payload) {
		Ok(raw) => raw,
		Err(_) => return Candidate::Malformed,
	};

	let mut username = raw.username.trim().to_string();
	if dom.strip_username_separator {
		username = username.trim_end_matches(['：', ':']).trim_end().to_string();
	}
	let message = raw.message.trim().to_string();

	if username.is_empty() || message.is_empty() {
		return Candidate::Malformed;
	}
	if is_noise(&message) {
		return Candidate::Noise;
	}

	Candidate::Chat(ChatEvent { username, message })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::platform::PlatformDom;
	use crate::target::Platform;

	fn douyin() -> &'static PlatformDom {
		PlatformDom::of(Platform::Douyin)
	}

	fn tiktok() -> &'static PlatformDom {
		PlatformDom::of(Platform::Tiktok)
	}

	#[test]
	fn gift_notification_is_noise() {
		assert!(is_noise("送出了 ×3"));
		assert!(is_noise("某人 送出了 ×5"));
	}

	#[test]
	fn mention_prefix_is_noise() {
		assert!(is_noise("@bob hi"));
		assert!(!is_noise("hi @bob"));
	}

	#[test]
	fn plain_chat_line_passes() {
		let candidate = classify(tiktok(), r#"{"username":"alice","message":"hello"}"#);
		assert_eq!(
			candidate,
			Candidate::Chat(ChatEvent {
				username: "alice".to_string(),
				message: "hello".to_string(),
			})
		);
	}

	#[test]
	fn gift_and_mention_candidates_never_become_events() {
		assert_eq!(classify(douyin(), r#"{"username":"a","message":"送出了 ×5"}"#), Candidate::Noise);
		assert_eq!(classify(douyin(), r#"{"username":"a","message":"@bob hi"}"#), Candidate::Noise);
	}

	#[test]
	fn douyin_username_separator_is_stripped() {
		let candidate = classify(douyin(), r#"{"username":"小明：","message":"大家好"}"#);
		assert_eq!(
			candidate,
			Candidate::Chat(ChatEvent {
				username: "小明".to_string(),
				message: "大家好".to_string(),
			})
		);
	}

	#[test]
	fn tiktok_username_keeps_trailing_colon() {
		let candidate = classify(tiktok(), r#"{"username":"bob:","message":"yo"}"#);
		assert_eq!(
			candidate,
			Candidate::Chat(ChatEvent {
				username: "bob:".to_string(),
				message: "yo".to_string(),
			})
		);
	}

	#[test]
	fn unparseable_and_empty_candidates_are_malformed() {
		assert_eq!(classify(tiktok(), "not json"), Candidate::Malformed);
		assert_eq!(classify(tiktok(), r#"{"username":"","message":"hi"}"#), Candidate::Malformed);
		assert_eq!(classify(douyin(), r#"{"username":"：","message":"hi"}"#), Candidate::Malformed);
	}

	#[test]
	fn event_serializes_to_the_output_record_shape() {
		let event = ChatEvent {
			username: "alice".to_string(),
			message: "hello".to_string(),
		};
		assert_eq!(serde_json::to_string(&event).unwrap(), r#"{"username":"alice","message":"hello"}"#);
	}
}
