//! Host-side pipeline scenarios: console traffic in, stdout records out.

use livechat_cdp::ConsoleMessage;
use livechat_cli::chat::CHAT_MARKER;
use livechat_cli::platform::PlatformDom;
use livechat_cli::relay::Relay;
use livechat_cli::script::observer_js;
use livechat_cli::target::{Platform, StreamTarget};

fn log(text: String) -> ConsoleMessage {
	ConsoleMessage {
		level: "log".to_string(),
		text,
	}
}

fn payload(username: &str, message: &str) -> ConsoleMessage {
	log(format!(r#"{CHAT_MARKER}{{"username":"{username}","message":"{message}"}}"#))
}

fn drain(platform: Platform, messages: Vec<ConsoleMessage>) -> Vec<String> {
	let dom = PlatformDom::of(platform);
	let mut out = Vec::new();
	let mut relay = Relay::new(dom, &mut out);
	for message in &messages {
		relay.handle(message).unwrap();
	}
	String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
}

#[test]
fn douyin_scenario_gift_mention_then_chat() {
	let lines = drain(
		Platform::Douyin,
		vec![
			payload("某人", "送出了 ×5"),
			payload("bob", "@bob hi"),
			payload("小明：", "hi everyone"),
		],
	);

	assert_eq!(lines, vec![r#"{"username":"小明","message":"hi everyone"}"#]);
}

#[test]
fn tiktok_scenario_single_chat_message_relayed_exactly_once() {
	let lines = drain(Platform::Tiktok, vec![payload("alice", "hello")]);
	assert_eq!(lines, vec![r#"{"username":"alice","message":"hello"}"#]);
}

#[test]
fn insertion_order_is_emission_order() {
	let lines = drain(
		Platform::Tiktok,
		vec![
			payload("a", "one"),
			payload("b", "送出了 ×2"),
			payload("c", "three"),
			payload("d", "@e four"),
			payload("e", "five"),
		],
	);

	assert_eq!(
		lines,
		vec![
			r#"{"username":"a","message":"one"}"#,
			r#"{"username":"c","message":"three"}"#,
			r#"{"username":"e","message":"five"}"#,
		]
	);
}

#[test]
fn tiktok_observer_discards_unmarked_nodes_in_page_context() {
	// The node-type filter runs inside the page; the rendered script must
	// skip children without the chat-message marker before any extraction.
	let js = observer_js(PlatformDom::of(Platform::Tiktok));
	let filter = js.find("getAttribute('data-e2e') !== 'chat-message'").unwrap();
	let extraction = js.find("node.querySelector").unwrap();
	assert!(filter < extraction);
}

#[test]
fn resolver_and_pipeline_agree_on_platform_dispatch() {
	let target = StreamTarget::new(Platform::Douyin, "42");
	assert!(target.room_uri().starts_with("https://live.douyin.com/"));
	assert!(PlatformDom::of(target.platform).strip_username_separator);

	let target = StreamTarget::new(Platform::Tiktok, "me");
	assert!(target.room_uri().starts_with("https://www.tiktok.com/@"));
	assert!(PlatformDom::of(target.platform).candidate_marker.is_some());
}
