//! Page-context script generation.
//!
//! Renders the login probe and the chat MutationObserver from a
//! [`PlatformDom`] profile. The observer watches `childList` mutations on
//! the chat container, filters candidates, and logs marker-prefixed JSON to
//! the console channel; per-node work is wrapped in try/catch so one
//! malformed node never aborts a mutation batch.

use crate::chat::CHAT_MARKER;
use crate::platform::PlatformDom;

/// Escapes a selector for embedding in a single-quoted JS string.
fn escape_js(selector: &str) -> String {
	selector.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Expression that is `true` when the logged-in-only element exists.
pub fn login_probe_js(dom: &PlatformDom) -> String {
	format!("document.querySelector('{}') !== null", escape_js(dom.login_probe))
}

/// Installs the chat observer.
///
/// Evaluates to `true` once the observer is attached (idempotent across
/// re-evaluation) and `false` while the container has not rendered yet, so
/// callers can poll it.
pub fn observer_js(dom: &PlatformDom) -> String {
	let marker_filter = match dom.candidate_marker {
		Some((attribute, value)) => format!(
			"if (node.getAttribute('{}') !== '{}') {{ continue; }}\n\t\t\t\t\t",
			escape_js(attribute),
			escape_js(value)
		),
		None => String::new(),
	};

	format!(
		r#"(() => {{
	if (window.__livechat_observer__) {{ return true; }}
	const container = document.querySelector('{container}');
	if (!container) {{ return false; }}
	const observer = new MutationObserver((mutations) => {{
		for (const mutation of mutations) {{
			if (mutation.type !== 'childList') {{ continue; }}
			for (const node of mutation.addedNodes) {{
				try {{
					if (!(node instanceof Element)) {{ continue; }}
					{marker_filter}const username = node.querySelector('{username}');
					const message = node.querySelector('{message}');
					if (!username || !message) {{ continue; }}
					console.log('{marker}' + JSON.stringify({{
						username: username.innerText,
						message: message.innerText,
					}}));
				}} catch (_) {{
					// A malformed node is skipped, never fatal.
				}}
			}}
		}}
	}});
	observer.observe(container, {{ childList: true }});
	window.__livechat_observer__ = observer;
	return true;
}})()"#,
		container = escape_js(dom.container),
		username = escape_js(dom.username),
		message = escape_js(dom.message),
		marker = CHAT_MARKER,
	)
}
