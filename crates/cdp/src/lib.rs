//! Chromium lifecycle and DevTools protocol plumbing for livechat.
//!
//! The crate is the tool's browser collaborator:
//!
//! - [`finder`]: locate a local Chromium-family executable.
//! - [`launcher`]: spawn it with remote debugging against a persisted
//!   profile, headless or visible.
//! - [`endpoint`]: probe the DevTools HTTP endpoint for version metadata and
//!   page targets.
//! - [`connection`]: WebSocket JSON-RPC with command correlation and event
//!   subscription.
//! - [`browser`] / [`page`]: session handles exposing navigate, evaluate,
//!   user-agent override, the console stream, shutdown, and disconnect wait.

pub mod browser;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod finder;
pub mod launcher;
pub mod page;

pub use browser::Browser;
pub use error::{CdpError, Result};
pub use launcher::LaunchConfig;
pub use page::{ConsoleEvents, ConsoleMessage, Page};
