//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

use crate::target::Platform;

#[derive(Parser, Debug)]
#[command(name = "livechat")]
#[command(about = "Tail the chat of a Douyin or TikTok live room as JSON lines on stdout")]
#[command(version)]
pub struct Cli {
	/// Streaming platform hosting the room
	#[arg(long, value_enum)]
	pub kind: Platform,

	/// Live room code (Douyin) or creator handle (TikTok)
	#[arg(long)]
	pub room: String,

	/// Increase verbosity (-v info, -vv debug); diagnostics go to stderr
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Browser profile directory persisted across runs and login
	#[arg(long, default_value = ".livechat_profile", value_name = "DIR")]
	pub profile_dir: PathBuf,

	/// DevTools port (0 picks a free port)
	#[arg(long, default_value = "0")]
	pub port: u16,

	/// Login-probe deadline after navigation, in seconds
	#[arg(long, default_value = "10", value_name = "SECS")]
	pub settle_secs: u64,

	/// Pause between the login window closing and the headless relaunch, in seconds
	#[arg(long, default_value = "2", value_name = "SECS")]
	pub login_settle_secs: u64,
}
