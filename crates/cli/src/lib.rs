pub mod app;
pub mod backend;
pub mod chat;
pub mod cli;
pub mod error;
pub mod extract;
pub mod logging;
pub mod platform;
pub mod relay;
pub mod script;
pub mod session;
pub mod target;
