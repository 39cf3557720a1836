//! Host for the agent conversation demo UI.
//!
//! Serves page routes that prime and return the view-state, UI action
//! endpoints, static web-component assets, and the `/__ws__` push channel.

pub mod config;
pub mod file_server;
pub mod pages;
pub mod push;

pub use config::HostConfig;
pub use file_server::FileServer;
