//! Operator console for the ReBM node reservation service.
//!
//! `client` wraps the REST API, `console` holds the session state and the
//! controller that keeps it in sync with the server, and `commands` is the
//! terminal front-end used by the `rebm` binary.

pub mod client;
pub mod commands;
pub mod config;
pub mod console;
pub mod domain;
pub mod logging;

pub use client::{ApiError, NodeClient};
pub use console::{ApiStatus, NodeController, Prompter, SessionState};
pub use domain::{Node, NodeStatus};
