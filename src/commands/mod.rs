pub mod console;
pub mod health;
pub mod nodes;

use anyhow::{bail, Context, Result};

use crate::client::NodeClient;
use crate::config::Config;
use crate::console::{NodeController, Prompter, TerminalPrompter};

/// Single-threaded runtime: the console is one logical event loop.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")
}

pub(crate) fn controller(
    config: &Config,
    assume_yes: bool,
) -> Result<NodeController<TerminalPrompter>> {
    let client = NodeClient::new(&config.api_url)?;
    Ok(NodeController::new(client, TerminalPrompter::new(assume_yes))
        .with_reservation_hours(config.default_reservation_hours))
}

/// One-shot commands fail when the controller ended with an error surfaced.
pub(crate) fn finish<P: Prompter>(controller: &NodeController<P>) -> Result<()> {
    match &controller.state().error {
        Some(message) => bail!("{}", message),
        None => Ok(()),
    }
}
