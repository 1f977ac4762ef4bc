use anyhow::{bail, Result};
use colored::Colorize;

use crate::config::Config;
use crate::console::render;
use crate::console::ApiStatus;

pub fn run(config: &Config) -> Result<()> {
    let mut controller = super::controller(config, false)?;
    let status = super::runtime()?.block_on(controller.check_health());

    println!("{}", "rebm health".bold());
    println!("  api:    {}", config.api_url);
    println!("  status: {}", render::api_status(status));

    if status != ApiStatus::Online {
        bail!("API at {} is not reachable", config.api_url);
    }
    Ok(())
}
