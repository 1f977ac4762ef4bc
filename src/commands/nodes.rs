//! One-shot node commands: `rebm list`, `rebm reserve <node>`, ...
//!
//! Each command drives the same controller as the interactive console, then
//! prints the refreshed state.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDateTime, Utc};
use colored::Colorize;

use crate::config::{Config, MAX_RESERVATION_HOURS};
use crate::console::render::{self, OutputFormat};
use crate::console::{NodeController, Prompter};
use crate::domain::{timestamp, Ack};

pub fn list(config: &Config, format: OutputFormat) -> Result<()> {
    let mut controller = super::controller(config, false)?;
    super::runtime()?.block_on(controller.load_nodes());
    super::finish(&controller)?;

    let state = controller.state();
    match format {
        OutputFormat::Json => println!("{}", render::to_json(&state.nodes)?),
        OutputFormat::Table => {
            println!("{}", render::stats(state.stats()));
            print!("{}", render::node_list(&state.nodes, Utc::now()));
        }
    }
    Ok(())
}

pub fn get(config: &Config, format: OutputFormat, name: &str) -> Result<()> {
    let mut controller = super::controller(config, false)?;
    let node = super::runtime()?.block_on(controller.get_node(name));
    super::finish(&controller)?;

    if let Some(node) = node {
        match format {
            OutputFormat::Json => println!("{}", render::to_json(&node)?),
            OutputFormat::Table => println!("{}", render::node_detail(&node, Utc::now())),
        }
    }
    Ok(())
}

pub fn create(config: &Config, format: OutputFormat, name: &str, props: &[String]) -> Result<()> {
    if name.trim().is_empty() {
        bail!("node name must not be empty");
    }
    let extra = props
        .iter()
        .map(|p| parse_property(p))
        .collect::<Result<BTreeMap<_, _>>>()?;

    let mut controller = super::controller(config, false)?;
    let ack = super::runtime()?.block_on(controller.create_node(name, extra));
    super::finish(&controller)?;
    report(&controller, format, name.trim(), ack, "created")
}

pub fn delete(config: &Config, name: &str, assume_yes: bool) -> Result<()> {
    let mut controller = super::controller(config, assume_yes)?;
    let ack = super::runtime()?.block_on(controller.delete_node(name));
    super::finish(&controller)?;

    match ack {
        Some(ack) => println!(
            "{} {}",
            "ok".green().bold(),
            ack.message.unwrap_or_else(|| format!("Node {} deleted", name))
        ),
        None => println!("{} delete of {} cancelled", "::".blue().bold(), name),
    }
    Ok(())
}

pub fn reserve(
    config: &Config,
    format: OutputFormat,
    name: &str,
    user: &str,
    expires: Option<&str>,
    hours: Option<i64>,
) -> Result<()> {
    if user.trim().is_empty() {
        bail!("a user name is required to reserve a node");
    }
    let expiry = resolve_expiry(
        expires,
        hours,
        config.default_reservation_hours,
        Local::now().naive_local(),
    )?;

    let mut controller = super::controller(config, false)?;
    let ack = super::runtime()?.block_on(controller.reserve_node(name, user, Some(expiry)));
    super::finish(&controller)?;
    report(&controller, format, name, ack, "reserved")
}

pub fn release(config: &Config, format: OutputFormat, name: &str) -> Result<()> {
    let mut controller = super::controller(config, false)?;
    let ack = super::runtime()?.block_on(controller.release_node(name));
    super::finish(&controller)?;
    report(&controller, format, name, ack, "released")
}

pub fn cleanup(config: &Config, format: OutputFormat) -> Result<()> {
    let mut controller = super::controller(config, false)?;
    // The prompter prints the server's summary.
    super::runtime()?.block_on(controller.cleanup_expired());
    super::finish(&controller)?;

    let state = controller.state();
    match format {
        OutputFormat::Json => println!("{}", render::to_json(&state.nodes)?),
        OutputFormat::Table => {
            println!("{}", render::stats(state.stats()));
            print!("{}", render::node_list(&state.nodes, Utc::now()));
        }
    }
    Ok(())
}

/// Print the ack and the node's refreshed entry from the reloaded list.
fn report<P: Prompter>(
    controller: &NodeController<P>,
    format: OutputFormat,
    name: &str,
    ack: Option<Ack>,
    verb: &str,
) -> Result<()> {
    let Some(ack) = ack else {
        return Ok(());
    };
    let node = controller.state().find(name);

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({ "ack": ack, "node": node });
            println!("{}", render::to_json(&out)?);
        }
        OutputFormat::Table => {
            println!(
                "{} {}",
                "ok".green().bold(),
                ack.message
                    .unwrap_or_else(|| format!("Node {} {}", name, verb))
            );
            if let Some(node) = node {
                println!("{}", render::node_row(node, Utc::now()));
            }
        }
    }
    Ok(())
}

/// `key=value`; the value is taken as JSON when it parses, else as a string.
pub(crate) fn parse_property(raw: &str) -> Result<(String, serde_json::Value)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("property {:?} must look like key=value", raw))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("property {:?} has an empty key", raw);
    }
    if matches!(key, "node" | "node_name") {
        bail!("{} is set from the positional argument", key);
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Pick the reservation expiry: an explicit local date/time, else `hours`
/// (or the configured default) from `now`.
pub(crate) fn resolve_expiry(
    expires: Option<&str>,
    hours: Option<i64>,
    default_hours: i64,
    now: NaiveDateTime,
) -> Result<NaiveDateTime> {
    if let Some(raw) = expires {
        return timestamp::parse_local_input(raw).with_context(|| {
            format!(
                "cannot parse expiry {:?}; expected e.g. 2026-10-19T14:30",
                raw
            )
        });
    }
    let hours = hours.unwrap_or(default_hours);
    if !(1..=MAX_RESERVATION_HOURS).contains(&hours) {
        bail!(
            "reservation length must be between 1 and {} hours, got {}",
            MAX_RESERVATION_HOURS,
            hours
        );
    }
    timestamp::default_expiry(now, hours)
        .with_context(|| format!("{} hours from now is out of range", hours))
}
