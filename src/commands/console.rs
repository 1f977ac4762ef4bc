//! `rebm console` — interactive session.
//!
//! The loop reads one intent per line, hands it to the controller and redraws
//! the dashboard. Forms ("add", "reserve") prompt for their fields.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use tracing::info;

use crate::config::Config;
use crate::console::render;
use crate::console::{NodeController, TerminalPrompter};
use crate::domain::timestamp;

const HELP: &str = "\
commands:
  refresh | r              reload the node list
  add [name]               create a node
  reserve <node>           reserve an available node
  release <node>           release a reserved node
  delete <node>            delete a node (asks for confirmation)
  cleanup                  release all expired reservations
  show <node>              show node details
  dismiss                  clear the error banner
  help | ?                 this text
  quit | q                 leave the console";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Refresh,
    Add(Option<String>),
    Reserve(String),
    Release(String),
    Delete(String),
    Cleanup,
    Show(String),
    Dismiss,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// Parse one input line. Node names are everything after the verb, so names
/// with spaces work without quoting.
pub fn parse_intent(line: &str) -> Intent {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let arg = |make: fn(String) -> Intent, usage: &str| {
        if rest.is_empty() {
            Intent::Invalid(format!("usage: {}", usage))
        } else {
            make(rest.to_string())
        }
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Intent::Empty,
        "refresh" | "r" => Intent::Refresh,
        "add" | "create" => Intent::Add((!rest.is_empty()).then(|| rest.to_string())),
        "reserve" => arg(Intent::Reserve, "reserve <node>"),
        "release" => arg(Intent::Release, "release <node>"),
        "delete" | "rm" => arg(Intent::Delete, "delete <node>"),
        "show" | "get" => arg(Intent::Show, "show <node>"),
        "cleanup" => Intent::Cleanup,
        "dismiss" => Intent::Dismiss,
        "help" | "?" => Intent::Help,
        "quit" | "q" | "exit" => Intent::Quit,
        other => Intent::Invalid(format!("unknown command {:?}; type help", other)),
    }
}

pub fn run(config: &Config) -> Result<()> {
    let mut controller = super::controller(config, false)?;
    controller.prompter_mut().pause_on_acknowledge(true);
    let runtime = super::runtime()?;
    runtime.block_on(session(&mut controller))
}

async fn session(controller: &mut NodeController<TerminalPrompter>) -> Result<()> {
    let base_url = controller_base_url(controller);
    info!(api = %base_url, "console session starting");

    controller.start().await;
    redraw(controller, &base_url);
    println!("{}", "type help for commands".dimmed());

    loop {
        let Some(line) = controller.prompter_mut().ask(&"rebm>".bold().to_string()) else {
            break;
        };

        match parse_intent(&line) {
            Intent::Empty => continue,
            Intent::Help => {
                println!("{}", HELP);
                continue;
            }
            Intent::Invalid(message) => {
                println!("{} {}", "!!".red().bold(), message);
                continue;
            }
            Intent::Quit => break,
            Intent::Refresh => controller.load_nodes().await,
            Intent::Dismiss => controller.state_mut().dismiss_error(),
            Intent::Add(name) => add(controller, name).await,
            Intent::Reserve(name) => reserve(controller, &name).await,
            Intent::Release(name) => {
                controller.release_node(&name).await;
            }
            Intent::Delete(name) => {
                controller.delete_node(&name).await;
            }
            Intent::Cleanup => {
                controller.cleanup_expired().await;
            }
            Intent::Show(name) => {
                if let Some(node) = controller.get_node(&name).await {
                    println!("{}", render::node_detail(&node, Utc::now()));
                    continue;
                }
            }
        }

        redraw(controller, &base_url);
    }

    info!("console session ended");
    Ok(())
}

async fn add(controller: &mut NodeController<TerminalPrompter>, name: Option<String>) {
    controller.state_mut().open_create_form();

    let name = match name {
        Some(name) => Some(name),
        None => controller.prompter_mut().ask("  node name:"),
    };
    controller.state_mut().set_new_node_name(name.unwrap_or_default());

    if controller.state().can_submit_create() {
        controller.submit_create_form().await;
    } else {
        println!("{} node name is required", "::".blue().bold());
    }
    controller.state_mut().close_create_form();
}

async fn reserve(controller: &mut NodeController<TerminalPrompter>, name: &str) {
    if controller.state().find(name).is_some_and(|n| n.is_reserved()) {
        println!(
            "{} {} is already reserved; release it first",
            "::".blue().bold(),
            name
        );
        return;
    }

    controller.open_reserve_form(name);
    let default = controller
        .state()
        .reserve_form
        .expires_at
        .map(|at| at.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default();

    let user = controller.prompter_mut().ask("  user name:").unwrap_or_default();
    controller.state_mut().set_reserve_user(user);

    let label = format!("  expires at [{}]:", default);
    let input = controller.prompter_mut().ask(&label).unwrap_or_default();
    if !input.trim().is_empty() {
        match timestamp::parse_local_input(&input) {
            Some(at) => controller.state_mut().set_reserve_expiry(Some(at)),
            None => {
                println!(
                    "{} cannot parse {:?}; expected e.g. {}",
                    "!!".red().bold(),
                    input.trim(),
                    default
                );
                controller.state_mut().close_reserve_form();
                return;
            }
        }
    }

    if controller.state().can_submit_reserve() {
        controller.submit_reserve_form().await;
    } else {
        println!("{} user name and expiry are required", "::".blue().bold());
    }
    controller.state_mut().close_reserve_form();
}

fn controller_base_url(controller: &NodeController<TerminalPrompter>) -> String {
    controller.client().base_url().as_str().trim_end_matches('/').to_string()
}

fn redraw(controller: &NodeController<TerminalPrompter>, base_url: &str) {
    println!();
    print!(
        "{}",
        render::dashboard(controller.state(), base_url, Utc::now())
    );
}
