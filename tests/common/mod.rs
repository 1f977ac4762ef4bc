#![allow(dead_code)]

use std::collections::VecDeque;

use rebm_console::{NodeClient, NodeController, Prompter};
use serde_json::{json, Value};

/// Prompter with canned answers that records what it was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub answers: VecDeque<bool>,
    pub questions: Vec<String>,
    pub acknowledged: Vec<String>,
}

impl ScriptedPrompter {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn acknowledge(&mut self, message: &str) {
        self.acknowledged.push(message.to_string());
    }
}

pub fn controller(base_url: &str, prompter: ScriptedPrompter) -> NodeController<ScriptedPrompter> {
    let client = NodeClient::new(base_url).expect("valid base url");
    NodeController::new(client, prompter)
}

pub fn available(name: &str) -> Value {
    json!({
        "node": name,
        "status": "available",
        "reserved_by": null,
        "expires_at": null,
        "updated_at": "2030-01-01T07:00:00+00:00"
    })
}

pub fn reserved(name: &str, user: &str, expires_at: &str) -> Value {
    json!({
        "node": name,
        "status": "reserved",
        "reserved_by": user,
        "expires_at": expires_at,
        "updated_at": "2030-01-01T07:00:00+00:00"
    })
}
