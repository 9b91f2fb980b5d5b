//! Flow generation: fill the action template with one step's parameters.
//!
//! Substitution is plain token replacement over an immutable template, not
//! a YAML builder. Placeholders are replaced in a fixed order and each
//! replacement sees the output of the previous one.
use crate::cli::Target;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Named slots in the action template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placeholder {
    AppId,
    SetupSteps,
    Command,
    Value,
}

impl Placeholder {
    /// Substitution order. Later slots are replaced in text already
    /// containing earlier values.
    pub const ORDER: [Placeholder; 4] = [
        Placeholder::AppId,
        Placeholder::SetupSteps,
        Placeholder::Command,
        Placeholder::Value,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Placeholder::AppId => "{{APP_ID}}",
            Placeholder::SetupSteps => "{{SETUP_STEPS}}",
            Placeholder::Command => "{{COMMAND}}",
            Placeholder::Value => "{{VALUE}}",
        }
    }
}

/// Read-only template text, loaded once per invocation.
#[derive(Debug, Clone)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(anyhow!("Template not found at {}", path.display()));
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("read template {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "template loaded");
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn render(&self, bindings: &Bindings) -> String {
        Placeholder::ORDER
            .iter()
            .fold(self.text.clone(), |text, slot| text.replace(slot.token(), bindings.get(*slot)))
    }
}

/// Values bound to each placeholder, already formatted for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    pub app_id: String,
    pub setup_steps: String,
    pub command: String,
    pub value: String,
}

impl Bindings {
    pub fn get(&self, slot: Placeholder) -> &str {
        match slot {
            Placeholder::AppId => &self.app_id,
            Placeholder::SetupSteps => &self.setup_steps,
            Placeholder::Command => &self.command,
            Placeholder::Value => &self.value,
        }
    }
}

/// Inputs for a single generated step.
#[derive(Debug, Clone, Copy)]
pub struct FlowParams<'a> {
    pub command: &'a str,
    pub value: &'a str,
    pub target: Target,
    pub app_id: &'a str,
    pub url: &'a str,
}

/// Map a CLI verb to the Maestro command key. Unknown verbs pass through.
pub fn command_key(verb: &str) -> &str {
    match verb {
        "type" => "inputText",
        "tap" => "tapOn",
        other => other,
    }
}

/// Steps that run before the action. Web targets open the URL first.
pub fn setup_steps(target: Target, url: &str) -> String {
    match target {
        Target::Web => format!("- openLink: \"{url}\""),
        Target::Native => String::new(),
    }
}

/// Wrap the value in double quotes.
///
/// Embedded quotes are not escaped, so a value containing `"` yields a flow
/// the tool may reject. Kept as-is to match existing flows.
pub fn quote_value(value: &str) -> String {
    format!("\"{value}\"")
}

pub fn bindings_for(params: &FlowParams<'_>) -> Bindings {
    Bindings {
        app_id: params.app_id.to_string(),
        setup_steps: setup_steps(params.target, params.url),
        command: command_key(params.command).to_string(),
        value: quote_value(params.value),
    }
}

pub fn generate_flow(template: &Template, params: &FlowParams<'_>) -> String {
    template.render(&bindings_for(params))
}
