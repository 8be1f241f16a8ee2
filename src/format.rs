//! Output formatting utilities for text and JSON.

use crate::config::{ConfigLoader, DefaultStatus};
use crate::resolver::EffectiveTemplates;
use crate::uvalue::HubbardU;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Value, json};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Serialize any value as pretty JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// JSON view of the effective configuration.
pub fn config_json(loader: &ConfigLoader, defaults: &[DefaultStatus]) -> Value {
    let config = loader.config();
    let sources: serde_json::Map<String, Value> = loader
        .sources()
        .iter()
        .map(|(field, tier)| (field.to_string(), json!(tier)))
        .collect();

    json!({
        "config_file": loader.config_path(),
        "config": config,
        "sources": sources,
        "defaults": defaults,
    })
}

/// Text view of the effective configuration.
pub fn format_config_text(loader: &ConfigLoader, defaults: &[DefaultStatus]) -> String {
    let config = loader.config();
    let mut out = String::new();

    match loader.config_path() {
        Some(path) => out.push_str(&format!("Config file: {}\n", path.display())),
        None => out.push_str("Config file: (none, using defaults)\n"),
    }
    out.push('\n');

    let tier = |field: &str| {
        loader
            .source_of(field)
            .map(|t| t.to_string())
            .unwrap_or_default()
    };
    out.push_str(&format!(
        "  config_dir  {}  [{}]\n",
        config.config_dir.display(),
        tier("config_dir")
    ));
    out.push_str(&format!(
        "  scheduler   {}  [{}]\n",
        config.scheduler,
        tier("scheduler")
    ));
    out.push_str(&format!(
        "  log_dir     {}  [{}]\n",
        config.log_dir.display(),
        tier("log_dir")
    ));
    out.push_str(&format!(
        "  potential   {}  [{}]\n",
        config.potential,
        tier("potential")
    ));

    out.push_str("\nDefault templates:\n");
    for status in defaults {
        let mark = match (status.present, status.required) {
            (true, _) => "ok",
            (false, true) => "MISSING",
            (false, false) => "absent",
        };
        out.push_str(&format!(
            "  {:<14} {:<8} {}\n",
            status.name,
            mark,
            status.path.display()
        ));
    }

    out
}

/// Text view of the resolved templates.
pub fn format_templates_text(templates: &EffectiveTemplates) -> String {
    let mut out = format!("Working directory: {}\n\n", templates.working_dir.display());
    for (kind, template) in templates.iter() {
        out.push_str(&format!(
            "  {:<7} {}  ({})\n",
            kind,
            template.path.display(),
            template.source
        ));
    }
    out
}

/// Text table of `+U` parameters, one element per row.
pub fn format_uvalue_text(rows: &[(String, HubbardU)], lmaxmix: u32) -> String {
    let mut out = String::from("Element  orbital      U      J    U-J\n");
    for (element, u) in rows {
        out.push_str(&format!(
            "{:<8} {:>7} {:>6.2} {:>6.2} {:>6.2}\n",
            element,
            u.orbital,
            u.u,
            u.j,
            u.effective()
        ));
    }
    out.push_str(&format!("\nLMAXMIX = {lmaxmix}\n"));
    out
}
