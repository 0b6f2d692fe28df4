//! Command line interface: launch the studio or edit settings headlessly

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use tracing::{Level, warn};

use crate::api::{ProjectSource, mock::impact_multiplier};
use crate::settings::schema::{self, FieldKind, FieldSpec, Section, fields_in};
use crate::settings::{SettingsStore, Storage};

/// Flux Studio - architecture dashboard with a live-tunable animated background
#[derive(Parser, Debug)]
#[command(name = "flux-studio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); defaults to $LOG_LEVEL, then info
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Directory holding persisted settings (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the studio window (default)
    Studio,

    /// Inspect or edit the background settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// List projects from the data source
    Projects {
        /// Also print the impact series of this project
        #[arg(long)]
        impact: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SettingsCommand {
    /// Print the full configuration as JSON
    Show,

    /// Print one field
    Get {
        /// Field key, e.g. globalOpacity
        key: String,
    },

    /// Change one field and persist it
    Set {
        /// Field key, e.g. blendMode
        key: String,
        /// New value, e.g. multiply, 0.5, #FF00AA or true
        value: String,
    },

    /// Restore every field to its default
    Reset,

    /// List every field with its section, constraints and default
    Schema,
}

/// `LOG_LEVEL`-style name to a tracing level; unknown names mean info
pub fn parse_log_level(raw: &str) -> Level {
    match raw.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Interpret a command line argument according to the field's kind
pub fn parse_value(spec: &FieldSpec, raw: &str) -> Result<Value> {
    let raw = raw.trim();
    let value = match spec.kind {
        FieldKind::Color | FieldKind::Choice { .. } => Value::from(raw),
        FieldKind::Range { .. } => {
            let number: f64 = raw
                .parse()
                .with_context(|| format!("'{}' expects a number, got '{raw}'", spec.key))?;
            Value::from(number)
        }
        FieldKind::Toggle => {
            let flag: bool = raw
                .parse()
                .with_context(|| format!("'{}' expects true or false, got '{raw}'", spec.key))?;
            Value::Bool(flag)
        }
    };
    Ok(value)
}

pub fn run_settings<S: Storage>(
    command: SettingsCommand,
    store: &mut SettingsStore<S>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            let json = serde_json::to_string_pretty(store.settings()).context("Failed to serialize settings")?;
            writeln!(out, "{json}")?;
        }
        SettingsCommand::Get { key } => {
            let value = store.get(&key).ok_or_else(|| anyhow!("Unknown setting '{key}'"))?;
            writeln!(out, "{}", display_value(&value))?;
        }
        SettingsCommand::Set { key, value } => {
            let spec = schema::describe(&key).ok_or_else(|| anyhow!("Unknown setting '{key}'"))?;
            let value = parse_value(spec, &value)?;
            store.set(&key, value)?;
            if !store.last_write_succeeded() {
                warn!(key = %key, "Setting applied but could not be persisted");
            }
            let current = store.get(&key).unwrap_or(Value::Null);
            writeln!(out, "{key} = {}", display_value(&current))?;
        }
        SettingsCommand::Reset => {
            store.reset();
            writeln!(out, "Settings reset to defaults")?;
        }
        SettingsCommand::Schema => write_schema(out)?,
    }
    Ok(())
}

fn write_schema(out: &mut impl Write) -> Result<()> {
    let defaults = serde_json::to_value(schema::defaults()).context("Failed to serialize defaults")?;
    for section in Section::ALL {
        writeln!(out, "[{}]", section.title())?;
        for spec in fields_in(section) {
            let default = defaults.get(spec.key).map(display_value).unwrap_or_default();
            writeln!(
                out,
                "  {:<26} {:<22} {} (default {default})",
                spec.key,
                spec.label,
                spec.kind.describe()
            )?;
        }
    }
    Ok(())
}

/// Strings print bare, everything else as JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub async fn run_projects<P: ProjectSource>(source: &P, impact: Option<&str>, out: &mut impl Write) -> Result<()> {
    let projects = source.list_projects().await.context("Failed to list projects")?;
    for project in projects.iter() {
        writeln!(
            out,
            "{:<10} {:<28} {:<18} {:<12} {:>3}%",
            project.id, project.title, project.location, project.status, project.progress
        )?;
    }

    if let Some(project_id) = impact {
        let multiplier = impact_multiplier(project_id)?;
        let impact = source
            .get_impact(project_id)
            .await
            .with_context(|| format!("Failed to fetch impact for '{project_id}'"))?;
        writeln!(out)?;
        writeln!(out, "Impact for {project_id} (x{multiplier:.1})")?;
        for (title, series) in [("efficiency", &impact.efficiency), ("carbon", &impact.carbon)] {
            let points: Vec<String> = series.iter().map(|p| format!("{}={:.1}", p.name, p.value)).collect();
            writeln!(out, "  {title:<10} {}", points.join("  "))?;
        }
    }
    Ok(())
}
