//! Post-processing of pub2tools agents before curation
//!
//! Assigns registry IDs and edit permissions, splits agents by confidence
//! and recovers the run month from a pub2tools log.

use crate::config::{ProcessingConfig, RegistryConfig};
use crate::error::ProcessingError;
use crate::export::YearMonth;
use lazy_static::lazy_static;
use pub2agents_domain::{Agent, EditPermission};
use regex::Regex;
use std::path::Path;
use tracing::info;

lazy_static! {
    // Characters allowed in a bioagents ID before spaces become dashes
    static ref DISALLOWED_ID_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9_~ .-]").unwrap();
    static ref SPACE_RUNS: Regex = Regex::new(r" +").unwrap();
    // pub2tools logs its invocation, e.g. `--month 2024-03`
    static ref RUN_MONTH: Regex = Regex::new(r"--month (\d+)-(\d+)").unwrap();
}

/// Registry ID for an agent name: `<prefix><cleaned-name>`, lowercased
pub fn generate_bioagents_id(name: &str, prefix: &str) -> String {
    let cleaned = DISALLOWED_ID_CHARS.replace_all(name, "");
    let dashed = SPACE_RUNS.replace_all(&cleaned, "-");
    format!("{}{}", prefix, dashed).to_lowercase()
}

/// Agents split by confidence
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcessedAgents {
    /// High-confidence agents, with `agent_link` set
    pub high: Vec<Agent>,
    pub low: Vec<Agent>,
}

/// Give every agent public edit permission and a bioagents ID; link the
/// high-confidence ones to their registry page
pub fn process_agents(
    agents: Vec<Agent>,
    processing: &ProcessingConfig,
    registry: &RegistryConfig,
) -> ProcessedAgents {
    let mut processed = ProcessedAgents::default();

    for mut agent in agents {
        agent.edit_permission = Some(EditPermission::public());
        let id = generate_bioagents_id(&agent.name, &processing.id_prefix);

        if agent.is_high_confidence() {
            agent.agent_link = Some(format!("{}{}", registry.agent_link_base, id));
            agent.bioagents_id = Some(id);
            processed.high.push(agent);
        } else {
            agent.bioagents_id = Some(id);
            processed.low.push(agent);
        }
    }

    info!(
        high = processed.high.len(),
        low = processed.low.len(),
        "Processed agents"
    );
    processed
}

/// Month of a pub2tools run, read from its log
pub fn read_run_date(log_path: &Path) -> Result<YearMonth, ProcessingError> {
    let text = std::fs::read_to_string(log_path).map_err(|e| ProcessingError::Read {
        path: log_path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_run_date(&text).ok_or_else(|| ProcessingError::NoRunDate {
        path: log_path.to_path_buf(),
    })
}

fn parse_run_date(text: &str) -> Option<YearMonth> {
    let caps = RUN_MONTH.captures(text)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    YearMonth::new(year, month)
}
