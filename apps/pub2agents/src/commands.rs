//! Command implementations

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use pub2agents_core::{
    europepmc_reconciler, process_agents, save_low_confidence, write_curation_csv, AgentStore,
    CurateLimit, ProblemAgent, Pub2AgentsConfig, ReconcileMode, Reconciliation, RegistryClient,
    YearMonth,
};
use pub2agents_domain::Agent;
use tracing::{info, warn};

type CmdResult<T = ()> = Result<T, Box<dyn Error>>;

pub async fn preprints_rerun(
    config: &Pub2AgentsConfig,
    store: PathBuf,
    published_out: Option<PathBuf>,
) -> CmdResult {
    let mode = ReconcileMode::from_parts(true, None, Some(store))?;
    let result = europepmc_reconciler(config)?.run(mode).await?;
    report(&result, published_out.as_deref())
}

pub async fn preprints_initial(
    config: &Pub2AgentsConfig,
    input: &Path,
    store: PathBuf,
    published_out: Option<PathBuf>,
) -> CmdResult {
    let agents = AgentStore::new(input).load()?;
    let mode = ReconcileMode::from_parts(false, Some(agents), Some(store))?;
    let result = europepmc_reconciler(config)?.run(mode).await?;
    report(&result, published_out.as_deref())
}

/// Monthly pass: process the pub2tools run, settle old preprints, check the
/// new agents, then write the sheet and its companion files
pub async fn curate(
    config: &Pub2AgentsConfig,
    input: &Path,
    store: PathBuf,
    date: YearMonth,
    limit: CurateLimit,
    out_dir: &Path,
) -> CmdResult {
    info!(month = %date, input = %input.display(), "Curating pub2tools run");
    let processed = process_agents(
        AgentStore::new(input).load()?,
        &config.processing,
        &config.registry,
    );
    let reconciler = europepmc_reconciler(config)?;
    let mut problems = Vec::new();

    let carryovers = if AgentStore::new(&store).load_or_empty()?.is_empty() {
        info!("Preprint store is empty, nothing to re-check");
        Vec::new()
    } else {
        let rerun = reconciler
            .run(ReconcileMode::Rerun {
                store: store.clone(),
            })
            .await?;
        problems.extend(rerun.problems);
        rerun.published
    };

    let published = if processed.high.is_empty() {
        warn!("No high-confidence agents in this run");
        Vec::new()
    } else {
        let initial = reconciler
            .run(ReconcileMode::Initial {
                agents: processed.high,
                store,
            })
            .await?;
        problems.extend(initial.problems);
        initial.published
    };

    let export = write_curation_csv(published, carryovers, limit, date, out_dir)?;
    let low_path = save_low_confidence(&processed.low, out_dir, date)?;
    info!(path = %low_path.display(), count = processed.low.len(), "Saved low-confidence agents");

    let suffix = date.file_suffix();
    AgentStore::new(out_dir.join(format!("agents_{}.json", suffix))).save(&export.exported)?;
    if !export.leftover.is_empty() {
        let path = out_dir.join(format!("leftover_agents_{}.json", suffix));
        AgentStore::new(&path).save(&export.leftover)?;
        info!(path = %path.display(), count = export.leftover.len(), "Saved agents beyond the limit");
    }
    if !problems.is_empty() {
        write_problems(&problems, &out_dir.join(format!("problems_{}.json", suffix)))?;
    }

    info!(
        sheet = %export.path.display(),
        exported = export.exported.len(),
        "Curation finished"
    );
    Ok(())
}

pub async fn insert(
    config: &Pub2AgentsConfig,
    input: &Path,
    write: bool,
    validate_only: bool,
    username: &str,
    password: &str,
) -> CmdResult {
    let agents = AgentStore::new(input).load()?;
    let client = RegistryClient::new(config.registry.clone())?;
    let token = client.login(username, password).await?;

    if validate_only {
        let mut rejected = 0;
        for agent in &agents {
            let outcome = client.validate_agent(agent, &token).await?;
            if outcome.accepted {
                info!(agent = %agent.identity_key(), "Valid");
            } else {
                rejected += 1;
                warn!(agent = %agent.identity_key(), body = %outcome.body, "Invalid");
            }
        }
        info!(total = agents.len(), rejected, "Validation finished");
        return Ok(());
    }

    let report = client.add_agents(&agents, &token, write).await;
    for problem in &report.problems {
        warn!(agent = %problem.agent_id, "{}", problem.error);
    }
    Ok(())
}

/// The month before `today`; pub2tools runs cover the month just ended
pub fn previous_month(today: NaiveDate) -> YearMonth {
    let (year, month) = match today.month() {
        1 => (today.year() - 1, 12),
        m => (today.year(), m - 1),
    };
    YearMonth {
        year: year as u16,
        month: month as u8,
    }
}

fn report(result: &Reconciliation, published_out: Option<&Path>) -> CmdResult {
    info!(
        published = result.published.len(),
        preprints = result.still_preprint.len(),
        problems = result.problems.len(),
        "Pass finished"
    );
    if let Some(path) = published_out {
        save_published(&result.published, path)?;
    }
    Ok(())
}

fn save_published(agents: &[Agent], path: &Path) -> CmdResult {
    AgentStore::new(path).save(agents)?;
    info!(path = %path.display(), count = agents.len(), "Saved published agents");
    Ok(())
}

fn write_problems(problems: &[ProblemAgent], path: &Path) -> CmdResult {
    std::fs::write(path, serde_json::to_string_pretty(problems)?)?;
    warn!(path = %path.display(), count = problems.len(), "Agents need a manual look");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_month() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(previous_month(date(2024, 3, 15)), YearMonth { year: 2024, month: 2 });
        assert_eq!(previous_month(date(2024, 1, 1)), YearMonth { year: 2023, month: 12 });
    }
}
