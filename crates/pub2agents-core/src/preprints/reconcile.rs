//! Batch reconciliation of agents against the preprint watchlist
//!
//! The preprint store is a long-lived watchlist. A rerun pass re-checks the
//! watchlist and replaces it with whatever is still a preprint; an initial
//! pass checks a fresh batch and appends its preprints. Entries only ever
//! leave the watchlist by being reclassified as published.

use super::links::PublicationLinkBuilder;
use super::resolver::{Classification, ClassificationOutcome, PreprintResolver};
use crate::error::{ReconcileError, Result};
use crate::sources::LiteratureSearch;
use crate::store::AgentStore;
use pub2agents_domain::Agent;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Which agents are checked and how the preprint store is updated
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileMode {
    /// Re-check the stored preprints; the store is replaced
    Rerun { store: PathBuf },
    /// Check a fresh batch; new preprints are appended to the store
    Initial { agents: Vec<Agent>, store: PathBuf },
}

impl ReconcileMode {
    /// Validate caller input before anything touches the network
    pub fn from_parts(
        rerun: bool,
        agents: Option<Vec<Agent>>,
        store: Option<PathBuf>,
    ) -> std::result::Result<Self, ReconcileError> {
        let store = store.ok_or(ReconcileError::MissingStorePath)?;
        if rerun {
            if agents.as_ref().is_some_and(|a| !a.is_empty()) {
                return Err(ReconcileError::UnexpectedAgents);
            }
            return Ok(ReconcileMode::Rerun { store });
        }
        match agents {
            Some(agents) if !agents.is_empty() => Ok(ReconcileMode::Initial { agents, store }),
            _ => Err(ReconcileError::NoAgents),
        }
    }
}

/// Why an agent needs a human look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// The DOI search found no canonical record
    Unresolved,
    /// No identifier to build a publication link from
    NoIdentifier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemAgent {
    pub name: String,
    pub bioagents_id: Option<String>,
    pub kind: ProblemKind,
    pub detail: String,
}

impl ProblemAgent {
    fn new(agent: &Agent, kind: ProblemKind, detail: impl Into<String>) -> Self {
        Self {
            name: agent.name.clone(),
            bioagents_id: agent.bioagents_id.clone(),
            kind,
            detail: detail.into(),
        }
    }
}

/// Partitioned result of a pass; order follows the input
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reconciliation {
    pub published: Vec<Agent>,
    pub still_preprint: Vec<Agent>,
    pub problems: Vec<ProblemAgent>,
}

/// Classifies each agent, applies the result and partitions the batch
pub struct BatchReconciler<S> {
    resolver: PreprintResolver<S>,
    links: PublicationLinkBuilder,
}

impl<S: LiteratureSearch> BatchReconciler<S> {
    pub fn new(resolver: PreprintResolver<S>, links: PublicationLinkBuilder) -> Self {
        Self { resolver, links }
    }

    pub fn resolver(&self) -> &PreprintResolver<S> {
        &self.resolver
    }

    /// Classify agents one after another and partition on `is_preprint`
    pub async fn reconcile(&self, agents: Vec<Agent>) -> Reconciliation {
        let mut result = Reconciliation::default();

        for agent in agents {
            let classification = self.resolver.classify(&agent.primary_identifiers()).await;
            let (agent, problem) = apply_classification(agent, &classification, &self.links);

            if let Some(problem) = problem {
                warn!(agent = %problem.name, kind = ?problem.kind, "{}", problem.detail);
                result.problems.push(problem);
            }
            if agent.is_preprint {
                result.still_preprint.push(agent);
            } else {
                result.published.push(agent);
            }
        }

        result
    }

    /// Run a full pass and persist the preprint store.
    ///
    /// Returns the partition; published agents are not persisted here.
    pub async fn run(&self, mode: ReconcileMode) -> Result<Reconciliation> {
        match mode {
            ReconcileMode::Rerun { store } => {
                let store = AgentStore::new(store);
                let agents = store.load_or_empty()?;
                info!(count = agents.len(), path = %store.path().display(), "Loaded preprints");
                if agents.is_empty() {
                    return Err(ReconcileError::NoAgents.into());
                }

                let result = self.reconcile(agents).await;
                info!(
                    "There are {} newly published agents. {} preprints remaining.",
                    result.published.len(),
                    result.still_preprint.len()
                );
                store.save(&result.still_preprint)?;
                Ok(result)
            }
            ReconcileMode::Initial { agents, store } => {
                let store = AgentStore::new(store);
                let existing = store.load_or_empty()?;
                info!(count = existing.len(), path = %store.path().display(), "Loaded preprints");
                if agents.is_empty() {
                    return Err(ReconcileError::NoAgents.into());
                }

                let result = self.reconcile(agents).await;
                info!(
                    "There are {} published agents and {} preprints.",
                    result.published.len(),
                    result.still_preprint.len()
                );
                let merged = merge_preprints(existing, result.still_preprint.iter().cloned());
                store.save(&merged)?;
                Ok(result)
            }
        }
    }
}

/// Apply a classification to an agent without touching anything else.
///
/// The publication list is replaced only when the agent is not a preprint and
/// the classification carries identifiers. The link always reflects the final
/// identifiers; a preprint links to its own DOI, and an agent with nothing to
/// link from loses any old link.
pub fn apply_classification(
    mut agent: Agent,
    classification: &Classification,
    links: &PublicationLinkBuilder,
) -> (Agent, Option<ProblemAgent>) {
    let original_doi = agent.original_doi().map(str::to_string);
    let mut problem = None;

    if classification.outcome == ClassificationOutcome::Unresolved {
        problem = Some(ProblemAgent::new(
            &agent,
            ProblemKind::Unresolved,
            format!(
                "No literature record found for DOI {}",
                original_doi.as_deref().unwrap_or("-")
            ),
        ));
    }

    if !classification.is_preprint && !classification.identifiers.is_empty() {
        agent.publication = vec![classification.identifiers.clone().into()];
    }

    let current = agent.primary_identifiers();
    match links.build_link(classification.is_preprint, &current, original_doi.as_deref()) {
        Ok(link) => agent.publication_link = Some(link),
        Err(e) => {
            agent.publication_link = None;
            problem = Some(ProblemAgent::new(&agent, ProblemKind::NoIdentifier, e.to_string()));
        }
    }
    agent.is_preprint = classification.is_preprint;

    (agent, problem)
}

/// Add fresh preprints to the stored ones. Nothing stored is dropped; an
/// agent already present is refreshed in place.
pub fn merge_preprints(
    mut existing: Vec<Agent>,
    fresh: impl IntoIterator<Item = Agent>,
) -> Vec<Agent> {
    for agent in fresh {
        match existing
            .iter_mut()
            .find(|stored| stored.identity_key() == agent.identity_key())
        {
            Some(stored) => *stored = agent,
            None => existing.push(agent),
        }
    }
    existing
}
