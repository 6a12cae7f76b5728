//! pub2agents-core: curation pipeline for literature-mined bio.agents entries
//!
//! This library provides:
//! - Preprint detection against Europe PMC and reconciliation of DOI/PMID/PMCID
//! - Publication link construction
//! - The preprint watchlist (rerun and initial passes)
//! - JSON agent stores and the curation CSV sheet
//! - bioagents ID generation and confidence splitting
//! - A client for the bio.agents registry API

pub mod config;
pub mod error;
pub mod export;
pub mod http;
pub mod preprints;
pub mod processing;
pub mod registry;
pub mod sources;
pub mod store;

pub use pub2agents_domain::{Agent, IdentifierKind, Publication, PublicationIdentifier};

pub use config::{CorrectionPolicy, LinkTemplates, Pub2AgentsConfig};
pub use error::{Pub2AgentsError, ReconcileError, Result};
pub use export::{write_curation_csv, CurateLimit, CurationExport, YearMonth};
pub use preprints::{
    BatchReconciler, Classification, ClassificationOutcome, NoIdentifierError, PreprintResolver,
    ProblemAgent, ProblemKind, PublicationLinkBuilder, ReconcileMode, Reconciliation,
};
pub use processing::{generate_bioagents_id, process_agents, read_run_date, ProcessedAgents};
pub use registry::{InsertReport, RegistryClient};
pub use sources::{
    EuropePmcClient, EuropePmcSource, LiteratureSearch, SearchResponse, SearchResult, SourceError,
};
pub use store::{save_low_confidence, AgentStore};

/// Build a reconciler wired to Europe PMC from configuration
pub fn europepmc_reconciler(
    config: &Pub2AgentsConfig,
) -> std::result::Result<BatchReconciler<EuropePmcClient>, http::HttpError> {
    let client = EuropePmcClient::new(&config.europepmc)?;
    let resolver = PreprintResolver::new(client).with_policy(config.resolver.correction_policy);
    Ok(BatchReconciler::new(
        resolver,
        PublicationLinkBuilder::new(config.links.clone()),
    ))
}
