//! Publication link construction

use crate::config::LinkTemplates;
use pub2agents_domain::{IdentifierKind, PublicationIdentifier};
use thiserror::Error;

/// None of DOI, PMID or PMCID was available
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No identifier available to build a publication link")]
pub struct NoIdentifierError;

/// Builds `publication_link` values from identifiers
#[derive(Debug, Clone, Default)]
pub struct PublicationLinkBuilder {
    templates: LinkTemplates,
}

impl PublicationLinkBuilder {
    pub fn new(templates: LinkTemplates) -> Self {
        Self { templates }
    }

    /// Link for a preprint always points at its own DOI. Otherwise the first
    /// identifier present wins, in the order DOI, PMID, PMCID.
    pub fn build_link(
        &self,
        is_preprint: bool,
        identifiers: &PublicationIdentifier,
        original_doi: Option<&str>,
    ) -> Result<String, NoIdentifierError> {
        if is_preprint {
            return original_doi
                .map(|doi| self.link_for(IdentifierKind::Doi, doi))
                .ok_or(NoIdentifierError);
        }

        identifiers
            .primary()
            .map(|(kind, value)| self.link_for(kind, value))
            .ok_or(NoIdentifierError)
    }

    pub fn link_for(&self, kind: IdentifierKind, value: &str) -> String {
        let base = match kind {
            IdentifierKind::Doi => &self.templates.doi_base,
            // PMCIDs resolve through PubMed as well
            IdentifierKind::Pmid | IdentifierKind::Pmcid => &self.templates.pubmed_base,
        };
        format!("{}{}", base, value)
    }
}
