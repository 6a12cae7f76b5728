//! Preprint detection and publication matching
//!
//! A DOI is looked up in the literature database and the first result is
//! taken as the canonical record. The record is a preprint when it carries
//! the `PPR` source tag and nothing supersedes it, or when its first
//! comment/correction entry points at a preprint. Any other correction entry
//! names a candidate published version, which is looked up with a second
//! search that excludes the original DOI.

use crate::config::CorrectionPolicy;
use crate::sources::{exclusion_query, LiteratureSearch, SearchResponse, SearchResult};
use pub2agents_domain::PublicationIdentifier;
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Which rule decided a classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationOutcome {
    /// No DOI to search for; nothing was queried and no identifiers change
    NoDoi,
    /// The DOI search returned nothing usable
    Unresolved,
    /// Canonical record is a preprint with no comment/correction entries
    Preprint,
    /// A comment/correction entry points at a preprint
    CorrectedPreprint,
    /// The disambiguation search found the published version
    Matched,
    /// Not a preprint; the canonical record's identifiers stand
    Confirmed,
}

/// Result of classifying one publication
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub is_preprint: bool,
    /// Identifiers to carry forward. Empty means "leave the agent's
    /// publication as it is".
    pub identifiers: PublicationIdentifier,
    pub outcome: ClassificationOutcome,
}

impl Classification {
    fn preprint(original: &PublicationIdentifier, outcome: ClassificationOutcome) -> Self {
        Self {
            is_preprint: true,
            identifiers: original.clone(),
            outcome,
        }
    }

    fn published(identifiers: PublicationIdentifier, outcome: ClassificationOutcome) -> Self {
        Self {
            is_preprint: false,
            identifiers,
            outcome,
        }
    }

    fn unresolved() -> Self {
        Self::published(PublicationIdentifier::default(), ClassificationOutcome::Unresolved)
    }
}

/// Classifies publications as preprint or published
pub struct PreprintResolver<S> {
    search: S,
    policy: CorrectionPolicy,
}

impl<S: LiteratureSearch> PreprintResolver<S> {
    pub fn new(search: S) -> Self {
        Self {
            search,
            policy: CorrectionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CorrectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.search
    }

    /// Classify a publication by its DOI.
    ///
    /// Issues at most two searches under the default policy and never fails:
    /// a missing DOI or an unanswered search degrades to "not a preprint".
    pub async fn classify(&self, original: &PublicationIdentifier) -> Classification {
        let Some(doi) = original.doi.as_deref() else {
            info!("No DOI found for this publication, assuming it is not a preprint");
            return Classification::published(
                PublicationIdentifier::default(),
                ClassificationOutcome::NoDoi,
            );
        };

        let Some(canonical) = self.fetch(doi).await.and_then(SearchResponse::into_first) else {
            error!(doi, "Classification failed: no canonical record found");
            return Classification::unresolved();
        };

        self.classify_record(&canonical, original, doi).await
    }

    async fn classify_record(
        &self,
        canonical: &SearchResult,
        original: &PublicationIdentifier,
        doi: &str,
    ) -> Classification {
        let corrections = canonical.corrections();

        if corrections.is_empty() {
            if canonical.is_preprint_source() {
                debug!(doi, "Canonical record is a preprint");
                return Classification::preprint(original, ClassificationOutcome::Preprint);
            }
            return Classification::published(
                canonical.identifiers(),
                ClassificationOutcome::Confirmed,
            );
        }

        let candidates = match self.policy {
            CorrectionPolicy::FirstOnly => &corrections[..1],
            CorrectionPolicy::AllEntries => corrections,
        };

        if candidates.iter().any(|entry| entry.is_preprint_source()) {
            debug!(doi, "Comment/correction entry points at a preprint");
            return Classification::preprint(original, ClassificationOutcome::CorrectedPreprint);
        }

        for external_id in candidates.iter().filter_map(|entry| entry.id.as_deref()) {
            if let Some(hit) = self.find_counterpart(external_id, doi).await {
                debug!(doi, external_id, "Found published counterpart");
                return Classification::published(
                    hit.identifiers(),
                    ClassificationOutcome::Matched,
                );
            }
        }

        Classification::published(canonical.identifiers(), ClassificationOutcome::Confirmed)
    }

    /// Look for the record named by `external_id`, excluding the original DOI
    async fn find_counterpart(&self, external_id: &str, original_doi: &str) -> Option<SearchResult> {
        let query = exclusion_query(external_id, original_doi);
        self.fetch(&query)
            .await
            .filter(SearchResponse::has_hits)
            .and_then(SearchResponse::into_first)
    }

    /// Run a search, collapsing every failure into "no result"
    async fn fetch(&self, query: &str) -> Option<SearchResponse> {
        match self.search.search(query).await {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(query, error = %e, "Literature search failed, treating as no result");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{CommentCorrection, CommentCorrectionList, ResultList, SourceError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned responses keyed by exact query string
    #[derive(Default)]
    struct FakeSearch {
        responses: HashMap<String, SearchResponse>,
        queries: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        fn with(mut self, query: &str, results: Vec<SearchResult>) -> Self {
            let response = SearchResponse {
                version: None,
                hit_count: results.len() as u64,
                result_list: ResultList { result: results },
            };
            self.responses.insert(query.to_string(), response);
            self
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl LiteratureSearch for FakeSearch {
        async fn search(&self, query: &str) -> Result<SearchResponse, SourceError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.responses
                .get(query)
                .cloned()
                .ok_or(SourceError::Status { status: 500 })
        }
    }

    fn record(source: &str, doi: &str, corrections: &[(&str, &str)]) -> SearchResult {
        SearchResult {
            source: Some(source.to_string()),
            doi: Some(doi.to_string()),
            comment_correction_list: (!corrections.is_empty()).then(|| CommentCorrectionList {
                comment_correction: corrections
                    .iter()
                    .map(|(id, source)| CommentCorrection {
                        id: Some(id.to_string()),
                        source: Some(source.to_string()),
                        ..Default::default()
                    })
                    .collect(),
            }),
            ..Default::default()
        }
    }

    const DOI: &str = "10.1101/2024.02.02.578000";

    #[tokio::test]
    async fn test_corrected_preprint_wins_under_first_only() {
        let fake = FakeSearch::default().with(
            DOI,
            vec![record("MED", DOI, &[("PPR100", "PPR"), ("39000000", "MED")])],
        );
        let resolver = PreprintResolver::new(fake);
        let result = resolver.classify(&PublicationIdentifier::from_doi(DOI)).await;
        assert!(result.is_preprint);
        assert_eq!(result.outcome, ClassificationOutcome::CorrectedPreprint);
        assert_eq!(resolver.source().queries().len(), 1);
    }

    #[tokio::test]
    async fn test_first_only_ignores_later_entries() {
        let fake = FakeSearch::default().with(
            DOI,
            vec![record("PPR", DOI, &[("39000000", "MED"), ("PPR100", "PPR")])],
        );
        let resolver = PreprintResolver::new(fake);
        let result = resolver.classify(&PublicationIdentifier::from_doi(DOI)).await;
        assert!(!result.is_preprint);
        assert_eq!(result.outcome, ClassificationOutcome::Confirmed);
    }

    #[tokio::test]
    async fn test_all_entries_policy_sees_later_preprint() {
        let fake = FakeSearch::default().with(
            DOI,
            vec![record("PPR", DOI, &[("39000000", "MED"), ("PPR100", "PPR")])],
        );
        let resolver = PreprintResolver::new(fake).with_policy(CorrectionPolicy::AllEntries);
        let result = resolver.classify(&PublicationIdentifier::from_doi(DOI)).await;
        assert!(result.is_preprint);
        assert_eq!(result.outcome, ClassificationOutcome::CorrectedPreprint);
    }

    #[tokio::test]
    async fn test_all_entries_policy_tries_each_id() {
        let published = SearchResult {
            pmid: Some("39000002".to_string()),
            ..Default::default()
        };
        let fake = FakeSearch::default()
            .with(DOI, vec![record("PPR", DOI, &[("39000001", "MED"), ("39000002", "MED")])])
            .with(&exclusion_query("39000001", DOI), vec![])
            .with(&exclusion_query("39000002", DOI), vec![published]);
        let resolver = PreprintResolver::new(fake).with_policy(CorrectionPolicy::AllEntries);
        let result = resolver.classify(&PublicationIdentifier::from_doi(DOI)).await;
        assert_eq!(result.outcome, ClassificationOutcome::Matched);
        assert_eq!(result.identifiers.pmid.as_deref(), Some("39000002"));
        assert_eq!(resolver.source().queries().len(), 3);
    }

    #[tokio::test]
    async fn test_transport_failure_is_unresolved() {
        let resolver = PreprintResolver::new(FakeSearch::default());
        let result = resolver.classify(&PublicationIdentifier::from_doi(DOI)).await;
        assert_eq!(result, Classification::unresolved());
    }

    #[tokio::test]
    async fn test_failed_disambiguation_falls_back_to_canonical() {
        let fake = FakeSearch::default().with(DOI, vec![record("PPR", DOI, &[("39000000", "MED")])]);
        let resolver = PreprintResolver::new(fake);
        let result = resolver.classify(&PublicationIdentifier::from_doi(DOI)).await;
        assert!(!result.is_preprint);
        assert_eq!(result.identifiers, PublicationIdentifier::from_doi(DOI));
        assert_eq!(
            resolver.source().queries(),
            vec![DOI.to_string(), exclusion_query("39000000", DOI)]
        );
    }
}
