//! Europe PMC source plugin
//!
//! API docs: https://europepmc.org/RestfulWebService
//! Search endpoint: GET /webservices/rest/search?query=..&format=json&resultType=core

use super::traits::{LiteratureSearch, SourceError};
use crate::config::EuropePmcConfig;
use crate::http::{HttpClient, HttpError, Throttle};
use pub2agents_domain::PublicationIdentifier;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Europe PMC `source` tag for preprint records
pub const PREPRINT_SOURCE: &str = "PPR";

/// Europe PMC search response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub hit_count: u64,
    #[serde(default)]
    pub result_list: ResultList,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultList {
    #[serde(default)]
    pub result: Vec<SearchResult>,
}

/// A single Europe PMC record (`resultType=core`, only the fields we use)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub pmid: Option<String>,
    #[serde(default)]
    pub pmcid: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pub_year: Option<String>,
    #[serde(default)]
    pub comment_correction_list: Option<CommentCorrectionList>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCorrectionList {
    #[serde(default)]
    pub comment_correction: Vec<CommentCorrection>,
}

/// Link from a record to a record that supersedes, corrects or comments on it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCorrection {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl SearchResponse {
    /// The canonical record: the first result, if any
    pub fn first(&self) -> Option<&SearchResult> {
        self.result_list.result.first()
    }

    pub fn into_first(self) -> Option<SearchResult> {
        self.result_list.result.into_iter().next()
    }

    pub fn has_hits(&self) -> bool {
        self.hit_count > 0 && !self.result_list.result.is_empty()
    }
}

impl SearchResult {
    pub fn is_preprint_source(&self) -> bool {
        self.source.as_deref() == Some(PREPRINT_SOURCE)
    }

    /// Comment/correction entries; empty when the list is absent
    pub fn corrections(&self) -> &[CommentCorrection] {
        self.comment_correction_list
            .as_ref()
            .map(|list| list.comment_correction.as_slice())
            .unwrap_or(&[])
    }

    /// DOI/PMID/PMCID of this record, keeping only values that are present
    pub fn identifiers(&self) -> PublicationIdentifier {
        PublicationIdentifier::from_parts(
            self.doi.as_deref(),
            self.pmid.as_deref(),
            self.pmcid.as_deref(),
        )
    }
}

impl CommentCorrection {
    pub fn is_preprint_source(&self) -> bool {
        self.source.as_deref() == Some(PREPRINT_SOURCE)
    }
}

/// Query for a record carrying `external_id` that is not the original DOI.
///
/// The syntax is part of the Europe PMC query language and must stay verbatim.
pub fn exclusion_query(external_id: &str, original_doi: &str) -> String {
    format!(r#"ext_id:"{}" NOT DOI:"{}""#, external_id, original_doi)
}

pub struct EuropePmcSource;

impl EuropePmcSource {
    /// Parse a search response body
    pub fn parse_search_response(json: &str) -> Result<SearchResponse, SourceError> {
        serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid Europe PMC JSON: {}", e)))
    }
}

/// Europe PMC REST client
pub struct EuropePmcClient {
    http: HttpClient,
    endpoint: String,
    result_type: String,
    throttle: Throttle,
}

impl EuropePmcClient {
    pub fn new(config: &EuropePmcConfig) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(&config.user_agent, Duration::from_secs(config.timeout_secs))?,
            endpoint: config.endpoint.clone(),
            result_type: config.result_type.clone(),
            throttle: Throttle::new(Duration::from_millis(config.request_interval_ms)),
        })
    }
}

impl LiteratureSearch for EuropePmcClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, SourceError> {
        self.throttle.wait().await;
        debug!(query, "Searching Europe PMC");

        let params = [
            ("query", query),
            ("format", "json"),
            ("resultType", self.result_type.as_str()),
        ];
        let response = self.http.get_with_params(&self.endpoint, &params).await?;
        if response.status != 200 {
            return Err(SourceError::Status {
                status: response.status,
            });
        }

        EuropePmcSource::parse_search_response(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "version": "6.9",
        "hitCount": 1,
        "request": {"queryString": "10.1101/2023.05.01.538901", "resultType": "core"},
        "resultList": {
            "result": [{
                "id": "PPR654321",
                "source": "PPR",
                "doi": "10.1101/2023.05.01.538901",
                "title": "A fast aligner",
                "pubYear": "2023",
                "commentCorrectionList": {
                    "commentCorrection": [{
                        "id": "38000001",
                        "source": "MED",
                        "type": "Preprint of",
                        "orderIn": 10001
                    }]
                }
            }]
        }
    }"#;

    #[test]
    fn test_parse_search_response() {
        let response = EuropePmcSource::parse_search_response(SAMPLE_RESPONSE).unwrap();
        assert_eq!(response.hit_count, 1);
        let first = response.first().unwrap();
        assert!(first.is_preprint_source());
        assert_eq!(first.corrections().len(), 1);
        assert_eq!(first.corrections()[0].id.as_deref(), Some("38000001"));
        assert_eq!(first.corrections()[0].kind.as_deref(), Some("Preprint of"));
        assert_eq!(
            first.identifiers(),
            PublicationIdentifier::from_doi("10.1101/2023.05.01.538901")
        );
    }

    #[test]
    fn test_parse_empty_response() {
        let response =
            EuropePmcSource::parse_search_response(r#"{"hitCount": 0, "resultList": {"result": []}}"#)
                .unwrap();
        assert!(!response.has_hits());
        assert!(response.first().is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            EuropePmcSource::parse_search_response("<html>"),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn test_exclusion_query_is_verbatim() {
        assert_eq!(
            exclusion_query("38000001", "10.1101/2023.05.01.538901"),
            r#"ext_id:"38000001" NOT DOI:"10.1101/2023.05.01.538901""#
        );
    }

    #[test]
    fn test_identifiers_skip_missing_values() {
        let result = SearchResult {
            pmid: Some("38000001".to_string()),
            pmcid: Some("PMC1000001".to_string()),
            ..Default::default()
        };
        let ids = result.identifiers();
        assert_eq!(ids.doi, None);
        assert_eq!(ids.pmid.as_deref(), Some("38000001"));
        assert_eq!(ids.pmcid.as_deref(), Some("PMC1000001"));
    }
}
