//! Publication entries attached to an agent

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of bibliographic identifier, in link priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentifierKind {
    Doi,
    Pmid,
    Pmcid,
}

impl IdentifierKind {
    /// All kinds, highest link priority first
    pub fn by_priority() -> &'static [IdentifierKind] {
        &[IdentifierKind::Doi, IdentifierKind::Pmid, IdentifierKind::Pmcid]
    }
}

/// DOI / PMID / PMCID of a publication.
///
/// Absent identifiers are omitted when serialized, never written as `null`
/// or empty strings. A `null` read from JSON is treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmcid: Option<String>,
}

impl PublicationIdentifier {
    pub fn from_doi(doi: impl Into<String>) -> Self {
        Self {
            doi: Some(doi.into()),
            ..Default::default()
        }
    }

    /// Build from optional values, dropping any that are missing or blank
    pub fn from_parts(doi: Option<&str>, pmid: Option<&str>, pmcid: Option<&str>) -> Self {
        let keep = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            doi: keep(doi),
            pmid: keep(pmid),
            pmcid: keep(pmcid),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.doi.is_none() && self.pmid.is_none() && self.pmcid.is_none()
    }

    pub fn get(&self, kind: IdentifierKind) -> Option<&str> {
        match kind {
            IdentifierKind::Doi => self.doi.as_deref(),
            IdentifierKind::Pmid => self.pmid.as_deref(),
            IdentifierKind::Pmcid => self.pmcid.as_deref(),
        }
    }

    /// Highest-priority identifier present (DOI > PMID > PMCID)
    pub fn primary(&self) -> Option<(IdentifierKind, &str)> {
        IdentifierKind::by_priority()
            .iter()
            .find_map(|kind| self.get(*kind).map(|value| (*kind, value)))
    }
}

/// One entry of an agent's `publication` list.
///
/// The identifiers drive classification; everything else recorded on the
/// entry (`type`, `note`, `version`, ...) rides along in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(flatten)]
    pub ids: PublicationIdentifier,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<PublicationIdentifier> for Publication {
    fn from(ids: PublicationIdentifier) -> Self {
        Self {
            ids,
            extra: Map::new(),
        }
    }
}
