//! Agent (software/tool entry) as exchanged with pub2tools and the registry

use super::{Publication, PublicationIdentifier};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// EDAM ontology reference (operation or topic)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologyTerm {
    pub uri: String,
    pub term: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A function block listing the operations an agent performs
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub operation: Vec<OntologyTerm>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "typeEntity", default, skip_serializing_if = "Option::is_none")]
    pub type_entity: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditPermission {
    #[serde(rename = "type")]
    pub kind: String,
}

impl EditPermission {
    pub fn public() -> Self {
        Self {
            kind: "public".to_string(),
        }
    }
}

/// A cataloged software/tool entry and its publication metadata.
///
/// Fields the pipeline does not know about are kept in `extra` so that a
/// load/save round trip never drops data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default)]
    pub function: Vec<Function>,
    #[serde(default)]
    pub topic: Vec<OntologyTerm>,
    #[serde(default)]
    pub language: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default)]
    pub publication: Vec<Publication>,
    #[serde(default)]
    pub credit: Vec<Credit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_flag: Option<String>,
    #[serde(
        rename = "editPermission",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub edit_permission: Option<EditPermission>,
    #[serde(rename = "bioagentsID", default, skip_serializing_if = "Option::is_none")]
    pub bioagents_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_link: Option<String>,
    #[serde(default)]
    pub is_preprint: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Agent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The publication entry the pipeline reasons about (the first one)
    pub fn primary_publication(&self) -> Option<&Publication> {
        self.publication.first()
    }

    /// Identifiers of the primary publication; empty when there is none
    pub fn primary_identifiers(&self) -> PublicationIdentifier {
        self.primary_publication()
            .map(|p| p.ids.clone())
            .unwrap_or_default()
    }

    /// DOI of the primary publication, if any
    pub fn original_doi(&self) -> Option<&str> {
        self.primary_publication().and_then(|p| p.ids.doi.as_deref())
    }

    /// Key used to recognise the same agent across runs
    pub fn identity_key(&self) -> &str {
        self.bioagents_id.as_deref().unwrap_or(&self.name)
    }

    pub fn is_high_confidence(&self) -> bool {
        self.confidence_flag
            .as_deref()
            .map(|flag| flag.eq_ignore_ascii_case("high"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "SeqTool",
        "description": "Aligns things",
        "homepage": "https://example.org/seqtool",
        "function": [{"operation": [{"uri": "http://edamontology.org/operation_0292", "term": "Sequence alignment"}], "note": null}],
        "topic": [{"uri": "http://edamontology.org/topic_0080", "term": "Sequence analysis"}],
        "language": ["Rust"],
        "license": "MIT",
        "publication": [{"doi": "10.1101/2024.01.01.000001", "type": ["Primary"], "note": null, "version": "1"}],
        "credit": [{"name": "A. Author", "email": null, "typeEntity": "Person", "orcidid": "0000-0002-1825-0097", "typeRole": ["Developer"], "url": null}],
        "confidence_flag": "high",
        "pub2tools_score": 912.4
    }"#;

    #[test]
    fn test_parse_agent() {
        let agent: Agent = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(agent.name, "SeqTool");
        assert_eq!(agent.original_doi(), Some("10.1101/2024.01.01.000001"));
        assert!(agent.is_high_confidence());
        assert!(!agent.is_preprint);
        assert_eq!(agent.credit[0].type_entity.as_deref(), Some("Person"));
        assert_eq!(agent.function[0].operation[0].term, "Sequence alignment");
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let agent: Agent = serde_json::from_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&agent).unwrap();
        assert_eq!(value["pub2tools_score"], serde_json::json!(912.4));
        assert!(value["function"][0].get("note").is_some());
        assert_eq!(value["publication"][0]["type"], serde_json::json!(["Primary"]));
        assert_eq!(value["publication"][0]["version"], "1");
        assert_eq!(value["credit"][0]["orcidid"], "0000-0002-1825-0097");
        assert_eq!(value["credit"][0]["typeRole"], serde_json::json!(["Developer"]));
        assert_eq!(value["credit"][0].get("url"), Some(&serde_json::Value::Null));
        assert!(value["credit"][0].get("email").is_none());
    }

    #[test]
    fn test_primary_identifiers_ignore_extra_keys() {
        let agent: Agent = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(
            agent.primary_identifiers(),
            PublicationIdentifier::from_doi("10.1101/2024.01.01.000001")
        );
        assert!(Agent::new("bare").primary_identifiers().is_empty());
    }

    #[test]
    fn test_identity_key_prefers_bioagents_id() {
        let mut agent = Agent::new("SeqTool");
        assert_eq!(agent.identity_key(), "SeqTool");
        agent.bioagents_id = Some("pub2agents2024__seqtool".to_string());
        assert_eq!(agent.identity_key(), "pub2agents2024__seqtool");
    }

    #[test]
    fn test_confidence_is_case_insensitive() {
        let mut agent = Agent::new("x");
        agent.confidence_flag = Some("High".to_string());
        assert!(agent.is_high_confidence());
        agent.confidence_flag = Some("medium".to_string());
        assert!(!agent.is_high_confidence());
    }
}
