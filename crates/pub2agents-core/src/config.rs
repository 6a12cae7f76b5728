//! Configuration for pub2agents
//!
//! Centralized configuration for the search endpoint, link templates,
//! resolver policy and registry API. Defaults reproduce the constants the
//! curation pipeline has always used, so an empty or missing config file is
//! valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// System-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pub2AgentsConfig {
    /// Europe PMC search settings
    pub europepmc: EuropePmcConfig,
    /// Publication link templates
    pub links: LinkTemplates,
    /// Preprint resolver behavior
    pub resolver: ResolverConfig,
    /// bio.agents registry API
    pub registry: RegistryConfig,
    /// Agent post-processing
    pub processing: ProcessingConfig,
}

/// Europe PMC search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EuropePmcConfig {
    /// REST search endpoint
    pub endpoint: String,
    /// `resultType` query parameter
    pub result_type: String,
    /// Minimum delay between two searches in milliseconds
    pub request_interval_ms: u64,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for EuropePmcConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.ebi.ac.uk/europepmc/webservices/rest/search".to_string(),
            result_type: "core".to_string(),
            request_interval_ms: 200,
            timeout_secs: 30,
            user_agent: concat!("pub2agents/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Base URLs used to build `publication_link`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkTemplates {
    /// Prefix for DOI links
    pub doi_base: String,
    /// Prefix for PMID and PMCID links
    pub pubmed_base: String,
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self {
            doi_base: "https://doi.org/".to_string(),
            pubmed_base: "https://pubmed.ncbi.nlm.nih.gov/".to_string(),
        }
    }
}

/// How comment/correction entries of the canonical record are consulted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionPolicy {
    /// Only the first entry decides (historical behavior)
    #[default]
    FirstOnly,
    /// Any preprint entry marks a preprint; otherwise each entry is tried in
    /// order until a disambiguation search finds a match
    AllEntries,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub correction_policy: CorrectionPolicy,
}

/// bio.agents registry API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// API root, e.g. `https://bio-agents-dev.sdu.dk/api`
    pub host: String,
    pub login_path: String,
    pub agent_path: String,
    pub validate_path: String,
    /// Query string appended to every API URL
    pub format_query: String,
    /// Public prefix of agent pages; the bioagents ID is appended
    pub agent_link_base: String,
    /// Fixed delay between two inserts in milliseconds
    pub insert_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            host: "https://bio-agents-dev.sdu.dk/api".to_string(),
            login_path: "/rest-auth/login/".to_string(),
            agent_path: "/t".to_string(),
            validate_path: "/validate".to_string(),
            format_query: "?format=json".to_string(),
            agent_link_base: "https://bio-agents-dev.sdu.dk/".to_string(),
            insert_delay_ms: 2000,
            timeout_secs: 30,
        }
    }
}

impl RegistryConfig {
    pub fn login_url(&self) -> String {
        format!("{}{}{}", self.host, self.login_path, self.format_query)
    }

    pub fn agent_url(&self) -> String {
        format!("{}{}{}", self.host, self.agent_path, self.format_query)
    }

    pub fn validate_url(&self) -> String {
        format!(
            "{}{}{}{}",
            self.host, self.agent_path, self.validate_path, self.format_query
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Prefix of generated bioagents IDs
    pub id_prefix: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            id_prefix: "pub2agents2024__".to_string(),
        }
    }
}

impl Pub2AgentsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location: `<config dir>/pub2agents/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pub2agents").join("config.toml"))
    }

    /// Load from a TOML or JSON file (by extension). A missing file yields
    /// the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_toml(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("europepmc.endpoint", &self.europepmc.endpoint),
            ("europepmc.result_type", &self.europepmc.result_type),
            ("links.doi_base", &self.links.doi_base),
            ("links.pubmed_base", &self.links.pubmed_base),
            ("registry.host", &self.registry.host),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(name.to_string()));
            }
        }

        url::Url::parse(&self.europepmc.endpoint)
            .map_err(|e| ConfigError::InvalidUrl(format!("europepmc.endpoint: {}", e)))?;
        url::Url::parse(&self.registry.host)
            .map_err(|e| ConfigError::InvalidUrl(format!("registry.host: {}", e)))?;

        if self.europepmc.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange(
                "europepmc.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration loading or validation error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(String),
    #[error("Could not parse config: {0}")]
    Parse(String),
    /// Required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}
