//! bio.agents registry API client
//!
//! Token login, agent validation and agent insertion. Inserts are spaced by
//! a fixed delay so a large batch does not hammer the registry.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::http::{HttpClient, HttpResponse};
use pub2agents_domain::Agent;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    key: Option<String>,
}

/// Registry answer to a validate or insert call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryOutcome {
    pub accepted: bool,
    pub status: u16,
    pub body: String,
}

impl From<HttpResponse> for RegistryOutcome {
    fn from(response: HttpResponse) -> Self {
        Self {
            accepted: response.is_success(),
            status: response.status,
            body: response.body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertProblem {
    pub agent_id: String,
    pub error: String,
}

/// Summary of a batch insert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InsertReport {
    pub added: usize,
    pub total: usize,
    pub problems: Vec<InsertProblem>,
}

pub struct RegistryClient {
    http: HttpClient,
    config: RegistryConfig,
}

impl RegistryClient {
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let http = HttpClient::new(
            concat!("pub2agents/", env!("CARGO_PKG_VERSION")),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self { http, config })
    }

    /// Exchange credentials for an API token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, RegistryError> {
        let response = self
            .http
            .post_json(
                &self.config.login_url(),
                &[],
                &LoginRequest { username, password },
            )
            .await?;

        if !response.is_success() {
            return Err(RegistryError::LoginRejected {
                status: response.status,
                body: response.body,
            });
        }

        let login: LoginResponse = serde_json::from_str(&response.body)?;
        login.key.ok_or(RegistryError::MissingToken)
    }

    /// Ask the registry whether an agent would be accepted, without storing it
    pub async fn validate_agent(
        &self,
        agent: &Agent,
        token: &str,
    ) -> Result<RegistryOutcome, RegistryError> {
        self.post_agent(&self.config.validate_url(), agent, token)
            .await
    }

    pub async fn insert_agent(
        &self,
        agent: &Agent,
        token: &str,
    ) -> Result<RegistryOutcome, RegistryError> {
        self.post_agent(&self.config.agent_url(), agent, token).await
    }

    /// Insert agents one by one. With `write_enabled` off nothing is sent.
    pub async fn add_agents(&self, agents: &[Agent], token: &str, write_enabled: bool) -> InsertReport {
        let mut report = InsertReport {
            total: agents.len(),
            ..Default::default()
        };
        if !write_enabled {
            info!(count = agents.len(), "Registry writes disabled, skipping insert");
            return report;
        }

        let delay = Duration::from_millis(self.config.insert_delay_ms);
        for (index, agent) in agents.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let agent_id = agent.identity_key().to_string();
            match self.insert_agent(agent, token).await {
                Ok(outcome) if outcome.accepted => {
                    info!(agent = %agent_id, status = outcome.status, "Added agent");
                    report.added += 1;
                }
                Ok(outcome) => {
                    warn!(agent = %agent_id, status = outcome.status, "Registry rejected agent");
                    report.problems.push(InsertProblem {
                        agent_id,
                        error: outcome.body,
                    });
                }
                Err(e) => {
                    warn!(agent = %agent_id, error = %e, "Insert failed");
                    report.problems.push(InsertProblem {
                        agent_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Total agents added: {} out of a total of: {}",
            report.added, report.total
        );
        if !report.problems.is_empty() {
            warn!(count = report.problems.len(), "Agents with problems");
        }
        report
    }

    async fn post_agent(
        &self,
        url: &str,
        agent: &Agent,
        token: &str,
    ) -> Result<RegistryOutcome, RegistryError> {
        let authorization = format!("Token {}", token);
        let response = self
            .http
            .post_json(url, &[("Authorization", authorization.as_str())], agent)
            .await?;
        Ok(response.into())
    }
}
