//! HTTP client for the ViaCEP postal-code service.
//!
//! ViaCEP answers `GET /{cep}/json/` with the address for a known code, with
//! a JSON object carrying an `erro` field for an unknown one, and with status
//! 400 for a malformed path. Everything else (transport failures, timeouts,
//! 5xx, bodies that are not JSON) is treated as "no answer".

use super::PostalCodeRegistry;
use crate::config::Config;
use crate::domain::PostalCode;
use crate::error::{RegistryError, RegistryResult};
use crate::metrics::Metrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Address data returned by ViaCEP for a known code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CepAddress {
    /// The code as formatted by the registry (`ddddd-ddd`)
    pub cep: String,

    #[serde(rename = "logradouro")]
    pub street: String,

    #[serde(rename = "complemento")]
    pub complement: String,

    #[serde(rename = "bairro")]
    pub neighbourhood: String,

    #[serde(rename = "localidade")]
    pub city: String,

    /// Two-letter state abbreviation
    #[serde(rename = "uf")]
    pub state: String,

    /// Telephone area code for the region
    pub ddd: String,
}

/// Blocking ViaCEP client.
///
/// Every request is bounded by the agent timeout. Call it from async code
/// through [`super::AsyncRegistry`].
#[derive(Clone)]
pub struct ViaCepClient {
    /// Base URL, without the trailing slash
    base_url: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl ViaCepClient {
    /// Create a new client from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config.viacep_base_url.clone(), config.timeout())
    }

    /// Create a client for a custom base URL (useful for testing).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn build_url(&self, code: &PostalCode) -> String {
        format!(
            "{}/{}/json/",
            self.base_url,
            urlencoding::encode(&code.digits())
        )
    }

    /// Fetch the address for `code`.
    ///
    /// Returns `Ok(None)` when the registry does not know the code.
    pub fn lookup(&self, code: &PostalCode) -> RegistryResult<Option<CepAddress>> {
        let start = Instant::now();
        let url = self.build_url(code);

        tracing::debug!("GET {}", url);
        let result = self.fetch(&url);
        self.metrics.record_lookup(start.elapsed());

        match &result {
            Ok(Some(_)) => tracing::debug!("CEP {} found", code),
            Ok(None) => {
                tracing::debug!("CEP {} not found", code);
                self.metrics.record_not_found();
            }
            Err(e) => {
                tracing::warn!("GET {} - Error: {}", url, e);
                self.metrics.record_unavailable();
            }
        }

        result
    }

    fn fetch(&self, url: &str) -> RegistryResult<Option<CepAddress>> {
        let response = match self.agent.get(url).set("Accept", "application/json").call() {
            Ok(response) => response,
            Err(ureq::Error::Status(400, _)) => return Ok(None),
            Err(e) => return Err(Self::map_error(e)),
        };

        let body = response
            .into_string()
            .map_err(|e| RegistryError::Http(e.to_string()))?;

        let value: serde_json::Value = serde_json::from_str(&body)?;
        if value.get("erro").is_some() {
            return Ok(None);
        }

        let address: CepAddress = serde_json::from_value(value)?;
        Ok(Some(address))
    }

    /// Map a ureq error to a RegistryError.
    fn map_error(error: ureq::Error) -> RegistryError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                RegistryError::Status {
                    status: code,
                    message,
                }
            }
            ureq::Error::Transport(transport) => match transport.kind() {
                ureq::ErrorKind::ConnectionFailed => {
                    RegistryError::Http("Connection failed".to_string())
                }
                ureq::ErrorKind::Io if Self::is_timeout(&transport) => RegistryError::Timeout,
                _ => RegistryError::Http(transport.to_string()),
            },
        }
    }

    // Socket read timeouts surface as WouldBlock on some platforms
    fn is_timeout(transport: &ureq::Transport) -> bool {
        std::error::Error::source(transport)
            .and_then(|e| e.downcast_ref::<std::io::Error>())
            .map(|e| {
                matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
                )
            })
            .unwrap_or(false)
    }
}

impl PostalCodeRegistry for ViaCepClient {
    fn exists(&self, code: &PostalCode) -> RegistryResult<bool> {
        self.lookup(code).map(|address| address.is_some())
    }
}

impl std::fmt::Debug for ViaCepClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViaCepClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
