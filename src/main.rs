//! cadastro - command-line validator for registration documents.
//!
//! Reads one JSON document from stdin:
//!
//! ```json
//! { "user": { "nome": "...", "email": "...", "cpf": "...", ... },
//!   "address": { "cep": "...", "numero": 10, "complemento": "..." } }
//! ```
//!
//! validates it against the ViaCEP registry and prints a JSON report on
//! stdout. Exits with status 1 when the document is invalid.

use anyhow::{Context, Result};
use cadastro::domain::ErrorKind;
use cadastro::models::{Address, NewAddress, NewUser, User};
use cadastro::{CachedRegistry, Config, MetricsSummary, RegistrationError, ViaCepClient};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct Document {
    user: NewUser,
    #[serde(default)]
    address: Option<NewAddress>,
}

#[derive(Debug, Serialize)]
struct FieldReport {
    form: &'static str,
    field: &'static str,
    kind: ErrorKind,
    message: String,
    retryable: bool,
}

impl FieldReport {
    fn new(form: &'static str, err: &RegistrationError) -> Self {
        Self {
            form,
            field: err.field(),
            kind: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    valid: bool,
    errors: Vec<FieldReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<Address>,
    lookups: MetricsSummary,
}

fn main() -> Result<ExitCode> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries the report
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Using CEP registry at {}", config.viacep_base_url);

    let client = ViaCepClient::new(&config);
    let metrics = client.metrics().clone();
    let registry = CachedRegistry::new(client, config.cache_ttl_secs()).with_metrics(metrics);

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    let document: Document =
        serde_json::from_str(&input).context("Input is not a registration document")?;

    let mut errors = Vec::new();

    let user = match document.user.validate() {
        Ok(user) => Some(user),
        Err(e) => {
            errors.push(FieldReport::new("user", &e));
            None
        }
    };

    let address = match document.address {
        Some(mut form) => {
            if let Err(e) = form.prefill_from(&registry) {
                error!("Could not prefill address for {}: {}", form.postal_code, e);
            }
            match form.validate(&registry) {
                Ok(address) => Some(address),
                Err(e) => {
                    errors.push(FieldReport::new("address", &e));
                    None
                }
            }
        }
        None => None,
    };

    for e in &errors {
        error!("{} {}: {}", e.form, e.field, e.message);
    }

    let report = Report {
        valid: errors.is_empty(),
        errors,
        user,
        address,
        lookups: registry.metrics().summary(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
