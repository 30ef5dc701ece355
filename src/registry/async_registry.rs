//! Async wrapper around a blocking registry.
//!
//! Lookups run on `tokio::task::spawn_blocking` so an HTTP round trip never
//! stalls the async runtime.

use super::PostalCodeRegistry;
use crate::domain::postal_code::registry_answer;
use crate::domain::{PostalCode, PostalCodeError};
use crate::error::{RegistryError, RegistryResult};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Async counterpart of [`PostalCodeRegistry`].
#[async_trait]
pub trait AsyncPostalCodeRegistry: Send + Sync {
    async fn exists(&self, code: &PostalCode) -> RegistryResult<bool>;
}

/// Runs a blocking [`PostalCodeRegistry`] on the blocking thread pool.
#[derive(Clone)]
pub struct AsyncRegistry {
    inner: Arc<dyn PostalCodeRegistry>,
}

impl AsyncRegistry {
    pub fn new<R>(registry: R) -> Self
    where
        R: PostalCodeRegistry + 'static,
    {
        Self {
            inner: Arc::new(registry),
        }
    }

    pub fn from_arc(inner: Arc<dyn PostalCodeRegistry>) -> Self {
        Self { inner }
    }

    /// Check several codes, at most `concurrency` at a time.
    ///
    /// Results come back in the same order as `codes`.
    pub async fn exists_many(
        &self,
        codes: Vec<PostalCode>,
        concurrency: usize,
    ) -> Vec<(PostalCode, RegistryResult<bool>)> {
        stream::iter(codes)
            .map(|code| {
                let registry = self.clone();
                async move {
                    let result = registry.exists(&code).await;
                    (code, result)
                }
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

#[async_trait]
impl AsyncPostalCodeRegistry for AsyncRegistry {
    async fn exists(&self, code: &PostalCode) -> RegistryResult<bool> {
        let registry = self.inner.clone();
        let code = *code;

        tokio::task::spawn_blocking(move || registry.exists(&code))
            .await
            .map_err(|e| RegistryError::Http(format!("Task join error: {}", e)))?
    }
}

/// Async form of [`crate::domain::validate_postal_code`].
pub async fn validate_postal_code_async(
    text: &str,
    registry: &dyn AsyncPostalCodeRegistry,
) -> Result<(), PostalCodeError> {
    let code = PostalCode::parse(text)?;
    registry_answer(code, registry.exists(&code).await).map(|_| ())
}
