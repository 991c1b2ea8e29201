//! Primary/fallback execution shared by every pipeline stage.
//!
//! The executor never propagates provider errors. It reports what happened in a
//! [`FallbackOutcome`] and lets the caller decide: item-level stages degrade to a
//! sentinel with [`FallbackOutcome::value_or`], batch-level stages surface total
//! failure with [`FallbackOutcome::into_result`].

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderUsed {
    Primary,
    Fallback,
    /// Neither provider produced a value.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct FallbackOutcome<T> {
    pub value: Option<T>,
    pub used: ProviderUsed,
    pub provider: Option<String>,
    pub failures: Vec<ProviderFailure>,
}

impl<T> FallbackOutcome<T> {
    pub fn is_exhausted(&self) -> bool {
        self.value.is_none()
    }

    /// Item-level resolution: total failure becomes `sentinel`.
    pub fn value_or(self, sentinel: T) -> T {
        self.value.unwrap_or(sentinel)
    }

    /// Batch-level resolution: total failure becomes [`Error::BatchFailure`].
    pub fn into_result(self, capability: &str) -> Result<T> {
        if let Some(value) = self.value {
            return Ok(value);
        }
        let reason = |index: usize| {
            self.failures
                .get(index)
                .map(|f| format!("{}: {}", f.provider, f.reason))
                .unwrap_or_else(|| "not attempted".to_string())
        };
        Err(Error::BatchFailure {
            capability: capability.to_string(),
            primary: reason(0),
            fallback: reason(1),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FallbackExecutor {
    timeout: Option<Duration>,
}

impl FallbackExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Runs `primary`; on any error (or timeout) logs it and runs `fallback`.
    ///
    /// Each side is given as `(provider name, closure producing the call)`. The
    /// fallback closure is only invoked when the primary fails.
    pub async fn run<T, P, PFut, F, FFut>(
        &self,
        capability: &str,
        (primary_name, primary): (&str, P),
        (fallback_name, fallback): (&str, F),
    ) -> FallbackOutcome<T>
    where
        P: FnOnce() -> PFut,
        PFut: Future<Output = Result<T>>,
        F: FnOnce() -> FFut,
        FFut: Future<Output = Result<T>>,
    {
        let mut failures = Vec::new();

        match self.call(primary()).await {
            Ok(value) => {
                info!("✅ {} served by primary provider {}", capability, primary_name);
                return FallbackOutcome {
                    value: Some(value),
                    used: ProviderUsed::Primary,
                    provider: Some(primary_name.to_string()),
                    failures,
                };
            }
            Err(e) => {
                warn!(
                    "⚠️ {} primary provider {} failed, falling back to {}: {}",
                    capability, primary_name, fallback_name, e
                );
                failures.push(ProviderFailure {
                    provider: primary_name.to_string(),
                    reason: e.to_string(),
                });
            }
        }

        match self.call(fallback()).await {
            Ok(value) => {
                info!("✅ {} served by fallback provider {}", capability, fallback_name);
                FallbackOutcome {
                    value: Some(value),
                    used: ProviderUsed::Fallback,
                    provider: Some(fallback_name.to_string()),
                    failures,
                }
            }
            Err(e) => {
                error!("❌ {} fallback provider {} failed: {}", capability, fallback_name, e);
                failures.push(ProviderFailure {
                    provider: fallback_name.to_string(),
                    reason: e.to_string(),
                });
                FallbackOutcome {
                    value: None,
                    used: ProviderUsed::None,
                    provider: None,
                    failures,
                }
            }
        }
    }

    async fn call<T>(&self, future: impl Future<Output = Result<T>>) -> Result<T> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .unwrap_or(Err(Error::Timeout(limit.as_secs()))),
            None => future.await,
        }
    }
}
