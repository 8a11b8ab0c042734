//! Boundary to the calculator collaborator. Timeouts and retries live here, never in the core.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use tracing::warn;

use crate::workflows::underwriting::{
    CalculatorService, CreditCalculation, LoanApplicationRequest, Offer, ScoringRequest,
};

/// Failure talking to the calculator. Surfaces as "service unavailable".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    #[error("calculator did not answer within {after_ms} ms")]
    Timeout { after_ms: u64 },
    #[error("calculator returned an empty response")]
    EmptyResponse,
    #[error("calculator rejected the request: {0}")]
    BadResponse(String),
    #[error("calculator unavailable: {0}")]
    Unavailable(String),
}

impl UpstreamError {
    fn is_retryable(&self) -> bool {
        !matches!(self, UpstreamError::BadResponse(_))
    }
}

/// Remote scoring capability consumed by the deal orchestrator.
#[async_trait]
pub trait RemoteScorer: Send + Sync {
    async fn offers(&self, request: &LoanApplicationRequest) -> Result<Vec<Offer>, UpstreamError>;

    async fn calculate(
        &self,
        request: &ScoringRequest,
    ) -> Result<CreditCalculation, UpstreamError>;
}

/// Runs the calculator in-process.
#[derive(Debug, Clone, Default)]
pub struct LocalScorer {
    service: Arc<CalculatorService>,
}

impl LocalScorer {
    pub fn new(service: Arc<CalculatorService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RemoteScorer for LocalScorer {
    async fn offers(&self, request: &LoanApplicationRequest) -> Result<Vec<Offer>, UpstreamError> {
        self.service
            .offers(request, Local::now().date_naive())
            .map_err(|errors| UpstreamError::BadResponse(errors.to_string()))
    }

    async fn calculate(
        &self,
        request: &ScoringRequest,
    ) -> Result<CreditCalculation, UpstreamError> {
        self.service
            .calculate(request, Local::now().date_naive())
            .map_err(|errors| UpstreamError::BadResponse(errors.to_string()))
    }
}

/// Wraps a scorer with a per-attempt timeout and a bounded number of retries.
///
/// `BadResponse` is returned immediately; every other failure is retried until `retries` extra
/// attempts have been spent.
#[derive(Debug, Clone)]
pub struct GuardedScorer<S> {
    inner: S,
    timeout: Duration,
    retries: u32,
}

impl<S> GuardedScorer<S>
where
    S: RemoteScorer,
{
    pub fn new(inner: S, timeout: Duration, retries: u32) -> Self {
        Self {
            inner,
            timeout,
            retries,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    async fn guarded<T, F, Fut>(&self, call: &'static str, op: F) -> Result<T, UpstreamError>
    where
        F: Fn() -> Fut + Send,
        Fut: Future<Output = Result<T, UpstreamError>> + Send,
        T: Send,
    {
        let mut attempt = 0;
        loop {
            let error = match tokio::time::timeout(self.timeout, op()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(error)) => error,
                Err(_) => UpstreamError::Timeout {
                    after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                },
            };

            if !error.is_retryable() || attempt >= self.retries {
                warn!(call, attempt, error = %error, "upstream call failed");
                return Err(error);
            }

            attempt += 1;
            warn!(call, attempt, error = %error, "retrying upstream call");
        }
    }
}

#[async_trait]
impl<S> RemoteScorer for GuardedScorer<S>
where
    S: RemoteScorer,
{
    async fn offers(&self, request: &LoanApplicationRequest) -> Result<Vec<Offer>, UpstreamError> {
        self.guarded("offers", || self.inner.offers(request)).await
    }

    async fn calculate(
        &self,
        request: &ScoringRequest,
    ) -> Result<CreditCalculation, UpstreamError> {
        self.guarded("calculate", || self.inner.calculate(request)).await
    }
}
