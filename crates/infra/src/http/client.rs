use std::time::{Duration, Instant};

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use spendview_domain::SpendViewError;
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with built-in retry and timeout support.
///
/// The timeout applies to each attempt. A request that runs out of time is
/// dropped, which aborts the underlying connection.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, SpendViewError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, SpendViewError> {
        self.send_with_attempts(builder, self.max_attempts).await
    }

    /// Execute exactly once. Used for calls that must not be replayed, such
    /// as credential grants and authorization-code exchanges.
    pub async fn send_once(&self, builder: RequestBuilder) -> Result<Response, SpendViewError> {
        self.send_with_attempts(builder, 1).await
    }

    async fn send_with_attempts(
        &self,
        builder: RequestBuilder,
        attempts: usize,
    ) -> Result<Response, SpendViewError> {
        let attempts = attempts.max(1);

        for attempt in 0..attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                SpendViewError::Internal(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request = cloned_builder.build().map_err(|err| {
                let infra: InfraError = err.into();
                SpendViewError::from(infra)
            })?;

            let method = request.method().clone();
            let url = request.url().clone();
            let path = url.path().to_string();
            let started = Instant::now();
            debug!(attempt = attempt + 1, %method, %path, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(
                        attempt = attempt + 1,
                        %method,
                        %path,
                        %status,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "received HTTP response"
                    );

                    if (status.is_server_error() || status.as_u16() == 429)
                        && attempt + 1 < attempts
                    {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, %path, error = %err, "HTTP request failed");

                    let mapped = self.transport_error(err, &method, &path);
                    if attempt + 1 < attempts && mapped.is_retryable() {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }
                    return Err(mapped);
                }
            }
        }

        Err(SpendViewError::Internal(
            "http client exhausted retries without producing a result".into(),
        ))
    }

    fn transport_error(&self, err: reqwest::Error, method: &Method, path: &str) -> SpendViewError {
        if err.is_timeout() {
            return SpendViewError::Timeout {
                operation: format!("{method} {path}"),
                after_ms: self.timeout.as_millis() as u64,
            };
        }
        let infra: InfraError = err.into();
        SpendViewError::from(infra)
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn build(self) -> Result<HttpClient, SpendViewError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(concat!("spendview/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()
            .map_err(|err| {
                let infra: InfraError = err.into();
                SpendViewError::from(infra)
            })?;

        Ok(HttpClient {
            client,
            timeout: self.timeout,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}
