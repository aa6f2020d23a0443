//! Ramp developer API client
//!
//! Client-credentials token acquisition plus cursor-paginated listing.

use std::fmt;
use std::time::Duration;

use reqwest::{Method, Response, Url};
use serde::Deserialize;
use serde_json::Value;
use spendview_domain::{ProviderConfig, Result, SpendViewError};
use tracing::{debug, info, warn};

use super::pagination::{next_page, page_records, NextPage};
use crate::http::HttpClient;

const TOKEN_PATH: &str = "/developer/v1/token";
const TOKEN_SCOPE: &str =
    "transactions:read reimbursements:read receipts:read users:read departments:read";
/// Upper bound on response bodies quoted in error messages.
const MAX_ERROR_BODY: usize = 512;

/// Listings fetched from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Transactions,
    Reimbursements,
    SpendCategories,
    SpendPrograms,
    Receipts,
    Memos,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Transactions => "/developer/v1/transactions",
            Self::Reimbursements => "/developer/v1/reimbursements",
            Self::SpendCategories => "/developer/v1/sk_categories",
            Self::SpendPrograms => "/developer/v1/spend-programs",
            Self::Receipts => "/developer/v1/receipts",
            Self::Memos => "/developer/v1/memos",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Reimbursements => "reimbursements",
            Self::SpendCategories => "spend_categories",
            Self::SpendPrograms => "spend_programs",
            Self::Receipts => "receipts",
            Self::Memos => "memos",
        }
    }

    /// Transactions and reimbursements make up the table itself; the rest
    /// only decorate it.
    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Transactions | Self::Reimbursements)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All records of one listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paged {
    pub records: Vec<Value>,
    pub pages: u32,
    /// Stopped at the page limit while the provider still offered more
    pub truncated: bool,
}

#[derive(Deserialize)]
struct TokenGrant {
    access_token: String,
}

#[derive(Clone)]
pub struct RampClient {
    http: HttpClient,
    base_url: Url,
    client_id: String,
    client_secret: String,
    page_limit: u32,
    max_pages: u32,
}

impl fmt::Debug for RampClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RampClient")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("page_limit", &self.page_limit)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl RampClient {
    /// # Errors
    /// `SpendViewError::Config` when credentials are missing or the base URL
    /// does not parse.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let (client_id, client_secret) = config.credentials().ok_or_else(|| {
            SpendViewError::Config(
                "Ramp credentials not configured (RAMP_CLIENT_ID / RAMP_CLIENT_SECRET)".into(),
            )
        })?;

        let base_url = Url::parse(&config.resolved_base_url())
            .map_err(|e| SpendViewError::Config(format!("Invalid provider base URL: {e}")))?;

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .max_attempts(config.max_attempts)
            .build()?;

        Ok(Self {
            http,
            base_url,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            page_limit: config.page_limit.max(1),
            max_pages: config.max_pages.max(1),
        })
    }

    /// Replace the transport (tests tune backoff and timeouts).
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SpendViewError::Config(format!("Invalid provider URL {path}: {e}")))
    }

    /// Exchange the client credentials for a bearer token. Never retried.
    ///
    /// # Errors
    /// `SpendViewError::UpstreamAuth` carrying the status and body on any
    /// non-success answer.
    pub async fn access_token(&self) -> Result<String> {
        let request = self
            .http
            .request(Method::POST, self.endpoint(TOKEN_PATH)?)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials"), ("scope", TOKEN_SCOPE)]);

        let response = self.http.send_once(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            warn!(status = status.as_u16(), "provider token request rejected");
            return Err(SpendViewError::UpstreamAuth { status: status.as_u16(), body });
        }

        let grant: TokenGrant = response.json().await.map_err(|e| SpendViewError::UpstreamAuth {
            status: status.as_u16(),
            body: format!("unreadable token response: {e}"),
        })?;

        debug!("provider access token acquired");
        Ok(grant.access_token)
    }

    /// Follow the listing's pagination until it ends or the page limit is hit.
    pub async fn fetch_paged(&self, resource: Resource, token: &str) -> Result<Paged> {
        let first = self.endpoint(resource.path())?;
        let mut paged = Paged::default();
        let mut next: Option<NextPage> = None;

        loop {
            let url = match next.take() {
                None => with_query(first.clone(), &[("limit", self.page_limit.to_string())]),
                Some(NextPage::Cursor(cursor)) => with_query(
                    first.clone(),
                    &[("limit", self.page_limit.to_string()), ("start", cursor)],
                ),
                Some(NextPage::Url(raw)) => self.same_origin(resource, &raw)?,
            };

            let response = self
                .http
                .send(self.http.request(Method::GET, url).bearer_auth(token))
                .await
                .map_err(|err| resource_error(resource, err))?;

            let status = response.status();
            if !status.is_success() {
                let body = read_error_body(response).await;
                return Err(SpendViewError::UpstreamResource {
                    resource: resource.name().to_string(),
                    message: format!("HTTP {}: {}", status.as_u16(), body),
                });
            }

            let mut envelope: Value = response.json().await.map_err(|e| {
                SpendViewError::UpstreamResource {
                    resource: resource.name().to_string(),
                    message: format!("unreadable page: {e}"),
                }
            })?;

            let records = page_records(&mut envelope);
            paged.pages += 1;
            debug!(%resource, page = paged.pages, records = records.len(), "fetched page");
            paged.records.extend(records);

            match next_page(&envelope) {
                None => break,
                Some(_) if paged.pages >= self.max_pages => {
                    paged.truncated = true;
                    warn!(%resource, pages = paged.pages, "listing truncated at page limit");
                    break;
                }
                Some(pointer) => next = Some(pointer),
            }
        }

        info!(%resource, pages = paged.pages, records = paged.records.len(), "listing fetched");
        Ok(paged)
    }

    /// Only follow absolute next-page URLs on the configured origin, so the
    /// bearer token never leaves it.
    fn same_origin(&self, resource: Resource, raw: &str) -> Result<Url> {
        let url = Url::parse(raw).map_err(|e| SpendViewError::UpstreamResource {
            resource: resource.name().to_string(),
            message: format!("invalid next-page URL: {e}"),
        })?;

        if url.origin() != self.base_url.origin() {
            return Err(SpendViewError::UpstreamResource {
                resource: resource.name().to_string(),
                message: format!(
                    "next-page URL points at a foreign origin: {}",
                    url.origin().ascii_serialization()
                ),
            });
        }
        Ok(url)
    }
}

fn with_query(mut url: Url, params: &[(&str, String)]) -> Url {
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    url
}

/// Transport failures keep their timeout classification; everything else
/// is attributed to the resource.
fn resource_error(resource: Resource, err: SpendViewError) -> SpendViewError {
    match err {
        SpendViewError::Timeout { after_ms, .. } => {
            SpendViewError::Timeout { operation: format!("fetch {resource}"), after_ms }
        }
        other => SpendViewError::UpstreamResource {
            resource: resource.name().to_string(),
            message: other.to_string(),
        },
    }
}

async fn read_error_body(response: Response) -> String {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
