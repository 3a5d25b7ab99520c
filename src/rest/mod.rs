//! HTTP client for the hosted backend.
//!
//! One [`RestClient`] serves both halves of the remote surface: the
//! queryable store under `/rest/v1/<table>` and the identity service under
//! `/auth/v1/*`. The client is a thin pass-through: a request either
//! completes or fails; there is no retry, backoff, or caching here.
//!
//! Authentication headers follow the backend's convention: the publishable
//! `apikey` header is always sent, and `Authorization: Bearer` carries the
//! active session's access token when one exists, the anon key otherwise.
//! Row-level security on the server does the actual scoping.

pub mod query;

use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::BackendConfig;
use crate::error::ApiError;
use crate::rest::query::TableQuery;

/// Media type that makes the store return a bare object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Makes insert/update respond with the resulting row.
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base: Url,
    anon_key: secrecy::SecretString,
}

impl RestClient {
    pub fn new(config: &BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("linktolawyers/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base: config.url.clone(),
            anon_key: config.anon_key.clone(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        {
            // Base URL validity is enforced at config resolution.
            let mut path = url
                .path_segments_mut()
                .expect("backend URL is a valid base");
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url, bearer: Option<&str>) -> reqwest::RequestBuilder {
        let anon = self.anon_key.expose_secret();
        self.client
            .request(method, url)
            .header("apikey", anon)
            .bearer_auth(bearer.unwrap_or(anon))
    }

    // --- Queryable store --- //

    /// Run a select returning all matching rows.
    pub async fn select<T: DeserializeOwned>(
        &self,
        query: &TableQuery,
        bearer: Option<&str>,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint(&["rest", "v1", query.table()]);
        let builder = self
            .request(Method::GET, url, bearer)
            .query(&query.to_query_pairs());
        self.send(builder, query.table()).await
    }

    /// Run a select expected to match exactly one row.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        query: &TableQuery,
        bearer: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(&["rest", "v1", query.table()]);
        let builder = self
            .request(Method::GET, url, bearer)
            .header(ACCEPT, SINGLE_OBJECT)
            .query(&query.to_query_pairs());
        self.send(builder, query.table()).await
    }

    /// Insert one row and return the stored representation.
    pub async fn insert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &'static str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(&["rest", "v1", table]);
        let builder = self
            .request(Method::POST, url, bearer)
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body);
        self.send(builder, table).await
    }

    /// Patch the rows matched by `query` and return the updated row.
    ///
    /// Callers scope the query to a single row (by primary key); the store
    /// rejects the single-object response otherwise.
    pub async fn update_one<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        query: &TableQuery,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(&["rest", "v1", query.table()]);
        let builder = self
            .request(Method::PATCH, url, bearer)
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&query.to_query_pairs())
            .json(body);
        self.send(builder, query.table()).await
    }

    // --- Identity service --- //

    pub async fn auth_post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
        bearer: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(&["auth", "v1", path]);
        let builder = self
            .request(Method::POST, url, bearer)
            .query(query)
            .json(body);
        self.send(builder, path).await
    }

    /// POST where a success response carries no meaningful body (logout).
    pub async fn auth_post_empty(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["auth", "v1", path]);
        let builder = self.request(Method::POST, url, bearer);
        self.send_raw(builder, path).await.map(|_| ())
    }

    pub async fn auth_get<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(&["auth", "v1", path]);
        let builder = self.request(Method::GET, url, bearer);
        self.send(builder, path).await
    }

    // --- Send/receive plumbing --- //

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let body = self.send_raw(builder, endpoint).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn send_raw(
        &self,
        builder: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<String, ApiError> {
        debug!(endpoint, "backend request");
        let response = builder.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "backend request failed to send");
            ApiError::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Transport {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        if status.is_success() {
            Ok(body)
        } else {
            let rejected = rejection_from_body(status, &body);
            warn!(endpoint, status = status.as_u16(), error = %rejected, "backend rejected request");
            Err(rejected)
        }
    }
}

/// Shape of a store error body; the identity service uses different keys.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

fn rejection_from_body(status: StatusCode, body: &str) -> ApiError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let (message, code) = match parsed {
        Some(e) => {
            let message = e
                .message
                .or(e.msg)
                .or(e.error_description)
                .or(e.error)
                .unwrap_or_else(|| status.to_string());
            (message, e.code)
        }
        None => (status.to_string(), None),
    };
    ApiError::Rejected {
        status: status.as_u16(),
        code,
        message,
    }
}
