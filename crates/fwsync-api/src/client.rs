// Hand-crafted async HTTP client for the firewall provider API (v1).
//
// Base path: /v1/
// Auth: X-API-Key header

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::{
    Boundary, BoundaryCreate, BoundaryId, DescriptionUpdate, IngressCreate, IngressCreated,
    IngressGrouping, PermissionId, Segment, SegmentId,
};

// ── Error response shape from the provider ───────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the firewall provider API.
///
/// Constructed once per reconciliation run and passed by reference to the
/// engine — there is no ambient shared instance. Uses API-key
/// authentication and communicates via JSON REST endpoints under `/v1/`.
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ProviderClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    ///
    /// Injects `X-API-Key` as a sensitive default header on every request.
    pub fn from_api_key(
        base_url: &str,
        api_key: &secrecy::SecretString,
        transport: &crate::TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert("X-API-Key", key_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the endpoint URL and guarantee a trailing slash so that
    /// joining `v1/…` paths works uniformly.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"v1/segments"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidApiKey;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Segments ─────────────────────────────────────────────────────

    /// List every network segment of the account.
    ///
    /// `GET v1/segments`
    pub async fn list_segments(&self) -> Result<Vec<Segment>, Error> {
        self.get("v1/segments").await
    }

    // ── Boundaries ───────────────────────────────────────────────────

    /// Find boundaries by name within one segment.
    ///
    /// `GET v1/segments/{segment_id}/boundaries?name=`
    ///
    /// Names are unique per segment by construction, so the result has at
    /// most one element unless live state has drifted out-of-band.
    pub async fn find_boundaries(
        &self,
        segment_id: &SegmentId,
        name: &str,
    ) -> Result<Vec<Boundary>, Error> {
        self.get_with_params(
            &format!("v1/segments/{segment_id}/boundaries"),
            &[("name", name)],
        )
        .await
    }

    /// Create a boundary in a segment (provisioner only).
    ///
    /// `POST v1/segments/{segment_id}/boundaries`
    pub async fn create_boundary(
        &self,
        segment_id: &SegmentId,
        body: &BoundaryCreate,
    ) -> Result<Boundary, Error> {
        self.post(&format!("v1/segments/{segment_id}/boundaries"), body)
            .await
    }

    // ── Ingress permissions ──────────────────────────────────────────

    /// List every ingress permission grouping on a boundary.
    ///
    /// `GET v1/boundaries/{boundary_id}/ingress`
    pub async fn list_ingress(
        &self,
        boundary_id: &BoundaryId,
    ) -> Result<Vec<IngressGrouping>, Error> {
        self.get(&format!("v1/boundaries/{boundary_id}/ingress"))
            .await
    }

    /// Add one ingress permission entry, tagged with an operator-facing
    /// name.
    ///
    /// `POST v1/boundaries/{boundary_id}/ingress`
    pub async fn add_ingress(
        &self,
        boundary_id: &BoundaryId,
        body: &IngressCreate,
    ) -> Result<IngressCreated, Error> {
        self.post(&format!("v1/boundaries/{boundary_id}/ingress"), body)
            .await
    }

    /// Set the human-readable description of an existing permission entry.
    ///
    /// `PUT v1/boundaries/{boundary_id}/ingress/{permission_id}/description`
    pub async fn set_ingress_description(
        &self,
        boundary_id: &BoundaryId,
        permission_id: &PermissionId,
        description: &str,
    ) -> Result<(), Error> {
        self.put_no_response(
            &format!("v1/boundaries/{boundary_id}/ingress/{permission_id}/description"),
            &DescriptionUpdate {
                description: description.to_owned(),
            },
        )
        .await
    }
}
