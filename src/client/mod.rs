use reqwest::{Certificate, Client, Method, Proxy, Response};
use serde_json::Value;
use std::{fmt, time::Duration};
use tracing::error;
use url::Url;

use crate::{
    config::ConnectionArgs,
    error::{Errors, ProviderError},
};

const RESPONSE_SIZE_MAX_BYTES: usize = 8388608; // 8MB
const TENANT_HEADER: &str = "X-FusionAuth-TenantId";
const ERROR_BODY_MAX_CHARS: usize = 2048;

/// Path of a FusionAuth API call.
///
/// Ids are kept apart from the fixed prefix and escaped as single path segments
/// when the URL is built, so an id can never point a request at another endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    prefix: &'static str,
    segments: Vec<String>,
}

impl ApiPath {
    pub fn new(prefix: &'static str) -> Self {
        ApiPath {
            prefix,
            segments: Vec::new(),
        }
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }
}

impl From<&'static str> for ApiPath {
    fn from(prefix: &'static str) -> Self {
        ApiPath::new(prefix)
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Handle on a single FusionAuth instance, shared by every resource and data source.
#[derive(Clone)]
pub struct FusionAuthClient {
    base: Url,
    api_key: String,
    http: Client,
}

async fn read_body_limit(
    buffer: &mut Vec<u8>,
    mut response: Response,
    limit: usize,
) -> Result<(), ProviderError> {
    while let Some(chunk) = response.chunk().await? {
        if buffer.len() + chunk.len() > limit {
            return Err(ProviderError::ResponseTooLarge { limit });
        }
        buffer.extend(chunk);
    }
    Ok(())
}

impl FusionAuthClient {
    pub fn new(base: Url, api_key: impl Into<String>, http: Client) -> Self {
        FusionAuthClient {
            base,
            api_key: api_key.into(),
            http,
        }
    }

    /// Builds the HTTP pool from CLI/environment configuration
    pub fn from_args(args: &ConnectionArgs) -> Result<Self, ProviderError> {
        let certificates = rustls_native_certs::load_native_certs().map_err(|error| {
            error!(reason = %error, "Could not load system certificates");
            anyhow::Error::from(error).context("loading system certificates")
        })?;

        let mut http_builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(args.timeout);
        for cert in certificates.iter() {
            match Certificate::from_der(cert.as_ref()) {
                Ok(cert) => http_builder = http_builder.add_root_certificate(cert),
                Err(error) => tracing::warn!(reason = %error, "Skipping invalid system certificate"),
            }
        }
        if let Some(proxy) = &args.http_proxy {
            let proxy = Proxy::all(proxy)?.no_proxy(args.no_proxy.clone());
            http_builder = http_builder.proxy(proxy);
        }
        let http = http_builder.build()?;
        Ok(FusionAuthClient::new(
            args.host.clone(),
            args.api_key.clone(),
            http,
        ))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &ApiPath, query: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let build_error = || ProviderError::BuildUrl {
            base: self.base.to_string(),
            path: path.to_string(),
        };
        if let Some(segment) = path
            .segments
            .iter()
            .find(|segment| matches!(segment.as_str(), "" | "." | ".."))
        {
            return Err(ProviderError::invalid(
                "id",
                format!("{segment:?} is not a valid FusionAuth id"),
            ));
        }
        let mut url = self
            .base
            .join(path.prefix.trim_start_matches('/'))
            .map_err(|_| build_error())?;
        if !path.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| build_error())?
                .extend(&path.segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Performs one request against the FusionAuth API.
    ///
    /// Returns `Value::Null` for empty response bodies. Any non-2xx status is
    /// returned as `ProviderError::Api` carrying FusionAuth's error payload.
    pub async fn send(
        &self,
        method: Method,
        path: ApiPath,
        query: &[(&str, &str)],
        tenant_id: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, ProviderError> {
        let url = self.url(&path, query)?;
        tracing::debug!(%method, %url, "FusionAuth request");
        let mut request = self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(tenant_id) = tenant_id {
            request = request.header(TENANT_HEADER, tenant_id);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();

        let mut buffer = Vec::new();
        read_body_limit(&mut buffer, response, RESPONSE_SIZE_MAX_BYTES).await?;

        if !status.is_success() {
            let errors = serde_json::from_slice::<Errors>(&buffer).ok();
            let body: String = String::from_utf8_lossy(&buffer)
                .trim()
                .chars()
                .take(ERROR_BODY_MAX_CHARS)
                .collect();
            tracing::debug!(%status, %body, "FusionAuth returned an error status");
            return Err(ProviderError::Api {
                status,
                errors,
                body,
            });
        }
        if buffer.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&buffer)?)
    }

    pub async fn get(
        &self,
        path: impl Into<ApiPath>,
        tenant_id: Option<&str>,
    ) -> Result<Value, ProviderError> {
        self.send(Method::GET, path.into(), &[], tenant_id, None)
            .await
    }

    pub async fn search(
        &self,
        path: impl Into<ApiPath>,
        query: &[(&str, &str)],
        tenant_id: Option<&str>,
    ) -> Result<Value, ProviderError> {
        self.send(Method::GET, path.into(), query, tenant_id, None).await
    }

    pub async fn post(
        &self,
        path: impl Into<ApiPath>,
        tenant_id: Option<&str>,
        body: &Value,
    ) -> Result<Value, ProviderError> {
        self.send(Method::POST, path.into(), &[], tenant_id, Some(body))
            .await
    }

    pub async fn put(
        &self,
        path: impl Into<ApiPath>,
        tenant_id: Option<&str>,
        body: &Value,
    ) -> Result<Value, ProviderError> {
        self.send(Method::PUT, path.into(), &[], tenant_id, Some(body))
            .await
    }

    pub async fn delete(
        &self,
        path: impl Into<ApiPath>,
        query: &[(&str, &str)],
        tenant_id: Option<&str>,
    ) -> Result<(), ProviderError> {
        self.send(Method::DELETE, path.into(), query, tenant_id, None)
            .await
            .map(|_| ())
    }
}

/// Pulls the named object out of a FusionAuth response envelope such as `{"lambda": {...}}`.
pub fn unwrap_envelope(mut response: Value, key: &'static str) -> Result<Value, ProviderError> {
    match response.get_mut(key).map(Value::take) {
        Some(value) if value.is_object() => Ok(value),
        _ => Err(ProviderError::MissingEnvelope { key }),
    }
}

/// Pulls the named array out of a FusionAuth list response such as `{"lambdas": [...]}`.
/// A missing key means an empty list.
pub fn unwrap_list(mut response: Value, key: &'static str) -> Vec<Value> {
    match response.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}
