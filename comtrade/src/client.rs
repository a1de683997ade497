//! Request/response pipeline
//!
//! Builds the query URL from a [`ParameterStore`], performs one blocking GET,
//! decodes the `{"validation": {...}, "dataset": [...]}` body and records the
//! validation block in the client's [`MetadataHistory`].

use crate::config::ClientConfig;
use crate::dataset::DataSet;
use crate::error::{ComtradeError, ComtradeResult};
use crate::params::ParameterStore;
use crate::valid_values::ReferenceLists;
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::form_urlencoded;

/// Opaque `validation` object returned with every data response
pub type ValidationMetadata = serde_json::Map<String, Value>;

/// Validation metadata of completed requests, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataHistory {
    entries: Vec<ValidationMetadata>,
}

impl MetadataHistory {
    fn push(&mut self, metadata: ValidationMetadata) {
        self.entries.push(metadata);
    }

    /// Metadata of the most recent request
    pub fn latest(&self) -> Option<&ValidationMetadata> {
        self.entries.last()
    }

    /// Iterate from the most recent request back to the first
    pub fn recent_first(&self) -> impl Iterator<Item = &ValidationMetadata> {
        self.entries.iter().rev()
    }

    /// All entries in request order
    pub fn entries(&self) -> &[ValidationMetadata] {
        &self.entries
    }

    /// Number of completed requests
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no request has completed yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Append the parameters to `base_url` as a query string
///
/// Pairs follow the store's key order; values are form-encoded.
pub fn build_query_url(base_url: &str, params: &ParameterStore) -> String {
    let mut url = String::from(base_url);
    for (i, (name, value)) in params.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(name);
        url.push('=');
        url.extend(form_urlencoded::byte_serialize(value.as_bytes()));
    }
    url
}

/// Client for the trade statistics API
///
/// Owns the HTTP connection pool, the parameters of the next request and the
/// metadata of all previous ones. The pool is released when the client is
/// dropped or [`closed`](Self::close).
#[derive(Debug)]
pub struct ComtradeClient {
    config: ClientConfig,
    params: ParameterStore,
    http: Client,
    history: MetadataHistory,
}

impl ComtradeClient {
    /// Client for the public endpoint with default parameters
    pub fn new() -> ComtradeResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Client for a different data endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> ComtradeResult<Self> {
        Self::with_config(ClientConfig::with_base_url(base_url))
    }

    /// Client built from an explicit configuration
    pub fn with_config(config: ClientConfig) -> ComtradeResult<Self> {
        let http = config.http_client()?;
        debug!("Comtrade client created for {}", config.base_url);
        Ok(Self {
            config,
            params: ParameterStore::new(),
            http,
            history: MetadataHistory::default(),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Parameters for the next request
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    /// Mutable access to the parameters for the next request
    pub fn params_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }

    /// Validation metadata of all requests so far
    pub fn metadata_history(&self) -> &MetadataHistory {
        &self.history
    }

    /// URL the next request will use
    pub fn api_url(&self) -> String {
        build_query_url(&self.config.base_url, &self.params)
    }

    /// Run the query for the current parameters
    pub fn execute(&mut self) -> ComtradeResult<(DataSet, ValidationMetadata)> {
        let url = self.api_url();
        self.execute_url(&url)
    }

    /// Run a query against an arbitrary endpoint and parameter set
    pub fn execute_request(
        &mut self,
        base_url: &str,
        params: &ParameterStore,
    ) -> ComtradeResult<(DataSet, ValidationMetadata)> {
        self.execute_url(&build_query_url(base_url, params))
    }

    /// Run the query for the current parameters, keeping only the records
    pub fn retrieve(&mut self) -> ComtradeResult<DataSet> {
        self.execute().map(|(data, _)| data)
    }

    /// Reference value lists sharing this client's connection pool
    pub fn reference_lists(&self) -> ReferenceLists {
        ReferenceLists::with_http(self.config.reference_base_url.clone(), self.http.clone())
    }

    /// Release the HTTP client
    pub fn close(self) {
        debug!(
            "Closing Comtrade client after {} request(s)",
            self.history.len()
        );
    }

    fn execute_url(&mut self, url: &str) -> ComtradeResult<(DataSet, ValidationMetadata)> {
        debug!("GET {}", url);
        let body = read_body(self.http.get(url).send()?)?;
        let (data, metadata) = decode_response(&body)?;
        info!("Retrieved {} record(s)", data.len());
        self.history.push(metadata.clone());
        Ok((data, metadata))
    }
}

/// Check the status and read the body as text
///
/// The body is decoded with the charset named by `Content-Type`, UTF-8 when
/// none is given.
pub(crate) fn read_body(response: Response) -> ComtradeResult<String> {
    let status = response.status();
    if status.as_u16() >= 300 {
        warn!("Request to {} failed with {}", response.url(), status);
        return Err(ComtradeError::HttpStatus {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }
    let body = response.text()?;
    let body = body.strip_prefix('\u{feff}').unwrap_or(&body);
    if body.is_empty() {
        return Err(ComtradeError::EmptyBody);
    }
    Ok(body.to_string())
}

fn decode_response(body: &str) -> ComtradeResult<(DataSet, ValidationMetadata)> {
    let Value::Object(mut response) = serde_json::from_str::<Value>(body)? else {
        return Err(malformed("top-level value is not an object"));
    };
    let metadata = match response.remove("validation") {
        Some(Value::Object(metadata)) => metadata,
        Some(_) => return Err(malformed("\"validation\" is not an object")),
        None => return Err(malformed("\"validation\" is missing")),
    };
    let data = match response.remove("dataset") {
        Some(rows @ Value::Array(_)) => serde_json::from_value::<DataSet>(rows)?,
        Some(_) => return Err(malformed("\"dataset\" is not an array")),
        None => return Err(malformed("\"dataset\" is missing")),
    };
    Ok((data, metadata))
}

fn malformed(reason: &str) -> ComtradeError {
    warn!("Malformed response: {}", reason);
    ComtradeError::MalformedResponse {
        reason: reason.to_string(),
    }
}
