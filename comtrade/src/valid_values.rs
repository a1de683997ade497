//! Valid values for query parameters
//!
//! Some parameters accept codes from a published reference list, e.g. the
//! reporter and partner areas. The lists are `{"results": [{"id", "text"}]}`
//! documents served next to the data API.

use crate::client::read_body;
use crate::config::ClientConfig;
use crate::error::{ComtradeError, ComtradeResult};
use crate::params::names;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Source of the valid codes for a parameter, mapped to their labels
pub trait ValidParameterProvider {
    /// All valid codes for `parameter`
    fn lookup(&self, parameter: &str) -> ComtradeResult<BTreeMap<String, String>>;

    /// Valid codes whose code or label contains `filter`, ignoring case
    fn lookup_matching(
        &self,
        parameter: &str,
        filter: &str,
    ) -> ComtradeResult<BTreeMap<String, String>> {
        let needle = filter.to_lowercase();
        let mut values = self.lookup(parameter)?;
        values.retain(|code, label| {
            code.to_lowercase().contains(&needle) || label.to_lowercase().contains(&needle)
        });
        Ok(values)
    }
}

#[derive(Debug, Deserialize)]
struct ReferenceDocument {
    results: Vec<ReferenceEntry>,
}

#[derive(Debug, Deserialize)]
struct ReferenceEntry {
    id: String,
    text: String,
}

/// Reference list document for a parameter
pub fn reference_document(parameter: &str) -> ComtradeResult<&'static str> {
    match parameter {
        names::REPORTER => Ok("reporterAreas.json"),
        names::PARTNER_AREA => Ok("partnerAreas.json"),
        _ => Err(ComtradeError::UnsupportedParameter {
            name: parameter.to_string(),
        }),
    }
}

/// Provider backed by the published reference lists
#[derive(Debug, Clone)]
pub struct ReferenceLists {
    base_url: String,
    http: Client,
}

impl ReferenceLists {
    /// Provider using its own HTTP client
    pub fn new(config: &ClientConfig) -> ComtradeResult<Self> {
        Ok(Self::with_http(
            config.reference_base_url.clone(),
            config.http_client()?,
        ))
    }

    pub(crate) fn with_http(base_url: String, http: Client) -> Self {
        Self { base_url, http }
    }

    /// URL of the reference list for `parameter`
    pub fn list_url(&self, parameter: &str) -> ComtradeResult<String> {
        let document = reference_document(parameter)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), document))
    }
}

impl ValidParameterProvider for ReferenceLists {
    fn lookup(&self, parameter: &str) -> ComtradeResult<BTreeMap<String, String>> {
        let url = self.list_url(parameter)?;
        debug!("GET {}", url);
        let body = read_body(self.http.get(&url).send()?)?;
        let document: ReferenceDocument = serde_json::from_str(&body)?;
        debug!("{} valid value(s) for '{}'", document.results.len(), parameter);
        Ok(document
            .results
            .into_iter()
            .map(|entry| (entry.id, entry.text))
            .collect())
    }
}
