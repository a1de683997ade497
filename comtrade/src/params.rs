//! Query parameter store with per-parameter validation

use crate::error::{ComtradeError, ComtradeResult};
use std::collections::BTreeMap;

/// Query parameter names understood by the API
pub mod names {
    /// Reporter area
    pub const REPORTER: &str = "r";
    /// Data frequency
    pub const DATA_FREQUENCY: &str = "freq";
    /// Time period
    pub const TIME_PERIOD: &str = "ps";
    /// Classification scheme
    pub const CLASSIFICATION: &str = "px";
    /// Partner area
    pub const PARTNER_AREA: &str = "p";
    /// Trade flow
    pub const TRADE_FLOW: &str = "rg";
    /// Classification code
    pub const CLASSIFICATION_CODE: &str = "cc";
    /// Result limit
    pub const LIMIT: &str = "max";
    /// Trade data type
    pub const TRADE_DATA_TYPE: &str = "type";
    /// Response format
    pub const FORMAT: &str = "fmt";
    /// Header style
    pub const HEADINGS: &str = "head";
}

/// Largest limit the API accepts
pub const MAX_LIMIT: i64 = 50_000;

const ALL: &str = "all";

/// Parameter values sent with every request unless overridden
pub const DEFAULTS: &[(&str, &str)] = &[
    (names::FORMAT, "json"),
    (names::REPORTER, ALL),
    (names::DATA_FREQUENCY, "A"),
    (names::TIME_PERIOD, "now"),
    (names::CLASSIFICATION, "HS"),
    (names::PARTNER_AREA, ALL),
    (names::TRADE_FLOW, ALL),
    (names::CLASSIFICATION_CODE, "TOTAL"),
    (names::LIMIT, "50000"),
    (names::TRADE_DATA_TYPE, "C"),
    (names::HEADINGS, "H"),
];

/// One value per parameter name, iterated in lexicographic key order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterStore {
    params: BTreeMap<String, String>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self {
            params: DEFAULTS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl ParameterStore {
    /// Store holding the API defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with no parameters at all
    pub fn empty() -> Self {
        Self {
            params: BTreeMap::new(),
        }
    }

    /// Current value of a parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Iterate `(name, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameter is set
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Set any parameter without validation
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    /// Merge several parameters without validation
    pub fn set_params<I, K, V>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in params {
            self.set_param(name, value);
        }
    }

    /// Reporter area: `"all"` or a non-negative area code
    pub fn set_reporter(&mut self, reporter: &str) -> ComtradeResult<()> {
        if !is_all_or_code(reporter, 0) {
            return Err(ComtradeError::invalid_parameter(
                names::REPORTER,
                "only \"all\" or numeric area codes are allowed for the reporter area",
            ));
        }
        self.set_param(names::REPORTER, reporter);
        Ok(())
    }

    /// Partner area: `"all"` or a non-negative area code (0 is "World")
    pub fn set_partner_area(&mut self, partner_area: &str) -> ComtradeResult<()> {
        if !is_all_or_code(partner_area, 0) {
            return Err(ComtradeError::invalid_parameter(
                names::PARTNER_AREA,
                "only \"all\" or numeric area codes are allowed for the partner area",
            ));
        }
        self.set_param(names::PARTNER_AREA, partner_area);
        Ok(())
    }

    /// Trade flow: `"all"` or a positive code (1 imports, 2 exports,
    /// 3 re-exports, 4 re-imports)
    pub fn set_trade_flow(&mut self, trade_flow: &str) -> ComtradeResult<()> {
        if !is_all_or_code(trade_flow, 1) {
            return Err(ComtradeError::invalid_parameter(
                names::TRADE_FLOW,
                "only \"all\" or positive integers are allowed for the trade flow",
            ));
        }
        self.set_param(names::TRADE_FLOW, trade_flow);
        Ok(())
    }

    /// Maximum number of records, between 1 and [`MAX_LIMIT`]
    pub fn set_limit(&mut self, limit: i64) -> ComtradeResult<()> {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ComtradeError::invalid_parameter(
                names::LIMIT,
                "limit has to be between 0 (exclusive) and 50000",
            ));
        }
        self.set_param(names::LIMIT, limit.to_string());
        Ok(())
    }

    /// Trade data type: `"C"` commodities or `"S"` services
    pub fn set_trade_data_type(&mut self, trade_data_type: &str) -> ComtradeResult<()> {
        if !matches!(trade_data_type, "C" | "S") {
            return Err(ComtradeError::invalid_parameter(
                names::TRADE_DATA_TYPE,
                "only \"C\" or \"S\" are allowed as trade data types",
            ));
        }
        self.set_param(names::TRADE_DATA_TYPE, trade_data_type);
        Ok(())
    }

    /// Data frequency, `"A"` annual or `"M"` monthly
    pub fn set_data_frequency(&mut self, frequency: &str) {
        self.set_param(names::DATA_FREQUENCY, frequency);
    }

    /// Time period: `YYYY`, `YYYYMM`, `"now"` or `"recent"`, comma-separated
    /// lists allowed
    pub fn set_time_period(&mut self, period: &str) {
        self.set_param(names::TIME_PERIOD, period);
    }

    /// Classification scheme, e.g. `"HS"`
    pub fn set_classification(&mut self, classification: &str) {
        self.set_param(names::CLASSIFICATION, classification);
    }

    /// Classification codes to list, e.g. `"TOTAL"`
    pub fn set_classification_code(&mut self, code: &str) {
        self.set_param(names::CLASSIFICATION_CODE, code);
    }
}

fn is_all_or_code(value: &str, min: i32) -> bool {
    value == ALL || value.parse::<i32>().is_ok_and(|code| code >= min)
}
