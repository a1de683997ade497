//! Trade-flow record as returned in the `dataset` array

use serde::{Deserialize, Serialize};
use std::fmt;

/// Partner code of the aggregate "World" partner
pub const WORLD_PARTNER_CODE: i32 = 0;

/// Trade quantity as delivered upstream
///
/// The API is not consistent about this column: some responses carry a
/// number, others a string. Both are kept as delivered and reconciled only
/// when aggregating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TradeQuantity {
    /// Whole number quantity
    Integer(i64),
    /// Fractional or out-of-range quantity
    Decimal(f64),
    /// Quantity delivered as text
    Text(String),
}

/// One trade-flow observation
///
/// Fully populated by deserialization and read-only afterwards. Columns the
/// API leaves out or sends as `null` are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRow {
    #[serde(alias = "pfCode")]
    classification: Option<String>,
    #[serde(alias = "yr")]
    year: Option<i32>,
    period: Option<i32>,
    #[serde(alias = "periodDesc")]
    period_label: Option<String>,
    #[serde(alias = "aggrLevel")]
    aggregation_level: Option<i32>,
    #[serde(alias = "IsLeaf")]
    is_leaf: Option<i32>,
    #[serde(alias = "rgCode")]
    trade_flow_code: Option<i32>,
    #[serde(alias = "rgDesc")]
    trade_flow_label: Option<String>,
    #[serde(alias = "rtCode")]
    reporter_code: Option<i32>,
    #[serde(alias = "rtTitle")]
    reporter_name: Option<String>,
    #[serde(rename = "reporterISO3", alias = "rt3ISO")]
    reporter_iso3: Option<String>,
    #[serde(alias = "ptCode")]
    partner_code: Option<i32>,
    #[serde(alias = "ptTitle")]
    partner_name: Option<String>,
    #[serde(rename = "partnerISO3", alias = "pt3ISO")]
    partner_iso3: Option<String>,
    #[serde(alias = "cmdCode")]
    commodity_code: Option<String>,
    #[serde(alias = "cmdDescE")]
    commodity_label: Option<String>,
    #[serde(alias = "qtCode")]
    quantity_unit_code: Option<i32>,
    #[serde(alias = "qtDesc")]
    quantity_unit_label: Option<String>,
    #[serde(alias = "TradeQuantity")]
    trade_quantity: Option<TradeQuantity>,
    #[serde(alias = "NetWeight")]
    net_weight_kg: Option<String>,
    #[serde(rename = "tradeValueUSD", alias = "TradeValue")]
    trade_value_usd: Option<i64>,
    #[serde(alias = "estCode")]
    estimation_flag: Option<i32>,
}

impl DataRow {
    /// Classification scheme, e.g. "HS"
    pub fn classification(&self) -> Option<&str> {
        self.classification.as_deref()
    }

    /// Year of the observation
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Sub-year period, if applicable
    pub fn period(&self) -> Option<i32> {
        self.period
    }

    /// Human-readable period label
    pub fn period_label(&self) -> Option<&str> {
        self.period_label.as_deref()
    }

    /// Depth of the commodity code in its classification
    pub fn aggregation_level(&self) -> Option<i32> {
        self.aggregation_level
    }

    /// 1 for leaf commodity codes, 0 otherwise
    pub fn is_leaf(&self) -> Option<i32> {
        self.is_leaf
    }

    /// Trade flow code (1 imports, 2 exports, ...)
    pub fn trade_flow_code(&self) -> Option<i32> {
        self.trade_flow_code
    }

    /// Trade flow label
    pub fn trade_flow_label(&self) -> Option<&str> {
        self.trade_flow_label.as_deref()
    }

    /// Reporter area code
    pub fn reporter_code(&self) -> Option<i32> {
        self.reporter_code
    }

    /// Reporter area name
    pub fn reporter_name(&self) -> Option<&str> {
        self.reporter_name.as_deref()
    }

    /// Reporter ISO 3166 alpha-3 code
    pub fn reporter_iso3(&self) -> Option<&str> {
        self.reporter_iso3.as_deref()
    }

    /// Partner area code, 0 for "World"
    pub fn partner_code(&self) -> Option<i32> {
        self.partner_code
    }

    /// Partner area name
    pub fn partner_name(&self) -> Option<&str> {
        self.partner_name.as_deref()
    }

    /// Partner ISO 3166 alpha-3 code
    pub fn partner_iso3(&self) -> Option<&str> {
        self.partner_iso3.as_deref()
    }

    /// Commodity code
    pub fn commodity_code(&self) -> Option<&str> {
        self.commodity_code.as_deref()
    }

    /// Commodity label
    pub fn commodity_label(&self) -> Option<&str> {
        self.commodity_label.as_deref()
    }

    /// Quantity unit code
    pub fn quantity_unit_code(&self) -> Option<i32> {
        self.quantity_unit_code
    }

    /// Quantity unit label
    pub fn quantity_unit_label(&self) -> Option<&str> {
        self.quantity_unit_label.as_deref()
    }

    /// Traded quantity, numeric or textual
    pub fn trade_quantity(&self) -> Option<&TradeQuantity> {
        self.trade_quantity.as_ref()
    }

    /// Net weight in kg, kept as text
    pub fn net_weight_kg(&self) -> Option<&str> {
        self.net_weight_kg.as_deref()
    }

    /// Trade value in USD
    pub fn trade_value_usd(&self) -> Option<i64> {
        self.trade_value_usd
    }

    /// Estimation flag
    pub fn estimation_flag(&self) -> Option<i32> {
        self.estimation_flag
    }

    /// Whether the partner is the aggregate "World"
    pub fn is_world(&self) -> bool {
        self.partner_code == Some(WORLD_PARTNER_CODE)
    }
}

impl fmt::Display for DataRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} ({}) with partner {} ({}) in {}: commodity {}, value USD {}",
            text_or_null(self.trade_flow_label()),
            text_or_null(self.reporter_name()),
            number_or_null(self.reporter_code),
            text_or_null(self.partner_name()),
            number_or_null(self.partner_code),
            text_or_null(self.period_label()),
            text_or_null(self.commodity_label()),
            self.trade_value_usd
                .map_or_else(|| "null".to_string(), group_thousands),
        )
    }
}

fn text_or_null(value: Option<&str>) -> &str {
    value.unwrap_or("null")
}

fn number_or_null(value: Option<i32>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}

/// Render an integer with comma thousands separators, e.g. `1,234,567`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
