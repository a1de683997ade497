//! Field accessor registry
//!
//! Maps field names to typed extractors over a [`DataRow`]. The table is
//! fixed and built on first use; every documented field is listed under its
//! canonical name and under the upstream API's short name.

use crate::error::{ComtradeError, ComtradeResult};
use crate::record::{DataRow, TradeQuantity};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::LazyLock;

/// A single field value read from a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 32-bit integer column
    Int(i32),
    /// 64-bit integer column
    Long(i64),
    /// Text column
    Text(String),
    /// Column absent or `null`
    Null,
}

impl FieldValue {
    /// Whether the value is absent
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Coerce to a 64-bit integer
    ///
    /// Numbers convert directly, text is parsed as a base-10 integer.
    /// Returns `None` for null and for text that does not parse.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(i64::from(*v)),
            FieldValue::Long(v) => Some(*v),
            FieldValue::Text(s) => s.parse().ok(),
            FieldValue::Null => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Long(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Null => Ok(()),
        }
    }
}

/// Extractor for one field
pub type FieldAccessor = fn(&DataRow) -> FieldValue;

fn int(value: Option<i32>) -> FieldValue {
    value.map_or(FieldValue::Null, FieldValue::Int)
}

fn long(value: Option<i64>) -> FieldValue {
    value.map_or(FieldValue::Null, FieldValue::Long)
}

fn text(value: Option<&str>) -> FieldValue {
    value.map_or(FieldValue::Null, |s| FieldValue::Text(s.to_string()))
}

fn quantity(row: &DataRow) -> FieldValue {
    match row.trade_quantity() {
        Some(TradeQuantity::Integer(v)) => FieldValue::Long(*v),
        // Debug keeps the fraction ("2.0"), so decimals never coerce to integers
        Some(TradeQuantity::Decimal(v)) => FieldValue::Text(format!("{v:?}")),
        Some(TradeQuantity::Text(s)) => FieldValue::Text(s.clone()),
        None => FieldValue::Null,
    }
}

/// Canonical name, upstream short name, extractor
const FIELD_TABLE: &[(&str, &str, FieldAccessor)] = &[
    ("classification", "pfCode", |r| text(r.classification())),
    ("year", "yr", |r| int(r.year())),
    ("period", "period", |r| int(r.period())),
    ("periodLabel", "periodDesc", |r| text(r.period_label())),
    ("aggregationLevel", "aggrLevel", |r| int(r.aggregation_level())),
    ("isLeaf", "IsLeaf", |r| int(r.is_leaf())),
    ("tradeFlowCode", "rgCode", |r| int(r.trade_flow_code())),
    ("tradeFlowLabel", "rgDesc", |r| text(r.trade_flow_label())),
    ("reporterCode", "rtCode", |r| int(r.reporter_code())),
    ("reporterName", "rtTitle", |r| text(r.reporter_name())),
    ("reporterISO3", "rt3ISO", |r| text(r.reporter_iso3())),
    ("partnerCode", "ptCode", |r| int(r.partner_code())),
    ("partnerName", "ptTitle", |r| text(r.partner_name())),
    ("partnerISO3", "pt3ISO", |r| text(r.partner_iso3())),
    ("commodityCode", "cmdCode", |r| text(r.commodity_code())),
    ("commodityLabel", "cmdDescE", |r| text(r.commodity_label())),
    ("quantityUnitCode", "qtCode", |r| int(r.quantity_unit_code())),
    ("quantityUnitLabel", "qtDesc", |r| text(r.quantity_unit_label())),
    ("tradeQuantity", "TradeQuantity", quantity),
    ("netWeightKg", "NetWeight", |r| text(r.net_weight_kg())),
    ("tradeValueUSD", "TradeValue", |r| long(r.trade_value_usd())),
    ("estimationFlag", "estCode", |r| int(r.estimation_flag())),
];

static REGISTRY: LazyLock<FxHashMap<&'static str, FieldAccessor>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    for (name, short_name, accessor) in FIELD_TABLE {
        map.insert(*name, *accessor);
        map.insert(*short_name, *accessor);
    }
    map
});

/// Resolve a field name to its extractor
///
/// Names are case-sensitive.
pub fn accessor(field: &str) -> ComtradeResult<FieldAccessor> {
    REGISTRY
        .get(field)
        .copied()
        .ok_or_else(|| ComtradeError::UnknownField {
            field: field.to_string(),
        })
}

/// Read a field from a record by name
pub fn get(row: &DataRow, field: &str) -> ComtradeResult<FieldValue> {
    Ok(accessor(field)?(row))
}

/// Canonical field names in record order
pub fn field_names() -> impl Iterator<Item = &'static str> {
    FIELD_TABLE.iter().map(|(name, _, _)| *name)
}
