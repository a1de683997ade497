//! Record collection and aggregation engine

use crate::error::ComtradeResult;
use crate::fields::{self, FieldAccessor};
use crate::record::DataRow;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Separator between grouped field values in a group key
///
/// Values containing a comma are not escaped, so two distinct groups can
/// end up with the same key.
pub const GROUP_KEY_SEPARATOR: char = ',';

/// Ordered collection of records in API response order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSet {
    rows: Vec<DataRow>,
}

impl DataSet {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the collection holds no records
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate records in order
    pub fn iter(&self) -> std::slice::Iter<'_, DataRow> {
        self.rows.iter()
    }

    /// Records as a slice
    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    /// Append a record
    pub fn push(&mut self, row: DataRow) {
        self.rows.push(row);
    }

    /// Drop every record whose partner is the aggregate "World"
    pub fn remove_world(&mut self) -> &mut Self {
        self.rows.retain(|row| !row.is_world());
        self
    }

    /// New collection holding the records that match `predicate`
    pub fn filter<P>(&self, mut predicate: P) -> DataSet
    where
        P: FnMut(&DataRow) -> bool,
    {
        self.rows.iter().filter(|row| predicate(row)).cloned().collect()
    }

    /// Records sorted by trade value, largest first
    ///
    /// Records without a trade value sort last. Ties keep response order.
    pub fn ranked_by_trade_value(&self) -> Vec<&DataRow> {
        let mut ranked: Vec<&DataRow> = self.rows.iter().collect();
        ranked.sort_by_key(|row| Reverse(row.trade_value_usd()));
        ranked
    }

    /// All numeric values of `property`, ungrouped
    pub fn aggregate_values(&self, property: &str) -> ComtradeResult<Vec<i64>> {
        let mut groups = self.aggregate_values_by::<&str>(property, &[])?;
        Ok(groups.remove("").unwrap_or_default())
    }

    /// Numeric values of `property`, grouped by the values of `group_by`
    ///
    /// Group keys are the `group_by` values joined by
    /// [`GROUP_KEY_SEPARATOR`], null values becoming empty strings. An empty
    /// `group_by` puts every record under the key `""`. Records whose
    /// `property` is null or non-numeric text are skipped.
    pub fn aggregate_values_by<S>(
        &self,
        property: &str,
        group_by: &[S],
    ) -> ComtradeResult<BTreeMap<String, Vec<i64>>>
    where
        S: AsRef<str>,
    {
        let value_of = fields::accessor(property)?;
        let key_parts = group_by
            .iter()
            .map(|field| fields::accessor(field.as_ref()))
            .collect::<ComtradeResult<Vec<FieldAccessor>>>()?;

        let mut aggregation: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        for row in &self.rows {
            let Some(value) = value_of(row).as_i64() else {
                continue;
            };
            aggregation
                .entry(group_key(row, &key_parts))
                .or_default()
                .push(value);
        }
        Ok(aggregation)
    }

    /// Sum of `property` over the whole collection, 0 when nothing qualifies
    pub fn sum(&self, property: &str) -> ComtradeResult<i64> {
        Ok(total(&self.aggregate_values(property)?))
    }

    /// Sum of `property` per group
    pub fn sum_by<S>(&self, property: &str, group_by: &[S]) -> ComtradeResult<BTreeMap<String, i64>>
    where
        S: AsRef<str>,
    {
        Ok(self
            .aggregate_values_by(property, group_by)?
            .into_iter()
            .map(|(key, values)| (key, total(&values)))
            .collect())
    }

    /// Truncated mean of `property`, 0 when nothing qualifies
    pub fn average(&self, property: &str) -> ComtradeResult<i64> {
        Ok(truncated_mean(&self.aggregate_values(property)?))
    }

    /// Truncated mean of `property` per group
    pub fn average_by<S>(
        &self,
        property: &str,
        group_by: &[S],
    ) -> ComtradeResult<BTreeMap<String, i64>>
    where
        S: AsRef<str>,
    {
        Ok(self
            .aggregate_values_by(property, group_by)?
            .into_iter()
            .map(|(key, values)| (key, truncated_mean(&values)))
            .collect())
    }
}

fn group_key(row: &DataRow, key_parts: &[FieldAccessor]) -> String {
    let mut key = String::new();
    for (i, part) in key_parts.iter().enumerate() {
        if i > 0 {
            key.push(GROUP_KEY_SEPARATOR);
        }
        key.push_str(&part(row).to_string());
    }
    key
}

// Wraps on overflow like the 64-bit accumulator the API's consumers expect.
fn total(values: &[i64]) -> i64 {
    values.iter().fold(0_i64, |acc, v| acc.wrapping_add(*v))
}

fn truncated_mean(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    total(values) / values.len() as i64
}

impl FromIterator<DataRow> for DataSet {
    fn from_iter<I: IntoIterator<Item = DataRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<DataRow>> for DataSet {
    fn from(rows: Vec<DataRow>) -> Self {
        Self { rows }
    }
}

impl IntoIterator for DataSet {
    type Item = DataRow;
    type IntoIter = std::vec::IntoIter<DataRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a DataRow;
    type IntoIter = std::slice::Iter<'a, DataRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
