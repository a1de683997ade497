//! Comtrade trade statistics client
//!
//! Queries the trade statistics API and aggregates the returned records:
//! - Validated query parameters with API defaults
//! - Blocking request/response pipeline with validation metadata history
//! - Typed trade-flow records with name-based field access
//! - Sums and truncated averages, optionally grouped by any record fields
//!
//! ```no_run
//! use comtrade::ComtradeClient;
//!
//! # fn main() -> comtrade::ComtradeResult<()> {
//! let mut client = ComtradeClient::new()?;
//! client.params_mut().set_reporter("40")?;
//! client.params_mut().set_trade_flow("2")?;
//!
//! let mut data = client.retrieve()?;
//! let per_partner = data.remove_world().sum_by("tradeValueUSD", &["partnerName"])?;
//! # let _ = per_partner;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fields;
pub mod params;
pub mod record;
pub mod valid_values;

pub use client::{ComtradeClient, MetadataHistory, ValidationMetadata, build_query_url};
pub use config::ClientConfig;
pub use dataset::DataSet;
pub use error::{ComtradeError, ComtradeResult};
pub use fields::FieldValue;
pub use params::ParameterStore;
pub use record::{DataRow, TradeQuantity};
pub use valid_values::{ReferenceLists, ValidParameterProvider};
