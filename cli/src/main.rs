//! Comtrade CLI - quick looks at the trade statistics API

#![deny(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use comtrade::params::names;
use comtrade::record::group_thousands;
use comtrade::{ClientConfig, ComtradeClient, ReferenceLists, ValidParameterProvider};
use regex::Regex;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_TOP_COUNT: usize = 5;

/// Pause after each ranked listing to stay under the API's rate limit
const LISTING_PAUSE: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "comtrade")]
#[command(about = "Query and summarise international trade statistics")]
#[command(version)]
struct Cli {
    /// Print every trade flow with the World partner
    #[arg(short = 'o', long)]
    overview: bool,

    /// Top export partners of a reporter, one listing per occurrence
    #[arg(
        short = 'e',
        long,
        action = ArgAction::Append,
        num_args = 1..=2,
        value_names = ["REPORTER", "COUNT"]
    )]
    top_exports: Option<Vec<Vec<String>>>,

    /// Top import partners of a reporter, one listing per occurrence
    #[arg(
        short = 'i',
        long,
        action = ArgAction::Append,
        num_args = 1..=2,
        value_names = ["REPORTER", "COUNT"]
    )]
    top_imports: Option<Vec<Vec<String>>>,

    /// Period for every query of this run, wherever the flag appears:
    /// YYYY, YYYYMM, "now" or "recent", comma-separated
    #[arg(short = 'p', long)]
    period: Option<String>,

    /// List valid values of a parameter, optionally filtered
    #[arg(short = 'l', long, num_args = 1..=2, value_names = ["PARAMETER", "FILTER"])]
    lookup: Option<Vec<String>>,

    /// Client configuration file
    #[arg(long)]
    config: Option<String>,
}

/// Direction of a ranked partner listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Exports,
    Imports,
}

impl Flow {
    fn code(self) -> &'static str {
        match self {
            Flow::Exports => "2",
            Flow::Imports => "1",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Flow::Exports => "exports to",
            Flow::Imports => "imports from",
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => ClientConfig::default(),
    };
    debug!("Using API endpoint {}", config.base_url);

    let mut defaults: Vec<(&str, String)> = Vec::new();
    if let Some(period) = &cli.period {
        info!("Setting period to {}", period);
        defaults.push((names::TIME_PERIOD, period.clone()));
        defaults.push((names::DATA_FREQUENCY, frequency_for_period(period)?.to_string()));
    }

    let no_action = !cli.overview
        && cli.top_exports.is_none()
        && cli.top_imports.is_none()
        && cli.lookup.is_none();

    let mut sections = Vec::new();
    if cli.overview || no_action {
        sections.push(Section::Overview);
    }
    for args in cli.top_exports.iter().flatten() {
        let (reporter, count) = parse_top_args(args)?;
        sections.push(Section::Top(Flow::Exports, reporter, count));
    }
    for args in cli.top_imports.iter().flatten() {
        let (reporter, count) = parse_top_args(args)?;
        sections.push(Section::Top(Flow::Imports, reporter, count));
    }
    if let Some(args) = &cli.lookup {
        sections.push(Section::Lookup(args[0].clone(), args.get(1).cloned()));
    }

    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            println!("\n");
        }
        match section {
            Section::Overview => print_overview(&config, &defaults)?,
            Section::Top(flow, reporter, count) => {
                print_top_partners(&config, &defaults, *flow, reporter, *count)?;
                thread::sleep(LISTING_PAUSE);
            }
            Section::Lookup(parameter, filter) => {
                print_valid_values(&config, parameter, filter.as_deref())?
            }
        }
    }

    Ok(())
}

enum Section {
    Overview,
    Top(Flow, String, usize),
    Lookup(String, Option<String>),
}

fn new_client(config: &ClientConfig, defaults: &[(&str, String)]) -> Result<ComtradeClient> {
    let mut client = ComtradeClient::with_config(config.clone())?;
    client
        .params_mut()
        .set_params(defaults.iter().map(|(name, value)| (*name, value.as_str())));
    Ok(client)
}

fn print_overview(config: &ClientConfig, defaults: &[(&str, String)]) -> Result<()> {
    let mut client = new_client(config, defaults)?;
    client.params_mut().set_partner_area("0")?;

    println!("- Overview of trade flows:");
    for row in &client.retrieve()? {
        println!("{row}");
    }
    client.close();
    Ok(())
}

fn print_top_partners(
    config: &ClientConfig,
    defaults: &[(&str, String)],
    flow: Flow,
    reporter: &str,
    count: usize,
) -> Result<()> {
    let mut client = new_client(config, defaults)?;
    client.params_mut().set_trade_flow(flow.code())?;
    client.params_mut().set_reporter(reporter)?;
    client.params_mut().set_partner_area("all")?;

    let data = client.retrieve()?;
    let partners: Vec<_> = data
        .ranked_by_trade_value()
        .into_iter()
        .filter(|row| !row.is_world())
        .take(count)
        .collect();

    if let Some(first) = partners.first() {
        println!(
            "- Listing the top {} areas that {} {}:",
            count,
            first.reporter_name().unwrap_or(reporter),
            flow.verb()
        );
    }
    for row in partners {
        println!(
            "{} (USD {})",
            row.partner_name().unwrap_or("?"),
            row.trade_value_usd().map_or_else(|| "?".to_string(), group_thousands)
        );
    }
    client.close();
    Ok(())
}

fn print_valid_values(config: &ClientConfig, parameter: &str, filter: Option<&str>) -> Result<()> {
    let lists = ReferenceLists::new(config)?;
    let values = match filter {
        Some(filter) => lists.lookup_matching(parameter, filter)?,
        None => lists.lookup(parameter)?,
    };

    println!("- Valid values for \"{parameter}\":");
    for (code, label) in values {
        println!("{code}: {label}");
    }
    Ok(())
}

/// Monthly when any entry of the period list is a `YYYYMM` value
fn frequency_for_period(period: &str) -> Result<&'static str> {
    let monthly = Regex::new(r"(^|,)\d{6}(,|$)")?;
    Ok(if monthly.is_match(period) { "M" } else { "A" })
}

fn parse_top_args(args: &[String]) -> Result<(String, usize)> {
    let Some(reporter) = args.first() else {
        bail!("a reporter code is required");
    };
    let count = match args.get(1) {
        Some(raw) if raw.chars().all(|c| c.is_ascii_digit()) => raw
            .parse()
            .with_context(|| format!("count out of range: {raw}"))?,
        Some(raw) => bail!("count must be a non-negative integer, got {raw:?}"),
        None => DEFAULT_TOP_COUNT,
    };
    Ok((reporter.clone(), count))
}
