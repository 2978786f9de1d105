//! Query validation and shaping of fetched rates into a report

use crate::core::error::QueryError;
use crate::core::rates::{CurrencyQuote, RateFetcher, Report};
use chrono::{Days, Local, NaiveDate};
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 10;

/// Currencies included in every query.
pub const MANDATORY_CURRENCIES: [&str; 2] = ["USD", "EUR"];

/// A validated request: dates in descending order ending today, and the
/// upper-cased currency codes to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    dates: Vec<NaiveDate>,
    currencies: BTreeSet<String>,
}

impl Query {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn currencies(&self) -> &BTreeSet<String> {
        &self.currencies
    }

    pub fn contains_currency(&self, code: &str) -> bool {
        self.currencies.contains(&code.to_uppercase())
    }

    /// Upper-cases every currency code. Safe to call any number of times.
    pub fn normalize_currencies(&mut self) {
        self.currencies = std::mem::take(&mut self.currencies)
            .into_iter()
            .map(|c| c.to_uppercase())
            .collect();
    }
}

/// Validates the command line input against the local calendar date.
pub fn parse_input(days: Option<&str>, currencies: &[String]) -> Result<Query, QueryError> {
    parse_input_at(days, currencies, Local::now().date_naive())
}

pub fn parse_input_at(
    days: Option<&str>,
    currencies: &[String],
    today: NaiveDate,
) -> Result<Query, QueryError> {
    let days = parse_days(days.ok_or(QueryError::MissingArgument)?)?;

    let dates = (0..days)
        .map_while(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .collect();

    let currencies = MANDATORY_CURRENCIES
        .iter()
        .map(|c| c.to_string())
        .chain(currencies.iter().cloned())
        .collect();

    let mut query = Query { dates, currencies };
    query.normalize_currencies();
    debug!(?query, "Parsed query");
    Ok(query)
}

fn parse_days(raw: &str) -> Result<u32, QueryError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QueryError::InvalidInput);
    }
    // All digits, so the only possible parse failure is overflow.
    let days: u32 = raw.parse().map_err(|_| QueryError::InvalidRange)?;
    if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
        return Err(QueryError::InvalidRange);
    }
    Ok(days)
}

/// Fetches rates for every date of `query` and keeps only the requested
/// currencies. Dates whose request failed have no entry in the report.
#[instrument(name = "QueryRates", skip_all)]
pub async fn query_rates(
    query: Option<Query>,
    fetcher: &dyn RateFetcher,
    on_complete: &(dyn Fn() + Send + Sync),
) -> Report {
    let Some(mut query) = query else {
        return Report::new();
    };
    query.normalize_currencies();

    let raw_results = fetcher.fetch(query.dates(), on_complete).await;

    let mut report = Report::new();
    for raw in raw_results.into_iter().flatten() {
        let quotes = raw
            .exchange_rate
            .iter()
            .filter(|entry| {
                entry
                    .currency
                    .as_deref()
                    .is_some_and(|code| query.contains_currency(code))
            })
            .filter_map(|entry| {
                let quote = CurrencyQuote::from_entry(entry);
                if quote.is_none() {
                    warn!(
                        date = %raw.date,
                        entry = ?entry,
                        "Skipping rate entry without buy/sale values"
                    );
                }
                quote
            })
            .collect();
        report.insert(raw.date, quotes);
    }

    debug!(dates = report.len(), "Built report");
    report
}
