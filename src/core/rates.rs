//! Exchange rate types and the fetcher abstraction

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Date format used by the rates API, both in requests and in responses.
pub const API_DATE_FORMAT: &str = "%d.%m.%Y";

/// Response body for a single archive date.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDateResult {
    pub date: String,
    #[serde(default)]
    pub base_currency_lit: Option<String>,
    #[serde(default)]
    pub exchange_rate: Vec<RawRateEntry>,
}

/// One currency row of a [`RawDateResult`].
///
/// The API reports the bank's own rates (`purchaseRate`/`saleRate`) only for
/// some currencies; the national bank rates (`*NB`) are present for all of
/// them. The base currency row carries no `currency` at all.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRateEntry {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub purchase_rate: Option<Decimal>,
    #[serde(default, rename = "purchaseRateNB")]
    pub purchase_rate_nb: Option<Decimal>,
    #[serde(default)]
    pub sale_rate: Option<Decimal>,
    #[serde(default, rename = "saleRateNB")]
    pub sale_rate_nb: Option<Decimal>,
}

impl RawRateEntry {
    pub fn buy(&self) -> Option<Decimal> {
        self.purchase_rate.or(self.purchase_rate_nb)
    }

    pub fn sale(&self) -> Option<Decimal> {
        self.sale_rate.or(self.sale_rate_nb)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyQuote {
    pub name: String,
    pub buy: Decimal,
    pub sale: Decimal,
}

impl CurrencyQuote {
    /// Builds a quote preferring the bank rates over the national bank rates.
    /// Returns `None` for rows without a currency code or without any rate.
    pub fn from_entry(entry: &RawRateEntry) -> Option<Self> {
        Some(CurrencyQuote {
            name: entry.currency.clone()?,
            buy: entry.buy()?,
            sale: entry.sale()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRates {
    pub date: String,
    pub quotes: Vec<CurrencyQuote>,
}

/// Quotes keyed by the date string reported by the API, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: Vec<DateRates>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts quotes for `date`, replacing the quotes of an existing key in place.
    pub fn insert(&mut self, date: String, quotes: Vec<CurrencyQuote>) {
        match self.entries.iter_mut().find(|e| e.date == date) {
            Some(existing) => existing.quotes = quotes,
            None => self.entries.push(DateRates { date, quotes }),
        }
    }

    pub fn get(&self, date: &str) -> Option<&[CurrencyQuote]> {
        self.entries
            .iter()
            .find(|e| e.date == date)
            .map(|e| e.quotes.as_slice())
    }

    pub fn contains_date(&self, date: &str) -> bool {
        self.get(date).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DateRates> {
        self.entries.iter()
    }
}

/// Serializes as a map from date to quotes, keeping insertion order.
impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.date, &entry.quotes)?;
        }
        map.end()
    }
}

/// Fetches raw archive rates for a batch of dates.
#[async_trait]
pub trait RateFetcher: Send + Sync {
    /// Returns one slot per input date, in input order. A failed request
    /// yields `None` for its slot and never affects the other slots.
    /// `on_complete` is called once per finished request.
    async fn fetch(
        &self,
        dates: &[NaiveDate],
        on_complete: &(dyn Fn() + Send + Sync),
    ) -> Vec<Option<RawDateResult>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_decode_archive_response() {
        let body = r#"{
            "date": "01.12.2014",
            "bank": "PB",
            "baseCurrency": 980,
            "baseCurrencyLit": "UAH",
            "exchangeRate": [
                {"baseCurrency": "UAH", "saleRateNB": 1.0, "purchaseRateNB": 1.0},
                {"baseCurrency": "UAH", "currency": "USD", "saleRateNB": 15.056413,
                 "purchaseRateNB": 15.056413, "saleRate": 15.7, "purchaseRate": 15.35},
                {"baseCurrency": "UAH", "currency": "PLN", "saleRateNB": 4.4584,
                 "purchaseRateNB": 4.4584}
            ]
        }"#;

        let result: RawDateResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.date, "01.12.2014");
        assert_eq!(result.base_currency_lit.as_deref(), Some("UAH"));
        assert_eq!(result.exchange_rate.len(), 3);
        assert!(result.exchange_rate[0].currency.is_none());
        assert_eq!(result.exchange_rate[1].purchase_rate, Some(d("15.35")));
        assert_eq!(result.exchange_rate[2].purchase_rate, None);
        assert_eq!(result.exchange_rate[2].sale_rate_nb, Some(d("4.4584")));
    }

    #[test]
    fn test_quote_falls_back_to_national_bank_rates() {
        let entry = RawRateEntry {
            currency: Some("PLN".to_string()),
            purchase_rate: None,
            purchase_rate_nb: Some(d("4.45")),
            sale_rate: None,
            sale_rate_nb: Some(d("4.46")),
        };
        let quote = CurrencyQuote::from_entry(&entry).unwrap();
        assert_eq!(quote.name, "PLN");
        assert_eq!(quote.buy, d("4.45"));
        assert_eq!(quote.sale, d("4.46"));
    }

    #[test]
    fn test_quote_prefers_bank_rates() {
        let entry = RawRateEntry {
            currency: Some("USD".to_string()),
            purchase_rate: Some(d("15.35")),
            purchase_rate_nb: Some(d("15.05")),
            sale_rate: Some(d("15.70")),
            sale_rate_nb: Some(d("15.06")),
        };
        let quote = CurrencyQuote::from_entry(&entry).unwrap();
        assert_eq!(quote.buy, d("15.35"));
        assert_eq!(quote.sale, d("15.70"));
    }

    #[test]
    fn test_quote_requires_currency_and_rates() {
        let base_row = RawRateEntry {
            currency: None,
            purchase_rate: None,
            purchase_rate_nb: Some(d("1")),
            sale_rate: None,
            sale_rate_nb: Some(d("1")),
        };
        assert!(CurrencyQuote::from_entry(&base_row).is_none());

        let no_sale = RawRateEntry {
            currency: Some("GBP".to_string()),
            purchase_rate: Some(d("23.1")),
            purchase_rate_nb: None,
            sale_rate: None,
            sale_rate_nb: None,
        };
        assert!(CurrencyQuote::from_entry(&no_sale).is_none());
    }

    #[test]
    fn test_report_insert_replaces_existing_date() {
        let quote = |name: &str| CurrencyQuote {
            name: name.to_string(),
            buy: d("1"),
            sale: d("2"),
        };
        let mut report = Report::new();
        report.insert("02.12.2014".to_string(), vec![quote("USD")]);
        report.insert("01.12.2014".to_string(), vec![]);
        report.insert("02.12.2014".to_string(), vec![quote("EUR")]);

        assert_eq!(report.len(), 2);
        let dates: Vec<_> = report.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["02.12.2014", "01.12.2014"]);
        assert_eq!(report.get("02.12.2014").unwrap()[0].name, "EUR");
        assert!(report.get("01.12.2014").unwrap().is_empty());
        assert!(!report.contains_date("03.12.2014"));
    }

    #[test]
    fn test_report_serializes_as_ordered_map() {
        let mut report = Report::new();
        report.insert(
            "02.12.2014".to_string(),
            vec![CurrencyQuote {
                name: "USD".to_string(),
                buy: d("15.35"),
                sale: d("15.7"),
            }],
        );
        report.insert("01.12.2014".to_string(), vec![]);

        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"02.12.2014":[{"name":"USD","buy":"15.35","sale":"15.7"}],"01.12.2014":[]}"#
        );
    }
}
