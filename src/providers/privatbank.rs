use crate::core::FetchError;
use crate::core::config::ProviderConfig;
use crate::core::rates::{API_DATE_FORMAT, RateFetcher, RawDateResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Fetches archived exchange rates from the PrivatBank public API, one
/// request per date.
pub struct PrivatBankProvider {
    base_url: String,
    request_delay: Duration,
    user_agent: String,
}

impl PrivatBankProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        PrivatBankProvider {
            base_url: config.base_url.clone(),
            request_delay: Duration::from_millis(config.request_delay_ms),
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn request_url(&self, date: NaiveDate) -> String {
        format!(
            "{}?json&date={}",
            self.base_url,
            date.format(API_DATE_FORMAT)
        )
    }

    #[instrument(name = "PrivatBankFetch", skip_all, fields(date = %date))]
    async fn fetch_date(
        &self,
        client: &reqwest::Client,
        date: NaiveDate,
    ) -> Result<RawDateResult, FetchError> {
        // Spreads out the burst of simultaneous requests
        tokio::time::sleep(self.request_delay).await;

        let url = self.request_url(date);
        debug!("Requesting rates from {}", url);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Connection {
                url: url.clone(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Remote {
                status: response.status(),
                url,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Connection {
                url: url.clone(),
                source,
            })?;

        let result: RawDateResult =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })?;
        debug!(
            date = %result.date,
            base_currency = result.base_currency_lit.as_deref().unwrap_or("unknown"),
            entries = result.exchange_rate.len(),
            "Received rates"
        );
        Ok(result)
    }
}

#[async_trait]
impl RateFetcher for PrivatBankProvider {
    async fn fetch(
        &self,
        dates: &[NaiveDate],
        on_complete: &(dyn Fn() + Send + Sync),
    ) -> Vec<Option<RawDateResult>> {
        // One connection pool per batch, dropped once every request has finished.
        let client = match reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "Failed to build HTTP client");
                dates.iter().for_each(|_| on_complete());
                return vec![None; dates.len()];
            }
        };

        let tasks = dates.iter().map(|date| {
            let client = &client;
            async move {
                let result = match self.fetch_date(client, *date).await {
                    Ok(result) => Some(result),
                    Err(e) => {
                        error!(date = %date, "{e}");
                        None
                    }
                };
                on_complete();
                result
            }
        });

        join_all(tasks).await
    }
}
