//! Hosted spreadsheet provider

use std::sync::Arc;
use std::time::{Duration, Instant};

use checker_core::{AddressSet, Source};
use reqwest::Client;

use crate::error::LoaderError;
use crate::loader::LoadResult;
use crate::metrics;
use crate::single_flight::SingleFlight;
use crate::table::parse_remote_csv;

/// Fetches the CSV export of a hosted spreadsheet on every load.
///
/// No caching between calls; concurrent calls share one request.
pub struct RemoteProvider {
    http: Client,
    url: String,
    flight: SingleFlight,
}

impl RemoteProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoaderError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
            flight: SingleFlight::new(Source::Remote),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn load(&self) -> LoadResult {
        let http = self.http.clone();
        let url = self.url.clone();
        self.flight
            .run(move || async move {
                let started = Instant::now();
                match fetch_set(&http, &url).await {
                    Ok(set) => {
                        metrics::record_source_load(Source::Remote, metrics::OUTCOME_OK, started.elapsed());
                        metrics::set_source_entries(Source::Remote, set.len());
                        Ok(Arc::new(set))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, url = %url, "Failed to fetch remote address list");
                        metrics::record_source_load(Source::Remote, metrics::OUTCOME_ERROR, started.elapsed());
                        Err(e.into_source_error(Source::Remote))
                    }
                }
            })
            .await
    }

    pub fn is_loading(&self) -> bool {
        self.flight.in_flight()
    }
}

async fn fetch_set(http: &Client, url: &str) -> Result<AddressSet, LoaderError> {
    let resp = http.get(url).send().await?;

    if !resp.status().is_success() {
        return Err(LoaderError::Status {
            status: resp.status().as_u16(),
            body: resp.text().await.unwrap_or_default().chars().take(200).collect(),
        });
    }

    let body = resp.text().await?;
    let set = AddressSet::from_raw(Source::Remote, parse_remote_csv(&body)?);

    tracing::info!(
        rows = set.rows_read(),
        addresses = set.len(),
        "Remote address list fetched"
    );

    Ok(set)
}
