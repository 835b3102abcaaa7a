//! [EnergyZero](https://www.energyzero.nl/) day-ahead prices.

use chrono::{DateTime, Days, SecondsFormat, TimeDelta, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{api::client, core::calendar, prelude::*, quantity::rate::KilowattHourRate};

pub struct Api(Client);

impl Api {
    pub fn try_new() -> Result<Self> {
        Ok(Self(client::try_new()?))
    }

    /// Get tomorrow's hourly wholesale prices including VAT, in hour order.
    #[instrument(skip_all, fields(now = %now))]
    pub async fn get_tomorrow_prices(&self, now: DateTime<Tz>) -> Result<Vec<KilowattHourRate>> {
        let url = format!("https://api.energyzero.nl/v1/energyprices?{}", query_string(now)?);
        info!(%url, "fetching…");
        let mut prices = self
            .0
            .get(url)
            .send()
            .await
            .context("failed to call EnergyZero")?
            .error_for_status()
            .context("EnergyZero request failed")?
            .json::<Response>()
            .await
            .context("failed to deserialize the EnergyZero response")?
            .prices;
        info!(n_prices = prices.len(), "fetched");
        if prices.is_empty() {
            bail!("prices not yet available");
        }
        prices.sort_by_key(|price| price.reading_date);
        Ok(prices.into_iter().map(|price| price.price).collect())
    }
}

/// Query for tomorrow's hourly electricity prices as seen at `now`.
fn query_string(now: DateTime<Tz>) -> Result<String> {
    serde_qs::to_string(&Query::tomorrow(now)?).context("failed to serialize the query")
}

#[derive(Serialize)]
struct Query {
    #[serde(rename = "fromDate")]
    from_date: String,

    #[serde(rename = "tillDate")]
    till_date: String,

    /// Hourly.
    interval: u8,

    /// Electricity.
    #[serde(rename = "usageType")]
    usage_type: u8,

    #[serde(rename = "inclBtw")]
    including_vat: bool,
}

impl Query {
    /// Tomorrow's local day boundaries, the end being the last millisecond of the day.
    fn tomorrow(now: DateTime<Tz>) -> Result<Self> {
        let tomorrow = calendar::tomorrow(now);
        let from = calendar::start_of_day(tomorrow)?;
        let till = calendar::start_of_day(tomorrow + Days::new(1))? - TimeDelta::milliseconds(1);
        Ok(Self {
            from_date: format_utc(from),
            till_date: format_utc(till),
            interval: 4,
            usage_type: 1,
            including_vat: true,
        })
    }
}

fn format_utc(timestamp: DateTime<Tz>) -> String {
    timestamp.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Deserialize)]
struct Response {
    #[serde(rename = "Prices")]
    prices: Vec<Price>,
}

#[derive(Deserialize)]
struct Price {
    price: KilowattHourRate,

    #[serde(rename = "readingDate")]
    reading_date: DateTime<Utc>,
}
