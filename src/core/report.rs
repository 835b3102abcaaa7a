//! Human-readable Dutch report on tomorrow's prices.

use bon::Builder;
use chrono::DateTime;
use chrono_tz::Tz;

use crate::{
    core::{
        calendar::{self, Greeting},
        prices::PriceSet,
        ranges,
    },
    prelude::*,
    quantity::rate::KilowattHourRate,
    tables::build_hourly_table,
};

#[derive(Clone, Debug)]
pub struct HourlyRow {
    pub emoji: &'static str,

    /// Zero-padded local clock hour.
    pub hour: String,

    pub price: KilowattHourRate,
}

/// Price statistic along with the hours it occurs in.
#[derive(Clone, Debug)]
pub struct Statistic {
    pub price: KilowattHourRate,

    /// For example, «van 01:00 tot 03:59 en van 05:00 tot 05:59».
    pub hours: String,
}

impl Statistic {
    fn describe(&self, label: &str) -> String {
        if self.hours.is_empty() {
            format!("{label}: {}", self.price)
        } else {
            format!("{label}: {} ({})", self.price, self.hours)
        }
    }
}

#[must_use]
#[derive(Clone, Debug, Builder)]
pub struct Report {
    greeting: Greeting,

    /// Tomorrow's date in Dutch.
    #[builder(into)]
    date: String,

    average: Statistic,
    high: Statistic,
    low: Statistic,
    hourly: Vec<HourlyRow>,
}

impl Report {
    /// Prepare the report on tomorrow's prices as seen at `now`.
    #[instrument(skip_all, fields(now = %now, n_prices = prices.len()))]
    pub fn new(prices: &PriceSet, now: DateTime<Tz>) -> Result<Self> {
        let tomorrow = calendar::tomorrow(now);
        let labels = calendar::hour_labels(tomorrow, prices.len())?;
        let average = prices.average();
        let hourly = prices
            .all()
            .zip(&labels)
            .map(|((_, price), label)| HourlyRow {
                emoji: price_emoji(price, average),
                hour: format!("{label:02}"),
                price,
            })
            .collect();
        let statistic = |price, hours: &[usize]| Statistic {
            price,
            hours: format_hour_ranges(hours, &labels),
        };
        Ok(Self::builder()
            .greeting(Greeting::at(now))
            .date(calendar::format_long_date(tomorrow))
            .average(statistic(average, prices.average_hours()))
            .high(statistic(prices.high(), prices.high_hours()))
            .low(statistic(prices.low(), prices.low_hours()))
            .hourly(hourly)
            .build())
    }

    /// Plain-text summary for Bluesky.
    #[must_use]
    pub fn render_short(&self) -> String {
        [
            self.greeting.hello.to_string(),
            String::new(),
            format!("⚡ De energieprijzen van {}:", self.date),
            String::new(),
            self.average.describe("📊 Gemiddeld"),
            self.high.describe("📈 Hoogst"),
            self.low.describe("📉 Laagst"),
        ]
        .join("\n")
    }

    /// Full report for Telegram, in the HTML parse mode.
    #[must_use]
    pub fn render_long(&self) -> String {
        [
            self.greeting.hello.to_string(),
            String::new(),
            format!("⚡ Dit zijn de energieprijzen van <b>{}</b>.", self.date),
            String::new(),
            self.average.describe("📊 Gemiddelde prijs"),
            self.high.describe("📈 Hoogste prijs"),
            self.low.describe("📉 Laagste prijs"),
            String::new(),
            format!("<pre>{}</pre>", build_hourly_table(&self.hourly)),
            String::new(),
            "Alle prijzen zijn per kWh, inclusief btw, inkoopvergoeding en energiebelasting."
                .to_string(),
            String::new(),
            self.greeting.goodbye.to_string(),
        ]
        .join("\n")
    }
}

/// Emoji for the hourly price as compared to the day's average.
#[must_use]
pub fn price_emoji(price: KilowattHourRate, average: KilowattHourRate) -> &'static str {
    if price == KilowattHourRate::ZERO {
        "🆓"
    } else if price < KilowattHourRate::ZERO {
        "💶"
    } else if price <= average {
        "✅"
    } else {
        "❌"
    }
}

/// Describe the hour slots by their local clock labels.
///
/// Indices outside the labels are skipped. The same label may appear twice on the «fall back» day,
/// it is only mentioned once.
#[must_use]
pub fn format_hour_ranges(indices: &[usize], labels: &[u32]) -> String {
    ranges::collapse_and_format(indices.iter().filter_map(|index| labels.get(*index).copied()))
}
