use std::iter::successors;

use chrono::{
    DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::{Europe::Amsterdam, Tz};

use crate::prelude::*;

#[must_use]
pub fn now() -> DateTime<Tz> {
    Utc::now().with_timezone(&Amsterdam)
}

#[must_use]
pub fn tomorrow(now: DateTime<Tz>) -> NaiveDate {
    now.date_naive() + Days::new(1)
}

/// Format the date the Dutch way, for example: «maandag 2 januari 2006».
#[must_use]
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {} {}",
        weekday_name(date.weekday()),
        date.day(),
        month_name(date.month()),
        date.year(),
    )
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Greeting {
    pub hello: &'static str,
    pub goodbye: &'static str,
}

impl Greeting {
    #[must_use]
    pub fn at(now: DateTime<Tz>) -> Self {
        if now.hour() < 18 {
            Self { hello: "Goedemiddag! ☀️", goodbye: "Fijne dag verder!" }
        } else {
            Self { hello: "Goedenavond! 🌙", goodbye: "Geniet van je avond!" }
        }
    }
}

/// Local clock hour of each of the `count` consecutive hour slots starting at the local midnight.
///
/// On the «spring forward» day the hour 2 is missing, and on the «fall back» day it appears twice.
#[instrument(skip_all, fields(day = %day, count = count))]
pub fn hour_labels(day: NaiveDate, count: usize) -> Result<Vec<u32>> {
    Ok(successors(Some(start_of_day(day)?), |slot| Some(*slot + TimeDelta::hours(1)))
        .take(count)
        .map(|slot| slot.hour())
        .collect())
}

pub fn start_of_day(day: NaiveDate) -> Result<DateTime<Tz>> {
    Amsterdam
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .earliest()
        .with_context(|| format!("there is no local midnight on {day}"))
}

const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "maandag",
        Weekday::Tue => "dinsdag",
        Weekday::Wed => "woensdag",
        Weekday::Thu => "donderdag",
        Weekday::Fri => "vrijdag",
        Weekday::Sat => "zaterdag",
        Weekday::Sun => "zondag",
    }
}

const fn month_name(month: u32) -> &'static str {
    match month {
        1 => "januari",
        2 => "februari",
        3 => "maart",
        4 => "april",
        5 => "mei",
        6 => "juni",
        7 => "juli",
        8 => "augustus",
        9 => "september",
        10 => "oktober",
        11 => "november",
        _ => "december",
    }
}
