//! Turns a raw provider bundle into a [`WeatherSnapshot`].
//!
//! The forecast list arrives as ~40 entries at 3-hour spacing. Entries are
//! grouped by their local-time weekday label, in first-appearance order, and
//! folded down to at most five days of min/max temperature plus the day's
//! most frequent condition code.

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::gateway::{OwForecastEntry, WeatherBundle};
use crate::model::{DailyForecast, WeatherSnapshot};

const MAX_FORECAST_DAYS: usize = 5;

/// Flatten a raw bundle into the snapshot handed to callers.
///
/// Pure computation: current-conditions fields are copied through unchanged
/// (metric, epoch seconds) and the forecast list is aggregated per day. A
/// forecast entry with no weather condition aborts the whole bundle rather
/// than being skipped.
pub fn normalize(bundle: WeatherBundle) -> Result<WeatherSnapshot> {
    let current = bundle.current;
    let condition = current
        .weather
        .first()
        .ok_or_else(|| Error::MalformedData("current conditions carried no weather entry".into()))?;

    let forecast = aggregate_daily(&bundle.forecast.list)?;

    Ok(WeatherSnapshot {
        location_name: current.name,
        temperature_c: current.main.temp,
        feels_like_c: current.main.feels_like,
        description: condition.description.clone(),
        humidity_pct: current.main.humidity,
        wind_speed_mps: current.wind.speed,
        weather_code: condition.id,
        observed_at: current.dt,
        sunrise: current.sys.sunrise,
        sunset: current.sys.sunset,
        forecast,
    })
}

/// Accumulates everything seen for one day label.
struct DayBucket {
    label: String,
    temps: Vec<f64>,
    codes: Vec<i64>,
    first_dt: i64,
}

/// Fold the 3-hourly forecast list into at most five [`DailyForecast`]s.
///
/// Buckets are keyed by day label and kept in first-appearance order; that
/// order, not calendar order, determines the output. Every entry is grouped
/// first and the bucket list truncated after, so late entries for an early
/// day still count even when more than five labels exist.
pub fn aggregate_daily(list: &[OwForecastEntry]) -> Result<Vec<DailyForecast>> {
    let mut buckets: Vec<DayBucket> = Vec::new();

    for entry in list {
        let code = entry
            .weather
            .first()
            .map(|w| w.id)
            .ok_or_else(|| Error::MalformedData("forecast entry carried no weather entry".into()))?;
        let label = day_label(entry.dt);

        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => {
                bucket.temps.push(entry.main.temp);
                bucket.codes.push(code);
            }
            None => buckets.push(DayBucket {
                label,
                temps: vec![entry.main.temp],
                codes: vec![code],
                first_dt: entry.dt,
            }),
        }
    }

    buckets.truncate(MAX_FORECAST_DAYS);

    Ok(buckets
        .into_iter()
        .map(|bucket| DailyForecast {
            min_temp_c: bucket.temps.iter().copied().fold(f64::INFINITY, f64::min),
            max_temp_c: bucket.temps.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            weather_code: modal_code(&bucket.codes),
            day: bucket.label,
            dt: bucket.first_dt,
        })
        .collect())
}

/// Short local-time weekday label for a timestamp, e.g. "Mon".
///
/// Deliberately local-time: entries near midnight may land on a different
/// label than their provider day. That split is accepted behavior.
pub fn day_label(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(&Local).format("%a").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// The most frequent code; ties go to the code seen first.
fn modal_code(codes: &[i64]) -> i64 {
    let mut tally: Vec<(i64, usize)> = Vec::new();
    for &code in codes {
        match tally.iter_mut().find(|(c, _)| *c == code) {
            Some((_, count)) => *count += 1,
            None => tally.push((code, 1)),
        }
    }

    // Strict comparison keeps the earliest-tallied code on ties.
    let mut best = tally[0];
    for &(code, count) in &tally[1..] {
        if count > best.1 {
            best = (code, count);
        }
    }
    best.0
}
