//! Validated monthly revenue history.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// One month of aggregated revenue, as produced by the aggregation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// First day of the month.
    pub date: NaiveDate,
    /// Revenue booked in that month.
    pub revenue: f64,
}

impl MonthlyRevenue {
    pub fn new(date: NaiveDate, revenue: f64) -> Self {
        Self { date, revenue }
    }
}

/// A validated historical observation.
///
/// `month_index` counts whole months since the first month of the history, so
/// gaps in the input keep their true distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalSample {
    pub month_index: i64,
    pub date: NaiveDate,
    pub revenue: f64,
}

/// Whole months from `anchor` to `date` (negative when `date` is earlier).
pub fn months_between(anchor: NaiveDate, date: NaiveDate) -> i64 {
    (date.year() as i64 - anchor.year() as i64) * 12 + date.month() as i64
        - anchor.month() as i64
}

/// Shift a date by a signed number of calendar months.
pub fn shift_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let step = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(step)
    } else {
        date.checked_sub_months(step)
    }
}

pub(crate) fn ensure_first_of_month(date: NaiveDate) -> Result<()> {
    if date.day() != 1 {
        return Err(ForecastError::InvalidInput(format!(
            "date {} is not the first day of a month",
            date
        )));
    }
    Ok(())
}

/// Immutable, validated snapshot of monthly revenue.
///
/// # Example
///
/// ```
/// use revenue_forecast::core::{MonthlyHistory, MonthlyRevenue};
/// use chrono::NaiveDate;
///
/// let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let apr = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
/// let history = MonthlyHistory::new(vec![
///     MonthlyRevenue::new(jan, 1200.0),
///     MonthlyRevenue::new(apr, 1500.0),
/// ])
/// .unwrap();
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.samples()[1].month_index, 3);
/// ```
#[derive(Debug, Clone)]
pub struct MonthlyHistory {
    samples: Vec<HistoricalSample>,
}

impl MonthlyHistory {
    /// Validate and index the records.
    ///
    /// Rejects an empty history, dates that are not the first of a month,
    /// months that are not strictly increasing (covers duplicates), and
    /// negative or non-finite revenue.
    pub fn new(records: Vec<MonthlyRevenue>) -> Result<Self> {
        let anchor = match records.first() {
            Some(first) => first.date,
            None => {
                return Err(ForecastError::InvalidInput(
                    "history must contain at least one month".to_string(),
                ))
            }
        };

        let mut samples: Vec<HistoricalSample> = Vec::with_capacity(records.len());
        for record in records {
            ensure_first_of_month(record.date)?;

            if !record.revenue.is_finite() || record.revenue < 0.0 {
                return Err(ForecastError::InvalidInput(format!(
                    "revenue for {} must be finite and non-negative, got {}",
                    record.date, record.revenue
                )));
            }

            if let Some(prev) = samples.last() {
                if record.date == prev.date {
                    return Err(ForecastError::InvalidInput(format!(
                        "duplicate month {}",
                        record.date
                    )));
                }
                if record.date < prev.date {
                    return Err(ForecastError::InvalidInput(format!(
                        "months must be ascending: {} follows {}",
                        record.date, prev.date
                    )));
                }
            }

            samples.push(HistoricalSample {
                month_index: months_between(anchor, record.date),
                date: record.date,
                revenue: record.revenue,
            });
        }

        Ok(Self { samples })
    }

    /// Consecutive months starting at `start`.
    pub fn from_values(start: NaiveDate, revenues: &[f64]) -> Result<Self> {
        let records = revenues
            .iter()
            .enumerate()
            .map(|(i, &revenue)| {
                shift_months(start, i as i64)
                    .map(|date| MonthlyRevenue::new(date, revenue))
                    .ok_or_else(|| {
                        ForecastError::InvalidInput(format!(
                            "month {} after {} is out of range",
                            i, start
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(records)
    }

    /// Number of distinct months.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[HistoricalSample] {
        &self.samples
    }

    /// First month of the history (`month_index == 0`).
    pub fn anchor(&self) -> NaiveDate {
        self.samples[0].date
    }

    /// Most recent sample.
    pub fn last(&self) -> &HistoricalSample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn revenues(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.revenue).collect()
    }

    /// Month index of an arbitrary date relative to the anchor.
    pub fn month_index_of(&self, date: NaiveDate) -> i64 {
        months_between(self.anchor(), date)
    }

    /// Revenue recorded for the month containing `date`, if present.
    pub fn revenue_at(&self, date: NaiveDate) -> Option<f64> {
        let index = self.month_index_of(date);
        self.samples
            .binary_search_by_key(&index, |s| s.month_index)
            .ok()
            .map(|pos| self.samples[pos].revenue)
    }
}
