//! Totals derived from the recorded shifts. Nothing here is cached, every
//! total is recomputed from the entries it is given.

use log::debug;

use crate::payment::{HourlyRate, Money};
use crate::state::{Entry, Settings};

/// Converts `HH:MM` into decimal hours, e.g. `02:30` is 2.5. Seconds after a
/// second `:` are ignored, so `09:00:59` is 9.0.
pub fn decimal_hours(time: &str) -> Option<f64> {
    let (hours, rest) = time.split_once(':')?;
    let minutes = rest.split(':').next()?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    Some(f64::from(hours) + f64::from(minutes) / 60.0)
}

/// Hours between clock-in and clock-out. There is no rollover past
/// midnight, so a clock-out before the clock-in gives a negative duration.
///
/// Returns `None` if either time isn't `HH:MM`.
pub fn duration_hours(clock_in: &str, clock_out: &str) -> Option<f64> {
    Some(decimal_hours(clock_out)? - decimal_hours(clock_in)?)
}

/// What a single entry adds to the total: its duration, or zero when the
/// duration is negative or can't be computed.
pub fn counted_hours(entry: &Entry) -> f64 {
    match duration_hours(entry.clock_in(), entry.clock_out()) {
        Some(hours) if hours > 0.0 => hours,
        Some(_) => 0.0,
        None => {
            debug!(
                "Entry {} has unreadable times {:?}-{:?}, counting 0 hours",
                entry.id(),
                entry.clock_in(),
                entry.clock_out()
            );
            0.0
        }
    }
}

/// Sum of all entry durations. Shifts that end before they start (overnight
/// shifts included) count as zero.
pub fn total_hours<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> f64 {
    entries.into_iter().map(counted_hours).sum()
}

pub fn total_amount_owed<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    hourly_rate: HourlyRate,
) -> Money {
    hourly_rate.calculate(total_hours(entries))
}

pub fn amount_outstanding(total_amount_owed: Money, amount_paid: Money) -> Money {
    total_amount_owed - amount_paid
}

/// Every total at once, for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_hours: f64,
    pub hourly_rate: HourlyRate,
    pub amount_owed: Money,
    pub amount_paid: Money,
    pub amount_outstanding: Money,
}
impl Summary {
    pub fn compute<'a>(entries: impl IntoIterator<Item = &'a Entry>, settings: &Settings) -> Self {
        let total_hours = total_hours(entries);
        let hourly_rate = settings.hourly_rate();
        let amount_owed = hourly_rate.calculate(total_hours);
        let amount_paid = settings.amount_paid();
        Self {
            total_hours,
            hourly_rate,
            amount_owed,
            amount_paid,
            amount_outstanding: amount_outstanding(amount_owed, amount_paid),
        }
    }
}
