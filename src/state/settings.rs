use crate::payment::{HourlyRate, Money};

pub const DEFAULT_HOURLY_RATE: &str = "45";

/// The two scalar settings, kept exactly as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    hourly_rate: String,
    amount_paid: String,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            hourly_rate: DEFAULT_HOURLY_RATE.to_string(),
            amount_paid: String::new(),
        }
    }
}
impl Settings {
    pub fn hourly_rate_text(&self) -> &str {
        &self.hourly_rate
    }

    pub fn amount_paid_text(&self) -> &str {
        &self.amount_paid
    }

    /// Unparsable text counts as a zero rate.
    pub fn hourly_rate(&self) -> HourlyRate {
        HourlyRate::from_input(&self.hourly_rate)
    }

    /// Empty or unparsable text counts as nothing paid.
    pub fn amount_paid(&self) -> Money {
        Money::from_input(&self.amount_paid)
    }

    pub(super) fn set_hourly_rate(&mut self, text: String) {
        self.hourly_rate = text;
    }

    pub(super) fn set_amount_paid(&mut self, text: String) {
        self.amount_paid = text;
    }
}
