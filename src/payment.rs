use std::{fmt::Display, ops::Sub};

/// An amount of money in the tracker's single unit.
///
/// Amounts are kept unrounded; only `Display` rounds to two decimals.
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, Default)]
pub struct Money(f64);
impl Money {
    pub const ZERO: Money = Money(0.0);

    pub fn new(money: f64) -> Self {
        Self(money)
    }

    /// Reads an amount the way the user typed it. Empty, non-numeric
    /// or non-finite text is worth nothing.
    pub fn from_input(text: &str) -> Self {
        Self(parse_decimal(text).unwrap_or(0.0))
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}
impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Sub<Money> for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

/// What one hour of work is worth.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct HourlyRate(Money);
impl HourlyRate {
    pub fn from_input(text: &str) -> Self {
        Self(Money::from_input(text))
    }

    pub fn per_hour(&self) -> Money {
        self.0
    }

    /// Pay for the given number of decimal hours, unrounded.
    pub fn calculate(&self, hours: f64) -> Money {
        Money(hours * self.0.amount())
    }
}
impl Display for HourlyRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/h", self.0)
    }
}

fn parse_decimal(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
