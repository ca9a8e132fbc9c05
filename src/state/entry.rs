use std::{fmt::Display, num::ParseIntError, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);
impl EntryId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn inner(self) -> u64 {
        self.0
    }
}
impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
impl FromStr for EntryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// One worked shift.
///
/// The times are kept as entered. Nothing checks that they are well formed
/// or that the shift ends after it starts, totals deal with that.
#[derive(Debug, Clone)]
pub struct Entry {
    id: EntryId,
    date: String,
    clock_in: String,
    clock_out: String,
}
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Entry {}
impl Entry {
    pub(super) fn new(id: EntryId, date: String, clock_in: String, clock_out: String) -> Self {
        Self {
            id,
            date,
            clock_in,
            clock_out,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The work date, `YYYY-MM-DD`.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// `HH:MM`, 24-hour.
    pub fn clock_in(&self) -> &str {
        &self.clock_in
    }

    /// `HH:MM`, 24-hour.
    pub fn clock_out(&self) -> &str {
        &self.clock_out
    }
}
