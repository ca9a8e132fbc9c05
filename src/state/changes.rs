use super::Slot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    EntryAdded {
        id: u64,
        date: String,
        clock_in: String,
        clock_out: String,
    },
    EntryDeleted {
        id: u64,
        found: bool,
    },
    HourlyRateSet {
        text: String,
    },
    AmountPaidSet {
        text: String,
    },
}
impl Change {
    /// The slot that has to be written again after this change.
    pub fn slot(&self) -> Slot {
        match self {
            Change::EntryAdded { .. } | Change::EntryDeleted { .. } => Slot::Entries,
            Change::HourlyRateSet { .. } => Slot::HourlyRate,
            Change::AmountPaidSet { .. } => Slot::AmountPaid,
        }
    }
}
