use super::Slot;

macro_rules! derive_debug_error {
    ($type: ty) => {
        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:#?}", self)
            }
        }
        impl std::error::Error for $type {}
    };

    ($($type:ty)*) => {
        $(derive_debug_error!{$type})*
    }
}

/// Why the persisted state couldn't be loaded. All of these are fatal.
#[derive(Debug)]
pub enum LoadError {
    Storage { slot: Slot, source: anyhow::Error },
    MalformedEntries(serde_json::Error),
    DuplicateEntryId(u64),
}

/// The slots that failed to persist. The in-memory state has already
/// changed when this is returned.
#[derive(Debug)]
pub struct SaveError {
    pub failures: Vec<(Slot, anyhow::Error)>,
}
impl SaveError {
    pub fn failed_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.failures.iter().map(|(slot, _)| *slot)
    }
}

derive_debug_error! {
    LoadError
    SaveError
}
