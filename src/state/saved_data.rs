use serde::{Deserialize, Serialize};

use super::{Entry, EntryId};

/// How an entry is written to the entries slot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntryData {
    pub id: u64,
    pub date: String,
    pub clock_in: String,
    pub clock_out: String,
}
impl EntryData {
    pub(super) fn into_entry(self) -> Entry {
        Entry::new(
            EntryId::new(self.id),
            self.date,
            self.clock_in,
            self.clock_out,
        )
    }
}
impl From<&Entry> for EntryData {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id().inner(),
            date: entry.date().to_string(),
            clock_in: entry.clock_in().to_string(),
            clock_out: entry.clock_out().to_string(),
        }
    }
}

pub(super) fn parse_entries(text: &str) -> Result<Vec<EntryData>, serde_json::Error> {
    serde_json::from_str(text)
}

pub(super) fn serialize_entries<'a>(
    entries: impl Iterator<Item = &'a Entry>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&entries.map(EntryData::from).collect::<Vec<_>>())
}
