mod changes;
mod entry;
mod errors;
mod saved_data;
mod settings;
mod storage;

use std::collections::HashSet;

use log::{debug, error, info};

pub use changes::*;
pub use entry::*;
pub use errors::*;
pub use saved_data::EntryData;
pub use settings::*;
pub use storage::*;

use crate::aggregate;
use crate::payment::Money;

/// Owns the recorded shifts and the two settings, and writes each of them
/// back to its slot in `S` right after it changes.
#[derive(Debug)]
pub struct EntryStore<S: KeyValueStore> {
    previous_entry_id: u64,
    entries: Vec<Entry>,
    settings: Settings,
    storage: S,
}
impl<S: KeyValueStore> EntryStore<S> {
    /// Reads all three slots from `storage`. Missing slots keep their defaults.
    pub fn load(storage: S) -> Result<Self, LoadError> {
        let read = |slot: Slot| {
            storage
                .get(slot.key())
                .map_err(|source| LoadError::Storage { slot, source })
        };

        let entries: Vec<Entry> = match read(Slot::Entries)? {
            Some(text) => saved_data::parse_entries(&text)
                .map_err(LoadError::MalformedEntries)?
                .into_iter()
                .map(EntryData::into_entry)
                .collect(),
            None => Vec::new(),
        };

        let mut ids = HashSet::new();
        for id in entries.iter().map(|x| x.id().inner()) {
            if !ids.insert(id) {
                return Err(LoadError::DuplicateEntryId(id));
            }
        }

        let mut settings = Settings::default();
        if let Some(text) = read(Slot::HourlyRate)? {
            settings.set_hourly_rate(text);
        }
        if let Some(text) = read(Slot::AmountPaid)? {
            settings.set_amount_paid(text);
        }

        let previous_entry_id = ids.into_iter().max().unwrap_or(0);

        debug!(
            "Loaded {} entries, hourly rate {:?}, amount paid {:?}",
            entries.len(),
            settings.hourly_rate_text(),
            settings.amount_paid_text()
        );

        Ok(Self {
            previous_entry_id,
            entries,
            settings,
            storage,
        })
    }

    /// Writes every slot, whether it changed or not. Every slot is attempted
    /// even if an earlier one fails.
    pub fn save(&mut self) -> Result<(), SaveError> {
        let failures: Vec<_> = Slot::ALL
            .into_iter()
            .filter_map(|slot| self.save_slot(slot).err().map(|e| (slot, e)))
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SaveError { failures })
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn save_slot(&mut self, slot: Slot) -> anyhow::Result<()> {
        let value = match slot {
            Slot::Entries => saved_data::serialize_entries(self.entries.iter())?,
            Slot::HourlyRate => self.settings.hourly_rate_text().to_string(),
            Slot::AmountPaid => self.settings.amount_paid_text().to_string(),
        };
        self.storage.set(slot.key(), &value).inspect_err(|e| {
            error!("Failed to persist {slot}: {e:#}");
        })
    }

    fn commit(&mut self, change: Change) -> Result<(), SaveError> {
        info!("{change:?}");
        let slot = change.slot();
        self.save_slot(slot).map_err(|e| SaveError {
            failures: vec![(slot, e)],
        })
    }

    /// Normally one past the largest ID seen. Once that counter is exhausted
    /// the smallest ID not held by any entry is used instead.
    fn new_entry_id(&mut self) -> EntryId {
        match self.previous_entry_id.checked_add(1) {
            Some(id) => {
                self.previous_entry_id = id;
                EntryId::new(id)
            }
            None => {
                let mut used: Vec<u64> = self.entries.iter().map(|x| x.id().inner()).collect();
                used.sort_unstable();
                let free = used
                    .iter()
                    .zip(0u64..)
                    .find(|(id, expected)| **id != *expected)
                    .map(|(_, expected)| expected)
                    .unwrap_or(used.len() as u64);
                debug!("Entry ID counter exhausted, reusing free ID {free}");
                EntryId::new(free)
            }
        }
    }
}
impl<S: KeyValueStore> EntryStore<S> {
    /// Records a new shift at the end of the collection and returns its ID.
    /// Does nothing, and returns `None`, if any of the fields is empty.
    pub fn add_entry(
        &mut self,
        date: &str,
        clock_in: &str,
        clock_out: &str,
    ) -> Result<Option<EntryId>, SaveError> {
        if date.is_empty() || clock_in.is_empty() || clock_out.is_empty() {
            debug!("Ignoring entry with an empty field: {date:?} {clock_in:?} {clock_out:?}");
            return Ok(None);
        }

        let id = self.new_entry_id();
        self.entries.push(Entry::new(
            id,
            date.to_string(),
            clock_in.to_string(),
            clock_out.to_string(),
        ));

        self.commit(Change::EntryAdded {
            id: id.inner(),
            date: date.to_string(),
            clock_in: clock_in.to_string(),
            clock_out: clock_out.to_string(),
        })?;
        Ok(Some(id))
    }

    /// Removes the entry with the given ID. Returns true if there was one.
    /// The collection is written back either way.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<bool, SaveError> {
        let index = self.entries.iter().position(|x| x.id() == id);
        let found = match index {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        };

        self.commit(Change::EntryDeleted {
            id: id.inner(),
            found,
        })?;
        Ok(found)
    }

    pub fn set_hourly_rate(&mut self, text: &str) -> Result<(), SaveError> {
        self.settings.set_hourly_rate(text.to_string());
        self.commit(Change::HourlyRateSet {
            text: text.to_string(),
        })
    }

    pub fn set_amount_paid(&mut self, text: &str) -> Result<(), SaveError> {
        self.settings.set_amount_paid(text.to_string());
        self.commit(Change::AmountPaidSet {
            text: text.to_string(),
        })
    }
}
impl<S: KeyValueStore> EntryStore<S> {
    /// Entries by ascending date. Entries on the same date stay in the
    /// order they were added.
    pub fn list_entries(&self) -> Vec<&Entry> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.date().cmp(b.date()));
        entries
    }

    /// Entries in the order they were added.
    pub fn all_entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter()
    }

    pub fn entry_from_id(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|x| x.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The hourly rate as the user entered it.
    pub fn hourly_rate(&self) -> &str {
        self.settings.hourly_rate_text()
    }

    /// The amount paid as the user entered it, possibly empty.
    pub fn amount_paid(&self) -> &str {
        self.settings.amount_paid_text()
    }
}
impl<S: KeyValueStore> EntryStore<S> {
    pub fn total_hours(&self) -> f64 {
        aggregate::total_hours(&self.entries)
    }

    pub fn total_amount_owed(&self) -> Money {
        aggregate::total_amount_owed(&self.entries, self.settings.hourly_rate())
    }

    pub fn amount_outstanding(&self) -> Money {
        aggregate::amount_outstanding(self.total_amount_owed(), self.settings.amount_paid())
    }

    pub fn summary(&self) -> aggregate::Summary {
        aggregate::Summary::compute(&self.entries, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use mockall::predicate::eq;
    use rstest::rstest;

    use super::{EntryId, EntryStore, LoadError, MemoryStore, MockKeyValueStore, Slot};
    use crate::payment::Money;

    fn store_with(entries: &[(&str, &str, &str)]) -> EntryStore<MemoryStore> {
        let mut store = EntryStore::load(MemoryStore::new()).unwrap();
        for (date, clock_in, clock_out) in entries {
            store.add_entry(date, clock_in, clock_out).unwrap();
        }
        store
    }

    fn ids(store: &EntryStore<MemoryStore>) -> Vec<u64> {
        store.all_entries().map(|x| x.id().inner()).collect()
    }

    #[test]
    fn test_load_empty_storage_uses_defaults() {
        let store = EntryStore::load(MemoryStore::new()).unwrap();

        assert!(store.is_empty());
        assert_eq!(store.hourly_rate(), "45");
        assert_eq!(store.amount_paid(), "");
    }

    #[test]
    fn test_load_reads_every_slot() {
        let storage = MemoryStore::new()
            .with_value(
                "entries",
                r#"[{"id":3,"date":"2024-01-10","clockIn":"09:00","clockOut":"17:30"}]"#,
            )
            .with_value("hourly_rate", "50")
            .with_value("amount_paid", "120.5");

        let store = EntryStore::load(storage).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.hourly_rate(), "50");
        assert_eq!(store.amount_paid(), "120.5");
        let entry = store.entry_from_id(EntryId::new(3)).unwrap();
        assert_eq!(entry.date(), "2024-01-10");
        assert_eq!(entry.clock_in(), "09:00");
        assert_eq!(entry.clock_out(), "17:30");
    }

    #[test]
    fn test_load_malformed_entries_is_fatal() {
        let storage = MemoryStore::new().with_value("entries", "[{");

        let result = EntryStore::load(storage);

        assert!(matches!(result, Err(LoadError::MalformedEntries(_))));
    }

    #[test]
    fn test_load_duplicate_ids_is_fatal() {
        let storage = MemoryStore::new().with_value(
            "entries",
            r#"[
                {"id":1,"date":"2024-01-10","clockIn":"09:00","clockOut":"10:00"},
                {"id":1,"date":"2024-01-11","clockIn":"09:00","clockOut":"10:00"}
            ]"#,
        );

        let result = EntryStore::load(storage);

        assert!(matches!(result, Err(LoadError::DuplicateEntryId(1))));
    }

    #[test]
    fn test_load_storage_failure() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get()
            .with(eq("entries"))
            .returning(|_| Err(anyhow!("disk on fire")));

        let result = EntryStore::load(storage);

        assert!(matches!(
            result,
            Err(LoadError::Storage {
                slot: Slot::Entries,
                ..
            })
        ));
    }

    /// New IDs continue after the largest loaded one.
    #[test]
    fn test_new_ids_follow_loaded_ids() {
        let storage = MemoryStore::new().with_value(
            "entries",
            r#"[
                {"id":40,"date":"2024-01-10","clockIn":"09:00","clockOut":"10:00"},
                {"id":7,"date":"2024-01-11","clockIn":"09:00","clockOut":"10:00"}
            ]"#,
        );
        let mut store = EntryStore::load(storage).unwrap();

        let id = store.add_entry("2024-01-12", "08:00", "09:00").unwrap();

        assert_eq!(id, Some(EntryId::new(41)));
    }

    /// Loaded IDs at the top of the range don't make the next ID wrap onto one in use.
    #[test]
    fn test_new_id_after_largest_possible_id() {
        let storage = MemoryStore::new().with_value(
            "entries",
            r#"[
                {"id":0,"date":"2024-01-10","clockIn":"09:00","clockOut":"10:00"},
                {"id":18446744073709551615,"date":"2024-01-11","clockIn":"09:00","clockOut":"10:00"}
            ]"#,
        );
        let mut store = EntryStore::load(storage).unwrap();

        let first = store.add_entry("2024-01-12", "08:00", "09:00").unwrap();
        let second = store.add_entry("2024-01-13", "08:00", "09:00").unwrap();

        assert_eq!(first, Some(EntryId::new(1)));
        assert_eq!(second, Some(EntryId::new(2)));
        assert_eq!(ids(&store), vec![0, u64::MAX, 1, 2]);
        let reloaded = EntryStore::load(store.storage().clone()).unwrap();
        assert_eq!(reloaded.len(), 4);
    }

    #[test]
    fn test_add_entry_appends_and_persists() {
        let mut store = store_with(&[("2024-01-12", "08:00", "12:00")]);

        let id = store
            .add_entry("2024-01-10", "09:00", "17:30")
            .unwrap()
            .unwrap();

        assert_eq!(store.all_entries().last().unwrap().id(), id);
        let saved = store.storage().get_value("entries").unwrap();
        assert_eq!(
            saved,
            r#"[{"id":1,"date":"2024-01-12","clockIn":"08:00","clockOut":"12:00"},{"id":2,"date":"2024-01-10","clockIn":"09:00","clockOut":"17:30"}]"#
        );
    }

    #[rstest]
    #[case::no_date("", "09:00", "17:00")]
    #[case::no_clock_in("2024-01-10", "", "17:00")]
    #[case::no_clock_out("2024-01-10", "09:00", "")]
    #[case::nothing("", "", "")]
    fn test_add_entry_with_empty_field_is_ignored(
        #[case] date: &str,
        #[case] clock_in: &str,
        #[case] clock_out: &str,
    ) {
        let mut store = store_with(&[("2024-01-12", "08:00", "12:00")]);

        let result = store.add_entry(date, clock_in, clock_out).unwrap();

        assert_eq!(result, None);
        assert_eq!(ids(&store), vec![1]);
    }

    /// Only emptiness is checked, nonsense times are still recorded.
    #[test]
    fn test_add_entry_does_not_validate_times() {
        let mut store = store_with(&[]);

        let id = store.add_entry("someday", "late", "later").unwrap();

        assert!(id.is_some());
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_hours(), 0.0);
    }

    #[test]
    fn test_ids_are_unique_after_deletes() {
        let mut store = store_with(&[
            ("2024-01-10", "09:00", "10:00"),
            ("2024-01-11", "09:00", "10:00"),
        ]);

        store.delete_entry(EntryId::new(2)).unwrap();
        store.add_entry("2024-01-12", "09:00", "10:00").unwrap();

        assert_eq!(ids(&store), vec![1, 3]);
    }

    #[test]
    fn test_delete_entry_removes_exactly_one() {
        let mut store = store_with(&[
            ("2024-01-10", "09:00", "10:00"),
            ("2024-01-10", "11:00", "12:00"),
            ("2024-01-11", "09:00", "10:00"),
        ]);

        let removed = store.delete_entry(EntryId::new(2)).unwrap();

        assert!(removed);
        assert_eq!(ids(&store), vec![1, 3]);
        assert!(store.entry_from_id(EntryId::new(2)).is_none());
        assert!(!store
            .storage()
            .get_value("entries")
            .unwrap()
            .contains(r#""id":2"#));
    }

    #[test]
    fn test_delete_missing_entry_is_noop() {
        let mut store = store_with(&[
            ("2024-01-10", "09:00", "10:00"),
            ("2024-01-11", "09:00", "10:00"),
            ("2024-01-12", "09:00", "10:00"),
        ]);

        let removed = store.delete_entry(EntryId::new(99)).unwrap();

        assert!(!removed);
        assert_eq!(ids(&store), vec![1, 2, 3]);
    }

    #[test]
    fn test_list_entries_is_stable_by_date() {
        let store = store_with(&[
            ("2024-02-01", "09:00", "10:00"),
            ("2024-01-10", "13:00", "14:00"),
            ("2024-01-31", "09:00", "10:00"),
            ("2024-01-10", "08:00", "09:00"),
        ]);

        let listed: Vec<_> = store
            .list_entries()
            .into_iter()
            .map(|x| x.id().inner())
            .collect();

        assert_eq!(listed, vec![2, 4, 3, 1]);
        assert_eq!(ids(&store), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_settings_persist_independently() {
        let mut store = store_with(&[]);

        store.set_hourly_rate("50").unwrap();

        assert_eq!(store.storage().get_value("hourly_rate"), Some("50"));
        assert_eq!(store.storage().get_value("amount_paid"), None);
        assert_eq!(store.storage().get_value("entries"), None);

        store.set_amount_paid("").unwrap();

        assert_eq!(store.storage().get_value("amount_paid"), Some(""));
    }

    /// A failed write is reported but the change stays in memory.
    #[test]
    fn test_failed_persist_keeps_mutation() {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .with(eq("entries"), mockall::predicate::always())
            .returning(|_, _| Err(anyhow!("read-only")));
        storage
            .expect_set()
            .with(eq("hourly_rate"), eq("60"))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut store = EntryStore::load(storage).unwrap();

        let result = store.add_entry("2024-01-10", "09:00", "10:00");
        let error = result.unwrap_err();
        assert_eq!(error.failed_slots().collect::<Vec<_>>(), vec![Slot::Entries]);
        assert_eq!(store.len(), 1);

        store.set_hourly_rate("60").unwrap();
        assert_eq!(store.hourly_rate(), "60");
        assert_eq!(store.total_amount_owed(), Money::new(60.0));
    }

    /// `save` tries every slot and reports all that failed.
    #[test]
    fn test_save_attempts_every_slot() {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .with(eq("entries"), eq("[]"))
            .times(1)
            .returning(|_, _| Err(anyhow!("full")));
        storage
            .expect_set()
            .with(eq("hourly_rate"), eq("45"))
            .times(1)
            .returning(|_, _| Ok(()));
        storage
            .expect_set()
            .with(eq("amount_paid"), eq(""))
            .times(1)
            .returning(|_, _| Err(anyhow!("full")));
        let mut store = EntryStore::load(storage).unwrap();

        let error = store.save().unwrap_err();

        assert_eq!(
            error.failed_slots().collect::<Vec<_>>(),
            vec![Slot::Entries, Slot::AmountPaid]
        );
    }

    #[test]
    fn test_totals_follow_mutations() {
        let mut store = store_with(&[("2024-01-10", "09:00", "13:00")]);
        store.set_hourly_rate("50").unwrap();
        store.set_amount_paid("50").unwrap();

        assert_eq!(store.total_hours(), 4.0);
        assert_eq!(store.total_amount_owed(), Money::new(200.0));
        assert_eq!(store.amount_outstanding(), Money::new(150.0));

        store.delete_entry(EntryId::new(1)).unwrap();

        assert_eq!(store.total_hours(), 0.0);
        assert_eq!(store.amount_outstanding(), Money::new(-50.0));
    }
}
