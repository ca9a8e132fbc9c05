use std::io::Write;

use anyhow::{Context, Result};

use crate::aggregate::{counted_hours, Summary};
use crate::state::Entry;

/// Renders the tracker's state for a terminal.
pub trait ConsolePresenter {
    /// Shows entries in the order given, one per line.
    fn show_entries(&mut self, entries: &[&Entry]) -> Result<()>;

    fn show_summary(&mut self, summary: &Summary) -> Result<()>;

    fn show_message(&mut self, message: &str) -> Result<()>;
}

/// Plain aligned text, hours and money rounded to two decimals.
pub struct ConsoleText<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleText<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleText<'a, W> {
    fn show_entries(&mut self, entries: &[&Entry]) -> Result<()> {
        if entries.is_empty() {
            return self.show_message("No entries recorded.");
        }

        for entry in entries {
            writeln!(
                self.writer,
                "{:>6}  {}  {} - {}  {:.2}h",
                entry.id(),
                entry.date(),
                entry.clock_in(),
                entry.clock_out(),
                counted_hours(entry)
            )
            .with_context(|| format!("Failed to write entry: {:?}", entry))?;
        }

        Ok(())
    }

    fn show_summary(&mut self, summary: &Summary) -> Result<()> {
        let lines = [
            ("Total hours", format!("{:.2}h", summary.total_hours)),
            ("Hourly rate", summary.hourly_rate.to_string()),
            ("Amount owed", summary.amount_owed.to_string()),
            ("Amount paid", summary.amount_paid.to_string()),
            ("Amount outstanding", summary.amount_outstanding.to_string()),
        ];
        for (label, value) in lines {
            writeln!(self.writer, "{:<20}{}", format!("{label}:"), value)
                .context("Failed to write summary")?;
        }

        Ok(())
    }

    fn show_message(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{message}").context("Failed to write message")
    }
}
