//! User-facing operations.
//!
//! [`App`] ties the entry store, the access gate and the session together and
//! runs one parsed command. Entry commands unlock the session first; the
//! handlers in [`entries`] and [`export`] refuse to run on a locked session.

pub mod entries;
pub mod export;
pub mod format;
pub mod pin;

pub use entries::{
    add_entry, delete_entry, edit_entry, entry_by_date, entry_by_id, find_entries, today_entry,
    EntryQuery,
};
pub use export::{export_to_pdf, ExportSelection};
pub use pin::{PinReader, TerminalPinReader};

use crate::auth::{AccessGate, SecretStore, Session};
use crate::cli::{Commands, PinCommand, ShowArgs};
use crate::errors::AppResult;
use crate::export::entries_to_json;
use crate::store::EntryStore;
use std::io::{Read, Write};
use tracing::debug;

/// Everything one invocation needs.
pub struct App<S: SecretStore> {
    pub store: EntryStore,
    pub gate: AccessGate<S>,
    pub session: Session,
    pins: Box<dyn PinReader>,
}

impl<S: SecretStore> App<S> {
    pub fn new(store: EntryStore, gate: AccessGate<S>, pins: Box<dyn PinReader>) -> Self {
        Self {
            store,
            gate,
            session: Session::new(),
            pins,
        }
    }

    /// Runs `command`, reading entry text from `input` and writing results
    /// to `out`.
    pub fn run(
        &mut self,
        command: &Commands,
        input: &mut dyn Read,
        out: &mut dyn Write,
    ) -> AppResult<()> {
        match command {
            Commands::Pin(pin_command) => self.run_pin(pin_command, out),
            Commands::Add(args) => {
                self.unlock()?;
                let entry = add_entry(&self.store, &self.session, args, input)?;
                writeln!(
                    out,
                    "Created entry #{} for {} ({} words)",
                    entry.id, entry.entry_date, entry.word_count
                )?;
                Ok(())
            }
            Commands::Edit(args) => {
                self.unlock()?;
                let entry = edit_entry(&self.store, &self.session, args)?;
                writeln!(out, "Updated entry #{} ({} words)", entry.id, entry.word_count)?;
                Ok(())
            }
            Commands::Delete { id } => {
                self.unlock()?;
                if delete_entry(&self.store, &self.session, *id)? {
                    writeln!(out, "Deleted entry #{}", id)?;
                } else {
                    writeln!(out, "No entry #{}; nothing deleted", id)?;
                }
                Ok(())
            }
            Commands::Show(args) => {
                self.unlock()?;
                self.show(args, out)
            }
            Commands::List(args) => {
                self.unlock()?;
                let entries = find_entries(&self.store, &self.session, &(&args.filter).into())?;
                if args.json {
                    writeln!(out, "{}", entries_to_json(&entries)?)?;
                } else if entries.is_empty() {
                    writeln!(out, "No entries found")?;
                } else {
                    for entry in &entries {
                        writeln!(out, "{}", format::summary_line(entry))?;
                    }
                }
                Ok(())
            }
            Commands::Export(args) => {
                self.unlock()?;
                let selection = match args.id {
                    Some(id) => ExportSelection::Single(id),
                    None => ExportSelection::Matching((&args.filter).into()),
                };
                let count = export_to_pdf(&self.store, &self.session, &selection, &args.output)?;
                writeln!(
                    out,
                    "Exported {} entr{} to {}",
                    count,
                    if count == 1 { "y" } else { "ies" },
                    args.output.display()
                )?;
                Ok(())
            }
        }
    }

    fn unlock(&mut self) -> AppResult<()> {
        pin::unlock(&self.gate, &mut self.session, self.pins.as_ref())
    }

    fn run_pin(&mut self, command: &PinCommand, out: &mut dyn Write) -> AppResult<()> {
        debug!("Running pin command {:?}", command);
        match command {
            PinCommand::Set => {
                pin::set_pin(&self.gate, &mut self.session, self.pins.as_ref())?;
                writeln!(out, "PIN set")?;
            }
            PinCommand::Check => {
                self.unlock()?;
                writeln!(out, "PIN accepted")?;
            }
            PinCommand::Reset => {
                pin::reset_pin(&self.gate, &mut self.session, self.pins.as_ref())?;
                writeln!(out, "PIN removed. Run `daybook pin set` to create a new one.")?;
            }
        }
        Ok(())
    }

    fn show(&self, args: &ShowArgs, out: &mut dyn Write) -> AppResult<()> {
        let (entry, missing) = if let Some(id) = args.id {
            (
                entry_by_id(&self.store, &self.session, id)?,
                format!("No entry #{}", id),
            )
        } else {
            let entry = match args.date {
                Some(date) => entry_by_date(&self.store, &self.session, date)?,
                None => today_entry(&self.store, &self.session)?,
            };
            let date = args.date.unwrap_or_else(|| self.store.today());
            (entry, format!("No entry for {}", date))
        };

        match entry {
            Some(entry) => write!(out, "{}", format::detail(&entry))?,
            None => writeln!(out, "{}", missing)?,
        }
        Ok(())
    }
}
