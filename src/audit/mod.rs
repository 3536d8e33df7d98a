//! Best-effort debug dump of the entries table.
//!
//! After every successful mutation the store calls [`AuditDumper::notify`].
//! A background thread then rewrites a text artifact with the table schema and
//! every row. The dump is a debugging aid, not part of the journal's data:
//! failures are logged and dropped, and nothing here can fail or delay the
//! write that triggered it.

use crate::db::dump::render_entries_dump;
use crate::db::Database;
use crate::errors::AppResult;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Handle to the background dump thread.
///
/// Dropping the handle lets the worker finish any queued dump and then joins it.
pub struct AuditDumper {
    sender: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    path: PathBuf,
}

impl AuditDumper {
    /// Starts the worker thread writing to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(db: Database, path: PathBuf) -> AppResult<Self> {
        let (sender, receiver) = mpsc::channel();
        let worker_path = path.clone();
        let worker = thread::Builder::new()
            .name("daybook-audit".to_string())
            .spawn(move || run_worker(db, worker_path, receiver))?;

        debug!("Audit dump worker started for {:?}", path);
        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            path,
        })
    }

    /// Requests a fresh dump. Never blocks and never fails.
    pub fn notify(&self) {
        if let Some(sender) = &self.sender {
            if sender.send(()).is_err() {
                warn!("Audit dump worker is gone; skipping dump");
            }
        }
    }

    /// Path of the dump artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for AuditDumper {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once the queue is drained
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Audit dump worker panicked");
            }
        }
    }
}

fn run_worker(db: Database, path: PathBuf, receiver: Receiver<()>) {
    while receiver.recv().is_ok() {
        // Several writes in a row only need one dump
        while receiver.try_recv().is_ok() {}

        match write_dump(&db, &path) {
            Ok(()) => debug!("Wrote audit dump to {:?}", path),
            Err(e) => warn!("Failed to write audit dump to {:?}: {}", path, e),
        }
    }
    debug!("Audit dump worker stopped");
}

fn write_dump(db: &Database, path: &Path) -> AppResult<()> {
    let conn = db.get_conn()?;
    let dump = render_entries_dump(&conn)?;
    drop(conn);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    file.lock_exclusive()?;
    let result = file
        .set_len(0)
        .and_then(|_| file.write_all(dump.as_bytes()))
        .and_then(|_| file.flush());
    let unlock = fs2::FileExt::unlock(&file);
    result?;
    unlock?;
    Ok(())
}
