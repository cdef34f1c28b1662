// ── Command API ──
//
// Every remote-touching operation as one typed enum, so hosts can queue,
// log, or replay them uniformly. `Controller::execute` routes each
// variant to the matching controller method.

use tokio::task::JoinHandle;

use crate::dispatch::JobOutcome;
use crate::error::CoreError;
use crate::model::{BatchReprintReport, EntityId, FileEntry, Printer, PrinterSpec};

/// All operations that talk to the print server.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Printer registry ─────────────────────────────────────────────
    RefreshPrinters,
    CreatePrinter(PrinterSpec),
    UpdatePrinter {
        id: EntityId,
        spec: PrinterSpec,
    },
    TestConnection(PrinterSpec),
    DeletePrinter {
        id: EntityId,
    },

    // ── Files ────────────────────────────────────────────────────────
    LoadFiles {
        printer_id: EntityId,
        /// `None` uses `FleetConfig::recursive_file_listing`.
        recursive: Option<bool>,
    },
    DeleteFile {
        printer_id: EntityId,
        path: String,
    },
    ClearFailedFiles {
        printer_id: EntityId,
    },

    // ── Jobs ─────────────────────────────────────────────────────────
    StopJob {
        printer_id: EntityId,
    },
    PrintFile {
        printer_id: EntityId,
        path: String,
    },
    BatchReprint,
}

/// Result of a command execution.
#[derive(Debug)]
pub enum CommandResult {
    Ok,
    Refreshed { printers: usize },
    Printer(Printer),
    Files(Vec<FileEntry>),
    Job(JobOutcome),
    /// The batch went out; await the handle for the aggregate report.
    BatchDispatched(JoinHandle<Result<BatchReprintReport, CoreError>>),
}
