// ── Controller ──
//
// The action layer between the print server collaborators and the fleet
// store. Every remote call goes out from here; its result is written to
// the store only after the call resumes, so concurrent actions resolve
// as last-writer-wins.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandResult};
use crate::config::FleetConfig;
use crate::dispatch::{Declined, JobOutcome, check_printable, check_stoppable, stop_prompt};
use crate::error::CoreError;
use crate::model::{BatchReprintReport, EntityId, FileEntry, Printer, PrinterSpec};
use crate::service::Services;
use crate::store::{FleetStore, ViewSlot};
use crate::stream::PrinterStream;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Owns the fleet store and
/// the remote collaborators, reconciles remote results into the store,
/// and gates job commands on the cached printer state.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: FleetConfig,
    store: Arc<FleetStore>,
    services: Services,
}

impl Controller {
    pub fn new(config: FleetConfig, services: Services) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                config,
                store: Arc::new(FleetStore::new()),
                services,
            }),
        }
    }

    pub fn config(&self) -> &FleetConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<FleetStore> {
        &self.inner.store
    }

    // ── Printer registry ─────────────────────────────────────────

    /// Fetch the full printer list and replace the cached one.
    /// Returns the number of printers now known.
    pub async fn refresh(&self) -> Result<usize, CoreError> {
        let printers = self.inner.services.printers.list().await?;
        let count = printers.len();
        self.inner.store.upsert_all(printers);
        debug!(printers = count, "printer refresh complete");
        Ok(count)
    }

    pub async fn create_printer(&self, spec: &PrinterSpec) -> Result<Printer, CoreError> {
        require_name(spec)?;
        let printer = self.inner.services.printers.create(spec).await?;
        info!(printer_id = %printer.id, name = %printer.name, "printer created");
        self.inner.store.insert(printer.clone());
        Ok(printer)
    }

    /// Update a printer remotely, then replace the cached record by id.
    pub async fn update_printer(
        &self,
        id: &EntityId,
        spec: &PrinterSpec,
    ) -> Result<Printer, CoreError> {
        require_id(id)?;
        require_name(spec)?;
        let printer = self.inner.services.printers.update(id, spec).await?;
        if printer.id != *id {
            return Err(CoreError::MalformedResponse {
                operation: "update printer".into(),
                message: format!("asked for printer {id}, got {}", printer.id),
            });
        }
        self.inner.store.replace(id, printer.clone());
        debug!(printer_id = %id, "printer updated");
        Ok(printer)
    }

    /// Check that a printer answers, without touching the cache.
    pub async fn test_connection(&self, spec: &PrinterSpec) -> Result<Printer, CoreError> {
        let printer = self.inner.services.printers.test_connection(spec).await?;
        debug!(name = %spec.name, reachable = printer.reachable, "connection test finished");
        Ok(printer)
    }

    /// Delete a printer remotely, then drop it and its side state locally.
    pub async fn delete_printer(&self, id: &EntityId) -> Result<(), CoreError> {
        require_id(id)?;
        self.inner.services.printers.delete(id).await?;
        self.inner.store.remove(id);
        info!(printer_id = %id, "printer deleted");
        Ok(())
    }

    // ── Files ────────────────────────────────────────────────────

    /// Fetch a printer's files into its bucket. Returns the fetched list,
    /// newest first.
    pub async fn load_files(
        &self,
        printer_id: &EntityId,
        recursive: bool,
    ) -> Result<Vec<FileEntry>, CoreError> {
        require_id(printer_id)?;
        let listing = self
            .inner
            .services
            .files
            .list(printer_id, recursive)
            .await?;
        Ok(self.inner.store.files.ingest(printer_id, listing.files))
    }

    /// Delete a file remotely, then drop it from the bucket.
    ///
    /// Returns the bucket's remaining entries, or `None` when the printer
    /// has no bucket yet.
    pub async fn delete_entry(
        &self,
        printer_id: &EntityId,
        path: &str,
    ) -> Result<Option<Vec<FileEntry>>, CoreError> {
        require_id(printer_id)?;
        require_path(path)?;
        self.inner.services.files.delete(printer_id, path).await?;
        Ok(self.inner.store.files.remove_entry(printer_id, path))
    }

    /// Clear a printer's storage. The bucket afterwards holds exactly the
    /// files the printer failed to remove.
    pub async fn clear_failed_only(
        &self,
        printer_id: &EntityId,
    ) -> Result<Vec<FileEntry>, CoreError> {
        require_id(printer_id)?;
        let response = self.inner.services.files.clear(printer_id).await?;
        let Some(failed) = response.failed_files else {
            return Err(CoreError::MalformedResponse {
                operation: "clear files".into(),
                message: "response lacks the failed-file report".into(),
            });
        };
        let kept = self.inner.store.files.ingest(printer_id, failed);
        info!(printer_id = %printer_id, failed = kept.len(), "printer files cleared");
        Ok(kept)
    }

    // ── Jobs ─────────────────────────────────────────────────────

    /// Stop the running job after operator confirmation.
    ///
    /// Cached flags are not touched; the next refresh reports the new state.
    pub async fn stop_job(&self, printer_id: &EntityId) -> Result<JobOutcome, CoreError> {
        let Some(printer) = self.inner.store.find(printer_id) else {
            debug!(printer_id = %printer_id, "stop requested for unknown printer");
            return Ok(JobOutcome::Declined(Declined::UnknownPrinter));
        };
        if let Err(reason) = check_stoppable(&printer) {
            debug!(printer_id = %printer_id, %reason, "stop declined");
            return Ok(JobOutcome::Declined(reason));
        }

        let question = stop_prompt(&printer);
        if !self.inner.services.prompt.confirm(&question).await {
            debug!(printer_id = %printer_id, "stop not confirmed");
            return Ok(JobOutcome::Declined(Declined::NotConfirmed));
        }

        self.inner.services.jobs.stop(printer_id).await?;
        info!(printer_id = %printer_id, "stop sent");
        Ok(JobOutcome::Dispatched)
    }

    /// Select `path` on the printer and start it immediately.
    pub async fn print_file(
        &self,
        printer_id: &EntityId,
        path: &str,
    ) -> Result<JobOutcome, CoreError> {
        require_path(path)?;
        let Some(printer) = self.inner.store.find(printer_id) else {
            debug!(printer_id = %printer_id, "print requested for unknown printer");
            return Ok(JobOutcome::Declined(Declined::UnknownPrinter));
        };
        if let Err(reason) = check_printable(&printer) {
            debug!(printer_id = %printer_id, %reason, "print declined");
            return Ok(JobOutcome::Declined(reason));
        }

        self.inner
            .services
            .files
            .select_and_print(printer_id, path, true)
            .await?;
        info!(printer_id = %printer_id, path, "print started");
        Ok(JobOutcome::Dispatched)
    }

    /// Reprint on every selected printer.
    ///
    /// The selection is cleared before this returns; the remote call runs
    /// on a spawned task and logs the aggregate result. Await the handle
    /// to get the report. Must be called within a tokio runtime.
    pub fn batch_reprint(
        &self,
    ) -> Result<JoinHandle<Result<BatchReprintReport, CoreError>>, CoreError> {
        let printer_ids = self.inner.store.selection.take();
        if printer_ids.is_empty() {
            return Err(CoreError::validation("no printers selected for batch reprint"));
        }

        let files = Arc::clone(&self.inner.services.files);
        debug!(printers = printer_ids.len(), "dispatching batch reprint");

        Ok(tokio::spawn(async move {
            match files.batch_reprint(&printer_ids).await {
                Ok(report) => {
                    info!(
                        printers = printer_ids.len(),
                        accepted = report.accepted,
                        rejected = report.rejected,
                        "batch reprint finished"
                    );
                    Ok(report)
                }
                Err(e) => {
                    warn!(printers = printer_ids.len(), error = %e, "batch reprint failed");
                    Err(e.into())
                }
            }
        }))
    }

    // ── Selection ────────────────────────────────────────────────

    /// Flip selection of a printer. Returns whether it is selected afterwards.
    ///
    /// Unknown ids are deselected if present and never added.
    pub fn toggle_selection(&self, printer_id: &EntityId) -> bool {
        let store = &self.inner.store;
        if let Some(printer) = store.find(printer_id) {
            return store.selection.toggle(&printer);
        }
        if !store.selection.forget(printer_id) {
            warn!(printer_id = %printer_id, "cannot select unknown printer");
        }
        false
    }

    pub fn clear_selection(&self) {
        self.inner.store.selection.clear();
    }

    pub fn is_selected(&self, printer_id: &EntityId) -> bool {
        self.inner.store.selection.contains(printer_id)
    }

    /// Selected printers resolved against the current records.
    pub fn selected_printers(&self) -> Vec<Arc<Printer>> {
        let store = &self.inner.store;
        store
            .selection
            .ids()
            .iter()
            .filter_map(|id| store.find(id))
            .collect()
    }

    // ── View pointers ────────────────────────────────────────────

    pub fn show(&self, slot: ViewSlot, printer_id: &EntityId) -> bool {
        self.inner.store.point_view(slot, printer_id)
    }

    pub fn hide(&self, slot: ViewSlot) {
        self.inner.store.clear_view(slot);
    }

    pub fn viewed(&self, slot: ViewSlot) -> Option<Arc<Printer>> {
        self.inner.store.view_printer(slot)
    }

    // ── Snapshot accessors (delegate to FleetStore) ──────────────

    pub fn find_printer(&self, id: &EntityId) -> Option<Arc<Printer>> {
        self.inner.store.find(id)
    }

    pub fn printers_snapshot(&self) -> Arc<Vec<Arc<Printer>>> {
        self.inner.store.printers_snapshot()
    }

    pub fn printers(&self) -> PrinterStream {
        self.inner.store.subscribe_printers()
    }

    pub fn files_of(&self, printer_id: &EntityId) -> Option<Vec<FileEntry>> {
        self.inner.store.files.entries(printer_id)
    }

    // ── Command execution ────────────────────────────────────────

    /// Route a [`Command`] to the matching operation.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        match cmd {
            Command::RefreshPrinters => {
                let printers = self.refresh().await?;
                Ok(CommandResult::Refreshed { printers })
            }
            Command::CreatePrinter(spec) => {
                Ok(CommandResult::Printer(self.create_printer(&spec).await?))
            }
            Command::UpdatePrinter { id, spec } => Ok(CommandResult::Printer(
                self.update_printer(&id, &spec).await?,
            )),
            Command::TestConnection(spec) => {
                Ok(CommandResult::Printer(self.test_connection(&spec).await?))
            }
            Command::DeletePrinter { id } => {
                self.delete_printer(&id).await?;
                Ok(CommandResult::Ok)
            }
            Command::LoadFiles {
                printer_id,
                recursive,
            } => {
                let recursive = recursive.unwrap_or(self.inner.config.recursive_file_listing);
                Ok(CommandResult::Files(
                    self.load_files(&printer_id, recursive).await?,
                ))
            }
            Command::DeleteFile { printer_id, path } => {
                match self.delete_entry(&printer_id, &path).await? {
                    Some(files) => Ok(CommandResult::Files(files)),
                    None => Ok(CommandResult::Ok),
                }
            }
            Command::ClearFailedFiles { printer_id } => Ok(CommandResult::Files(
                self.clear_failed_only(&printer_id).await?,
            )),
            Command::StopJob { printer_id } => {
                Ok(CommandResult::Job(self.stop_job(&printer_id).await?))
            }
            Command::PrintFile { printer_id, path } => Ok(CommandResult::Job(
                self.print_file(&printer_id, &path).await?,
            )),
            Command::BatchReprint => Ok(CommandResult::BatchDispatched(self.batch_reprint()?)),
        }
    }
}

// ── Input validation ─────────────────────────────────────────────

fn require_id(id: &EntityId) -> Result<(), CoreError> {
    if id.is_blank() {
        return Err(CoreError::validation("printer id is empty"));
    }
    Ok(())
}

fn require_path(path: &str) -> Result<(), CoreError> {
    if path.trim().is_empty() {
        return Err(CoreError::validation("file path is empty"));
    }
    Ok(())
}

fn require_name(spec: &PrinterSpec) -> Result<(), CoreError> {
    if spec.name.trim().is_empty() {
        return Err(CoreError::validation("printer name is empty"));
    }
    Ok(())
}
