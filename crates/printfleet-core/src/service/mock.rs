//! In-memory print server for tests.
//!
//! Implements every collaborator trait over a small mutable fleet model,
//! records each call, and can fail the next call of a given kind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use strum::Display;
use uuid::Uuid;

use super::{ConfirmationPrompt, FileService, JobService, PrinterService, ServiceError};
use crate::model::{
    BatchReprintReport, ClearFilesResponse, EntityId, FileEntry, FileListing, Printer,
    PrinterSpec,
};

/// Kinds of remote call, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MockOp {
    CreatePrinter,
    UpdatePrinter,
    TestConnection,
    ListPrinters,
    DeletePrinter,
    ListFiles,
    DeleteFile,
    ClearFiles,
    BatchReprint,
    SelectAndPrint,
    StopJob,
    Confirm,
}

/// A recorded call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreatePrinter {
        name: String,
    },
    UpdatePrinter {
        id: EntityId,
        name: String,
    },
    TestConnection {
        name: String,
    },
    ListPrinters,
    DeletePrinter {
        id: EntityId,
    },
    ListFiles {
        printer_id: EntityId,
        recursive: bool,
    },
    DeleteFile {
        printer_id: EntityId,
        path: String,
    },
    ClearFiles {
        printer_id: EntityId,
    },
    BatchReprint {
        printer_ids: Vec<EntityId>,
    },
    SelectAndPrint {
        printer_id: EntityId,
        path: String,
        start_immediately: bool,
    },
    StopJob {
        printer_id: EntityId,
    },
    Confirm {
        message: String,
    },
}

impl MockCall {
    pub fn op(&self) -> MockOp {
        match self {
            Self::CreatePrinter { .. } => MockOp::CreatePrinter,
            Self::UpdatePrinter { .. } => MockOp::UpdatePrinter,
            Self::TestConnection { .. } => MockOp::TestConnection,
            Self::ListPrinters => MockOp::ListPrinters,
            Self::DeletePrinter { .. } => MockOp::DeletePrinter,
            Self::ListFiles { .. } => MockOp::ListFiles,
            Self::DeleteFile { .. } => MockOp::DeleteFile,
            Self::ClearFiles { .. } => MockOp::ClearFiles,
            Self::BatchReprint { .. } => MockOp::BatchReprint,
            Self::SelectAndPrint { .. } => MockOp::SelectAndPrint,
            Self::StopJob { .. } => MockOp::StopJob,
            Self::Confirm { .. } => MockOp::Confirm,
        }
    }
}

/// In-memory print server implementing all collaborator traits.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockFleet {
    inner: Arc<Mutex<MockFleetInner>>,
}

#[derive(Debug, Default)]
struct MockFleetInner {
    printers: Vec<Printer>,
    files: HashMap<EntityId, Vec<FileEntry>>,
    clear_responses: HashMap<EntityId, ClearFilesResponse>,
    batch_report: Option<BatchReprintReport>,
    confirm_answer: bool,
    calls: Vec<MockCall>,
    failures: HashMap<MockOp, ServiceError>,
}

impl MockFleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the server-side printer list.
    pub fn with_printers(self, printers: Vec<Printer>) -> Self {
        self.set_printers(printers);
        self
    }

    pub fn set_printers(&self, printers: Vec<Printer>) {
        self.lock().printers = printers;
    }

    /// Seed the file list returned for `printer_id` (any order).
    pub fn set_files(&self, printer_id: &EntityId, files: Vec<FileEntry>) {
        self.lock().files.insert(printer_id.clone(), files);
    }

    /// Override the next clear-files response for `printer_id`.
    pub fn set_clear_response(&self, printer_id: &EntityId, response: ClearFilesResponse) {
        self.lock()
            .clear_responses
            .insert(printer_id.clone(), response);
    }

    pub fn set_batch_report(&self, report: BatchReprintReport) {
        self.lock().batch_report = Some(report);
    }

    /// Answer every confirmation prompt with `answer` (default `false`).
    pub fn answer_confirmations(&self, answer: bool) {
        self.lock().confirm_answer = answer;
    }

    /// Fail the next call of kind `op` with `error`.
    pub fn fail_next(&self, op: MockOp, error: ServiceError) {
        self.lock().failures.insert(op, error);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    pub fn count(&self, op: MockOp) -> usize {
        self.lock().calls.iter().filter(|c| c.op() == op).count()
    }

    pub fn reset(&self) {
        *self.lock() = MockFleetInner::default();
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, MockFleetInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `call` and consume any failure queued for its kind.
    fn begin(&self, call: MockCall) -> Result<MutexGuard<'_, MockFleetInner>, ServiceError> {
        let mut inner = self.lock();
        let op = call.op();
        inner.calls.push(call);
        let failure = inner.failures.remove(&op);
        match failure {
            Some(err) => Err(err),
            None => Ok(inner),
        }
    }
}

fn not_found(id: &EntityId) -> ServiceError {
    ServiceError::Rejected {
        status: 404,
        message: format!("printer {id} not found"),
    }
}

#[async_trait]
impl PrinterService for MockFleet {
    async fn create(&self, spec: &PrinterSpec) -> Result<Printer, ServiceError> {
        let mut inner = self.begin(MockCall::CreatePrinter {
            name: spec.name.clone(),
        })?;
        let printer = Printer::new(Uuid::new_v4(), spec.name.clone()).with_reachable(spec.enabled);
        inner.printers.push(printer.clone());
        Ok(printer)
    }

    async fn update(&self, id: &EntityId, spec: &PrinterSpec) -> Result<Printer, ServiceError> {
        let mut inner = self.begin(MockCall::UpdatePrinter {
            id: id.clone(),
            name: spec.name.clone(),
        })?;
        let printer = inner
            .printers
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| not_found(id))?;
        printer.name.clone_from(&spec.name);
        Ok(printer.clone())
    }

    async fn test_connection(&self, spec: &PrinterSpec) -> Result<Printer, ServiceError> {
        self.begin(MockCall::TestConnection {
            name: spec.name.clone(),
        })?;
        Ok(Printer::new(Uuid::new_v4(), spec.name.clone()).with_reachable(true))
    }

    async fn list(&self) -> Result<Vec<Printer>, ServiceError> {
        let inner = self.begin(MockCall::ListPrinters)?;
        Ok(inner.printers.clone())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), ServiceError> {
        let mut inner = self.begin(MockCall::DeletePrinter { id: id.clone() })?;
        let before = inner.printers.len();
        inner.printers.retain(|p| p.id != *id);
        if inner.printers.len() == before {
            return Err(not_found(id));
        }
        inner.files.remove(id);
        Ok(())
    }
}

#[async_trait]
impl FileService for MockFleet {
    async fn list(
        &self,
        printer_id: &EntityId,
        recursive: bool,
    ) -> Result<FileListing, ServiceError> {
        let inner = self.begin(MockCall::ListFiles {
            printer_id: printer_id.clone(),
            recursive,
        })?;
        Ok(FileListing {
            files: inner.files.get(printer_id).cloned().unwrap_or_default(),
        })
    }

    async fn delete(&self, printer_id: &EntityId, path: &str) -> Result<(), ServiceError> {
        let mut inner = self.begin(MockCall::DeleteFile {
            printer_id: printer_id.clone(),
            path: path.to_owned(),
        })?;
        if let Some(files) = inner.files.get_mut(printer_id) {
            files.retain(|f| f.path != path);
        }
        Ok(())
    }

    async fn clear(&self, printer_id: &EntityId) -> Result<ClearFilesResponse, ServiceError> {
        let mut inner = self.begin(MockCall::ClearFiles {
            printer_id: printer_id.clone(),
        })?;
        let response = inner
            .clear_responses
            .remove(printer_id)
            .unwrap_or(ClearFilesResponse {
                failed_files: Some(Vec::new()),
            });
        if let Some(failed) = &response.failed_files {
            inner.files.insert(printer_id.clone(), failed.clone());
        }
        Ok(response)
    }

    async fn batch_reprint(
        &self,
        printer_ids: &[EntityId],
    ) -> Result<BatchReprintReport, ServiceError> {
        let inner = self.begin(MockCall::BatchReprint {
            printer_ids: printer_ids.to_vec(),
        })?;
        Ok(inner.batch_report.clone().unwrap_or_else(|| BatchReprintReport {
            accepted: u32::try_from(printer_ids.len()).unwrap_or(u32::MAX),
            rejected: 0,
            message: None,
        }))
    }

    async fn select_and_print(
        &self,
        printer_id: &EntityId,
        path: &str,
        start_immediately: bool,
    ) -> Result<(), ServiceError> {
        self.begin(MockCall::SelectAndPrint {
            printer_id: printer_id.clone(),
            path: path.to_owned(),
            start_immediately,
        })?;
        Ok(())
    }
}

#[async_trait]
impl JobService for MockFleet {
    async fn stop(&self, printer_id: &EntityId) -> Result<(), ServiceError> {
        self.begin(MockCall::StopJob {
            printer_id: printer_id.clone(),
        })?;
        Ok(())
    }
}

#[async_trait]
impl ConfirmationPrompt for MockFleet {
    async fn confirm(&self, message: &str) -> bool {
        let mut inner = self.lock();
        inner.calls.push(MockCall::Confirm {
            message: message.to_owned(),
        });
        inner.confirm_answer
    }
}
