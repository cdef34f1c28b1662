//! Remote collaborators.
//!
//! The core never talks to the network itself. Hosts plug in a transport
//! (HTTP client, socket bridge, in-process simulator) by implementing the
//! traits below and handing them to [`Controller::new`](crate::Controller::new)
//! inside a [`Services`] bundle.
//!
//! Every method is a single request/response. Implementations own their
//! timeout policy; the core neither retries nor cancels.

mod mock;

pub use mock::{MockCall, MockFleet, MockOp};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    BatchReprintReport, ClearFilesResponse, EntityId, FileListing, Printer, PrinterSpec,
};

/// Failure reported by a remote collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The print server could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The print server answered with an error status.
    #[error("request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The transport gave up waiting.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// Returns `true` if the failure might clear up on its own.
    ///
    /// Informational only: the core does not retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::Timeout { .. } => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::Malformed(_) => false,
        }
    }
}

/// Printer registry on the print server.
#[async_trait]
pub trait PrinterService: Send + Sync {
    async fn create(&self, spec: &PrinterSpec) -> Result<Printer, ServiceError>;

    async fn update(&self, id: &EntityId, spec: &PrinterSpec) -> Result<Printer, ServiceError>;

    /// Contact a printer without registering it.
    async fn test_connection(&self, spec: &PrinterSpec) -> Result<Printer, ServiceError>;

    async fn list(&self) -> Result<Vec<Printer>, ServiceError>;

    async fn delete(&self, id: &EntityId) -> Result<(), ServiceError>;
}

/// File storage and print selection on individual printers.
#[async_trait]
pub trait FileService: Send + Sync {
    async fn list(&self, printer_id: &EntityId, recursive: bool)
    -> Result<FileListing, ServiceError>;

    async fn delete(&self, printer_id: &EntityId, path: &str) -> Result<(), ServiceError>;

    /// Remove every file; the response lists the ones that could not be removed.
    async fn clear(&self, printer_id: &EntityId) -> Result<ClearFilesResponse, ServiceError>;

    /// Restart the last job on each printer.
    async fn batch_reprint(
        &self,
        printer_ids: &[EntityId],
    ) -> Result<BatchReprintReport, ServiceError>;

    async fn select_and_print(
        &self,
        printer_id: &EntityId,
        path: &str,
        start_immediately: bool,
    ) -> Result<(), ServiceError>;
}

/// Job control.
#[async_trait]
pub trait JobService: Send + Sync {
    async fn stop(&self, printer_id: &EntityId) -> Result<(), ServiceError>;
}

/// Yes/no question to the operator.
///
/// May block on a dialog or resolve immediately; `true` only for an
/// explicit affirmative answer.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// The full set of collaborators a [`Controller`](crate::Controller) needs.
#[derive(Clone)]
pub struct Services {
    pub printers: Arc<dyn PrinterService>,
    pub files: Arc<dyn FileService>,
    pub jobs: Arc<dyn JobService>,
    pub prompt: Arc<dyn ConfirmationPrompt>,
}

impl Services {
    /// Use one object for every collaborator.
    pub fn from_single<S>(svc: &Arc<S>) -> Self
    where
        S: PrinterService + FileService + JobService + ConfirmationPrompt + 'static,
    {
        Self {
            printers: svc.clone(),
            files: svc.clone(),
            jobs: svc.clone(),
            prompt: svc.clone(),
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
