//! Client-side cache and action layer for a fleet of networked 3D printers.
//!
//! This crate owns the domain model and the reactive state a print farm
//! front end renders from, and it gates every action that reaches the print
//! server:
//!
//! - **[`Controller`]** is the facade. It issues remote calls through the
//!   [`Services`] collaborators, reconciles their results into the store
//!   after each call resumes, and declines job commands whose cached
//!   printer state does not permit them.
//!
//! - **[`FleetStore`]** holds the printer records (`DashMap` plus a sorted
//!   `tokio::sync::watch` snapshot), per-printer file buckets, the batch
//!   selection, and the view pointers for the side panel and dialogs.
//!   Removing a printer purges all of that side state.
//!
//! - **[`PrinterStream`]** is the subscription handle vended by the store,
//!   with `current()` / `changed()` / `matching()` for reactive rendering.
//!
//! - **[`Command`]** mirrors each remote-touching operation as a typed
//!   request for hosts that queue or log actions.
//!
//! - **Domain model** ([`model`]): `Printer` with tri-state
//!   [`StatusFlag`]s, `FileEntry`, and [`EntityId`] accepting both UUID and
//!   string server keys.
//!
//! Transport lives outside this crate; hosts implement the traits in
//! [`service`]. [`MockFleet`] implements all of them in memory.

pub mod command;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::FleetConfig;
pub use controller::Controller;
pub use dispatch::{Declined, JobOutcome};
pub use error::CoreError;
pub use service::{
    ConfirmationPrompt, FileService, JobService, MockFleet, PrinterService, ServiceError,
    Services,
};
pub use store::{FleetStore, ViewSlot};
pub use stream::{PrinterFilter, PrinterSnapshot, PrinterStream};

pub use model::{
    BatchReprintReport, ClearFilesResponse, EntityId, FileBucket, FileEntry, FileListing, Printer,
    PrinterSpec, PrinterState, StatusFlag,
};
