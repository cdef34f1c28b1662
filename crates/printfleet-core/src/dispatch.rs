// ── Job command guards ──
//
// Pure checks run against the cached printer record before a job command
// goes out. A failed check is a declined command, not an error.

use strum::Display;

use crate::model::Printer;

/// Outcome of a job command that passed input validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The remote call was made and succeeded.
    Dispatched,
    /// Nothing was sent.
    Declined(Declined),
}

impl JobOutcome {
    pub fn is_dispatched(self) -> bool {
        matches!(self, Self::Dispatched)
    }
}

/// Why a job command was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Declined {
    #[strum(to_string = "printer is not known")]
    UnknownPrinter,
    #[strum(to_string = "printer is busy printing")]
    Busy,
    #[strum(to_string = "printer is not reachable")]
    Unreachable,
    #[strum(to_string = "printer status has not been received yet")]
    StatusUnknown,
    #[strum(to_string = "printer is not printing")]
    NotPrinting,
    #[strum(to_string = "operator did not confirm")]
    NotConfirmed,
}

/// A new print may start only on a reachable printer confirmed idle.
pub fn check_printable(printer: &Printer) -> Result<(), Declined> {
    if !printer.reachable {
        return Err(Declined::Unreachable);
    }
    let printing = printer.state_flags.printing;
    if printing.is_on() {
        return Err(Declined::Busy);
    }
    if !printing.is_known() {
        return Err(Declined::StatusUnknown);
    }
    Ok(())
}

/// Stopping only makes sense for a printer confirmed printing.
pub fn check_stoppable(printer: &Printer) -> Result<(), Declined> {
    if printer.state_flags.printing.is_on() {
        Ok(())
    } else {
        Err(Declined::NotPrinting)
    }
}

pub(crate) fn stop_prompt(printer: &Printer) -> String {
    format!("Stop the current print on \"{}\"?", printer.name)
}
