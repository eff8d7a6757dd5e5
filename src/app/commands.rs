//! Inbound commands to the application service.
//!
//! These are produced by the serial console once an interactive entry has
//! collected all of its bytes, and interpreted by the
//! [`AppService`](super::service::AppService).

use crate::config::CODE_LENGTH;

/// Commands that the console sends into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Compare these console bytes against the stored code ('4').
    SubmitCode([u8; CODE_LENGTH]),

    /// Overwrite the stored code from these console bytes ('5').
    ProgramCode([u8; CODE_LENGTH]),
}
