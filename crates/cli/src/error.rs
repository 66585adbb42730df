//! Structured exit codes for scripting against the CLI.

/// Process exit codes.
///
/// `NotFound` covers the resolver's "not found" sentinel (an unmapped
/// logical path name or an unresolved key without a default), which is a
/// distinct outcome from a hard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    Usage = 2,
    NotFound = 3,
}

impl ExitCode {
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}
