//! Machine faults
//!
//! Every fault is terminal. The binary reports it once and exits with
//! status 1.

use std::path::PathBuf;

use thiserror::Error;

use crate::console::escape_byte;

/// Machine result type
pub type Result<T> = std::result::Result<T, Fault>;

/// Terminal machine faults
#[derive(Debug, Error)]
pub enum Fault {
    #[error("File not found : {}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid number format: {}", escape_byte(*.0))]
    InvalidNumberFormat(u8),

    #[error("Incorrect J syntax")]
    MalformedJumpSyntax,

    #[error("Jump parameters larger than max value of i64")]
    JumpLiteralOverflow,

    #[error("Tried to jump more distance than max tape length ({limit})")]
    JumpOffsetTooLarge { limit: usize },

    #[error("Reached tape limit")]
    TapeLimitReached,

    #[error("Invalid instruction: {}", escape_byte(*.0))]
    InvalidInstruction(u8),

    #[error("Step limit reached after {0} steps")]
    StepLimitReached(u64),

    #[error("console error: {0}")]
    Io(#[from] std::io::Error),
}
