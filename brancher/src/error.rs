//! Error taxonomy and exit codes.

use thiserror::Error;

/// Exit code for internal consistency faults (`EX_SOFTWARE`).
pub const EXIT_INTERNAL: i32 = 70;

/// Exit code used when the user aborts an interactive prompt.
pub const EXIT_ABORTED: i32 = 130;

/// Errors raised while resolving and running a statement.
#[derive(Debug, Error)]
pub enum Error {
    // === User input ===
    #[error("bad option: {0}")]
    BadOption(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("bad id: {0}")]
    BadId(String),

    #[error("id should be an integer: {0}")]
    IdNotInteger(String),

    #[error("--branch and --new are mutually exclusive")]
    BranchAndNew,

    #[error("no such branch: {0}")]
    UnknownBranch(String),

    #[error("'{branch}' already has id {id}")]
    AlreadyHasId { branch: String, id: u32 },

    #[error("id {id} is already used by '{holder}'")]
    IdConflict { id: u32, holder: String },

    #[error("id 0 is reserved for the trunk branch")]
    TrunkIdReserved,

    #[error("the trunk branch '{0}' always has id 0")]
    TrunkIdPinned(String),

    // === External commands ===
    #[error("`{command}` failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    // === State ===
    #[error("history is empty")]
    HistoryEmpty,

    #[error("metadata file is corrupted: {0}")]
    BadMetadata(String),

    // === Internal ===
    #[error("internal error: duplicate id {id} for '{first}' and '{second}'")]
    DuplicateId {
        id: u32,
        first: String,
        second: String,
    },

    // === Prompt ===
    #[error("aborted")]
    Aborted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Process exit code for this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => *code,
            Self::DuplicateId { .. } => EXIT_INTERNAL,
            Self::Aborted => EXIT_ABORTED,
            _ => 1,
        }
    }

    /// Whether the error should be reported on stderr.
    pub const fn is_reported(&self) -> bool {
        !matches!(self, Self::Aborted)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
