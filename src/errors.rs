use std::fmt;

/// Import-specific error types.
///
/// Per-record failures (`Validation`, `Conflict`, `Database`) are recorded in
/// the run report and processing continues; `Connectivity` is fatal and halts
/// the run (see `ImportError::is_fatal`).
#[derive(Debug)]
pub enum ImportError {
    /// Required field missing or unparseable (tax id, legal name).
    Validation(String),
    /// Backing-store constraint violation during insert (natural-key race).
    Conflict(String),
    /// Backing store unreachable; the run must stop.
    Connectivity(String),
    /// Any other database error.
    Database(sqlx::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ImportError::Conflict(msg) => write!(f, "Constraint conflict: {}", msg),
            ImportError::Connectivity(msg) => write!(f, "Database unreachable: {}", msg),
            ImportError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ImportError {}

impl ImportError {
    /// Fatal errors stop the record loop instead of being accumulated as
    /// per-record failures; every subsequent record would fail the same way.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ImportError::Connectivity(_))
    }
}

impl From<sqlx::Error> for ImportError {
    /// Classifies a `sqlx::Error` into the import taxonomy: unique-key
    /// violations become `Conflict`, transport/pool failures become
    /// `Connectivity`, everything else stays a plain `Database` error.
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ImportError::Conflict(db.message().to_string())
            }
            sqlx::Error::Io(e) => ImportError::Connectivity(e.to_string()),
            sqlx::Error::PoolTimedOut => {
                ImportError::Connectivity("connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => {
                ImportError::Connectivity("connection pool closed".to_string())
            }
            sqlx::Error::Tls(e) => ImportError::Connectivity(e.to_string()),
            other => ImportError::Database(other),
        }
    }
}
