//! Error types and result definitions for loader operations.
//!
//! [`LoaderError`] carries a classification ([`ErrorKind`]), a static description, optional
//! dynamic detail, an optional source error and the callsite that created it. Job failures are
//! not errors: they are reported through [`crate::workers::JobReport`].

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Main error type of the loader.
///
/// Cheap to clone, so a registered error can be handed out repeatedly.
#[derive(Debug, Clone)]
pub struct LoaderError {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
}

/// Categories of failures the loader distinguishes.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Database
    /// The server could not be reached or the connection pool gave up.
    DatabaseConnectionFailed,
    /// A statement was rejected or failed while running.
    DatabaseQueryFailed,
    /// The server refused the configured credentials.
    AuthenticationError,

    // Data
    /// A table that had to be split has no rows.
    EmptyTable,
    /// A value could not be converted, such as non UTF-8 tool output.
    ConversionError,

    // External processes
    /// An external program could not be started or exited unsuccessfully.
    CommandFailed,

    // Configuration and I/O
    /// Connection settings the driver cannot use.
    ConfigError,
    /// Reading or writing a local file failed.
    IoError,
}

impl LoaderError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Where the error was created.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    #[track_caller]
    pub(crate) fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        LoaderError {
            kind,
            description,
            detail,
            source,
            location: Location::caller(),
        }
    }
}

/// Errors compare by kind only.
impl PartialEq for LoaderError {
    fn eq(&self, other: &LoaderError) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.description)?;
        if let Some(detail) = self.detail.as_deref() {
            write!(f, ": {detail}")?;
        }

        Ok(())
    }
}

impl error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn error::Error + 'static))
    }
}

impl From<(ErrorKind, &'static str)> for LoaderError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> LoaderError {
        LoaderError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

impl<D> From<(ErrorKind, &'static str, D)> for LoaderError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> LoaderError {
        LoaderError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

impl From<std::io::Error> for LoaderError {
    #[track_caller]
    fn from(err: std::io::Error) -> LoaderError {
        let detail = err.to_string();
        LoaderError::from_components(
            ErrorKind::IoError,
            Cow::Borrowed("I/O operation failed"),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

impl From<std::string::FromUtf8Error> for LoaderError {
    #[track_caller]
    fn from(err: std::string::FromUtf8Error) -> LoaderError {
        let detail = err.to_string();
        LoaderError::from_components(
            ErrorKind::ConversionError,
            Cow::Borrowed("UTF-8 string conversion failed"),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

/// Classifies [`sqlx::Error`] by where it failed: reaching the server or running the statement.
impl From<sqlx::Error> for LoaderError {
    #[track_caller]
    fn from(err: sqlx::Error) -> LoaderError {
        let (kind, description) = match &err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // invalid_authorization_specification, invalid_password
                Some("28000") | Some("28P01") => (
                    ErrorKind::AuthenticationError,
                    "PostgreSQL authentication failed",
                ),
                _ => (ErrorKind::DatabaseQueryFailed, "PostgreSQL statement failed"),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => (
                ErrorKind::DatabaseConnectionFailed,
                "PostgreSQL connection failed",
            ),
            sqlx::Error::Configuration(_) => {
                (ErrorKind::ConfigError, "PostgreSQL connection misconfigured")
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => (
                ErrorKind::ConversionError,
                "PostgreSQL value conversion failed",
            ),
            _ => (ErrorKind::DatabaseQueryFailed, "PostgreSQL error"),
        };

        let detail = err.to_string();
        LoaderError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}
