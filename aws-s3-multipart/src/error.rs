/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// Every error carries an [`ErrorContext`] identifying the bucket, key, upload and part the
/// failure happened on, so callers can decide between retrying a single part and aborting the
/// whole session.
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    context: ErrorContext,
    code: Option<String>,
    source: BoxError,
}

/// General categories of multipart upload errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed caller input detected locally. Nothing was sent to the store.
    InvalidArgument,

    /// Network or HTTP level failure talking to the store
    Transport(TransportFailure),

    /// The store (or this library) detected a checksum mismatch for uploaded data
    Integrity,

    /// The store rejected the request for a semantic reason (e.g. unknown part, stale eTag)
    StoreRejected,

    /// A completion manifest declared the same part number with different eTags
    DuplicatePart,

    /// The upload session was already completed or aborted
    SessionClosed,

    /// I/O errors reading a part body
    IOError,

    /// Some kind of internal runtime issue (e.g. task failure, poisoned mutex, etc)
    RuntimeError,

    /// The operation was cancelled by the caller
    OperationCancelled,
}

/// Classification of transport failures
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum TransportFailure {
    /// The request or an attempt timed out
    Timeout,
    /// The request could not be dispatched (connection, DNS, TLS, I/O)
    Dispatch,
    /// A response was received but could not be used (unparseable, 5xx, throttled)
    Response,
    /// Anything else
    Other,
}

/// Identifies what an operation was acting on when it failed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorContext {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) upload_id: Option<String>,
    pub(crate) part_number: Option<u32>,
}

impl ErrorContext {
    /// Context for an operation on a bucket/key that has no session yet
    pub fn object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            key: Some(key.into()),
            ..Default::default()
        }
    }

    /// Context for an operation on an existing session
    pub fn session(session: &crate::types::UploadSession) -> Self {
        Self {
            bucket: Some(session.bucket().to_owned()),
            key: Some(session.key().to_owned()),
            upload_id: Some(session.upload_id().to_owned()),
            part_number: None,
        }
    }

    /// Context for an operation on a bucket only (e.g. listing uploads)
    pub fn bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            ..Default::default()
        }
    }

    /// Set the part number the operation was acting on
    pub fn with_part_number(mut self, part_number: u32) -> Self {
        self.part_number = Some(part_number);
        self
    }

    /// The bucket, if known
    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The object key, if known
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The upload ID, if known
    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    /// The part number, if the failure was part specific
    pub fn part_number(&self) -> Option<u32> {
        self.part_number
    }

    fn is_empty(&self) -> bool {
        self == &ErrorContext::default()
    }

    // fill unset fields from `other`
    fn merge(&mut self, other: ErrorContext) {
        if self.bucket.is_none() {
            self.bucket = other.bucket;
        }
        if self.key.is_none() {
            self.key = other.key;
        }
        if self.upload_id.is_none() {
            self.upload_id = other.upload_id;
        }
        if self.part_number.is_none() {
            self.part_number = other.part_number;
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("bucket", self.bucket.clone()),
            ("key", self.key.clone()),
            ("upload_id", self.upload_id.clone()),
            ("part_number", self.part_number.map(|n| n.to_string())),
        ];
        let mut first = true;
        for (name, value) in fields {
            if let Some(value) = value {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{name}={value}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            context: ErrorContext::default(),
            code: None,
            source: err.into(),
        }
    }

    /// Attach the store's error code (e.g. `InvalidPart`) to this error.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach context to this error. Fields already set on the error are kept.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context.merge(context);
        self
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns what the failed operation was acting on
    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    /// The error code reported by the store, if any
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// True if this is a transport timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(TransportFailure::Timeout))
    }

    /// True if the session this error refers to no longer exists at the store.
    ///
    /// A retried complete or abort that fails this way already took effect.
    pub fn is_session_gone(&self) -> bool {
        self.kind == ErrorKind::SessionClosed
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ErrorKind::Transport(TransportFailure::Timeout) => write!(f, "transport timeout"),
            ErrorKind::Transport(TransportFailure::Dispatch) => {
                write!(f, "failed to dispatch request")
            }
            ErrorKind::Transport(TransportFailure::Response) => write!(f, "unusable response"),
            ErrorKind::Transport(TransportFailure::Other) => write!(f, "transport error"),
            ErrorKind::Integrity => write!(f, "checksum mismatch"),
            ErrorKind::StoreRejected => write!(f, "request rejected by store"),
            ErrorKind::DuplicatePart => write!(f, "conflicting duplicate part"),
            ErrorKind::SessionClosed => write!(f, "upload session closed"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::RuntimeError => write!(f, "runtime error"),
            ErrorKind::OperationCancelled => write!(f, "operation cancelled"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(code) = &self.code {
            write!(f, " ({code})")?;
        }
        if !self.context.is_empty() {
            write!(f, " [{}]", self.context)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        if value.is_cancelled() {
            return Self::new(ErrorKind::OperationCancelled, value);
        }
        Self::new(ErrorKind::RuntimeError, value)
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error
where
    T: Send + Sync + 'static,
{
    fn from(value: std::sync::PoisonError<T>) -> Self {
        Self::new(ErrorKind::RuntimeError, value)
    }
}

impl From<aws_smithy_types::error::operation::BuildError> for Error {
    fn from(value: aws_smithy_types::error::operation::BuildError) -> Self {
        Self::new(ErrorKind::InvalidArgument, value)
    }
}

pub(crate) fn invalid_argument<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InvalidArgument, err)
}

pub(crate) fn integrity<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::Integrity, err)
}

pub(crate) fn store_rejected<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::StoreRejected, err)
}

pub(crate) fn from_kind<E>(kind: ErrorKind) -> impl FnOnce(E) -> Error
where
    E: Into<BoxError>,
{
    |err| Error::new(kind, err)
}

/// Attach `context` to an error, for use with `map_err`
pub(crate) fn with_context(context: ErrorContext) -> impl FnOnce(Error) -> Error {
    |err| err.with_context(context)
}

static CANCELLATION_ERROR: &str = "the operation was cancelled by the caller";

pub(crate) fn operation_cancelled() -> Error {
    Error::new(ErrorKind::OperationCancelled, CANCELLATION_ERROR)
}
