use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use error_stack::Report;
use kernel::KernelError;
use std::process::{ExitCode, Termination};

use crate::response::BookSentinel;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
    }
}

/// Storage failure while looking a book up by id. Answered like a missing book.
#[derive(Debug)]
pub struct LookupFailure(Report<KernelError>);

impl From<Report<KernelError>> for LookupFailure {
    fn from(e: Report<KernelError>) -> Self {
        LookupFailure(e)
    }
}

impl IntoResponse for LookupFailure {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "book lookup failed");
        BookSentinel::NoBook.into_response()
    }
}
