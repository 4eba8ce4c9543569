use application::transfer::{BookDto, BookSummaryDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::controller::Exhaust;

/// Plain text answers sent with `200 OK`, failures included.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BookSentinel {
    MissingTitle,
    MissingComment,
    NoBook,
    Deleted,
    AllDeleted,
}

impl BookSentinel {
    pub fn message(&self) -> &'static str {
        match self {
            BookSentinel::MissingTitle => "missing required field title",
            BookSentinel::MissingComment => "missing required field comment",
            BookSentinel::NoBook => "no book exists",
            BookSentinel::Deleted => "delete successful",
            BookSentinel::AllDeleted => "complete delete successful",
        }
    }
}

impl IntoResponse for BookSentinel {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.message()).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct BookSummaryResponse {
    #[serde(rename = "_id")]
    id: Uuid,
    title: String,
    commentcount: usize,
}

#[derive(Debug, Serialize)]
pub struct CreatedBookResponse {
    #[serde(rename = "_id")]
    id: Uuid,
    title: String,
}

impl IntoResponse for CreatedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    #[serde(rename = "_id")]
    id: Uuid,
    title: String,
    comments: Vec<String>,
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct BookPresenter;

impl Exhaust<Vec<BookSummaryDto>> for BookPresenter {
    type To = Json<Vec<BookSummaryResponse>>;
    fn emit(&self, input: Vec<BookSummaryDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(|book| BookSummaryResponse {
                id: book.id,
                title: book.title,
                commentcount: book.comment_count,
            })
            .collect::<Vec<_>>();

        Json::from(result)
    }
}

impl Exhaust<BookDto> for BookPresenter {
    type To = CreatedBookResponse;
    fn emit(&self, input: BookDto) -> Self::To {
        CreatedBookResponse {
            id: input.id,
            title: input.title,
        }
    }
}

impl Exhaust<Option<BookDto>> for BookPresenter {
    type To = Result<BookResponse, BookSentinel>;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        input
            .map(|book| BookResponse {
                id: book.id,
                title: book.title,
                comments: book.comments,
            })
            .ok_or(BookSentinel::NoBook)
    }
}

pub struct DeletionPresenter;

impl Exhaust<Option<BookDto>> for DeletionPresenter {
    type To = BookSentinel;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        match input {
            Some(_) => BookSentinel::Deleted,
            None => BookSentinel::NoBook,
        }
    }
}

impl Exhaust<u64> for DeletionPresenter {
    type To = BookSentinel;
    fn emit(&self, _deleted: u64) -> Self::To {
        BookSentinel::AllDeleted
    }
}
