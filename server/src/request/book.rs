use application::transfer::{AddCommentDto, CreateBookDto, DeleteBookDto, GetBookDto};
use kernel::prelude::entity::{BookComment, BookTitle};
use serde::Deserialize;
use serde_json::Value;

use crate::controller::{Intake, TryIntake};
use crate::response::BookSentinel;

// Fields take any JSON value so that a missing or mistyped field reaches the transformer instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookRequest {
    title: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddCommentRequest {
    comment: Option<Value>,
}

/// Text of a loosely typed body field.
///
/// Strings are taken as they are and numbers by their decimal form.
/// Falsy values (`null`, `false`, `0`) and containers read as missing.
fn field_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some(true.to_string()),
        _ => None,
    }
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: String,
}

impl GetBookRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: String,
}

impl DeleteBookRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

pub struct BookTransformer;

impl TryIntake<CreateBookRequest> for BookTransformer {
    type To = CreateBookDto;
    type Error = BookSentinel;
    fn emit(&self, input: CreateBookRequest) -> Result<Self::To, Self::Error> {
        let title = field_text(input.title)
            .and_then(BookTitle::new)
            .ok_or(BookSentinel::MissingTitle)?;
        Ok(CreateBookDto { title })
    }
}

impl TryIntake<(String, AddCommentRequest)> for BookTransformer {
    type To = AddCommentDto;
    type Error = BookSentinel;
    fn emit(&self, input: (String, AddCommentRequest)) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        let comment = field_text(input.comment)
            .and_then(BookComment::new)
            .ok_or(BookSentinel::MissingComment)?;
        Ok(AddCommentDto { id, comment })
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}
