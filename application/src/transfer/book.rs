use uuid::Uuid;

use kernel::prelude::entity::{
    Book, BookComment, BookSummary, BookTitle, DestructBook, DestructBookSummary,
};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub comments: Vec<String>,
    pub comment_count: usize,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            comments,
            comment_count,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            comments: comments.into_iter().map(String::from).collect(),
            comment_count: comment_count.into(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookSummaryDto {
    pub id: Uuid,
    pub title: String,
    pub comment_count: usize,
}

impl From<BookSummary> for BookSummaryDto {
    fn from(value: BookSummary) -> Self {
        let DestructBookSummary {
            id,
            title,
            comment_count,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            comment_count: comment_count.into(),
        }
    }
}

// Raw ids are carried as received; the services decide whether they name a book.
pub struct GetBookDto {
    pub id: String,
}

pub struct CreateBookDto {
    pub title: BookTitle,
}

pub struct AddCommentDto {
    pub id: String,
    pub comment: BookComment,
}

pub struct DeleteBookDto {
    pub id: String,
}
