use destructure::Destructure;
use vodca::References;

use crate::entity::{Book, BookId, BookTitle, CommentCount};

/// List view of a book. Carries the count but not the comments themselves.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookSummary {
    id: BookId,
    title: BookTitle,
    comment_count: CommentCount,
}

impl BookSummary {
    pub fn new(id: BookId, title: BookTitle, comment_count: CommentCount) -> Self {
        Self {
            id,
            title,
            comment_count,
        }
    }
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self::new(
            book.id().clone(),
            book.title().clone(),
            *book.comment_count(),
        )
    }
}
