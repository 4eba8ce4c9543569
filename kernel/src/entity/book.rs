mod comment;
mod id;
mod summary;
mod title;

pub use self::{comment::*, id::*, summary::*, title::*};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    comments: Vec<BookComment>,
    comment_count: CommentCount,
}

impl Book {
    pub fn new(id: BookId, title: BookTitle, comments: Vec<BookComment>) -> Self {
        let comment_count = CommentCount::of(&comments);
        Self {
            id,
            title,
            comments,
            comment_count,
        }
    }

    /// A freshly created book has no comments.
    pub fn create(id: BookId, title: BookTitle) -> Self {
        Self::new(id, title, Vec::new())
    }

    pub fn add_comment(&mut self, comment: BookComment) {
        self.comments.push(comment);
        self.comment_count = CommentCount::of(&self.comments);
    }
}
