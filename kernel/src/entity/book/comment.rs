use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookComment(String);

impl BookComment {
    /// Returns `None` for empty text.
    pub fn new(comment: impl Into<String>) -> Option<Self> {
        let comment = comment.into();
        (!comment.is_empty()).then_some(Self(comment))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Fromln, AsRefln)]
pub struct CommentCount(usize);

impl CommentCount {
    pub fn new(count: usize) -> Self {
        Self(count)
    }

    pub fn of(comments: &[BookComment]) -> Self {
        Self(comments.len())
    }
}
