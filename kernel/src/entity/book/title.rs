use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookTitle(String);

impl BookTitle {
    /// Returns `None` for empty text.
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        (!title.is_empty()).then_some(Self(title))
    }
}
