mod book;
mod payload;

pub use self::{book::*, payload::*};
