use error_stack::Report;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookId, BookSummary};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<BookSummary>, KernelError> {
        Ok(con.documents().iter().map(BookSummary::from).collect())
    }

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.documents().iter().find(|book| book.id() == id).cloned())
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        con.documents_mut().push(book.clone());
        tracing::debug!(id = %book.id(), "book created");
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        let stored = con
            .documents_mut()
            .iter_mut()
            .find(|stored| stored.id() == book.id())
            .ok_or_else(|| {
                Report::new(KernelError::Internal)
                    .attach_printable(format!("book {} is not stored", book.id()))
            })?;
        *stored = book.clone();
        tracing::debug!(
            id = %book.id(),
            comment_count = *book.comment_count().as_ref(),
            "book updated"
        );
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        con.documents_mut().retain(|book| book.id() != book_id);
        tracing::debug!(id = %book_id, "book deleted");
        Ok(())
    }

    async fn delete_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<u64, KernelError> {
        let documents = con.documents_mut();
        let deleted = documents.len() as u64;
        documents.clear();
        tracing::debug!(deleted, "all books deleted");
        Ok(deleted)
    }
}
