use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;
use kernel::prelude::entity::Book;
use kernel::KernelError;

pub use self::book::*;

mod book;

/// Process-local document store.
///
/// A transaction owns the store lock until it is committed or dropped, so
/// transactions run one at a time. The first write copies the documents into a
/// staged set that replaces the stored ones on commit; reads before that go
/// straight to the locked documents.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    documents: Arc<Mutex<Vec<Book>>>,
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Vec<Book>>,
    staged: Option<Vec<Book>>,
}

impl InMemoryTransaction {
    fn documents(&self) -> &[Book] {
        self.staged.as_deref().unwrap_or(self.guard.as_slice())
    }

    fn documents_mut(&mut self) -> &mut Vec<Book> {
        let guard = &self.guard;
        self.staged.get_or_insert_with(|| guard.to_vec())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<InMemoryTransaction, KernelError> {
        let guard = Arc::clone(&self.documents).lock_owned().await;
        Ok(InMemoryTransaction {
            guard,
            staged: None,
        })
    }
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let Self { mut guard, staged } = self;
        if let Some(staged) = staged {
            *guard = staged;
        }
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl DependOnBookQuery for InMemoryDatabase {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for InMemoryDatabase {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}
