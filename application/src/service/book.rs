use kernel::interface::database::{
    DatabaseConnection, DependOnDatabaseConnection, Transaction,
};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{Book, BookId};
use kernel::KernelError;

use crate::transfer::{
    AddCommentDto, BookDto, BookSummaryDto, CreateBookDto, DeleteBookDto, GetBookDto,
};

#[async_trait::async_trait]
pub trait GetBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery
{
    async fn get_all_books(&self) -> error_stack::Result<Vec<BookSummaryDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let books = self.book_query().find_all(&mut connection).await?;
        connection.commit().await?;

        Ok(books.into_iter().map(BookSummaryDto::from).collect())
    }

    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let Some(id) = BookId::parse(&dto.id) else {
            return Ok(None);
        };
        let mut connection = self.database_connection().transact().await?;
        let book = self.book_query().find_by_id(&mut connection, &id).await?;
        connection.commit().await?;

        Ok(book.map(BookDto::from))
    }
}

impl<T> GetBookService for T where T: DependOnDatabaseConnection + DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookModifier
{
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let book = Book::create(BookId::generate(), dto.title);
        self.book_modifier().create(&mut connection, &book).await?;
        connection.commit().await?;

        Ok(BookDto::from(book))
    }
}

impl<T> CreateBookService for T where T: DependOnDatabaseConnection + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait AddCommentService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
    async fn add_comment(
        &self,
        dto: AddCommentDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let Some(id) = BookId::parse(&dto.id) else {
            return Ok(None);
        };
        let mut connection = self.database_connection().transact().await?;

        let Some(mut book) = self.book_query().find_by_id(&mut connection, &id).await? else {
            connection.roll_back().await?;
            return Ok(None);
        };
        book.add_comment(dto.comment);
        self.book_modifier().update(&mut connection, &book).await?;
        connection.commit().await?;

        Ok(Some(BookDto::from(book)))
    }
}

impl<T> AddCommentService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
    /// Returns the removed book, or `None` when nothing matched.
    async fn delete_book(
        &self,
        dto: DeleteBookDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let Some(id) = BookId::parse(&dto.id) else {
            return Ok(None);
        };
        let mut connection = self.database_connection().transact().await?;

        let Some(book) = self.book_query().find_by_id(&mut connection, &id).await? else {
            connection.roll_back().await?;
            return Ok(None);
        };
        self.book_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;

        Ok(Some(BookDto::from(book)))
    }

    async fn delete_all_books(&self) -> error_stack::Result<u64, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let deleted = self.book_modifier().delete_all(&mut connection).await?;
        connection.commit().await?;

        tracing::info!(deleted, "deleted all books");
        Ok(deleted)
    }
}

impl<T> DeleteBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}
