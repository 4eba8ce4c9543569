use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookComment, BookId, BookSummary, BookTitle, CommentCount,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::{ConvertError, DriverError};

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<BookSummary>, KernelError> {
        PgBookInternal::find_all(con).await.convert_error()
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await.convert_error()
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await.convert_error()
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con, book).await.convert_error()
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await.convert_error()
    }

    async fn delete_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<u64, KernelError> {
        PgBookInternal::delete_all(con).await.convert_error()
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    comments: Vec<String>,
}

impl TryFrom<BookRow> for Book {
    type Error = DriverError;
    fn try_from(value: BookRow) -> Result<Self, Self::Error> {
        let title = BookTitle::new(value.title).ok_or_else(|| {
            DriverError::Conversion(anyhow::anyhow!("book {} has an empty title", value.id))
        })?;
        let comments = value
            .comments
            .into_iter()
            .map(|comment| {
                BookComment::new(comment).ok_or_else(|| {
                    DriverError::Conversion(anyhow::anyhow!(
                        "book {} has an empty comment",
                        value.id
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Book::new(BookId::new(value.id), title, comments))
    }
}

#[derive(sqlx::FromRow)]
struct BookSummaryRow {
    id: Uuid,
    title: String,
    comment_count: i32,
}

impl TryFrom<BookSummaryRow> for BookSummary {
    type Error = DriverError;
    fn try_from(value: BookSummaryRow) -> Result<Self, Self::Error> {
        let title = BookTitle::new(value.title).ok_or_else(|| {
            DriverError::Conversion(anyhow::anyhow!("book {} has an empty title", value.id))
        })?;
        let comment_count = CommentCount::new(usize::try_from(value.comment_count)?);
        Ok(BookSummary::new(BookId::new(value.id), title, comment_count))
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    pub(in crate::database) async fn migrate(pool: &Pool<Postgres>) -> Result<(), DriverError> {
        // language=postgresql
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                seq           BIGSERIAL,
                id            UUID PRIMARY KEY,
                title         TEXT NOT NULL,
                comments      TEXT[] NOT NULL DEFAULT '{}',
                comment_count INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    async fn find_all(con: &mut PgConnection) -> Result<Vec<BookSummary>, DriverError> {
        let rows = sqlx::query_as::<_, BookSummaryRow>(
            // language=postgresql
            r#"
            SELECT id, title, comment_count
            FROM books
            ORDER BY seq
            "#,
        )
        .fetch_all(con)
        .await?;
        rows.into_iter().map(BookSummary::try_from).collect()
    }

    async fn find_by_id(con: &mut PgConnection, id: &BookId) -> Result<Option<Book>, DriverError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, comments
            FROM books
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await?;
        row.map(Book::try_from).transpose()
    }

    async fn create(con: &mut PgConnection, book: &Book) -> Result<(), DriverError> {
        let comments = Self::comments(book);
        let comment_count = i32::try_from(*book.comment_count().as_ref())?;
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO books (id, title, comments, comment_count)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(AsRef::<String>::as_ref(book.title()))
        .bind(&comments)
        .bind(comment_count)
        .execute(con)
        .await?;
        tracing::debug!(id = %book.id(), "book created");
        Ok(())
    }

    async fn update(con: &mut PgConnection, book: &Book) -> Result<(), DriverError> {
        let comments = Self::comments(book);
        let comment_count = i32::try_from(*book.comment_count().as_ref())?;
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE books
            SET title = $2, comments = $3, comment_count = $4
            WHERE id = $1
            "#,
        )
        .bind(book.id().as_ref())
        .bind(AsRef::<String>::as_ref(book.title()))
        .bind(&comments)
        .bind(comment_count)
        .execute(con)
        .await?;
        tracing::debug!(id = %book.id(), comment_count, "book updated");
        Ok(())
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> Result<(), DriverError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await?;
        tracing::debug!(id = %book_id, "book deleted");
        Ok(())
    }

    async fn delete_all(con: &mut PgConnection) -> Result<u64, DriverError> {
        // language=postgresql
        let deleted = sqlx::query(
            r#"
            DELETE FROM books
            "#,
        )
        .execute(con)
        .await?
        .rows_affected();
        tracing::debug!(deleted, "all books deleted");
        Ok(deleted)
    }

    fn comments(book: &Book) -> Vec<String> {
        book.comments()
            .iter()
            .map(|comment| AsRef::<String>::as_ref(comment).clone())
            .collect()
    }
}
