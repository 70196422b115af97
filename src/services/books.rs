//! Book management service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookList, BookPayload, BookQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book and return its id
    pub async fn create_book(&self, payload: BookPayload) -> AppResult<String> {
        validate(&payload, "add")?;

        let book = self.repository.books.insert(payload).await?;
        tracing::info!("Book created: id={} name={:?}", book.id, book.name);
        Ok(book.id)
    }

    /// List books, applying at most one filter from the query
    pub async fn list_books(&self, query: &BookQuery) -> BookList {
        let filter = query.filter();
        let books = self.repository.books.list(filter.as_ref()).await;
        tracing::debug!("Listed {} books with filter {:?}", books.len(), filter);
        books
    }

    pub async fn count_books(&self) -> usize {
        self.repository.books.len().await
    }

    pub async fn get_book(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get(id).await.ok_or_else(|| {
            tracing::warn!("Book {} not found", id);
            AppError::NotFound("Book not found".to_string())
        })
    }

    /// Replace a book's contents. The payload is validated before the id is looked up.
    pub async fn update_book(&self, id: &str, payload: BookPayload) -> AppResult<Book> {
        validate(&payload, "update")?;

        let book = self
            .repository
            .books
            .update(id, payload)
            .await
            .ok_or_else(|| {
                tracing::warn!("Update of unknown book {}", id);
                AppError::NotFound("Failed to update book. Id not found".to_string())
            })?;
        tracing::info!("Book updated: id={}", book.id);
        Ok(book)
    }

    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        if !self.repository.books.delete(id).await {
            tracing::warn!("Delete of unknown book {}", id);
            return Err(AppError::NotFound(
                "Failed to delete book. Id not found".to_string(),
            ));
        }
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }
}

fn validate(payload: &BookPayload, action: &str) -> AppResult<()> {
    if !payload.has_name() {
        return Err(AppError::Validation(format!(
            "Failed to {} book. Please provide the book name",
            action
        )));
    }
    if payload.read_page_exceeds_page_count() {
        return Err(AppError::Validation(format!(
            "Failed to {} book. readPage must not be greater than pageCount",
            action
        )));
    }
    Ok(())
}
