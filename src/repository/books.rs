//! Book storage

use std::sync::Arc;

use tokio::sync::RwLock;

use super::{Clock, IdGenerator};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, BookList, BookPayload},
};

/// Draws allowed before giving up on finding an unused id
const MAX_ID_ATTEMPTS: usize = 8;

/// Insertion-ordered book collection.
///
/// Every operation runs under the lock, so id uniqueness holds across
/// concurrent writers. Payloads are expected to be validated by the caller.
pub struct BookStore {
    books: RwLock<Vec<Book>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl BookStore {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            books: RwLock::new(Vec::new()),
            ids,
            clock,
        }
    }

    /// Append a new book and return it
    pub async fn insert(&self, payload: BookPayload) -> AppResult<Book> {
        let mut books = self.books.write().await;

        let id = (0..MAX_ID_ATTEMPTS)
            .map(|_| self.ids.generate())
            .find(|id| !books.iter().any(|book| &book.id == id))
            .ok_or_else(|| AppError::Internal("Unable to generate a unique book id".to_string()))?;

        let book = Book::new(id, payload, self.clock.now());
        books.push(book.clone());
        Ok(book)
    }

    /// Filtered full records, or the summary projection of everything
    pub async fn list(&self, filter: Option<&BookFilter>) -> BookList {
        let books = self.books.read().await;
        match filter {
            Some(filter) => BookList::Full(
                books
                    .iter()
                    .filter(|book| book.matches(filter))
                    .cloned()
                    .collect(),
            ),
            None => BookList::Summary(books.iter().map(Book::summary).collect()),
        }
    }

    pub async fn get(&self, id: &str) -> Option<Book> {
        self.books.read().await.iter().find(|book| book.id == id).cloned()
    }

    /// Replace a book's contents in place, `None` if the id is unknown
    pub async fn update(&self, id: &str, payload: BookPayload) -> Option<Book> {
        let mut books = self.books.write().await;
        let book = books.iter_mut().find(|book| book.id == id)?;
        book.apply(payload, self.clock.now());
        Some(book.clone())
    }

    /// Remove a book, `false` if the id is unknown
    pub async fn delete(&self, id: &str) -> bool {
        let mut books = self.books.write().await;
        match books.iter().position(|book| book.id == id) {
            Some(index) => {
                books.remove(index);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockClock, MockIdGenerator, RandomIdGenerator, SystemClock};
    use chrono::{TimeZone, Utc};
    use mockall::Sequence;
    use tokio_test::{assert_err, assert_ok};

    fn store() -> BookStore {
        BookStore::new(Arc::new(RandomIdGenerator::new(16)), Arc::new(SystemClock))
    }

    fn payload(name: &str, page_count: u32, read_page: u32, reading: bool) -> BookPayload {
        BookPayload {
            name: Some(name.to_string()),
            publisher: Some(format!("{} Press", name).into()),
            page_count,
            read_page,
            reading,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_preserves_order() {
        let store = store();
        let a = assert_ok!(store.insert(payload("A", 10, 0, false)).await);
        let b = assert_ok!(store.insert(payload("B", 10, 0, false)).await);

        assert_eq!(
            store.list(None).await,
            BookList::Summary(vec![a.summary(), b.summary()])
        );
    }

    #[tokio::test]
    async fn test_insert_retries_on_id_collision() {
        let mut ids = MockIdGenerator::new();
        let mut seq = Sequence::new();
        ids.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| "same".to_string());
        ids.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| "same".to_string());
        ids.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| "other".to_string());

        let store = BookStore::new(Arc::new(ids), Arc::new(SystemClock));
        let first = assert_ok!(store.insert(payload("A", 1, 0, false)).await);
        let second = assert_ok!(store.insert(payload("B", 1, 0, false)).await);

        assert_eq!(first.id, "same");
        assert_eq!(second.id, "other");
    }

    #[tokio::test]
    async fn test_insert_fails_when_ids_exhausted() {
        let mut ids = MockIdGenerator::new();
        ids.expect_generate().returning(|| "same".to_string());

        let store = BookStore::new(Arc::new(ids), Arc::new(SystemClock));
        assert_ok!(store.insert(payload("A", 1, 0, false)).await);
        let err = assert_err!(store.insert(payload("B", 1, 0, false)).await);

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp_only() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let edited = Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap();

        let mut clock = MockClock::new();
        let mut seq = Sequence::new();
        clock.expect_now().times(1).in_sequence(&mut seq).return_const(created);
        clock.expect_now().times(1).in_sequence(&mut seq).return_const(edited);

        let store = BookStore::new(Arc::new(RandomIdGenerator::new(16)), Arc::new(clock));
        let book = assert_ok!(store.insert(payload("A", 100, 10, true)).await);
        assert_eq!(book.inserted_at, created);
        assert_eq!(book.updated_at, created);

        let updated = store
            .update(&book.id, payload("A2", 100, 100, false))
            .await
            .unwrap();
        assert_eq!(updated.id, book.id);
        assert_eq!(updated.inserted_at, created);
        assert_eq!(updated.updated_at, edited);
        assert!(updated.finished);
        assert_eq!(store.get(&book.id).await, Some(updated));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = store();
        assert!(store.update("missing", payload("A", 1, 1, false)).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let store = store();
        let book = assert_ok!(store.insert(payload("A", 1, 1, false)).await);

        assert!(store.delete(&book.id).await);
        assert!(!store.delete(&book.id).await);
        assert!(store.get(&book.id).await.is_none());
    }

    #[tokio::test]
    async fn test_filters() {
        let store = store();
        let reading = assert_ok!(store.insert(payload("Reading", 100, 10, true)).await);
        let done = assert_ok!(store.insert(payload("Done", 100, 100, false)).await);
        let idle = assert_ok!(store.insert(payload("Idle", 100, 0, false)).await);

        assert_eq!(
            store.list(Some(&BookFilter::Reading(true))).await,
            BookList::Full(vec![reading.clone()])
        );
        assert_eq!(
            store.list(Some(&BookFilter::Reading(false))).await,
            BookList::Full(vec![done.clone(), idle.clone()])
        );
        assert_eq!(
            store.list(Some(&BookFilter::Finished(true))).await,
            BookList::Full(vec![done])
        );
        assert_eq!(
            store.list(Some(&BookFilter::Name("idle".into()))).await,
            BookList::Full(vec![idle])
        );
        assert!(store
            .list(Some(&BookFilter::Name("nothing".into())))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_keep_unique_ids() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.insert(payload(&format!("B{}", i), 10, 0, false)).await })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            let book = handle.await.unwrap().unwrap();
            ids.insert(book.id);
        }
        assert_eq!(ids.len(), 50);
        assert_eq!(store.len().await, 50);
    }
}
