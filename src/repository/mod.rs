//! Repository layer: in-memory book storage

pub mod books;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::config::BooksConfig;

pub use books::BookStore;

/// URL-safe alphabet used for generated ids
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Source of fresh record identifiers
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random fixed-length ids over [`ID_ALPHABET`]
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    length: usize,
}

impl RandomIdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length: length.max(1) }
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}

/// Wall-clock time source
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Main repository struct holding the stores
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<BookStore>,
}

impl Repository {
    /// Create an empty repository with random ids and the system clock
    pub fn new(config: &BooksConfig) -> Self {
        Self::with_sources(
            Arc::new(RandomIdGenerator::new(config.id_length)),
            Arc::new(SystemClock),
        )
    }

    pub fn with_sources(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            books: Arc::new(BookStore::new(ids, clock)),
        }
    }
}
