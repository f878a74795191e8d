// Service exports
pub mod cache;
pub mod directory;
pub mod matching;
pub mod postgres;

pub use cache::{CacheManager, CacheKey, CacheError};
pub use directory::{DirectoryClient, DirectoryError};
pub use matching::{MatchingService, MatchingError, InMemoryMatchingService};
pub use postgres::{PostgresClient, PostgresError};
