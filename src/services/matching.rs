use crate::models::MatchRecord;
use crate::services::postgres::PostgresError;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur when confirming or listing matches
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("Storage error: {0}")]
    Storage(#[from] PostgresError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Records tutor/class pairings confirmed by office staff
///
/// Confirming only writes a `MatchRecord`. It does not move the class
/// request out of `open` and notifies nobody.
#[async_trait]
pub trait MatchingService: Send + Sync {
    /// Persist a confirmed match, returning the existing record if the pair
    /// was already confirmed
    async fn confirm_match(
        &self,
        class_id: &str,
        tutor_id: &str,
        score: u8,
    ) -> Result<MatchRecord, MatchingError>;

    /// Confirmed matches for a class request, newest first
    async fn matches_for_class(&self, class_id: &str) -> Result<Vec<MatchRecord>, MatchingError>;

    async fn health_check(&self) -> Result<bool, MatchingError>;
}

/// Process-local match store, used when no database is configured
#[derive(Debug, Default)]
pub struct InMemoryMatchingService {
    records: RwLock<Vec<MatchRecord>>,
}

impl InMemoryMatchingService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchingService for InMemoryMatchingService {
    async fn confirm_match(
        &self,
        class_id: &str,
        tutor_id: &str,
        score: u8,
    ) -> Result<MatchRecord, MatchingError> {
        if class_id.trim().is_empty() || tutor_id.trim().is_empty() {
            return Err(MatchingError::InvalidInput("class id and tutor id are required".into()));
        }

        let mut records = self.records.write().await;

        if let Some(existing) = records
            .iter()
            .find(|r| r.class_id == class_id && r.tutor_id == tutor_id)
        {
            tracing::debug!("Match {} -> {} already confirmed", class_id, tutor_id);
            return Ok(existing.clone());
        }

        let record = MatchRecord {
            id: uuid::Uuid::new_v4(),
            class_id: class_id.to_string(),
            tutor_id: tutor_id.to_string(),
            score,
            confirmed_at: chrono::Utc::now(),
        };
        records.push(record.clone());

        Ok(record)
    }

    async fn matches_for_class(&self, class_id: &str) -> Result<Vec<MatchRecord>, MatchingError> {
        let records = self.records.read().await;

        let mut matches: Vec<MatchRecord> = records
            .iter()
            .filter(|r| r.class_id == class_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.confirmed_at.cmp(&a.confirmed_at));

        Ok(matches)
    }

    async fn health_check(&self) -> Result<bool, MatchingError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_is_idempotent() {
        let service = InMemoryMatchingService::new();

        let first = service.confirm_match("c1", "t1", 80).await.unwrap();
        let second = service.confirm_match("c1", "t1", 85).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.matches_for_class("c1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_matches_scoped_to_class() {
        let service = InMemoryMatchingService::new();

        service.confirm_match("c1", "t1", 80).await.unwrap();
        service.confirm_match("c1", "t2", 60).await.unwrap();
        service.confirm_match("c2", "t1", 70).await.unwrap();

        let matches = service.matches_for_class("c1").await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.class_id == "c1"));
        assert!(matches[0].confirmed_at >= matches[1].confirmed_at);
    }

    #[test]
    fn test_blank_ids_rejected() {
        let service = InMemoryMatchingService::new();
        let result = tokio_test::block_on(service.confirm_match("c1", "  ", 80));

        assert!(matches!(result, Err(MatchingError::InvalidInput(_))));
    }
}
