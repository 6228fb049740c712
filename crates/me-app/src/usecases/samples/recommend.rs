use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use me_core::ids::SampleId;
use me_core::onboarding::keys::SAMPLE_USAGE_KEY;
use me_core::ports::{KeyValueStorePort, StorageError};
use me_core::samples::{recommend, sample_catalog, SampleFile, UserProfile};
use tracing::{debug, info_span};

use crate::adapters::JsonStorage;

/// Anonymized `{sampleId: count}` counters.
pub type UsageCounts = BTreeMap<SampleId, u64>;

/// Recommend sample files from the built-in catalog and track which ones
/// have been processed.
///
/// 推荐示例文件，并记录匿名使用次数。
pub struct RecommendSamples {
    storage: JsonStorage,
}

impl RecommendSamples {
    pub fn new(local: Arc<dyn KeyValueStorePort>) -> Self {
        Self {
            storage: JsonStorage::new(local),
        }
    }

    pub fn execute(
        &self,
        profile: &UserProfile,
        processed: &HashSet<SampleId>,
        limit: usize,
    ) -> Vec<&'static SampleFile> {
        let _span = info_span!(
            "usecase.recommend_samples.execute",
            use_case = %profile.use_case,
            technical_level = %profile.technical_level,
            limit
        )
        .entered();

        recommend(sample_catalog(), profile, processed, limit)
    }

    /// Bump the counter for `sample_id` and return its new value.
    pub async fn record_processed(&self, sample_id: &SampleId) -> Result<u64, StorageError> {
        let mut counts = self.usage_counts().await;
        let count = counts.entry(sample_id.clone()).or_insert(0);
        *count += 1;
        let updated = *count;

        self.storage.set(SAMPLE_USAGE_KEY, &counts).await?;
        debug!(sample_id = %sample_id, count = updated, "Recorded sample usage");
        Ok(updated)
    }

    pub async fn usage_counts(&self) -> UsageCounts {
        self.storage
            .get(SAMPLE_USAGE_KEY)
            .await
            .unwrap_or_default()
    }

    /// Samples with at least one recorded use.
    pub async fn processed_samples(&self) -> HashSet<SampleId> {
        self.usage_counts()
            .await
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::FakeStore;

    fn journalist() -> UserProfile {
        UserProfile {
            use_case: "forensics".to_string(),
            technical_level: "intermediate".to_string(),
            file_types: vec!["png".to_string()],
            goals: vec!["verify authenticity".to_string()],
            industry: Some("journalism".to_string()),
        }
    }

    #[test]
    fn test_execute_ranks_the_best_match_first() {
        let use_case = RecommendSamples::new(Arc::new(FakeStore::default()));

        let samples = use_case.execute(&journalist(), &HashSet::new(), 5);

        assert_eq!(samples[0].id, SampleId::from("edited-news-image"));
        assert!(samples.len() >= 3 && samples.len() <= 5);
    }

    #[tokio::test]
    async fn test_usage_counters_accumulate() {
        let store = Arc::new(FakeStore::default());
        let use_case = RecommendSamples::new(store.clone());
        let photo = SampleId::from("smartphone-photo");

        assert_eq!(use_case.record_processed(&photo).await.unwrap(), 1);
        assert_eq!(use_case.record_processed(&photo).await.unwrap(), 2);

        let counts = use_case.usage_counts().await;
        assert_eq!(counts.get(&photo), Some(&2));
        assert_eq!(
            store.raw("sample_usage_counts").as_deref(),
            Some(r#"{"smartphone-photo":2}"#)
        );
        assert!(use_case.processed_samples().await.contains(&photo));
    }

    #[tokio::test]
    async fn test_malformed_counters_start_over() {
        let store = Arc::new(FakeStore::default());
        store.insert("sample_usage_counts", "[1, 2]");
        let use_case = RecommendSamples::new(store);

        assert!(use_case.usage_counts().await.is_empty());
        assert_eq!(
            use_case
                .record_processed(&SampleId::from("dslr-raw"))
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_failed_write_is_reported() {
        let store = Arc::new(FakeStore::default());
        store.fail_writes(true);
        let use_case = RecommendSamples::new(store);

        let err = use_case
            .record_processed(&SampleId::from("dslr-raw"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    }
}
