//! Per-user onboarding preferences and tutorial skip flags.

use std::sync::Arc;

use me_core::ids::{TutorialId, UserId};
use me_core::onboarding::keys::{preference_key, skip_flag_key};
use me_core::ports::{KeyValueStorePort, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::adapters::JsonStorage;

/// Reads and writes `onboarding_prefs_*` values and `onboarding_skip_*` flags
/// in the local store.
pub struct OnboardingPreferences {
    user_id: UserId,
    storage: JsonStorage,
}

impl OnboardingPreferences {
    pub fn new(user_id: UserId, local: Arc<dyn KeyValueStorePort>) -> Self {
        Self {
            user_id,
            storage: JsonStorage::new(local),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.storage.get(&preference_key(&self.user_id, key)).await
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.storage
            .set(&preference_key(&self.user_id, key), value)
            .await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove(&preference_key(&self.user_id, key)).await
    }

    /// Anything other than a stored `"true"` reads as not skipped.
    pub async fn is_tutorial_skipped(&self, tutorial_id: &TutorialId) -> bool {
        self.storage
            .get_raw(&skip_flag_key(&self.user_id, tutorial_id))
            .await
            .is_some_and(|flag| flag == "true")
    }

    pub async fn set_tutorial_skipped(
        &self,
        tutorial_id: &TutorialId,
        skipped: bool,
    ) -> Result<(), StorageError> {
        let flag = if skipped { "true" } else { "false" };
        self.storage
            .set_raw(&skip_flag_key(&self.user_id, tutorial_id), flag)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::FakeStore;

    #[tokio::test]
    async fn test_preferences_are_namespaced_per_user() {
        let store = Arc::new(FakeStore::default());
        let alice = OnboardingPreferences::new(UserId::from("alice"), store.clone());
        let bob = OnboardingPreferences::new(UserId::from("bob"), store.clone());

        alice.set("tooltips", &false).await.unwrap();

        assert_eq!(alice.get::<bool>("tooltips").await, Some(false));
        assert_eq!(bob.get::<bool>("tooltips").await, None);
        assert_eq!(store.raw("onboarding_prefs_alice_tooltips").as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_skip_flags_are_stored_as_plain_strings() {
        let store = Arc::new(FakeStore::default());
        let prefs = OnboardingPreferences::new(UserId::from("u1"), store.clone());
        let tutorial = TutorialId::from("v2-getting-started");

        assert!(!prefs.is_tutorial_skipped(&tutorial).await);

        prefs.set_tutorial_skipped(&tutorial, true).await.unwrap();
        assert!(prefs.is_tutorial_skipped(&tutorial).await);
        assert_eq!(
            store.raw("onboarding_skip_u1_v2-getting-started").as_deref(),
            Some("true")
        );

        prefs.set_tutorial_skipped(&tutorial, false).await.unwrap();
        assert!(!prefs.is_tutorial_skipped(&tutorial).await);
    }

    #[tokio::test]
    async fn test_remove_preference() {
        let prefs = OnboardingPreferences::new(UserId::from("u1"), Arc::new(FakeStore::default()));
        prefs.set("layout", "compact").await.unwrap();

        prefs.remove("layout").await.unwrap();
        assert_eq!(prefs.get::<String>("layout").await, None);
    }
}
