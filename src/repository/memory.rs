//! In-process store used for tests and local demos

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::{
    error::{AppError, AppResult},
    models::Entity,
};

/// One collection held in memory, keyed by id in insertion order
pub struct MemoryStore<E: Entity> {
    documents: RwLock<IndexMap<Uuid, E>>,
}

impl<E: Entity> MemoryStore<E> {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(IndexMap::new()),
        }
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("{} document with id {} not found", E::COLLECTION, id))
    }

    /// Reject `doc` if another document already holds its unique key.
    /// Called with the write lock held so check and insert are one step.
    fn ensure_unique(documents: &IndexMap<Uuid, E>, doc: &E) -> AppResult<()> {
        let Some(key) = doc.unique_key() else {
            return Ok(());
        };
        let taken = documents
            .values()
            .any(|other| other.id() != doc.id() && other.unique_key().as_ref() == Some(&key));
        if taken {
            return Err(AppError::Duplicate(format!("{} key {}", E::COLLECTION, key)));
        }
        Ok(())
    }
}

impl<E: Entity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Store<E> for MemoryStore<E> {
    async fn find(&self, filter: &E::Filter) -> AppResult<Vec<E>> {
        let documents = self.documents.read().await;
        let mut found: Vec<E> = documents
            .values()
            .filter(|doc| doc.matches(filter))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.listing_order(b));
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<E> {
        self.documents
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn count(&self, filter: &E::Filter) -> AppResult<i64> {
        let documents = self.documents.read().await;
        Ok(documents.values().filter(|doc| doc.matches(filter)).count() as i64)
    }

    async fn create(&self, draft: E::Draft) -> AppResult<E> {
        let doc = E::from_draft(Uuid::new_v4(), draft);
        let mut documents = self.documents.write().await;
        Self::ensure_unique(&documents, &doc)?;
        documents.insert(doc.id(), doc.clone());
        Ok(doc)
    }

    async fn update_by_id(&self, id: Uuid, draft: E::Draft) -> AppResult<E> {
        let mut documents = self.documents.write().await;
        if !documents.contains_key(&id) {
            return Err(Self::not_found(id));
        }
        let doc = E::from_draft(id, draft);
        Self::ensure_unique(&documents, &doc)?;
        documents.insert(id, doc.clone());
        Ok(doc)
    }

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()> {
        self.documents
            .write()
            .await
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, AuthorDraft, AuthorFilter, User, UserDraft};

    fn draft(first: &str, family: &str) -> AuthorDraft {
        AuthorDraft {
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    #[tokio::test]
    async fn test_create_generates_distinct_ids() {
        let store = MemoryStore::<Author>::new();
        let a = store.create(draft("Jane", "Austen")).await.unwrap();
        let b = store.create(draft("Jane", "Austen")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.count(&AuthorFilter::default()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_is_ordered_by_family_name() {
        let store = MemoryStore::<Author>::new();
        store.create(draft("Isaac", "Asimov")).await.unwrap();
        store.create(draft("Ben", "Bova")).await.unwrap();
        store.create(draft("Jane", "Austen")).await.unwrap();

        let names: Vec<String> = store
            .find(&AuthorFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.family_name)
            .collect();
        assert_eq!(names, vec!["Asimov", "Austen", "Bova"]);
    }

    #[tokio::test]
    async fn test_find_orders_names_ignoring_case() {
        let store = MemoryStore::<Author>::new();
        store.create(draft("Emile", "Zola")).await.unwrap();
        store.create(draft("Charles", "de Gaulle")).await.unwrap();
        store.create(draft("Alexandre", "Dumas")).await.unwrap();

        let names: Vec<String> = store
            .find(&AuthorFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.family_name)
            .collect();
        assert_eq!(names, vec!["de Gaulle", "Dumas", "Zola"]);
    }

    #[tokio::test]
    async fn test_find_by_ids() {
        let store = MemoryStore::<Author>::new();
        let a = store.create(draft("Isaac", "Asimov")).await.unwrap();
        store.create(draft("Ben", "Bova")).await.unwrap();

        let found = store
            .find(&AuthorFilter {
                ids: Some(vec![a.id, Uuid::new_v4()]),
            })
            .await
            .unwrap();
        assert_eq!(found, vec![a]);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let store = MemoryStore::<Author>::new();
        let a = store.create(draft("Jane", "Austen")).await.unwrap();

        let updated = store.update_by_id(a.id, draft("Janet", "Austen")).await.unwrap();
        assert_eq!(updated.id, a.id);
        assert_eq!(store.find_by_id(a.id).await.unwrap().first_name, "Janet");

        tokio_test::assert_ok!(store.remove_by_id(a.id).await);
        assert!(matches!(store.find_by_id(a.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.remove_by_id(a.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            store.update_by_id(a.id, draft("Jane", "Austen")).await,
            Err(AppError::NotFound(_))
        ));
    }

    fn user(email: &str) -> UserDraft {
        UserDraft {
            email: email.to_string(),
            name: "Reader".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unique_key_is_enforced_on_create_and_update() {
        let store = MemoryStore::<User>::new();
        let first = store.create(user("reader@example.org")).await.unwrap();
        let second = store.create(user("other@example.org")).await.unwrap();

        assert!(matches!(
            store.create(user("Reader@Example.org")).await,
            Err(AppError::Duplicate(_))
        ));
        assert!(matches!(
            store.update_by_id(second.id, user("reader@example.org")).await,
            Err(AppError::Duplicate(_))
        ));
        tokio_test::assert_ok!(store.update_by_id(first.id, user("reader@example.org")).await);
        assert_eq!(store.find_by_id(second.id).await.unwrap().email, "other@example.org");
    }
}
