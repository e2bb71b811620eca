use crate::error::StoreError;
use core_types::{Customer, Product, Sale};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A record that can live in a `Repository`.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

impl Entity for Product {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Customer {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Sale {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// A cloneable handle to one in-memory collection. Clones share the data.
#[derive(Debug, Clone)]
pub struct Repository<T> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T: Entity> Default for Repository<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(initial: Vec<T>) -> Self {
        Self {
            records: Arc::new(RwLock::new(initial)),
        }
    }

    /// An owned copy of every record, in insertion order.
    pub async fn snapshot(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn find(&self, id: Uuid) -> Result<T, StoreError> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn insert(&self, record: T) -> Result<T, StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::Duplicate(record.id()));
        }
        records.push(record.clone());
        tracing::debug!(id = %record.id(), "Record inserted.");
        Ok(record)
    }

    /// Applies `change` to the record with `id` under the write lock.
    ///
    /// If `change` fails the record is left exactly as it was.
    pub async fn update<E, F>(&self, id: Uuid, change: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut candidate = record.clone();
        change(&mut candidate)?;
        *record = candidate.clone();
        Ok(candidate)
    }

    pub async fn remove(&self, id: Uuid) -> Result<T, StoreError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(records.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CoreError, CustomerInput};

    #[derive(Debug)]
    enum TestError {
        Store(StoreError),
        Core(CoreError),
    }

    impl From<StoreError> for TestError {
        fn from(e: StoreError) -> Self {
            TestError::Store(e)
        }
    }

    fn customer(name: &str) -> Customer {
        Customer::create(&CustomerInput {
            name: name.into(),
            phone: "(11) 99999-9999".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn snapshot_is_isolated_from_later_writes() {
        let repo = Repository::new(vec![customer("João Silva")]);
        let snapshot = repo.snapshot().await;

        repo.insert(customer("Maria Santos")).await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn failed_update_leaves_record_untouched() {
        let original = customer("João Silva");
        let repo = Repository::new(vec![original.clone()]);

        let result: Result<Customer, TestError> = repo
            .update(original.id, |c| {
                c.name = "changed".into();
                c.apply(&CustomerInput {
                    name: "".into(),
                    phone: "1".into(),
                })
                .map_err(TestError::Core)
            })
            .await;

        assert!(matches!(result, Err(TestError::Core(_))));
        assert_eq!(repo.find(original.id).await.unwrap(), original);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let repo: Repository<Customer> = Repository::default();
        let id = Uuid::new_v4();

        assert_eq!(repo.find(id).await.unwrap_err(), StoreError::NotFound(id));
        assert_eq!(repo.remove(id).await.unwrap_err(), StoreError::NotFound(id));
        let update: Result<Customer, TestError> = repo.update(id, |_| Ok(())).await;
        assert!(matches!(update, Err(TestError::Store(StoreError::NotFound(_)))));
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let c = customer("João Silva");
        let repo = Repository::new(vec![c.clone()]);
        assert_eq!(repo.insert(c.clone()).await.unwrap_err(), StoreError::Duplicate(c.id));
    }
}
