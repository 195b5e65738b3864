use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson;
use tracing::debug;

use crate::database::MongoMarketerStore;
use crate::error::Error;

use super::{Marketer, MarketerId, MarketerPatch, NewMarketer};

/// Marketer persistence. Calls are independent; nothing is transactional
/// across them.
#[async_trait]
pub trait MarketerStore: Send + Sync {
    async fn fetch_marketers(&self) -> Result<Vec<Marketer>, Error>;

    async fn fetch_marketer_by_id(&self, marketer_id: &MarketerId)
        -> Result<Option<Marketer>, Error>;

    /// The store assigns the identifier.
    async fn insert_marketer(&self, marketer: NewMarketer) -> Result<Marketer, Error>;

    /// Fails with `MarketerNotFound` if no marketer has the id.
    async fn update_marketer(
        &self,
        marketer_id: &MarketerId,
        patch: &MarketerPatch,
    ) -> Result<(), Error>;

    /// Succeeds whether or not the marketer existed.
    async fn delete_marketer(&self, marketer_id: &MarketerId) -> Result<(), Error>;
}

#[async_trait]
impl MarketerStore for MongoMarketerStore {
    #[tracing::instrument(skip(self))]
    async fn fetch_marketers(&self) -> Result<Vec<Marketer>, Error> {
        let marketers: Vec<Marketer> = self.find(bson::doc! {}, None).await?.try_collect().await?;

        Ok(marketers)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_marketer_by_id(
        &self,
        marketer_id: &MarketerId,
    ) -> Result<Option<Marketer>, Error> {
        let marketer: Option<Marketer> = self
            .find_one(bson::doc! { "_id": marketer_id }, None)
            .await?;

        Ok(marketer)
    }

    #[tracing::instrument(skip(self))]
    async fn insert_marketer(&self, marketer: NewMarketer) -> Result<Marketer, Error> {
        let marketer = Marketer::from_new(MarketerId::new(), marketer);
        self.insert_one(&marketer, None).await?;

        Ok(marketer)
    }

    #[tracing::instrument(skip(self))]
    async fn update_marketer(
        &self,
        marketer_id: &MarketerId,
        patch: &MarketerPatch,
    ) -> Result<(), Error> {
        if patch.is_empty() {
            // an empty $set is rejected by the server, only check existence
            return match self.fetch_marketer_by_id(marketer_id).await? {
                Some(_) => Ok(()),
                None => Err(Error::MarketerNotFound {
                    marketer_id: marketer_id.clone(),
                }),
            };
        }

        let changes = bson::to_document(patch)?;
        let result = self
            .update_one(
                bson::doc! { "_id": marketer_id },
                bson::doc! { "$set": changes },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::MarketerNotFound {
                marketer_id: marketer_id.clone(),
            });
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_marketer(&self, marketer_id: &MarketerId) -> Result<(), Error> {
        let result = self
            .delete_one(bson::doc! { "_id": marketer_id }, None)
            .await?;

        debug!(deleted = result.deleted_count, "deleted marketer");

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryMarketerStore {
    marketers: RwLock<Vec<Marketer>>,
}

impl MemoryMarketerStore {
    // the vec is never left half-updated, so a poisoned lock is still usable
    fn read(&self) -> RwLockReadGuard<'_, Vec<Marketer>> {
        self.marketers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Marketer>> {
        self.marketers.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}

#[async_trait]
impl MarketerStore for MemoryMarketerStore {
    #[tracing::instrument(skip(self))]
    async fn fetch_marketers(&self) -> Result<Vec<Marketer>, Error> {
        Ok(self.read().clone())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_marketer_by_id(
        &self,
        marketer_id: &MarketerId,
    ) -> Result<Option<Marketer>, Error> {
        let marketer = self
            .read()
            .iter()
            .find(|marketer| &marketer.id == marketer_id)
            .cloned();

        Ok(marketer)
    }

    #[tracing::instrument(skip(self))]
    async fn insert_marketer(&self, marketer: NewMarketer) -> Result<Marketer, Error> {
        let marketer = Marketer::from_new(MarketerId::new(), marketer);
        self.write().push(marketer.clone());

        Ok(marketer)
    }

    #[tracing::instrument(skip(self))]
    async fn update_marketer(
        &self,
        marketer_id: &MarketerId,
        patch: &MarketerPatch,
    ) -> Result<(), Error> {
        let mut marketers = self.write();
        let marketer = marketers
            .iter_mut()
            .find(|marketer| &marketer.id == marketer_id)
            .ok_or_else(|| Error::MarketerNotFound {
                marketer_id: marketer_id.clone(),
            })?;

        marketer.apply(patch);

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_marketer(&self, marketer_id: &MarketerId) -> Result<(), Error> {
        let mut marketers = self.write();
        let before = marketers.len();
        marketers.retain(|marketer| &marketer.id != marketer_id);

        debug!(deleted = before - marketers.len(), "deleted marketer");

        Ok(())
    }
}
