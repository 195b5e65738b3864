use async_trait::async_trait;
use mongodb::{bson, Client, Collection};
use tracing::info;

use crate::error::Error;
use crate::marketer::db::{MarketerStore, MemoryMarketerStore};
use crate::marketer::Marketer;

pub type MongoMarketerStore = Collection<Marketer>;

#[async_trait]
pub trait Database: Send + Sync {
    fn marketers(&self) -> &dyn MarketerStore;

    async fn drop(&self) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    marketers: Collection<Marketer>,
    db: mongodb::Database,
}

impl MongoDatabase {
    pub async fn connect(uri: &str, name: &str) -> Result<MongoDatabase, Error> {
        info!("connecting to db: {}", uri);
        let db = Client::with_uri_str(uri).await?.database(name);

        // ping the database to ensure connection is established
        db.run_command(bson::doc! { "ping": 1 }, None).await?;

        Ok(MongoDatabase::new(db))
    }

    pub fn new(db: mongodb::Database) -> MongoDatabase {
        MongoDatabase {
            marketers: db.collection("marketers"),
            db,
        }
    }
}

#[async_trait]
impl Database for MongoDatabase {
    fn marketers(&self) -> &dyn MarketerStore {
        &self.marketers
    }

    async fn drop(&self) -> Result<(), Error> {
        self.db.drop(None).await?;
        Ok(())
    }
}

/// Process-local backend, used for tests and for running without mongodb.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    marketers: MemoryMarketerStore,
}

impl MemoryDatabase {
    pub fn new() -> MemoryDatabase {
        MemoryDatabase::default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    fn marketers(&self) -> &dyn MarketerStore {
        &self.marketers
    }

    async fn drop(&self) -> Result<(), Error> {
        self.marketers.clear();
        Ok(())
    }
}
