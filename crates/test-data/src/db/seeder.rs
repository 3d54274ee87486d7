//! MongoDB seeding utilities.

use mongodb::Database;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use analytics::reports::SourceCollection;

use crate::generators::{GeneratedCustomer, GeneratedOrder};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Database seeder for inserting generated storefront data.
pub struct Seeder {
    db: Database,
    batch_size: usize,
}

impl Seeder {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            batch_size: 500,
        }
    }

    /// Sets the batch size for bulk operations.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Drops both source collections.
    pub async fn reset(&self) -> Result<(), SeedError> {
        for collection in [SourceCollection::Customers, SourceCollection::Orders] {
            info!("Dropping {}", collection.name());
            self.db
                .collection::<mongodb::bson::Document>(collection.name())
                .drop()
                .await?;
        }
        Ok(())
    }

    pub async fn seed_customers(&self, customers: &[GeneratedCustomer]) -> Result<(), SeedError> {
        self.insert_batches(SourceCollection::Customers, customers)
            .await
    }

    pub async fn seed_orders(&self, orders: &[GeneratedOrder]) -> Result<(), SeedError> {
        self.insert_batches(SourceCollection::Orders, orders).await
    }

    async fn insert_batches<T>(
        &self,
        collection: SourceCollection,
        items: &[T],
    ) -> Result<(), SeedError>
    where
        T: Serialize + Send + Sync,
    {
        info!("Seeding {} documents into {}...", items.len(), collection.name());

        let target = self.db.collection::<T>(collection.name());
        for chunk in items.chunks(self.batch_size) {
            target.insert_many(chunk).await?;
        }

        info!("Seeded {} documents into {}", items.len(), collection.name());
        Ok(())
    }
}
