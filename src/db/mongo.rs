use crate::config::Config;
use crate::db::models::{BootstrapReport, CatalogSnapshot, CollectionState};
use crate::db::schema::{COLLECTIONS, declared_indexes};
use crate::error::{BootstrapError, is_namespace_exists};
use backon::{ExponentialBuilder, Retryable};
use chrono::Utc;
use mongodb::bson::{Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

fn connect_retry_policy(max_times: usize) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(1))
        .with_max_delay(Duration::from_secs(8))
        .with_max_times(max_times)
        .with_jitter()
}

/// Driver-side parse of the connection string; seed lists and `+srv` are accepted here.
async fn client_options(cfg: &Config) -> Result<ClientOptions, BootstrapError> {
    ClientOptions::parse(cfg.mongodb_url.as_str())
        .await
        .map_err(BootstrapError::Connect)
}

/// Build a client and wait until the server answers `ping`.
///
/// Only the ping is retried; the server may still be starting when the
/// container comes up. Catalog operations are never retried.
pub async fn connect(cfg: &Config) -> Result<Client, BootstrapError> {
    let options = client_options(cfg).await?;
    let client = Client::with_options(options).map_err(BootstrapError::Connect)?;

    let admin = client.database("admin");
    let ping = || {
        let admin = admin.clone();
        async move { admin.run_command(doc! { "ping": 1 }).await }
    };
    ping.retry(connect_retry_policy(cfg.connect_retries))
        .notify(|err, delay| {
            warn!(error = %err, retry_in = ?delay, "MongoDB not answering ping yet");
        })
        .await
        .map_err(BootstrapError::Connect)?;

    info!(url = %cfg.redacted_url(), "connected to MongoDB");
    Ok(client)
}

/// Provisions the static catalog into one database.
#[derive(Clone)]
pub struct PortfolioCatalog {
    db: Database,
}

impl PortfolioCatalog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Create every collection, then every index, then confirm the server has them all.
    #[instrument(skip(self), fields(database = %self.db.name()))]
    pub async fn init_schema(&self) -> Result<BootstrapReport, BootstrapError> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let (collections_created, collections_existing) = self.ensure_collections().await?;
        let indexes_ensured = self.ensure_indexes().await?;

        let snapshot = self.inspect().await?;
        let missing = snapshot.missing_declared();
        if !missing.is_empty() {
            return Err(BootstrapError::MissingIndexes(missing));
        }
        debug!(
            collections = ?snapshot.collection_names(),
            secondary_indexes = snapshot.secondary_index_count(),
            documents = snapshot.total_documents(),
            "catalog verified"
        );

        let report = BootstrapReport {
            database: self.db.name().to_string(),
            started_at,
            elapsed: clock.elapsed(),
            collections_created,
            collections_existing,
            indexes_ensured,
        };
        info!(
            created = report.collections_created.len(),
            existing = report.collections_existing.len(),
            indexes = report.indexes_ensured.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "catalog provisioned"
        );
        Ok(report)
    }

    /// Returns (created, already present) collection names.
    pub async fn ensure_collections(&self) -> Result<(Vec<String>, Vec<String>), BootstrapError> {
        let mut created = Vec::new();
        let mut existing = Vec::new();

        for spec in COLLECTIONS {
            match self.db.create_collection(spec.name).await {
                Ok(()) => {
                    info!(collection = spec.name, "collection created");
                    created.push(spec.name.to_string());
                }
                Err(e) if is_namespace_exists(&e) => {
                    debug!(collection = spec.name, "collection already present");
                    existing.push(spec.name.to_string());
                }
                Err(e) => return Err(BootstrapError::provisioning(spec.name, e)),
            }
        }
        Ok((created, existing))
    }

    /// Issues `createIndexes` for each declared index; the server treats identical
    /// definitions as a no-op. Returns `collection.index` labels.
    pub async fn ensure_indexes(&self) -> Result<Vec<String>, BootstrapError> {
        let mut ensured = Vec::new();

        for (coll, spec) in declared_indexes() {
            let label = spec.label(coll);
            let result = self
                .db
                .collection::<Document>(coll)
                .create_index(spec.model())
                .await
                .map_err(|e| BootstrapError::provisioning(label.clone(), e))?;
            info!(
                index = %label,
                name = %result.index_name,
                unique = spec.unique,
                "index ensured"
            );
            ensured.push(label);
        }
        Ok(ensured)
    }

    /// Reads collection names, index names and document counts from the server.
    pub async fn inspect(&self) -> Result<CatalogSnapshot, BootstrapError> {
        let names = self
            .db
            .list_collection_names()
            .await
            .map_err(|e| BootstrapError::provisioning("listCollections", e))?;

        let mut snapshot = CatalogSnapshot::default();
        for name in names {
            let coll = self.db.collection::<Document>(&name);
            let mut indexes = coll
                .list_index_names()
                .await
                .map_err(|e| BootstrapError::provisioning(format!("{name}.listIndexes"), e))?;
            indexes.sort();
            let documents = coll
                .count_documents(doc! {})
                .await
                .map_err(|e| BootstrapError::provisioning(format!("{name}.count"), e))?;
            snapshot
                .collections
                .insert(name, CollectionState { indexes, documents });
        }
        Ok(snapshot)
    }
}
