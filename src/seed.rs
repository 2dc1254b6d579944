//! Loads the seed dataset and replaces the transaction collection with it.

use std::{
    fmt::Debug,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    aggregation::JsonError,
    db::with_connection,
    transaction::{NewTransaction, replace_all_transactions},
};

/// The public dataset the collection is seeded from by default.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// A place the seed dataset can be loaded from.
///
/// The dataset is a JSON array of transaction records, see [NewTransaction].
#[async_trait]
pub trait SeedSource: Debug + Send + Sync {
    /// Load every record in the dataset.
    ///
    /// # Errors
    /// Returns [Error::SeedFetch] if the dataset could not be read and
    /// [Error::SeedParse] if it is not a JSON array of transactions.
    async fn fetch(&self) -> Result<Vec<NewTransaction>, Error>;
}

/// Downloads the seed dataset over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSeedSource {
    /// Create a source that downloads the dataset from `url`.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        tracing::debug!("Downloading seed dataset from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::SeedFetch(error.to_string()))?;

        let body = response
            .bytes()
            .await
            .map_err(|error| Error::SeedFetch(error.to_string()))?;

        parse_seed(&body)
    }
}

/// Reads the seed dataset from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileSeedSource {
    path: PathBuf,
}

impl FileSeedSource {
    /// Create a source that reads the dataset from the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeedSource for FileSeedSource {
    async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|error| Error::SeedFetch(format!("{}: {error}", self.path.display())))?;

        parse_seed(&body)
    }
}

fn parse_seed(body: &[u8]) -> Result<Vec<NewTransaction>, Error> {
    serde_json::from_slice(body).map_err(|error| Error::SeedParse(error.to_string()))
}

/// Replace the transaction collection with the records from `seed_source`.
///
/// The store is only touched once the whole dataset has been loaded, so a
/// failed fetch leaves the existing collection as it was.
///
/// Returns the number of stored transactions.
pub async fn seed_transactions(
    seed_source: &dyn SeedSource,
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<usize, Error> {
    let transactions = seed_source
        .fetch()
        .await
        .inspect_err(|error| tracing::error!("could not load seed dataset: {error}"))?;

    let count = with_connection(db_connection, move |connection| {
        replace_all_transactions(&transactions, connection).map(|inserted| inserted.len())
    })
    .await?;

    tracing::info!("Seeded database with {count} transactions");

    Ok(count)
}

/// The state needed for seeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection for replacing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where to load the seed dataset from.
    pub seed_source: Arc<dyn SeedSource>,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_source: state.seed_source.clone(),
        }
    }
}

/// The response body for a successful initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitResponse {
    /// A human readable confirmation.
    pub message: String,
    /// The number of transactions in the collection.
    pub count: usize,
}

/// Replace the transaction collection with a fresh copy of the seed dataset.
pub async fn init_endpoint(
    State(state): State<SeedState>,
) -> Result<Json<InitResponse>, JsonError> {
    let count = seed_transactions(state.seed_source.as_ref(), &state.db_connection).await?;

    Ok(Json(InitResponse {
        message: "Database initialized".to_owned(),
        count,
    }))
}
