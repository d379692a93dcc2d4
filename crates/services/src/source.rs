//! Question bank sources.

use std::path::PathBuf;

use async_trait::async_trait;
use quiz_core::model::QuestionRecord;
use reqwest::Client;

use crate::error::LoadError;

/// Supplies the ordered question records once per session.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch all question records in presentation order.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the source is unreachable or the data is not a
    /// JSON array of question records.
    async fn load(&self) -> Result<Vec<QuestionRecord>, LoadError>;

    /// Human readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Reads a JSON array of questions from a local file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionSource for JsonFileSource {
    async fn load(&self) -> Result<Vec<QuestionRecord>, LoadError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches a JSON array of questions over HTTP.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl QuestionSource for HttpSource {
    async fn load(&self) -> Result<Vec<QuestionRecord>, LoadError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(LoadError::HttpStatus(response.status()));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Fixed in-memory records for testing and prototyping.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<QuestionRecord>,
}

impl StaticSource {
    #[must_use]
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    async fn load(&self) -> Result<Vec<QuestionRecord>, LoadError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} static questions", self.records.len())
    }
}
