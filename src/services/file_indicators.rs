//! File occurrences for file indicators

use serde_json::Value;

use crate::error::{TcError, TcResult};
use crate::models::{FileOccurrence, ResourceType};
use crate::request::ApiClient;

const OCCURRENCE_KEY: &str = "fileOccurrence";

#[derive(Clone)]
pub struct FileIndicatorService {
    api: ApiClient,
}

impl FileIndicatorService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_occurrences(&self, file_id: &str, owner: Option<&str>) -> TcResult<Value> {
        tracing::debug!(file_id, "Reading file occurrences");

        let url = self.occurrences_url(file_id, None)?;
        self.api.get(url, owner, Some(OCCURRENCE_KEY)).await
    }

    pub async fn get_occurrence(
        &self,
        occurrence_id: &str,
        file_id: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(file_id, occurrence_id, "Reading file occurrence");

        let url = self.occurrences_url(file_id, Some(occurrence_id))?;
        self.api.get(url, owner, Some(OCCURRENCE_KEY)).await
    }

    pub async fn create_occurrence(
        &self,
        occurrence: &FileOccurrence,
        file_id: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(file_id, file_name = %occurrence.file_name, "Creating file occurrence");

        let url = self.occurrences_url(file_id, None)?;
        let body = serde_json::to_value(occurrence).map_err(TcError::Serialization)?;
        self.api.post_with_data_key(url, owner, OCCURRENCE_KEY, Some(body)).await
    }

    pub async fn update_occurrence(
        &self,
        occurrence: &FileOccurrence,
        occurrence_id: &str,
        file_id: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(file_id, occurrence_id, "Updating file occurrence");

        let url = self.occurrences_url(file_id, Some(occurrence_id))?;
        let body = serde_json::to_value(occurrence).map_err(TcError::Serialization)?;
        self.api.put(url, owner, OCCURRENCE_KEY, Some(body)).await
    }

    pub async fn delete_occurrence(
        &self,
        occurrence_id: &str,
        file_id: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(file_id, occurrence_id, "Deleting file occurrence");

        let url = self.occurrences_url(file_id, Some(occurrence_id))?;
        self.api.delete(url, owner).await
    }

    fn occurrences_url(&self, file_id: &str, occurrence_id: Option<&str>) -> TcResult<url::Url> {
        let files = ResourceType::lookup("File")?;
        match occurrence_id {
            Some(occurrence_id) => self
                .api
                .endpoint(files.uri, &[file_id, "fileOccurrences", occurrence_id]),
            None => self.api.endpoint(files.uri, &[file_id, "fileOccurrences"]),
        }
    }
}
