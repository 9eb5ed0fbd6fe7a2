//! File, job and state storage for the hosting space element
//!
//! All endpoints live under `v2/exchange/spaces/<element id>` and answer with
//! `data`, or `{}` when the body is empty or not JSON.

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::error::{TcError, TcResult};
use crate::models::{Envelope, ResourceType};
use crate::request::ApiClient;

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Clone)]
pub struct SpacesService {
    api: ApiClient,
}

impl SpacesService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload `contents` as a file named `file_name`
    pub async fn commit_file(&self, file_name: &str, contents: Vec<u8>) -> TcResult<Value> {
        tracing::debug!(file_name, size = contents.len(), "Committing space file");

        let url = self.space_url(&["file", file_name])?;
        let request = self.api.request(Method::POST, url).bytes(OCTET_STREAM, contents);
        Self::data_of(request.lenient().send().await?)
    }

    pub async fn commit_job(&self, job: &Value) -> TcResult<Value> {
        tracing::debug!("Committing space job");

        let url = self.space_url(&["job"])?;
        self.send_json(url, job).await
    }

    pub async fn execute_job(&self, job: &Value) -> TcResult<Value> {
        tracing::debug!("Executing space job");

        let url = self.space_url(&["job", "execute"])?;
        self.send_json(url, job).await
    }

    pub async fn commit_state(&self, state: &Value) -> TcResult<Value> {
        tracing::debug!("Committing space state");

        let url = self.space_url(&["state"])?;
        self.send_json(url, state).await
    }

    pub async fn delete_file(&self, file_name: &str) -> TcResult<Value> {
        tracing::debug!(file_name, "Deleting space file");

        let url = self.space_url(&["file", file_name])?;
        self.send_empty(Method::DELETE, url).await
    }

    pub async fn retrieve_file(&self, file_name: &str) -> TcResult<Value> {
        let url = self.space_url(&["file", file_name])?;
        self.send_empty(Method::GET, url).await
    }

    pub async fn retrieve_files(&self) -> TcResult<Value> {
        let url = self.space_url(&["file"])?;
        self.send_empty(Method::GET, url).await
    }

    pub async fn retrieve_job(&self) -> TcResult<Value> {
        let url = self.space_url(&["job"])?;
        self.send_empty(Method::GET, url).await
    }

    pub async fn retrieve_state(&self) -> TcResult<Value> {
        let url = self.space_url(&["state"])?;
        self.send_empty(Method::GET, url).await
    }

    fn space_url(&self, segments: &[&str]) -> TcResult<Url> {
        let element_id = self
            .api
            .context()
            .space_element_id()
            .filter(|id| !id.is_empty())
            .ok_or(TcError::MissingSpaceElement)?;

        let spaces = ResourceType::lookup("Spaces")?;
        let mut path = vec![element_id.as_str()];
        path.extend_from_slice(segments);
        self.api.endpoint(spaces.uri, &path)
    }

    async fn send_json(&self, url: Url, body: &Value) -> TcResult<Value> {
        let response = self
            .api
            .request(Method::POST, url)
            .json(body.clone())
            .lenient()
            .send()
            .await?;
        Self::data_of(response)
    }

    async fn send_empty(&self, method: Method, url: Url) -> TcResult<Value> {
        let response = self.api.request(method, url).lenient().send().await?;
        Self::data_of(response)
    }

    fn data_of(response: Value) -> TcResult<Value> {
        Ok(Envelope::from_body(response).into_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::request::RequestBody;
    use crate::request::test_support::*;
    use crate::request::transport::MockTransport;
    use std::sync::Arc;

    #[test]
    fn commit_file_sends_bytes_under_element() {
        let client = client_expecting(
            |req| {
                req.method == Method::POST
                    && req.url.path() == "/api/v2/exchange/spaces/77/file/notes%20v2.txt"
                    && matches!(
                        &req.body,
                        Some(RequestBody::Bytes { content_type, data })
                            if content_type == "application/octet-stream" && data == b"hello"
                    )
            },
            r#"{"status":"Success","data":{"name":"notes v2.txt"}}"#,
        );
        let service = SpacesService::new(client);

        let committed =
            tokio_test::block_on(service.commit_file("notes v2.txt", b"hello".to_vec())).unwrap();
        assert_eq!(committed["name"], "notes v2.txt");
    }

    #[test]
    fn execute_job_path() {
        let client = client_expecting(
            |req| req.url.path() == "/api/v2/exchange/spaces/77/job/execute",
            "",
        );
        let service = SpacesService::new(client);

        let job = serde_json::json!({"id": 1});
        let result = tokio_test::block_on(service.execute_job(&job)).unwrap();
        assert_eq!(result, serde_json::json!({}));
    }

    #[test]
    fn missing_element_fails_before_sending() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();
        let config = ClientConfig {
            tc_space_element_id: None,
            ..config()
        };
        let service = SpacesService::new(ApiClient::new(Arc::new(transport), Arc::new(config)));

        let result = tokio_test::block_on(service.retrieve_state());
        assert!(matches!(result, Err(TcError::MissingSpaceElement)));
    }
}
