//! Indicator type metadata

use reqwest::Method;
use serde_json::Value;

use crate::error::TcResult;
use crate::models::ResourceType;
use crate::request::ApiClient;

#[derive(Clone)]
pub struct TypeService {
    api: ApiClient,
}

impl TypeService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all(&self) -> TcResult<Value> {
        tracing::debug!("Listing indicator types");

        let types = ResourceType::lookup("IndicatorType")?;
        let url = self.api.endpoint(types.uri, &[])?;
        self.api.get(url, None, None).await
    }

    /// One indicator type, with `includeAdditional` when `include_additional` is set
    pub async fn get_for_type(
        &self,
        indicator_type: &str,
        include_additional: bool,
    ) -> TcResult<Value> {
        tracing::debug!(indicator_type, include_additional, "Reading indicator type");

        let types = ResourceType::lookup("IndicatorType")?;
        let url = self.api.endpoint(types.uri, &[indicator_type])?;
        let mut request = self.api.request(Method::GET, url);
        if include_additional {
            request = request.include_additional();
        }
        request.send().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::test_support::*;

    #[test]
    fn include_additional_only_when_asked() {
        let client = client_expecting(
            |req| {
                req.url.path() == "/api/v2/indicatorTypes/Host"
                    && req.query_param("includeAdditional").is_none()
            },
            r#"{"status":"Success","data":{"indicatorType":{"name":"Host"}}}"#,
        );

        let service = TypeService::new(client);

        let body = tokio_test::block_on(service.get_for_type("Host", false)).unwrap();
        assert_eq!(body["data"]["indicatorType"]["name"], "Host");
    }
}
