//! Exchange data store CRUD
//!
//! Every call is an HTTP POST to `v2/exchange/db/<domain>/<type>/<command>`;
//! the logical verb travels in the `DB-Method` header.

use std::fmt;

use reqwest::Method;
use serde_json::Value;

use crate::error::TcResult;
use crate::models::ResourceType;
use crate::request::ApiClient;

const DB_METHOD_HEADER: &str = "DB-Method";

/// Visibility domain of a data store record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeDomain {
    Organization,
    System,
    Local,
}

impl ExchangeDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeDomain::Organization => "organization",
            ExchangeDomain::System => "system",
            ExchangeDomain::Local => "local",
        }
    }
}

impl fmt::Display for ExchangeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct ExchangeDbService {
    api: ApiClient,
}

impl ExchangeDbService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn create(
        &self,
        domain: ExchangeDomain,
        type_name: &str,
        search_command: &str,
        body: &Value,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        self.execute(Method::POST, domain, type_name, search_command, Some(body), owner)
            .await
    }

    pub async fn read(
        &self,
        domain: ExchangeDomain,
        type_name: &str,
        search_command: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        self.execute(Method::GET, domain, type_name, search_command, None, owner)
            .await
    }

    pub async fn update(
        &self,
        domain: ExchangeDomain,
        type_name: &str,
        search_command: &str,
        body: &Value,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        self.execute(Method::PUT, domain, type_name, search_command, Some(body), owner)
            .await
    }

    pub async fn delete(
        &self,
        domain: ExchangeDomain,
        type_name: &str,
        search_command: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        self.execute(Method::DELETE, domain, type_name, search_command, None, owner)
            .await
    }

    async fn execute(
        &self,
        db_method: Method,
        domain: ExchangeDomain,
        type_name: &str,
        search_command: &str,
        body: Option<&Value>,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(
            %domain,
            type_name,
            search_command,
            db_method = %db_method,
            "Exchange DB request"
        );

        let store = ResourceType::lookup("ExchangeDb")?;
        let url = self
            .api
            .endpoint(store.uri, &[domain.as_str(), type_name, search_command])?;

        let mut request = self
            .api
            .request(Method::POST, url)
            .header(DB_METHOD_HEADER, db_method.as_str())
            .lenient();

        // Records outside the organization domain are not owner scoped
        if domain == ExchangeDomain::Organization {
            request = request.owner(owner);
        }
        if let Some(body) = body {
            request = request.json(body.clone());
        }

        request.send().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestBody;
    use crate::request::test_support::*;

    #[test]
    fn read_is_post_with_db_method_get() {
        let client = client_expecting(
            |req| {
                req.method == Method::POST
                    && req.url.path() == "/api/v2/exchange/db/organization/playbook/find"
                    && req.header("DB-Method") == Some("GET")
                    && req.query_param("owner") == Some("Org")
                    && req.body.is_none()
            },
            r#"{"hits":{"total":0}}"#,
        );
        let service = ExchangeDbService::new(client);

        let read = service.read(ExchangeDomain::Organization, "playbook", "find", Some("Org"));
        let found = tokio_test::block_on(read).unwrap();
        assert_eq!(found["hits"]["total"], 0);
    }

    #[test]
    fn owner_dropped_outside_organization() {
        let client = client_expecting(
            |req| {
                req.header("DB-Method") == Some("PUT")
                    && req.query_param("owner").is_none()
                    && matches!(&req.body, Some(RequestBody::Json(body)) if body["state"] == "done")
            },
            "not json",
        );
        let service = ExchangeDbService::new(client);
        let body = serde_json::json!({"state": "done"});

        let update = service.update(ExchangeDomain::System, "jobs", "1", &body, Some("Org"));
        let updated = tokio_test::block_on(update).unwrap();
        assert_eq!(updated, serde_json::json!({}));
    }

    #[test]
    fn domain_renders_lowercase() {
        assert_eq!(ExchangeDomain::Local.to_string(), "local");
        assert_eq!(ExchangeDomain::Organization.as_str(), "organization");
    }
}
