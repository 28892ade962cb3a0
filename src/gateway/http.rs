// 🔌 HTTP Gateway Client - /api/v1 endpoints of the http-gateway service

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::schema::{
    AccountKind, CardKind, CreateUserRequest, CreateUserResponse, GetAccountsResponse,
    GetOperationReceiptResponse, GetOperationResponse, GetOperationsResponse,
    GetOperationsSummaryResponse, GetUserResponse, IssueCardRequest, IssueCardResponse,
    MakeOperationRequest, MakeOperationResponse, OpenAccountRequest, OpenAccountResponse,
    OperationKind,
};
use super::GatewayClient;
use crate::config::SeedsConfig;
use crate::error::{Result, SeedsError};

/// Blocking client for the http-gateway
///
/// Seeding is sequential, so one blocking connection pool is all it needs.
#[derive(Debug, Clone)]
pub struct HttpGatewayClient {
    client: Client,
    base_url: String,
}

impl HttpGatewayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(HttpGatewayClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &SeedsConfig) -> Result<Self> {
        Self::new(&config.gateway_url, config.gateway_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post_json<B, T>(&self, operation: &str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(operation, path, "POST gateway");
        let response = self.client.post(self.url(path)).json(body).send()?;
        decode(operation, response)
    }

    fn get_json<T>(&self, operation: &str, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(operation, path, "GET gateway");
        let response = self.client.get(self.url(path)).query(query).send()?;
        decode(operation, response)
    }
}

/// Turn a non-success status into `SeedsError::Gateway`, otherwise decode JSON
fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(SeedsError::gateway(operation, status.as_u16(), body));
    }
    Ok(response.json::<T>()?)
}

impl GatewayClient for HttpGatewayClient {
    fn create_user(&self, request: &CreateUserRequest) -> Result<CreateUserResponse> {
        self.post_json("create_user", "/api/v1/users", request)
    }

    fn get_user(&self, user_id: &str) -> Result<GetUserResponse> {
        self.get_json("get_user", &format!("/api/v1/users/{}", user_id), &[])
    }

    fn open_account(&self, kind: AccountKind, user_id: &str) -> Result<OpenAccountResponse> {
        let request = OpenAccountRequest {
            user_id: user_id.to_string(),
        };
        let path = format!("/api/v1/accounts/{}", kind.open_endpoint());
        self.post_json(kind.open_endpoint(), &path, &request)
    }

    fn get_accounts(&self, user_id: &str) -> Result<GetAccountsResponse> {
        self.get_json("get_accounts", "/api/v1/accounts", &[("userId", user_id)])
    }

    fn issue_card(
        &self,
        kind: CardKind,
        user_id: &str,
        account_id: &str,
    ) -> Result<IssueCardResponse> {
        let request = IssueCardRequest {
            user_id: user_id.to_string(),
            account_id: account_id.to_string(),
        };
        let path = format!("/api/v1/cards/{}", kind.issue_endpoint());
        self.post_json(kind.issue_endpoint(), &path, &request)
    }

    fn make_operation(
        &self,
        kind: OperationKind,
        request: &MakeOperationRequest,
    ) -> Result<MakeOperationResponse> {
        let path = format!("/api/v1/operations/{}", kind.make_endpoint());
        self.post_json(kind.make_endpoint(), &path, request)
    }

    fn get_operation(&self, operation_id: &str) -> Result<GetOperationResponse> {
        self.get_json(
            "get_operation",
            &format!("/api/v1/operations/{}", operation_id),
            &[],
        )
    }

    fn get_operation_receipt(&self, operation_id: &str) -> Result<GetOperationReceiptResponse> {
        self.get_json(
            "get_operation_receipt",
            &format!("/api/v1/operations/operation-receipt/{}", operation_id),
            &[],
        )
    }

    fn get_operations(&self, account_id: &str) -> Result<GetOperationsResponse> {
        self.get_json(
            "get_operations",
            "/api/v1/operations",
            &[("accountId", account_id)],
        )
    }

    fn get_operations_summary(&self, account_id: &str) -> Result<GetOperationsSummaryResponse> {
        self.get_json(
            "get_operations_summary",
            "/api/v1/operations/operations-summary",
            &[("accountId", account_id)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpGatewayClient::new("http://localhost:8003/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8003");
        assert_eq!(client.url("/api/v1/users"), "http://localhost:8003/api/v1/users");
    }

    #[test]
    fn test_unreachable_gateway_is_transport_error() {
        // Port 9 (discard) is not expected to run an HTTP server
        let client = HttpGatewayClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = client.get_user("missing").unwrap_err();
        assert!(matches!(err, SeedsError::Transport(_)));
    }
}
