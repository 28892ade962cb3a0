// 🌐 Gateway Clients - the calls the seeds builder and load tasks make
//
// Every call returns a typed, already-decoded response; a non-success status
// is an error, never a raw body the caller has to inspect.

pub mod http;
pub mod memory;
pub mod schema;

pub use http::HttpGatewayClient;
pub use memory::InMemoryGateway;
pub use schema::{
    AccountKind, AccountSchema, CardKind, CardSchema, CreateUserRequest, CreateUserResponse,
    GetAccountsResponse, GetOperationReceiptResponse, GetOperationResponse,
    GetOperationsResponse, GetOperationsSummaryResponse, GetUserResponse, IssueCardResponse,
    MakeOperationRequest, MakeOperationResponse, OpenAccountResponse, OperationKind,
    OperationSchema, OperationStatus, UserSchema,
};

use crate::error::Result;

/// Users, accounts, cards and operations of the gateway service family
pub trait GatewayClient {
    fn create_user(&self, request: &CreateUserRequest) -> Result<CreateUserResponse>;

    fn get_user(&self, user_id: &str) -> Result<GetUserResponse>;

    fn open_account(&self, kind: AccountKind, user_id: &str) -> Result<OpenAccountResponse>;

    fn get_accounts(&self, user_id: &str) -> Result<GetAccountsResponse>;

    fn issue_card(&self, kind: CardKind, user_id: &str, account_id: &str)
        -> Result<IssueCardResponse>;

    fn make_operation(
        &self,
        kind: OperationKind,
        request: &MakeOperationRequest,
    ) -> Result<MakeOperationResponse>;

    fn get_operation(&self, operation_id: &str) -> Result<GetOperationResponse>;

    fn get_operation_receipt(&self, operation_id: &str) -> Result<GetOperationReceiptResponse>;

    fn get_operations(&self, account_id: &str) -> Result<GetOperationsResponse>;

    fn get_operations_summary(&self, account_id: &str) -> Result<GetOperationsSummaryResponse>;
}

impl<C: GatewayClient + ?Sized> GatewayClient for &C {
    fn create_user(&self, request: &CreateUserRequest) -> Result<CreateUserResponse> {
        (**self).create_user(request)
    }

    fn get_user(&self, user_id: &str) -> Result<GetUserResponse> {
        (**self).get_user(user_id)
    }

    fn open_account(&self, kind: AccountKind, user_id: &str) -> Result<OpenAccountResponse> {
        (**self).open_account(kind, user_id)
    }

    fn get_accounts(&self, user_id: &str) -> Result<GetAccountsResponse> {
        (**self).get_accounts(user_id)
    }

    fn issue_card(
        &self,
        kind: CardKind,
        user_id: &str,
        account_id: &str,
    ) -> Result<IssueCardResponse> {
        (**self).issue_card(kind, user_id, account_id)
    }

    fn make_operation(
        &self,
        kind: OperationKind,
        request: &MakeOperationRequest,
    ) -> Result<MakeOperationResponse> {
        (**self).make_operation(kind, request)
    }

    fn get_operation(&self, operation_id: &str) -> Result<GetOperationResponse> {
        (**self).get_operation(operation_id)
    }

    fn get_operation_receipt(&self, operation_id: &str) -> Result<GetOperationReceiptResponse> {
        (**self).get_operation_receipt(operation_id)
    }

    fn get_operations(&self, account_id: &str) -> Result<GetOperationsResponse> {
        (**self).get_operations(account_id)
    }

    fn get_operations_summary(&self, account_id: &str) -> Result<GetOperationsSummaryResponse> {
        (**self).get_operations_summary(account_id)
    }
}
