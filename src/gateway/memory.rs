// 🧪 In-Memory Gateway - a self-contained stand-in for the gateway services
// Used for dry-run builds and tests; assigns UUIDs like the real services do

use chrono::Utc;
use parking_lot::Mutex;

use super::schema::{
    AccountKind, AccountSchema, AccountStatus, CardKind, CardPaymentSystem, CardSchema,
    CardStatus, CreateUserRequest, CreateUserResponse, GetAccountsResponse,
    GetOperationReceiptResponse, GetOperationResponse, GetOperationsResponse,
    GetOperationsSummaryResponse, GetUserResponse, IssueCardResponse, MakeOperationRequest,
    MakeOperationResponse, OpenAccountResponse, OperationKind, OperationReceiptSchema,
    OperationSchema, OperationsSummarySchema, UserSchema,
};
use super::GatewayClient;
use crate::error::{Result, SeedsError};
use crate::fakers::Fake;

#[derive(Default)]
struct State {
    users: Vec<UserSchema>,
    accounts: Vec<(String, AccountSchema)>,
    operations: Vec<OperationSchema>,
    creation_calls: usize,
    fail_after: Option<usize>,
}

pub struct InMemoryGateway {
    state: Mutex<State>,
    fake: Mutex<Fake>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        InMemoryGateway {
            state: Mutex::new(State::default()),
            fake: Mutex::new(Fake::new()),
        }
    }

    /// Gateway whose creation calls start failing after `calls` successes
    pub fn failing_after(calls: usize) -> Self {
        let gateway = Self::new();
        gateway.state.lock().fail_after = Some(calls);
        gateway
    }

    /// Number of create/open/issue/make calls that succeeded
    pub fn creation_calls(&self) -> usize {
        self.state.lock().creation_calls
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().users.len()
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().accounts.len()
    }

    pub fn operation_count(&self) -> usize {
        self.state.lock().operations.len()
    }

    fn new_card(&self, kind: CardKind, account_id: &str, holder: &str) -> CardSchema {
        let mut fake = self.fake.lock();
        let payment_system = if fake.index(2) == 0 {
            CardPaymentSystem::Visa
        } else {
            CardPaymentSystem::Mastercard
        };
        CardSchema {
            id: new_id(),
            pin: fake.digits(4),
            cvv: fake.digits(3),
            kind,
            status: CardStatus::Active,
            account_id: account_id.to_string(),
            card_number: fake.card_number(),
            card_holder: holder.to_string(),
            expiry_date: (Utc::now().date_naive() + chrono::Duration::days(365 * 4)).to_string(),
            payment_system,
        }
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn not_found(operation: &str, what: &str, id: &str) -> SeedsError {
    SeedsError::gateway(operation, 404, format!("{} not found: {}", what, id))
}

/// Count a creation call, failing once the injected budget is spent
fn admit(state: &mut State, operation: &str) -> Result<()> {
    if let Some(limit) = state.fail_after {
        if state.creation_calls >= limit {
            return Err(SeedsError::gateway(operation, 503, "injected failure"));
        }
    }
    state.creation_calls += 1;
    Ok(())
}

impl GatewayClient for InMemoryGateway {
    fn create_user(&self, request: &CreateUserRequest) -> Result<CreateUserResponse> {
        let mut state = self.state.lock();
        admit(&mut state, "create_user")?;

        let user = UserSchema {
            id: new_id(),
            email: request.email.clone(),
            last_name: request.last_name.clone(),
            first_name: request.first_name.clone(),
            middle_name: request.middle_name.clone(),
            phone_number: request.phone_number.clone(),
        };
        state.users.push(user.clone());
        Ok(CreateUserResponse { user })
    }

    fn get_user(&self, user_id: &str) -> Result<GetUserResponse> {
        let state = self.state.lock();
        state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .map(|user| GetUserResponse { user })
            .ok_or_else(|| not_found("get_user", "user", user_id))
    }

    fn open_account(&self, kind: AccountKind, user_id: &str) -> Result<OpenAccountResponse> {
        let holder = {
            let state = self.state.lock();
            let user = state
                .users
                .iter()
                .find(|u| u.id == user_id)
                .ok_or_else(|| not_found(kind.open_endpoint(), "user", user_id))?;
            format!("{} {}", user.first_name, user.last_name)
        };

        let account_id = new_id();
        let cards = if kind.issues_card() {
            vec![self.new_card(CardKind::Physical, &account_id, &holder)]
        } else {
            Vec::new()
        };

        let mut state = self.state.lock();
        admit(&mut state, kind.open_endpoint())?;

        let account = AccountSchema {
            id: account_id,
            kind,
            cards,
            status: AccountStatus::Active,
            balance: 0.0,
        };
        state.accounts.push((user_id.to_string(), account.clone()));
        Ok(OpenAccountResponse { account })
    }

    fn get_accounts(&self, user_id: &str) -> Result<GetAccountsResponse> {
        let state = self.state.lock();
        let accounts = state
            .accounts
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, account)| account.clone())
            .collect();
        Ok(GetAccountsResponse { accounts })
    }

    fn issue_card(
        &self,
        kind: CardKind,
        user_id: &str,
        account_id: &str,
    ) -> Result<IssueCardResponse> {
        let operation = kind.issue_endpoint();
        let holder = {
            let state = self.state.lock();
            let user = state
                .users
                .iter()
                .find(|u| u.id == user_id)
                .ok_or_else(|| not_found(operation, "user", user_id))?;
            if !state
                .accounts
                .iter()
                .any(|(owner, a)| owner == user_id && a.id == account_id)
            {
                return Err(not_found(operation, "account", account_id));
            }
            format!("{} {}", user.first_name, user.last_name)
        };

        let card = self.new_card(kind, account_id, &holder);

        let mut state = self.state.lock();
        admit(&mut state, operation)?;
        if let Some((_, account)) = state.accounts.iter_mut().find(|(_, a)| a.id == account_id) {
            account.cards.push(card.clone());
        }
        Ok(IssueCardResponse { card })
    }

    fn make_operation(
        &self,
        kind: OperationKind,
        request: &MakeOperationRequest,
    ) -> Result<MakeOperationResponse> {
        let operation_name = kind.make_endpoint();
        let mut state = self.state.lock();

        let account = state
            .accounts
            .iter()
            .map(|(_, a)| a)
            .find(|a| a.id == request.account_id)
            .ok_or_else(|| not_found(operation_name, "account", &request.account_id))?;
        if !account.cards.iter().any(|c| c.id == request.card_id) {
            return Err(not_found(operation_name, "card", &request.card_id));
        }
        if kind.has_category() && request.category.is_none() {
            return Err(SeedsError::gateway(operation_name, 422, "category is required"));
        }

        admit(&mut state, operation_name)?;

        let operation = OperationSchema {
            id: new_id(),
            kind,
            status: request.status,
            amount: request.amount,
            card_id: request.card_id.clone(),
            category: request.category.clone().unwrap_or_default(),
            created_at: Utc::now().to_rfc3339(),
            account_id: request.account_id.clone(),
        };
        state.operations.push(operation.clone());
        Ok(MakeOperationResponse { operation })
    }

    fn get_operation(&self, operation_id: &str) -> Result<GetOperationResponse> {
        let state = self.state.lock();
        state
            .operations
            .iter()
            .find(|o| o.id == operation_id)
            .cloned()
            .map(|operation| GetOperationResponse { operation })
            .ok_or_else(|| not_found("get_operation", "operation", operation_id))
    }

    fn get_operation_receipt(&self, operation_id: &str) -> Result<GetOperationReceiptResponse> {
        let operation = self.get_operation(operation_id)?.operation;
        Ok(GetOperationReceiptResponse {
            receipt: OperationReceiptSchema {
                url: format!("http://localhost/receipts/{}", operation.id),
                document: format!(
                    "{} {:.2} {:?}",
                    operation.kind.as_str(),
                    operation.amount,
                    operation.status
                ),
            },
        })
    }

    fn get_operations(&self, account_id: &str) -> Result<GetOperationsResponse> {
        let state = self.state.lock();
        let operations = state
            .operations
            .iter()
            .filter(|o| o.account_id == account_id)
            .cloned()
            .collect();
        Ok(GetOperationsResponse { operations })
    }

    fn get_operations_summary(&self, account_id: &str) -> Result<GetOperationsSummaryResponse> {
        let operations = self.get_operations(account_id)?.operations;
        let mut summary = OperationsSummarySchema {
            spent_amount: 0.0,
            received_amount: 0.0,
            cashback_amount: 0.0,
        };
        for op in &operations {
            match op.kind {
                OperationKind::TopUp => summary.received_amount += op.amount,
                OperationKind::Cashback => summary.cashback_amount += op.amount,
                _ => summary.spent_amount += op.amount,
            }
        }
        Ok(GetOperationsSummaryResponse { summary })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::schema::OperationStatus;

    fn create_user(gateway: &InMemoryGateway) -> UserSchema {
        let request = Fake::seeded(1).create_user_request();
        gateway.create_user(&request).unwrap().user
    }

    #[test]
    fn test_card_accounts_come_with_a_card() {
        let gateway = InMemoryGateway::new();
        let user = create_user(&gateway);

        let debit = gateway.open_account(AccountKind::DebitCard, &user.id).unwrap();
        let deposit = gateway.open_account(AccountKind::Deposit, &user.id).unwrap();

        assert_eq!(debit.account.cards.len(), 1);
        assert!(deposit.account.cards.is_empty());
        assert_eq!(gateway.get_accounts(&user.id).unwrap().accounts.len(), 2);
    }

    #[test]
    fn test_open_account_for_unknown_user_fails() {
        let gateway = InMemoryGateway::new();
        let err = gateway.open_account(AccountKind::Savings, "nobody").unwrap_err();
        assert!(matches!(err, SeedsError::Gateway { status: 404, .. }));
    }

    #[test]
    fn test_operation_needs_card_of_account() {
        let gateway = InMemoryGateway::new();
        let user = create_user(&gateway);
        let account = gateway.open_account(AccountKind::CreditCard, &user.id).unwrap().account;

        let request = MakeOperationRequest {
            status: OperationStatus::Completed,
            amount: 10.0,
            card_id: "unknown-card".to_string(),
            account_id: account.id.clone(),
            category: None,
        };
        assert!(gateway.make_operation(OperationKind::TopUp, &request).is_err());

        let request = MakeOperationRequest {
            card_id: account.cards[0].id.clone(),
            ..request
        };
        let op = gateway.make_operation(OperationKind::TopUp, &request).unwrap().operation;
        assert_eq!(gateway.get_operation(&op.id).unwrap().operation, op);

        let summary = gateway.get_operations_summary(&account.id).unwrap().summary;
        assert_eq!(summary.received_amount, 10.0);
    }

    #[test]
    fn test_purchase_requires_category() {
        let gateway = InMemoryGateway::new();
        let user = create_user(&gateway);
        let account = gateway.open_account(AccountKind::DebitCard, &user.id).unwrap().account;

        let request = MakeOperationRequest {
            status: OperationStatus::InProgress,
            amount: 77.99,
            card_id: account.cards[0].id.clone(),
            account_id: account.id.clone(),
            category: None,
        };
        let err = gateway.make_operation(OperationKind::Purchase, &request).unwrap_err();
        assert!(matches!(err, SeedsError::Gateway { status: 422, .. }));
    }

    #[test]
    fn test_failing_after_budget() {
        let gateway = InMemoryGateway::failing_after(1);
        let user = create_user(&gateway);
        let err = gateway.open_account(AccountKind::DebitCard, &user.id).unwrap_err();
        assert!(matches!(err, SeedsError::Gateway { status: 503, .. }));
        assert_eq!(gateway.creation_calls(), 1);
        assert_eq!(gateway.account_count(), 0);
    }

    #[test]
    fn test_issue_card_attaches_to_account() {
        let gateway = InMemoryGateway::new();
        let user = create_user(&gateway);
        let account = gateway.open_account(AccountKind::DebitCard, &user.id).unwrap().account;

        let card = gateway
            .issue_card(CardKind::Virtual, &user.id, &account.id)
            .unwrap()
            .card;
        assert_eq!(card.kind, CardKind::Virtual);

        let accounts = gateway.get_accounts(&user.id).unwrap().accounts;
        assert_eq!(accounts[0].cards.len(), 2);
        assert!(gateway.get_operation_receipt("missing").is_err());
    }
}
