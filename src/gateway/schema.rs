// 📄 Gateway Schemas - request/response payloads of the http-gateway
// Wire names are camelCase; snake_case is accepted on input as well

use serde::{Deserialize, Serialize};

// ============================================================================
// ACCOUNT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    /// Debit card account (issues a card on opening)
    DebitCard,

    /// Credit card account (issues a card on opening)
    CreditCard,

    /// Deposit account (no cards)
    Deposit,

    /// Savings account (no cards)
    Savings,
}

impl AccountKind {
    /// Creation order used by the seeds builder
    pub const ALL: [AccountKind; 4] = [
        AccountKind::DebitCard,
        AccountKind::CreditCard,
        AccountKind::Deposit,
        AccountKind::Savings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::DebitCard => "DEBIT_CARD",
            AccountKind::CreditCard => "CREDIT_CARD",
            AccountKind::Deposit => "DEPOSIT",
            AccountKind::Savings => "SAVINGS",
        }
    }

    /// Name of the matching plan/result field
    pub fn plan_key(&self) -> &'static str {
        match self {
            AccountKind::DebitCard => "debit_card_accounts",
            AccountKind::CreditCard => "credit_card_accounts",
            AccountKind::Deposit => "deposit_accounts",
            AccountKind::Savings => "savings_accounts",
        }
    }

    /// Path segment of the open-account endpoint
    pub fn open_endpoint(&self) -> &'static str {
        match self {
            AccountKind::DebitCard => "open-debit-card-account",
            AccountKind::CreditCard => "open-credit-card-account",
            AccountKind::Deposit => "open-deposit-account",
            AccountKind::Savings => "open-savings-account",
        }
    }

    /// Whether the gateway issues a card together with the account
    pub fn issues_card(&self) -> bool {
        matches!(self, AccountKind::DebitCard | AccountKind::CreditCard)
    }
}

// ============================================================================
// OPERATION KIND / STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Purchase,
    TopUp,
    Cashback,
    Transfer,
    BillPayment,
    CashWithdrawal,
    Fee,
}

impl OperationKind {
    /// Creation order used by the seeds builder
    pub const ALL: [OperationKind; 7] = [
        OperationKind::Purchase,
        OperationKind::TopUp,
        OperationKind::Cashback,
        OperationKind::Transfer,
        OperationKind::BillPayment,
        OperationKind::CashWithdrawal,
        OperationKind::Fee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Purchase => "PURCHASE",
            OperationKind::TopUp => "TOP_UP",
            OperationKind::Cashback => "CASHBACK",
            OperationKind::Transfer => "TRANSFER",
            OperationKind::BillPayment => "BILL_PAYMENT",
            OperationKind::CashWithdrawal => "CASH_WITHDRAWAL",
            OperationKind::Fee => "FEE",
        }
    }

    pub fn plan_key(&self) -> &'static str {
        match self {
            OperationKind::Purchase => "purchase_operations",
            OperationKind::TopUp => "top_up_operations",
            OperationKind::Cashback => "cashback_operations",
            OperationKind::Transfer => "transfer_operations",
            OperationKind::BillPayment => "bill_payment_operations",
            OperationKind::CashWithdrawal => "cash_withdrawal_operations",
            OperationKind::Fee => "fee_operations",
        }
    }

    /// Path segment of the make-operation endpoint
    pub fn make_endpoint(&self) -> &'static str {
        match self {
            OperationKind::Purchase => "make-purchase-operation",
            OperationKind::TopUp => "make-top-up-operation",
            OperationKind::Cashback => "make-cashback-operation",
            OperationKind::Transfer => "make-transfer-operation",
            OperationKind::BillPayment => "make-bill-payment-operation",
            OperationKind::CashWithdrawal => "make-cash-withdrawal-operation",
            OperationKind::Fee => "make-fee-operation",
        }
    }

    /// Only purchases carry a category
    pub fn has_category(&self) -> bool {
        matches!(self, OperationKind::Purchase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Failed,
    Completed,
    InProgress,
    Unspecified,
}

impl OperationStatus {
    pub const ALL: [OperationStatus; 4] = [
        OperationStatus::Failed,
        OperationStatus::Completed,
        OperationStatus::InProgress,
        OperationStatus::Unspecified,
    ];
}

// ============================================================================
// CARDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardKind {
    Physical,
    Virtual,
}

impl CardKind {
    pub fn issue_endpoint(&self) -> &'static str {
        match self {
            CardKind::Physical => "issue-physical-card",
            CardKind::Virtual => "issue-virtual-card",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    Active,
    Frozen,
    Closed,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardPaymentSystem {
    Visa,
    Mastercard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSchema {
    pub id: String,
    pub pin: String,
    pub cvv: String,
    #[serde(rename = "type")]
    pub kind: CardKind,
    pub status: CardStatus,
    #[serde(alias = "account_id")]
    pub account_id: String,
    #[serde(alias = "card_number")]
    pub card_number: String,
    #[serde(alias = "card_holder")]
    pub card_holder: String,
    #[serde(alias = "expiry_date")]
    pub expiry_date: String,
    #[serde(alias = "payment_system")]
    pub payment_system: CardPaymentSystem,
}

// ============================================================================
// USERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSchema {
    pub id: String,
    pub email: String,
    #[serde(alias = "last_name")]
    pub last_name: String,
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "middle_name")]
    pub middle_name: String,
    #[serde(alias = "phone_number")]
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user: UserSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserResponse {
    pub user: UserSchema,
}

// ============================================================================
// ACCOUNTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Closed,
    PendingClosure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSchema {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    #[serde(default)]
    pub cards: Vec<CardSchema>,
    pub status: AccountStatus,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAccountRequest {
    #[serde(alias = "user_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAccountResponse {
    pub account: AccountSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAccountsResponse {
    pub accounts: Vec<AccountSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCardRequest {
    #[serde(alias = "user_id")]
    pub user_id: String,
    #[serde(alias = "account_id")]
    pub account_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCardResponse {
    pub card: CardSchema,
}

// ============================================================================
// OPERATIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSchema {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub status: OperationStatus,
    pub amount: f64,
    #[serde(alias = "card_id")]
    pub card_id: String,
    pub category: String,
    #[serde(alias = "created_at")]
    pub created_at: String,
    #[serde(alias = "account_id")]
    pub account_id: String,
}

/// Payload shared by every make-*-operation endpoint
///
/// `category` is sent only for purchases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeOperationRequest {
    pub status: OperationStatus,
    pub amount: f64,
    #[serde(alias = "card_id")]
    pub card_id: String,
    #[serde(alias = "account_id")]
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakeOperationResponse {
    pub operation: OperationSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetOperationResponse {
    pub operation: OperationSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetOperationsResponse {
    pub operations: Vec<OperationSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationsSummarySchema {
    #[serde(alias = "spent_amount")]
    pub spent_amount: f64,
    #[serde(alias = "received_amount")]
    pub received_amount: f64,
    #[serde(alias = "cashback_amount")]
    pub cashback_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetOperationsSummaryResponse {
    pub summary: OperationsSummarySchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationReceiptSchema {
    pub url: String,
    pub document: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetOperationReceiptResponse {
    pub receipt: OperationReceiptSchema,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_request_uses_camel_case() {
        let request = CreateUserRequest {
            email: "user@example.com".to_string(),
            last_name: "Doe".to_string(),
            first_name: "Jane".to_string(),
            middle_name: "Q".to_string(),
            phone_number: "+10000000000".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["lastName"], "Doe");
        assert_eq!(json["phoneNumber"], "+10000000000");
        assert!(json.get("last_name").is_none());
    }

    #[test]
    fn test_operation_schema_accepts_both_spellings() {
        let camel = r#"{
            "id": "op-1", "type": "TOP_UP", "status": "COMPLETED", "amount": 10.5,
            "cardId": "c-1", "category": "", "createdAt": "2024-01-01T00:00:00", "accountId": "a-1"
        }"#;
        let snake = r#"{
            "id": "op-1", "type": "TOP_UP", "status": "COMPLETED", "amount": 10.5,
            "card_id": "c-1", "category": "", "created_at": "2024-01-01T00:00:00", "account_id": "a-1"
        }"#;

        let a: OperationSchema = serde_json::from_str(camel).unwrap();
        let b: OperationSchema = serde_json::from_str(snake).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.kind, OperationKind::TopUp);
    }

    #[test]
    fn test_make_operation_request_omits_missing_category() {
        let request = MakeOperationRequest {
            status: OperationStatus::InProgress,
            amount: 77.99,
            card_id: "c-1".to_string(),
            account_id: "a-1".to_string(),
            category: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["status"], "IN_PROGRESS");
        assert_eq!(json["cardId"], "c-1");
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_account_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&AccountKind::DebitCard).unwrap(),
            "\"DEBIT_CARD\""
        );
        assert_eq!(AccountKind::Savings.open_endpoint(), "open-savings-account");
        assert!(AccountKind::CreditCard.issues_card());
        assert!(!AccountKind::Deposit.issues_card());
    }

    #[test]
    fn test_operation_kind_wire_names_match_as_str() {
        for kind in OperationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert!(OperationKind::Purchase.has_category());
        assert!(!OperationKind::Fee.has_category());
    }
}
