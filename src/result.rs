// 🌳 Seeds Result - identifiers of the created fixtures, shaped like the plan
//
// Built once, persisted, then only ever read. Vec order is creation order,
// so "the Nth seeded user" is stable across loads.

use serde::{Deserialize, Serialize};

use crate::gateway::schema::{AccountKind, CardKind, OperationKind};
use crate::plan::{PlanTotals, SeedAccountsPlan, SeedsPlan};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedOperationResult {
    pub operation_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCardResult {
    pub card_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedAccountResult {
    pub account_id: String,

    /// Cards the gateway issued together with the account
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub physical_cards: Vec<SeedCardResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub virtual_cards: Vec<SeedCardResult>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub purchase_operations: Vec<SeedOperationResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_up_operations: Vec<SeedOperationResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cashback_operations: Vec<SeedOperationResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transfer_operations: Vec<SeedOperationResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bill_payment_operations: Vec<SeedOperationResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cash_withdrawal_operations: Vec<SeedOperationResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fee_operations: Vec<SeedOperationResult>,
}

impl SeedAccountResult {
    pub fn new(account_id: String, card_ids: Vec<String>) -> Self {
        SeedAccountResult {
            account_id,
            card_ids,
            ..Default::default()
        }
    }

    /// Card used for operations on this account
    pub fn primary_card_id(&self) -> Option<&str> {
        self.card_ids.first().map(String::as_str)
    }

    pub fn cards(&self, kind: CardKind) -> &[SeedCardResult] {
        match kind {
            CardKind::Physical => &self.physical_cards,
            CardKind::Virtual => &self.virtual_cards,
        }
    }

    pub fn cards_mut(&mut self, kind: CardKind) -> &mut Vec<SeedCardResult> {
        match kind {
            CardKind::Physical => &mut self.physical_cards,
            CardKind::Virtual => &mut self.virtual_cards,
        }
    }

    pub fn operations(&self, kind: OperationKind) -> &[SeedOperationResult] {
        match kind {
            OperationKind::Purchase => &self.purchase_operations,
            OperationKind::TopUp => &self.top_up_operations,
            OperationKind::Cashback => &self.cashback_operations,
            OperationKind::Transfer => &self.transfer_operations,
            OperationKind::BillPayment => &self.bill_payment_operations,
            OperationKind::CashWithdrawal => &self.cash_withdrawal_operations,
            OperationKind::Fee => &self.fee_operations,
        }
    }

    pub fn operations_mut(&mut self, kind: OperationKind) -> &mut Vec<SeedOperationResult> {
        match kind {
            OperationKind::Purchase => &mut self.purchase_operations,
            OperationKind::TopUp => &mut self.top_up_operations,
            OperationKind::Cashback => &mut self.cashback_operations,
            OperationKind::Transfer => &mut self.transfer_operations,
            OperationKind::BillPayment => &mut self.bill_payment_operations,
            OperationKind::CashWithdrawal => &mut self.cash_withdrawal_operations,
            OperationKind::Fee => &mut self.fee_operations,
        }
    }

    /// All operation ids of the account, in creation order
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        OperationKind::ALL
            .into_iter()
            .flat_map(move |kind| self.operations(kind).iter())
            .map(|op| op.operation_id.as_str())
    }

    fn matches_plan(&self, plan: &SeedAccountsPlan) -> bool {
        let cards_ok = [CardKind::Physical, CardKind::Virtual].into_iter().all(|kind| {
            let expected = plan.cards(kind).map_or(0, |p| p.count as usize);
            self.cards(kind).len() == expected
        });
        let operations_ok = OperationKind::ALL.into_iter().all(|kind| {
            let expected = plan.operations(kind).map_or(0, |p| p.count as usize);
            self.operations(kind).len() == expected
        });
        cards_ok && operations_ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedUserResult {
    pub user_id: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub debit_card_accounts: Vec<SeedAccountResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credit_card_accounts: Vec<SeedAccountResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deposit_accounts: Vec<SeedAccountResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub savings_accounts: Vec<SeedAccountResult>,
}

impl SeedUserResult {
    pub fn new(user_id: String) -> Self {
        SeedUserResult {
            user_id,
            ..Default::default()
        }
    }

    pub fn accounts(&self, kind: AccountKind) -> &[SeedAccountResult] {
        match kind {
            AccountKind::DebitCard => &self.debit_card_accounts,
            AccountKind::CreditCard => &self.credit_card_accounts,
            AccountKind::Deposit => &self.deposit_accounts,
            AccountKind::Savings => &self.savings_accounts,
        }
    }

    pub fn accounts_mut(&mut self, kind: AccountKind) -> &mut Vec<SeedAccountResult> {
        match kind {
            AccountKind::DebitCard => &mut self.debit_card_accounts,
            AccountKind::CreditCard => &mut self.credit_card_accounts,
            AccountKind::Deposit => &mut self.deposit_accounts,
            AccountKind::Savings => &mut self.savings_accounts,
        }
    }

    /// Every account of the user with its kind, in creation order
    pub fn all_accounts(&self) -> impl Iterator<Item = (AccountKind, &SeedAccountResult)> {
        AccountKind::ALL
            .into_iter()
            .flat_map(move |kind| self.accounts(kind).iter().map(move |a| (kind, a)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedsResult {
    pub users: Vec<SeedUserResult>,
}

impl SeedsResult {
    pub fn new(users: Vec<SeedUserResult>) -> Self {
        SeedsResult { users }
    }

    /// True when every level holds exactly the counts the plan asked for
    pub fn matches_plan(&self, plan: &SeedsPlan) -> bool {
        if self.users.len() != plan.users.count as usize {
            return false;
        }

        self.users.iter().all(|user| {
            AccountKind::ALL.into_iter().all(|kind| {
                let accounts = user.accounts(kind);
                match plan.users.accounts(kind) {
                    Some(account_plan) => {
                        accounts.len() == account_plan.count as usize
                            && accounts.iter().all(|a| a.matches_plan(account_plan))
                    }
                    None => accounts.is_empty(),
                }
            })
        })
    }

    pub fn totals(&self) -> PlanTotals {
        let mut totals = PlanTotals {
            users: self.users.len(),
            ..Default::default()
        };
        for (_, account) in self.users.iter().flat_map(|u| u.all_accounts()) {
            totals.accounts += 1;
            totals.cards += account.physical_cards.len() + account.virtual_cards.len();
            totals.operations += account.operation_ids().count();
        }
        totals
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SeedUsersPlan;

    fn op(id: &str) -> SeedOperationResult {
        SeedOperationResult {
            operation_id: id.to_string(),
        }
    }

    fn plan() -> SeedsPlan {
        SeedsPlan::new(SeedUsersPlan::new(1).with_accounts(
            AccountKind::DebitCard,
            SeedAccountsPlan::new(1)
                .with_operations(OperationKind::Purchase, 2)
                .with_operations(OperationKind::Fee, 1),
        ))
    }

    fn matching_result() -> SeedsResult {
        let mut account = SeedAccountResult::new("a-1".to_string(), vec!["c-1".to_string()]);
        account.purchase_operations = vec![op("p-1"), op("p-2")];
        account.fee_operations = vec![op("f-1")];

        let mut user = SeedUserResult::new("u-1".to_string());
        user.debit_card_accounts.push(account);
        SeedsResult::new(vec![user])
    }

    #[test]
    fn test_matches_plan() {
        assert!(matching_result().matches_plan(&plan()));
    }

    #[test]
    fn test_missing_operation_breaks_shape() {
        let mut result = matching_result();
        result.users[0].debit_card_accounts[0].purchase_operations.pop();
        assert!(!result.matches_plan(&plan()));
    }

    #[test]
    fn test_unplanned_branch_breaks_shape() {
        let mut result = matching_result();
        result.users[0]
            .savings_accounts
            .push(SeedAccountResult::new("s-1".to_string(), vec![]));
        assert!(!result.matches_plan(&plan()));
    }

    #[test]
    fn test_operation_ids_in_creation_order() {
        let result = matching_result();
        let ids: Vec<&str> = result.users[0].debit_card_accounts[0].operation_ids().collect();
        assert_eq!(ids, vec!["p-1", "p-2", "f-1"]);
        assert_eq!(result.users[0].debit_card_accounts[0].primary_card_id(), Some("c-1"));
    }

    #[test]
    fn test_totals_agree_with_plan_totals() {
        assert_eq!(matching_result().totals(), plan().totals());
    }

    #[test]
    fn test_empty_branches_not_serialized() {
        let json = serde_json::to_string(&matching_result()).unwrap();
        assert!(!json.contains("savings_accounts"));
        assert!(!json.contains("top_up_operations"));
        let back: SeedsResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, matching_result());
    }
}
