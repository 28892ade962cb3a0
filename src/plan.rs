// 📋 Seeds Plan - how many fixtures to create, and where they hang
//
// Pure configuration: a tree of counts with optional branches.
// An absent branch means "skip", never "zero of something".

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, SeedsError};
use crate::gateway::schema::{AccountKind, CardKind, OperationKind};

// ============================================================================
// LEAF PLANS
// ============================================================================

/// Operations of one type to make on every account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedOperationsPlan {
    pub count: u32,
}

/// Extra cards of one type to issue on every account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedCardsPlan {
    pub count: u32,
}

// ============================================================================
// ACCOUNTS PLAN
// ============================================================================

/// Accounts of one type to open for every user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedAccountsPlan {
    pub count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_cards: Option<SeedCardsPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_cards: Option<SeedCardsPlan>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_operations: Option<SeedOperationsPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_up_operations: Option<SeedOperationsPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cashback_operations: Option<SeedOperationsPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_operations: Option<SeedOperationsPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_payment_operations: Option<SeedOperationsPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_withdrawal_operations: Option<SeedOperationsPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_operations: Option<SeedOperationsPlan>,
}

impl SeedAccountsPlan {
    pub fn new(count: u32) -> Self {
        SeedAccountsPlan {
            count,
            ..Default::default()
        }
    }

    pub fn with_operations(mut self, kind: OperationKind, count: u32) -> Self {
        *self.operations_slot(kind) = Some(SeedOperationsPlan { count });
        self
    }

    pub fn with_cards(mut self, kind: CardKind, count: u32) -> Self {
        let slot = match kind {
            CardKind::Physical => &mut self.physical_cards,
            CardKind::Virtual => &mut self.virtual_cards,
        };
        *slot = Some(SeedCardsPlan { count });
        self
    }

    pub fn operations(&self, kind: OperationKind) -> Option<&SeedOperationsPlan> {
        match kind {
            OperationKind::Purchase => self.purchase_operations.as_ref(),
            OperationKind::TopUp => self.top_up_operations.as_ref(),
            OperationKind::Cashback => self.cashback_operations.as_ref(),
            OperationKind::Transfer => self.transfer_operations.as_ref(),
            OperationKind::BillPayment => self.bill_payment_operations.as_ref(),
            OperationKind::CashWithdrawal => self.cash_withdrawal_operations.as_ref(),
            OperationKind::Fee => self.fee_operations.as_ref(),
        }
    }

    fn operations_slot(&mut self, kind: OperationKind) -> &mut Option<SeedOperationsPlan> {
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

    /// Present operation plans, in creation order
    pub fn operation_plans(&self) -> impl Iterator<Item = (OperationKind, &SeedOperationsPlan)> {
        OperationKind::ALL
            .into_iter()
            .filter_map(move |kind| self.operations(kind).map(|plan| (kind, plan)))
    }

    pub fn cards(&self, kind: CardKind) -> Option<&SeedCardsPlan> {
        match kind {
            CardKind::Physical => self.physical_cards.as_ref(),
            CardKind::Virtual => self.virtual_cards.as_ref(),
        }
    }

    /// Present card plans: physical first, then virtual
    pub fn card_plans(&self) -> impl Iterator<Item = (CardKind, &SeedCardsPlan)> {
        [CardKind::Physical, CardKind::Virtual]
            .into_iter()
            .filter_map(move |kind| self.cards(kind).map(|plan| (kind, plan)))
    }

    pub fn has_nested(&self) -> bool {
        self.operation_plans().next().is_some() || self.card_plans().next().is_some()
    }
}

// ============================================================================
// USERS PLAN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedUsersPlan {
    pub count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_card_accounts: Option<SeedAccountsPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_accounts: Option<SeedAccountsPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_accounts: Option<SeedAccountsPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_accounts: Option<SeedAccountsPlan>,
}

impl SeedUsersPlan {
    pub fn new(count: u32) -> Self {
        SeedUsersPlan {
            count,
            ..Default::default()
        }
    }

    pub fn with_accounts(mut self, kind: AccountKind, plan: SeedAccountsPlan) -> Self {
        let slot = match kind {
            AccountKind::DebitCard => &mut self.debit_card_accounts,
            AccountKind::CreditCard => &mut self.credit_card_accounts,
            AccountKind::Deposit => &mut self.deposit_accounts,
            AccountKind::Savings => &mut self.savings_accounts,
        };
        *slot = Some(plan);
        self
    }

    pub fn accounts(&self, kind: AccountKind) -> Option<&SeedAccountsPlan> {
        match kind {
            AccountKind::DebitCard => self.debit_card_accounts.as_ref(),
            AccountKind::CreditCard => self.credit_card_accounts.as_ref(),
            AccountKind::Deposit => self.deposit_accounts.as_ref(),
            AccountKind::Savings => self.savings_accounts.as_ref(),
        }
    }

    /// Present account plans, in creation order
    pub fn account_plans(&self) -> impl Iterator<Item = (AccountKind, &SeedAccountsPlan)> {
        AccountKind::ALL
            .into_iter()
            .filter_map(move |kind| self.accounts(kind).map(|plan| (kind, plan)))
    }
}

// ============================================================================
// ROOT PLAN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedsPlan {
    pub users: SeedUsersPlan,
}

impl SeedsPlan {
    pub fn new(users: SeedUsersPlan) -> Self {
        SeedsPlan { users }
    }

    /// Parse and validate a JSON plan
    pub fn from_json(json: &str) -> Result<Self> {
        let plan: SeedsPlan = serde_json::from_str(json)
            .map_err(|e| SeedsError::InvalidPlan(format!("failed to parse plan: {}", e)))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Load a JSON plan from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Reject plans whose result tree could not mirror them
    pub fn validate(&self) -> Result<()> {
        if self.users.count == 0 {
            return Err(SeedsError::InvalidPlan(
                "users.count must be a positive integer".to_string(),
            ));
        }

        for (kind, accounts) in self.users.account_plans() {
            if !kind.issues_card() && accounts.has_nested() {
                return Err(SeedsError::InvalidPlan(format!(
                    "users.{}: {} accounts have no cards, so cards and operations cannot be seeded on them",
                    kind.plan_key(),
                    kind.as_str()
                )));
            }
        }

        Ok(())
    }

    /// SHA-256 of the canonical JSON form
    ///
    /// Two plans with the same fingerprint describe the same fixture tree shape.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        format!("{:x}", hasher.finalize())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of users, accounts, issued cards and operations the plan creates
    pub fn totals(&self) -> PlanTotals {
        let users = self.users.count as usize;
        let mut totals = PlanTotals {
            users,
            ..Default::default()
        };

        for (_, accounts) in self.users.account_plans() {
            let account_count = users * accounts.count as usize;
            totals.accounts += account_count;
            totals.cards += account_count
                * accounts
                    .card_plans()
                    .map(|(_, p)| p.count as usize)
                    .sum::<usize>();
            totals.operations += account_count
                * accounts
                    .operation_plans()
                    .map(|(_, p)| p.count as usize)
                    .sum::<usize>();
        }

        totals
    }
}

/// Flat fixture counts for a plan or a result tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanTotals {
    pub users: usize,
    pub accounts: usize,
    pub cards: usize,
    pub operations: usize,
}

impl PlanTotals {
    /// Gateway calls needed to realise these totals
    pub fn creation_calls(&self) -> usize {
        self.users + self.accounts + self.cards + self.operations
    }
}

// ============================================================================
// TESTS
// ============================================================================
