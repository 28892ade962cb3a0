// 📚 Scenario Catalogue - the seeding plans load tests start from
//
// Each load scenario that needs existing users gets a plan here; the name is
// also the key of its persisted dump.

use std::path::Path;

use crate::error::{Result, SeedsError};
use crate::gateway::schema::{AccountKind, OperationKind};
use crate::plan::{SeedAccountsPlan, SeedUsersPlan, SeedsPlan};
use crate::scenario::SeedsScenario;
use crate::store::validate_scenario_name;

/// Users every built-in scenario seeds
pub const DEFAULT_USERS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScenario {
    /// Users with a credit card account carrying a short operation history
    ExistingUserGetOperations,
    /// Users with one debit card account to issue virtual cards on
    ExistingUserIssueVirtualCard,
    /// Users with one debit card account to issue physical cards on
    ExistingUserIssuePhysicalCard,
    /// Users with one credit card account to make purchases with
    ExistingUserMakePurchaseOperation,
    /// Users with one debit card account to top up
    ExistingUserMakeTopUpOperation,
    /// Users with one account of every kind to fetch documents for
    ExistingUserGetDocuments,
}

impl BuiltinScenario {
    pub const ALL: [BuiltinScenario; 6] = [
        BuiltinScenario::ExistingUserGetOperations,
        BuiltinScenario::ExistingUserIssueVirtualCard,
        BuiltinScenario::ExistingUserIssuePhysicalCard,
        BuiltinScenario::ExistingUserMakePurchaseOperation,
        BuiltinScenario::ExistingUserMakeTopUpOperation,
        BuiltinScenario::ExistingUserGetDocuments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinScenario::ExistingUserGetOperations => "existing_user_get_operations",
            BuiltinScenario::ExistingUserIssueVirtualCard => "existing_user_issue_virtual_card",
            BuiltinScenario::ExistingUserIssuePhysicalCard => "existing_user_issue_physical_card",
            BuiltinScenario::ExistingUserMakePurchaseOperation => {
                "existing_user_make_purchase_operation"
            }
            BuiltinScenario::ExistingUserMakeTopUpOperation => {
                "existing_user_make_top_up_operation"
            }
            BuiltinScenario::ExistingUserGetDocuments => "existing_user_get_documents",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl SeedsScenario for BuiltinScenario {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn plan(&self) -> SeedsPlan {
        let users = SeedUsersPlan::new(DEFAULT_USERS);
        let users = match self {
            BuiltinScenario::ExistingUserGetOperations => users.with_accounts(
                AccountKind::CreditCard,
                SeedAccountsPlan::new(1)
                    .with_operations(OperationKind::Purchase, 5)
                    .with_operations(OperationKind::TopUp, 1)
                    .with_operations(OperationKind::CashWithdrawal, 1),
            ),
            BuiltinScenario::ExistingUserIssueVirtualCard
            | BuiltinScenario::ExistingUserIssuePhysicalCard
            | BuiltinScenario::ExistingUserMakeTopUpOperation => {
                users.with_accounts(AccountKind::DebitCard, SeedAccountsPlan::new(1))
            }
            BuiltinScenario::ExistingUserMakePurchaseOperation => {
                users.with_accounts(AccountKind::CreditCard, SeedAccountsPlan::new(1))
            }
            BuiltinScenario::ExistingUserGetDocuments => users
                .with_accounts(AccountKind::DebitCard, SeedAccountsPlan::new(1))
                .with_accounts(AccountKind::CreditCard, SeedAccountsPlan::new(1))
                .with_accounts(AccountKind::Deposit, SeedAccountsPlan::new(1))
                .with_accounts(AccountKind::Savings, SeedAccountsPlan::new(1)),
        };
        SeedsPlan::new(users)
    }
}

/// Scenario whose plan comes from a JSON file
pub struct PlanFileScenario {
    name: String,
    plan: SeedsPlan,
}

impl PlanFileScenario {
    pub fn new(name: &str, plan: SeedsPlan) -> Result<Self> {
        validate_scenario_name(name)?;
        plan.validate()?;
        Ok(PlanFileScenario {
            name: name.to_string(),
            plan,
        })
    }

    pub fn from_file<P: AsRef<Path>>(name: &str, path: P) -> Result<Self> {
        Self::new(name, SeedsPlan::from_file(path)?)
    }
}

impl SeedsScenario for PlanFileScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn plan(&self) -> SeedsPlan {
        self.plan.clone()
    }
}

/// Built-in scenario by name
pub fn by_name(name: &str) -> Result<Box<dyn SeedsScenario>> {
    BuiltinScenario::from_name(name)
        .map(|s| Box::new(s) as Box<dyn SeedsScenario>)
        .ok_or_else(|| SeedsError::UnknownScenario(name.to_string()))
}

pub fn builtin_names() -> Vec<&'static str> {
    BuiltinScenario::ALL.iter().map(|s| s.as_str()).collect()
}

// ============================================================================
// TESTS
// ============================================================================
