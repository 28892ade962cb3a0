// 🏗️ Seeds Builder - walks a plan top-down and records what the gateway created
//
// One sequential pass: user → accounts → cards → operations.
// Later calls need ids returned by earlier ones, so nothing runs in parallel.
// The first failed call aborts the whole build; fixtures are disposable and
// a failed build is simply re-run.

use tracing::{debug, info, info_span};

use crate::error::{Result, SeedsError};
use crate::fakers::Fake;
use crate::gateway::schema::{AccountKind, MakeOperationRequest, OperationKind};
use crate::gateway::GatewayClient;
use crate::plan::{SeedAccountsPlan, SeedsPlan};
use crate::result::{SeedAccountResult, SeedCardResult, SeedOperationResult, SeedUserResult, SeedsResult};

pub struct SeedsBuilder<C> {
    client: C,
    fake: Fake,
}

impl<C: GatewayClient> SeedsBuilder<C> {
    pub fn new(client: C) -> Self {
        SeedsBuilder {
            client,
            fake: Fake::new(),
        }
    }

    /// Builder with a deterministic fake-data source
    pub fn with_fake(client: C, fake: Fake) -> Self {
        SeedsBuilder { client, fake }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Realise the plan; the returned tree mirrors it level by level
    pub fn build(&mut self, plan: &SeedsPlan) -> Result<SeedsResult> {
        plan.validate()?;

        let totals = plan.totals();
        info!(
            users = totals.users,
            accounts = totals.accounts,
            cards = totals.cards,
            operations = totals.operations,
            "building seeds"
        );

        let mut users = Vec::with_capacity(plan.users.count as usize);
        for index in 0..plan.users.count {
            let _span = info_span!("seed_user", index).entered();
            users.push(self.build_user(plan)?);
        }

        info!(users = users.len(), "seeds built");
        Ok(SeedsResult::new(users))
    }

    fn build_user(&mut self, plan: &SeedsPlan) -> Result<SeedUserResult> {
        let request = self.fake.create_user_request();
        let user_id = self.client.create_user(&request)?.user.id;
        debug!(%user_id, "user created");

        let mut user = SeedUserResult::new(user_id);
        for (kind, account_plan) in plan.users.account_plans() {
            for _ in 0..account_plan.count {
                let account = self.build_account(kind, &user.user_id, account_plan)?;
                user.accounts_mut(kind).push(account);
            }
        }
        Ok(user)
    }

    fn build_account(
        &mut self,
        kind: AccountKind,
        user_id: &str,
        plan: &SeedAccountsPlan,
    ) -> Result<SeedAccountResult> {
        let account = self.client.open_account(kind, user_id)?.account;
        let card_ids = account.cards.iter().map(|c| c.id.clone()).collect();
        let mut result = SeedAccountResult::new(account.id, card_ids);
        debug!(account_id = %result.account_id, kind = kind.as_str(), "account opened");

        for (card_kind, cards_plan) in plan.card_plans() {
            for _ in 0..cards_plan.count {
                let card = self
                    .client
                    .issue_card(card_kind, user_id, &result.account_id)?
                    .card;
                result.cards_mut(card_kind).push(SeedCardResult { card_id: card.id });
            }
        }

        if plan.operation_plans().next().is_none() {
            return Ok(result);
        }

        let card_id = operation_card(&result)?;
        for (operation_kind, operations_plan) in plan.operation_plans() {
            for _ in 0..operations_plan.count {
                let operation_id =
                    self.make_operation(operation_kind, &card_id, &result.account_id)?;
                result
                    .operations_mut(operation_kind)
                    .push(SeedOperationResult { operation_id });
            }
        }

        Ok(result)
    }

    fn make_operation(
        &mut self,
        kind: OperationKind,
        card_id: &str,
        account_id: &str,
    ) -> Result<String> {
        let request = MakeOperationRequest {
            status: self.fake.operation_status(),
            amount: self.fake.amount(),
            card_id: card_id.to_string(),
            account_id: account_id.to_string(),
            category: kind.has_category().then(|| self.fake.category()),
        };
        let operation = self.client.make_operation(kind, &request)?.operation;
        debug!(operation_id = %operation.id, kind = kind.as_str(), "operation made");
        Ok(operation.id)
    }
}

/// Card issued with the account, else the first one issued afterwards
fn operation_card(account: &SeedAccountResult) -> Result<String> {
    account
        .primary_card_id()
        .map(str::to_string)
        .or_else(|| account.physical_cards.first().map(|c| c.card_id.clone()))
        .or_else(|| account.virtual_cards.first().map(|c| c.card_id.clone()))
        .ok_or_else(|| SeedsError::MissingCard {
            account_id: account.account_id.clone(),
        })
}

// ============================================================================
// TESTS
// ============================================================================
