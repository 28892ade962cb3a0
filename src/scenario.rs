// 🎬 Seeds Scenario - a named plan and its NOT_BUILT → BUILT → LOADED lifecycle

use tracing::{info, warn};

use crate::builder::SeedsBuilder;
use crate::error::{Result, SeedsError};
use crate::fixtures::SeedsFixtures;
use crate::gateway::GatewayClient;
use crate::plan::{PlanTotals, SeedsPlan};
use crate::store::{validate_scenario_name, SeedsDump, SeedsStore};

/// A named seeding plan; the name keys the persisted dump
pub trait SeedsScenario {
    fn name(&self) -> &str;

    fn plan(&self) -> SeedsPlan;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioState {
    /// No dump persisted
    NotBuilt,
    /// Dump persisted, not loaded by this runner
    Built,
    /// Dump loaded into fixtures by this runner
    Loaded,
}

/// Outcome of `build_if_missing`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Built(PlanTotals),
    Reused,
}

/// Binds a scenario to a gateway client and a store
pub struct ScenarioRunner<C, S> {
    scenario: Box<dyn SeedsScenario>,
    client: C,
    store: S,
    loaded: bool,
}

impl<C: GatewayClient, S: SeedsStore> ScenarioRunner<C, S> {
    pub fn new(scenario: Box<dyn SeedsScenario>, client: C, store: S) -> Result<Self> {
        validate_scenario_name(scenario.name())?;
        Ok(ScenarioRunner {
            scenario,
            client,
            store,
            loaded: false,
        })
    }

    pub fn name(&self) -> &str {
        self.scenario.name()
    }

    pub fn plan(&self) -> SeedsPlan {
        self.scenario.plan()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> Result<ScenarioState> {
        if self.loaded {
            return Ok(ScenarioState::Loaded);
        }
        if self.store.exists(self.scenario.name())? {
            Ok(ScenarioState::Built)
        } else {
            Ok(ScenarioState::NotBuilt)
        }
    }

    /// Regenerate fixtures from scratch and overwrite the persisted dump
    ///
    /// Nothing is persisted if any gateway call fails.
    pub fn build(&mut self) -> Result<SeedsDump> {
        let plan = self.scenario.plan();
        info!(scenario = self.scenario.name(), "seeding scenario");

        let result = SeedsBuilder::new(&self.client).build(&plan)?;
        let dump = SeedsDump::new(self.scenario.name(), &plan, result);
        self.store.save(&dump)?;
        self.loaded = false;

        Ok(dump)
    }

    /// Build only when no dump exists or it was built from a different plan
    pub fn build_if_missing(&mut self) -> Result<BuildOutcome> {
        let plan = self.scenario.plan();
        if self.store.exists(self.scenario.name())? {
            match self.store.load(self.scenario.name()) {
                Ok(dump) if dump.built_from(&plan) => {
                    info!(scenario = self.scenario.name(), "reusing persisted seeds");
                    return Ok(BuildOutcome::Reused);
                }
                Ok(_) => {
                    info!(scenario = self.scenario.name(), "plan changed, rebuilding seeds");
                }
                Err(SeedsError::Serialization(e)) => {
                    warn!(
                        scenario = self.scenario.name(),
                        error = %e,
                        "persisted seeds unreadable, rebuilding"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let dump = self.build()?;
        Ok(BuildOutcome::Built(dump.result.totals()))
    }

    /// Load the persisted dump as fixtures; fails with `NotBuilt` before a build
    pub fn load(&mut self) -> Result<SeedsFixtures> {
        let dump = self.store.load(self.scenario.name())?;
        self.loaded = true;
        Ok(SeedsFixtures::from_dump(dump))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeedsError;
    use crate::gateway::schema::{AccountKind, OperationKind};
    use crate::gateway::InMemoryGateway;
    use crate::plan::{SeedAccountsPlan, SeedUsersPlan};
    use crate::store::{FileSeedsStore, SqliteSeedsStore};
    use rusqlite::Connection;

    struct TwoUsers {
        purchases: u32,
    }

    impl SeedsScenario for TwoUsers {
        fn name(&self) -> &str {
            "two_users"
        }

        fn plan(&self) -> SeedsPlan {
            SeedsPlan::new(SeedUsersPlan::new(2).with_accounts(
                AccountKind::DebitCard,
                SeedAccountsPlan::new(1).with_operations(OperationKind::Purchase, self.purchases),
            ))
        }
    }

    fn store() -> SqliteSeedsStore {
        SqliteSeedsStore::with_connection(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn test_lifecycle() {
        let gateway = InMemoryGateway::new();
        let mut runner =
            ScenarioRunner::new(Box::new(TwoUsers { purchases: 3 }), &gateway, store()).unwrap();

        assert_eq!(runner.state().unwrap(), ScenarioState::NotBuilt);
        assert!(matches!(runner.load(), Err(SeedsError::NotBuilt { .. })));

        runner.build().unwrap();
        assert_eq!(runner.state().unwrap(), ScenarioState::Built);

        let fixtures = runner.load().unwrap();
        assert_eq!(runner.state().unwrap(), ScenarioState::Loaded);
        assert_eq!(fixtures.len(), 2);

        let user = fixtures.get_next_user().unwrap();
        assert_eq!(user.debit_card_accounts[0].purchase_operations.len(), 3);
        assert!(fixtures.result().matches_plan(&runner.plan()));
    }

    #[test]
    fn test_rebuild_overwrites() {
        let gateway = InMemoryGateway::new();
        let mut runner =
            ScenarioRunner::new(Box::new(TwoUsers { purchases: 1 }), &gateway, store()).unwrap();

        let first = runner.build().unwrap();
        let second = runner.build().unwrap();
        let loaded = runner.load().unwrap();

        assert_ne!(first.result, second.result);
        assert_eq!(loaded.result(), &second.result);
    }

    #[test]
    fn test_build_if_missing_reuses_matching_dump() {
        let gateway = InMemoryGateway::new();
        let mut runner =
            ScenarioRunner::new(Box::new(TwoUsers { purchases: 2 }), &gateway, store()).unwrap();

        assert!(matches!(
            runner.build_if_missing().unwrap(),
            BuildOutcome::Built(_)
        ));
        let calls = gateway.creation_calls();
        assert_eq!(runner.build_if_missing().unwrap(), BuildOutcome::Reused);
        assert_eq!(gateway.creation_calls(), calls);
    }

    #[test]
    fn test_build_if_missing_rebuilds_on_plan_change() {
        let gateway = InMemoryGateway::new();
        let store = store();

        let mut runner =
            ScenarioRunner::new(Box::new(TwoUsers { purchases: 1 }), &gateway, &store).unwrap();
        runner.build().unwrap();

        let mut runner =
            ScenarioRunner::new(Box::new(TwoUsers { purchases: 4 }), &gateway, &store).unwrap();
        match runner.build_if_missing().unwrap() {
            BuildOutcome::Built(totals) => assert_eq!(totals.operations, 8),
            BuildOutcome::Reused => panic!("plan changed, dump must be rebuilt"),
        }
    }

    #[test]
    fn test_failed_build_persists_nothing() {
        let gateway = InMemoryGateway::failing_after(3);
        let mut runner =
            ScenarioRunner::new(Box::new(TwoUsers { purchases: 2 }), &gateway, store()).unwrap();

        assert!(runner.build().is_err());
        assert_eq!(runner.state().unwrap(), ScenarioState::NotBuilt);
    }

    #[test]
    fn test_build_if_missing_rebuilds_unreadable_dump() {
        let gateway = InMemoryGateway::new();
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeedsStore::new(dir.path()).unwrap();
        std::fs::write(store.path_for("two_users"), "{ not json").unwrap();

        let mut runner =
            ScenarioRunner::new(Box::new(TwoUsers { purchases: 1 }), &gateway, &store).unwrap();
        assert!(matches!(
            runner.build_if_missing().unwrap(),
            BuildOutcome::Built(_)
        ));
        assert!(runner.load().unwrap().result().matches_plan(&runner.plan()));
    }
}
