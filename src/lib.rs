// Gateway Seeds - Core Library
// Seeding plans, the builder that realises them against the gateway, and the
// persisted fixtures load-test workers draw users from.

pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod fakers;
pub mod fixtures;
pub mod gateway;
pub mod plan;
pub mod result;
pub mod scenario;
pub mod scenarios;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use builder::SeedsBuilder;
pub use config::{init_tracing, LogFormat, SeedsConfig, StoreKind};
pub use error::{Result, SeedsError};
pub use export::{export_csv, write_csv, FixtureRow};
pub use fakers::Fake;
pub use fixtures::SeedsFixtures;
pub use gateway::{
    AccountKind, CardKind, GatewayClient, HttpGatewayClient, InMemoryGateway, OperationKind,
    OperationStatus,
};
pub use plan::{
    PlanTotals, SeedAccountsPlan, SeedCardsPlan, SeedOperationsPlan, SeedUsersPlan, SeedsPlan,
};
pub use result::{
    SeedAccountResult, SeedCardResult, SeedOperationResult, SeedUserResult, SeedsResult,
};
pub use scenario::{BuildOutcome, ScenarioRunner, ScenarioState, SeedsScenario};
pub use scenarios::{BuiltinScenario, PlanFileScenario};
pub use store::{open_store, FileSeedsStore, SeedsDump, SeedsStore, SqliteSeedsStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
