// Gateway Seeds - CLI
// Build, inspect and export seeded fixtures for load tests

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gateway_seeds::{
    export_csv, init_tracing, open_store, scenarios, BuildOutcome, GatewayClient,
    HttpGatewayClient, InMemoryGateway, PlanFileScenario, ScenarioRunner, SeedsConfig,
    SeedsScenario, SeedsStore, StoreKind,
};

#[derive(Parser)]
#[command(name = "gateway-seeds", version, about = "Seed gateway fixtures for load tests")]
struct Cli {
    /// Gateway base URL (overrides GATEWAY_HTTP_URL)
    #[arg(long, global = true)]
    gateway_url: Option<String>,

    /// Directory for seeds dumps (overrides SEEDS_DUMPS_DIR)
    #[arg(long, global = true)]
    dumps_dir: Option<PathBuf>,

    /// Store backend: file or sqlite (overrides SEEDS_STORE)
    #[arg(long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List built-in scenarios and persisted dumps
    List,

    /// Build (or rebuild) a scenario's fixtures
    Build {
        scenario: String,

        /// JSON plan file instead of a built-in plan
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Skip when a dump built from the same plan exists
        #[arg(long)]
        if_missing: bool,

        /// Seed against an in-process gateway instead of the real one
        #[arg(long)]
        dry_run: bool,
    },

    /// Show what a persisted dump contains
    Show { scenario: String },

    /// Export a persisted dump as CSV
    Export {
        scenario: String,

        #[arg(long, short)]
        output: PathBuf,
    },

    /// Delete a persisted dump
    Delete { scenario: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SeedsConfig::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.gateway_url {
        config.gateway_url = url;
    }
    if let Some(dir) = cli.dumps_dir {
        config.sqlite_path = dir.join("seeds.db");
        config.dumps_dir = dir;
    }
    if let Some(store) = cli.store {
        config.store = store.parse::<StoreKind>()?;
    }

    init_tracing(&config);

    let store = open_store(&config).context("Failed to open seeds store")?;

    match cli.command {
        Command::List => run_list(&store),
        Command::Build {
            scenario,
            plan,
            if_missing,
            dry_run,
        } => {
            let scenario: Box<dyn SeedsScenario> = match plan {
                Some(path) => Box::new(
                    PlanFileScenario::from_file(&scenario, &path)
                        .with_context(|| format!("Failed to load plan file: {:?}", path))?,
                ),
                None => scenarios::by_name(&scenario)?,
            };

            if dry_run {
                run_build(scenario, InMemoryGateway::new(), store, if_missing)
            } else {
                let client = HttpGatewayClient::from_config(&config)
                    .context("Failed to create gateway client")?;
                run_build(scenario, client, store, if_missing)
            }
        }
        Command::Show { scenario } => run_show(&store, &scenario),
        Command::Export { scenario, output } => {
            let dump = store.load(&scenario)?;
            let count = export_csv(&dump.result, &output)
                .with_context(|| format!("Failed to write CSV: {:?}", output))?;
            println!("✓ Exported {} rows to {:?}", count, output);
            Ok(())
        }
        Command::Delete { scenario } => {
            if store.delete(&scenario)? {
                println!("✓ Deleted seeds dump '{}'", scenario);
            } else {
                println!("Nothing to delete for '{}'", scenario);
            }
            Ok(())
        }
    }
}

fn run_list(store: &dyn SeedsStore) -> Result<()> {
    let persisted = store.scenarios()?;

    println!("📚 Built-in scenarios");
    for name in scenarios::builtin_names() {
        let mark = if persisted.iter().any(|p| p.as_str() == name) { "✓" } else { " " };
        println!("  [{}] {}", mark, name);
    }

    let builtin = scenarios::builtin_names();
    let custom: Vec<&String> = persisted
        .iter()
        .filter(|p| !builtin.iter().any(|name| *name == p.as_str()))
        .collect();
    if !custom.is_empty() {
        println!("\n💾 Other persisted dumps");
        for name in custom {
            println!("  [✓] {}", name);
        }
    }

    Ok(())
}

fn run_build<C, S>(
    scenario: Box<dyn SeedsScenario>,
    client: C,
    store: S,
    if_missing: bool,
) -> Result<()>
where
    C: GatewayClient,
    S: SeedsStore,
{
    let name = scenario.name().to_string();
    let mut runner = ScenarioRunner::new(scenario, client, store)?;

    println!("🌱 Seeding scenario '{}'", name);
    let totals = if if_missing {
        match runner.build_if_missing()? {
            BuildOutcome::Built(totals) => totals,
            BuildOutcome::Reused => {
                println!("✓ Dump already matches the plan, nothing to do");
                return Ok(());
            }
        }
    } else {
        runner
            .build()
            .with_context(|| format!("Seeding '{}' failed", name))?
            .result
            .totals()
    };

    println!("✓ Users:      {}", totals.users);
    println!("✓ Accounts:   {}", totals.accounts);
    println!("✓ Cards:      {}", totals.cards);
    println!("✓ Operations: {}", totals.operations);
    Ok(())
}

fn run_show(store: &dyn SeedsStore, scenario: &str) -> Result<()> {
    let dump = store.load(scenario)?;
    let totals = dump.result.totals();

    println!("📦 {}", dump.scenario);
    println!("   built at:   {}", dump.built_at.to_rfc3339());
    println!("   plan:       {}", &dump.plan_fingerprint[..12.min(dump.plan_fingerprint.len())]);
    println!("   users:      {}", totals.users);
    println!("   accounts:   {}", totals.accounts);
    println!("   cards:      {}", totals.cards);
    println!("   operations: {}", totals.operations);

    if let Some(user) = dump.result.users.first() {
        println!("\n   first user: {}", user.user_id);
        for (kind, account) in user.all_accounts() {
            println!(
                "     {} {} ({} operations)",
                kind.as_str(),
                account.account_id,
                account.operation_ids().count()
            );
        }
    }

    Ok(())
}
