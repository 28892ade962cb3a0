// Gateway Seeds - Fixture Server
// Serves persisted seeds to load-test workers running in other processes

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use gateway_seeds::server::{router, AppState};
use gateway_seeds::{init_tracing, open_store, SeedsConfig, SeedsFixtures};

#[derive(Parser)]
#[command(name = "seeds-server", version, about = "Serve seeded fixtures over HTTP")]
struct Args {
    /// Scenarios to load (default: every persisted dump)
    scenarios: Vec<String>,

    /// Listen address (overrides SEEDS_SERVER_ADDR)
    #[arg(long)]
    addr: Option<std::net::SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = SeedsConfig::from_env().context("Failed to load configuration")?;
    if let Some(addr) = args.addr {
        config.server_addr = addr;
    }
    init_tracing(&config);

    let store = open_store(&config).context("Failed to open seeds store")?;
    let names = if args.scenarios.is_empty() {
        store.scenarios()?
    } else {
        args.scenarios
    };
    if names.is_empty() {
        bail!("No seeds dumps found in {:?}; run `gateway-seeds build <scenario>` first", config.dumps_dir);
    }

    let mut fixtures = Vec::with_capacity(names.len());
    for name in &names {
        let dump = store
            .load(name)
            .with_context(|| format!("Failed to load seeds for '{}'", name))?;
        info!(scenario = %name, users = dump.result.users.len(), "fixtures loaded");
        fixtures.push(SeedsFixtures::from_dump(dump));
    }

    let app = router(AppState::new(fixtures));

    let listener = tokio::net::TcpListener::bind(config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;

    info!(addr = %config.server_addr, scenarios = names.len(), "fixture server running");
    println!("\n🚀 Fixture server running on http://{}", config.server_addr);
    println!("   API: http://{}/api/seeds", config.server_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Fixture server failed")?;

    Ok(())
}
