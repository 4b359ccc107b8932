use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use meshlink::PeerId;
use meshlink::client::{
    LocalBus, LoggingPresenter, Mesh, MeshConfig, MeshHandle, MeshServices, NegotiationState,
    StaticMediaSource, TransportConfig, WebRtcTransportFactory, WsBus,
};
use meshlink::model::IceServerConfig;
use meshlink::utils::{DEFAULT_CANDIDATE_BATCH_MS, DEFAULT_CHANNEL, DEFAULT_STUN_ADDR};
use meshlink::relay::{DEFAULT_RELAY_ADDR, RelayConfig};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

const DEFAULT_RELAY_URL: &str = "ws://127.0.0.1:3000";

#[derive(Parser)]
#[command(name = "meshlink", version, about = "Full-mesh calls over a shared topic")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the topic relay.
    Relay {
        #[arg(long, env = "MESHLINK_RELAY_ADDR", default_value = DEFAULT_RELAY_ADDR)]
        addr: String,
    },

    /// Join a call as one participant with synthetic media, until Ctrl-C.
    Join {
        #[arg(long, env = "MESHLINK_URL", default_value = DEFAULT_RELAY_URL)]
        url: String,

        #[arg(long, env = "MESHLINK_CHANNEL", default_value = DEFAULT_CHANNEL)]
        channel: String,

        #[arg(long, env = "MESHLINK_BATCH_WINDOW_MS", default_value_t = DEFAULT_CANDIDATE_BATCH_MS)]
        batch_window_ms: u64,

        #[arg(long, env = "MESHLINK_STUN", default_value = DEFAULT_STUN_ADDR)]
        stun: String,
    },

    /// Run several participants in-process and report whether they all negotiated.
    Demo {
        #[arg(short, long, default_value_t = 3)]
        participants: usize,

        #[arg(long, default_value_t = 20)]
        timeout_secs: u64,

        /// STUN server; host candidates only when omitted.
        #[arg(long, env = "MESHLINK_STUN")]
        stun: Option<String>,

        /// Print the final states as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Commands::Relay { addr } => {
            println!("{} {}", "📡 Relay listening on".green().bold(), addr);
            meshlink::relay::serve(RelayConfig { addr }).await?;
        }

        Commands::Join {
            url,
            channel,
            batch_window_ms,
            stun,
        } => {
            let config = MeshConfig {
                channel,
                candidate_batch_window: Duration::from_millis(batch_window_ms),
                transport: TransportConfig {
                    ice_servers: vec![IceServerConfig::stun(stun)],
                },
                ..MeshConfig::default()
            };
            run_join(&url, config).await?;
        }

        Commands::Demo {
            participants,
            timeout_secs,
            stun,
            json,
        } => {
            let transport = TransportConfig {
                ice_servers: stun.into_iter().map(IceServerConfig::stun).collect(),
            };
            run_demo(participants, Duration::from_secs(timeout_secs), transport, json).await?;
        }
    }

    Ok(())
}

async fn run_join(url: &str, config: MeshConfig) -> Result<()> {
    let (bus, inbound) = WsBus::connect(url, &config.channel, &config.event_name)
        .await
        .with_context(|| format!("Failed to subscribe to {}", url))?;

    let local_id = PeerId::new();
    println!(
        "{} {} {} {}",
        "🔗 Joining".green().bold(),
        config.channel.cyan(),
        "as".green().bold(),
        local_id.to_string().cyan()
    );

    let services = MeshServices {
        signaling: Arc::new(bus),
        transports: Arc::new(WebRtcTransportFactory::new(config.transport.clone())?),
        media: Arc::new(StaticMediaSource::new(local_id.to_string())),
        presenter: Arc::new(LoggingPresenter::new()),
    };
    let (mesh, handle) = Mesh::new(config, local_id, services, inbound);
    let mut task = tokio::spawn(mesh.run());

    tokio::select! {
        res = &mut task => {
            res?.context("Mesh stopped")?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("{}", "👋 Leaving...".yellow());
            handle.shutdown().await?;
            task.await?.context("Mesh stopped")?;
        }
    }

    Ok(())
}

async fn run_demo(
    participants: usize,
    timeout: Duration,
    transport: TransportConfig,
    json: bool,
) -> Result<()> {
    anyhow::ensure!(participants >= 2, "a demo needs at least 2 participants");
    println!(
        "{} {}",
        "🚀 Starting demo with".green().bold(),
        format!("{participants} participants").cyan()
    );

    let bus = LocalBus::new();
    let factory = Arc::new(WebRtcTransportFactory::new(transport.clone())?);
    let mut handles: Vec<MeshHandle> = Vec::new();
    let mut tasks: Vec<JoinHandle<meshlink::client::Result<()>>> = Vec::new();

    for _ in 0..participants {
        let local_id = PeerId::new();
        let services = MeshServices {
            signaling: Arc::new(bus.clone()),
            transports: factory.clone(),
            media: Arc::new(StaticMediaSource::new(local_id.to_string())),
            presenter: Arc::new(LoggingPresenter::new()),
        };
        let config = MeshConfig {
            transport: transport.clone(),
            ..MeshConfig::default()
        };
        let (mesh, handle) = Mesh::new(config, local_id, services, bus.subscribe());
        tasks.push(tokio::spawn(mesh.run()));
        handles.push(handle);
    }

    let deadline = tokio::time::Instant::now() + timeout;
    let mut snapshot = collect_states(&handles).await?;
    while !all_stable(&snapshot, participants) && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(200)).await;
        snapshot = collect_states(&handles).await?;
    }
    // One more batch window so late candidates are applied before the report.
    tokio::time::sleep(Duration::from_millis(DEFAULT_CANDIDATE_BATCH_MS * 2)).await;
    snapshot = collect_states(&handles).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state_report(&snapshot))?);
    } else {
        print_table(&snapshot);
    }

    for handle in &handles {
        handle.shutdown().await?;
    }
    for task in tasks {
        task.await?.context("Participant stopped")?;
    }

    if all_stable(&snapshot, participants) {
        println!("{}", "✨ Every pair negotiated.".green().bold());
        Ok(())
    } else {
        anyhow::bail!("not every pair reached Stable within {:?}", timeout)
    }
}

type StateSnapshot = Vec<(PeerId, HashMap<PeerId, NegotiationState>)>;

async fn collect_states(handles: &[MeshHandle]) -> Result<StateSnapshot> {
    let mut snapshot = Vec::with_capacity(handles.len());
    for handle in handles {
        let states = handle.peer_states().await?;
        snapshot.push((handle.local_id().clone(), states));
    }
    Ok(snapshot)
}

fn all_stable(snapshot: &StateSnapshot, participants: usize) -> bool {
    snapshot.iter().all(|(_, states)| {
        states.len() == participants - 1
            && states.values().all(|s| *s == NegotiationState::Stable)
    })
}

/// Local id -> remote id -> state, sorted for stable output.
fn state_report(snapshot: &StateSnapshot) -> BTreeMap<&PeerId, BTreeMap<&PeerId, NegotiationState>> {
    snapshot
        .iter()
        .map(|(local_id, states)| {
            let peers = states.iter().map(|(peer_id, state)| (peer_id, *state)).collect();
            (local_id, peers)
        })
        .collect()
}

fn print_table(snapshot: &StateSnapshot) {
    println!("{}", "📋 Negotiation states".cyan().bold());
    for (local_id, states) in snapshot {
        println!("   {}", short(local_id).bold());
        let mut peers: Vec<_> = states.iter().collect();
        peers.sort_by(|a, b| a.0.cmp(b.0));
        for (peer_id, state) in peers {
            let label = format!("{:?}", state);
            let label = if *state == NegotiationState::Stable {
                label.green()
            } else {
                label.yellow()
            };
            println!("     -> {}  {}", short(peer_id), label);
        }
    }
}

fn short(peer_id: &PeerId) -> String {
    peer_id.as_str().chars().take(8).collect()
}
