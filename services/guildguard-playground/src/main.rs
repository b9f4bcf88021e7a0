//! GuildGuard Playground - the wired guard with an in-process raid scenario
//!
//! Boots the full guard stack (trust registry, cooldown tracker, audit
//! attributor, punishment engine, content guard, log sink, command surface)
//! against the in-memory platform and replays a scripted raid through it,
//! then prints the resulting security log.
//!
//! # Quick Start
//!
//! ```bash
//! GUILDGUARD_TOKEN=dev-token guildguard-playground --owner 1
//!
//! # with a persisted trust list
//! GUILDGUARD_TOKEN=dev-token guildguard-playground --owner 1 --trust-store trust.json
//! ```

mod commands;
mod scenario;
mod service;

use anyhow::{bail, Context};
use clap::Parser;
use commands::CommandHandler;
use guildguard_audit::AuditAttributor;
use guildguard_engine::PunishmentEngine;
use guildguard_guard::{ContentGuard, ContentGuardConfig};
use guildguard_logsink::{ChannelBindings, ChannelLogSink};
use guildguard_platform::InMemoryPlatform;
use guildguard_policy::{CooldownTracker, TrustRegistry, TrustStore};
use guildguard_types::{PrincipalId, DEFAULT_LOG_CHANNEL};
use service::GuardService;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// GuildGuard - automated guard for multi-tenant chat communities
#[derive(Parser, Debug)]
#[command(
    name = "guildguard-playground",
    about = "GuildGuard - community raid guard, wired against an in-process platform",
    version
)]
struct Args {
    /// Platform authentication token
    #[arg(long, env = "GUILDGUARD_TOKEN", hide_env_values = true)]
    token: String,

    /// Designated owner principal id
    #[arg(long, env = "GUILDGUARD_OWNER")]
    owner: PrincipalId,

    /// Fallback log channel name
    #[arg(long, default_value = DEFAULT_LOG_CHANNEL)]
    log_channel: String,

    /// Persist the trust list to this JSON snapshot
    #[arg(long, env = "GUILDGUARD_TRUST_STORE")]
    trust_store: Option<PathBuf>,

    /// Command prefix for the owner surface
    #[arg(long, default_value = "!")]
    prefix: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if args.token.trim().is_empty() {
        bail!("platform token must not be empty");
    }

    let trust = match &args.trust_store {
        Some(path) => TrustRegistry::with_store(args.owner, TrustStore::new(path))
            .context("loading trust snapshot")?,
        None => TrustRegistry::new(args.owner),
    };
    let trust = Arc::new(trust);

    tracing::info!(owner = %args.owner, "bootstrapping guard service");

    let platform = Arc::new(InMemoryPlatform::new());
    scenario::seed(&platform, args.owner);

    let bindings = Arc::new(ChannelBindings::new());
    let log_sink = Arc::new(ChannelLogSink::with_channel_name(
        platform.clone(),
        bindings.clone(),
        args.log_channel.as_str(),
    ));

    let engine = PunishmentEngine::new(
        trust.clone(),
        CooldownTracker::new(),
        AuditAttributor::new(platform.clone()),
        platform.clone(),
        platform.clone(),
        log_sink.clone(),
    );
    let content = ContentGuard::new(
        ContentGuardConfig::default(),
        platform.clone(),
        platform.clone(),
        log_sink.clone(),
    );
    let command_handler = CommandHandler::new(
        trust.clone(),
        bindings.clone(),
        log_sink.clone(),
        platform.clone(),
    );

    let guard = Arc::new(GuardService::new(
        engine,
        content,
        command_handler,
        args.prefix.clone(),
    ));

    let (events_tx, events_rx) = mpsc::channel(64);
    let dispatcher = tokio::spawn(service::run(guard, events_rx));

    tracing::info!("replaying raid scenario");
    scenario::replay(platform.clone(), events_tx, args.owner).await;
    // sender dropped; the dispatcher drains remaining handlers and exits
    dispatcher.await.context("dispatch loop failed")?;

    print_outcome(&platform, &args.log_channel);
    Ok(())
}

fn print_outcome(platform: &InMemoryPlatform, log_channel: &str) {
    println!("=== bans ===");
    for ban in platform.bans() {
        println!("{} banned: {}", ban.principal, ban.reason);
    }
    println!("=== timeouts ===");
    for timeout in platform.timeouts() {
        println!(
            "{} timed out {} min: {}",
            timeout.principal,
            timeout.duration.num_minutes(),
            timeout.reason
        );
    }
    println!("=== #{} ===", log_channel);
    if let Some(channel) = platform.has_channel_named(scenario::GUILD, log_channel) {
        for line in platform.messages_in(channel) {
            println!("{}", line);
        }
    } else {
        println!("(no log channel was provisioned)");
    }
    println!("=== #general replies ===");
    for line in platform.messages_in(scenario::GENERAL) {
        println!("{}", line);
    }
}
