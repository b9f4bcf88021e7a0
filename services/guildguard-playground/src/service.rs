//! Gateway dispatch
//!
//! One logical stream of events arrives from the platform gateway; every
//! event is handled on its own task. Handlers recover all their failures
//! internally, so nothing an event does can stop the loop.

use crate::commands::{self, CommandHandler};
use guildguard_engine::PunishmentEngine;
use guildguard_guard::ContentGuard;
use guildguard_types::{ChangeEvent, MessageEvent};
use std::sync::Arc;
use tokio::sync::mpsc;

/// An event delivered by the platform gateway
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// An administrative change observed in a community
    Change(ChangeEvent),
    /// A posted message
    Message(MessageEvent),
}

/// The wired guard: engine, content guard and command surface
pub struct GuardService {
    engine: PunishmentEngine,
    content: ContentGuard,
    commands: CommandHandler,
    prefix: String,
}

impl GuardService {
    pub fn new(
        engine: PunishmentEngine,
        content: ContentGuard,
        commands: CommandHandler,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            content,
            commands,
            prefix: prefix.into(),
        }
    }

    /// Route one gateway event to the right policy
    pub async fn dispatch(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::Change(change) => {
                let verdict = self.engine.handle(&change).await;
                tracing::debug!(?verdict, community = %change.community, "change handled");
            }
            GatewayEvent::Message(message) => self.dispatch_message(message).await,
        }
    }

    async fn dispatch_message(&self, message: MessageEvent) {
        match commands::parse(&self.prefix, &message.content) {
            Some(Ok(command)) => self.commands.handle(&message, command).await,
            Some(Err(err)) => {
                // recognized verb, unusable arguments: tell the invoker
                self.commands
                    .handle_parse_failure(&message, err)
                    .await;
            }
            None => {
                let verdict = self.content.inspect(&message).await;
                tracing::debug!(?verdict, author = %message.author, "message inspected");
            }
        }
    }
}

/// Drain the gateway, one task per event, until the channel closes
pub async fn run(service: Arc<GuardService>, mut events: mpsc::Receiver<GatewayEvent>) {
    let mut handlers = Vec::new();
    while let Some(event) = events.recv().await {
        let service = service.clone();
        handlers.push(tokio::spawn(async move {
            service.dispatch(event).await;
        }));
    }
    for handle in handlers {
        if let Err(err) = handle.await {
            tracing::error!(%err, "event handler panicked");
        }
    }
}
