//! GuildGuard Engine - the attribution-and-response core
//!
//! For every change-event the engine runs one pass:
//!
//! 1. attribute the event to an executor via the audit trail
//! 2. exempt the designated owner and trusted principals
//! 3. gate on the per-principal cooldown (atomic check-and-record)
//! 4. ban the executor, reverting the change where possible
//! 5. emit exactly one log record for the punishment or its failure
//!
//! Every pass returns an explicit [`Verdict`]; no failure escapes the
//! handler. A permission-denied ban is a logged outcome, not an error, so
//! the engine stays live across repeated failures.
//!
//! Per principal the lifecycle is a loop: unrestricted, punished with the
//! cooldown active, unrestricted again once the window elapses.

use chrono::{DateTime, Utc};
use guildguard_audit::AuditAttributor;
use guildguard_logsink::LogSink;
use guildguard_platform::{Directory, Moderation};
use guildguard_policy::{CooldownTracker, TrustRegistry};
use guildguard_types::{ChangeEvent, ChangeKind, Principal, PrincipalId};
use std::sync::Arc;

/// Outcome of handling one change-event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The audit trail yielded no matching entry; nothing done, nothing logged
    AttributionMiss,
    /// Executor is the designated owner
    ExemptOwner { executor: PrincipalId },
    /// Executor is explicitly trusted or holds administrative capability
    ExemptTrusted { executor: PrincipalId },
    /// Executor was punished inside the cooldown window; no action, no log
    Suppressed { executor: PrincipalId },
    /// Executor was banned
    Punished { executor: PrincipalId, reason: String },
    /// The ban actuation itself failed; reported through the log sink
    PunishmentFailed { executor: PrincipalId, reason: String },
}

/// Orchestrates attribution, trust, cooldown and the punitive actuation
pub struct PunishmentEngine {
    trust: Arc<TrustRegistry>,
    cooldowns: CooldownTracker,
    attributor: AuditAttributor,
    moderation: Arc<dyn Moderation>,
    directory: Arc<dyn Directory>,
    sink: Arc<dyn LogSink>,
}

impl PunishmentEngine {
    pub fn new(
        trust: Arc<TrustRegistry>,
        cooldowns: CooldownTracker,
        attributor: AuditAttributor,
        moderation: Arc<dyn Moderation>,
        directory: Arc<dyn Directory>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            trust,
            cooldowns,
            attributor,
            moderation,
            directory,
            sink,
        }
    }

    /// Handle one change-event at the current instant
    pub async fn handle(&self, event: &ChangeEvent) -> Verdict {
        self.handle_at(event, Utc::now()).await
    }

    /// Handle one change-event with an explicit clock, for deterministic
    /// cooldown behavior in tests
    pub async fn handle_at(&self, event: &ChangeEvent, now: DateTime<Utc>) -> Verdict {
        let Some(record) = self.attributor.attribute(event).await else {
            tracing::debug!(community = %event.community, "no attribution, ignoring event");
            return Verdict::AttributionMiss;
        };
        let executor = record.executor;

        if self.trust.is_owner(executor.id) {
            return Verdict::ExemptOwner { executor: executor.id };
        }
        if self.is_trusted(event, &executor).await {
            tracing::debug!(%executor, "trusted executor, ignoring event");
            return Verdict::ExemptTrusted { executor: executor.id };
        }

        if !self.cooldowns.begin_punishment(event.community, executor.id, now) {
            return Verdict::Suppressed { executor: executor.id };
        }

        let reason = event.kind.punishment_reason();
        let ban_result = self
            .moderation
            .ban(event.community, executor.id, &reason)
            .await;

        // Revert the visible damage where the event leaves something to
        // revert: a channel created during a raid gets removed again.
        if let ChangeKind::ChannelCreated { channel, .. } = &event.kind {
            if let Err(err) = self.moderation.delete_channel(event.community, *channel).await {
                tracing::debug!(%err, "could not remove offending channel");
            }
        }

        match ban_result {
            Ok(()) => {
                tracing::info!(%executor, %reason, community = %event.community, "executor banned");
                self.sink
                    .record(
                        event.community,
                        &format!("Auto-ban: {} | {}", executor, reason),
                    )
                    .await;
                Verdict::Punished {
                    executor: executor.id,
                    reason,
                }
            }
            Err(err) => {
                tracing::warn!(%executor, %err, "ban actuation failed");
                self.sink
                    .record(
                        event.community,
                        &format!("Failed to punish {} | {} | error: {}", executor, reason, err),
                    )
                    .await;
                Verdict::PunishmentFailed {
                    executor: executor.id,
                    reason,
                }
            }
        }
    }

    /// Trust decision against live membership. A principal no longer in the
    /// community falls back to the explicit list alone.
    async fn is_trusted(&self, event: &ChangeEvent, executor: &Principal) -> bool {
        match self.directory.member(event.community, executor.id).await {
            Ok(Some(member)) => self.trust.is_trusted(event.community, &member),
            Ok(None) => self.trust.is_listed(event.community, executor.id),
            Err(err) => {
                tracing::debug!(%err, "member lookup failed, using explicit list only");
                self.trust.is_listed(event.community, executor.id)
            }
        }
    }
}
