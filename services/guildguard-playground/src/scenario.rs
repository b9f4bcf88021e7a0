//! Scripted raid scenario
//!
//! Seeds one community on the in-memory platform and replays a short raid:
//! link spam, a role deletion, a rapid follow-up kick, owner commands and a
//! trusted cleanup. Every verdict path of the engine and the content guard
//! shows up in the resulting security log.

use crate::service::GatewayEvent;
use chrono::Utc;
use guildguard_platform::InMemoryPlatform;
use guildguard_types::{
    ChangeEvent, ChangeKind, ChannelId, CommunityId, Member, MessageEvent, MessageId, Principal,
    PrincipalId, RoleId,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const GUILD: CommunityId = CommunityId::new(1000);
pub const GENERAL: ChannelId = ChannelId::new(10);

const MODERATOR: PrincipalId = PrincipalId::new(20);
const MALLORY: PrincipalId = PrincipalId::new(30);
const SPAMMER: PrincipalId = PrincipalId::new(40);
const INTRUDER: PrincipalId = PrincipalId::new(50);

/// Populate the demo community
pub fn seed(platform: &InMemoryPlatform, owner: PrincipalId) {
    platform.add_channel(GUILD, GENERAL, "general");
    platform.add_member(
        GUILD,
        Member::new(Principal::named(owner, "owner")).administrator(),
    );
    platform.add_member(GUILD, Member::new(Principal::named(MODERATOR, "moderator")));
    platform.add_member(GUILD, Member::new(Principal::named(MALLORY, "mallory")));
    platform.add_member(GUILD, Member::new(Principal::named(SPAMMER, "spammer")));
    platform.add_member(GUILD, Member::new(Principal::named(INTRUDER, "intruder")));
}

/// Replay the raid script into the gateway
pub async fn replay(
    platform: Arc<InMemoryPlatform>,
    events: mpsc::Sender<GatewayEvent>,
    owner: PrincipalId,
) {
    let mut next_message = 1u64;
    let mut message = |author: Principal, content: &str| {
        let event = GatewayEvent::Message(MessageEvent {
            community: GUILD,
            channel: GENERAL,
            message: MessageId::new(next_message),
            author,
            content: content.to_string(),
        });
        next_message += 1;
        event
    };

    let steps = vec![
        // link spam from an untrusted member: deleted + timed out
        message(
            Principal::named(SPAMMER, "spammer"),
            "free nitro at http://totally.legit/claim",
        ),
        // the owner delegates cleanup to the moderator
        message(
            Principal::named(owner, "owner"),
            &format!("!trust add {}", MODERATOR),
        ),
        // an intruder tries the same and is denied
        message(
            Principal::named(INTRUDER, "intruder"),
            &format!("!trust add {}", INTRUDER),
        ),
        // mallory nukes a role: attributed, banned
        change(platform.as_ref(), MALLORY, ChangeKind::RoleDeleted {
            role: RoleId::new(7),
            name: "mods".into(),
        }),
        // rapid follow-up kick lands inside the cooldown: suppressed
        change(platform.as_ref(), MALLORY, ChangeKind::MemberKicked {
            target: Principal::named(SPAMMER, "spammer"),
        }),
        // the now-trusted moderator deletes a channel: exempt
        change(platform.as_ref(), MODERATOR, ChangeKind::ChannelDeleted {
            channel: ChannelId::new(11),
            name: "raid-leftovers".into(),
        }),
        // owner inspects the state
        message(Principal::named(owner, "owner"), "!trust show"),
        message(Principal::named(owner, "owner"), "!showlog"),
    ];

    for step in steps {
        if events.send(step).await.is_err() {
            return;
        }
        // keep the script ordering stable across the spawned handlers
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Record the audit entry the platform would write, then emit the event
fn change(platform: &InMemoryPlatform, executor: PrincipalId, kind: ChangeKind) -> GatewayEvent {
    let label = match executor {
        MODERATOR => "moderator",
        MALLORY => "mallory",
        _ => "someone",
    };
    let event = ChangeEvent::new(GUILD, kind);
    platform.record_audit(
        GUILD,
        event.kind.audit_action(),
        Principal::named(executor, label),
        "scenario target",
        Utc::now(),
    );
    GatewayEvent::Change(event)
}
