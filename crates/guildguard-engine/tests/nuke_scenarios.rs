//! End-to-end engine scenarios over the in-memory platform

use chrono::{DateTime, TimeZone, Utc};
use guildguard_audit::AuditAttributor;
use guildguard_engine::{PunishmentEngine, Verdict};
use guildguard_logsink::MemorySink;
use guildguard_platform::InMemoryPlatform;
use guildguard_policy::{CooldownTracker, TrustRegistry};
use guildguard_types::{
    AuditActionKind, ChangeEvent, ChangeKind, ChannelId, CommunityId, Member, Principal,
    PrincipalId, RoleId,
};
use std::sync::Arc;

const OWNER: PrincipalId = PrincipalId::new(1);
const GUILD: CommunityId = CommunityId::new(100);

struct Fixture {
    platform: Arc<InMemoryPlatform>,
    sink: Arc<MemorySink>,
    trust: Arc<TrustRegistry>,
    engine: PunishmentEngine,
}

fn fixture() -> Fixture {
    let platform = Arc::new(InMemoryPlatform::new());
    let sink = Arc::new(MemorySink::new());
    let trust = Arc::new(TrustRegistry::new(OWNER));
    let engine = PunishmentEngine::new(
        trust.clone(),
        CooldownTracker::new(),
        AuditAttributor::new(platform.clone()),
        platform.clone(),
        platform.clone(),
        sink.clone(),
    );
    platform.add_member(
        GUILD,
        Member::new(Principal::named(OWNER, "owner")).administrator(),
    );
    Fixture {
        platform,
        sink,
        trust,
        engine,
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn role_delete() -> ChangeEvent {
    ChangeEvent::new(
        GUILD,
        ChangeKind::RoleDeleted {
            role: RoleId::new(3),
            name: "mods".into(),
        },
    )
}

fn kick() -> ChangeEvent {
    ChangeEvent::new(
        GUILD,
        ChangeKind::MemberKicked {
            target: Principal::named(PrincipalId::new(60), "victim"),
        },
    )
}

/// Seed an audit entry attributing `event`'s kind to `executor` at `when`
fn attribute_to(fx: &Fixture, event: &ChangeEvent, executor: &Principal, when: DateTime<Utc>) {
    fx.platform.record_audit(
        GUILD,
        event.kind.audit_action(),
        executor.clone(),
        "target",
        when,
    );
}

#[tokio::test]
async fn untrusted_executor_is_banned_and_logged() {
    let fx = fixture();
    let mallory = Principal::named(PrincipalId::new(5), "mallory");
    fx.platform.add_member(GUILD, Member::new(mallory.clone()));

    let event = role_delete();
    attribute_to(&fx, &event, &mallory, at(0));

    let verdict = fx.engine.handle_at(&event, at(0)).await;

    assert_eq!(
        verdict,
        Verdict::Punished {
            executor: mallory.id,
            reason: "Unauthorized role deletion (mods)".into()
        }
    );
    assert_eq!(fx.platform.bans().len(), 1);
    assert_eq!(fx.platform.bans()[0].principal, mallory.id);

    let records = fx.sink.records_for(GUILD);
    assert_eq!(records.len(), 1);
    assert!(records[0].contains("Auto-ban"));
    assert!(records[0].contains("Unauthorized role deletion (mods)"));
}

// P1: N >= 2 events inside the window yield exactly one punishment.
#[tokio::test]
async fn repeat_offense_inside_window_is_suppressed() {
    let fx = fixture();
    let mallory = Principal::named(PrincipalId::new(5), "mallory");
    fx.platform.add_member(GUILD, Member::new(mallory.clone()));

    let first = role_delete();
    attribute_to(&fx, &first, &mallory, at(0));
    fx.engine.handle_at(&first, at(0)).await;

    let second = kick();
    attribute_to(&fx, &second, &mallory, at(5));
    let verdict = fx.engine.handle_at(&second, at(5)).await;

    assert_eq!(verdict, Verdict::Suppressed { executor: mallory.id });
    assert_eq!(fx.platform.bans().len(), 1);
    // suppression is silent: still only the first record
    assert_eq!(fx.sink.records_for(GUILD).len(), 1);
}

// P4: a qualifying event at T+15s is punished again.
#[tokio::test]
async fn cooldown_expiry_allows_second_punishment() {
    let fx = fixture();
    let mallory = Principal::named(PrincipalId::new(5), "mallory");
    fx.platform.add_member(GUILD, Member::new(mallory.clone()));

    let first = role_delete();
    attribute_to(&fx, &first, &mallory, at(0));
    fx.engine.handle_at(&first, at(0)).await;

    let second = kick();
    attribute_to(&fx, &second, &mallory, at(15));
    let verdict = fx.engine.handle_at(&second, at(15)).await;

    assert!(matches!(verdict, Verdict::Punished { .. }));
    assert_eq!(fx.platform.bans().len(), 2);
}

// P2: trusted executors are never punished and never logged.
#[tokio::test]
async fn explicitly_trusted_executor_is_exempt() {
    let fx = fixture();
    let friend = Principal::named(PrincipalId::new(6), "friend");
    fx.platform.add_member(GUILD, Member::new(friend.clone()));
    fx.trust.grant(OWNER, GUILD, friend.id).unwrap();

    let event = role_delete();
    attribute_to(&fx, &event, &friend, at(0));
    let verdict = fx.engine.handle_at(&event, at(0)).await;

    assert_eq!(verdict, Verdict::ExemptTrusted { executor: friend.id });
    assert!(fx.platform.bans().is_empty());
    assert!(fx.sink.records().is_empty());
}

#[tokio::test]
async fn administrator_is_exempt_via_live_membership() {
    let fx = fixture();
    let admin = Principal::named(PrincipalId::new(7), "admin");
    fx.platform
        .add_member(GUILD, Member::new(admin.clone()).administrator());

    let event = role_delete();
    attribute_to(&fx, &event, &admin, at(0));
    let verdict = fx.engine.handle_at(&event, at(0)).await;

    assert_eq!(verdict, Verdict::ExemptTrusted { executor: admin.id });
    assert!(fx.platform.bans().is_empty());
}

// P3: the owner is exempt independent of trust-set membership.
#[tokio::test]
async fn owner_is_exempt_without_trust_listing() {
    let fx = fixture();
    let owner = Principal::named(OWNER, "owner");

    let event = role_delete();
    attribute_to(&fx, &event, &owner, at(0));
    let verdict = fx.engine.handle_at(&event, at(0)).await;

    assert_eq!(verdict, Verdict::ExemptOwner { executor: OWNER });
    assert!(fx.platform.bans().is_empty());
    assert!(fx.sink.records().is_empty());
}

// P7: an empty audit trail means no actuation and no log record.
#[tokio::test]
async fn attribution_miss_is_silent() {
    let fx = fixture();

    let verdict = fx.engine.handle_at(&role_delete(), at(0)).await;

    assert_eq!(verdict, Verdict::AttributionMiss);
    assert!(fx.platform.bans().is_empty());
    assert!(fx.sink.records().is_empty());
}

#[tokio::test]
async fn denied_audit_query_is_silent() {
    let fx = fixture();
    let mallory = Principal::named(PrincipalId::new(5), "mallory");
    let event = role_delete();
    attribute_to(&fx, &event, &mallory, at(0));
    fx.platform.deny_audit(true);

    let verdict = fx.engine.handle_at(&event, at(0)).await;

    assert_eq!(verdict, Verdict::AttributionMiss);
    assert!(fx.platform.bans().is_empty());
}

// P9: a denied ban becomes one failure record; the engine stays live.
#[tokio::test]
async fn failed_ban_is_logged_and_engine_stays_live() {
    let fx = fixture();
    let mallory = Principal::named(PrincipalId::new(5), "mallory");
    fx.platform.add_member(GUILD, Member::new(mallory.clone()));
    fx.platform.deny_bans(true);

    let event = role_delete();
    attribute_to(&fx, &event, &mallory, at(0));
    let verdict = fx.engine.handle_at(&event, at(0)).await;

    assert!(matches!(verdict, Verdict::PunishmentFailed { .. }));
    let records = fx.sink.records_for(GUILD);
    assert_eq!(records.len(), 1);
    assert!(records[0].contains("Failed to punish"));

    // the cooldown was still recorded; the engine handles the next event
    fx.platform.deny_bans(false);
    let second = kick();
    attribute_to(&fx, &second, &mallory, at(20));
    let verdict = fx.engine.handle_at(&second, at(20)).await;
    assert!(matches!(verdict, Verdict::Punished { .. }));
}

#[tokio::test]
async fn created_channel_is_reverted() {
    let fx = fixture();
    let mallory = Principal::named(PrincipalId::new(5), "mallory");
    fx.platform.add_member(GUILD, Member::new(mallory.clone()));
    let raid_channel = ChannelId::new(31);
    fx.platform.add_channel(GUILD, raid_channel, "raid-announce");

    let event = ChangeEvent::new(
        GUILD,
        ChangeKind::ChannelCreated {
            channel: raid_channel,
            name: "raid-announce".into(),
        },
    );
    attribute_to(&fx, &event, &mallory, at(0));
    let verdict = fx.engine.handle_at(&event, at(0)).await;

    assert!(matches!(verdict, Verdict::Punished { .. }));
    assert_eq!(fx.platform.deleted_channels(), vec![(GUILD, raid_channel)]);
}

// The worked scenario: role deletion at t=0 bans U1; a kick at t=5 is
// suppressed with no second ban and no second record.
#[tokio::test]
async fn scenario_role_delete_then_kick() {
    let fx = fixture();
    let u1 = Principal::named(PrincipalId::new(42), "U1");
    fx.platform.add_member(GUILD, Member::new(u1.clone()));

    let event = role_delete();
    attribute_to(&fx, &event, &u1, at(0));
    let verdict = fx.engine.handle_at(&event, at(0)).await;
    assert_eq!(
        verdict,
        Verdict::Punished {
            executor: u1.id,
            reason: "Unauthorized role deletion (mods)".into()
        }
    );

    let second = kick();
    attribute_to(&fx, &second, &u1, at(5));
    let verdict = fx.engine.handle_at(&second, at(5)).await;
    assert_eq!(verdict, Verdict::Suppressed { executor: u1.id });

    assert_eq!(fx.platform.bans().len(), 1);
    assert_eq!(fx.sink.records_for(GUILD).len(), 1);
}

// Two communities, one executor: no cooldown or trust bleed between them.
#[tokio::test]
async fn communities_are_isolated() {
    let fx = fixture();
    let other = CommunityId::new(200);
    let mallory = Principal::named(PrincipalId::new(5), "mallory");
    fx.platform.add_member(GUILD, Member::new(mallory.clone()));
    fx.platform.add_member(other, Member::new(mallory.clone()));

    let here = role_delete();
    attribute_to(&fx, &here, &mallory, at(0));
    fx.engine.handle_at(&here, at(0)).await;

    let there = ChangeEvent::new(
        other,
        ChangeKind::RoleDeleted {
            role: RoleId::new(9),
            name: "mods".into(),
        },
    );
    fx.platform
        .record_audit(other, AuditActionKind::RoleDelete, mallory.clone(), "mods", at(2));
    let verdict = fx.engine.handle_at(&there, at(2)).await;

    // same executor, different community: punished there too
    assert!(matches!(verdict, Verdict::Punished { .. }));
    assert_eq!(fx.platform.bans().len(), 2);
}
