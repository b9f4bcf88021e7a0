//! GuildGuard ContentGuard - link-pattern message policy
//!
//! A policy independent of the audit-based punishment flow: scan posted
//! messages for HTTP(S) links and time the author out unless exempt.
//!
//! The check is purely textual. URLs are never fetched or resolved, domains
//! are not inspected, and any `http(s)://` substring counts, including inside
//! code blocks. False positives there are an accepted limitation.

use chrono::Duration;
use guildguard_logsink::LogSink;
use guildguard_platform::{Directory, Moderation};
use guildguard_types::{MessageEvent, PrincipalId, RoleId, CONTENT_TIMEOUT_SECS};
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

static URL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Whether the text contains an HTTP(S) URL-looking substring
pub fn contains_url(text: &str) -> bool {
    URL_PATTERN
        .get_or_init(|| Regex::new(r"(?i)\bhttps?://\S+").expect("url pattern is valid"))
        .is_match(text)
}

/// Configuration for the content guard
#[derive(Debug, Clone)]
pub struct ContentGuardConfig {
    /// Role whose holders may post links
    pub safe_role: Option<RoleId>,
    /// Principals who may post links regardless of roles
    pub safe_ids: HashSet<PrincipalId>,
    /// Timeout applied to non-exempt authors
    pub timeout: Duration,
}

impl Default for ContentGuardConfig {
    fn default() -> Self {
        Self {
            safe_role: None,
            safe_ids: HashSet::new(),
            timeout: Duration::seconds(CONTENT_TIMEOUT_SECS),
        }
    }
}

/// Outcome of inspecting one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentVerdict {
    /// Author is a bot/automation principal; never inspected
    Automated,
    /// No disallowed pattern in the message
    Clean,
    /// Pattern matched but the author is exempt
    Exempt,
    /// Pattern matched and actuation was attempted
    Violation { deleted: bool, timed_out: bool },
}

/// Message-content policy sharing the log sink with the punishment engine
pub struct ContentGuard {
    config: ContentGuardConfig,
    moderation: Arc<dyn Moderation>,
    directory: Arc<dyn Directory>,
    sink: Arc<dyn LogSink>,
}

impl ContentGuard {
    pub fn new(
        config: ContentGuardConfig,
        moderation: Arc<dyn Moderation>,
        directory: Arc<dyn Directory>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            config,
            moderation,
            directory,
            sink,
        }
    }

    /// Inspect one message and act on violations.
    ///
    /// Delete and timeout are each best-effort; a failed actuation is noted
    /// in the verdict and the rest of the flow continues. Exactly one log
    /// record is emitted per violation.
    pub async fn inspect(&self, event: &MessageEvent) -> ContentVerdict {
        if event.author.is_automated {
            return ContentVerdict::Automated;
        }
        if !contains_url(&event.content) {
            return ContentVerdict::Clean;
        }
        if self.is_exempt(event).await {
            return ContentVerdict::Exempt;
        }

        let deleted = match self
            .moderation
            .delete_message(event.channel, event.message)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "could not delete link message");
                false
            }
        };

        let timed_out = match self
            .moderation
            .timeout(
                event.community,
                event.author.id,
                self.config.timeout,
                "Posting links without permission",
            )
            .await
        {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "could not time out link author");
                false
            }
        };

        let minutes = self.config.timeout.num_minutes();
        self.sink
            .record(
                event.community,
                &format!(
                    "Link blocked: {} timed out for {} min | message removed: {}",
                    event.author, minutes, deleted
                ),
            )
            .await;

        ContentVerdict::Violation { deleted, timed_out }
    }

    /// Safe-id set first, then the safe role against live membership
    async fn is_exempt(&self, event: &MessageEvent) -> bool {
        if self.config.safe_ids.contains(&event.author.id) {
            return true;
        }
        let Some(safe_role) = self.config.safe_role else {
            return false;
        };
        match self.directory.member(event.community, event.author.id).await {
            Ok(Some(member)) => member.holds_role(safe_role),
            Ok(None) => false,
            Err(err) => {
                tracing::debug!(%err, "member lookup failed during exemption check");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guildguard_logsink::MemorySink;
    use guildguard_platform::InMemoryPlatform;
    use guildguard_types::{ChannelId, CommunityId, Member, MessageId, Principal};

    const GUILD: CommunityId = CommunityId::new(1);
    const CHAT: ChannelId = ChannelId::new(20);
    const SAFE_ROLE: RoleId = RoleId::new(500);

    struct Fixture {
        platform: Arc<InMemoryPlatform>,
        sink: Arc<MemorySink>,
        guard: ContentGuard,
    }

    fn fixture(config: ContentGuardConfig) -> Fixture {
        let platform = Arc::new(InMemoryPlatform::new());
        platform.add_channel(GUILD, CHAT, "general");
        let sink = Arc::new(MemorySink::new());
        let guard = ContentGuard::new(config, platform.clone(), platform.clone(), sink.clone());
        Fixture {
            platform,
            sink,
            guard,
        }
    }

    fn message(author: Principal, content: &str) -> MessageEvent {
        MessageEvent {
            community: GUILD,
            channel: CHAT,
            message: MessageId::new(777),
            author,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_url_pattern() {
        assert!(contains_url("see http://foo.bar/x now"));
        assert!(contains_url("HTTPS://EXAMPLE.COM"));
        assert!(!contains_url("no links here"));
        assert!(!contains_url("http:/not-a-url"));
        assert!(!contains_url("ftp://old.school"));
    }

    #[tokio::test]
    async fn test_violation_deletes_times_out_and_logs_once() {
        let fx = fixture(ContentGuardConfig::default());
        let author = Principal::named(PrincipalId::new(5), "spammer");
        fx.platform
            .add_member(GUILD, Member::new(author.clone()));

        let verdict = fx
            .guard
            .inspect(&message(author, "free stuff http://foo.bar/x"))
            .await;

        assert_eq!(
            verdict,
            ContentVerdict::Violation {
                deleted: true,
                timed_out: true
            }
        );
        assert_eq!(fx.platform.deleted_messages().len(), 1);
        let timeouts = fx.platform.timeouts();
        assert_eq!(timeouts.len(), 1);
        assert_eq!(timeouts[0].duration, Duration::seconds(600));
        assert_eq!(fx.sink.records_for(GUILD).len(), 1);
    }

    #[tokio::test]
    async fn test_clean_message_is_untouched() {
        let fx = fixture(ContentGuardConfig::default());
        let author = Principal::named(PrincipalId::new(5), "casual");
        fx.platform.add_member(GUILD, Member::new(author.clone()));

        let verdict = fx.guard.inspect(&message(author, "hello all")).await;

        assert_eq!(verdict, ContentVerdict::Clean);
        assert!(fx.platform.deleted_messages().is_empty());
        assert!(fx.sink.records().is_empty());
    }

    #[tokio::test]
    async fn test_automated_author_is_ignored() {
        let fx = fixture(ContentGuardConfig::default());
        let bot = Principal::automated(PrincipalId::new(5), "webhook");

        let verdict = fx
            .guard
            .inspect(&message(bot, "https://example.com"))
            .await;

        assert_eq!(verdict, ContentVerdict::Automated);
        assert!(fx.platform.timeouts().is_empty());
    }

    #[tokio::test]
    async fn test_safe_role_holder_is_exempt() {
        let config = ContentGuardConfig {
            safe_role: Some(SAFE_ROLE),
            ..Default::default()
        };
        let fx = fixture(config);
        let author = Principal::named(PrincipalId::new(5), "curator");
        fx.platform.add_member(
            GUILD,
            Member::new(author.clone()).with_role(SAFE_ROLE),
        );

        let verdict = fx
            .guard
            .inspect(&message(author, "https://example.com"))
            .await;

        assert_eq!(verdict, ContentVerdict::Exempt);
        assert!(fx.platform.deleted_messages().is_empty());
        assert!(fx.platform.timeouts().is_empty());
        assert!(fx.sink.records().is_empty());
    }

    #[tokio::test]
    async fn test_safe_id_is_exempt_without_membership() {
        let author = Principal::named(PrincipalId::new(5), "vip");
        let config = ContentGuardConfig {
            safe_ids: [author.id].into_iter().collect(),
            ..Default::default()
        };
        let fx = fixture(config);

        let verdict = fx
            .guard
            .inspect(&message(author, "https://example.com"))
            .await;

        assert_eq!(verdict, ContentVerdict::Exempt);
        assert!(fx.sink.records().is_empty());
    }

    #[tokio::test]
    async fn test_failed_timeout_still_logs_once() {
        // author not a member, so the timeout actuation fails
        let fx = fixture(ContentGuardConfig::default());
        let author = Principal::named(PrincipalId::new(5), "ghost");

        let verdict = fx
            .guard
            .inspect(&message(author, "http://foo.bar/x"))
            .await;

        assert_eq!(
            verdict,
            ContentVerdict::Violation {
                deleted: true,
                timed_out: false
            }
        );
        assert_eq!(fx.sink.records_for(GUILD).len(), 1);
    }
}
