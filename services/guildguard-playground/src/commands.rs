//! Owner command surface
//!
//! Commands arrive as ordinary chat messages with a configurable prefix.
//! Parsing and execution are separate so the parser can be tested without a
//! platform; execution replies in the channel the command came from.

use guildguard_logsink::{ChannelBindings, ChannelLogSink};
use guildguard_platform::Directory;
use guildguard_policy::TrustRegistry;
use guildguard_types::{ChannelId, GuardError, MessageEvent, PrincipalId, Result};
use std::sync::Arc;

/// A parsed owner-surface command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bind the community's log destination
    SetLog { channel: ChannelId },
    /// Show the currently resolved log destination
    ShowLog,
    /// Add a principal to the community trust list
    TrustAdd { principal: PrincipalId },
    /// Remove a principal from the community trust list
    TrustRemove { principal: PrincipalId },
    /// List the community trust list
    TrustShow,
}

/// Parse a message into a command.
///
/// `None` means the text is not a command at all (wrong prefix, or an
/// unknown verb, which the guard treats as ordinary chat). `Some(Err(..))`
/// means a recognized verb with unusable arguments.
pub fn parse(prefix: &str, content: &str) -> Option<Result<Command>> {
    let rest = content.strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();
    match words.next()? {
        "setlog" => Some(parse_channel_arg(words.next())),
        "showlog" => Some(Ok(Command::ShowLog)),
        "trust" => match words.next() {
            Some("add") => Some(parse_principal_arg(words.next(), |principal| {
                Command::TrustAdd { principal }
            })),
            Some("remove") => Some(parse_principal_arg(words.next(), |principal| {
                Command::TrustRemove { principal }
            })),
            Some("show") => Some(Ok(Command::TrustShow)),
            _ => Some(Err(GuardError::InvalidCommand(
                "usage: trust add <id> | trust remove <id> | trust show".into(),
            ))),
        },
        _ => None,
    }
}

fn parse_channel_arg(arg: Option<&str>) -> Result<Command> {
    let raw = arg.ok_or_else(|| GuardError::InvalidCommand("usage: setlog <channel-id>".into()))?;
    // accept both a raw id and a #-prefixed mention
    let raw = raw.trim_start_matches('#');
    raw.parse::<ChannelId>()
        .map(|channel| Command::SetLog { channel })
        .map_err(|_| GuardError::InvalidCommand(format!("not a channel id: {}", raw)))
}

fn parse_principal_arg(
    arg: Option<&str>,
    build: impl FnOnce(PrincipalId) -> Command,
) -> Result<Command> {
    let raw = arg.ok_or_else(|| GuardError::InvalidCommand("usage: trust <add|remove> <id>".into()))?;
    raw.parse::<PrincipalId>()
        .map(build)
        .map_err(|_| GuardError::InvalidCommand(format!("not a principal id: {}", raw)))
}

/// Executes commands and replies in the originating channel
pub struct CommandHandler {
    trust: Arc<TrustRegistry>,
    bindings: Arc<ChannelBindings>,
    log_sink: Arc<ChannelLogSink>,
    directory: Arc<dyn Directory>,
}

impl CommandHandler {
    pub fn new(
        trust: Arc<TrustRegistry>,
        bindings: Arc<ChannelBindings>,
        log_sink: Arc<ChannelLogSink>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            trust,
            bindings,
            log_sink,
            directory,
        }
    }

    /// Execute a command and reply. Replies are best-effort.
    pub async fn handle(&self, message: &MessageEvent, command: Command) {
        let reply = match self.execute(message, command).await {
            Ok(text) => text,
            Err(err) if err.is_user_facing() => format!("Denied: {}", err),
            Err(err) => {
                tracing::warn!(%err, "command execution failed");
                "Command failed.".to_string()
            }
        };
        if let Err(err) = self.directory.send_message(message.channel, &reply).await {
            tracing::debug!(%err, "could not deliver command reply");
        }
    }

    /// Reply to a recognized verb whose arguments did not parse
    pub async fn handle_parse_failure(&self, message: &MessageEvent, err: GuardError) {
        if let Err(send_err) = self
            .directory
            .send_message(message.channel, &err.to_string())
            .await
        {
            tracing::debug!(%send_err, "could not deliver parse-failure reply");
        }
    }

    async fn execute(&self, message: &MessageEvent, command: Command) -> Result<String> {
        let actor = message.author.id;
        let community = message.community;
        match command {
            Command::SetLog { channel } => {
                if !self.trust.is_owner(actor) {
                    return Err(GuardError::unauthorized(
                        "only the owner may configure the log channel",
                    ));
                }
                let exists = self.directory.channel_exists(community, channel).await?;
                if !exists {
                    return Err(GuardError::ChannelNotFound { channel });
                }
                self.bindings.set(community, channel);
                Ok(format!("Log channel set to {}", channel))
            }
            Command::ShowLog => match self.log_sink.resolve(community).await {
                Some(channel) => Ok(format!("Current log channel is {}", channel)),
                None => Ok("No log channel found.".to_string()),
            },
            Command::TrustAdd { principal } => {
                self.trust.grant(actor, community, principal)?;
                Ok(format!("{} added to the trust list.", principal))
            }
            Command::TrustRemove { principal } => {
                self.trust.revoke(actor, community, principal)?;
                Ok(format!("{} removed from the trust list.", principal))
            }
            Command::TrustShow => {
                let ids = self.trust.trusted_ids(community);
                if ids.is_empty() {
                    Ok("Trust list is empty.".to_string())
                } else {
                    let listed: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                    Ok(format!("Trusted ids: {}", listed.join(", ")))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setlog() {
        assert_eq!(
            parse("!", "!setlog 42").unwrap().unwrap(),
            Command::SetLog {
                channel: ChannelId::new(42)
            }
        );
        assert_eq!(
            parse("!", "!setlog #42").unwrap().unwrap(),
            Command::SetLog {
                channel: ChannelId::new(42)
            }
        );
    }

    #[test]
    fn test_parse_trust_commands() {
        assert_eq!(
            parse("!", "!trust add 7").unwrap().unwrap(),
            Command::TrustAdd {
                principal: PrincipalId::new(7)
            }
        );
        assert_eq!(
            parse("!", "!trust remove 7").unwrap().unwrap(),
            Command::TrustRemove {
                principal: PrincipalId::new(7)
            }
        );
        assert_eq!(parse("!", "!trust show").unwrap().unwrap(), Command::TrustShow);
    }

    #[test]
    fn test_non_commands_are_ignored() {
        assert!(parse("!", "hello there").is_none());
        assert!(parse("!", "!unknown verb").is_none());
    }

    #[test]
    fn test_bad_arguments_are_invalid() {
        assert!(matches!(
            parse("!", "!setlog notanumber"),
            Some(Err(GuardError::InvalidCommand(_)))
        ));
        assert!(matches!(
            parse("!", "!trust add"),
            Some(Err(GuardError::InvalidCommand(_)))
        ));
        assert!(matches!(
            parse("!", "!trust frobnicate 7"),
            Some(Err(GuardError::InvalidCommand(_)))
        ));
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(parse("?", "?showlog").unwrap().unwrap(), Command::ShowLog);
        assert!(parse("?", "!showlog").is_none());
    }
}
