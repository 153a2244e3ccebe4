pub const HELP_TEXT: &str = r"Commands:
  /help   Show this help
  /clear  Start a new conversation
  /exit   Quit
Start a message with // to send text that begins with /.
Keys: Enter send · Shift+Enter newline · PgUp/PgDn scroll · Esc dismiss · Ctrl+C quit";

pub const SLASH_COMMANDS: &[&str] = &["/help", "/clear", "/exit"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Clear,
    Exit,
    Unknown(String),
}

impl SlashCommand {
    pub fn parse(input: &str) -> Self {
        let cmd = input.split_whitespace().next().unwrap_or("");
        match cmd {
            "/help" | "/?" => Self::Help,
            "/clear" | "/new" => Self::Clear,
            "/exit" | "/quit" => Self::Exit,
            _ => Self::Unknown(cmd.to_string()),
        }
    }
}

/// What a submitted line is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Command(SlashCommand),
    Chat(String),
}

impl Submission {
    /// Only a `/word` token (letters, digits, `-`, `?`) is read as a command.
    /// Paths and other slash-led text go to the assistant, and a leading `//`
    /// sends the rest with one slash.
    pub fn classify(input: &str) -> Self {
        if let Some(escaped) = input.strip_prefix("//") {
            return Self::Chat(format!("/{escaped}"));
        }

        let token = input.split_whitespace().next().unwrap_or("");
        let looks_like_command = token.len() > 1
            && token.starts_with('/')
            && token[1..]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '?');

        if looks_like_command {
            Self::Command(SlashCommand::parse(input))
        } else {
            Self::Chat(input.to_string())
        }
    }

    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(self, Self::Command(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_aliases() {
        assert_eq!(SlashCommand::parse("/help"), SlashCommand::Help);
        assert_eq!(SlashCommand::parse("/clear "), SlashCommand::Clear);
        assert_eq!(SlashCommand::parse("/new"), SlashCommand::Clear);
        assert_eq!(SlashCommand::parse("/quit now"), SlashCommand::Exit);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            SlashCommand::parse("/model gemini-2.5-pro"),
            SlashCommand::Unknown("/model".to_string())
        );
    }

    #[test]
    fn test_every_suggestion_parses() {
        for cmd in SLASH_COMMANDS {
            assert!(!matches!(SlashCommand::parse(cmd), SlashCommand::Unknown(_)));
        }
    }

    #[test]
    fn test_classify_commands() {
        assert_eq!(
            Submission::classify("/clear"),
            Submission::Command(SlashCommand::Clear)
        );
        assert_eq!(
            Submission::classify("/model gemini-2.5-pro"),
            Submission::Command(SlashCommand::Unknown("/model".to_string()))
        );
        assert!(Submission::classify("/?").is_command());
    }

    #[test]
    fn test_classify_slash_led_text_is_chat() {
        assert_eq!(
            Submission::classify("/etc/hosts format?"),
            Submission::Chat("/etc/hosts format?".to_string())
        );
        assert_eq!(
            Submission::classify("/ is the root"),
            Submission::Chat("/ is the root".to_string())
        );
        assert_eq!(
            Submission::classify("What is Firebase?"),
            Submission::Chat("What is Firebase?".to_string())
        );
    }

    #[test]
    fn test_classify_double_slash_escape() {
        assert_eq!(
            Submission::classify("//help me with routing"),
            Submission::Chat("/help me with routing".to_string())
        );
    }
}
