//! Chat command surface: `/adddomain`, `/checkdomain`, `/checklist`, `/help`,
//! `/setcredentials`.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandKind {
    AddDomain,
    CheckDomain,
    CheckList,
    Help,
    SetCredentials,
    Unknown(String),
}

impl CommandKind {
    /// Match a command name. Case, `-` and `_` are ignored, so `add-domain`,
    /// `add_domain` and `AddDomain` are the same command.
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "adddomain" => Self::AddDomain,
            "checkdomain" => Self::CheckDomain,
            "checklist" => Self::CheckList,
            "help" | "start" => Self::Help,
            "setcredentials" => Self::SetCredentials,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

/// A parsed inbound command, queued for the monitor loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub args: Vec<String>,
}

impl Command {
    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.args.get(idx).map(String::as_str)
    }
}

/// Parse `/cmd@botname arg1 arg2 ...`. Returns `None` for non-command text.
pub fn parse_command(text: &str) -> Option<Command> {
    let mut parts = text.split_whitespace();
    let first = parts.next()?.strip_prefix('/')?;

    let name = first.split('@').next().unwrap_or("");
    if name.is_empty() {
        return None;
    }

    Some(Command {
        kind: CommandKind::from_name(name),
        args: parts.map(str::to_string).collect(),
    })
}

pub const USAGE_MESSAGE: &str = "Usage:
1. /adddomain <domain>: Add a new domain to be monitored.
2. /checkdomain <domain>: Check if a specific domain is online.
3. /checklist: Check all domains in the domain list.
4. /help: Show this help message.
5. /setcredentials <token> <chat_id>: Set the bot token and chat ID.
";
