//! Command recognition for inbound text

use crate::state_machine::Event;

/// Commands the bot understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    BeginExpense,
    Other(String),
}

/// Parse a `/command`, ignoring arguments and any `@botname` suffix.
/// Returns `None` for free text.
pub fn parse_command(text: &str) -> Option<Command> {
    let rest = text.strip_prefix('/')?;
    let token = rest.split_whitespace().next().unwrap_or_default();
    let name = token.split('@').next().unwrap_or_default().to_lowercase();

    Some(match name.as_str() {
        "start" => Command::Start,
        "gasto" | "expense" => Command::BeginExpense,
        _ => Command::Other(name),
    })
}

/// Turn a text message into a state machine event
pub fn classify(text: String, initiator_name: Option<String>) -> Event {
    match parse_command(&text) {
        Some(Command::Start) => Event::Start,
        Some(Command::BeginExpense) => Event::BeginExpense { initiator_name },
        Some(Command::Other(name)) => Event::OtherCommand { name },
        None => Event::Text { text },
    }
}
