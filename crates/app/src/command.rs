use std::fmt;

/// One line of learner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(String),
    Guest,
    Topics,
    Start(String),
    Next,
    Answer(String),
    Narrate,
    Voice(bool),
    Back,
    Logout,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument { command: &'static str, expected: &'static str },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(word) => write!(f, "unknown command: {word} (try `help`)"),
            CommandError::MissingArgument { command, expected } => {
                write!(f, "{command} needs {expected}")
            }
        }
    }
}

impl std::error::Error for CommandError {}

/// Parse a line. Blank lines yield `Ok(None)`.
///
/// Answers keep their text exactly as typed after the first space, since
/// multiple-choice answers are compared verbatim.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }
    let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));

    let command = match word.to_ascii_lowercase().as_str() {
        "login" => Command::Login(required(rest.trim(), "login", "a name")?),
        "guest" => Command::Guest,
        "topics" => Command::Topics,
        "start" => Command::Start(required(rest.trim(), "start", "a topic id")?),
        "next" => Command::Next,
        "answer" => Command::Answer(required(rest, "answer", "an answer")?),
        "narrate" => Command::Narrate,
        "voice" => match rest.trim() {
            "on" => Command::Voice(true),
            "off" => Command::Voice(false),
            _ => {
                return Err(CommandError::MissingArgument {
                    command: "voice",
                    expected: "`on` or `off`",
                });
            }
        },
        "back" => Command::Back,
        "logout" => Command::Logout,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

fn required(value: &str, command: &'static str, expected: &'static str) -> Result<String, CommandError> {
    if value.trim().is_empty() {
        return Err(CommandError::MissingArgument { command, expected });
    }
    Ok(value.to_string())
}

pub fn print_help() {
    println!("Commands:");
    println!("  login <name>       sign in (your progress is kept under this name)");
    println!("  guest              sign in as a guest");
    println!("  topics             list the topics");
    println!("  start <topic-id>   open a lesson");
    println!("  next               next slide");
    println!("  answer <text>      answer the current quiz question");
    println!("  narrate            stop or replay narration");
    println!("  voice on|off       turn narration on or off");
    println!("  back               return to your topics");
    println!("  logout             sign out");
    println!("  quit               leave Math Academy");
}
