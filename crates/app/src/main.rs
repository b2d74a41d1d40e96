use std::fmt;
use std::sync::Arc;

use academy_core::curriculum::{curriculum, find_topic};
use academy_core::model::{MasteryTier, QuestionKind, TopicId};
use services::{
    AppServices, Clock, MutedPlayer, SessionConfig, SessionController, SessionError, SessionState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

mod command;

use command::Command;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    db_url: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://academy.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ACADEMY_DB_URL, ACADEMY_AI_API_KEY, ACADEMY_AI_BASE_URL, ACADEMY_AI_MODEL,");
    eprintln!("  ACADEMY_TTS_MODEL, ACADEMY_TTS_VOICE, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("ACADEMY_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("sqlite://academy.sqlite3".into()), normalize_sqlite_url);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("app=info,services=info,storage=info"));

    // Stdout belongs to the learner.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

// ─── Rendering ─────────────────────────────────────────────────────────────────

fn render(controller: &mut SessionController) {
    if let Some(notice) = controller.take_notice() {
        println!("! {notice}");
    }

    match controller.state() {
        SessionState::LoggedOut => {
            println!("Welcome to Math Academy! Type `login <name>` or `guest` to start.");
        }
        SessionState::Dashboard => render_dashboard(controller),
        SessionState::LessonLoading { topic } => println!("Sparky is writing a lesson on {}...", topic.title()),
        SessionState::QuizLoading { topic, .. } => println!("Sparky is building a quiz on {}...", topic.title()),
        SessionState::LessonActive { lesson, .. } => {
            let (number, total) = controller.lesson_progress().unwrap_or((0, lesson.len()));
            println!("{} (slide {number}/{total})", lesson.title());
            if let Some(slide) = controller.current_slide() {
                println!("  {}", slide.content);
            }
            println!("Type `next` to continue, `narrate` to hear it again, `back` to leave.");
        }
        SessionState::QuizActive { quiz, .. } => {
            if let Some(feedback) = quiz.feedback() {
                let mark = if feedback.correct { "Correct!" } else { "Check this:" };
                println!("{mark} {}", feedback.message);
                return;
            }
            let Some(question) = quiz.current_question() else {
                return;
            };
            println!(
                "Question {}/{}: {}",
                quiz.current_index() + 1,
                quiz.total(),
                question.prompt
            );
            match &question.kind {
                QuestionKind::MultipleChoice { options, .. } => {
                    for option in options {
                        println!("  - {option}");
                    }
                }
                QuestionKind::OpenResponse { .. } => println!("  (explain in your own words)"),
            }
            println!("Type `answer <text>`.");
        }
        SessionState::QuizCompleted {
            correct,
            total,
            score,
            ..
        } => {
            println!("Quiz complete! You got {correct} out of {total} ({score}).");
            println!("Type `back` to return to your topics.");
        }
    }
}

fn render_dashboard(controller: &SessionController) {
    let Some(learner) = controller.learner() else {
        return;
    };
    println!("{} Hi, {}!", learner.avatar(), learner.display_name());
    let badges = learner.display_badges();
    if !badges.is_empty() {
        println!("Badges: {}", badges.join("  "));
    }
    let Ok(entries) = controller.dashboard() else {
        return;
    };
    for entry in entries {
        let band = match entry.tier {
            MasteryTier::NotStarted => "not started",
            MasteryTier::InProgress => "in progress",
            MasteryTier::Mastered => "mastered",
        };
        println!(
            "  {:<8} {:<6} {:<32} {:>4}  {band}",
            entry.topic.id().as_str(),
            entry.topic.code(),
            entry.topic.title(),
            entry.mastery.to_string(),
        );
    }
    println!("Type `start <topic-id>` to begin a lesson.");
}

// ─── Input loop ────────────────────────────────────────────────────────────────

enum Input {
    AdvanceDue,
    Line(Option<String>),
}

/// Returns `false` when the learner asked to quit.
async fn handle(controller: &mut SessionController, command: Command) -> Result<bool, SessionError> {
    match command {
        Command::Login(name) => {
            controller.login(&name, false).await?;
        }
        Command::Guest => {
            controller.login("", true).await?;
        }
        Command::Topics => {
            for topic in curriculum() {
                println!("  {:<8} {:<6} {}", topic.id().as_str(), topic.code(), topic.title());
            }
        }
        Command::Help => command::print_help(),
        Command::Start(id) => {
            let Some(topic) = find_topic(&TopicId::new(id.as_str())) else {
                println!("! No topic called {id}. Type `topics` to list them.");
                return Ok(true);
            };
            controller.select_topic(topic).await?;
        }
        Command::Next => controller.advance().await?,
        Command::Answer(text) => {
            controller.submit_answer(&text).await?;
        }
        Command::Narrate => controller.toggle_narration().await?,
        Command::Voice(enabled) => {
            controller.set_voice_enabled(enabled).await?;
            println!("Voice {}.", if enabled { "on" } else { "off" });
        }
        Command::Back => controller.return_to_dashboard().await?,
        Command::Logout => controller.logout().await?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_logging();

    // Create the parent directory here so services never touch the filesystem layout.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default()).await?;
    if !services.provider_enabled() {
        eprintln!("ACADEMY_AI_API_KEY is not set; lessons and quizzes cannot be generated.");
    }
    let mut controller = services
        .session(Arc::new(MutedPlayer), SessionConfig::default())
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render(&mut controller);

    loop {
        let pending = controller.pending_advance();
        let deadline = pending.map_or_else(tokio::time::Instant::now, |p| p.deadline());
        let input = tokio::select! {
            () = tokio::time::sleep_until(deadline), if pending.is_some() => Input::AdvanceDue,
            line = lines.next_line() => Input::Line(line?),
        };

        match input {
            Input::AdvanceDue => {
                if let Some(scheduled) = pending {
                    controller.fire_advance(scheduled.ticket()).await?;
                }
            }
            Input::Line(None) => break,
            Input::Line(Some(line)) => match command::parse(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => match handle(&mut controller, command).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) => {
                        tracing::debug!(error = %err, "command rejected");
                        println!("! {err}");
                    }
                },
                Err(err) => {
                    println!("! {err}");
                    continue;
                }
            },
        }
        render(&mut controller);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_urls_are_made_absolute() {
        let url = normalize_sqlite_url("sqlite:data/academy.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/academy.sqlite3"));
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/a.sqlite3".into()),
            "sqlite:///tmp/a.sqlite3"
        );
    }

    #[test]
    fn db_flag_requires_a_value() {
        let mut args = vec!["--db".to_string()].into_iter();
        assert!(matches!(
            Args::parse(&mut args),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));

        let mut args = vec!["--verbose".to_string()].into_iter();
        assert!(matches!(Args::parse(&mut args), Err(ArgsError::UnknownArg(_))));
    }
}
