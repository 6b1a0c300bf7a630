use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use docubrain_application::{ChatUseCase, SendOutcome};
use docubrain_core::config::{AppConfig, ConfigOverrides};
use docubrain_core::session::Message;
use docubrain_infrastructure::{ConfigService, DocubrainPaths, JsonFileSessionStore};
use docubrain_interaction::QaApiClient;

mod commands;
mod helper;
mod render;
mod spinner;

use commands::{Command, ReplInput, parse_line, resolve_target};
use helper::CliHelper;
use spinner::Spinner;

const LOG_FILE_PREFIX: &str = "docubrain.log";

#[derive(Parser)]
#[command(name = "docubrain")]
#[command(about = "DocuBrain - ask questions about your documents", long_about = None)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the QA backend (overrides DOCUBRAIN_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Directory for session history and logs (overrides DOCUBRAIN_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            data_dir: self.data_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ===== Configuration =====
    let config_service = match &cli.config {
        Some(path) => ConfigService::new(path.clone()),
        None => ConfigService::at_default_location()?,
    };
    let config = config_service
        .load()?
        .with_overrides(ConfigService::env_overrides().merge(cli.overrides()));
    let data_dir = DocubrainPaths::resolve_data_dir(config.storage.data_dir.as_deref())?;

    let _log_guard = init_logging(&config, &data_dir)?;
    info!("[Bootstrap] Config loaded from {}", config_service.path().display());
    info!("[Bootstrap] Data directory: {}", data_dir.display());

    // ===== Backend Initialization =====
    let store = Arc::new(JsonFileSessionStore::in_dir(&data_dir));
    let qa_client = Arc::new(QaApiClient::from_config(&config.api));
    if qa_client.base_url().is_none() {
        info!("[Bootstrap] No QA backend URL configured");
    }
    let mut chat = ChatUseCase::open(store, qa_client).await;
    info!("[Bootstrap] {} session(s) restored", chat.sessions().sessions().len());

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== DocuBrain ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a question, end a line with '\\' to continue it, '/help' for commands, or 'quit' to exit."
            .bright_black()
    );
    println!();
    print_active_session(&chat);

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let input = parse_line(&line);
                if input != ReplInput::Empty {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match input {
                    ReplInput::Empty => continue,
                    ReplInput::Message(text) => {
                        chat.set_input(text);
                        send(&mut chat).await;
                    }
                    ReplInput::Command(Command::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ReplInput::Command(command) => run_command(&mut chat, command).await,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    info!("[Shutdown] REPL closed");
    Ok(())
}

/// Installs a file subscriber so log lines never interleave with the REPL.
fn init_logging(config: &AppConfig, data_dir: &std::path::Path) -> Result<WorkerGuard> {
    let logs_dir = DocubrainPaths::logs_dir_in(data_dir);
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

async fn send(chat: &mut ChatUseCase) {
    if !chat.can_send() {
        return;
    }

    let spinner = Spinner::start("Thinking...");
    let outcome = chat.send().await;
    spinner.finish_and_clear();

    let Some(outcome) = outcome else {
        return;
    };
    if let SendOutcome::Failed { error, .. } = &outcome {
        eprintln!("{}", render::failure_notice(error).bright_black());
    }
    if let Some(reply) = chat
        .sessions()
        .find(outcome.session_id())
        .and_then(|session| session.messages.last())
    {
        print_message(reply);
    }
}

async fn run_command(chat: &mut ChatUseCase, command: Command) {
    match command {
        Command::New => {
            chat.new_chat().await;
            print_active_session(chat);
        }
        Command::List => print_session_list(chat),
        Command::Switch(arg) => match resolve_target(chat.sessions().sessions(), &arg) {
            Some(id) => {
                chat.select_chat(&id);
                print_active_session(chat);
            }
            None => println!("{}", format!("No session matches '{}'", arg).yellow()),
        },
        Command::Delete(arg) => match resolve_target(chat.sessions().sessions(), &arg) {
            Some(id) => {
                chat.delete_chat(&id).await;
                println!("{}", "Session deleted.".bright_black());
                print_session_list(chat);
            }
            None => println!("{}", format!("No session matches '{}'", arg).yellow()),
        },
        Command::History => print_active_session(chat),
        Command::Help => print_help(),
        Command::MissingArgument(name) => {
            println!("{}", format!("Usage: {} <n|id>", name).yellow());
        }
        Command::Unknown(name) => {
            println!("{}", format!("Unknown command: {} (try /help)", name).bright_black());
        }
        Command::Quit => {}
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    for (usage, about) in [
        ("/new", "start a new chat"),
        ("/list", "list chats (* marks the active one)"),
        ("/switch <n|id>", "open a chat by position or id"),
        ("/delete <n|id>", "delete a chat by position or id"),
        ("/history", "show the active chat"),
        ("/help", "show this help"),
        ("/quit", "exit (also 'quit' or 'exit')"),
    ] {
        println!("  {} {}", format!("{:<16}", usage).bright_cyan(), about);
    }
    println!("{}", "Input:".bright_yellow());
    println!("  End a line with '\\' to continue on the next line; end it with '\\\\' for a literal backslash.");
    println!("  Start a line with '//' to send text that begins with '/'.");
    println!("  A line that is exactly 'quit' or 'exit' always exits.");
}

fn print_session_list(chat: &ChatUseCase) {
    let sessions = chat.sessions();
    for line in render::session_list(sessions.sessions(), sessions.active_session_id()) {
        println!("{}", line);
    }
}

fn print_active_session(chat: &ChatUseCase) {
    let Some(session) = chat.active_session() else {
        return;
    };
    println!("{}", format!("# {}", session.title).bright_magenta().bold());
    for message in &session.messages {
        print_message(message);
    }
}

fn print_message(message: &Message) {
    let speaker = render::speaker(message);
    if message.is_user() {
        println!("{}", format!("[{}]", speaker).green());
        for line in message.content.lines() {
            println!("{}", line.green());
        }
    } else {
        println!("{}", format!("[{}]", speaker).bright_magenta());
        for line in message.content.lines() {
            println!("{}", line.bright_blue());
        }
        for line in render::sources_block(message.cited_sources()) {
            println!("{}", line.bright_black());
        }
    }
    println!();
}
