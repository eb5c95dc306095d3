//! Careerbot - career guidance chat in the terminal

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use careerbot::chat::{ChatLoop, InMemoryHistory, Outcome, SessionId, TranscriptEntry, assemble};
use careerbot::config::Config;
use careerbot::error::Result;
use careerbot::knowledge;
use careerbot::model::{build_model, load_env_file};

/// Used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "warn,careerbot=info";

/// Careerbot - career advice for undergraduates, powered by a hosted LLM
#[derive(Parser)]
#[command(name = "careerbot")]
#[command(about = "Career guidance chatbot for undergraduates")]
#[command(version)]
pub struct Cli {
    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Session key for conversation history, any non-empty string (overrides config)
    #[arg(long, short = 's', global = true)]
    pub session: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Chat with the advisor (default command)
    Chat,

    /// List the majors in the knowledge table
    Majors {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the prompt that would be sent, without calling the model
    Prompt {
        /// Academic major
        #[arg(long, short = 'm')]
        major: String,

        /// Career question
        #[arg(long, short = 'q')]
        question: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    load_env_file(None);
    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!("Config loaded: {:?}", config);

    match cli.command {
        None | Some(Command::Chat) => chat(config, cli.session).await,
        Some(Command::Majors { json }) => majors(json),
        Some(Command::Prompt { major, question }) => preview_prompt(&major, &question),
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn chat(config: Config, session: Option<String>) -> Result<()> {
    let session = SessionId::try_from(session.unwrap_or(config.chat.session_id))?;

    let mut chat = ChatLoop::connect(
        &config.model,
        InMemoryHistory::new(),
        session,
        ask_for_key,
        build_model,
    )?;

    println!("AI Career Guidance Chatbot for Undergraduates");
    println!("Enter your academic major and ask for career advice!");
    println!("Commands: /history, /quit\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut major = String::new();

    loop {
        let label = if major.is_empty() {
            "Major (e.g., Computer Science, Business, Biology): ".to_string()
        } else {
            format!("Major [{major}]: ")
        };
        let Some(entered) = read_field(&mut lines, &label).await? else {
            break;
        };
        match entered.as_str() {
            "/quit" => break,
            "/history" => {
                print_transcript(chat.transcript());
                continue;
            }
            "" => {}
            _ => major = entered,
        }

        let Some(question) = read_field(&mut lines, "Question: ").await? else {
            break;
        };
        match question.as_str() {
            "/quit" => break,
            "/history" => {
                print_transcript(chat.transcript());
                continue;
            }
            _ => {}
        }

        match chat.submit(&major, &question).await {
            None => println!("Please enter both a major and a question.\n"),
            Some(Outcome::Reply(text)) => println!("\nAdvisor: {text}\n"),
            Some(Outcome::Failed(message)) => eprintln!("\n{message}\n"),
        }
    }

    tracing::info!("Chat session {} ended", chat.session());
    Ok(())
}

/// Print a label and read one line as typed; `None` on end of input
async fn read_field(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

fn ask_for_key(env_var: &str) -> std::io::Result<Option<String>> {
    eprintln!("API key not found in {env_var}. Please enter it below.");
    eprint!("API key: ");
    std::io::stderr().flush()?;

    let mut line = String::new();
    if std::io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn print_transcript(transcript: &[TranscriptEntry]) {
    if transcript.is_empty() {
        println!("(no messages yet)\n");
        return;
    }
    for entry in transcript {
        println!("{}: {}", entry.label(), entry.text());
    }
    println!();
}

fn majors(json: bool) -> Result<()> {
    let table = knowledge::load();

    if json {
        println!("{}", table.to_json()?);
        return Ok(());
    }

    let mut output = Table::new();
    output
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["Major", "Careers", "Skills", "Resources"]);

    for entry in table.iter() {
        output.add_row([
            entry.major.clone(),
            entry.careers.join(", "),
            entry.skills.join(", "),
            entry.resources.join(", "),
        ]);
    }

    println!("{output}");
    Ok(())
}

fn preview_prompt(major: &str, question: &str) -> Result<()> {
    let career_data = knowledge::load().to_json()?;
    let prompt = assemble(major, question, &career_data, &[]);

    println!("[system]{}", prompt.system);
    println!("[user]\n{}", prompt.user);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("careerbot=info"));
        assert!(rendered.contains("warn"));
    }

    #[test]
    fn test_session_flag_accepts_any_key() {
        let cli = Cli::try_parse_from(["careerbot", "--session", "user@example.com", "majors"])
            .unwrap();
        assert_eq!(cli.session.as_deref(), Some("user@example.com"));
        assert!(SessionId::try_from(cli.session.unwrap()).is_ok());
    }
}
