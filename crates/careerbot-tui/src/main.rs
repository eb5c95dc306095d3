use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{KeyCode, KeyModifiers};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use careerbot::chat::{ChatLoop, InMemoryHistory, SessionId};
use careerbot::config::Config;
use careerbot::model::{build_model, load_env_file};
use careerbot_tui::app::Action;
use careerbot_tui::event::Event;
use careerbot_tui::views::{InputField, render_key_prompt};
use careerbot_tui::{App, Tui};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "careerbot-tui")]
#[command(about = "Career guidance chatbot for undergraduates, in your terminal")]
#[command(version)]
struct Args {
    /// Path to config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Session key for conversation history, any non-empty string (overrides config)
    #[arg(long, short = 's')]
    session: Option<String>,

    /// Write logs to this file (logs are discarded otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;
    load_env_file(None);

    let config = Config::load(args.config.as_deref())?;
    let session = SessionId::try_from(args.session.unwrap_or(config.chat.session_id.clone()))?;

    tracing::info!("Starting careerbot TUI: session={}", session);

    let mut tui = Tui::new()?;
    tui.enter()?;

    let chat = ChatLoop::connect(
        &config.model,
        InMemoryHistory::new(),
        session,
        |env_var| ask_for_key(&mut tui, env_var),
        build_model,
    );
    let chat = match chat {
        Ok(chat) => chat,
        Err(e) => {
            tui.exit()?;
            return Err(e.into());
        }
    };
    let mut app = App::new(chat);

    let result = run(&mut tui, &mut app).await;
    tui.exit()?;
    result
}

fn init_logging(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,careerbot=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

async fn run(tui: &mut Tui, app: &mut App) -> anyhow::Result<()> {
    while !app.should_quit {
        tui.draw(|frame| app.render(frame))?;

        let Event::Key(key) = tui.next_event(POLL_INTERVAL)? else {
            continue;
        };

        if app.handle_key(key) == Action::Submit {
            app.start_processing();
            tui.draw(|frame| app.render(frame))?;
            app.submit().await;
        }
    }
    Ok(())
}

/// Masked key entry; `None` when the user presses Esc
fn ask_for_key(tui: &mut Tui, env_var: &str) -> io::Result<Option<String>> {
    let mut field = InputField::new("Enter your API key").masked();

    loop {
        tui.draw(|frame| render_key_prompt(frame, &field, env_var))?;

        let Event::Key(key) = tui.next_event(POLL_INTERVAL)? else {
            continue;
        };
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(None);
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(field.value().to_string())),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char(c) => field.insert(c),
            KeyCode::Backspace => field.backspace(),
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            _ => {}
        }
    }
}
