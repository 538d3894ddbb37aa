use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_info, engine_warn, LogDestination};
use log::LevelFilter;
use spikewatch_core::{update, AppState, Msg, PresentationSink, ViewSync};

use super::config::{self, AppConfig, DEFAULT_CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::input::{self, Command};
use super::ui::constants::HELP_TEXT;
use super::ui::render::TerminalSink;

#[derive(Debug, Parser)]
#[command(
    name = "spikewatch",
    about = "Find the moments a stream's live chat replay spiked"
)]
struct Cli {
    /// Stream URL to analyze right away
    url: Option<String>,

    /// Keyword to analyze together with the stream
    #[arg(short, long)]
    keyword: Option<String>,

    /// Config file (default: ./spikewatch.ron)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

/// Everything the main loop reacts to.
pub(crate) enum AppInput {
    Msg(Msg),
    Command(Command),
    Invalid(String),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let loaded = config::load_config(&config_path);
    let log_to_file = loaded.as_ref().is_ok_and(|config| config.log_to_file);
    let destination = if log_to_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    engine_logging::initialize(destination, level);

    let config = loaded.unwrap_or_else(|err| {
        engine_warn!("{}; using defaults", err);
        AppConfig::default()
    });
    engine_info!("Using analysis server {}", config.base_url);

    let (input_tx, input_rx) = mpsc::channel();
    let runner = EffectRunner::new(config.api_settings(), input_tx.clone())
        .context("failed to start the analysis engine")?;
    input::spawn_stdin_reader(input_tx);

    let mut app = App::new(runner, TerminalSink::new(io::stdout()));
    app.sink.print_raw(HELP_TEXT);
    app.render();

    if let Some(keyword) = cli.keyword {
        app.dispatch(Msg::KeywordInputChanged(keyword));
    }
    if let Some(url) = cli.url {
        app.dispatch(Msg::UrlInputChanged(url));
        app.dispatch(Msg::AnalyzeClicked);
    }

    let mut input_closed = false;
    app.sink.prompt();
    while let Ok(input) = input_rx.recv() {
        match input {
            AppInput::Msg(msg) => app.dispatch(msg),
            AppInput::Command(Command::Quit) => break,
            AppInput::Command(Command::Help) => {
                app.sink.print_raw(HELP_TEXT);
                app.sink.prompt();
            }
            AppInput::Command(command) => {
                for msg in command.into_msgs() {
                    app.dispatch(msg);
                }
                app.sink.prompt();
            }
            AppInput::Invalid(message) => {
                app.sink.alert(&message);
                app.sink.prompt();
            }
            AppInput::InputClosed => input_closed = true,
        }
        // With stdin gone, stay around only until outstanding work settles.
        if input_closed && !app.state.is_busy() {
            break;
        }
    }

    let _ = io::stdout().flush();
    engine_info!("Exiting");
    Ok(())
}

struct App<W: Write> {
    state: AppState,
    sync: ViewSync,
    runner: EffectRunner,
    sink: TerminalSink<W>,
}

impl<W: Write> App<W> {
    fn new(runner: EffectRunner, sink: TerminalSink<W>) -> Self {
        Self {
            state: AppState::new(),
            sync: ViewSync::new(),
            runner,
            sink,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        if state.consume_dirty() {
            self.sync.apply(&state.view(), &mut self.sink);
        }
        self.state = state;
    }

    fn render(&mut self) {
        self.sync.apply(&self.state.view(), &mut self.sink);
    }
}
