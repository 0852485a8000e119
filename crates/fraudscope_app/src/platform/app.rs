use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use dashboard_logging::{dash_info, dash_warn};
use fraudscope_core::{update, AppState, Msg};
use fraudscope_engine::ExportWriter;

use super::config::{self, DashboardConfig, CONFIG_FILENAME};
use super::console::{self, ConsoleInput};
use super::effects::EffectRunner;
use super::{logging, ui};

/// Everything the main loop reacts to.
#[derive(Debug, PartialEq)]
pub enum LoopEvent {
    Msg(Msg),
    Print(String),
    Redraw,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join(CONFIG_FILENAME);
    let loaded = config::load(&config_path);
    let settings = match &loaded {
        Ok(Some(file_config)) => file_config.clone(),
        _ => DashboardConfig::default(),
    };
    logging::initialize(settings.log_destination);
    match loaded {
        Ok(Some(_)) => dash_info!("Loaded settings from {}", config_path.display()),
        Ok(None) => dash_info!("No {} found; using defaults", CONFIG_FILENAME),
        Err(err) => dash_warn!("Ignoring settings: {}", err),
    }

    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(
        settings.engine_settings(),
        ExportWriter::new(settings.export_dir.clone()),
        loop_tx.clone(),
    )
    .context("failed to start the scoring engine")?;

    spawn_console_reader(loop_tx);
    println!("{}", console::help_text());

    let mut state = dispatch(AppState::new(), Msg::Started, &runner);
    for event in loop_rx {
        match event {
            LoopEvent::Msg(msg) => state = dispatch(state, msg, &runner),
            LoopEvent::Print(text) => println!("{text}"),
            LoopEvent::Redraw => print_lines(&ui::render::render(&state.view())),
            LoopEvent::Quit => break,
        }
    }

    dash_info!("Shutting down");
    runner.shutdown();
    Ok(())
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (mut state, effects) = update(state, msg);
    print_lines(&runner.enqueue(effects));
    let view = state.view();
    if state.consume_dirty() {
        print_lines(&ui::render::render(&view));
    }
    state
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn spawn_console_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines().map_while(Result::ok) {
            for event in input_events(console::parse_line(&line)) {
                if loop_tx.send(event).is_err() {
                    return;
                }
            }
        }
        let _ = loop_tx.send(LoopEvent::Quit);
    });
}

fn input_events(input: ConsoleInput) -> Vec<LoopEvent> {
    let event = match input {
        ConsoleInput::Drop(paths) => {
            return match console::load_first_candidate(&paths) {
                Ok(files) => vec![LoopEvent::Msg(Msg::FilesDropped(files))],
                // The drop still ends the drag even though nothing was read.
                Err(err) => vec![
                    LoopEvent::Print(format!("? {err}")),
                    LoopEvent::Msg(Msg::DragLeft),
                ],
            };
        }
        ConsoleInput::Pick(paths) => match console::load_first_candidate(&paths) {
            Ok(files) => LoopEvent::Msg(Msg::FilesPicked(files)),
            Err(err) => LoopEvent::Print(format!("? {err}")),
        },
        ConsoleInput::DragEnter => LoopEvent::Msg(Msg::DragEntered),
        ConsoleInput::DragLeave => LoopEvent::Msg(Msg::DragLeft),
        ConsoleInput::Export => LoopEvent::Msg(Msg::ExportClicked),
        ConsoleInput::Dismiss => LoopEvent::Msg(Msg::StatusDismissed),
        ConsoleInput::Status => LoopEvent::Redraw,
        ConsoleInput::Help => LoopEvent::Print(console::help_text()),
        ConsoleInput::Quit => LoopEvent::Quit,
        ConsoleInput::Empty => return Vec::new(),
        ConsoleInput::Invalid(message) => LoopEvent::Print(format!("? {message}")),
    };
    vec![event]
}
