use anyhow::{Context, Result};
use color_cycle::color::substitute_color;
use color_cycle::{
    ColorScheduler, DisplayConfig, HexColor, SchedulerHandle, SchedulerService, SchedulerState,
    Snapshot, SystemClock, TextColor,
};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{DefaultTerminal, Frame};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const MAX_STEPS: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DisplayConfig::load(config_path.as_deref()).context("loading configuration")?;
    init_logging(&config)?;

    let text_color = config.overlay.text_color()?;
    let pattern = config.build_pattern::<MAX_STEPS>()?;
    info!(
        steps = pattern.len(),
        cycle_ms = pattern.cycle_millis(),
        fps = config.frame_rate.fps(),
        "starting display"
    );

    let scheduler = ColorScheduler::new(pattern, SystemClock::new());
    let handle = SchedulerService::spawn(scheduler, config.frame_rate.interval());
    if config.autoplay {
        handle.play().await?;
    }

    let mut terminal = ratatui::try_init().context("initializing terminal")?;
    let result = run(&mut terminal, &handle, &config.overlay.text, text_color).await;
    ratatui::restore();

    handle.shutdown().await?;
    info!("display closed");
    result
}

/// Logs go to `log_file` only; the terminal belongs to the display.
fn init_logging(config: &DisplayConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

enum Input {
    Toggle,
    Stop,
    Quit,
}

fn input_for(key: KeyEvent) -> Option<Input> {
    match key.code {
        KeyCode::Char(' ') => Some(Input::Toggle),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Input::Stop),
        KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        _ => None,
    }
}

/// Reads terminal events on a plain thread so the runtime never blocks on stdin.
fn spawn_input_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(%err, "terminal input failed");
                    break;
                }
            }
        }
    });
    rx
}

async fn run<const N: usize>(
    terminal: &mut DefaultTerminal,
    handle: &SchedulerHandle<N>,
    overlay: &str,
    text_color: TextColor,
) -> Result<()> {
    let mut snapshots = handle.subscribe();
    let mut input = spawn_input_reader();

    loop {
        let snapshot = *snapshots.borrow_and_update();
        terminal
            .draw(|frame| draw(frame, &snapshot, overlay, text_color))
            .context("drawing frame")?;

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!("scheduler service went away");
                    break;
                }
            }
            event = input.recv() => {
                let Some(event) = event else { break };
                // Anything else (resize, focus) just falls through to a redraw.
                if let Event::Key(key) = event {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match input_for(key) {
                        Some(Input::Toggle) => handle.toggle().await?,
                        Some(Input::Stop) => handle.stop().await?,
                        Some(Input::Quit) => break,
                        None => {}
                    }
                }
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, snapshot: &Snapshot, overlay: &str, text_color: TextColor) {
    let background = terminal_color(snapshot.color);
    let foreground = terminal_color(text_color.resolve(snapshot.color));
    let area = frame.area();

    frame.render_widget(Block::new().style(Style::new().bg(background)), area);

    let text = substitute_color(overlay, snapshot.color);
    let text_height = text.lines().count().max(1) as u16;
    let [_, middle, _, status] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(text_height),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let text_style = Style::new()
        .fg(foreground)
        .bg(background)
        .add_modifier(Modifier::BOLD);
    frame.render_widget(
        Paragraph::new(text)
            .style(text_style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        middle,
    );

    let status_style = Style::new()
        .fg(foreground)
        .bg(background)
        .add_modifier(Modifier::DIM);
    frame.render_widget(
        Paragraph::new(status_line(snapshot))
            .style(status_style)
            .alignment(Alignment::Center),
        status,
    );
}

fn status_line(snapshot: &Snapshot) -> String {
    let state = match (snapshot.state, snapshot.playing) {
        (SchedulerState::Running, _) => "playing",
        (SchedulerState::Idle, true) => "nothing to play",
        (SchedulerState::Idle, false) => "paused",
    };
    let step = match snapshot.step_index {
        Some(index) => format!("step {}/{}", index + 1, snapshot.step_count),
        None => format!("{} steps", snapshot.step_count),
    };
    format!(
        "{}  {}  {}   space play/pause · r reset · q quit",
        state, step, snapshot.color
    )
}

fn terminal_color(color: HexColor) -> Color {
    Color::Rgb(color.red(), color.green(), color.blue())
}
