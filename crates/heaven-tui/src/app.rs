//! App — terminal event loop.
//!
//! Architecture:
//! - Background tasks forward terminal input and component state changes
//!   into one `mpsc` channel of `AppMessage`s.
//! - The loop applies each message to `AppState`, then redraws.
//! - A one-shot timer opens the donation overlay once per session.
//! - Play/pause requests go out to the `PlaybackController` task through a
//!   `PlaybackCommand` channel; the App never awaits playback itself.

use std::io;
use std::time::Duration;

use chrono::Timelike;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use heaven_core::config::LinksConfig;
use heaven_core::protocol::{PlaybackStatus, TrackListState};
use heaven_core::schedule::ProgrammeSlot;
use heaven_core::stream::PlaybackCommand;
use heaven_core::Error;

use crate::{app_state::AppState, components};

#[derive(Debug)]
pub enum AppMessage {
    Event(Event),
    Tracks(TrackListState),
    PollError(Error),
    Listeners(u32),
    Playback(PlaybackStatus),
    DonationPrompt,
}

/// Receivers the App subscribes to.  Built by `main` from the live components.
pub struct Feeds {
    pub tracks: watch::Receiver<TrackListState>,
    pub poll_errors: broadcast::Receiver<Error>,
    pub listeners: watch::Receiver<u32>,
    pub playback: watch::Receiver<PlaybackStatus>,
}

pub struct App {
    state: AppState,
    playback_tx: mpsc::Sender<PlaybackCommand>,
    should_quit: bool,
}

/// Forward every change of a watch channel as an `AppMessage`.
fn forward_watch<T, F>(mut rx: watch::Receiver<T>, tx: mpsc::Sender<AppMessage>, wrap: F)
where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) -> AppMessage + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let value = rx.borrow_and_update().clone();
            if tx.send(wrap(value)).await.is_err() {
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    });
}

/// Send a single `DonationPrompt` after `delay`.
fn spawn_donation_prompt(delay: Duration, tx: mpsc::Sender<AppMessage>) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(AppMessage::DonationPrompt).await;
    })
}

impl App {
    pub fn new(
        schedule: Vec<ProgrammeSlot>,
        links: LinksConfig,
        playback_tx: mpsc::Sender<PlaybackCommand>,
    ) -> Self {
        Self {
            state: AppState {
                schedule,
                links,
                hour: chrono::Local::now().hour() as u8,
                ..Default::default()
            },
            playback_tx,
            should_quit: false,
        }
    }

    pub async fn run(mut self, feeds: Feeds) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard events ─────────────────────────────────
        let event_tx = tx.clone();
        // Polls with a timeout so the thread notices the App has gone away.
        tokio::task::spawn_blocking(move || loop {
            if event_tx.is_closed() {
                break;
            }
            match event::poll(Duration::from_millis(250)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(_) => break,
            }
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background tasks: component state ───────────────────────────────
        forward_watch(feeds.tracks, tx.clone(), AppMessage::Tracks);
        forward_watch(feeds.listeners, tx.clone(), AppMessage::Listeners);
        forward_watch(feeds.playback, tx.clone(), AppMessage::Playback);

        let err_tx = tx.clone();
        let mut poll_errors = feeds.poll_errors;
        tokio::spawn(async move {
            loop {
                match poll_errors.recv().await {
                    Ok(e) => {
                        if err_tx.send(AppMessage::PollError(e)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("poll error receiver lagged by {} messages", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        let prompt = self
            .state
            .links
            .donation_prompt_delay()
            .map(|delay| spawn_donation_prompt(delay, tx.clone()));
        drop(tx);

        // Re-evaluate the slot on air once a minute.
        let mut clock_tick = tokio::time::interval(Duration::from_secs(60));
        clock_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!("app: entering main loop");
        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => self.handle_message(msg).await,
                    None => break,
                },
                _ = clock_tick.tick() => {
                    self.state.hour = chrono::Local::now().hour() as u8;
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        if let Some(prompt) = prompt {
            prompt.abort();
        }
        let _ = self.playback_tx.send(PlaybackCommand::Shutdown).await;
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    async fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => self.handle_key(key).await,
            AppMessage::Event(_) => {}
            AppMessage::Tracks(tracks) => self.state.tracks = tracks,
            AppMessage::PollError(e) => self.state.last_error = Some(e.to_string()),
            AppMessage::Listeners(n) => self.state.listeners = n,
            AppMessage::Playback(status) => self.state.playback = status,
            AppMessage::DonationPrompt => {
                info!("app: showing donation prompt");
                self.state.donation_prompt = true;
            }
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if self.state.donation_prompt && matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            self.state.donation_prompt = false;
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                if self.playback_tx.send(PlaybackCommand::Toggle).await.is_err() {
                    warn!("playback controller is gone");
                }
            }
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;

        let area = frame.area();
        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(outer[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(components::community::height(&self.state)),
            ])
            .split(body[0]);

        components::header::draw(frame, outer[0], &self.state);
        components::next_track::draw(frame, left[0], &self.state);
        components::community::draw(frame, left[1], &self.state);
        components::schedule::draw(frame, body[1], &self.state);
        components::status_bar::draw(frame, outer[2], &self.state);

        if self.state.donation_prompt {
            components::donation::draw(frame, area, &self.state);
        }
    }
}
