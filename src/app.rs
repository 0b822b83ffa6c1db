//! Application state and logic.
//!
//! [`App`] owns the metrics source, the dashboard state and the UI. It
//! applies input through the [`ControllerState`](crate::state::ControllerState)
//! machine and samples on every timer tick while running.

use std::sync::Arc;

use color_eyre::Result;
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::config::AppConfig;
use crate::event::{Event, EventHandler};
use crate::history::BufferRegistry;
use crate::metrics::MetricsSource;
use crate::state::{Action, DashboardState, TickOutcome, Transition};
use crate::ui::Ui;

/// Main application.
pub struct App {
    state: DashboardState,
    source: Box<dyn MetricsSource>,
    ui: Ui,
    should_quit: bool,
}

impl App {
    /// Creates a new application reading from `source`. Nothing is sampled
    /// until [`App::run`] or [`App::sample`] is called.
    pub fn new(config: &AppConfig, source: Box<dyn MetricsSource>) -> Self {
        let registry = Arc::new(BufferRegistry::new(
            config.history_size,
            config.moving_avg_size,
        ));
        Self {
            state: DashboardState::new(registry, config.history_span()),
            source,
            ui: Ui::new(),
            should_quit: false,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Runs the application main loop until quit or the event stream ends.
    ///
    /// Sampling blocks for the collector's measurement window, so it runs
    /// through `block_in_place`; this needs the multi-threaded runtime.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<impl Backend>,
        events: &mut EventHandler,
    ) -> Result<()> {
        tokio::task::block_in_place(|| self.sample());

        while !self.should_quit {
            terminal.draw(|frame| self.ui.render(frame, &self.state))?;

            match events.next().await {
                Some(Event::Tick) => tokio::task::block_in_place(|| self.on_tick()),
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        tracing::info!("main loop finished");
        Ok(())
    }

    /// Handles input and timer events.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                if let Some(action) = Action::from_key(key) {
                    self.apply(action);
                }
            }
            Event::Resize(width, height) => self.ui.handle_resize(width, height),
            Event::Tick => self.on_tick(),
        }
    }

    /// Timer tick: sample unless paused.
    pub fn on_tick(&mut self) {
        match self.state.controller.on_tick() {
            TickOutcome::Sample => self.sample(),
            TickOutcome::Skip => {}
        }
    }

    /// Collect one snapshot and fold it into the histories.
    ///
    /// On failure the previous snapshot stays on screen and the error is
    /// kept for display until the next successful sample.
    pub fn sample(&mut self) {
        match self.source.collect() {
            Ok(snapshot) => {
                tracing::debug!(
                    total = snapshot.total_usage,
                    units = snapshot.per_core_usage.len(),
                    "sampled"
                );
                let registry = &self.state.registry;
                registry.push_aggregate(snapshot.total_usage);
                for (core, usage) in snapshot.per_core_usage.iter().enumerate() {
                    registry.push(core, *usage);
                }

                self.state.last_update = Some(snapshot.timestamp);
                self.state.snapshot = Some(snapshot);
                self.state.spinner_frame = self.state.spinner_frame.wrapping_add(1);
                self.state.last_error = None;
            }
            Err(err) => {
                tracing::warn!(%err, "metrics collection failed");
                self.state.last_error = Some(err.to_string());
            }
        }
    }

    fn apply(&mut self, action: Action) {
        match self.state.controller.apply(action) {
            Transition::Exit => self.should_quit = true,
            Transition::ResetHistory => {
                self.state.registry.reset_all();
                tracing::info!("history reset");
            }
            Transition::Redraw if action == Action::TogglePause => {
                if self.state.controller.is_paused() {
                    tracing::info!("monitoring paused");
                } else {
                    tracing::info!("monitoring resumed");
                }
            }
            Transition::Redraw => {
                tracing::debug!(help = self.state.controller.help_visible, "help toggled");
            }
            Transition::Ignored => {
                tracing::debug!(?action, "ignored while help is visible");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    use super::*;
    use crate::error::CollectError;
    use crate::metrics::{MockMetricsSource, Snapshot};

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn config() -> AppConfig {
        AppConfig {
            history_size: NonZeroUsize::new(5).unwrap(),
            moving_avg_size: NonZeroUsize::new(3).unwrap(),
            ..AppConfig::default()
        }
    }

    fn snapshot(total: f64, cores: &[f64]) -> Snapshot {
        Snapshot {
            total_usage: total,
            per_core_usage: cores.to_vec(),
            ..Snapshot::default()
        }
    }

    fn app_with(source: MockMetricsSource) -> App {
        App::new(&config(), Box::new(source))
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn sample_feeds_every_history() {
        let mut source = MockMetricsSource::new();
        source
            .expect_collect()
            .times(1)
            .returning(|| Ok(snapshot(40.0, &[30.0, 50.0])));
        let mut app = app_with(source);

        app.on_tick();

        let registry = &app.state().registry;
        assert_eq!(registry.aggregate().values(), vec![40.0]);
        assert_eq!(registry.unit_count(), 2);
        assert_eq!(registry.unit(1).map(|b| b.values()), Some(vec![50.0]));
        assert_eq!(app.state().spinner_frame, 1);
        assert!(app.state().snapshot.is_some());
    }

    #[test]
    fn paused_tick_never_collects() {
        let mut source = MockMetricsSource::new();
        source.expect_collect().times(0);
        let mut app = app_with(source);

        app.handle_event(key('p'));
        app.handle_event(Event::Tick);
        app.handle_event(Event::Tick);

        assert!(app.state().controller.is_paused());
        assert!(app.state().registry.aggregate().is_empty());
    }

    #[test]
    fn failure_keeps_previous_snapshot() {
        let mut source = MockMetricsSource::new();
        let mut calls = 0;
        source.expect_collect().times(3).returning(move || {
            calls += 1;
            match calls {
                2 => Err(CollectError::NoCpuData),
                n => Ok(snapshot(n as f64 * 10.0, &[])),
            }
        });
        let mut app = app_with(source);

        app.sample();
        app.sample();
        assert_eq!(app.state().snapshot.as_ref().map(|s| s.total_usage), Some(10.0));
        assert!(app.state().last_error.is_some());
        assert_eq!(app.state().registry.aggregate().len(), 1);

        app.sample();
        assert_eq!(app.state().snapshot.as_ref().map(|s| s.total_usage), Some(30.0));
        assert_eq!(app.state().last_error, None);
    }

    #[test]
    fn reset_clears_histories_but_not_snapshot() {
        let mut source = MockMetricsSource::new();
        source
            .expect_collect()
            .returning(|| Ok(snapshot(20.0, &[20.0])));
        let mut app = app_with(source);
        app.sample();
        app.sample();

        app.handle_event(key('r'));

        assert!(app.state().registry.aggregate().is_empty());
        assert_eq!(app.state().registry.unit(0).map(|b| b.len()), Some(0));
        assert!(app.state().snapshot.is_some());
    }

    #[test]
    fn help_swallows_reset_and_pause() {
        let mut source = MockMetricsSource::new();
        source
            .expect_collect()
            .returning(|| Ok(snapshot(20.0, &[])));
        let mut app = app_with(source);
        app.sample();

        app.handle_event(key('h'));
        app.handle_event(key('r'));
        app.handle_event(key('p'));

        assert!(app.state().controller.help_visible);
        assert!(!app.state().controller.is_paused());
        assert_eq!(app.state().registry.aggregate().len(), 1);

        // Ticks keep sampling behind the overlay.
        app.handle_event(Event::Tick);
        assert_eq!(app.state().registry.aggregate().len(), 2);
    }

    #[test]
    fn quit_keys_stop_the_app() {
        let mut app = app_with(MockMetricsSource::new());
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit());
    }

    #[test]
    fn shows_initializing_until_first_snapshot() {
        let mut source = MockMetricsSource::new();
        source
            .expect_collect()
            .returning(|| Err(CollectError::NoCpuData));
        let mut app = app_with(source);
        app.sample();
        assert_eq!(
            app.state().last_error.as_deref(),
            Some("no CPU data reported by the host")
        );

        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal.draw(|frame| app.ui.render(frame, &app.state)).unwrap();
        assert!(screen(&terminal).starts_with("Initializing..."));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_loop_processes_events_until_quit() {
        let mut source = MockMetricsSource::new();
        // Startup sample only; the tick arrives while paused.
        source
            .expect_collect()
            .times(1)
            .returning(|| Ok(snapshot(55.0, &[50.0, 60.0])));
        let mut app = app_with(source);

        let (tx, rx) = mpsc::unbounded_channel();
        let mut events = EventHandler::from_receiver(rx);
        tx.send(key('p')).unwrap();
        tx.send(Event::Tick).unwrap();
        tx.send(Event::Resize(100, 40)).unwrap();
        tx.send(key('q')).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        app.run(&mut terminal, &mut events).await.unwrap();

        assert!(app.should_quit());
        assert_eq!(app.state().registry.aggregate().values(), vec![55.0]);
        let screen = screen(&terminal);
        assert!(screen.contains("PAUSED"));
        assert!(screen.contains("Total CPU"));
    }

    #[test]
    fn resize_redraws_at_the_new_size() {
        let mut source = MockMetricsSource::new();
        source
            .expect_collect()
            .returning(|| Ok(snapshot(55.0, &[50.0, 60.0])));
        let mut app = app_with(source);
        app.sample();

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.ui.render(frame, &app.state)).unwrap();

        app.handle_event(Event::Resize(60, 20));
        terminal.backend_mut().resize(60, 20);
        terminal.draw(|frame| app.ui.render(frame, &app.state)).unwrap();

        let rows: Vec<String> = terminal
            .backend()
            .buffer()
            .content
            .chunks(60)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect();
        assert_eq!(rows.len(), 20);
        // Key hints are right-aligned against the new width.
        assert!(rows[0].starts_with("CPU Monitor"));
        assert!(rows[0].ends_with("p:pause"));
        assert!(rows.iter().any(|row| row.starts_with("Total CPU")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_loop_ends_with_event_stream() {
        let mut source = MockMetricsSource::new();
        source
            .expect_collect()
            .times(2)
            .returning(|| Ok(snapshot(10.0, &[])));
        let mut app = app_with(source);

        let (tx, rx) = mpsc::unbounded_channel();
        let mut events = EventHandler::from_receiver(rx);
        tx.send(Event::Tick).unwrap();
        drop(tx);

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        app.run(&mut terminal, &mut events).await.unwrap();

        assert!(!app.should_quit());
        assert_eq!(app.state().registry.aggregate().len(), 2);
    }
}
