// TUI module - Terminal User Interface
//
// Sets up the terminal, runs the event loop and restores the terminal on the
// way out. The loop multiplexes four sources with tokio::select!:
// - keyboard and mouse input
// - the frame tick (deferred panel reveals, toast expiry)
// - the language retry interval, armed only while a retry task is pending
// - the one-shot restore of a saved language after load

pub mod app;
pub mod theme;
pub mod toast;
pub mod views;

use crate::config::Config;
use crate::detect::DetectionResult;
use crate::language::RetryId;
use crate::logging::LogBuffer;
use crate::panels::location::SessionLocation;
use anyhow::{Context, Result};
use app::{App, Store};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Run the TUI until the user quits
pub async fn run_tui(
    config: Config,
    detection: DetectionResult,
    location: SessionLocation,
    store: Store,
    log_buffer: LogBuffer,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(
        detection,
        location,
        config.language.to_settings(),
        store,
        config.widget.ready_after(),
        log_buffer,
    );
    let frame_interval = Duration::from_millis(config.frame_interval_ms);

    let result = run_event_loop(&mut terminal, &mut app, frame_interval).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Interval bound to one retry task
struct RetryTimer {
    id: RetryId,
    interval: Interval,
}

impl RetryTimer {
    /// First tick one period from now: the immediate attempt already ran
    fn new(id: RetryId, period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { id, interval }
    }
}

/// What to do with the retry timer after a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    Keep,
    Arm(RetryId),
    Disarm,
}

/// Keep the retry timer in step with the task it belongs to
///
/// A timer never outlives its task: a superseded id is re-armed for the
/// new task, and a finished task leaves no timer behind.
fn retry_timer_action(armed: Option<RetryId>, active: Option<RetryId>) -> TimerAction {
    match (armed, active) {
        (Some(armed), Some(active)) if armed == active => TimerAction::Keep,
        (_, Some(active)) => TimerAction::Arm(active),
        (Some(_), None) => TimerAction::Disarm,
        (None, None) => TimerAction::Keep,
    }
}

async fn next_retry_tick(timer: &mut Option<RetryTimer>) {
    match timer {
        Some(timer) => {
            timer.interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn restore_due(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    frame_interval: Duration,
) -> Result<()> {
    let mut frame_tick = tokio::time::interval(frame_interval);
    frame_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut retry_timer: Option<RetryTimer> = None;

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        let armed = retry_timer.as_ref().map(|t| t.id);
        match retry_timer_action(armed, app.active_retry()) {
            TimerAction::Keep => {}
            TimerAction::Arm(id) => retry_timer = Some(RetryTimer::new(id, app.retry_interval())),
            TimerAction::Disarm => retry_timer = None,
        }
        let restore_deadline = app.restore_deadline();

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => app.handle_key(key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            _ = frame_tick.tick() => {
                app.on_frame();
            }

            _ = next_retry_tick(&mut retry_timer) => {
                app.on_retry_tick();
            }

            _ = restore_due(restore_deadline) => {
                app.run_restore();
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        app.handle_click(mouse.column, mouse.row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_arms_timer() {
        assert_eq!(
            retry_timer_action(None, Some(RetryId(1))),
            TimerAction::Arm(RetryId(1))
        );
    }

    #[test]
    fn test_same_task_keeps_timer() {
        assert_eq!(
            retry_timer_action(Some(RetryId(1)), Some(RetryId(1))),
            TimerAction::Keep
        );
    }

    #[test]
    fn test_superseded_task_rearms_for_new_id() {
        assert_eq!(
            retry_timer_action(Some(RetryId(1)), Some(RetryId(2))),
            TimerAction::Arm(RetryId(2))
        );
    }

    #[test]
    fn test_finished_task_drops_timer() {
        assert_eq!(
            retry_timer_action(Some(RetryId(1)), None),
            TimerAction::Disarm
        );
    }

    #[test]
    fn test_idle_stays_idle() {
        assert_eq!(retry_timer_action(None, None), TimerAction::Keep);
    }
}
