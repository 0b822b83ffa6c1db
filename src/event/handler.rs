//! Event source task.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::Event;

/// Merges crossterm input and a refresh timer into one [`Stream`].
///
/// A background task does the waiting and forwards events over a channel.
/// Dropping the handler stops that task.
pub struct EventHandler {
    event_rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventHandler {
    /// Start reading terminal input and emit [`Event::Tick`] every `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, tick_rate, cancel.clone()));

        Self {
            event_rx: rx,
            cancel,
        }
    }

    /// Build a handler fed by an existing channel instead of the terminal.
    pub fn from_receiver(event_rx: mpsc::UnboundedReceiver<Event>) -> Self {
        Self {
            event_rx,
            cancel: CancellationToken::new(),
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Stream for EventHandler {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.event_rx.poll_recv(cx)
    }
}

async fn pump(tx: mpsc::UnboundedSender<Event>, tick_rate: Duration, cancel: CancellationToken) {
    let mut reader = EventStream::new();
    // The first sample is taken at startup, so the first tick waits a full period.
    let mut ticker = time::interval_at(Instant::now() + tick_rate, tick_rate);
    // Sampling blocks the loop; don't fire a burst of catch-up ticks afterwards.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => Event::Tick,
            input = reader.next() => match input {
                Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => Event::Key(key),
                Some(Ok(CrosstermEvent::Resize(width, height))) => Event::Resize(width, height),
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    tracing::warn!(%err, "terminal input error");
                    continue;
                }
                None => break,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
    tracing::debug!("event source stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[tokio::test]
    async fn forwards_channel_events_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut events = EventHandler::from_receiver(rx);

        let key = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE);
        tx.send(Event::Tick).unwrap();
        tx.send(Event::Key(key)).unwrap();
        tx.send(Event::Resize(120, 40)).unwrap();
        drop(tx);

        assert_eq!(events.next().await, Some(Event::Tick));
        assert_eq!(events.next().await, Some(Event::Key(key)));
        assert_eq!(events.next().await, Some(Event::Resize(120, 40)));
        assert_eq!(events.next().await, None);
    }
}
