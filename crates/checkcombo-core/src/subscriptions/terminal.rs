use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId, SubscriptionSource};
use crossterm::event::EventStream;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Subscription source for terminal events (keyboard, mouse, resize, focus, paste).
///
/// Read errors from the terminal are dropped rather than ending the stream.
pub struct TerminalEvents;

impl SubscriptionSource for TerminalEvents {
    type Output = TerminalEvent;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::of::<Self>()
    }

    fn stream(self) -> BoxStream<'static, TerminalEvent> {
        let stream = EventStream::new().filter_map(|result| async move {
            match result {
                Ok(event) => Some(TerminalEvent::from(event)),
                Err(err) => {
                    log::warn!("terminal event read failed: {err}");
                    None
                }
            }
        });
        Box::pin(stream)
    }
}

/// Create a terminal events subscription that maps each event through `map`.
///
/// Return `Some(msg)` to forward an event or `None` to discard it.
///
/// # Example
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![terminal_events(|event| match event {
///         TerminalEvent::Key(key) => Some(Msg::Key(key)),
///         TerminalEvent::Mouse(mouse) => Some(Msg::Mouse(mouse)),
///         _ => None,
///     })]
/// }
/// ```
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);

    // The EventStream is created inside the task: building one eagerly on
    // every subscriptions() call would poke crossterm's global reader while
    // the live stream is polling it.
    Subscription {
        id: SubscriptionId::of::<TerminalEvents>(),
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| -> AbortHandle {
            let handle = tokio::spawn(async move {
                let mut events = TerminalEvents.stream();
                while let Some(event) = events.next().await {
                    let Some(msg) = map(event) else { continue };
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            });
            handle.abort_handle()
        }),
    }
}
