use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEvent};

/// Terminal events produced by the runtime's event loop.
///
/// Delivered through the
/// [`terminal_events`](crate::subscriptions::terminal_events) subscription,
/// which maps each event into the application's message type.
///
/// # Example
///
/// ```rust,ignore
/// use checkcombo_core::{terminal_events, TerminalEvent};
///
/// terminal_events(|ev| match ev {
///     TerminalEvent::Key(k) => Some(Msg::Key(k)),
///     TerminalEvent::Mouse(m) => Some(Msg::Mouse(m)),
///     _ => None,
/// });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl TerminalEvent {
    /// Whether this is a key press (not a release or repeat).
    ///
    /// Terminals with the kitty keyboard protocol report releases too; widgets
    /// act on presses only.
    pub fn is_key_press(&self) -> bool {
        matches!(self, TerminalEvent::Key(k) if k.kind == KeyEventKind::Press)
    }
}

impl From<Event> for TerminalEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(k) => TerminalEvent::Key(k),
            Event::Mouse(m) => TerminalEvent::Mouse(m),
            Event::Resize(w, h) => TerminalEvent::Resize(w, h),
            Event::FocusGained => TerminalEvent::FocusGained,
            Event::FocusLost => TerminalEvent::FocusLost,
            Event::Paste(s) => TerminalEvent::Paste(s),
        }
    }
}
