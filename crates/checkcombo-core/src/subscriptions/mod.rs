//! Built-in subscription sources.
//!
//! - **Terminal events** ([`terminal_events`], [`TerminalEvents`]): keyboard,
//!   mouse, resize, focus and paste events from the terminal.
//! - **Timers** ([`After`]): one-shot delays, distinguished by a key so a
//!   re-armed timer replaces the previous one.

mod terminal;
mod timer;

pub use terminal::*;
pub use timer::*;
