//! **checkcombo** -- a multi-select check combo box for [`ratatui`] apps.
//!
//! This is the umbrella crate that re-exports everything you need from a
//! single dependency:
//!
//! ```toml
//! [dependencies]
//! checkcombo = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`checkcombo_core`] are available at the crate
//!   root ([`Model`], [`Component`], [`Command`], [`Subscription`],
//!   [`Program`], [`run`], [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from
//!   [`checkcombo_widgets`] ([`widgets::CheckCombo`] and its building blocks).
//! * [`ratatui`], [`crossterm`], [`tokio`] and [`log`] are re-exported so
//!   downstream crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use checkcombo::widgets::check_combo::{CheckCombo, Message as ComboMsg};
//! use checkcombo::{terminal_events, Command, Component, Model, Subscription, TerminalEvent};
//! use ratatui::Frame;
//!
//! struct App {
//!     combo: CheckCombo,
//! }
//!
//! enum Msg {
//!     Combo(ComboMsg),
//! }
//!
//! impl Model for App {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         let mut combo = CheckCombo::new()
//!             .with_placeholder("None")
//!             .with_items(["First", "Second", "Third"]);
//!         combo.focus();
//!         (App { combo }, Command::none())
//!     }
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Combo(m) => self.combo.update(m).map(Msg::Combo),
//!         }
//!     }
//!     fn view(&self, frame: &mut Frame) {
//!         let area = frame.area();
//!         self.combo.view(frame, ratatui::layout::Rect { height: 1, ..area });
//!     }
//!     fn subscriptions(&self) -> Vec<Subscription<Msg>> {
//!         let mut subs: Vec<_> = self
//!             .combo
//!             .subscriptions()
//!             .into_iter()
//!             .map(|s| s.map(Msg::Combo))
//!             .collect();
//!         subs.push(terminal_events(|ev| match ev {
//!             TerminalEvent::Key(k) => Some(Msg::Combo(ComboMsg::KeyPress(k))),
//!             TerminalEvent::Mouse(m) => Some(Msg::Combo(ComboMsg::Mouse(m))),
//!             _ => None,
//!         }));
//!         subs
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     checkcombo::run::<App>(()).await.unwrap();
//! }
//! ```

pub use checkcombo_core::*;
pub mod widgets {
    pub use checkcombo_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use log;
pub use ratatui;
pub use tokio;
