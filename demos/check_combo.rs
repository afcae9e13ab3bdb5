//! # Check Combo Example
//!
//! A single check combo box with a disabled entry and a separator:
//! - Embedding a [`Component`] in a [`Model`] and forwarding its messages
//! - Routing key and mouse events to the widget
//! - Reacting to `FlagChanged` notifications
//!
//! Click the combo (or press space) to open it, then click rows or use
//! arrows and space to check them. Tab switches between the list and menu
//! popup looks. Pass a path as the first argument to log to that file.
//!
//! Run with: `cargo run --example check_combo -- /tmp/check_combo.log`

use checkcombo::crossterm::event::{KeyCode, KeyModifiers};
use checkcombo::ratatui::layout::{Constraint, Layout, Rect};
use checkcombo::ratatui::style::{Color, Style};
use checkcombo::ratatui::text::{Line, Span};
use checkcombo::ratatui::widgets::{Block, Paragraph};
use checkcombo::ratatui::Frame;
use checkcombo::widgets::check_combo::{CheckCombo, Message as ComboMsg};
use checkcombo::widgets::check_state::CheckItem;
use checkcombo::{
    terminal_events, Command, Component, Model, ProgramOptions, Subscription, TerminalEvent,
};

struct Demo {
    combo: CheckCombo,
    status: String,
}

#[derive(Debug)]
enum Msg {
    Combo(ComboMsg),
    ToggleStyle,
    Quit,
}

impl Model for Demo {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let mut combo = CheckCombo::new()
            .with_placeholder("None")
            .with_items(["First", "Second", "Third"])
            .with_block(Block::bordered().title(" Pick some "));
        combo.insert_separator(3);
        combo.add_check_item(CheckItem::new("Fourth - Disabled").with_enabled(false));
        combo.focus();

        let demo = Demo {
            combo,
            status: "Nothing toggled yet".to_string(),
        };
        (demo, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Combo(ComboMsg::FlagChanged(row, on)) => {
                let text = self.combo.item_text(row).unwrap_or_default();
                self.status = format!("{text} -> {}", if on { "on" } else { "off" });
                log::info!("row {row} flag changed to {on}");
                Command::none()
            }
            Msg::Combo(m) => self.combo.update(m).map(Msg::Combo),
            Msg::ToggleStyle => {
                let next = self.combo.popup_style().toggled();
                self.combo.update(ComboMsg::StyleChanged(next)).map(Msg::Combo)
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let [combo_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(4).min(40),
            height: area.height.saturating_sub(1),
        });

        let key = Style::default().fg(Color::Cyan);
        let help = Line::from(vec![
            Span::styled("space", key),
            Span::raw(" open/toggle  "),
            Span::styled("tab", key),
            Span::raw(format!(" style ({:?})  ", self.combo.popup_style())),
            Span::styled("q", key),
            Span::raw(" quit"),
        ]);

        frame.render_widget(Paragraph::new(self.status.as_str()), status_area);
        frame.render_widget(Paragraph::new(help), help_area);
        // Drawn last so the popup overlays the lines below.
        self.combo.view(frame, combo_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs: Vec<Subscription<Msg>> = self
            .combo
            .subscriptions()
            .into_iter()
            .map(|s| s.map(Msg::Combo))
            .collect();

        subs.push(terminal_events(|ev| match ev {
            TerminalEvent::Key(key) => match key.code {
                KeyCode::Char('q') => Some(Msg::Quit),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Msg::Quit)
                }
                KeyCode::Tab if key.is_press() => Some(Msg::ToggleStyle),
                _ => Some(Msg::Combo(ComboMsg::KeyPress(key))),
            },
            TerminalEvent::Mouse(mouse) => Some(Msg::Combo(ComboMsg::Mouse(mouse))),
            _ => None,
        }));
        subs
    }
}

#[checkcombo::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = ProgramOptions {
        log_file: std::env::args().nth(1).map(Into::into),
        ..ProgramOptions::default()
    };
    let demo = checkcombo::run_with::<Demo>((), options).await?;
    println!("Checked: {}", demo.combo.display_text());
    Ok(())
}
