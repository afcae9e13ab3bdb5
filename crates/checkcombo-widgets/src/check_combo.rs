//! Multi-select drop-down: a combo box whose popup rows carry check marks.
//!
//! The collapsed trigger line shows the checked entries joined by a
//! separator, or a dimmed placeholder when nothing is checked. Opening the
//! popup lets the user check and uncheck any number of entries without the
//! popup closing after each click.
//!
//! Input is routed through [`CheckCombo::update`] before any default combo
//! behavior, so:
//!
//! - a release over a row toggles it (unless it is the release of the very
//!   click that opened the popup, see [`release_guard`](crate::release_guard)),
//! - `Space` toggles or cycles the row under the cursor,
//! - arrow keys and the mouse wheel never change anything while the popup is
//!   closed; while it is open the wheel only scrolls the rows.
//!
//! Every user-driven toggle is reported with [`Message::FlagChanged`].

use crate::check_state::{CheckItem, CheckState};
use crate::delegate::{delegate_for, DelegateStyle, ItemDelegate, PopupStyle};
use crate::error::ComboError;
use crate::overlay;
use crate::release_guard::ReleaseGuard;
use crate::runeutil;
use crate::selection::SelectionState;
use checkcombo_core::command::Command;
use checkcombo_core::component::Component;
use checkcombo_core::subscription::Subscription;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use std::cell::Cell;
use std::time::Duration;

/// Messages for the check combo component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key event forwarded to the combo. Only acted on while focused.
    KeyPress(KeyEvent),
    /// A mouse event forwarded to the combo, hit-tested against the last render.
    Mouse(MouseEvent),
    /// Request to open the popup.
    ShowPopup,
    /// Request to close the popup.
    HidePopup,
    /// The host look changed; swap the row delegate.
    StyleChanged(PopupStyle),
    /// The release guard timer for the given generation fired.
    ReleaseGuardElapsed(u64),
    /// Emitted when the user toggles a row: the row index and whether it is
    /// now anything other than unchecked.
    FlagChanged(usize, bool),
}

/// Visual style configuration for the [`CheckCombo`] trigger and popup.
#[derive(Debug, Clone)]
pub struct CheckComboStyle {
    /// Style of the joined checked labels.
    pub text: Style,
    /// Style of the placeholder shown when nothing is checked.
    pub placeholder: Style,
    /// Style of the open/closed arrow.
    pub arrow: Style,
    /// Patched over the trigger line while the combo has focus.
    pub focused: Style,
    /// Palette handed to the row delegate.
    pub rows: DelegateStyle,
}

impl Default for CheckComboStyle {
    fn default() -> Self {
        Self {
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            arrow: Style::default().fg(Color::DarkGray),
            focused: Style::default().add_modifier(Modifier::UNDERLINED),
            rows: DelegateStyle::default(),
        }
    }
}

/// Where things were drawn last frame, for hit testing mouse events.
#[derive(Debug, Clone, Copy, Default)]
struct ComboLayout {
    trigger: Rect,
    popup: Rect,
    rows: Rect,
    offset: usize,
    /// Set by each popup render, cleared once input has adopted the drawn
    /// window.
    fresh: bool,
}

const ARROW_WIDTH: u16 = 2;

/// A drop-down that lets several entries be checked at once.
///
/// # Example
///
/// ```ignore
/// use checkcombo_widgets::check_combo::CheckCombo;
/// use checkcombo_widgets::check_state::CheckItem;
///
/// let mut combo = CheckCombo::new()
///     .with_placeholder("None")
///     .with_items(["First", "Second", "Third"]);
/// combo.insert_separator(3);
/// combo.add_check_item(CheckItem::new("Fourth - Disabled").with_enabled(false));
/// ```
pub struct CheckCombo {
    items: Vec<CheckItem>,
    selection: SelectionState,
    max_visible: usize,
    placeholder: String,
    separator: String,
    popup_style: PopupStyle,
    delegate: Box<dyn ItemDelegate>,
    style: CheckComboStyle,
    block: Option<Block<'static>>,
    popup_block: Option<Block<'static>>,
    open: bool,
    focus: bool,
    guard: ReleaseGuard,
    layout: Cell<ComboLayout>,
}

impl CheckCombo {
    /// Create an empty combo with the platform's popup style.
    pub fn new() -> Self {
        let style = CheckComboStyle::default();
        let popup_style = PopupStyle::platform_default();
        Self {
            items: Vec::new(),
            selection: SelectionState::new(0, 10),
            max_visible: 10,
            placeholder: String::new(),
            separator: ", ".to_string(),
            popup_style,
            delegate: delegate_for(popup_style, style.rows.clone()),
            style,
            block: None,
            popup_block: Some(Block::bordered()),
            open: false,
            focus: false,
            guard: ReleaseGuard::default(),
            layout: Cell::new(ComboLayout::default()),
        }
    }

    /// Append checkable entries.
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in items {
            self.add_item(text);
        }
        self
    }

    /// Set the text shown when no entry is checked.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the string joining checked labels (default `", "`).
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the popup presentation instead of the platform default.
    pub fn with_popup_style(mut self, style: PopupStyle) -> Self {
        self.set_popup_style(style);
        self
    }

    /// Set the maximum number of rows shown before the popup scrolls.
    pub fn with_max_visible(mut self, max: usize) -> Self {
        self.max_visible = max.max(1);
        self.selection.set_visible(self.max_visible);
        self
    }

    /// Set how long the release of the opening click stays blocked.
    pub fn with_double_click_interval(mut self, interval: Duration) -> Self {
        self.guard.set_interval(interval);
        self
    }

    /// Set the drag distance (in cells) that unblocks the release early.
    pub fn with_drag_threshold(mut self, cells: u16) -> Self {
        self.guard.set_threshold(cells);
        self
    }

    /// Set the block (border/title container) for the trigger area.
    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    /// Set the block for the popup overlay. Defaults to a plain border.
    pub fn with_popup_block(mut self, block: Option<Block<'static>>) -> Self {
        self.popup_block = block;
        self
    }

    /// Set the trigger and row styles.
    pub fn with_style(mut self, style: CheckComboStyle) -> Self {
        self.delegate = delegate_for(self.popup_style, style.rows.clone());
        self.style = style;
        self
    }

    // --- Items ---

    /// Append a checkable, enabled, unchecked entry.
    pub fn add_item(&mut self, text: impl AsRef<str>) {
        self.add_check_item(CheckItem::new(text));
    }

    /// Append a fully configured entry (or a separator).
    pub fn add_check_item(&mut self, item: CheckItem) {
        self.items.push(item);
        self.selection.set_count(self.items.len());
    }

    /// Insert an entry before `index`; `index == count()` appends.
    ///
    /// The cursor stays on the entry it was on.
    pub fn insert_item(&mut self, index: usize, item: CheckItem) -> Result<(), ComboError> {
        if index > self.items.len() {
            return Err(self.out_of_range(index));
        }
        self.insert_at(index, item);
        Ok(())
    }

    /// Insert a separator before `index`, clamped to the end of the list.
    pub fn insert_separator(&mut self, index: usize) {
        let index = index.min(self.items.len());
        self.insert_at(index, CheckItem::separator());
    }

    /// Remove and return the entry at `index`. Closes the popup when the
    /// last entry goes.
    pub fn remove_item(&mut self, index: usize) -> Result<CheckItem, ComboError> {
        if index >= self.items.len() {
            return Err(self.out_of_range(index));
        }
        let item = self.items.remove(index);
        let cursor = self.selection.cursor();
        self.selection.set_count(self.items.len());
        if index < cursor {
            self.selection.select(cursor - 1);
        }
        if self.items.is_empty() {
            self.hide_popup();
        }
        Ok(item)
    }

    /// Remove every entry and close the popup.
    pub fn clear(&mut self) {
        self.items.clear();
        self.selection.set_count(0);
        self.hide_popup();
    }

    /// Number of entries, separators included.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// All entries in list order.
    pub fn items(&self) -> &[CheckItem] {
        &self.items
    }

    /// The entry at `index`, if any.
    pub fn item(&self, index: usize) -> Option<&CheckItem> {
        self.items.get(index)
    }

    /// Label of the entry at `index`, if any.
    pub fn item_text(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(|item| item.text.as_str())
    }

    /// Enable or disable an entry. Disabled entries cannot hold the cursor
    /// or be toggled.
    pub fn set_item_enabled(&mut self, index: usize, enabled: bool) -> Result<(), ComboError> {
        self.item_mut(index)?.flags.enabled = enabled;
        Ok(())
    }

    /// Allow or forbid toggling an entry.
    pub fn set_item_checkable(&mut self, index: usize, checkable: bool) -> Result<(), ComboError> {
        self.item_mut(index)?.flags.checkable = checkable;
        Ok(())
    }

    /// Make space cycle this entry through all three states.
    pub fn set_item_tristate(&mut self, index: usize, tristate: bool) -> Result<(), ComboError> {
        self.item_mut(index)?.flags.tristate = tristate;
        Ok(())
    }

    // --- Check state ---

    /// The check state of the entry at `index`.
    ///
    /// Out-of-range indices read as [`CheckState::Unchecked`].
    pub fn item_check_state(&self, index: usize) -> CheckState {
        self.items
            .get(index)
            .map(|item| item.state)
            .unwrap_or_default()
    }

    /// Set the check state of the entry at `index`.
    ///
    /// Programmatic changes do not emit [`Message::FlagChanged`].
    pub fn set_item_check_state(
        &mut self,
        index: usize,
        state: CheckState,
    ) -> Result<(), ComboError> {
        self.item_mut(index)?.state = state;
        Ok(())
    }

    /// Indices of all fully checked entries, ascending.
    pub fn checked_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.state.is_checked())
            .map(|(i, _)| i)
            .collect()
    }

    /// Labels of all fully checked entries, in list order.
    pub fn checked_texts(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.state.is_checked())
            .map(|item| item.text.as_str())
            .collect()
    }

    /// The trigger text: checked labels joined by the separator, or the
    /// placeholder when nothing is checked.
    pub fn display_text(&self) -> String {
        let checked = self.checked_texts();
        if checked.is_empty() {
            self.placeholder.clone()
        } else {
            checked.join(&self.separator)
        }
    }

    /// Text shown when nothing is checked.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Replace the placeholder. Returns whether it actually changed.
    pub fn set_placeholder(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.placeholder == text {
            return false;
        }
        self.placeholder = text;
        true
    }

    /// String joining checked labels on the trigger line.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Replace the string joining checked labels.
    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    // --- Popup and focus ---

    /// Current popup presentation.
    pub fn popup_style(&self) -> PopupStyle {
        self.popup_style
    }

    /// Switch between list and menu presentation.
    pub fn set_popup_style(&mut self, style: PopupStyle) {
        if style != self.popup_style {
            log::debug!("check combo popup style {:?} -> {:?}", self.popup_style, style);
        }
        self.popup_style = style;
        self.delegate = delegate_for(style, self.style.rows.clone());
    }

    /// Open the popup. Does nothing when there are no entries.
    ///
    /// The cursor moves to the first selectable row unless it already rests
    /// on one.
    pub fn show_popup(&mut self) {
        if self.open || self.items.is_empty() {
            return;
        }
        self.open = true;
        self.guard.reset();
        let on_selectable = self
            .items
            .get(self.selection.cursor())
            .is_some_and(CheckItem::is_selectable);
        if !on_selectable {
            let items = &self.items;
            self.selection.first_where(|i| items[i].is_selectable());
        }
        log::debug!("check combo popup shown ({} items)", self.items.len());
    }

    /// Close the popup and forget any pending opening click.
    pub fn hide_popup(&mut self) {
        self.guard.reset();
        let layout = self.layout.get();
        self.layout.set(ComboLayout {
            popup: Rect::default(),
            rows: Rect::default(),
            offset: 0,
            fresh: false,
            ..layout
        });
        if self.open {
            self.open = false;
            log::debug!("check combo popup hidden");
        }
    }

    /// Whether the popup is open.
    pub fn is_popup_visible(&self) -> bool {
        self.open
    }

    /// Row under the popup cursor.
    pub fn current_index(&self) -> usize {
        self.selection.cursor()
    }

    /// Whether the release of the opening click is still being swallowed.
    pub fn release_blocked(&self) -> bool {
        self.guard.is_armed()
    }

    /// Generation of the current release guard, as carried by
    /// [`Message::ReleaseGuardElapsed`].
    pub fn release_guard_generation(&self) -> u64 {
        self.guard.generation()
    }

    /// Give the combo keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus and close the popup if open.
    pub fn blur(&mut self) {
        self.focus = false;
        self.hide_popup();
    }

    // --- Internals ---

    fn out_of_range(&self, index: usize) -> ComboError {
        ComboError::IndexOutOfRange {
            index,
            count: self.items.len(),
        }
    }

    fn insert_at(&mut self, index: usize, item: CheckItem) {
        let had_items = !self.items.is_empty();
        let cursor = self.selection.cursor();
        self.items.insert(index, item);
        self.selection.set_count(self.items.len());
        if had_items && index <= cursor {
            self.selection.select(cursor + 1);
        }
    }

    /// Adopt the window the last frame actually drew, once per frame.
    ///
    /// The popup may be cut to fit the terminal, so the drawn row count can
    /// be smaller than `max_visible`. Cursor moves must scroll against what
    /// is on screen, or the rows shift under a still pointer.
    fn sync_viewport(&mut self) {
        let mut layout = self.layout.get();
        if !self.open || !layout.fresh {
            return;
        }
        layout.fresh = false;
        self.layout.set(layout);
        self.selection.set_visible(layout.rows.height as usize);
        self.selection.set_offset(layout.offset);
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut CheckItem, ComboError> {
        let count = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(ComboError::IndexOutOfRange { index, count })
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if self.open {
            self.handle_popup_key(key)
        } else {
            match key.code {
                KeyCode::Down if key.modifiers.contains(KeyModifiers::ALT) => self.show_popup(),
                KeyCode::F(4) | KeyCode::Char(' ') => self.show_popup(),
                // Single-select combos step through values on these; a
                // multi-select one must not.
                KeyCode::Up
                | KeyCode::Down
                | KeyCode::PageUp
                | KeyCode::PageDown
                | KeyCode::Home
                | KeyCode::End => {}
                _ => {}
            }
            Command::none()
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Command<Message> {
        self.sync_viewport();
        match key.code {
            KeyCode::Char(' ') => return self.toggle_current(),
            KeyCode::Up if key.modifiers.contains(KeyModifiers::ALT) => {
                self.hide_popup();
                return Command::none();
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::F(4) => {
                self.hide_popup();
                return Command::none();
            }
            _ => {}
        }

        let items = &self.items;
        let selectable = |i: usize| items[i].is_selectable();
        match key.code {
            KeyCode::Up => self.selection.move_up_where(selectable),
            KeyCode::Down => self.selection.move_down_where(selectable),
            KeyCode::PageUp => self.selection.page_up_where(selectable),
            KeyCode::PageDown => self.selection.page_down_where(selectable),
            KeyCode::Home => self.selection.first_where(selectable),
            KeyCode::End => self.selection.last_where(selectable),
            _ => {}
        }
        Command::none()
    }

    /// Space on the cursor row: tri-state rows cycle, others flip between
    /// checked and unchecked.
    fn toggle_current(&mut self) -> Command<Message> {
        let row = self.selection.cursor();
        let Some(item) = self.items.get_mut(row) else {
            return Command::none();
        };
        if !item.accepts_toggle() {
            return Command::none();
        }
        item.state = if item.flags.tristate {
            item.state.cycled()
        } else if item.state != CheckState::Checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        };
        log::debug!("check combo row {row} set to {:?} by key", item.state);
        Command::message(Message::FlagChanged(row, item.state != CheckState::Unchecked))
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Command<Message> {
        let pos = Position::new(mouse.column, mouse.row);
        self.sync_viewport();
        let layout = self.layout.get();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if layout.trigger.contains(pos) {
                    self.focus = true;
                    if self.open {
                        self.hide_popup();
                    } else {
                        self.show_popup();
                        if self.open {
                            self.guard.arm(pos);
                        }
                    }
                } else if self.open {
                    if layout.popup.contains(pos) {
                        self.hover(pos);
                    } else {
                        self.hide_popup();
                    }
                }
                Command::none()
            }
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) if self.open => {
                if self.guard.pointer_moved(pos) {
                    log::trace!("check combo release guard lifted by drag");
                }
                self.hover(pos);
                Command::none()
            }
            MouseEventKind::Up(MouseButton::Left) if self.open => self.release(pos),
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp
                if self.open && layout.popup.contains(pos) =>
            {
                let delta = if mouse.kind == MouseEventKind::ScrollDown { 1 } else { -1 };
                let items = &self.items;
                self.selection
                    .scroll_where(delta, |i| items[i].is_selectable());
                Command::none()
            }
            // A closed combo ignores the wheel: no value cycling.
            _ => Command::none(),
        }
    }

    fn hover(&mut self, pos: Position) {
        if let Some(row) = self.row_at(pos) {
            if self.items[row].is_selectable() {
                self.selection.select(row);
            }
        }
    }

    fn release(&mut self, pos: Position) -> Command<Message> {
        if self.guard.is_armed() {
            log::trace!("check combo swallowed release of opening click");
            return Command::none();
        }
        let Some(row) = self.row_at(pos) else {
            return Command::none();
        };
        let item = &mut self.items[row];
        if !item.accepts_toggle() {
            return Command::none();
        }
        let was_unchecked = item.state == CheckState::Unchecked;
        item.state = item.state.toggled();
        log::debug!("check combo row {row} set to {:?} by click", item.state);
        self.selection.select(row);
        Command::message(Message::FlagChanged(row, was_unchecked))
    }

    fn row_at(&self, pos: Position) -> Option<usize> {
        let layout = self.layout.get();
        overlay::row_at(layout.rows, layout.offset, pos).filter(|&row| row < self.items.len())
    }

    fn render_trigger(&self, frame: &mut Frame, area: Rect) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            frame.render_widget(block.clone(), area);
            inner
        } else {
            area
        };
        if inner.is_empty() {
            return;
        }
        let line_area = Rect { height: 1, ..inner };

        let (text, text_style) = if self.checked_indices().is_empty() {
            (self.placeholder.clone(), self.style.placeholder)
        } else {
            (self.display_text(), self.style.text)
        };
        let room = line_area.width.saturating_sub(ARROW_WIDTH) as usize;
        let text = runeutil::truncate(&text, room, "…");
        let pad = room.saturating_sub(runeutil::display_width(&text));
        let arrow = if self.open { " ▾" } else { " ▸" };

        let mut line = Line::from(vec![
            Span::styled(text, text_style),
            Span::raw(" ".repeat(pad)),
            Span::styled(arrow, self.style.arrow),
        ]);
        if self.focus {
            line = line.patch_style(self.style.focused);
        }
        frame.render_widget(Paragraph::new(line), line_area);
    }

    fn render_popup(&self, frame: &mut Frame, anchor: Rect) -> ComboLayout {
        let mut layout = ComboLayout {
            trigger: anchor,
            ..ComboLayout::default()
        };

        let border: u16 = if self.popup_block.is_some() { 2 } else { 0 };
        let rows = u16::try_from(self.items.len().min(self.max_visible)).unwrap_or(u16::MAX);
        let width = self
            .items
            .iter()
            .map(|item| self.delegate.width_hint(item))
            .max()
            .unwrap_or(0)
            .saturating_add(border);

        let height = rows.saturating_add(border);
        let popup = overlay::popup_area(anchor, frame.area(), height, width);
        if popup.height <= border || popup.width <= border {
            return layout; // not enough space
        }

        let inner = overlay::render_overlay(frame, popup, self.popup_block.as_ref());
        let visible = inner.height as usize;
        let cursor = self.selection.cursor();
        let mut offset = self
            .selection
            .offset()
            .min(self.items.len().saturating_sub(visible));
        if cursor < offset {
            offset = cursor;
        } else if cursor >= offset + visible {
            offset = cursor + 1 - visible;
        }

        for (i, item) in self.items.iter().enumerate().skip(offset).take(visible) {
            let row_area = Rect {
                y: inner.y + (i - offset) as u16,
                height: 1,
                ..inner
            };
            self.delegate
                .render(item, i == cursor, row_area, frame.buffer_mut());
        }

        layout.popup = popup;
        layout.rows = inner;
        layout.offset = offset;
        layout.fresh = true;
        layout
    }
}

impl Default for CheckCombo {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CheckCombo {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus && key.kind == KeyEventKind::Press => {
                self.handle_key(key)
            }
            Message::KeyPress(_) => Command::none(),
            Message::Mouse(mouse) => self.handle_mouse(mouse),
            Message::ShowPopup => {
                self.show_popup();
                Command::none()
            }
            Message::HidePopup => {
                self.hide_popup();
                Command::none()
            }
            Message::StyleChanged(style) => {
                self.set_popup_style(style);
                Command::none()
            }
            Message::ReleaseGuardElapsed(generation) => {
                self.guard.elapsed(generation);
                Command::none()
            }
            Message::FlagChanged(..) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        self.render_trigger(frame, area);
        let layout = if self.open {
            self.render_popup(frame, area)
        } else {
            ComboLayout {
                trigger: area,
                ..ComboLayout::default()
            }
        };
        self.layout.set(layout);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        self.guard
            .subscription(Message::ReleaseGuardElapsed)
            .into_iter()
            .collect()
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
