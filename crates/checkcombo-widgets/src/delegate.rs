//! Row rendering strategies for the check combo popup.
//!
//! The popup draws every row through an [`ItemDelegate`]. Two delegates ship
//! with the crate, matching the two ways a platform presents a combo popup:
//!
//! | Style | Delegate | Look |
//! |-------|----------|------|
//! | [`PopupStyle::List`] | [`ListDelegate`] | `[x] First` check boxes, blank separator rows |
//! | [`PopupStyle::Menu`] | [`MenuDelegate`] | ` ✓ First` menu check marks, ruled separators |

use crate::check_state::{CheckItem, CheckState};
use crate::runeutil;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

/// How the popup presents its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupStyle {
    /// A checkable list view.
    List,
    /// A checkable menu.
    Menu,
}

impl PopupStyle {
    /// The popup style native to the host platform: menus on macOS, lists
    /// elsewhere.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            PopupStyle::Menu
        } else {
            PopupStyle::List
        }
    }

    /// The other style; handy for a "switch look" binding.
    pub fn toggled(self) -> Self {
        match self {
            PopupStyle::List => PopupStyle::Menu,
            PopupStyle::Menu => PopupStyle::List,
        }
    }
}

impl Default for PopupStyle {
    fn default() -> Self {
        Self::platform_default()
    }
}

/// Palette shared by the built-in delegates.
#[derive(Debug, Clone)]
pub struct DelegateStyle {
    /// Style for ordinary rows.
    pub normal: Style,
    /// Patched over the row under the cursor.
    pub current: Style,
    /// Style for disabled rows and separators.
    pub disabled: Style,
    /// Patched over the check box / check mark glyph.
    pub check: Style,
}

impl Default for DelegateStyle {
    fn default() -> Self {
        Self {
            normal: Style::default(),
            current: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            disabled: Style::default().fg(Color::DarkGray),
            check: Style::default().fg(Color::Green),
        }
    }
}

impl DelegateStyle {
    /// Resolve the style of a whole row from its flags and color overrides.
    fn row_style(&self, item: &CheckItem, current: bool) -> Style {
        let mut style = if item.flags.enabled {
            self.normal
        } else {
            self.disabled
        };
        if let Some(fg) = item.fg {
            style = style.fg(fg);
        }
        if let Some(bg) = item.bg {
            style = style.bg(bg);
        }
        if current && item.is_selectable() {
            style = style.patch(self.current);
        }
        style
    }
}

/// Draws and sizes one popup row.
pub trait ItemDelegate: Send {
    /// Paint `item` into the one-line `area`. `current` is set for the row
    /// under the cursor.
    fn render(&self, item: &CheckItem, current: bool, area: Rect, buf: &mut Buffer);

    /// Columns the row would like, used to widen the popup past its anchor.
    fn width_hint(&self, item: &CheckItem) -> u16;
}

/// Pick the delegate for a popup style.
pub fn delegate_for(style: PopupStyle, palette: DelegateStyle) -> Box<dyn ItemDelegate> {
    match style {
        PopupStyle::List => Box::new(ListDelegate { style: palette }),
        PopupStyle::Menu => Box::new(MenuDelegate { style: palette }),
    }
}

/// List-view rows: a `[x]`/`[-]`/`[ ]` box followed by the label.
///
/// Separator rows are left blank. The cursor highlight spans the full row.
#[derive(Debug, Clone, Default)]
pub struct ListDelegate {
    pub style: DelegateStyle,
}

const LIST_GUTTER: u16 = 4;

impl ItemDelegate for ListDelegate {
    fn render(&self, item: &CheckItem, current: bool, area: Rect, buf: &mut Buffer) {
        if item.is_separator() || area.is_empty() {
            return;
        }

        let style = self.style.row_style(item, current);
        buf.set_style(area, style);

        let check = if item.flags.checkable {
            match item.state {
                CheckState::Checked => "[x]",
                CheckState::PartiallyChecked => "[-]",
                CheckState::Unchecked => "[ ]",
            }
        } else {
            "   "
        };
        let check_style = if item.flags.enabled {
            style.patch(self.style.check)
        } else {
            style
        };
        let (x, _) = buf.set_stringn(area.x, area.y, check, area.width as usize, check_style);

        let text_x = (area.x + LIST_GUTTER).min(area.right()).max(x);
        let room = area.right().saturating_sub(text_x) as usize;
        let label = runeutil::truncate(&item.text, room, "…");
        buf.set_stringn(text_x, area.y, label, room, style);
    }

    fn width_hint(&self, item: &CheckItem) -> u16 {
        if item.is_separator() {
            return 0;
        }
        let text = runeutil::display_width(&item.text).min(u16::MAX as usize) as u16;
        LIST_GUTTER.saturating_add(text)
    }
}

/// Menu rows: a check-mark gutter, the label, and ruled separators.
///
/// Menus have no indeterminate mark, so partially checked rows draw an empty
/// gutter, the same as unchecked ones.
#[derive(Debug, Clone, Default)]
pub struct MenuDelegate {
    pub style: DelegateStyle,
}

const MENU_GUTTER: u16 = 3;

impl ItemDelegate for MenuDelegate {
    fn render(&self, item: &CheckItem, current: bool, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        if item.is_separator() {
            let rule = "─".repeat(area.width as usize);
            buf.set_stringn(area.x, area.y, rule, area.width as usize, self.style.disabled);
            return;
        }

        let style = self.style.row_style(item, current);
        buf.set_style(area, style);

        let mark = if item.flags.checkable && item.state.is_checked() {
            "✓"
        } else {
            " "
        };
        let mark_style = if item.flags.enabled {
            style.patch(self.style.check)
        } else {
            style
        };
        if area.width > 1 {
            buf.set_stringn(area.x + 1, area.y, mark, 1, mark_style);
        }

        let text_x = (area.x + MENU_GUTTER).min(area.right());
        // keep one column of right padding, like a menu item
        let room = area.right().saturating_sub(text_x).saturating_sub(1) as usize;
        let label = runeutil::truncate(&item.text, room, "…");
        buf.set_stringn(text_x, area.y, label, room, style);
    }

    fn width_hint(&self, item: &CheckItem) -> u16 {
        if item.is_separator() {
            return 0;
        }
        let text = runeutil::display_width(&item.text).min(u16::MAX as usize) as u16;
        MENU_GUTTER.saturating_add(text).saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        delegate: &dyn ItemDelegate,
        item: &CheckItem,
        current: bool,
        width: u16,
    ) -> (String, Buffer) {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        delegate.render(item, current, area, &mut buf);
        let text = (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        (text, buf)
    }

    #[test]
    fn list_draws_check_boxes() {
        let d = ListDelegate::default();
        let first = CheckItem::new("First").with_state(CheckState::Checked);
        let (text, _) = row(&d, &first, false, 12);
        assert_eq!(text, "[x] First   ");
        let (text, _) = row(&d, &CheckItem::new("Second"), false, 12);
        assert_eq!(text, "[ ] Second  ");
        let third = CheckItem::new("Third").with_state(CheckState::PartiallyChecked);
        let (text, _) = row(&d, &third, false, 12);
        assert_eq!(text, "[-] Third   ");
    }

    #[test]
    fn list_non_checkable_has_blank_box() {
        let d = ListDelegate::default();
        let (text, _) = row(&d, &CheckItem::new("Header").with_checkable(false), false, 10);
        assert_eq!(text, "    Header");
    }

    #[test]
    fn list_separator_paints_nothing() {
        let d = ListDelegate::default();
        let (text, _) = row(&d, &CheckItem::separator(), true, 6);
        assert_eq!(text, "      ");
    }

    #[test]
    fn list_current_row_is_highlighted_full_width() {
        let d = ListDelegate::default();
        let (_, buf) = row(&d, &CheckItem::new("A"), true, 8);
        assert!(buf[(7, 0)].modifier.contains(Modifier::REVERSED));
        let (_, buf) = row(&d, &CheckItem::new("A"), false, 8);
        assert!(!buf[(7, 0)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn list_truncates_long_labels() {
        let d = ListDelegate::default();
        let (text, _) = row(&d, &CheckItem::new("Fourth - Disabled"), false, 10);
        assert_eq!(text, "[ ] Fourt…");
    }

    #[test]
    fn disabled_rows_use_disabled_style_and_ignore_cursor() {
        let d = ListDelegate::default();
        let (_, buf) = row(&d, &CheckItem::new("Off").with_enabled(false), true, 8);
        assert_eq!(buf[(4, 0)].fg, Color::DarkGray);
        assert!(!buf[(4, 0)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn color_overrides_apply() {
        let d = MenuDelegate::default();
        let item = CheckItem::new("Red").with_fg(Color::Red).with_bg(Color::Blue);
        let (_, buf) = row(&d, &item, false, 8);
        assert_eq!(buf[(3, 0)].fg, Color::Red);
        assert_eq!(buf[(3, 0)].bg, Color::Blue);
    }

    #[test]
    fn menu_marks_only_fully_checked() {
        let d = MenuDelegate::default();
        let first = CheckItem::new("First").with_state(CheckState::Checked);
        let (text, _) = row(&d, &first, false, 10);
        assert_eq!(text, " ✓ First  ");
        let half = CheckItem::new("Half").with_state(CheckState::PartiallyChecked);
        let (text, _) = row(&d, &half, false, 10);
        assert_eq!(text, "   Half   ");
    }

    #[test]
    fn menu_separator_is_a_rule() {
        let d = MenuDelegate::default();
        let (text, _) = row(&d, &CheckItem::separator(), false, 4);
        assert_eq!(text, "────");
    }

    #[test]
    fn width_hints() {
        let item = CheckItem::new("First");
        assert_eq!(ListDelegate::default().width_hint(&item), 9);
        assert_eq!(MenuDelegate::default().width_hint(&item), 9);
        assert_eq!(ListDelegate::default().width_hint(&CheckItem::separator()), 0);
    }

    #[test]
    fn delegate_for_matches_style() {
        let item = CheckItem::new("x").with_state(CheckState::Checked);
        let list_delegate = delegate_for(PopupStyle::List, DelegateStyle::default());
        let (list, _) = row(list_delegate.as_ref(), &item, false, 5);
        assert!(list.starts_with("[x]"));
        let menu_delegate = delegate_for(PopupStyle::Menu, DelegateStyle::default());
        let (menu, _) = row(menu_delegate.as_ref(), &item, false, 5);
        assert!(menu.starts_with(" ✓"));
    }

    #[test]
    fn popup_style_toggles() {
        assert_eq!(PopupStyle::List.toggled(), PopupStyle::Menu);
        assert_eq!(PopupStyle::Menu.toggled(), PopupStyle::List);
    }
}
