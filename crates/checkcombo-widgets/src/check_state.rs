//! Check state and the checkable entries a [`CheckCombo`](crate::check_combo::CheckCombo) holds.

use crate::runeutil;
use ratatui::style::Color;

/// Tri-state check flag of a combo entry.
///
/// Variants are declared in cycle order, which is the order the space key
/// walks through on tri-state entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckState {
    /// Not checked.
    #[default]
    Unchecked,
    /// Partially checked (only reachable on tri-state entries or programmatically).
    PartiallyChecked,
    /// Checked.
    Checked,
}

impl CheckState {
    /// Map `0`, `1`, `2` (taken modulo 3) to the three states.
    pub fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => CheckState::Unchecked,
            1 => CheckState::PartiallyChecked,
            _ => CheckState::Checked,
        }
    }

    /// Position of this state in the cycle order.
    pub fn index(self) -> usize {
        match self {
            CheckState::Unchecked => 0,
            CheckState::PartiallyChecked => 1,
            CheckState::Checked => 2,
        }
    }

    /// `true` only for [`CheckState::Checked`].
    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }

    /// Two-state toggle used by mouse clicks: `Unchecked` becomes `Checked`,
    /// anything else becomes `Unchecked`.
    pub fn toggled(self) -> Self {
        match self {
            CheckState::Unchecked => CheckState::Checked,
            CheckState::PartiallyChecked | CheckState::Checked => CheckState::Unchecked,
        }
    }

    /// Next state in tri-state order, wrapping from `Checked` to `Unchecked`.
    pub fn cycled(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// Behavior flags of a combo entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemFlags {
    /// Disabled entries are dimmed and cannot be focused or toggled.
    pub enabled: bool,
    /// Whether the user may change the check state.
    pub checkable: bool,
    /// Space cycles through all three states instead of two.
    pub tristate: bool,
}

impl Default for ItemFlags {
    fn default() -> Self {
        Self {
            enabled: true,
            checkable: true,
            tristate: false,
        }
    }
}

/// Whether an entry is a regular row or a visual separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemKind {
    #[default]
    Normal,
    Separator,
}

/// One entry of the combo's flat item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    /// Label shown in the popup and, when checked, in the trigger line.
    pub text: String,
    /// Current check state.
    pub state: CheckState,
    /// Behavior flags.
    pub flags: ItemFlags,
    /// Row kind.
    pub kind: ItemKind,
    /// Foreground override for this row.
    pub fg: Option<Color>,
    /// Background override for this row.
    pub bg: Option<Color>,
}

impl CheckItem {
    /// A checkable, enabled, unchecked entry. Control characters in `text`
    /// are stripped.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            text: runeutil::sanitize(text.as_ref()),
            state: CheckState::Unchecked,
            flags: ItemFlags::default(),
            kind: ItemKind::Normal,
            fg: None,
            bg: None,
        }
    }

    /// A separator row. Separators are never selectable or checkable.
    pub fn separator() -> Self {
        Self {
            text: String::new(),
            state: CheckState::Unchecked,
            flags: ItemFlags {
                enabled: false,
                checkable: false,
                tristate: false,
            },
            kind: ItemKind::Separator,
            fg: None,
            bg: None,
        }
    }

    /// Set the initial check state.
    pub fn with_state(mut self, state: CheckState) -> Self {
        self.state = state;
        self
    }

    /// Set whether the row is enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.flags.enabled = enabled;
        self
    }

    /// Set whether the row can be toggled.
    pub fn with_checkable(mut self, checkable: bool) -> Self {
        self.flags.checkable = checkable;
        self
    }

    /// Set whether space cycles the row through the partial state.
    pub fn with_tristate(mut self, tristate: bool) -> Self {
        self.flags.tristate = tristate;
        self
    }

    /// Override the row foreground.
    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Override the row background.
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Whether this is a separator row.
    pub fn is_separator(&self) -> bool {
        self.kind == ItemKind::Separator
    }

    /// Whether the popup cursor may rest on this row.
    pub fn is_selectable(&self) -> bool {
        !self.is_separator() && self.flags.enabled
    }

    /// Whether a user click or key press may change this row's state.
    pub fn accepts_toggle(&self) -> bool {
        self.is_selectable() && self.flags.checkable
    }
}
