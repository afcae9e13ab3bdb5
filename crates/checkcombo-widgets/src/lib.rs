//! The multi-select check combo box and the pieces it is built from.
//!
//! [`CheckCombo`](check_combo::CheckCombo) implements
//! [`checkcombo_core::Component`], so it can be embedded inside any
//! [`checkcombo_core::Model`] and placed anywhere in a [`ratatui`] layout.
//!
//! # Widget
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`check_combo`] | Drop-down whose popup rows can be checked independently |
//!
//! # Building blocks
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`check_state`] | Tri-state check values and per-item flags |
//! | [`delegate`] | List and menu row renderers, chosen per platform |
//! | [`overlay`] | Popup placement, clearing and row hit testing |
//! | [`release_guard`] | Swallows the release of the click that opened the popup |
//! | [`selection`] | Popup cursor and scroll offset |
//! | [`runeutil`] | Unicode-aware string width and truncation utilities |
//! | [`error`] | [`ComboError`](error::ComboError) for index-based operations |

pub mod check_combo;
pub mod check_state;
pub mod delegate;
pub mod error;
pub mod overlay;
pub mod release_guard;
pub mod runeutil;
pub mod selection;

pub use check_combo::{CheckCombo, CheckComboStyle};
pub use check_state::{CheckItem, CheckState, ItemFlags, ItemKind};
pub use delegate::{DelegateStyle, ItemDelegate, ListDelegate, MenuDelegate, PopupStyle};
pub use error::ComboError;
