/// Errors returned by [`CheckCombo`](crate::check_combo::CheckCombo) item operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComboError {
    /// The index does not name an existing item (or insertion point).
    #[error("item index {index} out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },
}
