//! Actions returned by screen event handlers.

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` interprets these against the form and the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Create or update a record from the form, depending on its mode.
    Submit,
    /// Reset the form to create mode.
    ClearForm,
    /// Load the record at the given list index into the form.
    Edit(usize),
    /// Delete the record at the given list index.
    Delete(usize),
    /// Re-fetch the list.
    Refresh,
    /// Quit the application.
    Quit,
}
