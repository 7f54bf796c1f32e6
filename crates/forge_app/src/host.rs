//! Host environment capability for API key selection.

use async_trait::async_trait;

/// Key selection offered by the hosting environment.
///
/// A controller without a host treats the key as not selected.
#[async_trait]
pub trait KeySelector: Send + Sync {
    /// Whether the user already picked a key.
    async fn has_selected_api_key(&self) -> bool;

    /// Ask the user to pick a key.
    ///
    /// Returns the key when the host hands it over directly; hosts that
    /// inject it elsewhere return `None`.
    async fn open_select_key(&self) -> Option<String>;
}
