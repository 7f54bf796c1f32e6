//! Fixed user-facing messages.

use forge_api::ErrorKind;

/// Shown when a blank genre is submitted.
pub const GENRE_REQUIRED: &str = "Please enter a game genre to analyze.";

/// Message shown to the user for a failed request of the given kind.
pub fn user_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidKey => {
            "Your API key is invalid or was not found. Please select a valid key to continue."
        }
        ErrorKind::RateLimit => "You've hit the request rate limit. Please wait a moment and try again.",
        ErrorKind::Network => "A network error occurred. Please check your connection and try again.",
        ErrorKind::BadResponse => {
            "The AI returned an unexpected or malformed response. Please try again."
        }
        ErrorKind::ResponseBlocked => {
            "The response was blocked by safety filters. Please try a different genre or rephrase your input."
        }
        ErrorKind::Unknown => "An unexpected error occurred. Please try again later.",
    }
}
