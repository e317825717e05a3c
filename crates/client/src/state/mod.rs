//! State containers.
//!
//! Each container owns one slice of client state, hydrates it from the
//! persistence adapter on construction, and exposes mutator operations.
//! Update policies differ deliberately:
//!
//! - [`cart::Cart`] is fully local and optimistic - the cart is ephemeral
//!   and device-local, so no server round-trip is needed
//! - [`lists::Lists`] is server-authoritative - every mutation waits for the
//!   backend's response and replaces the cached copy with it, so the client
//!   never displays a list state the server has not confirmed
//! - [`settings::Settings`] is optimistic with asynchronous write-behind
//!
//! Environment interactions that would block a mutator (confirmation
//! dialogs, browser navigation, theming) are injected as capabilities so
//! they can be stubbed deterministically in tests.

pub mod address;
pub mod auth;
pub mod cart;
pub mod lists;
pub mod settings;

pub use address::{AddressSearch, AddressState};
pub use auth::Auth;
pub use cart::Cart;
pub use lists::Lists;
pub use settings::Settings;

use url::Url;

/// A yes/no confirmation presented before destructive operations.
///
/// Returning `false` aborts the operation; a declined confirmation is a
/// no-op, not an error.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// Hands a checkout redirect URL off to the environment (browser, terminal).
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &Url);
}

/// Applies the visual theme and answers the OS-level dark-mode preference.
///
/// The preference is queried at apply time, never cached, so a tri-state
/// `None` setting tracks the OS while the app runs.
pub trait ThemeSink: Send + Sync {
    fn apply(&self, dark: bool);
    fn system_prefers_dark(&self) -> bool;
}
