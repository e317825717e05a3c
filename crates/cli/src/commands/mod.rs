//! Command implementations and the shared application context.

pub mod address;
pub mod auth;
pub mod cart;
pub mod lists;
pub mod orders;
pub mod products;
pub mod settings;

use std::io::{BufRead, Write};

use thiserror::Error;
use url::Url;

use avento_client::api::{ApiClient, NominatimClient};
use avento_client::config::{ClientConfig, ConfigError};
use avento_client::state::{
    AddressSearch, Auth, Cart, ConfirmPrompt, Lists, Navigator, Settings, ThemeSink,
};
use avento_client::store::{JsonFileStore, StoreError};
use avento_client::toast::{Toast, ToastSubscription, ToastVariant, Toasts};
use avento_client::ClientError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Local persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A container operation failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A command argument did not validate.
    #[error("{0}")]
    InvalidArgument(String),
}

impl From<avento_client::api::ApiError> for CliError {
    fn from(error: avento_client::api::ApiError) -> Self {
        Self::Client(error.into())
    }
}

/// The production API client, persisted-session aware.
pub type Api = ApiClient<JsonFileStore>;

/// Everything a command needs: the shared API client plus one container per
/// state slice, wired to terminal capabilities.
pub struct App {
    pub api: Api,
    pub cart: Cart<JsonFileStore, Api, TerminalNavigator>,
    pub lists: Lists<JsonFileStore, Api, TerminalConfirm>,
    pub auth: Auth<JsonFileStore, Api, TerminalConfirm>,
    pub settings: Settings<JsonFileStore, Api, TerminalTheme>,
    pub address: AddressSearch<NominatimClient>,
    // Held so container notifications keep reaching the terminal.
    _toast_subscription: ToastSubscription,
}

impl App {
    /// Build the application context from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if configuration or the data directory fails.
    pub fn init(assume_yes: bool) -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let store = JsonFileStore::open(&config.data_dir)?;
        let api = ApiClient::new(&config, store.clone());
        let toasts = Toasts::new();
        let toast_subscription = toasts.subscribe(render_toasts);

        let confirm = TerminalConfirm { assume_yes };
        let cart = Cart::new(
            store.clone(),
            api.clone(),
            TerminalNavigator,
            toasts.clone(),
        );
        let lists = Lists::new(store.clone(), api.clone(), confirm);
        let auth = Auth::new(store.clone(), api.clone(), confirm, toasts.clone());
        let settings = Settings::new(store, api.clone(), TerminalTheme);
        let address = AddressSearch::new(NominatimClient::new(&config), toasts);

        Ok(Self {
            api,
            cart,
            lists,
            auth,
            settings,
            address,
            _toast_subscription: toast_subscription,
        })
    }
}

/// Print newly opened toasts to stderr, keeping stdout for command output.
fn render_toasts(toasts: &[Toast]) {
    for toast in toasts.iter().filter(|t| t.open) {
        match toast.variant {
            ToastVariant::Default => eprintln!("* {}: {}", toast.title, toast.description),
            ToastVariant::Destructive => eprintln!("! {}: {}", toast.title, toast.description),
        }
    }
}

/// Confirmation prompt backed by stdin, with a `--yes` bypass.
#[derive(Debug, Clone, Copy)]
pub struct TerminalConfirm {
    assume_yes: bool,
}

impl ConfirmPrompt for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{message} [y/N] ");
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Hands checkout redirects to the user; a terminal cannot follow them itself.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, url: &Url) {
        println!("Open to complete payment: {url}");
    }
}

/// Theme sink for a terminal session.
///
/// There is no OS media query to consult here; the system preference is
/// taken from the conventional `AVENTO_SYSTEM_DARK` variable, read at apply
/// time.
#[derive(Debug, Clone, Copy)]
pub struct TerminalTheme;

impl ThemeSink for TerminalTheme {
    fn apply(&self, dark: bool) {
        tracing::info!(dark, "theme applied");
    }

    fn system_prefers_dark(&self) -> bool {
        std::env::var("AVENTO_SYSTEM_DARK").is_ok_and(|v| v == "1" || v == "true")
    }
}
