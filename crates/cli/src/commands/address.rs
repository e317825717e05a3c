//! Delivery address lookup commands.

use clap::Subcommand;

use super::{App, CliError};

#[derive(Subcommand)]
pub enum AddressAction {
    /// Look up address candidates for a free-text query
    Search {
        /// Street, city, or full address fragment
        query: String,
    },
}

pub async fn run(app: &App, action: AddressAction) -> Result<(), CliError> {
    match action {
        AddressAction::Search { query } => {
            app.address.search(&query);
            app.address.wait_for_search().await;

            let state = app.address.state();
            if state.results.is_empty() {
                println!("No matches. Queries need at least 3 characters.");
                return Ok(());
            }
            for candidate in &state.results {
                println!(
                    "{}  {}  ({}, {})",
                    candidate.place_id, candidate.display_name, candidate.lat, candidate.lon
                );
            }
            Ok(())
        }
    }
}
