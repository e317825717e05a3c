//! Order history commands.

use clap::Subcommand;

use super::{App, CliError};

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List past orders
    List,
}

pub async fn run(app: &App, action: OrdersAction) -> Result<(), CliError> {
    match action {
        OrdersAction::List => {
            let orders = app.api.fetch_orders().await?;
            if orders.is_empty() {
                println!("No orders yet.");
                return Ok(());
            }
            for order in &orders {
                println!(
                    "{}  {} item(s)  to {} at {}",
                    order.id,
                    order.product_ids.len(),
                    order.name,
                    order.address
                );
            }
            Ok(())
        }
    }
}
