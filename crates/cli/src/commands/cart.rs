//! Cart commands.
//!
//! Quantity policy lives here, on the caller side of the container contract:
//! setting a quantity of 0 removes the line, and anything above
//! [`MAX_LINE_QUANTITY`] is rejected without touching the cart.

use clap::Subcommand;
use url::Url;

use avento_core::{CartItem, DeliveryDetails, ProductId};

use super::{App, CliError};

/// Largest quantity a single cart line may be set to.
const MAX_LINE_QUANTITY: u32 = 50;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart with its totals
    Show,
    /// Add a product to the cart (merges with an existing line)
    Add {
        /// Product id
        id: String,
        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Set a line's quantity (0 removes the line)
    SetQty {
        /// Product id
        id: String,
        /// New quantity
        quantity: u32,
    },
    /// Remove every line
    Clear,
    /// Start the external payment flow for the current cart
    Checkout {
        /// Recipient name (with --address, creates an order)
        #[arg(long, requires = "address")]
        name: Option<String>,
        /// Delivery address
        #[arg(long, requires = "name")]
        address: Option<String>,
    },
    /// Process the payment provider's return URL
    Complete {
        /// The URL the payment flow redirected back to
        url: String,
    },
}

pub async fn run(app: &App, action: CartAction) -> Result<(), CliError> {
    match action {
        CartAction::Show => show(app),
        CartAction::Add { id, quantity } => add(app, &ProductId::new(id), quantity).await,
        CartAction::Remove { id } => {
            app.cart.remove_item(&ProductId::new(id))?;
            Ok(())
        }
        CartAction::SetQty { id, quantity } => set_quantity(app, &ProductId::new(id), quantity),
        CartAction::Clear => {
            app.cart.clear()?;
            Ok(())
        }
        CartAction::Checkout { name, address } => checkout(app, name, address).await,
        CartAction::Complete { url } => complete(app, &url),
    }
}

fn show(app: &App) -> Result<(), CliError> {
    let items = app.cart.items();
    if items.is_empty() {
        println!("Your cart is empty");
        return Ok(());
    }

    for item in &items {
        println!(
            "{}  x{}  {} {}  {}",
            item.id,
            item.quantity,
            item.line_total(),
            item.currency,
            item.name
        );
    }
    println!(
        "Subtotal ({} items): {} ",
        app.cart.total_items(),
        app.cart.total_price()
    );
    Ok(())
}

async fn add(app: &App, id: &ProductId, quantity: u32) -> Result<(), CliError> {
    if quantity == 0 || quantity > MAX_LINE_QUANTITY {
        return Err(CliError::InvalidArgument(format!(
            "quantity must be between 1 and {MAX_LINE_QUANTITY}"
        )));
    }

    let product = app.api.product(id).await?;
    app.cart.add_item(CartItem::from_product(&product, quantity))?;
    Ok(())
}

fn set_quantity(app: &App, id: &ProductId, quantity: u32) -> Result<(), CliError> {
    // Zero means "take it out"; the container never stores a 0-quantity line.
    if quantity == 0 {
        app.cart.remove_item(id)?;
        return Ok(());
    }

    // Above the clamp: ignored without an error.
    if quantity > MAX_LINE_QUANTITY {
        tracing::debug!(%id, quantity, "quantity above limit ignored");
        return Ok(());
    }

    app.cart.update_quantity(id, quantity)?;
    Ok(())
}

async fn checkout(app: &App, name: Option<String>, address: Option<String>) -> Result<(), CliError> {
    let delivery = match (name, address) {
        (Some(name), Some(address)) => Some(DeliveryDetails { name, address }),
        _ => None,
    };

    app.cart.checkout(delivery.as_ref()).await?;
    Ok(())
}

fn complete(app: &App, url: &str) -> Result<(), CliError> {
    let url = Url::parse(url)
        .map_err(|e| CliError::InvalidArgument(format!("invalid return URL: {e}")))?;

    if app.cart.handle_return(&url)? {
        println!("Payment complete - cart cleared.");
    } else {
        println!("Payment not completed - cart kept.");
    }
    Ok(())
}
