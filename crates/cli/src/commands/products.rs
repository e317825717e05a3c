//! Catalog browsing commands.

use clap::Subcommand;

use avento_core::{Product, ProductId};

use super::{App, CliError};

#[derive(Subcommand)]
pub enum ProductsAction {
    /// Search the catalog by free text (omit the query to list everything)
    Search {
        /// Free-text query matched against product names
        query: Option<String>,
    },
    /// Show one product in full, including its reviews
    Show {
        /// Product id
        id: String,
    },
}

pub async fn run(app: &App, action: ProductsAction) -> Result<(), CliError> {
    match action {
        ProductsAction::Search { query } => search(app, query.as_deref()).await,
        ProductsAction::Show { id } => show(app, &ProductId::new(id)).await,
    }
}

async fn search(app: &App, query: Option<&str>) -> Result<(), CliError> {
    let products = app.api.search_products(query).await?;

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in &products {
        println!("{}", summary_line(product));
    }
    Ok(())
}

async fn show(app: &App, id: &ProductId) -> Result<(), CliError> {
    let product = app.api.product(id).await?;

    println!("{}", product.name);
    println!("  id:        {}", product.id);
    println!("  price:     {} {}", product.price, product.currency);
    println!("  category:  {}", product.category);
    println!("  inventory: {}", product.inventory);
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }

    let reviews = app.api.product_reviews(id).await?;
    if reviews.is_empty() {
        println!("  no reviews yet");
    } else {
        println!(
            "  {:.1}/5 across {} review(s):",
            product.average_review,
            reviews.len()
        );
        for review in &reviews {
            let author = review.author.as_deref().unwrap_or("anonymous");
            let comment = review.comment.as_deref().unwrap_or("");
            println!("    {:.1} - {author}: {comment}", review.rating);
        }
    }
    Ok(())
}

fn summary_line(product: &Product) -> String {
    let stock = if product.in_stock() { "" } else { "  [out of stock]" };
    format!(
        "{}  {} {}  {}{stock}",
        product.id, product.price, product.currency, product.name
    )
}
