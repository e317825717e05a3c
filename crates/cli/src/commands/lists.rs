//! Saved-list commands.
//!
//! The distinguished Wishlist cannot be renamed or deleted; that guard is
//! presentation policy, applied here before any network call, and the
//! backend enforces it independently.

use clap::Subcommand;

use avento_core::{List, ListId, ProductId, WISHLIST_NAME};

use super::{App, CliError};

#[derive(Subcommand)]
pub enum ListsAction {
    /// Show the cached lists
    Show,
    /// Refresh the cache from the backend
    Refresh,
    /// Create a new list
    Create {
        /// List name
        name: String,
    },
    /// Rename a list
    Rename {
        /// List id
        id: String,
        /// New name
        name: String,
    },
    /// Add a product to a list
    Add {
        /// List id
        list_id: String,
        /// Product id
        product_id: String,
    },
    /// Remove a product from a list (asks for confirmation)
    Remove {
        /// List id
        list_id: String,
        /// Product id
        product_id: String,
    },
    /// Delete a list (asks for confirmation)
    Delete {
        /// List id
        id: String,
    },
}

pub async fn run(app: &App, action: ListsAction) -> Result<(), CliError> {
    match action {
        ListsAction::Show => {
            render(&app.lists.lists());
            Ok(())
        }
        ListsAction::Refresh => {
            let lists = app.lists.fetch_lists().await?;
            render(&lists);
            Ok(())
        }
        ListsAction::Create { name } => {
            if name == WISHLIST_NAME {
                return Err(CliError::InvalidArgument(format!(
                    "\"{WISHLIST_NAME}\" is reserved"
                )));
            }
            let created = app.lists.create_list(&name).await?;
            println!("Created {} ({})", created.name, created.id);
            Ok(())
        }
        ListsAction::Rename { id, name } => {
            let id = ListId::new(id);
            guard_wishlist(app, &id)?;
            let updated = app.lists.update_list(&id, &name).await?;
            println!("Renamed to {}", updated.name);
            Ok(())
        }
        ListsAction::Add {
            list_id,
            product_id,
        } => {
            let updated = app
                .lists
                .add_product_to_list(&ListId::new(list_id), &ProductId::new(product_id))
                .await?;
            println!("{} now has {} product(s)", updated.name, updated.product_ids.len());
            Ok(())
        }
        ListsAction::Remove {
            list_id,
            product_id,
        } => {
            let updated = app
                .lists
                .remove_product_from_list(&ListId::new(list_id), &ProductId::new(product_id))
                .await?;
            match updated {
                Some(list) => {
                    println!("{} now has {} product(s)", list.name, list.product_ids.len());
                }
                None => println!("Cancelled."),
            }
            Ok(())
        }
        ListsAction::Delete { id } => {
            let id = ListId::new(id);
            guard_wishlist(app, &id)?;
            if app.lists.delete_list(&id).await? {
                println!("List deleted.");
            } else {
                println!("Cancelled.");
            }
            Ok(())
        }
    }
}

fn render(lists: &[List]) {
    if lists.is_empty() {
        println!("No lists yet.");
        return;
    }
    for list in lists {
        println!("{}  {} ({} products)", list.id, list.name, list.product_ids.len());
        for product_id in &list.product_ids {
            println!("    {product_id}");
        }
    }
}

/// Refuse renames/deletes aimed at the cached Wishlist.
fn guard_wishlist(app: &App, id: &ListId) -> Result<(), CliError> {
    let is_wishlist = app
        .lists
        .lists()
        .iter()
        .any(|list| &list.id == id && list.is_wishlist());
    if is_wishlist {
        return Err(CliError::InvalidArgument(format!(
            "the {WISHLIST_NAME} cannot be renamed or deleted"
        )));
    }
    Ok(())
}
