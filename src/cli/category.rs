//! Category CLI commands

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_list};
use crate::error::TrackerResult;
use crate::models::EntryKind;
use crate::services::{CategoryChanges, CategoryService, CreateCategoryInput};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only income or only expense categories
        #[arg(short, long)]
        kind: Option<EntryKind>,
        /// Include deactivated categories
        #[arg(short, long)]
        all: bool,
    },

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// income or expense
        #[arg(short, long, default_value = "expense")]
        kind: EntryKind,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        /// Hex color such as #1E90FF
        #[arg(long)]
        color: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Deactivate the category
        #[arg(long, conflicts_with = "activate")]
        deactivate: bool,
        /// Reactivate the category
        #[arg(long)]
        activate: bool,
    },

    /// Delete an unused category
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> TrackerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind, all } => {
            let categories = service.list(kind, all)?;
            println!("{}", format_category_list(&categories));
        }

        CategoryCommands::Create {
            name,
            kind,
            description,
            icon,
            color,
        } => {
            let category = service.create(CreateCategoryInput {
                name,
                kind,
                description,
                icon,
                color,
            })?;

            println!("Created category: {}", category.name);
            println!("  Kind: {}", category.kind);
            println!("  ID:   {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let category = service.require(&category)?;
            print!("{}", format_category_details(&category));
        }

        CategoryCommands::Edit {
            category,
            name,
            description,
            icon,
            color,
            deactivate,
            activate,
        } => {
            let category = service.require(&category)?;

            let changes = CategoryChanges {
                name,
                description,
                icon,
                color,
            };
            let mut updated = service.update(category.id, changes)?;
            if deactivate || activate {
                updated = service.set_active(category.id, activate)?;
            }

            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let category = service.require(&category)?;
            let deleted = service.delete(category.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
