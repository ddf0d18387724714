use std::io::Write;

use clap::{Args, Subcommand};
use greenway::{products::ProductId, receipt};

use super::{CliError, Shop};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart with its totals
    Show,

    /// Add one unit of a product
    Add {
        /// Product id
        id: u32,
    },

    /// Set a line's quantity; values below 1 are ignored
    #[command(allow_negative_numbers = true)]
    Set {
        /// Product id
        id: u32,

        /// New quantity
        quantity: i64,
    },

    /// Take one unit off a line, removing it at zero
    Decrement {
        /// Product id
        id: u32,
    },

    /// Remove a line
    Remove {
        /// Product id
        id: u32,
    },
}

pub(crate) fn run(shop: &Shop, command: CartCommand, mut out: impl Write) -> Result<(), CliError> {
    let storefront = &shop.storefront;

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add { id } => {
            let product = shop.product(id)?;

            if !product.in_stock {
                return Err(CliError::OutOfStock(product.name.clone()));
            }

            let line = storefront.add_to_cart(product)?;

            writeln!(out, "{} x{} in cart", line.product.name, line.quantity)?;
        }
        CartSubcommand::Set { id, quantity } => {
            if !storefront.update_quantity(ProductId::new(id), quantity)? {
                writeln!(out, "Quantity must be at least 1; cart unchanged.")?;
            }
        }
        CartSubcommand::Decrement { id } => storefront.decrement_quantity(ProductId::new(id))?,
        CartSubcommand::Remove { id } => storefront.remove_item(ProductId::new(id))?,
    }

    let lines = storefront.get_cart();
    let totals = storefront.totals();

    receipt::write_cart(out, &lines, &totals, shop.catalog.currency())?;

    Ok(())
}
