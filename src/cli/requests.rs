use std::io::Write;

use clap::{Args, Subcommand};
use greenway::{pricing::REQUEST_DISCOUNT_PERCENT, products::ProductId, receipt};

use super::{CliError, ContactArgs, Shop};

#[derive(Debug, Args)]
pub(crate) struct RequestsCommand {
    #[command(subcommand)]
    command: RequestsSubcommand,
}

#[derive(Debug, Subcommand)]
enum RequestsSubcommand {
    /// Show the request queue
    Show,

    /// Request an out-of-stock product
    Add {
        /// Product id
        id: u32,

        #[command(flatten)]
        contact: ContactArgs,
    },

    /// Withdraw a request
    Remove {
        /// Product id
        id: u32,
    },

    /// Withdraw every request
    Clear,
}

pub(crate) fn run(
    shop: &Shop,
    command: RequestsCommand,
    mut out: impl Write,
) -> Result<(), CliError> {
    let storefront = &shop.storefront;

    match command.command {
        RequestsSubcommand::Show => {}
        RequestsSubcommand::Add { id, contact } => {
            let product = shop.product(id)?;

            if product.in_stock {
                return Err(CliError::InStock(product.name.clone()));
            }

            let customer = (!contact.is_empty()).then(|| contact.into_customer());

            match storefront.request_item(product, customer)? {
                Some(item) => writeln!(
                    out,
                    "Requested {} at {REQUEST_DISCOUNT_PERCENT}% off, expected {}",
                    item.product.name, item.estimated_arrival
                )?,
                None => writeln!(out, "{} is already requested.", product.name)?,
            }
        }
        RequestsSubcommand::Remove { id } => {
            storefront.remove_requested_item(ProductId::new(id))?;
        }
        RequestsSubcommand::Clear => storefront.clear_all_requests()?,
    }

    let requests = storefront.get_requests();

    receipt::write_requests(out, &requests, shop.catalog.currency())?;

    Ok(())
}
