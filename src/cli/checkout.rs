use std::io::Write;

use clap::Args;
use greenway::receipt;

use super::{CliError, ContactArgs, Shop};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    #[command(flatten)]
    contact: ContactArgs,
}

pub(crate) fn run(shop: &Shop, args: CheckoutArgs, out: impl Write) -> Result<(), CliError> {
    let customer = args.contact.into_customer();

    let confirmation = shop.storefront.checkout(&customer)?;

    receipt::write_confirmation(out, &confirmation, shop.catalog.currency())?;

    Ok(())
}
