use std::io::Write;

use clap::Args;
use greenway::{
    products::{ProductFilter, Selection},
    receipt,
};

use super::{CliError, Shop};

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Only products whose name or description contains this text
    #[arg(long)]
    search: Option<String>,

    /// All, Men's, Women's, Clubs, Shoes, Apparel or Accessories
    #[arg(long, default_value = "All")]
    category: Selection,
}

pub(crate) fn run(shop: &Shop, args: ProductsArgs, mut out: impl Write) -> Result<(), CliError> {
    let filter = ProductFilter {
        search: args.search.filter(|search| !search.trim().is_empty()),
        selection: args.category,
    };

    let mut matching = shop.catalog.filter(&filter).peekable();

    if matching.peek().is_none() {
        writeln!(out, "No products match.")?;
        return Ok(());
    }

    receipt::write_products(out, matching, shop.catalog.currency())?;

    Ok(())
}
