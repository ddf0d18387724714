use std::{io, path::PathBuf, sync::Arc};

use clap::{Args, Parser, Subcommand};
use greenway::{
    clock::SystemClock,
    config::StorefrontConfig,
    domain::{
        carts::{CartsServiceError, CheckoutError},
        customers::CustomerInfo,
        requests::RequestsServiceError,
    },
    fixtures::FixtureError,
    products::{Catalog, Product, ProductId},
    receipt::ReceiptError,
    store::{JsonFileStore, StoreError},
    storefront::Storefront,
};
use jiff::civil::Date;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

mod cart;
mod checkout;
mod logging;
mod products;
mod requests;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("failed to install log subscriber")]
    Logging(#[from] TryInitError),

    #[error("failed to load product catalog")]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cart update failed")]
    Cart(#[from] CartsServiceError),

    #[error("request update failed")]
    Requests(#[from] RequestsServiceError),

    #[error("checkout failed")]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("no product with id {0}")]
    UnknownProduct(ProductId),

    #[error("{0} is not in stock; request it instead")]
    OutOfStock(String),

    #[error("{0} is in stock; add it to the cart instead")]
    InStock(String),
}

#[derive(Debug, Parser)]
#[command(name = "greenway", about = "Greenway pro-shop storefront", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding the cart and request documents
    #[arg(long, env = "GREENWAY_DATA_DIR", default_value = ".greenway")]
    data_dir: PathBuf,

    /// Product catalog fixture (YAML); the shipped catalog when omitted
    #[arg(long, env = "GREENWAY_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(flatten)]
    logging: logging::LoggingConfig,

    #[command(flatten)]
    storefront: StorefrontConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List catalog products
    Products(products::ProductsArgs),

    /// Show or change the cart
    Cart(cart::CartCommand),

    /// Show or change the gear request queue
    Requests(requests::RequestsCommand),

    /// Check out the cart for pickup
    Checkout(checkout::CheckoutArgs),
}

/// Contact details accepted by the request and checkout commands.
#[derive(Debug, Args)]
pub(crate) struct ContactArgs {
    /// Full name
    #[arg(long)]
    name: Option<String>,

    /// Club membership number
    #[arg(long)]
    member_number: Option<String>,

    /// Email address
    #[arg(long)]
    email: Option<String>,

    /// Pickup date (YYYY-MM-DD)
    #[arg(long)]
    pickup_date: Option<Date>,
}

impl ContactArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.member_number.is_none()
            && self.email.is_none()
            && self.pickup_date.is_none()
    }

    fn into_customer(self) -> CustomerInfo {
        CustomerInfo {
            name: self.name.unwrap_or_default(),
            member_number: self.member_number.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            pickup_date: self.pickup_date,
        }
    }
}

/// Everything a command needs: the storefront over the data directory and
/// the catalog it sells from.
#[derive(Debug)]
pub(crate) struct Shop {
    storefront: Storefront,
    catalog: Catalog,
}

impl Shop {
    fn product(&self, id: u32) -> Result<&Product, CliError> {
        let id = ProductId::new(id);

        self.catalog.get(id).ok_or(CliError::UnknownProduct(id))
    }
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), CliError> {
        logging::init_subscriber(&self.logging)?;

        let catalog = match &self.catalog {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin()?,
        };

        let store = JsonFileStore::open(&self.data_dir)?;
        let storefront = Storefront::new(Arc::new(store), Arc::new(SystemClock), self.storefront);

        let shop = Shop {
            storefront,
            catalog,
        };

        let out = io::stdout().lock();

        match self.command {
            Commands::Products(args) => products::run(&shop, args, out),
            Commands::Cart(command) => cart::run(&shop, command, out),
            Commands::Requests(command) => requests::run(&shop, command, out),
            Commands::Checkout(args) => checkout::run(&shop, args, out),
        }
    }
}
