//! Integration tests for the storefront's cart and request behaviour.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use jiff::civil::date;
use rust_decimal::Decimal;
use testresult::TestResult;

use greenway::{
    clock::FixedClock,
    config::StorefrontConfig,
    domain::customers::CustomerInfo,
    notifier::{Origin, Topic},
    products::{Catalog, Product, ProductId},
    store::MemoryStore,
    storefront::Storefront,
};

fn storefront_with(config: StorefrontConfig) -> Storefront {
    Storefront::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FixedClock::new(date(2025, 6, 1))),
        config,
    )
}

fn storefront() -> Storefront {
    storefront_with(StorefrontConfig::default())
}

fn product(catalog: &Catalog, id: u32) -> Result<Product, String> {
    catalog
        .get(ProductId::new(id))
        .cloned()
        .ok_or_else(|| format!("product {id} missing from catalog"))
}

fn change_counter(storefront: &Storefront) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);

    let _subscription = storefront.subscribe_to_changes(move |_change| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    count
}

fn customer() -> CustomerInfo {
    CustomerInfo {
        name: "Ada Fairway".to_string(),
        member_number: "GC-1042".to_string(),
        email: "ada@example.com".to_string(),
        pickup_date: Some(date(2025, 6, 4)),
    }
}

#[test]
fn every_catalog_product_added_twice_has_one_line_of_two() -> TestResult {
    let catalog = Catalog::builtin()?;

    for product in catalog.iter() {
        let storefront = storefront();

        storefront.add_to_cart(product)?;
        storefront.add_to_cart(product)?;

        let cart = storefront.get_cart();

        assert_eq!(cart.len(), 1, "one line for {}", product.name);
        assert_eq!(cart.first().map(|line| line.quantity), Some(2));
    }

    Ok(())
}

#[test]
fn non_positive_quantities_leave_cart_unchanged() -> TestResult {
    let catalog = Catalog::builtin()?;
    let storefront = storefront();
    let driver = product(&catalog, 1)?;

    storefront.add_to_cart(&driver)?;
    let before = storefront.get_cart();

    for quantity in [0, -1, -25] {
        storefront.update_quantity(driver.id, quantity)?;
        assert_eq!(storefront.get_cart(), before);
    }

    Ok(())
}

#[test]
fn totals_are_eight_percent_tax_on_subtotal() -> TestResult {
    let storefront = storefront();

    storefront.add_to_cart(&Product {
        id: ProductId::new(100),
        name: "Gift Card".to_string(),
        description: String::new(),
        price: Decimal::new(10_000, 2),
        category: None,
        gender: None,
        image: String::new(),
        in_stock: true,
    })?;

    let totals = storefront.totals();

    assert_eq!(totals.subtotal, Decimal::new(10_000, 2));
    assert_eq!(totals.tax, Decimal::new(800, 2));
    assert_eq!(totals.total, Decimal::new(10_800, 2));

    Ok(())
}

#[test]
fn request_is_priced_at_eighty_five_percent() -> TestResult {
    let storefront = storefront();
    let shoes = Product {
        id: ProductId::new(2),
        name: "Nike Golf Shoes".to_string(),
        description: String::new(),
        price: Decimal::new(12_999, 2),
        category: None,
        gender: None,
        image: String::new(),
        in_stock: false,
    };

    let item = storefront
        .request_item(&shoes, None)?
        .ok_or("request was ignored")?;

    assert_eq!(item.price(), Decimal::new(11_049, 2));
    assert_eq!(item.original_price, Some(Decimal::new(12_999, 2)));

    Ok(())
}

#[test]
fn removed_item_never_reappears() -> TestResult {
    let catalog = Catalog::builtin()?;
    let storefront = storefront();

    for product in catalog.iter() {
        storefront.add_to_cart(product)?;
    }

    storefront.remove_item(ProductId::new(3))?;

    assert!(storefront.get_cart().iter().all(|line| line.id() != ProductId::new(3)));
    assert_eq!(storefront.get_cart().len(), catalog.len() - 1);

    Ok(())
}

#[test]
fn coupled_removal_clears_both_documents() -> TestResult {
    let catalog = Catalog::builtin()?;
    let storefront = storefront_with(StorefrontConfig {
        coupled_removals: true,
        ..StorefrontConfig::default()
    });
    let putter = product(&catalog, 9)?;

    storefront.add_to_cart(&putter)?;
    storefront.request_item(&putter, None)?;

    storefront.remove_item(putter.id)?;

    assert!(storefront.get_cart().is_empty());
    assert!(storefront.get_requests().is_empty());

    Ok(())
}

#[test]
fn checkout_clears_cart_but_keeps_requests() -> TestResult {
    let catalog = Catalog::builtin()?;
    let storefront = storefront();

    storefront.add_to_cart(&product(&catalog, 1)?)?;
    storefront.request_item(&product(&catalog, 9)?, Some(customer()))?;
    let requests = storefront.get_requests();

    let confirmation = storefront.checkout(&customer())?;

    assert_eq!(confirmation.lines.len(), 1);
    assert!(storefront.get_cart().is_empty());
    assert_eq!(storefront.get_requests(), requests);

    Ok(())
}

#[test]
fn subscriber_sees_each_mutation_once_and_no_reads() -> TestResult {
    let catalog = Catalog::builtin()?;
    let storefront = storefront();
    let changes = change_counter(&storefront);
    let driver = product(&catalog, 1)?;
    let putter = product(&catalog, 9)?;

    storefront.add_to_cart(&driver)?;
    storefront.update_quantity(driver.id, 3)?;
    storefront.remove_item(driver.id)?;
    storefront.request_item(&putter, None)?;
    storefront.remove_requested_item(putter.id)?;
    storefront.clear_all_requests()?;

    assert_eq!(changes.load(Ordering::SeqCst), 6);

    let _cart = storefront.get_cart();
    let _requests = storefront.get_requests();
    let _totals = storefront.totals();

    assert_eq!(changes.load(Ordering::SeqCst), 6);

    Ok(())
}

#[test]
fn local_changes_name_their_topic() -> TestResult {
    let catalog = Catalog::builtin()?;
    let storefront = storefront();

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let _subscription = storefront.subscribe_to_changes(move |change| {
        if let Ok(mut seen) = sink.lock() {
            seen.push((change.topics().to_vec(), change.origin()));
        }
    });

    storefront.add_to_cart(&product(&catalog, 1)?)?;
    storefront.clear_all_requests()?;

    let seen = seen.lock().map_err(|error| error.to_string())?;

    assert_eq!(
        *seen,
        vec![
            (vec![Topic::Cart], Origin::ThisContext),
            (vec![Topic::Requests], Origin::ThisContext),
        ]
    );

    Ok(())
}
