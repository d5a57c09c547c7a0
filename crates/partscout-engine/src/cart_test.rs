use super::*;

fn offer(id: Option<&str>, supplier: &str, price: i64) -> WarehouseOffer {
    WarehouseOffer {
        id: id.map(str::to_owned),
        supplier: supplier.to_owned(),
        name: "Central".to_owned(),
        price: Decimal::from(price),
        currency: Some("RUB".to_owned()),
        quantity: 10,
        delivery_days: Some(2),
        return_info: None,
    }
}

fn group(brand: &str, article: &str, warehouses: Vec<WarehouseOffer>) -> ProductGroup {
    ProductGroup {
        group_key: GroupKey::derive(brand, article),
        brand: brand.to_owned(),
        article: article.to_owned(),
        name: Some("Oil filter".to_owned()),
        description: None,
        supplier: "A".to_owned(),
        is_cross: false,
        images: vec![" ".to_owned(), "front.jpg".to_owned()],
        warehouses,
    }
}

// -----------------------------------------------------------------------
// add_line
// -----------------------------------------------------------------------

#[test]
fn repeat_add_increments_single_line() {
    let g = group("Bosch", "W142", vec![offer(Some("wh-1"), "A", 100)]);
    let mut cart = CartLedger::new();
    cart.add_line(&g, &g.warehouses[0]);
    let line = cart.add_line(&g, &g.warehouses[0]);
    assert_eq!(line.quantity, 2);
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.item_count(), 2);
}

#[test]
fn repeat_add_keeps_original_price() {
    let mut g = group("Bosch", "W142", vec![offer(Some("wh-1"), "A", 100)]);
    let mut cart = CartLedger::new();
    cart.add_line(&g, &g.warehouses[0]);
    g.warehouses[0].price = Decimal::from(80);
    let line = cart.add_line(&g, &g.warehouses[0]);
    assert_eq!(line.quantity, 2);
    assert_eq!(line.price, Decimal::from(100));
}

#[test]
fn different_offers_of_one_group_are_separate_lines() {
    let g = group(
        "Bosch",
        "W142",
        vec![offer(Some("wh-1"), "A", 100), offer(Some("wh-2"), "B", 90)],
    );
    let mut cart = CartLedger::new();
    cart.add_line(&g, &g.warehouses[0]);
    cart.add_line(&g, &g.warehouses[1]);
    assert_eq!(cart.line_count(), 2);
}

#[test]
fn add_snapshots_display_fields() {
    let g = group("Bosch", "W142", vec![offer(None, "Armtek", 100)]);
    let mut cart = CartLedger::new();
    let line = cart.add_line(&g, &g.warehouses[0]).clone();
    assert_eq!(line.product_id.as_str(), "bosch-w142");
    assert_eq!(line.warehouse_id, "Armtek|Central|100");
    assert_eq!(line.brand, "Bosch");
    assert_eq!(line.article, "W142");
    assert_eq!(line.name.as_deref(), Some("Oil filter"));
    assert_eq!(line.image.as_deref(), Some("front.jpg"));
    assert_eq!(line.supplier, "Armtek");
    assert_eq!(line.warehouse_name, "Central");
    assert_eq!(line.currency, "RUB");
}

#[test]
fn missing_currency_falls_back_to_default() {
    let mut o = offer(Some("wh-1"), "A", 100);
    o.currency = None;
    let g = group("Bosch", "W142", vec![o]);
    let mut cart = CartLedger::with_default_currency("EUR");
    let line = cart.add_line(&g, &g.warehouses[0]);
    assert_eq!(line.currency, "EUR");
}

#[test]
fn snapshot_is_isolated_from_catalog_changes() {
    let mut g = group("Bosch", "W142", vec![offer(Some("wh-1"), "A", 100)]);
    let mut cart = CartLedger::new();
    cart.add_line(&g, &g.warehouses[0]);

    g.warehouses[0].price = Decimal::from(1);
    g.name = Some("Renamed".to_owned());
    g.images.clear();

    let line = &cart.lines()[0];
    assert_eq!(line.price, Decimal::from(100));
    assert_eq!(line.name.as_deref(), Some("Oil filter"));
    assert_eq!(line.image.as_deref(), Some("front.jpg"));
}

#[test]
fn fallback_identity_collides_for_identical_name_and_price() {
    let g = group(
        "Bosch",
        "W142",
        vec![offer(None, "A", 100), offer(None, "A", 100)],
    );
    let mut cart = CartLedger::new();
    cart.add_line(&g, &g.warehouses[0]);
    cart.add_line(&g, &g.warehouses[1]);
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.lines()[0].quantity, 2);
}

// -----------------------------------------------------------------------
// remove_line / clear / lookups
// -----------------------------------------------------------------------

#[test]
fn remove_missing_line_is_noop() {
    let g = group("Bosch", "W142", vec![offer(Some("wh-1"), "A", 100)]);
    let mut cart = CartLedger::new();
    cart.add_line(&g, &g.warehouses[0]);
    let before = cart.lines().to_vec();

    assert!(cart.remove_line("idA", "idB").is_none());
    assert_eq!(cart.lines(), before.as_slice());
}

#[test]
fn remove_existing_line_returns_it() {
    let g = group("Bosch", "W142", vec![offer(Some("wh-1"), "A", 100)]);
    let mut cart = CartLedger::new();
    cart.add_line(&g, &g.warehouses[0]);
    let removed = cart.remove_line("bosch-w142", "wh-1");
    assert_eq!(removed.map(|l| l.quantity), Some(1));
    assert!(cart.is_empty());
}

#[test]
fn is_in_cart_reflects_contents() {
    let g = group("Bosch", "W142", vec![offer(Some("wh-1"), "A", 100)]);
    let mut cart = CartLedger::new();
    assert!(!cart.is_in_cart("bosch-w142", "wh-1"));
    cart.add_line(&g, &g.warehouses[0]);
    assert!(cart.is_in_cart("bosch-w142", "wh-1"));
    assert!(!cart.is_in_cart("bosch-w142", "wh-2"));
}

#[test]
fn is_offer_in_cart_resolves_fallback_identity() {
    let g = group("Bosch", "W142", vec![offer(None, "A", 100)]);
    let mut cart = CartLedger::new();
    cart.add_line(&g, &g.warehouses[0]);
    assert!(cart.is_offer_in_cart(&g, &g.warehouses[0]));
}

#[test]
fn clear_empties_ledger() {
    let g = group("Bosch", "W142", vec![offer(Some("wh-1"), "A", 100)]);
    let mut cart = CartLedger::new();
    cart.add_line(&g, &g.warehouses[0]);
    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);
}

// -----------------------------------------------------------------------
// total
// -----------------------------------------------------------------------

#[test]
fn total_sums_price_times_quantity() {
    let a = group("Bosch", "W142", vec![offer(Some("wh-1"), "A", 100)]);
    let b = group("Mann", "W712", vec![offer(Some("wh-9"), "B", 50)]);
    let mut cart = CartLedger::new();
    cart.add_line(&a, &a.warehouses[0]);
    cart.add_line(&a, &a.warehouses[0]);
    cart.add_line(&b, &b.warehouses[0]);
    assert_eq!(cart.total(), Decimal::from(250));
}

#[test]
fn total_keeps_fractional_prices_exact() {
    let mut o = offer(Some("wh-1"), "A", 0);
    o.price = Decimal::new(1010, 2);
    let g = group("Bosch", "W142", vec![o]);
    let mut cart = CartLedger::new();
    for _ in 0..3 {
        cart.add_line(&g, &g.warehouses[0]);
    }
    assert_eq!(cart.total(), Decimal::new(3030, 2));
}

#[test]
fn currencies_lists_distinct_values() {
    let mut eur = offer(Some("wh-2"), "B", 10);
    eur.currency = Some("EUR".to_owned());
    let g = group("Bosch", "W142", vec![offer(Some("wh-1"), "A", 100), eur]);
    let mut cart = CartLedger::new();
    cart.add_line(&g, &g.warehouses[0]);
    cart.add_line(&g, &g.warehouses[1]);
    assert_eq!(cart.currencies(), vec!["RUB", "EUR"]);
    assert_eq!(cart.total(), Decimal::from(110));
}
