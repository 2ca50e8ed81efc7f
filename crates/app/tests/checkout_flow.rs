//! End-to-end storefront flow over the in-process store.
//!
//! Walks the whole purchase path through the public API: an admin seeds the
//! catalog, a customer builds a cart, applies a coupon, and checks out; the
//! placed order then shows up in history with the cart cleared.

use std::{sync::Arc, time::Duration};

use rust_decimal::Decimal;
use testresult::TestResult;

use hemline::cart::CartLine;
use hemline_app::{
    auth::{AuthContext, CurrentUser, IdentityProvider as _},
    context::AppContext,
    domain::{
        checkout::{CheckoutFlow, CheckoutStage, models::ShippingAddress},
        messages::watch_signups,
        orders::OrdersServiceError,
        products::models::{NewProduct, Rating, StoredProduct},
    },
    store::{MemoryStore, UserRecord, UserStore as _},
};

fn current_user(uid: &str) -> CurrentUser {
    CurrentUser {
        uid: uid.to_string(),
        email: Some(format!("{uid}@example.com")),
    }
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Asha Rao".to_string(),
        address: "14 Mill Road".to_string(),
        city: "Pune".to_string(),
        state: "MH".to_string(),
        zip: "411001".to_string(),
        phone: "9900112233".to_string(),
    }
}

fn line_for(stored: &StoredProduct, size: &str) -> CartLine {
    CartLine {
        product_id: stored.product_id.clone(),
        title: stored.product.title.clone(),
        image: stored
            .product
            .primary_image()
            .unwrap_or_default()
            .to_string(),
        unit_price: stored.product.final_price,
        quantity: 1,
        size: Some(size.to_string()),
    }
}

async fn seed_admin(store: &MemoryStore, uid: &str) -> Result<(), hemline_app::store::StoreError> {
    let mut record = UserRecord::new(uid);
    record.admin = true;

    store.put_user_record(&record).await
}

#[tokio::test]
async fn full_purchase_flow() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let app = AppContext::with_store(store.clone());

    // Admin seeds the catalog.
    seed_admin(&store, "staff").await?;
    app.identity.sign_in(current_user("staff"));

    let admin = app.current_auth().await?;
    assert!(admin.is_admin);

    let tee = app
        .products
        .create_product(
            &admin,
            NewProduct {
                title: "Boxy Fit Tee".to_string(),
                description: "Heavyweight cotton, dropped shoulders.".to_string(),
                category: "tees".to_string(),
                original_price: Some(Decimal::from(250)),
                discount_percent: Some(Decimal::from(20)),
                images: vec!["https://img.example/tee.jpg".to_string()],
                sizes: vec!["M".to_string(), "L".to_string()],
                rating: Rating::default(),
            },
        )
        .await?;

    assert_eq!(tee.product.final_price, Decimal::from(200));

    // Customer signs in and builds a cart; the same (product, size) pair
    // merges into one line.
    app.identity.sign_in(current_user("asha"));

    let customer = app.current_auth().await?;
    assert!(!customer.is_admin);

    app.carts
        .add_item(&customer, line_for(&tee, "M"))
        .await?;

    let cart = app
        .carts
        .add_item(&customer, line_for(&tee, "M"))
        .await?;

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total_quantity(), 2);

    // Checkout: address, coupon, pay.
    let subtotal: Decimal = cart.lines().iter().map(CartLine::line_total).sum();
    assert_eq!(subtotal, Decimal::from(400));

    let mut flow = CheckoutFlow::new(app.checkout.clone());

    flow.submit_address(address())?;

    let applied = flow.apply_coupon("save15", subtotal)?;
    assert_eq!(applied.discount, Decimal::from(60));

    let placed = flow.place_order(&customer, cart.lines()).await?;

    assert_eq!(flow.stage(), CheckoutStage::OrderPlaced);
    assert_eq!(placed.order.subtotal, Decimal::from(400));
    assert_eq!(placed.order.shipping, Decimal::ZERO);
    assert_eq!(placed.order.discount, Decimal::from(60));
    assert_eq!(placed.order.total, Decimal::from(340));
    assert_eq!(placed.order.coupon, "SAVE15");

    // The cart is cleared and the order shows up in history.
    let cart = app.carts.get_cart(&customer).await?;
    assert!(cart.is_empty());

    let history = app.orders.list_orders(&customer).await?;

    assert_eq!(history.len(), 1);
    assert_eq!(
        history.first().map(|stored| stored.order.total),
        Some(Decimal::from(340))
    );

    let fetched = app.orders.get_order(&customer, &placed.order_id).await?;
    assert_eq!(fetched, placed.order);

    // Nobody else can read it.
    let result = app
        .orders
        .get_order(&AuthContext::user("someone-else"), &placed.order_id)
        .await;

    assert!(
        matches!(result, Err(OrdersServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn new_accounts_are_greeted_after_signup() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let app = AppContext::with_store(store.clone());

    let watcher = watch_signups(
        app.identity.subscribe(),
        app.messages.clone(),
        Duration::ZERO,
    );

    app.identity.sign_in(current_user("asha"));

    // Ending the session ends the watcher once it has drained the change.
    let identity = app.identity.clone();
    drop(app);
    drop(identity);

    watcher.await?;

    for _ in 0..100 {
        if !store.messages().await.is_empty() {
            break;
        }

        tokio::task::yield_now().await;
    }

    let messages = store.messages().await;

    assert_eq!(messages.len(), 1);
    assert_eq!(messages.first().map(|m| m.user_id.as_str()), Some("asha"));

    Ok(())
}
