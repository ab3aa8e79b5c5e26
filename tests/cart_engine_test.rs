//! Cart engine behaviour against a real store.

mod common;

use merch_api::config::MAX_PRICE_CENTS;
use merch_api::domain::{CartItemChange, CartResponse};
use merch_api::errors::AppError;
use merch_api::services::ServiceContainer;

use common::{new_product, setup};

fn change(
    product_id: &str,
    quantity: i32,
    color: Option<&str>,
    size: Option<&str>,
) -> CartItemChange {
    CartItemChange {
        product_id: product_id.to_string(),
        quantity,
        color: color.map(str::to_string),
        size: size.map(str::to_string),
    }
}

#[tokio::test]
async fn test_repeated_add_merges_quantity_and_overwrites_variant() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let customer = ctx.register("Ada", "ada@example.com").await;
    let product = ctx.add_product(&admin, "Cloak", 2999).await;
    let carts = ctx.services.carts();

    let first = carts
        .add_to_cart(
            customer.user_id.clone(),
            change(&product.product_id, 2, Some("black"), Some("M")),
        )
        .await
        .unwrap();
    assert_eq!(first.quantity, 2);

    let merged = carts
        .add_to_cart(
            customer.user_id.clone(),
            change(&product.product_id, 3, Some("red"), Some("L")),
        )
        .await
        .unwrap();
    assert_eq!(merged.quantity, 5);
    assert_eq!(merged.color.as_deref(), Some("red"));
    assert_eq!(merged.size.as_deref(), Some("L"));

    let lines = carts.get_cart(customer.user_id.clone()).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id, first.id);
}

#[tokio::test]
async fn test_snapshot_survives_product_removal() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let customer = ctx.register("Ada", "ada@example.com").await;
    let product = ctx.add_product(&admin, "Cloak", 2999).await;
    let carts = ctx.services.carts();

    carts
        .add_to_cart(customer.user_id.clone(), change(&product.product_id, 1, None, None))
        .await
        .unwrap();

    ctx.services
        .catalog()
        .remove_product(admin.user_id.clone(), product.product_id.clone())
        .await
        .unwrap();

    let line = carts
        .get_cart_item(customer.user_id.clone(), product.product_id.clone())
        .await
        .unwrap();
    assert_eq!(line.product_name, "Cloak");
    assert_eq!(line.price_cents, 2999);
    assert_eq!(line.image, "cloak.png");
    assert_eq!(line.product_ref, product.product_id);

    // The catalog entry is gone, so the line can no longer be removed by reference
    let result = carts
        .remove_from_cart(customer.user_id.clone(), product.product_id.clone())
        .await;
    assert!(matches!(result, Err(AppError::ProductNotFound)));
}

#[tokio::test]
async fn test_unknown_product_creates_nothing() {
    let ctx = setup().await;
    let customer = ctx.register("Ada", "ada@example.com").await;
    let carts = ctx.services.carts();

    let result = carts
        .add_to_cart(customer.user_id.clone(), change("prd-missing", 1, None, None))
        .await;
    assert!(matches!(result, Err(AppError::ProductNotFound)));
    assert!(carts.get_cart(customer.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_positive_quantity_rejected() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let customer = ctx.register("Ada", "ada@example.com").await;
    let product = ctx.add_product(&admin, "Cloak", 2999).await;

    let result = ctx
        .services
        .carts()
        .add_to_cart(customer.user_id, change(&product.product_id, 0, None, None))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_remove_twice_reports_missing_item() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let customer = ctx.register("Ada", "ada@example.com").await;
    let product = ctx.add_product(&admin, "Cloak", 2999).await;
    let carts = ctx.services.carts();

    let never_added = carts
        .remove_from_cart(customer.user_id.clone(), product.product_id.clone())
        .await;
    assert!(matches!(never_added, Err(AppError::ItemNotFound)));

    carts
        .add_to_cart(customer.user_id.clone(), change(&product.product_id, 1, None, None))
        .await
        .unwrap();
    carts
        .remove_from_cart(customer.user_id.clone(), product.product_id.clone())
        .await
        .unwrap();

    let second = carts
        .remove_from_cart(customer.user_id.clone(), product.product_id.clone())
        .await;
    assert!(matches!(second, Err(AppError::ItemNotFound)));
}

#[tokio::test]
async fn test_update_applies_delta() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let customer = ctx.register("Ada", "ada@example.com").await;
    let product = ctx.add_product(&admin, "Cloak", 2999).await;
    let carts = ctx.services.carts();

    carts
        .add_to_cart(
            customer.user_id.clone(),
            change(&product.product_id, 4, Some("black"), None),
        )
        .await
        .unwrap();

    carts
        .update_cart_item(
            customer.user_id.clone(),
            change(&product.product_id, -1, Some("blue"), Some("S")),
        )
        .await
        .unwrap();

    let line = carts
        .get_cart_item(customer.user_id.clone(), product.product_id.clone())
        .await
        .unwrap();
    assert_eq!(line.quantity, 3);
    assert_eq!(line.color.as_deref(), Some("blue"));
    assert_eq!(line.size.as_deref(), Some("S"));
}

#[tokio::test]
async fn test_update_rejects_draining_the_line() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let customer = ctx.register("Ada", "ada@example.com").await;
    let product = ctx.add_product(&admin, "Cloak", 2999).await;
    let carts = ctx.services.carts();

    carts
        .add_to_cart(customer.user_id.clone(), change(&product.product_id, 2, None, None))
        .await
        .unwrap();

    let result = carts
        .update_cart_item(
            customer.user_id.clone(),
            change(&product.product_id, -2, None, None),
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let line = carts
        .get_cart_item(customer.user_id.clone(), product.product_id.clone())
        .await
        .unwrap();
    assert_eq!(line.quantity, 2);
}

#[tokio::test]
async fn test_update_missing_line() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let customer = ctx.register("Ada", "ada@example.com").await;
    let product = ctx.add_product(&admin, "Cloak", 2999).await;

    let result = ctx
        .services
        .carts()
        .update_cart_item(customer.user_id, change(&product.product_id, 1, None, None))
        .await;
    assert!(matches!(result, Err(AppError::ItemNotFound)));
}

#[tokio::test]
async fn test_empty_cart_is_not_an_error() {
    let ctx = setup().await;
    let customer = ctx.register("Ada", "ada@example.com").await;

    let lines = ctx.services.carts().get_cart(customer.user_id).await.unwrap();
    assert!(lines.is_empty());
}

#[tokio::test]
async fn test_unknown_user_rejected() {
    let ctx = setup().await;

    let result = ctx.services.carts().get_cart("usr-missing".to_string()).await;
    assert!(matches!(result, Err(AppError::UserNotFound)));
}

#[tokio::test]
async fn test_carts_are_per_user_and_ordered() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let ada = ctx.register("Ada", "ada@example.com").await;
    let grace = ctx.register("Grace", "grace@example.com").await;
    let cloak = ctx.add_product(&admin, "Cloak", 2999).await;
    let boots = ctx.add_product(&admin, "Boots", 4500).await;
    let carts = ctx.services.carts();

    carts
        .add_to_cart(ada.user_id.clone(), change(&cloak.product_id, 1, None, None))
        .await
        .unwrap();
    carts
        .add_to_cart(ada.user_id.clone(), change(&boots.product_id, 2, None, None))
        .await
        .unwrap();
    carts
        .add_to_cart(grace.user_id.clone(), change(&boots.product_id, 1, None, None))
        .await
        .unwrap();

    let lines = carts.get_cart(ada.user_id.clone()).await.unwrap();
    let names: Vec<_> = lines.iter().map(|l| l.product_name.as_str()).collect();
    assert_eq!(names, ["Cloak", "Boots"]);

    let other = carts.get_cart(grace.user_id.clone()).await.unwrap();
    assert_eq!(other.len(), 1);

    let missing = carts
        .get_cart_item(grace.user_id.clone(), cloak.product_id.clone())
        .await;
    assert!(matches!(missing, Err(AppError::ItemNotFound)));
}

#[tokio::test]
async fn test_oversized_price_rejected_and_large_cart_totals_stay_positive() {
    let ctx = setup().await;
    let admin = ctx.admin().await;
    let customer = ctx.register("Ada", "ada@example.com").await;

    let oversized = ctx
        .services
        .catalog()
        .add_product(admin.user_id.clone(), new_product("Crown", i64::MAX / 2 + 1))
        .await;
    assert!(matches!(oversized, Err(AppError::Validation(_))));

    let crown = ctx.add_product(&admin, "Crown", MAX_PRICE_CENTS).await;
    let carts = ctx.services.carts();
    carts
        .add_to_cart(
            customer.user_id.clone(),
            change(&crown.product_id, i32::MAX, None, None),
        )
        .await
        .unwrap();

    let cart = CartResponse::from(carts.get_cart(customer.user_id.clone()).await.unwrap());
    assert_eq!(cart.items[0].line_total_cents, MAX_PRICE_CENTS * i64::from(i32::MAX));
    assert_eq!(cart.summary.subtotal_cents, cart.items[0].line_total_cents);
    assert!(cart.summary.subtotal_cents > 0);
}
