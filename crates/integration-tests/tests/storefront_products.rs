//! End-to-end product listing.

use bazaar_integration_tests::TestContext;
use reqwest::StatusCode;

const LOADING: &str = "در حال بارگذاری محصولات...";
const NOT_FOUND: &str = "محصولی برای نمایش یافت نشد.";
const LOAD_ERROR: &str = "خطا در بارگذاری محصولات. لطفاً بعداً تلاش کنید.";

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let response = ctx.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_home_shows_loading_placeholder() {
    let ctx = TestContext::new().await;
    let body = ctx.get_text("/").await;

    assert!(body.contains(LOADING));
    assert!(body.contains("hx-get=\"/products/list?type=all\""));
    assert!(body.contains("id=\"cart-item-count\""));
}

#[tokio::test]
async fn test_list_all_products() {
    let ctx = TestContext::new().await;
    let body = ctx.get_text("/products/list").await;

    assert_eq!(body.matches("class=\"product-card\"").count(), 6);
}

#[tokio::test]
async fn test_filter_by_category() {
    let ctx = TestContext::new().await;
    let body = ctx.get_text("/products/list?type=currency").await;

    assert_eq!(body.matches("class=\"product-card\"").count(), 2);
    assert!(body.contains("cur-vbucks-1000"));
    assert!(!body.contains("acc-steam-01"));
}

#[tokio::test]
async fn test_card_embeds_raw_price_for_add_to_cart() {
    let ctx = TestContext::new().await;
    let body = ctx.get_text("/products/list?type=account").await;

    assert!(body.contains("name=\"price\" value=\"450000\""));
    assert!(body.contains("۴۵۰٬۰۰۰ تومان"));
}

#[tokio::test]
async fn test_filter_without_matches_renders_not_found() {
    let ctx = TestContext::new().await;
    let body = ctx.get_text("/products/list?type=gift-card").await;

    assert!(body.contains(NOT_FOUND));
    assert!(!body.contains("product-card"));
}

#[tokio::test]
async fn test_missing_catalog_renders_error_state() {
    let ctx = TestContext::with_catalog("/nonexistent/products.json").await;
    let response = ctx.get("/products/list").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains(LOAD_ERROR));
}

#[tokio::test]
async fn test_category_with_reserved_characters_round_trips() {
    let path = std::env::temp_dir().join(format!("bazaar-catalog-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"products": [
            {"id": "gift-1", "name": "Gift", "platform": "PC", "image": "https://img.example/g.png", "price": 1000, "type": "gift & card+"},
            {"id": "gift-2", "name": "Other", "platform": "PC", "image": "https://img.example/o.png", "price": 1000, "type": "gift"}
        ]}"#,
    )
    .unwrap();
    let ctx = TestContext::with_catalog(&path.display().to_string()).await;

    let page = ctx.get_text("/products?type=gift%20%26%20card%2B").await;
    let list_url = "/products/list?type=gift%20%26%20card%2B";
    assert!(page.contains(&format!("hx-get=\"{list_url}\"")));

    let body = ctx.get_text(list_url).await;
    std::fs::remove_file(&path).unwrap();

    assert_eq!(body.matches("class=\"product-card\"").count(), 1);
    assert!(body.contains("gift-1"));
}
