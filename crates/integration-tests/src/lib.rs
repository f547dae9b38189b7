//! Integration tests for Bazaar.
//!
//! Each test boots the storefront router in-process on an ephemeral port
//! and talks to it over HTTP with a cookie-keeping client, so the cart
//! travels in the session cookie exactly as it does in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```

use std::path::PathBuf;

use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::routes;
use bazaar_storefront::state::AppState;
use reqwest::{Client, Response};
use tokio::net::TcpListener;

/// A running storefront plus a visitor.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Start a storefront serving the bundled catalog.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn new() -> Self {
        let storefront_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront");
        let catalog = storefront_dir.join("data/products.json");
        Self::with_catalog(&catalog.display().to_string()).await
    }

    /// Start a storefront serving `catalog` (a file path or URL).
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    #[allow(clippy::expect_used)]
    pub async fn with_catalog(catalog: &str) -> Self {
        let storefront_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront");
        let static_dir = storefront_dir.join("static").display().to_string();
        let catalog = catalog.to_string();

        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_CATALOG" => Some(catalog.clone()),
            "STOREFRONT_STATIC_DIR" => Some(static_dir.clone()),
            _ => None,
        })
        .expect("valid test configuration");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener address");

        let app = routes::app(AppState::new(config));
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            client: new_visitor(),
            base_url: format!("http://{addr}"),
        }
    }

    /// A second visitor with its own cookie jar.
    #[must_use]
    pub fn other_visitor(&self) -> Self {
        Self {
            client: new_visitor(),
            base_url: self.base_url.clone(),
        }
    }

    /// GET `path` and return the response.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    #[allow(clippy::expect_used)]
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to `path` and return the response.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    #[allow(clippy::expect_used)]
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// GET `path` and return the body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    #[allow(clippy::expect_used)]
    pub async fn get_text(&self, path: &str) -> String {
        self.get(path).await.text().await.expect("response body")
    }

    /// Add a product to the cart the way a product card does.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or is rejected.
    pub async fn add_to_cart(&self, id: &str, name: &str, price: &str) -> Response {
        let image = format!("https://img.example/{id}.png");
        let response = self
            .post(
                "/cart/add",
                &[("id", id), ("name", name), ("price", price), ("image", &image)],
            )
            .await;
        assert!(response.status().is_success(), "add failed: {}", response.status());
        response
    }

    /// The navbar counter, as rendered.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn cart_count(&self) -> String {
        let body = self.get_text("/cart/count").await;
        body.rsplit_once('>')
            .and_then(|(head, _)| head.rsplit_once("</span"))
            .and_then(|(head, _)| head.rsplit_once('>'))
            .map(|(_, count)| count.trim().to_string())
            .unwrap_or_default()
    }
}

#[allow(clippy::expect_used)]
fn new_visitor() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
