//! REST API over the inventory service.
//!
//! JSON bodies use camelCase field names. Errors come back as
//! `{"message": ...}` with a status code derived from the error kind.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use tracing::{debug, info, Instrument};

use crate::error::{Error, Result};
use crate::expiry::ExpiryAlert;
use crate::inventory::{Inventory, Resource};
use crate::model::{Category, Distributor, Movement, Product, Supplier, UnitOfMeasure};

mod handlers;
mod models;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    inventory: Arc<Mutex<Inventory>>,
    started_at: SystemTime,
}

impl AppState {
    /// Share `inventory` between requests.
    #[must_use]
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory: Arc::new(Mutex::new(inventory)),
            started_at: SystemTime::now(),
        }
    }

    /// Run `op` with exclusive access to the inventory.
    fn run<T>(&self, op: impl FnOnce(&Inventory) -> Result<T>) -> Result<T> {
        let inventory = self
            .inventory
            .lock()
            .map_err(|_| Error::internal("inventory lock poisoned"))?;
        op(&inventory)
    }
}

/// Build the router with every endpoint.
pub fn router(state: AppState) -> Router {
    let router = Router::new().route("/health", get(handlers::health));
    let router = with_resource::<Category>(router);
    let router = with_resource::<UnitOfMeasure>(router);
    let router = with_resource::<Product>(router);
    let router = with_resource::<Supplier>(router);
    let router = with_resource::<Distributor>(router);
    let router = with_resource::<Movement>(router);
    let router = with_resource::<ExpiryAlert>(router);

    router
        .route(
            "/suppliers/:id/activate",
            post(handlers::set_supplier_active::<true>),
        )
        .route(
            "/suppliers/:id/deactivate",
            post(handlers::set_supplier_active::<false>),
        )
        .route(
            "/distributors/:id/activate",
            post(handlers::set_distributor_active::<true>),
        )
        .route(
            "/distributors/:id/deactivate",
            post(handlers::set_distributor_active::<false>),
        )
        .route("/products/:id/suppliers", get(handlers::product_suppliers))
        .route(
            "/products/:id/suppliers/:supplier_id",
            put(handlers::assign_supplier).delete(handlers::unassign_supplier),
        )
        .route("/expirations/notify", post(handlers::notify_expirations))
        .route("/alerts/low-stock", get(handlers::low_stock))
        .route("/alerts/expiring", get(handlers::expiring))
        .route("/reports/dashboard", get(handlers::dashboard))
        .route("/reports/stock-by-category", get(handlers::stock_by_category))
        .route("/reports/movements", get(handlers::movements))
        .route("/reports/top-products", get(handlers::top_products))
        .route("/reports/valuation", get(handlers::valuation))
        .route("/reports/suppliers", get(handlers::suppliers))
        .route("/reports/reconciliation", get(handlers::reconciliation))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

/// Run each request inside a span and log its outcome.
async fn trace_request(request: Request<Body>, next: Next) -> Response {
    let span = tracing::info_span!(
        "http.request",
        method = %request.method(),
        path = %request.uri().path(),
    );
    let started = std::time::Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        debug!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis(),
            "Request handled"
        );
    });
    response
}

/// List, counts and per-record routes for one resource.
fn with_resource<R: Resource>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/{}", R::PLURAL);
    router
        .route(
            &base,
            get(handlers::list::<R>).post(handlers::create::<R>),
        )
        .route(&format!("{base}/counts"), get(handlers::counts::<R>))
        .route(
            &format!("{base}/:id"),
            get(handlers::get_one::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::delete::<R>),
        )
}

/// Serve the API on `addr` until `shutdown` completes.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(
    addr: SocketAddr,
    inventory: Inventory,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = router(AppState::new(inventory));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("REST service on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Shutdown requested");
        })
        .await?;
    info!("REST server exited");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serve_stops_on_shutdown() {
        let inventory = Inventory::in_memory().unwrap();
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        serve(addr, inventory, async {}).await.unwrap();
    }

    #[test]
    fn run_propagates_errors() {
        let state = AppState::new(Inventory::in_memory().unwrap());
        let err = state.run(|inventory| inventory.get_product(1)).unwrap_err();
        assert!(err.is_not_found());
    }
}
