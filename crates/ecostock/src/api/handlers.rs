//! Request handlers and the mapping from errors to HTTP responses.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::Error;
use crate::export::{self, CsvRow};
use crate::filter::StatusCounts;
use crate::inventory::{parse_status, Inventory, Resource, Saved};
use crate::model::{Distributor, Supplier};
use crate::notice::Notice;
use crate::report::{self, Period, ReportKind};

use super::{
    models::{
        ErrorResponse, Format, HealthResponse, ListParams, ReportParams, SearchParams,
        ValuationResponse,
    },
    AppState,
};

/// An [`Error`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::validation("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(Error::validation("query", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_invalid_input() {
            StatusCode::BAD_REQUEST
        } else if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_conflict() {
            StatusCode::CONFLICT
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            debug!("Request rejected ({status}): {}", self.0);
        }
        (
            status,
            Json(ErrorResponse {
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// JSON body or a CSV attachment named after `prefix` and `today`.
fn respond<T>(rows: Vec<T>, format: Format, prefix: &str, today: NaiveDate) -> ApiResult<Response>
where
    T: Serialize + CsvRow,
{
    match format {
        Format::Json => Ok(Json(rows).into_response()),
        Format::Csv => csv_response(&rows, prefix, today),
    }
}

fn csv_response<T: CsvRow>(rows: &[T], prefix: &str, today: NaiveDate) -> ApiResult<Response> {
    let body = export::to_csv_string(rows)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::export_file_name(prefix, today)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    let today = state.run(|inventory| Ok(inventory.today()))?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        today,
    }))
}

pub async fn list<R: Resource>(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let status = parse_status::<R::Status>(params.status.as_deref())?;
    let (rows, today) = state.run(|inventory| {
        let rows = R::list(inventory, params.search.as_deref(), status)?;
        Ok((rows, inventory.today()))
    })?;
    respond(rows, params.format, R::PLURAL, today)
}

pub async fn counts<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<StatusCounts<R::Status>>> {
    let counts = state.run(|inventory| R::counts(inventory, params.search.as_deref()))?;
    Ok(Json(counts))
}

pub async fn get_one<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<R>> {
    Ok(Json(state.run(|inventory| R::get(inventory, id))?))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    payload: Result<Json<R::Draft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Saved<R>>)> {
    let Json(draft) = payload?;
    let saved = state.run(|inventory| R::create(inventory, draft))?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<R::Draft>, JsonRejection>,
) -> ApiResult<Json<Saved<R>>> {
    let Json(draft) = payload?;
    Ok(Json(state.run(|inventory| R::update(inventory, id, draft))?))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Notice>> {
    Ok(Json(state.run(|inventory| R::delete(inventory, id))?))
}

pub async fn set_supplier_active<const ACTIVE: bool>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Saved<Supplier>>> {
    Ok(Json(
        state.run(|inventory| inventory.set_supplier_active(id, ACTIVE))?,
    ))
}

pub async fn set_distributor_active<const ACTIVE: bool>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Saved<Distributor>>> {
    Ok(Json(
        state.run(|inventory| inventory.set_distributor_active(id, ACTIVE))?,
    ))
}

pub async fn product_suppliers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Supplier>>> {
    Ok(Json(state.run(|inventory| inventory.suppliers_of_product(id))?))
}

pub async fn assign_supplier(
    State(state): State<AppState>,
    Path((product_id, supplier_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Notice>> {
    Ok(Json(state.run(|inventory| {
        inventory.assign_supplier(product_id, supplier_id)
    })?))
}

pub async fn unassign_supplier(
    State(state): State<AppState>,
    Path((product_id, supplier_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Notice>> {
    Ok(Json(state.run(|inventory| {
        inventory.unassign_supplier(product_id, supplier_id)
    })?))
}

pub async fn notify_expirations(State(state): State<AppState>) -> ApiResult<Json<Vec<Notice>>> {
    Ok(Json(state.run(Inventory::pending_notices)?))
}

pub async fn low_stock(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let (rows, today) =
        state.run(|inventory| Ok((inventory.low_stock_alerts()?, inventory.today())))?;
    respond(rows, params.format, "low_stock", today)
}

pub async fn expiring(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let status = parse_status(params.status.as_deref())?;
    let (rows, today) = state.run(|inventory| {
        let rows = inventory.expiring(params.search.as_deref(), status)?;
        Ok((rows, inventory.today()))
    })?;
    respond(rows, params.format, "expiring", today)
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Response> {
    let summary = state.run(Inventory::dashboard)?;
    Ok(Json(summary).into_response())
}

pub async fn stock_by_category(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let (rows, today) = state.run(|inventory| {
        let rows = inventory.stock_by_category(params.search.as_deref())?;
        Ok((rows, inventory.today()))
    })?;
    respond(
        rows,
        params.format,
        ReportKind::StockByCategory.file_prefix(),
        today,
    )
}

pub async fn movements(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let period = Period::new(params.period, params.from, params.to)?;
    let (report, today) =
        state.run(|inventory| Ok((inventory.movement_report(period)?, inventory.today())))?;
    match params.format {
        Format::Json => Ok(Json(report).into_response()),
        Format::Csv => csv_response(
            &report.buckets,
            &format!("{}_{}", ReportKind::Movements.file_prefix(), period.as_str()),
            today,
        ),
    }
}

pub async fn top_products(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let (rows, today) = state.run(|inventory| {
        let rows = inventory.top_products(params.category.as_deref(), params.limit)?;
        Ok((rows, inventory.today()))
    })?;
    respond(rows, params.format, ReportKind::TopProducts.file_prefix(), today)
}

pub async fn valuation(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let (rows, today) = state.run(|inventory| {
        let rows = inventory.valuation(params.category.as_deref(), params.low_stock)?;
        Ok((rows, inventory.today()))
    })?;
    match params.format {
        Format::Json => Ok(Json(ValuationResponse {
            total_value: report::total_value(&rows),
            rows,
        })
        .into_response()),
        Format::Csv => csv_response(&rows, ReportKind::Valuation.file_prefix(), today),
    }
}

pub async fn suppliers(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let (rows, today) =
        state.run(|inventory| Ok((inventory.supplier_report()?, inventory.today())))?;
    respond(rows, params.format, ReportKind::Suppliers.file_prefix(), today)
}

pub async fn reconciliation(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let (rows, today) = state.run(|inventory| Ok((inventory.reconcile()?, inventory.today())))?;
    if !rows.is_empty() {
        warn!("{} products disagree with their movement history", rows.len());
    }
    respond(
        rows,
        params.format,
        ReportKind::Reconciliation.file_prefix(),
        today,
    )
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "endpoint not found".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::{router, AppState};
    use crate::config::Config;
    use crate::inventory::Inventory;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn app(seeded: bool) -> Router {
        let mut config = Config::default();
        config.storage.seed_sample_data = false;
        let inventory = Inventory::open(&config).unwrap().with_today(today());
        if seeded {
            crate::seed::load(&inventory).unwrap();
        }
        router(AppState::new(inventory))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_reference_date() {
        let (status, body) = send_json(app(false), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["today"], "2024-06-15");
    }

    #[tokio::test]
    async fn create_then_fetch_category() {
        let app = app(false);
        let draft = json!({
            "name": "Fertilizantes",
            "description": "Nutrición de cultivos",
            "kind": "Insumo",
            "shelfLife": "2 años",
            "presentation": "Saco"
        });

        let (status, body) = send_json(app.clone(), "POST", "/categories", Some(draft)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["notice"]["level"], "success");
        let id = body["record"]["id"].as_i64().unwrap();

        let (status, body) = send_json(app, "GET", &format!("/categories/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shelfLife"], "2 años");
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let draft = json!({
            "name": "  ",
            "description": "x",
            "kind": "x",
            "shelfLife": "x",
            "presentation": "x"
        });
        let (status, body) = send_json(app(false), "POST", "/categories", Some(draft)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("name"));

        let (status, body) =
            send_json(app(false), "POST", "/units", Some(json!({ "name": 5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn missing_records_and_routes_are_not_found() {
        let (status, _) = send_json(app(false), "GET", "/products/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send_json(app(false), "GET", "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "endpoint not found");
    }

    #[tokio::test]
    async fn oversized_exit_is_a_conflict() {
        let app = app(true);
        let (_, products) = send_json(app.clone(), "GET", "/products?search=PROD002", None).await;
        let product_id = products[0]["id"].as_i64().unwrap();

        let exit = json!({
            "date": "2024-06-14",
            "kind": "exit",
            "productId": product_id,
            "quantity": 1000,
            "recordedBy": "Ana García",
            "notes": ""
        });
        let (status, body) = send_json(app, "POST", "/movements", Some(exit)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["message"].as_str().unwrap().contains("Glifosato"));
    }

    async fn create_product(app: &Router, stock: i64) -> i64 {
        let draft = json!({
            "code": "P1",
            "name": "Urea",
            "description": "Fertilizante",
            "stock": stock
        });
        let (status, body) = send_json(app.clone(), "POST", "/products", Some(draft)).await;
        assert_eq!(status, StatusCode::CREATED);
        body["record"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn huge_entry_is_rejected_and_service_stays_up() {
        let app = app(false);
        let product_id = create_product(&app, 10).await;

        let entry = json!({
            "date": "2024-06-14",
            "kind": "entry",
            "productId": product_id,
            "quantity": i64::MAX,
            "recordedBy": "Ana García",
            "notes": ""
        });
        let (status, body) = send_json(app.clone(), "POST", "/movements", Some(entry)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("quantity"));

        let (status, body) = send_json(app, "GET", &format!("/products/{product_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stock"], 10);
    }

    #[tokio::test]
    async fn partial_product_update_keeps_stock() {
        let app = app(false);
        let product_id = create_product(&app, 500).await;

        let edit = json!({ "code": "P1", "name": "Urea", "description": "new text" });
        let (status, body) =
            send_json(app.clone(), "PUT", &format!("/products/{product_id}"), Some(edit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["stock"], 500);
        assert_eq!(body["record"]["description"], "new text");

        let (_, body) = send_json(app, "GET", "/movements?status=exit", None).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_filters_by_status_and_counts() {
        let app = app(true);
        let (status, body) =
            send_json(app.clone(), "GET", "/movements?status=exit&search=ana", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body
            .as_array()
            .unwrap()
            .iter()
            .all(|m| m["kind"] == "exit" && m["recordedBy"] == "Ana García"));

        let (status, body) = send_json(app.clone(), "GET", "/movements/counts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 22);
        assert_eq!(body["byStatus"]["entry"], 9);
        assert_eq!(body["byStatus"]["exit"], 13);

        let (status, _) = send_json(app, "GET", "/products?status=sleeping", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn supplier_activation_and_assignment() {
        let app = app(true);
        let (status, body) = send_json(app.clone(), "POST", "/suppliers/2/deactivate", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["active"], false);

        let (_, body) = send_json(app.clone(), "GET", "/suppliers?status=inactive", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = send_json(app.clone(), "PUT", "/products/7/suppliers/2", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send_json(app.clone(), "GET", "/products/7/suppliers", None).await;
        assert_eq!(body[0]["name"], "Semillas Premium Ltda");

        let (status, _) = send_json(app.clone(), "DELETE", "/products/7/suppliers/2", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send_json(app, "DELETE", "/products/7/suppliers/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn expiry_notices_are_sent_once() {
        let app = app(true);
        let (status, body) = send_json(app.clone(), "POST", "/expirations/notify", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (_, body) = send_json(app.clone(), "POST", "/expirations/notify", None).await;
        assert!(body.as_array().unwrap().is_empty());

        let (_, body) = send_json(app, "GET", "/alerts/expiring?status=expired", None).await;
        assert_eq!(body[0]["lot"], "CIPER-2023-B07");
    }

    #[tokio::test]
    async fn reports_render_as_json() {
        let app = app(true);
        let (status, body) = send_json(app.clone(), "GET", "/reports/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalProducts"], 7);
        assert_eq!(body["outOfStock"], 1);

        let (status, body) =
            send_json(app.clone(), "GET", "/reports/movements?period=monthly", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["buckets"].as_array().unwrap().len(), 12);

        let (status, _) = send_json(
            app.clone(),
            "GET",
            "/reports/movements?period=custom&from=2024-06-10",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send_json(app.clone(), "GET", "/reports/top-products?limit=2", None).await;
        assert_eq!(body[0]["name"], "Urea Granulada 46%");

        let (_, body) = send_json(app, "GET", "/reports/reconciliation", None).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn valuation_can_be_limited_to_low_stock() {
        let app = app(true);
        let (status, body) =
            send_json(app.clone(), "GET", "/reports/valuation?lowStock=true", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            ["Insecticida Cipermetrina 25%", "Kit de Análisis de Suelo"]
        );

        let (_, body) = send_json(app, "GET", "/reports/valuation", None).await;
        assert_eq!(body["rows"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn csv_exports_are_attachments() {
        let app = app(true);
        let request = Request::builder()
            .uri("/reports/valuation?format=csv&category=Fertilizantes")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"reporte_inventario_2024-06-15.csv\""
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Urea Granulada 46%"));

        let (status, bytes) = send(app, "GET", "/categories?format=csv", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 5);
    }
}
