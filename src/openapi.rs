use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EasyStock API",
        description = r#"
# EasyStock Replenishment Planning API

Computes forward-looking replenishment schedules from a product's
historical daily-sales and stock series: review dates, projected stock,
forecast demand and recommended order quantities, plus a backtested
confidence score.

## Error Handling

Failing endpoints return a consistent JSON error body:

```json
{
  "error": "Not Found",
  "message": "Product 550e8400-e29b-41d4-a716-446655440000 not found",
  "request_id": "req-abc123",
  "timestamp": "2025-08-06T10:30:00Z"
}
```
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::forecast::generate_forecast,
        crate::handlers::forecast::save_forecast,
        crate::handlers::forecast::list_alerts,
    ),
    components(schemas(
        crate::models::Product,
        crate::models::HistoryRecord,
        crate::models::ForecastRequest,
        crate::models::ForecastPlan,
        crate::models::ReviewPlanEntry,
        crate::models::ForecastSummary,
        crate::models::AlertEntry,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "products", description = "Product catalog and sales history"),
        (name = "forecast", description = "Replenishment planning and saved runs")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
