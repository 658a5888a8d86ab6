//! API Router with Swagger UI

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, EmptyData};
use super::middleware::{auth_middleware, require_module, AuthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics};
use super::modules::personal::MAX_PHOTO_BYTES;
use super::modules::request_id::request_id_middleware;
use super::modules::{
    ajustes, auth, dashboard, dotacion, health, inventario, jornadas, personal, rutas, sedes,
};
use super::state::AppState;
use crate::domain::Module;
use crate::interfaces::ws::ws_live_handler;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        // Screens
        dashboard::get_dashboard,
        jornadas::list_jornadas,
        jornadas::export_jornadas,
        personal::list_trabajadores,
        personal::get_trabajador,
        personal::create_trabajador,
        personal::upload_photo,
        dotacion::get_stock,
        dotacion::get_entregas,
        sedes::list_sedes,
        sedes::get_sede,
        sedes::update_rates,
        inventario::get_inventario,
        rutas::get_rutas,
        // Settings
        ajustes::update_profile,
        ajustes::change_password,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::AccountInfo,
            personal::CreatedResponse,
            personal::PhotoResponse,
            sedes::UpdateRatesRequest,
            ajustes::UpdateProfileRequest,
            ajustes::ChangePasswordRequest,
            health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and backend health"),
        (name = "Authentication", description = "Sign-in with the identity provider, session and account"),
        (name = "Dashboard", description = "KPIs, hour breakdown and client ranking for the pay period"),
        (name = "Jornadas", description = "Attendance and payroll records, CSV export"),
        (name = "Personal", description = "Worker roster, onboarding and photos"),
        (name = "Dotacion", description = "PPE stock and issuances"),
        (name = "Sedes", description = "Client sites, cost centers and payroll rates"),
        (name = "Inventario", description = "Warehouse items and stock levels"),
        (name = "Rutas", description = "Transport routes"),
        (name = "Ajustes", description = "Profile and password"),
    ),
    info(
        title = "AMA Workforce API",
        version = "1.0.0",
        description = "Backend for the AMA workforce management screens",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Routes that need a signed-in user allowed to open `module`.
///
/// `route_layer` runs the last layer first, so authentication happens before
/// the module guard reads the user.
fn guarded(routes: Router<AppState>, module: Module, auth: &AuthState) -> Router<AppState> {
    routes
        .route_layer(middleware::from_fn_with_state(module, require_module))
        .route_layer(middleware::from_fn_with_state(auth.clone(), auth_middleware))
}

/// Create the API router with all routes.
///
/// `metrics` mounts `GET /metrics` when a Prometheus recorder is installed.
pub fn create_api_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let auth_state = AuthState::from_ref(&state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/auth/login", post(auth::login))
        // Authenticates from the query string
        .route("/api/v1/live/{screen}", get(ws_live_handler));

    // Any signed-in user
    let session_routes = Router::new()
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        .route(
            "/api/v1/ajustes/profile",
            put(ajustes::update_profile).layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES * 2)),
        )
        .route("/api/v1/ajustes/password", put(ajustes::change_password))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    let dashboard_routes = guarded(
        Router::new().route("/api/v1/dashboard", get(dashboard::get_dashboard)),
        Module::Dashboard,
        &auth_state,
    );

    let jornada_routes = guarded(
        Router::new().route("/api/v1/jornadas", get(jornadas::list_jornadas)),
        Module::Jornadas,
        &auth_state,
    );

    let report_routes = guarded(
        Router::new().route("/api/v1/jornadas/export.csv", get(jornadas::export_jornadas)),
        Module::Reportes,
        &auth_state,
    );

    let personal_routes = guarded(
        Router::new()
            .route(
                "/api/v1/personal",
                get(personal::list_trabajadores).post(personal::create_trabajador),
            )
            .route(
                "/api/v1/personal/photo",
                post(personal::upload_photo).layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES)),
            )
            .route("/api/v1/personal/{id}", get(personal::get_trabajador)),
        Module::Personal,
        &auth_state,
    );

    let dotacion_routes = guarded(
        Router::new()
            .route("/api/v1/dotacion/stock", get(dotacion::get_stock))
            .route("/api/v1/dotacion/entregas", get(dotacion::get_entregas)),
        Module::Dotacion,
        &auth_state,
    );

    let sede_routes = guarded(
        Router::new()
            .route("/api/v1/sedes", get(sedes::list_sedes))
            .route("/api/v1/sedes/{id}", get(sedes::get_sede))
            .route("/api/v1/sedes/{id}/rates", put(sedes::update_rates)),
        Module::Sedes,
        &auth_state,
    );

    let inventario_routes = guarded(
        Router::new().route("/api/v1/inventario", get(inventario::get_inventario)),
        Module::Inventario,
        &auth_state,
    );

    let ruta_routes = guarded(
        Router::new().route("/api/v1/rutas", get(rutas::get_rutas)),
        Module::Rutas,
        &auth_state,
    );

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(public_routes)
        .merge(session_routes)
        .merge(dashboard_routes)
        .merge(jornada_routes)
        .merge(report_routes)
        .merge(personal_routes)
        .merge(dotacion_routes)
        .merge(sede_routes)
        .merge(inventario_routes)
        .merge(ruta_routes)
        .with_state(state);

    if let Some(handle) = metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(handle),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
