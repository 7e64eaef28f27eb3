//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::routes::{admin, health, listings, teams, users};
use crate::api::types::{ErrorBody, PaginationMeta};
use crate::data::types::{
    AdminUserRow, ListingRow, OwnerSummary, ReviewRow, ReviewerSummary, TeamRow, UserRow,
};
use crate::domain::search::ValidationIssue;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nestmate API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Roommate, listing and team search"
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "listings", description = "Room listing search"),
        (name = "users", description = "Roommate profile search"),
        (name = "teams", description = "Team search"),
        (name = "admin", description = "Administrator search")
    ),
    paths(
        // Health
        health::health,
        // Listings
        listings::search_listings,
        listings::my_listings,
        listings::user_listings,
        listings::get_listing,
        // Users
        users::search_users,
        users::get_user,
        users::user_reviews,
        // Teams
        teams::search_teams,
        teams::my_teams,
        teams::get_team,
        // Admin
        admin::search_users,
        admin::search_listings,
        admin::search_teams,
    ),
    components(schemas(
        // API types
        ErrorBody,
        PaginationMeta,
        ValidationIssue,
        // Health
        health::HealthResponse,
        // Rows
        ListingRow,
        OwnerSummary,
        UserRow,
        AdminUserRow,
        TeamRow,
        ReviewRow,
        ReviewerSummary,
    ))
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Nestmate API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true
            });
        };
    </script>
</body>
</html>"#;
