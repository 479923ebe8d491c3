//! API handlers for Libris REST endpoints

pub mod books;
pub mod companies;
pub mod health;
pub mod job_roles;
pub mod loans;
pub mod openapi;
pub mod persons;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books and copies
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/copies", get(books::list_copies).post(books::create_copy))
        .route(
            "/books/copies/:id",
            get(books::get_copy).put(books::update_copy).delete(books::delete_copy),
        )
        .route(
            "/books/:id",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        .route("/books/:id/copies", get(books::list_book_copies))
        // Persons
        .route("/persons", get(persons::list_persons))
        .route(
            "/persons/:id",
            get(persons::get_person).put(persons::update_person).delete(persons::delete_person),
        )
        .route("/persons/national-id/:national_id", get(persons::get_person_by_national_id))
        // Clients
        .route("/persons/clients", get(persons::list_clients).post(persons::create_client))
        .route("/persons/clients/status/:status", get(persons::list_clients_by_status))
        .route(
            "/persons/clients/:id",
            get(persons::get_client).put(persons::update_client).delete(persons::delete_client),
        )
        // Employees
        .route("/persons/employees", get(persons::list_employees).post(persons::create_employee))
        .route("/persons/employees/active", get(persons::list_active_employees))
        .route("/persons/employees/job-role/:job_role_id", get(persons::list_employees_by_job_role))
        .route(
            "/persons/employees/:id",
            get(persons::get_employee).put(persons::update_employee).delete(persons::delete_employee),
        )
        // Job roles
        .route("/job-roles", get(job_roles::list_job_roles).post(job_roles::create_job_role))
        .route(
            "/job-roles/:id",
            get(job_roles::get_job_role)
                .put(job_roles::update_job_role)
                .delete(job_roles::delete_job_role),
        )
        .route("/job-roles/:id/employees", get(job_roles::list_job_role_employees))
        // Companies
        .route("/companies", get(companies::list_companies).post(companies::create_company))
        .route(
            "/companies/:id",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::create_loan))
        .route("/loans/:id", get(loans::get_loan))
        .route("/loans/:id/return", put(loans::return_loan))
        .route("/loans/patron/:patron_id", get(loans::list_patron_loans))
        .route("/loans/copy/:copy_id", get(loans::list_copy_loans))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, repository::Repository, services::Services};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Router over a pool that never connects unless a handler touches it
    fn test_router() -> Router {
        let config = AppConfig {
            server: Default::default(),
            database: Default::default(),
            logging: Default::default(),
            loans: Default::default(),
        };
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        let state = AppState {
            services: Arc::new(Services::new(&config.loans)),
            repository: Repository::new(pool),
            config: Arc::new(config),
        };
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_router()
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_non_numeric_loan_id_is_rejected() {
        let response = test_router()
            .oneshot(Request::get("/api/v1/loans/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_return_requires_put() {
        let response = test_router()
            .oneshot(
                Request::post("/api/v1/loans/1/return")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = test_router()
            .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["paths"]["/loans/{id}/return"]["put"].is_object());
    }
}
