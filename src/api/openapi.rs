//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, companies, health, job_roles, loans, persons};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library and Personnel Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        books::list_book_copies,
        books::list_copies,
        books::create_copy,
        books::get_copy,
        books::update_copy,
        books::delete_copy,
        // Persons
        persons::list_persons,
        persons::get_person,
        persons::update_person,
        persons::delete_person,
        persons::get_person_by_national_id,
        persons::create_client,
        persons::list_clients,
        persons::list_clients_by_status,
        persons::get_client,
        persons::update_client,
        persons::delete_client,
        persons::create_employee,
        persons::list_employees,
        persons::list_active_employees,
        persons::list_employees_by_job_role,
        persons::get_employee,
        persons::update_employee,
        persons::delete_employee,
        // Job roles
        job_roles::list_job_roles,
        job_roles::create_job_role,
        job_roles::get_job_role,
        job_roles::update_job_role,
        job_roles::delete_job_role,
        job_roles::list_job_role_employees,
        // Companies
        companies::list_companies,
        companies::create_company,
        companies::get_company,
        companies::update_company,
        companies::delete_company,
        // Loans
        loans::create_loan,
        loans::list_loans,
        loans::get_loan,
        loans::return_loan,
        loans::list_patron_loans,
        loans::list_copy_loans,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookCopy,
            crate::models::book::CreateBookCopy,
            crate::models::book::UpdateBookCopy,
            // Persons
            crate::models::person::Person,
            crate::models::person::PersonBase,
            crate::models::person::PersonKind,
            crate::models::person::ClientStatus,
            crate::models::person::UpdatePerson,
            crate::models::person::CreateClient,
            crate::models::person::UpdateClient,
            crate::models::person::CreateEmployee,
            crate::models::person::UpdateEmployee,
            // Job roles
            crate::models::job_role::JobRole,
            crate::models::job_role::CreateJobRole,
            crate::models::job_role::UpdateJobRole,
            // Companies
            crate::models::company::Company,
            crate::models::company::CreateCompany,
            crate::models::company::UpdateCompany,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanStatus,
            crate::models::loan::CreateLoan,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog and copies"),
        (name = "persons", description = "Clients and employees"),
        (name = "job-roles", description = "Employee job roles"),
        (name = "companies", description = "Company records"),
        (name = "loans", description = "Loan management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
