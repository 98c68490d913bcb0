//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, history, members};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pustaka API",
        version = "0.1.0",
        description = "Library desk REST API: books, members and borrow/return history",
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
        books::get_book,
        books::create_book,
        books::delete_book,
        // Circulation
        books::change_status,
        books::get_transitions,
        books::get_open_loan,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        // History
        history::list_history,
        history::delete_history_entry,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookStatus,
            crate::models::book::BookQuery,
            crate::models::book::CreateBook,
            crate::models::book::BookTransitions,
            books::StatusChangeRequest,
            // Members
            crate::models::member::Member,
            crate::models::member::CreateMember,
            crate::models::member::UpdateMember,
            // History
            crate::models::history::HistoryEntry,
            crate::models::history::HistoryStatus,
            crate::models::history::HistoryView,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "circulation", description = "Borrow, return and reservation status changes"),
        (name = "members", description = "Member management"),
        (name = "history", description = "Borrow/return history log")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
