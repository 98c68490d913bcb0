//! Book catalog and circulation endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, BookStatus, BookTransitions, CreateBook},
        history::HistoryEntry,
    },
};

use super::{AppJson, AppPath, AppQuery};

/// Status change request
#[derive(Deserialize, ToSchema)]
pub struct StatusChangeRequest {
    /// Requested next status
    pub status: BookStatus,
    /// Member on whose behalf the change is made (the borrower for returns)
    pub member_id: i32,
}

/// List books, or search them when `q` is given
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AppQuery(query): AppQuery<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = match query.q {
        Some(q) => state.services.catalog.search(&q).await?,
        None => state.services.catalog.list().await?,
    };
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_by_id(id).await?;
    Ok(Json(book))
}

/// Register a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Missing title or author", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AppJson(data): AppJson<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.catalog.create(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change the circulation status of a book
#[utoipa::path(
    put,
    path = "/books/{id}/status",
    tag = "circulation",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = Book),
        (status = 403, description = "Only the borrower may return the book", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Transition not allowed or no active loan", body = crate::error::ErrorResponse)
    )
)]
pub async fn change_status(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(request): AppJson<StatusChangeRequest>,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .circulation
        .request_status_change(id, request.status, request.member_id)
        .await?;
    Ok(Json(book))
}

/// Statuses the book may move to next
#[utoipa::path(
    get,
    path = "/books/{id}/transitions",
    tag = "circulation",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Current and allowed statuses", body = BookTransitions),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_transitions(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<BookTransitions>> {
    let transitions = state.services.circulation.allowed_transitions(id).await?;
    Ok(Json(transitions))
}

/// Borrow entry currently holding the book, or null
#[utoipa::path(
    get,
    path = "/books/{id}/loan",
    tag = "circulation",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Open loan, if any", body = Option<HistoryEntry>),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_open_loan(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Option<HistoryEntry>>> {
    let loan = state.services.circulation.open_loan(id).await?;
    Ok(Json(loan))
}
