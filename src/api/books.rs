//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookList, BookPayload, BookQuery},
};

use super::ApiResponse;

/// Data returned when a book is created
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: String,
}

/// Data returned for a single book
#[derive(Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}

/// Data returned for a listing: full books when filtered, `{id, name, publisher}` otherwise
#[derive(Serialize, ToSchema)]
pub struct BooksData {
    #[schema(value_type = Vec<Object>)]
    pub books: BookList,
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created, wrapped in the status envelope", body = BookIdData),
        (status = 400, description = "Missing name, readPage above pageCount or malformed body")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<BookPayload>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookIdData>>)> {
    let book_id = state.services.books.create_book(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Book added successfully",
            BookIdData { book_id },
        )),
    ))
}

/// List books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Books, wrapped in the status envelope", body = BooksData)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, AppError>,
) -> Json<ApiResponse<BooksData>> {
    // Raw pairs so repeated keys never reject the request
    let query = BookQuery::from_pairs(pairs);
    let books = state.services.books.list_books(&query).await;
    Json(ApiResponse::success(BooksData { books }))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details, wrapped in the status envelope", body = BookData),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<BookData>>> {
    let book = state.services.books.get_book(&id).await?;
    Ok(Json(ApiResponse::success(BookData { book })))
}

/// Update book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated"),
        (status = 400, description = "Missing name, readPage above pageCount or malformed body"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<BookPayload>, AppError>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.books.update_book(&id, payload).await?;
    Ok(Json(ApiResponse::message("Book updated successfully")))
}

/// Delete book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.books.delete_book(&id).await?;
    Ok(Json(ApiResponse::message("Book deleted successfully")))
}
