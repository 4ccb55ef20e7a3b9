use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State, rejection::QueryRejection},
};
use serde_json::{Value, json};
use tracing::info;

use crate::{
    database,
    error::AppError,
    models::{
        Book, BooksQuery, FeedEntry, FollowPayload, LoginPayload, LoginResponse, RegisterPayload,
        UpdateUserPayload,
    },
    state::State as AppState,
    upload::parse_book_form,
    utils::spine_width,
};

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<Value>, AppError> {
    let user_id = database::insert_user(&state.pool, &payload).await?;

    info!("Registered user {user_id}");

    Ok(Json(json!({ "message": "User registered", "userId": user_id })))
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = database::find_user(&state.pool, &payload.email, &payload.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let following = database::following_ids(&state.pool, user.id).await?;

    Ok(Json(LoginResponse {
        id: user.id,
        name: user.name,
        lib_name: user.lib_name,
        email: user.email,
        theme: user.theme,
        following,
    }))
}

pub async fn books_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BooksQuery>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(query) = query.map_err(|_| AppError::MalformedPayload)?;

    let books = database::books_for_user(&state.pool, query.user_id).await?;

    Ok(Json(books))
}

pub async fn create_book_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let (submission, cover_image) =
        parse_book_form(multipart, &state.config.upload_dir).await?;

    let width = spine_width(submission.review.chars().count());

    let book_id =
        database::insert_book(&state.pool, &submission, width, cover_image.as_deref()).await?;

    info!("User {} logged book {book_id}", submission.user_id);

    Ok(Json(json!({
        "message": "Book saved",
        "bookId": book_id,
        "coverImage": cover_image,
    })))
}

pub async fn feed_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FeedEntry>>, AppError> {
    let entries = database::feed(&state.pool).await?;

    Ok(Json(entries))
}

pub async fn like_handler(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<u64>,
) -> Result<Json<Value>, AppError> {
    database::like_book(&state.pool, book_id).await?;

    Ok(Json(json!({ "message": "Liked" })))
}

pub async fn follow_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FollowPayload>,
) -> Result<Json<Value>, AppError> {
    database::insert_follow(&state.pool, payload.follower_id, payload.following_id).await?;

    Ok(Json(json!({ "message": "Followed" })))
}

pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<Value>, AppError> {
    database::update_user(&state.pool, user_id, &payload).await?;

    Ok(Json(json!({ "message": "Profile updated" })))
}
