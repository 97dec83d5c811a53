use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use yamdb_core::error::AppError;
use yamdb_core::health::{healthz, readyz};
use yamdb_core::middleware::{propagate_request_id_layer, set_request_id_layer};

use crate::handlers::{
    auth::{confirm_email, obtain_token, refresh_token, signup},
    comment::{
        create_comment, delete_comment, get_comment, list_comments, patch_comment,
        replace_comment,
    },
    review::{
        create_review, delete_review, get_review, list_reviews, patch_review, replace_review,
    },
    taxonomy::{
        create_category, create_genre, delete_category, delete_genre, list_categories,
        list_genres,
    },
    title::{create_title, delete_title, get_title, list_titles, patch_title, replace_title},
    user::{
        create_user, delete_user, get_me, get_user, list_users, patch_me, patch_user,
        replace_user,
    },
};
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/email/", post(signup))
        .route("/auth/token/", post(confirm_email))
        .route("/token/", post(obtain_token))
        .route("/token/refresh/", post(refresh_token))
        // Titles
        .route("/titles/", get(list_titles).post(create_title))
        .route(
            "/titles/{title_id}/",
            get(get_title)
                .put(replace_title)
                .patch(patch_title)
                .delete(delete_title),
        )
        // Reviews
        .route(
            "/titles/{title_id}/reviews/",
            get(list_reviews).post(create_review),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/",
            get(get_review)
                .put(replace_review)
                .patch(patch_review)
                .delete(delete_review),
        )
        // Comments
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/",
            get(list_comments).post(create_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/",
            get(get_comment)
                .put(replace_comment)
                .patch(patch_comment)
                .delete(delete_comment),
        )
        // Genres and categories
        .route("/genres/", get(list_genres).post(create_genre))
        .route("/genres/{slug}/", delete(delete_genre))
        .route("/categories/", get(list_categories).post(create_category))
        .route("/categories/{slug}/", delete(delete_category))
        // Users
        .route("/users/", get(list_users).post(create_user))
        .route("/users/me/", get(get_me).patch(patch_me))
        .route(
            "/users/{username}/",
            get(get_user)
                .put(replace_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .fallback(not_found)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
        .with_state(state)
}
