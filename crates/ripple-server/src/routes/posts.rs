use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ripple_api_types::pagination::Pagination;
use ripple_api_types::routes::posts::{
    EditPost, LikePostResponse, PublishPost, UnlikePostResponse,
};
use ripple_api_types::Sensitive;
use ripple_error::ApiError;
use ripple_model::id::PostId;

use super::morphers::IntoApiPostView;
use crate::extract::{Json, SessionUser};
use crate::{services, App};

pub async fn publish(
    app: App,
    session_user: SessionUser,
    Json(form): Json<PublishPost>,
) -> Result<Response, ApiError> {
    let request = services::posts::PublishPost {
        content: Sensitive::new(form.content.as_str()),
    };

    let view = request.perform(&app, &session_user).await?;
    let response = (StatusCode::CREATED, Json(view.into_api_post_view()));

    Ok(response.into_response())
}

pub async fn get(app: App, Path(id): Path<i64>) -> Result<Response, ApiError> {
    let request = services::posts::GetPost { id: PostId(id) };
    let view = request.perform(&app).await?;

    Ok(Json(view.into_api_post_view()).into_response())
}

pub async fn list_latest(
    app: App,
    Query(pagination): Query<Pagination>,
) -> Result<Response, ApiError> {
    let request = services::posts::ListLatestPosts { pagination };
    let posts = request.perform(&app).await?;
    let posts = posts
        .into_iter()
        .map(|v| v.into_api_post_view())
        .collect::<Vec<_>>();

    Ok(Json(posts).into_response())
}

pub async fn feed(
    app: App,
    session_user: SessionUser,
    Query(pagination): Query<Pagination>,
) -> Result<Response, ApiError> {
    let request = services::posts::GetPostFeed { pagination };
    let posts = request.perform(&app, &session_user).await?;
    let posts = posts
        .into_iter()
        .map(|v| v.into_api_post_view())
        .collect::<Vec<_>>();

    Ok(Json(posts).into_response())
}

pub async fn edit(
    app: App,
    session_user: SessionUser,
    Path(id): Path<i64>,
    Json(form): Json<EditPost>,
) -> Result<Response, ApiError> {
    let request = services::posts::EditPost {
        id: PostId(id),
        new_content: Sensitive::new(form.content.as_str()),
    };

    let view = request.perform(&app, &session_user).await?;
    Ok(Json(view.into_api_post_view()).into_response())
}

pub async fn delete(
    app: App,
    session_user: SessionUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let request = services::posts::DeletePost { id: PostId(id) };
    request.perform(&app, &session_user).await?;

    Ok(StatusCode::OK.into_response())
}

pub async fn like(
    app: App,
    session_user: SessionUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let request = services::posts::LikePost { id: PostId(id) };
    let result = request.perform(&app, &session_user).await?;
    let response = Json(LikePostResponse {
        liked: true,
        created: result.created,
    });

    Ok(response.into_response())
}

pub async fn unlike(
    app: App,
    session_user: SessionUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let request = services::posts::UnlikePost { id: PostId(id) };
    let result = request.perform(&app, &session_user).await?;
    let response = Json(UnlikePostResponse {
        liked: false,
        removed: result.removed,
    });

    Ok(response.into_response())
}
