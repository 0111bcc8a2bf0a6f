use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ripple_api_types::pagination::Pagination;
use ripple_api_types::routes::comments::CreateComment;
use ripple_api_types::Sensitive;
use ripple_error::ApiError;
use ripple_model::id::{CommentId, PostId};
use serde::Deserialize;

use super::morphers::IntoApiCommentView;
use crate::extract::{Json, SessionUser};
use crate::{services, App};

pub async fn create(
    app: App,
    session_user: SessionUser,
    Json(form): Json<CreateComment>,
) -> Result<Response, ApiError> {
    let request = services::comments::CreateComment {
        post_id: PostId(form.post_id),
        content: Sensitive::new(form.content.as_str()),
    };

    let view = request.perform(&app, &session_user).await?;
    let response = (StatusCode::CREATED, Json(view.into_api_comment_view()));

    Ok(response.into_response())
}

#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    pub post_id: i64,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list(
    app: App,
    Query(query): Query<ListCommentsQuery>,
) -> Result<Response, ApiError> {
    let request = services::comments::ListComments {
        post_id: PostId(query.post_id),
        pagination: Pagination {
            page: query.page,
            limit: query.limit,
        },
    };

    let comments = request.perform(&app).await?;
    let comments = comments
        .into_iter()
        .map(|v| v.into_api_comment_view())
        .collect::<Vec<_>>();

    Ok(Json(comments).into_response())
}

pub async fn delete(
    app: App,
    session_user: SessionUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let request = services::comments::DeleteComment { id: CommentId(id) };
    request.perform(&app, &session_user).await?;

    Ok(StatusCode::OK.into_response())
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use serde_json::json;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_comment_and_list() {
        test_utils::with_test_server(|app, mut server| async move {
            let _alice = test_utils::users::override_credentials()
                .app(&app)
                .server(&mut server)
                .name("alice")
                .call()
                .await;

            let response = server
                .post("/posts")
                .json(&json!({ "content": "discuss" }))
                .await;

            let post_id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

            let response = server
                .post("/comments")
                .json(&json!({ "post_id": post_id, "content": "me first" }))
                .await;

            response.assert_status(axum::http::StatusCode::CREATED);
            response.assert_json_contains(&json!({
                "post_id": post_id,
                "content": "me first",
            }));

            let response = server.get(&format!("/comments?post_id={post_id}")).await;
            response.assert_status_ok();
            response.assert_json_contains(&json!([{ "content": "me first" }]));
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn commenting_on_missing_posts_is_not_found() {
        test_utils::with_test_server(|app, mut server| async move {
            let _alice = test_utils::users::override_credentials()
                .app(&app)
                .server(&mut server)
                .name("alice")
                .call()
                .await;

            let response = server
                .post("/comments")
                .json(&json!({ "post_id": 2_000_000, "content": "hello?" }))
                .await;

            response.assert_status_not_found();
            response.assert_json_contains(&json!({ "code": "not_found" }));
        })
        .await;
    }
}
