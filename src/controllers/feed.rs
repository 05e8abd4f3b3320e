use axum::{
    extract::{
        multipart::Field,
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::domain::feed::{
    FeedListQuery, FeedPatchRequest, FeedPostRequest, FeedResponse, FeedService, FeedServiceApi,
    UploadedImage,
};
use crate::domain::shared::DataResponse;
use crate::domain::tag::{TagResponse, TagSearchQuery, TagService, TagServiceApi};
use crate::error::{AppError, AppResult};
use crate::infrastructure::auth::AuthUser;

/// Multipart part holding the JSON post body
pub const DATA_PART: &str = "data";
/// Multipart part holding the optional image
pub const FILE_PART: &str = "file";

pub struct FeedController {
    feed_service: Arc<FeedService>,
    tag_service: Arc<TagService>,
}

impl FeedController {
    pub fn new(feed_service: Arc<FeedService>, tag_service: Arc<TagService>) -> Self {
        Self {
            feed_service,
            tag_service,
        }
    }

    /// POST /feed - Create a feed from a multipart body (`data` JSON + optional `file`)
    pub async fn post_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
    ) -> AppResult<(StatusCode, Json<DataResponse<FeedResponse>>)> {
        let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let (request, image) = read_post_parts(&mut multipart).await?;

        let feed = controller
            .feed_service
            .post_feed(auth_user.member_id, request, image)
            .await?;
        Ok((StatusCode::CREATED, Json(DataResponse::new(feed))))
    }

    /// GET /feed/{feedId}
    pub async fn get_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        feed_id: Result<Path<i64>, PathRejection>,
    ) -> AppResult<Json<DataResponse<FeedResponse>>> {
        let Path(feed_id) = feed_id.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let feed = controller
            .feed_service
            .find_feed_by_id(auth_user.member_id, feed_id)
            .await?;
        Ok(Json(DataResponse::new(feed)))
    }

    /// GET /feed - Newest feeds first, paged by `lastFeedId`
    pub async fn get_feeds(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        query: Result<Query<FeedListQuery>, QueryRejection>,
    ) -> AppResult<Json<DataResponse<Vec<FeedResponse>>>> {
        let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let feeds = controller
            .feed_service
            .find_all(auth_user.member_id, query)
            .await?;
        Ok(Json(DataResponse::new(feeds)))
    }

    /// PATCH /feed/{feedId}
    pub async fn patch_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        feed_id: Result<Path<i64>, PathRejection>,
        request: Result<Json<FeedPatchRequest>, JsonRejection>,
    ) -> AppResult<Json<DataResponse<FeedResponse>>> {
        let Path(feed_id) = feed_id.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let Json(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let feed = controller
            .feed_service
            .update_feed(auth_user.member_id, feed_id, request)
            .await?;
        Ok(Json(DataResponse::new(feed)))
    }

    /// DELETE /feed/{feedId}
    pub async fn delete_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        feed_id: Result<Path<i64>, PathRejection>,
    ) -> AppResult<StatusCode> {
        let Path(feed_id) = feed_id.map_err(|e| AppError::BadRequest(e.body_text()))?;
        controller
            .feed_service
            .delete_feed(auth_user.member_id, feed_id)
            .await?;
        Ok(StatusCode::OK)
    }

    /// GET /feed/tags?tagName=&size=
    pub async fn find_tags(
        State(controller): State<Arc<FeedController>>,
        query: Result<Query<TagSearchQuery>, QueryRejection>,
    ) -> AppResult<Json<DataResponse<Vec<TagResponse>>>> {
        let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let tags = controller
            .tag_service
            .find_tags(&query.tag_name, query.size)
            .await?;
        Ok(Json(DataResponse::new(tags)))
    }

    /// POST /feed/{feedId}/likes
    pub async fn do_like(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        feed_id: Result<Path<i64>, PathRejection>,
    ) -> AppResult<StatusCode> {
        let Path(feed_id) = feed_id.map_err(|e| AppError::BadRequest(e.body_text()))?;
        controller
            .feed_service
            .do_like(auth_user.member_id, feed_id)
            .await?;
        Ok(StatusCode::OK)
    }

    /// DELETE /feed/{feedId}/likes
    pub async fn cancel_like(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        feed_id: Result<Path<i64>, PathRejection>,
    ) -> AppResult<StatusCode> {
        let Path(feed_id) = feed_id.map_err(|e| AppError::BadRequest(e.body_text()))?;
        controller
            .feed_service
            .cancel_like(auth_user.member_id, feed_id)
            .await?;
        Ok(StatusCode::OK)
    }
}

async fn read_post_parts(
    multipart: &mut Multipart,
) -> AppResult<(FeedPostRequest, Option<UploadedImage>)> {
    let mut request: Option<FeedPostRequest> = None;
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(DATA_PART) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("unreadable data part: {e}")))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("invalid data part: {e}")))?;
                request = Some(parsed);
            }
            Some(FILE_PART) => image = Some(read_image(field).await?),
            _ => continue,
        }
    }

    let request =
        request.ok_or_else(|| AppError::BadRequest(format!("missing '{DATA_PART}' part")))?;
    Ok((request, image))
}

async fn read_image(field: Field<'_>) -> AppResult<UploadedImage> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::BadRequest("uploaded file is too large".to_string())
        } else {
            AppError::BadRequest(format!("unreadable file part: {e}"))
        }
    })?;

    Ok(UploadedImage {
        file_name,
        content_type,
        bytes,
    })
}
