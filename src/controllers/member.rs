use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::domain::member::{MemberResponse, MemberService, MemberServiceApi, SignUpRequest};
use crate::domain::shared::DataResponse;
use crate::error::{AppError, AppResult};

pub struct MemberController {
    member_service: Arc<MemberService>,
}

impl MemberController {
    pub fn new(member_service: Arc<MemberService>) -> Self {
        Self { member_service }
    }

    /// POST /members/signup
    pub async fn sign_up(
        State(controller): State<Arc<MemberController>>,
        request: Result<Json<SignUpRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, Json<DataResponse<MemberResponse>>)> {
        let Json(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let member = controller.member_service.sign_up(request).await?;
        Ok((StatusCode::CREATED, Json(DataResponse::new(member))))
    }
}
