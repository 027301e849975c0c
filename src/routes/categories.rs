//! # 카테고리 API 라우트 핸들러
//!
//! 카테고리 CRUD를 위한 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/categories | `list_categories` | 전체 카테고리 목록 (이름순) |
//! | GET | /api/categories/:id | `get_category` | 단일 카테고리 조회 |
//! | POST | /api/categories | `create_category` | 새 카테고리 생성 |
//! | PUT | /api/categories/:id | `update_category` | 카테고리 부분 수정 |
//! | DELETE | /api/categories/:id | `delete_category` | 카테고리 삭제 (사용 중이면 거부) |

use crate::{db, error::AppError, models::*, routes::products::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /categories` — 전체 카테고리 목록을 이름순으로 조회합니다.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let categories = db::list_categories(&state.pool).await?;
    Ok(Json(json!({ "status": "success", "data": categories })))
}

/// `GET /categories/:id` — 단일 카테고리를 조회합니다.
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let category = db::get_category(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(json!({ "status": "success", "data": category })))
}

/// `POST /categories` — 새 카테고리를 생성합니다.
///
/// 본문: `{ "name": "...", "color": "bg-blue-500" }`
///
/// 이름 중복은 사전 검사 없이 DB의 UNIQUE 제약에 맡깁니다.
/// 위반 시 error.rs의 변환을 거쳐 400 "Name already exists"가 됩니다.
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    req.validate()?;

    let category = db::create_category(&state.pool, &req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": category })),
    ))
}

/// `PUT /categories/:id` — 카테고리를 부분 수정합니다.
///
/// 빠졌거나 공백뿐인 필드는 기존 값을 유지합니다.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<Value>, AppError> {
    req.validate()?;

    let category = db::update_category(&state.pool, &id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(json!({ "status": "success", "data": category })))
}

/// `DELETE /categories/:id` — 카테고리를 삭제합니다.
///
/// 어떤 상품이라도 이 카테고리를 참조하고 있으면 400과 함께 거부됩니다
/// ("사용 중" 가드 — db::delete_category 참고). 먼저 조회해서 404를
/// 가려내고, 가드 메시지에 쓸 이름도 여기서 확보합니다.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let category = db::get_category(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    db::delete_category(&state.pool, &category).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Category deleted successfully",
    })))
}
