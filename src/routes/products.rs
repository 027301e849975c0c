//! # 상품 API 라우트 핸들러
//!
//! 상품 CRUD와 목록 검색/필터/페이지네이션을 위한 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/products | `list_products` | 검색/필터/페이지네이션 목록 |
//! | GET | /api/products/:id | `get_product` | 단일 상품 조회 |
//! | POST | /api/products | `create_product` | 새 상품 생성 |
//! | PUT | /api/products/:id | `update_product` | 상품 전체 수정 |
//! | DELETE | /api/products/:id | `delete_product` | 상품 삭제 |
//!
//! ## Axum 핸들러 패턴
//! 각 함수는 Axum의 **추출자(Extractor)** 패턴을 따릅니다:
//! - `State(state)`: 애플리케이션 공유 상태 (DB 풀)
//! - `Path(id)`: URL 경로의 변수 (`:id` 부분)
//! - `Query(query)`: 쿼리 스트링을 구조체로 파싱
//! - `Json(req)`: 요청 본문을 구조체로 파싱
//!
//! 핸들러는 얇게 유지합니다: 필드 검증과 봉투 포장만 하고,
//! 무결성 규칙과 쿼리 로직은 db 계층에 있습니다.

use crate::{db, error::AppError, models::*};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// Axum의 의존성 주입(Dependency Injection) 메커니즘으로, 전역 변수 없이
/// DB 풀을 핸들러에 전달합니다.
///
/// #[derive(Clone)]: Axum의 State Extractor는 내부적으로 AppState를 clone하므로
/// 필수입니다. SqlitePool은 Arc(참조 카운트)를 사용하므로 clone해도
/// 실제 연결 풀이 복제되지 않고, 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
}

/// `GET /products` — 상품 목록을 검색/필터/페이지네이션하여 조회합니다.
///
/// 쿼리 스트링: `?page=1&limit=5&search=shoe&categories=Sports,Books`
///
/// 응답: `{ status: "success", data: { data: [...], totalPages, totalItems,
/// currentPage, itemsPerPage } }`
///
/// `Query(query)`: 쿼리 스트링을 `ProductListQuery`로 자동 파싱합니다.
/// 숫자 검증(양의 정수)은 db::list_products 안에서 수행되어
/// 실패 시 400 Validation 에러가 됩니다.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Value>, AppError> {
    let page = db::list_products(&state.pool, &query).await?;
    Ok(Json(json!({ "status": "success", "data": page })))
}

/// `GET /products/:id` — 단일 상품을 조회합니다 (카테고리는 이름으로).
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let product = db::get_product_response(&state.pool, &id)
        .await?
        // ok_or_else(): Option<T>를 Result<T, E>로 변환 — None이면 404
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({ "status": "success", "data": product })))
}

/// `POST /products` — 새 상품을 생성합니다.
///
/// 본문: `{ name, description, quantity, categories: [이름, ...] }`
///
/// 처리 순서: 필드 검증 → 이름 중복 검사 → 카테고리 이름 엄격 해석 → 저장.
/// 존재하지 않는 카테고리 이름이 있으면 400과 함께 누락된 이름들이
/// 그대로 반환됩니다.
///
/// 반환 타입이 튜플 `(StatusCode, Json<Value>)`인 이유:
/// 기본 200 대신 201 Created를 반환하기 위해서입니다.
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<SaveProductRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    req.validate()?;

    let product = db::create_product(&state.pool, &req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": product })),
    ))
}

/// `PUT /products/:id` — 상품을 수정합니다.
///
/// POST와 같은 본문 형태를 받으며, 카테고리 집합은 통째로 교체됩니다.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SaveProductRequest>,
) -> Result<Json<Value>, AppError> {
    req.validate()?;

    let product = db::update_product(&state.pool, &id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({ "status": "success", "data": product })))
}

/// `DELETE /products/:id` — 상품을 삭제합니다.
///
/// 성공 시 200과 확인 메시지를 반환합니다 (원본 API의 계약).
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let deleted = db::delete_product(&state.pool, &id).await?;
    if !deleted {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Product deleted successfully",
    })))
}
