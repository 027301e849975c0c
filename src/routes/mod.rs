//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `categories`: 카테고리 CRUD 핸들러
//! - `products`: 상품 CRUD + 목록 검색/페이지네이션 핸들러 (AppState 정의 포함)
//! - `health`: 서버 상태 확인 (헬스체크)
//!
//! 모든 응답은 원본 API와 같은 봉투를 사용합니다:
//! - 성공: `{ "status": "success", "data": ... }` 또는 `{ "status": "success", "message": ... }`
//! - 실패: `{ "status": "error", "message": ... }` (error.rs의 IntoResponse가 생성)

pub mod categories;
pub mod health;
pub mod products;

// 각 모듈의 핸들러 함수들을 재공개하여
// main.rs에서 `routes::list_products`처럼 바로 접근 가능하게 합니다.
pub use categories::*;
pub use health::*;
pub use products::*;

use axum::{http::StatusCode, http::Uri, Json};
use serde_json::{json, Value};

/// 어떤 라우트에도 매칭되지 않은 요청을 처리하는 폴백(fallback) 핸들러
///
/// `GET /api/nope` → `404 { "status": "error", "message": "Route /api/nope not found" }`
///
/// `Uri` Extractor: 요청된 전체 경로(쿼리 스트링 포함)를 그대로 추출합니다.
/// (Express의 `app.use("*", ...)` + req.originalUrl에 해당)
pub async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": format!("Route {uri} not found"),
        })),
    )
}
