//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 `{status: "error", message}` HTTP 응답으로 자동 변환
//! - `From<sqlx::Error>` 구현: DB의 UNIQUE/외래 키 제약 위반을 도메인 에러로 번역
//!
//! Express 시절의 errorHandler 미들웨어가 하던 일(Mongo의 11000 중복 키 에러를
//! 400으로 바꾸고, ValidationError 메시지를 모으는 것)을 타입 수준에서 수행합니다.

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json;
use sqlx::error::ErrorKind; // DB 제약 위반 종류 (UniqueViolation 등)
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
///
/// 상태 코드 매핑 (원본 API의 계약을 그대로 따릅니다):
/// - `Validation` → 400: 필드 형식 오류, 존재하지 않는 카테고리 이름,
///   사용 중인 카테고리 삭제 차단, 잘못된 page/limit
/// - `NotFound` → 404: id로 리소스를 찾지 못함
/// - `Conflict` → 400: 이름 중복 (원본이 중복도 400으로 응답하므로 409가 아닌 400)
/// - `Database`/`Internal` → 500: 분류되지 않은 실패
#[derive(Debug, Error)]
pub enum AppError {
    /// 필드 검증 실패 또는 무결성 규칙 위반 (HTTP 400)
    /// {0}은 첫 번째 필드(String)를 참조하는 포맷 문법입니다.
    #[error("{0}")]
    Validation(String),

    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    /// 어떤 리소스인지 메시지로 전달합니다. (예: "Product not found")
    #[error("{0}")]
    NotFound(String),

    /// 이름 중복 등 리소스 충돌 (HTTP 400)
    #[error("{0}")]
    Conflict(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// 제약 위반은 From 구현에서 Validation/Conflict로 먼저 걸러지므로,
    /// 여기 도달하는 것은 연결 실패 같은 진짜 장애뿐입니다.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

// sqlx::Error → AppError 변환.
//
// thiserror의 #[from]을 쓰지 않고 직접 구현한 이유: 단순히 감싸기만 하는 게
// 아니라, DB 제약 위반을 도메인 에러로 번역해야 하기 때문입니다.
// - UNIQUE 제약 위반 → Conflict ("Name already exists")
// - 외래 키 제약 위반 → Validation (참조 중인 행을 건드리는 경쟁 요청 차단)
//
// 덕분에 db 계층에서 `?` 연산자만 쓰면 올바른 HTTP 에러가 나갑니다.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // as_database_error(): DB 엔진이 보고한 에러면 Some(&dyn DatabaseError)
        if let Some(db_err) = err.as_database_error() {
            match db_err.kind() {
                // SQLite 메시지 예: "UNIQUE constraint failed: categories.name"
                ErrorKind::UniqueViolation => {
                    return AppError::Conflict(duplicate_message(db_err.message()));
                }
                // 앱 수준 검사를 빠져나간 참조 위반의 최종 안전망
                ErrorKind::ForeignKeyViolation => {
                    return AppError::Validation(
                        "Operation conflicts with an existing reference between products and categories"
                            .to_string(),
                    );
                }
                _ => {}
            }
        }
        AppError::Database(err)
    }
}

/// UNIQUE 제약 위반 메시지에서 필드 이름을 뽑아
/// "<Field> already exists" 형태의 메시지를 만듭니다.
///
/// 예: "UNIQUE constraint failed: categories.name" → "Name already exists"
/// (Express 시절 Mongo의 11000 에러를 다루던 것과 같은 규칙입니다)
fn duplicate_message(detail: &str) -> String {
    // rsplit('.').next(): 마지막 '.' 뒤의 조각 = 컬럼 이름
    let field = detail.rsplit('.').next().unwrap_or("value").trim();

    // 첫 글자만 대문자로 변환합니다.
    // chars(): 문자열을 유니코드 문자 단위로 순회하는 이터레이터
    let mut chars = field.chars();
    let capitalized = match chars.next() {
        // to_uppercase()는 문자에 따라 여러 글자가 될 수 있어 String으로 모읍니다
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Value".to_string(),
    };

    format!("{capitalized} already exists")
}

// impl IntoResponse for AppError:
// 핸들러가 Err(AppError)를 반환하면 Axum이 이 메서드를 호출하여
// 적절한 HTTP 응답을 생성합니다.
impl IntoResponse for AppError {
    /// AppError를 `{status: "error", message: "..."}` HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다 (내부 구현 노출 방지).
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            // 원본 API는 중복 이름도 400으로 응답했으므로 그대로 유지합니다
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        // 모든 에러 응답은 동일한 봉투를 사용합니다:
        // { "status": "error", "message": "..." }
        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}
