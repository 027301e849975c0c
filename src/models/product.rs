//! # 상품 모델 정의
//!
//! 상품(Product)은 이 애플리케이션의 중심 엔티티입니다.
//! 이름/설명/수량을 가지며, 하나 이상의 카테고리에 속합니다.
//!
//! ## 구조체 역할
//! - `ProductRecord`: DB의 `products` 테이블 한 행 (내부용, 카테고리 미포함)
//! - `ProductResponse`: API 응답용 상품 — 카테고리를 id가 아닌 **이름** 목록으로 투영
//! - `SaveProductRequest`: 상품 생성/수정 요청 본문 (POST와 PUT이 같은 형태 사용)
//! - `ProductListQuery`: 목록 조회의 쿼리 스트링 (page, limit, search, categories)
//! - `PaginatedProducts`: 페이지네이션 봉투 (data, totalPages, totalItems, ...)
//!
//! ## 내부 표현과 외부 표현
//! 카테고리 참조는 DB에는 id로 저장되지만, API 경계에서는 항상 이름으로
//! 주고받습니다. (원본 API가 Mongoose populate로 하던 변환입니다)

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// 상품 엔티티 — DB의 `products` 테이블 한 행(row)에 대응합니다.
///
/// 카테고리 관계는 별도의 `product_categories` 테이블에 있으므로
/// 이 구조체에는 포함되지 않습니다. 응답을 만들 때 db 계층이
/// 카테고리 이름을 붙여 `ProductResponse`로 변환합니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRecord {
    /// 상품 고유 식별자 (UUIDv7 형식 문자열)
    pub id: String,
    /// 상품 이름 — 대소문자 무시 기준으로 유일
    pub name: String,
    /// 상품 설명 (10~1000자)
    pub description: String,
    /// 재고 수량 (0 이상의 정수)
    /// i64: SQLite의 INTEGER와 1:1로 대응하는 타입입니다.
    pub quantity: i64,
    /// 생성 시각 (ISO-8601 텍스트, 생성 후 불변)
    pub created_at: String,
}

/// API 응답용 상품 표현
///
/// #[serde(rename_all = "camelCase")]: Rust의 snake_case 필드 이름을
/// JSON에서는 camelCase로 내보냅니다. (created_at → createdAt)
/// 프론트엔드가 기대하는 필드 이름을 그대로 유지하기 위함입니다.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    /// 카테고리 **이름** 목록 (id가 아님 — 표시용 투영)
    pub categories: Vec<String>,
    /// ISO-8601 형식의 생성 시각 문자열
    pub created_at: String,
}

impl ProductRecord {
    /// 내부 레코드에 카테고리 이름 목록을 붙여 응답용 표현으로 변환합니다.
    ///
    /// self(소유권을 가져옴): 변환 후 레코드는 더 이상 쓰이지 않으므로
    /// 필드들을 복제 없이 그대로 옮깁니다(move).
    pub fn into_response(self, categories: Vec<String>) -> ProductResponse {
        ProductResponse {
            id: self.id,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            categories,
            created_at: self.created_at,
        }
    }
}

/// 상품 생성/수정 요청 — `POST /api/products`, `PUT /api/products/:id`의 본문
///
/// 원본 API는 두 라우트에 같은 검증 체인을 사용했으므로
/// 요청 구조체도 하나로 공유합니다. PUT에서도 전체 필드가 필요하며,
/// 카테고리 목록은 병합이 아니라 통째로 교체됩니다.
#[derive(Debug, Deserialize)]
pub struct SaveProductRequest {
    /// 상품 이름 (앞뒤 공백 제거 후 2~100자)
    pub name: String,
    /// 상품 설명 (앞뒤 공백 제거 후 10~1000자)
    pub description: String,
    /// 재고 수량 (0 이상의 정수)
    pub quantity: i64,
    /// 카테고리 **이름** 목록 (최소 1개)
    pub categories: Vec<String>,
}

impl SaveProductRequest {
    /// 요청 본문의 필드들을 검증합니다.
    ///
    /// 에러 메시지는 원본 API의 express-validator 메시지와 동일합니다.
    pub fn validate(&self) -> Result<(), AppError> {
        let name_len = self.name.trim().chars().count();
        if !(2..=100).contains(&name_len) {
            return Err(AppError::Validation(
                "Product name must be between 2 and 100 characters".to_string(),
            ));
        }

        let desc_len = self.description.trim().chars().count();
        if !(10..=1000).contains(&desc_len) {
            return Err(AppError::Validation(
                "Description must be between 10 and 1000 characters".to_string(),
            ));
        }

        // 타입이 i64라 정수가 아닌 값은 JSON 파싱 단계에서 이미 거부되므로,
        // 여기서는 음수만 확인하면 됩니다.
        if self.quantity < 0 {
            return Err(AppError::Validation(
                "Quantity must be a non-negative integer".to_string(),
            ));
        }

        if self.categories.is_empty() {
            return Err(AppError::Validation(
                "At least one category must be selected".to_string(),
            ));
        }

        // .iter().any(): 하나라도 조건을 만족하면 true
        if self.categories.iter().any(|c| c.trim().is_empty()) {
            return Err(AppError::Validation(
                "All categories must be valid strings".to_string(),
            ));
        }

        Ok(())
    }
}

/// 상품 목록 조회의 쿼리 스트링 — `GET /api/products?page=1&limit=5&...`
///
/// 모든 필드가 Option<String>인 이유:
/// 쿼리 스트링은 전부 문자열이고, 숫자 변환 실패를 Axum의 기본 에러가 아닌
/// 우리의 `{status:"error"}` 봉투로 응답하기 위해 직접 파싱합니다.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    /// 페이지 번호 (1부터 시작, 기본값 1)
    pub page: Option<String>,
    /// 페이지당 항목 수 (기본값 5)
    pub limit: Option<String>,
    /// 이름/설명 부분 일치 검색어
    pub search: Option<String>,
    /// 카테고리 이름들 (쉼표로 구분된 CSV, 예: "Sports,Books")
    pub categories: Option<String>,
}

impl ProductListQuery {
    /// 페이지 번호를 파싱합니다. 기본값 1, 1 미만이거나 숫자가 아니면 400.
    ///
    /// 원본 구현은 page=0이나 음수를 걸러내지 않아 음수 skip이 생길 수
    /// 있었습니다. 여기서는 명시적으로 거부합니다.
    pub fn page(&self) -> Result<i64, AppError> {
        parse_positive(self.page.as_deref(), 1, "Page must be a positive integer")
    }

    /// 페이지당 항목 수를 파싱합니다. 기본값 5, 1 미만이면 400.
    /// (limit이 0이면 totalPages 계산에서 0으로 나누게 되므로 반드시 거부)
    pub fn limit(&self) -> Result<i64, AppError> {
        parse_positive(self.limit.as_deref(), 5, "Limit must be a positive integer")
    }

    /// 검색어 — 공백뿐이면 검색 조건 없음으로 취급합니다.
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// CSV 카테고리 파라미터를 이름 목록으로 분해합니다.
    ///
    /// "Sports,Books" → ["Sports", "Books"]
    /// 빈 조각(",,")과 공백 조각은 버립니다.
    pub fn category_names(&self) -> Vec<String> {
        self.categories
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// 쿼리 스트링의 숫자 파라미터를 파싱합니다.
/// None이면 기본값, 파싱 실패 또는 1 미만이면 Validation 에러.
fn parse_positive(raw: Option<&str>, default: i64, message: &str) -> Result<i64, AppError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n),
        // 숫자가 아니거나 0 이하 — 모두 같은 메시지로 거부합니다
        _ => Err(AppError::Validation(message.to_string())),
    }
}

/// 페이지네이션 봉투 — 목록 응답의 `data` 필드에 담기는 구조
///
/// { data: [...], totalPages, totalItems, currentPage, itemsPerPage }
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedProducts {
    pub data: Vec<ProductResponse>,
    pub total_pages: i64,
    pub total_items: i64,
    pub current_page: i64,
    pub items_per_page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SaveProductRequest {
        SaveProductRequest {
            name: "Wireless Headphones".to_string(),
            description: "High-quality noise-cancelling wireless headphones".to_string(),
            quantity: 25,
            categories: vec!["Electronics".to_string()],
        }
    }

    #[test]
    fn validates_field_ranges() {
        assert!(valid_request().validate().is_ok());

        let mut req = valid_request();
        req.name = "W".to_string();
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.description = "too short".to_string(); // 9자
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.quantity = -1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn requires_at_least_one_category() {
        let mut req = valid_request();
        req.categories.clear();
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "At least one category must be selected");

        // 공백뿐인 이름도 유효한 카테고리가 아닙니다
        let mut req = valid_request();
        req.categories = vec!["Electronics".to_string(), "  ".to_string()];
        assert!(req.validate().is_err());
    }

    #[test]
    fn query_defaults_and_rejections() {
        let query = ProductListQuery::default();
        assert_eq!(query.page().unwrap(), 1);
        assert_eq!(query.limit().unwrap(), 5);
        assert!(query.search().is_none());
        assert!(query.category_names().is_empty());

        // 0, 음수, 숫자가 아닌 값은 모두 400
        for bad in ["0", "-3", "abc"] {
            let query = ProductListQuery {
                page: Some(bad.to_string()),
                ..Default::default()
            };
            assert!(query.page().is_err(), "page={bad} should be rejected");
        }
    }

    #[test]
    fn splits_category_csv() {
        let query = ProductListQuery {
            categories: Some("Sports, Books,,Electronics".to_string()),
            ..Default::default()
        };
        assert_eq!(query.category_names(), ["Sports", "Books", "Electronics"]);
    }
}
