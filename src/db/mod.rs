//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `categories`: 카테고리 CRUD 쿼리와 "사용 중" 삭제 가드
//! - `products`: 상품 CRUD 쿼리, 카테고리 이름 해석, 검색/필터/페이지네이션

pub mod categories;
pub mod products;

// 하위 모듈의 모든 공개 함수를 재공개(re-export)하여
// `crate::db::list_categories`처럼 바로 접근할 수 있게 합니다.
pub use categories::*;
pub use products::*;
