//! # 카테고리 데이터베이스 쿼리 모듈
//!
//! 카테고리 CRUD와 무결성 규칙(이름 중복, "사용 중" 삭제 가드)을 담당하는
//! SQL 쿼리 함수들입니다. 모든 함수는 `SqlitePool` 참조를 받아 비동기로 실행됩니다.
//!
//! ## 테이블 구조
//! - `categories`: 카테고리 엔티티 (id, name UNIQUE, color)
//! - `product_categories`: 상품과 카테고리의 다대다(N:M) 관계 테이블
//!
//! 이름 중복은 사전 검사 없이 UNIQUE 제약에 맡깁니다. 위반 시 sqlx 에러가
//! error.rs의 From 구현을 거쳐 Conflict("Name already exists")로 변환됩니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 모든 카테고리를 이름순으로 조회합니다.
///
/// `sqlx::query_as::<_, Category>(sql)` 설명:
/// - `query_as`는 SQL 결과를 지정한 구조체(Category)로 자동 변환합니다
/// - `<_, Category>`에서 `_`는 DB 드라이버(SQLite)를 컴파일러가 추론하게 하고,
///   `Category`는 결과를 매핑할 대상 구조체입니다
/// - `fetch_all`은 모든 행을 Vec으로 반환합니다
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>, AppError> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name, color FROM categories ORDER BY name")
            .fetch_all(pool)
            .await?;

    Ok(categories)
}

/// ID로 카테고리 하나를 조회합니다.
///
/// `fetch_optional`은 결과가 0행이면 None, 1행이면 Some(Category)을 반환합니다.
/// 존재 여부가 불확실한 조회에는 `fetch_one`보다 이쪽이 안전합니다.
pub async fn get_category(pool: &SqlitePool, id: &str) -> Result<Option<Category>, AppError> {
    let category =
        sqlx::query_as::<_, Category>("SELECT id, name, color FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(category)
}

/// 이름 목록으로 카테고리들을 조회합니다.
///
/// 상품의 카테고리 이름 해석(쓰기 경로의 엄격한 해석과 읽기 경로의
/// 너그러운 필터 모두)에 사용됩니다. 요청된 이름 중 존재하는 것만
/// 반환하며, 몇 개가 빠졌는지 판단은 호출자의 몫입니다.
///
/// SQL의 IN 절은 플레이스홀더 수가 이름 개수에 따라 달라지므로
/// 쿼리 문자열을 동적으로 구성합니다. 값은 여전히 `.bind()`로만 전달하므로
/// SQL 인젝션 위험은 없습니다.
pub async fn find_categories_by_names(
    pool: &SqlitePool,
    names: &[String],
) -> Result<Vec<Category>, AppError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    // vec!["?"; n].join(", "): 이름 개수만큼 "?, ?, ?" 문자열 생성
    let placeholders = vec!["?"; names.len()].join(", ");
    let sql = format!("SELECT id, name, color FROM categories WHERE name IN ({placeholders})");

    let mut query = sqlx::query_as::<_, Category>(&sql);
    for name in names {
        query = query.bind(name);
    }

    let categories = query.fetch_all(pool).await?;
    Ok(categories)
}

/// 새 카테고리를 생성하고 생성된 카테고리를 반환합니다.
///
/// ## 처리 흐름
/// 1. UUIDv7으로 고유 ID 생성 — v7은 타임스탬프 기반이라 시간순 정렬이 가능합니다
/// 2. INSERT 쿼리로 DB에 저장 (이름 중복이면 UNIQUE 제약 위반 → Conflict)
/// 3. 방금 생성한 카테고리를 다시 조회하여 반환
pub async fn create_category(
    pool: &SqlitePool,
    req: &CreateCategoryRequest,
) -> Result<Category, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO categories (id, name, color) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(req.name.trim()) // 저장 전 앞뒤 공백 제거 (원본 스키마의 trim: true)
        .bind(req.color.trim())
        .execute(pool)
        .await?;

    get_category(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created category".to_string()))
}

/// 카테고리 정보를 부분 업데이트합니다.
///
/// 요청에 값이 있는 필드만 업데이트합니다. 빈 문자열은 모델 계층에서
/// "변경 없음"으로 정규화되므로 여기 도달하지 않습니다.
///
/// ## 반환값
/// - `Ok(Some(Category))`: 업데이트 성공, 변경된 카테고리 반환
/// - `Ok(None)`: 해당 ID의 카테고리가 존재하지 않음 (핸들러가 404로 변환)
/// - `Err(...)`: DB 에러 (이름 중복 Conflict 포함)
pub async fn update_category(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateCategoryRequest,
) -> Result<Option<Category>, AppError> {
    // 먼저 카테고리 존재 여부를 확인합니다
    let category = get_category(pool, id).await?;
    if category.is_none() {
        return Ok(None);
    }

    // 각 필드를 개별 쿼리로 업데이트합니다 (동적 쿼리 빌딩 대신 단순한 방식)
    if let Some(name) = req.effective_name() {
        sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(color) = req.effective_color() {
        sqlx::query("UPDATE categories SET color = ? WHERE id = ?")
            .bind(color)
            .bind(id)
            .execute(pool)
            .await?;
    }

    // 업데이트 후 최신 상태를 조회하여 반환
    get_category(pool, id).await
}

/// 카테고리를 삭제합니다 — 단, 어떤 상품도 참조하지 않을 때만.
///
/// ## "사용 중" 가드 (in-use guard)
/// 삭제 전에 `product_categories`에서 이 카테고리를 참조하는 상품 수를
/// 셉니다. 하나라도 있으면 Validation 에러(HTTP 400)로 거부하고
/// 아무것도 지우지 않습니다.
///
/// 검사와 삭제는 별도 쿼리라서 그 사이에 다른 요청이 끼어들 수 있지만,
/// `product_categories.category_id`의 외래 키가 CASCADE 없이 걸려 있어
/// 그런 경우에도 DB가 삭제를 거부합니다.
pub async fn delete_category(pool: &SqlitePool, category: &Category) -> Result<(), AppError> {
    // query_as::<_, (i64,)>: 결과를 i64 하나짜리 튜플로 매핑합니다
    let (in_use,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM product_categories WHERE category_id = ?")
            .bind(&category.id)
            .fetch_one(pool)
            .await?;

    if in_use > 0 {
        return Err(AppError::Validation(format!(
            "Cannot delete category \"{}\" because it is assigned to one or more products.",
            category.name
        )));
    }

    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(&category.id)
        .execute(pool)
        .await?;

    Ok(())
}
