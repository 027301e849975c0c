//! # 상품 데이터베이스 쿼리 모듈
//!
//! 상품 CRUD와, 이 애플리케이션에서 가장 논리가 많은 두 부분을 담당합니다:
//!
//! 1. **무결성 규칙** — 쓰기 경로의 엄격한 카테고리 이름 해석
//!    (하나라도 없으면 전체 거부), 대소문자 무시 이름 중복 사전 검사
//! 2. **검색/필터/페이지네이션 엔진** — (검색어, 카테고리 이름 목록,
//!    page, limit)을 받아 필터링·정렬·페이지 분할된 결과와 전체 개수를 반환
//!
//! ## 테이블 구조
//! - `products`: 상품 엔티티 (id, name UNIQUE, description, quantity, created_at)
//! - `product_categories`: 상품-카테고리 N:M 관계 (상품 삭제 시 CASCADE)
//!
//! 캐싱은 없습니다. 목록 조회는 매번 필터 조건으로 개수를 세고
//! 해당 페이지를 다시 읽습니다.

use crate::db::categories::find_categories_by_names;
use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::{HashMap, HashSet};

/// ID로 상품 한 행을 조회합니다 (카테고리 미포함).
pub async fn get_product(pool: &SqlitePool, id: &str) -> Result<Option<ProductRecord>, AppError> {
    let product = sqlx::query_as::<_, ProductRecord>(
        "SELECT id, name, description, quantity, created_at FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// 특정 상품에 연결된 카테고리 **이름** 목록을 조회합니다.
///
/// `product_categories` 중간 테이블을 JOIN하여 상품에 속한 카테고리를
/// 가져옵니다. API는 카테고리를 id가 아닌 이름으로 주고받으므로
/// 이름만 뽑아 반환합니다.
///
/// ```sql
/// categories ←── product_categories ──→ products
///     (1)              (N:M)               (1)
/// ```
pub async fn product_category_names(
    pool: &SqlitePool,
    product_id: &str,
) -> Result<Vec<String>, AppError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT c.name
        FROM categories c
        JOIN product_categories pc ON pc.category_id = c.id
        WHERE pc.product_id = ?
        ORDER BY c.name
        "#,
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    // Vec<(String,)> → Vec<String>: 튜플에서 값을 꺼냅니다
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// ID로 응답용 상품(카테고리 이름 포함)을 조회합니다.
pub async fn get_product_response(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<ProductResponse>, AppError> {
    // let Some(...) = ... else { return }: 패턴 매칭 + 조기 반환
    let Some(record) = get_product(pool, id).await? else {
        return Ok(None);
    };

    let categories = product_category_names(pool, &record.id).await?;
    Ok(Some(record.into_response(categories)))
}

/// 카테고리 이름들을 id로 해석합니다 — 쓰기 경로의 **엄격한** 해석.
///
/// 하나라도 존재하지 않으면 전체 작업이 실패해야 하므로, 누락된 이름들을
/// 요청 순서 그대로 담아 `Categories not found: A, B` 형태의
/// Validation 에러를 반환합니다. 이 경우 아무것도 기록되지 않습니다.
///
/// 반환되는 id 목록은 요청 순서를 유지하며 중복을 제거합니다.
/// (읽기 경로의 필터는 이와 달리 누락을 조용히 무시합니다 — list_products 참고)
async fn resolve_category_ids(
    pool: &SqlitePool,
    names: &[String],
) -> Result<Vec<String>, AppError> {
    let found = find_categories_by_names(pool, names).await?;

    // HashMap<이름, id>: 이름으로 id를 빠르게 찾기 위한 색인
    let by_name: HashMap<&str, &str> = found
        .iter()
        .map(|c| (c.name.as_str(), c.id.as_str()))
        .collect();

    // 요청 순서를 보존하며 누락된 이름을 수집합니다
    let missing: Vec<&str> = names
        .iter()
        .map(|n| n.as_str())
        .filter(|n| !by_name.contains_key(n))
        .collect();

    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Categories not found: {}",
            missing.join(", ")
        )));
    }

    // 같은 이름이 두 번 와도 관계 행은 한 번만 만들어야 하므로 중복 제거
    let mut seen = HashSet::new();
    let ids = names
        .iter()
        .filter_map(|n| by_name.get(n.as_str()))
        .filter(|id| seen.insert(**id))
        .map(|id| id.to_string())
        .collect();

    Ok(ids)
}

/// 다른 상품이 같은 이름을 쓰고 있는지 — **대소문자 무시** 기준으로 검사합니다.
///
/// `exclude_id`: 수정 중인 상품 자신은 검사에서 제외합니다.
/// (자기 이름을 그대로 두는 수정이 막히면 안 되므로)
async fn is_name_taken(
    pool: &SqlitePool,
    name: &str,
    exclude_id: Option<&str>,
) -> Result<bool, AppError> {
    let row: Option<(String,)> = if let Some(exclude) = exclude_id {
        sqlx::query_as("SELECT id FROM products WHERE lower(name) = lower(?) AND id <> ?")
            .bind(name)
            .bind(exclude)
            .fetch_optional(pool)
            .await?
    } else {
        sqlx::query_as("SELECT id FROM products WHERE lower(name) = lower(?)")
            .bind(name)
            .fetch_optional(pool)
            .await?
    };

    Ok(row.is_some())
}

/// 새 상품을 생성하고 응답용 표현(카테고리 이름 포함)을 반환합니다.
///
/// ## 처리 순서 (모두 통과해야 INSERT)
/// 1. 이름 중복 사전 검사 (대소문자 무시) → 실패 시 Conflict
/// 2. 카테고리 이름 엄격 해석 → 누락 시 Validation, 부분 기록 없음
/// 3. 상품 INSERT + 관계 행 INSERT — 하나의 트랜잭션
///
/// 상품 행과 관계 행은 여러 문장으로 기록되므로 트랜잭션으로 묶습니다.
/// 관계 행 INSERT가 중간에 실패하면 (예: 해석 직후 카테고리가 삭제되어
/// 외래 키 제약에 걸린 경우) 상품 행도 함께 롤백됩니다 —
/// 카테고리 없는 상품이 남는 일은 없습니다.
///
/// 필드 검증(`req.validate()`)은 핸들러에서 이미 수행된 상태입니다.
pub async fn create_product(
    pool: &SqlitePool,
    req: &SaveProductRequest,
) -> Result<ProductResponse, AppError> {
    let name = req.name.trim();

    if is_name_taken(pool, name, None).await? {
        return Err(AppError::Conflict("Product name already exists".to_string()));
    }

    let category_ids = resolve_category_ids(pool, &req.categories).await?;

    // begin(): 트랜잭션 시작. commit() 전에 `?`로 빠져나가면
    // Transaction이 drop되면서 자동으로 롤백됩니다.
    let mut tx = pool.begin().await?;

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query("INSERT INTO products (id, name, description, quantity) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(req.description.trim())
        .bind(req.quantity)
        .execute(&mut *tx)
        .await?;

    link_categories(&mut tx, &id, &category_ids).await?;

    tx.commit().await?;

    get_product_response(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created product".to_string()))
}

/// 상품을 수정합니다.
///
/// 원본 API의 PUT과 동일하게 전체 필드를 받아 덮어쓰며, 카테고리 집합은
/// 병합이 아니라 **통째로 교체**합니다 (기존 관계 전부 삭제 후 재생성).
/// `created_at`은 생성 시 한 번 기록된 값 그대로 둡니다.
///
/// 상품 UPDATE와 관계 교체(DELETE + INSERT)는 create와 같은 이유로
/// 하나의 트랜잭션입니다 — 중간 실패 시 수정 전 상태가 그대로 남습니다.
///
/// ## 반환값
/// - `Ok(Some(ProductResponse))`: 수정 성공
/// - `Ok(None)`: 해당 ID의 상품이 존재하지 않음 (핸들러가 404로 변환)
pub async fn update_product(
    pool: &SqlitePool,
    id: &str,
    req: &SaveProductRequest,
) -> Result<Option<ProductResponse>, AppError> {
    if get_product(pool, id).await?.is_none() {
        return Ok(None);
    }

    let name = req.name.trim();

    // 자기 자신(id)은 제외하고 다른 상품과의 이름 충돌만 검사합니다
    if is_name_taken(pool, name, Some(id)).await? {
        return Err(AppError::Conflict("Product name already exists".to_string()));
    }

    let category_ids = resolve_category_ids(pool, &req.categories).await?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE products
        SET name = ?, description = ?, quantity = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(req.description.trim())
    .bind(req.quantity)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    // 카테고리 집합 교체: 기존 관계를 지우고 새로 만듭니다
    sqlx::query("DELETE FROM product_categories WHERE product_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    link_categories(&mut tx, id, &category_ids).await?;

    tx.commit().await?;

    get_product_response(pool, id).await
}

/// 상품을 삭제합니다.
///
/// `product_categories`에 `ON DELETE CASCADE`가 설정되어 있으므로
/// 관계 행은 자동으로 함께 삭제됩니다. 그 외의 부수 효과는 없습니다.
///
/// ## 반환값
/// - `true`: 삭제 성공 / `false`: 해당 ID의 상품이 없음
pub async fn delete_product(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    // rows_affected(): 이 쿼리로 영향받은 행 수를 반환
    Ok(result.rows_affected() > 0)
}

/// 상품과 카테고리들을 관계 테이블에 연결합니다.
///
/// 호출자의 트랜잭션 안에서만 실행됩니다 — 상품 행과 관계 행이
/// 함께 커밋되거나 함께 롤백되어야 하기 때문입니다.
async fn link_categories(
    tx: &mut SqliteConnection,
    product_id: &str,
    category_ids: &[String],
) -> Result<(), AppError> {
    for category_id in category_ids {
        sqlx::query("INSERT INTO product_categories (product_id, category_id) VALUES (?, ?)")
            .bind(product_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
    }
    Ok(())
}

/// 상품 목록을 검색/필터/페이지네이션하여 조회합니다.
///
/// ## 알고리즘
/// 1. `search`가 있으면: 이름 **또는** 설명에 검색어가 대소문자 무시
///    부분 문자열로 포함된 상품만 (토큰 분리나 유사 검색이 아닌 단순 포함)
/// 2. `categories`가 있으면: 이름을 id로 해석하되, 없는 이름은 **조용히
///    버립니다** (쓰기 경로의 엄격한 해석과 다른, 읽기 경로의 너그러운 규칙).
///    해석된 카테고리 중 하나라도 참조하는 상품만 (AND가 아닌 OR/합집합)
/// 3. 두 조건은 AND로 결합
/// 4. `created_at` 내림차순(최신순) 정렬. 같은 시각이면 id 내림차순 —
///    UUIDv7은 시간순이므로 결정적인 순서가 보장됩니다
/// 5. 전체 개수(totalItems)를 세고, `[(page-1)*limit, page*limit)` 구간만 반환.
///    범위를 벗어난 페이지는 에러가 아니라 빈 목록입니다
/// 6. 각 상품의 카테고리를 이름으로 투영하여 봉투에 담아 반환
///
/// ## 동적 WHERE 절 구성
/// 조건 조각과 바인딩할 값을 각각 Vec에 모은 뒤 합칩니다.
/// SQL 문자열에 사용자 입력을 직접 넣지 않고 전부 `.bind()`로 전달합니다.
pub async fn list_products(
    pool: &SqlitePool,
    query: &ProductListQuery,
) -> Result<PaginatedProducts, AppError> {
    // page/limit 검증이 가장 먼저입니다 — 0이나 음수는 여기서 400으로 거부
    let page = query.page()?;
    let limit = query.limit()?;

    let mut clauses: Vec<String> = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    // ── 1. 검색 조건 ──
    // instr(lower(x), lower(?)) > 0: 대소문자 무시 부분 문자열 포함 검사.
    // LIKE를 쓰지 않는 이유: 검색어에 '%'나 '_'가 들어 있어도
    // 와일드카드가 아닌 일반 문자로 취급하기 위해서입니다.
    if let Some(term) = query.search() {
        clauses.push(
            "(instr(lower(name), lower(?)) > 0 OR instr(lower(description), lower(?)) > 0)"
                .to_string(),
        );
        bindings.push(term.to_string());
        bindings.push(term.to_string());
    }

    // ── 2. 카테고리 필터 (너그러운 해석) ──
    let names = query.category_names();
    if !names.is_empty() {
        // 존재하는 이름만 id로 바뀌고, 없는 이름은 그냥 사라집니다.
        // 전부 없는 이름이면 필터 자체가 빠집니다 (원본 동작 유지).
        let found = find_categories_by_names(pool, &names).await?;
        if !found.is_empty() {
            let placeholders = vec!["?"; found.len()].join(", ");
            clauses.push(format!(
                "id IN (SELECT product_id FROM product_categories WHERE category_id IN ({placeholders}))"
            ));
            bindings.extend(found.into_iter().map(|c| c.id));
        }
    }

    // ── 3. 두 조건을 AND로 결합 ──
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    // ── 4. 전체 개수 (페이지 분할 전 기준) ──
    let count_sql = format!("SELECT COUNT(*) FROM products{where_sql}");
    let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
    for value in &bindings {
        count_query = count_query.bind(value);
    }
    let (total_items,) = count_query.fetch_one(pool).await?;

    // ── 5. 해당 페이지 조회 ──
    let data_sql = format!(
        r#"
        SELECT id, name, description, quantity, created_at
        FROM products{where_sql}
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#
    );
    let mut data_query = sqlx::query_as::<_, ProductRecord>(&data_sql);
    for value in &bindings {
        data_query = data_query.bind(value);
    }
    // checked_mul(): 곱셈이 i64 범위를 넘으면 None. page와 limit은 각각
    // i64::MAX까지 올 수 있으므로 (page-1)*limit이 넘칠 수 있습니다.
    // 넘친다는 것은 어차피 데이터 범위를 한참 벗어난 페이지라는 뜻이므로
    // 최대 오프셋으로 대체합니다 — 범위를 벗어난 페이지는 빈 목록입니다.
    let offset = (page - 1).checked_mul(limit).unwrap_or(i64::MAX);
    let records = data_query
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    // ── 6. 카테고리 이름 투영 ──
    let mut data = Vec::with_capacity(records.len());
    for record in records {
        let categories = product_category_names(pool, &record.id).await?;
        data.push(record.into_response(categories));
    }

    // div_ceil(): 올림 나눗셈. 0건이면 0페이지입니다.
    // (total_items + limit - 1) / limit 수식은 limit이 크면 덧셈에서
    // 넘칠 수 있어 쓰지 않습니다.
    let total_pages = (total_items as u64).div_ceil(limit as u64) as i64;

    Ok(PaginatedProducts {
        data,
        total_pages,
        total_items,
        current_page: page,
        items_per_page: limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::categories::create_category;
    use crate::db::test_support;

    async fn seed_category(pool: &SqlitePool, name: &str, color: &str) {
        create_category(
            pool,
            &CreateCategoryRequest {
                name: name.to_string(),
                color: color.to_string(),
            },
        )
        .await
        .unwrap();
    }

    fn product_req(name: &str, description: &str, categories: &[&str]) -> SaveProductRequest {
        SaveProductRequest {
            name: name.to_string(),
            description: description.to_string(),
            quantity: 10,
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn list_query(
        page: Option<&str>,
        limit: Option<&str>,
        search: Option<&str>,
        categories: Option<&str>,
    ) -> ProductListQuery {
        ProductListQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            search: search.map(str::to_string),
            categories: categories.map(str::to_string),
        }
    }

    // 테스트에서 정렬 순서를 고정하기 위해 생성 시각을 직접 덮어씁니다
    async fn set_created_at(pool: &SqlitePool, id: &str, created_at: &str) {
        sqlx::query("UPDATE products SET created_at = ? WHERE id = ?")
            .bind(created_at)
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
    }

    // 12건, limit=5 → 3페이지. 1페이지는 5건, 3페이지는 2건이어야 합니다
    #[tokio::test]
    async fn pagination_splits_twelve_products_into_three_pages() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Electronics", "bg-blue-500").await;

        for i in 1..=12 {
            create_product(
                &pool,
                &product_req(
                    &format!("Product {i:02}"),
                    "A generic catalog item for pagination tests",
                    &["Electronics"],
                ),
            )
            .await
            .unwrap();
        }

        let first = list_products(&pool, &list_query(Some("1"), Some("5"), None, None))
            .await
            .unwrap();
        assert_eq!(first.total_items, 12);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.data.len(), 5);
        assert_eq!(first.current_page, 1);
        assert_eq!(first.items_per_page, 5);

        let last = list_products(&pool, &list_query(Some("3"), Some("5"), None, None))
            .await
            .unwrap();
        assert_eq!(last.data.len(), 2);

        // 범위를 벗어난 페이지는 에러가 아니라 빈 목록입니다
        let beyond = list_products(&pool, &list_query(Some("9"), Some("5"), None, None))
            .await
            .unwrap();
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total_items, 12);
        assert_eq!(beyond.current_page, 9);
    }

    // page/limit은 i64 최댓값까지 올 수 있습니다. 오프셋 곱셈이나
    // 페이지 수 계산이 넘쳐서 죽거나 (더 나쁘게는) 음수 오프셋으로
    // 1페이지를 돌려주면 안 됩니다.
    #[tokio::test]
    async fn extreme_page_and_limit_do_not_overflow() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Books", "bg-purple-500").await;

        for i in 1..=3 {
            create_product(
                &pool,
                &product_req(
                    &format!("Book {i}"),
                    "A catalog fixture for boundary value tests",
                    &["Books"],
                ),
            )
            .await
            .unwrap();
        }

        // 천문학적인 페이지 번호 → 그냥 빈 페이지
        let huge_page = i64::MAX.to_string();
        let result = list_products(&pool, &list_query(Some(&huge_page), Some("5"), None, None))
            .await
            .unwrap();
        assert!(result.data.is_empty());
        assert_eq!(result.total_items, 3);
        assert_eq!(result.current_page, i64::MAX);

        // 천문학적인 limit → 전체가 한 페이지에 담깁니다
        let huge_limit = i64::MAX.to_string();
        let result = list_products(&pool, &list_query(Some("1"), Some(&huge_limit), None, None))
            .await
            .unwrap();
        assert_eq!(result.data.len(), 3);
        assert_eq!(result.total_pages, 1);
    }

    #[tokio::test]
    async fn non_positive_page_or_limit_is_rejected() {
        let pool = test_support::pool().await;

        let err = list_products(&pool, &list_query(Some("0"), None, None, None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Page must be a positive integer");

        let err = list_products(&pool, &list_query(None, Some("-5"), None, None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Limit must be a positive integer");
    }

    // 검색은 이름 또는 설명에 대한 대소문자 무시 부분 일치입니다
    #[tokio::test]
    async fn search_matches_name_or_description() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Sports", "bg-red-500").await;

        create_product(
            &pool,
            &product_req(
                "Running Shoes",
                "Comfortable footwear for daily exercise",
                &["Sports"],
            ),
        )
        .await
        .unwrap();
        create_product(
            &pool,
            &product_req(
                "Trail Kit",
                "Includes a shoe cleaning brush and laces",
                &["Sports"],
            ),
        )
        .await
        .unwrap();
        create_product(
            &pool,
            &product_req("Yoga Mat", "Non-slip mat for home workouts", &["Sports"]),
        )
        .await
        .unwrap();

        // "SHOE"는 첫 번째 상품의 이름과 두 번째 상품의 설명에 걸립니다
        let result = list_products(&pool, &list_query(None, None, Some("SHOE"), None))
            .await
            .unwrap();
        assert_eq!(result.total_items, 2);

        let names: Vec<&str> = result.data.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"Running Shoes"));
        assert!(names.contains(&"Trail Kit"));
    }

    // 카테고리 필터는 교집합이 아니라 **합집합**입니다
    #[tokio::test]
    async fn category_filter_returns_the_union() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Sports", "bg-red-500").await;
        seed_category(&pool, "Books", "bg-purple-500").await;
        seed_category(&pool, "Electronics", "bg-blue-500").await;

        create_product(
            &pool,
            &product_req("Running Shoes", "Comfortable running shoes for exercise", &["Sports"]),
        )
        .await
        .unwrap();
        create_product(
            &pool,
            &product_req("Programming Book", "Complete guide to modern web development", &["Books"]),
        )
        .await
        .unwrap();
        create_product(
            &pool,
            &product_req("Smartphone", "Latest smartphone with advanced features", &["Electronics"]),
        )
        .await
        .unwrap();

        let result = list_products(&pool, &list_query(None, None, None, Some("Sports,Books")))
            .await
            .unwrap();
        assert_eq!(result.total_items, 2);

        let names: Vec<&str> = result.data.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"Running Shoes"));
        assert!(names.contains(&"Programming Book"));
    }

    // 읽기 경로의 해석은 너그럽습니다: 없는 이름은 조용히 버려집니다
    #[tokio::test]
    async fn unknown_filter_names_are_silently_dropped() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Sports", "bg-red-500").await;
        seed_category(&pool, "Books", "bg-purple-500").await;

        create_product(
            &pool,
            &product_req("Running Shoes", "Comfortable running shoes for exercise", &["Sports"]),
        )
        .await
        .unwrap();
        create_product(
            &pool,
            &product_req("Programming Book", "Complete guide to modern web development", &["Books"]),
        )
        .await
        .unwrap();

        // "Nope"는 없는 카테고리 — Sports만 남습니다
        let result = list_products(&pool, &list_query(None, None, None, Some("Sports,Nope")))
            .await
            .unwrap();
        assert_eq!(result.total_items, 1);
        assert_eq!(result.data[0].name, "Running Shoes");

        // 전부 없는 이름이면 필터 자체가 빠집니다 (원본 동작 유지)
        let result = list_products(&pool, &list_query(None, None, None, Some("Nope")))
            .await
            .unwrap();
        assert_eq!(result.total_items, 2);
    }

    // 검색 조건과 카테고리 조건이 둘 다 있으면 AND로 결합됩니다
    #[tokio::test]
    async fn search_and_category_filters_combine() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Sports", "bg-red-500").await;
        seed_category(&pool, "Clothing", "bg-green-500").await;

        create_product(
            &pool,
            &product_req("Running Shoes", "Comfortable running shoes for exercise", &["Sports"]),
        )
        .await
        .unwrap();
        create_product(
            &pool,
            &product_req("Dress Shoes", "Polished leather shoes for formal wear", &["Clothing"]),
        )
        .await
        .unwrap();

        let result = list_products(
            &pool,
            &list_query(None, None, Some("shoes"), Some("Sports")),
        )
        .await
        .unwrap();
        assert_eq!(result.total_items, 1);
        assert_eq!(result.data[0].name, "Running Shoes");
    }

    // 최신순(created_at DESC) 정렬 확인
    #[tokio::test]
    async fn listing_is_sorted_newest_first() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Books", "bg-purple-500").await;

        let mut ids = Vec::new();
        for name in ["Oldest", "Middle", "Newest"] {
            let created = create_product(
                &pool,
                &product_req(name, "Ordering fixture with a long description", &["Books"]),
            )
            .await
            .unwrap();
            ids.push(created.id);
        }
        set_created_at(&pool, &ids[0], "2024-01-15T00:00:00.000Z").await;
        set_created_at(&pool, &ids[1], "2024-02-01T00:00:00.000Z").await;
        set_created_at(&pool, &ids[2], "2024-02-05T00:00:00.000Z").await;

        let result = list_products(&pool, &list_query(None, None, None, None))
            .await
            .unwrap();
        let names: Vec<&str> = result.data.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Newest", "Middle", "Oldest"]);
    }

    // 쓰기 경로의 해석은 엄격합니다: 없는 이름을 정확히 지목하며 실패해야 합니다
    #[tokio::test]
    async fn create_with_unknown_category_fails_naming_it() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Electronics", "bg-blue-500").await;

        let err = create_product(
            &pool,
            &product_req(
                "Smart Speaker",
                "Voice controlled speaker for the living room",
                &["Electronics", "Gadgets", "Audio"],
            ),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
        // 누락된 이름들이 요청 순서대로, 쉼표로 연결되어야 합니다
        assert_eq!(err.to_string(), "Categories not found: Gadgets, Audio");

        // 부분 기록이 없어야 합니다
        let result = list_products(&pool, &ProductListQuery::default()).await.unwrap();
        assert_eq!(result.total_items, 0);
    }

    // 상품 행과 관계 행은 한 트랜잭션입니다. 관계 행 INSERT가 실패하면
    // (트리거로 강제 실패시켜 재현) 상품 행도 함께 롤백되어야 합니다.
    #[tokio::test]
    async fn failed_category_link_rolls_back_the_product_row() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Electronics", "bg-blue-500").await;

        sqlx::query(
            "CREATE TRIGGER block_links BEFORE INSERT ON product_categories
             BEGIN SELECT RAISE(ABORT, 'link rejected'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let req = product_req(
            "Smart Lamp",
            "A dimmable smart lamp for the desk",
            &["Electronics"],
        );
        let err = create_product(&pool, &req).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)), "got {err:?}");

        sqlx::query("DROP TRIGGER block_links")
            .execute(&pool)
            .await
            .unwrap();

        // 카테고리 없는 상품이 남아 있으면 안 됩니다
        let result = list_products(&pool, &ProductListQuery::default()).await.unwrap();
        assert_eq!(result.total_items, 0);

        // 롤백되었으므로 같은 이름으로 다시 생성할 수 있어야 합니다
        create_product(&pool, &req).await.unwrap();
    }

    // 수정도 마찬가지입니다: 관계 교체가 실패하면 이름/설명 변경과
    // 기존 관계 삭제까지 전부 되돌아가야 합니다.
    #[tokio::test]
    async fn failed_category_link_rolls_back_the_update() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Sports", "bg-red-500").await;
        seed_category(&pool, "Clothing", "bg-green-500").await;

        let created = create_product(
            &pool,
            &product_req("Running Shoes", "Comfortable running shoes for exercise", &["Sports"]),
        )
        .await
        .unwrap();

        sqlx::query(
            "CREATE TRIGGER block_links BEFORE INSERT ON product_categories
             BEGIN SELECT RAISE(ABORT, 'link rejected'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = update_product(
            &pool,
            &created.id,
            &product_req("Trail Shoes", "Rugged trail shoes for muddy terrain", &["Clothing"]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Database(_)), "got {err:?}");

        sqlx::query("DROP TRIGGER block_links")
            .execute(&pool)
            .await
            .unwrap();

        // 수정 전 상태가 그대로 남아 있어야 합니다 (이름도, 카테고리 관계도)
        let fetched = get_product_response(&pool, &created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.name, "Running Shoes");
        assert_eq!(fetched.categories, ["Sports"]);
    }

    // 상품 이름 유일성은 대소문자 무시 기준입니다
    #[tokio::test]
    async fn duplicate_name_is_rejected_case_insensitively() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Electronics", "bg-blue-500").await;

        create_product(
            &pool,
            &product_req("Smartphone", "Latest smartphone with advanced features", &["Electronics"]),
        )
        .await
        .unwrap();

        let err = create_product(
            &pool,
            &product_req("SMARTPHONE", "A different description entirely here", &["Electronics"]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
        assert_eq!(err.to_string(), "Product name already exists");
    }

    // 수정으로 다른 상품의 이름을 (대소문자만 바꿔서) 가로챌 수 없어야 하고,
    // 자기 자신의 이름을 유지하는 수정은 허용되어야 합니다
    #[tokio::test]
    async fn update_cannot_take_another_products_name() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Electronics", "bg-blue-500").await;

        create_product(
            &pool,
            &product_req("Smartphone", "Latest smartphone with advanced features", &["Electronics"]),
        )
        .await
        .unwrap();
        let other = create_product(
            &pool,
            &product_req("Tablet", "Portable tablet computer with stylus", &["Electronics"]),
        )
        .await
        .unwrap();

        let err = update_product(
            &pool,
            &other.id,
            &product_req("smartphone", "Portable tablet computer with stylus", &["Electronics"]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Product name already exists");

        // 자기 이름 그대로는 충돌이 아닙니다 (자신은 검사에서 제외)
        let updated = update_product(
            &pool,
            &other.id,
            &product_req("Tablet", "Portable tablet computer with stylus", &["Electronics"]),
        )
        .await
        .unwrap();
        assert!(updated.is_some());
    }

    // 왕복: 카테고리는 이름으로, createdAt은 유효한 ISO-8601로 돌아와야 합니다
    #[tokio::test]
    async fn round_trip_projects_names_and_iso_timestamp() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Electronics", "bg-blue-500").await;

        let created = create_product(
            &pool,
            &product_req(
                "Wireless Headphones",
                "High-quality noise-cancelling wireless headphones",
                &["Electronics"],
            ),
        )
        .await
        .unwrap();

        let fetched = get_product_response(&pool, &created.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched.categories, ["Electronics"]);
        // 생성 응답과 조회 응답의 생성 시각이 같아야 합니다 (불변 필드)
        assert_eq!(fetched.created_at, created.created_at);
        // ISO-8601(RFC 3339)로 파싱 가능한지 확인
        chrono::DateTime::parse_from_rfc3339(&fetched.created_at)
            .expect("created_at should be a valid ISO-8601 timestamp");
    }

    // 수정 시 카테고리 집합은 병합이 아니라 통째로 교체됩니다
    #[tokio::test]
    async fn update_replaces_category_set_wholesale() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Sports", "bg-red-500").await;
        seed_category(&pool, "Clothing", "bg-green-500").await;

        let created = create_product(
            &pool,
            &product_req("Running Shoes", "Comfortable running shoes for exercise", &["Sports"]),
        )
        .await
        .unwrap();

        let updated = update_product(
            &pool,
            &created.id,
            &product_req("Running Shoes", "Comfortable running shoes for exercise", &["Clothing"]),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.categories, ["Clothing"]);
    }

    // 상품 삭제는 관계 행만 함께 지우고, 카테고리 자체는 건드리지 않습니다
    #[tokio::test]
    async fn deleting_product_releases_its_categories() {
        let pool = test_support::pool().await;
        seed_category(&pool, "Music", "bg-indigo-500").await;

        let created = create_product(
            &pool,
            &product_req("Acoustic Guitar", "Six string acoustic guitar for beginners", &["Music"]),
        )
        .await
        .unwrap();

        assert!(delete_product(&pool, &created.id).await.unwrap());
        // 없는 ID를 다시 지우면 false
        assert!(!delete_product(&pool, &created.id).await.unwrap());

        // CASCADE로 관계가 사라졌으므로 이제 카테고리 삭제가 가능합니다
        let category = crate::db::categories::find_categories_by_names(
            &pool,
            &["Music".to_string()],
        )
        .await
        .unwrap()
        .remove(0);
        crate::db::categories::delete_category(&pool, &category)
            .await
            .unwrap();
    }
}
