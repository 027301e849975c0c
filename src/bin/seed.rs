//! # 카테고리 시더(Seeder)
//!
//! 기본 카테고리 팔레트를 DB에 채워 넣는 보조 바이너리입니다.
//! 개발 환경을 처음 준비할 때 한 번 실행합니다:
//!
//! ```sh
//! cargo run --bin seed
//! ```
//!
//! 동작: 기존 카테고리를 모두 지우고 기준 팔레트 10개를 새로 넣습니다.
//! (상품이 이미 카테고리를 참조하고 있으면 외래 키 제약 때문에 실패합니다 —
//! 시더는 빈 DB 또는 상품이 없는 DB에서 쓰는 도구입니다)
//!
//! 메인 서버와 별도의 바이너리라서 필요한 것만 직접 가져옵니다.
//! Cargo는 `src/bin/*.rs`를 자동으로 추가 바이너리로 인식합니다.

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;

/// 기준 카테고리 팔레트 — (이름, Tailwind 색상 토큰)
///
/// &[(&str, &str)]: 문자열 참조 튜플의 슬라이스. 컴파일 타임 상수이므로
/// 힙 할당 없이 바이너리에 그대로 포함됩니다.
const CATEGORIES: &[(&str, &str)] = &[
    ("Electronics", "bg-blue-500"),
    ("Clothing", "bg-green-500"),
    ("Books", "bg-purple-500"),
    ("Home & Garden", "bg-yellow-500"),
    ("Sports", "bg-red-500"),
    ("Beauty", "bg-pink-500"),
    ("Automotive", "bg-gray-500"),
    ("Toys", "bg-orange-500"),
    ("Health", "bg-emerald-500"),
    ("Music", "bg-indigo-500"),
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // 시더는 짧게 실행되고 끝나므로 간단한 포맷터만 설치합니다
    tracing_subscriber::fmt().init();

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    // 빈 DB에서도 실행할 수 있도록 마이그레이션부터 적용합니다
    sqlx::migrate!("./migrations").run(&pool).await?;

    // 기존 카테고리를 모두 지우고 새로 채웁니다
    sqlx::query("DELETE FROM categories").execute(&pool).await?;

    for (name, color) in CATEGORIES {
        let id = uuid::Uuid::now_v7().to_string();
        sqlx::query("INSERT INTO categories (id, name, color) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(color)
            .execute(&pool)
            .await?;

        tracing::info!("{} ({})", name, color);
    }

    tracing::info!("Successfully seeded: {}", CATEGORIES.len());

    pool.close().await;
    Ok(())
}
