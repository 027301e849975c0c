//! # 카테고리 모델 정의
//!
//! 카테고리(Category)는 상품을 분류하기 위한 라벨입니다.
//! 이름은 전체에서 유일하고, 화면 표시용 색상 토큰을 하나 가집니다.
//!
//! ## 구조체 역할
//! - `Category`: 데이터베이스에 저장된 카테고리를 표현 (응답용)
//! - `CreateCategoryRequest`: 새 카테고리 생성 시 클라이언트가 보내는 JSON 본문
//! - `UpdateCategoryRequest`: 카테고리 수정 시 클라이언트가 보내는 JSON 본문
//!
//! 필드 검증도 이 모듈에서 수행합니다. Express 시절에는 express-validator
//! 미들웨어 체인이 하던 일을, 여기서는 요청 구조체의 `validate()` 메서드로 옮겼습니다.
//! 에러 메시지는 원본 API와 동일하게 유지합니다.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// 카테고리 엔티티 — DB의 `categories` 테이블 한 행(row)에 대응합니다.
///
/// # derive 매크로 설명
/// - `Serialize`: 이 구조체를 JSON으로 변환할 수 있게 합니다 (API 응답 시 사용)
/// - `Deserialize`: JSON을 이 구조체로 변환할 수 있게 합니다
/// - `sqlx::FromRow`: SQL 쿼리 결과(행)를 이 구조체로 자동 매핑합니다
/// - `Clone`: 값을 복제할 수 있게 합니다 (.clone() 메서드 제공)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// 카테고리 고유 식별자 (UUIDv7 형식 문자열)
    pub id: String,
    /// 카테고리 이름 (예: "Electronics", "Books") — 정확 일치 기준으로 유일
    pub name: String,
    /// Tailwind CSS 색상 클래스 (예: "bg-blue-500")
    pub color: String,
}

/// 카테고리 생성 요청 — `POST /api/categories`의 요청 본문(body)에 해당합니다.
///
/// Serialize를 빼고 Deserialize만 derive한 이유:
/// 이 구조체는 클라이언트 → 서버 방향으로만 사용되므로
/// JSON 파싱(Deserialize)만 필요하고, JSON 생성(Serialize)은 불필요합니다.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// 생성할 카테고리 이름 (필수, 앞뒤 공백 제거 후 2~50자)
    pub name: String,
    /// 색상 토큰 (필수, `bg-<단어>-<숫자 3자리>` 형식)
    pub color: String,
}

impl CreateCategoryRequest {
    /// 요청 본문의 필드들을 검증합니다.
    ///
    /// 검증을 통과하지 못하면 `AppError::Validation`(HTTP 400)을 반환하며,
    /// 메시지는 원본 API의 express-validator 메시지와 동일합니다.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name)?;
        validate_color(&self.color)?;
        Ok(())
    }
}

/// 카테고리 수정 요청 — `PUT /api/categories/:id`의 요청 본문에 해당합니다.
///
/// 모든 필드가 Option인 이유: 부분 업데이트(partial update)이기 때문입니다.
/// 클라이언트가 변경하고 싶은 필드만 보내면 되고, 빠진 필드는 None으로 처리됩니다.
/// 원본 API는 `name || category.name` 식으로 빈 문자열도 "변경 없음"으로
/// 취급했으므로, 공백뿐인 값 역시 기존 값을 유지합니다.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// 변경할 카테고리 이름 (None이거나 공백뿐이면 변경하지 않음)
    pub name: Option<String>,
    /// 변경할 색상 토큰 (None이거나 공백뿐이면 변경하지 않음)
    pub color: Option<String>,
}

impl UpdateCategoryRequest {
    /// 실제로 변경될 필드만 검증합니다.
    ///
    /// None이거나 빈 값인 필드는 "기존 값 유지"이므로 검사하지 않습니다.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = self.effective_name() {
            validate_name(name)?;
        }
        if let Some(color) = self.effective_color() {
            validate_color(color)?;
        }
        Ok(())
    }

    /// 변경 의사가 있는 이름 — 공백뿐인 입력은 None으로 정규화합니다.
    ///
    /// Option<&str> 반환: 값을 복제하지 않고 참조만 빌려줍니다.
    pub fn effective_name(&self) -> Option<&str> {
        // as_deref(): Option<String> → Option<&str> 변환
        // filter(): 조건을 만족하지 않으면 Some → None으로 바꿉니다
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// 변경 의사가 있는 색상 — 공백뿐인 입력은 None으로 정규화합니다.
    pub fn effective_color(&self) -> Option<&str> {
        self.color
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// 카테고리 이름 검증: 앞뒤 공백 제거 후 2~50자
fn validate_name(name: &str) -> Result<(), AppError> {
    // chars().count(): 바이트 수(len())가 아닌 문자 수를 셉니다.
    // 한글 같은 멀티바이트 문자도 한 글자로 세기 위함입니다.
    let len = name.trim().chars().count();
    if !(2..=50).contains(&len) {
        return Err(AppError::Validation(
            "Category name must be between 2 and 50 characters".to_string(),
        ));
    }
    Ok(())
}

/// 색상 토큰 검증: `^bg-\w+-\d{3}$` 패턴과 동일한 규칙
///
/// 정규식 크레이트를 들이지 않고 직접 검사합니다.
/// `\w`는 영숫자와 밑줄, `\d{3}`은 숫자 정확히 3자리입니다.
fn validate_color(color: &str) -> Result<(), AppError> {
    if !is_valid_color(color.trim()) {
        return Err(AppError::Validation(
            "Color must be a valid Tailwind CSS class (e.g., bg-blue-500)".to_string(),
        ));
    }
    Ok(())
}

/// `bg-<단어>-<숫자 3자리>` 형식인지 확인합니다.
fn is_valid_color(color: &str) -> bool {
    // strip_prefix(): 접두사가 맞으면 나머지를 Some으로 반환
    let Some(rest) = color.strip_prefix("bg-") else {
        return false;
    };

    // rsplit_once('-'): 마지막 '-'를 기준으로 (앞, 뒤)로 나눕니다.
    // `\w`에는 '-'가 포함되지 않으므로 마지막 '-' 뒤가 숫자 부분입니다.
    let Some((word, digits)) = rest.rsplit_once('-') else {
        return false;
    };

    // 색상 이름: 비어 있지 않고 영숫자/밑줄만
    let word_ok = !word.is_empty() && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    // 농도: 정확히 3자리 숫자 (예: 500)
    let digits_ok = digits.len() == 3 && digits.chars().all(|c| c.is_ascii_digit());

    word_ok && digits_ok
}
