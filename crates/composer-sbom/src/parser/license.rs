//! `license` 필드 디코딩과 정규화
//!
//! Composer의 `license`는 문자열 하나 또는 문자열 배열입니다. 그 외 모양은
//! 파싱 경계에서 [`LicenseField::Other`]로 받아 두었다가 [`LicenseField::normalize`]에서
//! 빈 목록으로 바꿉니다.

use serde::Deserialize;
use serde_json::Value;

/// 원본 `license` 값
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LicenseField {
    /// `"MIT"`
    Single(String),
    /// `["MIT", "GPL-3.0-or-later"]`
    List(Vec<Value>),
    /// null, 객체, 숫자 등
    Other(Value),
}

impl Default for LicenseField {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

impl LicenseField {
    /// 라이선스 목록으로 정규화합니다. 문자열이 아닌 배열 항목은 버립니다.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Single(license) => vec![license.clone()],
            Self::List(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect(),
            Self::Other(_) => Vec::new(),
        }
    }
}

impl From<Vec<String>> for LicenseField {
    fn from(licenses: Vec<String>) -> Self {
        Self::List(licenses.into_iter().map(Value::String).collect())
    }
}
