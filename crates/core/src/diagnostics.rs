//! 분석 에러 레코드와 호출 단위 수집기
//!
//! 분석 중 발생한 에러는 분석을 중단시키지 않고 [`ErrorCollector`]에 쌓였다가
//! `analysis_info.errors`로 출력됩니다. 각 레코드는 사용자에게 노출되는 `public`
//! 부분과 내부 진단용 `private` 부분으로 나뉩니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 공개 에러 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    /// 일반 에러
    GenericError,
    /// 지원하지 않는 언어 요청
    UnsupportedLanguageRequested,
}

impl ErrorType {
    /// 직렬화 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenericError => "GENERIC_ERROR",
            Self::UnsupportedLanguageRequested => "UNSUPPORTED_LANGUAGE_REQUESTED",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 에러 유형 + 설명
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContent {
    #[serde(rename = "type")]
    pub error_type: String,
    pub description: String,
}

/// 출력에 기록되는 에러 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub public: ErrorContent,
    pub private: ErrorContent,
}

impl ErrorRecord {
    /// 공개/내부 유형과 설명으로 레코드를 생성합니다.
    pub fn new(
        public_type: ErrorType,
        public_description: impl Into<String>,
        private_type: impl Into<String>,
        private_description: impl Into<String>,
    ) -> Self {
        Self {
            public: ErrorContent {
                error_type: public_type.as_str().to_owned(),
                description: public_description.into(),
            },
            private: ErrorContent {
                error_type: private_type.into(),
                description: private_description.into(),
            },
        }
    }
}

/// 분석 호출 하나가 소유하는 에러 수집기
#[derive(Debug, Default)]
pub struct ErrorCollector {
    records: Vec<ErrorRecord>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드를 추가합니다.
    pub fn push(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 지금까지 수집된 레코드를 조회합니다.
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// 수집기를 소비하여 레코드 목록을 반환합니다.
    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_type_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ErrorType::GenericError).unwrap(),
            "\"GENERIC_ERROR\""
        );
        assert_eq!(
            ErrorType::UnsupportedLanguageRequested.to_string(),
            "UNSUPPORTED_LANGUAGE_REQUESTED"
        );
    }

    #[test]
    fn record_json_shape() {
        let record = ErrorRecord::new(
            ErrorType::GenericError,
            "source directory does not exist",
            "SourceDirectoryMissing",
            "/srv/missing",
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["public"]["type"], "GENERIC_ERROR");
        assert_eq!(json["private"]["type"], "SourceDirectoryMissing");
        assert_eq!(json["private"]["description"], "/srv/missing");
    }

    #[test]
    fn collector_keeps_insertion_order() {
        let mut collector = ErrorCollector::new();
        assert!(collector.is_empty());

        collector.push(ErrorRecord::new(ErrorType::GenericError, "a", "A", "a"));
        collector.push(ErrorRecord::new(ErrorType::GenericError, "b", "B", "b"));

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.records()[0].private.error_type, "A");
        let records = collector.into_records();
        assert_eq!(records[1].private.error_type, "B");
    }
}
