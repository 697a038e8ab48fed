//! 메트릭 상수 및 설명 등록
//!
//! 분석기는 `metrics` facade로만 기록하며, exporter 설치는 호출자의 몫입니다.
//! 레코더가 없으면 기록은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `phpsbom_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(phpsbom_core::metrics::ANALYSES_TOTAL, "result" => "success").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── 분석 메트릭 ──────────────────────────────────────────────────

/// 완료된 분석 수 (counter, label: result)
pub const ANALYSES_TOTAL: &str = "phpsbom_analyses_total";

/// 출력된 의존성 패키지 수 (counter)
pub const PACKAGES_TOTAL: &str = "phpsbom_packages_total";

/// 출력된 워크스페이스 수 (counter)
pub const WORKSPACES_TOTAL: &str = "phpsbom_workspaces_total";

/// 분석 소요 시간 (histogram, 초)
pub const ANALYSIS_DURATION_SECONDS: &str = "phpsbom_analysis_duration_seconds";

/// 분석 소요 시간 히스토그램 버킷 (초)
pub const ANALYSIS_DURATION_BUCKETS: [f64; 8] = [0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0, 120.0];

/// 모든 메트릭의 설명(description)을 등록합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(ANALYSES_TOTAL, "Total number of Composer SBOM analyses");
    describe_counter!(
        PACKAGES_TOTAL,
        "Total number of dependency packages emitted across analyses"
    );
    describe_counter!(
        WORKSPACES_TOTAL,
        "Total number of workspaces emitted across analyses"
    );
    describe_histogram!(
        ANALYSIS_DURATION_SECONDS,
        "Time to complete a single analysis in seconds"
    );
}
