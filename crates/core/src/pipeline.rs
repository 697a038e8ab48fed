//! 파이프라인 trait -- 분석기/결과 저장소/지식 소스 확장 포인트

use std::path::Path;

use uuid::Uuid;

use crate::error::PhpSbomError;
use crate::types::Output;

/// 생태계별 SBOM 분석기 trait
///
/// 분석은 전역적(total)입니다. 어떤 입력에도 잘 구성된 [`Output`]을 반환하며,
/// 실패는 `analysis_info.status`와 `errors`로 표현합니다.
pub trait SbomAnalyzer: Send + Sync {
    /// 분석기 이름 (패키지 매니저 식별자)
    fn name(&self) -> &str;

    /// 루트 디렉토리를 분석하여 SBOM 출력을 생성
    fn analyze(&self, root: &Path, analysis_id: Uuid) -> Output;
}

/// 분석 결과 저장소 trait
pub trait ResultSink: Send + Sync {
    /// 결과를 저장하고 이후 조회에 쓰는 키를 반환
    fn store(&self, analysis_id: Uuid, output: &Output) -> Result<String, PhpSbomError>;
}

/// 외부 패키지 지식 소스 핸들
///
/// 분석기는 핸들을 받아 보관하지만 조회하지는 않습니다.
pub trait KnowledgeSource: Send + Sync {
    /// 소스 이름 (로그용)
    fn name(&self) -> &str;
}
