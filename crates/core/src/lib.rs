#![doc = include_str!("../README.md")]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{AnalysisError, ConfigError, PhpSbomError, SinkError};

// 설정
pub use config::PhpSbomConfig;

// 에러 레코드
pub use diagnostics::{ErrorCollector, ErrorContent, ErrorRecord, ErrorType};

// 파이프라인 trait
pub use pipeline::{KnowledgeSource, ResultSink, SbomAnalyzer};

// 출력 스키마
pub use types::{
    AnalysisInfo, AnalysisStatus, AnalysisTime, Author, DependencyMap, Extra, Output, Paths,
    PharInfo, Start, Statistics, Versions, WorkSpace, WorkSpaceDependency, Workspaces,
};
