//! PHAR 아카이브 요약
//!
//! 아카이브 내부는 읽지 않고 파일 메타데이터만 기록합니다.
//! `signature`, `metadata`, `main_script`는 항상 비어 있습니다.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};

use phpsbom_core::types::PharInfo;

use crate::error::ComposerSbomError;

/// PHAR 파일 하나를 요약합니다.
pub fn summarize(path: &Path) -> Result<PharInfo, ComposerSbomError> {
    let metadata = std::fs::metadata(path).map_err(|source| ComposerSbomError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let modified = metadata
        .modified()
        .map(|t| DateTime::<Utc>::from(t).to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();

    debug!(path = %path.display(), size = metadata.len(), "summarized phar archive");

    Ok(PharInfo {
        path: path.display().to_string(),
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size: metadata.len(),
        modified,
        signature: String::new(),
        metadata: serde_json::Map::new(),
        main_script: String::new(),
        is_executable: is_executable(&metadata),
    })
}

/// 여러 PHAR을 요약합니다. 실패한 파일은 경고 후 건너뜁니다.
pub fn summarize_all(paths: &[PathBuf]) -> Vec<PharInfo> {
    paths
        .iter()
        .filter_map(|path| {
            summarize(path)
                .inspect_err(|e| warn!(path = %path.display(), error = %e, "failed to stat phar archive, skipping"))
                .ok()
        })
        .collect()
}

#[cfg(unix)]
fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &Metadata) -> bool {
    false
}
