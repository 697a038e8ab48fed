//! Composer 파일 파서 -- composer.json, composer.lock
//!
//! [`ComposerDocument`] trait은 두 파일 형식이 공유하는 읽기/디코딩 경로를 제공합니다.
//! [`ComposerFileDetector`]는 탐색 중 만난 파일이 manifest, lockfile, PHAR 중
//! 무엇인지 판별합니다.
//!
//! # 관대한 디코딩
//!
//! Composer가 생성한 파일은 PHP 배열 직렬화 특성상 빈 객체를 `[]`로 쓰는 경우가 있습니다.
//! `require`, `platform` 같은 맵 필드는 [`lenient_map`]으로 디코딩하여 `[]`/`null`을 빈
//! 맵으로 받아들이고, 변환할 수 없는 값은 건너뜁니다. 최상위 구조가 객체가 아니거나 JSON
//! 구문이 깨진 경우에만 에러입니다.

pub mod license;
pub mod lockfile;
pub mod manifest;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ComposerSbomError;
use lockfile::Lockfile;
use manifest::Manifest;

/// manifest 파일명
pub const MANIFEST_FILE_NAME: &str = "composer.json";
/// lockfile 파일명
pub const LOCKFILE_NAME: &str = "composer.lock";
/// PHAR 아카이브 확장자 (소문자 비교)
pub const PHAR_EXTENSION: &str = "phar";

/// PHP 런타임/확장 요구사항인지 확인합니다 (`php`, `ext-*`).
///
/// 이 이름들은 실제 패키지가 아니므로 직접 의존성 목록과 lockfile 없는 의존성 맵에서
/// 제외됩니다.
pub fn is_platform_requirement(name: &str) -> bool {
    name == "php" || (name.starts_with("ext-") && name.len() > 4)
}

/// Composer 파일 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerFileKind {
    /// composer.json
    Manifest,
    /// composer.lock
    Lockfile,
    /// *.phar
    Phar,
}

/// Composer 파일 탐지기
///
/// 파일 이름만으로 판별합니다. manifest/lockfile은 정확히 일치해야 하고,
/// PHAR은 확장자를 대소문자 구분 없이 비교합니다.
pub struct ComposerFileDetector {
    known_filenames: Vec<(String, ComposerFileKind)>,
}

impl ComposerFileDetector {
    pub fn new() -> Self {
        Self {
            known_filenames: vec![
                (Manifest::FILE_NAME.to_owned(), ComposerFileKind::Manifest),
                (Lockfile::FILE_NAME.to_owned(), ComposerFileKind::Lockfile),
            ],
        }
    }

    /// 경로의 파일 종류를 판별합니다.
    pub fn classify(&self, path: &Path) -> Option<ComposerFileKind> {
        let file_name = path.file_name().and_then(|n| n.to_str())?;

        if let Some((_, kind)) = self
            .known_filenames
            .iter()
            .find(|(known, _)| known == file_name)
        {
            return Some(*kind);
        }

        let is_phar = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PHAR_EXTENSION));
        is_phar.then_some(ComposerFileKind::Phar)
    }
}

impl Default for ComposerFileDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// composer.json / composer.lock 공통 디코딩 경로
pub trait ComposerDocument: DeserializeOwned {
    /// 이 문서의 표준 파일명
    const FILE_NAME: &'static str;

    /// 디코딩/읽기 실패를 이 문서 종류의 에러로 감쌉니다.
    fn malformed(path: &str, reason: String) -> ComposerSbomError;

    /// JSON 문자열을 디코딩합니다. 최상위 값은 객체여야 합니다.
    ///
    /// - `content`: 파일 내용
    /// - `source_path`: 원본 경로 (에러 메시지용)
    fn from_json(content: &str, source_path: &str) -> Result<Self, ComposerSbomError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Self::malformed(source_path, e.to_string()))?;

        // 파생 Deserialize는 배열도 위치 순서로 받아들이므로 먼저 걸러낸다
        if !value.is_object() {
            return Err(Self::malformed(
                source_path,
                format!("expected a JSON object at top level, found {}", json_kind(&value)),
            ));
        }

        serde_json::from_value(value).map_err(|e| Self::malformed(source_path, e.to_string()))
    }

    /// 파일을 읽어 디코딩합니다. 읽기 실패와 크기 초과도 같은 에러 종류로 보고합니다.
    fn from_file(path: &Path, max_file_size: usize) -> Result<Self, ComposerSbomError> {
        let display = path.display().to_string();
        let content = read_bounded(path, max_file_size)
            .map_err(|e| Self::malformed(&display, e.to_string()))?;
        Self::from_json(&content, &display)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// 크기 제한을 적용하여 파일을 UTF-8 문자열로 읽습니다.
pub fn read_bounded(path: &Path, max_file_size: usize) -> Result<String, ComposerSbomError> {
    let io_err = |source| ComposerSbomError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = std::fs::File::open(path).map_err(io_err)?;
    let size = file.metadata().map_err(io_err)?.len();
    if size > max_file_size as u64 {
        return Err(ComposerSbomError::FileTooBig {
            path: path.display().to_string(),
            size,
            max: max_file_size,
        });
    }

    // 메타데이터 확인 이후 파일이 커지는 경우도 상한에서 자른다
    let mut content = String::new();
    file.take(max_file_size as u64 + 1)
        .read_to_string(&mut content)
        .map_err(io_err)?;
    if content.len() > max_file_size {
        return Err(ComposerSbomError::FileTooBig {
            path: path.display().to_string(),
            size: content.len() as u64,
            max: max_file_size,
        });
    }

    Ok(content)
}

/// 객체가 아니면 빈 맵, 항목 중 `V`로 변환되지 않는 값은 건너뜁니다.
pub(crate) fn lenient_map<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: DeserializeOwned,
{
    let Some(Value::Object(map)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(k, v)| serde_json::from_value(v).ok().map(|v| (k, v)))
        .collect())
}

/// 배열이 아니면 빈 목록, 변환되지 않는 항목은 건너뜁니다.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(Value::Array(items)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// 문자열이 아니면 빈 문자열
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// 불리언이 아니면 `false`
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(
        Option::<Value>::deserialize(deserializer)?,
        Some(Value::Bool(true))
    ))
}
