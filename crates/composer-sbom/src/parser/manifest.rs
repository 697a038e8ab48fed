//! composer.json 디코딩

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use phpsbom_core::types::Author;

use super::license::LicenseField;
use super::{
    lenient_map, lenient_string, lenient_vec, ComposerDocument, MANIFEST_FILE_NAME,
};
use crate::error::ComposerSbomError;

/// composer.json
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub package_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    #[serde(default)]
    pub license: LicenseField,
    /// 이름 → 버전 제약
    #[serde(default, deserialize_with = "lenient_map")]
    pub require: BTreeMap<String, String>,
    #[serde(default, rename = "require-dev", deserialize_with = "lenient_map")]
    pub require_dev: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub authors: Vec<PackageAuthor>,
    /// 오토로드 규칙 (해석하지 않음)
    #[serde(default, deserialize_with = "lenient_map")]
    pub autoload: BTreeMap<String, Value>,
    /// 자유 형식 `extra` 메타데이터
    #[serde(default, deserialize_with = "lenient_map")]
    pub extra: BTreeMap<String, Value>,
}

impl Manifest {
    /// `require.php` 제약 (없으면 빈 문자열)
    pub fn php_constraint(&self) -> &str {
        self.require.get("php").map(String::as_str).unwrap_or_default()
    }

    /// 출력용 프로젝트 이름 (`name`이 비어 있으면 `unknown`)
    pub fn project_name(&self) -> &str {
        if self.name.is_empty() {
            "unknown"
        } else {
            &self.name
        }
    }
}

impl ComposerDocument for Manifest {
    const FILE_NAME: &'static str = MANIFEST_FILE_NAME;

    fn malformed(path: &str, reason: String) -> ComposerSbomError {
        ComposerSbomError::MalformedManifest {
            path: path.to_owned(),
            reason,
        }
    }
}

/// `authors` 항목
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageAuthor {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
}

impl From<&PackageAuthor> for Author {
    fn from(author: &PackageAuthor) -> Self {
        Author {
            name: author.name.clone(),
            email: author.email.clone(),
            role: author.role.clone(),
        }
    }
}
