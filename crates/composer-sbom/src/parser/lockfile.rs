//! composer.lock 디코딩

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::license::LicenseField;
use super::manifest::PackageAuthor;
use super::{
    lenient_bool, lenient_map, lenient_string, lenient_vec, ComposerDocument, LOCKFILE_NAME,
};
use crate::error::ComposerSbomError;

/// composer.lock
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Lockfile {
    #[serde(default, rename = "content-hash", deserialize_with = "lenient_string")]
    pub content_hash: String,
    /// 운영 의존성
    #[serde(default, deserialize_with = "lenient_vec")]
    pub packages: Vec<LockedPackage>,
    /// 개발 의존성
    #[serde(default, rename = "packages-dev", deserialize_with = "lenient_vec")]
    pub packages_dev: Vec<LockedPackage>,
    #[serde(default, rename = "minimum-stability", deserialize_with = "lenient_string")]
    pub minimum_stability: String,
    #[serde(default, rename = "stability-flags", deserialize_with = "lenient_map")]
    pub stability_flags: BTreeMap<String, i64>,
    #[serde(default, rename = "prefer-stable", deserialize_with = "lenient_bool")]
    pub prefer_stable: bool,
    #[serde(default, rename = "prefer-lowest", deserialize_with = "lenient_bool")]
    pub prefer_lowest: bool,
    /// 플랫폼 요구사항 (`php`, `ext-*`)
    #[serde(default, deserialize_with = "lenient_map")]
    pub platform: BTreeMap<String, String>,
    #[serde(default, rename = "platform-dev", deserialize_with = "lenient_map")]
    pub platform_dev: BTreeMap<String, String>,
    #[serde(default, rename = "plugin-api-version", deserialize_with = "lenient_string")]
    pub plugin_api_version: String,
    /// 브랜치 별칭 (원본 그대로)
    #[serde(default, deserialize_with = "lenient_vec")]
    pub aliases: Vec<Value>,
}

impl Lockfile {
    /// 운영 + 개발 패키지 수
    pub fn package_count(&self) -> usize {
        self.packages.len() + self.packages_dev.len()
    }
}

impl ComposerDocument for Lockfile {
    const FILE_NAME: &'static str = LOCKFILE_NAME;

    fn malformed(path: &str, reason: String) -> ComposerSbomError {
        ComposerSbomError::MalformedLockfile {
            path: path.to_owned(),
            reason,
        }
    }
}

/// lockfile의 해석된 패키지 한 건
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LockedPackage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient_map")]
    pub require: BTreeMap<String, String>,
    #[serde(default, rename = "require-dev", deserialize_with = "lenient_map")]
    pub require_dev: BTreeMap<String, String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub package_type: String,
    #[serde(default)]
    pub license: LicenseField,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub authors: Vec<PackageAuthor>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_map")]
    pub source: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub dist: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(default, rename = "notification-url", deserialize_with = "lenient_string")]
    pub notification_url: String,
}

impl LockedPackage {
    /// 패키지 자신의 `require.php` 제약
    pub fn php_constraint(&self) -> &str {
        self.require.get("php").map(String::as_str).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "_readme": ["This file locks the dependencies of your project"],
        "content-hash": "4f1a2b3c",
        "packages": [
            {
                "name": "psr/log",
                "version": "3.0.0",
                "require": {"php": ">=8.0.0"},
                "type": "library",
                "license": ["MIT"],
                "authors": [{"name": "PHP-FIG", "homepage": "https://www.php-fig.org/"}],
                "description": "Common interface for logging libraries"
            }
        ],
        "packages-dev": [
            {"name": "phpunit/phpunit", "version": "10.5.11", "license": "BSD-3-Clause"}
        ],
        "aliases": [],
        "minimum-stability": "stable",
        "stability-flags": [],
        "prefer-stable": true,
        "prefer-lowest": false,
        "platform": {"php": "^8.1"},
        "platform-dev": [],
        "plugin-api-version": "2.6.0"
    }"#;

    #[test]
    fn parse_typical_lockfile() {
        let lock = Lockfile::from_json(SAMPLE, "composer.lock").unwrap();

        assert_eq!(lock.content_hash, "4f1a2b3c");
        assert_eq!(lock.package_count(), 2);
        assert_eq!(lock.minimum_stability, "stable");
        assert!(lock.prefer_stable);
        assert!(lock.stability_flags.is_empty());
        assert_eq!(lock.platform["php"], "^8.1");
        assert!(lock.platform_dev.is_empty());
        assert_eq!(lock.plugin_api_version, "2.6.0");

        let psr = &lock.packages[0];
        assert_eq!(psr.php_constraint(), ">=8.0.0");
        assert_eq!(psr.license.normalize(), vec!["MIT"]);
        assert_eq!(psr.authors[0].name, "PHP-FIG");

        let phpunit = &lock.packages_dev[0];
        assert_eq!(phpunit.license.normalize(), vec!["BSD-3-Clause"]);
        assert!(phpunit.require.is_empty());
    }

    #[test]
    fn empty_object_is_valid_lockfile() {
        let lock = Lockfile::from_json("{}", "composer.lock").unwrap();
        assert_eq!(lock.package_count(), 0);
        assert!(!lock.prefer_stable);
    }

    #[test]
    fn syntax_error_is_malformed_lockfile() {
        let err = Lockfile::from_json("{\"packages\": [", "/app/composer.lock").unwrap_err();
        assert!(matches!(
            err,
            ComposerSbomError::MalformedLockfile { ref path, .. } if path == "/app/composer.lock"
        ));
    }

    #[test]
    fn top_level_array_is_malformed_lockfile() {
        for content in ["[]", r#"["4f1a2b3c", []]"#] {
            let err = Lockfile::from_json(content, "composer.lock").unwrap_err();
            assert!(matches!(err, ComposerSbomError::MalformedLockfile { .. }));
        }
    }

    #[test]
    fn stability_flags_object_is_decoded() {
        let lock = Lockfile::from_json(
            r#"{"stability-flags": {"roave/security-advisories": 20, "bad": "x"}}"#,
            "composer.lock",
        )
        .unwrap();
        assert_eq!(lock.stability_flags.len(), 1);
        assert_eq!(lock.stability_flags["roave/security-advisories"], 20);
    }

    #[test]
    fn passthrough_metadata_is_kept() {
        let lock = Lockfile::from_json(
            r#"{
                "packages": [{
                    "name": "monolog/monolog",
                    "version": "3.5.0",
                    "source": {"type": "git", "url": "https://github.com/Seldaek/monolog.git"},
                    "dist": {"type": "zip", "shasum": ""},
                    "keywords": ["log", "logging", 7],
                    "time": "2023-10-27T15:32:31+00:00",
                    "notification-url": "https://packagist.org/downloads/"
                }],
                "aliases": [{"package": "acme/lib", "alias": "1.0.x-dev"}]
            }"#,
            "composer.lock",
        )
        .unwrap();

        let monolog = &lock.packages[0];
        assert_eq!(monolog.source["type"], "git");
        assert_eq!(monolog.dist["type"], "zip");
        assert_eq!(monolog.keywords, vec!["log", "logging"]);
        assert_eq!(monolog.time, "2023-10-27T15:32:31+00:00");
        assert_eq!(monolog.notification_url, "https://packagist.org/downloads/");
        assert_eq!(lock.aliases.len(), 1);
    }
}
