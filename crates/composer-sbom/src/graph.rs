//! 의존성 그래프 구성 -- manifest + lockfile → 워크스페이스
//!
//! # lockfile이 있을 때
//!
//! - `packages`의 각 항목은 `prod=true`, `require`에 있으면 direct
//! - `packages-dev`의 각 항목은 `dev=true`, `require-dev`에 있으면 direct
//! - 같은 이름이 양쪽에 있으면 dev 항목이 prod 항목을 덮어씀 (경고 로그)
//!
//! # lockfile이 없을 때
//!
//! manifest의 두 맵에서 플랫폼 요구사항을 뺀 항목을 버전 키 `""`, `direct=true`로
//! 넣습니다. 충돌 규칙은 동일합니다.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use phpsbom_core::types::{
    Author, DependencyMap, Start, Statistics, Versions, WorkSpace, WorkSpaceDependency,
};

use crate::parser::is_platform_requirement;
use crate::parser::lockfile::{LockedPackage, Lockfile};
use crate::parser::manifest::Manifest;

const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Prod,
    Dev,
}

/// 워크스페이스 하나를 구성합니다.
pub fn build_workspace(manifest: &Manifest, lockfile: Option<&Lockfile>) -> WorkSpace {
    let dependencies = match lockfile {
        Some(lock) => resolved_dependencies(manifest, lock),
        None => declared_dependencies(manifest),
    };

    let start = Start {
        dependencies: start_entries(&manifest.require, &dependencies),
        dev_dependencies: start_entries(&manifest.require_dev, &dependencies),
    };

    WorkSpace {
        dependencies,
        start,
    }
}

fn resolved_dependencies(manifest: &Manifest, lock: &Lockfile) -> DependencyMap {
    let mut dependencies = DependencyMap::new();

    for (packages, scope) in [(&lock.packages, Scope::Prod), (&lock.packages_dev, Scope::Dev)] {
        let declared = match scope {
            Scope::Prod => &manifest.require,
            Scope::Dev => &manifest.require_dev,
        };

        for package in packages {
            if package.name.is_empty() {
                debug!(version = %package.version, "skipping locked package without a name");
                continue;
            }

            let direct = declared.contains_key(&package.name);
            let versions = locked_versions(package, scope, direct);
            insert_entry(&mut dependencies, &package.name, &package.version, versions);
        }
    }

    dependencies
}

fn locked_versions(package: &LockedPackage, scope: Scope, direct: bool) -> Versions {
    Versions {
        key: Versions::make_key(&package.name, &package.version),
        requires: package.require.clone(),
        dependencies: package.require.clone(),
        optional: false,
        bundled: false,
        dev: scope == Scope::Dev,
        prod: scope == Scope::Prod,
        direct,
        transitive: !direct,
        licenses: package.license.normalize(),
        php_version: package.php_constraint().to_owned(),
        package_type: package.package_type.clone(),
        authors: package.authors.iter().map(Author::from).collect(),
        description: package.description.clone(),
    }
}

fn declared_dependencies(manifest: &Manifest) -> DependencyMap {
    let mut dependencies = DependencyMap::new();

    for (declared, scope) in [(&manifest.require, Scope::Prod), (&manifest.require_dev, Scope::Dev)] {
        for name in declared.keys().filter(|name| !is_platform_requirement(name)) {
            let versions = Versions {
                key: Versions::make_key(name, ""),
                dev: scope == Scope::Dev,
                prod: scope == Scope::Prod,
                direct: true,
                transitive: false,
                ..Versions::default()
            };
            insert_entry(&mut dependencies, name, "", versions);
        }
    }

    dependencies
}

/// 이름당 버전 맵을 통째로 교체합니다 (나중 쓰기 우선).
///
/// 경고는 dev 항목이 prod 항목을 덮어쓸 때만 남기고, 같은 목록 안의 중복은 debug로 남깁니다.
fn insert_entry(dependencies: &mut DependencyMap, name: &str, version: &str, versions: Versions) {
    let is_dev = versions.dev;
    let mut entry = BTreeMap::new();
    entry.insert(version.to_owned(), versions);

    let Some(previous) = dependencies.insert(name.to_owned(), entry) else {
        return;
    };
    let previous_versions: Vec<_> = previous.keys().collect();

    if is_dev && previous.values().any(|v| v.prod) {
        warn!(
            package = name,
            previous = ?previous_versions,
            version,
            "package listed as both prod and dev, dev entry wins"
        );
    } else {
        debug!(
            package = name,
            previous = ?previous_versions,
            version,
            "duplicate package entry, later entry wins"
        );
    }
}

fn start_entries(
    declared: &BTreeMap<String, String>,
    dependencies: &DependencyMap,
) -> Vec<WorkSpaceDependency> {
    declared
        .iter()
        .filter(|(name, _)| !is_platform_requirement(name))
        .map(|(name, constraint)| WorkSpaceDependency {
            name: name.clone(),
            version: resolved_version(name, dependencies),
            constraint: constraint.clone(),
        })
        .collect()
}

/// 맵의 첫 번째 버전 (없으면 빈 문자열)
fn resolved_version(name: &str, dependencies: &DependencyMap) -> String {
    dependencies
        .get(name)
        .and_then(|versions| versions.keys().next())
        .cloned()
        .unwrap_or_default()
}

/// 워크스페이스의 의존성 통계를 계산합니다.
pub fn compute_statistics(workspace: &WorkSpace) -> Statistics {
    let mut stats = Statistics::default();
    let mut authors = BTreeSet::new();
    let mut licenses = BTreeSet::new();

    for versions in workspace.dependencies.values().flat_map(BTreeMap::values) {
        stats.total_packages += 1;
        if versions.direct {
            stats.direct_packages += 1;
        } else {
            stats.transitive_packages += 1;
        }
        if versions.dev {
            stats.dev_packages += 1;
        }

        authors.extend(
            versions
                .authors
                .iter()
                .filter(|a| !a.name.is_empty())
                .map(|a| a.name.as_str()),
        );

        if versions.licenses.is_empty() {
            *stats.license_breakdown.entry(UNKNOWN.to_owned()).or_default() += 1;
        }
        for license in &versions.licenses {
            licenses.insert(license.as_str());
            *stats.license_breakdown.entry(license.clone()).or_default() += 1;
        }

        let package_type = if versions.package_type.is_empty() {
            UNKNOWN
        } else {
            versions.package_type.as_str()
        };
        *stats.type_breakdown.entry(package_type.to_owned()).or_default() += 1;
    }

    stats.unique_authors = authors.len();
    stats.unique_licenses = licenses.len();
    stats
}
