//! 프로젝트 탐색 -- 한 번의 디렉토리 순회로 manifest, lockfile, PHAR 수집
//!
//! 순회는 파일 이름 사전순이라 결과가 결정적입니다. [`TraversalPolicy`]가 거부한
//! 디렉토리는 내려가지 않습니다. `vendor`와 `node_modules`는 설정과 무관하게 항상
//! 가지치기되고, 설정의 `pruned_dirs`는 여기에 더해집니다.
//!
//! # 루트 선택
//!
//! 분석 루트 기준 디렉토리 깊이가 가장 얕은 `composer.json`이 루트 manifest입니다.
//! 깊이가 같으면 순회 순서상 먼저 나온 것이 이깁니다. manifest가 둘 이상이면
//! 모노레포로 보고 나머지는 각각 [`Workspace`]가 됩니다.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::ComposerSbomConfig;
use crate::error::ComposerSbomError;
use crate::framework::detect_framework;
use crate::parser::lockfile::Lockfile;
use crate::parser::manifest::Manifest;
use crate::parser::{ComposerDocument, ComposerFileDetector, ComposerFileKind, LOCKFILE_NAME};

/// 의존성 설치 디렉토리
const VENDOR_DIR: &str = "vendor";

/// 설정과 무관하게 항상 가지치기하는 디렉토리
pub const ALWAYS_PRUNED_DIRS: &[&str] = &[VENDOR_DIR, "node_modules"];

/// 디렉토리 가지치기 정책
#[derive(Debug, Clone)]
pub struct TraversalPolicy {
    pruned_dirs: Vec<String>,
}

impl TraversalPolicy {
    /// [`ALWAYS_PRUNED_DIRS`]에 `extra_dirs`를 더한 정책 (중복 제거)
    pub fn new(extra_dirs: Vec<String>) -> Self {
        let mut pruned_dirs: Vec<String> =
            ALWAYS_PRUNED_DIRS.iter().map(|d| (*d).to_owned()).collect();
        for dir in extra_dirs {
            if !pruned_dirs.contains(&dir) {
                pruned_dirs.push(dir);
            }
        }
        Self { pruned_dirs }
    }

    /// 가지치기 대상 디렉토리 이름
    pub fn pruned_dirs(&self) -> &[String] {
        &self.pruned_dirs
    }

    /// 순회가 이 항목 아래로 내려가도 되는지 확인합니다.
    ///
    /// 순회 루트 자체는 이름과 무관하게 항상 허용합니다.
    pub fn should_descend(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !self.pruned_dirs.iter().any(|pruned| *pruned == name)
    }
}

/// 순회 결과
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// 발견된 composer.json (순회 순서)
    pub manifests: Vec<PathBuf>,
    /// 발견된 composer.lock (순회 순서)
    pub lockfiles: Vec<PathBuf>,
    /// 발견된 *.phar (순회 순서)
    pub phars: Vec<PathBuf>,
}

/// 루트 아래를 한 번 순회하며 Composer 관련 파일을 분류합니다.
///
/// 읽을 수 없는 항목은 경고 후 건너뜁니다.
pub fn discover(root: &Path, policy: &TraversalPolicy, detector: &ComposerFileDetector) -> Discovery {
    let mut discovery = Discovery::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| policy.should_descend(entry));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "failed to read directory entry, skipping");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match detector.classify(entry.path()) {
            Some(ComposerFileKind::Manifest) => discovery.manifests.push(entry.into_path()),
            Some(ComposerFileKind::Lockfile) => discovery.lockfiles.push(entry.into_path()),
            Some(ComposerFileKind::Phar) => {
                debug!(path = %entry.path().display(), "found phar archive");
                discovery.phars.push(entry.into_path());
            }
            None => {}
        }
    }

    debug!(
        root = %root.display(),
        manifests = discovery.manifests.len(),
        lockfiles = discovery.lockfiles.len(),
        phars = discovery.phars.len(),
        "composer file discovery finished"
    );

    discovery
}

/// 루트 기준 디렉토리 깊이 (`composer.json`은 0, `a/composer.json`은 1)
fn directory_depth(root: &Path, file: &Path) -> usize {
    file.strip_prefix(root)
        .map(|rel| rel.components().count().saturating_sub(1))
        .unwrap_or(usize::MAX)
}

/// 가장 얕은 manifest를 고릅니다. 깊이가 같으면 앞선 항목이 이깁니다.
pub fn find_root_manifest<'a>(root: &Path, manifests: &'a [PathBuf]) -> Option<&'a PathBuf> {
    // min_by_key는 동률에서 앞선 항목을 반환한다
    manifests.iter().min_by_key(|m| directory_depth(root, m))
}

/// manifest와 같은 디렉토리의 composer.lock을 찾습니다.
///
/// 경로를 그대로 비교한 뒤 절대 경로로 한 번 더 비교합니다.
pub fn find_matching_lockfile(manifest: &Path, lockfiles: &[PathBuf]) -> Option<PathBuf> {
    let expected = manifest
        .parent()
        .map(|dir| dir.join(LOCKFILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LOCKFILE_NAME));
    let expected_abs = std::path::absolute(&expected).ok();

    lockfiles
        .iter()
        .find(|lock| {
            lock.as_path() == expected
                || (expected_abs.is_some() && std::path::absolute(lock).ok() == expected_abs)
        })
        .cloned()
}

/// `base`에서 `target`까지의 상대 경로 (`/` 구분)
///
/// 두 경로는 같은 순회에서 나온 것이어야 합니다.
pub fn relative_path(base: &Path, target: &Path) -> String {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();
    let common = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let parts: Vec<String> = std::iter::repeat_n("..".to_owned(), base.len() - common)
        .chain(
            target[common..]
                .iter()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        )
        .collect();

    if parts.is_empty() {
        ".".to_owned()
    } else {
        parts.join("/")
    }
}

/// 모노레포의 보조 워크스페이스
#[derive(Debug, Clone)]
pub struct Workspace {
    /// 출력 워크스페이스 키 (루트 manifest 디렉토리 기준 manifest 상대 경로)
    pub key: String,
    /// manifest의 `name`
    pub name: String,
    pub manifest_path: PathBuf,
    pub lockfile_path: Option<PathBuf>,
    pub manifest: Manifest,
    /// 파싱에 실패하면 `None`
    pub lockfile: Option<Lockfile>,
}

/// 탐색 + 파싱이 끝난 프로젝트
#[derive(Debug)]
pub struct Project {
    /// 분석 루트
    pub root_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub lockfile_path: Option<PathBuf>,
    pub manifest: Manifest,
    pub lockfile: Option<Lockfile>,
    /// 루트 lockfile이 있었지만 파싱에 실패한 경우의 에러
    pub lockfile_error: Option<ComposerSbomError>,
    /// 루트 manifest로 감지한 프레임워크 레이블
    pub framework: &'static str,
    pub is_monorepo: bool,
    pub workspaces: Vec<Workspace>,
    pub phar_files: Vec<PathBuf>,
    /// 루트 manifest 디렉토리에 `vendor/`가 있는지
    pub has_vendor_directory: bool,
}

impl Project {
    /// 루트 manifest가 있는 디렉토리
    pub fn manifest_dir(&self) -> &Path {
        self.manifest_path.parent().unwrap_or(self.root_dir.as_path())
    }
}

/// 프로젝트 탐색기
pub struct ProjectLocator {
    policy: TraversalPolicy,
    detector: ComposerFileDetector,
    max_file_size: usize,
    scan_phar: bool,
}

impl ProjectLocator {
    pub fn new(config: &ComposerSbomConfig) -> Self {
        Self {
            policy: TraversalPolicy::new(config.pruned_dirs.clone()),
            detector: ComposerFileDetector::new(),
            max_file_size: config.max_file_size,
            scan_phar: config.scan_phar,
        }
    }

    /// 루트 디렉토리에서 프로젝트를 찾고 파싱합니다.
    ///
    /// # Errors
    ///
    /// - `SourceDirectoryMissing`: 루트가 디렉토리가 아님
    /// - `NoManifestFound`: 가지치기 후 composer.json 없음
    /// - `MalformedManifest`: 루트 composer.json 파싱 실패
    ///
    /// 보조 워크스페이스와 루트 lockfile의 파싱 실패는 에러가 아닙니다.
    pub fn locate(&self, root: &Path) -> Result<Project, ComposerSbomError> {
        if !root.is_dir() {
            return Err(ComposerSbomError::SourceDirectoryMissing {
                path: root.display().to_string(),
            });
        }

        let discovery = discover(root, &self.policy, &self.detector);

        let manifest_path = find_root_manifest(root, &discovery.manifests)
            .cloned()
            .ok_or_else(|| ComposerSbomError::NoManifestFound {
                path: root.display().to_string(),
            })?;

        let manifest = Manifest::from_file(&manifest_path, self.max_file_size)?;
        let lockfile_path = find_matching_lockfile(&manifest_path, &discovery.lockfiles);

        let (lockfile, lockfile_error) = match &lockfile_path {
            Some(path) => match Lockfile::from_file(path, self.max_file_size) {
                Ok(lock) => {
                    debug!(path = %path.display(), packages = lock.package_count(), "parsed root lockfile");
                    (Some(lock), None)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "root lockfile is malformed, continuing without it");
                    (None, Some(e))
                }
            },
            None => {
                warn!(
                    manifest = %manifest_path.display(),
                    "no composer.lock found, analysis will be based on composer.json only"
                );
                (None, None)
            }
        };

        let is_monorepo = discovery.manifests.len() > 1;
        let workspaces = if is_monorepo {
            self.collect_workspaces(&manifest_path, &discovery)
        } else {
            Vec::new()
        };

        let manifest_dir = manifest_path.parent().unwrap_or(root);
        let has_vendor_directory = manifest_dir.join(VENDOR_DIR).is_dir();
        let framework = detect_framework(&manifest);

        let phar_files = if self.scan_phar {
            discovery.phars
        } else {
            Vec::new()
        };

        info!(
            manifest = %manifest_path.display(),
            lockfile = lockfile.is_some(),
            framework,
            workspaces = workspaces.len(),
            "located composer project"
        );

        Ok(Project {
            root_dir: root.to_path_buf(),
            manifest_path,
            lockfile_path,
            manifest,
            lockfile,
            lockfile_error,
            framework,
            is_monorepo,
            workspaces,
            phar_files,
            has_vendor_directory,
        })
    }

    fn collect_workspaces(&self, root_manifest: &Path, discovery: &Discovery) -> Vec<Workspace> {
        let root_manifest_dir = root_manifest.parent().unwrap_or(Path::new(""));

        discovery
            .manifests
            .iter()
            .filter(|path| path.as_path() != root_manifest)
            .filter_map(|path| {
                let manifest = match Manifest::from_file(path, self.max_file_size) {
                    Ok(m) => m,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping workspace with malformed manifest");
                        return None;
                    }
                };

                let lockfile_path = find_matching_lockfile(path, &discovery.lockfiles);
                let lockfile = lockfile_path.as_ref().and_then(|lock_path| {
                    Lockfile::from_file(lock_path, self.max_file_size)
                        .inspect_err(|e| {
                            warn!(path = %lock_path.display(), error = %e, "workspace lockfile is malformed, ignoring");
                        })
                        .ok()
                });

                Some(Workspace {
                    key: relative_path(root_manifest_dir, path),
                    name: manifest.name.clone(),
                    manifest_path: path.clone(),
                    lockfile_path,
                    manifest,
                    lockfile,
                })
            })
            .collect()
    }
}
