//! 프레임워크 분류 -- manifest → 레이블
//!
//! 순서가 있는 규칙 테이블에서 처음 일치하는 규칙의 레이블을 반환합니다.
//! 운영 의존성(`require`)만 봅니다.
//!
//! 1. 대표 프레임워크 패키지 (우선순위 순)
//! 2. 패키지 `type` 태그
//! 3. `symfony/` 네임스페이스 접두어
//! 4. 어디에도 없으면 [`GENERIC_PHP`]

use crate::parser::manifest::Manifest;

/// 알려진 프레임워크가 없을 때의 레이블
pub const GENERIC_PHP: &str = "Generic PHP";

/// 규칙이 manifest에서 확인하는 신호
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// `require`에 이 패키지가 있음
    Requires(&'static str),
    /// `type`이 목록 중 하나
    PackageType(&'static [&'static str]),
    /// `require`에 이 접두어로 시작하는 패키지가 있음
    NamespacePrefix(&'static str),
}

impl Signature {
    fn matches(&self, manifest: &Manifest) -> bool {
        match self {
            Self::Requires(package) => manifest.require.contains_key(*package),
            Self::PackageType(types) => types.contains(&manifest.package_type.as_str()),
            Self::NamespacePrefix(prefix) => {
                manifest.require.keys().any(|name| name.starts_with(prefix))
            }
        }
    }
}

/// (신호, 레이블) 규칙
#[derive(Debug, Clone, Copy)]
pub struct FrameworkRule {
    pub signature: Signature,
    pub label: &'static str,
}

const fn rule(signature: Signature, label: &'static str) -> FrameworkRule {
    FrameworkRule { signature, label }
}

/// 분류 규칙 테이블 (앞선 규칙이 우선)
pub const FRAMEWORK_RULES: &[FrameworkRule] = &[
    rule(Signature::Requires("cakephp/cakephp"), "CakePHP"),
    rule(Signature::Requires("laravel/framework"), "Laravel"),
    rule(Signature::Requires("symfony/framework-bundle"), "Symfony"),
    rule(Signature::Requires("johnpbloch/wordpress"), "WordPress"),
    rule(Signature::Requires("drupal/core"), "Drupal"),
    rule(Signature::Requires("laminas/laminas-mvc"), "Laminas"),
    rule(Signature::Requires("zendframework/zend-mvc"), "Zend Framework"),
    rule(Signature::Requires("slim/slim"), "Slim"),
    rule(Signature::Requires("codeigniter4/framework"), "CodeIgniter 4"),
    rule(Signature::Requires("yiisoft/yii2"), "Yii2"),
    rule(Signature::Requires("laravel/lumen-framework"), "Lumen"),
    rule(
        Signature::PackageType(&["wordpress-plugin", "wordpress-theme"]),
        "WordPress",
    ),
    rule(
        Signature::PackageType(&["drupal-module", "drupal-theme"]),
        "Drupal",
    ),
    rule(Signature::NamespacePrefix("symfony/"), "Symfony Components"),
];

/// manifest의 프레임워크 레이블을 반환합니다.
pub fn detect_framework(manifest: &Manifest) -> &'static str {
    FRAMEWORK_RULES
        .iter()
        .find(|rule| rule.signature.matches(manifest))
        .map_or(GENERIC_PHP, |rule| rule.label)
}
