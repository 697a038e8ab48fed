#![no_main]

use libfuzzer_sys::fuzz_target;
use phpsbom_composer::{ComposerDocument, Lockfile, Manifest, build_workspace};

// 입력 앞부분은 manifest, NUL 뒤는 lockfile
fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let (manifest_src, lock_src) = content.split_once('\0').unwrap_or((content, ""));

    let Ok(manifest) = Manifest::from_json(manifest_src, "fuzz/composer.json") else {
        return;
    };
    let lockfile = Lockfile::from_json(lock_src, "fuzz/composer.lock").ok();
    let workspace = build_workspace(&manifest, lockfile.as_ref());

    for versions in workspace.dependencies.values().flat_map(|v| v.values()) {
        assert!(versions.dev ^ versions.prod);
        assert!(versions.direct ^ versions.transitive);
    }
    serde_json::to_string(&workspace).expect("workspace should serialize");
});
