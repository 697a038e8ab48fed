#![no_main]

use libfuzzer_sys::fuzz_target;
use phpsbom_composer::{ComposerDocument, Manifest, detect_framework};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(manifest) = Manifest::from_json(content, "fuzz/composer.json") {
            let _ = detect_framework(&manifest);
            let _ = manifest.license.normalize();
        }
    }
});
