#![no_main]

use libfuzzer_sys::fuzz_target;
use phpsbom_composer::{ComposerDocument, Lockfile};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = Lockfile::from_json(content, "fuzz/composer.lock");
    }
});
