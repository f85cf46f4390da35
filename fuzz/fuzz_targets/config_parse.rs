#![no_main]
use arrow_lens::InspectConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = InspectConfig::from_json_str(text) {
            assert!(config.max_pointer_depth >= 1);
        }
    }
});
