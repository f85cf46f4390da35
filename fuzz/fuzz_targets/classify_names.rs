#![no_main]
use arrow_lens::classify::classify;
use arrow_lens::Field;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let fields = [Field::new("buffer", "u8", 0)];
        let _ = classify(name, &fields);
        assert!(!classify(name, &[]).is_known());
    }
});
