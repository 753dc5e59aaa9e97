#![no_main]
use libfuzzer_sys::fuzz_target;
use local_crontab::{Converter, ShiftPolicy};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let converter = Converter::default().with_year(2024);
        if let Ok(utc) = converter.convert(s, "America/New_York") {
            assert!(!utc.is_empty(), "conversion produced no expressions");
        }
        let _ = converter
            .with_policy(ShiftPolicy::Wrap)
            .convert(s, "Asia/Kathmandu");
    }
});
