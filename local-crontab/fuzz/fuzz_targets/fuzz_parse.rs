#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse should never panic, only return Ok or Err
        if let Ok(fields) = local_crontab::CronFieldSet::parse(s) {
            let displayed = fields.to_string();
            let reparsed = local_crontab::CronFieldSet::parse(&displayed)
                .expect("display output must be parseable");
            assert_eq!(fields, reparsed, "display roundtrip changed the fields");
        }
    }
});
