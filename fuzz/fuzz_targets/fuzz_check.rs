#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let report = charsheet_core::schema::check(&value, "fuzz.json");
        if let Ok(profile) = charsheet_core::validate_profile(&value) {
            assert!(report.pass);
            let _ = charsheet_core::render::to_markdown(&profile, &[]);
        }
    }
});
