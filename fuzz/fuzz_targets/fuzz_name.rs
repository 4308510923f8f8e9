#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        if let Ok(req) = charsheet_core::validate_name_request(&value) {
            let n = charsheet_core::name::name_len(req.name());
            assert!((1..=100).contains(&n));
            let again = charsheet_core::NameRequest::parse(req.name());
            assert_eq!(again.as_ref().map(|r| r.name()), Ok(req.name()));
        }
    }
});
