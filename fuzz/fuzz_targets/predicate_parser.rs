#![no_main]

use libfuzzer_sys::fuzz_target;
use querystat::predicate::Predicate;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing, flattening and rendering must not panic on any input
        if let Ok(predicate) = Predicate::from_json_str(input) {
            let _ = predicate.leaves();
            let _ = predicate.to_string();
        }
    }
});
