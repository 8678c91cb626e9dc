#![no_main]

use libfuzzer_sys::fuzz_target;
use oracle_cli::Scenario;

// Any scenario that parses must replay without panicking; every step either
// commits or is refused with a reason.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(scenario) = Scenario::from_toml_str(text) else {
        return;
    };
    if scenario.steps.len() > 64 {
        return;
    }
    if let Ok(report) = scenario.run() {
        assert_eq!(report.accepted + report.rejected, scenario.steps.len());
    }
});
