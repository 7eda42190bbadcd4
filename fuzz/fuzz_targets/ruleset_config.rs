#![no_main]

use caseguard_core::compliance::RuleSetConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Try to parse arbitrary strings as rule-set YAML
    // This should never panic, only return errors
    let _ = RuleSetConfig::from_yaml(data);
});
