#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing and validation may reject input but must never panic.
    if let Ok(cfg) = toml::from_str::<repcount_config::Config>(data) {
        if cfg.validate().is_ok() {
            // A valid config always names three resolvable joints.
            assert!(cfg.joints.resolve().is_ok());
        }
    }
});
