#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = xnz_config::load_toml(data) {
        if cfg.validate().is_ok() {
            let core = xnz_core::EngineCfg::from(&cfg);
            let _ = xnz_core::ZoneModel::recompute(&core.calibration).with_shares(&core.shares);
        }
    }
});
