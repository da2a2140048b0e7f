#![no_main]
use libfuzzer_sys::fuzz_target;
use xnz_core::curves::{self, CurveVariant};
use xnz_core::ZoneModel;

fuzz_target!(|input: (f32, f32)| {
    let zones = ZoneModel::default();
    let (a, b) = if input.0 <= input.1 { input } else { (input.1, input.0) };
    for variant in CurveVariant::ALL {
        let ya = curves::map(a, &zones, variant);
        let yb = curves::map(b, &zones, variant);
        assert!((-1.0..=1.0).contains(&ya), "{variant:?} {a} -> {ya}");
        if a.is_finite() && b.is_finite() {
            assert!(ya <= yb, "{variant:?} {a} -> {ya}, {b} -> {yb}");
        }
    }
});
