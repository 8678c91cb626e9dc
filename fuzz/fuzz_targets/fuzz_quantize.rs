#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use oracle_quantize::{ExtremeValuePolicy, Quantizer, QuantizerConfig};
use oracle_types::ValueKind;

#[derive(Debug, Arbitrary)]
struct Input {
    kind: u8,
    raw: f64,
    percent_scale: u32,
    price_decimals: u8,
    ratio_scale: u32,
    allow_extremes: bool,
}

// Quantization must never panic, and every accepted value must land inside
// the kind's integer range.
fuzz_target!(|input: Input| {
    let kind = match input.kind % 3 {
        0 => ValueKind::Percent,
        1 => ValueKind::Price,
        _ => ValueKind::Ratio,
    };
    let config = QuantizerConfig {
        percent_scale: input.percent_scale,
        price_decimals: input.price_decimals as u32,
        ratio_scale: input.ratio_scale,
        extremes: if input.allow_extremes {
            ExtremeValuePolicy::Allow
        } else {
            ExtremeValuePolicy::Reject
        },
    };
    let quantizer = Quantizer::new(config);

    if let Ok(q) = quantizer.quantize(kind, input.raw) {
        assert!(q >= 0, "{kind:?} {} quantized to {q}", input.raw);
        match kind {
            ValueKind::Percent => {
                let scale = quantizer.full_scale(kind);
                assert!(q <= scale);
                if !input.allow_extremes {
                    assert!(q != 0 && q != scale);
                }
            }
            ValueKind::Ratio => assert!(q <= quantizer.full_scale(kind)),
            ValueKind::Price => {}
        }
    }
});
