#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ultradecode::{
    Decoder, DecoderOptions, ErrorKind, IntegerOverflow, PooledScratch, Value, ValueBuilder,
};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    unicode: bool,
    promote: bool,
    max_depth: Option<u8>,
    inline_capacity: u8,
    data: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    let options = DecoderOptions {
        decode_unicode_escapes: input.unicode,
        integer_overflow: if input.promote {
            IntegerOverflow::Promote
        } else {
            IntegerOverflow::Wrap
        },
        max_depth: Some(input.max_depth.map_or(64, usize::from)),
    };

    let mut reference = Decoder::with_options(ValueBuilder, options);
    let expected = reference.decode(input.data);

    // A tiny inline region forces every string through heap growth.
    let mut small = Decoder::with_small_scratch(
        ValueBuilder,
        PooledScratch::new(),
        options,
        usize::from(input.inline_capacity),
    );
    assert_eq!(small.decode(input.data), expected);
    assert_eq!(small.decode(input.data), expected);
    assert_eq!(small.last_kind(), reference.last_kind());

    match expected {
        Ok(Some(value)) => check_round_trip(&value, options),
        Ok(None) => {}
        Err(err) => {
            assert!(err.offset <= input.data.len(), "{err:?}");
            assert_ne!(err.kind, ErrorKind::NoValue);
        }
    }

    // Anything serde_json accepts must decode to a value here too.
    if let Ok(text) = std::str::from_utf8(input.data) {
        if serde_json::from_str::<serde_json::Value>(text).is_ok()
            && !text.contains('\0')
            && !text.contains("\\u")
        {
            let lifted = DecoderOptions {
                max_depth: None,
                ..options
            };
            let ours = Decoder::with_options(ValueBuilder, lifted).decode(input.data);
            assert!(matches!(ours, Ok(Some(_))), "{text:?} => {ours:?}");
        }
    }
});

// Doubles are not correctly rounded, so their text may drift by an ulp.
fn check_round_trip(value: &Value, options: DecoderOptions) {
    if contains_double(value) {
        return;
    }
    let text = value.to_string();
    let lifted = DecoderOptions {
        decode_unicode_escapes: true,
        max_depth: None,
        ..options
    };
    let again = Decoder::with_options(ValueBuilder, lifted)
        .decode(text.as_bytes())
        .unwrap()
        .unwrap();
    assert_eq!(&again, value);
}

fn contains_double(value: &Value) -> bool {
    match value {
        Value::Double(_) => true,
        Value::Array(items) => items.iter().any(contains_double),
        Value::Object(map) => map.values().any(contains_double),
        _ => false,
    }
}
