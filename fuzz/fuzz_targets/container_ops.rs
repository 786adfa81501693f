#![no_main]

use ferrous_locator::{Container, DiError};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

// A small id space makes aliases, redefinitions and cycles likely.
const IDS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn id(byte: u8) -> &'static str {
    IDS[byte as usize % IDS.len()]
}

fuzz_target!(|data: &[u8]| {
    let container = Container::new();

    for op in data.chunks(3) {
        if op.len() < 3 {
            break;
        }
        let (target, other, value) = (id(op[1]), id(op[2]), op[2] as u32);

        match op[0] % 9 {
            0 => {
                let _ = container.set_value(target, value);
            }
            1 => {
                let dep = other;
                let _ = container.try_set_factory(target, move |c| {
                    Ok(c.get::<u32>(dep).map(|v| *v).unwrap_or(0) + 1)
                });
            }
            2 => {
                container.alias(target, other);
            }
            3 => {
                let _ = container.extend::<u32, _>(target, |v, _| Some(Arc::new(v.wrapping_add(1))));
            }
            4 => {
                let cached = container.get::<u32>(target);
                let again = container.get::<u32>(target);
                if let (Ok(a), Ok(b)) = (&cached, &again) {
                    assert!(Arc::ptr_eq(a, b));
                }
            }
            5 => {
                let _ = container.get_new::<u32>(target);
            }
            6 => {
                let has = container.has(target);
                assert_eq!(has, container.raw(target).is_ok());
            }
            7 => {
                container.freeze();
                assert!(matches!(container.set_value(target, 0u32), Err(DiError::Frozen(_))));
            }
            _ => {
                let _ = container.descriptors();
            }
        }
    }
});
