#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = snapround::snap_round::arbtests::snap_round_is_noded(&mut Unstructured::new(data));
});
