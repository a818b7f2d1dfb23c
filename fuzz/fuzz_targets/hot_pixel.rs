#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = snapround::snap_round::arbtests::segment_meets_endpoint_pixels(&mut Unstructured::new(
        data,
    ));
});
