#![no_main]

use dense_linalg::fuzzing::{ArbitraryProductOperands, fuzz_test_transposed_products};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|operands: ArbitraryProductOperands| {
    fuzz_test_transposed_products(operands);
});
