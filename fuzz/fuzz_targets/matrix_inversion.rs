#![no_main]

use dense_linalg::fuzzing::{ArbitraryMatrix, fuzz_test_matrix_inversion};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|matrix: ArbitraryMatrix| {
    fuzz_test_matrix_inversion(matrix);
});
