//! Statement splitter fuzzer.
//!
//! Checks that statements come out as ordered, non-overlapping slices
//! separated only by whitespace and comments, and that nothing follows an
//! error.

use honggfuzz::fuzz;
use sql_fragments::testing::test_split_statements;

fn main() {
    loop {
        fuzz!(|input: (bool, String)| {
            let (standard_quoting, sql) = input;
            test_split_statements(&sql, standard_quoting);
        });
    }
}
