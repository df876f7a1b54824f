//! Scanner fuzzer.
//!
//! Tokenizes arbitrary text under arbitrary options and checks that the
//! tokens are non-empty, contiguous, deterministic and cover the input.

use honggfuzz::fuzz;
use sql_fragments::TokenizerOptions;
use sql_fragments::testing::test_tokenize;

fn main() {
    loop {
        fuzz!(|input: (TokenizerOptions, String)| {
            let (options, sql) = input;
            test_tokenize(&sql, options);
        });
    }
}
