//! Change fragment fuzzer.
//!
//! Parses arbitrary trigger fragments. Whatever parses must be rebuilt by
//! the statement builders into a fragment that parses to the same row.

use honggfuzz::fuzz;
use sql_fragments::ChangeOp;
use sql_fragments::testing::test_change_fragment;

fn main() {
    loop {
        fuzz!(|input: (ChangeOp, bool, String)| {
            let (op, split_keys, sql) = input;
            test_change_fragment(op, &sql, split_keys);
        });
    }
}
