//! Quoting round-trip fuzzer.
//!
//! Feeds arbitrary values through every quote/unquote pair: SQL literals,
//! identifiers, array literals and COPY fields.

use honggfuzz::fuzz;
use sql_fragments::testing::{
    test_array_roundtrip, test_copy_roundtrip, test_ident_roundtrip, test_literal_roundtrip,
};

fn main() {
    loop {
        fuzz!(|input: (Option<String>, Vec<Option<String>>)| {
            let (value, items) = input;
            test_literal_roundtrip(value.as_deref());
            test_copy_roundtrip(value.as_deref());
            if let Some(name) = &value {
                test_ident_roundtrip(name);
            }
            test_array_roundtrip(&items);
        });
    }
}
