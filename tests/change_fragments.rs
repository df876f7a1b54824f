//! Integration tests for reconstructing rows from change-capture fragments.

use sql_fragments::builders::{delete_sql, insert_sql, update_sql};
use sql_fragments::{ChangeOp, ChangeRow, Error, ParsedFragment, parse_change_fragment};

fn row(entries: &[(&str, Option<&str>)]) -> ChangeRow {
    entries
        .iter()
        .map(|(column, value)| ((*column).to_string(), value.map(str::to_string)))
        .collect()
}

fn merged(op: char, sql: &str) -> Result<ChangeRow, Error> {
    match parse_change_fragment(op.try_into()?, sql, false)? {
        ParsedFragment::Merged(row) => Ok(row),
        ParsedFragment::Split { .. } => panic!("split result without split_keys"),
    }
}

// =============================================================================
// Trigger fragments
// =============================================================================

#[test]
fn test_insert_event() {
    let parsed = merged('I', "(id, data) values (1, null)").unwrap();
    assert_eq!(parsed, row(&[("id", Some("1")), ("data", None)]));
}

#[test]
fn test_update_event() {
    let parsed = merged('U', "data='foo' where id = 1").unwrap();
    assert_eq!(parsed, row(&[("data", Some("foo")), ("id", Some("1"))]));
    let columns: Vec<&str> = parsed.keys().map(String::as_str).collect();
    assert_eq!(columns, ["data", "id"]);
}

#[test]
fn test_delete_event() {
    let parsed = merged('D', "id = 1 and id2 = 'str''val'").unwrap();
    assert_eq!(parsed, row(&[("id", Some("1")), ("id2", Some("str'val"))]));
}

#[test]
fn test_split_keys() {
    let parsed = parse_change_fragment(ChangeOp::Update, "data='foo',type=3 where id = 1", true);
    assert_eq!(
        parsed,
        Ok(ParsedFragment::Split {
            keys: row(&[("id", Some("1"))]),
            data: row(&[("data", Some("foo")), ("type", Some("3"))]),
        })
    );
    let parsed = parse_change_fragment(ChangeOp::Insert, "(id, data) values (1, null)", true);
    assert_eq!(
        parsed,
        Ok(ParsedFragment::Split {
            keys: ChangeRow::default(),
            data: row(&[("id", Some("1")), ("data", None)]),
        })
    );
}

#[test]
fn test_rejected_fragments() {
    assert_eq!(
        merged('J', "(id, data) values (1, null)"),
        Err(Error::UnknownOperation('J'))
    );
    for (op, sql) in [
        ('I', "(id) values (1, null)"),
        ('I', "(id, data) values (1, null) ;"),
        ('U', "data='foo' where id=1 or true"),
        ('U', "data='foo' where id is null"),
        ('U', "data = now() where id = 1"),
        ('D', "foo = 1 ,"),
    ] {
        assert!(
            matches!(merged(op, sql), Err(Error::Syntax { .. })),
            "{op} {sql:?} was accepted"
        );
    }
    assert!(matches!(
        merged('U', "data = 'x'"),
        Err(Error::UnexpectedEnd { .. })
    ));
}

// =============================================================================
// Builder round trips
// =============================================================================

fn fragment<'a>(statement: &'a str, prefix: &str) -> &'a str {
    statement
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(';'))
        .unwrap()
}

fn awkward_row() -> ChangeRow {
    row(&[
        ("id", Some("42")),
        ("Mixed Case", Some("it's")),
        ("select", Some("C:\\temp\\")),
        ("we\"ird", None),
        ("note", Some("line\nbreak\ttab")),
        ("empty", Some("")),
        ("nul", Some("null")),
    ])
}

#[test]
fn test_insert_roundtrip() {
    let original = awkward_row();
    let statement = insert_sql(&original, "app.events");
    let parsed = merged('I', fragment(&statement, "insert into app.events ")).unwrap();
    assert_eq!(parsed, original);
    assert!(parsed.keys().eq(original.keys()));
}

#[test]
fn test_update_roundtrip() {
    let original = awkward_row();
    let statement = update_sql(&original, "events", &["id"]).unwrap();
    let parsed = parse_change_fragment(
        ChangeOp::Update,
        fragment(&statement, "update only public.events set "),
        true,
    )
    .unwrap();
    let ParsedFragment::Split { keys, data } = parsed else {
        panic!("expected split result");
    };
    assert_eq!(keys, row(&[("id", Some("42"))]));
    let mut expected = original.clone();
    expected.shift_remove("id");
    assert_eq!(data, expected);
}

#[test]
fn test_delete_roundtrip() {
    let original = awkward_row();
    let keys = ["id", "Mixed Case"];
    let statement = delete_sql(&original, "events", &keys).unwrap();
    let parsed = merged('D', fragment(&statement, "delete from only public.events where ")).unwrap();
    assert_eq!(
        parsed,
        row(&[("id", Some("42")), ("Mixed Case", Some("it's"))])
    );
}
