//! Integration tests for splitting SQL scripts into statements.

use sql_fragments::{Error, split_statements};

fn split(sql: &str) -> Result<Vec<&str>, Error> {
    split_statements(sql, false).collect()
}

#[test]
fn test_transaction_script() {
    assert_eq!(
        split("begin; select 1; select 'foo'; end;").unwrap(),
        ["begin;", "select 1;", "select 'foo';", "end;"]
    );
}

#[test]
fn test_semicolons_inside_parentheses() {
    assert_eq!(
        split("select (select 2+(select 3;);) ; select 4;").unwrap(),
        ["select (select 2+(select 3;);) ;", "select 4;"]
    );
}

#[test]
fn test_function_definition_script() {
    let sql = "
        -- install
        create or replace function bump(i int) returns int as $$
        begin
            return i + 1; -- inside the body
        end;
        $$ language plpgsql;

        /* grant; */
        grant execute on function bump(int) to public;
    ";
    let statements = split(sql).unwrap();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].starts_with("create or replace function"));
    assert!(statements[0].ends_with("$$ language plpgsql;"));
    assert_eq!(
        statements[1],
        "grant execute on function bump(int) to public;"
    );
}

#[test]
fn test_statements_are_slices_of_the_input() {
    let sql = "  a;\n\n b ;c";
    let statements = split(sql).unwrap();
    assert_eq!(statements, ["a;", "b ;", "c"]);
    for statement in statements {
        let offset = statement.as_ptr() as usize - sql.as_ptr() as usize;
        assert_eq!(&sql[offset..offset + statement.len()], statement);
    }
}

#[test]
fn test_backslash_strings_depend_on_quoting_mode() {
    let sql = r"select 'C:\'; select 'D:\';";
    assert_eq!(split(sql).unwrap(), [sql]);
    let standard: Result<Vec<&str>, Error> = split_statements(sql, true).collect();
    assert_eq!(standard.unwrap(), [r"select 'C:\';", r"select 'D:\';"]);
}

#[test]
fn test_unbalanced_parenthesis() {
    assert_eq!(
        split("select ());"),
        Err(Error::UnbalancedParenthesis { depth: -1 })
    );
    assert_eq!(
        split("select (1;"),
        Err(Error::UnbalancedParenthesis { depth: 1 })
    );
}

#[test]
fn test_copy_from_stdin_is_rejected() {
    assert!(matches!(
        split("copy from stdin;"),
        Err(Error::UnsupportedConstruct(_))
    ));
    assert!(matches!(
        split("select 1; Copy users (id, name) From   StdIn;\n1\tbob\n\\.\n"),
        Err(Error::UnsupportedConstruct(_))
    ));
}

#[test]
fn test_iteration_stops_after_error() {
    let mut statements = split_statements("select 1; copy t from stdin; select 2;", false);
    assert_eq!(statements.next(), Some(Ok("select 1;")));
    assert!(matches!(
        statements.next(),
        Some(Err(Error::UnsupportedConstruct(_)))
    ));
    assert_eq!(statements.next(), None);
    assert_eq!(statements.next(), None);
}
