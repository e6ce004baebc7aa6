//! Integration tests for query validation.
//!
//! These tests verify that the read-only gate rejects write and
//! administrative statements and lets read-only statements through.

use mysql_mcp_server::error::DbError;
use mysql_mcp_server::tools::row_limit::apply_row_limit;
use mysql_mcp_server::tools::sql_validator::{DenyReason, Verdict, classify, validate_readonly};

fn assert_denied(sql: &str) {
    let result = validate_readonly(sql);
    assert!(result.is_err(), "{} should be rejected", sql);
    let err = result.unwrap_err();
    assert!(
        matches!(err, DbError::QueryDenied { .. }),
        "Should be QueryDenied error, got: {:?}",
        err
    );
}

fn assert_allowed(sql: &str) {
    assert!(
        validate_readonly(sql).is_ok(),
        "{} should be allowed, got: {:?}",
        sql,
        classify(sql)
    );
}

/// Test that INSERT is rejected.
#[test]
fn test_query_rejects_insert() {
    assert_denied("INSERT INTO users (name) VALUES ('test')");
}

/// Test that UPDATE is rejected.
#[test]
fn test_query_rejects_update() {
    assert_denied("UPDATE users SET name = 'changed' WHERE id = 1");
}

/// Test that DELETE is rejected.
#[test]
fn test_query_rejects_delete() {
    assert_denied("DELETE FROM users WHERE id = 1");
}

/// Test that DDL is rejected.
#[test]
fn test_query_rejects_ddl() {
    assert_denied("CREATE TABLE test (id INT PRIMARY KEY)");
    assert_denied("DROP TABLE users");
    assert_denied("ALTER TABLE users ADD COLUMN age INT");
    assert_denied("TRUNCATE TABLE users");
}

/// Test that administrative statements are rejected.
#[test]
fn test_query_rejects_admin_statements() {
    for sql in [
        "GRANT SELECT ON shop.* TO 'bob'@'%'",
        "REVOKE ALL ON *.* FROM 'bob'@'%'",
        "FLUSH PRIVILEGES",
        "KILL 42",
        "SHUTDOWN",
        "SET GLOBAL read_only = 0",
        "CALL cleanup()",
        "LOAD DATA INFILE '/tmp/x' INTO TABLE t",
        "LOCK TABLES users WRITE",
        "UNLOCK TABLES",
    ] {
        assert_denied(sql);
    }
}

/// Test that read-only statements are allowed.
#[test]
fn test_query_allows_read_only() {
    for sql in [
        "SELECT * FROM users",
        "select id, email from users where id = 1",
        "SHOW TABLES",
        "SHOW COLUMNS FROM users",
        "DESCRIBE users",
        "DESC users",
        "EXPLAIN SELECT * FROM users",
        "WITH recent AS (SELECT * FROM orders) SELECT COUNT(*) FROM recent",
    ] {
        assert_allowed(sql);
    }
}

/// A write statement hidden after a read-only one is still caught.
#[test]
fn test_query_rejects_piggybacked_write() {
    assert_eq!(
        classify("SELECT * FROM users; DELETE FROM users"),
        Verdict::Denied(DenyReason::ForbiddenKeyword("delete"))
    );
    assert_eq!(
        classify("WITH t AS (SELECT 1) SELECT * FROM t;\nDROP TABLE users"),
        Verdict::Denied(DenyReason::ForbiddenKeyword("drop"))
    );
}

/// Keywords spelled with mixed case and irregular whitespace are normalized.
#[test]
fn test_query_normalizes_case_and_whitespace() {
    assert_allowed("\t\n  SeLeCt\n*\tFROM   users  ");
    assert_denied("SELECT 1 ;  \n  dRoP\tTABLE users");
}

/// Identifiers that merely contain a keyword are not mistaken for it.
#[test]
fn test_query_allows_keyword_substrings() {
    assert_allowed("SELECT updated_at, created_at, deleted_flag FROM users");
    assert_allowed("SELECT * FROM dataset WHERE offset_id > 0");
    assert_allowed("SELECT doc, setting, locked FROM configs");
}

/// Function-call syntax counts as a bounded keyword.
#[test]
fn test_query_rejects_keyword_before_paren() {
    assert_denied("SELECT * FROM t WHERE a = 1 OR sleep(1) AND replace (a, 'b', 'c')");
    assert_denied("SELECT 1 UNION SELECT load(1)");
}

/// Empty or whitespace-only text is never allowed.
#[test]
fn test_query_rejects_empty() {
    assert_denied("");
    assert_denied(" \n\t ");
}

/// The classifier only checks tokens: these documented gaps stay as they are.
#[test]
fn test_query_documented_gaps() {
    // keyword glued to punctuation
    assert_allowed("SELECT 1;DROP TABLE users");
    assert_allowed("SELECT 1 /*x*/drop TABLE users");
    // keyword in a string literal surrounded by spaces
    assert_denied("SELECT * FROM notes WHERE body = 'do not update me'");
    // SHOW CREATE TABLE contains `create`
    assert_denied("SHOW CREATE TABLE users");
}

/// Gate and rewriter together: allowed SELECTs get a bounded limit.
#[test]
fn test_allowed_select_gets_limit() {
    let sql = "SELECT * FROM users";
    assert_allowed(sql);
    let rewritten = apply_row_limit(sql, 100);
    assert_eq!(rewritten, "SELECT * FROM users LIMIT 100");
    assert_allowed(&rewritten);
}
