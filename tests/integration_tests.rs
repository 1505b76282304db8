use anyhow::Result;
use rusqlite::Connection;
use sqlparser::ast::Statement as SqlStatement;
use sqlparser::dialect::{Dialect as SqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

use vipddl::ddl_generator::{DdlGenerator, TypeMapRegistry};
use vipddl::ddl_sink::{apply_schema, PostgresSink, SqliteSink};
use vipddl::schema_model::SchemaDocument;
use vipddl::types::{Dialect, StatementKind};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/vip_sample.json")
}

fn load_fixture() -> SchemaDocument {
    SchemaDocument::from_path(fixture_path()).expect("fixture should load")
}

fn sql_dialect(dialect: Dialect) -> Box<dyn SqlDialect> {
    match dialect {
        Dialect::Sqlite3 => Box::new(SQLiteDialect {}),
        Dialect::MySql => Box::new(MySqlDialect {}),
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
    }
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("SELECT name FROM pragma_table_info('{}')", table))
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn test_create_table_statements_parse_in_each_dialect() {
    let registry = TypeMapRegistry::builtin().unwrap();
    let schema = load_fixture();

    for dialect in Dialect::ALL {
        let generator = DdlGenerator::new(dialect, &registry).unwrap();
        let statements = generator.generate_all(&schema).unwrap();
        let sql_dialect = sql_dialect(dialect);

        for statement in statements.iter().filter(|s| s.kind == StatementKind::CreateTable) {
            let parsed = Parser::parse_sql(sql_dialect.as_ref(), &statement.sql)
                .unwrap_or_else(|e| panic!("{} did not parse as {}: {}", statement.sql, dialect, e));
            assert_eq!(parsed.len(), 1);
            match &parsed[0] {
                SqlStatement::CreateTable { name, columns, .. } => {
                    assert_eq!(name.to_string(), statement.object);
                    assert_eq!(columns.first().map(|c| c.name.value.as_str()), Some("id"));
                    assert_eq!(columns.last().map(|c| c.name.value.as_str()), Some("date_created"));
                }
                other => panic!("expected CREATE TABLE, got {:?}", other),
            }
        }
    }
}

#[test]
fn test_fixture_statement_sequence_is_reproducible() {
    let registry = TypeMapRegistry::builtin().unwrap();

    for dialect in Dialect::ALL {
        let first = DdlGenerator::new(dialect, &registry)
            .unwrap()
            .generate_all(&load_fixture())
            .unwrap();
        let second = DdlGenerator::new(dialect, &registry)
            .unwrap()
            .generate_all(&load_fixture())
            .unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_postgres_enum_types_come_first() {
    let registry = TypeMapRegistry::builtin().unwrap();
    let statements = DdlGenerator::new(Dialect::Postgres, &registry)
        .unwrap()
        .generate_all(&load_fixture())
        .unwrap();

    assert_eq!(statements.len(), 8);
    assert_eq!(statements[0].sql, "CREATE TYPE yesNoEnum AS ENUM('no','yes');");
    assert_eq!(
        statements[1].sql,
        "CREATE TYPE electionTypeEnum AS ENUM('general','primary','run-off','special');"
    );
    assert!(statements[2..].iter().all(|s| s.kind == StatementKind::CreateTable));
}

#[tokio::test]
async fn test_fixture_into_sqlite_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("vip.db");
    let registry = TypeMapRegistry::builtin()?;
    let generator = DdlGenerator::new(Dialect::Sqlite3, &registry)?;

    let mut sink = SqliteSink::open(db_path.to_str().unwrap())?;
    let summary = apply_schema(&generator, &load_fixture(), &mut sink).await?;
    drop(sink);

    assert_eq!(summary.enum_types, 0);
    assert_eq!(summary.tables, 6);

    // reopen to check the tables were committed
    let conn = Connection::open(&db_path)?;
    assert_eq!(
        column_names(&conn, "contest"),
        vec![
            "id",
            "normalized_id",
            "received_id",
            "vip_id",
            "election_id",
            "office_id",
            "number_elected",
            "partisan",
            "is_used",
            "last_updated",
            "date_created",
        ]
    );
    assert_eq!(
        column_names(&conn, "Office"),
        vec!["id", "vip_id", "election_id", "title", "last_updated", "date_created"]
    );
    assert!(!column_names(&conn, "polling_location").contains(&"None".to_string()));
    Ok(())
}

#[test]
fn test_cli_generate_writes_script() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("schema.sql");

    let status = Command::new(env!("CARGO_BIN_EXE_vipddl"))
        .args(["generate", "-s"])
        .arg(fixture_path())
        .args(["-d", "mysql", "-o"])
        .arg(&output)
        .status()?;
    assert!(status.success());

    let script = std::fs::read_to_string(&output)?;
    let mut lines = script.lines();
    assert!(lines.next().unwrap().starts_with("-- Generated by vipddl"));
    let statements: Vec<&str> = lines.collect();
    assert_eq!(statements.len(), 6);
    assert!(statements.iter().all(|s| s.starts_with("CREATE TABLE ")));
    assert!(script.contains("statewide ENUM('no','yes')"));
    Ok(())
}

#[test]
fn test_cli_create_sqlite() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("cli.db");

    let status = Command::new(env!("CARGO_BIN_EXE_vipddl"))
        .args(["create", "-s"])
        .arg(fixture_path())
        .args(["-d", "sqlite3", "--host"])
        .arg(&db_path)
        .status()?;
    assert!(status.success());

    let conn = Connection::open(&db_path)?;
    let tables: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(tables, 6);
    Ok(())
}

#[test]
fn test_cli_rejects_unknown_dialect() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_vipddl"))
        .args(["generate", "-s"])
        .arg(fixture_path())
        .args(["-d", "oracle"])
        .output()?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("oracle"));
    Ok(())
}

#[test]
fn test_cli_reports_schema_errors() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let schema_path = temp_dir.path().join("broken.json");
    std::fs::write(
        &schema_path,
        r#"{"elements": [{"name": "candidate", "fields": [{"name": "party", "type": "partyType"}]}]}"#,
    )?;

    let output = Command::new(env!("CARGO_BIN_EXE_vipddl"))
        .args(["generate", "-s"])
        .arg(&schema_path)
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("candidate"));
    assert!(stderr.contains("partyType"));
    Ok(())
}

/// Runs against a real server when TEST_DATABASE_URL is set
#[tokio::test]
async fn test_fixture_into_postgres() -> Result<()> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL test");
        return Ok(());
    };

    let mut sink = PostgresSink::connect_url(&url).await?;
    let schema_name = format!("vipddl_{}", uuid::Uuid::new_v4().simple());
    sink.client()
        .batch_execute(&format!("CREATE SCHEMA {0}; SET search_path TO {0};", schema_name))
        .await?;

    let registry = TypeMapRegistry::builtin()?;
    let generator = DdlGenerator::new(Dialect::Postgres, &registry)?;
    let result = apply_schema(&generator, &load_fixture(), &mut sink).await;

    let rows = sink
        .client()
        .query(
            "SELECT column_name FROM information_schema.columns \
             WHERE table_schema = $1 AND table_name = 'election' ORDER BY ordinal_position",
            &[&schema_name],
        )
        .await?;
    sink.client()
        .batch_execute(&format!("DROP SCHEMA {} CASCADE;", schema_name))
        .await?;

    let summary = result?;
    assert_eq!(summary.enum_types, 2);
    assert_eq!(summary.tables, 6);

    let columns: Vec<String> = rows.iter().map(|r| r.get(0)).collect();
    assert_eq!(columns[..5], ["id", "normalized_id", "received_id", "vip_id", "election_id"]);
    assert!(columns.contains(&"statewide".to_string()));
    Ok(())
}
