#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use member_search::db::{ConnectionOptions, DbPool, QueryObserver, establish_connection_pool_with};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// A migrated SQLite database in a temporary directory, recording every
/// statement run through its pool.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
    statements: Arc<Mutex<Vec<String>>>,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        Self::build(filename, true)
    }

    /// Database file without the schema, for exercising store failures.
    pub fn unmigrated(filename: &str) -> Self {
        Self::build(filename, false)
    }

    fn build(filename: &str, migrate: bool) -> Self {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join(filename);

        let statements = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&statements);
        let observer: QueryObserver = Arc::new(move |sql: &str| {
            recorder
                .lock()
                .expect("statement log poisoned")
                .push(sql.to_string());
        });

        let options = ConnectionOptions {
            observer: Some(observer),
            ..ConnectionOptions::default()
        };
        let pool = establish_connection_pool_with(path.to_str().expect("utf-8 path"), options)
            .expect("connection pool");

        if migrate {
            let mut conn = pool.get().expect("connection");
            MigrationHarness::run_pending_migrations(&mut *conn, MIGRATIONS)
                .expect("migrations");
        }

        let test_db = Self {
            _dir: dir,
            pool,
            statements,
        };
        test_db.reset_statements();
        test_db
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn reset_statements(&self) {
        self.statements
            .lock()
            .expect("statement log poisoned")
            .clear();
    }

    /// Number of count statements run since the last reset. diesel renders
    /// plain counts as `COUNT(*)` and distinct counts as `count( DISTINCT ..)`.
    pub fn count_statements(&self) -> usize {
        self.statements
            .lock()
            .expect("statement log poisoned")
            .iter()
            .filter(|sql| is_count_statement(sql))
            .count()
    }
}

pub fn is_count_statement(sql: &str) -> bool {
    sql.trim_start()
        .to_ascii_uppercase()
        .starts_with("SELECT COUNT(")
}

#[test]
fn count_statements_match_in_any_case() {
    assert!(is_count_statement("SELECT COUNT(*) FROM `members`"));
    assert!(is_count_statement(
        "SELECT count( DISTINCT `members`.`id`) FROM (`members` LEFT OUTER JOIN `teams`)"
    ));
    assert!(!is_count_statement(
        "SELECT `members`.`id`, COUNT(*) OVER () FROM `members`"
    ));
}
