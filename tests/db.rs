mod common;

#[test]
fn test_creates_migrated_db_file() {
    let test_db = common::TestDb::new("test_creates_migrated_db_file.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_statements_are_observed() {
    use diesel::prelude::*;
    use member_search::schema::members;

    let test_db = common::TestDb::new("test_statements_are_observed.db");
    let mut conn = test_db.pool().get().expect("connection");

    let total: i64 = members::table
        .count()
        .get_result(&mut conn)
        .expect("count");

    assert_eq!(total, 0);
    assert_eq!(test_db.count_statements(), 1);
}
