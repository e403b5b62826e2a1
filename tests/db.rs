use diesel::connection::SimpleConnection;

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let base = "test_fishmarket_db_files.db";

    {
        let test_db = common::TestDb::new(base);
        let mut conn = test_db.pool().get().unwrap();
        conn.batch_execute("SELECT id FROM orders LIMIT 1; SELECT id FROM products LIMIT 1;")
            .expect("migrations create the market tables");
    }

    let db_path = std::path::Path::new(base);
    assert!(!db_path.exists());
    assert!(!std::path::Path::new(&format!("{base}-shm")).exists());
    assert!(!std::path::Path::new(&format!("{base}-wal")).exists());
}
