#![allow(dead_code)]

use chrono::Utc;
use clients_api::db::{DbPool, establish_connection_pool};
use clients_api::schema::clients;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use serde_json::Value;
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    pool: DbPool,
    // Dropped after the pool so open connections never outlive the file.
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("build pool");

        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn insert_client(
        &self,
        id: i32,
        parent: Option<i32>,
        description: Value,
        tags: Option<Value>,
        deleted: bool,
    ) {
        let mut conn = self.pool.get().expect("get connection");
        diesel::insert_into(clients::table)
            .values((
                clients::id_client.eq(id),
                clients::id_parent.eq(parent),
                clients::description.eq(description.to_string()),
                clients::tags.eq(tags.map(|t| t.to_string())),
                clients::date_deleted.eq(deleted.then(|| Utc::now().naive_utc())),
            ))
            .execute(&mut conn)
            .expect("insert client");
    }

    pub fn set_parent(&self, id: i32, parent: Option<i32>) {
        let mut conn = self.pool.get().expect("get connection");
        diesel::update(clients::table.find(id))
            .set(clients::id_parent.eq(parent))
            .execute(&mut conn)
            .expect("update parent");
    }
}
