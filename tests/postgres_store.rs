//! `PgUserStore` against a live database.
//!
//! Skipped unless `TEST_DATABASE_URL` points at a PostgreSQL instance the
//! tests may create the `users` table in. Emails are unique per run.

use std::time::{SystemTime, UNIX_EPOCH};

use userpatch::model::{NewUser, UserColumn};
use userpatch::patch::{Optional, UpdateMapping};
use userpatch::pool::PgPool;
use userpatch::schema::ensure_schema;
use userpatch::store::{PgUserStore, StoreError, UserStore};

fn store() -> Option<PgUserStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url, 2).expect("test database is reachable");
    ensure_schema(&pool).expect("schema can be created");
    Some(PgUserStore::new(pool))
}

fn unique_email(local: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{local}+{nanos}@example.com")
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Test User".into(),
        email: email.to_string(),
        age: 30,
        phone: Some("1234567890".into()),
        active: true,
        bio: "Some bio".into(),
        role: "admin".into(),
        score: 80.0,
    }
}

#[test]
fn test_postgres_patch_round_trip() {
    let Some(store) = store() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let user = store.insert(&new_user(&unique_email("pg"))).unwrap();
    assert_eq!(store.find_by_id(user.id).unwrap(), user);

    let mut mapping = UpdateMapping::new();
    mapping.set_update(UserColumn::Phone, &Optional::<String>::Null);
    mapping.set_update(UserColumn::Score, &Optional::<f64>::Null);
    mapping.set_update(UserColumn::Name, &Optional::Value("Renamed".to_string()));
    assert_eq!(store.update_columns(user.id, &mapping).unwrap(), 1);

    let stored = store.find_by_id(user.id).unwrap();
    assert_eq!(stored.phone, None);
    assert_eq!(stored.score, 0.0);
    assert_eq!(stored.name, "Renamed");
    assert_eq!(stored.bio, user.bio);

    assert_eq!(store.update_columns(i64::MAX, &mapping).unwrap(), 0);
    assert!(matches!(
        store.find_by_id(i64::MAX),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_postgres_duplicate_email() {
    let Some(store) = store() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let email = unique_email("dup");
    store.insert(&new_user(&email)).unwrap();
    assert!(matches!(
        store.insert(&new_user(&email)),
        Err(StoreError::Conflict(_))
    ));
}
