//! Runs the repository contract against a real PostgreSQL database.
//!
//! Skipped unless `TEST_DATABASE_URL` points at a disposable database; the
//! `songs` table in it is emptied first.

use songs_service::db::Database;
use songs_service::error::StoreError;
use songs_service::models::song::{SongCreate, SongUpdate};
use songs_service::repository::SongRepository;
use sqlx::postgres::PgPoolOptions;

fn new_song(name: &str) -> SongCreate {
    SongCreate {
        name: name.to_string(),
        path: format!("/music/{name}.mp3"),
        plays: 0,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn postgres_repository_contract() {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let pool = PgPoolOptions::new().max_connections(8).connect(&url).await.unwrap();
    let db = Database::from_pool(pool);
    db.ensure_schema().await.unwrap();
    sqlx::query("TRUNCATE songs").execute(db.pool()).await.unwrap();

    let joy = db.create(&new_song("Ode to Joy")).await.unwrap();
    let blue = db.create(&new_song("Blue")).await.unwrap();
    let mercury = db.create(&new_song("Ode to 100%")).await.unwrap();
    assert!(joy.id < blue.id && blue.id < mercury.id);
    assert_eq!(joy.plays, 0);

    assert_eq!(db.get_by_id(blue.id).await.unwrap(), Some(blue.clone()));
    assert_eq!(db.count().await.unwrap(), 3);

    let all = db.list(0, 3).await.unwrap();
    assert_eq!(all, vec![joy.clone(), blue.clone(), mercury.clone()]);
    assert!(db.list(3, 10).await.unwrap().is_empty());

    let odes = db.search_by_name("Ode", 0, 10).await.unwrap();
    assert_eq!(odes, vec![joy.clone(), mercury.clone()]);
    assert_eq!(db.count_by_name("Ode").await.unwrap(), 2);
    // `%` is matched literally
    assert_eq!(db.count_by_name("%").await.unwrap(), 1);
    assert_eq!(db.count_by_name("ode").await.unwrap(), 0);

    let same = db.update(blue.id, &SongUpdate::default()).await.unwrap();
    assert_eq!(same, Some(blue.clone()));
    let renamed = db
        .update(
            blue.id,
            &SongUpdate {
                name: Some("Blue (live)".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Blue (live)");
    assert_eq!(renamed.path, blue.path);

    for _ in 0..3 {
        db.increment_plays(joy.id).await.unwrap();
    }
    assert_eq!(db.get_by_id(joy.id).await.unwrap().unwrap().plays, 3);

    let handles: Vec<_> = (0..40)
        .map(|_| {
            let db = db.clone();
            let id = joy.id;
            tokio::spawn(async move { db.increment_plays(id).await.unwrap() })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(db.get_by_id(joy.id).await.unwrap().unwrap().plays, 43);

    let maxed = db
        .update(
            blue.id,
            &SongUpdate {
                plays: Some(i64::MAX),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(maxed.plays, i64::MAX);
    let err = db.increment_plays(blue.id).await.unwrap_err();
    assert!(matches!(err, StoreError::PlayCountOverflow { id } if id == blue.id));
    assert_eq!(db.get_by_id(blue.id).await.unwrap().unwrap().plays, i64::MAX);

    assert!(db.delete(mercury.id).await.unwrap());
    assert!(!db.delete(mercury.id).await.unwrap());
    assert_eq!(db.get_by_id(mercury.id).await.unwrap(), None);
    assert_eq!(db.increment_plays(mercury.id).await.unwrap(), None);
}
