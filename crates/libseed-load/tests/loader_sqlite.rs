mod common;

use anyhow::Result;

use libseed_core::{Error, Value};
use libseed_generate::{AuthorRow, BookRow, Entity, UserRole, UserRow};
use libseed_load::{count_tables, insert_batch, insert_rows};

use common::SqliteStore;

fn user(name: &str, email: &str) -> UserRow {
    UserRow {
        name: name.to_string(),
        email: email.to_string(),
        password: "secret".to_string(),
        role: UserRole::User,
    }
}

#[tokio::test]
async fn duplicate_emails_keep_one_row() -> Result<()> {
    let mut store = SqliteStore::library()?;
    let rows = vec![user("a", "dup@example.com"), user("b", "dup@example.com")];
    assert_eq!(insert_rows(&mut store, &rows).await?, 1);
    assert_eq!(store.row_count("users")?, 1);

    assert_eq!(insert_rows(&mut store, &rows[..1]).await?, 0);
    assert_eq!(store.row_count("users")?, 1);
    Ok(())
}

#[tokio::test]
async fn identical_rows_on_other_tables_are_kept() -> Result<()> {
    let mut store = SqliteStore::library()?;
    let author = AuthorRow {
        name: "Same".to_string(),
        birth_year: 1970,
    };
    assert_eq!(insert_rows(&mut store, &[author.clone(), author]).await?, 2);
    assert_eq!(store.row_count("authors")?, 2);
    Ok(())
}

#[tokio::test]
async fn quotes_in_text_survive_the_round_trip() -> Result<()> {
    let mut store = SqliteStore::library()?;
    let author = AuthorRow {
        name: "Flann O'Brien".to_string(),
        birth_year: 1911,
    };
    insert_rows(&mut store, &[author]).await?;
    assert_eq!(
        store.texts("authors", "name")?,
        vec![Some("Flann O'Brien".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn unique_violation_on_fail_policy_table_is_fatal() -> Result<()> {
    let mut store =
        SqliteStore::with_schema("CREATE TABLE genres (id INTEGER PRIMARY KEY, name TEXT UNIQUE)")?;
    let rows = vec![vec![Value::from("Fiction")], vec![Value::from("Fiction")]];
    let err = insert_batch(&mut store, Entity::Genres.spec(), &rows)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Constraint(_)), "{err:?}");
    assert_eq!(store.row_count("genres")?, 0);
    Ok(())
}

#[tokio::test]
async fn dangling_foreign_key_is_fatal() -> Result<()> {
    let mut store = SqliteStore::library()?;
    let book = BookRow {
        isbn: "9780000000001".to_string(),
        title: "Orphan".to_string(),
        author_id: 99,
        genre_id: 1,
        edition: "1.0".to_string(),
    };
    let err = insert_rows(&mut store, &[book]).await.unwrap_err();
    assert!(matches!(err, Error::Constraint(_)), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn counts_every_table_in_load_order() -> Result<()> {
    let mut store = SqliteStore::library()?;
    store.run("INSERT INTO genres (name) VALUES ('Fiction'), ('History')")?;

    let counts = count_tables(&mut store).await?;
    let tables: Vec<&str> = counts.iter().map(|count| count.table.as_str()).collect();
    assert_eq!(
        tables,
        vec!["authors", "genres", "books", "users", "book_copies", "transactions"]
    );
    assert_eq!(counts[1].rows, 2);
    assert!(
        counts
            .iter()
            .filter(|count| count.table != "genres")
            .all(|count| count.rows == 0)
    );
    Ok(())
}

#[tokio::test]
async fn missing_table_fails_the_count() -> Result<()> {
    let mut store =
        SqliteStore::with_schema("CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT)")?;
    assert!(matches!(count_tables(&mut store).await, Err(Error::Db(_))));
    Ok(())
}
