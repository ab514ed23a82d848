use anyhow::Result;
use test_utils::temp_dir;
use tokio::fs;

use super::LocalStore;
use crate::domain::models::StoreName;
use crate::domain::models::TranscriptStore;

#[tokio::test]
async fn it_saves_to_chats_dir() -> Result<()> {
    let dir = temp_dir();
    let store = LocalStore::new(dir.clone());

    let location = store.save("Ada", "Name: Ada").await?;

    let expected = dir.join("chats").join("Ada.txt");
    assert_eq!(location, expected.to_string_lossy());
    assert_eq!(fs::read_to_string(expected).await?, "Name: Ada");
    assert_eq!(store.name(), StoreName::Local);

    return Ok(());
}

#[tokio::test]
async fn it_overwrites_on_second_save() -> Result<()> {
    let dir = temp_dir();
    let store = LocalStore::new(dir.clone());

    store.save("Ada", "first").await?;
    let location = store.save("Ada", "second").await?;

    assert_eq!(fs::read_to_string(&location).await?, "second");

    let mut entries = fs::read_dir(dir.join("chats")).await?;
    let mut count = 0;
    while entries.next_entry().await?.is_some() {
        count += 1;
    }
    assert_eq!(count, 1);

    return Ok(());
}

#[tokio::test]
async fn it_keeps_names_inside_chats_dir() -> Result<()> {
    let dir = temp_dir();
    let store = LocalStore::new(dir.clone());

    let location = store.save("../escape", "text").await?;

    assert_eq!(
        location,
        dir.join("chats").join("___escape.txt").to_string_lossy()
    );

    return Ok(());
}
