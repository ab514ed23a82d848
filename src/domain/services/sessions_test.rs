use std::time::Duration;

use super::Sessions;
use crate::configuration::Settings;

#[test]
fn it_creates_short_ids() {
    let id = Sessions::create_id();
    assert_eq!(id.split('-').count(), 2);
    assert_eq!(id.len(), 13);
}

#[tokio::test]
async fn it_creates_independent_sessions() {
    let sessions = Sessions::default();
    let settings = Settings::default();

    let (first_id, first) = sessions.create(&settings);
    let (second_id, second) = sessions.create(&settings);

    assert_ne!(first_id, second_id);
    assert_eq!(sessions.count(), 2);

    first.lock().await.set_name("Ada");

    assert_eq!(
        first.lock().await.session().name.as_deref(),
        Some("Ada")
    );
    assert_eq!(second.lock().await.session().name, None);
}

#[tokio::test]
async fn it_gets_the_same_session() {
    let sessions = Sessions::default();
    let (id, session) = sessions.create(&Settings::default());
    session.lock().await.set_name("Ada");

    let fetched = sessions.get(&id).unwrap();
    assert_eq!(fetched.lock().await.session().id, id);
    assert_eq!(fetched.lock().await.session().name.as_deref(), Some("Ada"));
}

#[test]
fn it_returns_none_for_unknown_id() {
    let sessions = Sessions::default();
    assert!(sessions.get("nope").is_none());
}

#[test]
fn it_deletes_sessions() {
    let sessions = Sessions::default();
    let (id, _session) = sessions.create(&Settings::default());

    assert!(sessions.delete(&id));
    assert!(!sessions.delete(&id));
    assert!(sessions.get(&id).is_none());
    assert_eq!(sessions.count(), 0);
}

#[tokio::test]
async fn it_evicts_idle_sessions() {
    let sessions = Sessions::default();
    let settings = Settings::default();

    let (idle_id, _idle) = sessions.create(&settings);
    let (streaming_id, streaming) = sessions.create(&settings);
    let (locked_id, locked) = sessions.create(&settings);

    {
        let mut state = streaming.lock().await;
        state.set_name("Ada");
        state.submit_prompt("Hello").unwrap();
    }
    let _guard = locked.lock().await;

    assert_eq!(sessions.evict_idle(Duration::from_secs(3600)), 0);
    assert_eq!(sessions.count(), 3);

    assert_eq!(sessions.evict_idle(Duration::ZERO), 1);
    assert!(sessions.get(&idle_id).is_none());
    assert!(sessions.get(&streaming_id).is_some());
    assert!(sessions.get(&locked_id).is_some());
}
