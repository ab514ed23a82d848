use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::ReplyService;
use crate::configuration::Settings;
use crate::domain::models::Message;
use crate::domain::models::ReplyEvent;
use crate::domain::services::Sessions;
use crate::infrastructure::backends::mock::MockBackend;

async fn collect(mut rx: mpsc::UnboundedReceiver<ReplyEvent>) -> Vec<ReplyEvent> {
    let mut events = vec![];
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    return events;
}

#[tokio::test]
async fn it_streams_and_commits_reply() -> Result<()> {
    let sessions = Sessions::default();
    let (_id, session) = sessions.create(&Settings::default());
    session.lock().await.set_name("Ada");
    let prompt = session.lock().await.submit_prompt("Hello").unwrap();

    let backend = Arc::new(MockBackend::new(vec!["Hi ", "Ada"]));
    let (tx, rx) = mpsc::unbounded_channel::<ReplyEvent>();

    ReplyService::stream(backend.clone(), session.clone(), prompt, tx).await?;

    let events = collect(rx).await;
    assert_eq!(
        events,
        vec![
            ReplyEvent::Chunk {
                text: "Hi ".to_string()
            },
            ReplyEvent::Chunk {
                text: "Ada".to_string()
            },
            ReplyEvent::Done {
                message: Message::assistant("Hi Ada")
            },
        ]
    );

    let state = session.lock().await;
    assert_eq!(
        state.session().messages,
        vec![Message::user("Hello"), Message::assistant("Hi Ada")]
    );
    assert!(!state.waiting_for_backend());

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].messages, vec![Message::user("Hello")]);

    return Ok(());
}

#[tokio::test]
async fn it_commits_reply_when_listener_is_gone() -> Result<()> {
    let sessions = Sessions::default();
    let (_id, session) = sessions.create(&Settings::default());
    session.lock().await.set_name("Ada");
    let prompt = session.lock().await.submit_prompt("Hello").unwrap();

    let (tx, rx) = mpsc::unbounded_channel::<ReplyEvent>();
    drop(rx);

    ReplyService::stream(
        Arc::new(MockBackend::new(vec!["Hi"])),
        session.clone(),
        prompt,
        tx,
    )
    .await?;

    assert_eq!(session.lock().await.session().messages.len(), 2);

    return Ok(());
}

#[tokio::test]
async fn it_reports_backend_failures() -> Result<()> {
    let sessions = Sessions::default();
    let (_id, session) = sessions.create(&Settings::default());
    session.lock().await.set_name("Ada");
    let prompt = session.lock().await.submit_prompt("Hello").unwrap();

    let (tx, rx) = mpsc::unbounded_channel::<ReplyEvent>();
    let res = ReplyService::stream(
        Arc::new(MockBackend::failing(vec!["Hi"])),
        session.clone(),
        prompt,
        tx,
    )
    .await;

    assert!(res.is_err());

    let events = collect(rx).await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name(), "chunk");
    assert_eq!(events[1].name(), "error");

    let state = session.lock().await;
    assert_eq!(state.session().messages, vec![Message::user("Hello")]);
    assert!(!state.waiting_for_backend());
    assert_eq!(state.pending_reply(), None);

    return Ok(());
}

#[tokio::test]
async fn it_fails_when_backend_never_finishes() -> Result<()> {
    let sessions = Sessions::default();
    let (_id, session) = sessions.create(&Settings::default());
    session.lock().await.set_name("Ada");
    let prompt = session.lock().await.submit_prompt("Hello").unwrap();

    let (tx, _rx) = mpsc::unbounded_channel::<ReplyEvent>();
    let res = ReplyService::stream(
        Arc::new(MockBackend::without_done(vec!["Hi"])),
        session.clone(),
        prompt,
        tx,
    )
    .await;

    assert!(res.is_err());
    assert!(!session.lock().await.waiting_for_backend());
    assert_eq!(session.lock().await.session().messages.len(), 1);

    return Ok(());
}
