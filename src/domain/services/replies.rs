#[cfg(test)]
#[path = "replies_test.rs"]
mod tests;

use anyhow::anyhow;
use anyhow::Result;
use tokio::sync::mpsc;

use super::SessionRef;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendRef;
use crate::domain::models::BackendResponse;
use crate::domain::models::ReplyEvent;

fn forward(tx: &mpsc::UnboundedSender<ReplyEvent>, event: ReplyEvent) {
    if tx.send(event).is_err() {
        tracing::debug!("Reply listener disconnected, continuing to buffer reply");
    }
}

pub struct ReplyService {}

impl ReplyService {
    /// Runs one completion for the session. Fragments are buffered into the
    /// session as they arrive and forwarded to `tx`, followed by either the
    /// committed assistant message or an error.
    pub async fn stream(
        backend: BackendRef,
        session: SessionRef,
        prompt: BackendPrompt,
        tx: mpsc::UnboundedSender<ReplyEvent>,
    ) -> Result<()> {
        let (backend_tx, mut backend_rx) = mpsc::unbounded_channel::<BackendResponse>();

        let worker = tokio::spawn(async move {
            return backend.get_completion(prompt, &backend_tx).await;
        });

        while let Some(msg) = backend_rx.recv().await {
            let text = msg.text.to_string();
            let committed = session.lock().await.handle_backend_response(msg);

            if !text.is_empty() {
                forward(&tx, ReplyEvent::Chunk { text });
            }
            if let Some(message) = committed {
                forward(&tx, ReplyEvent::Done { message });
            }
        }

        let mut res = match worker.await {
            Ok(res) => res,
            Err(err) => Err(err.into()),
        };

        if res.is_ok() && session.lock().await.waiting_for_backend() {
            res = Err(anyhow!("Backend stopped before completing the reply"));
        }

        if let Err(err) = res {
            tracing::error!(error = ?err, "Completion request failed");
            session.lock().await.handle_backend_error();
            forward(
                &tx,
                ReplyEvent::Error {
                    error: format!("The backend failed with the following error: {err}"),
                },
            );
            return Err(err);
        }

        return Ok(());
    }
}
