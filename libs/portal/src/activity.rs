use std::sync::Arc;

use entity::prelude::*;
use repository::ActivitySink;
use tokio::{
    sync::mpsc::{self, Receiver, Sender},
    task::JoinHandle,
};
use tracing::{error, warn};

pub const DEFAULT_CAPACITY: usize = 100;

/// Fire-and-forget activity log.
///
/// Events go onto a bounded channel and a background task writes them to
/// the sink. Logging never waits and never fails the caller: a full
/// channel or a sink error only ends up in the trace log.
#[derive(Clone, Debug)]
pub struct ActivityLogger {
    tx: Sender<ActivityEntity>,
}

impl ActivityLogger {
    /// Starts the writer task. It stops once every logger clone is dropped
    /// and the queue is drained.
    pub fn spawn(
        sink: Arc<dyn ActivitySink>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(receiver(sink, rx));

        (Self { tx }, handle)
    }

    pub fn log(&self, user_id: &str, action: ActivityActionEntity) {
        let activity = ActivityEntity::new(user_id, action);

        if let Err(e) = self.tx.try_send(activity) {
            warn!(task = "log activity", err = e.to_string());
        }
    }
}

async fn receiver(
    sink: Arc<dyn ActivitySink>,
    mut rx: Receiver<ActivityEntity>,
) {
    while let Some(activity) = rx.recv().await {
        let action = activity.action.name();

        if let Err(e) = sink.record(activity).await {
            error!(task = "record activity", action, err = format!("{:#}", e));
        }
    }
}
