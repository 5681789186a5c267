//! Change events delivered to `ChemicalStore::subscribe` callbacks.

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::local::ExternalWatch;
use crate::model::ChemicalRecord;
use crate::remote::{ChangeChannel, RemoteChange};

/// What a subscriber is told.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum ChangeEvent {
    /// The cached record list changed; carries a fresh full listing.
    Sync(Vec<ChemicalRecord>),
    /// A raw payload from the hosted live channel.
    Remote(RemoteChange),
}

/// Handle on an active subscription. Dropping it unsubscribes.
#[derive(Debug, Default)]
pub struct Subscription {
    tasks: Vec<JoinHandle<()>>,
    watch: Option<ExternalWatch>,
    channel: Option<ChangeChannel>,
}

impl Subscription {
    /// A subscription with nothing behind it.
    pub fn inert() -> Self {
        Self::default()
    }

    pub(crate) fn push_task(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    pub(crate) fn set_watch(&mut self, watch: ExternalWatch) {
        self.watch = Some(watch);
    }

    pub(crate) fn set_channel(&mut self, channel: ChangeChannel) {
        self.channel = Some(channel);
    }

    pub fn is_active(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    /// Stop every listener behind this subscription.
    pub fn unsubscribe(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if let Some(watch) = self.watch.take() {
            watch.stop();
        }
        if let Some(channel) = self.channel.take() {
            if let Err(err) = channel.close() {
                warn!(error = %err, "failed to close live change channel");
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.teardown();
    }
}
