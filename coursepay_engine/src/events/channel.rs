//! A small pub-sub channel for order events.
//!
//! Each [`EventHandler`] owns one async callback and the receiving end of a bounded mpsc channel. Any number of
//! [`EventProducer`]s can publish into it. Handlers are stateless: they see the event and nothing else.
//!
//! Every event runs in its own task. When the last producer is dropped, the handler stops accepting events, waits for
//! the in-flight callbacks and exits.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{sync::mpsc, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        Self { listener: receiver, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    pub async fn start_handler(mut self) {
        debug!("🪝️ Starting event handler");
        // Only producers hold senders from here on, so the loop ends when the last one goes away.
        drop(self.sender);
        let mut jobs = JoinSet::new();
        loop {
            tokio::select! {
                ev = self.listener.recv() => match ev {
                    Some(ev) => {
                        trace!("🪝️ Handling event");
                        let handler = Arc::clone(&self.handler);
                        jobs.spawn(async move { (handler)(ev).await });
                    },
                    None => break,
                },
                Some(done) = jobs.join_next(), if !jobs.is_empty() => log_join_result(done),
            }
        }
        debug!("🪝️ All producers have gone away. Waiting for {} jobs to complete", jobs.len());
        while let Some(done) = jobs.join_next().await {
            log_join_result(done);
        }
        debug!("🪝️ Event handler has shut down");
    }
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => trace!("🪝️ Event handled"),
        Err(e) => warn!("🪝️ An event hook did not run to completion: {e}"),
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("🪝️ Failed to send event: {e}");
        }
    }
}
