//! Strictly ordered conversion queue
//!
//! Every request goes through one unbounded channel drained by a single
//! worker. The worker owns the refresher and its table, so a refresh started
//! by one task always completes before the next task reads the table. The
//! worker runs on its own thread with a current-thread runtime; callers only
//! await a oneshot reply and may live on any runtime, or none.

use super::conversion::{convert_with_record, ConversionRequest, ConversionResult};
use crate::currency::CurrencyCode;
use crate::error::{FxError, Result};
use crate::feed::lookup;
use crate::feed::refresher::{Clock, FeedRefresher};
use crate::feed::sources::{ArchiveExtractor, FeedDownloader, FeedStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// Receiving end of a queued conversion
pub type ReplyReceiver = oneshot::Receiver<Result<ConversionResult>>;

#[derive(Debug)]
struct ConversionTask {
    id: Uuid,
    request: ConversionRequest,
    reply: oneshot::Sender<Result<ConversionResult>>,
}

/// Handle for submitting conversions to the worker
#[derive(Debug)]
pub struct ConversionQueue {
    tx: mpsc::UnboundedSender<ConversionTask>,
    depth: Arc<AtomicUsize>,
    warn_depth: usize,
}

impl ConversionQueue {
    /// Start the worker thread
    ///
    /// The worker stops once every handle is dropped and the pending tasks
    /// are drained.
    pub fn spawn<D, X, S, C>(
        refresher: FeedRefresher<D, X, S>,
        clock: C,
        base_currency: CurrencyCode,
        warn_depth: usize,
    ) -> Result<Self>
    where
        D: FeedDownloader,
        X: ArchiveExtractor,
        S: FeedStore,
        C: Clock,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));

        let worker = Worker {
            refresher,
            clock,
            base_currency,
            depth: Arc::clone(&depth),
        };
        std::thread::Builder::new()
            .name("eurofx-worker".to_string())
            .spawn(move || runtime.block_on(worker.run(rx)))?;

        Ok(Self {
            tx,
            depth,
            warn_depth,
        })
    }

    /// Enqueue a request; the receiver resolves once the worker handled it
    pub fn submit(&self, request: ConversionRequest) -> Result<ReplyReceiver> {
        let (reply, rx) = oneshot::channel();
        let task = ConversionTask {
            id: Uuid::new_v4(),
            request,
            reply,
        };

        let pending = self.depth.fetch_add(1, Ordering::SeqCst) + 1;
        if pending > self.warn_depth {
            log::warn!("Conversion queue depth: {}", pending);
        }
        log::debug!("Queued task {} ({:?})", task.id, task.request);

        if self.tx.send(task).is_err() {
            self.depth.fetch_sub(1, Ordering::SeqCst);
            return Err(FxError::QueueClosed);
        }
        Ok(rx)
    }

    /// Tasks waiting for the worker
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

struct Worker<D, X, S, C> {
    refresher: FeedRefresher<D, X, S>,
    clock: C,
    base_currency: CurrencyCode,
    depth: Arc<AtomicUsize>,
}

impl<D, X, S, C> Worker<D, X, S, C>
where
    D: FeedDownloader,
    X: ArchiveExtractor,
    S: FeedStore,
    C: Clock,
{
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<ConversionTask>) {
        log::debug!("Conversion worker started");

        while let Some(task) = rx.recv().await {
            self.depth.fetch_sub(1, Ordering::SeqCst);

            let result = self.process(&task.request).await;
            if let Err(ref e) = result {
                log::debug!("Task {} failed: {}", task.id, e);
            }
            if task.reply.send(result).is_err() {
                log::debug!("Task {} finished after its caller went away", task.id);
            }
        }

        log::debug!("Conversion queue closed, worker exiting");
    }

    async fn process(&mut self, request: &ConversionRequest) -> Result<ConversionResult> {
        if request.is_same_currency() {
            return Ok(ConversionResult::unchanged(request.amount));
        }

        self.refresher.ensure_fresh(self.clock.now()).await?;

        let table = self.refresher.table();
        let record = lookup::resolve(table, request.date)?;
        convert_with_record(record, request, &self.base_currency)
    }
}
