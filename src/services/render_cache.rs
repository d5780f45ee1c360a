//! Short-lived render cache with in-flight de-duplication.
//!
//! Each key maps to a slot that is either a finished render or the shared
//! handle of a render still running. A request that finds a running render
//! awaits the same handle instead of starting another fetch.
//!
//! The render itself runs as its own tokio task and settles its slot when
//! it finishes: success is stored, failure removes the slot so the next
//! request starts over. Requests that give up early do not stop it.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt, Shared};

use crate::error::{PipelineError, RenderError};
use crate::rendering::RenderedImage;

pub type RenderOutcome = Result<Arc<RenderedImage>, Arc<PipelineError>>;

type SharedRender = Shared<BoxFuture<'static, RenderOutcome>>;

/// How a request was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    /// Fresh stored entry
    Hit,
    /// This request started the render
    Miss,
    /// Waited on a render another request started
    Joined,
}

impl CacheLookup {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheLookup::Hit => "hit",
            CacheLookup::Miss => "miss",
            CacheLookup::Joined => "joined",
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<RenderedImage>,
    created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

enum Slot {
    Ready(CacheEntry),
    /// Render task `id`, still running
    Pending { id: u64, render: SharedRender },
}

pub struct RenderCache {
    slots: Mutex<HashMap<String, Slot>>,
    ttl: Duration,
    max_entries: usize,
    next_id: AtomicU64,
}

fn task_failure(reason: impl Into<String>) -> Arc<PipelineError> {
    Arc::new(PipelineError::from(RenderError::Task(reason.into())))
}

impl RenderCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
            next_id: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A fresh stored render, if any. Expired entries are dropped.
    pub fn get(&self, key: &str) -> Option<Arc<RenderedImage>> {
        let mut slots = self.lock();
        match slots.get(key) {
            Some(Slot::Ready(entry)) if !entry.is_expired(self.ttl) => {
                return Some(entry.value.clone())
            }
            Some(Slot::Ready(_)) => {}
            _ => return None,
        }
        slots.remove(key);
        None
    }

    /// Store a render, replacing whatever the key held.
    pub fn put(&self, key: impl Into<String>, value: Arc<RenderedImage>) {
        let mut slots = self.lock();
        self.store(&mut slots, key.into(), value);
    }

    /// Number of stored (not in-flight) renders that are still fresh.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(e) if !e.is_expired(self.ttl)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serve `key` from the cache, join a running render, or start one.
    ///
    /// `render` is only called on a miss. Its future is spawned on the
    /// tokio runtime and runs to completion even if every caller waiting
    /// on it is dropped.
    pub async fn get_or_render<F, Fut>(
        self: &Arc<Self>,
        key: &str,
        render: F,
    ) -> (RenderOutcome, CacheLookup)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RenderOutcome> + Send + 'static,
    {
        let (shared, lookup) = {
            let mut slots = self.lock();
            match slots.get(key) {
                Some(Slot::Ready(entry)) if !entry.is_expired(self.ttl) => {
                    tracing::debug!(key, cache = "hit", "Render cache");
                    return (Ok(entry.value.clone()), CacheLookup::Hit);
                }
                Some(Slot::Pending { render: running, .. }) => {
                    tracing::debug!(key, cache = "joined", "Render cache");
                    (running.clone(), CacheLookup::Joined)
                }
                _ => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let running = self.spawn_render(key.to_string(), id, render());
                    slots.insert(
                        key.to_string(),
                        Slot::Pending {
                            id,
                            render: running.clone(),
                        },
                    );
                    (running, CacheLookup::Miss)
                }
            }
        };

        (shared.await, lookup)
    }

    /// Run `job` as its own task that settles slot `key` when done.
    ///
    /// Called with the slot map locked, so the task cannot settle before
    /// its pending slot is inserted.
    fn spawn_render<Fut>(self: &Arc<Self>, key: String, id: u64, job: Fut) -> SharedRender
    where
        Fut: Future<Output = RenderOutcome> + Send + 'static,
    {
        let cache = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let outcome = AssertUnwindSafe(job)
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(task_failure("render task panicked")));
            cache.settle(&key, id, &outcome);
            outcome
        });

        async move {
            handle
                .await
                .unwrap_or_else(|e| Err(task_failure(e.to_string())))
        }
        .boxed()
        .shared()
    }

    /// Replace pending slot `id` for `key` with its result, unless the slot
    /// has been replaced in the meantime.
    fn settle(&self, key: &str, id: u64, outcome: &RenderOutcome) {
        let mut slots = self.lock();
        let ours = matches!(slots.get(key), Some(Slot::Pending { id: pending, .. }) if *pending == id);
        if !ours {
            return;
        }
        match outcome {
            Ok(value) => self.store(&mut slots, key.to_string(), value.clone()),
            Err(_) => {
                slots.remove(key);
            }
        }
    }

    fn store(&self, slots: &mut HashMap<String, Slot>, key: String, value: Arc<RenderedImage>) {
        slots.retain(|_, slot| !matches!(slot, Slot::Ready(e) if e.is_expired(self.ttl)));
        slots.insert(
            key,
            Slot::Ready(CacheEntry {
                value,
                created_at: Instant::now(),
            }),
        );

        loop {
            let ready = slots.values().filter(|s| matches!(s, Slot::Ready(_))).count();
            if ready <= self.max_entries {
                break;
            }
            let oldest = slots
                .iter()
                .filter_map(|(k, s)| match s {
                    Slot::Ready(e) => Some((k.clone(), e.created_at)),
                    Slot::Pending { .. } => None,
                })
                .min_by_key(|(_, created_at)| *created_at)
                .map(|(k, _)| k);
            match oldest {
                Some(k) => {
                    slots.remove(&k);
                    tracing::debug!(key = %k, "Render cache: evicted oldest entry");
                }
                None => break,
            }
        }
    }
}
