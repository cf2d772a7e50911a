//! Keyed background data loading with pollable state.
//!
//! A [`DataLoadManager`] hands out one [`DataLoader`] per key. The first
//! request for a key queues it and, if needed, starts another worker on the
//! manager's rayon pool. Widgets poll their loader each frame and pick up the
//! value once [`DataLoader::is_complete`] turns true. Nothing on the UI side
//! ever blocks on a load.
//!
//! # Example
//!
//! ```no_run
//! use horizon_controls::loader::{DataLoadManager, DataLoadState};
//!
//! let thumbnails = DataLoadManager::new(|path: &String| {
//!     std::fs::read(path).map_err(|e| e.to_string())
//! })?;
//!
//! let loader = thumbnails.get("cover.png".to_string());
//! // ...later, once per frame:
//! if loader.state() == DataLoadState::Success {
//!     let bytes = loader.value();
//! }
//! # Ok::<(), horizon_controls::ControlsError>(())
//! ```

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rayon::{ThreadPool, ThreadPoolBuilder};

use horizon_controls_core::logging::targets;
use horizon_controls_core::{ControlsError, Result};

/// Default number of queued keys each worker is expected to handle.
pub const DEFAULT_ITEMS_PER_WORKER: usize = 3;

/// Progress of a single load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataLoadState {
    /// No load has been requested.
    #[default]
    Unknown,
    /// Queued, waiting for a worker.
    Initialized,
    /// A worker is running the load.
    Loading,
    /// The value is available.
    Success,
    /// The load failed or the key was rejected.
    Error,
}

impl DataLoadState {
    /// Whether the load has finished, successfully or not.
    #[inline]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

struct Slot<V> {
    state: DataLoadState,
    value: Option<Arc<V>>,
    error: Option<String>,
    rejected: bool,
}

/// A pollable handle to one keyed load.
///
/// Clones share state with each other and with the manager.
pub struct DataLoader<V> {
    slot: Arc<Mutex<Slot<V>>>,
}

impl<V> Clone for DataLoader<V> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<V> Default for DataLoader<V> {
    fn default() -> Self {
        Self::with_state(DataLoadState::Unknown)
    }
}

impl<V> fmt::Debug for DataLoader<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("DataLoader")
            .field("state", &slot.state)
            .field("has_value", &slot.value.is_some())
            .field("error", &slot.error)
            .finish()
    }
}

impl<V> DataLoader<V> {
    fn with_state(state: DataLoadState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                state,
                value: None,
                error: None,
                rejected: false,
            })),
        }
    }

    pub fn state(&self) -> DataLoadState {
        self.slot.lock().state
    }

    /// Whether the load has finished, successfully or not.
    pub fn is_complete(&self) -> bool {
        self.state().is_complete()
    }

    /// The loaded value, once the state is [`DataLoadState::Success`].
    pub fn value(&self) -> Option<Arc<V>> {
        self.slot.lock().value.clone()
    }

    /// Why the load failed, once the state is [`DataLoadState::Error`].
    pub fn error(&self) -> Option<String> {
        self.slot.lock().error.clone()
    }

    /// Whether the allow-key filter turned this key away.
    pub fn is_rejected(&self) -> bool {
        self.slot.lock().rejected
    }

    fn rejected() -> Self {
        let loader = Self::with_state(DataLoadState::Error);
        {
            let mut slot = loader.slot.lock();
            slot.error = Some(ControlsError::LoaderRejected.to_string());
            slot.rejected = true;
        }
        loader
    }

    fn set_state(&self, state: DataLoadState) {
        self.slot.lock().state = state;
    }

    fn succeed(&self, value: V) {
        let mut slot = self.slot.lock();
        slot.value = Some(Arc::new(value));
        slot.state = DataLoadState::Success;
    }

    fn fail(&self, error: String) {
        let mut slot = self.slot.lock();
        slot.error = Some(error);
        slot.state = DataLoadState::Error;
    }
}

type LoadFn<K, V> = dyn Fn(&K) -> std::result::Result<V, String> + Send + Sync;
type AllowFn<K> = dyn Fn(&K) -> bool + Send + Sync;

struct WorkQueue<K> {
    keys: VecDeque<K>,
    workers: usize,
}

struct Shared<K, V> {
    loaders: Mutex<HashMap<K, DataLoader<V>>>,
    queue: Mutex<WorkQueue<K>>,
    load: Box<LoadFn<K, V>>,
    allow: RwLock<Option<Box<AllowFn<K>>>>,
    items_per_worker: Mutex<usize>,
}

/// Lazily loads values by key on a background pool.
///
/// Workers are added as the queue grows: one per
/// [`items_per_worker`](Self::items_per_worker) queued keys, rounded up. A
/// worker keeps taking keys until the queue is empty, then exits.
pub struct DataLoadManager<K, V> {
    shared: Arc<Shared<K, V>>,
    pool: Arc<ThreadPool>,
}

impl<K, V> DataLoadManager<K, V>
where
    K: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Create a manager with its own worker pool.
    ///
    /// `load` runs on a worker thread. An `Err`, or a panic, leaves the key in
    /// [`DataLoadState::Error`].
    pub fn new<F, E>(load: F) -> Result<Self>
    where
        F: Fn(&K) -> std::result::Result<V, E> + Send + Sync + 'static,
        E: fmt::Display + 'static,
    {
        let pool = ThreadPoolBuilder::new()
            .thread_name(|index| format!("horizon-loader-{index}"))
            .build()
            .map_err(|e| ControlsError::config(e.to_string()))?;
        Ok(Self::with_pool(Arc::new(pool), load))
    }

    /// Create a manager that runs its workers on `pool`.
    pub fn with_pool<F, E>(pool: Arc<ThreadPool>, load: F) -> Self
    where
        F: Fn(&K) -> std::result::Result<V, E> + Send + Sync + 'static,
        E: fmt::Display + 'static,
    {
        let load = move |key: &K| load(key).map_err(|e| e.to_string());
        Self {
            shared: Arc::new(Shared {
                loaders: Mutex::new(HashMap::new()),
                queue: Mutex::new(WorkQueue {
                    keys: VecDeque::new(),
                    workers: 0,
                }),
                load: Box::new(load),
                allow: RwLock::new(None),
                items_per_worker: Mutex::new(DEFAULT_ITEMS_PER_WORKER),
            }),
            pool,
        }
    }

    pub fn items_per_worker(&self) -> usize {
        *self.shared.items_per_worker.lock()
    }

    /// Set how many queued keys justify one more worker. Must be at least 1.
    pub fn set_items_per_worker(&self, count: usize) -> Result<()> {
        if count == 0 {
            return Err(ControlsError::config("items_per_worker must be at least 1"));
        }
        *self.shared.items_per_worker.lock() = count;
        Ok(())
    }

    /// Only load keys for which `allow` returns true. Keys already requested
    /// keep their loaders.
    pub fn set_allow_key<F>(&self, allow: F)
    where
        F: Fn(&K) -> bool + Send + Sync + 'static,
    {
        *self.shared.allow.write() = Some(Box::new(allow));
    }

    /// Accept every key again.
    pub fn clear_allow_key(&self) {
        *self.shared.allow.write() = None;
    }

    fn is_allowed(&self, key: &K) -> bool {
        self.shared.allow.read().as_ref().is_none_or(|allow| allow(key))
    }

    /// The loader for `key`, starting a load on first request.
    ///
    /// A key rejected by the allow-key filter gets a loader that is already
    /// in [`DataLoadState::Error`].
    pub fn get(&self, key: K) -> DataLoader<V> {
        let mut loaders = self.shared.loaders.lock();
        if let Some(loader) = loaders.get(&key) {
            return loader.clone();
        }

        if !self.is_allowed(&key) {
            tracing::debug!(target: targets::LOADER, ?key, "key rejected");
            let loader = DataLoader::rejected();
            loaders.insert(key, loader.clone());
            return loader;
        }

        let loader = DataLoader::with_state(DataLoadState::Initialized);
        loaders.insert(key.clone(), loader.clone());
        drop(loaders);

        self.enqueue(key);
        loader
    }

    /// Like [`get`](Self::get), but reports a key rejected by the allow-key
    /// filter as [`ControlsError::LoaderRejected`].
    ///
    /// A rejected key is remembered: later requests fail the same way even if
    /// the filter changes.
    pub fn try_get(&self, key: K) -> Result<DataLoader<V>> {
        let loader = self.get(key);
        if loader.is_rejected() {
            return Err(ControlsError::LoaderRejected);
        }
        Ok(loader)
    }

    /// Whether `key` has been requested.
    pub fn contains(&self, key: &K) -> bool {
        self.shared.loaders.lock().contains_key(key)
    }

    /// Number of keys requested so far.
    pub fn len(&self) -> usize {
        self.shared.loaders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys waiting for a worker.
    pub fn queued(&self) -> usize {
        self.shared.queue.lock().keys.len()
    }

    /// Workers currently running.
    pub fn active_workers(&self) -> usize {
        self.shared.queue.lock().workers
    }

    fn enqueue(&self, key: K) {
        let per_worker = self.items_per_worker();
        let mut queue = self.shared.queue.lock();
        if !queue.keys.contains(&key) {
            queue.keys.push_back(key);
        }

        let needed = queue.keys.len().div_ceil(per_worker);
        while queue.workers < needed {
            queue.workers += 1;
            tracing::trace!(target: targets::LOADER, workers = queue.workers, "starting loader worker");
            let shared = Arc::clone(&self.shared);
            self.pool.spawn(move || run_worker(&shared));
        }
    }
}

fn run_worker<K, V>(shared: &Shared<K, V>)
where
    K: Eq + Hash + fmt::Debug,
{
    loop {
        let key = {
            let mut queue = shared.queue.lock();
            match queue.keys.pop_front() {
                Some(key) => key,
                None => {
                    queue.workers -= 1;
                    return;
                }
            }
        };

        let Some(loader) = shared.loaders.lock().get(&key).cloned() else {
            continue;
        };

        loader.set_state(DataLoadState::Loading);
        match catch_unwind(AssertUnwindSafe(|| (shared.load)(&key))) {
            Ok(Ok(value)) => {
                tracing::trace!(target: targets::LOADER, ?key, "load succeeded");
                loader.succeed(value);
            }
            Ok(Err(error)) => {
                tracing::debug!(target: targets::LOADER, ?key, %error, "load failed");
                loader.fail(error);
            }
            Err(_) => {
                tracing::debug!(target: targets::LOADER, ?key, "load panicked");
                loader.fail("load panicked".to_string());
            }
        }
    }
}

static_assertions::assert_impl_all!(DataLoader<String>: Send, Sync, Clone);
static_assertions::assert_impl_all!(DataLoadManager<u32, String>: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use super::*;

    fn pool() -> Arc<ThreadPool> {
        Arc::new(ThreadPoolBuilder::new().num_threads(2).build().unwrap())
    }

    fn wait_for<V>(loader: &DataLoader<V>) -> DataLoadState {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !loader.is_complete() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        loader.state()
    }

    #[test]
    fn test_state_completion() {
        assert!(!DataLoadState::Unknown.is_complete());
        assert!(!DataLoadState::Loading.is_complete());
        assert!(DataLoadState::Success.is_complete());
        assert!(DataLoadState::Error.is_complete());
        assert_eq!(DataLoader::<u8>::default().state(), DataLoadState::Unknown);
    }

    #[test]
    fn test_loads_value_once_per_key() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let manager = DataLoadManager::with_pool(pool(), move |key: &u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(key * 2)
        });

        let first = manager.get(21);
        assert_eq!(wait_for(&first), DataLoadState::Success);
        assert_eq!(first.value().as_deref(), Some(&42));

        let again = manager.get(21);
        assert_eq!(again.state(), DataLoadState::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_failed_and_panicking_loads_report_error() {
        let manager = DataLoadManager::with_pool(pool(), |key: &u32| match key {
            0 => Err("zero is not allowed"),
            1 => panic!("boom"),
            n => Ok(*n),
        });

        let failed = manager.get(0);
        let panicked = manager.get(1);
        assert_eq!(wait_for(&failed), DataLoadState::Error);
        assert_eq!(failed.error().as_deref(), Some("zero is not allowed"));
        assert_eq!(wait_for(&panicked), DataLoadState::Error);
        assert!(panicked.value().is_none());
    }

    #[test]
    fn test_allow_key_filter() {
        let manager = DataLoadManager::with_pool(pool(), |key: &u32| Ok::<_, String>(*key));
        manager.set_allow_key(|key| key % 2 == 0);

        assert!(matches!(manager.try_get(3), Err(ControlsError::LoaderRejected)));
        let rejected = manager.get(3);
        assert_eq!(rejected.state(), DataLoadState::Error);
        assert!(rejected.is_rejected());
        assert!(manager.contains(&3));

        manager.clear_allow_key();
        assert!(manager.try_get(3).is_err());

        let allowed = manager.get(4);
        assert_eq!(wait_for(&allowed), DataLoadState::Success);
    }

    #[test]
    fn test_items_per_worker_must_be_positive() {
        let manager = DataLoadManager::with_pool(pool(), |key: &u32| Ok::<_, String>(*key));
        assert!(manager.set_items_per_worker(0).is_err());
        assert_eq!(manager.items_per_worker(), DEFAULT_ITEMS_PER_WORKER);
        manager.set_items_per_worker(1).unwrap();
        assert_eq!(manager.items_per_worker(), 1);
    }

    #[test]
    fn test_many_keys_all_complete() {
        let manager = DataLoadManager::with_pool(pool(), |key: &u32| Ok::<_, String>(key + 1));
        manager.set_items_per_worker(2).unwrap();

        let loaders: Vec<_> = (0..20).map(|key| manager.get(key)).collect();
        for (key, loader) in loaders.iter().enumerate() {
            assert_eq!(wait_for(loader), DataLoadState::Success);
            assert_eq!(loader.value().as_deref(), Some(&(key as u32 + 1)));
        }
        assert_eq!(manager.queued(), 0);
    }
}
