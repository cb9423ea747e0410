// SPDX-License-Identifier: MPL-2.0
//! Asynchronous driver around the [`Registry`].
//!
//! The `Toaster` is the imperative API call sites use. It keeps the registry
//! behind a mutex, runs one cancellable tokio task per timed entry (either a
//! countdown or an exit window), and publishes an immutable [`Snapshot`]
//! after every mutation.
//!
//! No lock is ever held across an `.await`, so at most one mutation runs at
//! a time regardless of the runtime flavor. Listeners run after the lock is
//! released and may call back into the toaster.

use super::notification::{Category, ExitReason, NotificationId};
use super::options::NotificationOptions;
use super::registry::{Change, Countdown, Registry, RegistryConfig};
use super::subscription::{Listeners, Snapshot, Subscription};
use crate::diagnostics::{DiagnosticEventKind, DiagnosticsHandle};
use crate::domain::notifications::ExitTransition;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::{self, Instant};

/// Configuration of a [`Toaster`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToasterConfig {
    /// Capacity, sampling interval and per-notification defaults.
    pub registry: RegistryConfig,
    /// Time entries stay Exiting before they are removed.
    pub exit_transition: ExitTransition,
}

/// Builder for a [`Toaster`].
pub struct ToasterBuilder<M = String> {
    config: ToasterConfig,
    runtime: Option<Handle>,
    diagnostics: Option<DiagnosticsHandle>,
    _message: PhantomData<fn() -> M>,
}

impl<M> ToasterBuilder<M>
where
    M: Clone + Send + Sync + 'static,
{
    /// Spawns timers on `runtime` instead of the ambient one.
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Reports lifecycle events to a diagnostics journal.
    #[must_use]
    pub fn diagnostics(mut self, handle: DiagnosticsHandle) -> Self {
        self.diagnostics = Some(handle);
        self
    }

    /// Creates the toaster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] when no runtime was given and the call
    /// is made outside of a tokio runtime context.
    pub fn build(self) -> Result<Toaster<M>> {
        let runtime = match self.runtime.clone() {
            Some(runtime) => runtime,
            None => Handle::try_current()?,
        };
        Ok(self.assemble(runtime))
    }

    fn assemble(self, runtime: Handle) -> Toaster<M> {
        let (snapshots, _) = watch::channel(Snapshot::default());

        Toaster {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    registry: Registry::new(self.config.registry),
                    timers: HashMap::new(),
                    next_generation: 0,
                    revision: 0,
                    closed: false,
                }),
                listeners: Arc::new(Listeners::new()),
                snapshots,
                delivery: Mutex::new(Delivery {
                    pending: None,
                    delivered: 0,
                    draining: false,
                }),
                runtime,
                config: self.config,
                diagnostics: self.diagnostics,
            }),
        }
    }
}

/// Handle to a notification registry with running timers.
///
/// Cloning is cheap; all clones drive the same registry. Dropping the last
/// clone cancels every pending timer.
///
/// # Example
///
/// ```no_run
/// use toast_registry::notifications::{Category, NotificationOptions, Toaster, ToasterConfig};
///
/// # async fn demo() -> toast_registry::error::Result<()> {
/// let toaster: Toaster = Toaster::new(ToasterConfig::default())?;
/// let _subscription = toaster.subscribe(|snapshot| {
///     println!("{} notifications on screen", snapshot.len());
/// })?;
///
/// let id = toaster.add("Saved".to_string(), Category::Success)?;
/// toaster.pause(&id, true)?; // pointer entered the toast
/// toaster.pause(&id, false)?; // pointer left
/// # Ok(())
/// # }
/// ```
pub struct Toaster<M = String> {
    shared: Arc<Shared<M>>,
}

impl<M> Clone for Toaster<M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<M> std::fmt::Debug for Toaster<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toaster")
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl<M> Toaster<M>
where
    M: Clone + Send + Sync + 'static,
{
    /// Creates a toaster on the ambient tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] outside of a tokio runtime context.
    pub fn new(config: ToasterConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Creates a toaster whose timers run on `runtime`.
    ///
    /// Unlike [`new`](Self::new) this works from any thread.
    pub fn with_runtime(config: ToasterConfig, runtime: Handle) -> Self {
        Self::builder(config).assemble(runtime)
    }

    /// Starts a builder for a toaster with a custom runtime or diagnostics.
    #[must_use]
    pub fn builder(config: ToasterConfig) -> ToasterBuilder<M> {
        ToasterBuilder {
            config,
            runtime: None,
            diagnostics: None,
            _message: PhantomData,
        }
    }

    /// Returns the configuration the toaster was built with.
    #[must_use]
    pub fn config(&self) -> &ToasterConfig {
        &self.shared.config
    }

    /// Adds a notification and returns its id.
    ///
    /// Never blocks. When capacity is exceeded the oldest Active entry
    /// starts its exit transition before this call returns.
    pub fn add(
        &self,
        message: M,
        options: impl Into<NotificationOptions>,
    ) -> Result<NotificationId> {
        let options = options.into();
        self.with_state(|shared, state, now| {
            let (id, changes) = state.registry.add(message, options, now);
            shared.apply(state, &changes);
            (id, true)
        })
    }

    /// Adds a success notification with default options.
    pub fn success(&self, message: M) -> Result<NotificationId> {
        self.add(message, Category::Success)
    }

    /// Adds an error notification with default options.
    pub fn error(&self, message: M) -> Result<NotificationId> {
        self.add(message, Category::Error)
    }

    /// Adds a warning notification with default options.
    pub fn warning(&self, message: M) -> Result<NotificationId> {
        self.add(message, Category::Warning)
    }

    /// Adds an info notification with default options.
    pub fn info(&self, message: M) -> Result<NotificationId> {
        self.add(message, Category::Info)
    }

    /// Starts the exit transition of `id`. Unknown ids are ignored.
    pub fn remove(&self, id: &NotificationId) -> Result<()> {
        self.with_state(|shared, state, _| {
            let changes: Vec<Change> = state.registry.remove(id).into_iter().collect();
            shared.apply(state, &changes);
            ((), !changes.is_empty())
        })
    }

    /// User dismissal: like [`remove`](Self::remove) but ignored for
    /// notifications that are not dismissible.
    pub fn dismiss(&self, id: &NotificationId) -> Result<()> {
        self.with_state(|shared, state, _| {
            let changes: Vec<Change> = state.registry.dismiss(id).into_iter().collect();
            shared.apply(state, &changes);
            ((), !changes.is_empty())
        })
    }

    /// Starts the exit transition of every Active notification.
    pub fn dismiss_all(&self) -> Result<()> {
        self.with_state(|shared, state, _| {
            let changes = state.registry.dismiss_all();
            shared.apply(state, &changes);
            ((), !changes.is_empty())
        })
    }

    /// Removes every notification immediately and cancels all timers.
    pub fn clear(&self) -> Result<()> {
        self.with_state(|shared, state, _| {
            let count = state.registry.clear().len();
            state.cancel_all();
            if count > 0 {
                tracing::debug!(count, "notifications cleared");
                shared.log(DiagnosticEventKind::Cleared { count });
            }
            ((), count > 0)
        })
    }

    /// Pauses or resumes the countdown of `id`.
    ///
    /// Resuming continues from the remaining time at the moment of the
    /// pause. Unknown and Exiting ids are ignored.
    pub fn pause(&self, id: &NotificationId, paused: bool) -> Result<()> {
        self.with_state(|shared, state, now| {
            let changed = state.registry.pause(id, paused, now);
            if changed {
                shared.pause_changed(state, id, paused);
            }
            ((), changed)
        })
    }

    /// Pauses or resumes every Active notification.
    pub fn pause_all(&self, paused: bool) -> Result<()> {
        self.with_state(|shared, state, now| {
            let ids = state.registry.pause_all(paused, now);
            for id in &ids {
                shared.pause_changed(state, id, paused);
            }
            ((), !ids.is_empty())
        })
    }

    /// Replaces the payload of an Active notification, keeping its countdown.
    pub fn update(&self, id: &NotificationId, message: M) -> Result<()> {
        self.with_state(|shared, state, _| {
            let changed = state.registry.update(id, message);
            if changed {
                tracing::debug!(%id, "notification message updated");
                shared.log(DiagnosticEventKind::PayloadUpdated { id: id.clone() });
            }
            ((), changed)
        })
    }

    /// Returns the current collection, Exiting entries included.
    pub fn snapshot(&self) -> Snapshot<M> {
        let state = self.shared.lock();
        Snapshot::new(state.revision, state.registry.snapshot())
    }

    /// Registers a listener called with a snapshot after every mutation.
    ///
    /// The listener runs outside the registry lock, so it may call back
    /// into the toaster. Dropping the returned [`Subscription`] removes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] after [`shutdown`](Self::shutdown).
    pub fn subscribe(
        &self,
        listener: impl Fn(&Snapshot<M>) + Send + Sync + 'static,
    ) -> Result<Subscription> {
        self.ensure_open()?;
        Ok(self.shared.listeners.insert(Arc::new(listener)))
    }

    /// Returns a receiver that always holds the latest snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] after [`shutdown`](Self::shutdown).
    pub fn watch(&self) -> Result<watch::Receiver<Snapshot<M>>> {
        self.ensure_open()?;
        Ok(self.shared.snapshots.subscribe())
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.listeners.len()
    }

    /// Returns true after [`shutdown`](Self::shutdown).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// Clears the registry, cancels all timers and closes the toaster.
    ///
    /// Subscribers receive a final empty snapshot. Every later call on any
    /// clone returns [`Error::Closed`]. Calling it twice is harmless.
    pub fn shutdown(&self) {
        let snapshot = {
            let mut state = self.shared.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            let count = state.registry.clear().len();
            state.cancel_all();
            tracing::debug!(count, "toaster shut down");
            if count > 0 {
                self.shared.log(DiagnosticEventKind::Cleared { count });
            }
            self.shared.log(DiagnosticEventKind::Closed);
            self.shared.commit(&mut state)
        };
        self.shared.publish(snapshot);
    }

    fn ensure_open(&self) -> Result<()> {
        if self.shared.lock().closed {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    /// Runs `op` under the lock and publishes a snapshot when it reports a
    /// change.
    fn with_state<R>(
        &self,
        op: impl FnOnce(&Arc<Shared<M>>, &mut State<M>, Instant) -> (R, bool),
    ) -> Result<R> {
        let (result, snapshot) = {
            let mut state = self.shared.lock();
            if state.closed {
                return Err(Error::Closed);
            }
            let (result, changed) = op(&self.shared, &mut *state, Instant::now());
            let snapshot = changed.then(|| self.shared.commit(&mut state));
            (result, snapshot)
        };
        if let Some(snapshot) = snapshot {
            self.shared.publish(snapshot);
        }
        Ok(result)
    }
}

struct Timer {
    generation: u64,
    handle: AbortHandle,
}

struct State<M> {
    registry: Registry<M>,
    timers: HashMap<NotificationId, Timer>,
    next_generation: u64,
    revision: u64,
    closed: bool,
}

impl<M> State<M> {
    /// True when `generation` is still the live timer of `id`.
    fn owns_timer(&self, id: &NotificationId, generation: u64) -> bool {
        self.timers
            .get(id)
            .is_some_and(|timer| timer.generation == generation)
    }

    fn install_timer(&mut self, id: &NotificationId, generation: u64, handle: AbortHandle) {
        let previous = self
            .timers
            .insert(id.clone(), Timer { generation, handle });
        if let Some(previous) = previous {
            previous.handle.abort();
        }
    }

    fn cancel_timer(&mut self, id: &NotificationId) {
        if let Some(timer) = self.timers.remove(id) {
            timer.handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}

/// Snapshot hand-off between publishing threads.
struct Delivery<M> {
    pending: Option<Snapshot<M>>,
    delivered: u64,
    draining: bool,
}

/// Releases the drain role if a listener panics mid-delivery.
struct DrainGuard<'a, M> {
    delivery: &'a Mutex<Delivery<M>>,
    armed: bool,
}

impl<M> Drop for DrainGuard<'_, M> {
    fn drop(&mut self) {
        if self.armed {
            let mut delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
            delivery.draining = false;
        }
    }
}

struct Shared<M> {
    state: Mutex<State<M>>,
    listeners: Arc<Listeners<M>>,
    snapshots: watch::Sender<Snapshot<M>>,
    delivery: Mutex<Delivery<M>>,
    runtime: Handle,
    config: ToasterConfig,
    diagnostics: Option<DiagnosticsHandle>,
}

impl<M> Shared<M> {
    fn lock(&self) -> MutexGuard<'_, State<M>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log(&self, kind: DiagnosticEventKind) {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log(kind);
        }
    }
}

impl<M> Shared<M>
where
    M: Clone + Send + Sync + 'static,
{
    /// Arms or cancels timers for each change and reports it.
    fn apply(self: &Arc<Self>, state: &mut State<M>, changes: &[Change]) {
        for change in changes {
            match change {
                Change::Added(id) => {
                    if let Some(notification) = state.registry.get(id) {
                        tracing::debug!(%id, category = ?notification.category(), "notification added");
                        self.log(DiagnosticEventKind::Added {
                            id: id.clone(),
                            category: notification.category(),
                            position: notification.position(),
                            auto_dismiss_ms: notification.auto_dismiss().map(duration_millis),
                        });
                    }
                    self.arm_countdown(state, id);
                }
                Change::Updated(id) => {
                    tracing::debug!(%id, "notification replaced in place");
                    self.log(DiagnosticEventKind::Updated { id: id.clone() });
                    self.arm_countdown(state, id);
                }
                Change::Exiting { id, reason } => {
                    tracing::debug!(%id, ?reason, "notification exiting");
                    self.log(DiagnosticEventKind::Exiting {
                        id: id.clone(),
                        reason: *reason,
                    });
                    self.arm_exit(state, id);
                }
                Change::Removed(id) => {
                    tracing::debug!(%id, "notification removed");
                    self.log(DiagnosticEventKind::Removed { id: id.clone() });
                    state.cancel_timer(id);
                }
            }
        }
    }

    fn pause_changed(self: &Arc<Self>, state: &mut State<M>, id: &NotificationId, paused: bool) {
        tracing::trace!(%id, paused, "countdown pause toggled");
        self.log(DiagnosticEventKind::PauseChanged {
            id: id.clone(),
            paused,
        });
        if !paused {
            // Restart the countdown so the first wake after resume lands on time
            self.arm_countdown(state, id);
        }
    }

    fn arm_countdown(self: &Arc<Self>, state: &mut State<M>, id: &NotificationId) {
        let Some(wait) = state.registry.next_wake(id) else {
            state.cancel_timer(id);
            return;
        };
        let generation = state.next_generation();
        let task = self.runtime.spawn(run_countdown(
            Arc::downgrade(self),
            id.clone(),
            generation,
            wait,
        ));
        state.install_timer(id, generation, task.abort_handle());
    }

    fn arm_exit(self: &Arc<Self>, state: &mut State<M>, id: &NotificationId) {
        let generation = state.next_generation();
        let task = self.runtime.spawn(run_exit(
            Arc::downgrade(self),
            id.clone(),
            generation,
            self.config.exit_transition.as_duration(),
        ));
        state.install_timer(id, generation, task.abort_handle());
    }

    /// Countdown wake. Returns the delay until the next wake, or `None`
    /// when the countdown task should stop.
    fn on_countdown_wake(self: &Arc<Self>, id: &NotificationId, generation: u64) -> Option<Duration> {
        let (next, snapshot) = {
            let mut state = self.lock();
            if !state.owns_timer(id, generation) {
                return None;
            }
            match state.registry.sample(id, Instant::now()) {
                Countdown::Running { next_wake } => (Some(next_wake), self.commit(&mut state)),
                Countdown::Paused => {
                    return Some(self.config.registry.tick_interval.as_duration());
                }
                Countdown::Expired => {
                    // Hand over to the exit timer without aborting ourselves
                    state.timers.remove(id);
                    let expired = Change::Exiting {
                        id: id.clone(),
                        reason: ExitReason::Expired,
                    };
                    self.apply(&mut state, &[expired]);
                    (None, self.commit(&mut state))
                }
                Countdown::Inactive => {
                    state.timers.remove(id);
                    return None;
                }
            }
        };
        self.publish(snapshot);
        next
    }

    /// Exit window elapsed.
    fn on_exit_elapsed(self: &Arc<Self>, id: &NotificationId, generation: u64) {
        let snapshot = {
            let mut state = self.lock();
            if !state.owns_timer(id, generation) {
                return;
            }
            state.timers.remove(id);
            let Some(change) = state.registry.finish_exit(id) else {
                return;
            };
            self.apply(&mut state, &[change]);
            self.commit(&mut state)
        };
        self.publish(snapshot);
    }

    fn commit(&self, state: &mut State<M>) -> Snapshot<M> {
        state.revision += 1;
        Snapshot::new(state.revision, state.registry.snapshot())
    }

    /// Delivers `snapshot` unless a newer one was already handed over.
    ///
    /// One publisher drains at a time. Others leave their snapshot in the
    /// pending slot, so subscribers see strictly increasing revisions and a
    /// listener that mutates the toaster gets the result after it returns.
    fn publish(&self, snapshot: Snapshot<M>) {
        {
            let mut delivery = self.delivery();
            let newest = delivery
                .pending
                .as_ref()
                .map_or(delivery.delivered, Snapshot::revision);
            if snapshot.revision() <= newest {
                return;
            }
            delivery.pending = Some(snapshot);
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }

        let mut guard = DrainGuard {
            delivery: &self.delivery,
            armed: true,
        };
        loop {
            let next = {
                let mut delivery = self.delivery();
                match delivery.pending.take() {
                    Some(next) => {
                        delivery.delivered = next.revision();
                        next
                    }
                    None => {
                        delivery.draining = false;
                        guard.armed = false;
                        return;
                    }
                }
            };
            self.snapshots.send_replace(next.clone());
            self.listeners.notify(&next);
        }
    }

    fn delivery(&self) -> MutexGuard<'_, Delivery<M>> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M> Drop for Shared<M> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.cancel_all();
    }
}

async fn run_countdown<M>(
    weak: Weak<Shared<M>>,
    id: NotificationId,
    generation: u64,
    mut wait: Duration,
) where
    M: Clone + Send + Sync + 'static,
{
    loop {
        time::sleep(wait).await;
        let Some(shared) = weak.upgrade() else {
            return;
        };
        match shared.on_countdown_wake(&id, generation) {
            Some(next) => wait = next,
            None => return,
        }
    }
}

async fn run_exit<M>(weak: Weak<Shared<M>>, id: NotificationId, generation: u64, window: Duration)
where
    M: Clone + Send + Sync + 'static,
{
    time::sleep(window).await;
    if let Some(shared) = weak.upgrade() {
        shared.on_exit_elapsed(&id, generation);
    }
}

#[allow(clippy::cast_possible_truncation)] // Durations in ms fit comfortably in u64
fn duration_millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{BufferCapacity, DiagnosticsCollector};
    use crate::domain::notifications::MaxNotifications;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn toaster(max: usize) -> Toaster<&'static str> {
        Toaster::new(ToasterConfig {
            registry: RegistryConfig {
                max_notifications: MaxNotifications::new(max),
                ..RegistryConfig::default()
            },
            ..ToasterConfig::default()
        })
        .expect("runtime available")
    }

    fn timed(duration: u64) -> NotificationOptions {
        NotificationOptions::new().duration(ms(duration))
    }

    #[test]
    fn new_outside_runtime_fails_loudly() {
        let result = Toaster::<String>::new(ToasterConfig::default());
        assert_eq!(result.err(), Some(Error::NoRuntime));
    }

    #[test]
    fn with_runtime_works_outside_runtime_context() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .expect("runtime");
        let toaster: Toaster<&'static str> =
            Toaster::with_runtime(ToasterConfig::default(), runtime.handle().clone());

        let id = toaster.add("x", timed(100)).expect("open");
        runtime.block_on(async { time::sleep(ms(1000)).await });
        assert!(toaster.snapshot().get(&id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn add_returns_id_synchronously() {
        let toaster = toaster(3);
        let id = toaster.add("hello", timed(1000)).expect("open");

        let snapshot = toaster.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(&id).map(|n| *n.message()), Some("hello"));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_timer_is_tracked_and_released() {
        let toaster = toaster(3);
        let id = toaster.add("x", timed(200)).expect("open");
        assert!(toaster.shared.lock().timers.contains_key(&id));

        time::sleep(ms(600)).await;
        assert!(toaster.snapshot().is_empty());
        assert!(toaster.shared.lock().timers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_notification_has_no_timer() {
        let toaster = toaster(3);
        let id = toaster
            .add("sticky", NotificationOptions::new().persistent())
            .expect("open");
        assert!(!toaster.shared.lock().timers.contains_key(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_every_timer() {
        let toaster = toaster(5);
        toaster.add("a", timed(1000)).expect("open");
        let b = toaster.add("b", timed(1000)).expect("open");
        toaster.remove(&b).expect("open");
        assert_eq!(toaster.shared.lock().timers.len(), 2);

        toaster.clear().expect("open");
        assert!(toaster.shared.lock().timers.is_empty());
        assert!(toaster.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_generation_is_ignored() {
        let toaster = toaster(3);
        let id = toaster.add("x", timed(1000)).expect("open");
        let stale = toaster.shared.lock().timers[&id].generation;
        toaster.pause(&id, true).expect("open");
        toaster.pause(&id, false).expect("open");

        // Resume re-armed the countdown; the old generation no longer owns it
        assert_eq!(toaster.shared.on_countdown_wake(&id, stale), None);
        assert!(toaster.shared.lock().timers.contains_key(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_rejects_further_use() {
        let toaster = toaster(3);
        let id = toaster.add("x", timed(1000)).expect("open");
        let clone = toaster.clone();

        toaster.shutdown();
        toaster.shutdown();

        assert!(clone.is_closed());
        assert_eq!(clone.add("y", timed(1000)), Err(Error::Closed));
        assert_eq!(clone.remove(&id), Err(Error::Closed));
        assert_eq!(clone.pause(&id, true), Err(Error::Closed));
        assert!(matches!(clone.subscribe(|_| {}), Err(Error::Closed)));
        assert!(clone.snapshot().is_empty());
        assert!(toaster.shared.lock().timers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn listeners_see_each_mutation() {
        let toaster = toaster(3);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _subscription = toaster
            .subscribe(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .expect("open");

        let id = toaster.add("x", NotificationOptions::new().persistent()).expect("open");
        toaster.update(&id, "y").expect("open");
        // Unknown ids change nothing and publish nothing
        toaster.remove(&NotificationId::new("ghost")).expect("open");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(toaster.subscriber_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn older_snapshot_is_never_delivered() {
        let toaster = toaster(3);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = toaster
            .subscribe(move |snapshot| {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(snapshot.revision());
            })
            .expect("open");
        let receiver = toaster.watch().expect("open");

        toaster.add("x", NotificationOptions::new().persistent()).expect("open");
        toaster.shared.publish(Snapshot::new(0, Vec::new()));
        toaster.shared.publish(Snapshot::new(1, Vec::new()));

        assert_eq!(*seen.lock().unwrap_or_else(PoisonError::into_inner), [1]);
        assert_eq!(receiver.borrow().revision(), 1);
        assert_eq!(receiver.borrow().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_listener_does_not_stall_delivery() {
        let toaster = toaster(3);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _subscription = toaster
            .subscribe(move |_| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("listener failure");
                }
            })
            .expect("open");

        let first = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            toaster.add("x", NotificationOptions::new().persistent())
        }));
        assert!(first.is_err());

        toaster.add("y", NotificationOptions::new().persistent()).expect("open");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn listener_may_call_back_into_toaster() {
        let toaster = toaster(3);
        let reentrant = toaster.clone();
        let _subscription = toaster
            .subscribe(move |snapshot| {
                // Pause anything new as soon as it shows up
                for notification in snapshot.active() {
                    if !notification.is_paused() {
                        let _ = reentrant.pause(notification.id(), true);
                    }
                }
            })
            .expect("open");

        let id = toaster.add("x", timed(1000)).expect("open");
        assert!(toaster.snapshot().get(&id).expect("entry").is_paused());
    }

    #[tokio::test(start_paused = true)]
    async fn watch_receiver_tracks_latest_snapshot() {
        let toaster = toaster(3);
        let mut receiver = toaster.watch().expect("open");

        toaster.add("x", timed(1000)).expect("open");
        receiver.changed().await.expect("sender alive");
        assert_eq!(receiver.borrow_and_update().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn diagnostics_record_lifecycle() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let toaster: Toaster<&'static str> = Toaster::builder(ToasterConfig::default())
            .diagnostics(collector.handle())
            .build()
            .expect("runtime available");

        let id = toaster.add("x", timed(100)).expect("open");
        time::sleep(ms(500)).await;
        collector.process_pending();

        let kinds: Vec<DiagnosticEventKind> =
            collector.iter().map(|event| event.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticEventKind::Added {
                    id: id.clone(),
                    category: Category::Info,
                    position: crate::notifications::Position::TopRight,
                    auto_dismiss_ms: Some(100),
                },
                DiagnosticEventKind::Exiting {
                    id: id.clone(),
                    reason: ExitReason::Expired,
                },
                DiagnosticEventKind::Removed { id },
            ]
        );

        let stamps: Vec<Instant> = collector.iter().map(|event| event.timestamp).collect();
        assert_eq!(stamps[1] - stamps[0], ms(100));
        assert_eq!(stamps[2] - stamps[1], ms(300));
    }

    #[tokio::test(start_paused = true)]
    async fn update_is_journaled() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let toaster: Toaster<&'static str> = Toaster::builder(ToasterConfig::default())
            .diagnostics(collector.handle())
            .build()
            .expect("runtime available");

        let id = toaster
            .add("Uploading 10%", NotificationOptions::new().persistent())
            .expect("open");
        toaster.update(&id, "Uploading 50%").expect("open");
        toaster
            .update(&NotificationId::new("ghost"), "ignored")
            .expect("open");
        collector.process_pending();

        assert_eq!(collector.len(), 2);
        assert_eq!(
            collector.recent(1).next().map(|event| event.kind.clone()),
            Some(DiagnosticEventKind::PayloadUpdated { id })
        );
        assert_eq!(collector.summary().updated, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_last_handle_cancels_timers() {
        let toaster = toaster(3);
        toaster.add("x", timed(1000)).expect("open");
        let weak = Arc::downgrade(&toaster.shared);
        drop(toaster);

        time::sleep(ms(2000)).await;
        assert!(weak.upgrade().is_none());
    }
}
