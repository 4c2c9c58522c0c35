//! Push-on-change publication of buffer state
//!
//! After every write the buffer builds an immutable [`Window`] and hands it to
//! a [`WindowPublisher`], which fans it out to every [`Subscription`] over
//! bounded crossbeam channels. Subscribers never see live ring storage: a
//! window is an `Arc<[Sample]>` that was fully built before it was published.
//!
//! Delivery never blocks the producer. When a subscriber's queue is full its
//! oldest pending *window* is discarded to make room, so the newest state is
//! always delivered and [`Subscription::latest_window`] converges on it.
//! Recording flag changes are not evicted while a window can go instead, and
//! the current flag is also kept as a conflated value readable through
//! [`Subscription::is_recording`]. Every window carries a generation number;
//! the publisher skips windows older than one it already sent, so racing
//! writers cannot make a subscriber regress.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};

use crate::types::{Axis, Sample};

/// Default per-subscriber queue depth
pub const DEFAULT_SUBSCRIBER_QUEUE_DEPTH: usize = 16;

/// Chronologically ordered (oldest first) view of the ring contents
#[derive(Debug, Clone)]
pub struct Window {
    generation: u64,
    samples: Arc<[Sample]>,
}

impl Default for Window {
    fn default() -> Self {
        Self::empty(0)
    }
}

impl Window {
    /// Build a window from already-ordered samples
    pub fn new(generation: u64, samples: Vec<Sample>) -> Self {
        Self {
            generation,
            samples: samples.into(),
        }
    }

    /// An empty window
    pub fn empty(generation: u64) -> Self {
        Self {
            generation,
            samples: Arc::from(Vec::new()),
        }
    }

    /// Monotonic publication counter; higher is newer
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Most recent sample in the window
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Values of a single axis, oldest first
    pub fn axis_values(&self, axis: Axis) -> Vec<f32> {
        self.samples.iter().map(|s| s.axis(axis)).collect()
    }

    /// `[index, value]` pairs for drawing one axis as a line chart
    pub fn plot_points(&self, axis: Axis) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| [i as f64, s.axis(axis) as f64])
            .collect()
    }

    /// Copy the samples out into an owned vector
    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.to_vec()
    }
}

impl PartialEq for Window {
    /// Windows compare by content; the generation is bookkeeping
    fn eq(&self, other: &Self) -> bool {
        self.samples == other.samples
    }
}

impl<'a> IntoIterator for &'a Window {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Events pushed to subscribers
#[derive(Debug, Clone)]
pub enum BufferEvent {
    /// A new window was published (after a write or a clear)
    Window(Window),
    /// The recording flag changed
    Recording(bool),
}

#[derive(Debug)]
struct SubscriberSlot {
    tx: Sender<BufferEvent>,
    // Publisher-side handle on the same queue, used for eviction
    evict: Receiver<BufferEvent>,
    alive: Weak<()>,
}

#[derive(Debug, Default)]
struct PublisherState {
    subscribers: Vec<SubscriberSlot>,
    last_generation: u64,
}

/// Fans events out to registered subscribers
#[derive(Debug)]
pub struct WindowPublisher {
    state: Mutex<PublisherState>,
    recording: Arc<AtomicBool>,
    queue_depth: usize,
}

impl Default for WindowPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_QUEUE_DEPTH)
    }
}

impl WindowPublisher {
    /// Create a publisher whose subscribers buffer up to `queue_depth` events
    pub fn new(queue_depth: usize) -> Self {
        Self {
            state: Mutex::new(PublisherState::default()),
            recording: Arc::new(AtomicBool::new(false)),
            queue_depth: queue_depth.max(1),
        }
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = bounded(self.queue_depth);
        let alive = Arc::new(());
        self.lock_state().subscribers.push(SubscriberSlot {
            tx,
            evict: rx.clone(),
            alive: Arc::downgrade(&alive),
        });
        tracing::debug!("Subscriber registered (queue depth {})", self.queue_depth);
        Subscription {
            rx,
            recording: self.recording.clone(),
            pending: Mutex::new(Pending::default()),
            _alive: alive,
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.lock_state();
        state.subscribers.retain(|slot| slot.alive.strong_count() > 0);
        state.subscribers.len()
    }

    /// Publish a window unless a newer one has already gone out
    pub fn publish_window(&self, window: Window) {
        let mut state = self.lock_state();
        if window.generation() <= state.last_generation {
            tracing::trace!(
                "Skipping stale window {} (already published {})",
                window.generation(),
                state.last_generation
            );
            return;
        }
        state.last_generation = window.generation();
        Self::deliver(&mut state.subscribers, BufferEvent::Window(window));
    }

    /// Publish a recording flag change
    pub fn publish_recording(&self, recording: bool) {
        let mut state = self.lock_state();
        self.recording.store(recording, Ordering::Release);
        Self::deliver(&mut state.subscribers, BufferEvent::Recording(recording));
    }

    fn deliver(subscribers: &mut Vec<SubscriberSlot>, event: BufferEvent) {
        subscribers.retain(|slot| {
            if slot.alive.strong_count() == 0 {
                tracing::debug!("Subscriber dropped, removing");
                return false;
            }
            match slot.tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(event)) => {
                    Self::evict_oldest_window(slot);
                    if slot.tx.try_send(event).is_err() {
                        tracing::trace!("Subscriber queue still full, dropping event");
                    }
                }
                Err(TrySendError::Disconnected(_)) => return false,
            }
            true
        });
    }

    /// Make room in a full queue, keeping recording flag changes when possible
    ///
    /// Only the publisher sends on the queue and deliveries are serialized by
    /// the state lock, so re-queueing the survivors keeps their order.
    fn evict_oldest_window(slot: &SubscriberSlot) {
        let queued: Vec<BufferEvent> = slot.evict.try_iter().collect();
        // With no window queued the oldest flag change goes; the current flag
        // stays readable through `Subscription::is_recording`
        let victim = queued
            .iter()
            .position(|event| matches!(event, BufferEvent::Window(_)))
            .unwrap_or(0);
        for (i, event) in queued.into_iter().enumerate() {
            if i != victim {
                let _ = slot.tx.try_send(event);
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PublisherState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Events one `latest_*` call drained on behalf of the other
#[derive(Debug, Default)]
struct Pending {
    window: Option<Window>,
    recording: Option<bool>,
}

fn newer(current: Option<Window>, candidate: Window) -> Option<Window> {
    match current {
        Some(window) if window.generation() >= candidate.generation() => Some(window),
        _ => Some(candidate),
    }
}

/// Consumer-side handle for buffer events
///
/// [`latest_window`](Self::latest_window) and
/// [`latest_recording`](Self::latest_recording) each drain the queue and keep
/// the events of the other kind for the next call, so neither loses updates.
/// The raw [`try_recv`](Self::try_recv), [`recv_timeout`](Self::recv_timeout)
/// and [`drain`](Self::drain) read the queue directly.
#[derive(Debug)]
pub struct Subscription {
    rx: Receiver<BufferEvent>,
    recording: Arc<AtomicBool>,
    pending: Mutex<Pending>,
    _alive: Arc<()>,
}

impl Subscription {
    /// Try to receive a single event without blocking
    pub fn try_recv(&self) -> Option<BufferEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event
    ///
    /// Returns `None` on timeout or when the buffer has been dropped.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<BufferEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drain all pending events
    pub fn drain(&self) -> Vec<BufferEvent> {
        self.rx.try_iter().collect()
    }

    /// Current recording flag of the buffer
    ///
    /// Always reflects the last published change, even if the change event
    /// itself was never read.
    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Acquire)
    }

    /// Newest window published since the last call, if any
    pub fn latest_window(&self) -> Option<Window> {
        let mut pending = self.lock_pending();
        let mut latest = pending.window.take();
        for event in self.rx.try_iter() {
            match event {
                BufferEvent::Window(window) => latest = newer(latest, window),
                BufferEvent::Recording(flag) => pending.recording = Some(flag),
            }
        }
        latest
    }

    /// Last recording flag change published since the last call, if any
    pub fn latest_recording(&self) -> Option<bool> {
        let mut pending = self.lock_pending();
        let mut latest = pending.recording.take();
        for event in self.rx.try_iter() {
            match event {
                BufferEvent::Recording(flag) => latest = Some(flag),
                BufferEvent::Window(window) => {
                    pending.window = newer(pending.window.take(), window);
                }
            }
        }
        latest
    }

    fn lock_pending(&self) -> MutexGuard<'_, Pending> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(generation: u64, n: i64) -> Window {
        Window::new(
            generation,
            (0..n).map(|i| Sample::new(i, i as f32, 0.0, 0.0)).collect(),
        )
    }

    #[test]
    fn test_window_accessors() {
        let w = window(3, 4);
        assert_eq!(w.generation(), 3);
        assert_eq!(w.len(), 4);
        assert_eq!(w.latest().map(|s| s.timestamp), Some(3));
        assert_eq!(w.axis_values(Axis::X), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(w.plot_points(Axis::X)[2], [2.0, 2.0]);
        assert!(Window::default().is_empty());
    }

    #[test]
    fn test_window_equality_ignores_generation() {
        assert_eq!(window(1, 2), window(9, 2));
        assert_ne!(window(1, 2), window(1, 3));
    }

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let publisher = WindowPublisher::new(4);
        let a = publisher.subscribe();
        let b = publisher.subscribe();

        publisher.publish_recording(true);

        assert!(matches!(a.try_recv(), Some(BufferEvent::Recording(true))));
        assert!(matches!(b.try_recv(), Some(BufferEvent::Recording(true))));
    }

    #[test]
    fn test_full_queue_evicts_oldest() {
        let publisher = WindowPublisher::new(2);
        let sub = publisher.subscribe();

        for g in 1..=5 {
            publisher.publish_window(window(g, g as i64));
        }

        // Only the two newest survive; the subscriber stays registered
        let generations: Vec<u64> = sub
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                BufferEvent::Window(w) => Some(w.generation()),
                BufferEvent::Recording(_) => None,
            })
            .collect();
        assert_eq!(generations, vec![4, 5]);
        assert_eq!(publisher.subscriber_count(), 1);
    }

    #[test]
    fn test_stale_window_skipped() {
        let publisher = WindowPublisher::new(8);
        let sub = publisher.subscribe();

        publisher.publish_window(window(2, 2));
        publisher.publish_window(window(4, 4));
        publisher.publish_window(window(3, 3));

        assert_eq!(sub.drain().len(), 2);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let publisher = WindowPublisher::default();
        let sub = publisher.subscribe();
        assert_eq!(publisher.subscriber_count(), 1);

        drop(sub);
        publisher.publish_recording(false);
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn test_latest_window_picks_highest_generation() {
        let publisher = WindowPublisher::new(8);
        let sub = publisher.subscribe();

        publisher.publish_window(window(2, 2));
        publisher.publish_window(window(4, 4));
        publisher.publish_recording(true);

        let latest = sub.latest_window().expect("window published");
        assert_eq!(latest.generation(), 4);
        assert_eq!(latest.len(), 4);
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_latest_recording() {
        let publisher = WindowPublisher::new(8);
        let sub = publisher.subscribe();

        publisher.publish_recording(true);
        publisher.publish_window(window(1, 1));
        publisher.publish_recording(false);

        assert_eq!(sub.latest_recording(), Some(false));
        assert_eq!(sub.latest_recording(), None);
    }

    #[test]
    fn test_full_queue_keeps_recording_change() {
        let publisher = WindowPublisher::new(4);
        let sub = publisher.subscribe();

        publisher.publish_recording(true);
        for g in 1..=10 {
            publisher.publish_window(window(g, 1));
        }

        assert!(sub.is_recording());
        assert_eq!(sub.latest_recording(), Some(true));
        assert_eq!(sub.latest_window().map(|w| w.generation()), Some(10));
    }

    #[test]
    fn test_queue_of_only_flags_drops_oldest_flag() {
        let publisher = WindowPublisher::new(2);
        let sub = publisher.subscribe();

        publisher.publish_recording(true);
        publisher.publish_recording(false);
        publisher.publish_recording(true);

        let flags: Vec<bool> = sub
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                BufferEvent::Recording(flag) => Some(flag),
                BufferEvent::Window(_) => None,
            })
            .collect();
        assert_eq!(flags, vec![false, true]);
        assert!(sub.is_recording());
    }

    #[test]
    fn test_latest_calls_keep_each_others_events() {
        let publisher = WindowPublisher::new(8);
        let sub = publisher.subscribe();

        publisher.publish_window(window(1, 1));
        publisher.publish_recording(true);
        publisher.publish_window(window(2, 2));

        assert_eq!(sub.latest_window().map(|w| w.generation()), Some(2));
        assert_eq!(sub.latest_recording(), Some(true));

        publisher.publish_window(window(3, 3));
        publisher.publish_recording(false);
        assert_eq!(sub.latest_recording(), Some(false));
        assert_eq!(sub.latest_window().map(|w| w.generation()), Some(3));
        assert_eq!(sub.latest_window(), None);
    }

    #[test]
    fn test_recv_timeout_expires() {
        let publisher = WindowPublisher::default();
        let sub = publisher.subscribe();
        assert!(sub.recv_timeout(Duration::from_millis(5)).is_none());
    }
}
