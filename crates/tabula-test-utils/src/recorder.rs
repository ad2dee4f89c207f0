//! Capture signal emissions for assertions.

use std::rc::Rc;

use parking_lot::Mutex;
use tabula_grid::{Signal, SubscriptionId};

/// Records every value emitted on one [`Signal`].
///
/// ```rust
/// use tabula_grid::Signal;
/// use tabula_test_utils::EventRecorder;
///
/// let signal = Signal::<u32>::new();
/// let recorder = EventRecorder::attach(&signal);
///
/// signal.emit(&1);
/// signal.emit(&2);
/// assert_eq!(recorder.events(), vec![1, 2]);
///
/// recorder.detach(&signal);
/// signal.emit(&3);
/// assert_eq!(recorder.len(), 2);
/// ```
pub struct EventRecorder<T> {
    events: Rc<Mutex<Vec<T>>>,
    subscription: SubscriptionId,
}

impl<T: Clone + 'static> EventRecorder<T> {
    /// Subscribe to `signal` and start recording.
    pub fn attach(signal: &Signal<T>) -> Self {
        let events = Rc::new(Mutex::new(Vec::new()));
        let sink = Rc::clone(&events);
        let subscription = signal.subscribe(move |value: &T| sink.lock().push(value.clone()));
        Self {
            events,
            subscription,
        }
    }

    /// Stop recording. Already captured events are kept.
    pub fn detach(&self, signal: &Signal<T>) -> bool {
        signal.unsubscribe(self.subscription)
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<T> {
        self.events.lock().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn last(&self) -> Option<T> {
        self.events.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}
