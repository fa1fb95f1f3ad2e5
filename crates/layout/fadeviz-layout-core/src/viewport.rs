//! Viewport-resize notifications.
//!
//! The host polls [`ViewportWatcher::poll`] once per tick with the current
//! screen size. Subscribers run only when the size actually changed. Each
//! subscription is removed by its [`SubscriptionId`], so whoever subscribed
//! can unsubscribe deterministically when it is torn down.

use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::geometry::Size;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

type Callback = Box<dyn FnMut(Size)>;

#[derive(Default)]
pub struct ViewportWatcher {
    last: Option<Size>,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl ViewportWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(Size) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Record the current screen size; notifies subscribers and returns `true`
    /// if it differs from the last one seen. The first poll always notifies.
    pub fn poll(&mut self, screen: Size) -> bool {
        if self.last == Some(screen) {
            return false;
        }
        self.last = Some(screen);
        trace!(
            "viewport changed to {}x{}, {} subscribers",
            screen.width,
            screen.height,
            self.subscribers.len()
        );
        for (_, callback) in self.subscribers.iter_mut() {
            callback(screen);
        }
        true
    }

    pub fn last(&self) -> Option<Size> {
        self.last
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for ViewportWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportWatcher")
            .field("last", &self.last)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
