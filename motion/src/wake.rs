//! Single-slot wake notification from interrupt context to one task.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

/// Coalescing wake-up. Any number of `notify` calls before the waiter runs collapse into one
/// pending wake; the number of raised events is kept so the waiter can tell how many merged.
pub struct WakeSignal<M: RawMutex> {
    signal: Signal<M, ()>,
    raised: AtomicU32,
}

impl<M: RawMutex> WakeSignal<M> {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
            raised: AtomicU32::new(0),
        }
    }

    /// Post a wake. Never blocks and never fails, so it may be called from an interrupt handler.
    pub fn notify(&self) {
        self.raised.fetch_add(1, Ordering::Relaxed);
        self.signal.signal(());
    }

    /// Wait for a pending wake and consume it.
    ///
    /// Returns how many notifications arrived since the previous consumption, always at least
    /// one. A notification landing between the signal firing and the count being taken is
    /// folded into this wake; the signal it leaves behind carries no events and is skipped.
    pub async fn wait(&self) -> u32 {
        loop {
            self.signal.wait().await;
            let raised = self.raised.swap(0, Ordering::AcqRel);
            if raised > 0 {
                return raised;
            }
        }
    }

    /// Consume a pending wake without waiting.
    pub fn try_take(&self) -> Option<u32> {
        self.signal.try_take()?;
        match self.raised.swap(0, Ordering::AcqRel) {
            0 => None,
            raised => Some(raised),
        }
    }

    /// A signal is set. It may turn out to carry no events, see [`WakeSignal::wait`].
    pub fn is_pending(&self) -> bool {
        self.signal.signaled()
    }
}

impl<M: RawMutex> Default for WakeSignal<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::future::Future;
    use core::pin::pin;
    use core::task::{Context, Waker};
    use embassy_futures::{block_on, join::join, yield_now};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    static WAKE: WakeSignal<CriticalSectionRawMutex> = WakeSignal::new();

    #[test]
    fn test_rapid_notifies_coalesce() {
        let wake = WakeSignal::<CriticalSectionRawMutex>::new();
        for _ in 0..5 {
            wake.notify();
        }
        assert!(wake.is_pending());
        assert_eq!(block_on(wake.wait()), 5);
        assert!(!wake.is_pending());
        assert_eq!(wake.try_take(), None);
    }

    #[test]
    fn test_notify_during_wait_wakes_waiter() {
        let wake = WakeSignal::<CriticalSectionRawMutex>::new();
        let (raised, ()) = block_on(join(wake.wait(), async {
            yield_now().await;
            yield_now().await;
            wake.notify();
        }));
        assert_eq!(raised, 1);
    }

    #[test]
    fn test_each_wait_consumes_one_wake() {
        let wake = WakeSignal::<CriticalSectionRawMutex>::new();
        wake.notify();
        assert_eq!(wake.try_take(), Some(1));
        assert_eq!(wake.try_take(), None);
        wake.notify();
        wake.notify();
        assert_eq!(wake.try_take(), Some(2));
    }

    #[test]
    fn test_notify_from_another_thread() {
        let handle = std::thread::spawn(|| {
            for _ in 0..3 {
                WAKE.notify();
            }
        });
        handle.join().unwrap();
        assert!(block_on(WAKE.wait()) >= 1);
        assert!(!WAKE.is_pending());
    }

    #[test]
    fn test_already_counted_signal_is_skipped() {
        let wake = WakeSignal::<CriticalSectionRawMutex>::new();
        // A notify that raced the previous wait: its event was counted there, its signal stayed
        wake.notify();
        wake.raised.store(0, Ordering::Relaxed);

        let mut cx = Context::from_waker(Waker::noop());
        let mut waiting = pin!(wake.wait());
        assert!(waiting.as_mut().poll(&mut cx).is_pending());
        wake.notify();
        assert_eq!(waiting.as_mut().poll(&mut cx), core::task::Poll::Ready(1));

        wake.notify();
        wake.raised.store(0, Ordering::Relaxed);
        assert_eq!(wake.try_take(), None);
        assert!(!wake.is_pending());
    }
}
