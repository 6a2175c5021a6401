//! Exclusive access to the shared sensor bus.

use core::ops::{Deref, DerefMut};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};

/// Owns the shared bus and hands it out to one holder at a time.
///
/// Waiting for the bus suspends the task; it never spins. Waiters are not served in FIFO order.
pub struct BusArbiter<M: RawMutex, B> {
    bus: Mutex<M, B>,
}

/// Exclusive ownership of the bus. Dropping the token releases it, on every exit path.
pub struct BusToken<'a, M: RawMutex, B> {
    guard: MutexGuard<'a, M, B>,
}

impl<M: RawMutex, B> BusArbiter<M, B> {
    pub const fn new(bus: B) -> Self {
        Self {
            bus: Mutex::new(bus),
        }
    }

    /// Wait until the bus is free and take it.
    pub async fn acquire(&self) -> BusToken<'_, M, B> {
        let guard = self.bus.lock().await;
        #[cfg(feature = "defmt")]
        defmt::trace!("bus acquired");
        BusToken { guard }
    }

    /// Take the bus only if nobody holds it right now.
    pub fn try_acquire(&self) -> Option<BusToken<'_, M, B>> {
        self.bus.try_lock().ok().map(|guard| BusToken { guard })
    }

    pub fn into_inner(self) -> B {
        self.bus.into_inner()
    }
}

impl<M: RawMutex, B> Deref for BusToken<'_, M, B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.guard
    }
}

impl<M: RawMutex, B> DerefMut for BusToken<'_, M, B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::future::Future;
    use core::pin::pin;
    use core::task::{Context, Poll, Waker};
    use embassy_futures::{block_on, join::join3, yield_now};
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    struct Bus {
        transfers: u32,
    }

    async fn transfer(
        arbiter: &BusArbiter<NoopRawMutex, Bus>,
        holders: &Cell<u32>,
        peak: &Cell<u32>,
    ) {
        let mut bus = arbiter.acquire().await;
        holders.set(holders.get() + 1);
        peak.set(peak.get().max(holders.get()));
        // Give the other callers a chance to barge in
        for _ in 0..3 {
            yield_now().await;
        }
        bus.transfers += 1;
        holders.set(holders.get() - 1);
    }

    #[test]
    fn test_concurrent_callers_never_overlap() {
        let arbiter = BusArbiter::<NoopRawMutex, _>::new(Bus { transfers: 0 });
        let holders = Cell::new(0);
        let peak = Cell::new(0);
        block_on(join3(
            transfer(&arbiter, &holders, &peak),
            transfer(&arbiter, &holders, &peak),
            transfer(&arbiter, &holders, &peak),
        ));
        assert_eq!(peak.get(), 1);
        assert_eq!(arbiter.into_inner().transfers, 3);
    }

    #[test]
    fn test_release_unblocks_one_waiter() {
        let arbiter = BusArbiter::<NoopRawMutex, _>::new(Bus { transfers: 0 });
        let mut cx = Context::from_waker(Waker::noop());

        let token = arbiter.try_acquire().unwrap();
        let mut a = pin!(arbiter.acquire());
        let mut b = pin!(arbiter.acquire());
        assert!(a.as_mut().poll(&mut cx).is_pending());
        assert!(b.as_mut().poll(&mut cx).is_pending());

        drop(token);
        let Poll::Ready(first) = a.as_mut().poll(&mut cx) else {
            panic!("waiter was not unblocked");
        };
        assert!(b.as_mut().poll(&mut cx).is_pending());

        drop(first);
        assert!(b.as_mut().poll(&mut cx).is_ready());
    }

    #[test]
    fn test_failed_critical_section_releases() {
        #[derive(Debug, PartialEq)]
        struct Nak;

        async fn failing(arbiter: &BusArbiter<CriticalSectionRawMutex, Bus>) -> Result<(), Nak> {
            let mut bus = arbiter.acquire().await;
            bus.transfers += 1;
            Err::<(), _>(Nak)?;
            bus.transfers += 1;
            Ok(())
        }

        let arbiter = BusArbiter::<CriticalSectionRawMutex, _>::new(Bus { transfers: 0 });
        assert_eq!(block_on(failing(&arbiter)), Err(Nak));
        let bus = arbiter.try_acquire().expect("bus stranded after failure");
        assert_eq!(bus.transfers, 1);
    }

    #[test]
    fn test_try_acquire_while_held() {
        let arbiter = BusArbiter::<NoopRawMutex, _>::new(Bus { transfers: 0 });
        let held = arbiter.try_acquire();
        assert!(held.is_some());
        assert!(arbiter.try_acquire().is_none());
        drop(held);
        assert!(arbiter.try_acquire().is_some());
    }
}
