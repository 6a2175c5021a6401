//! Forwards the sensor's interrupt line to the sampler.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::digital::Wait;

use crate::config::Edge;
use crate::wake::WakeSignal;

/// Turns edges on the interrupt line into sampler wake-ups.
///
/// The handler does no bus traffic and no logging; it only posts to the [`WakeSignal`].
pub struct InterruptBridge<'a, M: RawMutex> {
    wake: &'a WakeSignal<M>,
}

impl<'a, M: RawMutex> InterruptBridge<'a, M> {
    pub const fn new(wake: &'a WakeSignal<M>) -> Self {
        Self { wake }
    }

    /// Interrupt handler body. Safe to call from any context.
    pub fn on_interrupt(&self) {
        self.wake.notify();
    }

    /// Wait for edges on `line` forever, posting a wake for each one.
    ///
    /// Only returns if the pin reports an error.
    pub async fn forward<P: Wait>(&self, line: &mut P, edge: Edge) -> Result<Infallible, P::Error> {
        loop {
            match edge {
                Edge::Rising => line.wait_for_rising_edge().await?,
                Edge::Falling => line.wait_for_falling_edge().await?,
            }
            self.on_interrupt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    /// Produces a fixed number of edges, then fails.
    struct FakeLine {
        rising: u32,
        falling: u32,
    }

    impl ErrorType for FakeLine {
        type Error = ErrorKind;
    }

    impl Wait for FakeLine {
        async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
            if self.rising == 0 {
                return Err(ErrorKind::Other);
            }
            self.rising -= 1;
            Ok(())
        }

        async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
            if self.falling == 0 {
                return Err(ErrorKind::Other);
            }
            self.falling -= 1;
            Ok(())
        }

        async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
            self.wait_for_rising_edge().await
        }
    }

    #[test]
    fn test_each_edge_posts_a_wake() {
        let wake = WakeSignal::<NoopRawMutex>::new();
        let bridge = InterruptBridge::new(&wake);
        let mut line = FakeLine {
            rising: 4,
            falling: 0,
        };
        let Err(e) = block_on(bridge.forward(&mut line, Edge::Rising));
        assert_eq!(e, ErrorKind::Other);
        // Nobody consumed them, so they merged into one pending wake
        assert_eq!(wake.try_take(), Some(4));
    }

    #[test]
    fn test_listens_on_selected_edge() {
        let wake = WakeSignal::<NoopRawMutex>::new();
        let bridge = InterruptBridge::new(&wake);
        let mut line = FakeLine {
            rising: 3,
            falling: 1,
        };
        let Err(_) = block_on(bridge.forward(&mut line, Edge::Falling));
        assert_eq!(wake.try_take(), Some(1));
        assert_eq!(line.rising, 3);
    }

    #[test]
    fn test_handler_only_posts() {
        let wake = WakeSignal::<NoopRawMutex>::new();
        let bridge = InterruptBridge::new(&wake);
        assert!(!wake.is_pending());
        bridge.on_interrupt();
        assert!(wake.is_pending());
    }
}
