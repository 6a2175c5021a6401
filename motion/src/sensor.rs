use crate::config::InterruptConfig;
use crate::orientation::AccelSample;

/// Accelerometer that can raise an orientation interrupt.
///
/// Every call receives the bus for its duration only; the caller owns arbitration.
#[allow(async_fn_in_trait)]
pub trait MotionSensor<B> {
    type Error;

    /// Bring the sensor up. Called once before anything else.
    async fn initialize(&mut self, bus: &mut B) -> Result<(), Self::Error>;

    /// Enable the orientation interrupt and route it to the configured output.
    async fn configure_interrupt(
        &mut self,
        bus: &mut B,
        config: &InterruptConfig,
    ) -> Result<(), Self::Error>;

    async fn read(&mut self, bus: &mut B) -> Result<AccelSample, Self::Error>;
}
