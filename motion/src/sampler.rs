//! Interrupt driven orientation sampling task.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::bus::BusArbiter;
use crate::config::{ConfigError, InterruptConfig, ReadFailurePolicy, SamplerConfig};
use crate::error::MotionError;
use crate::orientation::{classify, AccelSample, Orientation};
use crate::sensor::MotionSensor;
use crate::wake::WakeSignal;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplerState {
    Uninitialized,
    Initializing,
    WaitingForInterrupt,
    Sampling,
    Reporting,
    /// Terminal, reached on any fatal failure
    Halted,
}

/// Receives every classified orientation. Formatting is up to the implementation.
#[allow(async_fn_in_trait)]
pub trait OrientationSink {
    async fn report(&mut self, orientation: Orientation);
}

pub struct Sampler<'a, M: RawMutex, B, S, R> {
    bus: &'a BusArbiter<M, B>,
    wake: &'a WakeSignal<M>,
    sensor: S,
    sink: R,
    interrupt: InterruptConfig,
    config: SamplerConfig,
    state: SamplerState,
    orientation: Orientation,
    sample: Option<AccelSample>,
}

impl<'a, M, B, S, R> Sampler<'a, M, B, S, R>
where
    M: RawMutex,
    S: MotionSensor<B>,
    R: OrientationSink,
{
    /// Fails if `interrupt` has a field outside its register width.
    pub fn new(
        bus: &'a BusArbiter<M, B>,
        wake: &'a WakeSignal<M>,
        sensor: S,
        sink: R,
        interrupt: InterruptConfig,
        config: SamplerConfig,
    ) -> Result<Self, ConfigError> {
        interrupt.validate()?;
        Ok(Self {
            bus,
            wake,
            sensor,
            sink,
            interrupt,
            config,
            state: SamplerState::Uninitialized,
            orientation: Orientation::Unknown,
            sample: None,
        })
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Last reported orientation, [`Orientation::Unknown`] until the first report.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Advance by one transition and return the new state.
    ///
    /// An error is returned for every failed sensor operation. The sampler is then either
    /// [`SamplerState::Halted`] or, for a read failure under
    /// [`ReadFailurePolicy::SkipCycle`], back to waiting. Stepping a halted sampler does nothing.
    pub async fn step(&mut self) -> Result<SamplerState, MotionError<S::Error>> {
        match self.state {
            SamplerState::Uninitialized => {
                self.state = SamplerState::Initializing;
            }
            SamplerState::Initializing => {
                if let Err(e) = self.bring_up().await {
                    #[cfg(feature = "defmt")]
                    defmt::error!("Motion sensor {} failed, halting", e.kind());
                    self.state = SamplerState::Halted;
                    return Err(e);
                }
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "Motion sensor ready, orientation interrupt on {}",
                    self.interrupt.channel
                );
                self.state = if self.config.report_on_start {
                    SamplerState::Sampling
                } else {
                    SamplerState::WaitingForInterrupt
                };
            }
            SamplerState::WaitingForInterrupt => {
                let _raised = self.wake.wait().await;
                #[cfg(feature = "defmt")]
                if _raised > 1 {
                    defmt::debug!("{=u32} orientation interrupts coalesced", _raised);
                }
                self.state = SamplerState::Sampling;
            }
            SamplerState::Sampling => match self.sample_once().await {
                Ok(sample) => {
                    self.sample = Some(sample);
                    self.state = SamplerState::Reporting;
                }
                Err(e) => {
                    self.state = match self.config.read_failure {
                        ReadFailurePolicy::Halt => {
                            #[cfg(feature = "defmt")]
                            defmt::error!("Motion sensor {} failed, halting", e.kind());
                            SamplerState::Halted
                        }
                        ReadFailurePolicy::SkipCycle => {
                            #[cfg(feature = "defmt")]
                            defmt::warn!("Motion sensor {} failed, skipping cycle", e.kind());
                            SamplerState::WaitingForInterrupt
                        }
                    };
                    return Err(e);
                }
            },
            SamplerState::Reporting => {
                if let Some(sample) = self.sample.take() {
                    self.orientation = classify(sample);
                    #[cfg(feature = "defmt")]
                    defmt::trace!("{} -> {}", sample, self.orientation);
                    self.sink.report(self.orientation).await;
                }
                self.state = SamplerState::WaitingForInterrupt;
            }
            SamplerState::Halted => {}
        }
        Ok(self.state)
    }

    /// Drive the sampler until it halts and return the failure that stopped it.
    ///
    /// Running an already halted sampler parks forever without touching the sensor.
    pub async fn run(&mut self) -> MotionError<S::Error> {
        if self.state == SamplerState::Halted {
            return core::future::pending().await;
        }
        loop {
            match self.step().await {
                Ok(_) => {}
                Err(e) if self.state == SamplerState::Halted => return e,
                Err(_) => {}
            }
        }
    }

    async fn bring_up(&mut self) -> Result<(), MotionError<S::Error>> {
        let bus = self.bus;
        let mut bus = bus.acquire().await;
        self.sensor
            .initialize(&mut *bus)
            .await
            .map_err(MotionError::Initialization)?;
        self.sensor
            .configure_interrupt(&mut *bus, &self.interrupt)
            .await
            .map_err(MotionError::Configuration)
    }

    async fn sample_once(&mut self) -> Result<AccelSample, MotionError<S::Error>> {
        let bus = self.bus;
        let mut bus = bus.acquire().await;
        self.sensor.read(&mut *bus).await.map_err(MotionError::Read)
    }
}
