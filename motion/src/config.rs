//! Build-time configuration of the motion sensor wiring and interrupt programming.
//!
//! Everything here is `const` so a board crate can validate its selection while compiling:
//!
//! ```ignore
//! const INT_PIN: HeaderPin = match MOTION.validate() {
//!     Ok(pin) => pin,
//!     Err(_) => panic!("invalid motion sensor configuration"),
//! };
//! ```

/// Daughterboard the sensor sits on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interface {
    /// E-ink display shield
    EpdShield,
    /// TFT display shield
    TftShield,
    /// Hand wired, interrupt line on the given pin
    Custom(HeaderPin),
}

/// Host pin that receives the sensor's interrupt line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaderPin {
    D8,
    D9,
    A2,
    A3,
    /// GPIO outside the Arduino header
    Port { port: u8, pin: u8 },
}

/// Sensor interrupt output used for orientation events.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntChannel {
    Int1,
    Int2,
}

impl IntChannel {
    pub const fn from_number(channel: u8) -> Result<Self, ConfigError> {
        match channel {
            1 => Ok(IntChannel::Int1),
            2 => Ok(IntChannel::Int2),
            _ => Err(ConfigError::InvalidChannel(channel)),
        }
    }
}

/// Edge of the interrupt line that marks an event on the host side.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    InvalidChannel(u8),
    /// EPD and TFT shields need a board with Arduino headers
    ShieldWithoutHeader,
    HysteresisOutOfRange(u8),
    BlockingOutOfRange(u8),
    ModeOutOfRange(u8),
    ThetaOutOfRange(u8),
    I2cFrequencyTooHigh(u32),
    PriorityOutOfRange(u8),
}

/// Interrupt programming written to the sensor once at start-up.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptConfig {
    pub channel: IntChannel,
    /// Host side edge to listen on; matches `active_high` for edge triggered output
    pub edge: Edge,
    pub output_enable: bool,
    pub push_pull: bool,
    pub active_high: bool,
    pub edge_triggered: bool,
    pub input_enable: bool,
    /// How long the sensor holds the line after an event
    pub latch_us: u32,
    pub axes_exchange: bool,
    /// 0..=3
    pub blocking: u8,
    /// 0..=15
    pub hysteresis: u8,
    /// 0..=3
    pub mode: u8,
    /// 0..=63
    pub theta: u8,
    pub up_down: bool,
}

impl InterruptConfig {
    /// 5 ms active-high pulse on INT1 for every orientation change, including face up/down.
    pub const DEFAULT: Self = Self {
        channel: IntChannel::Int1,
        edge: Edge::Rising,
        output_enable: true,
        push_pull: true,
        active_high: true,
        edge_triggered: true,
        input_enable: false,
        latch_us: 5_000,
        axes_exchange: true,
        blocking: 0,
        hysteresis: 2,
        mode: 0,
        theta: 0,
        up_down: true,
    };

    pub const fn on_channel(self, channel: IntChannel) -> Self {
        Self { channel, ..self }
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.blocking > 3 {
            return Err(ConfigError::BlockingOutOfRange(self.blocking));
        }
        if self.hysteresis > 15 {
            return Err(ConfigError::HysteresisOutOfRange(self.hysteresis));
        }
        if self.mode > 3 {
            return Err(ConfigError::ModeOutOfRange(self.mode));
        }
        if self.theta > 63 {
            return Err(ConfigError::ThetaOutOfRange(self.theta));
        }
        Ok(())
    }
}

impl Default for InterruptConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Highest I2C clock the BMI160 accepts.
pub const MAX_I2C_FREQUENCY_HZ: u32 = 1_000_000;

/// Lowest urgency an interrupt line can be given; lower numbers preempt higher ones.
pub const MAX_INTERRUPT_PRIORITY: u8 = 7;

/// Wiring and interrupt selection for the motion sensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionConfig {
    pub interface: Interface,
    /// Board exposes Arduino compatible headers
    pub arduino_header: bool,
    /// Host interrupt priority for the interrupt line
    pub interrupt_priority: u8,
    pub i2c_frequency_hz: u32,
    pub interrupt: InterruptConfig,
}

impl MotionConfig {
    pub const DEFAULT: Self = Self {
        interface: Interface::TftShield,
        arduino_header: true,
        interrupt_priority: 5,
        i2c_frequency_hz: 400_000,
        interrupt: InterruptConfig::DEFAULT,
    };

    /// Check the whole selection and resolve the host pin wired to the chosen channel.
    pub const fn validate(&self) -> Result<HeaderPin, ConfigError> {
        if let Err(e) = self.interrupt.validate() {
            return Err(e);
        }
        if self.i2c_frequency_hz > MAX_I2C_FREQUENCY_HZ {
            return Err(ConfigError::I2cFrequencyTooHigh(self.i2c_frequency_hz));
        }
        if self.interrupt_priority > MAX_INTERRUPT_PRIORITY {
            return Err(ConfigError::PriorityOutOfRange(self.interrupt_priority));
        }
        self.interrupt_pin()
    }

    pub const fn interrupt_pin(&self) -> Result<HeaderPin, ConfigError> {
        match (self.interface, self.interrupt.channel) {
            (Interface::Custom(pin), _) => Ok(pin),
            _ if !self.arduino_header => Err(ConfigError::ShieldWithoutHeader),
            (Interface::EpdShield, IntChannel::Int1) => Ok(HeaderPin::D9),
            (Interface::EpdShield, IntChannel::Int2) => Ok(HeaderPin::D8),
            (Interface::TftShield, IntChannel::Int1) => Ok(HeaderPin::A2),
            (Interface::TftShield, IntChannel::Int2) => Ok(HeaderPin::A3),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What the sampler does when a sample read fails.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadFailurePolicy {
    /// Treat as fatal, like every other failure
    Halt,
    /// Log, drop this cycle and wait for the next interrupt
    SkipCycle,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    pub read_failure: ReadFailurePolicy,
    /// Sample and report once right after initialization, before the first interrupt
    pub report_on_start: bool,
}

impl SamplerConfig {
    pub const DEFAULT: Self = Self {
        read_failure: ReadFailurePolicy::Halt,
        report_on_start: false,
    };
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
