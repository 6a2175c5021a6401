use embassy_nrf::{interrupt::Priority, twim};
use motion::{
    HeaderPin, IntChannel, Interface, InterruptConfig, MotionConfig, ReadFailurePolicy,
    SamplerConfig,
};

/// Sensor wiring for this build.
pub const MOTION: MotionConfig = MotionConfig {
    interface: Interface::TftShield,
    arduino_header: true,
    interrupt_priority: 5,
    i2c_frequency_hz: 400_000,
    interrupt: InterruptConfig::DEFAULT.on_channel(IntChannel::Int1),
};

pub const SAMPLER: SamplerConfig = SamplerConfig {
    read_failure: ReadFailurePolicy::Halt,
    report_on_start: true,
};

pub const INT_PIN: HeaderPin = match MOTION.validate() {
    Ok(pin) => pin,
    Err(_) => panic!("invalid motion sensor interface/channel selection"),
};

// nRF5340 DK Arduino header, I2C on P1.02/P1.03
pub const SDA_PSEL: u8 = psel(1, 2);
pub const SCL_PSEL: u8 = psel(1, 3);

pub const INT_PSEL: u8 = match INT_PIN {
    HeaderPin::D8 => psel(1, 10),
    HeaderPin::D9 => psel(1, 11),
    HeaderPin::A2 => psel(0, 6),
    HeaderPin::A3 => psel(0, 7),
    HeaderPin::Port { port, pin } => {
        assert!(port <= 1 && pin < 32, "no such GPIO on the nRF5340");
        psel(port, pin)
    }
};

const _: () = assert!(
    INT_PSEL != SDA_PSEL && INT_PSEL != SCL_PSEL,
    "interrupt line collides with the I2C bus"
);

const fn psel(port: u8, pin: u8) -> u8 {
    port * 32 + pin
}

/// Fastest TWIM clock not above the requested one. The TWIM tops out at 400 kHz.
pub const fn twim_frequency(hz: u32) -> twim::Frequency {
    if hz >= 400_000 {
        twim::Frequency::K400
    } else if hz >= 250_000 {
        twim::Frequency::K250
    } else {
        twim::Frequency::K100
    }
}

pub const GPIOTE_PRIORITY: Priority = priority(MOTION.interrupt_priority);

const fn priority(level: u8) -> Priority {
    match level {
        0 => Priority::P0,
        1 => Priority::P1,
        2 => Priority::P2,
        3 => Priority::P3,
        4 => Priority::P4,
        5 => Priority::P5,
        6 => Priority::P6,
        7 => Priority::P7,
        _ => panic!("the nRF5340 has 8 interrupt priority levels"),
    }
}
