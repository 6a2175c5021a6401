#![no_std]
#![no_main]

mod config;
mod init;

use bmi160::types::{AccelConfig, AccelOdr, Address};
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{AnyPin, Input, Pull},
    peripherals,
    twim::{self, Twim},
};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::Delay;
use motion::{
    Bmi160Sensor, BusArbiter, InterruptBridge, Orientation, OrientationSink, Sampler, WakeSignal,
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    SERIAL1 => twim::InterruptHandler<peripherals::SERIAL1>;
});

type SensorBus = BusArbiter<CriticalSectionRawMutex, Twim<'static, peripherals::SERIAL1>>;

static WAKE: WakeSignal<CriticalSectionRawMutex> = WakeSignal::new();
/// Latest orientation for the status surface
static STATUS: Signal<CriticalSectionRawMutex, Orientation> = Signal::new();

struct StatusSink(&'static Signal<CriticalSectionRawMutex, Orientation>);

impl OrientationSink for StatusSink {
    async fn report(&mut self, orientation: Orientation) {
        self.0.signal(orientation);
    }
}

#[embassy_executor::task]
async fn motion_task(bus: &'static SensorBus) {
    let sensor = Bmi160Sensor::new(Address::Primary, Delay).with_accel_config(AccelConfig {
        odr: AccelOdr::Hz100,
        ..Default::default()
    });
    let mut sampler = match Sampler::new(
        bus,
        &WAKE,
        sensor,
        StatusSink(&STATUS),
        config::MOTION.interrupt,
        config::SAMPLER,
    ) {
        Ok(sampler) => sampler,
        Err(e) => {
            defmt::error!("Invalid interrupt configuration: {}", e);
            return;
        }
    };
    let error = sampler.run().await;
    defmt::error!("Motion task halted: {}", error);
}

#[embassy_executor::task]
async fn interrupt_task(mut line: Input<'static>) {
    let bridge = InterruptBridge::new(&WAKE);
    let Err(never) = bridge.forward(&mut line, config::MOTION.interrupt.edge).await;
    match never {}
}

#[embassy_executor::task]
async fn status_task() {
    loop {
        let orientation = STATUS.wait().await;
        defmt::info!("Orientation = {=str}", orientation.label());
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("****************** Water feature controller ******************");
    defmt::info!(
        "Motion sensor on {}, interrupt {} -> {}",
        config::MOTION.interface,
        config::MOTION.interrupt.channel,
        config::INT_PIN
    );

    let p = init::init();

    let mut twim_config = twim::Config::default();
    twim_config.frequency = config::twim_frequency(config::MOTION.i2c_frequency_hz);
    // SAFETY: the bus and interrupt pins are claimed once, here. config.rs rejects overlaps.
    let (sda, scl, int) = unsafe {
        (
            AnyPin::steal(config::SDA_PSEL),
            AnyPin::steal(config::SCL_PSEL),
            AnyPin::steal(config::INT_PSEL),
        )
    };
    let twim = Twim::new(p.SERIAL1, Irqs, sda, scl, twim_config);

    static BUS: StaticCell<SensorBus> = StaticCell::new();
    let bus = BUS.init(BusArbiter::new(twim));

    let pull = if config::MOTION.interrupt.push_pull {
        Pull::None
    } else if config::MOTION.interrupt.active_high {
        Pull::Down
    } else {
        Pull::Up
    };
    let line = Input::new(int, pull);

    spawner.must_spawn(status_task());
    spawner.must_spawn(interrupt_task(line));
    spawner.must_spawn(motion_task(bus));
}
