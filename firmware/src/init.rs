use embassy_nrf::{Peripherals, pac};

use crate::config;

fn configure_internal_capacitors() {
    use pac::oscillators::vals::Intcap;
    // HFXO, 8 pF crystal on the DK
    const CAPACITANCE: f32 = 8.0; // pF
    let mut slope = pac::FICR.xosc32mtrim().read().slope() as i32;
    let offset = pac::FICR.xosc32mtrim().read().offset() as i32;
    if slope >= 16 {
        slope -= 32;
    }
    let m = const { (CAPACITANCE * 2.0) as i32 - 14 };
    let capvalue = (((slope + 56) * m) + ((offset - 8) << 4) + 32) >> 6;
    defmt::trace!("XOSC32MCAPS.CAPVALUE = {=i32}", capvalue);
    pac::OSCILLATORS.xosc32mcaps().write(|w| {
        w.set_capvalue(capvalue as u8);
        w.set_enable(true);
    });

    // LFXO
    pac::OSCILLATORS
        .xosc32ki()
        .intcap()
        .write(|w| w.set_intcap(Intcap::C7PF));
}

pub fn init() -> Peripherals {
    use embassy_nrf::config::{Config, HfclkSource, LfclkSource};

    let mut nrf_config = Config::default();
    nrf_config.hfclk_source = HfclkSource::ExternalXtal;
    nrf_config.lfclk_source = LfclkSource::ExternalXtal;
    nrf_config.gpiote_interrupt_priority = config::GPIOTE_PRIORITY;

    configure_internal_capacitors();
    // Enable instruction cache
    pac::CACHE.enable().write(|w| w.set_enable(true));

    embassy_nrf::init(nrf_config)
}
