use arbitrary_int::*;
use bitbybit::bitfield;

/// I2C slave address, selected by the level of the SDO pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Address {
    /// SDO tied to GND
    Primary = 0x68,
    /// SDO tied to VDDIO
    Secondary = 0x69,
}

/// Interrupt output pin of the BMI160.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntPin {
    Int1,
    Int2,
}

/// Accelerometer output data rate (ACC_CONF.acc_odr).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelOdr {
    Hz25 = 0x06,
    Hz50 = 0x07,
    Hz100 = 0x08,
    Hz200 = 0x09,
    Hz400 = 0x0A,
    Hz800 = 0x0B,
    Hz1600 = 0x0C,
}

/// Accelerometer full scale range (ACC_RANGE).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelRange {
    G2 = 0x03,
    G4 = 0x05,
    G8 = 0x08,
    G16 = 0x0C,
}

/// Accelerometer filter/averaging setting (ACC_CONF.acc_bwp) in normal mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelBandwidth {
    Osr4 = 0x00,
    Osr2 = 0x01,
    Normal = 0x02,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelConfig {
    pub odr: AccelOdr,
    pub range: AccelRange,
    pub bandwidth: AccelBandwidth,
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            odr: AccelOdr::Hz1600,
            range: AccelRange::G2,
            bandwidth: AccelBandwidth::Normal,
        }
    }
}

/// Interrupt latch duration (INT_LATCH.int_latch).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LatchDuration {
    None = 0,
    Us312 = 1,
    Us625 = 2,
    Ms1_25 = 3,
    Ms2_5 = 4,
    Ms5 = 5,
    Ms10 = 6,
    Ms20 = 7,
    Ms40 = 8,
    Ms80 = 9,
    Ms160 = 10,
    Ms320 = 11,
    Ms640 = 12,
    S1_28 = 13,
    S2_56 = 14,
    Latched = 15,
}

impl LatchDuration {
    const TABLE: [(u32, LatchDuration); 15] = [
        (0, LatchDuration::None),
        (312, LatchDuration::Us312),
        (625, LatchDuration::Us625),
        (1_250, LatchDuration::Ms1_25),
        (2_500, LatchDuration::Ms2_5),
        (5_000, LatchDuration::Ms5),
        (10_000, LatchDuration::Ms10),
        (20_000, LatchDuration::Ms20),
        (40_000, LatchDuration::Ms40),
        (80_000, LatchDuration::Ms80),
        (160_000, LatchDuration::Ms160),
        (320_000, LatchDuration::Ms320),
        (640_000, LatchDuration::Ms640),
        (1_280_000, LatchDuration::S1_28),
        (2_560_000, LatchDuration::S2_56),
    ];

    /// Shortest latch that holds the pin for at least `micros`. Anything longer than 2.56 s
    /// becomes a permanent latch.
    pub fn from_micros(micros: u32) -> Self {
        Self::TABLE
            .iter()
            .find(|(us, _)| *us >= micros)
            .map(|&(_, latch)| latch)
            .unwrap_or(LatchDuration::Latched)
    }
}

/// Electrical behaviour of an interrupt pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntPinConfig {
    pub output_enable: bool,
    /// Open drain when set, push-pull otherwise
    pub open_drain: bool,
    pub active_high: bool,
    pub edge_triggered: bool,
    pub input_enable: bool,
    pub latch: LatchDuration,
}

/// Orientation interrupt settings (INT_ORIENT[0..1]).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OrientIntConfig {
    pub pin: IntPin,
    pub pin_config: IntPinConfig,
    pub mode: u2,
    pub blocking: u2,
    pub hysteresis: u4,
    pub theta: u6,
    pub up_down_enable: bool,
    pub axes_exchange: bool,
}

/// Raw accelerometer sample in LSB.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelData {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl AccelData {
    pub fn from_le_bytes(raw: [u8; 6]) -> Self {
        Self {
            x: i16::from_le_bytes([raw[0], raw[1]]),
            y: i16::from_le_bytes([raw[2], raw[3]]),
            z: i16::from_le_bytes([raw[4], raw[5]]),
        }
    }
}

/// ACC_CONF register (0x40)
#[bitfield(u8, default = 0)]
pub struct AccConf {
    #[bits(0..=3, rw)]
    pub odr: u4,
    #[bits(4..=6, rw)]
    pub bwp: u3,
    /// Undersampling, only meaningful in low power mode
    #[bit(7, rw)]
    pub undersampling: bool,
}

/// PMU_STATUS register (0x03)
#[bitfield(u8, default = 0)]
pub struct PmuStatus {
    #[bits(0..=1, r)]
    pub mag: u2,
    #[bits(2..=3, r)]
    pub gyr: u2,
    /// 0b00 suspend, 0b01 normal, 0b10 low power
    #[bits(4..=5, r)]
    pub acc: u2,
}

/// INT_EN_0 register (0x50)
#[bitfield(u8, default = 0)]
pub struct IntEn0 {
    #[bit(0, rw)]
    pub anymotion_x: bool,
    #[bit(1, rw)]
    pub anymotion_y: bool,
    #[bit(2, rw)]
    pub anymotion_z: bool,
    #[bit(4, rw)]
    pub d_tap: bool,
    #[bit(5, rw)]
    pub s_tap: bool,
    #[bit(6, rw)]
    pub orient: bool,
    #[bit(7, rw)]
    pub flat: bool,
}

/// INT_STATUS_0 register (0x1C)
#[bitfield(u8, default = 0)]
pub struct IntStatus0 {
    #[bit(0, r)]
    pub step: bool,
    #[bit(1, r)]
    pub sigmot: bool,
    #[bit(2, r)]
    pub anym: bool,
    #[bit(3, r)]
    pub pmu_trigger: bool,
    #[bit(4, r)]
    pub d_tap: bool,
    #[bit(5, r)]
    pub s_tap: bool,
    #[bit(6, r)]
    pub orient: bool,
    #[bit(7, r)]
    pub flat: bool,
}

/// INT_STATUS_3 register (0x1F)
#[bitfield(u8, default = 0)]
pub struct IntStatus3 {
    /// Orientation in the x-y plane, see [`OrientXy`]
    #[bits(4..=5, r)]
    pub orient_xy: u2,
    /// Set when z points downwards
    #[bit(6, r)]
    pub orient_z: bool,
    #[bit(7, r)]
    pub flat: bool,
}

/// Orientation reported by the sensor's own detector, INT_STATUS_3.orient_xy
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OrientXy {
    PortraitUpright,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl From<u2> for OrientXy {
    fn from(value: u2) -> Self {
        match value.value() {
            0b00 => OrientXy::PortraitUpright,
            0b01 => OrientXy::PortraitUpsideDown,
            0b10 => OrientXy::LandscapeLeft,
            _ => OrientXy::LandscapeRight,
        }
    }
}

/// Orientation interrupt status.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrientStatus {
    /// Orientation interrupt asserted
    pub triggered: bool,
    pub xy: OrientXy,
    pub z_down: bool,
}

/// INT_OUT_CTRL register (0x53)
#[bitfield(u8, default = 0)]
pub struct IntOutCtrl {
    #[bit(0, rw)]
    pub int1_edge_ctrl: bool,
    #[bit(1, rw)]
    pub int1_lvl: bool,
    #[bit(2, rw)]
    pub int1_od: bool,
    #[bit(3, rw)]
    pub int1_output_en: bool,
    #[bit(4, rw)]
    pub int2_edge_ctrl: bool,
    #[bit(5, rw)]
    pub int2_lvl: bool,
    #[bit(6, rw)]
    pub int2_od: bool,
    #[bit(7, rw)]
    pub int2_output_en: bool,
}

/// INT_LATCH register (0x54)
#[bitfield(u8, default = 0)]
pub struct IntLatch {
    #[bits(0..=3, rw)]
    pub latch: u4,
    #[bit(4, rw)]
    pub int1_input_en: bool,
    #[bit(5, rw)]
    pub int2_input_en: bool,
}

/// INT_MAP_0 (0x55, INT1) and INT_MAP_2 (0x57, INT2) registers
#[bitfield(u8, default = 0)]
pub struct IntMapFeatures {
    #[bit(0, rw)]
    pub lowg_step: bool,
    #[bit(1, rw)]
    pub highg: bool,
    #[bit(2, rw)]
    pub anymotion: bool,
    #[bit(3, rw)]
    pub nomotion: bool,
    #[bit(4, rw)]
    pub d_tap: bool,
    #[bit(5, rw)]
    pub s_tap: bool,
    #[bit(6, rw)]
    pub orient: bool,
    #[bit(7, rw)]
    pub flat: bool,
}

/// INT_ORIENT_0 register (0x65)
#[bitfield(u8, default = 0)]
pub struct IntOrient0 {
    #[bits(0..=1, rw)]
    pub mode: u2,
    #[bits(2..=3, rw)]
    pub blocking: u2,
    #[bits(4..=7, rw)]
    pub hysteresis: u4,
}

/// INT_ORIENT_1 register (0x66)
#[bitfield(u8, default = 0)]
pub struct IntOrient1 {
    #[bits(0..=5, rw)]
    pub theta: u6,
    #[bit(6, rw)]
    pub up_down_enable: bool,
    #[bit(7, rw)]
    pub axes_exchange: bool,
}
