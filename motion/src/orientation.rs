//! Dominant-axis orientation classification.

/// One raw accelerometer reading.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl AccelSample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }
}

/// Which face or edge of the board points towards the ceiling.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// Nothing classified yet
    #[default]
    Unknown,
    TopEdgeUp,
    BottomEdgeUp,
    /// USB connector side up
    LeftEdgeUp,
    RightEdgeUp,
    /// Display faces the ceiling
    FaceUp,
    /// Display faces the ground
    FaceDown,
}

impl Orientation {
    /// Short label shown on the status surface.
    pub const fn label(self) -> &'static str {
        match self {
            Orientation::Unknown => "NULL",
            Orientation::TopEdgeUp => "TOP_EDGE",
            Orientation::BottomEdgeUp => "BOTTOM_EDGE",
            Orientation::LeftEdgeUp => "LEFT_EDGE",
            Orientation::RightEdgeUp => "RIGHT_EDGE",
            Orientation::FaceUp => "DISP_UP",
            Orientation::FaceDown => "DISP_DOWN",
        }
    }
}

/// Classify a sample by the axis most aligned with gravity.
///
/// Z is checked first, then Y, both with strict comparisons; every tie falls through to the
/// X branch and is resolved by the sign of x. No filtering or unit conversion is applied.
pub fn classify(sample: AccelSample) -> Orientation {
    let abs_x = sample.x.unsigned_abs();
    let abs_y = sample.y.unsigned_abs();
    let abs_z = sample.z.unsigned_abs();

    if abs_z > abs_x && abs_z > abs_y {
        // Z is normal to the display
        if sample.z < 0 {
            Orientation::FaceDown
        } else {
            Orientation::FaceUp
        }
    } else if abs_y > abs_x && abs_y > abs_z {
        // Y runs along the short edge
        if sample.y > 0 {
            Orientation::BottomEdgeUp
        } else {
            Orientation::TopEdgeUp
        }
    } else if sample.x < 0 {
        Orientation::RightEdgeUp
    } else {
        Orientation::LeftEdgeUp
    }
}
