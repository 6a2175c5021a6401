/// Failure of the motion sampler, tagged with the phase it happened in.
#[derive(Debug, PartialEq, Eq)]
pub enum MotionError<E> {
    /// Sensor did not come up
    Initialization(E),
    /// Orientation interrupt could not be programmed
    Configuration(E),
    /// Sample read failed
    Read(E),
}

/// Phase of a [`MotionError`] without the driver error attached.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    Initialization,
    Configuration,
    Read,
}

impl<E> MotionError<E> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MotionError::Initialization(_) => ErrorKind::Initialization,
            MotionError::Configuration(_) => ErrorKind::Configuration,
            MotionError::Read(_) => ErrorKind::Read,
        }
    }

    pub fn into_inner(self) -> E {
        match self {
            MotionError::Initialization(e)
            | MotionError::Configuration(e)
            | MotionError::Read(e) => e,
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for MotionError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            MotionError::Initialization(e) => defmt::write!(f, "initialization failed: {}", e),
            MotionError::Configuration(e) => defmt::write!(f, "configuration failed: {}", e),
            MotionError::Read(e) => defmt::write!(f, "read failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_phase() {
        assert_eq!(MotionError::Initialization(7).kind(), ErrorKind::Initialization);
        assert_eq!(MotionError::Configuration(7).kind(), ErrorKind::Configuration);
        assert_eq!(MotionError::Read(7).kind(), ErrorKind::Read);
        assert_eq!(MotionError::Read("nak").into_inner(), "nak");
    }
}
