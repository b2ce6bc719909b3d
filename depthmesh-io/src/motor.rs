use std::fmt;

/// Tilt of the sensor head in degrees, always within [`MotorAngle::MIN`]..=[`MotorAngle::MAX`]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct MotorAngle(f64);

impl MotorAngle {
    pub const MIN: f64 = -30.0;
    pub const MAX: f64 = 30.0;

    /// Clamps `degrees` into the motor's range
    pub fn new(degrees: f64) -> Self {
        if degrees.is_nan() {
            return Self::default();
        }
        Self(degrees.clamp(Self::MIN, Self::MAX))
    }

    pub fn degrees(self) -> f64 {
        self.0
    }

    pub fn step(self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }

    pub fn up(self) -> Self {
        self.step(1.0)
    }

    pub fn down(self) -> Self {
        self.step(-1.0)
    }
}

impl fmt::Display for MotorAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_range() {
        assert_eq!(MotorAngle::new(45.0).degrees(), 30.0);
        assert_eq!(MotorAngle::new(-31.0).degrees(), -30.0);
        assert_eq!(MotorAngle::new(12.5).degrees(), 12.5);
        assert_eq!(MotorAngle::new(f64::NAN), MotorAngle::default());
    }

    #[test]
    fn stepping_saturates() {
        let mut angle = MotorAngle::new(29.0);
        angle = angle.up().up().up();
        assert_eq!(angle.degrees(), 30.0);
        angle = MotorAngle::new(-29.5).down().down();
        assert_eq!(angle.degrees(), -30.0);
        assert_eq!(MotorAngle::default().up().to_string(), "1°");
    }
}
