use glam::{Vec2, Vec3, Vec4};

/// Operations the renderer needs on top of what glam provides.
pub trait VectorExt: Sized + Copy {
    /// Angle to `other` in radians. Both sides are normalized first.
    fn angle_rad(self, other: Self) -> f32;

    /// Angle to `other` in degrees
    fn angle_deg(self, other: Self) -> f32 {
        self.angle_rad(other).to_degrees()
    }

    /// Point halfway between `self` and `other`
    fn middle(self, other: Self) -> Self;

    /// Rescales to `length`. A zero vector is returned unchanged.
    fn scale_normalized(self, length: f32) -> Self;
}

macro_rules! impl_vector_ext {
    ($ty:ty) => {
        impl VectorExt for $ty {
            fn angle_rad(self, other: Self) -> f32 {
                let cos = self
                    .normalize_or_zero()
                    .dot(other.normalize_or_zero())
                    .clamp(-1.0, 1.0);
                cos.acos()
            }

            fn middle(self, other: Self) -> Self {
                (self + other) / 2.0
            }

            fn scale_normalized(self, length: f32) -> Self {
                let l = self.length();
                if l > 0.0 {
                    self / l * length
                } else {
                    self
                }
            }
        }
    };
}

impl_vector_ext!(Vec2);
impl_vector_ext!(Vec3);
impl_vector_ext!(Vec4);

/// Generalized cross product of three 4D vectors: the vector orthogonal to all three,
/// whose components are the signed 3x3 minors. Drives the cofactor expansion in
/// [`Matrix::determinant`](super::Matrix::determinant).
pub fn cross3(a: Vec4, b: Vec4, c: Vec4) -> Vec4 {
    Vec4::new(
        a.y * (b.z * c.w - c.z * b.w) - a.z * (b.y * c.w - c.y * b.w)
            + a.w * (b.y * c.z - b.z * c.y),
        -(a.x * (b.z * c.w - c.z * b.w) - a.z * (b.x * c.w - c.x * b.w)
            + a.w * (b.x * c.z - c.x * b.z)),
        a.x * (b.y * c.w - c.y * b.w) - a.y * (b.x * c.w - c.x * b.w)
            + a.w * (b.x * c.y - c.x * b.y),
        -(a.x * (b.y * c.z - c.y * b.z) - a.y * (b.x * c.z - c.x * b.z)
            + a.z * (b.x * c.y - c.x * b.y)),
    )
}

/// Normalized cross product, zero when the inputs are parallel
pub fn cross_normalized(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_between_axes() {
        assert!((Vec3::X.angle_deg(Vec3::Y) - 90.0).abs() < 1e-4);
        assert!((Vec2::X.angle_deg(-Vec2::X) - 180.0).abs() < 1e-3);
        assert!(Vec4::W.angle_rad(Vec4::W * 3.0).abs() < 1e-3);
    }

    #[test]
    fn zero_vector_is_not_rescaled() {
        assert_eq!(Vec3::ZERO.scale_normalized(5.0), Vec3::ZERO);
        let v = Vec3::new(3.0, 0.0, 4.0).scale_normalized(10.0);
        assert!(v.abs_diff_eq(Vec3::new(6.0, 0.0, 8.0), 1e-5));
    }

    #[test]
    fn cross3_is_orthogonal() {
        let a = Vec4::new(1.0, 2.0, 0.5, -1.0);
        let b = Vec4::new(0.0, 1.0, 3.0, 2.0);
        let c = Vec4::new(-2.0, 0.5, 1.0, 1.0);
        let n = cross3(a, b, c);
        assert!(n.dot(a).abs() < 1e-4);
        assert!(n.dot(b).abs() < 1e-4);
        assert!(n.dot(c).abs() < 1e-4);
    }

    #[test]
    fn parallel_cross_is_zero() {
        assert_eq!(cross_normalized(Vec3::X, Vec3::X * 2.0), Vec3::ZERO);
        assert_eq!(cross_normalized(Vec3::X, Vec3::Y), Vec3::Z);
    }
}
