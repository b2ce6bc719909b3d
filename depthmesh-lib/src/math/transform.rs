//! Matrix factories for the row-vector convention used by [`Matrix`].
//!
//! Right-handed variants look down -Z and map depth to `[0, 1]`, left-handed ones
//! look down +Z. Compose left to right: `scale * rotation * translation`.

use glam::Vec3;

use super::matrix::Matrix;

pub fn scaling(sx: f32, sy: f32, sz: f32) -> Matrix {
    let mut m = Matrix::IDENTITY;
    *m.data_at_mut(0, 0) = sx;
    *m.data_at_mut(1, 1) = sy;
    *m.data_at_mut(2, 2) = sz;
    m
}

pub fn translation(x: f32, y: f32, z: f32) -> Matrix {
    let mut m = Matrix::IDENTITY;
    *m.data_at_mut(3, 0) = x;
    *m.data_at_mut(3, 1) = y;
    *m.data_at_mut(3, 2) = z;
    m
}

pub fn rotation_x(angle: f32) -> Matrix {
    let (s, c) = angle.sin_cos();
    Matrix::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, s, 0.0],
        [0.0, -s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotation_y(angle: f32) -> Matrix {
    let (s, c) = angle.sin_cos();
    Matrix::from_rows([
        [c, 0.0, -s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotation_z(angle: f32) -> Matrix {
    let (s, c) = angle.sin_cos();
    Matrix::from_rows([
        [c, s, 0.0, 0.0],
        [-s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Rotation of `angle` radians about `axis`. The axis does not need to be normalized.
pub fn rotation_axis(axis: Vec3, angle: f32) -> Matrix {
    let Vec3 { x, y, z } = axis.normalize_or_zero();
    let (s, c) = angle.sin_cos();
    let d = 1.0 - c;

    Matrix::from_rows([
        [x * x * d + c, x * y * d + z * s, x * z * d - y * s, 0.0],
        [x * y * d - z * s, y * y * d + c, y * z * d + x * s, 0.0],
        [x * z * d + y * s, y * z * d - x * s, z * z * d + c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Basis vectors of a look-at frame: (right, up, forward)
fn look_basis(eye: Vec3, at: Vec3, up: Vec3) -> (Vec3, Vec3, Vec3) {
    let forward = (at - eye).normalize_or_zero();
    let right = up.cross(forward);
    let true_up = forward.cross(right);
    (right.normalize_or_zero(), true_up.normalize_or_zero(), forward)
}

pub fn look_at_lh(eye: Vec3, at: Vec3, up: Vec3) -> Matrix {
    let (r, u, f) = look_basis(eye, at, up);
    Matrix::from_rows([
        [r.x, u.x, f.x, 0.0],
        [r.y, u.y, f.y, 0.0],
        [r.z, u.z, f.z, 0.0],
        [-r.dot(eye), -u.dot(eye), -f.dot(eye), 1.0],
    ])
}

pub fn look_at_rh(eye: Vec3, at: Vec3, up: Vec3) -> Matrix {
    let (r, u, f) = look_basis(eye, at, up);
    Matrix::from_rows([
        [-r.x, u.x, -f.x, 0.0],
        [-r.y, u.y, -f.y, 0.0],
        [-r.z, u.z, -f.z, 0.0],
        [r.dot(eye), -u.dot(eye), f.dot(eye), 1.0],
    ])
}

/// Perspective projection from the near-plane size `w` x `h`
pub fn perspective_rh(w: f32, h: f32, zn: f32, zf: f32) -> Matrix {
    Matrix::from_rows([
        [2.0 * zn / w, 0.0, 0.0, 0.0],
        [0.0, 2.0 * zn / h, 0.0, 0.0],
        [0.0, 0.0, zf / (zn - zf), -1.0],
        [0.0, 0.0, zn * zf / (zn - zf), 0.0],
    ])
}

pub fn perspective_lh(w: f32, h: f32, zn: f32, zf: f32) -> Matrix {
    Matrix::from_rows([
        [2.0 * zn / w, 0.0, 0.0, 0.0],
        [0.0, 2.0 * zn / h, 0.0, 0.0],
        [0.0, 0.0, zf / (zf - zn), 1.0],
        [0.0, 0.0, zn * zf / (zn - zf), 0.0],
    ])
}

/// Perspective projection from a vertical field of view in radians
pub fn perspective_fov_rh(fovy: f32, aspect: f32, zn: f32, zf: f32) -> Matrix {
    let y_scale = 1.0 / (fovy / 2.0).tan();
    Matrix::from_rows([
        [y_scale / aspect, 0.0, 0.0, 0.0],
        [0.0, y_scale, 0.0, 0.0],
        [0.0, 0.0, zf / (zn - zf), -1.0],
        [0.0, 0.0, zn * zf / (zn - zf), 0.0],
    ])
}

pub fn perspective_fov_lh(fovy: f32, aspect: f32, zn: f32, zf: f32) -> Matrix {
    let y_scale = 1.0 / (fovy / 2.0).tan();
    Matrix::from_rows([
        [y_scale / aspect, 0.0, 0.0, 0.0],
        [0.0, y_scale, 0.0, 0.0],
        [0.0, 0.0, zf / (zf - zn), 1.0],
        [0.0, 0.0, zn * zf / (zn - zf), 0.0],
    ])
}

/// Orthographic projection of a `w` x `h` volume centered on the view axis
pub fn ortho_rh(w: f32, h: f32, zn: f32, zf: f32) -> Matrix {
    let mut m = Matrix::IDENTITY;
    *m.data_at_mut(0, 0) = 2.0 / w;
    *m.data_at_mut(1, 1) = 2.0 / h;
    *m.data_at_mut(2, 2) = 1.0 / (zn - zf);
    *m.data_at_mut(3, 2) = zn / (zn - zf);
    m
}

pub fn ortho_lh(w: f32, h: f32, zn: f32, zf: f32) -> Matrix {
    let mut m = Matrix::IDENTITY;
    *m.data_at_mut(0, 0) = 2.0 / w;
    *m.data_at_mut(1, 1) = 2.0 / h;
    *m.data_at_mut(2, 2) = 1.0 / (zf - zn);
    *m.data_at_mut(3, 2) = zn / (zn - zf);
    m
}

/// Orthographic projection of an off-center box, mapping depth to `[-1, 1]`
pub fn ortho_off_center_lh(r: f32, l: f32, t: f32, b: f32, n: f32, f: f32) -> Matrix {
    Matrix::from_rows([
        [2.0 / (r - l), 0.0, 0.0, 0.0],
        [0.0, 2.0 / (t - b), 0.0, 0.0],
        [0.0, 0.0, 2.0 / (f - n), 0.0],
        [
            -(r + l) / (r - l),
            -(t + b) / (t - b),
            -(f + n) / (f - n),
            1.0,
        ],
    ])
}

/// Applies only the upper 3x3 of `m` to `v`
pub fn transform_vector3(v: Vec3, m: &Matrix) -> Vec3 {
    let r = m.rows();
    Vec3::new(
        r[0][0] * v.x + r[1][0] * v.y + r[2][0] * v.z,
        r[0][1] * v.x + r[1][1] * v.y + r[2][1] * v.z,
        r[0][2] * v.x + r[1][2] * v.y + r[2][2] * v.z,
    )
}

/// Applies `m` to `p` as a point (w = 1), without the projective divide
pub fn transform_point3(p: Vec3, m: &Matrix) -> Vec3 {
    let r = m.rows();
    transform_vector3(p, m) + Vec3::new(r[3][0], r[3][1], r[3][2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec4};
    use std::f32::consts::FRAC_PI_2;

    fn row_transform(p: Vec3, m: &Matrix) -> Vec4 {
        let v = p.extend(1.0);
        Vec4::new(
            v.dot(m.col(0)),
            v.dot(m.col(1)),
            v.dot(m.col(2)),
            v.dot(m.col(3)),
        )
    }

    #[test]
    fn translation_moves_points() {
        let m = translation(1.0, 2.0, 3.0);
        assert_eq!(transform_point3(Vec3::ZERO, &m), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform_vector3(Vec3::X, &m), Vec3::X);
    }

    #[test]
    fn composition_applies_left_first() {
        let m = scaling(2.0, 2.0, 2.0) * translation(1.0, 0.0, 0.0);
        let p = transform_point3(Vec3::new(1.0, 0.0, 0.0), &m);
        assert!(p.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn axis_rotation_matches_fixed_axes() {
        for angle in [0.3_f32, -1.2, 2.5] {
            let x = Mat4::from(rotation_axis(Vec3::X, angle));
            let y = Mat4::from(rotation_axis(Vec3::Y * 4.0, angle));
            let z = Mat4::from(rotation_axis(Vec3::Z, angle));
            assert!(x.abs_diff_eq(rotation_x(angle).into(), 1e-5));
            assert!(y.abs_diff_eq(rotation_y(angle).into(), 1e-5));
            assert!(z.abs_diff_eq(rotation_z(angle).into(), 1e-5));
        }
    }

    #[test]
    fn rotation_y_quarter_turn() {
        let p = transform_vector3(Vec3::Z, &rotation_y(FRAC_PI_2));
        assert!(p.abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn look_at_rh_puts_target_on_negative_z() {
        let eye = Vec3::new(0.0, 0.0, 2.0);
        let view = look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let target = transform_point3(Vec3::ZERO, &view);
        assert!(target.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-6));
        let eye_view = transform_point3(eye, &view);
        assert!(eye_view.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn look_at_rh_matches_glam() {
        let eye = Vec3::new(3.0, 1.0, 5.0);
        let at = Vec3::new(-1.0, 0.5, 0.0);
        let ours = Mat4::from(look_at_rh(eye, at, Vec3::Y));
        let theirs = Mat4::look_at_rh(eye, at, Vec3::Y);
        assert!(ours.abs_diff_eq(theirs, 1e-5));
    }

    #[test]
    fn perspective_fov_rh_matches_glam() {
        let ours = Mat4::from(perspective_fov_rh(1.0, 4.0 / 3.0, 0.5, 100.0));
        let theirs = Mat4::perspective_rh(1.0, 4.0 / 3.0, 0.5, 100.0);
        assert!(ours.abs_diff_eq(theirs, 1e-5));
    }

    #[test]
    fn ortho_rh_maps_depth_range() {
        let m = ortho_rh(640.0, 480.0, 0.5, 5000.0);
        let near = row_transform(Vec3::new(320.0, 240.0, -0.5), &m);
        let far = row_transform(Vec3::new(0.0, 0.0, -5000.0), &m);
        assert!(near.abs_diff_eq(Vec4::new(1.0, 1.0, 0.0, 1.0), 1e-5));
        assert!((far.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ortho_off_center_maps_box_to_clip_cube() {
        let m = ortho_off_center_lh(10.0, 0.0, 5.0, -5.0, 1.0, 3.0);
        let corner = row_transform(Vec3::new(10.0, 5.0, 3.0), &m);
        assert!(corner.abs_diff_eq(Vec4::new(1.0, 1.0, 1.0, 1.0), 1e-5));
    }
}
