//! Homogeneous 4x4 matrix builders used by the transform operations
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{Result, TransformError};

/// Create a translation matrix
pub fn translation(x: f64, y: f64, z: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// Create a scale matrix
pub fn scale(sx: f64, sy: f64, sz: f64) -> Matrix4<f64> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
}

/// Rotation of `angle` degrees about the axis `(x, y, z)`.
///
/// Returns `None` for a zero angle or a zero-length axis, both of which
/// leave points where they are.
pub fn rotation_wxyz(angle: f64, x: f64, y: f64, z: f64) -> Option<Matrix4<f64>> {
    let axis = Vector3::new(x, y, z);
    let length = axis.norm();
    if angle == 0.0 || length == 0.0 {
        return None;
    }
    Some(Matrix4::new_rotation(axis / length * angle.to_radians()))
}

/// Shear x and y in proportion to z, keeping the plane `z = zplane` fixed.
pub fn shear(dxdz: f64, dydz: f64, zplane: f64) -> Matrix4<f64> {
    let mut m = Matrix4::identity();
    m[(0, 2)] = dxdz;
    m[(0, 3)] = -zplane * dxdz;
    m[(1, 2)] = dydz;
    m[(1, 3)] = -zplane * dydz;
    m
}

/// Map `[old_min, old_max]` onto `[new_min, new_max]` as `(scale, offset)`.
fn remap(old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> Result<(f64, f64)> {
    let range = old_max - old_min;
    if is_degenerate(range) {
        return Err(TransformError::NumericDegeneracy("empty source range"));
    }
    let scale = (new_max - new_min) / range;
    let offset = (new_min * old_max - new_max * old_min) / range;
    Ok((scale, offset))
}

/// Remap an x/y window onto another one, leaving z untouched.
#[allow(clippy::too_many_arguments)]
pub fn viewport(
    old_x_min: f64,
    old_x_max: f64,
    old_y_min: f64,
    old_y_max: f64,
    new_x_min: f64,
    new_x_max: f64,
    new_y_min: f64,
    new_y_max: f64,
) -> Result<Matrix4<f64>> {
    let (sx, tx) = remap(old_x_min, old_x_max, new_x_min, new_x_max)?;
    let (sy, ty) = remap(old_y_min, old_y_max, new_y_min, new_y_max)?;

    let mut m = Matrix4::identity();
    m[(0, 0)] = sx;
    m[(0, 3)] = tx;
    m[(1, 1)] = sy;
    m[(1, 3)] = ty;
    Ok(m)
}

/// Remap the z range `[old_near, old_far]` onto `[new_near, new_far]`.
pub fn z_buffer(old_near: f64, old_far: f64, new_near: f64, new_far: f64) -> Result<Matrix4<f64>> {
    let (sz, tz) = remap(old_near, old_far, new_near, new_far)?;

    let mut m = Matrix4::identity();
    m[(2, 2)] = sz;
    m[(2, 3)] = tz;
    Ok(m)
}

/// Whether an extent is too small to divide by. Matches the threshold
/// nalgebra asserts on in its projection constructors.
fn is_degenerate(extent: f64) -> bool {
    extent.abs() <= f64::EPSILON
}

fn check_box(x_min: f64, x_max: f64, y_min: f64, y_max: f64, z_near: f64, z_far: f64) -> Result<()> {
    if is_degenerate(x_max - x_min) || is_degenerate(y_max - y_min) || is_degenerate(z_far - z_near) {
        return Err(TransformError::NumericDegeneracy("empty view volume"));
    }
    Ok(())
}

/// Create an orthographic projection matrix
pub fn ortho(x_min: f64, x_max: f64, y_min: f64, y_max: f64, z_near: f64, z_far: f64) -> Result<Matrix4<f64>> {
    check_box(x_min, x_max, y_min, y_max, z_near, z_far)?;
    Ok(Matrix4::new_orthographic(x_min, x_max, y_min, y_max, z_near, z_far))
}

/// Create an off-axis perspective projection matrix
pub fn frustum(x_min: f64, x_max: f64, y_min: f64, y_max: f64, z_near: f64, z_far: f64) -> Result<Matrix4<f64>> {
    check_box(x_min, x_max, y_min, y_max, z_near, z_far)?;

    let mut m = Matrix4::zeros();
    m[(0, 0)] = 2.0 * z_near / (x_max - x_min);
    m[(1, 1)] = 2.0 * z_near / (y_max - y_min);
    m[(0, 2)] = (x_min + x_max) / (x_max - x_min);
    m[(1, 2)] = (y_min + y_max) / (y_max - y_min);
    m[(2, 2)] = -(z_near + z_far) / (z_far - z_near);
    m[(2, 3)] = -2.0 * z_near * z_far / (z_far - z_near);
    m[(3, 2)] = -1.0;
    Ok(m)
}

/// Create a symmetric perspective projection matrix from a vertical field of view in degrees
pub fn perspective(angle: f64, aspect: f64, z_near: f64, z_far: f64) -> Result<Matrix4<f64>> {
    if is_degenerate(aspect) || angle <= 0.0 || angle >= 180.0 {
        return Err(TransformError::NumericDegeneracy("invalid perspective parameters"));
    }
    let y_max = z_near * (angle.to_radians() / 2.0).tan();
    let x_max = y_max * aspect;
    frustum(-x_max, x_max, -y_max, y_max, z_near, z_far)
}

/// Create a view matrix looking from `position` towards `focal_point`
pub fn look_at(position: &Point3<f64>, focal_point: &Point3<f64>, view_up: &Vector3<f64>) -> Result<Matrix4<f64>> {
    let direction = focal_point - position;
    if direction.norm() == 0.0 || view_up.cross(&direction).norm() == 0.0 {
        return Err(TransformError::NumericDegeneracy("degenerate camera frame"));
    }
    Ok(Matrix4::look_at_rh(position, focal_point, view_up))
}

/// Whether the bottom row is `[0, 0, 0, 1]`.
pub fn is_affine(m: &Matrix4<f64>) -> bool {
    m[(3, 0)] == 0.0 && m[(3, 1)] == 0.0 && m[(3, 2)] == 0.0 && m[(3, 3)] == 1.0
}

pub fn invert(m: &Matrix4<f64>) -> Result<Matrix4<f64>> {
    m.try_inverse().ok_or_else(|| {
        log::warn!("attempted to invert a singular matrix");
        TransformError::NumericDegeneracy("matrix is not invertible")
    })
}

/// Multiply a point through `m` and divide by the homogeneous coordinate.
pub fn apply(m: &Matrix4<f64>, point: &Point3<f64>) -> Result<Point3<f64>> {
    let projected = Point3::from_homogeneous(m * point.to_homogeneous())
        .ok_or(TransformError::NumericDegeneracy("point maps to infinity"))?;
    if projected.iter().all(|c| c.is_finite()) {
        Ok(projected)
    } else {
        Err(TransformError::NumericDegeneracy("point maps to infinity"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rotation_is_skipped() {
        assert!(rotation_wxyz(0.0, 1.0, 0.0, 0.0).is_none());
        assert!(rotation_wxyz(30.0, 0.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn test_rotation_about_z() {
        let m = rotation_wxyz(90.0, 0.0, 0.0, 2.0).unwrap();
        let p = apply(&m, &Point3::new(1.0, 0.0, 0.0)).unwrap();
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_viewport_swap_cancels() {
        let a = viewport(-0.5, 0.5, -0.5, 0.5, -1.0, 1.0, -1.0, 1.0).unwrap();
        let b = viewport(-1.0, 1.0, -1.0, 1.0, -0.5, 0.5, -0.5, 0.5).unwrap();
        assert!((b * a - Matrix4::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_empty_viewport_range() {
        let err = viewport(1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, TransformError::NumericDegeneracy(_)));
    }

    #[test]
    fn test_shear_keeps_plane_fixed() {
        let m = shear(0.2, 0.3, 2.0);
        let on_plane = Point3::new(1.0, -1.0, 2.0);
        assert!((apply(&m, &on_plane).unwrap() - on_plane).norm() < 1e-12);
        let off_plane = apply(&m, &Point3::new(0.0, 0.0, 3.0)).unwrap();
        assert!((off_plane - Point3::new(0.2, 0.3, 3.0)).norm() < 1e-12);
    }

    #[test]
    fn test_frustum_projects_near_plane_corners() {
        let m = frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0).unwrap();
        let corner = apply(&m, &Point3::new(1.0, 1.0, -1.0)).unwrap();
        assert!((corner - Point3::new(1.0, 1.0, -1.0)).norm() < 1e-12);
        assert!(!is_affine(&m));
    }

    #[test]
    fn test_point_at_infinity() {
        let m = frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0).unwrap();
        let err = apply(&m, &Point3::new(0.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, TransformError::NumericDegeneracy(_)));
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let ours = perspective(60.0, 1.5, 0.1, 100.0).unwrap();
        let theirs = Matrix4::new_perspective(1.5, 60f64.to_radians(), 0.1, 100.0);
        assert!((ours - theirs).norm() < 1e-9);
    }

    #[test]
    fn test_near_zero_extents_are_degenerate() {
        for result in [
            perspective(60.0, 1e-20, 0.1, 100.0),
            perspective(60.0, 1.0, 1.0, 1.0 + 1e-17),
            ortho(0.0, 1e-18, -1.0, 1.0, 0.1, 10.0),
            frustum(-1.0, 1.0, -1.0, 1.0, 2.0, 2.0),
        ] {
            assert!(matches!(result, Err(TransformError::NumericDegeneracy(_))));
        }
    }

    #[test]
    fn test_singular_inverse() {
        assert!(invert(&scale(0.0, 1.0, 1.0)).is_err());
        assert!(is_affine(&translation(1.0, 2.0, 3.0)));
    }
}
