use approx::assert_relative_eq;
use nalgebra::Point3;
use xform3d_core::{
    transform_point_set, GeneralTransform, LinearTransform, PerspectiveTransform, PointSet,
    TransformError, TransformFilter, TransformOps, TransformState,
};

const TOLERANCE: f64 = 1e-6;

fn samples() -> Vec<Point3<f64>> {
    PointSet::coverage_box(0.508, 2).points
}

fn base_linear() -> LinearTransform {
    let t = LinearTransform::new();
    t.scale(1.2, 1.0, 0.8);
    t.rotate_x(30.0);
    t.rotate_y(10.0);
    t.rotate_z(80.0);
    t.translate(0.2, 0.3, -0.1);
    t.update().unwrap();
    t
}

fn assert_identity<T: TransformOps>(t: &T) {
    for p in samples() {
        assert_relative_eq!(t.apply(&p).unwrap(), p, epsilon = TOLERANCE);
    }
}

fn assert_same<A: TransformOps, B: TransformOps>(a: &A, b: &B) {
    for p in samples() {
        assert_relative_eq!(a.apply(&p).unwrap(), b.apply(&p).unwrap(), epsilon = TOLERANCE);
    }
}

#[test]
fn test_inverse_round_trip_for_every_kind() {
    let linear = base_linear();

    let perspective = PerspectiveTransform::new();
    perspective.set_input(linear.inverse()).unwrap();
    perspective.shear(0.2, 0.3, 0.0);
    perspective.frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0).unwrap();
    perspective.translate(0.0, 0.0, -5.0);

    let general = GeneralTransform::new();
    general.set_input(&perspective).unwrap();
    general.post_multiply();
    general.concatenate(&linear).unwrap();

    for p in samples() {
        let there = linear.apply(&p).unwrap();
        assert_relative_eq!(linear.inverse().apply(&there).unwrap(), p, epsilon = TOLERANCE);

        let there = perspective.apply(&p).unwrap();
        assert_relative_eq!(perspective.inverse().apply(&there).unwrap(), p, epsilon = TOLERANCE);

        let there = general.apply(&p).unwrap();
        assert_relative_eq!(general.inverse().apply(&there).unwrap(), p, epsilon = TOLERANCE);
    }
}

#[test]
fn test_viewport_adjustments_cancel() {
    let t = PerspectiveTransform::new();
    t.adjust_viewport(-0.5, 0.5, -0.5, 0.5, -1.0, 1.0, -1.0, 1.0).unwrap();
    t.adjust_viewport(-1.0, 1.0, -1.0, 1.0, -0.5, 0.5, -0.5, 0.5).unwrap();
    assert_identity(&t);
}

#[test]
fn test_opposite_operations_cancel() {
    let t = PerspectiveTransform::new();
    t.rotate_wxyz(30.0, 1.0, 1.0, 1.0);
    t.rotate_wxyz(-30.0, 1.0, 1.0, 1.0);
    assert_identity(&t);

    t.scale(2.0, 2.0, 2.0);
    t.scale(0.5, 0.5, 0.5);
    assert_identity(&t);

    t.translate(10.0, 0.1, 0.3);
    t.translate(-10.0, -0.1, -0.3);
    assert_identity(&t);
}

#[test]
fn test_push_pop_restores_mapping() {
    let t = PerspectiveTransform::new();
    t.concatenate(&base_linear()).unwrap();
    let before: Vec<_> = samples().iter().map(|p| t.apply(p).unwrap()).collect();

    t.push().unwrap();
    t.rotate_x(30.0);
    t.rotate_y(10.0);
    t.rotate_z(80.0);
    t.translate(0.1, -0.2, 0.0);
    assert_eq!(t.stack_depth(), 1);
    t.pop().unwrap();
    assert_eq!(t.stack_depth(), 0);

    for (p, expected) in samples().iter().zip(before) {
        assert_relative_eq!(t.apply(p).unwrap(), expected, epsilon = TOLERANCE);
    }
    assert!(matches!(t.pop(), Err(TransformError::InvalidStackOperation(_))));
}

#[test]
fn test_deep_copy_is_independent() {
    let source = PerspectiveTransform::new();
    source.concatenate(&base_linear()).unwrap();
    source.rotate_y(25.0);

    let copy = source.make_transform();
    assert_eq!(copy.state(), TransformState::Uninitialized);
    copy.deep_copy(&source).unwrap();
    assert_same(&copy, &source);

    let snapshot: Vec<_> = samples().iter().map(|p| copy.apply(p).unwrap()).collect();
    source.translate(3.0, 0.0, 0.0);
    source.scale(0.5, 2.0, 1.0);
    for (p, expected) in samples().iter().zip(snapshot) {
        assert_relative_eq!(copy.apply(p).unwrap(), expected, epsilon = TOLERANCE);
    }
}

#[test]
fn test_general_concatenation_with_inverse_cancels() {
    let linear = base_linear();
    let general = GeneralTransform::new();
    general.post_multiply();
    general.concatenate(&linear).unwrap();
    general.concatenate(linear.inverse()).unwrap();
    general.pre_multiply();
    general.concatenate(&linear).unwrap();
    general.concatenate(linear.inverse()).unwrap();
    assert_identity(&general);
}

#[test]
fn test_mutating_input_invalidates_composite() {
    let linear = LinearTransform::new();
    linear.translate(1.0, 0.0, 0.0);
    let perspective = PerspectiveTransform::new();
    perspective.set_input(&linear).unwrap();
    perspective.update().unwrap();
    assert_eq!(perspective.state(), TransformState::Finalized);

    let origin = Point3::origin();
    assert_relative_eq!(perspective.apply(&origin).unwrap(), Point3::new(1.0, 0.0, 0.0), epsilon = TOLERANCE);
    let inverse = perspective.inverse();
    assert_relative_eq!(inverse.apply(&origin).unwrap(), Point3::new(-1.0, 0.0, 0.0), epsilon = TOLERANCE);

    linear.translate(0.0, 2.0, 0.0);
    assert_relative_eq!(perspective.apply(&origin).unwrap(), Point3::new(1.0, 2.0, 0.0), epsilon = TOLERANCE);
    assert_relative_eq!(inverse.apply(&origin).unwrap(), Point3::new(-1.0, -2.0, 0.0), epsilon = TOLERANCE);
}

fn perspective_over_inverse_of_local_linear() -> PerspectiveTransform {
    let linear = base_linear();
    let perspective = PerspectiveTransform::new();
    perspective.set_input(linear.inverse()).unwrap();
    perspective
}

#[test]
fn test_composite_keeps_inverse_input_alive() {
    let perspective = perspective_over_inverse_of_local_linear();
    let reference = base_linear();

    let points = PointSet::coverage_box(0.5, 1);
    let out = transform_point_set(&perspective.as_transform(), &points).unwrap();
    for (p, q) in points.points.iter().zip(&out.points) {
        assert_relative_eq!(reference.apply(q).unwrap(), *p, epsilon = TOLERANCE);
    }
}

#[test]
fn test_filter_without_transform_is_unresolved() {
    let err = TransformFilter::new()
        .execute(&PointSet::coverage_box(0.5, 1))
        .unwrap_err();
    assert!(matches!(err, TransformError::UnresolvedInput(_)));
}

#[test]
fn test_perspective_divide() {
    let t = PerspectiveTransform::new();
    t.perspective(60.0, 1.5, 0.1, 100.0).unwrap();
    t.setup_camera(&Point3::new(0.0, 0.0, 5.0), &Point3::origin(), &nalgebra::Vector3::y())
        .unwrap();

    let p = Point3::new(0.2, -0.1, 0.3);
    let projected = t.apply(&p).unwrap();
    assert!(projected.z > -1.0 && projected.z < 1.0);
    assert_relative_eq!(t.inverse().apply(&projected).unwrap(), p, epsilon = TOLERANCE);

    // the camera position itself has no finite image
    assert!(matches!(
        t.apply(&Point3::new(0.0, 0.0, 5.0)),
        Err(TransformError::NumericDegeneracy(_))
    ));
}
