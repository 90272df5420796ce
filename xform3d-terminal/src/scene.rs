//! The transform chains exercised by the coverage run

use xform3d_core::{
    GeneralTransform, LinearTransform, PerspectiveTransform, Result, Transform, TransformOps,
};

/// A named transform to push the sample points through.
#[derive(Debug, Clone)]
pub struct Panel {
    pub name: &'static str,
    pub transform: Transform,
}

/// Four transforms built so that most of their steps cancel out.
///
/// `general` ends up equivalent to `perspective`, and `perspective` is left
/// exactly as it was before its push/pop block.
#[derive(Debug)]
pub struct CoverageScene {
    pub linear: LinearTransform,
    pub perspective: PerspectiveTransform,
    /// Copy of `perspective` taken while the extra frame was pushed.
    pub copy: PerspectiveTransform,
    pub general: GeneralTransform,
    /// Copy of `perspective` taken just before the push.
    pub checkpoint: PerspectiveTransform,
}

impl CoverageScene {
    pub fn build() -> Result<Self> {
        let linear = LinearTransform::new();
        linear.scale(1.2, 1.0, 0.8);
        linear.rotate_x(30.0);
        linear.rotate_y(10.0);
        linear.rotate_z(80.0);
        linear.translate(0.2, 0.3, -0.1);
        linear.update()?;

        let perspective = PerspectiveTransform::new();
        perspective.set_input(&linear)?;
        perspective.set_input(linear.inverse())?;
        perspective.scale(2.0, 2.0, 2.0);
        // these two cancel
        perspective.adjust_viewport(-0.5, 0.5, -0.5, 0.5, -1.0, 1.0, -1.0, 1.0)?;
        perspective.adjust_viewport(-1.0, 1.0, -1.0, 1.0, -0.5, 0.5, -0.5, 0.5)?;
        perspective.shear(0.2, 0.3, 0.0);
        perspective.update()?;
        cancelling_steps(&perspective);
        perspective.concatenate(&linear)?;

        let checkpoint = perspective.make_transform();
        checkpoint.deep_copy(&perspective)?;

        perspective.push()?;
        perspective.rotate_x(30.0);
        perspective.rotate_y(10.0);
        perspective.rotate_z(80.0);
        perspective.translate(0.1, -0.2, 0.0);

        let copy = perspective.make_transform();
        copy.deep_copy(&perspective)?;
        perspective.pop()?;

        let general = GeneralTransform::new();
        general.set_input(&linear)?;
        general.set_input(&perspective)?;
        general.post_multiply();
        general.concatenate(&copy)?;
        general.concatenate(copy.inverse())?;
        general.pre_multiply();
        cancelling_steps(&general);

        log::debug!("coverage scene built");
        Ok(Self {
            linear,
            perspective,
            copy,
            general,
            checkpoint,
        })
    }

    /// Every transform followed by its inverse view.
    pub fn panels(&self) -> Vec<Panel> {
        vec![
            Panel {
                name: "linear",
                transform: self.linear.as_transform(),
            },
            Panel {
                name: "linear inverse",
                transform: self.linear.inverse(),
            },
            Panel {
                name: "perspective",
                transform: self.perspective.as_transform(),
            },
            Panel {
                name: "perspective inverse",
                transform: self.perspective.inverse(),
            },
            Panel {
                name: "copy",
                transform: self.copy.as_transform(),
            },
            Panel {
                name: "copy inverse",
                transform: self.copy.inverse(),
            },
            Panel {
                name: "general",
                transform: self.general.as_transform(),
            },
            Panel {
                name: "general inverse",
                transform: self.general.inverse(),
            },
        ]
    }

    /// Pairs that must map every point to the same place.
    pub fn equivalences(&self) -> Vec<(&'static str, Transform, Transform)> {
        vec![
            (
                "general == perspective",
                self.general.as_transform(),
                self.perspective.as_transform(),
            ),
            (
                "perspective after pop == before push",
                self.perspective.as_transform(),
                self.checkpoint.as_transform(),
            ),
        ]
    }
}

/// Six operations that compose to the identity.
fn cancelling_steps<T: TransformOps>(t: &T) {
    t.rotate_wxyz(30.0, 1.0, 1.0, 1.0);
    t.rotate_wxyz(-30.0, 1.0, 1.0, 1.0);
    t.scale(2.0, 2.0, 2.0);
    t.scale(0.5, 0.5, 0.5);
    t.translate(10.0, 0.1, 0.3);
    t.translate(-10.0, -0.1, -0.3);
}
