// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cameras, projections, and the frustum-fit plane.
//!
//! Cameras are axis-aligned and look down `-Z`; rotation is left to the
//! host's scene graph.

use core::f64::consts::PI;

use kurbo::{Point, Size};

/// Errors from camera geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// The operation needs a perspective projection.
    #[error("camera must use a perspective projection")]
    InvalidCameraKind,
}

/// Minimal 3D vector used for camera positions and rays.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        libm::sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Unit vector in the same direction, or `self` if the length is zero.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len)
        } else {
            self
        }
    }
}

/// A half-line used for hit testing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f64) -> Vec3 {
        Vec3::new(
            self.origin.x + self.direction.x * t,
            self.origin.y + self.direction.y * t,
            self.origin.z + self.direction.z * t,
        )
    }
}

/// Perspective projection parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Perspective {
    /// Vertical field of view in degrees.
    pub fov: f64,
    /// Width over height.
    pub aspect: f64,
    /// Near clip distance.
    pub near: f64,
    /// Far clip distance.
    pub far: f64,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fov: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Orthographic projection parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orthographic {
    /// Left frustum plane.
    pub left: f64,
    /// Right frustum plane.
    pub right: f64,
    /// Top frustum plane.
    pub top: f64,
    /// Bottom frustum plane.
    pub bottom: f64,
    /// Near clip distance.
    pub near: f64,
    /// Far clip distance.
    pub far: f64,
    /// Bounds are managed by the caller and never refit to a region.
    pub manual: bool,
}

impl Default for Orthographic {
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
            near: 0.1,
            far: 1000.0,
            manual: false,
        }
    }
}

/// Projection kinds a [`Camera`] can use.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Projection {
    /// Perspective projection.
    Perspective(Perspective),
    /// Orthographic projection.
    Orthographic(Orthographic),
}

/// Column-major 4x4 matrix.
pub type Matrix4 = [f64; 16];

/// A camera with a cached projection matrix.
///
/// Mutate [`Camera::projection`] through [`Camera::projection_mut`] and call
/// [`Camera::update_projection_matrix`] afterwards; each recomputation bumps
/// [`Camera::revision`].
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    projection: Projection,
    /// World-space position.
    pub position: Vec3,
    matrix: Matrix4,
    revision: u64,
}

impl Camera {
    /// Creates a camera and computes its projection matrix.
    #[must_use]
    pub fn new(projection: Projection, position: Vec3) -> Self {
        let mut camera = Self {
            projection,
            position,
            matrix: [0.0; 16],
            revision: 0,
        };
        camera.matrix = projection_matrix(&camera.projection);
        camera
    }

    /// A perspective camera at `position`.
    #[must_use]
    pub fn perspective(perspective: Perspective, position: Vec3) -> Self {
        Self::new(Projection::Perspective(perspective), position)
    }

    /// An orthographic camera at `position`.
    #[must_use]
    pub fn orthographic(orthographic: Orthographic, position: Vec3) -> Self {
        Self::new(Projection::Orthographic(orthographic), position)
    }

    /// Current projection parameters.
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Mutable projection parameters. The matrix is not refreshed.
    pub fn projection_mut(&mut self) -> &mut Projection {
        &mut self.projection
    }

    /// Cached projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// Number of times the projection matrix has been recomputed.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Recomputes the projection matrix from the current parameters.
    pub fn update_projection_matrix(&mut self) {
        self.matrix = projection_matrix(&self.projection);
        self.revision += 1;
    }

    /// Refits the projection to a region of `size` on screen.
    ///
    /// - Orthographic, not manual: bounds become `±width/2`, `±height/2` if
    ///   they differ.
    /// - Orthographic, manual: bounds are kept and the matrix is recomputed.
    /// - Perspective: `aspect` becomes `width / height` if it differs.
    ///
    /// Returns `true` if the matrix was recomputed. Empty sizes are ignored.
    pub fn fit_to_region(&mut self, size: Size) -> bool {
        if !(size.width > 0.0 && size.height > 0.0) {
            return false;
        }
        let (w, h) = (size.width, size.height);
        let changed = match &mut self.projection {
            Projection::Orthographic(ortho) if ortho.manual => true,
            Projection::Orthographic(ortho) => {
                let fitted = ortho.left == -w / 2.0
                    && ortho.right == w / 2.0
                    && ortho.top == h / 2.0
                    && ortho.bottom == -h / 2.0;
                if !fitted {
                    ortho.left = -w / 2.0;
                    ortho.right = w / 2.0;
                    ortho.top = h / 2.0;
                    ortho.bottom = -h / 2.0;
                }
                !fitted
            }
            Projection::Perspective(persp) => {
                let aspect = w / h;
                let stale = persp.aspect != aspect;
                if stale {
                    persp.aspect = aspect;
                }
                stale
            }
        };
        if changed {
            self.update_projection_matrix();
        }
        changed
    }

    /// Size of the plane at `|position.z|` that exactly fills the view of a
    /// `viewport` with the viewport's aspect ratio.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidCameraKind`] for non-perspective cameras.
    pub fn frustum_plane(&self, viewport: Size) -> Result<Size, GeometryError> {
        fit_plane_to_frustum(
            &self.projection,
            libm::fabs(self.position.z),
            viewport.width / viewport.height,
        )
    }

    /// World-space ray through a point in normalized device coordinates.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Point) -> Ray {
        match &self.projection {
            Projection::Perspective(p) => {
                let half_h = libm::tan(p.fov.to_radians() / 2.0);
                let half_w = half_h * p.aspect;
                Ray {
                    origin: self.position,
                    direction: Vec3::new(ndc.x * half_w, ndc.y * half_h, -1.0).normalize(),
                }
            }
            Projection::Orthographic(o) => {
                let tx = (ndc.x + 1.0) / 2.0;
                let ty = (ndc.y + 1.0) / 2.0;
                let x = o.left + (o.right - o.left) * tx;
                let y = o.bottom + (o.top - o.bottom) * ty;
                Ray {
                    origin: Vec3::new(
                        self.position.x + x,
                        self.position.y + y,
                        self.position.z - o.near,
                    ),
                    direction: Vec3::new(0.0, 0.0, -1.0),
                }
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(Perspective::default(), Vec3::new(0.0, 0.0, 5.0))
    }
}

/// Size of a plane that exactly fills a perspective frustum at `distance`.
///
/// `height = 2 * tan(fov / 2) * distance`, `width = height * viewport_aspect`.
///
/// # Errors
///
/// [`GeometryError::InvalidCameraKind`] if `projection` is not perspective.
pub fn fit_plane_to_frustum(
    projection: &Projection,
    distance: f64,
    viewport_aspect: f64,
) -> Result<Size, GeometryError> {
    let Projection::Perspective(persp) = projection else {
        return Err(GeometryError::InvalidCameraKind);
    };
    let fov = persp.fov * (PI / 180.0);
    let height = 2.0 * libm::tan(fov / 2.0) * distance;
    Ok(Size::new(height * viewport_aspect, height))
}

fn projection_matrix(projection: &Projection) -> Matrix4 {
    match projection {
        Projection::Perspective(p) => {
            let top = p.near * libm::tan(p.fov.to_radians() / 2.0);
            let height = 2.0 * top;
            let width = p.aspect * height;
            let left = -0.5 * width;
            frustum(left, left + width, top, top - height, p.near, p.far)
        }
        Projection::Orthographic(o) => {
            let w = 1.0 / (o.right - o.left);
            let h = 1.0 / (o.top - o.bottom);
            let p = 1.0 / (o.far - o.near);
            let x = (o.right + o.left) * w;
            let y = (o.top + o.bottom) * h;
            let z = (o.far + o.near) * p;
            [
                2.0 * w, 0.0, 0.0, 0.0, //
                0.0, 2.0 * h, 0.0, 0.0, //
                0.0, 0.0, -2.0 * p, 0.0, //
                -x, -y, -z, 1.0,
            ]
        }
    }
}

fn frustum(left: f64, right: f64, top: f64, bottom: f64, near: f64, far: f64) -> Matrix4 {
    let x = 2.0 * near / (right - left);
    let y = 2.0 * near / (top - bottom);
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let c = -(far + near) / (far - near);
    let d = -2.0 * far * near / (far - near);
    [
        x, 0.0, 0.0, 0.0, //
        0.0, y, 0.0, 0.0, //
        a, b, c, -1.0, //
        0.0, 0.0, d, 0.0,
    ]
}
