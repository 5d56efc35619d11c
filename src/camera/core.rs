use glam::{Mat4, Vec3};

/// Perspective camera defined by eye position, target, and projection
/// parameters.
///
/// The projection matrix is cached. Changing any projection parameter marks
/// it dirty; [`refresh_projection`](Self::refresh_projection) rebuilds it
/// before the next render.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    aspect: f32,
    fovy: f32,
    znear: f32,
    zfar: f32,
    projection: Mat4,
    projection_dirty: bool,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and eye position.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position (w unused).
    pub position: [f32; 4],
}

impl Camera {
    /// Perspective camera at the origin looking down -Z.
    ///
    /// `fovy` is the vertical field of view in degrees.
    #[must_use]
    pub fn new(fovy: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            eye: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            aspect,
            fovy,
            znear,
            zfar,
            projection: Mat4::IDENTITY,
            projection_dirty: true,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Viewport aspect ratio (width / height).
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Vertical field of view in degrees.
    #[must_use]
    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    /// Near and far clipping plane distances.
    #[must_use]
    pub fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    /// Set the aspect ratio. Only the viewport synchronizer calls this.
    pub(crate) fn set_aspect(&mut self, aspect: f32) -> bool {
        if aspect == self.aspect {
            return false;
        }
        self.aspect = aspect;
        self.projection_dirty = true;
        true
    }

    /// Replace field of view and clip planes.
    pub fn set_perspective(&mut self, fovy: f32, znear: f32, zfar: f32) {
        if (fovy, znear, zfar) == (self.fovy, self.znear, self.zfar) {
            return;
        }
        self.fovy = fovy;
        self.znear = znear;
        self.zfar = zfar;
        self.projection_dirty = true;
    }

    /// Point the camera at `point`.
    pub fn look_at(&mut self, point: Vec3) {
        self.target = point;
    }

    /// Unit vector from eye toward target (zero if they coincide).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// Whether the cached projection is stale.
    #[must_use]
    pub fn is_projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    /// Rebuild the projection matrix unconditionally.
    pub fn update_projection_matrix(&mut self) {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        self.projection = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
        self.projection_dirty = false;
    }

    /// Rebuild the projection matrix if it is dirty. Returns whether it was
    /// rebuilt.
    pub fn refresh_projection(&mut self) -> bool {
        if !self.projection_dirty {
            return false;
        }
        self.update_projection_matrix();
        true
    }

    /// The cached projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Combined view-projection matrix using the cached projection.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }
}

impl CameraUniform {
    /// Uniform built from the camera's current state.
    #[must_use]
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: camera.eye.extend(1.0).to_array(),
        }
    }
}
