//! GPU-free engine state: camera, controls, scene, and per-frame mutation.

use glam::Vec3;

use super::command::Command;
use crate::camera::{Camera, OrbitController};
use crate::error::OrbitError;
use crate::frame::FrameTick;
use crate::options::{CameraOptions, Options, SceneOptions};
use crate::scene::demo::{
    apply_animation_options, apply_scene_options, build_demo_scene,
    DemoHandles,
};
use crate::scene::{NodeId, Scene, SceneMutator};

/// Everything a frame mutates except GPU resources.
pub(crate) struct SceneState {
    pub(crate) camera: Camera,
    pub(crate) controller: OrbitController,
    pub(crate) scene: Scene,
    pub(crate) handles: DemoHandles,
    pub(crate) mutator: SceneMutator,
    anchor: NodeId,
    anchor_position: Vec3,
    pub(crate) options: Options,
}

fn camera_from_options(options: &CameraOptions) -> Camera {
    let mut camera =
        Camera::new(options.fovy, 1.0, options.znear, options.zfar);
    camera.eye = Vec3::from_array(options.eye);
    camera.look_at(Vec3::ZERO);
    camera
}

impl SceneState {
    /// Build the demo scene and a camera looking at it.
    pub(crate) fn new(options: Options) -> Result<Self, OrbitError> {
        let camera = camera_from_options(&options.camera);
        let controller = OrbitController::new(&camera, &options.camera);
        let mut scene = Scene::new();
        let mut mutator = SceneMutator::new();
        let handles = build_demo_scene(
            &mut scene,
            &mut mutator,
            &options.scene,
            &options.animation,
        )
        .ok_or_else(|| OrbitError::Viewer("scene root missing".into()))?;
        let anchor = scene.root();
        let anchor_position = scene.world_position(anchor).unwrap_or(Vec3::ZERO);
        Ok(Self {
            camera,
            controller,
            scene,
            handles,
            mutator,
            anchor,
            anchor_position,
            options,
        })
    }

    /// Make the controller orbit `node`. Returns `false` if it is dead.
    pub(crate) fn set_anchor(&mut self, node: NodeId) -> bool {
        let Some(position) = self.scene.world_position(node) else {
            return false;
        };
        self.anchor = node;
        self.anchor_position = position;
        self.controller.set_target(position);
        true
    }

    /// Per-frame update: follow the anchor, apply controls, then scene
    /// mutation. Returns whether the camera moved.
    pub(crate) fn update(&mut self, tick: &FrameTick) -> bool {
        // Only re-point when the anchor itself moved so pans persist.
        if let Some(position) = self.scene.world_position(self.anchor) {
            if position != self.anchor_position {
                self.anchor_position = position;
                self.controller.set_target(position);
            }
        }
        let moved = self.controller.update(&mut self.camera);
        let _ = self.mutator.apply(&mut self.scene, tick);
        moved
    }

    /// Whether the controls still have input to apply. A host rendering on
    /// demand keeps asking for frames until this is `false`.
    pub(crate) fn is_settling(&self) -> bool {
        !self.controller.is_settled()
    }

    /// Apply an engine-level command. Host commands are ignored and
    /// reported as unhandled.
    pub(crate) fn execute(&mut self, command: Command) -> bool {
        let scene = &mut self.options.scene;
        match command {
            Command::RecenterCamera => {
                self.controller.reset(&mut self.camera);
            }
            Command::RotateCamera { delta } => self.controller.rotate(delta),
            Command::PanCamera { delta } => self.controller.pan(delta),
            Command::Zoom { delta } => self.controller.zoom(delta),
            Command::ToggleWireframe => scene.wireframe = !scene.wireframe,
            Command::ToggleAxes => scene.show_axes = !scene.show_axes,
            Command::ToggleCubeVisibility => {
                scene.cube_visible = !scene.cube_visible;
            }
            Command::ToggleGroup => scene.show_group = !scene.show_group,
            Command::ToggleSpin => {
                self.mutator.set_paused(!self.mutator.is_paused());
                log::info!(
                    "spin {}",
                    if self.mutator.is_paused() { "paused" } else { "resumed" }
                );
            }
            Command::SetCubeHeight { y } => {
                scene.cube_height = y.clamp(
                    SceneOptions::MIN_CUBE_HEIGHT,
                    SceneOptions::MAX_CUBE_HEIGHT,
                );
            }
            Command::ToggleFullscreen | Command::ToggleFrameLoop => {
                return false;
            }
        }
        apply_scene_options(
            &mut self.scene,
            &self.handles,
            &self.options.scene,
        );
        true
    }

    /// Replace the options and push every section into the live state.
    pub(crate) fn set_options(&mut self, mut options: Options) {
        options.keybindings.rebuild_reverse_map();
        let camera = &options.camera;
        self.camera
            .set_perspective(camera.fovy, camera.znear, camera.zfar);
        self.controller.apply_options(camera);
        if options.animation != self.options.animation {
            apply_animation_options(
                &mut self.mutator,
                &self.handles,
                &options.animation,
            );
        }
        apply_scene_options(&mut self.scene, &self.handles, &options.scene);
        self.options = options;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use web_time::Duration;

    use super::*;
    use crate::scene::Drawable;

    fn state() -> SceneState {
        SceneState::new(Options::default()).unwrap()
    }

    fn tick(index: u64, ms: u64) -> FrameTick {
        FrameTick {
            index,
            elapsed: Duration::from_millis(ms),
            delta: Duration::from_millis(16),
        }
    }

    #[test]
    fn camera_starts_at_configured_eye() {
        let s = state();
        assert_eq!(s.camera.eye, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(s.camera.target, Vec3::ZERO);
        assert_eq!(s.camera.fovy(), 75.0);
        assert_eq!(s.camera.clip_planes(), (0.1, 1000.0));
    }

    #[test]
    fn update_spins_group_by_elapsed_time() {
        let mut s = state();
        let _ = s.update(&tick(0, 2000));
        let group = s.scene.node(s.handles.group).unwrap();
        assert_eq!(group.transform.rotation.y, 2.0 * std::f32::consts::PI);
    }

    #[test]
    fn toggles_flow_into_scene() {
        let mut s = state();
        assert!(s.execute(Command::ToggleWireframe));
        assert!(s.execute(Command::ToggleAxes));
        assert!(s.execute(Command::SetCubeHeight { y: -10.0 }));

        let cube = s.scene.node(s.handles.cube).unwrap();
        assert!(matches!(
            cube.drawable,
            Some(Drawable::Cube {
                wireframe: true,
                ..
            })
        ));
        assert_eq!(cube.transform.translation.y, -3.0);
        assert_eq!(s.options.scene.cube_height, -3.0);
        assert!(!s.scene.node(s.handles.axes).unwrap().visible);
    }

    #[test]
    fn toggle_spin_pauses_mutator() {
        let mut s = state();
        assert!(s.execute(Command::ToggleSpin));
        let _ = s.update(&tick(0, 1000));
        let group = s.scene.node(s.handles.group).unwrap();
        assert_eq!(group.transform.rotation.y, 0.0);
    }

    #[test]
    fn host_commands_are_not_handled() {
        let mut s = state();
        assert!(!s.execute(Command::ToggleFullscreen));
        assert!(!s.execute(Command::ToggleFrameLoop));
    }

    #[test]
    fn pan_survives_following_frames() {
        let mut s = state();
        let mut options = s.options.clone();
        options.camera.enable_damping = false;
        s.set_options(options);

        assert!(s.execute(Command::PanCamera {
            delta: Vec2::new(100.0, 0.0)
        }));
        let _ = s.update(&tick(0, 0));
        let panned = s.camera.target;
        let _ = s.update(&tick(1, 16));
        assert_ne!(panned, Vec3::ZERO);
        assert_eq!(s.camera.target, panned);
    }

    #[test]
    fn damped_drag_settles_over_following_frames() {
        let mut s = state();
        assert!(s.options.camera.enable_damping);
        assert!(s.execute(Command::RotateCamera {
            delta: Vec2::new(200.0, 0.0)
        }));

        assert!(s.update(&tick(0, 0)));
        assert!(s.is_settling());

        let mut frames = 1;
        while s.is_settling() && frames < 1000 {
            let _ = s.update(&tick(frames, frames * 16));
            frames += 1;
        }
        assert!(!s.is_settling());
        assert!(frames > 1);

        // The whole drag lands: one radian of azimuth to the right.
        let expected = Vec3::new(3.0 * (-1.0f32).sin(), 0.0, 3.0 * (-1.0f32).cos());
        assert!((s.camera.eye - expected).length() < 1e-3, "{}", s.camera.eye);
    }

    #[test]
    fn moving_anchor_repoints_controller() {
        let mut s = state();
        assert!(s.set_anchor(s.handles.cube));
        s.scene.node_mut(s.handles.cube).unwrap().transform.translation.y = 1.0;
        let _ = s.update(&tick(0, 0));
        assert_eq!(s.controller.target(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn set_options_updates_projection_and_spin() {
        let mut s = state();
        let mut options = Options::default();
        options.camera.fovy = 50.0;
        options.animation.spin_enabled = false;
        s.set_options(options);
        assert_eq!(s.camera.fovy(), 50.0);
        assert!(s.camera.is_projection_dirty());
        assert!(s.mutator.spins().is_empty());
    }
}
