//! The demo scene: a main cube, an axes helper, and a spinning group of
//! three cubes.

use glam::Vec3;

use super::{Drawable, Node, NodeId, Scene, SceneMutator, Spin};
use crate::options::{AnimationOptions, SceneOptions};

const MAIN_CUBE_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
const AXES_SIZE: f32 = 1.0;

/// Group members: (edge length, linear RGB color, x offset).
const GROUP_CUBES: [(f32, [f32; 3], f32); 3] = [
    (1.0, [0.0, 1.0, 0.0], -1.0),
    (0.75, [0.871, 0.871, 0.871], -2.0),
    (0.5, [0.0, 0.0, 1.0], -2.75),
];

/// Handles to the demo scene's nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoHandles {
    /// The main cube.
    pub cube: NodeId,
    /// The axes helper.
    pub axes: NodeId,
    /// The spinning group.
    pub group: NodeId,
    /// The group's cubes.
    pub group_cubes: [NodeId; 3],
}

/// Populate `scene` with the demo nodes and register the group spin with
/// `mutator`.
///
/// Returns `None` only if the scene root is gone.
pub fn build_demo_scene(
    scene: &mut Scene,
    mutator: &mut SceneMutator,
    scene_options: &SceneOptions,
    animation: &AnimationOptions,
) -> Option<DemoHandles> {
    let root = scene.root();
    let cube = scene.add_child(
        root,
        Node::drawable(
            "cube",
            Drawable::Cube {
                size: 1.0,
                color: MAIN_CUBE_COLOR,
                wireframe: false,
            },
        ),
    )?;
    let axes = scene.add_child(
        root,
        Node::drawable("axes", Drawable::Axes { size: AXES_SIZE }),
    )?;
    let group = scene.add_child(root, Node::group("group"))?;

    let mut group_cubes = [group; 3];
    for (slot, (i, &(size, color, x))) in
        group_cubes.iter_mut().zip(GROUP_CUBES.iter().enumerate())
    {
        let node = Node::drawable(
            format!("group cube {i}"),
            Drawable::Cube {
                size,
                color,
                wireframe: false,
            },
        )
        .at(Vec3::new(x, 0.0, 0.0));
        *slot = scene.add_child(group, node)?;
    }

    let handles = DemoHandles {
        cube,
        axes,
        group,
        group_cubes,
    };
    apply_scene_options(scene, &handles, scene_options);
    apply_animation_options(mutator, &handles, animation);
    log::debug!("demo scene built with {} nodes", scene.node_count());
    Some(handles)
}

/// Push the live-tweakable parameters into the scene.
pub fn apply_scene_options(
    scene: &mut Scene,
    handles: &DemoHandles,
    options: &SceneOptions,
) {
    if let Some(cube) = scene.node_mut(handles.cube) {
        cube.transform.translation.y = options.clamped_cube_height();
        cube.visible = options.cube_visible;
        if let Some(Drawable::Cube { wireframe, .. }) = &mut cube.drawable {
            *wireframe = options.wireframe;
        }
    }
    if let Some(axes) = scene.node_mut(handles.axes) {
        axes.visible = options.show_axes;
    }
    if let Some(group) = scene.node_mut(handles.group) {
        group.visible = options.show_group;
    }
}

/// Replace the group spin with one matching `options`.
pub fn apply_animation_options(
    mutator: &mut SceneMutator,
    handles: &DemoHandles,
    options: &AnimationOptions,
) {
    let _ = mutator.remove_spins_for(handles.group);
    if options.spin_enabled {
        mutator.add_spin(Spin {
            node: handles.group,
            axis: options.spin_axis,
            rate: options.spin_rate,
            mode: options.spin_mode,
        });
    }
}
