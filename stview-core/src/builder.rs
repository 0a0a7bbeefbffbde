/// Mapping of node/member records to scene primitives
use log::debug;

use crate::config::SceneStyle;
use crate::error::Result;
use crate::model::StructuralModel;
use crate::scene::{CubePrimitive, LinePrimitive, Primitive, Scene};

/// Build the scene for a model: one cube per node, in node order, then one
/// line per member whose endpoints both resolve, in member order.
///
/// Members with an unknown endpoint are skipped. A node coordinate that is
/// not a finite number fails the whole build.
pub fn build_scene(model: &StructuralModel, style: &SceneStyle) -> Result<Scene> {
    let mut scene = Scene::new(*style);

    for node in &model.nodes {
        scene.add(Primitive::Cube(CubePrimitive {
            node: node.id.clone(),
            center: node.position()?,
            edge: style.node_size,
        }));
    }

    let mut lines = 0usize;
    for member in &model.members {
        let (Some(start), Some(end)) = (model.find_node(&member.start), model.find_node(&member.end))
        else {
            continue;
        };
        scene.add(Primitive::Line(LinePrimitive {
            start_node: start.id.clone(),
            end_node: end.id.clone(),
            start: start.position()?,
            end: end.position()?,
        }));
        lines += 1;
    }

    debug!("built scene: {} cubes, {} lines", model.nodes.len(), lines);
    Ok(scene)
}

/// Build the scene and center it once, ready for the first frame
pub fn build_centered_scene(model: &StructuralModel, style: &SceneStyle) -> Result<Scene> {
    let mut scene = build_scene(model, style)?;
    scene.center();
    Ok(scene)
}
