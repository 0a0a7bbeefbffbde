/// Example: Build a scene from a dataset and print what it contains
///
/// Usage: cargo run --example inspect_model -- nodes.json members.json

use std::env;
use std::error::Error;
use stview_core::{build_scene, StructuralModel, ViewerConfig};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let (nodes, members) = match args.as_slice() {
        [_, nodes, members, ..] => (nodes.as_str(), members.as_str()),
        _ => ("data/nodes.json", "data/members.json"),
    };

    let model = StructuralModel::from_files(nodes, members)?;
    let mut scene = build_scene(&model, &ViewerConfig::default().scene_style())?;

    let skipped = model.members.len() - scene.lines().count();
    println!(
        "{} nodes, {} members ({} skipped)",
        model.nodes.len(),
        model.members.len(),
        skipped
    );

    let bounds = scene.bounding_box();
    println!("bounds: {:?} .. {:?}", bounds.min, bounds.max);

    let offset = scene.center();
    println!("centering offset: {:?}", offset);
    Ok(())
}
