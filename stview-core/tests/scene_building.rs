use approx::assert_relative_eq;
use nalgebra::Point3;
use stview_core::{
    build_centered_scene, build_scene, Error, MemberRecord, NodeRecord, SceneStyle,
    StructuralModel,
};

fn two_node_model() -> StructuralModel {
    StructuralModel::new(
        vec![
            NodeRecord::new(1, "0", "0", "0"),
            NodeRecord::new(2, "10", "0", "0"),
        ],
        vec![MemberRecord::new(1, 2)],
    )
}

fn frame_model() -> StructuralModel {
    let nodes = r#"[
        {"Node": 1, "X": "0",  "Y": "0",  "Z": "0"},
        {"Node": 2, "X": "20", "Y": "0",  "Z": "0"},
        {"Node": 3, "X": "20", "Y": "15", "Z": "0"},
        {"Node": 4, "X": "0",  "Y": "15", "Z": "0"},
        {"Node": 5, "X": "0",  "Y": "15", "Z": "-8"}
    ]"#;
    let members = r#"[
        {"Start Node": 1, "End Node": 2},
        {"Start Node": 2, "End Node": 3},
        {"Start Node": 3, "End Node": 4},
        {"Start Node": 4, "End Node": 1},
        {"Start Node": 4, "End Node": 5},
        {"Start Node": 5, "End Node": 42}
    ]"#;
    StructuralModel::from_json(nodes, members).unwrap()
}

#[test]
fn test_cube_per_node_at_parsed_position() {
    let model = frame_model();
    let scene = build_scene(&model, &SceneStyle::default()).unwrap();

    let cubes: Vec<_> = scene.cubes().collect();
    assert_eq!(cubes.len(), model.nodes.len());
    for (cube, node) in cubes.iter().zip(&model.nodes) {
        assert_eq!(cube.node, node.id);
        assert_eq!(cube.center, node.position().unwrap());
        assert_eq!(cube.edge, 2.0);
    }
}

#[test]
fn test_line_per_resolvable_member() {
    let model = frame_model();
    let scene = build_scene(&model, &SceneStyle::default()).unwrap();

    let lines: Vec<_> = scene.lines().collect();
    assert_eq!(lines.len(), 5);
    for (line, member) in lines.iter().zip(&model.members) {
        assert_eq!(line.start_node, member.start);
        assert_eq!(line.end_node, member.end);
        assert_eq!(line.start, model.find_node(&member.start).unwrap().position().unwrap());
        assert_eq!(line.end, model.find_node(&member.end).unwrap().position().unwrap());
    }
}

#[test]
fn test_two_nodes_center_symmetrically() {
    let model = two_node_model();

    let scene = build_scene(&model, &SceneStyle::default()).unwrap();
    let before: Vec<_> = scene.cubes().map(|c| scene.world_point(&c.center)).collect();
    assert_eq!(before, vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)]);
    assert_eq!(scene.lines().count(), 1);

    let scene = build_centered_scene(&model, &SceneStyle::default()).unwrap();
    let after: Vec<_> = scene.cubes().map(|c| scene.world_point(&c.center)).collect();
    assert_relative_eq!(after[0], Point3::new(-5.0, 0.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(after[1], Point3::new(5.0, 0.0, 0.0), epsilon = 1e-5);

    let line = scene.lines().next().unwrap();
    assert_relative_eq!(scene.world_point(&line.start), after[0], epsilon = 1e-5);
    assert_relative_eq!(scene.world_point(&line.end), after[1], epsilon = 1e-5);
}

#[test]
fn test_unknown_endpoint_is_skipped() {
    let model = StructuralModel::new(
        vec![
            NodeRecord::new(1, "0", "0", "0"),
            NodeRecord::new(2, "10", "0", "0"),
        ],
        vec![MemberRecord::new(99, 2), MemberRecord::new(1, 98)],
    );

    let scene = build_scene(&model, &SceneStyle::default()).unwrap();
    assert_eq!(scene.lines().count(), 0);
    assert_eq!(scene.cubes().count(), 2);
}

#[test]
fn test_centered_bounds_are_at_origin() {
    let scene = build_centered_scene(&frame_model(), &SceneStyle::default()).unwrap();
    let center = scene.bounding_box().center();
    assert_relative_eq!(center, Point3::origin(), epsilon = 1e-5);
}

#[test]
fn test_centering_twice_is_a_no_op() {
    let mut scene = build_centered_scene(&frame_model(), &SceneStyle::default()).unwrap();
    let offset = scene.offset();

    let delta = scene.center();
    assert_relative_eq!(delta.norm(), 0.0, epsilon = 1e-5);
    assert_relative_eq!(scene.offset(), offset, epsilon = 1e-5);
}

#[test]
fn test_malformed_coordinate_fails_build() {
    let model = StructuralModel::new(
        vec![
            NodeRecord::new(1, "0", "0", "0"),
            NodeRecord::new(2, "ten", "0", "0"),
        ],
        Vec::new(),
    );

    let err = build_scene(&model, &SceneStyle::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidCoordinate { .. }));
    assert!(err.to_string().contains("\"ten\""));
}

#[test]
fn test_string_identifiers_resolve() {
    let nodes = r#"[{"Node": "A", "X": 0, "Y": 0, "Z": 0}, {"Node": "B", "X": 0, "Y": 4, "Z": 0}]"#;
    let members = r#"[{"Start Node": "A", "End Node": "B"}, {"Start Node": 1, "End Node": "B"}]"#;
    let model = StructuralModel::from_json(nodes, members).unwrap();

    let scene = build_scene(&model, &SceneStyle::default()).unwrap();
    assert_eq!(scene.lines().count(), 1);
}

#[test]
fn test_coordinate_beyond_f32_range_fails_build() {
    let model = StructuralModel::new(
        vec![
            NodeRecord::new(1, "0", "0", "0"),
            NodeRecord::new(2, "1e39", "0", "0"),
        ],
        vec![MemberRecord::new(1, 2)],
    );

    let err = build_centered_scene(&model, &SceneStyle::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidCoordinate { .. }));
}

#[test]
fn test_float_identifiers_resolve_integer_references() {
    let nodes = r#"[{"Node": 1.0, "X": 0, "Y": 0, "Z": 0}, {"Node": 2.0, "X": 10, "Y": 0, "Z": 0}]"#;
    let members = r#"[{"Start Node": 1, "End Node": 2}]"#;
    let model = StructuralModel::from_json(nodes, members).unwrap();

    let scene = build_centered_scene(&model, &SceneStyle::default()).unwrap();
    assert_eq!(scene.lines().count(), 1);
    assert_relative_eq!(scene.bounding_box().center(), Point3::origin(), epsilon = 1e-5);
}
