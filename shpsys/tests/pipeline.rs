use shpsys::arcs::ArcVertices;
use shpsys::clean::planar_path_area;
use shpsys::snap::{avg_segment_len, snap_coords};
use shpsys::{
    ArcCollection, ArcId, GeometryType, ImportOptions, LogDiagnostics, PathImporter, Shape,
    Thresholds,
};

const INF: f64 = f64::INFINITY;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn has_length(mut iter: ArcVertices<'_>, _: usize) -> bool {
    iter.nth(1).is_some()
}

fn import_tiles() -> shpsys::Dataset {
    let diagnostics = LogDiagnostics::for_command("import");
    let options = ImportOptions::default()
        .with_reserved_points(16)
        .with_snap_interval(0.001);
    let mut importer = PathImporter::new(options, &diagnostics).expect("valid options");

    importer.start_shape(serde_json::json!({"name": "west"}).as_object().cloned());
    importer
        .import_ring(
            &[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]],
            false,
        )
        .expect("single type");

    importer.start_shape(serde_json::json!({"name": "east"}).as_object().cloned());
    importer
        .import_ring(&[[10.0004, 0.0], [10.0, 10.0], [20.0, 10.0], [20.0, 0.0]], false)
        .expect("single type");

    importer.start_shape(None);
    importer
        .import_ring(&[[30.0, 30.0], [30.0, 30.0]], false)
        .expect("single type");

    importer.done().expect("valid dataset")
}

#[test]
fn import_clean_simplify_filter() {
    init_logger();

    let dataset = import_tiles();
    let mut arcs = dataset.arcs.expect("arcs are built");
    assert_eq!(arcs.size(), 3);
    assert_eq!(arcs.get_point_count(), 11);

    // The open ring of the second tile was closed and both of its ends were snapped onto the first tile.
    assert_eq!(
        arcs.get_vertex(ArcId::new(1), 0).map(|p| (p.x, p.y)),
        Ok((10.0, 0.0))
    );
    assert_eq!(
        arcs.get_vertex(ArcId::new(1), -1).map(|p| (p.x, p.y)),
        Ok((10.0, 0.0))
    );

    let layer = &dataset.layers[0];
    assert_eq!(dataset.layers.len(), 1);
    assert_eq!(layer.geometry_type, Some(GeometryType::Polygon));
    assert_eq!(layer.shapes[2], None);
    for shape in layer.shapes.iter().flatten() {
        for path in shape.paths() {
            assert!(planar_path_area(path, &arcs).expect("valid ids") > 0.0);
        }
    }

    arcs.set_thresholds(Some(Thresholds::PerArc(vec![
        vec![INF, 1.0, 5.0, 2.0, INF],
        vec![INF, 3.0, 4.0, 1.0, INF],
        vec![INF],
    ])))
    .expect("valid thresholds");

    arcs.set_retained_pct(0.0).expect("thresholds are set");
    arcs.for_each(|iter, i| {
        if i < 2 {
            assert_eq!(iter.count(), 2);
        }
    });

    arcs.set_retained_pct(1.0).expect("thresholds are set");
    assert_eq!(arcs.get_filtered_point_count(), 11);

    arcs.set_retained_interval(3.0);
    assert_eq!(arcs.get_filtered_point_count(), 8);
    let mut simplified = arcs.get_filtered_copy().expect("no collapsed arcs");
    assert_eq!(simplified.get_point_count(), 8);
    assert_eq!(
        simplified.to_array()[0],
        vec![[0.0, 0.0], [10.0, 10.0], [0.0, 0.0]]
    );

    let map = simplified
        .filter(has_length)
        .expect("valid buffers")
        .expect("single point arc is removed");
    assert_eq!(map.to_signed_vec(), vec![0, 1, -1]);
    assert_eq!(simplified.filter(has_length), Ok(None));

    let remapped: Vec<Option<Shape>> = layer
        .shapes
        .iter()
        .map(|shape| {
            shape
                .as_ref()
                .map(|s| Shape::Paths(s.paths().iter().map(|p| map.remap_path(p)).collect()))
        })
        .collect();
    assert_eq!(
        remapped[1],
        Some(Shape::Paths(vec![vec![ArcId::new(1)]]))
    );

    assert_eq!(simplified.dedup_coords(), Ok(0));
}

#[test]
fn snap_nearby_arcs() {
    init_logger();

    let mut arcs = ArcCollection::from_arcs(vec![
        vec![[0.0, 0.0], [1.0, 0.0], [1.001, 0.0], [2.0, 0.0]],
        vec![[2.0, 0.0], [2.0, 1.0]],
    ]);
    assert!(avg_segment_len(&arcs) > 0.0);

    let diagnostics = LogDiagnostics::for_command("snap");
    let count = snap_coords(&mut arcs, Some(0.001), &diagnostics).expect("valid buffers");
    assert_eq!(count, 1);
    assert_eq!(arcs.get_point_count(), 5);
    assert_eq!(arcs.get_arc_length(ArcId::new(0)), Ok(3));
    assert_eq!(arcs.dedup_coords(), Ok(0));
}
