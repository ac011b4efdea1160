use ndarray::Array;

use super::{ReduceOperation, SurfaceSummary, percentile, register_all};
use crate::commands::{CommandError, Dispatcher, OperationRegistry, Result};
use crate::formats::MemoryFileProvider;
use crate::model::{
    ArrayData, DataArray, Encoding, GiftiFile, INTENT_POINTSET, INTENT_TRIANGLE,
};

fn registry() -> OperationRegistry {
    let mut registry = OperationRegistry::new();
    register_all(&mut registry).expect("register");
    registry
}

fn metric(columns: &[(&str, &[f32])]) -> GiftiFile {
    let mut file = GiftiFile::new();
    for (name, values) in columns {
        let mut array = DataArray::from_column(values.to_vec());
        array.set_name(*name);
        file.arrays.push(array);
    }
    file
}

fn surface() -> GiftiFile {
    let coordinates = Array::from_shape_vec(
        (3, 3),
        vec![0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    )
    .expect("coordinates")
    .into_dyn();
    let triangles = Array::from_shape_vec((1, 3), vec![0_i32, 1, 2])
        .expect("triangles")
        .into_dyn();
    let mut file = GiftiFile::new();
    file.arrays
        .push(DataArray::new(INTENT_POINTSET, ArrayData::Float32(coordinates)));
    file.arrays
        .push(DataArray::new(INTENT_TRIANGLE, ArrayData::Int32(triangles)));
    file
}

fn provider() -> MemoryFileProvider {
    let provider = MemoryFileProvider::new();
    provider.insert(
        "a.func.gii",
        metric(&[("x", &[1.0, 2.0, 3.0, 4.0]), ("y", &[10.0, 20.0, 30.0, 40.0])]),
    );
    provider.insert(
        "b.func.gii",
        metric(&[
            ("p", &[5.0, 5.0, 5.0, 5.0]),
            ("q", &[6.0, 6.0, 6.0, 6.0]),
            ("r", &[7.0, 7.0, 7.0, 7.0]),
        ]),
    );
    provider.insert("short.func.gii", metric(&[("s", &[1.0, 2.0])]));
    provider.insert("roi.func.gii", metric(&[("roi", &[1.0, 0.0, 1.0, 0.0])]));
    provider.insert("mesh.surf.gii", surface());
    provider
}

fn run(provider: &MemoryFileProvider, switch: &str, args: &[&str]) -> Result<String> {
    let registry = registry();
    let mut out = Vec::new();
    Dispatcher::new(&registry, provider).execute(switch, args.iter().copied(), &mut out)?;
    Ok(String::from_utf8(out).expect("utf8"))
}

fn names(provider: &MemoryFileProvider, path: &str) -> Vec<String> {
    let file = provider.get(path).expect("written");
    let gifti = file.as_gifti().expect("gifti");
    gifti
        .arrays
        .iter()
        .map(|array| array.name().to_string())
        .collect()
}

#[test]
fn operations_register_in_listing_order() {
    let registry = registry();
    let switches = registry
        .list_all()
        .iter()
        .map(|operation| operation.switch())
        .collect::<Vec<_>>();
    assert_eq!(
        switches,
        [
            "-gifti-convert",
            "-metric-merge",
            "-metric-stats",
            "-set-map-names",
            "-surface-information"
        ]
    );
}

#[test]
fn gifti_convert_changes_only_the_encoding() {
    let provider = provider();
    run(&provider, "-gifti-convert", &["GZIP_BASE64_BINARY", "a.func.gii", "out.func.gii"])
        .expect("convert");
    let written = provider.get("out.func.gii").expect("written");
    let gifti = written.as_gifti().expect("gifti");
    assert!(gifti
        .arrays
        .iter()
        .all(|array| array.encoding == Encoding::GZipBase64Binary));
    assert_eq!(gifti.column(1).expect("column"), vec![10.0, 20.0, 30.0, 40.0]);
}

#[test]
fn gifti_convert_rejects_unknown_encoding_before_reading() {
    let provider = provider();
    let error = run(&provider, "-gifti-convert", &["BOGUS", "a.func.gii", "out.func.gii"])
        .expect_err("bogus");
    assert!(matches!(
        error,
        CommandError::TypeMismatch { ref name, .. } if name == "gifti-encoding"
    ));
    assert!(provider.reads().is_empty());
    assert!(!provider.contains("out.func.gii"));
}

#[test]
fn metric_merge_selects_ranges_in_order() {
    let provider = provider();
    run(
        &provider,
        "-metric-merge",
        &[
            "out.func.gii",
            "-metric",
            "b.func.gii",
            "-column",
            "p",
            "-up-to",
            "3",
            "-reverse",
            "-column",
            "2",
            "-metric",
            "a.func.gii",
        ],
    )
    .expect("merge");
    assert_eq!(names(&provider, "out.func.gii"), ["r", "q", "p", "q", "x", "y"]);
}

#[test]
fn metric_merge_checks_inputs() {
    let provider = provider();
    let error = run(
        &provider,
        "-metric-merge",
        &["out.func.gii", "-metric", "a.func.gii", "-metric", "short.func.gii"],
    )
    .expect_err("vertex mismatch");
    assert!(error.to_string().contains("short.func.gii"));

    let error = run(&provider, "-metric-merge", &["out.func.gii"]).expect_err("no inputs");
    assert!(error.to_string().contains("no inputs specified"));

    let error = run(
        &provider,
        "-metric-merge",
        &["out.func.gii", "-metric", "a.func.gii", "-column", "2", "-up-to", "1"],
    )
    .expect_err("backwards range");
    assert!(error.to_string().contains("ending column occurs before starting column"));

    let error = run(
        &provider,
        "-metric-merge",
        &["out.func.gii", "-metric", "a.func.gii", "-column", "missing"],
    )
    .expect_err("missing column");
    assert!(error.to_string().contains("column 'missing' not valid"));
    assert!(!provider.contains("out.func.gii"));
}

#[test]
fn metric_stats_reduces_each_column() {
    let provider = provider();
    let output =
        run(&provider, "-metric-stats", &["a.func.gii", "-reduce", "MEAN"]).expect("stats");
    assert_eq!(output, "2.5\n25\n");

    let output = run(
        &provider,
        "-metric-stats",
        &["a.func.gii", "-percentile", "50", "-column", "y", "-show-map-name"],
    )
    .expect("percentile");
    assert_eq!(output, "2:\ty:\t25\n");
}

#[test]
fn metric_stats_honours_roi() {
    let provider = provider();
    let output = run(
        &provider,
        "-metric-stats",
        &["a.func.gii", "-reduce", "SUM", "-roi", "roi.func.gii"],
    )
    .expect("roi");
    assert_eq!(output, "4\n40\n");

    let error = run(
        &provider,
        "-metric-stats",
        &["a.func.gii", "-reduce", "SUM", "-roi", "roi.func.gii", "-match"],
    )
    .expect_err("match needs equal columns");
    assert!(error.to_string().contains("-match specified"));
}

#[test]
fn metric_stats_needs_exactly_one_statistic() {
    let provider = provider();
    let error = run(&provider, "-metric-stats", &["a.func.gii"]).expect_err("none");
    assert!(error.to_string().contains("you must specify an operation"));
    let error = run(
        &provider,
        "-metric-stats",
        &["a.func.gii", "-reduce", "MAX", "-percentile", "10"],
    )
    .expect_err("both");
    assert!(error.to_string().contains("only specify one operation"));
    let error = run(&provider, "-metric-stats", &["a.func.gii", "-reduce", "AVERAGE"])
        .expect_err("unknown reduction");
    assert!(matches!(error, CommandError::TypeMismatch { .. }));
}

#[test]
fn reductions_match_hand_computed_values() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let apply = |operation| ReduceOperation::apply(operation, &values).expect("reduce");
    assert_eq!(apply(ReduceOperation::Max), 9.0);
    assert_eq!(apply(ReduceOperation::Min), 2.0);
    assert_eq!(apply(ReduceOperation::IndexMax), 8.0);
    assert_eq!(apply(ReduceOperation::IndexMin), 1.0);
    assert_eq!(apply(ReduceOperation::Sum), 40.0);
    assert_eq!(apply(ReduceOperation::Mean), 5.0);
    assert_eq!(apply(ReduceOperation::Stdev), 2.0);
    assert_eq!(apply(ReduceOperation::Variance), 4.0);
    assert!((apply(ReduceOperation::SampStdev) - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    assert_eq!(apply(ReduceOperation::Median), 4.5);
    assert_eq!(apply(ReduceOperation::Mode), 4.0);
    assert_eq!(apply(ReduceOperation::CountNonzero), 8.0);
    assert_eq!(
        ReduceOperation::apply(ReduceOperation::L2Norm, &[3.0, 4.0]).expect("norm"),
        5.0
    );
    assert_eq!(
        ReduceOperation::apply(ReduceOperation::Product, &[2.0, -3.0]).expect("product"),
        -6.0
    );
    assert!(ReduceOperation::apply(ReduceOperation::SampStdev, &[1.0]).is_err());
    assert!(ReduceOperation::apply(ReduceOperation::Mean, &[]).is_err());
    assert!(ReduceOperation::NAMES
        .iter()
        .all(|name| ReduceOperation::from_name(name).is_some()));
}

#[test]
fn percentile_interpolates_between_ranks() {
    let values = [10.0, 0.0, 30.0, 20.0];
    assert_eq!(percentile(&values, 0.0).expect("p0"), 0.0);
    assert_eq!(percentile(&values, 100.0).expect("p100"), 30.0);
    assert_eq!(percentile(&values, 50.0).expect("p50"), 15.0);
    assert!(percentile(&values, 101.0).is_err());
}

#[test]
fn set_map_names_rewrites_the_file() {
    let provider = provider();
    run(
        &provider,
        "-set-map-names",
        &["a.func.gii", "-map", "2", "thickness", "-map", "1", "curvature"],
    )
    .expect("rename");
    assert_eq!(names(&provider, "a.func.gii"), ["curvature", "thickness"]);

    let error = run(&provider, "-set-map-names", &["a.func.gii", "-map", "3", "z"])
        .expect_err("bad index");
    assert!(error.to_string().contains("invalid map index 3"));
    let error = run(&provider, "-set-map-names", &["a.func.gii"]).expect_err("no maps");
    assert!(error.to_string().contains("-map"));
}

#[test]
fn surface_information_reports_geometry() {
    let summary = SurfaceSummary::from_surface(&surface()).expect("summary");
    assert_eq!(summary.vertices, 3);
    assert_eq!(summary.triangles, 1);
    assert_eq!(summary.minimum, [0.0, 0.0, 0.0]);
    assert_eq!(summary.maximum, [1.0, 1.0, 0.0]);
    let expected = (2.0 + 2.0_f64.sqrt()) / 3.0;
    assert!((summary.mean_edge_length - expected).abs() < 1e-9);

    let provider = provider();
    let output = run(&provider, "-surface-information", &["mesh.surf.gii"]).expect("info");
    assert!(output.contains("Number of vertices: 3\n"));
    assert!(output.contains("Mean edge length: 1.138071\n"));
}

#[test]
fn surface_information_rejects_metric_input() {
    let provider = provider();
    let error = run(&provider, "-surface-information", &["a.func.gii"]).expect_err("not a surface");
    assert!(matches!(error, CommandError::File(_)));
}
