use std::collections::HashSet;

use ndarray::{ArrayView1, ArrayView2, Axis};

use crate::commands::{Operation, OperationContext, ParamKind, ParameterComponent, Result};
use crate::model::{FileKind, GiftiFile};

/// Geometry figures printed for a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSummary {
    pub vertices: usize,
    pub triangles: usize,
    pub minimum: [f32; 3],
    pub maximum: [f32; 3],
    pub mean_edge_length: f64,
}

impl SurfaceSummary {
    pub fn from_surface(surface: &GiftiFile) -> Result<Self> {
        let coordinates = surface.coordinates()?;
        let triangles = surface.triangles()?;
        let bound = |init: f32, pick: fn(f32, f32) -> f32| -> [f32; 3] {
            let folded = coordinates.fold_axis(Axis(0), init, |acc, value| pick(*acc, *value));
            [folded[0], folded[1], folded[2]]
        };
        let (minimum, maximum) = if coordinates.nrows() == 0 {
            ([0.0; 3], [0.0; 3])
        } else {
            (bound(f32::INFINITY, f32::min), bound(f32::NEG_INFINITY, f32::max))
        };
        Ok(Self {
            vertices: coordinates.nrows(),
            triangles: triangles.nrows(),
            minimum,
            maximum,
            mean_edge_length: mean_edge_length(coordinates, triangles),
        })
    }
}

fn mean_edge_length(coordinates: ArrayView2<'_, f32>, triangles: ArrayView2<'_, i32>) -> f64 {
    let mut edges = HashSet::new();
    for triangle in triangles.rows() {
        for (first, second) in [(0, 1), (1, 2), (2, 0)] {
            let (a, b) = (triangle[first] as usize, triangle[second] as usize);
            edges.insert((a.min(b), a.max(b)));
        }
    }
    if edges.is_empty() {
        return 0.0;
    }
    let distance = |a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>| {
        a.iter()
            .zip(b.iter())
            .map(|(left, right)| f64::from(left - right).powi(2))
            .sum::<f64>()
            .sqrt()
    };
    let total = edges
        .iter()
        .map(|(a, b)| distance(coordinates.row(*a), coordinates.row(*b)))
        .sum::<f64>();
    total / edges.len() as f64
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SurfaceInformationOp;

impl Operation for SurfaceInformationOp {
    fn switch(&self) -> &'static str {
        "-surface-information"
    }

    fn short_description(&self) -> &'static str {
        "DISPLAY INFORMATION ABOUT A SURFACE"
    }

    fn parameters(&self) -> ParameterComponent {
        let mut params = ParameterComponent::new();
        params.add_param(
            ParamKind::File(FileKind::Surface),
            "surface",
            "the surface file",
        );
        params
    }

    fn help_text(&self) -> &'static str {
        "Prints the number of vertices and triangles, the coordinate bounds and the mean edge length of the surface."
    }

    fn execute(
        &self,
        params: &mut ParameterComponent,
        context: &mut OperationContext<'_>,
    ) -> Result<()> {
        let path = params.file("surface")?.path().display().to_string();
        let summary = SurfaceSummary::from_surface(params.gifti("surface")?)?;
        let [min_x, min_y, min_z] = summary.minimum;
        let [max_x, max_y, max_z] = summary.maximum;
        writeln!(context.out, "Name: {path}")?;
        writeln!(context.out, "Number of vertices: {}", summary.vertices)?;
        writeln!(context.out, "Number of triangles: {}", summary.triangles)?;
        writeln!(context.out, "Minimum coordinates: ({min_x}, {min_y}, {min_z})")?;
        writeln!(context.out, "Maximum coordinates: ({max_x}, {max_y}, {max_z})")?;
        writeln!(
            context.out,
            "Mean edge length: {:.6}",
            summary.mean_edge_length
        )?;
        Ok(())
    }
}
