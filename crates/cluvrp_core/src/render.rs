//! Tour rendering with cluster overlays.
//!
//! Draws the cyclic tour as a gray polyline, each cluster as a translucent
//! enclosing circle around its visited members, member nodes colored per
//! cluster, and the depot as a black square excluded from cluster coloring.
//! The caption carries the broken-cluster count and penalty. Purely
//! presentational; nothing here affects scoring.

use std::path::Path;

use plotters::prelude::*;

use crate::{ClusterAssignment, ContiguityReport, Error, Instance, Result};

const CIRCLE_SEGMENTS: usize = 64;
const NODE_MARKER_SIZE: i32 = 4;
const DEPOT_MARKER_HALF_SIZE: i32 = 5;

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Extra radius added around each cluster's farthest member.
    pub cluster_padding: f64,
    /// Whether to draw node-id labels next to the markers.
    pub draw_labels: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1_000,
            height: 600,
            cluster_padding: 3.0,
            draw_labels: true,
        }
    }
}

/// Renders the solution to a PNG at `path`.
///
/// `tour` must already be filtered against the instance; unknown ids are
/// ignored defensively rather than drawn at a guessed position.
pub fn render_solution(
    path: &Path,
    instance: &Instance,
    tour: &[usize],
    clusters: &ClusterAssignment,
    report: &ContiguityReport,
    config: &RenderConfig,
) -> Result<()> {
    if instance.is_empty() {
        return Err(Error::invalid_data("nothing to draw: instance has no coordinates"));
    }

    let (x_range, y_range) = padded_bounds(instance, config.cluster_padding);
    let caption = format!(
        "{} | broken clusters: {} | penalty: {}",
        instance.name,
        report.broken_count(),
        report.penalty
    );

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_error)?;
    chart.configure_mesh().draw().map_err(draw_error)?;

    let visited: Vec<&crate::Node> = tour
        .iter()
        .filter_map(|id| instance.node(*id))
        .collect();

    // Tour edges, closing the loop back to the first node.
    if visited.len() >= 2 {
        let mut polyline: Vec<(f64, f64)> =
            visited.iter().map(|node| (node.x, node.y)).collect();
        polyline.push((visited[0].x, visited[0].y));
        chart
            .draw_series(LineSeries::new(polyline, &RGBColor(158, 158, 158)))
            .map_err(draw_error)?;
    }

    let cluster_ids = clusters.unique_clusters();
    let color_index = |cluster: usize| {
        cluster_ids
            .iter()
            .position(|id| *id == cluster)
            .unwrap_or_default()
    };

    // Enclosing circles, one per cluster with visited non-depot members.
    for (idx, cluster) in cluster_ids.iter().enumerate() {
        let members: Vec<(f64, f64)> = visited
            .iter()
            .filter(|node| !node.is_depot())
            .filter(|node| clusters.cluster_of(node.id) == Some(*cluster))
            .map(|node| (node.x, node.y))
            .collect();
        if members.is_empty() {
            continue;
        }

        let (center, radius) = enclosing_circle(&members, config.cluster_padding);
        let outline: Vec<(f64, f64)> = (0..=CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = i as f64 / CIRCLE_SEGMENTS as f64 * std::f64::consts::TAU;
                (
                    center.0 + radius * angle.cos(),
                    center.1 + radius * angle.sin(),
                )
            })
            .collect();
        chart
            .draw_series(std::iter::once(Polygon::new(
                outline,
                Palette99::pick(idx).mix(0.1),
            )))
            .map_err(draw_error)?;
    }

    // Member nodes, colored per cluster; unassigned non-depot nodes stay gray.
    chart
        .draw_series(visited.iter().filter(|node| !node.is_depot()).map(|node| {
            let style = match clusters.cluster_of(node.id) {
                Some(cluster) => Palette99::pick(color_index(cluster)).filled(),
                None => RGBColor(120, 120, 120).filled(),
            };
            Circle::new((node.x, node.y), NODE_MARKER_SIZE, style)
        }))
        .map_err(draw_error)?;

    if config.draw_labels {
        chart
            .draw_series(visited.iter().filter(|node| !node.is_depot()).map(|node| {
                EmptyElement::at((node.x, node.y))
                    + Text::new(node.id.to_string(), (6, -12), ("sans-serif", 11))
            }))
            .map_err(draw_error)?;
    }

    // Depot as a black square with its own label.
    if let Some(depot) = visited.iter().find(|node| node.is_depot()) {
        let half = DEPOT_MARKER_HALF_SIZE;
        chart
            .draw_series(std::iter::once(
                EmptyElement::at((depot.x, depot.y))
                    + Rectangle::new([(-half, -half), (half, half)], BLACK.filled())
                    + Text::new("d0".to_string(), (6, -14), ("sans-serif", 12)),
            ))
            .map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;
    log::info!("render: wrote {}", path.display());
    Ok(())
}

/// Centroid of the points plus the distance to the farthest member, padded.
pub(crate) fn enclosing_circle(points: &[(f64, f64)], padding: f64) -> ((f64, f64), f64) {
    let n = points.len() as f64;
    let cx = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let cy = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let radius = points
        .iter()
        .map(|(x, y)| (x - cx).hypot(y - cy))
        .fold(0.0_f64, f64::max);
    ((cx, cy), radius + padding)
}

fn padded_bounds(
    instance: &Instance,
    cluster_padding: f64,
) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for node in instance.nodes() {
        x_min = x_min.min(node.x);
        x_max = x_max.max(node.x);
        y_min = y_min.min(node.y);
        y_max = y_max.max(node.y);
    }

    // Leave room for cluster circles that extend past the outermost nodes.
    let x_pad = ((x_max - x_min) * 0.05).max(cluster_padding * 2.0);
    let y_pad = ((y_max - y_min) * 0.05).max(cluster_padding * 2.0);
    (
        (x_min - x_pad)..(x_max + x_pad),
        (y_min - y_pad)..(y_max + y_pad),
    )
}

fn draw_error(e: impl std::fmt::Display) -> Error {
    Error::other(format!("render: {e}"))
}

#[cfg(test)]
mod tests {
    use super::enclosing_circle;

    #[test]
    fn enclosing_circle_centers_on_the_centroid() {
        let points = [(0.0, 0.0), (2.0, 0.0), (1.0, 2.0)];
        let ((cx, cy), _) = enclosing_circle(&points, 0.0);

        assert!((cx - 1.0).abs() < 1e-12);
        assert!((cy - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn enclosing_circle_reaches_the_farthest_member_plus_padding() {
        let points = [(0.0, 0.0), (6.0, 0.0)];
        let (center, radius) = enclosing_circle(&points, 3.0);

        assert_eq!(center, (3.0, 0.0));
        assert!((radius - 6.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_cluster_gets_a_padding_sized_circle() {
        let points = [(5.0, 5.0)];
        let (center, radius) = enclosing_circle(&points, 3.0);

        assert_eq!(center, (5.0, 5.0));
        assert!((radius - 3.0).abs() < 1e-12);
    }
}
