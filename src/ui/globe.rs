// Globe rendering module
//
// Renders the rotating globe canvas: sphere outline, graticule, cloud
// region markers, exchange nodes and tier-colored latency arcs. Points on
// the far hemisphere (negative Z after rotation) are hidden.

use crate::app::AppState;
use crate::theme::{dim, provider_color, tier_color, ACCENT_BLUE, OCEAN_BLUE, SLATE};
use latglobe::geo::{project_to_sphere, Point3D, DISPLAY_RADIUS, GLOBE_RADIUS, REGION_RADIUS};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
        Block, BorderType, Borders,
    },
    Frame,
};
use std::f64::consts::PI;

/// Half-height of the visible canvas in globe units
const VIEW_EXTENT: f64 = 2.5;

/// Segments per latency arc
const ARC_SEGMENTS: usize = 24;

/// Peak height of an arc above the display radius, as a fraction of it
const ARC_LIFT: f64 = 0.12;

/// Brightness of synthesized (fallback) edges
const SYNTHESIZED_DIM: f32 = 0.55;

/// Graticule spacing in degrees
const GRATICULE_STEP_DEG: i32 = 30;

/// Rotate `point` by the view rotation and drop it onto the screen plane
///
/// Returns `None` for points on the far hemisphere.
pub fn screen_point(point: Point3D, rotation: f64) -> Option<(f64, f64)> {
    let rotated = point.rotate_y(rotation);
    (rotated.z >= 0.0).then_some((rotated.x, rotated.y))
}

/// Points of an arc from `start` to `end` bowing away from the sphere
///
/// Interpolates along the great circle and lifts the middle of the arc.
/// Nearly coincident or antipodal endpoints fall back to a straight chord.
pub fn arc_points(start: Point3D, end: Point3D, segments: usize) -> Vec<Point3D> {
    let radius = (start.length() + end.length()) / 2.0;
    if radius == 0.0 || segments == 0 {
        return vec![start, end];
    }

    let dot = (start.x * end.x + start.y * end.y + start.z * end.z) / (start.length() * end.length());
    let omega = dot.clamp(-1.0, 1.0).acos();
    let sin_omega = omega.sin();

    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let (wa, wb) = if sin_omega.abs() < 1e-6 {
                (1.0 - t, t)
            } else {
                (((1.0 - t) * omega).sin() / sin_omega, (t * omega).sin() / sin_omega)
            };
            let p = Point3D::new(
                wa * start.x + wb * end.x,
                wa * start.y + wb * end.y,
                wa * start.z + wb * end.z,
            );
            let len = p.length();
            if len == 0.0 {
                return p;
            }
            let scale = radius * (1.0 + ARC_LIFT * (PI * t).sin()) / len;
            Point3D::new(p.x * scale, p.y * scale, p.z * scale)
        })
        .collect()
}

/// Visible graticule points (parallels and meridians)
fn graticule(rotation: f64) -> Vec<(f64, f64)> {
    let mut coords = Vec::new();
    for lat in (-60..=60).step_by(GRATICULE_STEP_DEG as usize) {
        for lng in (-180..180).step_by(3) {
            coords.extend(screen_point(project_to_sphere(lat as f64, lng as f64, GLOBE_RADIUS), rotation));
        }
    }
    for lng in (-180..180).step_by(GRATICULE_STEP_DEG as usize) {
        for lat in (-90..=90).step_by(3) {
            coords.extend(screen_point(project_to_sphere(lat as f64, lng as f64, GLOBE_RADIUS), rotation));
        }
    }
    coords
}

pub fn render_globe(f: &mut Frame, area: Rect, app: &AppState) {
    let rotation = app.rotation;
    let settings = app.globe_settings.clone();
    let selected_id = app.selected().map(|n| n.id.clone());

    // Terminal cells are about twice as tall as wide
    let aspect = if area.height == 0 {
        1.0
    } else {
        area.width as f64 / (area.height as f64 * 2.0)
    };
    let x_extent = VIEW_EXTENT * aspect.max(0.1);

    let grid = graticule(rotation);

    let regions: Vec<_> = if settings.show_regions {
        app.store
            .regions()
            .iter()
            .filter_map(|r| {
                screen_point(r.position.project(REGION_RADIUS), rotation)
                    .map(|(x, y)| (x, y, provider_color(r.provider)))
            })
            .collect()
    } else {
        Vec::new()
    };

    let arcs: Vec<_> = app
        .edges()
        .iter()
        .map(|edge| {
            let color = if edge.synthesized {
                dim(tier_color(edge.tier), SYNTHESIZED_DIM)
            } else {
                tier_color(edge.tier)
            };
            let points: Vec<Option<(f64, f64)>> = arc_points(edge.start, edge.end, ARC_SEGMENTS)
                .into_iter()
                .map(|p| screen_point(p, rotation))
                .collect();
            (points, color)
        })
        .collect();

    let markers: Vec<_> = app
        .filtered_nodes()
        .iter()
        .filter_map(|node| {
            screen_point(node.position.project(DISPLAY_RADIUS), rotation).map(|(x, y)| {
                let selected = selected_id.as_deref() == Some(node.id.as_str());
                (x, y, node.name.clone(), provider_color(node.provider), selected)
            })
        })
        .collect();

    let title = format!(
        "━ 🌐 Exchange Latency Globe ({} nodes, {} links) ━",
        app.filtered_nodes().len(),
        app.edges().len()
    );

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_BLUE))
                .title(Span::styled(
                    title,
                    Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
                )),
        )
        .marker(Marker::Braille)
        .x_bounds([-x_extent, x_extent])
        .y_bounds([-VIEW_EXTENT, VIEW_EXTENT])
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &grid,
                color: dim(OCEAN_BLUE, 0.7),
            });
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: GLOBE_RADIUS,
                color: OCEAN_BLUE,
            });

            for &(x, y, color) in &regions {
                ctx.print(x, y, Span::styled("◦", Style::default().fg(color)));
            }

            ctx.layer();

            // Consecutive visible arc points become line segments
            for (points, color) in &arcs {
                for pair in points.windows(2) {
                    if let (Some((x1, y1)), Some((x2, y2))) = (pair[0], pair[1]) {
                        ctx.draw(&CanvasLine {
                            x1,
                            y1,
                            x2,
                            y2,
                            color: *color,
                        });
                    }
                }
            }

            ctx.layer();

            for (x, y, name, color, selected) in &markers {
                let (symbol, style) = if *selected {
                    ("◉", Style::default().fg(*color).add_modifier(Modifier::BOLD))
                } else {
                    ("●", Style::default().fg(*color))
                };
                ctx.print(*x, *y, Span::styled(symbol, style));

                if settings.labels_enabled || *selected {
                    let label_style = if *selected {
                        Style::default().fg(*color).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(SLATE)
                    };
                    ctx.print(*x + 0.12, *y, Span::styled(format!(" {}", name), label_style));
                }
            }
        });

    f.render_widget(canvas, area);
}
