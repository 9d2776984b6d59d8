use std::f32::consts::TAU;

use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2, pos2, vec2};

use crate::scene::{IconGlyph, Rgba, Scene, SceneItem};

const GRADIENT_SEGMENTS: usize = 4;

pub(super) fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r,
        color.g,
        color.b,
        (color.a.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Flat hexagon, first vertex at `rotation` radians.
pub(super) fn hexagon_points(center: Pos2, radius: f32, rotation: f32) -> Vec<Pos2> {
    (0..6)
        .map(|corner| {
            let angle = rotation + corner as f32 * (TAU / 6.0);
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Dark page backdrop with the faint grid from the hero section.
pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(5, 9, 20));

    let step = 56.0;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(51, 102, 204, 18));

    let mut x = rect.left() + step;
    while x < rect.right() {
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + step;
    while y < rect.bottom() {
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
        y += step;
    }
}

/// egui strokes are single-colored, so a gradient line is drawn as a few
/// segments stepping from one end color to the other.
fn gradient_line(
    painter: &Painter,
    from: Pos2,
    to: Pos2,
    width: f32,
    start: Color32,
    end: Color32,
) {
    if start == end {
        painter.line_segment([from, to], Stroke::new(width, start));
        return;
    }

    for segment in 0..GRADIENT_SEGMENTS {
        let t0 = segment as f32 / GRADIENT_SEGMENTS as f32;
        let t1 = (segment + 1) as f32 / GRADIENT_SEGMENTS as f32;
        let mid = (t0 + t1) * 0.5;
        painter.line_segment(
            [from.lerp(to, t0), from.lerp(to, t1)],
            Stroke::new(width, blend_color(start, end, mid)),
        );
    }
}

fn draw_icon(painter: &Painter, center: Pos2, size: f32, glyph: IconGlyph, color: Color32) {
    let half = size * 0.5;
    let stroke = Stroke::new((size / 12.0).max(1.0), color);

    match glyph {
        IconGlyph::Clock => {
            painter.circle_stroke(center, half * 0.85, stroke);
            painter.line_segment([center, center - vec2(0.0, half * 0.5)], stroke);
            painter.line_segment([center, center + vec2(half * 0.35, half * 0.2)], stroke);
        }
        IconGlyph::Calendar => {
            let top = center.y - half * 0.6;
            let body =
                Rect::from_center_size(center + vec2(0.0, half * 0.1), Vec2::splat(size * 0.75));
            painter.add(Shape::closed_line(
                vec![
                    body.left_top(),
                    body.right_top(),
                    body.right_bottom(),
                    body.left_bottom(),
                ],
                stroke,
            ));
            let rule = body.top() + body.height() * 0.3;
            painter.line_segment([pos2(body.left(), rule), pos2(body.right(), rule)], stroke);
            for x in [center.x - half * 0.35, center.x + half * 0.35] {
                painter.line_segment(
                    [pos2(x, top - half * 0.2), pos2(x, top + half * 0.15)],
                    stroke,
                );
            }
        }
        IconGlyph::Pin => {
            let head = center - vec2(0.0, half * 0.2);
            painter.circle_stroke(head, half * 0.55, stroke);
            painter.circle_filled(head, half * 0.18, color);
            let tip = center + vec2(0.0, half * 0.9);
            for side in [-1.0, 1.0] {
                painter.line_segment([head + vec2(side * half * 0.4, half * 0.38), tip], stroke);
            }
        }
        IconGlyph::Bell => {
            let rim = center.y + half * 0.45;
            painter.add(Shape::line(
                vec![
                    pos2(center.x - half * 0.8, rim),
                    pos2(center.x - half * 0.5, rim - half * 0.3),
                    pos2(center.x - half * 0.5, center.y - half * 0.25),
                    pos2(center.x, center.y - half * 0.75),
                    pos2(center.x + half * 0.5, center.y - half * 0.25),
                    pos2(center.x + half * 0.5, rim - half * 0.3),
                    pos2(center.x + half * 0.8, rim),
                    pos2(center.x - half * 0.8, rim),
                ],
                stroke,
            ));
            painter.circle_filled(pos2(center.x, rim + half * 0.25), half * 0.15, color);
        }
    }
}

/// Paints scene records in order, shifted by `offset` into screen space.
pub(super) fn paint_scene(painter: &Painter, offset: Vec2, scene: &Scene) {
    let at = |position: [f32; 2]| pos2(position[0], position[1]) + offset;

    for item in &scene.items {
        match item {
            SceneItem::Circle {
                center,
                radius,
                fill,
            } => {
                painter.circle_filled(at(*center), *radius, to_color32(*fill));
            }
            SceneItem::Ring {
                center,
                radius,
                width,
                color,
            } => {
                painter.circle_stroke(
                    at(*center),
                    *radius,
                    Stroke::new(*width, to_color32(*color)),
                );
            }
            SceneItem::Hexagon {
                center,
                radius,
                rotation,
                fill,
                stroke,
            } => {
                let stroke =
                    stroke.map_or(Stroke::NONE, |color| Stroke::new(1.0, to_color32(color)));
                painter.add(Shape::convex_polygon(
                    hexagon_points(at(*center), *radius, *rotation),
                    to_color32(*fill),
                    stroke,
                ));
            }
            SceneItem::Line {
                from,
                to,
                width,
                start_color,
                end_color,
            } => {
                gradient_line(
                    painter,
                    at(*from),
                    at(*to),
                    *width,
                    to_color32(*start_color),
                    to_color32(*end_color),
                );
            }
            SceneItem::Label {
                anchor,
                text,
                size,
                color,
            } => {
                painter.text(
                    at(*anchor),
                    Align2::CENTER_CENTER,
                    text,
                    FontId::proportional(*size),
                    to_color32(*color),
                );
            }
            SceneItem::Icon {
                center,
                size,
                glyph,
                color,
            } => {
                draw_icon(painter, at(*center), *size, *glyph, to_color32(*color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_maps_to_bytes() {
        let color = to_color32(Rgba::new(77, 157, 224, 0.6));
        assert_eq!(color.a(), 153);
        assert_eq!(to_color32(Rgba::new(0, 0, 0, 0.0)).a(), 0);
    }

    #[test]
    fn hexagon_has_six_corners_on_the_radius() {
        let center = pos2(10.0, 10.0);
        let points = hexagon_points(center, 30.0, 0.3);
        assert_eq!(points.len(), 6);
        for point in &points {
            assert!((point.distance(center) - 30.0).abs() < 1e-3);
        }
        let first = center + vec2(0.3_f32.cos(), 0.3_f32.sin()) * 30.0;
        assert!((points[0] - first).length() < 1e-4);
    }

    #[test]
    fn blend_hits_both_ends() {
        let red = Color32::from_rgb(255, 0, 0);
        let blue = Color32::from_rgb(0, 0, 255);
        assert_eq!(blend_color(red, blue, 0.0), red);
        assert_eq!(blend_color(red, blue, 1.0), blue);
    }
}
