use eframe::egui::{Pos2, Rect, pos2};
use serde::{Deserialize, Serialize};

/// Straight RGB with a 0..1 alpha, the way the stylesheet writes `rgba()`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Drawable area handed to a component. A surface with no area is treated as
/// missing, so constructing one is fallible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Option<Self> {
        let usable = |extent: f32| extent.is_finite() && extent >= 1.0;
        if usable(width) && usable(height) {
            Some(Self { width, height })
        } else {
            None
        }
    }

    pub fn from_rect(rect: Rect) -> Option<Self> {
        Self::new(rect.width(), rect.height())
    }

    pub fn area(self) -> f64 {
        self.width as f64 * self.height as f64
    }

    pub fn center(self) -> Pos2 {
        pos2(self.width * 0.5, self.height * 0.5)
    }

    pub fn min_side(self) -> f32 {
        self.width.min(self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconGlyph {
    Clock,
    Calendar,
    Pin,
    Bell,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneItem {
    Circle {
        center: [f32; 2],
        radius: f32,
        fill: Rgba,
    },
    Ring {
        center: [f32; 2],
        radius: f32,
        width: f32,
        color: Rgba,
    },
    Hexagon {
        center: [f32; 2],
        radius: f32,
        rotation: f32,
        fill: Rgba,
        stroke: Option<Rgba>,
    },
    Line {
        from: [f32; 2],
        to: [f32; 2],
        width: f32,
        start_color: Rgba,
        end_color: Rgba,
    },
    Label {
        anchor: [f32; 2],
        text: String,
        size: f32,
        color: Rgba,
    },
    Icon {
        center: [f32; 2],
        size: f32,
        glyph: IconGlyph,
        color: Rgba,
    },
}

/// One frame worth of draw records, in paint order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub items: Vec<SceneItem>,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: SceneItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, SceneItem::Line { .. }))
            .count()
    }
}

pub fn point(position: Pos2) -> [f32; 2] {
    [position.x, position.y]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_degenerate_surfaces_are_missing() {
        assert!(Viewport::new(0.0, 600.0).is_none());
        assert!(Viewport::new(800.0, -1.0).is_none());
        assert!(Viewport::new(f32::NAN, 600.0).is_none());
        assert!(Viewport::new(f32::INFINITY, 600.0).is_none());
        assert!(Viewport::new(800.0, 600.0).is_some());
    }

    #[test]
    fn viewport_geometry() {
        let viewport = Viewport::new(1200.0, 800.0).expect("valid viewport");
        assert_eq!(viewport.area(), 960_000.0);
        assert_eq!(viewport.center(), pos2(600.0, 400.0));
        assert_eq!(viewport.min_side(), 800.0);
    }

    #[test]
    fn scene_items_serialize_with_kind_tag() {
        let mut scene = Scene::new(Viewport::new(10.0, 10.0).expect("valid viewport"));
        scene.push(SceneItem::Circle {
            center: [1.0, 2.0],
            radius: 3.0,
            fill: Rgba::new(255, 255, 255, 0.3),
        });

        let json = serde_json::to_value(&scene).expect("scene serializes");
        assert_eq!(json["items"][0]["kind"], "circle");
        assert_eq!(json["items"][0]["center"][1], 2.0);
        assert_eq!(scene.line_count(), 0);
    }

    #[test]
    fn with_alpha_clamps() {
        let color = Rgba::new(1, 2, 3, 0.5);
        assert_eq!(color.with_alpha(1.7).a, 1.0);
        assert_eq!(color.with_alpha(-0.2).a, 0.0);
        assert_eq!(color.with_alpha(0.25).r, 1);
    }
}
