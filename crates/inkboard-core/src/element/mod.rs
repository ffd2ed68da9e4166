//! Element definitions for the board.

mod circle;
mod decoration;
mod freehand;
mod line;
mod rectangle;
mod sticker;
mod text;

pub use circle::Circle;
pub use decoration::{AnimationKind, Decoration};
pub use freehand::Freehand;
pub use line::Line;
pub use rectangle::Rectangle;
pub use sticker::Sticker;
pub use text::{ApproxTextMeasure, Text, TextMeasure};

use crate::error::{EngineError, Result};
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Same color with the alpha channel scaled by `opacity`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Named palette colors offered to the user.
pub mod palette {
    use super::SerializableColor;

    pub const BLACK: SerializableColor = SerializableColor::rgb(0x00, 0x00, 0x00);
    pub const RED: SerializableColor = SerializableColor::rgb(0xFF, 0x00, 0x00);
    pub const ORANGE: SerializableColor = SerializableColor::rgb(0xFF, 0xA5, 0x00);
    pub const YELLOW: SerializableColor = SerializableColor::rgb(0xFF, 0xFF, 0x00);
    pub const GREEN: SerializableColor = SerializableColor::rgb(0x00, 0x80, 0x00);
    pub const BLUE: SerializableColor = SerializableColor::rgb(0x00, 0x00, 0xFF);
    pub const PURPLE: SerializableColor = SerializableColor::rgb(0x80, 0x00, 0x80);
    pub const PINK: SerializableColor = SerializableColor::rgb(0xFF, 0xC0, 0xCB);

    /// All palette entries with their display names, in toolbar order.
    pub const ALL: [(&str, SerializableColor); 8] = [
        ("Black", BLACK),
        ("Red", RED),
        ("Orange", ORANGE),
        ("Yellow", YELLOW),
        ("Green", GREEN),
        ("Blue", BLUE),
        ("Purple", PURPLE),
        ("Pink", PINK),
    ];
}

/// Named stroke width presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeWidth {
    Thin,
    #[default]
    Medium,
    Thick,
    Big,
}

impl StrokeWidth {
    /// Multiplier applied to the selected width for stylus input.
    pub const PEN_FACTOR: f64 = 1.5;

    pub fn value(self) -> f64 {
        match self {
            StrokeWidth::Thin => 2.0,
            StrokeWidth::Medium => 4.0,
            StrokeWidth::Thick => 6.0,
            StrokeWidth::Big => 10.0,
        }
    }

    /// Cycle to the next preset.
    pub fn next(self) -> Self {
        match self {
            StrokeWidth::Thin => StrokeWidth::Medium,
            StrokeWidth::Medium => StrokeWidth::Thick,
            StrokeWidth::Thick => StrokeWidth::Big,
            StrokeWidth::Big => StrokeWidth::Thin,
        }
    }
}

/// Fill style for closed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillStyle {
    #[default]
    None,
    Solid,
    Hachure,
    ZigZag,
    CrossHatch,
}

/// Style properties shared by Line, Rectangle and Circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    #[serde(default)]
    pub fill: FillStyle,
    #[serde(default = "SerializableColor::transparent")]
    pub fill_color: SerializableColor,
    /// Seed for the sketchy drawable; persisted so regeneration is stable.
    #[serde(default = "generate_seed")]
    pub seed: u32,
}

impl ShapeStyle {
    fn from_draw_style(style: &DrawStyle) -> Self {
        Self {
            stroke_color: style.stroke_color,
            stroke_width: style.stroke_width,
            fill: style.fill,
            fill_color: style.fill_color,
            seed: generate_seed(),
        }
    }
}

/// Generate a seed for new shapes.
pub(crate) fn generate_seed() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);
    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    // splitmix32
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

/// The pen state used to create new elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawStyle {
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    pub fill: FillStyle,
    pub fill_color: SerializableColor,
    pub font_size: f64,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: StrokeWidth::Medium.value(),
            fill: FillStyle::None,
            fill_color: SerializableColor::transparent(),
            font_size: 36.0,
        }
    }
}

/// Element type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Freehand,
    Line,
    Rectangle,
    Circle,
    Text,
    Sticker,
    Decoration,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Freehand => "freehand",
            ElementKind::Line => "line",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Text => "text",
            ElementKind::Sticker => "sticker",
            ElementKind::Decoration => "decoration",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = EngineError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "freehand" | "pencil" => Ok(ElementKind::Freehand),
            "line" => Ok(ElementKind::Line),
            "rectangle" | "rect" => Ok(ElementKind::Rectangle),
            "circle" => Ok(ElementKind::Circle),
            "text" => Ok(ElementKind::Text),
            "sticker" | "image" => Ok(ElementKind::Sticker),
            "decoration" => Ok(ElementKind::Decoration),
            _ => Err(EngineError::InvalidElementType(tag.to_string())),
        }
    }
}

/// A drawable unit on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Freehand(Freehand),
    Line(Line),
    Rectangle(Rectangle),
    Circle(Circle),
    Text(Text),
    Sticker(Sticker),
    Decoration(Decoration),
}

impl Element {
    /// Construct an element of `kind` anchored at `at`, with every other
    /// field taken from `style` or its documented default.
    ///
    /// Stickers and decorations start with an empty source and unit size;
    /// they are normally created fully-formed by the asset pipeline.
    pub fn create(kind: ElementKind, at: Point, style: &DrawStyle) -> Self {
        match kind {
            ElementKind::Freehand => {
                Element::Freehand(Freehand::new(at, style.stroke_color, style.stroke_width))
            }
            ElementKind::Line => Element::Line(Line::new(at, at, ShapeStyle::from_draw_style(style))),
            ElementKind::Rectangle => {
                Element::Rectangle(Rectangle::new(at, at, ShapeStyle::from_draw_style(style)))
            }
            ElementKind::Circle => {
                Element::Circle(Circle::new(at, at, ShapeStyle::from_draw_style(style)))
            }
            ElementKind::Text => Element::Text(Text::new(
                at,
                String::new(),
                style.font_size,
                style.stroke_color,
            )),
            ElementKind::Sticker => Element::Sticker(Sticker::new(at, 1.0, 1.0, String::new())),
            ElementKind::Decoration => Element::Decoration(Decoration::new(
                at,
                kurbo::Size::new(1.0, 1.0),
                AnimationKind::default(),
                String::new(),
                0,
                0,
            )),
        }
    }

    /// Construct an element from a type tag.
    pub fn from_tag(tag: &str, at: Point, style: &DrawStyle) -> Result<Self> {
        Ok(Self::create(tag.parse()?, at, style))
    }

    pub fn id(&self) -> ElementId {
        match self {
            Element::Freehand(e) => e.id,
            Element::Line(e) => e.id,
            Element::Rectangle(e) => e.id,
            Element::Circle(e) => e.id,
            Element::Text(e) => e.id,
            Element::Sticker(e) => e.id,
            Element::Decoration(e) => e.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Freehand(_) => ElementKind::Freehand,
            Element::Line(_) => ElementKind::Line,
            Element::Rectangle(_) => ElementKind::Rectangle,
            Element::Circle(_) => ElementKind::Circle,
            Element::Text(_) => ElementKind::Text,
            Element::Sticker(_) => ElementKind::Sticker,
            Element::Decoration(_) => ElementKind::Decoration,
        }
    }

    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Element::Freehand(e) => e.bounds(),
            Element::Line(e) => e.bounds(),
            Element::Rectangle(e) => e.as_rect(),
            Element::Circle(e) => e.bounds(),
            Element::Text(e) => e.bounds(),
            Element::Sticker(e) => e.bounds(),
            Element::Decoration(e) => e.bounds(),
        }
    }

    /// Translate every coordinate-bearing field.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Element::Freehand(e) => e.points.iter_mut().for_each(|p| *p += delta),
            Element::Line(e) => {
                e.start += delta;
                e.end += delta;
            }
            Element::Rectangle(e) => {
                e.p1 += delta;
                e.p2 += delta;
            }
            Element::Circle(e) => {
                e.center += delta;
                e.edge += delta;
            }
            Element::Text(e) => e.anchor += delta,
            Element::Sticker(e) => e.anchor += delta,
            Element::Decoration(e) => e.position += delta,
        }
    }

    /// Shape style for variants that carry a sketchy drawable.
    pub fn shape_style(&self) -> Option<&ShapeStyle> {
        match self {
            Element::Line(e) => Some(&e.style),
            Element::Rectangle(e) => Some(&e.style),
            Element::Circle(e) => Some(&e.style),
            _ => None,
        }
    }

    pub fn is_decoration(&self) -> bool {
        matches!(self, Element::Decoration(_))
    }

    /// Give this element a fresh identifier.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Element::Freehand(e) => e.id = new_id,
            Element::Line(e) => e.id = new_id,
            Element::Rectangle(e) => e.id = new_id,
            Element::Circle(e) => e.id = new_id,
            Element::Text(e) => e.id = new_id,
            Element::Sticker(e) => e.id = new_id,
            Element::Decoration(e) => e.id = new_id,
        }
    }
}
