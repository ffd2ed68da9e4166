//! Per-frame scene painting.
//!
//! Layers, bottom to top: background, world-space grid, decorations, elements
//! with the selection box, then the screen-space text editor and alert.

use crate::animation::animation_transform;
use crate::config::{GridStyle, RenderConfig};
use crate::error::{RenderError, RenderResult};
use crate::outline::freehand_path;
use crate::surface::Surface;
use inkboard_core::drawable::{Drawable, DrawableFill};
use inkboard_core::element::{Decoration, Sticker, Text};
use inkboard_core::{Element, ElementId, EngineState, SerializableColor};
use kurbo::{BezPath, Point, Rect, Shape, Size, Vec2};
use peniko::Color;

/// Gap between an element and its selection box, world units.
const SELECTION_PADDING: f64 = 4.0;
/// Gap between a decoration and its outline, world units.
const DECORATION_OUTLINE_PADDING: f64 = 2.0;
const DECORATION_OUTLINE_WIDTH: f64 = 2.0;
/// Padding around the text editor box, screen pixels.
const EDITOR_PADDING: f64 = 4.0;
const GRID_DOT_SIZE: f64 = 1.5;
/// Cap on grid lines per axis; denser grids are skipped.
const MAX_GRID_LINES: f64 = 2000.0;

fn color(c: SerializableColor) -> Color {
    c.into()
}

/// Context for a single frame.
pub struct RenderContext<'a> {
    pub state: &'a EngineState,
    /// Wall-clock time driving decoration animations and the alert.
    pub now_ms: u64,
    pub config: &'a RenderConfig,
}

impl<'a> RenderContext<'a> {
    pub fn new(state: &'a EngineState, config: &'a RenderConfig, now_ms: u64) -> Self {
        Self {
            state,
            now_ms,
            config,
        }
    }
}

/// Something that can paint a frame onto a surface.
pub trait Renderer {
    fn render(&mut self, ctx: &RenderContext, surface: &mut dyn Surface) -> RenderResult<()>;
}

/// The standard five-layer painter. Stateless apart from a frame counter.
#[derive(Debug, Default)]
pub struct ScenePainter {
    frames: u64,
}

impl ScenePainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames painted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn render_grid(&self, ctx: &RenderContext, surface: &mut dyn Surface) {
        let config = ctx.config;
        let size = ctx.state.config.grid_size;
        if config.grid_style == GridStyle::None || size <= 0.0 {
            return;
        }
        let viewport = &ctx.state.viewport;
        let visible = viewport.visible_world(ctx.state.viewport_size);
        let start_x = (visible.x0 / size).floor() * size;
        let start_y = (visible.y0 / size).floor() * size;
        let end_x = (visible.x1 / size).ceil() * size;
        let end_y = (visible.y1 / size).ceil() * size;
        if (end_x - start_x) / size > MAX_GRID_LINES || (end_y - start_y) / size > MAX_GRID_LINES {
            log::debug!("Grid too dense at scale {}, skipping", viewport.scale);
            return;
        }

        let mut path = BezPath::new();
        match config.grid_style {
            GridStyle::None => {}
            GridStyle::Lines => {
                let mut x = start_x;
                while x <= end_x {
                    path.move_to(Point::new(x, start_y));
                    path.line_to(Point::new(x, end_y));
                    x += size;
                }
                let mut y = start_y;
                while y <= end_y {
                    path.move_to(Point::new(start_x, y));
                    path.line_to(Point::new(end_x, y));
                    y += size;
                }
                surface.stroke_path(&path, color(config.grid_color), 1.0 / viewport.scale);
            }
            GridStyle::Dots => {
                let half = GRID_DOT_SIZE / viewport.scale;
                let mut x = start_x;
                while x <= end_x {
                    let mut y = start_y;
                    while y <= end_y {
                        let dot = Rect::new(x - half, y - half, x + half, y + half);
                        path.extend(dot.path_elements(0.1));
                        y += size;
                    }
                    x += size;
                }
                surface.fill_path(&path, color(config.grid_color));
            }
        }
    }

    fn render_decoration(
        &self,
        ctx: &RenderContext,
        id: ElementId,
        decoration: &Decoration,
        surface: &mut dyn Surface,
    ) {
        let bounds = decoration.bounds();
        surface.save();
        surface.transform(animation_transform(decoration, ctx.now_ms));

        surface.save();
        surface.set_alpha(ctx.config.decoration_opacity);
        self.draw_image_or_placeholder(ctx, &decoration.source, bounds, surface);
        surface.restore();

        if ctx.state.selected_decoration == Some(id) {
            let outline = bounds.inflate(DECORATION_OUTLINE_PADDING, DECORATION_OUTLINE_PADDING);
            surface.stroke_path(
                &outline.to_path(0.1),
                color(ctx.config.decoration_selection_color),
                DECORATION_OUTLINE_WIDTH,
            );
        }
        surface.restore();
    }

    fn draw_image_or_placeholder(
        &self,
        ctx: &RenderContext,
        source: &str,
        rect: Rect,
        surface: &mut dyn Surface,
    ) {
        match surface.draw_image(source, rect) {
            Ok(()) => {}
            Err(RenderError::MissingAsset(source)) => {
                log::warn!("Missing asset {source}, drawing placeholder");
                let outline = rect.to_path(0.1);
                let mut cross = BezPath::new();
                cross.move_to(Point::new(rect.x0, rect.y0));
                cross.line_to(Point::new(rect.x1, rect.y1));
                cross.move_to(Point::new(rect.x1, rect.y0));
                cross.line_to(Point::new(rect.x0, rect.y1));
                let placeholder = color(ctx.config.placeholder_color);
                surface.stroke_path(&outline, placeholder, 1.0);
                surface.stroke_path(&cross, placeholder, 1.0);
            }
            Err(e) => log::warn!("Failed to draw {source}: {e}"),
        }
    }

    fn render_drawable(&self, drawable: &Drawable, surface: &mut dyn Surface) {
        match &drawable.fill {
            Some(DrawableFill::Solid { path, color: c }) => surface.fill_path(path, color(*c)),
            Some(DrawableFill::Pattern {
                path,
                color: c,
                width,
            }) => surface.stroke_path(path, color(*c), *width),
            None => {}
        }
        for stroke in &drawable.strokes {
            surface.stroke_path(stroke, color(drawable.stroke_color), drawable.stroke_width);
        }
    }

    fn render_text(&self, text: &Text, surface: &mut dyn Surface) {
        for (i, line) in text.content.split('\n').enumerate() {
            let origin = text.anchor + Vec2::new(0.0, i as f64 * text.font_size);
            surface.fill_text(line, origin, text.font_size, color(text.color));
        }
    }

    fn render_sticker(&self, ctx: &RenderContext, sticker: &Sticker, surface: &mut dyn Surface) {
        self.draw_image_or_placeholder(ctx, &sticker.source, sticker.bounds(), surface);
    }

    fn render_element(&self, ctx: &RenderContext, element: &Element, surface: &mut dyn Surface) {
        match element {
            Element::Freehand(stroke) => {
                let path = freehand_path(&stroke.points, stroke.stroke_width, &ctx.config.freehand);
                surface.fill_path(&path, color(stroke.stroke_color));
            }
            Element::Line(_) | Element::Rectangle(_) | Element::Circle(_) => {
                match ctx.state.scene.drawable(element.id()) {
                    Some(drawable) => self.render_drawable(drawable, surface),
                    None => log::warn!("No drawable for {} {}", element.kind(), element.id()),
                }
            }
            Element::Text(text) => self.render_text(text, surface),
            Element::Sticker(sticker) => self.render_sticker(ctx, sticker, surface),
            Element::Decoration(_) => {}
        }
    }

    fn render_selection(&self, ctx: &RenderContext, surface: &mut dyn Surface) {
        let Some(element) = ctx.state.selection.and_then(|id| ctx.state.scene.get(id)) else {
            return;
        };
        if element.is_decoration() || ctx.state.editing_element() == Some(element.id()) {
            return;
        }
        let scale = ctx.state.viewport.scale;
        let padding = SELECTION_PADDING / scale;
        let bounds = element.bounds().inflate(padding, padding);
        surface.stroke_path(&bounds.to_path(0.1), color(ctx.config.selection_color), 1.0 / scale);
    }

    fn render_text_editor(&self, ctx: &RenderContext, surface: &mut dyn Surface) {
        let Some(editor) = ctx.state.text_editor.as_ref() else {
            return;
        };
        let viewport = &ctx.state.viewport;
        let origin = viewport.world_to_screen(editor.anchor);
        let font_size = editor.font_size * viewport.scale;
        let measured = surface.measure(&editor.buffer, font_size);
        let size = Size::new(measured.width.max(font_size * 0.5), measured.height.max(font_size));
        let frame = Rect::from_origin_size(origin, size).inflate(EDITOR_PADDING, EDITOR_PADDING);
        surface.stroke_path(&frame.to_path(0.1), color(ctx.config.editor_border_color), 1.0);
        for (i, line) in editor.buffer.split('\n').enumerate() {
            let line_origin = origin + Vec2::new(0.0, i as f64 * font_size);
            surface.fill_text(line, line_origin, font_size, color(editor.color));
        }
    }

    fn render_alert(&self, ctx: &RenderContext, surface: &mut dyn Surface) {
        let Some(alert) = ctx.state.visible_alert(ctx.now_ms) else {
            return;
        };
        let config = ctx.config;
        let screen = ctx.state.viewport_size;
        let banner = Rect::from_origin_size(
            Point::new(
                (screen.width - config.alert_width) / 2.0,
                (screen.height - config.alert_height) / 2.0,
            ),
            Size::new(config.alert_width, config.alert_height),
        );
        surface.fill_path(&banner.to_path(0.1), color(config.alert_background));
        let text = surface.measure(&alert.message, config.alert_font_size);
        let origin = banner.center() - Vec2::new(text.width / 2.0, text.height / 2.0);
        surface.fill_text(&alert.message, origin, config.alert_font_size, color(config.alert_text_color));
    }
}

impl Renderer for ScenePainter {
    fn render(&mut self, ctx: &RenderContext, surface: &mut dyn Surface) -> RenderResult<()> {
        let state = ctx.state;
        surface.clear(color(ctx.config.background));

        surface.save();
        surface.transform(state.viewport.transform());
        self.render_grid(ctx, surface);

        let elements = state.scene.elements();
        for element in elements {
            if let Element::Decoration(decoration) = element {
                self.render_decoration(ctx, element.id(), decoration, surface);
            }
        }

        let editing = state.editing_element();
        for element in elements {
            if element.is_decoration() || editing == Some(element.id()) {
                continue;
            }
            self.render_element(ctx, element, surface);
        }
        self.render_selection(ctx, surface);
        surface.restore();

        self.render_text_editor(ctx, surface);
        self.render_alert(ctx, surface);

        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use inkboard_core::{
        AnimationKind, AssetInfo, Engine, EngineConfig, KeyEvent, Modifiers, PointerEvent,
        ToolKind,
    };

    fn frame(engine: &Engine, config: &RenderConfig, now_ms: u64) -> Vec<DrawCommand> {
        let mut surface = RecordingSurface::new();
        let ctx = RenderContext::new(engine.state(), config, now_ms);
        ScenePainter::new().render(&ctx, &mut surface).unwrap();
        assert_eq!(surface.depth(), 0);
        surface.take_commands()
    }

    fn no_grid() -> RenderConfig {
        RenderConfig {
            grid_style: GridStyle::None,
            ..RenderConfig::default()
        }
    }

    fn draw(engine: &mut Engine, tool: ToolKind, from: (f64, f64), to: (f64, f64)) {
        engine.set_tool(tool);
        engine.on_pointer_down(PointerEvent::at(from.0, from.1), 0);
        engine.on_pointer_move(PointerEvent::at(to.0, to.1));
        engine.on_pointer_up(PointerEvent::at(to.0, to.1), 0);
    }

    fn add_decoration(engine: &mut Engine) {
        engine.set_decoration_animation(AnimationKind::Rotate);
        engine
            .finish_decoration_load(
                "star",
                Point::new(300.0, 300.0),
                Ok(AssetInfo {
                    size: Size::new(10.0, 10.0),
                }),
                0,
            )
            .unwrap();
    }

    #[test]
    fn test_empty_frame() {
        let engine = Engine::default();
        let commands = frame(&engine, &no_grid(), 0);
        assert_eq!(commands[0], DrawCommand::Clear(SerializableColor::white()));
        assert_eq!(commands[1], DrawCommand::Save);
        assert!(matches!(commands[2], DrawCommand::Transform(_)));
        assert_eq!(commands[3], DrawCommand::Restore);
        assert_eq!(commands.len(), 4);
    }

    #[test]
    fn test_grid_drawn_before_elements() {
        let mut engine = Engine::default();
        draw(&mut engine, ToolKind::Rectangle, (10.0, 10.0), (50.0, 50.0));
        let commands = frame(&engine, &RenderConfig::default(), 0);
        let grid = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::StrokePath { width, .. } if (*width - 1.0).abs() < 1e-9))
            .unwrap();
        let rect_stroke = commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::StrokePath { color, .. } if *color == SerializableColor::black()))
            .unwrap();
        assert!(grid < rect_stroke);
    }

    #[test]
    fn test_grid_spacing_from_engine_config() {
        let engine = Engine::new(EngineConfig {
            grid_size: 100.0,
            ..EngineConfig::default()
        });
        let commands = frame(&engine, &RenderConfig::default(), 0);
        let Some(DrawCommand::StrokePath { path, .. }) = commands
            .iter()
            .find(|c| matches!(c, DrawCommand::StrokePath { .. }))
        else {
            panic!("expected grid lines");
        };
        let lines = path
            .elements()
            .iter()
            .filter(|el| matches!(el, kurbo::PathEl::MoveTo(_)))
            .count();
        // 800x600 viewport: 9 vertical and 7 horizontal lines.
        assert_eq!(lines, 16);
    }

    #[test]
    fn test_decorations_under_elements_with_alpha() {
        let mut engine = Engine::default();
        add_decoration(&mut engine);
        draw(&mut engine, ToolKind::Freehand, (0.0, 0.0), (20.0, 20.0));
        let commands = frame(&engine, &no_grid(), 0);

        let alpha = commands
            .iter()
            .position(|c| *c == DrawCommand::SetAlpha(0.7))
            .unwrap();
        let image = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::DrawImage { source, .. } if source == "star"))
            .unwrap();
        let freehand = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::FillPath { .. }))
            .unwrap();
        assert!(alpha < image && image < freehand);
    }

    #[test]
    fn test_selected_decoration_outline() {
        let mut engine = Engine::default();
        add_decoration(&mut engine);
        engine.on_pointer_down(PointerEvent::at(305.0, 305.0), 0);
        engine.on_pointer_up(PointerEvent::at(305.0, 305.0), 0);
        assert!(engine.state().selected_decoration.is_some());

        let commands = frame(&engine, &no_grid(), 0);
        let gold = SerializableColor::rgb(0xFF, 0xD7, 0x00);
        assert!(commands.iter().any(
            |c| matches!(c, DrawCommand::StrokePath { color, width, .. } if *color == gold && (*width - 2.0).abs() < 1e-9)
        ));
    }

    #[test]
    fn test_missing_asset_placeholder() {
        let mut engine = Engine::default();
        engine
            .finish_sticker_load(
                "cat",
                Point::ZERO,
                Ok(AssetInfo {
                    size: Size::new(10.0, 10.0),
                }),
                0,
            )
            .unwrap();
        let config = no_grid();
        let mut surface = RecordingSurface::new().with_assets(Vec::<String>::new());
        let ctx = RenderContext::new(engine.state(), &config, 0);
        ScenePainter::new().render(&ctx, &mut surface).unwrap();
        let placeholder = config.placeholder_color;
        let strokes = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePath { color, .. } if *color == placeholder))
            .count();
        assert_eq!(strokes, 2);
    }

    #[test]
    fn test_text_hidden_while_editing() {
        let mut engine = Engine::default();
        engine.set_tool(ToolKind::Text);
        engine.on_pointer_down(PointerEvent::at(0.0, 0.0), 0);
        for key in ["h", "i"] {
            engine.on_key_down(&KeyEvent::new(key, Modifiers::NONE));
        }
        engine.on_key_down(&KeyEvent::new("Enter", Modifiers::NONE));
        let committed = frame(&engine, &no_grid(), 0);
        assert!(committed
            .iter()
            .any(|c| matches!(c, DrawCommand::FillText { text, .. } if text == "hi")));

        engine.set_tool(ToolKind::Select);
        engine.on_pointer_down(PointerEvent::at(5.0, 5.0), 1000);
        engine.on_pointer_up(PointerEvent::at(5.0, 5.0), 1000);
        engine.on_pointer_down(PointerEvent::at(5.0, 5.0), 1100);
        engine.on_key_down(&KeyEvent::new("!", Modifiers::NONE));

        let editing = frame(&engine, &no_grid(), 1100);
        let texts: Vec<&str> = editing
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["hi!"]);
        // The editor is drawn after the world layers are popped.
        let restore = editing.iter().rposition(|c| *c == DrawCommand::Restore).unwrap();
        let text = editing
            .iter()
            .position(|c| matches!(c, DrawCommand::FillText { .. }))
            .unwrap();
        assert!(text > restore);
    }

    #[test]
    fn test_alert_banner_centered() {
        let mut engine = Engine::default();
        engine.set_viewport_size(Size::new(800.0, 600.0));
        engine.alert("Saved", 0);
        let commands = frame(&engine, &no_grid(), 10);
        let banner = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillPath { path, color } if color.a == 204 => Some(path.bounding_box()),
                _ => None,
            })
            .unwrap();
        assert_eq!(banner, Rect::new(250.0, 250.0, 550.0, 350.0));
        assert!(commands
            .iter()
            .any(|c| matches!(c, DrawCommand::FillText { text, font_size, .. } if text == "Saved" && (*font_size - 24.0).abs() < 1e-9)));

        let later = frame(&engine, &no_grid(), 10_000);
        assert!(!later.iter().any(|c| matches!(c, DrawCommand::FillText { .. })));
    }

    #[test]
    fn test_selection_box_after_draw() {
        let mut engine = Engine::default();
        draw(&mut engine, ToolKind::Rectangle, (10.0, 10.0), (50.0, 50.0));
        let config = no_grid();
        let commands = frame(&engine, &config, 0);
        let selection = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::StrokePath { path, color, .. } if *color == config.selection_color => {
                    Some(path.bounding_box())
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(selection, Rect::new(6.0, 6.0, 54.0, 54.0));
    }
}
