//! Engine-owned data: scene, history, viewport and tool settings.

use crate::config::EngineConfig;
use crate::element::{AnimationKind, DrawStyle, Element, ElementId, FillStyle, SerializableColor, StrokeWidth};
use crate::geometry::HitTolerance;
use crate::history::History;
use crate::overlay::{Alert, TextEditor};
use crate::persistence::DEFAULT_BOARD_KIND;
use crate::scene::Scene;
use crate::tools::ToolKind;
use crate::viewport::Viewport;
use kurbo::Size;

/// Everything the input machine mutates, in one explicit struct.
///
/// The live scene always equals `history.current()` once a handler returns.
#[derive(Debug)]
pub struct EngineState {
    pub config: EngineConfig,
    pub scene: Scene,
    pub history: History<Vec<Element>>,
    pub viewport: Viewport,
    /// Screen size of the drawing surface.
    pub viewport_size: Size,
    pub tool: ToolKind,
    pub style: DrawStyle,
    /// Element last moved, resized or drawn.
    pub selection: Option<ElementId>,
    pub selected_decoration: Option<ElementId>,
    pub text_editor: Option<TextEditor>,
    pub alert: Option<Alert>,
    pub space_held: bool,
    /// Asset placed by the sticker tool.
    pub sticker_source: Option<String>,
    pub decoration_animation: AnimationKind,
    /// Identifier assigned by the store on first save.
    pub scene_id: Option<String>,
    pub scene_name: String,
    pub board_kind: String,
}

impl EngineState {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_scene(config, Scene::new())
    }

    /// State around a scene with custom collaborators. The scene's current
    /// content becomes the initial history version.
    pub fn with_scene(config: EngineConfig, scene: Scene) -> Self {
        let style = DrawStyle {
            stroke_color: config.default_stroke_color,
            stroke_width: config.default_stroke_width,
            fill: FillStyle::None,
            fill_color: SerializableColor::transparent(),
            font_size: config.default_font_size,
        };
        let history = History::new(scene.snapshot()).with_limit(config.history_limit);
        Self {
            viewport: Viewport::from_config(&config),
            viewport_size: Size::new(800.0, 600.0),
            scene,
            history,
            tool: ToolKind::default(),
            style,
            selection: None,
            selected_decoration: None,
            text_editor: None,
            alert: None,
            space_held: false,
            sticker_source: None,
            decoration_animation: AnimationKind::default(),
            scene_id: None,
            scene_name: "Untitled".to_string(),
            board_kind: DEFAULT_BOARD_KIND.to_string(),
            config,
        }
    }

    /// Hit tolerances in world units at the current zoom.
    pub fn tolerance(&self) -> HitTolerance {
        let base = HitTolerance::from(&self.config);
        let scale = self.viewport.scale;
        HitTolerance {
            handle: base.handle / scale,
            line: base.line / scale,
            freehand: base.freehand / scale,
        }
    }

    /// Open a new undoable version holding the live scene.
    pub(crate) fn commit(&mut self) {
        self.history.commit(self.scene.snapshot());
    }

    /// Overwrite the current version with the live scene.
    pub(crate) fn commit_in_place(&mut self) {
        self.history.commit_in_place(self.scene.snapshot());
    }

    /// Make the live scene match the current history version.
    pub(crate) fn restore_from_history(&mut self) {
        self.scene.replace_all(self.history.current().clone());
        self.drop_stale_selection();
    }

    pub(crate) fn drop_stale_selection(&mut self) {
        if self.selection.is_some_and(|id| !self.scene.contains(id)) {
            self.selection = None;
        }
        if self.selected_decoration.is_some_and(|id| !self.scene.contains(id)) {
            self.selected_decoration = None;
        }
    }

    /// Show a timed banner.
    pub fn alert(&mut self, message: impl Into<String>, now_ms: u64) {
        let alert = Alert::new(message, now_ms, self.config.alert_duration_ms);
        log::info!("Alert: {}", alert.message);
        self.alert = Some(alert);
    }

    /// The alert, if still visible at `now_ms`.
    pub fn visible_alert(&self, now_ms: u64) -> Option<&Alert> {
        self.alert.as_ref().filter(|a| a.is_visible(now_ms))
    }

    pub fn set_stroke_preset(&mut self, preset: StrokeWidth) {
        self.style.stroke_width = preset.value();
    }

    /// Id of the text element hidden behind the editor, if any.
    pub fn editing_element(&self) -> Option<ElementId> {
        self.text_editor.as_ref().and_then(|e| e.target)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use kurbo::Point;

    #[test]
    fn test_initial_state_uses_config() {
        let config = EngineConfig {
            default_stroke_width: 6.0,
            max_zoom: 3.0,
            ..EngineConfig::default()
        };
        let state = EngineState::new(config);
        assert!((state.style.stroke_width - 6.0).abs() < f64::EPSILON);
        assert!((state.viewport.max_scale - 3.0).abs() < f64::EPSILON);
        assert_eq!(state.history.len(), 1);
        assert!(state.history.current().is_empty());
    }

    #[test]
    fn test_restore_drops_stale_selection() {
        let mut state = EngineState::default();
        let id = state
            .scene
            .push(Element::create(ElementKind::Rectangle, Point::ZERO, &state.style.clone()));
        state.commit();
        state.selection = Some(id);

        state.history.undo();
        state.restore_from_history();
        assert!(state.scene.is_empty());
        assert_eq!(state.selection, None);
    }

    #[test]
    fn test_tolerance_follows_zoom() {
        let mut state = EngineState::default();
        state.viewport.zoom(0.5, Point::ZERO);
        let tol = state.tolerance();
        assert!((tol.handle - 10.0).abs() < 1e-9);
        assert!((tol.line - 2.0).abs() < 1e-9);
        assert!((tol.freehand - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_alert_visibility() {
        let mut state = EngineState::default();
        state.alert("Saved", 100);
        assert!(state.visible_alert(200).is_some());
        assert!(state.visible_alert(100 + state.config.alert_duration_ms).is_none());
    }
}
