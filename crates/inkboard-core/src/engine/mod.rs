//! The engine facade: input handlers, tool settings, history, persistence.
//!
//! Hosts feed pointer, wheel and key events in screen coordinates and act on
//! the returned [`Action`]s. Nothing here depends on a windowing system.

mod machine;
mod state;

pub use machine::Interaction;
pub use state::EngineState;

use crate::assets::{AssetInfo, AssetLoader, AssetPlacement, AssetRequest};
use crate::config::EngineConfig;
use crate::element::{AnimationKind, ElementId, FillStyle, SerializableColor, StrokeWidth};
use crate::error::{EngineError, Result};
use crate::geometry::CursorKind;
use crate::input::{KeyEvent, PointerEvent, WheelEvent};
use crate::persistence::{SceneStore, ScenePayload, StorageError};
use crate::scene::Scene;
use crate::tools::ToolKind;
use kurbo::{Point, Size};
use machine::{history_changed, InputMachine};

/// Side effects requested by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Redraw the whole frame.
    RenderNeeded,
    SetCursor(CursorKind),
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// The text editor opened, for an existing element or new text.
    EditText { id: Option<ElementId> },
    /// Load an asset and report back through [`Engine::finish_asset_load`].
    LoadAsset(AssetRequest),
}

/// Interactive drawing engine.
#[derive(Debug, Default)]
pub struct Engine {
    state: EngineState,
    machine: InputMachine,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: EngineState::new(config),
            machine: InputMachine::default(),
        }
    }

    /// Engine around a scene built with custom collaborators.
    pub fn with_scene(config: EngineConfig, scene: Scene) -> Self {
        Self {
            state: EngineState::with_scene(config, scene),
            machine: InputMachine::default(),
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    pub fn interaction(&self) -> Interaction {
        self.machine.interaction
    }

    /// Turn a handler outcome into actions, aborting the gesture on error.
    fn settle(&mut self, result: Result<Vec<Action>>) -> Vec<Action> {
        match result {
            Ok(actions) => actions,
            Err(e) => {
                log::warn!("Aborting {}: {e}", self.machine.interaction.name());
                self.machine.abort(&mut self.state);
                vec![Action::RenderNeeded, history_changed(&self.state)]
            }
        }
    }

    // --- Input ---

    pub fn on_pointer_down(&mut self, event: PointerEvent, now_ms: u64) -> Vec<Action> {
        let result = self.machine.pointer_down(&mut self.state, event, now_ms);
        self.settle(result)
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Vec<Action> {
        let result = self.machine.pointer_move(&mut self.state, event);
        self.settle(result)
    }

    /// Release ends the gesture wherever the pointer is, on or off canvas.
    pub fn on_pointer_up(&mut self, event: PointerEvent, now_ms: u64) -> Vec<Action> {
        let result = self.machine.pointer_up(&mut self.state, event, now_ms);
        self.settle(result)
    }

    pub fn on_wheel(&mut self, event: WheelEvent) -> Vec<Action> {
        self.machine.wheel(&mut self.state, event)
    }

    pub fn on_key_down(&mut self, event: &KeyEvent) -> Vec<Action> {
        let result = self.machine.key_down(&mut self.state, event);
        self.settle(result)
    }

    pub fn on_key_up(&mut self, event: &KeyEvent) -> Vec<Action> {
        self.machine.key_up(&mut self.state, event)
    }

    // --- Tools and style ---

    /// Switch tools. An open text editor is committed first.
    pub fn set_tool(&mut self, tool: ToolKind) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.machine.interaction == Interaction::EditingText {
            let result = self.machine.commit_text(&mut self.state);
            actions.extend(self.settle(result));
        }
        if tool != self.state.tool {
            log::debug!("Tool: {}", tool.name());
        }
        self.state.tool = tool;
        actions.push(Action::SetCursor(tool.cursor()));
        actions
    }

    pub fn set_stroke_color(&mut self, color: SerializableColor) {
        self.state.style.stroke_color = color;
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        if width > 0.0 {
            self.state.style.stroke_width = width;
        }
    }

    pub fn set_stroke_preset(&mut self, preset: StrokeWidth) {
        self.state.set_stroke_preset(preset);
    }

    pub fn set_fill(&mut self, fill: FillStyle, color: SerializableColor) {
        self.state.style.fill = fill;
        self.state.style.fill_color = color;
    }

    pub fn set_font_size(&mut self, size: f64) {
        if size > 0.0 {
            self.state.style.font_size = size;
        }
    }

    /// Asset placed by subsequent sticker-tool clicks.
    pub fn select_sticker(&mut self, source: impl Into<String>) {
        self.state.sticker_source = Some(source.into());
    }

    pub fn set_decoration_animation(&mut self, animation: AnimationKind) {
        self.state.decoration_animation = animation;
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        self.machine.undo(&mut self.state)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.machine.redo(&mut self.state)
    }

    pub fn can_undo(&self) -> bool {
        self.state.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.history.can_redo()
    }

    // --- Viewport ---

    pub fn set_viewport_size(&mut self, size: Size) -> Vec<Action> {
        self.state.viewport_size = size;
        vec![Action::RenderNeeded]
    }

    fn viewport_center(&self) -> Point {
        Point::new(
            self.state.viewport_size.width / 2.0,
            self.state.viewport_size.height / 2.0,
        )
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        let center = self.viewport_center();
        self.state.viewport.zoom(self.state.config.zoom_step, center);
        vec![Action::RenderNeeded]
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        let center = self.viewport_center();
        self.state.viewport.zoom(1.0 / self.state.config.zoom_step, center);
        vec![Action::RenderNeeded]
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.state.viewport.reset();
        vec![Action::RenderNeeded]
    }

    // --- Elements ---

    /// Remove every element as one undoable step.
    pub fn clear_scene(&mut self) -> Vec<Action> {
        if !self.machine.interaction.is_idle() {
            self.machine.abort(&mut self.state);
        }
        if self.state.scene.is_empty() {
            return vec![Action::RenderNeeded];
        }
        self.state.scene.clear();
        self.state.drop_stale_selection();
        self.state.commit();
        log::info!("Scene cleared");
        vec![Action::RenderNeeded, history_changed(&self.state)]
    }

    /// Remove one element (decorations included) as one undoable step.
    pub fn delete_element(&mut self, id: ElementId) -> Result<Vec<Action>> {
        if self.machine.interaction.is_gesture() {
            log::debug!("Ignoring delete during {}", self.machine.interaction.name());
            return Ok(Vec::new());
        }
        machine::delete_element(&mut self.state, id)
    }

    pub fn alert(&mut self, message: impl Into<String>, now_ms: u64) -> Vec<Action> {
        self.state.alert(message, now_ms);
        vec![Action::RenderNeeded]
    }

    // --- Assets ---

    /// Request a decoration at `position` (world). The returned
    /// `LoadAsset` action carries the request to hand back on completion.
    pub fn add_decoration(
        &mut self,
        source: impl Into<String>,
        animation: AnimationKind,
        position: Point,
    ) -> Vec<Action> {
        vec![Action::LoadAsset(AssetRequest {
            source: source.into(),
            placement: AssetPlacement::Decoration {
                position,
                animation,
            },
        })]
    }

    /// Report a settled asset load.
    ///
    /// Success appends one element and commits once. Failure raises an alert,
    /// creates nothing and returns `AssetLoadFailure`. Completions arriving
    /// during a drag are applied at pointer-up.
    pub fn finish_asset_load(
        &mut self,
        request: AssetRequest,
        result: Result<AssetInfo>,
        now_ms: u64,
    ) -> Result<Vec<Action>> {
        self.machine
            .finish_asset_load(&mut self.state, request, result, now_ms)
    }

    pub fn finish_sticker_load(
        &mut self,
        source: impl Into<String>,
        anchor: Point,
        result: Result<AssetInfo>,
        now_ms: u64,
    ) -> Result<Vec<Action>> {
        let request = AssetRequest {
            source: source.into(),
            placement: AssetPlacement::Sticker { anchor },
        };
        self.finish_asset_load(request, result, now_ms)
    }

    pub fn finish_decoration_load(
        &mut self,
        source: impl Into<String>,
        position: Point,
        result: Result<AssetInfo>,
        now_ms: u64,
    ) -> Result<Vec<Action>> {
        let request = AssetRequest {
            source: source.into(),
            placement: AssetPlacement::Decoration {
                position,
                animation: self.state.decoration_animation,
            },
        };
        self.finish_asset_load(request, result, now_ms)
    }

    /// Run a load through `loader` and apply the outcome.
    pub async fn load_asset(
        &mut self,
        loader: &dyn AssetLoader,
        request: AssetRequest,
        now_ms: u64,
    ) -> Result<Vec<Action>> {
        let result = loader.load(&request.source).await;
        self.finish_asset_load(request, result, now_ms)
    }

    // --- Persistence ---

    /// Current scene as a persistence payload (no decorations).
    pub fn payload(&self) -> ScenePayload {
        ScenePayload::new(
            self.state.scene.elements(),
            self.state.scene_name.clone(),
            self.state.board_kind.clone(),
        )
    }

    pub fn set_scene_name(&mut self, name: impl Into<String>) {
        self.state.scene_name = name.into();
    }

    pub fn set_board_kind(&mut self, kind: impl Into<String>) {
        self.state.board_kind = kind.into();
    }

    /// Save to `store` under `owner`, returning the scene id.
    ///
    /// The live scene and history are never touched; a failure only raises
    /// an alert.
    pub async fn save(
        &mut self,
        store: &dyn SceneStore,
        owner: Option<&str>,
        now_ms: u64,
    ) -> Result<String> {
        let Some(owner) = owner else {
            self.state.alert("Please log in to save", now_ms);
            return Err(EngineError::NotAuthenticated);
        };
        let payload = self.payload();
        let saved = store
            .save(owner, self.state.scene_id.as_deref(), &payload)
            .await;
        match saved {
            Ok(id) => {
                log::info!("Saved scene {id} ({} elements)", payload.elements.len());
                self.state.scene_id = Some(id.clone());
                self.state.alert("Scene saved", now_ms);
                Ok(id)
            }
            Err(e) => {
                log::warn!("Failed to save scene: {e}");
                self.state.alert("Failed to save scene", now_ms);
                Err(e.into())
            }
        }
    }

    /// Replace the scene with one loaded from `store`. History restarts
    /// from the loaded content.
    pub async fn load(
        &mut self,
        store: &dyn SceneStore,
        owner: Option<&str>,
        scene_id: &str,
        now_ms: u64,
    ) -> Result<Vec<Action>> {
        let Some(owner) = owner else {
            self.state.alert("Please log in to load scenes", now_ms);
            return Err(EngineError::NotAuthenticated);
        };
        let loaded = store
            .load(owner, scene_id)
            .await
            .and_then(|payload| payload.validate().map(|()| payload));
        let payload = match loaded {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Failed to load scene {scene_id}: {e}");
                self.state.alert("Failed to load scene", now_ms);
                return Err(e.into());
            }
        };
        log::info!("Loaded scene {scene_id} ({} elements)", payload.elements.len());
        self.apply_payload(payload);
        self.state.scene_id = Some(scene_id.to_string());
        Ok(vec![Action::RenderNeeded, history_changed(&self.state)])
    }

    pub fn export_json(&self) -> Result<String> {
        self.payload()
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()).into())
    }

    /// Replace the scene with a JSON payload. The scene id is cleared so the
    /// next save creates a new scene.
    pub fn import_json(&mut self, json: &str) -> Result<Vec<Action>> {
        let payload = ScenePayload::from_json(json)?;
        self.apply_payload(payload);
        self.state.scene_id = None;
        Ok(vec![Action::RenderNeeded, history_changed(&self.state)])
    }

    fn apply_payload(&mut self, payload: ScenePayload) {
        self.machine.abort(&mut self.state);
        self.state.scene.replace_all(payload.elements);
        self.state.history.reset(self.state.scene.snapshot());
        self.state.selection = None;
        self.state.selected_decoration = None;
        self.state.scene_name = payload.name;
        self.state.board_kind = payload.board_kind;
    }
}
