//! Pointer and keyboard interaction state machine.
//!
//! The machine is the only mutator of [`EngineState`] during input. Every
//! gesture opens one history version at its first real change and keeps
//! overwriting that version until pointer-up, so a whole drag undoes in a
//! single step.

use super::state::EngineState;
use super::Action;
use crate::assets::{AssetInfo, AssetPlacement, AssetRequest};
use crate::config::WheelBinding;
use crate::element::{Decoration, Element, ElementId, StrokeWidth, Sticker, Text};
use crate::error::{EngineError, Result};
use crate::geometry::{cursor_for_position, decoration_at, topmost_hit, CursorKind, Position};
use crate::input::{ClickTracker, KeyEvent, MouseButton, PointerEvent, PointerKind, WheelEvent};
use crate::overlay::TextEditor;
use crate::tools::ToolKind;
use kurbo::{Point, Size, Vec2};

/// Current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Dragging out a new element.
    Drawing { id: ElementId },
    /// Translating an element; `committed` once the first nonzero move
    /// opened a history version.
    Moving {
        id: ElementId,
        last_world: Point,
        committed: bool,
    },
    /// Dragging a handle.
    Resizing {
        id: ElementId,
        handle: Position,
        committed: bool,
    },
    Panning { last_screen: Point },
    /// Continuous erase; `erased` counts removals in this gesture.
    Erasing { erased: usize },
    /// The text editor overlay owns the keyboard.
    EditingText,
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// True while a pointer button is held down over the canvas.
    pub fn is_gesture(&self) -> bool {
        !matches!(self, Interaction::Idle | Interaction::EditingText)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Drawing { .. } => "drawing",
            Interaction::Moving { .. } => "moving",
            Interaction::Resizing { .. } => "resizing",
            Interaction::Panning { .. } => "panning",
            Interaction::Erasing { .. } => "erasing",
            Interaction::EditingText => "editingText",
        }
    }
}

pub(crate) fn history_changed(state: &EngineState) -> Action {
    Action::HistoryChanged {
        can_undo: state.history.can_undo(),
        can_redo: state.history.can_redo(),
    }
}

/// Remove one element as its own undoable step.
pub(crate) fn delete_element(state: &mut EngineState, id: ElementId) -> Result<Vec<Action>> {
    if state.scene.remove(id).is_none() {
        return Err(EngineError::ElementNotFound(id));
    }
    state.drop_stale_selection();
    state.commit();
    log::debug!("Deleted element {id}");
    Ok(vec![Action::RenderNeeded, history_changed(state)])
}

/// Interaction state plus the bookkeeping that spans events.
#[derive(Debug, Default)]
pub(crate) struct InputMachine {
    pub(crate) interaction: Interaction,
    clicks: ClickTracker,
    /// Asset completions that arrived mid-gesture.
    deferred: Vec<(AssetRequest, Result<AssetInfo>)>,
}

impl InputMachine {
    fn transition(&mut self, next: Interaction) {
        if std::mem::discriminant(&self.interaction) != std::mem::discriminant(&next) {
            log::debug!("Interaction {} -> {}", self.interaction.name(), next.name());
        }
        self.interaction = next;
    }

    /// Drop the gesture and resync the scene with history.
    ///
    /// Asset completions deferred by the gesture are dropped with it.
    pub(crate) fn abort(&mut self, state: &mut EngineState) {
        if !self.deferred.is_empty() {
            log::debug!("Dropping {} deferred asset loads", self.deferred.len());
            self.deferred.clear();
        }
        self.transition(Interaction::Idle);
        state.text_editor = None;
        state.restore_from_history();
    }

    pub(crate) fn pointer_down(
        &mut self,
        state: &mut EngineState,
        event: PointerEvent,
        now_ms: u64,
    ) -> Result<Vec<Action>> {
        let mut actions = Vec::new();
        if self.interaction == Interaction::EditingText {
            actions.extend(self.commit_text(state)?);
        }
        if !self.interaction.is_idle() {
            log::debug!("Ignoring pointer-down during {}", self.interaction.name());
            return Ok(actions);
        }

        if event.button == MouseButton::Middle || state.space_held || state.tool == ToolKind::Pan {
            self.transition(Interaction::Panning {
                last_screen: event.position,
            });
            actions.push(Action::SetCursor(CursorKind::Grabbing));
            return Ok(actions);
        }
        if event.button == MouseButton::Right {
            return Ok(actions);
        }

        let world = state.viewport.screen_to_world(event.position);
        let double_click = self.clicks.click(now_ms, event.position);

        if state.tool == ToolKind::Eraser {
            self.transition(Interaction::Erasing { erased: 0 });
            self.erase_at(state, world, &mut actions);
            return Ok(actions);
        }

        if let Some(hit) = topmost_hit(world, state.scene.elements(), &state.tolerance()) {
            if double_click {
                if let Some(Element::Text(text)) = state.scene.get(hit.id) {
                    let editor = TextEditor::for_element(
                        hit.id,
                        text.anchor,
                        &text.content,
                        text.font_size,
                        text.color,
                    );
                    state.text_editor = Some(editor);
                    state.selection = None;
                    self.transition(Interaction::EditingText);
                    actions.push(Action::EditText { id: Some(hit.id) });
                    actions.push(Action::RenderNeeded);
                    return Ok(actions);
                }
            }
            state.selection = Some(hit.id);
            state.selected_decoration = None;
            self.transition(if hit.position == Position::Inside {
                Interaction::Moving {
                    id: hit.id,
                    last_world: world,
                    committed: false,
                }
            } else {
                Interaction::Resizing {
                    id: hit.id,
                    handle: hit.position,
                    committed: false,
                }
            });
            actions.push(Action::SetCursor(cursor_for_position(hit.position)));
            actions.push(Action::RenderNeeded);
            return Ok(actions);
        }

        match state.tool {
            tool if tool.draws() => {
                let mut style = state.style.clone();
                if event.kind == PointerKind::Pen {
                    style.stroke_width *= StrokeWidth::PEN_FACTOR;
                }
                let id = state.scene.begin_element(tool, world, &style)?;
                state.commit();
                state.selection = Some(id);
                state.selected_decoration = None;
                self.transition(Interaction::Drawing { id });
                actions.push(Action::RenderNeeded);
                actions.push(history_changed(state));
            }
            ToolKind::Text => {
                state.text_editor = Some(TextEditor::new(
                    world,
                    state.style.font_size,
                    state.style.stroke_color,
                ));
                state.selection = None;
                self.transition(Interaction::EditingText);
                actions.push(Action::EditText { id: None });
                actions.push(Action::RenderNeeded);
            }
            ToolKind::Sticker => match state.sticker_source.clone() {
                Some(source) => actions.push(Action::LoadAsset(AssetRequest {
                    source,
                    placement: AssetPlacement::Sticker { anchor: world },
                })),
                None => {
                    state.alert("Select a sticker first", now_ms);
                    actions.push(Action::RenderNeeded);
                }
            },
            _ => {
                state.selection = None;
                state.selected_decoration = decoration_at(world, state.scene.elements());
                actions.push(Action::RenderNeeded);
            }
        }
        Ok(actions)
    }

    pub(crate) fn pointer_move(
        &mut self,
        state: &mut EngineState,
        event: PointerEvent,
    ) -> Result<Vec<Action>> {
        let world = state.viewport.screen_to_world(event.position);
        let mut actions = Vec::new();
        match self.interaction {
            Interaction::Idle => actions.push(Action::SetCursor(hover_cursor(state, world))),
            Interaction::Drawing { id } => {
                state.scene.extend_element(id, world)?;
                state.commit_in_place();
                actions.push(Action::RenderNeeded);
            }
            Interaction::Moving {
                id,
                last_world,
                committed,
            } => {
                let delta = world - last_world;
                if delta == Vec2::ZERO {
                    return Ok(actions);
                }
                state.scene.move_element(id, delta)?;
                self.record_gesture_step(state, committed, &mut actions);
                self.interaction = Interaction::Moving {
                    id,
                    last_world: world,
                    committed: true,
                };
            }
            Interaction::Resizing {
                id,
                handle,
                committed,
            } => {
                let before = state.scene.get(id).cloned();
                state.scene.resize_element(id, world, handle)?;
                if state.scene.get(id).cloned() == before {
                    return Ok(actions);
                }
                self.record_gesture_step(state, committed, &mut actions);
                self.interaction = Interaction::Resizing {
                    id,
                    handle,
                    committed: true,
                };
            }
            Interaction::Panning { last_screen } => {
                state.viewport.pan(event.position - last_screen);
                self.interaction = Interaction::Panning {
                    last_screen: event.position,
                };
                actions.push(Action::RenderNeeded);
            }
            Interaction::Erasing { .. } => self.erase_at(state, world, &mut actions),
            Interaction::EditingText => {}
        }
        Ok(actions)
    }

    pub(crate) fn pointer_up(
        &mut self,
        state: &mut EngineState,
        event: PointerEvent,
        now_ms: u64,
    ) -> Result<Vec<Action>> {
        let mut actions = Vec::new();
        match self.interaction {
            Interaction::Drawing { id }
            | Interaction::Moving {
                id,
                committed: true,
                ..
            }
            | Interaction::Resizing {
                id,
                committed: true,
                ..
            } => {
                self.transition(Interaction::Idle);
                if state.scene.contains(id) {
                    state.scene.commit_element(id)?;
                    state.commit_in_place();
                    actions.push(Action::RenderNeeded);
                    actions.push(history_changed(state));
                } else {
                    log::debug!("Pointer-up without an active element");
                }
            }
            Interaction::Moving { .. } | Interaction::Resizing { .. } => {
                self.transition(Interaction::Idle);
                actions.push(Action::RenderNeeded);
            }
            Interaction::Panning { .. } => {
                self.transition(Interaction::Idle);
                let world = state.viewport.screen_to_world(event.position);
                actions.push(Action::SetCursor(hover_cursor(state, world)));
            }
            Interaction::Erasing { erased } => {
                self.transition(Interaction::Idle);
                if erased > 0 {
                    log::debug!("Erased {erased} element(s)");
                }
                actions.push(Action::RenderNeeded);
            }
            Interaction::Idle | Interaction::EditingText => {}
        }
        actions.extend(self.flush_deferred(state, now_ms));
        Ok(actions)
    }

    /// Open a version on the first change of a gesture, overwrite it after.
    fn record_gesture_step(&self, state: &mut EngineState, committed: bool, actions: &mut Vec<Action>) {
        if committed {
            state.commit_in_place();
        } else {
            state.commit();
            actions.push(history_changed(state));
        }
        actions.push(Action::RenderNeeded);
    }

    fn erase_at(&mut self, state: &mut EngineState, world: Point, actions: &mut Vec<Action>) {
        let Interaction::Erasing { erased } = self.interaction else {
            return;
        };
        let Some(hit) = topmost_hit(world, state.scene.elements(), &state.tolerance()) else {
            return;
        };
        state.scene.remove(hit.id);
        state.drop_stale_selection();
        if erased == 0 {
            state.commit();
            actions.push(history_changed(state));
        } else {
            state.commit_in_place();
        }
        self.interaction = Interaction::Erasing { erased: erased + 1 };
        actions.push(Action::RenderNeeded);
    }

    pub(crate) fn wheel(&mut self, state: &mut EngineState, event: WheelEvent) -> Vec<Action> {
        let zoom = match state.config.wheel_binding {
            WheelBinding::PanByWheel => event.modifiers.command(),
            WheelBinding::ZoomByWheel => !event.modifiers.command(),
        };
        if zoom {
            if event.delta.y == 0.0 {
                return Vec::new();
            }
            let step = state.config.zoom_step;
            let factor = if event.delta.y < 0.0 { step } else { 1.0 / step };
            state.viewport.zoom(factor, event.position);
        } else {
            state.viewport.pan(-event.delta);
        }
        vec![Action::RenderNeeded]
    }

    pub(crate) fn key_down(&mut self, state: &mut EngineState, event: &KeyEvent) -> Result<Vec<Action>> {
        if event.modifiers.command() && event.key.eq_ignore_ascii_case("z") {
            return Ok(if event.modifiers.shift {
                self.redo(state)
            } else {
                self.undo(state)
            });
        }

        if self.interaction == Interaction::EditingText {
            return self.edit_text_key(state, event);
        }

        if event.is_space() {
            state.space_held = true;
            return Ok(if self.interaction.is_idle() {
                vec![Action::SetCursor(CursorKind::Grabbing)]
            } else {
                Vec::new()
            });
        }

        if !self.interaction.is_idle() {
            return Ok(Vec::new());
        }
        match event.key.as_str() {
            "Delete" | "Backspace" => {
                match state.selection.or(state.selected_decoration) {
                    Some(id) => delete_element(state, id),
                    None => Ok(Vec::new()),
                }
            }
            "Escape" => {
                state.selection = None;
                state.selected_decoration = None;
                Ok(vec![Action::RenderNeeded])
            }
            _ => Ok(Vec::new()),
        }
    }

    pub(crate) fn key_up(&mut self, state: &mut EngineState, event: &KeyEvent) -> Vec<Action> {
        if event.is_space() && state.space_held {
            state.space_held = false;
            return vec![Action::SetCursor(state.tool.cursor())];
        }
        Vec::new()
    }

    fn edit_text_key(&mut self, state: &mut EngineState, event: &KeyEvent) -> Result<Vec<Action>> {
        match event.key.as_str() {
            "Enter" if !event.modifiers.shift => return self.commit_text(state),
            "Escape" => return Ok(self.cancel_text(state)),
            _ => {}
        }
        let Some(editor) = state.text_editor.as_mut() else {
            return Ok(Vec::new());
        };
        match event.key.as_str() {
            "Enter" => editor.insert_char('\n'),
            "Backspace" => editor.backspace(),
            key => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !event.modifiers.command() => editor.insert_char(c),
                    _ => return Ok(Vec::new()),
                }
            }
        }
        Ok(vec![Action::RenderNeeded])
    }

    /// Write the editor content back to the scene as one commit.
    ///
    /// Blank text creates nothing and removes the element being re-edited.
    pub(crate) fn commit_text(&mut self, state: &mut EngineState) -> Result<Vec<Action>> {
        self.transition(Interaction::Idle);
        let Some(editor) = state.text_editor.take() else {
            return Ok(vec![Action::RenderNeeded]);
        };

        let id = match editor.target {
            Some(id) if editor.is_blank() => {
                state.scene.remove(id);
                state.drop_stale_selection();
                None
            }
            Some(id) => {
                let unchanged = matches!(
                    state.scene.get(id),
                    Some(Element::Text(text)) if text.content == editor.buffer
                );
                if unchanged {
                    return Ok(vec![Action::RenderNeeded]);
                }
                if let Element::Text(text) = state.scene.element_mut(id)? {
                    text.content = editor.buffer;
                }
                Some(id)
            }
            None if editor.is_blank() => return Ok(vec![Action::RenderNeeded]),
            None => {
                let text = Text::new(editor.anchor, editor.buffer, editor.font_size, editor.color);
                Some(state.scene.push(Element::Text(text)))
            }
        };
        if let Some(id) = id {
            state.scene.commit_element(id)?;
        }
        state.commit();
        Ok(vec![Action::RenderNeeded, history_changed(state)])
    }

    pub(crate) fn cancel_text(&mut self, state: &mut EngineState) -> Vec<Action> {
        self.transition(Interaction::Idle);
        state.text_editor = None;
        vec![Action::RenderNeeded]
    }

    pub(crate) fn undo(&mut self, state: &mut EngineState) -> Vec<Action> {
        if !self.interaction.is_idle() || !state.history.undo() {
            return Vec::new();
        }
        state.restore_from_history();
        vec![Action::RenderNeeded, history_changed(state)]
    }

    pub(crate) fn redo(&mut self, state: &mut EngineState) -> Vec<Action> {
        if !self.interaction.is_idle() || !state.history.redo() {
            return Vec::new();
        }
        state.restore_from_history();
        vec![Action::RenderNeeded, history_changed(state)]
    }

    /// Apply a settled asset load, or hold it until the gesture ends.
    pub(crate) fn finish_asset_load(
        &mut self,
        state: &mut EngineState,
        request: AssetRequest,
        result: Result<AssetInfo>,
        now_ms: u64,
    ) -> Result<Vec<Action>> {
        if self.interaction.is_gesture() {
            log::debug!("Deferring asset {} until pointer-up", request.source);
            self.deferred.push((request, result));
            return Ok(Vec::new());
        }
        place_asset(state, request, result, now_ms)
    }

    fn flush_deferred(&mut self, state: &mut EngineState, now_ms: u64) -> Vec<Action> {
        let mut actions = Vec::new();
        for (request, result) in std::mem::take(&mut self.deferred) {
            match place_asset(state, request, result, now_ms) {
                Ok(placed) => actions.extend(placed),
                Err(e) => {
                    log::warn!("Deferred asset failed: {e}");
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        actions
    }
}

fn hover_cursor(state: &EngineState, world: Point) -> CursorKind {
    if matches!(state.tool, ToolKind::Eraser | ToolKind::Pan) {
        return state.tool.cursor();
    }
    match topmost_hit(world, state.scene.elements(), &state.tolerance()) {
        Some(hit) => cursor_for_position(hit.position),
        None => state.tool.cursor(),
    }
}

/// Append the element for a loaded asset and commit once.
fn place_asset(
    state: &mut EngineState,
    request: AssetRequest,
    result: Result<AssetInfo>,
    now_ms: u64,
) -> Result<Vec<Action>> {
    let info = match result {
        Ok(info) => info,
        Err(e) => {
            log::warn!("Failed to load asset {}: {e}", request.source);
            state.alert(format!("Failed to load {}", request.source), now_ms);
            return Err(match e {
                EngineError::AssetLoadFailure(_) => e,
                other => EngineError::AssetLoadFailure(other.to_string()),
            });
        }
    };

    let element = match request.placement {
        AssetPlacement::Sticker { anchor } => Element::Sticker(Sticker::fitted(
            anchor,
            state.config.sticker_size,
            info.size,
            request.source,
        )),
        AssetPlacement::Decoration {
            position,
            animation,
        } => {
            let side = state.config.decoration_size;
            Element::Decoration(Decoration::new(
                position,
                Size::new(side, side),
                animation,
                request.source,
                now_ms,
                state.config.decoration_duration_ms,
            ))
        }
    };
    let kind = element.kind();
    let id = state.scene.push(element);
    state.commit();
    log::info!("Placed {kind} {id}");
    Ok(vec![Action::RenderNeeded, history_changed(state)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn drive(machine: &mut InputMachine, state: &mut EngineState, points: &[(f64, f64)]) {
        let (first, rest) = points.split_first().unwrap();
        machine
            .pointer_down(state, PointerEvent::at(first.0, first.1), 0)
            .unwrap();
        for &(x, y) in rest {
            machine.pointer_move(state, PointerEvent::at(x, y)).unwrap();
        }
        let last = points.last().unwrap();
        machine
            .pointer_up(state, PointerEvent::at(last.0, last.1), 0)
            .unwrap();
    }

    fn key(name: &str) -> KeyEvent {
        KeyEvent::new(name, Modifiers::NONE)
    }

    #[test]
    fn test_draw_commits_once() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Rectangle;
        drive(&mut machine, &mut state, &[(0.0, 0.0), (20.0, 20.0), (40.0, 30.0)]);

        assert!(machine.interaction.is_idle());
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.scene.len(), 1);
        assert_eq!(state.history.current(), &state.scene.snapshot());
    }

    #[test]
    fn test_click_without_move_does_not_commit() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Rectangle;
        drive(&mut machine, &mut state, &[(0.0, 0.0), (40.0, 40.0)]);
        state.tool = ToolKind::Select;

        drive(&mut machine, &mut state, &[(20.0, 20.0)]);
        assert_eq!(state.history.len(), 2);
    }

    #[test]
    fn test_move_is_one_step() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Rectangle;
        drive(&mut machine, &mut state, &[(0.0, 0.0), (40.0, 40.0)]);
        let drawn = state.scene.snapshot();

        state.tool = ToolKind::Select;
        drive(
            &mut machine,
            &mut state,
            &[(20.0, 20.0), (25.0, 20.0), (30.0, 20.0), (30.0, 30.0)],
        );
        assert_eq!(state.history.len(), 3);
        let Some(Element::Rectangle(rect)) = state.scene.elements().first() else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.p1, Point::new(10.0, 10.0));

        assert!(!machine.undo(&mut state).is_empty());
        assert_eq!(state.scene.snapshot(), drawn);
    }

    #[test]
    fn test_pan_gesture_moves_viewport() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        let down = PointerEvent::at(10.0, 10.0).with_button(MouseButton::Middle);
        machine.pointer_down(&mut state, down, 0).unwrap();
        machine
            .pointer_move(&mut state, PointerEvent::at(30.0, 25.0))
            .unwrap();
        machine
            .pointer_up(&mut state, PointerEvent::at(30.0, 25.0), 0)
            .unwrap();
        assert_eq!(state.viewport.pan, Vec2::new(20.0, 15.0));
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_space_held_pans() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Freehand;
        machine.key_down(&mut state, &key(" ")).unwrap();
        drive(&mut machine, &mut state, &[(0.0, 0.0), (5.0, 0.0)]);
        assert!(state.scene.is_empty());
        assert_eq!(state.viewport.pan, Vec2::new(5.0, 0.0));

        machine.key_up(&mut state, &key(" "));
        assert!(!state.space_held);
    }

    #[test]
    fn test_pen_widens_stroke() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Freehand;
        let down = PointerEvent::at(0.0, 0.0).with_kind(PointerKind::Pen);
        machine.pointer_down(&mut state, down, 0).unwrap();
        let Some(Element::Freehand(stroke)) = state.scene.elements().first() else {
            panic!("expected freehand");
        };
        assert!((stroke.stroke_width - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_entry_and_commit() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Text;
        let actions = machine
            .pointer_down(&mut state, PointerEvent::at(50.0, 50.0), 0)
            .unwrap();
        assert!(actions.contains(&Action::EditText { id: None }));
        assert_eq!(machine.interaction, Interaction::EditingText);

        for k in ["H", "i", "Backspace", "o"] {
            machine.key_down(&mut state, &key(k)).unwrap();
        }
        assert_eq!(state.text_editor.as_ref().unwrap().buffer, "Ho");
        machine.key_down(&mut state, &key("Enter")).unwrap();

        assert!(machine.interaction.is_idle());
        assert_eq!(state.history.len(), 2);
        let Some(Element::Text(text)) = state.scene.elements().first() else {
            panic!("expected text");
        };
        assert_eq!(text.content, "Ho");
        assert_eq!(text.anchor, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_blank_text_creates_nothing() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Text;
        machine
            .pointer_down(&mut state, PointerEvent::at(0.0, 0.0), 0)
            .unwrap();
        machine.key_down(&mut state, &key(" ")).unwrap();
        machine.key_down(&mut state, &key("Enter")).unwrap();
        assert!(state.scene.is_empty());
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_escape_cancels_text() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Text;
        machine
            .pointer_down(&mut state, PointerEvent::at(0.0, 0.0), 0)
            .unwrap();
        machine.key_down(&mut state, &key("a")).unwrap();
        machine.key_down(&mut state, &key("Escape")).unwrap();
        assert!(state.text_editor.is_none());
        assert!(state.scene.is_empty());
    }

    #[test]
    fn test_double_click_reedits_text() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Text;
        machine
            .pointer_down(&mut state, PointerEvent::at(0.0, 0.0), 0)
            .unwrap();
        machine.key_down(&mut state, &key("a")).unwrap();
        machine.key_down(&mut state, &key("Enter")).unwrap();
        let id = state.scene.elements()[0].id();

        state.tool = ToolKind::Select;
        drive(&mut machine, &mut state, &[(5.0, 5.0)]);
        let actions = machine
            .pointer_down(&mut state, PointerEvent::at(5.0, 5.0), 100)
            .unwrap();
        assert!(actions.contains(&Action::EditText { id: Some(id) }));
        assert_eq!(state.editing_element(), Some(id));

        machine.key_down(&mut state, &key("Backspace")).unwrap();
        machine.key_down(&mut state, &key("Enter")).unwrap();
        assert!(state.scene.is_empty());
        assert_eq!(state.history.len(), 3);
    }

    #[test]
    fn test_wheel_pans_and_zooms() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        machine.wheel(
            &mut state,
            WheelEvent {
                position: Point::ZERO,
                delta: Vec2::new(0.0, 30.0),
                modifiers: Modifiers::NONE,
            },
        );
        assert_eq!(state.viewport.pan, Vec2::new(0.0, -30.0));

        let zoom = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        machine.wheel(
            &mut state,
            WheelEvent {
                position: Point::new(100.0, 100.0),
                delta: Vec2::new(0.0, -1.0),
                modifiers: zoom,
            },
        );
        assert!((state.viewport.scale - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_undo_ignored_mid_gesture() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Line;
        machine
            .pointer_down(&mut state, PointerEvent::at(0.0, 0.0), 0)
            .unwrap();
        let undo = KeyEvent::new(
            "z",
            Modifiers {
                meta: true,
                ..Modifiers::NONE
            },
        );
        assert!(machine.key_down(&mut state, &undo).unwrap().is_empty());
        assert_eq!(state.scene.len(), 1);
    }

    #[test]
    fn test_sticker_without_source_alerts() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Sticker;
        machine
            .pointer_down(&mut state, PointerEvent::at(0.0, 0.0), 10)
            .unwrap();
        assert!(state.visible_alert(10).is_some());

        state.sticker_source = Some("cat".into());
        let actions = machine
            .pointer_down(&mut state, PointerEvent::at(0.0, 0.0), 2000)
            .unwrap();
        assert!(matches!(
            actions.as_slice(),
            [Action::LoadAsset(AssetRequest { source, .. })] if source == "cat"
        ));
    }

    #[test]
    fn test_asset_deferred_during_gesture() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Freehand;
        machine
            .pointer_down(&mut state, PointerEvent::at(0.0, 0.0), 0)
            .unwrap();

        let request = AssetRequest {
            source: "cat".into(),
            placement: AssetPlacement::Sticker { anchor: Point::ZERO },
        };
        let info = AssetInfo {
            size: Size::new(200.0, 100.0),
        };
        machine
            .finish_asset_load(&mut state, request, Ok(info), 0)
            .unwrap();
        assert_eq!(state.scene.len(), 1);

        machine
            .pointer_up(&mut state, PointerEvent::at(0.0, 0.0), 0)
            .unwrap();
        assert_eq!(state.scene.len(), 2);
        assert_eq!(state.history.len(), 3);
        let Some(Element::Sticker(sticker)) = state.scene.elements().last() else {
            panic!("expected sticker");
        };
        assert!((sticker.height - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_abort_drops_deferred_assets() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Freehand;
        machine
            .pointer_down(&mut state, PointerEvent::at(0.0, 0.0), 0)
            .unwrap();
        let request = AssetRequest {
            source: "cat".into(),
            placement: AssetPlacement::Sticker { anchor: Point::ZERO },
        };
        let info = AssetInfo {
            size: Size::new(10.0, 10.0),
        };
        machine
            .finish_asset_load(&mut state, request, Ok(info), 0)
            .unwrap();

        machine.abort(&mut state);
        assert!(machine.interaction.is_idle());

        machine
            .pointer_down(&mut state, PointerEvent::at(50.0, 50.0), 0)
            .unwrap();
        machine
            .pointer_up(&mut state, PointerEvent::at(50.0, 50.0), 0)
            .unwrap();
        assert!(state
            .scene
            .elements()
            .iter()
            .all(|e| !matches!(e, Element::Sticker(_))));
    }

    #[test]
    fn test_failed_asset_alerts_without_element() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        let request = AssetRequest {
            source: "star".into(),
            placement: AssetPlacement::Decoration {
                position: Point::ZERO,
                animation: Default::default(),
            },
        };
        let result = machine.finish_asset_load(
            &mut state,
            request,
            Err(EngineError::AssetLoadFailure("404".into())),
            5,
        );
        assert!(matches!(result, Err(EngineError::AssetLoadFailure(_))));
        assert!(state.scene.is_empty());
        assert_eq!(state.history.len(), 1);
        assert!(state.visible_alert(5).is_some());
    }

    #[test]
    fn test_delete_selection_key() {
        let mut state = EngineState::default();
        let mut machine = InputMachine::default();
        state.tool = ToolKind::Circle;
        drive(&mut machine, &mut state, &[(50.0, 50.0), (60.0, 50.0)]);
        assert!(state.selection.is_some());

        machine.key_down(&mut state, &key("Delete")).unwrap();
        assert!(state.scene.is_empty());
        assert_eq!(state.selection, None);
        assert_eq!(state.history.len(), 3);
    }
}
