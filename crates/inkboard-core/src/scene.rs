//! The live element collection.

use crate::drawable::{Drawable, DrawableCache, RoughGenerator, SketchyRenderer};
use crate::element::{ApproxTextMeasure, Element, ElementId, TextMeasure};
use crate::error::{EngineError, Result};
use std::collections::HashSet;
use std::fmt;

/// Elements in z-order (later entries draw on top) plus their derived
/// drawables.
///
/// Element ids are unique within a scene; inserting a duplicate id assigns a
/// fresh one.
pub struct Scene {
    elements: Vec<Element>,
    drawables: DrawableCache,
    renderer: Box<dyn SketchyRenderer>,
    measure: Box<dyn TextMeasure>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("elements", &self.elements)
            .field("drawables", &self.drawables.len())
            .finish()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_collaborators(Box::new(RoughGenerator::default()), Box::new(ApproxTextMeasure))
    }

    /// Build a scene with a custom sketchy renderer and text metrics.
    pub fn with_collaborators(
        renderer: Box<dyn SketchyRenderer>,
        measure: Box<dyn TextMeasure>,
    ) -> Self {
        Self {
            elements: Vec::new(),
            drawables: DrawableCache::new(),
            renderer,
            measure,
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// Mutable access by id, or `ElementNotFound`.
    pub(crate) fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.elements
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(EngineError::ElementNotFound(id))
    }

    /// Mutable element together with the text metrics provider.
    pub(crate) fn element_and_measure_mut(
        &mut self,
        id: ElementId,
    ) -> Result<(&mut Element, &dyn TextMeasure)> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(EngineError::ElementNotFound(id))?;
        Ok((element, self.measure.as_ref()))
    }

    pub fn drawable(&self, id: ElementId) -> Option<&Drawable> {
        self.drawables.get(id)
    }

    pub fn text_measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    /// Append an element on top, returning its (possibly reassigned) id.
    pub fn push(&mut self, mut element: Element) -> ElementId {
        if self.contains(element.id()) {
            log::warn!("Duplicate element id {}, assigning a new one", element.id());
            element.regenerate_id();
        }
        self.drawables.refresh(&element, self.renderer.as_ref());
        let id = element.id();
        self.elements.push(element);
        id
    }

    /// Remove an element, returning it if present.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        self.drawables.remove(id);
        Some(self.elements.remove(index))
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.drawables.clear();
    }

    /// Replace the whole collection (history restore, load).
    ///
    /// Duplicate ids are reassigned and drawables rebuilt.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        let mut seen = HashSet::with_capacity(elements.len());
        self.elements = elements
            .into_iter()
            .map(|mut e| {
                while !seen.insert(e.id()) {
                    log::warn!("Duplicate element id {} in snapshot", e.id());
                    e.regenerate_id();
                }
                e
            })
            .collect();
        self.drawables.rebuild(&self.elements, self.renderer.as_ref());
    }

    /// Full copy of the collection for history.
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Re-derive the drawable of one element after an in-place edit.
    pub(crate) fn refresh_drawable(&mut self, id: ElementId) {
        if let Some(element) = self.elements.iter().find(|e| e.id() == id) {
            self.drawables.refresh(element, self.renderer.as_ref());
        }
    }
}
