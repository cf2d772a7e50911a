//! The widget tree: ownership, container membership and traversal.
//!
//! Every widget lives in a [`WidgetTree`] arena and is addressed by a
//! [`WidgetId`]. Ids are generation-checked, so an id kept after its widget
//! was destroyed is detectably stale instead of pointing at a reused slot.
//!
//! A widget whose [`Widget::is_container`] returns `true` can hold children.
//! The tree guarantees:
//!
//! - A widget has at most one parent and appears in that parent's child list
//!   exactly once. [`add_child`](WidgetTree::add_child) moves a widget out of
//!   its old container before appending it to the new one.
//! - A child's content state always matches its container's: children added
//!   to a loaded container are loaded, children removed from it are unloaded.
//! - Children are kept in insertion order. Later children draw on top and win
//!   hit-tests.

use std::time::Instant;

use slotmap::{SlotMap, new_key_type};

use horizon_controls_core::logging::{TreeDebug, TreeFormatOptions, format_tree, targets};
use horizon_controls_core::{ControlsError, Point, Rect, Result};

use crate::content::ContentHandle;
use crate::widget::{Canvas, ControlMessage, DeferredRequest, EventContext, FrameTime, PaintContext, Widget};

new_key_type! {
    /// A handle to a widget in a [`WidgetTree`].
    ///
    /// Handles stay valid until the widget is destroyed; after that every
    /// lookup with the handle fails.
    pub struct WidgetId;
}

struct WidgetNode {
    widget: Box<dyn Widget>,
    parent: Option<WidgetId>,
    /// `Some` for containers, `None` for leaves.
    children: Option<Vec<WidgetId>>,
    content: Option<ContentHandle>,
}

/// Arena owning every widget of a control hierarchy.
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, WidgetNode>,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a usage error and hand it back for returning.
fn usage_error(error: ControlsError, operation: &'static str) -> ControlsError {
    tracing::error!(target: targets::TREE, %error, operation, "widget tree usage error");
    error
}

impl WidgetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Take ownership of `widget`. It starts detached and unloaded.
    pub fn insert<W: Widget>(&mut self, widget: W) -> WidgetId {
        self.insert_boxed(Box::new(widget))
    }

    /// Boxed form of [`insert`](Self::insert).
    pub fn insert_boxed(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        let children = widget.is_container().then(Vec::new);
        let type_name = widget.type_name();
        let id = self.nodes.insert(WidgetNode {
            widget,
            parent: None,
            children,
            content: None,
        });
        tracing::trace!(target: targets::TREE, ?id, type_name, "inserted widget");
        id
    }

    /// Whether `id` refers to a live widget.
    #[inline]
    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&(dyn Widget + 'static)> {
        self.nodes.get(id).map(|node| node.widget.as_ref())
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        self.nodes.get_mut(id).map(|node| node.widget.as_mut())
    }

    /// Borrow a widget as its concrete type.
    pub fn get<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.nodes.get(id)?.widget.downcast_ref::<T>()
    }

    /// Mutably borrow a widget as its concrete type.
    pub fn get_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.nodes.get_mut(id)?.widget.downcast_mut::<T>()
    }

    /// Set a widget's bounds through [`Widget::set_bounds`].
    pub fn set_bounds(&mut self, id: WidgetId, bounds: Rect) -> Result<()> {
        let widget = self
            .widget_mut(id)
            .ok_or_else(|| usage_error(ControlsError::InvalidWidgetId, "set_bounds"))?;
        widget.set_bounds(bounds);
        Ok(())
    }

    // =========================================================================
    // Structure
    // =========================================================================

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Children in insertion order. Empty for leaves and stale ids.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes
            .get(id)
            .and_then(|node| node.children.as_deref())
            .unwrap_or(&[])
    }

    pub fn is_container(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.children.is_some())
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = self.parent(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.parent(current_id);
        }
        false
    }

    /// Whether `widget` is a child of `container`, or with `recursive` any
    /// descendant of it.
    pub fn contains(&self, container: WidgetId, widget: WidgetId, recursive: bool) -> bool {
        if recursive {
            self.is_ancestor(container, widget)
        } else {
            self.parent(widget) == Some(container)
        }
    }

    /// `id` and everything below it, parents before children.
    pub fn descendants(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.is_alive(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// Append `child` to `container`.
    ///
    /// If `child` belongs to another container it is first removed from it
    /// (and unloaded). If `container` has content loaded, `child` is loaded
    /// with the same handle. Adding a widget to the container it already
    /// belongs to does nothing.
    #[tracing::instrument(skip(self), target = "horizon_controls::tree", level = "debug")]
    pub fn add_child(&mut self, container: WidgetId, child: WidgetId) -> Result<()> {
        self.check_add_child(container, child)?;

        match self.parent(child) {
            Some(parent) if parent == container => return Ok(()),
            Some(old_parent) => self.detach(old_parent, child),
            None => {}
        }

        if let Some(children) = self.nodes.get_mut(container).and_then(|n| n.children.as_mut()) {
            children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(container);
        }

        let container_content = self.nodes.get(container).and_then(|n| n.content.clone());
        self.sync_content(child, container_content.as_ref());

        tracing::debug!(target: targets::TREE, ?container, ?child, "child added");
        Ok(())
    }

    /// Check that `child` may be appended to `container` without touching
    /// either of them.
    pub fn check_add_child(&self, container: WidgetId, child: WidgetId) -> Result<()> {
        let Some(node) = self.nodes.get(container) else {
            return Err(usage_error(ControlsError::InvalidWidgetId, "add_child"));
        };
        if node.children.is_none() {
            return Err(usage_error(ControlsError::NotAContainer, "add_child"));
        }
        if !self.is_alive(child) {
            return Err(usage_error(ControlsError::InvalidWidgetId, "add_child"));
        }
        if child == container || self.is_ancestor(child, container) {
            return Err(usage_error(ControlsError::CircularParentage, "add_child"));
        }
        Ok(())
    }

    /// Remove `child` from `container`, unloading it if loaded.
    ///
    /// Returns `Ok(false)` if `child` is not a direct child of `container`.
    pub fn remove_child(&mut self, container: WidgetId, child: WidgetId) -> Result<bool> {
        let Some(node) = self.nodes.get(container) else {
            return Err(usage_error(ControlsError::InvalidWidgetId, "remove_child"));
        };
        if node.children.is_none() {
            return Err(usage_error(ControlsError::NotAContainer, "remove_child"));
        }
        if self.parent(child) != Some(container) {
            return Ok(false);
        }

        self.detach(container, child);
        tracing::debug!(target: targets::TREE, ?container, ?child, "child removed");
        Ok(true)
    }

    /// Destroy a widget and everything below it.
    ///
    /// The subtree is detached and unloaded first. Returns the destroyed ids.
    #[tracing::instrument(skip(self), target = "horizon_controls::tree", level = "debug")]
    pub fn destroy(&mut self, id: WidgetId) -> Result<Vec<WidgetId>> {
        let Some(node) = self.nodes.get(id) else {
            return Err(usage_error(ControlsError::InvalidWidgetId, "destroy"));
        };

        match (node.parent, node.content.clone()) {
            (Some(parent), _) => self.detach(parent, id),
            (None, Some(handle)) => self.unload_subtree(id, &handle),
            (None, None) => {}
        }

        let doomed = self.descendants(id);
        tracing::trace!(target: targets::TREE, ?id, count = doomed.len(), "destroying widget subtree");
        for &doomed_id in doomed.iter().rev() {
            self.nodes.remove(doomed_id);
        }
        Ok(doomed)
    }

    /// Unload `child` if loaded, then unlink it from `parent`.
    fn detach(&mut self, parent: WidgetId, child: WidgetId) {
        if let Some(handle) = self.nodes.get(child).and_then(|n| n.content.clone()) {
            self.unload_subtree(child, &handle);
        }
        if let Some(children) = self.nodes.get_mut(parent).and_then(|n| n.children.as_mut()) {
            children.retain(|&c| c != child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = None;
        }
    }

    // =========================================================================
    // Content lifecycle
    // =========================================================================

    /// The handle `id` was loaded with, if any.
    pub fn content(&self, id: WidgetId) -> Option<&ContentHandle> {
        self.nodes.get(id).and_then(|node| node.content.as_ref())
    }

    pub fn is_loaded(&self, id: WidgetId) -> bool {
        self.content(id).is_some()
    }

    /// Load `id` and every descendant with `handle`.
    ///
    /// `id` must not have a container; a child's content follows its
    /// container's and fails with [`ControlsError::ContentManagedByParent`].
    /// Loading again with the same handle does nothing. Fails with
    /// [`ControlsError::ContentAlreadyLoaded`] if any widget in the subtree is
    /// loaded with a different handle.
    #[tracing::instrument(skip(self, handle), target = "horizon_controls::content", level = "debug")]
    pub fn load_content(&mut self, id: WidgetId, handle: &ContentHandle) -> Result<()> {
        let Some(node) = self.nodes.get(id) else {
            return Err(usage_error(ControlsError::InvalidWidgetId, "load_content"));
        };
        if node.parent.is_some() {
            return Err(usage_error(ControlsError::ContentManagedByParent, "load_content"));
        }
        let conflicting = self
            .descendants(id)
            .into_iter()
            .any(|d| self.content(d).is_some_and(|existing| existing != handle));
        if conflicting {
            return Err(usage_error(ControlsError::ContentAlreadyLoaded, "load_content"));
        }

        self.load_subtree(id, handle);
        Ok(())
    }

    /// Unload `id` and every descendant.
    ///
    /// `handle` must be the handle the content was loaded with. As with
    /// [`load_content`](Self::load_content), `id` must not have a container.
    #[tracing::instrument(skip(self, handle), target = "horizon_controls::content", level = "debug")]
    pub fn unload_content(&mut self, id: WidgetId, handle: &ContentHandle) -> Result<()> {
        let Some(node) = self.nodes.get(id) else {
            return Err(usage_error(ControlsError::InvalidWidgetId, "unload_content"));
        };
        if node.parent.is_some() {
            return Err(usage_error(ControlsError::ContentManagedByParent, "unload_content"));
        }
        match &node.content {
            None => Err(usage_error(ControlsError::ContentNotLoaded, "unload_content")),
            Some(loaded) if loaded != handle => {
                Err(usage_error(ControlsError::ContentHandleMismatch, "unload_content"))
            }
            Some(_) => {
                self.unload_subtree(id, handle);
                Ok(())
            }
        }
    }

    /// Bring `id`'s subtree to the content state `target`.
    fn sync_content(&mut self, id: WidgetId, target: Option<&ContentHandle>) {
        let current = self.content(id).cloned();
        if current.as_ref() == target {
            return;
        }
        if let Some(current) = current {
            self.unload_subtree(id, &current);
        }
        if let Some(target) = target {
            self.load_subtree(id, target);
        }
    }

    /// Parents first. Widgets already loaded are skipped.
    fn load_subtree(&mut self, id: WidgetId, handle: &ContentHandle) {
        for current in self.descendants(id) {
            if let Some(node) = self.nodes.get_mut(current) {
                if node.content.is_none() {
                    node.widget.load_content(handle);
                    node.content = Some(handle.clone());
                    tracing::trace!(target: targets::CONTENT, id = ?current, "content loaded");
                }
            }
        }
    }

    /// Children first.
    fn unload_subtree(&mut self, id: WidgetId, handle: &ContentHandle) {
        for current in self.descendants(id).into_iter().rev() {
            if let Some(node) = self.nodes.get_mut(current) {
                if node.content.is_some() {
                    node.widget.unload_content(handle);
                    node.content = None;
                    tracing::trace!(target: targets::CONTENT, id = ?current, "content unloaded");
                }
            }
        }
    }

    // =========================================================================
    // Geometry and hit-testing
    // =========================================================================

    /// Leaf widgets under `root`, depth-first in draw order.
    ///
    /// The iterator is lazy; call again to restart.
    pub fn leaves(&self, root: WidgetId) -> Leaves<'_> {
        Leaves {
            tree: self,
            stack: self.children(root).iter().rev().copied().collect(),
        }
    }

    /// Position of `id` in UI space: its own position plus every ancestor's.
    pub fn absolute_position(&self, id: WidgetId) -> Option<Point> {
        let mut node = self.nodes.get(id)?;
        let mut position = node.widget.widget_base().position();
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            position += node.widget.widget_base().position();
        }
        Some(position)
    }

    /// Bounds of `id` in UI space.
    pub fn absolute_bounds(&self, id: WidgetId) -> Option<Rect> {
        let position = self.absolute_position(id)?;
        let size = self.nodes.get(id)?.widget.widget_base().size();
        Some(Rect::from_origin_size(position, size))
    }

    /// Whether `point` lies within the absolute bounds of `id`.
    pub fn hit_test(&self, id: WidgetId, point: Point) -> bool {
        self.absolute_bounds(id)
            .is_some_and(|bounds| bounds.contains(point))
    }

    /// The topmost leaf under `root` containing `point`.
    ///
    /// Disabled leaves are skipped unless `include_disabled` is set.
    pub fn widget_at(&self, root: WidgetId, point: Point, include_disabled: bool) -> Option<WidgetId> {
        self.leaves(root)
            .filter(|&leaf| {
                (include_disabled || self.widget(leaf).is_some_and(|w| w.is_enabled()))
                    && self.hit_test(leaf, point)
            })
            .last()
    }

    // =========================================================================
    // Dispatch and frame traversal
    // =========================================================================

    /// Deliver `message` to `id`.
    ///
    /// Focus and hover flags on the widget's base are updated before the
    /// widget sees the message. Returns the widget's `event` result, or
    /// `false` for stale ids.
    pub fn dispatch(
        &mut self,
        id: WidgetId,
        message: &ControlMessage,
        now: Instant,
        requests: &mut Vec<DeferredRequest>,
    ) -> bool {
        let Some(origin) = self.absolute_position(id) else {
            return false;
        };
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };

        let base = node.widget.widget_base_mut();
        match message {
            ControlMessage::GotFocus => base.set_focused(true),
            ControlMessage::LostFocus => base.set_focused(false),
            ControlMessage::MouseEnter => base.set_hovered(true),
            ControlMessage::MouseLeave => base.set_hovered(false),
            _ => {}
        }

        tracing::trace!(target: targets::INPUT, ?id, message = message.name(), "dispatching");
        let mut ctx = EventContext::new(id, now, requests).with_origin(origin);
        node.widget.event(message, &mut ctx)
    }

    /// Update `root` and its descendants, parents first, children in order.
    pub fn update(&mut self, root: WidgetId, frame: &FrameTime) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(id) {
                node.widget.update(frame);
                if let Some(children) = &node.children {
                    stack.extend(children.iter().rev().copied());
                }
            }
        }
    }

    /// Paint `root` and its descendants in draw order.
    pub fn draw(&self, root: WidgetId, canvas: &mut dyn Canvas) {
        let origin = self
            .parent(root)
            .and_then(|parent| self.absolute_position(parent))
            .unwrap_or(Point::ZERO);

        let mut stack = vec![(root, origin)];
        while let Some((id, parent_origin)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let base = node.widget.widget_base();
            let rect = base.bounds().translate(parent_origin);

            let mut ctx = PaintContext::new(&mut *canvas, rect).with_focus(base.is_focused());
            node.widget.paint(&mut ctx);

            if let Some(children) = &node.children {
                stack.extend(children.iter().rev().map(|&child| (child, rect.origin)));
            }
        }
    }

    /// Render the hierarchy under `root` for debugging.
    pub fn dump(&self, root: WidgetId) -> String {
        format_tree(self, root, &TreeFormatOptions::detailed())
    }
}

impl TreeDebug for WidgetTree {
    type Id = WidgetId;

    fn node_name(&self, id: WidgetId) -> String {
        self.widget(id)
            .map(|w| w.widget_base().name().to_string())
            .unwrap_or_default()
    }

    fn node_type_name(&self, id: WidgetId) -> &'static str {
        self.widget(id).map_or("<destroyed>", |w| w.type_name())
    }

    fn node_details(&self, id: WidgetId) -> Option<String> {
        let widget = self.widget(id)?;
        let mut details = vec![if self.is_loaded(id) { "loaded" } else { "unloaded" }];
        if !widget.is_enabled() {
            details.push("disabled");
        }
        if widget.is_focused() {
            details.push("focused");
        }
        if widget.is_hovered() {
            details.push("hovered");
        }
        Some(details.join(", "))
    }

    fn node_children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.children(id).to_vec()
    }
}

/// Lazy depth-first iterator over leaf widgets. See [`WidgetTree::leaves`].
pub struct Leaves<'a> {
    tree: &'a WidgetTree,
    stack: Vec<WidgetId>,
}

impl Iterator for Leaves<'_> {
    type Item = WidgetId;

    fn next(&mut self) -> Option<WidgetId> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.nodes.get(id) else {
                continue;
            };
            match &node.children {
                Some(children) => self.stack.extend(children.iter().rev().copied()),
                None => return Some(id),
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Leaves<'_> {}

static_assertions::assert_impl_all!(WidgetTree: Send, Sync);
