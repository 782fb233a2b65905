//! Arena holding every node of one or more form trees.
//!
//! Parent/child links are stored as [`ElementId`]s on both sides and are only
//! ever changed through `attach`/`detach`, which keeps them symmetric: a node
//! lists a child exactly when that child names it as parent. Prototypes and
//! form frames are detached side nodes; they record their holder in `owner`
//! instead of `parent`.

use crate::config::{Mode, TreeConfig};
use crate::element::{ElementId, Node, NodeKind, normalize_name};
use crate::errors::{FormError, Result};
use crate::key_path::KeyPath;
use crate::widget::Widget;
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

/// Selects a direct child for [`FormTree::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRef<'a> {
    Element(ElementId),
    Name(&'a str),
}

impl From<ElementId> for ChildRef<'_> {
    fn from(value: ElementId) -> Self {
        ChildRef::Element(value)
    }
}

impl<'a> From<&'a str> for ChildRef<'a> {
    fn from(value: &'a str) -> Self {
        ChildRef::Name(value)
    }
}

#[derive(Debug, Default)]
pub struct FormTree {
    pub(crate) nodes: SlotMap<ElementId, Node>,
    pub(crate) config: TreeConfig,
}

impl FormTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            config,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.config.mode = mode;
    }

    /// Create a detached generic container.
    pub fn new_element(&mut self, name: Option<&str>) -> ElementId {
        self.insert(Node::new(name.map(str::to_string), NodeKind::Element))
    }

    pub(crate) fn insert(&mut self, node: Node) -> ElementId {
        self.nodes.insert(node)
    }

    pub fn get(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn node(&self, id: ElementId) -> Result<&Node> {
        self.nodes.get(id).ok_or(FormError::UnknownElement(id))
    }

    pub(crate) fn node_mut(&mut self, id: ElementId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(FormError::UnknownElement(id))
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, including detached roots and side nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(id)?.name()
    }

    pub fn set_name(&mut self, id: ElementId, name: Option<&str>) -> Result<()> {
        self.node_mut(id)?.name = normalize_name(name.map(str::to_string));
        Ok(())
    }

    pub fn kind(&self, id: ElementId) -> Option<&NodeKind> {
        self.nodes.get(id).map(Node::kind)
    }

    pub fn is_field(&self, id: ElementId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_field)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id)?.parent
    }

    /// Children in order; empty for unknown ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Topmost ancestor reached through parent links (the node itself when detached).
    pub fn root(&self, id: ElementId) -> Option<ElementId> {
        let mut current = id;
        let mut node = self.nodes.get(id)?;
        while let Some(parent) = node.parent {
            current = parent;
            node = self.nodes.get(parent)?;
        }
        Some(current)
    }

    /// True when `candidate` is `id` itself or contains it, following parent
    /// links and, for side nodes, the holder that owns them.
    fn encloses(&self, candidate: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == candidate {
                return true;
            }
            current = self.nodes.get(cur).and_then(|n| n.parent.or(n.owner));
        }
        false
    }

    /// Unlink `id` from its parent or holder. Leaves the node itself alive.
    pub(crate) fn detach(&mut self, id: ElementId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let parent = node.parent.take();
        let owner = node.owner.take();

        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|&c| c != id);
        }
        if let Some(owner) = owner.and_then(|o| self.nodes.get_mut(o)) {
            if owner.prototype == Some(id) {
                owner.prototype = None;
            }
            if let NodeKind::Form(form) = &mut owner.kind {
                if form.frame == Some(id) {
                    form.frame = None;
                }
            }
        }
    }

    /// Append `child` to `parent`, detaching it from wherever it was first.
    /// Callers validate existence and cycles beforehand.
    pub(crate) fn attach(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Validate that `child` may be placed under `parent` in the given mode.
    fn check_attach(&self, parent: ElementId, child: ElementId, mode: Mode) -> Result<()> {
        let node = self.node(child)?;
        if self.encloses(child, parent) {
            return Err(FormError::Cycle { child, parent });
        }
        if mode.is_strict() {
            if let Some(holder) = node.parent.filter(|&p| p != parent).or(node.owner) {
                return Err(FormError::AlreadyAttached {
                    child,
                    parent: holder,
                });
            }
        }
        Ok(())
    }

    fn warn_if_moved(&self, parent: ElementId, child: ElementId) {
        if let Some(node) = self.nodes.get(child) {
            if let Some(holder) = node.parent.filter(|&p| p != parent).or(node.owner) {
                warn!(?child, ?holder, ?parent, "moving element that is attached elsewhere");
            }
        }
    }

    /// Re-parent `id`. `None` detaches it. Always detaches from the previous
    /// parent first, so calling it with the current parent moves `id` to the end.
    pub fn set_parent(&mut self, id: ElementId, parent: Option<ElementId>) -> Result<()> {
        self.node(id)?;
        match parent {
            Some(parent) => {
                self.node(parent)?;
                if self.encloses(id, parent) {
                    return Err(FormError::Cycle { child: id, parent });
                }
                self.attach(parent, id);
                debug!(child = ?id, ?parent, "set parent");
            }
            None => {
                self.detach(id);
                debug!(child = ?id, "cleared parent");
            }
        }
        Ok(())
    }

    /// Replace the whole child sequence of `id`.
    ///
    /// Previous children become detached roots. A node listed twice ends up at
    /// its last position.
    pub fn set_children(&mut self, id: ElementId, children: Vec<ElementId>) -> Result<()> {
        let mode = self.config.mode;
        let current = self.node(id)?.children.clone();
        for &child in &children {
            if current.contains(&child) {
                // Its parent is `id`, which is released below.
                self.check_attach(id, child, Mode::Lenient)?;
            } else {
                self.check_attach(id, child, mode)?;
            }
        }

        for old in current {
            if let Some(node) = self.nodes.get_mut(old) {
                node.parent = None;
            }
        }
        self.node_mut(id)?.children.clear();

        for child in children {
            self.warn_if_moved(id, child);
            self.attach(id, child);
        }
        debug!(parent = ?id, count = self.children(id).len(), "replaced children");
        Ok(())
    }

    /// Append `elements` to the children of `id`.
    ///
    /// In strict mode an element that already has another parent (or is held
    /// as a prototype/frame) is rejected with [`FormError::AlreadyAttached`];
    /// leniently it is moved. Nothing is changed when validation fails.
    pub fn add(&mut self, id: ElementId, elements: &[ElementId]) -> Result<()> {
        let mode = self.config.mode;
        self.node(id)?;
        for &element in elements {
            self.check_attach(id, element, mode)?;
        }
        for &element in elements {
            self.warn_if_moved(id, element);
            self.attach(id, element);
        }
        debug!(parent = ?id, added = elements.len(), "added children");
        Ok(())
    }

    /// Remove the first direct child matching `which` and return it, detached.
    pub fn remove<'a>(&mut self, id: ElementId, which: impl Into<ChildRef<'a>>) -> Option<ElementId> {
        let which = which.into();
        let node = self.nodes.get(id)?;
        let index = node.children.iter().position(|&child| match which {
            ChildRef::Element(target) => child == target,
            ChildRef::Name(name) => self.name(child) == Some(name),
        })?;

        let child = self.nodes.get_mut(id)?.children.remove(index);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        debug!(parent = ?id, ?child, "removed child");
        Some(child)
    }

    /// Dotted names of `id` and its named ancestors. Unnamed ancestors are
    /// skipped; an unnamed node has the empty path.
    pub fn path(&self, id: ElementId) -> String {
        self.join_path(id, |_| true)
    }

    pub(crate) fn join_path(&self, id: ElementId, include_ancestor: impl Fn(&Node) -> bool) -> String {
        let Some(node) = self.nodes.get(id) else {
            return String::new();
        };
        let Some(name) = node.name() else {
            return String::new();
        };

        let mut parts = vec![name];
        let mut current = node.parent;
        while let Some(ancestor) = current.and_then(|a| self.nodes.get(a)) {
            if include_ancestor(ancestor) {
                if let Some(name) = ancestor.name() {
                    parts.push(name);
                }
            }
            current = ancestor.parent;
        }
        parts.reverse();
        parts.join(".")
    }

    /// Resolve a dotted path below `id`.
    ///
    /// Among siblings sharing a name the last one wins. When no direct child
    /// matches the first segment, unnamed children with children of their own
    /// are searched for the whole path, in order. An empty path resolves to
    /// `None`.
    pub fn find(&self, id: ElementId, path: impl Into<KeyPath>) -> Option<ElementId> {
        let path = path.into();
        let (first, rest) = path.split_first()?;
        self.resolve(id, first, rest, false)
    }

    /// Like [`find`](Self::find), but only fields match a segment.
    pub fn find_field(&self, id: ElementId, path: impl Into<KeyPath>) -> Option<ElementId> {
        let path = path.into();
        let (first, rest) = path.split_first()?;
        self.resolve(id, first, rest, true)
    }

    fn resolve(
        &self,
        id: ElementId,
        first: &str,
        rest: &[String],
        fields_only: bool,
    ) -> Option<ElementId> {
        let node = self.nodes.get(id)?;

        let found = node
            .children
            .iter()
            .copied()
            .filter(|&child| {
                self.nodes
                    .get(child)
                    .is_some_and(|c| c.name() == Some(first) && (!fields_only || c.is_field()))
            })
            .last();

        if let Some(found) = found {
            trace!(segment = first, ?found, "path segment matched");
            return match rest.split_first() {
                None => Some(found),
                Some((next, rest)) => self.resolve(found, next, rest, fields_only),
            };
        }

        node.children
            .iter()
            .copied()
            .filter(|&child| {
                self.nodes
                    .get(child)
                    .is_some_and(|c| c.name().is_none() && !c.children.is_empty())
            })
            .find_map(|child| self.resolve(child, first, rest, fields_only))
    }

    /// Pre-order walk below `id`, excluding `id` itself.
    pub fn descendants(&self, id: ElementId) -> Descendants<'_> {
        let mut stack: Vec<ElementId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    pub fn prototype(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id)?.prototype
    }

    /// Install (or clear) the template cloned for array children.
    ///
    /// The prototype becomes a side node owned by `id`. A prototype that is
    /// attached elsewhere is rejected in strict mode and detached otherwise.
    /// A replaced prototype is released as a detached root.
    pub fn set_prototype(&mut self, id: ElementId, prototype: Option<ElementId>) -> Result<()> {
        let previous = self.node(id)?.prototype;
        if let Some(proto) = prototype {
            let node = self.node(proto)?;
            if self.encloses(proto, id) {
                return Err(FormError::Cycle {
                    child: proto,
                    parent: id,
                });
            }
            let holder = node.parent.or(node.owner.filter(|&o| o != id));
            if let Some(holder) = holder {
                if self.config.mode.is_strict() {
                    return Err(FormError::AlreadyAttached {
                        child: proto,
                        parent: holder,
                    });
                }
                warn!(prototype = ?proto, ?holder, "detaching prototype from previous holder");
            }
        }

        if let Some(previous) = previous.filter(|&p| Some(p) != prototype) {
            self.detach(previous);
        }
        if let Some(proto) = prototype {
            self.detach(proto);
            self.node_mut(proto)?.owner = Some(id);
        }
        self.node_mut(id)?.prototype = prototype;
        Ok(())
    }

    pub fn widget(&self, id: ElementId) -> Option<&dyn Widget> {
        self.nodes.get(id)?.widget()
    }

    pub fn widget_mut(&mut self, id: ElementId) -> Option<&mut dyn Widget> {
        self.nodes.get_mut(id)?.widget.as_deref_mut()
    }

    pub fn set_widget<W: Widget>(&mut self, id: ElementId, widget: W) -> Result<()> {
        self.node_mut(id)?.widget = Some(Box::new(widget));
        Ok(())
    }

    pub fn take_widget(&mut self, id: ElementId) -> Option<Box<dyn Widget>> {
        self.nodes.get_mut(id)?.widget.take()
    }

    /// Structural duplicate of `id` and everything below it.
    ///
    /// Names, widgets, prototypes, frames and children are cloned; fields
    /// re-run their value assignment on the copy. The copy is a detached root.
    pub fn clone_subtree(&mut self, id: ElementId) -> Result<ElementId> {
        let copy = self.clone_node(id)?;
        debug!(source = ?id, ?copy, "cloned subtree");
        Ok(copy)
    }

    fn clone_node(&mut self, source: ElementId) -> Result<ElementId> {
        let node = self.node(source)?;
        let mut kind = node.kind.clone();
        if let NodeKind::Form(form) = &mut kind {
            form.frame = None;
        }
        let mut copy = Node::new(node.name.clone(), kind);
        copy.widget = node.widget.clone();

        let target = self.insert(copy);
        if let Err(err) = self.fill_clone(source, target) {
            self.dispose_subtree(target);
            return Err(err);
        }
        Ok(target)
    }

    fn fill_clone(&mut self, source: ElementId, target: ElementId) -> Result<()> {
        let node = self.node(source)?;
        let prototype = node.prototype;
        let children = node.children.clone();
        let value = node.kind.field().map(|field| field.value.clone());
        let frame = match &node.kind {
            NodeKind::Form(form) => form.frame,
            _ => None,
        };

        if let Some(prototype) = prototype {
            let copy = self.clone_node(prototype)?;
            self.node_mut(copy)?.owner = Some(target);
            self.node_mut(target)?.prototype = Some(copy);
        }
        if let Some(frame) = frame {
            let copy = self.clone_node(frame)?;
            self.node_mut(copy)?.owner = Some(target);
            if let NodeKind::Form(form) = &mut self.node_mut(target)?.kind {
                form.frame = Some(copy);
            }
        }
        for child in children {
            let copy = self.clone_node(child)?;
            self.attach(target, copy);
        }
        // Replays a value that was already accepted, whatever the current mode.
        if let Some(value) = value {
            self.apply_value(target, value, Mode::Lenient)?;
        }
        Ok(())
    }

    /// Detach `id` and free it together with its children, prototype and frame.
    pub fn dispose(&mut self, id: ElementId) -> Result<()> {
        self.node(id)?;
        self.dispose_subtree(id);
        debug!(element = ?id, "disposed subtree");
        Ok(())
    }

    pub(crate) fn dispose_subtree(&mut self, id: ElementId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                stack.extend(node.prototype);
                if let NodeKind::Form(form) = node.kind {
                    stack.extend(form.frame);
                }
            }
        }
    }
}

pub struct Descendants<'a> {
    tree: &'a FormTree,
    stack: Vec<ElementId>,
}

impl Iterator for Descendants<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(next).iter().rev().copied());
        Some(next)
    }
}
