//! Node records stored in the [`FormTree`](crate::FormTree) arena.

use crate::field::FieldData;
use crate::widget::Widget;
use slotmap::new_key_type;
use strum::IntoStaticStr;

new_key_type! {
    /// Stable handle of a node inside a [`FormTree`](crate::FormTree).
    pub struct ElementId;
}

/// What a node is, beyond its tree linkage.
#[derive(Debug, Clone, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// Generic grouping container.
    Element,
    Field(FieldData),
    Form(FormData),
    Frame(FrameData),
    Button(ButtonData),
}

impl NodeKind {
    pub fn is_field(&self) -> bool {
        matches!(self, NodeKind::Field(_) | NodeKind::Form(_))
    }

    pub fn field(&self) -> Option<&FieldData> {
        match self {
            NodeKind::Field(data) => Some(data),
            NodeKind::Form(form) => Some(&form.field),
            _ => None,
        }
    }

    pub fn field_mut(&mut self) -> Option<&mut FieldData> {
        match self {
            NodeKind::Field(data) => Some(data),
            NodeKind::Form(form) => Some(&mut form.field),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.into()
    }
}

/// A form is an object field that also owns a lazily created frame node.
#[derive(Debug, Clone)]
pub struct FormData {
    pub field: FieldData,
    pub frame: Option<ElementId>,
}

#[derive(Debug, Clone, Default)]
pub struct FrameData {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ButtonData {
    pub label: String,
}

#[derive(Debug)]
pub struct Node {
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) prototype: Option<ElementId>,
    pub(crate) widget: Option<Box<dyn Widget>>,
    pub(crate) kind: NodeKind,
    /// Holder of this node when it is a prototype or a form frame.
    pub(crate) owner: Option<ElementId>,
}

impl Node {
    pub(crate) fn new(name: Option<String>, kind: NodeKind) -> Self {
        Self {
            name: normalize_name(name),
            parent: None,
            children: Vec::new(),
            prototype: None,
            widget: None,
            kind,
            owner: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn prototype(&self) -> Option<ElementId> {
        self.prototype
    }

    pub fn widget(&self) -> Option<&dyn Widget> {
        self.widget.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_field(&self) -> bool {
        self.kind.is_field()
    }
}

/// Empty names are treated as absent so anonymous nodes have one representation.
pub(crate) fn normalize_name(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.is_empty())
}
