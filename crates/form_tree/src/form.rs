//! Top-level framing: forms, their frame, and buttons.
//!
//! A form is an `object` field whose frame (title plus ordered buttons) is a
//! side node created the first time it is touched. Buttons are ordinary
//! elements living under the frame.

use crate::element::{ButtonData, ElementId, FormData, FrameData, Node, NodeKind};
use crate::errors::{FormError, Result};
use crate::field::{FieldConfig, FieldData, FieldType};
use crate::tree::FormTree;
use tracing::debug;

impl FormTree {
    /// Create a detached form of type `object`.
    pub fn new_form(&mut self, name: Option<&str>) -> ElementId {
        let field = FieldData::new(FieldType::Object, Vec::new());
        self.insert(Node::new(
            name.map(str::to_string),
            NodeKind::Form(FormData { field, frame: None }),
        ))
    }

    /// Create a form from a full field configuration (the type may differ from `object`).
    pub fn new_form_with(&mut self, config: FieldConfig) -> Result<ElementId> {
        let FieldConfig {
            field_type,
            name,
            options,
            prototype,
        } = config;
        let field = FieldData::new(field_type, options);
        let id = self.insert(Node::new(
            name,
            NodeKind::Form(FormData { field, frame: None }),
        ));
        self.install_prototype(id, prototype)?;
        Ok(id)
    }

    pub fn is_form(&self, id: ElementId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Form(_)))
    }

    fn form_data(&self, id: ElementId) -> Result<&FormData> {
        match &self.node(id)?.kind {
            NodeKind::Form(form) => Ok(form),
            _ => Err(FormError::NotAForm(id)),
        }
    }

    /// The frame if it has been created already.
    pub fn existing_frame(&self, form: ElementId) -> Option<ElementId> {
        self.form_data(form).ok()?.frame
    }

    /// The form's frame, created on first access.
    pub fn frame(&mut self, form: ElementId) -> Result<ElementId> {
        if let Some(frame) = self.form_data(form)?.frame {
            return Ok(frame);
        }

        let mut node = Node::new(None, NodeKind::Frame(FrameData::default()));
        node.owner = Some(form);
        let frame = self.insert(node);
        if let NodeKind::Form(data) = &mut self.node_mut(form)?.kind {
            data.frame = Some(frame);
        }
        debug!(?form, ?frame, "materialized form frame");
        Ok(frame)
    }

    pub fn title(&mut self, form: ElementId) -> Result<Option<&str>> {
        let frame = self.frame(form)?;
        match &self.node(frame)?.kind {
            NodeKind::Frame(data) => Ok(data.title.as_deref()),
            _ => Ok(None),
        }
    }

    pub fn set_title(&mut self, form: ElementId, title: Option<&str>) -> Result<()> {
        let frame = self.frame(form)?;
        if let NodeKind::Frame(data) = &mut self.node_mut(frame)?.kind {
            data.title = title.map(str::to_string);
        }
        Ok(())
    }

    pub fn buttons(&mut self, form: ElementId) -> Result<&[ElementId]> {
        let frame = self.frame(form)?;
        Ok(self.children(frame))
    }

    /// Append buttons to the form's frame. Every id must be a button.
    pub fn add_buttons(&mut self, form: ElementId, buttons: &[ElementId]) -> Result<()> {
        self.form_data(form)?;
        for &button in buttons {
            if !matches!(self.node(button)?.kind, NodeKind::Button(_)) {
                return Err(FormError::NotAButton(button));
            }
        }
        let frame = self.frame(form)?;
        self.add(frame, buttons)
    }

    pub fn new_button(&mut self, name: Option<&str>, label: &str) -> ElementId {
        self.insert(Node::new(
            name.map(str::to_string),
            NodeKind::Button(ButtonData {
                label: label.to_string(),
            }),
        ))
    }

    pub fn button_label(&self, id: ElementId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Button(data) => Some(&data.label),
            _ => None,
        }
    }

    pub fn set_button_label(&mut self, id: ElementId, label: &str) -> Result<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Button(data) => {
                data.label = label.to_string();
                Ok(())
            }
            _ => Err(FormError::NotAButton(id)),
        }
    }
}
