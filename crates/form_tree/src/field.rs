//! Typed fields and the value assignment protocol.
//!
//! Assigning a value to a composite field has structural side effects:
//! - `object` fields push each entry into the direct sub-field of that name
//! - `array` fields rebuild their children from the prototype, one clone per item
//!
//! Every other combination stores the value verbatim. In strict mode the
//! whole assignment is validated before anything is touched.

use crate::choice::FieldOption;
use crate::config::Mode;
use crate::element::{ElementId, Node, NodeKind};
use crate::errors::{FormError, Result};
use crate::tree::FormTree;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Type tag of a field. Unknown tags are kept as [`FieldType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Array,
    Boolean,
    Date,
    Number,
    Object,
    String,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Array => "array",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Object => "object",
            FieldType::String => "string",
            FieldType::Other(tag) => tag,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, FieldType::Array | FieldType::Object)
    }

    fn known(tag: &str) -> Option<Self> {
        Some(match tag {
            "array" => FieldType::Array,
            "boolean" => FieldType::Boolean,
            "date" => FieldType::Date,
            "number" => FieldType::Number,
            "object" => FieldType::Object,
            "string" => FieldType::String,
            _ => return None,
        })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldType::from(s))
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        FieldType::known(value).unwrap_or_else(|| FieldType::Other(value.to_string()))
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        FieldType::known(&value).unwrap_or(FieldType::Other(value))
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// Everything needed to create a field.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub field_type: FieldType,
    pub name: Option<String>,
    pub options: Vec<FieldOption>,
    /// Detached template cloned for each item of an array value.
    pub prototype: Option<ElementId>,
}

impl FieldConfig {
    pub fn new(field_type: impl Into<FieldType>) -> Self {
        Self {
            field_type: field_type.into(),
            name: None,
            options: Vec::new(),
            prototype: None,
        }
    }

    pub fn named(field_type: impl Into<FieldType>, name: impl Into<String>) -> Self {
        Self::new(field_type).name(name)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    pub fn prototype(mut self, prototype: ElementId) -> Self {
        self.prototype = Some(prototype);
        self
    }
}

/// Per-field payload stored on the node.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    pub field_type: FieldType,
    pub value: Value,
    pub options: Vec<FieldOption>,
}

impl FieldData {
    pub fn new(field_type: FieldType, options: Vec<FieldOption>) -> Self {
        Self {
            field_type,
            value: Value::Null,
            options,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl FormTree {
    /// Create a detached field. Fails only when the prototype cannot be installed.
    pub fn new_field(&mut self, config: FieldConfig) -> Result<ElementId> {
        let FieldConfig {
            field_type,
            name,
            options,
            prototype,
        } = config;
        let id = self.insert(Node::new(
            name,
            NodeKind::Field(FieldData::new(field_type, options)),
        ));
        self.install_prototype(id, prototype)?;
        Ok(id)
    }

    pub(crate) fn install_prototype(
        &mut self,
        id: ElementId,
        prototype: Option<ElementId>,
    ) -> Result<()> {
        if prototype.is_none() {
            return Ok(());
        }
        if let Err(err) = self.set_prototype(id, prototype) {
            self.dispose_subtree(id);
            return Err(err);
        }
        Ok(())
    }

    pub fn field(&self, id: ElementId) -> Option<&FieldData> {
        self.get(id)?.kind().field()
    }

    pub fn field_type(&self, id: ElementId) -> Option<&FieldType> {
        self.field(id).map(|field| &field.field_type)
    }

    /// The stored payload, as last assigned.
    pub fn value(&self, id: ElementId) -> Option<&Value> {
        self.field(id).map(|field| &field.value)
    }

    pub fn options(&self, id: ElementId) -> &[FieldOption] {
        self.field(id)
            .map(|field| field.options.as_slice())
            .unwrap_or(&[])
    }

    pub fn options_mut(&mut self, id: ElementId) -> Option<&mut Vec<FieldOption>> {
        self.nodes
            .get_mut(id)?
            .kind
            .field_mut()
            .map(|field| &mut field.options)
    }

    pub fn set_options(&mut self, id: ElementId, options: Vec<FieldOption>) -> Result<()> {
        let field = self
            .node_mut(id)?
            .kind
            .field_mut()
            .ok_or(FormError::NotAField(id))?;
        field.options = options;
        Ok(())
    }

    /// Like [`path`](FormTree::path), but only field ancestors contribute.
    pub fn field_path(&self, id: ElementId) -> String {
        self.join_path(id, Node::is_field)
    }

    /// The nearest field along each branch below `id`, in document order.
    pub fn direct_sub_fields(&self, id: ElementId) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.is_field(current) {
                found.push(current);
            } else {
                stack.extend(self.children(current).iter().rev().copied());
            }
        }
        found
    }

    /// Assign using the tree's configured mode.
    pub fn set_value(&mut self, id: ElementId, value: Value) -> Result<()> {
        let mode = self.config.mode;
        self.set_value_with(id, value, mode)
    }

    pub fn set_value_with(&mut self, id: ElementId, value: Value, mode: Mode) -> Result<()> {
        if mode.is_strict() {
            self.check_value(id, &value)?;
        }
        self.apply_value(id, value, mode)
    }

    /// Dry run of `apply_value` reporting what strict mode rejects.
    fn check_value(&self, id: ElementId, value: &Value) -> Result<()> {
        let field = self
            .node(id)?
            .kind
            .field()
            .ok_or(FormError::NotAField(id))?;

        match (&field.field_type, value) {
            (_, Value::Null) => Ok(()),
            (FieldType::Object, Value::Object(entries)) => {
                for target in self.direct_sub_fields(id) {
                    let Some(entry) = self.name(target).and_then(|name| entries.get(name)) else {
                        continue;
                    };
                    self.check_value(target, entry)?;
                }
                Ok(())
            }
            (FieldType::Array, Value::Array(items)) => {
                let prototype = self
                    .field_prototype(id)
                    .ok_or_else(|| FormError::MissingPrototype(self.path(id)))?;
                items
                    .iter()
                    .try_for_each(|item| self.check_value(prototype, item))
            }
            (expected, found) if expected.is_composite() => Err(FormError::ShapeMismatch {
                path: self.path(id),
                expected: expected.to_string(),
                found: json_kind(found),
            }),
            _ => Ok(()),
        }
    }

    fn field_prototype(&self, id: ElementId) -> Option<ElementId> {
        self.prototype(id).filter(|&proto| self.is_field(proto))
    }

    pub(crate) fn apply_value(&mut self, id: ElementId, value: Value, mode: Mode) -> Result<()> {
        let field_type = self
            .node(id)?
            .kind
            .field()
            .ok_or(FormError::NotAField(id))?
            .field_type
            .clone();

        match (&field_type, &value) {
            (FieldType::Object, Value::Object(entries)) => {
                let assignments: Vec<(ElementId, Value)> = self
                    .direct_sub_fields(id)
                    .into_iter()
                    .filter_map(|target| {
                        let entry = self.name(target).and_then(|name| entries.get(name))?;
                        Some((target, entry.clone()))
                    })
                    .collect();
                debug!(field = ?id, assigned = assignments.len(), "propagating object value");
                for (target, entry) in assignments {
                    self.apply_value(target, entry, mode)?;
                }
            }
            (FieldType::Array, Value::Array(items)) => {
                let prototype = self.field_prototype(id);
                if prototype.is_none() {
                    if mode.is_strict() {
                        return Err(FormError::MissingPrototype(self.path(id)));
                    }
                    warn!(
                        field = ?id,
                        path = %self.path(id),
                        dropped = items.len(),
                        "array field has no field prototype"
                    );
                }
                let built = match prototype {
                    Some(prototype) => self.build_items(prototype, items, mode)?,
                    None => Vec::new(),
                };
                self.clear_children(id)?;
                for copy in built {
                    self.attach(id, copy);
                }
                debug!(field = ?id, items = items.len(), "rebuilt array children");
            }
            (_, Value::Null) => {}
            (expected, found) if expected.is_composite() => {
                if mode.is_strict() {
                    return Err(FormError::ShapeMismatch {
                        path: self.path(id),
                        expected: expected.to_string(),
                        found: json_kind(found),
                    });
                }
                warn!(
                    field = ?id,
                    expected = %expected,
                    found = json_kind(found),
                    "storing mismatched value verbatim"
                );
            }
            _ => {}
        }

        if let Some(field) = self.node_mut(id)?.kind.field_mut() {
            field.value = value;
        }
        Ok(())
    }

    /// One detached prototype copy per item. Nothing is left behind on error.
    fn build_items(
        &mut self,
        prototype: ElementId,
        items: &[Value],
        mode: Mode,
    ) -> Result<Vec<ElementId>> {
        let mut built = Vec::with_capacity(items.len());
        for item in items {
            let result = self.clone_subtree(prototype).and_then(|copy| {
                built.push(copy);
                self.apply_value(copy, item.clone(), mode)
            });
            if let Err(err) = result {
                for copy in built {
                    self.dispose_subtree(copy);
                }
                return Err(err);
            }
        }
        Ok(built)
    }

    /// Drop every child of `id`, freeing them when the config asks for it.
    fn clear_children(&mut self, id: ElementId) -> Result<()> {
        let old = std::mem::take(&mut self.node_mut(id)?.children);
        for child in old {
            if self.config.dispose_replaced_children {
                if let Some(node) = self.nodes.get_mut(child) {
                    node.parent = None;
                }
                self.dispose_subtree(child);
            } else if let Some(node) = self.nodes.get_mut(child) {
                node.parent = None;
            }
        }
        Ok(())
    }

    /// Rebuild a value from the current structure.
    ///
    /// Object fields gather their named direct sub-fields, array fields their
    /// field children; leaves report the stored value. An object field without
    /// sub-fields reports its stored value too.
    pub fn collect_value(&self, id: ElementId) -> Option<Value> {
        let field = self.field(id)?;
        match field.field_type {
            FieldType::Object => {
                let subs = self.direct_sub_fields(id);
                if subs.is_empty() {
                    return Some(field.value.clone());
                }
                let mut map = JsonMap::new();
                for sub in subs {
                    let Some(name) = self.name(sub) else {
                        continue;
                    };
                    if let Some(value) = self.collect_value(sub) {
                        map.insert(name.to_string(), value);
                    }
                }
                Some(Value::Object(map))
            }
            FieldType::Array => Some(Value::Array(
                self.children(id)
                    .iter()
                    .filter_map(|&child| self.collect_value(child))
                    .collect(),
            )),
            _ => Some(field.value.clone()),
        }
    }
}
