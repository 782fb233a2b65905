use crate::element::ElementId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown element: {0:?}")]
    UnknownElement(ElementId),

    #[error("element {child:?} is already attached to {parent:?}")]
    AlreadyAttached {
        child: ElementId,
        parent: ElementId,
    },

    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        child: ElementId,
        parent: ElementId,
    },

    #[error("prototype missing for array field '{0}'")]
    MissingPrototype(String),

    #[error("field '{path}' of type {expected} cannot hold a {found} value")]
    ShapeMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },

    #[error("element {0:?} is not a field")]
    NotAField(ElementId),

    #[error("element {0:?} is not a form")]
    NotAForm(ElementId),

    #[error("element {0:?} is not a button")]
    NotAButton(ElementId),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T, E = FormError> = std::result::Result<T, E>;
