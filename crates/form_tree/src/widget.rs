//! Opaque rendering capability attached to an element.
//!
//! The tree never inspects a widget; it only carries it along and duplicates
//! it when the owning element is cloned.

use std::any::Any;
use std::fmt;

/// A clonable attachment point for a rendering layer.
///
/// Implemented automatically for every `Clone + Debug + 'static` type, so a
/// renderer can attach its own state without touching this crate.
pub trait Widget: Any + fmt::Debug + 'static {
    /// Snapshot the widget into a new, independent box.
    fn clone_widget(&self) -> Box<dyn Widget>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> Widget for T
where
    T: Clone + fmt::Debug + 'static,
{
    fn clone_widget(&self) -> Box<dyn Widget> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn Widget> {
    fn clone(&self) -> Self {
        (**self).clone_widget()
    }
}

impl dyn Widget {
    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct TextInput {
        placeholder: String,
    }

    #[test]
    fn boxed_widget_clone_is_independent() {
        let original: Box<dyn Widget> = Box::new(TextInput {
            placeholder: "name".into(),
        });
        let mut copy = original.clone();
        copy.downcast_mut::<TextInput>().unwrap().placeholder = "changed".into();

        assert_eq!(
            original.downcast_ref::<TextInput>().unwrap().placeholder,
            "name"
        );
        assert_eq!(
            copy.downcast_ref::<TextInput>().unwrap().placeholder,
            "changed"
        );
    }

    #[test]
    fn downcast_to_wrong_type_is_none() {
        let widget: Box<dyn Widget> = Box::new(TextInput {
            placeholder: String::new(),
        });
        assert!(widget.downcast_ref::<u32>().is_none());
    }
}
