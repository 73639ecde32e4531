//! Ordered registry of label classes and the button/dropdown layout.

use serde::{Deserialize, Serialize};

use crate::constants::{DROPDOWN_ACTION_LABEL, SKIP_LABEL};
use crate::error::EngineError;
use crate::model::{ClassOrigin, ClassRejection, LabelClass, check_class_name};

/// Label classes in insertion order, built-ins first.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: Vec<LabelClass>,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `name` could be added.
    pub fn check_new(&self, name: &str) -> Result<(), ClassRejection> {
        check_class_name(name)?;
        if self.contains(name) {
            return Err(ClassRejection::Duplicate);
        }
        Ok(())
    }

    /// Append a class.
    ///
    /// Built-ins must be added before any user-created class to keep the
    /// built-ins-first order.
    pub fn add(
        &mut self,
        name: &str,
        color: [u8; 3],
        origin: ClassOrigin,
    ) -> Result<&LabelClass, ClassRejection> {
        self.check_new(name)?;
        debug_assert!(
            origin == ClassOrigin::UserCreated || self.classes.iter().all(|c| !c.is_removable()),
            "built-in classes must precede user-created ones"
        );
        self.classes.push(LabelClass::new(name, color, origin));
        Ok(&self.classes[self.classes.len() - 1])
    }

    /// Remove user-created classes.
    ///
    /// All-or-nothing: a built-in or unknown name rejects the whole call.
    pub fn remove(&mut self, names: &[&str]) -> Result<Vec<LabelClass>, EngineError> {
        for name in names {
            match self.get(name) {
                None => return Err(EngineError::unknown_class(*name)),
                Some(class) if !class.is_removable() => {
                    return Err(EngineError::builtin_class(*name));
                }
                Some(_) => {}
            }
        }
        let (removed, kept): (Vec<LabelClass>, Vec<LabelClass>) = std::mem::take(&mut self.classes)
            .into_iter()
            .partition(|class| names.contains(&class.name.as_str()));
        self.classes = kept;
        Ok(removed)
    }

    /// Get a class by name.
    pub fn get(&self, name: &str) -> Option<&LabelClass> {
        self.classes.iter().find(|class| class.name == name)
    }

    /// Position of a class in the registry.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.classes.iter().position(|class| class.name == name)
    }

    /// Check if a class with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Check if a stored label counts as a real label for progress.
    pub fn recognizes(&self, label: &str) -> bool {
        label == SKIP_LABEL || self.contains(label)
    }

    /// All classes in order.
    pub fn iter(&self) -> impl Iterator<Item = &LabelClass> {
        self.classes.iter()
    }

    /// All class names in order.
    pub fn names(&self) -> Vec<String> {
        self.classes.iter().map(|class| class.name.clone()).collect()
    }

    /// Get the number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if there are no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Split the classes into buttons and a dropdown.
    pub fn layout(&self, button_limit: usize) -> ClassLayout {
        let names = self.names();
        if names.len() <= button_limit {
            return ClassLayout {
                buttons: names,
                dropdown: Vec::new(),
            };
        }
        let mut buttons = names;
        let dropdown = buttons.split_off(button_limit);
        ClassLayout { buttons, dropdown }
    }
}

/// How the class selector is presented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLayout {
    /// Classes rendered as individual buttons
    pub buttons: Vec<String>,
    /// Classes collapsed into the dropdown, picked with one shared button
    pub dropdown: Vec<String>,
}

impl ClassLayout {
    /// Check if the dropdown is shown.
    pub fn uses_dropdown(&self) -> bool {
        !self.dropdown.is_empty()
    }

    /// Caption of the button that applies the dropdown choice.
    pub fn dropdown_action(&self) -> Option<&'static str> {
        self.uses_dropdown().then_some(DROPDOWN_ACTION_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(builtins: &[&str], user: &[&str]) -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        for name in builtins {
            registry.add(name, [0, 0, 0], ClassOrigin::Builtin).unwrap();
        }
        for name in user {
            registry.add(name, [0, 0, 0], ClassOrigin::UserCreated).unwrap();
        }
        registry
    }

    #[test]
    fn test_add_rejections() {
        let mut registry = registry(&["Cat"], &[]);
        assert_eq!(
            registry.add("", [0, 0, 0], ClassOrigin::UserCreated).unwrap_err(),
            ClassRejection::Empty
        );
        assert_eq!(
            registry.add("?", [0, 0, 0], ClassOrigin::UserCreated).unwrap_err(),
            ClassRejection::Reserved
        );
        assert_eq!(
            registry.add("Cat", [0, 0, 0], ClassOrigin::UserCreated).unwrap_err(),
            ClassRejection::Duplicate
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_all_or_nothing() {
        let mut registry = registry(&["Cat"], &["Dog", "Bird"]);
        let err = registry.remove(&["Dog", "Cat"]).unwrap_err();
        assert_eq!(err, EngineError::builtin_class("Cat"));
        assert_eq!(registry.len(), 3);

        let err = registry.remove(&["Dog", "Fish"]).unwrap_err();
        assert_eq!(err, EngineError::unknown_class("Fish"));
        assert_eq!(registry.len(), 3);

        let removed = registry.remove(&["Dog"]).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(registry.names(), vec!["Cat".to_string(), "Bird".to_string()]);
    }

    #[test]
    fn test_layout_threshold() {
        let seven = registry(&["a", "b", "c", "d"], &["e", "f", "g"]);
        let layout = seven.layout(7);
        assert_eq!(layout.buttons.len(), 7);
        assert!(!layout.uses_dropdown());

        let nine = registry(&["a", "b", "c", "d"], &["e", "f", "g", "h", "i"]);
        let layout = nine.layout(7);
        assert_eq!(layout.buttons.len(), 7);
        assert_eq!(layout.dropdown, vec!["h".to_string(), "i".to_string()]);
        assert_eq!(layout.dropdown_action(), Some("Label"));
    }

    #[test]
    fn test_recognizes_skip() {
        let registry = registry(&["Cat"], &[]);
        assert!(registry.recognizes("Skip"));
        assert!(registry.recognizes("Cat"));
        assert!(!registry.recognizes("Dog"));
    }
}
