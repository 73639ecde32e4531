//! Label class data model.

use serde::{Deserialize, Serialize};

use crate::constants::{SKIP_LABEL, UNLABELED_SENTINEL};

/// Where a label class came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassOrigin {
    /// Supplied by the configuration; never removable
    Builtin,
    /// Added during the session; removable
    UserCreated,
}

/// A label category with a name and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelClass {
    /// Display name, unique within the session
    pub name: String,
    /// RGB color of the class
    pub color: [u8; 3],
    /// Whether the class is built-in or user-created
    pub origin: ClassOrigin,
}

impl LabelClass {
    /// Create a new label class.
    pub fn new(name: &str, color: [u8; 3], origin: ClassOrigin) -> Self {
        Self {
            name: name.to_string(),
            color,
            origin,
        }
    }

    /// Check if the class may be removed by the user.
    pub fn is_removable(&self) -> bool {
        self.origin == ClassOrigin::UserCreated
    }
}

/// Why a class name was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClassRejection {
    /// The name is empty
    #[error("the name is empty")]
    Empty,
    /// The name is the unlabeled sentinel or the skip label
    #[error("the name is reserved")]
    Reserved,
    /// A class with this name already exists
    #[error("a class with this name already exists")]
    Duplicate,
}

/// Check the name rules that do not depend on existing classes.
pub fn check_class_name(name: &str) -> Result<(), ClassRejection> {
    if name.is_empty() {
        Err(ClassRejection::Empty)
    } else if name == UNLABELED_SENTINEL || name == SKIP_LABEL {
        Err(ClassRejection::Reserved)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names() {
        assert_eq!(check_class_name(""), Err(ClassRejection::Empty));
        assert_eq!(check_class_name("?"), Err(ClassRejection::Reserved));
        assert_eq!(check_class_name("Skip"), Err(ClassRejection::Reserved));
        assert_eq!(check_class_name("skip"), Ok(()));
        assert_eq!(check_class_name("Cat"), Ok(()));
    }

    #[test]
    fn test_removable() {
        assert!(!LabelClass::new("Cat", [0, 0, 0], ClassOrigin::Builtin).is_removable());
        assert!(LabelClass::new("Dog", [0, 0, 0], ClassOrigin::UserCreated).is_removable());
    }
}
