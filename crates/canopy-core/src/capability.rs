#![forbid(unsafe_code)]

//! Per-payload capabilities.
//!
//! A [`Tree`](crate::Tree) is generic over its node payload `T`. What a node
//! can *do* (how it is labelled, whether it accepts a drop, whether it may be
//! deleted) is expressed as traits on `T`, so every call is resolved
//! statically for the payload type instead of inspecting node kinds at
//! runtime.

use std::borrow::Cow;

/// Payloads that can be shown as a row of text.
///
/// The display text feeds type-ahead search and natural sorting.
///
/// # Example
///
/// ```
/// use canopy_core::Displayable;
///
/// struct Entry { name: String, hidden: bool }
///
/// impl Displayable for Entry {
///     fn display_text(&self) -> std::borrow::Cow<'_, str> {
///         self.name.as_str().into()
///     }
///     fn can_delete(&self) -> bool {
///         !self.hidden
///     }
/// }
///
/// let e = Entry { name: "Cargo.toml".into(), hidden: false };
/// assert_eq!(e.display_text(), "Cargo.toml");
/// ```
pub trait Displayable {
    /// Text shown for this node.
    fn display_text(&self) -> Cow<'_, str>;

    /// Whether "expand all" may descend into this node.
    ///
    /// Nodes with very large or expensive lazy subtrees return `false`.
    fn can_expand_recursively(&self) -> bool {
        true
    }

    /// Whether the node may be removed by a delete command.
    fn can_delete(&self) -> bool {
        true
    }
}

impl Displayable for String {
    fn display_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl Displayable for &str {
    fn display_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<T: Displayable + ?Sized> Displayable for Box<T> {
    fn display_text(&self) -> Cow<'_, str> {
        (**self).display_text()
    }

    fn can_expand_recursively(&self) -> bool {
        (**self).can_expand_recursively()
    }

    fn can_delete(&self) -> bool {
        (**self).can_delete()
    }
}

/// Payloads that can own dropped items.
///
/// `P` is whatever the host drags around: node handles, file paths, raw
/// bytes. The resolver asks the *owning* node, the one whose children
/// would change, whether a drop of `payload` at child `index` is allowed.
pub trait Droppable<P: ?Sized> {
    /// Whether `payload` may be inserted as child number `index`.
    ///
    /// Called on every pointer move during a drag, so keep it cheap.
    fn can_drop(&self, index: usize, payload: &P) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Folder;

    impl Droppable<str> for Folder {
        fn can_drop(&self, index: usize, payload: &str) -> bool {
            index < 2 && payload.ends_with(".rs")
        }
    }

    #[test]
    fn string_payloads_display_themselves() {
        assert_eq!(String::from("main.rs").display_text(), "main.rs");
        assert_eq!("lib.rs".display_text(), "lib.rs");
        assert_eq!(Box::new(String::from("x")).display_text(), "x");
    }

    #[test]
    fn default_capabilities_are_permissive() {
        let s = String::from("node");
        assert!(s.can_expand_recursively());
        assert!(s.can_delete());
    }

    #[test]
    fn droppable_sees_index_and_payload() {
        assert!(Folder.can_drop(0, "a.rs"));
        assert!(!Folder.can_drop(2, "a.rs"));
        assert!(!Folder.can_drop(0, "a.txt"));
    }
}
