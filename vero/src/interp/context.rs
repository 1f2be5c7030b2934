//! Execution contexts and the frames that attribute values and errors

use super::env::EnvRef;
use crate::ast::Span;
use std::rc::Rc;

/// Display name of the top-level context
pub const PROGRAM_CONTEXT: &str = "<program>";

/// Immutable attribution record for tracebacks
///
/// A frame holds no symbol table, so values stamped with it never keep a
/// scope alive.
#[derive(Debug)]
pub struct Frame {
    pub display_name: String,
    pub parent: Option<Rc<Frame>>,
    /// Call site that entered this frame (`None` for the top level)
    pub entry: Option<Span>,
}

impl Frame {
    /// The top-level frame
    pub fn root() -> Rc<Frame> {
        Rc::new(Frame {
            display_name: PROGRAM_CONTEXT.to_string(),
            parent: None,
            entry: None,
        })
    }

    /// Frame entered from `parent` at `entry`
    pub fn child(display_name: impl Into<String>, parent: &Rc<Frame>, entry: Span) -> Rc<Frame> {
        Rc::new(Frame {
            display_name: display_name.into(),
            parent: Some(Rc::clone(parent)),
            entry: Some(entry),
        })
    }

    /// Frames from this one outwards, innermost first
    pub fn ancestors(self: &Rc<Self>) -> impl Iterator<Item = &Frame> {
        std::iter::successors(Some(self.as_ref()), |frame| frame.parent.as_deref())
    }
}

/// Where an evaluation happens: the frame used for attribution and the
/// scope used for lookup
#[derive(Debug, Clone)]
pub struct Context {
    pub frame: Rc<Frame>,
    pub env: EnvRef,
}

impl Context {
    pub fn new(frame: Rc<Frame>, env: EnvRef) -> Self {
        Self { frame, env }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_frame() {
        let root = Frame::root();
        assert_eq!(root.display_name, "<program>");
        assert!(root.parent.is_none());
        assert_eq!(root.ancestors().count(), 1);
    }

    #[test]
    fn test_child_chain() {
        let root = Frame::root();
        let f = Frame::child("f", &root, Span::default());
        let g = Frame::child("g", &f, Span::default());
        let names: Vec<_> = g.ancestors().map(|fr| fr.display_name.as_str()).collect();
        assert_eq!(names, vec!["g", "f", "<program>"]);
        assert_eq!(g.entry, Some(Span::default()));
    }
}
