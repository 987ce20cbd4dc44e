use crate::handle::Handle;
use crate::types::NodeKind;

/// Contract violations reported by the widget library
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("null handle where an object is required")]
    NullHandle,

    #[error("handle {0} does not refer to a live object")]
    StaleHandle(Handle),

    #[error("handle {handle} is a {found}, expected a {expected}")]
    WrongKind {
        handle: Handle,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("cannot move {obj} under {parent}")]
    InvalidParent { obj: Handle, parent: Handle },

    #[error("{0} is not a screen")]
    NotAScreen(Handle),

    #[error("the active screen {0} cannot be deleted")]
    ActiveScreen(Handle),
}
