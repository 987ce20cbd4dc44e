//! Native widget object model
//!
//! This crate describes the capability surface the Lua bindings drive: object,
//! style, button and dropdown-list primitives with their getters and setters.
//! `SimWidgets` is an in-memory implementation used by the `lvlua` runner and
//! by tests; a hardware backend would implement `WidgetLib` the same way.

pub mod error;
pub mod handle;
pub mod library;
pub mod sim;
pub mod types;

pub use error::WidgetError;
pub use handle::Handle;
pub use library::WidgetLib;
pub use sim::{ObjAnim, SimWidgets};
pub use types::{
    saturate_coord,
    Align, AnimKind, BtnAction, BtnState, BtnStyle, BuiltinStyle, Constants, Coord, DdlistStyle,
    Layout, NodeKind, ObjFlag, Protect, SbMode, StyleAnim, StyleProp,
};
