//! Lua bindings for the lvlua widget model
//!
//! Scripts configure native objects by passing tables of named fields:
//!
//! ```lua
//! local btn = lv_btn_set(nil, { width = 120, toggle = 1, action_click = "on_click" })
//! local w, h = lv_btn_get(btn, { "width", "height" })
//! ```
//!
//! `install` attaches a widget library to a Lua state and registers every
//! family's functions, constants and built-in pointers as globals.

use mlua::Lua;
use tracing::info;

pub mod actions;
pub mod context;
pub mod error;
pub mod families;
pub mod field;
pub mod library;
pub mod registrar;
pub mod table;

pub use actions::{fire_btn_action, fire_ddlist_action};
pub use context::{clear_context, is_initialized, set_context, with_context};
pub use error::{BindingError, Result};
pub use library::SharedLibrary;
pub use registrar::{Registered, Registrar, Symbol, SymbolKind};

/// Register all families into `lua`
///
/// The widget library must already be attached, since built-in style
/// pointers are read from it.
pub fn register(lua: &Lua) -> Result<Registered> {
    let mut reg = Registrar::new(lua);
    families::register_all(&mut reg)?;
    let registered = reg.finish();
    info!(
        target: "bindings",
        "Registered {} functions, {} constants and {} pointers",
        registered.count(SymbolKind::Function),
        registered.count(SymbolKind::Constant),
        registered.count(SymbolKind::Pointer)
    );
    Ok(registered)
}

/// Attach `library` to `lua` and register all families
pub fn install(lua: &Lua, library: SharedLibrary) -> Result<Registered> {
    library::set_library(lua, library);
    register(lua)
}

/// `register` against the runtime in the context holder
pub fn register_current() -> Result<Registered> {
    with_context(register)
}
