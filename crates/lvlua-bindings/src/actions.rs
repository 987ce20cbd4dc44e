//! Calling script callbacks stored on buttons and dropdown lists
//!
//! Widgets store the *name* of a global Lua function. A host event loop
//! calls these when the native library reports an interaction.

use lvlua_widgets::{BtnAction, Handle};
use mlua::{Lua, Value};
use tracing::{debug, warn};

use crate::error::Result;
use crate::library::with_lib;
use crate::table::handle_to_value;

/// Run the `action` callback of `btn`; returns whether a callback ran
pub fn fire_btn_action(lua: &Lua, btn: Handle, action: BtnAction) -> Result<bool> {
    let name = with_lib(lua, |lib| lib.btn_action(btn, action))?;
    call_named(lua, name, btn)
}

/// Run the selection callback of `ddlist`
pub fn fire_ddlist_action(lua: &Lua, ddlist: Handle) -> Result<bool> {
    let name = with_lib(lua, |lib| lib.ddlist_action(ddlist))?;
    call_named(lua, name, ddlist)
}

fn call_named(lua: &Lua, name: Option<String>, handle: Handle) -> Result<bool> {
    let Some(name) = name else {
        return Ok(false);
    };
    match lua.globals().get::<Value>(name.as_str())? {
        Value::Function(callback) => {
            debug!(target: "bindings", "Calling {} for {}", name, handle);
            callback.call::<()>(handle_to_value(handle))?;
            Ok(true)
        }
        Value::Nil => {
            warn!(target: "bindings", "Callback {} for {} is not defined", name, handle);
            Ok(false)
        }
        other => {
            warn!(
                target: "bindings",
                "Callback {} for {} is a {}, not a function",
                name,
                handle,
                other.type_name()
            );
            Ok(false)
        }
    }
}
