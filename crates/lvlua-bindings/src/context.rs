//! Per-thread holder of the active Lua runtime
//!
//! Hosts that keep a single runtime can park it here once at startup and
//! reach it from anywhere on the same thread. Everything in this crate also
//! takes an explicit `&Lua`, so the holder is optional.

use std::cell::RefCell;

use mlua::Lua;
use tracing::debug;

use crate::error::{BindingError, Result};

thread_local! {
    static CONTEXT: RefCell<Option<Lua>> = const { RefCell::new(None) };
}

/// Store `lua` as the active runtime, returning the previous one
///
/// Fails with `ContextBusy` when called from inside `with_context`.
pub fn set_context(lua: Lua) -> Result<Option<Lua>> {
    CONTEXT.with(|slot| {
        let mut slot = slot.try_borrow_mut().map_err(|_| BindingError::ContextBusy)?;
        debug!(target: "bindings", "Setting scripting context");
        Ok(slot.replace(lua))
    })
}

/// Remove the active runtime, for teardown
pub fn clear_context() -> Result<Option<Lua>> {
    CONTEXT.with(|slot| {
        let mut slot = slot.try_borrow_mut().map_err(|_| BindingError::ContextBusy)?;
        Ok(slot.take())
    })
}

/// Whether a runtime is stored
///
/// While the slot is being replaced it counts as initialized.
pub fn is_initialized() -> bool {
    CONTEXT.with(|slot| slot.try_borrow().map(|s| s.is_some()).unwrap_or(true))
}

/// Run `f` against the active runtime
///
/// Nested calls are fine; only replacing the context while it is in use is
/// refused.
pub fn with_context<R>(f: impl FnOnce(&Lua) -> Result<R>) -> Result<R> {
    CONTEXT.with(|slot| {
        let slot = slot.try_borrow().map_err(|_| BindingError::ContextBusy)?;
        let lua = slot.as_ref().ok_or(BindingError::NotInitialized)?;
        f(lua)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_context_is_reported() {
        let _ = clear_context();
        assert!(!is_initialized());
        let result = with_context(|_| Ok(()));
        assert!(matches!(result, Err(BindingError::NotInitialized)));
    }

    #[test]
    fn test_set_and_replace_context() {
        let _ = clear_context();
        assert!(set_context(Lua::new()).unwrap().is_none());
        assert!(is_initialized());

        let answer = with_context(|lua| Ok(lua.load("return 6 * 7").eval::<i64>()?)).unwrap();
        assert_eq!(answer, 42);

        assert!(set_context(Lua::new()).unwrap().is_some());
        assert!(clear_context().unwrap().is_some());
        assert!(!is_initialized());
    }

    #[test]
    fn test_replacing_inside_use_is_refused() {
        let _ = clear_context();
        set_context(Lua::new()).unwrap();
        let nested = with_context(|_| Ok(set_context(Lua::new()).is_err())).unwrap();
        assert!(nested);
        clear_context().unwrap();
    }
}
