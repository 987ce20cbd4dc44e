use std::cell::RefCell;
use std::rc::Rc;

use lvlua_widgets::WidgetLib;
use mlua::Lua;

use crate::error::{BindingError, Result};

/// Widget library shared between the host and a Lua state
pub type SharedLibrary = Rc<RefCell<dyn WidgetLib>>;

struct LibrarySlot(SharedLibrary);

/// Attach `library` to `lua`; replaces any library installed before
pub fn set_library(lua: &Lua, library: SharedLibrary) {
    lua.set_app_data(LibrarySlot(library));
}

pub fn library(lua: &Lua) -> Result<SharedLibrary> {
    lua.app_data_ref::<LibrarySlot>()
        .map(|slot| slot.0.clone())
        .ok_or(BindingError::NoLibrary)
}

/// Borrow the library for one read
pub fn with_lib<R, E>(lua: &Lua, f: impl FnOnce(&dyn WidgetLib) -> Result<R, E>) -> Result<R>
where
    E: Into<BindingError>,
{
    let library = library(lua)?;
    let lib = library.try_borrow().map_err(|_| BindingError::LibraryBusy)?;
    let value = f(&*lib).map_err(Into::into)?;
    Ok(value)
}

/// Borrow the library for a read that cannot fail
pub fn read_lib<R>(lua: &Lua, f: impl FnOnce(&dyn WidgetLib) -> R) -> Result<R> {
    let library = library(lua)?;
    let lib = library.try_borrow().map_err(|_| BindingError::LibraryBusy)?;
    Ok(f(&*lib))
}

/// Borrow the library for one write
///
/// The borrow ends before this returns, so callers may run Lua code between
/// calls without tripping `LibraryBusy`.
pub fn with_lib_mut<R, E>(
    lua: &Lua,
    f: impl FnOnce(&mut dyn WidgetLib) -> Result<R, E>,
) -> Result<R>
where
    E: Into<BindingError>,
{
    let library = library(lua)?;
    let mut lib = library
        .try_borrow_mut()
        .map_err(|_| BindingError::LibraryBusy)?;
    let value = f(&mut *lib).map_err(Into::into)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvlua_widgets::{SimWidgets, WidgetError};

    #[test]
    fn test_missing_library() {
        let lua = Lua::new();
        let result = read_lib(&lua, |lib| lib.scr_act());
        assert!(matches!(result, Err(BindingError::NoLibrary)));
    }

    #[test]
    fn test_busy_library() {
        let lua = Lua::new();
        let sim = Rc::new(RefCell::new(SimWidgets::default()));
        set_library(&lua, sim.clone());

        let scr = read_lib(&lua, |lib| lib.scr_act()).unwrap();
        assert_eq!(scr, sim.borrow().scr_act());

        let _held = sim.borrow_mut();
        let result = read_lib(&lua, |lib| lib.scr_act());
        assert!(matches!(result, Err(BindingError::LibraryBusy)));
    }

    #[test]
    fn test_widget_errors_convert() {
        let lua = Lua::new();
        set_library(&lua, Rc::new(RefCell::new(SimWidgets::default())));
        let result = with_lib(&lua, |lib| lib.obj_x(lvlua_widgets::Handle::NULL));
        assert!(matches!(
            result,
            Err(BindingError::Widget(WidgetError::NullHandle))
        ));
    }
}
