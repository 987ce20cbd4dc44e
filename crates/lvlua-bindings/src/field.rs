//! Static field dispatch tables
//!
//! A family describes its script-visible fields as a `&'static [Field]`.
//! Each entry pairs a name with a typed setter and getter so `set` and `get`
//! look a name up once instead of walking a chain of string comparisons.

use lvlua_widgets::{Handle, WidgetLib};
use mlua::{Lua, Table, Value};

use crate::error::{BindingError, Result};
use crate::library::{with_lib, with_lib_mut};
use crate::table::{handle_to_value, table_bool, table_int, table_ptr, table_str};

#[derive(Clone, Copy)]
pub enum Setter {
    Int(fn(&mut dyn WidgetLib, Handle, i64) -> Result<()>),
    Bool(fn(&mut dyn WidgetLib, Handle, bool) -> Result<()>),
    Ptr(fn(&mut dyn WidgetLib, Handle, Handle) -> Result<()>),
    Str(fn(&mut dyn WidgetLib, Handle, String) -> Result<()>),
}

#[derive(Clone, Copy)]
pub enum Getter {
    Int(fn(&dyn WidgetLib, Handle) -> Result<i64>),
    Bool(fn(&dyn WidgetLib, Handle) -> Result<bool>),
    Ptr(fn(&dyn WidgetLib, Handle) -> Result<Handle>),
    Str(fn(&dyn WidgetLib, Handle) -> Result<Option<String>>),
}

/// When a field's setter runs during `set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Apply {
    Always,
    /// Skipped on an object the same call just created
    MutateOnly,
}

#[derive(Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub set: Option<Setter>,
    pub get: Option<Getter>,
    pub apply: Apply,
}

impl Field {
    pub const fn int(
        name: &'static str,
        set: fn(&mut dyn WidgetLib, Handle, i64) -> Result<()>,
        get: fn(&dyn WidgetLib, Handle) -> Result<i64>,
    ) -> Self {
        Field::new(name, Setter::Int(set), Getter::Int(get))
    }

    pub const fn bool(
        name: &'static str,
        set: fn(&mut dyn WidgetLib, Handle, bool) -> Result<()>,
        get: fn(&dyn WidgetLib, Handle) -> Result<bool>,
    ) -> Self {
        Field::new(name, Setter::Bool(set), Getter::Bool(get))
    }

    pub const fn ptr(
        name: &'static str,
        set: fn(&mut dyn WidgetLib, Handle, Handle) -> Result<()>,
        get: fn(&dyn WidgetLib, Handle) -> Result<Handle>,
    ) -> Self {
        Field::new(name, Setter::Ptr(set), Getter::Ptr(get))
    }

    pub const fn str(
        name: &'static str,
        set: fn(&mut dyn WidgetLib, Handle, String) -> Result<()>,
        get: fn(&dyn WidgetLib, Handle) -> Result<Option<String>>,
    ) -> Self {
        Field::new(name, Setter::Str(set), Getter::Str(get))
    }

    /// A field `get` can report but `set` never writes
    pub const fn read_only(name: &'static str, get: Getter) -> Self {
        Field {
            name,
            set: None,
            get: Some(get),
            apply: Apply::Always,
        }
    }

    pub const fn mutate_only(self) -> Self {
        Field {
            apply: Apply::MutateOnly,
            ..self
        }
    }

    const fn new(name: &'static str, set: Setter, get: Getter) -> Self {
        Field {
            name,
            set: Some(set),
            get: Some(get),
            apply: Apply::Always,
        }
    }

    /// Read this field from `table` and write it to `handle` when present
    ///
    /// Returns whether the setter ran. The library is only borrowed for the
    /// native call, never across the table read.
    pub fn apply(&self, lua: &Lua, table: &Table, handle: Handle) -> Result<bool> {
        let Some(setter) = self.set else {
            return Ok(false);
        };
        let applied = match setter {
            Setter::Int(set) => match table_int(lua, table, self.name)? {
                Some(v) => with_lib_mut(lua, |lib| set(lib, handle, v)).map(|_| true)?,
                None => false,
            },
            Setter::Bool(set) => match table_bool(table, self.name)? {
                Some(v) => with_lib_mut(lua, |lib| set(lib, handle, v)).map(|_| true)?,
                None => false,
            },
            Setter::Ptr(set) => match table_ptr(table, self.name)? {
                Some(v) => with_lib_mut(lua, |lib| set(lib, handle, v)).map(|_| true)?,
                None => false,
            },
            Setter::Str(set) => match table_str(lua, table, self.name)? {
                Some(v) => with_lib_mut(lua, |lib| set(lib, handle, v)).map(|_| true)?,
                None => false,
            },
        };
        Ok(applied)
    }

    /// Current native value of this field, `nil` for write-only fields
    pub fn read(&self, lua: &Lua, handle: Handle) -> Result<Value> {
        let Some(getter) = self.get else {
            return Ok(Value::Nil);
        };
        let value = match getter {
            Getter::Int(get) => Value::Integer(with_lib(lua, |lib| get(lib, handle))?),
            Getter::Bool(get) => Value::Boolean(with_lib(lua, |lib| get(lib, handle))?),
            Getter::Ptr(get) => handle_to_value(with_lib(lua, |lib| get(lib, handle))?),
            Getter::Str(get) => match with_lib(lua, |lib| get(lib, handle))? {
                Some(s) => Value::String(lua.create_string(&s)?),
                None => Value::Nil,
            },
        };
        Ok(value)
    }
}

/// Convert a script integer into an enumeration, rejecting unknown values
pub fn enum_value<T>(field: &'static str, value: i64, from: fn(i64) -> Option<T>) -> Result<T> {
    from(value).ok_or_else(|| BindingError::invalid_value(field, value))
}

pub fn saturate_u16(value: i64) -> u16 {
    value.clamp(0, u16::MAX as i64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use lvlua_widgets::{Layout, SimWidgets};

    use crate::library::set_library;

    static WIDTH: Field = Field::int(
        "width",
        |lib, obj, v| Ok(lib.obj_set_width(obj, lvlua_widgets::saturate_coord(v))?),
        |lib, obj| Ok(lib.obj_width(obj)?.into()),
    );

    fn setup() -> (Lua, Handle) {
        let lua = Lua::new();
        let mut sim = SimWidgets::default();
        let obj = sim.obj_create(Some(sim.scr_act()), None).unwrap();
        set_library(&lua, Rc::new(RefCell::new(sim)));
        (lua, obj)
    }

    #[test]
    fn test_apply_only_when_found() {
        let (lua, obj) = setup();
        let table: Table = lua.load("return { width = 77 }").eval().unwrap();
        assert!(WIDTH.apply(&lua, &table, obj).unwrap());
        assert_eq!(WIDTH.read(&lua, obj).unwrap(), Value::Integer(77));

        let table: Table = lua.load("return { width = 'wide' }").eval().unwrap();
        assert!(!WIDTH.apply(&lua, &table, obj).unwrap());
        assert_eq!(WIDTH.read(&lua, obj).unwrap(), Value::Integer(77));
    }

    #[test]
    fn test_read_only_field_is_not_applied() {
        let (lua, obj) = setup();
        let field = Field::read_only("width", Getter::Int(|lib, obj| Ok(lib.obj_width(obj)?.into())));
        let table: Table = lua.load("return { width = 5 }").eval().unwrap();
        assert!(!field.apply(&lua, &table, obj).unwrap());
        assert_ne!(field.read(&lua, obj).unwrap(), Value::Integer(5));
    }

    #[test]
    fn test_enum_value() {
        assert_eq!(enum_value("layout", 8, Layout::from_int).unwrap(), Layout::Pretty);
        let err = enum_value("layout", 99, Layout::from_int).unwrap_err();
        assert_eq!(err.to_string(), "invalid value 99 for 'layout'");
    }

    #[test]
    fn test_saturate_u16() {
        assert_eq!(saturate_u16(-3), 0);
        assert_eq!(saturate_u16(70_000), u16::MAX);
        assert_eq!(saturate_u16(200), 200);
    }
}
