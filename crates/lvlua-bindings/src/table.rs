//! Typed reads of optional fields from Lua tables
//!
//! Each accessor returns `Ok(None)` when the field is absent or holds a value
//! of another kind. Callers treat `None` as "leave the native value alone".
//! Errors only come from the table read itself, e.g. a failing `__index`.

use std::ffi::c_void;

use lvlua_widgets::Handle;
use mlua::{LightUserData, Lua, Table, Value};

use crate::error::Result;

/// Handle carried by a light userdata value
pub fn handle_from_value(value: &Value) -> Option<Handle> {
    match value {
        Value::LightUserData(ud) => Some(Handle::from_raw(ud.0 as usize)),
        _ => None,
    }
}

/// Light userdata for a handle; the null handle becomes `nil`
pub fn handle_to_value(handle: Handle) -> Value {
    if handle.is_null() {
        Value::Nil
    } else {
        Value::LightUserData(LightUserData(handle.into_raw() as *mut c_void))
    }
}

/// Integer interpretation of a numeric value; floats truncate toward zero
pub fn value_to_int(lua: &Lua, value: Value) -> Result<Option<i64>> {
    Ok(match value {
        Value::Integer(i) => Some(i),
        Value::Number(n) => Some(n as i64),
        Value::String(_) => match lua.coerce_integer(value.clone())? {
            Some(i) => Some(i),
            None => lua.coerce_number(value)?.map(|n| n as i64),
        },
        _ => None,
    })
}

/// String interpretation of a string or number value
pub fn value_to_str(lua: &Lua, value: Value) -> Result<Option<String>> {
    Ok(match value {
        Value::String(s) => Some(String::from(s.to_string_lossy())),
        Value::Integer(_) | Value::Number(_) => lua
            .coerce_string(value)?
            .map(|s| String::from(s.to_string_lossy())),
        _ => None,
    })
}

pub fn table_int(lua: &Lua, table: &Table, field: &str) -> Result<Option<i64>> {
    value_to_int(lua, table.get::<Value>(field)?)
}

pub fn table_bool(table: &Table, field: &str) -> Result<Option<bool>> {
    Ok(match table.get::<Value>(field)? {
        Value::Boolean(b) => Some(b),
        _ => None,
    })
}

pub fn table_ptr(table: &Table, field: &str) -> Result<Option<Handle>> {
    Ok(handle_from_value(&table.get::<Value>(field)?))
}

pub fn table_str(lua: &Lua, table: &Table, field: &str) -> Result<Option<String>> {
    value_to_str(lua, table.get::<Value>(field)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(lua: &Lua) -> Table {
        lua.globals().set("handle", handle_to_value(Handle::from_raw(0x40))).unwrap();
        lua.load(
            r#"
            return {
                int = 42,
                float = -7.9,
                numeric = "12",
                text = "hello",
                flag = true,
                ptr = handle,
                nested = {},
            }
            "#,
        )
        .eval()
        .unwrap()
    }

    #[test]
    fn test_int_field() {
        let lua = Lua::new();
        let t = fields(&lua);
        assert_eq!(table_int(&lua, &t, "int").unwrap(), Some(42));
        assert_eq!(table_int(&lua, &t, "float").unwrap(), Some(-7));
        assert_eq!(table_int(&lua, &t, "numeric").unwrap(), Some(12));
        assert_eq!(table_int(&lua, &t, "missing").unwrap(), None);
        assert_eq!(table_int(&lua, &t, "text").unwrap(), None);
        assert_eq!(table_int(&lua, &t, "flag").unwrap(), None);
        assert_eq!(table_int(&lua, &t, "nested").unwrap(), None);
    }

    #[test]
    fn test_bool_field() {
        let lua = Lua::new();
        let t = fields(&lua);
        assert_eq!(table_bool(&t, "flag").unwrap(), Some(true));
        assert_eq!(table_bool(&t, "int").unwrap(), None);
        assert_eq!(table_bool(&t, "missing").unwrap(), None);
        assert_eq!(table_bool(&t, "missing").unwrap().unwrap_or_default(), false);
    }

    #[test]
    fn test_ptr_field() {
        let lua = Lua::new();
        let t = fields(&lua);
        assert_eq!(table_ptr(&t, "ptr").unwrap(), Some(Handle::from_raw(0x40)));
        assert_eq!(table_ptr(&t, "nested").unwrap(), None);
        assert_eq!(table_ptr(&t, "text").unwrap(), None);
        assert_eq!(table_ptr(&t, "missing").unwrap().unwrap_or_default(), Handle::NULL);
    }

    #[test]
    fn test_str_field() {
        let lua = Lua::new();
        let t = fields(&lua);
        assert_eq!(table_str(&lua, &t, "text").unwrap().as_deref(), Some("hello"));
        assert_eq!(table_str(&lua, &t, "int").unwrap().as_deref(), Some("42"));
        assert_eq!(table_str(&lua, &t, "flag").unwrap(), None);
        assert_eq!(table_str(&lua, &t, "missing").unwrap().unwrap_or_default(), "");
    }

    #[test]
    fn test_index_metamethod_is_honoured() {
        let lua = Lua::new();
        let t: Table = lua
            .load("return setmetatable({}, { __index = function(_, k) return k == 'width' and 10 or nil end })")
            .eval()
            .unwrap();
        assert_eq!(table_int(&lua, &t, "width").unwrap(), Some(10));
        assert_eq!(table_int(&lua, &t, "height").unwrap(), None);
    }

    #[test]
    fn test_null_handle_is_nil() {
        assert!(handle_to_value(Handle::NULL).is_nil());
        let value = handle_to_value(Handle::from_raw(9));
        assert_eq!(handle_from_value(&value), Some(Handle::from_raw(9)));
    }
}
