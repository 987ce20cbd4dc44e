//! Per-family `set`/`get` entry points
//!
//! Every family runs the same two state machines over its own field table:
//!
//! - `set(target, fields)`: decode the target, create the object when the
//!   target is `nil`, apply base-family fields then the family's own, and
//!   return the handle.
//! - `get(handle, names)`: walk the name list until the first `nil` and
//!   return one value per name, `nil` where the name is unknown.

use lvlua_widgets::{Handle, WidgetError, WidgetLib};
use mlua::{Lua, Table, Value, Variadic};
use tracing::debug;

use crate::error::{BindingError, Result};
use crate::field::{Apply, Field};
use crate::library::with_lib_mut;
use crate::registrar::Registrar;
use crate::table::{handle_from_value, handle_to_value, table_ptr, value_to_int};

pub mod btn;
pub mod ddlist;
pub mod obj;
pub mod style;

/// Native constructor of a family: `(parent, copy)`
pub type CreateFn =
    fn(&mut dyn WidgetLib, Option<Handle>, Option<Handle>) -> std::result::Result<Handle, WidgetError>;

/// One native object kind as seen from scripts
pub struct Family {
    pub name: &'static str,
    pub set_fn: &'static str,
    pub get_fn: &'static str,
    pub create: CreateFn,
    /// Whether creation reads a `parent` field
    pub parented: bool,
    pub fields: &'static [Field],
    /// Family whose fields apply first and are looked up last
    pub base: Option<&'static Family>,
}

impl Family {
    /// Field matching `name`, own fields before the base family's
    pub fn lookup(&self, name: &str) -> Option<&'static Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.base.and_then(|base| base.lookup(name)))
    }

    fn apply_fields(&self, lua: &Lua, table: &Table, handle: Handle, fresh: bool) -> Result<()> {
        if let Some(base) = self.base {
            base.apply_fields(lua, table, handle, fresh)?;
        }
        for field in self.fields {
            if fresh && field.apply == Apply::MutateOnly {
                continue;
            }
            field.apply(lua, table, handle)?;
        }
        Ok(())
    }
}

/// First argument of a `set` call, decoded once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `nil`: build a new object
    ///
    /// `parent` is `None` when the table has no `parent` field and
    /// `Some(Handle::NULL)` when it explicitly asks for a new screen.
    Create {
        parent: Option<Handle>,
        copy: Option<Handle>,
    },
    Mutate(Handle),
}

impl Target {
    pub fn decode(family: &Family, target: &Value, table: &Table) -> Result<Self> {
        match target {
            Value::Nil => {
                let parent = if family.parented {
                    table_ptr(table, "parent")?
                } else {
                    None
                };
                let copy = table_ptr(table, "copy")?.and_then(Handle::non_null);
                Ok(Target::Create { parent, copy })
            }
            other => handle_from_value(other).map(Target::Mutate).ok_or_else(|| {
                BindingError::bad_argument(family.set_fn, 1, "handle or nil", other)
            }),
        }
    }
}

/// Shared `set` state machine
pub fn set(lua: &Lua, family: &Family, target: Value, fields: Value) -> Result<Handle> {
    let Value::Table(table) = fields else {
        return Err(BindingError::bad_argument(family.set_fn, 2, "table", &fields));
    };

    let (handle, fresh) = match Target::decode(family, &target, &table)? {
        Target::Create { parent, copy } => {
            let create = family.create;
            let parented = family.parented;
            let handle = with_lib_mut(lua, |lib| {
                let parent = match parent {
                    _ if !parented => None,
                    None => Some(lib.scr_act()),
                    Some(parent) => parent.non_null(),
                };
                create(lib, parent, copy)
            })?;
            debug!(target: "bindings", "Created {} {} from {}", family.name, handle, family.set_fn);
            (handle, true)
        }
        Target::Mutate(handle) => (handle, false),
    };

    family.apply_fields(lua, &table, handle, fresh)?;
    Ok(handle)
}

/// Shared `get` state machine
pub fn get(lua: &Lua, family: &Family, target: Value, names: Value) -> Result<Variadic<Value>> {
    let handle = handle_from_value(&target)
        .ok_or_else(|| BindingError::bad_argument(family.get_fn, 1, "handle", &target))?;
    let Value::Table(names) = names else {
        return Err(BindingError::bad_argument(family.get_fn, 2, "table", &names));
    };

    let mut values = Variadic::new();
    for i in 1.. {
        let name = names.raw_get::<Value>(i)?;
        let value = match &name {
            Value::Nil => break,
            Value::String(s) => match s.to_str() {
                Ok(name) => match family.lookup(&name) {
                    Some(field) => field.read(lua, handle)?,
                    None => Value::Nil,
                },
                Err(_) => Value::Nil,
            },
            _ => Value::Nil,
        };
        values.push(value);
    }
    Ok(values)
}

/// Bind a family's `set` and `get` globals
pub fn register_family(reg: &mut Registrar, family: &'static Family) -> Result<()> {
    reg.function(family.set_fn, move |lua, (target, fields): (Value, Value)| {
        Ok(handle_to_value(set(lua, family, target, fields)?))
    })?;
    reg.function(family.get_fn, move |lua, (target, names): (Value, Value)| {
        Ok(get(lua, family, target, names)?)
    })?;
    Ok(())
}

/// Optional handle argument, `nil` for none
pub(crate) fn opt_handle_arg(func: &'static str, pos: usize, value: &Value) -> Result<Option<Handle>> {
    match value {
        Value::Nil => Ok(None),
        other => handle_from_value(other)
            .map(Handle::non_null)
            .ok_or_else(|| BindingError::bad_argument(func, pos, "handle or nil", other)),
    }
}

pub(crate) fn handle_arg(func: &'static str, pos: usize, value: &Value) -> Result<Handle> {
    handle_from_value(value).ok_or_else(|| BindingError::bad_argument(func, pos, "handle", value))
}

pub(crate) fn int_arg(lua: &Lua, func: &'static str, pos: usize, value: Value) -> Result<i64> {
    let got = value.clone();
    value_to_int(lua, value)?.ok_or_else(|| BindingError::bad_argument(func, pos, "number", &got))
}

/// Integer argument where `nil` means `0`
pub(crate) fn opt_int_arg(lua: &Lua, func: &'static str, pos: usize, value: Value) -> Result<i64> {
    match value {
        Value::Nil => Ok(0),
        other => int_arg(lua, func, pos, other),
    }
}

/// Register every family
pub fn register_all(reg: &mut Registrar) -> Result<()> {
    obj::register(reg)?;
    style::register(reg)?;
    btn::register(reg)?;
    ddlist::register(reg)?;
    Ok(())
}
