//! Base object family: `lv_obj_*`

use lvlua_widgets::{saturate_coord, Align, AnimKind, Constants, Handle, ObjFlag, Protect, WidgetLib};
use mlua::Value;

use super::{handle_arg, int_arg, opt_handle_arg, opt_int_arg, register_family, Family};
use crate::error::{BindingError, Result};
use crate::field::{enum_value, saturate_u16, Field};
use crate::library::{read_lib, with_lib_mut};
use crate::registrar::Registrar;
use crate::table::handle_to_value;

macro_rules! coord {
    ($name:literal, $set:ident, $get:ident) => {
        Field::int(
            $name,
            |lib, obj, v| Ok(lib.$set(obj, saturate_coord(v))?),
            |lib, obj| Ok(lib.$get(obj)?.into()),
        )
    };
}

macro_rules! flag {
    ($name:literal, $flag:ident) => {
        Field::bool(
            $name,
            |lib, obj, en| Ok(lib.obj_set_flag(obj, ObjFlag::$flag, en)?),
            |lib, obj| Ok(lib.obj_flag(obj, ObjFlag::$flag)?),
        )
    };
}

fn set_protect(lib: &mut dyn WidgetLib, obj: Handle, v: i64) -> Result<()> {
    let bits = u8::try_from(v).map_err(|_| BindingError::invalid_value("protect", v))?;
    Ok(lib.obj_set_protect(obj, Protect::from_bits_truncate(bits))?)
}

static OBJ_FIELDS: &[Field] = &[
    coord!("width", obj_set_width, obj_width),
    coord!("height", obj_set_height, obj_height),
    coord!("x", obj_set_x, obj_x),
    coord!("y", obj_set_y, obj_y),
    Field::int(
        "free_num",
        |lib, obj, v| Ok(lib.obj_set_free_num(obj, v)?),
        |lib, obj| Ok(lib.obj_free_num(obj)?),
    ),
    flag!("hidden", Hidden),
    flag!("click", Click),
    flag!("top", Top),
    flag!("drag", Drag),
    flag!("drag_throw", DragThrow),
    flag!("drag_parent", DragParent),
    Field::ptr(
        "parent",
        |lib, obj, parent| Ok(lib.obj_set_parent(obj, parent)?),
        |lib, obj| Ok(lib.obj_parent(obj)?),
    )
    .mutate_only(),
    Field::ptr(
        "style",
        |lib, obj, style| Ok(lib.obj_set_style(obj, style)?),
        |lib, obj| Ok(lib.obj_style(obj)?),
    ),
    Field::ptr(
        "free_ptr",
        |lib, obj, ptr| Ok(lib.obj_set_free_ptr(obj, ptr)?),
        |lib, obj| Ok(lib.obj_free_ptr(obj)?),
    ),
    Field::int("protect", set_protect, |lib, obj| {
        Ok(lib.obj_protect(obj)?.bits().into())
    }),
];

pub static OBJ: Family = Family {
    name: "obj",
    set_fn: "lv_obj_set",
    get_fn: "lv_obj_get",
    create: |lib, parent, copy| lib.obj_create(parent, copy),
    parented: true,
    fields: OBJ_FIELDS,
    base: None,
};

pub fn register(reg: &mut Registrar) -> Result<()> {
    register_family(reg, &OBJ)?;

    reg.function("lv_scr_act", |lua, ()| {
        Ok(handle_to_value(read_lib(lua, |lib| lib.scr_act())?))
    })?;

    reg.function("lv_scr_load", |lua, scr: Value| {
        let scr = handle_arg("lv_scr_load", 1, &scr)?;
        Ok(with_lib_mut(lua, |lib| lib.scr_load(scr))?)
    })?;

    reg.function("lv_obj_create", |lua, (parent, copy): (Value, Value)| {
        let parent = opt_handle_arg("lv_obj_create", 1, &parent)?;
        let copy = opt_handle_arg("lv_obj_create", 2, &copy)?;
        let obj = with_lib_mut(lua, |lib| lib.obj_create(parent, copy))?;
        Ok(handle_to_value(obj))
    })?;

    reg.function("lv_obj_del", |lua, obj: Value| {
        let obj = handle_arg("lv_obj_del", 1, &obj)?;
        Ok(with_lib_mut(lua, |lib| lib.obj_del(obj))?)
    })?;

    reg.function(
        "lv_obj_align",
        |lua, (obj, base, align, x_mod, y_mod): (Value, Value, Value, Value, Value)| {
            const FUNC: &str = "lv_obj_align";
            let obj = handle_arg(FUNC, 1, &obj)?;
            let base = opt_handle_arg(FUNC, 2, &base)?;
            let align = enum_value("align", int_arg(lua, FUNC, 3, align)?, Align::from_int)?;
            let x_mod = saturate_coord(opt_int_arg(lua, FUNC, 4, x_mod)?);
            let y_mod = saturate_coord(opt_int_arg(lua, FUNC, 5, y_mod)?);
            Ok(with_lib_mut(lua, |lib| lib.obj_align(obj, base, align, x_mod, y_mod))?)
        },
    )?;

    reg.function(
        "lv_obj_animate",
        |lua, (obj, anim, time, delay): (Value, Value, Value, Value)| {
            const FUNC: &str = "lv_obj_animate";
            let obj = handle_arg(FUNC, 1, &obj)?;
            let anim = enum_value("anim", int_arg(lua, FUNC, 2, anim)?, AnimKind::from_int)?;
            let time = saturate_u16(opt_int_arg(lua, FUNC, 3, time)?);
            let delay = saturate_u16(opt_int_arg(lua, FUNC, 4, delay)?);
            Ok(with_lib_mut(lua, |lib| lib.obj_animate(obj, anim, time, delay))?)
        },
    )?;

    reg.constants(Protect::constants())?;
    reg.constants(Align::constants())?;
    reg.constants(AnimKind::constants())?;
    Ok(())
}
