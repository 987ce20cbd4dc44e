//! Dropdown-list family: `lv_ddlist_*`, built on the object family

use lvlua_widgets::{saturate_coord, Constants, DdlistStyle, SbMode};
use mlua::Value;

use super::btn::callback;
use super::obj::OBJ;
use super::{opt_handle_arg, register_family, Family};
use crate::error::Result;
use crate::field::{enum_value, saturate_u16, Field, Getter};
use crate::library::with_lib_mut;
use crate::registrar::Registrar;
use crate::table::handle_to_value;

macro_rules! style_slot {
    ($name:literal, $slot:ident) => {
        Field::ptr(
            $name,
            |lib, ddlist, style| Ok(lib.ddlist_set_style(ddlist, DdlistStyle::$slot, style)?),
            |lib, ddlist| Ok(lib.ddlist_style(ddlist, DdlistStyle::$slot)?),
        )
    };
}

static DDLIST_FIELDS: &[Field] = &[
    Field::str(
        "options",
        |lib, ddlist, options| Ok(lib.ddlist_set_options(ddlist, &options)?),
        |lib, ddlist| Ok(Some(lib.ddlist_options(ddlist)?)),
    ),
    Field::int(
        "selected",
        |lib, ddlist, v| Ok(lib.ddlist_set_selected(ddlist, saturate_u16(v))?),
        |lib, ddlist| Ok(lib.ddlist_selected(ddlist)?.into()),
    ),
    Field::int(
        "fix_height",
        |lib, ddlist, v| Ok(lib.ddlist_set_fix_height(ddlist, saturate_coord(v))?),
        |lib, ddlist| Ok(lib.ddlist_fix_height(ddlist)?.into()),
    ),
    Field::int(
        "sb_mode",
        |lib, ddlist, v| {
            let mode = enum_value("sb_mode", v, SbMode::from_int)?;
            Ok(lib.ddlist_set_sb_mode(ddlist, mode)?)
        },
        |lib, ddlist| Ok(lib.ddlist_sb_mode(ddlist)?.value()),
    ),
    Field::int(
        "anim_time",
        |lib, ddlist, v| Ok(lib.ddlist_set_anim_time(ddlist, saturate_u16(v))?),
        |lib, ddlist| Ok(lib.ddlist_anim_time(ddlist)?.into()),
    ),
    Field::bool(
        "hor_fit",
        |lib, ddlist, en| Ok(lib.ddlist_set_hor_fit(ddlist, en)?),
        |lib, ddlist| Ok(lib.ddlist_hor_fit(ddlist)?),
    ),
    style_slot!("style_bg", Bg),
    style_slot!("style_sel", Sel),
    style_slot!("style_sb", Sb),
    Field::str(
        "action",
        |lib, ddlist, name| Ok(lib.ddlist_set_action(ddlist, callback(name))?),
        |lib, ddlist| Ok(lib.ddlist_action(ddlist)?),
    ),
    Field::read_only(
        "selected_str",
        Getter::Str(|lib, ddlist| Ok(Some(lib.ddlist_selected_str(ddlist)?))),
    ),
];

pub static DDLIST: Family = Family {
    name: "ddlist",
    set_fn: "lv_ddlist_set",
    get_fn: "lv_ddlist_get",
    create: |lib, parent, copy| lib.ddlist_create(parent, copy),
    parented: true,
    fields: DDLIST_FIELDS,
    base: Some(&OBJ),
};

pub fn register(reg: &mut Registrar) -> Result<()> {
    register_family(reg, &DDLIST)?;

    reg.function("lv_ddlist_create", |lua, (parent, copy): (Value, Value)| {
        let parent = opt_handle_arg("lv_ddlist_create", 1, &parent)?;
        let copy = opt_handle_arg("lv_ddlist_create", 2, &copy)?;
        Ok(handle_to_value(with_lib_mut(lua, |lib| lib.ddlist_create(parent, copy))?))
    })?;

    reg.constants(DdlistStyle::constants())?;
    reg.constants(SbMode::constants())?;
    Ok(())
}
