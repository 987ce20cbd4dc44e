//! Button family: `lv_btn_*`, built on the object family

use lvlua_widgets::{BtnAction, BtnState, BtnStyle, Constants, Handle, Layout, WidgetLib};
use mlua::Value;

use super::obj::OBJ;
use super::{opt_handle_arg, register_family, Family};
use crate::error::Result;
use crate::field::{enum_value, Field};
use crate::library::with_lib_mut;
use crate::registrar::Registrar;
use crate::table::handle_to_value;

macro_rules! action {
    ($name:literal, $action:ident) => {
        Field::str(
            $name,
            |lib, btn, name| Ok(lib.btn_set_action(btn, BtnAction::$action, callback(name))?),
            |lib, btn| Ok(lib.btn_action(btn, BtnAction::$action)?),
        )
    };
}

macro_rules! style_slot {
    ($name:literal, $slot:ident) => {
        Field::ptr(
            $name,
            |lib, btn, style| Ok(lib.btn_set_style(btn, BtnStyle::$slot, style)?),
            |lib, btn| Ok(lib.btn_style(btn, BtnStyle::$slot)?),
        )
    };
}

/// An empty callback name clears the action
pub(crate) fn callback(name: String) -> Option<String> {
    if name.is_empty() { None } else { Some(name) }
}

fn set_hor_fit(lib: &mut dyn WidgetLib, btn: Handle, en: bool) -> Result<()> {
    let ver = lib.btn_ver_fit(btn)?;
    Ok(lib.btn_set_fit(btn, en, ver)?)
}

fn set_ver_fit(lib: &mut dyn WidgetLib, btn: Handle, en: bool) -> Result<()> {
    let hor = lib.btn_hor_fit(btn)?;
    Ok(lib.btn_set_fit(btn, hor, en)?)
}

static BTN_FIELDS: &[Field] = &[
    Field::int(
        "toggle",
        |lib, btn, v| Ok(lib.btn_set_toggle(btn, v != 0)?),
        |lib, btn| Ok(lib.btn_toggle(btn)?.into()),
    ),
    Field::int(
        "state",
        |lib, btn, v| Ok(lib.btn_set_state(btn, enum_value("state", v, BtnState::from_int)?)?),
        |lib, btn| Ok(lib.btn_state(btn)?.value()),
    ),
    Field::int(
        "layout",
        |lib, btn, v| Ok(lib.btn_set_layout(btn, enum_value("layout", v, Layout::from_int)?)?),
        |lib, btn| Ok(lib.btn_layout(btn)?.value()),
    ),
    action!("action_pr", Pr),
    action!("action_click", Click),
    action!("action_long_pr", LongPr),
    action!("action_long_pr_repeate", LongPrRepeat),
    Field::bool("hor_fit", set_hor_fit, |lib, btn| Ok(lib.btn_hor_fit(btn)?)),
    Field::bool("ver_fit", set_ver_fit, |lib, btn| Ok(lib.btn_ver_fit(btn)?)),
    style_slot!("style_rel", Rel),
    style_slot!("style_pr", Pr),
    style_slot!("style_tgl_rel", TglRel),
    style_slot!("style_tgl_pr", TglPr),
    style_slot!("style_ina", Ina),
];

pub static BTN: Family = Family {
    name: "btn",
    set_fn: "lv_btn_set",
    get_fn: "lv_btn_get",
    create: |lib, parent, copy| lib.btn_create(parent, copy),
    parented: true,
    fields: BTN_FIELDS,
    base: Some(&OBJ),
};

pub fn register(reg: &mut Registrar) -> Result<()> {
    register_family(reg, &BTN)?;

    reg.function("lv_btn_create", |lua, (parent, copy): (Value, Value)| {
        let parent = opt_handle_arg("lv_btn_create", 1, &parent)?;
        let copy = opt_handle_arg("lv_btn_create", 2, &copy)?;
        Ok(handle_to_value(with_lib_mut(lua, |lib| lib.btn_create(parent, copy))?))
    })?;

    reg.constants(BtnState::constants())?;
    reg.constants(BtnStyle::constants())?;
    reg.constants(BtnAction::constants())?;
    reg.constants(Layout::constants())?;
    Ok(())
}
