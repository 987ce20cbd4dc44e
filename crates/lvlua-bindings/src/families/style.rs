//! Style family: `lv_style_*`
//!
//! Styles are created from a copy, never parented, and every field is a
//! plain integer property.

use lvlua_widgets::{saturate_coord, BuiltinStyle, Handle, StyleAnim, StyleProp};
use mlua::{Lua, Table, Value};

use super::{handle_arg, int_arg, opt_handle_arg, register_family, Family};
use crate::error::{BindingError, Result};
use crate::field::{saturate_u16, Field};
use crate::library::{read_lib, with_lib_mut};
use crate::registrar::Registrar;
use crate::table::{handle_to_value, table_bool, table_int, table_ptr};

macro_rules! prop {
    ($name:literal, $prop:ident) => {
        Field::int(
            $name,
            |lib, style, v| Ok(lib.style_set(style, StyleProp::$prop, v)?),
            |lib, style| Ok(lib.style_get(style, StyleProp::$prop)?),
        )
    };
}

static STYLE_FIELDS: &[Field] = &[
    prop!("body_main_color", BodyMainColor),
    prop!("body_grad_color", BodyGradColor),
    prop!("body_radius", BodyRadius),
    prop!("body_opa", BodyOpa),
    prop!("body_border_color", BodyBorderColor),
    prop!("body_border_width", BodyBorderWidth),
    prop!("body_border_opa", BodyBorderOpa),
    prop!("body_shadow_color", BodyShadowColor),
    prop!("body_shadow_width", BodyShadowWidth),
    prop!("body_padding_hor", BodyPaddingHor),
    prop!("body_padding_ver", BodyPaddingVer),
    prop!("body_padding_inner", BodyPaddingInner),
    prop!("text_color", TextColor),
    prop!("text_letter_space", TextLetterSpace),
    prop!("text_line_space", TextLineSpace),
    prop!("text_opa", TextOpa),
    prop!("image_color", ImageColor),
    prop!("image_intense", ImageIntense),
    prop!("image_opa", ImageOpa),
    prop!("line_color", LineColor),
    prop!("line_width", LineWidth),
    prop!("line_opa", LineOpa),
];

pub static STYLE: Family = Family {
    name: "style",
    set_fn: "lv_style_set",
    get_fn: "lv_style_get",
    create: |lib, _parent, copy| lib.style_alloc(copy),
    parented: false,
    fields: STYLE_FIELDS,
    base: None,
};

/// Build a style animation descriptor from its field table
fn style_anim(lua: &Lua, table: &Table) -> Result<StyleAnim> {
    let int = |field: &str| -> Result<i64> { Ok(table_int(lua, table, field)?.unwrap_or_default()) };
    let ptr = |field: &str| -> Result<Handle> { Ok(table_ptr(table, field)?.unwrap_or_default()) };
    let flag = |field: &str| -> Result<bool> { Ok(table_bool(table, field)?.unwrap_or_default()) };

    Ok(StyleAnim {
        style: ptr("style")?,
        style_start: ptr("style_start")?,
        style_end: ptr("style_end")?,
        time: saturate_u16(int("time")?),
        act_time: saturate_coord(int("act_time")?),
        playback: flag("playback")?,
        playback_pause: saturate_u16(int("playback_pause")?),
        repeat: flag("repeat")?,
        repeat_pause: saturate_u16(int("repeat_pause")?),
    })
}

pub fn register(reg: &mut Registrar) -> Result<()> {
    register_family(reg, &STYLE)?;

    reg.function("lv_style_alloc", |lua, copy: Value| {
        let copy = opt_handle_arg("lv_style_alloc", 1, &copy)?;
        Ok(handle_to_value(with_lib_mut(lua, |lib| lib.style_alloc(copy))?))
    })?;

    reg.function("lv_style_copy", |lua, (dest, src): (Value, Value)| {
        let dest = handle_arg("lv_style_copy", 1, &dest)?;
        let src = handle_arg("lv_style_copy", 2, &src)?;
        Ok(with_lib_mut(lua, |lib| lib.style_copy(dest, src))?)
    })?;

    reg.function("lv_style_anim_create", |lua, fields: Value| {
        let Value::Table(table) = &fields else {
            return Err(BindingError::bad_argument("lv_style_anim_create", 1, "table", &fields).into());
        };
        let anim = style_anim(lua, table)?;
        Ok(with_lib_mut(lua, |lib| lib.style_anim_create(anim))?)
    })?;

    reg.function(
        "lv_style_set_body_border_width",
        |lua, (style, width): (Value, Value)| {
            const FUNC: &str = "lv_style_set_body_border_width";
            let style = handle_arg(FUNC, 1, &style)?;
            let width = int_arg(lua, FUNC, 2, width)?;
            Ok(with_lib_mut(lua, |lib| {
                lib.style_set(style, StyleProp::BodyBorderWidth, width)
            })?)
        },
    )?;

    let builtins = read_lib(reg.lua(), |lib| {
        BuiltinStyle::ALL
            .iter()
            .map(|style| (style.global_name(), lib.builtin_style(*style)))
            .collect::<Vec<_>>()
    })?;
    for (name, handle) in builtins {
        reg.pointer(&name, handle)?;
    }
    Ok(())
}
