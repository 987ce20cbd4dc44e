use std::cell::RefCell;
use std::rc::Rc;

use lvlua_bindings::table::handle_from_value;
use lvlua_bindings::{
    clear_context, fire_btn_action, fire_ddlist_action, install, register_current, set_context,
    with_context, BindingError,
};
use lvlua_widgets::{BtnAction, Handle, SimWidgets};
use mlua::{Lua, Value};

fn setup() -> (Lua, Rc<RefCell<SimWidgets>>) {
    let lua = Lua::new();
    let sim = Rc::new(RefCell::new(SimWidgets::default()));
    install(&lua, sim.clone()).unwrap();
    (lua, sim)
}

fn global_handle(lua: &Lua, name: &str) -> Handle {
    let value: Value = lua.globals().get(name).unwrap();
    handle_from_value(&value).unwrap()
}

#[test]
fn test_button_click_calls_named_global() {
    let (lua, _sim) = setup();
    lua.load(
        r#"
        clicks = 0
        function on_click(btn)
            clicks = clicks + 1
            lv_btn_set(btn, { state = LV_BTN_STATE_TGL_REL })
        end
        btn = lv_btn_set(nil, { action_click = "on_click" })
        "#,
    )
    .exec()
    .unwrap();

    let btn = global_handle(&lua, "btn");
    assert!(fire_btn_action(&lua, btn, BtnAction::Click).unwrap());
    assert!(fire_btn_action(&lua, btn, BtnAction::Click).unwrap());
    assert!(!fire_btn_action(&lua, btn, BtnAction::LongPr).unwrap());

    let clicks: i64 = lua.globals().get("clicks").unwrap();
    assert_eq!(clicks, 2);
    let state: i64 = lua.load("return lv_btn_get(btn, { 'state' })").eval().unwrap();
    assert_eq!(state, 2);
}

#[test]
fn test_missing_callback_is_not_an_error() {
    let (lua, _sim) = setup();
    lua.load(r#"btn = lv_btn_set(nil, { action_pr = "nowhere" })"#)
        .exec()
        .unwrap();
    let btn = global_handle(&lua, "btn");
    assert!(!fire_btn_action(&lua, btn, BtnAction::Pr).unwrap());
}

#[test]
fn test_empty_name_clears_callback() {
    let (lua, _sim) = setup();
    lua.load(
        r#"
        function f() end
        btn = lv_btn_set(nil, { action_click = "f" })
        lv_btn_set(btn, { action_click = "" })
        "#,
    )
    .exec()
    .unwrap();
    let btn = global_handle(&lua, "btn");
    assert!(!fire_btn_action(&lua, btn, BtnAction::Click).unwrap());
}

#[test]
fn test_ddlist_action_sees_selection() {
    let (lua, _sim) = setup();
    lua.load(
        r#"
        picked = nil
        function on_pick(dd)
            picked = lv_ddlist_get(dd, { "selected_str" })
        end
        dd = lv_ddlist_set(nil, { options = "One\nTwo", selected = 1, action = "on_pick" })
        "#,
    )
    .exec()
    .unwrap();

    let dd = global_handle(&lua, "dd");
    assert!(fire_ddlist_action(&lua, dd).unwrap());
    let picked: String = lua.globals().get("picked").unwrap();
    assert_eq!(picked, "Two");
}

#[test]
fn test_callback_errors_propagate() {
    let (lua, _sim) = setup();
    lua.load(
        r#"
        function broken() error("callback failed") end
        btn = lv_btn_set(nil, { action_click = "broken" })
        "#,
    )
    .exec()
    .unwrap();
    let btn = global_handle(&lua, "btn");
    let err = fire_btn_action(&lua, btn, BtnAction::Click).unwrap_err();
    assert!(matches!(err, BindingError::Lua(_)));
    assert!(err.to_string().contains("callback failed"));
}

#[test]
fn test_registering_through_the_context_holder() {
    let _ = clear_context();
    assert!(matches!(register_current(), Err(BindingError::NotInitialized)));

    let lua = Lua::new();
    lvlua_bindings::library::set_library(&lua, Rc::new(RefCell::new(SimWidgets::default())));
    set_context(lua).unwrap();

    let registered = register_current().unwrap();
    assert!(registered.contains("lv_ddlist_set"));
    let width: i64 = with_context(|lua| {
        Ok(lua
            .load("return lv_obj_get(lv_obj_set(nil, { width = 64 }), { 'width' })")
            .eval()?)
    })
    .unwrap();
    assert_eq!(width, 64);

    clear_context().unwrap();
}
