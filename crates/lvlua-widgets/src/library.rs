use crate::error::WidgetError;
use crate::handle::Handle;
use crate::types::{
    Align, AnimKind, BtnAction, BtnState, BtnStyle, BuiltinStyle, Coord, DdlistStyle, Layout,
    ObjFlag, Protect, SbMode, StyleAnim, StyleProp,
};

pub type Result<T, E = WidgetError> = std::result::Result<T, E>;

/// Capability surface of a native widget library
///
/// Every handle-taking operation validates the handle and reports misuse as a
/// `WidgetError`; none of them fail otherwise. Button and dropdown-list
/// handles are also objects, so every `obj_*` operation accepts them.
pub trait WidgetLib {
    // ===== Screens and built-ins =====

    /// The screen objects are currently created on
    fn scr_act(&self) -> Handle;

    /// Make `scr` the active screen
    fn scr_load(&mut self, scr: Handle) -> Result<()>;

    fn builtin_style(&self, style: BuiltinStyle) -> Handle;

    // ===== Objects =====

    /// Create a base object; `None` parent creates a new screen
    fn obj_create(&mut self, parent: Option<Handle>, copy: Option<Handle>) -> Result<Handle>;

    /// Delete an object together with its children
    fn obj_del(&mut self, obj: Handle) -> Result<()>;

    fn obj_set_parent(&mut self, obj: Handle, parent: Handle) -> Result<()>;

    /// Parent of an object, the null handle for screens
    fn obj_parent(&self, obj: Handle) -> Result<Handle>;

    fn obj_set_x(&mut self, obj: Handle, x: Coord) -> Result<()>;
    fn obj_set_y(&mut self, obj: Handle, y: Coord) -> Result<()>;
    fn obj_set_width(&mut self, obj: Handle, w: Coord) -> Result<()>;
    fn obj_set_height(&mut self, obj: Handle, h: Coord) -> Result<()>;

    /// X coordinate relative to the parent
    fn obj_x(&self, obj: Handle) -> Result<Coord>;
    /// Y coordinate relative to the parent
    fn obj_y(&self, obj: Handle) -> Result<Coord>;
    fn obj_width(&self, obj: Handle) -> Result<Coord>;
    fn obj_height(&self, obj: Handle) -> Result<Coord>;

    fn obj_set_flag(&mut self, obj: Handle, flag: ObjFlag, en: bool) -> Result<()>;
    fn obj_flag(&self, obj: Handle, flag: ObjFlag) -> Result<bool>;

    fn obj_set_style(&mut self, obj: Handle, style: Handle) -> Result<()>;
    fn obj_style(&self, obj: Handle) -> Result<Handle>;

    fn obj_set_protect(&mut self, obj: Handle, prot: Protect) -> Result<()>;
    fn obj_protect(&self, obj: Handle) -> Result<Protect>;

    fn obj_set_free_num(&mut self, obj: Handle, num: i64) -> Result<()>;
    fn obj_free_num(&self, obj: Handle) -> Result<i64>;

    fn obj_set_free_ptr(&mut self, obj: Handle, ptr: Handle) -> Result<()>;
    fn obj_free_ptr(&self, obj: Handle) -> Result<Handle>;

    /// Position `obj` relative to `base` (the parent when `None`)
    fn obj_align(
        &mut self,
        obj: Handle,
        base: Option<Handle>,
        align: Align,
        x_mod: Coord,
        y_mod: Coord,
    ) -> Result<()>;

    /// Start a built-in animation; timing is owned by the library
    fn obj_animate(&mut self, obj: Handle, anim: AnimKind, time: u16, delay: u16) -> Result<()>;

    // ===== Styles =====

    /// Allocate a style, initialised from `copy` or from the plain style
    fn style_alloc(&mut self, copy: Option<Handle>) -> Result<Handle>;

    fn style_copy(&mut self, dest: Handle, src: Handle) -> Result<()>;

    fn style_set(&mut self, style: Handle, prop: StyleProp, value: i64) -> Result<()>;
    fn style_get(&self, style: Handle, prop: StyleProp) -> Result<i64>;

    fn style_anim_create(&mut self, anim: StyleAnim) -> Result<()>;

    // ===== Buttons =====

    fn btn_create(&mut self, parent: Option<Handle>, copy: Option<Handle>) -> Result<Handle>;

    fn btn_set_toggle(&mut self, btn: Handle, tgl: bool) -> Result<()>;
    fn btn_toggle(&self, btn: Handle) -> Result<bool>;

    fn btn_set_state(&mut self, btn: Handle, state: BtnState) -> Result<()>;
    fn btn_state(&self, btn: Handle) -> Result<BtnState>;

    /// Name of the script function to call for `action`
    fn btn_set_action(&mut self, btn: Handle, action: BtnAction, name: Option<String>)
        -> Result<()>;
    fn btn_action(&self, btn: Handle, action: BtnAction) -> Result<Option<String>>;

    fn btn_set_layout(&mut self, btn: Handle, layout: Layout) -> Result<()>;
    fn btn_layout(&self, btn: Handle) -> Result<Layout>;

    fn btn_set_fit(&mut self, btn: Handle, hor_en: bool, ver_en: bool) -> Result<()>;
    fn btn_hor_fit(&self, btn: Handle) -> Result<bool>;
    fn btn_ver_fit(&self, btn: Handle) -> Result<bool>;

    fn btn_set_style(&mut self, btn: Handle, slot: BtnStyle, style: Handle) -> Result<()>;
    fn btn_style(&self, btn: Handle, slot: BtnStyle) -> Result<Handle>;

    // ===== Dropdown lists =====

    fn ddlist_create(&mut self, parent: Option<Handle>, copy: Option<Handle>) -> Result<Handle>;

    /// Options separated by `\n`
    fn ddlist_set_options(&mut self, ddlist: Handle, options: &str) -> Result<()>;
    fn ddlist_options(&self, ddlist: Handle) -> Result<String>;

    fn ddlist_set_selected(&mut self, ddlist: Handle, sel: u16) -> Result<()>;
    fn ddlist_selected(&self, ddlist: Handle) -> Result<u16>;
    /// Text of the selected option
    fn ddlist_selected_str(&self, ddlist: Handle) -> Result<String>;

    /// `0` means the height follows the options
    fn ddlist_set_fix_height(&mut self, ddlist: Handle, h: Coord) -> Result<()>;
    fn ddlist_fix_height(&self, ddlist: Handle) -> Result<Coord>;

    fn ddlist_set_hor_fit(&mut self, ddlist: Handle, fit_en: bool) -> Result<()>;
    fn ddlist_hor_fit(&self, ddlist: Handle) -> Result<bool>;

    fn ddlist_set_sb_mode(&mut self, ddlist: Handle, mode: SbMode) -> Result<()>;
    fn ddlist_sb_mode(&self, ddlist: Handle) -> Result<SbMode>;

    fn ddlist_set_anim_time(&mut self, ddlist: Handle, anim_time: u16) -> Result<()>;
    fn ddlist_anim_time(&self, ddlist: Handle) -> Result<u16>;

    fn ddlist_set_style(&mut self, ddlist: Handle, slot: DdlistStyle, style: Handle)
        -> Result<()>;
    fn ddlist_style(&self, ddlist: Handle, slot: DdlistStyle) -> Result<Handle>;

    /// Name of the script function to call when the selection changes
    fn ddlist_set_action(&mut self, ddlist: Handle, name: Option<String>) -> Result<()>;
    fn ddlist_action(&self, ddlist: Handle) -> Result<Option<String>>;
}
