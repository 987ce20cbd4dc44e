//! In-memory widget library
//!
//! `SimWidgets` keeps every object and style in an arena indexed by handle.
//! Handles are never reused, so a handle to a deleted object stays stale
//! instead of silently aliasing a newer object.

use std::fmt::Write as _;

use tracing::debug;

use crate::error::WidgetError;
use crate::handle::Handle;
use crate::library::{Result, WidgetLib};
use crate::types::{
    saturate_coord, Align, AnimKind, BtnAction, BtnState, BtnStyle, BuiltinStyle, Coord,
    DdlistStyle, Layout, NodeKind, ObjFlag, Protect, SbMode, StyleAnim, StyleProp,
};

/// Default display resolution
pub const DEFAULT_HOR_RES: Coord = 480;
pub const DEFAULT_VER_RES: Coord = 320;

const DEF_WIDTH: Coord = 200;
const DEF_HEIGHT: Coord = 66;
const BTN_DEF_WIDTH: Coord = 100;
const BTN_DEF_HEIGHT: Coord = 40;
const DDLIST_DEF_OPTIONS: &str = "Option 1\nOption 2\nOption 3";
const DDLIST_DEF_ANIM_TIME: u16 = 200;

/// A built-in animation started on an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjAnim {
    pub obj: Handle,
    pub anim: AnimKind,
    pub time: u16,
    pub delay: u16,
}

#[derive(Debug, Clone)]
struct Style {
    props: [i64; StyleProp::COUNT],
}

#[derive(Debug, Clone)]
struct BtnExt {
    toggle: bool,
    state: BtnState,
    actions: [Option<String>; BtnAction::COUNT],
    layout: Layout,
    hor_fit: bool,
    ver_fit: bool,
    styles: [Handle; BtnStyle::COUNT],
}

#[derive(Debug, Clone)]
struct DdlistExt {
    options: String,
    selected: u16,
    fix_height: Coord,
    hor_fit: bool,
    sb_mode: SbMode,
    anim_time: u16,
    styles: [Handle; DdlistStyle::COUNT],
    action: Option<String>,
}

impl DdlistExt {
    fn option_count(&self) -> u16 {
        self.options.split('\n').count().min(u16::MAX as usize) as u16
    }
}

#[derive(Debug, Clone)]
enum Ext {
    Base,
    Btn(BtnExt),
    Ddlist(DdlistExt),
}

#[derive(Debug, Clone)]
struct Obj {
    parent: Handle,
    children: Vec<Handle>,
    x: Coord,
    y: Coord,
    width: Coord,
    height: Coord,
    flags: [bool; ObjFlag::COUNT],
    protect: Protect,
    style: Handle,
    free_num: i64,
    free_ptr: Handle,
    ext: Ext,
}

impl Obj {
    fn new(parent: Handle, width: Coord, height: Coord, style: Handle) -> Self {
        let mut flags = [false; ObjFlag::COUNT];
        flags[ObjFlag::Click.index()] = true;
        Self {
            parent,
            children: Vec::new(),
            x: 0,
            y: 0,
            width,
            height,
            flags,
            protect: Protect::empty(),
            style,
            free_num: 0,
            free_ptr: Handle::NULL,
            ext: Ext::Base,
        }
    }

    fn kind(&self) -> NodeKind {
        match self.ext {
            Ext::Base => NodeKind::Object,
            Ext::Btn(_) => NodeKind::Button,
            Ext::Ddlist(_) => NodeKind::Dropdown,
        }
    }

    /// Take over the attributes of `src`; the parent and children stay
    fn copy_from(&mut self, src: &Obj) {
        self.x = src.x;
        self.y = src.y;
        self.width = src.width;
        self.height = src.height;
        self.flags = src.flags;
        self.protect = src.protect;
        self.style = src.style;
        self.free_num = src.free_num;
        self.free_ptr = src.free_ptr;
        if src.kind() == self.kind() {
            self.ext = src.ext.clone();
        }
    }
}

#[derive(Debug)]
enum Node {
    Obj(Obj),
    Style(Style),
}

impl Node {
    fn kind(&self) -> NodeKind {
        match self {
            Node::Obj(obj) => obj.kind(),
            Node::Style(_) => NodeKind::Style,
        }
    }
}

fn builtin_props(style: BuiltinStyle) -> [i64; StyleProp::COUNT] {
    use StyleProp::*;

    let mut p = [0i64; StyleProp::COUNT];
    let mut set = |prop: StyleProp, value: i64| p[prop.index()] = value;

    set(BodyMainColor, 0xFF_FFFF);
    set(BodyGradColor, 0xFF_FFFF);
    set(BodyOpa, 255);
    set(BodyBorderOpa, 255);
    set(BodyShadowColor, 0x80_8080);
    set(BodyPaddingHor, 10);
    set(BodyPaddingVer, 10);
    set(BodyPaddingInner, 8);
    set(TextColor, 0x30_3030);
    set(TextLetterSpace, 2);
    set(TextLineSpace, 2);
    set(TextOpa, 255);
    set(ImageColor, 0xF0_F0F0);
    set(ImageOpa, 255);
    set(LineWidth, 1);
    set(LineOpa, 255);

    match style {
        BuiltinStyle::Scr | BuiltinStyle::Plain => {}
        BuiltinStyle::Transp => set(BodyOpa, 0),
        BuiltinStyle::TranspFit => {
            set(BodyOpa, 0);
            set(BodyPaddingHor, 0);
            set(BodyPaddingVer, 0);
        }
        BuiltinStyle::TranspTight => {
            set(BodyOpa, 0);
            set(BodyPaddingHor, 0);
            set(BodyPaddingVer, 0);
            set(BodyPaddingInner, 0);
        }
        BuiltinStyle::PlainColor => {
            set(BodyMainColor, 0x55_96D8);
            set(BodyGradColor, 0x55_96D8);
            set(TextColor, 0xF0_F0F0);
        }
        BuiltinStyle::Pretty => {
            set(BodyGradColor, 0xC0_C0C0);
            set(BodyRadius, 16);
            set(BodyBorderColor, 0x40_4040);
            set(BodyBorderWidth, 2);
            set(BodyBorderOpa, 76);
        }
        BuiltinStyle::PrettyColor => {
            set(BodyMainColor, 0x6B_9AC7);
            set(BodyGradColor, 0x2B_598B);
            set(BodyRadius, 16);
            set(BodyBorderColor, 0x15_212A);
            set(BodyBorderWidth, 2);
            set(TextColor, 0xE0_E0E0);
        }
        BuiltinStyle::BtnRel
        | BuiltinStyle::BtnPr
        | BuiltinStyle::BtnTglRel
        | BuiltinStyle::BtnTglPr
        | BuiltinStyle::BtnIna => {
            let (main, grad, text) = match style {
                BuiltinStyle::BtnRel => (0x76_A2D0, 0x19_3A5D, 0xFF_FFFF),
                BuiltinStyle::BtnPr => (0x33_5F8A, 0x0B_1928, 0xBF_FFFF),
                BuiltinStyle::BtnTglRel => (0x0A_1929, 0x25_4A72, 0xFF_FFFF),
                BuiltinStyle::BtnTglPr => (0x33_5F8A, 0x0B_1928, 0xBF_FFFF),
                _ => (0xD8_D8D8, 0xD8_D8D8, 0x44_4444),
            };
            set(BodyMainColor, main);
            set(BodyGradColor, grad);
            set(TextColor, text);
            set(BodyRadius, 10);
            set(BodyBorderColor, 0x0B_1928);
            set(BodyBorderWidth, 2);
            set(BodyBorderOpa, 178);
        }
    }

    p
}

/// Pixel offset of an aligned object from the base object's origin
fn align_offset(align: Align, w: i32, h: i32, bw: i32, bh: i32) -> (i32, i32) {
    let mid_x = bw / 2 - w / 2;
    let mid_y = bh / 2 - h / 2;
    match align {
        Align::Center => (mid_x, mid_y),
        Align::InTopLeft => (0, 0),
        Align::InTopMid => (mid_x, 0),
        Align::InTopRight => (bw - w, 0),
        Align::InBottomLeft => (0, bh - h),
        Align::InBottomMid => (mid_x, bh - h),
        Align::InBottomRight => (bw - w, bh - h),
        Align::InLeftMid => (0, mid_y),
        Align::InRightMid => (bw - w, mid_y),
        Align::OutTopLeft => (0, -h),
        Align::OutTopMid => (mid_x, -h),
        Align::OutTopRight => (bw - w, -h),
        Align::OutBottomLeft => (0, bh),
        Align::OutBottomMid => (mid_x, bh),
        Align::OutBottomRight => (bw - w, bh),
        Align::OutLeftTop => (-w, 0),
        Align::OutLeftMid => (-w, mid_y),
        Align::OutLeftBottom => (-w, bh - h),
        Align::OutRightTop => (bw, 0),
        Align::OutRightMid => (bw, mid_y),
        Align::OutRightBottom => (bw, bh - h),
    }
}

/// Simulated widget library
pub struct SimWidgets {
    nodes: Vec<Option<Node>>,
    act_scr: Handle,
    builtin: Vec<Handle>,
    hor_res: Coord,
    ver_res: Coord,
    animations: Vec<ObjAnim>,
    style_anims: Vec<StyleAnim>,
}

impl SimWidgets {
    /// Create a library with one screen of the given resolution
    pub fn new(hor_res: Coord, ver_res: Coord) -> Self {
        let mut sim = Self {
            nodes: Vec::new(),
            act_scr: Handle::NULL,
            builtin: Vec::with_capacity(BuiltinStyle::ALL.len()),
            hor_res,
            ver_res,
            animations: Vec::new(),
            style_anims: Vec::new(),
        };

        for style in BuiltinStyle::ALL {
            let handle = sim.insert(Node::Style(Style {
                props: builtin_props(style),
            }));
            sim.builtin.push(handle);
        }

        let scr_style = sim.builtin_style(BuiltinStyle::Scr);
        sim.act_scr = sim.insert(Node::Obj(Obj::new(Handle::NULL, hor_res, ver_res, scr_style)));
        debug!(target: "widgets", "Simulated display {}x{}, screen {}", hor_res, ver_res, sim.act_scr);
        sim
    }

    pub fn hor_res(&self) -> Coord {
        self.hor_res
    }

    pub fn ver_res(&self) -> Coord {
        self.ver_res
    }

    /// Kind of the live node behind `handle`
    pub fn kind(&self, handle: Handle) -> Result<NodeKind> {
        self.node(handle).map(Node::kind)
    }

    pub fn children(&self, obj: Handle) -> Result<Vec<Handle>> {
        Ok(self.obj(obj)?.children.clone())
    }

    /// Number of live objects, screens included
    pub fn object_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Some(Node::Obj(_))))
            .count()
    }

    /// Animations started so far, oldest first
    pub fn animations(&self) -> &[ObjAnim] {
        &self.animations
    }

    pub fn style_anims(&self) -> &[StyleAnim] {
        &self.style_anims
    }

    /// Render the object tree of every screen, one object per line
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        let screens = self.nodes.iter().enumerate().filter_map(|(i, n)| match n {
            Some(Node::Obj(obj)) if obj.parent.is_null() => Some(Handle::from_raw(i + 1)),
            _ => None,
        });
        for scr in screens {
            self.dump_node(scr, 0, &mut out);
        }
        out
    }

    fn dump_node(&self, handle: Handle, depth: usize, out: &mut String) {
        let Ok(obj) = self.obj(handle) else {
            return;
        };
        let _ = write!(
            out,
            "{:indent$}{} {} x={} y={} w={} h={}",
            "",
            obj.kind(),
            handle,
            obj.x,
            obj.y,
            obj.width,
            obj.height,
            indent = depth * 2
        );
        if handle == self.act_scr {
            out.push_str(" (active)");
        }
        if obj.flags[ObjFlag::Hidden.index()] {
            out.push_str(" hidden");
        }
        out.push('\n');
        for child in &obj.children {
            self.dump_node(*child, depth + 1, out);
        }
    }

    fn insert(&mut self, node: Node) -> Handle {
        self.nodes.push(Some(node));
        Handle::from_raw(self.nodes.len())
    }

    fn node(&self, handle: Handle) -> Result<&Node> {
        if handle.is_null() {
            return Err(WidgetError::NullHandle);
        }
        self.nodes
            .get(handle.into_raw() - 1)
            .and_then(Option::as_ref)
            .ok_or(WidgetError::StaleHandle(handle))
    }

    fn node_mut(&mut self, handle: Handle) -> Result<&mut Node> {
        if handle.is_null() {
            return Err(WidgetError::NullHandle);
        }
        self.nodes
            .get_mut(handle.into_raw() - 1)
            .and_then(Option::as_mut)
            .ok_or(WidgetError::StaleHandle(handle))
    }

    fn obj(&self, handle: Handle) -> Result<&Obj> {
        match self.node(handle)? {
            Node::Obj(obj) => Ok(obj),
            Node::Style(_) => Err(WidgetError::WrongKind {
                handle,
                expected: NodeKind::Object,
                found: NodeKind::Style,
            }),
        }
    }

    fn obj_mut(&mut self, handle: Handle) -> Result<&mut Obj> {
        match self.node_mut(handle)? {
            Node::Obj(obj) => Ok(obj),
            Node::Style(_) => Err(WidgetError::WrongKind {
                handle,
                expected: NodeKind::Object,
                found: NodeKind::Style,
            }),
        }
    }

    fn style(&self, handle: Handle) -> Result<&Style> {
        match self.node(handle)? {
            Node::Style(style) => Ok(style),
            node => Err(WidgetError::WrongKind {
                handle,
                expected: NodeKind::Style,
                found: node.kind(),
            }),
        }
    }

    fn style_mut(&mut self, handle: Handle) -> Result<&mut Style> {
        match self.node_mut(handle)? {
            Node::Style(style) => Ok(style),
            node => Err(WidgetError::WrongKind {
                handle,
                expected: NodeKind::Style,
                found: node.kind(),
            }),
        }
    }

    /// Null handles are allowed, anything else must be a live style
    fn check_style_or_null(&self, handle: Handle) -> Result<()> {
        if handle.is_null() {
            return Ok(());
        }
        self.style(handle).map(|_| ())
    }

    fn btn(&self, handle: Handle) -> Result<&BtnExt> {
        let obj = self.obj(handle)?;
        match &obj.ext {
            Ext::Btn(btn) => Ok(btn),
            _ => Err(WidgetError::WrongKind {
                handle,
                expected: NodeKind::Button,
                found: obj.kind(),
            }),
        }
    }

    fn btn_mut(&mut self, handle: Handle) -> Result<&mut BtnExt> {
        let obj = self.obj_mut(handle)?;
        let found = obj.kind();
        match &mut obj.ext {
            Ext::Btn(btn) => Ok(btn),
            _ => Err(WidgetError::WrongKind {
                handle,
                expected: NodeKind::Button,
                found,
            }),
        }
    }

    fn ddlist(&self, handle: Handle) -> Result<&DdlistExt> {
        let obj = self.obj(handle)?;
        match &obj.ext {
            Ext::Ddlist(ddlist) => Ok(ddlist),
            _ => Err(WidgetError::WrongKind {
                handle,
                expected: NodeKind::Dropdown,
                found: obj.kind(),
            }),
        }
    }

    fn ddlist_mut(&mut self, handle: Handle) -> Result<&mut DdlistExt> {
        let obj = self.obj_mut(handle)?;
        let found = obj.kind();
        match &mut obj.ext {
            Ext::Ddlist(ddlist) => Ok(ddlist),
            _ => Err(WidgetError::WrongKind {
                handle,
                expected: NodeKind::Dropdown,
                found,
            }),
        }
    }

    /// Absolute position of an object on its screen
    fn abs_pos(&self, handle: Handle) -> Result<(i32, i32)> {
        let (mut x, mut y) = (0i32, 0i32);
        let mut cur = handle;
        while !cur.is_null() {
            let obj = self.obj(cur)?;
            x += obj.x as i32;
            y += obj.y as i32;
            cur = obj.parent;
        }
        Ok((x, y))
    }

    /// True if `ancestor` is `handle` or one of its parents
    fn is_ancestor(&self, ancestor: Handle, handle: Handle) -> Result<bool> {
        let mut cur = handle;
        while !cur.is_null() {
            if cur == ancestor {
                return Ok(true);
            }
            cur = self.obj(cur)?.parent;
        }
        Ok(false)
    }

    fn create(&mut self, parent: Option<Handle>, copy: Option<Handle>, ext: Ext) -> Result<Handle> {
        let mut obj = match parent {
            Some(parent) => {
                self.obj(parent)?;
                Obj::new(parent, DEF_WIDTH, DEF_HEIGHT, self.builtin_style(BuiltinStyle::Plain))
            }
            None => Obj::new(
                Handle::NULL,
                self.hor_res,
                self.ver_res,
                self.builtin_style(BuiltinStyle::Scr),
            ),
        };
        obj.ext = ext;
        match obj.ext {
            Ext::Base => {}
            Ext::Btn(_) => {
                obj.width = BTN_DEF_WIDTH;
                obj.height = BTN_DEF_HEIGHT;
                obj.style = self.builtin_style(BuiltinStyle::BtnRel);
            }
            Ext::Ddlist(_) => obj.style = self.builtin_style(BuiltinStyle::Pretty),
        }
        if let Some(copy) = copy {
            obj.copy_from(self.obj(copy)?);
        }

        let kind = obj.kind();
        let handle = self.insert(Node::Obj(obj));
        if let Some(parent) = parent {
            self.obj_mut(parent)?.children.push(handle);
        }
        debug!(
            target: "widgets",
            "Created {} {} (parent: {}, copy: {})",
            kind,
            handle,
            parent.unwrap_or_default(),
            copy.unwrap_or_default()
        );
        Ok(handle)
    }

    fn btn_ext(&self) -> BtnExt {
        BtnExt {
            toggle: false,
            state: BtnState::Rel,
            actions: Default::default(),
            layout: Layout::Center,
            hor_fit: false,
            ver_fit: false,
            styles: [
                self.builtin_style(BuiltinStyle::BtnRel),
                self.builtin_style(BuiltinStyle::BtnPr),
                self.builtin_style(BuiltinStyle::BtnTglRel),
                self.builtin_style(BuiltinStyle::BtnTglPr),
                self.builtin_style(BuiltinStyle::BtnIna),
            ],
        }
    }

    fn ddlist_ext(&self) -> DdlistExt {
        DdlistExt {
            options: DDLIST_DEF_OPTIONS.to_string(),
            selected: 0,
            fix_height: 0,
            hor_fit: true,
            sb_mode: SbMode::Off,
            anim_time: DDLIST_DEF_ANIM_TIME,
            styles: [
                self.builtin_style(BuiltinStyle::Pretty),
                self.builtin_style(BuiltinStyle::PlainColor),
                self.builtin_style(BuiltinStyle::PrettyColor),
            ],
            action: None,
        }
    }
}

impl Default for SimWidgets {
    fn default() -> Self {
        Self::new(DEFAULT_HOR_RES, DEFAULT_VER_RES)
    }
}

impl WidgetLib for SimWidgets {
    fn scr_act(&self) -> Handle {
        self.act_scr
    }

    fn scr_load(&mut self, scr: Handle) -> Result<()> {
        if !self.obj(scr)?.parent.is_null() {
            return Err(WidgetError::NotAScreen(scr));
        }
        self.act_scr = scr;
        Ok(())
    }

    fn builtin_style(&self, style: BuiltinStyle) -> Handle {
        // `builtin` is filled in `ALL` order before anything can ask for it
        BuiltinStyle::ALL
            .iter()
            .position(|s| *s == style)
            .and_then(|i| self.builtin.get(i).copied())
            .unwrap_or_default()
    }

    fn obj_create(&mut self, parent: Option<Handle>, copy: Option<Handle>) -> Result<Handle> {
        self.create(parent, copy, Ext::Base)
    }

    fn obj_del(&mut self, obj: Handle) -> Result<()> {
        let parent = self.obj(obj)?.parent;
        // The active screen may have been moved below `obj`
        if self.is_ancestor(obj, self.act_scr)? {
            return Err(WidgetError::ActiveScreen(self.act_scr));
        }
        if !parent.is_null() {
            self.obj_mut(parent)?.children.retain(|c| *c != obj);
        }

        let mut pending = vec![obj];
        let mut deleted = 0usize;
        while let Some(handle) = pending.pop() {
            if let Some(slot) = self.nodes.get_mut(handle.into_raw() - 1) {
                if let Some(Node::Obj(removed)) = slot.take() {
                    pending.extend(removed.children);
                    deleted += 1;
                }
            }
        }
        debug!(target: "widgets", "Deleted {} ({} objects)", obj, deleted);
        Ok(())
    }

    fn obj_set_parent(&mut self, obj: Handle, parent: Handle) -> Result<()> {
        self.obj(parent)?;
        let old_parent = self.obj(obj)?.parent;
        if self.is_ancestor(obj, parent)? {
            return Err(WidgetError::InvalidParent { obj, parent });
        }
        if old_parent == parent {
            return Ok(());
        }
        if !old_parent.is_null() {
            self.obj_mut(old_parent)?.children.retain(|c| *c != obj);
        }
        self.obj_mut(parent)?.children.push(obj);
        self.obj_mut(obj)?.parent = parent;
        Ok(())
    }

    fn obj_parent(&self, obj: Handle) -> Result<Handle> {
        Ok(self.obj(obj)?.parent)
    }

    fn obj_set_x(&mut self, obj: Handle, x: Coord) -> Result<()> {
        self.obj_mut(obj)?.x = x;
        Ok(())
    }

    fn obj_set_y(&mut self, obj: Handle, y: Coord) -> Result<()> {
        self.obj_mut(obj)?.y = y;
        Ok(())
    }

    fn obj_set_width(&mut self, obj: Handle, w: Coord) -> Result<()> {
        self.obj_mut(obj)?.width = w;
        Ok(())
    }

    fn obj_set_height(&mut self, obj: Handle, h: Coord) -> Result<()> {
        self.obj_mut(obj)?.height = h;
        Ok(())
    }

    fn obj_x(&self, obj: Handle) -> Result<Coord> {
        Ok(self.obj(obj)?.x)
    }

    fn obj_y(&self, obj: Handle) -> Result<Coord> {
        Ok(self.obj(obj)?.y)
    }

    fn obj_width(&self, obj: Handle) -> Result<Coord> {
        Ok(self.obj(obj)?.width)
    }

    fn obj_height(&self, obj: Handle) -> Result<Coord> {
        Ok(self.obj(obj)?.height)
    }

    fn obj_set_flag(&mut self, obj: Handle, flag: ObjFlag, en: bool) -> Result<()> {
        self.obj_mut(obj)?.flags[flag.index()] = en;
        Ok(())
    }

    fn obj_flag(&self, obj: Handle, flag: ObjFlag) -> Result<bool> {
        Ok(self.obj(obj)?.flags[flag.index()])
    }

    fn obj_set_style(&mut self, obj: Handle, style: Handle) -> Result<()> {
        self.style(style)?;
        self.obj_mut(obj)?.style = style;
        Ok(())
    }

    fn obj_style(&self, obj: Handle) -> Result<Handle> {
        Ok(self.obj(obj)?.style)
    }

    fn obj_set_protect(&mut self, obj: Handle, prot: Protect) -> Result<()> {
        self.obj_mut(obj)?.protect = prot;
        Ok(())
    }

    fn obj_protect(&self, obj: Handle) -> Result<Protect> {
        Ok(self.obj(obj)?.protect)
    }

    fn obj_set_free_num(&mut self, obj: Handle, num: i64) -> Result<()> {
        self.obj_mut(obj)?.free_num = num;
        Ok(())
    }

    fn obj_free_num(&self, obj: Handle) -> Result<i64> {
        Ok(self.obj(obj)?.free_num)
    }

    fn obj_set_free_ptr(&mut self, obj: Handle, ptr: Handle) -> Result<()> {
        self.obj_mut(obj)?.free_ptr = ptr;
        Ok(())
    }

    fn obj_free_ptr(&self, obj: Handle) -> Result<Handle> {
        Ok(self.obj(obj)?.free_ptr)
    }

    fn obj_align(
        &mut self,
        obj: Handle,
        base: Option<Handle>,
        align: Align,
        x_mod: Coord,
        y_mod: Coord,
    ) -> Result<()> {
        let target = self.obj(obj)?;
        let parent = target.parent;
        let (w, h) = (target.width as i32, target.height as i32);

        let base = base.unwrap_or(parent);
        let (bx, by, bw, bh) = if base.is_null() {
            (0, 0, self.hor_res as i32, self.ver_res as i32)
        } else {
            let b = self.obj(base)?;
            let (bw, bh) = (b.width as i32, b.height as i32);
            let (bx, by) = self.abs_pos(base)?;
            (bx, by, bw, bh)
        };
        let (px, py) = self.abs_pos(parent)?;
        let (dx, dy) = align_offset(align, w, h, bw, bh);

        let x = bx + dx + x_mod as i32 - px;
        let y = by + dy + y_mod as i32 - py;
        let target = self.obj_mut(obj)?;
        target.x = saturate_coord(x as i64);
        target.y = saturate_coord(y as i64);
        Ok(())
    }

    fn obj_animate(&mut self, obj: Handle, anim: AnimKind, time: u16, delay: u16) -> Result<()> {
        self.obj(obj)?;
        debug!(target: "widgets", "Animating {} with {:?} ({}ms after {}ms)", obj, anim, time, delay);
        self.animations.push(ObjAnim {
            obj,
            anim,
            time,
            delay,
        });
        Ok(())
    }

    fn style_alloc(&mut self, copy: Option<Handle>) -> Result<Handle> {
        let src = copy.unwrap_or_else(|| self.builtin_style(BuiltinStyle::Plain));
        let props = self.style(src)?.props;
        let handle = self.insert(Node::Style(Style { props }));
        debug!(target: "widgets", "Allocated style {} from {}", handle, src);
        Ok(handle)
    }

    fn style_copy(&mut self, dest: Handle, src: Handle) -> Result<()> {
        let props = self.style(src)?.props;
        self.style_mut(dest)?.props = props;
        Ok(())
    }

    fn style_set(&mut self, style: Handle, prop: StyleProp, value: i64) -> Result<()> {
        self.style_mut(style)?.props[prop.index()] = prop.clamp(value);
        Ok(())
    }

    fn style_get(&self, style: Handle, prop: StyleProp) -> Result<i64> {
        Ok(self.style(style)?.props[prop.index()])
    }

    fn style_anim_create(&mut self, anim: StyleAnim) -> Result<()> {
        self.style(anim.style)?;
        self.check_style_or_null(anim.style_start)?;
        self.check_style_or_null(anim.style_end)?;
        debug!(target: "widgets", "Style animation on {} ({}ms)", anim.style, anim.time);
        self.style_anims.push(anim);
        Ok(())
    }

    fn btn_create(&mut self, parent: Option<Handle>, copy: Option<Handle>) -> Result<Handle> {
        let ext = self.btn_ext();
        self.create(parent, copy, Ext::Btn(ext))
    }

    fn btn_set_toggle(&mut self, btn: Handle, tgl: bool) -> Result<()> {
        self.btn_mut(btn)?.toggle = tgl;
        Ok(())
    }

    fn btn_toggle(&self, btn: Handle) -> Result<bool> {
        Ok(self.btn(btn)?.toggle)
    }

    fn btn_set_state(&mut self, btn: Handle, state: BtnState) -> Result<()> {
        let ext = self.btn_mut(btn)?;
        ext.state = state;
        let style = ext.styles[state as usize];
        self.obj_mut(btn)?.style = style;
        Ok(())
    }

    fn btn_state(&self, btn: Handle) -> Result<BtnState> {
        Ok(self.btn(btn)?.state)
    }

    fn btn_set_action(
        &mut self,
        btn: Handle,
        action: BtnAction,
        name: Option<String>,
    ) -> Result<()> {
        self.btn_mut(btn)?.actions[action as usize] = name;
        Ok(())
    }

    fn btn_action(&self, btn: Handle, action: BtnAction) -> Result<Option<String>> {
        Ok(self.btn(btn)?.actions[action as usize].clone())
    }

    fn btn_set_layout(&mut self, btn: Handle, layout: Layout) -> Result<()> {
        self.btn_mut(btn)?.layout = layout;
        Ok(())
    }

    fn btn_layout(&self, btn: Handle) -> Result<Layout> {
        Ok(self.btn(btn)?.layout)
    }

    fn btn_set_fit(&mut self, btn: Handle, hor_en: bool, ver_en: bool) -> Result<()> {
        let ext = self.btn_mut(btn)?;
        ext.hor_fit = hor_en;
        ext.ver_fit = ver_en;
        Ok(())
    }

    fn btn_hor_fit(&self, btn: Handle) -> Result<bool> {
        Ok(self.btn(btn)?.hor_fit)
    }

    fn btn_ver_fit(&self, btn: Handle) -> Result<bool> {
        Ok(self.btn(btn)?.ver_fit)
    }

    fn btn_set_style(&mut self, btn: Handle, slot: BtnStyle, style: Handle) -> Result<()> {
        self.style(style)?;
        self.btn_mut(btn)?.styles[slot as usize] = style;
        // The object's own style follows the current state's slot
        let obj = self.obj_mut(btn)?;
        if let Ext::Btn(ext) = &obj.ext {
            if ext.state as u8 == slot as u8 {
                obj.style = style;
            }
        }
        Ok(())
    }

    fn btn_style(&self, btn: Handle, slot: BtnStyle) -> Result<Handle> {
        Ok(self.btn(btn)?.styles[slot as usize])
    }

    fn ddlist_create(&mut self, parent: Option<Handle>, copy: Option<Handle>) -> Result<Handle> {
        let ext = self.ddlist_ext();
        self.create(parent, copy, Ext::Ddlist(ext))
    }

    fn ddlist_set_options(&mut self, ddlist: Handle, options: &str) -> Result<()> {
        let ext = self.ddlist_mut(ddlist)?;
        ext.options = options.to_string();
        if ext.selected >= ext.option_count() {
            ext.selected = 0;
        }
        Ok(())
    }

    fn ddlist_options(&self, ddlist: Handle) -> Result<String> {
        Ok(self.ddlist(ddlist)?.options.clone())
    }

    fn ddlist_set_selected(&mut self, ddlist: Handle, sel: u16) -> Result<()> {
        let ext = self.ddlist_mut(ddlist)?;
        ext.selected = sel.min(ext.option_count().saturating_sub(1));
        Ok(())
    }

    fn ddlist_selected(&self, ddlist: Handle) -> Result<u16> {
        Ok(self.ddlist(ddlist)?.selected)
    }

    fn ddlist_selected_str(&self, ddlist: Handle) -> Result<String> {
        let ext = self.ddlist(ddlist)?;
        Ok(ext
            .options
            .split('\n')
            .nth(ext.selected as usize)
            .unwrap_or_default()
            .to_string())
    }

    fn ddlist_set_fix_height(&mut self, ddlist: Handle, h: Coord) -> Result<()> {
        self.ddlist_mut(ddlist)?.fix_height = h;
        Ok(())
    }

    fn ddlist_fix_height(&self, ddlist: Handle) -> Result<Coord> {
        Ok(self.ddlist(ddlist)?.fix_height)
    }

    fn ddlist_set_hor_fit(&mut self, ddlist: Handle, fit_en: bool) -> Result<()> {
        self.ddlist_mut(ddlist)?.hor_fit = fit_en;
        Ok(())
    }

    fn ddlist_hor_fit(&self, ddlist: Handle) -> Result<bool> {
        Ok(self.ddlist(ddlist)?.hor_fit)
    }

    fn ddlist_set_sb_mode(&mut self, ddlist: Handle, mode: SbMode) -> Result<()> {
        self.ddlist_mut(ddlist)?.sb_mode = mode;
        Ok(())
    }

    fn ddlist_sb_mode(&self, ddlist: Handle) -> Result<SbMode> {
        Ok(self.ddlist(ddlist)?.sb_mode)
    }

    fn ddlist_set_anim_time(&mut self, ddlist: Handle, anim_time: u16) -> Result<()> {
        self.ddlist_mut(ddlist)?.anim_time = anim_time;
        Ok(())
    }

    fn ddlist_anim_time(&self, ddlist: Handle) -> Result<u16> {
        Ok(self.ddlist(ddlist)?.anim_time)
    }

    fn ddlist_set_style(&mut self, ddlist: Handle, slot: DdlistStyle, style: Handle) -> Result<()> {
        self.style(style)?;
        self.ddlist_mut(ddlist)?.styles[slot as usize] = style;
        if slot == DdlistStyle::Bg {
            self.obj_mut(ddlist)?.style = style;
        }
        Ok(())
    }

    fn ddlist_style(&self, ddlist: Handle, slot: DdlistStyle) -> Result<Handle> {
        Ok(self.ddlist(ddlist)?.styles[slot as usize])
    }

    fn ddlist_set_action(&mut self, ddlist: Handle, name: Option<String>) -> Result<()> {
        self.ddlist_mut(ddlist)?.action = name;
        Ok(())
    }

    fn ddlist_action(&self, ddlist: Handle) -> Result<Option<String>> {
        Ok(self.ddlist(ddlist)?.action.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_screen_and_builtin_styles() {
        let sim = SimWidgets::default();
        let scr = sim.scr_act();
        assert_eq!(sim.kind(scr), Ok(NodeKind::Object));
        assert_eq!(sim.obj_parent(scr), Ok(Handle::NULL));
        assert_eq!(sim.obj_width(scr), Ok(DEFAULT_HOR_RES));
        assert_eq!(sim.object_count(), 1);

        for style in BuiltinStyle::ALL {
            assert_eq!(sim.kind(sim.builtin_style(style)), Ok(NodeKind::Style));
        }
        assert_eq!(sim.obj_style(scr), Ok(sim.builtin_style(BuiltinStyle::Scr)));
    }

    #[test]
    fn test_create_with_parent_and_copy() {
        let mut sim = SimWidgets::default();
        let scr = sim.scr_act();
        let a = sim.obj_create(Some(scr), None).unwrap();
        sim.obj_set_width(a, 123).unwrap();
        sim.obj_set_flag(a, ObjFlag::Drag, true).unwrap();

        let b = sim.obj_create(Some(a), Some(a)).unwrap();
        assert_eq!(sim.obj_parent(b), Ok(a));
        assert_eq!(sim.obj_width(b), Ok(123));
        assert_eq!(sim.obj_flag(b, ObjFlag::Drag), Ok(true));
        assert_eq!(sim.children(a), Ok(vec![b]));
    }

    #[test]
    fn test_null_parent_creates_screen() {
        let mut sim = SimWidgets::new(320, 240);
        let scr = sim.obj_create(None, None).unwrap();
        assert_eq!(sim.obj_parent(scr), Ok(Handle::NULL));
        assert_eq!(sim.obj_height(scr), Ok(240));
        sim.scr_load(scr).unwrap();
        assert_eq!(sim.scr_act(), scr);
    }

    #[test]
    fn test_delete_is_recursive_and_handles_go_stale() {
        let mut sim = SimWidgets::default();
        let scr = sim.scr_act();
        let a = sim.obj_create(Some(scr), None).unwrap();
        let b = sim.btn_create(Some(a), None).unwrap();

        sim.obj_del(a).unwrap();
        assert_eq!(sim.obj_x(a), Err(WidgetError::StaleHandle(a)));
        assert_eq!(sim.obj_x(b), Err(WidgetError::StaleHandle(b)));
        assert!(sim.children(scr).unwrap().is_empty());
        assert_eq!(sim.obj_del(scr), Err(WidgetError::ActiveScreen(scr)));
    }

    #[test]
    fn test_delete_refuses_subtree_holding_active_screen() {
        let mut sim = SimWidgets::default();
        let scr = sim.scr_act();
        let other = sim.obj_create(None, None).unwrap();
        sim.obj_set_parent(scr, other).unwrap();

        assert_eq!(sim.obj_del(other), Err(WidgetError::ActiveScreen(scr)));
        assert_eq!(sim.obj_parent(scr), Ok(other));
        assert!(sim.obj_create(Some(sim.scr_act()), None).is_ok());
    }

    #[test]
    fn test_wrong_kind_is_reported() {
        let mut sim = SimWidgets::default();
        let scr = sim.scr_act();
        let obj = sim.obj_create(Some(scr), None).unwrap();
        assert_eq!(
            sim.btn_set_toggle(obj, true),
            Err(WidgetError::WrongKind {
                handle: obj,
                expected: NodeKind::Button,
                found: NodeKind::Object,
            })
        );

        let style = sim.builtin_style(BuiltinStyle::Plain);
        assert!(matches!(sim.obj_x(style), Err(WidgetError::WrongKind { .. })));
        assert_eq!(sim.obj_x(Handle::NULL), Err(WidgetError::NullHandle));
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let mut sim = SimWidgets::default();
        let scr = sim.scr_act();
        let a = sim.obj_create(Some(scr), None).unwrap();
        let b = sim.obj_create(Some(a), None).unwrap();
        assert_eq!(
            sim.obj_set_parent(a, b),
            Err(WidgetError::InvalidParent { obj: a, parent: b })
        );

        let c = sim.obj_create(Some(scr), None).unwrap();
        sim.obj_set_parent(b, c).unwrap();
        assert_eq!(sim.obj_parent(b), Ok(c));
        assert!(sim.children(a).unwrap().is_empty());
        assert_eq!(sim.children(c), Ok(vec![b]));
    }

    #[test]
    fn test_align_inside_and_outside() {
        let mut sim = SimWidgets::new(480, 320);
        let scr = sim.scr_act();
        let obj = sim.obj_create(Some(scr), None).unwrap();
        sim.obj_set_width(obj, 100).unwrap();
        sim.obj_set_height(obj, 50).unwrap();

        sim.obj_align(obj, None, Align::Center, 0, 0).unwrap();
        assert_eq!((sim.obj_x(obj), sim.obj_y(obj)), (Ok(190), Ok(135)));

        sim.obj_align(obj, None, Align::InBottomRight, -10, -5).unwrap();
        assert_eq!((sim.obj_x(obj), sim.obj_y(obj)), (Ok(370), Ok(265)));

        let other = sim.obj_create(Some(scr), None).unwrap();
        sim.obj_set_x(other, 20).unwrap();
        sim.obj_set_y(other, 30).unwrap();
        sim.obj_align(other, Some(obj), Align::OutBottomLeft, 0, 4).unwrap();
        assert_eq!((sim.obj_x(other), sim.obj_y(other)), (Ok(370), Ok(319)));
    }

    #[test]
    fn test_style_alloc_copy_and_clamp() {
        let mut sim = SimWidgets::default();
        let pretty = sim.builtin_style(BuiltinStyle::Pretty);
        let style = sim.style_alloc(Some(pretty)).unwrap();
        assert_eq!(sim.style_get(style, StyleProp::BodyRadius), Ok(16));

        sim.style_set(style, StyleProp::BodyOpa, 1000).unwrap();
        assert_eq!(sim.style_get(style, StyleProp::BodyOpa), Ok(255));
        // The built-in style is untouched
        assert_eq!(sim.style_get(pretty, StyleProp::BodyOpa), Ok(255));

        let plain = sim.style_alloc(None).unwrap();
        sim.style_copy(plain, style).unwrap();
        assert_eq!(sim.style_get(plain, StyleProp::BodyRadius), Ok(16));
    }

    #[test]
    fn test_btn_defaults_and_style_slots() {
        let mut sim = SimWidgets::default();
        let scr = sim.scr_act();
        let btn = sim.btn_create(Some(scr), None).unwrap();
        assert_eq!(sim.btn_state(btn), Ok(BtnState::Rel));
        assert_eq!(sim.btn_layout(btn), Ok(Layout::Center));

        let style = sim.style_alloc(None).unwrap();
        sim.btn_set_style(btn, BtnStyle::Pr, style).unwrap();
        assert_eq!(sim.btn_style(btn, BtnStyle::Pr), Ok(style));
        assert_eq!(
            sim.btn_style(btn, BtnStyle::Rel),
            Ok(sim.builtin_style(BuiltinStyle::BtnRel))
        );
        assert_eq!(sim.obj_style(btn), Ok(sim.builtin_style(BuiltinStyle::BtnRel)));

        sim.btn_set_state(btn, BtnState::Pr).unwrap();
        assert_eq!(sim.obj_style(btn), Ok(style));
        sim.btn_set_state(btn, BtnState::Ina).unwrap();
        assert_eq!(sim.obj_style(btn), Ok(sim.builtin_style(BuiltinStyle::BtnIna)));
    }

    #[test]
    fn test_ddlist_selection_is_clamped() {
        let mut sim = SimWidgets::default();
        let scr = sim.scr_act();
        let dd = sim.ddlist_create(Some(scr), None).unwrap();
        sim.ddlist_set_options(dd, "Apple\nBanana").unwrap();
        sim.ddlist_set_selected(dd, 1).unwrap();
        assert_eq!(sim.ddlist_selected_str(dd), Ok("Banana".to_string()));

        sim.ddlist_set_selected(dd, 9).unwrap();
        assert_eq!(sim.ddlist_selected(dd), Ok(1));

        sim.ddlist_set_options(dd, "Only").unwrap();
        assert_eq!(sim.ddlist_selected(dd), Ok(0));
    }

    #[test]
    fn test_dump_tree() {
        let mut sim = SimWidgets::new(100, 100);
        let scr = sim.scr_act();
        let btn = sim.btn_create(Some(scr), None).unwrap();
        sim.obj_set_flag(btn, ObjFlag::Hidden, true).unwrap();

        let dump = sim.dump_tree();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("object "));
        assert!(lines[0].ends_with("(active)"));
        assert!(lines[1].starts_with("  button "));
        assert!(lines[1].ends_with("hidden"));
    }
}
