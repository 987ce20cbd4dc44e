use bitflags::bitflags;
use strum_macros::{Display, FromRepr, IntoStaticStr};

use crate::handle::Handle;

/// Native coordinate type
pub type Coord = i16;

/// Saturate a scripting-side integer into the coordinate range
pub fn saturate_coord(value: i64) -> Coord {
    value.clamp(Coord::MIN as i64, Coord::MAX as i64) as Coord
}

/// An integer enumeration exposed to scripts as named constants
///
/// `PREFIX` plus the variant's static name gives the global, e.g.
/// `LV_ALIGN_` + `IN_TOP_LEFT`.
pub trait Constants: Copy + Into<&'static str> + 'static {
    const PREFIX: &'static str;
    const ALL: &'static [Self];

    fn value(self) -> i64;

    /// All `(global name, value)` pairs of this enumeration
    fn constants() -> Vec<(String, i64)> {
        Self::ALL
            .iter()
            .map(|v| {
                let name: &'static str = (*v).into();
                (format!("{}{}", Self::PREFIX, name), v.value())
            })
            .collect()
    }
}

macro_rules! int_enum {
    ($ty:ty, $prefix:literal, [$($variant:ident),+ $(,)?]) => {
        impl Constants for $ty {
            const PREFIX: &'static str = $prefix;
            const ALL: &'static [Self] = &[$(<$ty>::$variant),+];

            fn value(self) -> i64 {
                self as u8 as i64
            }
        }

        impl $ty {
            /// Convert a scripting-side integer, `None` when out of range
            pub fn from_int(value: i64) -> Option<Self> {
                u8::try_from(value).ok().and_then(Self::from_repr)
            }
        }
    };
}

/// Kind of node behind a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    Object,
    Button,
    Dropdown,
    Style,
}

/// Alignment of an object relative to a base object
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Align {
    Center = 0,
    InTopLeft,
    InTopMid,
    InTopRight,
    InBottomLeft,
    InBottomMid,
    InBottomRight,
    InLeftMid,
    InRightMid,
    OutTopLeft,
    OutTopMid,
    OutTopRight,
    OutBottomLeft,
    OutBottomMid,
    OutBottomRight,
    OutLeftTop,
    OutLeftMid,
    OutLeftBottom,
    OutRightTop,
    OutRightMid,
    OutRightBottom,
}

int_enum!(
    Align,
    "LV_ALIGN_",
    [
        Center,
        InTopLeft,
        InTopMid,
        InTopRight,
        InBottomLeft,
        InBottomMid,
        InBottomRight,
        InLeftMid,
        InRightMid,
        OutTopLeft,
        OutTopMid,
        OutTopRight,
        OutBottomLeft,
        OutBottomMid,
        OutBottomRight,
        OutLeftTop,
        OutLeftMid,
        OutLeftBottom,
        OutRightTop,
        OutRightMid,
        OutRightBottom,
    ]
);

bitflags! {
    /// Protection flags of an object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Protect: u8 {
        const CHILD_CHG = 0x01;
        const PARENT = 0x02;
        const POS = 0x04;
        const FOLLOW = 0x08;
        const PRESS_LOST = 0x10;
    }
}

impl Protect {
    /// All `(global name, value)` pairs, `LV_PROTECT_NONE` first
    pub fn constants() -> Vec<(String, i64)> {
        std::iter::once(("LV_PROTECT_NONE".to_string(), 0))
            .chain(
                Protect::all()
                    .iter_names()
                    .map(|(name, flag)| (format!("LV_PROTECT_{}", name), flag.bits() as i64)),
            )
            .collect()
    }
}

/// Built-in object animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum AnimKind {
    None = 0,
    FloatTop,
    FloatLeft,
    FloatBottom,
    FloatRight,
    GrowH,
    GrowV,
}

int_enum!(
    AnimKind,
    "LV_ANIM_",
    [None, FloatTop, FloatLeft, FloatBottom, FloatRight, GrowH, GrowV]
);

/// Boolean attributes shared by every object
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ObjFlag {
    Hidden,
    Click,
    Top,
    Drag,
    DragThrow,
    DragParent,
}

impl ObjFlag {
    pub const COUNT: usize = 6;

    pub const ALL: [ObjFlag; ObjFlag::COUNT] = [
        ObjFlag::Hidden,
        ObjFlag::Click,
        ObjFlag::Top,
        ObjFlag::Drag,
        ObjFlag::DragThrow,
        ObjFlag::DragParent,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum BtnState {
    Rel = 0,
    Pr,
    TglRel,
    TglPr,
    Ina,
}

int_enum!(BtnState, "LV_BTN_STATE_", [Rel, Pr, TglRel, TglPr, Ina]);

/// Style slots of a button, one per state
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum BtnStyle {
    Rel = 0,
    Pr,
    TglRel,
    TglPr,
    Ina,
}

int_enum!(BtnStyle, "LV_BTN_STYLE_", [Rel, Pr, TglRel, TglPr, Ina]);

impl BtnStyle {
    pub const COUNT: usize = 5;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum BtnAction {
    Click = 0,
    Pr,
    LongPr,
    LongPrRepeat,
}

int_enum!(BtnAction, "LV_BTN_ACTION_", [Click, Pr, LongPr, LongPrRepeat]);

impl BtnAction {
    pub const COUNT: usize = 4;
}

/// Child layout of a container object
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Layout {
    Off = 0,
    Center,
    ColL,
    ColM,
    ColR,
    RowT,
    RowM,
    RowB,
    Pretty,
    Grid,
}

int_enum!(
    Layout,
    "LV_LAYOUT_",
    [Off, Center, ColL, ColM, ColR, RowT, RowM, RowB, Pretty, Grid]
);

/// Scrollbar visibility mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum SbMode {
    Off = 0,
    On,
    Drag,
    Auto,
}

int_enum!(SbMode, "LV_SB_MODE_", [Off, On, Drag, Auto]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum DdlistStyle {
    Bg = 0,
    Sel,
    Sb,
}

int_enum!(DdlistStyle, "LV_DDLIST_STYLE_", [Bg, Sel, Sb]);

impl DdlistStyle {
    pub const COUNT: usize = 3;
}

/// Scalar properties of a style
///
/// Colors are `0xRRGGBB`, opacities `0..=255`, everything else is a
/// coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum StyleProp {
    BodyMainColor = 0,
    BodyGradColor,
    BodyRadius,
    BodyOpa,
    BodyBorderColor,
    BodyBorderWidth,
    BodyBorderOpa,
    BodyShadowColor,
    BodyShadowWidth,
    BodyPaddingHor,
    BodyPaddingVer,
    BodyPaddingInner,
    TextColor,
    TextLetterSpace,
    TextLineSpace,
    TextOpa,
    ImageColor,
    ImageIntense,
    ImageOpa,
    LineColor,
    LineWidth,
    LineOpa,
}

impl StyleProp {
    pub const COUNT: usize = 22;

    /// Field name used by scripts, e.g. `body_border_width`
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Bring a value into the range the native property can hold
    pub fn clamp(self, value: i64) -> i64 {
        use StyleProp::*;
        match self {
            BodyMainColor | BodyGradColor | BodyBorderColor | BodyShadowColor | TextColor
            | ImageColor | LineColor => value.clamp(0, 0xFF_FFFF),
            BodyOpa | BodyBorderOpa | TextOpa | ImageOpa | LineOpa | ImageIntense => {
                value.clamp(0, 255)
            }
            _ => saturate_coord(value) as i64,
        }
    }
}

/// Styles that exist for the whole lifetime of the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinStyle {
    Scr,
    Transp,
    TranspFit,
    TranspTight,
    Plain,
    PlainColor,
    Pretty,
    PrettyColor,
    BtnRel,
    BtnPr,
    BtnTglRel,
    BtnTglPr,
    BtnIna,
}

impl BuiltinStyle {
    pub const ALL: [BuiltinStyle; 13] = [
        BuiltinStyle::Scr,
        BuiltinStyle::Transp,
        BuiltinStyle::TranspFit,
        BuiltinStyle::TranspTight,
        BuiltinStyle::Plain,
        BuiltinStyle::PlainColor,
        BuiltinStyle::Pretty,
        BuiltinStyle::PrettyColor,
        BuiltinStyle::BtnRel,
        BuiltinStyle::BtnPr,
        BuiltinStyle::BtnTglRel,
        BuiltinStyle::BtnTglPr,
        BuiltinStyle::BtnIna,
    ];

    /// Global name the style pointer is published under, e.g. `lv_style_btn_rel`
    pub fn global_name(self) -> String {
        let name: &'static str = self.into();
        format!("lv_style_{}", name)
    }
}

/// Descriptor of a style animation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleAnim {
    /// Style being animated
    pub style: Handle,
    pub style_start: Handle,
    pub style_end: Handle,
    /// Duration in milliseconds
    pub time: u16,
    /// Negative values delay the start
    pub act_time: i16,
    pub playback: bool,
    pub playback_pause: u16,
    pub repeat: bool,
    pub repeat_pause: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_names() {
        let align = Align::constants();
        assert_eq!(align.len(), 21);
        assert_eq!(align[0], ("LV_ALIGN_CENTER".to_string(), 0));
        assert!(align.contains(&("LV_ALIGN_OUT_RIGHT_BOTTOM".to_string(), 20)));

        let states = BtnState::constants();
        assert!(states.contains(&("LV_BTN_STATE_TGL_PR".to_string(), 3)));

        let actions = BtnAction::constants();
        assert!(actions.contains(&("LV_BTN_ACTION_LONG_PR_REPEAT".to_string(), 3)));

        let anims = AnimKind::constants();
        assert!(anims.contains(&("LV_ANIM_GROW_H".to_string(), 5)));
    }

    #[test]
    fn test_protect_constants() {
        let protect = Protect::constants();
        assert_eq!(protect[0], ("LV_PROTECT_NONE".to_string(), 0));
        assert!(protect.contains(&("LV_PROTECT_CHILD_CHG".to_string(), 0x01)));
        assert!(protect.contains(&("LV_PROTECT_FOLLOW".to_string(), 0x08)));
    }

    #[test]
    fn test_from_int_range() {
        assert_eq!(Layout::from_int(8), Some(Layout::Pretty));
        assert_eq!(Layout::from_int(10), None);
        assert_eq!(SbMode::from_int(-1), None);
        assert_eq!(BtnState::from_int(4), Some(BtnState::Ina));
    }

    #[test]
    fn test_style_prop_names_and_clamp() {
        assert_eq!(StyleProp::BodyBorderWidth.name(), "body_border_width");
        assert_eq!(StyleProp::from_repr(21), Some(StyleProp::LineOpa));
        assert_eq!(StyleProp::BodyOpa.clamp(300), 255);
        assert_eq!(StyleProp::TextColor.clamp(-5), 0);
        assert_eq!(StyleProp::BodyRadius.clamp(100_000), Coord::MAX as i64);
    }

    #[test]
    fn test_builtin_style_names() {
        assert_eq!(BuiltinStyle::BtnTglRel.global_name(), "lv_style_btn_tgl_rel");
        assert_eq!(BuiltinStyle::Scr.global_name(), "lv_style_scr");
    }

    #[test]
    fn test_saturate_coord() {
        assert_eq!(saturate_coord(40_000), i16::MAX);
        assert_eq!(saturate_coord(-40_000), i16::MIN);
        assert_eq!(saturate_coord(12), 12);
    }
}
