use std::fmt;

/// Opaque identity of a native object or style
///
/// The widget library allocates and frees the object behind a handle; holders
/// of a `Handle` only pass it back to the library. The raw value is what
/// crosses the scripting boundary as a light userdata address, so `0` is
/// reserved for the null handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Handle(usize);

impl Handle {
    /// The null handle
    pub const NULL: Handle = Handle(0);

    /// Rebuild a handle from its raw address value
    pub const fn from_raw(raw: usize) -> Self {
        Handle(raw)
    }

    /// Raw address value of this handle
    pub const fn into_raw(self) -> usize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// `None` for the null handle
    pub fn non_null(self) -> Option<Handle> {
        if self.is_null() { None } else { Some(self) }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handle() {
        assert!(Handle::NULL.is_null());
        assert_eq!(Handle::default(), Handle::NULL);
        assert_eq!(Handle::NULL.non_null(), None);
        assert_eq!(Handle::from_raw(7).non_null(), Some(Handle::from_raw(7)));
    }

    #[test]
    fn test_display_is_hex_address() {
        assert_eq!(Handle::from_raw(255).to_string(), "0xff");
    }
}
