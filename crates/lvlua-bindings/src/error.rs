use lvlua_widgets::WidgetError;

pub type Result<T, E = BindingError> = std::result::Result<T, E>;

/// Errors raised by the binding layer
///
/// Inside a Lua callback these become Lua errors and abort the calling
/// script. Mistyped or absent table fields never produce one.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("scripting context is not initialized")]
    NotInitialized,

    #[error("scripting context is in use and cannot be replaced")]
    ContextBusy,

    #[error("no widget library is installed in this Lua state")]
    NoLibrary,

    #[error("widget library is already borrowed")]
    LibraryBusy,

    #[error("bad argument #{pos} to '{func}' ({expected} expected, got {got})")]
    BadArgument {
        func: &'static str,
        pos: usize,
        expected: &'static str,
        got: &'static str,
    },

    #[error("invalid value {value} for '{field}'")]
    InvalidValue { field: &'static str, value: i64 },

    #[error(transparent)]
    Widget(#[from] WidgetError),

    #[error(transparent)]
    Lua(#[from] mlua::Error),
}

impl BindingError {
    pub fn bad_argument(
        func: &'static str,
        pos: usize,
        expected: &'static str,
        got: &mlua::Value,
    ) -> Self {
        BindingError::BadArgument {
            func,
            pos,
            expected,
            got: got.type_name(),
        }
    }

    pub fn invalid_value(field: &'static str, value: i64) -> Self {
        BindingError::InvalidValue { field, value }
    }
}

impl From<BindingError> for mlua::Error {
    fn from(err: BindingError) -> Self {
        match err {
            BindingError::Lua(err) => err,
            other => mlua::Error::external(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<BindingError>();

        let err: anyhow::Error = BindingError::NotInitialized.into();
        assert_eq!(err.to_string(), "scripting context is not initialized");
    }

    #[test]
    fn test_bad_argument_message() {
        let err = BindingError::bad_argument("lv_obj_set", 2, "table", &mlua::Value::Integer(3));
        assert_eq!(
            err.to_string(),
            "bad argument #2 to 'lv_obj_set' (table expected, got integer)"
        );
    }

    #[test]
    fn test_lua_errors_pass_through() {
        let err: mlua::Error = BindingError::Lua(mlua::Error::runtime("boom")).into();
        assert!(matches!(err, mlua::Error::RuntimeError(ref msg) if msg == "boom"));

        let err: mlua::Error = BindingError::NoLibrary.into();
        assert!(err.to_string().contains("no widget library"));
    }
}
