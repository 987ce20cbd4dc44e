use lvlua_widgets::Handle;
use mlua::{FromLuaMulti, IntoLuaMulti, Lua, Table};
use tracing::trace;

use crate::error::Result;
use crate::table::handle_to_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Constant,
    Pointer,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SymbolKind::Function => "function",
            SymbolKind::Constant => "constant",
            SymbolKind::Pointer => "pointer",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

/// Every global a registrar installed, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registered {
    pub symbols: Vec<Symbol>,
}

impl Registered {
    pub fn count(&self, kind: SymbolKind) -> usize {
        self.symbols.iter().filter(|s| s.kind == kind).count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.iter().any(|s| s.name == name)
    }

    /// Record `name`; a repeated name keeps its first position and takes the new kind
    fn record(&mut self, name: &str, kind: SymbolKind) {
        match self.symbols.iter_mut().find(|s| s.name == name) {
            Some(symbol) => symbol.kind = kind,
            None => self.symbols.push(Symbol {
                name: name.to_string(),
                kind,
            }),
        }
    }
}

/// Installs native functions, integer constants and handles as Lua globals
///
/// Registering a name twice overwrites the earlier global.
pub struct Registrar<'lua> {
    lua: &'lua Lua,
    globals: Table,
    registered: Registered,
}

impl<'lua> Registrar<'lua> {
    pub fn new(lua: &'lua Lua) -> Self {
        Self {
            lua,
            globals: lua.globals(),
            registered: Registered::default(),
        }
    }

    /// Bind `f` as the global function `name`
    ///
    /// Arguments are read positionally into `A`; every value of `R` is
    /// returned to the caller.
    pub fn function<F, A, R>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: Fn(&Lua, A) -> mlua::Result<R> + 'static,
        A: FromLuaMulti,
        R: IntoLuaMulti,
    {
        let function = self.lua.create_function(f)?;
        self.globals.set(name, function)?;
        trace!(target: "bindings", "Registered function {}", name);
        self.registered.record(name, SymbolKind::Function);
        Ok(())
    }

    pub fn constant(&mut self, name: &str, value: i64) -> Result<()> {
        self.globals.set(name, value)?;
        trace!(target: "bindings", "Registered constant {} = {}", name, value);
        self.registered.record(name, SymbolKind::Constant);
        Ok(())
    }

    pub fn constants<I, N>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, i64)>,
        N: AsRef<str>,
    {
        for (name, value) in items {
            self.constant(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Bind `handle` as a light userdata global
    pub fn pointer(&mut self, name: &str, handle: Handle) -> Result<()> {
        self.globals.set(name, handle_to_value(handle))?;
        trace!(target: "bindings", "Registered pointer {} = {}", name, handle);
        self.registered.record(name, SymbolKind::Pointer);
        Ok(())
    }

    pub fn lua(&self) -> &'lua Lua {
        self.lua
    }

    pub fn registered(&self) -> &Registered {
        &self.registered
    }

    pub fn finish(self) -> Registered {
        self.registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::handle_from_value;

    #[test]
    fn test_function_reads_arguments_and_returns_all_results() {
        let lua = Lua::new();
        let mut reg = Registrar::new(&lua);
        reg.function("divmod", |_, (a, b): (i64, i64)| Ok((a / b, a % b)))
            .unwrap();

        let (q, r): (i64, i64) = lua.load("return divmod(17, 5)").eval().unwrap();
        assert_eq!((q, r), (3, 2));
        let count: i64 = lua.load("return select('#', divmod(4, 2))").eval().unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_constants_and_pointers() {
        let lua = Lua::new();
        let mut reg = Registrar::new(&lua);
        reg.constants([("ANSWER", 42), ("ZERO", 0)]).unwrap();
        reg.pointer("thing", Handle::from_raw(0x1234)).unwrap();

        assert_eq!(lua.globals().get::<i64>("ANSWER").unwrap(), 42);
        let thing = lua.globals().get::<mlua::Value>("thing").unwrap();
        assert_eq!(handle_from_value(&thing), Some(Handle::from_raw(0x1234)));

        let registered = reg.finish();
        assert_eq!(registered.count(SymbolKind::Constant), 2);
        assert_eq!(registered.count(SymbolKind::Pointer), 1);
    }

    #[test]
    fn test_reregistering_overwrites() {
        let lua = Lua::new();
        let mut reg = Registrar::new(&lua);
        reg.constant("VALUE", 1).unwrap();
        reg.constant("VALUE", 2).unwrap();

        assert_eq!(lua.globals().get::<i64>("VALUE").unwrap(), 2);
        assert_eq!(reg.registered().symbols.len(), 1);
    }
}
