//! Runs scripts against a simulated widget library
//!
//! A [`ScriptRunner`] owns the Lua state for its lifetime through the
//! bindings' context holder, so only one runner can be active per thread.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use lvlua_bindings::table::handle_from_value;
use lvlua_bindings::{
    clear_context, fire_btn_action, fire_ddlist_action, install, set_context, with_context,
    Registered,
};
use lvlua_widgets::{BtnAction, Handle, NodeKind, SimWidgets};
use mlua::{Lua, Value};
use tracing::{debug, info};

use crate::config::LvluaConfig;

pub struct ScriptRunner {
    sim: Rc<RefCell<SimWidgets>>,
    registered: Registered,
}

impl ScriptRunner {
    /// Create a Lua state bound to a fresh simulated display and make it the
    /// current context
    pub fn new(config: &LvluaConfig) -> Result<Self> {
        let sim = Rc::new(RefCell::new(SimWidgets::new(
            config.display.hor_res,
            config.display.ver_res,
        )));
        let lua = Lua::new();
        let registered = install(&lua, sim.clone()).context("Failed to register bindings")?;
        if set_context(lua)?.is_some() {
            debug!(target: "runner", "Replaced an existing scripting context");
        }
        info!(
            target: "runner",
            "Scripting context ready ({}x{})",
            config.display.hor_res,
            config.display.ver_res
        );
        Ok(Self { sim, registered })
    }

    pub fn registered(&self) -> &Registered {
        &self.registered
    }

    pub fn widgets(&self) -> &Rc<RefCell<SimWidgets>> {
        &self.sim
    }

    pub fn run_file(&self, path: &Path) -> Result<()> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        self.run_source(&path.display().to_string(), &source)
            .with_context(|| format!("Script {} failed", path.display()))
    }

    pub fn run_source(&self, name: &str, source: &str) -> Result<()> {
        info!(target: "runner", "Running {}", name);
        with_context(|lua| Ok(lua.load(source).set_name(name).exec()?))?;
        Ok(())
    }

    /// Fire the interaction callback of the widget stored in global `name`
    ///
    /// Buttons get a click, dropdown lists a selection. Returns whether a
    /// callback ran.
    pub fn click(&self, name: &str) -> Result<bool> {
        let handle = self.global_handle(name)?;
        let kind = self.sim.borrow().kind(handle)?;
        let fired = match kind {
            NodeKind::Button => {
                with_context(|lua| fire_btn_action(lua, handle, BtnAction::Click))?
            }
            NodeKind::Dropdown => with_context(|lua| fire_ddlist_action(lua, handle))?,
            other => bail!("Global '{}' is a {}, which cannot be clicked", name, other),
        };
        debug!(target: "runner", "Clicked {} ({}): callback ran = {}", name, handle, fired);
        Ok(fired)
    }

    pub fn dump_tree(&self) -> String {
        self.sim.borrow().dump_tree()
    }

    fn global_handle(&self, name: &str) -> Result<Handle> {
        let value = with_context(|lua| Ok(lua.globals().get::<Value>(name)?))?;
        match handle_from_value(&value) {
            Some(handle) => Ok(handle),
            None => bail!(
                "Global '{}' is a {}, expected a widget handle",
                name,
                value.type_name()
            ),
        }
    }
}

impl Drop for ScriptRunner {
    fn drop(&mut self) {
        if let Err(e) = clear_context() {
            debug!(target: "runner", "Could not clear scripting context: {}", e);
        }
    }
}

/// Options for a single `run` invocation
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Globals whose widgets are clicked after the script finishes, in order
    pub clicks: Vec<String>,
    /// Return the object tree after running
    pub dump: bool,
}

/// Run the configured preload scripts, then `script`, then the requested clicks
///
/// Returns the dumped object tree when `options.dump` is set.
pub fn run_script(
    config: &LvluaConfig,
    script: &Path,
    options: &RunOptions,
) -> Result<Option<String>> {
    let runner = ScriptRunner::new(config)?;

    for preload in config.scripting.preload_paths() {
        runner.run_file(&preload)?;
    }
    runner.run_file(script)?;

    for name in &options.clicks {
        runner.click(name)?;
    }

    Ok(options.dump.then(|| runner.dump_tree()))
}

/// Every symbol the bindings install, in registration order
pub fn symbols() -> Result<Registered> {
    let lua = Lua::new();
    let sim = Rc::new(RefCell::new(SimWidgets::default()));
    Ok(install(&lua, sim)?)
}
