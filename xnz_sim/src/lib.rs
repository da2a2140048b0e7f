//! In-memory simulator host for tests and the CLI.
//!
//! [`SimHost`] stores properties and commands by path, records every write,
//! command and loop change, and emulates the few host reactions the engine
//! relies on (reverse/beta toggles, `throttle_ratio_all` fan-out). Clones
//! share state, so a test can keep one handle while the engine owns another.

pub mod aircraft;
pub mod error;
pub mod overlay;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use xnz_traits::{
    CommandHandle, FlightLoop, Host, HostVersions, PluginId, PropertyHandle,
};

pub use aircraft::Preset;
pub use error::{Result, SimError};
pub use overlay::SimOverlay;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    F32(f32),
    I32(i32),
    F32s(Vec<f32>),
    I32s(Vec<i32>),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Once,
    Begin,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Write { path: String },
    Command { path: String, kind: CommandKind },
    LoopInterval { which: FlightLoop, interval_s: f32 },
    Speak(String),
}

/// Host reaction to a one-shot command on the `prop_mode` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ModeToggle {
    engine: Option<usize>,
    /// Mode entered by the toggle; toggling again returns to forward (1).
    mode: i32,
}

#[derive(Debug, Default)]
struct SimState {
    versions: HostVersions,
    properties: Vec<(String, Value)>,
    commands: Vec<String>,
    plugins: Vec<(String, bool)>,
    lookups: Vec<String>,
    events: Vec<SimEvent>,
    prop_mode: Option<u32>,
    mode_toggles: HashMap<u32, ModeToggle>,
    /// Scalar property fanned out into every element of an array.
    mirrors: Vec<(u32, u32)>,
    held: Vec<u32>,
    loops: HashMap<FlightLoop, f32>,
    lever_index: Option<usize>,
}

impl SimState {
    fn property_id(&self, path: &str) -> Option<u32> {
        self.properties
            .iter()
            .position(|(p, _)| p == path)
            .map(|i| i as u32)
    }

    fn command_id(&self, path: &str) -> Option<u32> {
        self.commands.iter().position(|p| p == path).map(|i| i as u32)
    }

    fn value(&self, h: PropertyHandle) -> Option<&Value> {
        self.properties.get(h.0 as usize).map(|(_, v)| v)
    }

    fn value_mut(&mut self, h: PropertyHandle) -> Option<&mut Value> {
        self.properties.get_mut(h.0 as usize).map(|(_, v)| v)
    }

    fn record_write(&mut self, h: PropertyHandle) {
        if let Some((path, _)) = self.properties.get(h.0 as usize) {
            self.events.push(SimEvent::Write { path: path.clone() });
        }
    }

    fn record_command(&mut self, h: CommandHandle, kind: CommandKind) {
        if let Some(path) = self.commands.get(h.0 as usize) {
            self.events.push(SimEvent::Command {
                path: path.clone(),
                kind,
            });
        }
    }

    fn apply_mode_toggle(&mut self, cmd: CommandHandle) {
        let toggle = self.mode_toggles.get(&cmd.0).copied();
        let (Some(toggle), Some(pm)) = (toggle, self.prop_mode) else {
            return;
        };
        if let Some(Value::I32s(modes)) = self.value_mut(PropertyHandle(pm)) {
            let flip = |m: &mut i32| *m = if *m == toggle.mode { 1 } else { toggle.mode };
            match toggle.engine {
                Some(i) => {
                    if let Some(m) = modes.get_mut(i) {
                        flip(m);
                    }
                }
                None => modes.iter_mut().for_each(flip),
            }
            tracing::trace!(?modes, "sim prop_mode toggled");
        }
    }

    fn fan_out(&mut self, scalar: PropertyHandle, value: f32) {
        let targets: Vec<u32> = self
            .mirrors
            .iter()
            .filter(|(s, _)| *s == scalar.0)
            .map(|(_, a)| *a)
            .collect();
        for a in targets {
            if let Some(Value::F32s(values)) = self.value_mut(PropertyHandle(a)) {
                values.iter_mut().for_each(|v| *v = value);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimHost {
    state: Rc<RefCell<SimState>>,
}

impl SimHost {
    pub fn new(versions: HostVersions) -> Self {
        let host = Self::default();
        host.state.borrow_mut().versions = versions;
        host
    }

    // ── Setup ────────────────────────────────────────────────────────────────

    pub fn add_property(&self, path: &str, value: Value) -> PropertyHandle {
        let mut st = self.state.borrow_mut();
        if let Some(id) = st.property_id(path) {
            st.properties[id as usize].1 = value;
            return PropertyHandle(id);
        }
        st.properties.push((path.to_string(), value));
        PropertyHandle(st.properties.len() as u32 - 1)
    }

    pub fn add_string(&self, path: &str, text: &str) -> PropertyHandle {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.add_property(path, Value::Bytes(bytes))
    }

    pub fn add_command(&self, path: &str) -> CommandHandle {
        let mut st = self.state.borrow_mut();
        if let Some(id) = st.command_id(path) {
            return CommandHandle(id);
        }
        st.commands.push(path.to_string());
        CommandHandle(st.commands.len() as u32 - 1)
    }

    pub fn add_plugin(&self, signature: &str, enabled: bool) {
        self.state
            .borrow_mut()
            .plugins
            .push((signature.to_string(), enabled));
    }

    pub fn remove_property(&self, path: &str) {
        let mut st = self.state.borrow_mut();
        if let Some(id) = st.property_id(path) {
            // Keep ids stable; rename so lookups miss.
            st.properties[id as usize].0 = format!("<removed>{path}");
        }
    }

    /// Register the `prop_mode` array the toggle commands act on.
    pub fn emulate_prop_mode(&self, prop_mode: &str) -> Result<()> {
        let id = self.property(prop_mode)?;
        self.state.borrow_mut().prop_mode = Some(id.0);
        Ok(())
    }

    /// `command` flips engine `engine` (or all, for `None`) into `mode` and back.
    pub fn emulate_mode_toggle(
        &self,
        command: &str,
        engine: Option<usize>,
        mode: i32,
    ) -> Result<()> {
        let id = self.command(command)?;
        self.state
            .borrow_mut()
            .mode_toggles
            .insert(id.0, ModeToggle { engine, mode });
        Ok(())
    }

    /// Writes to `scalar` are copied into every element of `array`.
    pub fn mirror(&self, scalar: &str, array: &str) -> Result<()> {
        let s = self.property(scalar)?;
        let a = self.property(array)?;
        self.state.borrow_mut().mirrors.push((s.0, a.0));
        Ok(())
    }

    pub fn set_versions(&self, versions: HostVersions) {
        self.state.borrow_mut().versions = versions;
    }

    // ── Test access by path ──────────────────────────────────────────────────

    fn property(&self, path: &str) -> Result<PropertyHandle> {
        self.state
            .borrow()
            .property_id(path)
            .map(PropertyHandle)
            .ok_or_else(|| SimError::UnknownProperty(path.to_string()))
    }

    fn command(&self, path: &str) -> Result<CommandHandle> {
        self.state
            .borrow()
            .command_id(path)
            .map(CommandHandle)
            .ok_or_else(|| SimError::UnknownCommand(path.to_string()))
    }

    pub fn peek(&self, path: &str) -> Result<Value> {
        let h = self.property(path)?;
        self.state
            .borrow()
            .value(h)
            .cloned()
            .ok_or_else(|| SimError::UnknownProperty(path.to_string()))
    }

    pub fn peek_f32(&self, path: &str) -> Result<f32> {
        match self.peek(path)? {
            Value::F32(v) => Ok(v),
            _ => Err(mismatch(path, "f32")),
        }
    }

    pub fn peek_i32(&self, path: &str) -> Result<i32> {
        match self.peek(path)? {
            Value::I32(v) => Ok(v),
            _ => Err(mismatch(path, "i32")),
        }
    }

    pub fn peek_f32s(&self, path: &str) -> Result<Vec<f32>> {
        match self.peek(path)? {
            Value::F32s(v) => Ok(v),
            _ => Err(mismatch(path, "f32 array")),
        }
    }

    pub fn peek_i32s(&self, path: &str) -> Result<Vec<i32>> {
        match self.peek(path)? {
            Value::I32s(v) => Ok(v),
            _ => Err(mismatch(path, "i32 array")),
        }
    }

    /// Overwrite a property without recording an event (the "simulator" side).
    pub fn poke(&self, path: &str, value: Value) -> Result<()> {
        let h = self.property(path)?;
        let mut st = self.state.borrow_mut();
        if let Some(slot) = st.value_mut(h) {
            *slot = value;
        }
        Ok(())
    }

    pub fn poke_f32(&self, path: &str, value: f32) -> Result<()> {
        self.poke(path, Value::F32(value))
    }

    pub fn poke_i32(&self, path: &str, value: i32) -> Result<()> {
        self.poke(path, Value::I32(value))
    }

    /// Where the preset put the lever axis pair, if it has one.
    pub fn lever_index(&self) -> Option<usize> {
        self.state.borrow().lever_index
    }

    pub(crate) fn set_lever_index(&self, index: usize) {
        self.state.borrow_mut().lever_index = Some(index);
    }

    /// Move the hardware levers (raw axis values, 0..1).
    pub fn set_levers(&self, left: f32, right: f32) -> Result<()> {
        let index = self
            .lever_index()
            .ok_or_else(|| SimError::UnknownProperty("lever axis pair".into()))?;
        let h = self.property(aircraft::AXIS_VALUES)?;
        let mut st = self.state.borrow_mut();
        if let Some(Value::F32s(values)) = st.value_mut(h) {
            if let Some(pair) = values.get_mut(index..index + 2) {
                pair.copy_from_slice(&[left, right]);
            }
        }
        Ok(())
    }

    // ── Recorded activity ────────────────────────────────────────────────────

    pub fn events(&self) -> Vec<SimEvent> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// Paths passed to `find_property` / `find_command`, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.state.borrow().lookups.clone()
    }

    pub fn writes_to(&self, path: &str) -> usize {
        self.state
            .borrow()
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Write { path: p } if p == path))
            .count()
    }

    pub fn commands_issued(&self) -> Vec<(String, CommandKind)> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Command { path, kind } => Some((path.clone(), *kind)),
                _ => None,
            })
            .collect()
    }

    pub fn is_held(&self, path: &str) -> bool {
        let st = self.state.borrow();
        st.command_id(path).is_some_and(|id| st.held.contains(&id))
    }

    pub fn loop_interval(&self, which: FlightLoop) -> Option<f32> {
        self.state.borrow().loops.get(&which).copied()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Speak(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

fn mismatch(path: &str, expected: &'static str) -> SimError {
    SimError::TypeMismatch {
        path: path.to_string(),
        expected,
    }
}

impl Host for SimHost {
    fn versions(&self) -> HostVersions {
        self.state.borrow().versions
    }

    fn find_property(&self, path: &str) -> Option<PropertyHandle> {
        let mut st = self.state.borrow_mut();
        st.lookups.push(path.to_string());
        st.property_id(path).map(PropertyHandle)
    }

    fn find_command(&self, path: &str) -> Option<CommandHandle> {
        let mut st = self.state.borrow_mut();
        st.lookups.push(path.to_string());
        st.command_id(path).map(CommandHandle)
    }

    fn get_f32(&self, property: PropertyHandle) -> f32 {
        match self.state.borrow().value(property) {
            Some(Value::F32(v)) => *v,
            Some(Value::I32(v)) => *v as f32,
            Some(Value::F32s(v)) => v.first().copied().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn set_f32(&mut self, property: PropertyHandle, value: f32) {
        let mut st = self.state.borrow_mut();
        match st.value_mut(property) {
            Some(Value::F32(v)) => *v = value,
            Some(Value::I32(v)) => *v = value as i32,
            _ => return,
        }
        st.record_write(property);
        st.fan_out(property, value);
    }

    fn get_i32(&self, property: PropertyHandle) -> i32 {
        match self.state.borrow().value(property) {
            Some(Value::I32(v)) => *v,
            Some(Value::F32(v)) => *v as i32,
            Some(Value::I32s(v)) => v.first().copied().unwrap_or(0),
            _ => 0,
        }
    }

    fn set_i32(&mut self, property: PropertyHandle, value: i32) {
        let mut st = self.state.borrow_mut();
        match st.value_mut(property) {
            Some(Value::I32(v)) => *v = value,
            Some(Value::F32(v)) => *v = value as f32,
            _ => return,
        }
        st.record_write(property);
    }

    fn get_f32s(&self, property: PropertyHandle, offset: usize, out: &mut [f32]) -> usize {
        match self.state.borrow().value(property) {
            Some(Value::F32s(v)) => copy_from(v, offset, out),
            _ => 0,
        }
    }

    fn set_f32s(&mut self, property: PropertyHandle, offset: usize, values: &[f32]) {
        let mut st = self.state.borrow_mut();
        if let Some(Value::F32s(v)) = st.value_mut(property) {
            copy_into(v, offset, values);
            st.record_write(property);
        }
    }

    fn get_i32s(&self, property: PropertyHandle, offset: usize, out: &mut [i32]) -> usize {
        match self.state.borrow().value(property) {
            Some(Value::I32s(v)) => copy_from(v, offset, out),
            _ => 0,
        }
    }

    fn set_i32s(&mut self, property: PropertyHandle, offset: usize, values: &[i32]) {
        let mut st = self.state.borrow_mut();
        if let Some(Value::I32s(v)) = st.value_mut(property) {
            copy_into(v, offset, values);
            st.record_write(property);
        }
    }

    fn get_bytes(&self, property: PropertyHandle, out: &mut [u8]) -> usize {
        match self.state.borrow().value(property) {
            Some(Value::Bytes(v)) => copy_from(v, 0, out),
            _ => 0,
        }
    }

    fn command_once(&mut self, command: CommandHandle) {
        let mut st = self.state.borrow_mut();
        st.record_command(command, CommandKind::Once);
        st.apply_mode_toggle(command);
    }

    fn command_begin(&mut self, command: CommandHandle) {
        let mut st = self.state.borrow_mut();
        st.record_command(command, CommandKind::Begin);
        if !st.held.contains(&command.0) {
            st.held.push(command.0);
        }
    }

    fn command_end(&mut self, command: CommandHandle) {
        let mut st = self.state.borrow_mut();
        st.record_command(command, CommandKind::End);
        st.held.retain(|c| *c != command.0);
    }

    fn find_plugin(&self, signature: &str) -> Option<PluginId> {
        self.state
            .borrow()
            .plugins
            .iter()
            .position(|(s, _)| s == signature)
            .map(|i| PluginId(i as i32))
    }

    fn is_plugin_enabled(&self, plugin: PluginId) -> bool {
        usize::try_from(plugin.0)
            .ok()
            .and_then(|i| self.state.borrow().plugins.get(i).map(|(_, on)| *on))
            .unwrap_or(false)
    }

    fn set_loop_interval(&mut self, which: FlightLoop, interval_s: f32) {
        let mut st = self.state.borrow_mut();
        st.loops.insert(which, interval_s);
        st.events.push(SimEvent::LoopInterval { which, interval_s });
    }

    fn speak(&mut self, text: &str) {
        self.state
            .borrow_mut()
            .events
            .push(SimEvent::Speak(text.to_string()));
    }
}

fn copy_from<T: Copy>(src: &[T], offset: usize, out: &mut [T]) -> usize {
    let Some(tail) = src.get(offset..) else {
        return 0;
    };
    let n = tail.len().min(out.len());
    out[..n].copy_from_slice(&tail[..n]);
    n
}

fn copy_into<T: Copy>(dst: &mut [T], offset: usize, values: &[T]) {
    if let Some(tail) = dst.get_mut(offset..) {
        let n = tail.len().min(values.len());
        tail[..n].copy_from_slice(&values[..n]);
    }
}
