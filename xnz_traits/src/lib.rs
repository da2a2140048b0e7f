//! Host seam for the thrust-lever engine.
//!
//! The simulator owns property storage, command dispatch and the flight loop.
//! Everything the engine needs from it goes through [`Host`]; the on-screen
//! readout goes through [`Overlay`].

pub mod overlay;

pub use overlay::{NoOverlay, Overlay};

/// Opaque handle to a named host property (a "dataref").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyHandle(pub u32);

/// Opaque handle to a named host command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandHandle(pub u32);

/// Identifier of another loaded plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId(pub i32);

/// Phase of a held command, as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandPhase {
    Begin,
    Continue,
    End,
}

/// The two periodic callbacks the engine registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightLoop {
    /// Nullzones, overlay readout, icing check.
    Nullzones,
    /// Lever mapping.
    Throttle,
}

/// Simulator and plugin-API versions, e.g. `11550` and `301`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostVersions {
    pub simulator: i32,
    pub api: i32,
}

pub trait Host {
    fn versions(&self) -> HostVersions;

    fn find_property(&self, path: &str) -> Option<PropertyHandle>;
    fn find_command(&self, path: &str) -> Option<CommandHandle>;

    fn get_f32(&self, property: PropertyHandle) -> f32;
    fn set_f32(&mut self, property: PropertyHandle, value: f32);
    fn get_i32(&self, property: PropertyHandle) -> i32;
    fn set_i32(&mut self, property: PropertyHandle, value: i32);

    /// Copy array elements starting at `offset` into `out`; returns the count copied.
    fn get_f32s(&self, property: PropertyHandle, offset: usize, out: &mut [f32]) -> usize;
    fn set_f32s(&mut self, property: PropertyHandle, offset: usize, values: &[f32]);
    fn get_i32s(&self, property: PropertyHandle, offset: usize, out: &mut [i32]) -> usize;
    fn set_i32s(&mut self, property: PropertyHandle, offset: usize, values: &[i32]);
    fn get_bytes(&self, property: PropertyHandle, out: &mut [u8]) -> usize;

    /// Read a NUL-terminated byte property as text (lossy).
    fn get_string(&self, property: PropertyHandle) -> String {
        let mut buf = [0u8; 512];
        let n = self.get_bytes(property, &mut buf).min(buf.len());
        let end = buf[..n].iter().position(|b| *b == 0).unwrap_or(n);
        String::from_utf8_lossy(&buf[..end]).into_owned()
    }

    fn command_once(&mut self, command: CommandHandle);
    fn command_begin(&mut self, command: CommandHandle);
    fn command_end(&mut self, command: CommandHandle);

    fn find_plugin(&self, signature: &str) -> Option<PluginId>;
    fn is_plugin_enabled(&self, plugin: PluginId) -> bool;

    /// Present *and* enabled.
    fn plugin_active(&self, signature: &str) -> bool {
        self.find_plugin(signature)
            .is_some_and(|id| self.is_plugin_enabled(id))
    }

    /// Reschedule a flight loop; `0.0` stops it.
    fn set_loop_interval(&mut self, which: FlightLoop, interval_s: f32);

    /// Spoken announcement (e.g. "ice detected"). Optional.
    fn speak(&mut self, _text: &str) {}
}
