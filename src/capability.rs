// Device capability probing and the one-time decision whether the particle
// field is worth running at all.

use crate::config::FieldConfig;
use crate::dom_helpers;
use std::fmt;
use wasm_bindgen::JsValue;
use web_sys::Window;

pub trait Capabilities {
    /// Logical core count, `None` when the browser does not report it.
    fn hardware_concurrency(&self) -> Option<u32>;
    /// `navigator.connection.effectiveType`, e.g. `"4g"` or `"slow-2g"`.
    fn effective_connection_type(&self) -> Option<String>;
    fn save_data(&self) -> bool;
    fn viewport(&self) -> (f64, f64);
    /// Whether the primary pointer can hover, i.e. `(hover: hover)` matches.
    fn hover_pointer(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateReason {
    LowConcurrency(u32),
    ConstrainedNetwork(String),
    SaveData,
}

impl fmt::Display for GateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateReason::LowConcurrency(cores) => write!(f, "only {} logical cores", cores),
            GateReason::ConstrainedNetwork(kind) => write!(f, "constrained network ({})", kind),
            GateReason::SaveData => write!(f, "data saver enabled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Enabled,
    Disabled(GateReason),
}

impl Gate {
    pub fn evaluate(caps: &dyn Capabilities, config: &FieldConfig) -> Gate {
        if let Some(cores) = caps.hardware_concurrency() {
            if cores <= config.low_power_max_cores {
                return Gate::Disabled(GateReason::LowConcurrency(cores));
            }
        }
        if let Some(kind) = caps.effective_connection_type() {
            if config
                .constrained_connections
                .iter()
                .any(|constrained| kind.eq_ignore_ascii_case(constrained))
            {
                return Gate::Disabled(GateReason::ConstrainedNetwork(kind));
            }
        }
        if caps.save_data() {
            return Gate::Disabled(GateReason::SaveData);
        }
        Gate::Enabled
    }

    pub fn is_enabled(&self) -> bool {
        *self == Gate::Enabled
    }
}

#[derive(Clone)]
pub struct BrowserCapabilities {
    window: Window,
}

impl BrowserCapabilities {
    pub fn new(window: Window) -> Self {
        BrowserCapabilities { window }
    }

    // NetworkInformation is not exposed by web-sys without unstable APIs,
    // so read it off the navigator object directly.
    fn connection_field(&self, field: &str) -> Option<JsValue> {
        let navigator = self.window.navigator();
        let connection = js_sys::Reflect::get(&navigator, &JsValue::from_str("connection")).ok()?;
        if connection.is_undefined() || connection.is_null() {
            return None;
        }
        js_sys::Reflect::get(&connection, &JsValue::from_str(field)).ok()
    }
}

impl Capabilities for BrowserCapabilities {
    fn hardware_concurrency(&self) -> Option<u32> {
        let cores = self.window.navigator().hardware_concurrency();
        if cores.is_finite() && cores > 0.0 {
            Some(cores as u32)
        } else {
            None
        }
    }

    fn effective_connection_type(&self) -> Option<String> {
        self.connection_field("effectiveType")?.as_string()
    }

    fn save_data(&self) -> bool {
        self.connection_field("saveData")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn viewport(&self) -> (f64, f64) {
        dom_helpers::viewport_size(&self.window)
    }

    fn hover_pointer(&self) -> bool {
        self.window
            .match_media("(hover: hover)")
            .ok()
            .flatten()
            .map(|query| query.matches())
            .unwrap_or(false)
    }
}

/// Fixed answers, for tests and for hosts without a browser.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticCapabilities {
    pub hardware_concurrency: Option<u32>,
    pub effective_connection_type: Option<String>,
    pub save_data: bool,
    pub viewport: (f64, f64),
    pub hover_pointer: bool,
}

impl Default for StaticCapabilities {
    fn default() -> Self {
        StaticCapabilities {
            hardware_concurrency: Some(8),
            effective_connection_type: Some(String::from("4g")),
            save_data: false,
            viewport: (1024.0, 768.0),
            hover_pointer: true,
        }
    }
}

impl Capabilities for StaticCapabilities {
    fn hardware_concurrency(&self) -> Option<u32> {
        self.hardware_concurrency
    }

    fn effective_connection_type(&self) -> Option<String> {
        self.effective_connection_type.clone()
    }

    fn save_data(&self) -> bool {
        self.save_data
    }

    fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    fn hover_pointer(&self) -> bool {
        self.hover_pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(caps: StaticCapabilities) -> Gate {
        Gate::evaluate(&caps, &FieldConfig::default())
    }

    #[test]
    fn desktop_is_enabled() {
        assert_eq!(gate(StaticCapabilities::default()), Gate::Enabled);
    }

    #[test]
    fn two_cores_disable_the_field() {
        let caps = StaticCapabilities {
            hardware_concurrency: Some(2),
            ..StaticCapabilities::default()
        };
        assert_eq!(gate(caps), Gate::Disabled(GateReason::LowConcurrency(2)));

        let caps = StaticCapabilities {
            hardware_concurrency: Some(3),
            ..StaticCapabilities::default()
        };
        assert!(gate(caps).is_enabled());
    }

    #[test]
    fn unknown_core_count_is_not_low_power() {
        let caps = StaticCapabilities {
            hardware_concurrency: None,
            ..StaticCapabilities::default()
        };
        assert!(gate(caps).is_enabled());
    }

    #[test]
    fn slow_networks_disable_the_field() {
        for kind in &["slow-2g", "2g", "2G"] {
            let caps = StaticCapabilities {
                effective_connection_type: Some(kind.to_string()),
                ..StaticCapabilities::default()
            };
            assert_eq!(
                gate(caps),
                Gate::Disabled(GateReason::ConstrainedNetwork(kind.to_string()))
            );
        }
        let caps = StaticCapabilities {
            effective_connection_type: Some(String::from("3g")),
            ..StaticCapabilities::default()
        };
        assert!(gate(caps).is_enabled());
    }

    #[test]
    fn data_saver_disables_the_field() {
        let caps = StaticCapabilities {
            save_data: true,
            ..StaticCapabilities::default()
        };
        assert_eq!(gate(caps), Gate::Disabled(GateReason::SaveData));
    }

    #[test]
    fn reasons_read_well() {
        assert_eq!(GateReason::LowConcurrency(2).to_string(), "only 2 logical cores");
        assert_eq!(GateReason::SaveData.to_string(), "data saver enabled");
    }
}
