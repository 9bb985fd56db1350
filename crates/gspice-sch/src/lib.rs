//! Schematic model and netlist extraction for GSpice's schematic editor.
//!
//! The editor owns placement, wiring and undo; this crate owns the part that
//! has to be exactly right: turning an ordered list of [`Component`]s and
//! [`Connection`]s into a canonical numbered netlist. Terminals joined by
//! wires collapse into equivalence classes (see [`TerminalGraph`]), the class
//! containing the shared ground terminal is pinned to node `0`, and every
//! other class gets a sequential node number in first-registration order.
//!
//! The structures are serialisable with `serde` so a schematic snapshot can
//! be stored or transferred as JSON.

pub mod netlist;
pub mod terminal_graph;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use netlist::{NetlistRow, generate_netlist, write_netlist};
pub use terminal_graph::TerminalGraph;

/// Helper type alias for plain UTF-8 identifiers.
pub type Symbol = String;

/// Wire spelling of the reserved ground terminal in JSON snapshots.
pub const GROUND_NAME: &str = "GND";

/// Identifier for one connection point of a component.
///
/// Ground is a dedicated variant rather than a specially-spelled name: every
/// ground symbol in a schematic shares the single [`TerminalId::Ground`]
/// terminal, and only that variant is eligible for node `0`. In the JSON
/// form ground serialises as [`GROUND_NAME`]; any other string is an opaque
/// user terminal name (by convention `<component>.n1` / `<component>.n2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TerminalId {
    /// Shared terminal of every ground symbol.
    Ground,
    /// Any other connection point.
    Named(Symbol),
}

impl TerminalId {
    pub fn is_ground(&self) -> bool {
        matches!(self, TerminalId::Ground)
    }
}

impl From<TerminalId> for String {
    fn from(id: TerminalId) -> Self {
        id.to_string()
    }
}

impl From<String> for TerminalId {
    fn from(s: String) -> Self {
        if s == GROUND_NAME {
            TerminalId::Ground
        } else {
            TerminalId::Named(s)
        }
    }
}

impl From<&str> for TerminalId {
    fn from(s: &str) -> Self {
        TerminalId::from(s.to_string())
    }
}

impl std::fmt::Display for TerminalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalId::Ground => write!(f, "{GROUND_NAME}"),
            TerminalId::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Discriminates the kind of a [`Component`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    VoltageSource,
    CurrentSource,
    Ground,
}

impl ComponentKind {
    /// Reference-designator prefix used when the editor names components
    /// (`R1`, `C2`, ...).
    pub const fn prefix(&self) -> &'static str {
        match self {
            ComponentKind::Resistor => "R",
            ComponentKind::Capacitor => "C",
            ComponentKind::Inductor => "L",
            ComponentKind::VoltageSource => "V",
            ComponentKind::CurrentSource => "I",
            ComponentKind::Ground => "G",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComponentKind::Resistor => "resistor",
            ComponentKind::Capacitor => "capacitor",
            ComponentKind::Inductor => "inductor",
            ComponentKind::VoltageSource => "voltage_source",
            ComponentKind::CurrentSource => "current_source",
            ComponentKind::Ground => "ground",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resistor" => Ok(ComponentKind::Resistor),
            "capacitor" => Ok(ComponentKind::Capacitor),
            "inductor" => Ok(ComponentKind::Inductor),
            "voltage_source" => Ok(ComponentKind::VoltageSource),
            "current_source" => Ok(ComponentKind::CurrentSource),
            "ground" => Ok(ComponentKind::Ground),
            _ => Err(format!("Unknown component kind: '{s}'")),
        }
    }
}

/// One placed component.
///
/// Two-terminal components carry exactly two terminals in their own
/// canonical order; a ground symbol carries the single shared ground
/// terminal. Terminal-name uniqueness across components is the editor's
/// responsibility, not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Unique name, e.g. `R1`.
    pub name: Symbol,
    pub kind: ComponentKind,
    /// Connection points in canonical order (`n1` then `n2`).
    pub terminals: Vec<TerminalId>,
    /// Opaque value string (`10k`, `5V`, ...). Absent for ground symbols.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Symbol>,
}

impl Component {
    /// Create a two-terminal component with the editor's derived terminal
    /// names `<name>.n1` and `<name>.n2`.
    pub fn new(name: impl Into<Symbol>, kind: ComponentKind, value: impl Into<Symbol>) -> Self {
        let name = name.into();
        let terminals = vec![
            TerminalId::Named(format!("{name}.n1")),
            TerminalId::Named(format!("{name}.n2")),
        ];
        Self {
            name,
            kind,
            terminals,
            value: Some(value.into()),
        }
    }

    /// Create a ground symbol. All ground symbols share one terminal.
    pub fn ground(name: impl Into<Symbol>) -> Self {
        Self {
            name: name.into(),
            kind: ComponentKind::Ground,
            terminals: vec![TerminalId::Ground],
            value: None,
        }
    }

    /// Create a two-terminal component with explicit terminal names.
    pub fn with_terminals(
        name: impl Into<Symbol>,
        kind: ComponentKind,
        t1: impl Into<TerminalId>,
        t2: impl Into<TerminalId>,
        value: impl Into<Symbol>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            terminals: vec![t1.into(), t2.into()],
            value: Some(value.into()),
        }
    }
}

/// One wire between two terminals. Unordered; duplicates and self-pairs are
/// permitted and have no effect on the resulting partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection(pub TerminalId, pub TerminalId);

impl Connection {
    pub fn new(a: impl Into<TerminalId>, b: impl Into<TerminalId>) -> Self {
        Self(a.into(), b.into())
    }
}

/// Error loading a schematic snapshot.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read schematic: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid schematic JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A schematic snapshot: components and wires in strict insertion order.
///
/// Order is significant — node numbering derives from first-registration
/// order across the component and connection lists — so both collections are
/// kept exactly as the editor produced them. Netlist generation only reads
/// the snapshot; it never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schematic {
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
}

impl Schematic {
    /// Create an empty schematic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component, preserving insertion order.
    pub fn add_component(&mut self, component: Component) -> &mut Self {
        self.components.push(component);
        self
    }

    /// Append a wire between two terminals.
    pub fn add_connection(
        &mut self,
        a: impl Into<TerminalId>,
        b: impl Into<TerminalId>,
    ) -> &mut Self {
        self.connections.push(Connection::new(a, b));
        self
    }

    /// Deserialize a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the snapshot to pretty JSON.
    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Convert the schematic into canonical netlist rows. See
    /// [`netlist::generate_netlist`].
    pub fn generate_netlist(&self) -> Vec<NetlistRow> {
        netlist::generate_netlist(self)
    }
}
