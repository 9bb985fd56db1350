//! Netlist extraction: schematic snapshot in, canonical numbered rows out.
//!
//! Node numbers are assigned per equivalence class of wired terminals. The
//! class containing the shared ground terminal is pinned to `0`; every other
//! class gets the next integer starting at `1`, in first-registration order
//! (component terminals first, in component order, then connection endpoints
//! in wire order). The pass is pure: a fresh [`TerminalGraph`] is built per
//! call and the schematic itself is never touched.

use std::collections::HashMap;
use std::io::Write;

use log::debug;

use crate::{Component, ComponentKind, Connection, Schematic, Symbol, TerminalGraph, TerminalId};

/// One line of the generated netlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetlistRow {
    pub name: Symbol,
    pub node1: u32,
    pub node2: u32,
    pub value: Option<Symbol>,
}

impl std::fmt::Display for NetlistRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.name, self.node1, self.node2)?;
        if let Some(value) = &self.value {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

/// Whether a component contributes terminals to the graph and a row to the
/// output. Ground symbols and components without exactly two terminals are
/// invisible to the algorithm.
fn emits_row(component: &Component) -> bool {
    component.kind != ComponentKind::Ground && component.terminals.len() == 2
}

/// Convert a schematic snapshot into canonical netlist rows.
///
/// Total for every input shape: malformed components are dropped silently,
/// duplicate wires and self-pairs are inert, and a schematic without a wired
/// ground simply numbers its nets from `1` with no node `0` anywhere. A
/// ground symbol that is placed but not wired to anything contributes
/// nothing — ground enters the graph only through a connection.
pub fn generate_netlist(schematic: &Schematic) -> Vec<NetlistRow> {
    let mut graph = TerminalGraph::new();

    // Component terminals first so their registration order leads numbering.
    let mut dropped = 0usize;
    for component in &schematic.components {
        if !emits_row(component) {
            dropped += 1;
            continue;
        }
        for terminal in &component.terminals {
            graph.register(terminal);
        }
    }

    for Connection(a, b) in &schematic.connections {
        graph.register(a);
        graph.register(b);
        graph.union(a, b);
    }

    graph.canonicalize_ground();

    // Assign node numbers per class, in first-registration order of the
    // terminals. Ground is pinned to 0 and consumes no counter value.
    let order: Vec<TerminalId> = graph.terminals().cloned().collect();
    let mut nodes: HashMap<TerminalId, u32> = HashMap::new();
    let mut counter = 1u32;
    for terminal in &order {
        let root = graph.find(terminal).clone();
        if nodes.contains_key(&root) {
            continue;
        }
        if root.is_ground() {
            nodes.insert(root, 0);
        } else {
            nodes.insert(root, counter);
            counter += 1;
        }
    }

    debug!(
        "netlist: {} terminals, {} nets, {} component(s) dropped",
        order.len(),
        nodes.len(),
        dropped
    );

    let mut rows = Vec::new();
    for component in &schematic.components {
        if !emits_row(component) {
            continue;
        }
        let n1 = graph.find(&component.terminals[0]).clone();
        let n2 = graph.find(&component.terminals[1]).clone();
        rows.push(NetlistRow {
            name: component.name.clone(),
            node1: nodes[&n1],
            node2: nodes[&n2],
            value: component.value.clone(),
        });
    }
    rows
}

/// Write rows one per line, space-separated, newline-terminated.
pub fn write_netlist<W: Write>(rows: &[NetlistRow], out: &mut W) -> std::io::Result<()> {
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resistor(name: &str, t1: &str, t2: &str, value: &str) -> Component {
        Component::with_terminals(name, ComponentKind::Resistor, t1, t2, value)
    }

    fn rows_to_string(rows: &[NetlistRow]) -> String {
        let mut buf = Vec::new();
        write_netlist(rows, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn shared_node_without_ground() {
        // R1 A-B, R2 B-C, wire B-C: numbering starts at 1, B and C share.
        let mut sch = Schematic::new();
        sch.add_component(resistor("R1", "A", "B", "10k"))
            .add_component(resistor("R2", "B", "C", "1k"))
            .add_connection("B", "C");

        let rows = sch.generate_netlist();
        assert_eq!(rows_to_string(&rows), "R1 1 2 10k\nR2 2 2 1k\n");
    }

    #[test]
    fn wired_ground_pins_node_zero() {
        let mut sch = Schematic::new();
        sch.add_component(Component::ground("G1"))
            .add_component(resistor("R1", "A", "B", "5k"))
            .add_connection("A", TerminalId::Ground);

        let rows = sch.generate_netlist();
        assert_eq!(rows_to_string(&rows), "R1 0 1 5k\n");
    }

    #[test]
    fn floating_ground_is_invisible() {
        // A placed but unwired ground symbol never forces a node 0.
        let mut sch = Schematic::new();
        sch.add_component(Component::ground("G1"))
            .add_component(resistor("R1", "A", "B", "5k"));

        let rows = sch.generate_netlist();
        assert_eq!(rows_to_string(&rows), "R1 1 2 5k\n");
        assert!(rows.iter().all(|r| r.node1 != 0 && r.node2 != 0));
    }

    #[test]
    fn ground_reached_transitively_still_pins_zero() {
        let mut sch = Schematic::new();
        sch.add_component(resistor("R1", "A", "B", "1k"))
            .add_component(resistor("R2", "C", "D", "2k"))
            .add_connection("B", "C")
            .add_connection("C", TerminalId::Ground);

        let rows = sch.generate_netlist();
        // A=1, B=C=0 (grounded through the B-C wire), D=2.
        assert_eq!(rows_to_string(&rows), "R1 1 0 1k\nR2 0 2 2k\n");
    }

    #[test]
    fn only_the_ground_class_maps_to_zero() {
        let mut sch = Schematic::new();
        sch.add_component(resistor("R1", "A", "B", "1k"))
            .add_component(resistor("R2", "C", "D", "2k"))
            .add_connection("A", TerminalId::Ground);

        let rows = sch.generate_netlist();
        let zero_nodes: Vec<u32> = rows
            .iter()
            .flat_map(|r| [r.node1, r.node2])
            .filter(|&n| n == 0)
            .collect();
        assert_eq!(zero_nodes.len(), 1);
        assert_eq!(rows_to_string(&rows), "R1 0 1 1k\nR2 2 3 2k\n");
    }

    #[test]
    fn duplicate_wires_and_self_pairs_are_inert() {
        let mut base = Schematic::new();
        base.add_component(resistor("R1", "A", "B", "10k"))
            .add_component(resistor("R2", "B", "C", "1k"))
            .add_connection("B", "C");

        let mut noisy = base.clone();
        noisy
            .add_connection("B", "C")
            .add_connection("C", "B")
            .add_connection("A", "A")
            .add_connection("B", "C");

        assert_eq!(base.generate_netlist(), noisy.generate_netlist());
    }

    #[test]
    fn generate_is_idempotent() {
        let mut sch = Schematic::new();
        sch.add_component(Component::ground("G1"))
            .add_component(resistor("R1", "A", "B", "5k"))
            .add_component(resistor("R2", "C", "D", "2k"))
            .add_connection("B", "C")
            .add_connection("A", TerminalId::Ground);

        let first = rows_to_string(&sch.generate_netlist());
        let second = rows_to_string(&sch.generate_netlist());
        assert_eq!(first, second);
    }

    #[test]
    fn numbering_is_independent_of_union_order() {
        // Same registration order (all terminals come from the component
        // pass), same resulting partition, permuted wires.
        let components = [
            resistor("R1", "A", "B", "1"),
            resistor("R2", "C", "D", "2"),
            resistor("R3", "E", "F", "3"),
        ];

        let mut forward = Schematic::new();
        let mut backward = Schematic::new();
        for c in &components {
            forward.add_component(c.clone());
            backward.add_component(c.clone());
        }
        forward.add_connection("B", "C").add_connection("D", "E");
        backward.add_connection("D", "E").add_connection("B", "C");

        assert_eq!(forward.generate_netlist(), backward.generate_netlist());
    }

    #[test]
    fn malformed_components_are_dropped() {
        let mut one_terminal = resistor("R9", "X", "Y", "1k");
        one_terminal.terminals.truncate(1);

        let mut sch = Schematic::new();
        sch.add_component(Component::ground("G1"))
            .add_component(one_terminal)
            .add_component(resistor("R1", "A", "B", "10k"));

        let rows = sch.generate_netlist();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "R1");
    }

    #[test]
    fn row_without_value_has_no_trailing_field() {
        let row = NetlistRow {
            name: "R1".to_string(),
            node1: 1,
            node2: 2,
            value: None,
        };
        assert_eq!(row.to_string(), "R1 1 2");
    }

    #[test]
    fn voltage_divider_snapshot() {
        let mut sch = Schematic::new();
        sch.add_component(Component::ground("G1"))
            .add_component(Component::new("V1", ComponentKind::VoltageSource, "5V"))
            .add_component(Component::new("R1", ComponentKind::Resistor, "10k"))
            .add_component(Component::new("R2", ComponentKind::Resistor, "10k"))
            .add_connection("V1.n1", "R1.n1")
            .add_connection("R1.n2", "R2.n1")
            .add_connection("R2.n2", TerminalId::Ground)
            .add_connection("V1.n2", TerminalId::Ground);

        let output = rows_to_string(&sch.generate_netlist());
        insta::assert_snapshot!(output, @r"
        V1 1 0 5V
        R1 1 2 10k
        R2 2 0 10k
        ");
    }
}
