//! The power dependency graph consumed by [PlaintextPowers](crate::PlaintextPowers).
//!
//! A planner (outside this crate) decides which exponents the sender needs and
//! how each one is obtained from smaller ones. [PowersDag] takes that plan as
//! a list of `(power, rule)` pairs, validates it once, and keeps it as an
//! immutable arena in topological order.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use itertools::Itertools;

use crate::{PowersError, Result};

/// How a power is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerRule {
    /// Supplied directly rather than derived inside the graph.
    Source,
    /// `x^(2s) = (x^s)^2`.
    Square(u32),
    /// `x^(a+b) = x^a * x^b`.
    Multiply(u32, u32),
}

impl PowerRule {

    /// Parent exponents of this rule.
    pub fn parents(&self) -> Vec<u32> {
        match *self {
            PowerRule::Source => vec![],
            PowerRule::Square(s) => vec![s],
            PowerRule::Multiply(a, b) => vec![a, b],
        }
    }

    /// The exponent this rule produces, if it is derived.
    pub fn produces(&self) -> Option<u64> {
        match *self {
            PowerRule::Source => None,
            PowerRule::Square(s) => Some(2 * s as u64),
            PowerRule::Multiply(a, b) => Some(a as u64 + b as u64),
        }
    }

    /// Is this a source node?
    pub fn is_source(&self) -> bool {
        matches!(self, PowerRule::Source)
    }

}

/// One node of a [PowersDag].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowersNode {
    /// The exponent this node holds.
    pub power: u32,
    /// How the exponent is obtained.
    pub rule: PowerRule,
    /// Multiplicative depth: 0 for sources, otherwise one more than the deepest parent.
    pub depth: u32,
}

impl PowersNode {
    /// Is this a source node?
    pub fn is_source(&self) -> bool {
        self.rule.is_source()
    }
}

/// A validated, immutable power dependency graph.
#[derive(Clone, Debug)]
pub struct PowersDag {
    nodes: Vec<PowersNode>,
    index: HashMap<u32, usize>,
    outputs: BTreeSet<u32>,
    depth: u32,
}

impl PowersDag {

    /// Validates a planned graph.
    ///
    /// `rules` lists every node with its production rule. Power 1 is added as
    /// a source if it is not listed. `outputs` names the powers that are
    /// exported by [PlaintextPowers::encrypt](crate::PlaintextPowers::encrypt);
    /// an empty set means "all source powers".
    ///
    /// ```rust
    /// use psu_powers::{PowersDag, PowerRule};
    /// let dag = PowersDag::new(
    ///     vec![(2, PowerRule::Square(1)), (3, PowerRule::Multiply(1, 2)), (4, PowerRule::Square(2))],
    ///     vec![1, 2, 3, 4],
    /// ).unwrap();
    /// assert_eq!(dag.up_to(), 4);
    /// assert_eq!(dag.depth(), 2);
    /// ```
    pub fn new<R, O>(rules: R, outputs: O) -> Result<Self>
    where
        R: IntoIterator<Item = (u32, PowerRule)>,
        O: IntoIterator<Item = u32>,
    {
        let mut declared: HashMap<u32, PowerRule> = HashMap::new();
        for (power, rule) in rules {
            if power == 0 {
                return Err(PowersError::ZeroPower);
            }
            if declared.insert(power, rule).is_some() {
                return Err(PowersError::DuplicatePower(power));
            }
        }
        match declared.get(&1) {
            Some(PowerRule::Source) => (),
            Some(_) => return Err(PowersError::InvalidSeed),
            None => { declared.insert(1, PowerRule::Source); }
        }

        // Missing parents are reported in ascending power order.
        for power in declared.keys().copied().sorted() {
            for parent in declared[&power].parents() {
                if !declared.contains_key(&parent) {
                    return Err(PowersError::MissingSource { power, parent });
                }
            }
        }

        let order = Self::topological_order(&declared)?;

        for &power in &order {
            let rule = declared[&power];
            if let Some(produced) = rule.produces() {
                if produced != power as u64 {
                    return Err(PowersError::InconsistentRule { power, rule });
                }
            }
        }

        let mut nodes: Vec<PowersNode> = Vec::with_capacity(order.len());
        let mut index: HashMap<u32, usize> = HashMap::with_capacity(order.len());
        for power in order {
            let rule = declared[&power];
            let depth = rule.parents().iter()
                .map(|p| nodes[index[p]].depth + 1)
                .max()
                .unwrap_or(0);
            index.insert(power, nodes.len());
            nodes.push(PowersNode { power, rule, depth });
        }
        let depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0);

        let mut outputs: BTreeSet<u32> = outputs.into_iter().collect();
        if let Some(&unknown) = outputs.iter().find(|p| !index.contains_key(*p)) {
            return Err(PowersError::UnknownOutput(unknown));
        }
        if outputs.is_empty() {
            outputs = nodes.iter().filter(|n| n.is_source()).map(|n| n.power).collect();
        }

        Ok(Self { nodes, index, outputs, depth })
    }

    // Kahn's algorithm; the ready set is ordered so the result is deterministic.
    fn topological_order(declared: &HashMap<u32, PowerRule>) -> Result<Vec<u32>> {
        let mut pending: HashMap<u32, usize> = HashMap::with_capacity(declared.len());
        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
        for (&power, rule) in declared {
            let parents: BTreeSet<u32> = rule.parents().into_iter().collect();
            pending.insert(power, parents.len());
            for parent in parents {
                children.entry(parent).or_default().push(power);
            }
        }
        let mut ready: BTreeSet<u32> = pending.iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(&power, _)| power)
            .collect();
        let mut order = Vec::with_capacity(declared.len());
        while let Some(power) = ready.pop_first() {
            order.push(power);
            for child in children.get(&power).into_iter().flatten() {
                if let Some(count) = pending.get_mut(child) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(*child);
                    }
                }
            }
        }
        if order.len() != declared.len() {
            let stuck = pending.into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(power, _)| power)
                .sorted()
                .collect();
            return Err(PowersError::CyclicDependency(stuck));
        }
        Ok(order)
    }

    /// The largest power in the graph.
    pub fn up_to(&self) -> u32 {
        self.nodes.iter().map(|n| n.power).max().unwrap_or(1)
    }

    /// The largest multiplicative depth of any node.
    pub fn depth(&self) -> u32 {self.depth}

    /// Number of nodes, power 1 included.
    pub fn len(&self) -> usize {self.nodes.len()}

    /// Always false: power 1 is always present.
    pub fn is_empty(&self) -> bool {self.nodes.is_empty()}

    /// Number of source nodes.
    pub fn source_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_source()).count()
    }

    /// Source powers in ascending order.
    pub fn source_powers(&self) -> BTreeSet<u32> {
        self.nodes.iter().filter(|n| n.is_source()).map(|n| n.power).collect()
    }

    /// Powers exported after encryption.
    pub fn outputs(&self) -> &BTreeSet<u32> {&self.outputs}

    /// Look up a node by power.
    pub fn node(&self, power: u32) -> Option<&PowersNode> {
        self.index.get(&power).map(|&i| &self.nodes[i])
    }

    /// Nodes in topological order.
    pub fn iter(&self) -> impl Iterator<Item = &PowersNode> {
        self.nodes.iter()
    }

    /// Nodes grouped by depth. Nodes of one layer never depend on each other.
    pub fn layers(&self) -> Vec<Vec<&PowersNode>> {
        let mut layers = vec![Vec::new(); self.depth as usize + 1];
        for node in &self.nodes {
            layers[node.depth as usize].push(node);
        }
        layers
    }

    /// Calls `f` on every node in topological order.
    pub fn apply<F: FnMut(&PowersNode)>(&self, f: F) {
        self.nodes.iter().for_each(f);
    }

    /// Graphviz rendering, edges pointing from parent to child. Same as the
    /// [Display](fmt::Display) output.
    pub fn to_dot(&self) -> String {
        self.to_string()
    }

}

impl fmt::Display for PowersDag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph powers {{")?;
        for node in &self.nodes {
            writeln!(f, "  {} [label=\"{} (depth {})\"];", node.power, node.power, node.depth)?;
        }
        for node in &self.nodes {
            match node.rule {
                PowerRule::Source => (),
                PowerRule::Square(s) => writeln!(f, "  {} -> {} [label=\"sq\"];", s, node.power)?,
                PowerRule::Multiply(a, b) => writeln!(f, "  {{{}}} -> {};", [a, b].iter().join(" "), node.power)?,
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Square-and-multiply chain over every power up to `up_to`, for tests and benches.
    pub(crate) fn ladder(up_to: u32) -> PowersDag {
        let rules = (2..=up_to).map(|p| {
            if p % 2 == 0 {(p, PowerRule::Square(p / 2))} else {(p, PowerRule::Multiply(p - 1, 1))}
        });
        PowersDag::new(rules, 1..=up_to).unwrap()
    }

    #[test]
    fn test_concrete_graph() {
        let dag = PowersDag::new(
            vec![(2, PowerRule::Square(1)), (3, PowerRule::Multiply(1, 2)), (4, PowerRule::Square(2))],
            vec![1, 2, 3, 4],
        ).unwrap();
        assert_eq!(dag.len(), 4);
        assert_eq!(dag.up_to(), 4);
        assert_eq!(dag.depth(), 2);
        assert_eq!(dag.source_count(), 1);
        assert_eq!(dag.iter().map(|n| n.power).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(dag.node(3).unwrap().rule, PowerRule::Multiply(1, 2));
        assert_eq!(dag.node(3).unwrap().depth, 2);
        assert!(dag.node(5).is_none());
        let layers: Vec<Vec<u32>> = dag.layers().iter().map(|l| l.iter().map(|n| n.power).collect()).collect();
        assert_eq!(layers, vec![vec![1], vec![2], vec![3, 4]]);
    }

    #[test]
    fn test_topological_order_follows_dependencies() {
        // Declared out of order on purpose.
        let dag = PowersDag::new(
            vec![
                (7, PowerRule::Multiply(3, 4)),
                (4, PowerRule::Square(2)),
                (3, PowerRule::Source),
                (2, PowerRule::Square(1)),
                (6, PowerRule::Square(3)),
            ],
            vec![],
        ).unwrap();
        let position: HashMap<u32, usize> = dag.iter().enumerate().map(|(i, n)| (n.power, i)).collect();
        dag.apply(|node| {
            for parent in node.rule.parents() {
                assert!(position[&parent] < position[&node.power]);
            }
        });
        assert_eq!(dag.source_powers(), BTreeSet::from([1, 3]));
        // Empty outputs default to the sources.
        assert_eq!(dag.outputs(), &BTreeSet::from([1, 3]));
        assert_eq!(dag.node(7).unwrap().depth, 3);
    }

    #[test]
    fn test_implicit_seed() {
        let dag = PowersDag::new(vec![], vec![]).unwrap();
        assert_eq!(dag.len(), 1);
        assert_eq!(dag.up_to(), 1);
        assert_eq!(dag.depth(), 0);
        assert!(dag.node(1).unwrap().is_source());
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(
            PowersDag::new(vec![(0, PowerRule::Source)], vec![]).unwrap_err(),
            PowersError::ZeroPower
        );
        assert_eq!(
            PowersDag::new(vec![(2, PowerRule::Square(1)), (2, PowerRule::Multiply(1, 1))], vec![]).unwrap_err(),
            PowersError::DuplicatePower(2)
        );
        assert_eq!(
            PowersDag::new(vec![(1, PowerRule::Square(1))], vec![]).unwrap_err(),
            PowersError::InvalidSeed
        );
        assert_eq!(
            PowersDag::new(vec![(4, PowerRule::Square(2))], vec![]).unwrap_err(),
            PowersError::MissingSource { power: 4, parent: 2 }
        );
        assert_eq!(
            PowersDag::new(vec![(3, PowerRule::Multiply(1, 1))], vec![]).unwrap_err(),
            PowersError::InconsistentRule { power: 3, rule: PowerRule::Multiply(1, 1) }
        );
        assert_eq!(
            PowersDag::new(vec![(2, PowerRule::Square(1))], vec![1, 2, 5]).unwrap_err(),
            PowersError::UnknownOutput(5)
        );
    }

    #[test]
    fn test_rejects_cycle() {
        let err = PowersDag::new(
            vec![(2, PowerRule::Multiply(1, 3)), (3, PowerRule::Multiply(1, 2))],
            vec![],
        ).unwrap_err();
        assert_eq!(err, PowersError::CyclicDependency(vec![2, 3]));

        let err = PowersDag::new(vec![(2, PowerRule::Square(2))], vec![]).unwrap_err();
        assert_eq!(err, PowersError::CyclicDependency(vec![2]));
    }

    #[test]
    fn test_ladder() {
        let dag = ladder(16);
        assert_eq!(dag.len(), 16);
        assert_eq!(dag.up_to(), 16);
        // 15 = 14 + 1, 14 = 7^2, 7 = 6 + 1, 6 = 3^2, 3 = 2 + 1, 2 = 1^2
        assert_eq!(dag.depth(), 6);
        assert_eq!(dag.node(16).unwrap().depth, 4);
        assert_eq!(dag.outputs().len(), 16);
    }

    #[test]
    fn test_to_dot() {
        let dag = PowersDag::new(
            vec![(2, PowerRule::Square(1)), (3, PowerRule::Multiply(1, 2))],
            vec![],
        ).unwrap();
        let dot = dag.to_dot();
        assert!(dot.starts_with("digraph powers {"));
        assert!(dot.contains("1 -> 2 [label=\"sq\"];"));
        assert!(dot.contains("{1 2} -> 3;"));
        assert!(dot.ends_with('}'));
        assert_eq!(dot, format!("{}", dag));
        assert_eq!(dot.lines().count(), 1 + 3 + 2 + 1);
    }
}
