//! Wait-for graph detector
//!
//! Builds process-to-process wait edges from the request and allocation
//! matrices and searches them for cycles. A cycle proves deadlock only when
//! every resource type has a single instance; with multi-instance resources
//! a cycle may resolve once some other holder releases.

use dlock_types::{format_pids, Pid, PidSet, Rid, SystemState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process `from_pid` waits for resource `resource_id` held by `to_pid`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitForEdge {
    pub from_pid: Pid,
    pub to_pid: Pid,
    pub resource_id: Rid,
}

impl fmt::Display for WaitForEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P{} → P{} (waiting for R{})",
            self.from_pid, self.to_pid, self.resource_id
        )
    }
}

/// One hop of a cycle, with every resource that links the two processes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleEdge {
    pub from_pid: Pid,
    pub to_pid: Pid,
    pub resources: Vec<Rid>,
}

/// A closed wait chain `processes[0] → … → processes[k-1] → processes[0]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub processes: Vec<Pid>,
    pub edges: Vec<CycleEdge>,
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pid in &self.processes {
            write!(f, "P{pid} → ")?;
        }
        match self.processes.first() {
            Some(first) => write!(f, "P{first}"),
            None => Ok(()),
        }
    }
}

/// Directed wait-for graph over process positions
#[derive(Debug, Clone, Default)]
pub struct WaitForGraph {
    edges: Vec<WaitForEdge>,
    /// Successors per process, deduplicated, in first-insertion order
    adjacency: Vec<Vec<Pid>>,
}

impl WaitForGraph {
    /// Build the graph from a validated state.
    ///
    /// Edges are enumerated by increasing requester, then resource, then
    /// holder. A process never waits on itself, even when it holds some of
    /// the resource type it requests.
    #[must_use]
    pub fn build(state: &SystemState) -> Self {
        let n = state.process_count();
        let mut graph = Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); n],
        };

        for (i, requests) in state.request.iter().enumerate() {
            for (j, &requested) in requests.iter().enumerate() {
                if requested == 0 {
                    continue;
                }
                for (k, held) in state.allocation.iter().enumerate() {
                    if k != i && held.get(j).copied().unwrap_or(0) > 0 {
                        graph.add_edge(WaitForEdge {
                            from_pid: i,
                            to_pid: k,
                            resource_id: j,
                        });
                    }
                }
            }
        }

        graph
    }

    fn add_edge(&mut self, edge: WaitForEdge) {
        let successors = &mut self.adjacency[edge.from_pid];
        if !successors.contains(&edge.to_pid) {
            successors.push(edge.to_pid);
        }
        self.edges.push(edge);
    }

    /// Every wait-for edge, including parallel edges for different resources
    #[must_use]
    pub fn edges(&self) -> &[WaitForEdge] {
        &self.edges
    }

    /// Distinct processes `pid` waits for
    #[must_use]
    pub fn successors(&self, pid: Pid) -> &[Pid] {
        self.adjacency.get(pid).map_or(&[], Vec::as_slice)
    }

    /// Resources through which `from` waits for `to`
    #[must_use]
    pub fn resources_between(&self, from: Pid, to: Pid) -> Vec<Rid> {
        let mut resources = Vec::new();
        for edge in &self.edges {
            if edge.from_pid == from && edge.to_pid == to && !resources.contains(&edge.resource_id)
            {
                resources.push(edge.resource_id);
            }
        }
        resources
    }

    /// Depth-first cycle search from every unvisited process.
    ///
    /// Reports at most one cycle per DFS root: once a back edge closes a
    /// cycle the rest of that root's exploration is abandoned. The union of
    /// reported cycles is the deadlocked set; enumerating every simple cycle
    /// is not attempted.
    #[must_use]
    pub fn find_cycles(&self) -> Vec<Cycle> {
        let n = self.adjacency.len();
        let mut visited = vec![false; n];
        let mut on_stack = vec![false; n];
        let mut path = Vec::new();
        let mut cycles = Vec::new();

        for root in 0..n {
            if visited[root] {
                continue;
            }
            if let Some(cycle) = self.dfs(root, &mut visited, &mut on_stack, &mut path) {
                tracing::debug!(root, cycle = %cycle, "wait-for cycle found");
                cycles.push(cycle);
            }
            // A reported cycle leaves its chain on the stack; each root starts clean.
            for pid in path.drain(..) {
                on_stack[pid] = false;
            }
        }

        cycles
    }

    fn dfs(
        &self,
        node: Pid,
        visited: &mut [bool],
        on_stack: &mut [bool],
        path: &mut Vec<Pid>,
    ) -> Option<Cycle> {
        visited[node] = true;
        on_stack[node] = true;
        path.push(node);

        for &next in self.successors(node) {
            if !visited[next] {
                if let Some(cycle) = self.dfs(next, visited, on_stack, path) {
                    return Some(cycle);
                }
            } else if on_stack[next] {
                let start = path.iter().position(|&p| p == next).unwrap_or(0);
                return Some(self.close_cycle(&path[start..]));
            }
        }

        path.pop();
        on_stack[node] = false;
        None
    }

    fn close_cycle(&self, processes: &[Pid]) -> Cycle {
        let edges = processes
            .iter()
            .enumerate()
            .map(|(idx, &from)| {
                let to = processes[(idx + 1) % processes.len()];
                CycleEdge {
                    from_pid: from,
                    to_pid: to,
                    resources: self.resources_between(from, to),
                }
            })
            .collect();

        Cycle {
            processes: processes.to_vec(),
            edges,
        }
    }
}

/// One entry of the WFG detector's explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WfgStep {
    SystemSize { processes: usize, resource_types: usize },
    EdgesBuilt { count: usize },
    Edge { edge: WaitForEdge },
    NoEdges,
    SearchingCycles,
    NoCycles,
    CyclesFound { count: usize },
    CycleReported { number: usize, cycle: Cycle },
    Deadlocked { processes: PidSet },
}

impl fmt::Display for WfgStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemSize {
                processes,
                resource_types,
            } => write!(
                f,
                "System: {processes} processes, {resource_types} resource types"
            ),
            Self::EdgesBuilt { count } => write!(f, "Wait-for edges ({count}):"),
            Self::Edge { edge } => write!(f, "  {edge}"),
            Self::NoEdges => write!(f, "  No wait-for edges found. No process is waiting."),
            Self::SearchingCycles => write!(f, "Detecting cycles in wait-for graph..."),
            Self::NoCycles => write!(f, "No cycles detected. System is deadlock-free."),
            Self::CyclesFound { count } => {
                write!(f, "Found {count} cycle(s). System is DEADLOCKED.")
            }
            Self::CycleReported { number, cycle } => write!(f, "Cycle {number}: {cycle}"),
            Self::Deadlocked { processes } => {
                write!(f, "Deadlocked processes: {}", format_pids(processes))
            }
        }
    }
}

/// Outcome of [`detect_wfg`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WfgResult {
    pub deadlocked: bool,
    pub deadlocked_processes: PidSet,
    pub cycles: Vec<Cycle>,
    pub wait_for_edges: Vec<WaitForEdge>,
    pub trace: Vec<WfgStep>,
}

impl WfgResult {
    /// Human-readable rendering of the trace
    #[must_use]
    pub fn trace_lines(&self) -> Vec<String> {
        self.trace.iter().map(ToString::to_string).collect()
    }
}

/// Run wait-for graph detection on a validated state.
#[must_use]
pub fn detect_wfg(state: &SystemState) -> WfgResult {
    let mut trace = vec![WfgStep::SystemSize {
        processes: state.process_count(),
        resource_types: state.resource_count(),
    }];

    let graph = WaitForGraph::build(state);
    trace.push(WfgStep::EdgesBuilt {
        count: graph.edges().len(),
    });
    if graph.edges().is_empty() {
        trace.push(WfgStep::NoEdges);
    } else {
        trace.extend(graph.edges().iter().map(|&edge| WfgStep::Edge { edge }));
    }

    trace.push(WfgStep::SearchingCycles);
    let cycles = graph.find_cycles();
    let deadlocked_processes: PidSet = cycles
        .iter()
        .flat_map(|cycle| cycle.processes.iter().copied())
        .collect();

    if cycles.is_empty() {
        trace.push(WfgStep::NoCycles);
    } else {
        trace.push(WfgStep::CyclesFound {
            count: cycles.len(),
        });
        trace.extend(
            cycles
                .iter()
                .enumerate()
                .map(|(idx, cycle)| WfgStep::CycleReported {
                    number: idx + 1,
                    cycle: cycle.clone(),
                }),
        );
        trace.push(WfgStep::Deadlocked {
            processes: deadlocked_processes.clone(),
        });
    }

    tracing::debug!(
        edges = graph.edges().len(),
        cycles = cycles.len(),
        deadlocked = !deadlocked_processes.is_empty(),
        "wait-for graph detection finished"
    );

    WfgResult {
        deadlocked: !cycles.is_empty(),
        deadlocked_processes,
        cycles,
        wait_for_edges: graph.edges,
        trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlock_types::{Process, ResourceType};

    fn single_instance(
        allocation: Vec<Vec<u32>>,
        request: Vec<Vec<u32>>,
        available: Vec<u32>,
    ) -> SystemState {
        let n = allocation.len();
        let m = available.len();
        SystemState::new(
            (0..n).map(|i| Process::new(i, format!("P{i}"))).collect(),
            (0..m).map(|j| ResourceType::new(j, format!("R{j}"), 1)).collect(),
            available,
            allocation,
            request,
        )
    }

    #[test]
    fn test_two_process_deadlock() {
        let state = single_instance(
            vec![vec![1, 0], vec![0, 1]],
            vec![vec![0, 1], vec![1, 0]],
            vec![0, 0],
        );
        let result = detect_wfg(&state);

        assert!(result.deadlocked);
        assert_eq!(result.deadlocked_processes, PidSet::from([0, 1]));
        assert_eq!(result.wait_for_edges.len(), 2);
        assert_eq!(result.cycles.len(), 1);
        assert_eq!(result.cycles[0].processes, vec![0, 1]);
        assert_eq!(result.cycles[0].to_string(), "P0 → P1 → P0");
        assert_eq!(
            result.cycles[0].edges[1],
            CycleEdge {
                from_pid: 1,
                to_pid: 0,
                resources: vec![0]
            }
        );
    }

    #[test]
    fn test_ring_of_four() {
        let n = 4;
        let allocation = (0..n)
            .map(|i| (0..n).map(|j| u32::from(i == j)).collect())
            .collect();
        let request = (0..n)
            .map(|i| (0..n).map(|j| u32::from(j == (i + 1) % n)).collect())
            .collect();
        let state = single_instance(allocation, request, vec![0; n]);
        let result = detect_wfg(&state);

        assert!(result.deadlocked);
        assert_eq!(result.deadlocked_processes, PidSet::from([0, 1, 2, 3]));
        assert_eq!(result.wait_for_edges.len(), 4);
        assert_eq!(result.cycles[0].processes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_no_self_loop() {
        // P0 holds R0 and asks for another R0; P1 asks for R0 as well
        let state = single_instance(vec![vec![1], vec![0]], vec![vec![1], vec![1]], vec![0]);
        let result = detect_wfg(&state);

        assert!(result
            .wait_for_edges
            .iter()
            .all(|edge| edge.from_pid != edge.to_pid));
        assert_eq!(
            result.wait_for_edges,
            vec![WaitForEdge {
                from_pid: 1,
                to_pid: 0,
                resource_id: 0
            }]
        );
        assert!(!result.deadlocked);
    }

    #[test]
    fn test_parallel_edges_collapse_for_traversal() {
        // P0 waits on P1 through two resources
        let state = single_instance(
            vec![vec![0, 0, 1], vec![1, 1, 0]],
            vec![vec![1, 1, 0], vec![0, 0, 1]],
            vec![0, 0, 0],
        );
        let graph = WaitForGraph::build(&state);
        assert_eq!(graph.edges().len(), 3);
        assert_eq!(graph.successors(0), &[1]);
        assert_eq!(graph.resources_between(0, 1), vec![0, 1]);

        let cycles = graph.find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].edges[0].resources, vec![0, 1]);
    }

    #[test]
    fn test_waiter_outside_cycle_not_reported() {
        // P0 <-> P1 deadlocked, P2 waits on P0 but is not on the cycle
        let state = single_instance(
            vec![vec![1, 0], vec![0, 1], vec![0, 0]],
            vec![vec![0, 1], vec![1, 0], vec![1, 0]],
            vec![0, 0],
        );
        let result = detect_wfg(&state);
        assert_eq!(result.deadlocked_processes, PidSet::from([0, 1]));
        assert_eq!(result.cycles.len(), 1);
    }

    #[test]
    fn test_two_disjoint_cycles() {
        let state = single_instance(
            vec![vec![1, 0, 0, 0], vec![0, 1, 0, 0], vec![0, 0, 1, 0], vec![0, 0, 0, 1]],
            vec![vec![0, 1, 0, 0], vec![1, 0, 0, 0], vec![0, 0, 0, 1], vec![0, 0, 1, 0]],
            vec![0, 0, 0, 0],
        );
        let result = detect_wfg(&state);
        assert_eq!(result.cycles.len(), 2);
        assert_eq!(result.cycles[1].processes, vec![2, 3]);
        assert_eq!(result.deadlocked_processes.len(), 4);
    }

    #[test]
    fn test_empty_system() {
        let result = detect_wfg(&SystemState::default());
        assert!(!result.deadlocked);
        assert!(result.deadlocked_processes.is_empty());
        assert!(result.cycles.is_empty());
        assert_eq!(
            result.trace_lines(),
            vec![
                "System: 0 processes, 0 resource types",
                "Wait-for edges (0):",
                "  No wait-for edges found. No process is waiting.",
                "Detecting cycles in wait-for graph...",
                "No cycles detected. System is deadlock-free.",
            ]
        );
    }

    #[test]
    fn test_trace_mentions_edges_and_cycle() {
        let state = single_instance(
            vec![vec![1, 0], vec![0, 1]],
            vec![vec![0, 1], vec![1, 0]],
            vec![0, 0],
        );
        let lines = detect_wfg(&state).trace_lines();
        assert!(lines.contains(&"  P0 → P1 (waiting for R1)".to_string()));
        assert!(lines.contains(&"Cycle 1: P0 → P1 → P0".to_string()));
        assert_eq!(lines.last().unwrap(), "Deadlocked processes: P0, P1");
    }
}
