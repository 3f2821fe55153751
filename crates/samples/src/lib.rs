#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Built-in example states for dlock
//!
//! Textbook deadlock and safe-state scenarios, looked up by display name.
//! Every fixture satisfies resource conservation.

use dlock_types::{Process, ResourceType, SystemState};

/// A named example state
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    pub name: &'static str,
    /// Whether matrix detection finds a deadlock
    pub deadlocked: bool,
    build: fn() -> SystemState,
}

impl Fixture {
    #[must_use]
    pub fn state(&self) -> SystemState {
        (self.build)()
    }
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        name: "Circular Deadlock (Single-Instance)",
        deadlocked: true,
        build: circular_deadlock,
    },
    Fixture {
        name: "Two Process Deadlock (Single-Instance)",
        deadlocked: true,
        build: two_process_deadlock,
    },
    Fixture {
        name: "Chain Deadlock (Single-Instance)",
        deadlocked: true,
        build: chain_deadlock,
    },
    Fixture {
        name: "Database Lock Deadlock (Single-Instance)",
        deadlocked: true,
        build: database_deadlock,
    },
    Fixture {
        name: "Dining Philosophers (Deadlock)",
        deadlocked: true,
        build: dining_philosophers,
    },
    Fixture {
        name: "Multi-Instance Deadlock",
        deadlocked: true,
        build: multi_instance_deadlock,
    },
    Fixture {
        name: "Partial Deadlock",
        deadlocked: true,
        build: partial_deadlock,
    },
    Fixture {
        name: "Safe State",
        deadlocked: false,
        build: safe_state,
    },
    Fixture {
        name: "Simple Safe State",
        deadlocked: false,
        build: simple_safe,
    },
    Fixture {
        name: "Single-Instance Safe",
        deadlocked: false,
        build: single_instance_safe,
    },
    Fixture {
        name: "Sequential Safe (Single-Instance)",
        deadlocked: false,
        build: sequential_safe,
    },
    Fixture {
        name: "No Requests (Trivial Safe)",
        deadlocked: false,
        build: no_requests,
    },
    Fixture {
        name: "Banker's Algorithm (Safe)",
        deadlocked: false,
        build: bankers_safe,
    },
    Fixture {
        name: "Complex Safe State",
        deadlocked: false,
        build: complex_safe,
    },
    Fixture {
        name: "Large System (Safe)",
        deadlocked: false,
        build: large_safe,
    },
];

/// Every fixture, deadlocked scenarios first
#[must_use]
pub fn fixtures() -> &'static [Fixture] {
    FIXTURES
}

/// Fixture names in catalogue order
#[must_use]
pub fn names() -> Vec<&'static str> {
    FIXTURES.iter().map(|f| f.name).collect()
}

/// Build the fixture called `name`, if there is one.
#[must_use]
pub fn by_name(name: &str) -> Option<SystemState> {
    FIXTURES
        .iter()
        .find(|f| f.name == name)
        .map(Fixture::state)
}

/// Build every fixture, paired with its name
#[must_use]
pub fn all() -> Vec<(&'static str, SystemState)> {
    FIXTURES.iter().map(|f| (f.name, f.state())).collect()
}

fn build(
    processes: &[&str],
    resources: &[(&str, u32)],
    available: &[u32],
    allocation: &[&[u32]],
    request: &[&[u32]],
) -> SystemState {
    SystemState::new(
        processes
            .iter()
            .enumerate()
            .map(|(pid, name)| Process::new(pid, *name))
            .collect(),
        resources
            .iter()
            .enumerate()
            .map(|(rid, &(name, instances))| ResourceType::new(rid, name, instances))
            .collect(),
        available.to_vec(),
        allocation.iter().map(|row| row.to_vec()).collect(),
        request.iter().map(|row| row.to_vec()).collect(),
    )
}

const P3: &[&str] = &["P0", "P1", "P2"];
const P4: &[&str] = &["P0", "P1", "P2", "P3"];
const P5: &[&str] = &["P0", "P1", "P2", "P3", "P4"];

fn circular_deadlock() -> SystemState {
    build(
        P3,
        &[("R0", 1), ("R1", 1), ("R2", 1)],
        &[0, 0, 0],
        &[&[1, 0, 0], &[0, 1, 0], &[0, 0, 1]],
        &[&[0, 1, 0], &[0, 0, 1], &[1, 0, 0]],
    )
}

fn two_process_deadlock() -> SystemState {
    build(
        &["Process A", "Process B"],
        &[("File1", 1), ("File2", 1)],
        &[0, 0],
        &[&[1, 0], &[0, 1]],
        &[&[0, 1], &[1, 0]],
    )
}

fn chain_deadlock() -> SystemState {
    build(
        P4,
        &[("Printer", 1), ("Scanner", 1), ("Plotter", 1), ("CD-ROM", 1)],
        &[0, 0, 0, 0],
        &[&[1, 0, 0, 0], &[0, 1, 0, 0], &[0, 0, 1, 0], &[0, 0, 0, 1]],
        &[&[0, 1, 0, 0], &[0, 0, 1, 0], &[0, 0, 0, 1], &[1, 0, 0, 0]],
    )
}

fn database_deadlock() -> SystemState {
    build(
        &["Transaction T1", "Transaction T2", "Transaction T3"],
        &[("Table Lock A", 1), ("Table Lock B", 1), ("Table Lock C", 1)],
        &[0, 0, 0],
        &[&[1, 0, 0], &[0, 1, 0], &[0, 0, 1]],
        &[&[0, 1, 0], &[0, 0, 1], &[1, 0, 0]],
    )
}

fn dining_philosophers() -> SystemState {
    build(
        &[
            "Philosopher 0",
            "Philosopher 1",
            "Philosopher 2",
            "Philosopher 3",
            "Philosopher 4",
        ],
        &[
            ("Fork 0", 1),
            ("Fork 1", 1),
            ("Fork 2", 1),
            ("Fork 3", 1),
            ("Fork 4", 1),
        ],
        &[0, 0, 0, 0, 0],
        &[
            &[1, 0, 0, 0, 0],
            &[0, 1, 0, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 0, 1, 0],
            &[0, 0, 0, 0, 1],
        ],
        &[
            &[0, 1, 0, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 0, 1, 0],
            &[0, 0, 0, 0, 1],
            &[1, 0, 0, 0, 0],
        ],
    )
}

fn multi_instance_deadlock() -> SystemState {
    build(
        P4,
        &[("R0", 3), ("R1", 2)],
        &[0, 0],
        &[&[1, 0], &[1, 1], &[1, 0], &[0, 1]],
        &[&[0, 1], &[0, 1], &[1, 0], &[1, 0]],
    )
}

fn partial_deadlock() -> SystemState {
    build(
        P4,
        &[("R0", 2), ("R1", 2)],
        &[0, 0],
        &[&[1, 0], &[1, 1], &[0, 1], &[0, 0]],
        &[&[0, 1], &[0, 1], &[1, 0], &[0, 0]],
    )
}

fn safe_state() -> SystemState {
    build(
        P3,
        &[("R0", 10), ("R1", 5), ("R2", 7)],
        &[3, 3, 2],
        &[&[0, 1, 0], &[2, 0, 0], &[5, 1, 5]],
        &[&[7, 4, 3], &[1, 2, 2], &[0, 0, 0]],
    )
}

fn simple_safe() -> SystemState {
    build(
        P3,
        &[("R0", 5), ("R1", 3)],
        &[2, 1],
        &[&[2, 0], &[1, 1], &[0, 1]],
        &[&[1, 2], &[1, 1], &[2, 1]],
    )
}

fn single_instance_safe() -> SystemState {
    build(
        P3,
        &[("Mutex A", 1), ("Mutex B", 1), ("Mutex C", 1)],
        &[0, 1, 0],
        &[&[1, 0, 0], &[0, 0, 1], &[0, 0, 0]],
        &[&[0, 0, 0], &[0, 1, 0], &[1, 0, 0]],
    )
}

fn sequential_safe() -> SystemState {
    build(
        P4,
        &[("Lock 0", 1), ("Lock 1", 1), ("Lock 2", 1)],
        &[1, 0, 0],
        &[&[0, 1, 0], &[0, 0, 1], &[0, 0, 0], &[0, 0, 0]],
        &[&[0, 0, 0], &[0, 0, 0], &[1, 0, 0], &[0, 1, 0]],
    )
}

fn no_requests() -> SystemState {
    build(
        P3,
        &[("R0", 4), ("R1", 2), ("R2", 3)],
        &[2, 1, 1],
        &[&[1, 0, 1], &[1, 1, 0], &[0, 0, 1]],
        &[&[0, 0, 0], &[0, 0, 0], &[0, 0, 0]],
    )
}

fn bankers_safe() -> SystemState {
    build(
        P5,
        &[("A", 10), ("B", 5), ("C", 7)],
        &[3, 3, 2],
        &[&[0, 1, 0], &[2, 0, 0], &[3, 0, 2], &[2, 1, 1], &[0, 0, 2]],
        &[&[7, 4, 3], &[1, 2, 2], &[6, 0, 0], &[0, 1, 1], &[4, 3, 1]],
    )
}

fn complex_safe() -> SystemState {
    build(
        P5,
        &[("R0", 10), ("R1", 5), ("R2", 7)],
        &[0, 0, 0],
        &[&[3, 2, 2], &[2, 1, 1], &[3, 0, 2], &[1, 1, 1], &[1, 1, 1]],
        &[&[0, 0, 0], &[2, 0, 0], &[0, 0, 0], &[1, 0, 0], &[0, 0, 2]],
    )
}

fn large_safe() -> SystemState {
    build(
        &["P0", "P1", "P2", "P3", "P4", "P5"],
        &[("CPU", 6), ("Memory", 8), ("Disk", 4), ("Network", 3)],
        &[1, 2, 1, 1],
        &[
            &[1, 1, 0, 0],
            &[1, 2, 1, 0],
            &[1, 0, 1, 1],
            &[0, 1, 0, 0],
            &[1, 1, 0, 1],
            &[1, 1, 1, 0],
        ],
        &[
            &[0, 1, 1, 0],
            &[0, 0, 1, 1],
            &[1, 1, 0, 0],
            &[1, 0, 0, 1],
            &[0, 1, 0, 0],
            &[0, 0, 0, 1],
        ],
    )
}
