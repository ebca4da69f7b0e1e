use std::collections::VecDeque;

use crate::config::BattleConfig;
use crate::hex::BattleHex;

/// Movement distances from one starting hex to every hex of the field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distances {
    start: BattleHex,
    steps: [u32; BattleConfig::FIELD_SIZE],
}

impl Distances {
    const UNREACHABLE: u32 = u32::MAX;

    /// Breadth-first search from `start`. `passable` decides whether a hex may
    /// be walked through; the start hex is always entered.
    pub fn compute(start: BattleHex, passable: impl Fn(BattleHex) -> bool) -> Self {
        let mut steps = [Self::UNREACHABLE; BattleConfig::FIELD_SIZE];
        if !start.is_valid() {
            return Self { start, steps };
        }

        let mut queue = VecDeque::new();
        steps[start.index() as usize] = 0;
        queue.push_back(start);
        while let Some(hex) = queue.pop_front() {
            let next = steps[hex.index() as usize] + 1;
            for neighbour in hex.neighbours() {
                let slot = &mut steps[neighbour.index() as usize];
                if *slot != Self::UNREACHABLE || !neighbour.is_available() || !passable(neighbour) {
                    continue;
                }
                *slot = next;
                queue.push_back(neighbour);
            }
        }
        Self { start, steps }
    }

    pub fn start(&self) -> BattleHex {
        self.start
    }

    /// Steps needed to reach `hex`, `None` when unreachable.
    pub fn get(&self, hex: BattleHex) -> Option<u32> {
        if !hex.is_valid() {
            return None;
        }
        match self.steps[hex.index() as usize] {
            Self::UNREACHABLE => None,
            steps => Some(steps),
        }
    }

    pub fn is_reachable(&self, hex: BattleHex) -> bool {
        self.get(hex).is_some()
    }
}
