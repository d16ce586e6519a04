//! Turn order for one encounter.
//!
//! The queue is built once at combat start and never reordered. Defeated
//! combatants stay in the queue and are skipped, so a revived combatant
//! rejoins the rotation at its original place.

use crate::combatant::{Combatant, CombatantId};
use crate::rng::RandomSource;

/// Errors that can occur during turn operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("no combatant is able to act")]
    NoActiveCombatants,
}

/// Cyclic ordered queue with a cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnQueue {
    order: Vec<CombatantId>,
    cursor: Option<usize>,
    round: u32,
}

impl TurnQueue {
    /// Queue in insertion order (`party ++ enemies`).
    pub fn new(order: impl IntoIterator<Item = CombatantId>) -> Self {
        Self {
            order: order.into_iter().collect(),
            cursor: None,
            round: 0,
        }
    }

    /// Queue ordered by an initiative roll of `d20 + DEX modifier`, highest
    /// first. Ties keep insertion order.
    pub fn with_initiative<'a>(
        combatants: impl IntoIterator<Item = &'a Combatant>,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut rolled: Vec<(i32, CombatantId)> = combatants
            .into_iter()
            .map(|combatant| {
                let roll = rng.roll_die(20) as i32 + combatant.stats.dex_modifier();
                (roll, combatant.id)
            })
            .collect();
        // stable sort: equal rolls stay in insertion order
        rolled.sort_by(|a, b| b.0.cmp(&a.0));
        Self::new(rolled.into_iter().map(|(_, id)| id))
    }

    /// Advances to the next combatant for whom `can_act` holds.
    ///
    /// Returns the new current combatant, or an error (leaving the cursor
    /// untouched) when nobody can act.
    pub fn advance(
        &mut self,
        can_act: impl Fn(CombatantId) -> bool,
    ) -> Result<CombatantId, TurnError> {
        let len = self.order.len();
        if len == 0 {
            return Err(TurnError::NoActiveCombatants);
        }
        let start = self.cursor.map_or(0, |cursor| cursor + 1);
        for step in 0..len {
            let index = (start + step) % len;
            let id = self.order[index];
            if can_act(id) {
                let wrapped = self.cursor.is_none_or(|cursor| index <= cursor);
                if wrapped {
                    self.round += 1;
                }
                self.cursor = Some(index);
                return Ok(id);
            }
        }
        Err(TurnError::NoActiveCombatants)
    }

    /// Combatant whose turn it currently is.
    pub fn current(&self) -> Option<CombatantId> {
        self.cursor.map(|index| self.order[index])
    }

    /// Number of times the rotation has started over (1 during the first round).
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn order(&self) -> &[CombatantId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
