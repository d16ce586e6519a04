//! Combatants of one encounter, indexed by id.

use gauntlet_core::{CharacterSheet, Combatant, CombatantId, Side};

/// Party members followed by enemies. A combatant's id is its index.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    combatants: Vec<Combatant>,
    party_len: usize,
}

impl Roster {
    pub fn new(party: Vec<CharacterSheet>, enemies: Vec<CharacterSheet>) -> Self {
        let party_len = party.len();
        let combatants = party
            .into_iter()
            .map(|sheet| (sheet, Side::Player))
            .chain(enemies.into_iter().map(|sheet| (sheet, Side::Enemy)))
            .enumerate()
            .map(|(index, (sheet, side))| {
                Combatant::from_sheet(CombatantId(index as u32), sheet, side)
            })
            .collect();
        Self {
            combatants,
            party_len,
        }
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.0 as usize)
    }

    /// Two distinct combatants borrowed mutably at once.
    pub fn pair_mut(
        &mut self,
        first: CombatantId,
        second: CombatantId,
    ) -> Option<(&mut Combatant, &mut Combatant)> {
        let (a, b) = (first.0 as usize, second.0 as usize);
        if a == b || a >= self.combatants.len() || b >= self.combatants.len() {
            return None;
        }
        if a < b {
            let (left, right) = self.combatants.split_at_mut(b);
            Some((&mut left[a], &mut right[0]))
        } else {
            let (left, right) = self.combatants.split_at_mut(a);
            Some((&mut right[0], &mut left[b]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn party(&self) -> &[Combatant] {
        &self.combatants[..self.party_len]
    }

    pub fn enemies(&self) -> &[Combatant] {
        &self.combatants[self.party_len..]
    }

    pub fn ids(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.combatants.iter().map(|combatant| combatant.id)
    }

    /// Living combatants on `side`, in roster order.
    pub fn living(&self, side: Side) -> Vec<CombatantId> {
        self.combatants
            .iter()
            .filter(|combatant| combatant.side == side && combatant.is_alive())
            .map(|combatant| combatant.id)
            .collect()
    }

    pub fn all_defeated(&self, side: Side) -> bool {
        self.combatants
            .iter()
            .filter(|combatant| combatant.side == side)
            .all(Combatant::is_defeated)
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.get(id).is_some_and(Combatant::is_alive)
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(
            vec![CharacterSheet::new("hero", "Aria", "Fighter", 20, 0)],
            vec![
                CharacterSheet::new("g1", "Snik", "Goblin", 7, 0),
                CharacterSheet::new("g2", "Snak", "Goblin", 7, 0),
            ],
        )
    }

    #[test]
    fn party_ids_come_first() {
        let roster = roster();
        assert_eq!(roster.party()[0].id, CombatantId(0));
        assert_eq!(roster.enemies()[1].id, CombatantId(2));
        assert_eq!(roster.enemies()[1].side, Side::Enemy);
    }

    #[test]
    fn pair_mut_works_in_both_orders() {
        let mut roster = roster();
        let (enemy, hero) = roster.pair_mut(CombatantId(2), CombatantId(0)).unwrap();
        assert_eq!((enemy.name.as_str(), hero.name.as_str()), ("Snak", "Aria"));
        assert!(roster.pair_mut(CombatantId(1), CombatantId(1)).is_none());
        assert!(roster.pair_mut(CombatantId(0), CombatantId(9)).is_none());
    }

    #[test]
    fn side_defeat_needs_everyone_down() {
        let mut roster = roster();
        roster.get_mut(CombatantId(1)).unwrap().take_damage(7);
        assert!(!roster.all_defeated(Side::Enemy));
        assert_eq!(roster.living(Side::Enemy), vec![CombatantId(2)]);
        roster.get_mut(CombatantId(2)).unwrap().take_damage(7);
        assert!(roster.all_defeated(Side::Enemy));
    }
}
