//! Applying one action from an attacker to a target.

use super::{Action, ActionError};
use crate::combatant::Combatant;
use crate::config::CombatRules;
use crate::dice::DiceResolver;
use crate::rng::RandomSource;

/// Outcome of a resolved action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    /// HP actually removed from the target.
    pub damage: u32,
    /// HP actually restored to the attacker.
    pub healing: u32,
    /// MP paid by the attacker.
    pub mp_spent: u32,
    /// Target reached 0 HP with this action.
    pub defeated: bool,
    /// Target entered rage mode with this action.
    pub rage_triggered: bool,
}

/// Stateless rule applier for a single action.
#[derive(Clone, Copy, Debug)]
pub struct ActionResolver {
    dice: DiceResolver,
    rage_threshold: f64,
}

impl ActionResolver {
    pub fn new(rules: &CombatRules) -> Self {
        Self {
            dice: DiceResolver::new(rules.fallback_roll),
            rage_threshold: rules.rage_threshold,
        }
    }

    /// Applies `action` from `attacker` to `target`.
    ///
    /// Validation happens before any mutation: a defeated attacker or target,
    /// or a spell the attacker cannot pay for, leaves both untouched.
    /// Pipeline: MP cost → damage to target → healing to attacker → rage and
    /// defeat detection on the target.
    pub fn resolve(
        &self,
        attacker: &mut Combatant,
        target: &mut Combatant,
        action: &Action,
        rng: &mut dyn RandomSource,
    ) -> Result<Resolution, ActionError> {
        self.validate(attacker, target, action)?;

        let mp_spent = action.mp_cost();
        attacker.spend_mp(mp_spent);

        let rolled = self.dice.eval_opt(action.damage(), rng);
        let damage = target.take_damage(rolled);

        let healing = match action.heal() {
            Some(formula) => attacker.heal(self.dice.eval(formula, rng)),
            None => 0,
        };

        let rage_triggered = damage > 0 && self.enter_rage(target);

        Ok(Resolution {
            damage,
            healing,
            mp_spent,
            defeated: target.is_defeated(),
            rage_triggered,
        })
    }

    fn validate(
        &self,
        attacker: &Combatant,
        target: &Combatant,
        action: &Action,
    ) -> Result<(), ActionError> {
        if attacker.id == target.id {
            return Err(ActionError::SelfTarget { actor: attacker.id });
        }
        if attacker.is_defeated() {
            return Err(ActionError::ActorDefeated { actor: attacker.id });
        }
        if target.is_defeated() {
            return Err(ActionError::TargetDefeated { target: target.id });
        }
        let required = action.mp_cost();
        if !attacker.can_afford(required) {
            return Err(ActionError::InsufficientMp {
                required,
                available: attacker.mp(),
            });
        }
        Ok(())
    }

    /// Flags rage the first time HP lands in `(0, threshold]`.
    fn enter_rage(&self, target: &mut Combatant) -> bool {
        if target.in_rage_mode || target.is_defeated() {
            return false;
        }
        if target.hp_fraction() <= self.rage_threshold {
            target.in_rage_mode = true;
            return true;
        }
        false
    }
}

impl Default for ActionResolver {
    fn default() -> Self {
        Self::new(&CombatRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionCatalog;
    use crate::combatant::{CharacterSheet, CombatantId, Side, SkillEntry, SpellEntry};
    use crate::dice::Formula;
    use crate::rng::{PcgRng, ScriptedRng};

    fn hero() -> Combatant {
        let sheet = CharacterSheet::new("hero", "Aria", "Cleric", 20, 5)
            .with_spell(SpellEntry::damage("Smite", "10", 4))
            .with_spell(SpellEntry::heal("Mend", "6", 2));
        Combatant::from_sheet(CombatantId(0), sheet, Side::Player)
    }

    fn ogre(hp: u32) -> Combatant {
        let sheet = CharacterSheet::new("ogre", "Grum", "Ogre", hp, 0)
            .with_skill(SkillEntry::attack("Club", "1d6"));
        Combatant::from_sheet(CombatantId(1), sheet, Side::Enemy)
    }

    fn fixed(name: &str, amount: &str) -> Action {
        Action::Skill {
            name: name.to_string(),
            damage: Some(Formula::from(amount)),
            heal: None,
        }
    }

    #[test]
    fn spell_pays_mp_then_damages() {
        let resolver = ActionResolver::default();
        let mut attacker = hero();
        let mut target = ogre(30);
        let smite = ActionCatalog::find(&attacker, "Smite").unwrap();

        let outcome = resolver
            .resolve(&mut attacker, &mut target, &smite, &mut ScriptedRng::constant(0.0))
            .unwrap();

        assert_eq!(outcome.damage, 10);
        assert_eq!(outcome.mp_spent, 4);
        assert_eq!(attacker.mp(), 1);
        assert_eq!(target.hp(), 20);
        assert!(!outcome.defeated);
    }

    #[test]
    fn insufficient_mp_rejects_without_mutation() {
        let resolver = ActionResolver::default();
        let mut attacker = hero();
        attacker.spend_mp(3);
        let mut target = ogre(30);
        let before = (attacker.clone(), target.clone());
        let smite = ActionCatalog::find(&attacker, "Smite").unwrap();

        let result = resolver.resolve(
            &mut attacker,
            &mut target,
            &smite,
            &mut ScriptedRng::constant(0.0),
        );

        assert_eq!(
            result,
            Err(ActionError::InsufficientMp {
                required: 4,
                available: 2
            })
        );
        assert_eq!((attacker, target), before);
    }

    #[test]
    fn healing_goes_to_caster_and_clamps() {
        let resolver = ActionResolver::default();
        let mut attacker = hero();
        attacker.take_damage(3);
        let mut target = ogre(30);
        let mend = ActionCatalog::find(&attacker, "Mend").unwrap();

        let outcome = resolver
            .resolve(&mut attacker, &mut target, &mend, &mut ScriptedRng::constant(0.0))
            .unwrap();

        assert_eq!(outcome.healing, 3);
        assert_eq!(outcome.damage, 0);
        assert_eq!(attacker.hp(), attacker.max_hp());
        assert_eq!(target.hp(), 30);
    }

    #[test]
    fn rage_fires_once_inside_band() {
        let resolver = ActionResolver::default();
        let mut attacker = hero();
        let mut target = ogre(100);
        let mut rng = ScriptedRng::constant(0.0);

        let first = resolver
            .resolve(&mut attacker, &mut target, &fixed("Cut", "79"), &mut rng)
            .unwrap();
        assert!(!first.rage_triggered, "21% is above the band");

        let second = resolver
            .resolve(&mut attacker, &mut target, &fixed("Cut", "1"), &mut rng)
            .unwrap();
        assert!(second.rage_triggered, "exactly 20% is inside the band");
        assert!(target.in_rage_mode);

        let third = resolver
            .resolve(&mut attacker, &mut target, &fixed("Cut", "5"), &mut rng)
            .unwrap();
        assert!(!third.rage_triggered);
    }

    #[test]
    fn lethal_hit_defeats_without_rage() {
        let resolver = ActionResolver::default();
        let mut attacker = hero();
        let mut target = ogre(10);

        let outcome = resolver
            .resolve(
                &mut attacker,
                &mut target,
                &fixed("Crush", "10"),
                &mut ScriptedRng::constant(0.0),
            )
            .unwrap();

        assert!(outcome.defeated);
        assert!(!outcome.rage_triggered);
        assert!(!target.in_rage_mode);

        let again = resolver.resolve(
            &mut attacker,
            &mut target,
            &fixed("Crush", "10"),
            &mut ScriptedRng::constant(0.0),
        );
        assert_eq!(
            again,
            Err(ActionError::TargetDefeated {
                target: CombatantId(1)
            })
        );
    }

    #[test]
    fn resources_stay_in_bounds_over_random_exchanges() {
        let resolver = ActionResolver::default();
        let mut rng = PcgRng::new(2024);
        let actions = [
            fixed("Jab", "1d4"),
            fixed("Haymaker", "3d8+2"),
            Action::Skill {
                name: "Second Wind".to_string(),
                damage: Some(Formula::from("1")),
                heal: Some(Formula::from("2d6")),
            },
        ];

        for round in 0..200 {
            let mut attacker = hero();
            let mut target = ogre(40);
            for action in actions.iter().cycle().skip(round % 3).take(12) {
                if target.is_defeated() {
                    break;
                }
                resolver
                    .resolve(&mut attacker, &mut target, action, &mut rng)
                    .unwrap();
                assert!(attacker.hp() <= attacker.max_hp());
                assert!(attacker.mp() <= attacker.max_mp());
                assert!(target.hp() <= target.max_hp());
                assert!(target.mp() <= target.max_mp());
            }
        }
    }
}
