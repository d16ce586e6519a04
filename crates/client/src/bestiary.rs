//! Starting hero and the enemies met along the gauntlet.

use gauntlet_core::{
    AbilityScores, CharacterSheet, Element, EquipSlot, Equipment, Item, ItemCategory, SkillEntry,
    SpellEntry,
};

/// Fresh level-one fighter stored under `id`.
pub fn default_hero(id: &str) -> CharacterSheet {
    CharacterSheet::new(id, "Aria", "Fighter", 30, 12)
        .with_gold(25)
        .with_stats(AbilityScores {
            strength: 15,
            dexterity: 13,
            constitution: 14,
            ..AbilityScores::default()
        })
        .with_equipment(
            Equipment::empty()
                .with(EquipSlot::MainHand, Item::weapon("Longsword", "1d8+2"))
                .with(EquipSlot::Armor, Item::new("Chain Shirt", ItemCategory::Armor)),
        )
        .with_item(Item::consumable("Health Potion", "2d4+2"))
        .with_spell(SpellEntry::damage("Firebolt", "2d6", 4).with_element(Element::Fire))
        .with_spell(SpellEntry::heal("Second Wind", "1d10+2", 3))
}

fn goblin() -> CharacterSheet {
    CharacterSheet::new("goblin", "Snik", "Goblin", 12, 0)
        .with_stats(AbilityScores {
            dexterity: 14,
            ..AbilityScores::default()
        })
        .with_skill(SkillEntry::attack("Rusty Knife", "1d6"))
}

fn wolf() -> CharacterSheet {
    CharacterSheet::new("wolf", "Grey Fang", "Wolf", 16, 0)
        .with_stats(AbilityScores {
            dexterity: 15,
            ..AbilityScores::default()
        })
        .with_skill(SkillEntry::attack("Bite", "1d6+1"))
        .with_skill(SkillEntry::attack("Pounce", "2d4"))
}

fn skeleton() -> CharacterSheet {
    CharacterSheet::new("skeleton", "Rattlebones", "Skeleton", 18, 0)
        .with_skill(SkillEntry::attack("Shortsword", "1d6+2"))
}

fn orc() -> CharacterSheet {
    CharacterSheet::new("orc", "Grukk", "Orc", 26, 0)
        .with_stats(AbilityScores {
            strength: 16,
            ..AbilityScores::default()
        })
        .with_skill(SkillEntry::attack("Greataxe", "1d12"))
        .with_skill(SkillEntry::recovery("Battle Roar", "1d6"))
}

/// Enemies of every kind, weakest first.
pub fn bestiary() -> Vec<CharacterSheet> {
    vec![goblin(), wolf(), skeleton(), orc()]
}

/// Enemies for the encounter at `stage` (zero-based).
///
/// Kinds cycle through the bestiary; every third stage brings a pair.
pub fn encounter_for(stage: usize) -> Vec<CharacterSheet> {
    let kinds = bestiary();
    let enemy = kinds[stage % kinds.len()].clone();
    if stage % 3 == 2 {
        let mut second = enemy.clone();
        second.name = format!("{} the Younger", enemy.name);
        vec![enemy, second]
    } else {
        vec![enemy]
    }
}
