/// Combat rule constants and tunable parameters.
///
/// Every number the encounter rules depend on lives here so the runtime and
/// tests can tighten or loosen a single knob without touching rule code.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatRules {
    /// Fraction of max HP at or below which a combatant enters rage mode.
    pub rage_threshold: f64,
    /// Encounter chance (percent) a freshly recorded grudge starts with.
    pub grudge_base_chance: f64,
    /// Percentage points added to a grudge after every missed roll.
    pub grudge_escalation: f64,
    /// Minimum gold granted on victory.
    pub loot_min_gold: u32,
    /// Width of the random gold range added on top of the minimum.
    pub loot_gold_spread: u32,
    /// Probability of a bonus item on victory.
    pub bonus_item_chance: f64,
    /// Value used when a formula cannot be parsed at all.
    pub fallback_roll: u32,
}

impl CombatRules {
    // ===== rule constants =====
    pub const RAGE_THRESHOLD: f64 = 0.20;
    pub const GRUDGE_BASE_CHANCE: f64 = 1.5;
    pub const GRUDGE_ESCALATION: f64 = 1.5;
    pub const LOOT_MIN_GOLD: u32 = 10;
    pub const LOOT_GOLD_SPREAD: u32 = 20;
    pub const BONUS_ITEM_CHANCE: f64 = 0.30;
    pub const FALLBACK_ROLL: u32 = 1;

    /// Items taken by each revival path.
    pub const REVENGE_ITEM_LOSS: usize = 1;
    pub const RETREAT_ITEM_LOSS: usize = 2;

    pub fn new() -> Self {
        Self {
            rage_threshold: Self::RAGE_THRESHOLD,
            grudge_base_chance: Self::GRUDGE_BASE_CHANCE,
            grudge_escalation: Self::GRUDGE_ESCALATION,
            loot_min_gold: Self::LOOT_MIN_GOLD,
            loot_gold_spread: Self::LOOT_GOLD_SPREAD,
            bonus_item_chance: Self::BONUS_ITEM_CHANCE,
            fallback_roll: Self::FALLBACK_ROLL,
        }
    }
}

impl Default for CombatRules {
    fn default() -> Self {
        Self::new()
    }
}
