//! Damage and healing formulas.
//!
//! A formula is either a fixed amount (`"7"`) or dice notation (`"2d6+3"`,
//! `"d8"`, `"1d4-1"`). [`DiceResolver::eval`] never fails: an unparseable
//! formula falls back to a bare integer, then to the configured minimal roll.

use core::fmt;
use core::str::FromStr;

use crate::error::{ErrorSeverity, GameError};
use crate::rng::RandomSource;

/// Errors produced while parsing a formula.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("empty formula")]
    Empty,

    #[error("malformed formula `{0}`")]
    Malformed(String),

    #[error("dice count {0} exceeds the limit of {max}", max = DiceExpr::MAX_DICE)]
    TooManyDice(u32),
}

impl GameError for DiceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "DICE_EMPTY",
            Self::Malformed(_) => "DICE_MALFORMED",
            Self::TooManyDice(_) => "DICE_TOO_MANY",
        }
    }
}

/// Parsed damage/healing expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiceExpr {
    /// Fixed amount, e.g. `10`.
    Fixed(i32),
    /// `count`d`sides` plus a signed modifier.
    Roll { count: u32, sides: u32, modifier: i32 },
}

impl DiceExpr {
    /// Upper bound on dice rolled by a single expression.
    pub const MAX_DICE: u32 = 100;

    /// Rolls the expression. Results below zero are clamped to zero.
    pub fn roll(&self, rng: &mut dyn RandomSource) -> u32 {
        let total = match *self {
            Self::Fixed(amount) => i64::from(amount),
            Self::Roll {
                count,
                sides,
                modifier,
            } => {
                let rolled: i64 = (0..count).map(|_| i64::from(rng.roll_die(sides))).sum();
                rolled + i64::from(modifier)
            }
        };
        total.clamp(0, i64::from(u32::MAX)) as u32
    }

    /// Smallest and largest value the expression can produce.
    pub fn bounds(&self) -> (u32, u32) {
        let clamp = |value: i64| value.clamp(0, i64::from(u32::MAX)) as u32;
        match *self {
            Self::Fixed(amount) => (clamp(amount.into()), clamp(amount.into())),
            Self::Roll {
                count,
                sides,
                modifier,
            } => {
                let min = if sides == 0 { 0 } else { i64::from(count) };
                let max = i64::from(count) * i64::from(sides);
                (
                    clamp(min + i64::from(modifier)),
                    clamp(max + i64::from(modifier)),
                )
            }
        }
    }
}

impl FromStr for DiceExpr {
    type Err = DiceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(DiceError::Empty);
        }
        let lower = compact.to_ascii_lowercase();
        let malformed = || DiceError::Malformed(raw.to_string());

        let Some((count_part, rest)) = lower.split_once('d') else {
            return lower.parse::<i32>().map(Self::Fixed).map_err(|_| malformed());
        };

        let count = if count_part.is_empty() {
            1
        } else {
            count_part.parse::<u32>().map_err(|_| malformed())?
        };
        if count > Self::MAX_DICE {
            return Err(DiceError::TooManyDice(count));
        }

        let (sides_part, modifier) = match rest.find(['+', '-']) {
            Some(index) => {
                let (sides, modifier) = rest.split_at(index);
                (sides, modifier.parse::<i32>().map_err(|_| malformed())?)
            }
            None => (rest, 0),
        };
        let sides = sides_part.parse::<u32>().map_err(|_| malformed())?;

        Ok(Self::Roll {
            count,
            sides,
            modifier,
        })
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Fixed(amount) => write!(f, "{amount}"),
            Self::Roll {
                count,
                sides,
                modifier: 0,
            } => write!(f, "{count}d{sides}"),
            Self::Roll {
                count,
                sides,
                modifier,
            } => write!(f, "{count}d{sides}{modifier:+}"),
        }
    }
}

/// Raw formula text as it appears on a character sheet.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Formula(String);

impl Formula {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(&self) -> Result<DiceExpr, DiceError> {
        self.0.parse()
    }
}

impl From<&str> for Formula {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Evaluates formulas with the documented fallback chain.
#[derive(Clone, Copy, Debug)]
pub struct DiceResolver {
    fallback_roll: u32,
}

impl DiceResolver {
    pub const fn new(fallback_roll: u32) -> Self {
        Self { fallback_roll }
    }

    /// Evaluates a formula into a non-negative amount.
    ///
    /// Order: dice notation / fixed value, then the leading integer of the
    /// text (`"12 slashing"`), then the minimal fallback roll.
    pub fn eval(&self, formula: &Formula, rng: &mut dyn RandomSource) -> u32 {
        match formula.parse() {
            Ok(expr) => expr.roll(rng),
            Err(error) => {
                let amount = leading_integer(formula.as_str()).unwrap_or(self.fallback_roll);
                tracing::warn!(%formula, %error, amount, "invalid formula, using fallback");
                amount
            }
        }
    }

    /// Evaluates an optional formula; absent formulas contribute nothing.
    pub fn eval_opt(&self, formula: Option<&Formula>, rng: &mut dyn RandomSource) -> u32 {
        formula.map_or(0, |formula| self.eval(formula, rng))
    }
}

impl Default for DiceResolver {
    fn default() -> Self {
        Self::new(crate::config::CombatRules::FALLBACK_ROLL)
    }
}

fn leading_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    #[test]
    fn parses_common_notations() {
        assert_eq!("7".parse::<DiceExpr>(), Ok(DiceExpr::Fixed(7)));
        assert_eq!(
            "2d6+3".parse::<DiceExpr>(),
            Ok(DiceExpr::Roll {
                count: 2,
                sides: 6,
                modifier: 3
            })
        );
        assert_eq!(
            "d8".parse::<DiceExpr>(),
            Ok(DiceExpr::Roll {
                count: 1,
                sides: 8,
                modifier: 0
            })
        );
        assert_eq!(
            " 1D4 - 1 ".parse::<DiceExpr>(),
            Ok(DiceExpr::Roll {
                count: 1,
                sides: 4,
                modifier: -1
            })
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!("".parse::<DiceExpr>(), Err(DiceError::Empty));
        assert!(matches!(
            "2d".parse::<DiceExpr>(),
            Err(DiceError::Malformed(_))
        ));
        assert!(matches!(
            "fireball".parse::<DiceExpr>(),
            Err(DiceError::Malformed(_))
        ));
        assert_eq!(
            "500d6".parse::<DiceExpr>(),
            Err(DiceError::TooManyDice(500))
        );
    }

    #[test]
    fn rolls_sum_dice_and_modifier() {
        // 0.99 → max face, 0.0 → min face
        let mut rng = ScriptedRng::new([0.99, 0.0]);
        let expr: DiceExpr = "2d6+3".parse().unwrap();
        assert_eq!(expr.roll(&mut rng), 6 + 1 + 3);
    }

    #[test]
    fn negative_totals_clamp_to_zero() {
        let mut rng = ScriptedRng::constant(0.0);
        let expr: DiceExpr = "1d4-5".parse().unwrap();
        assert_eq!(expr.roll(&mut rng), 0);
        assert_eq!(expr.bounds(), (0, 0));
    }

    #[test]
    fn eval_falls_back_to_leading_integer_then_minimal_roll() {
        let resolver = DiceResolver::new(1);
        let mut rng = ScriptedRng::constant(0.5);
        assert_eq!(resolver.eval(&Formula::from("12 slashing"), &mut rng), 12);
        assert_eq!(resolver.eval(&Formula::from("???"), &mut rng), 1);
        assert_eq!(resolver.eval_opt(None, &mut rng), 0);
    }

    #[test]
    fn display_round_trips_notation() {
        let expr: DiceExpr = "3d10-2".parse().unwrap();
        assert_eq!(expr.to_string(), "3d10-2");
        assert_eq!("4".parse::<DiceExpr>().unwrap().to_string(), "4");
    }
}
