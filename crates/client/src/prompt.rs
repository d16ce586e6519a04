//! Line-based player input.

use std::io::Write;

use anyhow::Result;
use gauntlet_core::{Action, DeathChoice};
use strum::IntoEnumIterator;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prints `question` and reads one trimmed line; `None` at end of input.
    pub async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        print!("{} ", question);
        std::io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    /// Asks until the player names one of `actions`.
    pub async fn choose_action(&mut self, actor: &str, actions: &[Action]) -> Result<Option<Action>> {
        println!("{}'s turn:", actor);
        for (index, action) in actions.iter().enumerate() {
            println!("  {}. {}", index + 1, describe_action(action));
        }
        loop {
            let Some(input) = self.ask(">").await? else {
                return Ok(None);
            };
            match parse_action(&input, actions) {
                Some(action) => return Ok(Some(action.clone())),
                None => println!("Pick a number from 1 to {} or an action name.", actions.len()),
            }
        }
    }

    /// Asks how to handle the party's defeat.
    pub async fn choose_revival(&mut self) -> Result<Option<DeathChoice>> {
        println!("You have fallen.");
        println!("  1. revenge   - rise now, lose half your gold and one item");
        println!("  2. retreat   - flee, the enemy keeps two thirds of your gold and two items");
        println!("  3. stayDead  - end this character's run");
        loop {
            let Some(input) = self.ask(">").await? else {
                return Ok(None);
            };
            match parse_death_choice(&input) {
                Some(choice) => return Ok(Some(choice)),
                None => println!("Answer 1-3 or revenge, retreat, stayDead."),
            }
        }
    }
}

fn describe_action(action: &Action) -> String {
    match action.mp_cost() {
        0 => action.name().to_string(),
        cost => format!("{} ({} MP)", action.name(), cost),
    }
}

/// Matches a 1-based index or a case-insensitive action name.
pub fn parse_action<'a>(input: &str, actions: &'a [Action]) -> Option<&'a Action> {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|index| actions.get(index));
    }
    actions
        .iter()
        .find(|action| action.name().eq_ignore_ascii_case(input))
}

/// Matches a 1-based menu index or a choice name.
pub fn parse_death_choice(input: &str) -> Option<DeathChoice> {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|index| DeathChoice::iter().nth(index));
    }
    input.parse().ok()
}
