//! Line-oriented console front end.
//!
//! Reads one number per line and writes plain text, or JSON lines for
//! battle events when `--json` is given. Works over any `BufRead`/`Write`
//! pair so it can be driven from a byte buffer in tests.

use legends_core::{
    BattleController, BattleEvent, ChoiceRequest, EquipmentChoice, MenuChoice, TurnContext,
};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::ops::RangeInclusive;
use tracing::warn;

pub struct Console<R, W> {
    input: R,
    output: W,
    json: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            json: false,
        }
    }

    /// Emit battle events as JSON lines instead of prose.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn say(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.output, "{text}") {
            warn!(error = %e, "failed to write output");
        }
    }

    fn prompt(&mut self, prompt: &str) {
        let written = write!(self.output, "{prompt}> ").and_then(|()| self.output.flush());
        if let Err(e) = written {
            warn!(error = %e, "failed to write prompt");
        }
    }

    /// Next non-blank line, or `None` at end of input.
    fn read_line(&mut self) -> Option<String> {
        loop {
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        return Some(line.to_string());
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to read input");
                    return None;
                }
            }
        }
    }

    /// Read a non-negative number, re-prompting on anything else.
    pub fn read_number(&mut self, prompt: &str) -> Option<usize> {
        loop {
            self.prompt(prompt);
            let line = self.read_line()?;
            match line.parse::<usize>() {
                Ok(n) => return Some(n),
                Err(_) => self.say(format_args!("'{line}' is not a number.")),
            }
        }
    }

    /// Read a number within `range`, re-prompting until one is given.
    pub fn ask(&mut self, prompt: &str, range: RangeInclusive<usize>) -> Option<usize> {
        loop {
            let n = self.read_number(prompt)?;
            if range.contains(&n) {
                return Some(n);
            }
            self.say(format_args!(
                "Enter a number from {} to {}.",
                range.start(),
                range.end()
            ));
        }
    }

    /// A battle cannot be abandoned halfway, so closed input ends the program.
    fn hang_up(&mut self) -> ! {
        self.say("\nInput closed. Farewell!");
        if let Err(e) = self.output.flush() {
            warn!(error = %e, "failed to flush output");
        }
        std::process::exit(0)
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> BattleController for Console<R, W> {
    fn choose_action(&mut self, ctx: &TurnContext<'_>) -> MenuChoice {
        let hero = ctx.hero;
        self.say(format_args!(
            "{} (HP {}/{}, MP {}/{}), what will you do?",
            hero.name(),
            hero.hp(),
            hero.base_hp(),
            hero.mp(),
            hero.base_mp()
        ));
        for choice in MenuChoice::all() {
            self.say(format_args!("  {}) {}", choice.number(), choice.label()));
        }

        loop {
            let Some(n) = self.read_number("Action") else {
                self.hang_up()
            };
            match MenuChoice::from_number(n) {
                Some(choice) => return choice,
                None => self.say(format_args!("There is no action {n}.")),
            }
        }
    }

    fn choose_equipment(&mut self, _ctx: &TurnContext<'_>) -> EquipmentChoice {
        for choice in [
            EquipmentChoice::Weapon,
            EquipmentChoice::Armor,
            EquipmentChoice::Back,
        ] {
            self.say(format_args!("  {}) {}", choice.number(), choice.label()));
        }

        loop {
            let Some(n) = self.read_number("Equipment") else {
                self.hang_up()
            };
            match EquipmentChoice::from_number(n) {
                Some(choice) => return choice,
                None => self.say(format_args!("There is no option {n}.")),
            }
        }
    }

    fn choose(&mut self, request: &ChoiceRequest) -> usize {
        self.say(format_args!(
            "{} for {} (0 to cancel):",
            request.kind.prompt(),
            request.hero
        ));
        for (i, option) in request.options.iter().enumerate() {
            self.say(format_args!("  {}) {} {}", i + 1, option.label, option.detail));
        }

        // Range checking is the battle's job; it reports and asks again.
        match self.read_number("Choice") {
            Some(n) => n,
            None => self.hang_up(),
        }
    }

    fn notify(&mut self, event: &BattleEvent) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => self.say(line),
                Err(e) => warn!(error = %e, "failed to serialize event"),
            }
        } else {
            self.say(event.narrate());
        }
    }
}
