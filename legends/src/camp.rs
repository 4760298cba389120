//! The session between battles: recruit a party, then explore, shop or rest.

use crate::console::Console;
use legends_core::encounter;
use legends_core::events::HeroSummary;
use legends_core::{
    Battle, BattleEvent, BattleOutcome, GameConfig, GameData, Hero, HeroClass, ItemId, Market,
    Party, PartyError,
};
use rand::Rng;
use std::io::{BufRead, Write};
use tracing::info;

/// Camp menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CampChoice {
    Explore,
    Market,
    Party,
    Quit,
}

impl CampChoice {
    const ALL: [CampChoice; 4] = [
        CampChoice::Explore,
        CampChoice::Market,
        CampChoice::Party,
        CampChoice::Quit,
    ];

    fn number(&self) -> usize {
        match self {
            CampChoice::Explore => 1,
            CampChoice::Market => 2,
            CampChoice::Party => 3,
            CampChoice::Quit => 0,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CampChoice::Explore => "Explore the wilds",
            CampChoice::Market => "Visit the market",
            CampChoice::Party => "Show the party",
            CampChoice::Quit => "Quit",
        }
    }
}

pub struct Camp<'a, R, W, G> {
    config: &'a GameConfig,
    data: &'a GameData,
    market: Market,
    console: &'a mut Console<R, W>,
    rng: G,
}

impl<'a, R: BufRead, W: Write, G: Rng> Camp<'a, R, W, G> {
    pub fn new(config: &'a GameConfig, data: &'a GameData, console: &'a mut Console<R, W>, rng: G) -> Self {
        Self {
            config,
            data,
            market: Market::new(data.market_stock()),
            console,
            rng,
        }
    }

    /// Play until the player quits, the party falls or input runs out.
    /// Returns the party as it ended, if one was ever formed.
    pub fn run(&mut self) -> Result<Option<Party>, PartyError> {
        let Some(mut party) = self.recruit()? else {
            return Ok(None);
        };
        info!(heroes = party.len(), "party formed");
        self.show_party(&party);

        loop {
            self.console.say("\nWhat next?");
            for choice in CampChoice::ALL {
                self.console
                    .say(format_args!("  {}) {}", choice.number(), choice.label()));
            }
            let Some(n) = self.console.ask("Camp", 0..=3) else {
                break;
            };
            let Some(choice) = CampChoice::ALL.into_iter().find(|c| c.number() == n) else {
                continue;
            };

            match choice {
                CampChoice::Explore => {
                    if !self.explore(&mut party) {
                        self.console.say("Your legend ends here.");
                        break;
                    }
                }
                CampChoice::Market => self.visit_market(&mut party),
                CampChoice::Party => self.show_party(&party),
                CampChoice::Quit => {
                    self.console.say("Farewell!");
                    break;
                }
            }
        }

        Ok(Some(party))
    }

    // ------------------------------------------------------------------------
    // Recruiting
    // ------------------------------------------------------------------------

    fn recruit(&mut self) -> Result<Option<Party>, PartyError> {
        let data = self.data;
        let max = self.config.max_party_size;

        self.console.say("Assemble your party.");
        let Some(count) = self
            .console
            .ask(&format!("How many heroes (1-{max})"), 1..=max)
        else {
            return Ok(None);
        };

        let mut chosen: Vec<Hero> = Vec::with_capacity(count);
        while chosen.len() < count {
            for (i, class) in HeroClass::all().iter().enumerate() {
                self.console.say(format_args!("  {}) {class}", i + 1));
            }
            let Some(pick) = self.console.ask("Class", 1..=3) else {
                return Ok(None);
            };
            let class = HeroClass::all()[pick - 1];

            let available: Vec<&Hero> = data
                .heroes_of(class)
                .filter(|h| chosen.iter().all(|c| c.name() != h.name()))
                .collect();
            if available.is_empty() {
                self.console.say(format_args!("No {class} is left to recruit."));
                continue;
            }

            for (i, hero) in available.iter().enumerate() {
                self.console.say(format_args!("  {}) {hero}", i + 1));
            }
            let Some(pick) = self
                .console
                .ask("Hero (0 for another class)", 0..=available.len())
            else {
                return Ok(None);
            };
            if pick == 0 {
                continue;
            }

            let hero = available[pick - 1].clone();
            self.console.say(format_args!("{} joins the party.", hero.name()));
            chosen.push(hero);
        }

        Party::new(chosen).map(Some)
    }

    fn show_party(&mut self, party: &Party) {
        let stats = BattleEvent::HeroStats {
            heroes: party.iter().map(HeroSummary::from).collect(),
        };
        self.console.say(stats.narrate());
    }

    // ------------------------------------------------------------------------
    // Exploring
    // ------------------------------------------------------------------------

    /// One exploration step. Returns false if the party was wiped out.
    fn explore(&mut self, party: &mut Party) -> bool {
        if !encounter::should_trigger(self.config.encounter_chance, &mut self.rng) {
            self.console.say("You wander the wilds. Nothing stirs.");
            return true;
        }

        let monsters = encounter::generate(
            &self.data.monsters,
            party,
            self.config.level_tolerance,
            &mut self.rng,
        );
        let outcome = Battle::new(party, monsters, &mut self.rng).run(&mut *self.console);
        info!(victory = outcome.is_victory(), rounds = outcome.rounds(), "battle finished");

        matches!(outcome, BattleOutcome::Victory { .. })
    }

    // ------------------------------------------------------------------------
    // Market
    // ------------------------------------------------------------------------

    fn visit_market(&mut self, party: &mut Party) {
        loop {
            self.console.say("Who is shopping?");
            for (i, hero) in party.iter().enumerate() {
                self.console.say(format_args!(
                    "  {}) {} (Lv {}, {} gold)",
                    i + 1,
                    hero.name(),
                    hero.level(),
                    hero.gold()
                ));
            }
            let Some(pick) = self.console.ask("Hero (0 to leave)", 0..=party.len()) else {
                return;
            };
            if pick == 0 {
                return;
            }
            let Some(hero) = party.get_mut(pick - 1) else {
                continue;
            };

            loop {
                self.console
                    .say(format_args!("{} has {} gold.", hero.name(), hero.gold()));
                self.console.say("  1) Buy\n  2) Sell\n  0) Back");
                match self.console.ask("Trade", 0..=2) {
                    Some(1) => self.buy(hero),
                    Some(2) => self.sell(hero),
                    Some(_) => break,
                    None => return,
                }
            }
        }
    }

    fn buy(&mut self, hero: &mut Hero) {
        for (i, item) in self.market.stock().iter().enumerate() {
            self.console.say(format_args!(
                "  {}) {} [{}] {} gold, level {}: {}",
                i + 1,
                item.name(),
                item.kind(),
                item.price(),
                item.level(),
                item.summary()
            ));
        }
        let Some(pick) = self
            .console
            .ask("Item (0 to cancel)", 0..=self.market.stock().len())
        else {
            return;
        };
        if pick == 0 {
            return;
        }

        match self.market.buy(hero, pick - 1) {
            Ok(id) => {
                let name = hero.inventory().get(id).map(|i| i.name().to_string());
                self.console.say(format_args!(
                    "{} bought {}.",
                    hero.name(),
                    name.unwrap_or_default()
                ));
            }
            Err(e) => self.console.say(format_args!("{e}.")),
        }
    }

    fn sell(&mut self, hero: &mut Hero) {
        if hero.inventory().is_empty() {
            self.console
                .say(format_args!("{} has nothing to sell.", hero.name()));
            return;
        }

        let items: Vec<(ItemId, String)> = hero
            .inventory()
            .iter()
            .map(|item| {
                let equipped = if hero.equipment().is_equipped(item.id()) {
                    " (equipped)"
                } else {
                    ""
                };
                let line = format!(
                    "{} [{}]{equipped} sells for {} gold",
                    item.name(),
                    item.kind(),
                    Market::sell_price(item)
                );
                (item.id(), line)
            })
            .collect();
        for (i, (_, line)) in items.iter().enumerate() {
            self.console.say(format_args!("  {}) {line}", i + 1));
        }

        let Some(pick) = self.console.ask("Item (0 to cancel)", 0..=items.len()) else {
            return;
        };
        if pick == 0 {
            return;
        }

        match self.market.sell(hero, items[pick - 1].0) {
            Ok(gold) => self
                .console
                .say(format_args!("{} sold an item for {gold} gold.", hero.name())),
            Err(e) => self.console.say(format_args!("{e}.")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legends_core::testing::{clumsy_hero, sample_sword, sample_warrior, steady_monster};
    use legends_core::{Hands, Weapon};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn data() -> GameData {
        GameData {
            heroes: vec![clumsy_hero("Flandal_Steelskin", 2000), sample_warrior("Gaerdal_Ironhand")],
            monsters: vec![steady_monster("Brandobaris", 1, 100, 0)],
            weapons: vec![sample_sword()],
            ..GameData::default()
        }
    }

    fn play(config: &GameConfig, data: &GameData, input: &str) -> (Option<Party>, String) {
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let party = {
            let mut camp = Camp::new(config, data, &mut console, StdRng::seed_from_u64(3));
            camp.run().unwrap()
        };
        let out = String::from_utf8(console.into_output()).unwrap();
        (party, out)
    }

    #[test]
    fn test_recruit_then_quit() {
        let config = GameConfig::default();
        // one hero, Warrior, second hero listed, show party, quit
        let (party, out) = play(&config, &data(), "1\n3\n2\n3\n0\n");
        let party = party.unwrap();
        assert_eq!(party.len(), 1);
        assert_eq!(party.members()[0].name(), "Gaerdal_Ironhand");
        assert!(out.contains("Gaerdal_Ironhand joins the party."));
        assert!(out.contains("Farewell!"));
    }

    #[test]
    fn test_heroes_cannot_be_recruited_twice() {
        let config = GameConfig::default();
        // two heroes: Flandal, then Warrior again, where Flandal is no longer offered
        let (party, _) = play(&config, &data(), "2\n3\n1\n3\n1\n0\n");
        let names: Vec<&str> = party.as_ref().unwrap().iter().map(Hero::name).collect();
        assert_eq!(names, ["Flandal_Steelskin", "Gaerdal_Ironhand"]);
    }

    #[test]
    fn test_input_closed_before_recruiting() {
        let (party, out) = play(&GameConfig::default(), &data(), "");
        assert!(party.is_none());
        assert!(out.contains("Assemble your party."));
    }

    #[test]
    fn test_buy_and_sell_at_market() {
        let config = GameConfig::default();
        // Gaerdal buys the sword, sells it back, leaves, quits
        let input = "1\n3\n2\n2\n1\n1\n1\n2\n1\n0\n0\n0\n";
        let (party, out) = play(&config, &data(), input);
        let party = party.unwrap();
        let hero = &party.members()[0];
        assert!(out.contains("Gaerdal_Ironhand bought Sword."));
        assert!(out.contains("sold an item for 250 gold"));
        assert_eq!(hero.gold(), 1354 - 500 + 250);
        assert!(hero.inventory().is_empty());
    }

    #[test]
    fn test_market_refusal_is_reported() {
        let config = GameConfig::default();
        let mut data = data();
        data.weapons = vec![Weapon::new("Excalibur", 100_000, 1, 2000, Hands::One)];
        let (party, out) = play(&config, &data, "1\n3\n2\n2\n1\n1\n1\n0\n0\n0\n");
        assert!(out.contains("Excalibur costs 100000 gold, Gaerdal_Ironhand has 1354."));
        assert_eq!(party.unwrap().members()[0].gold(), 1354);
    }

    #[test]
    fn test_explore_fights_and_wins() {
        let config = GameConfig::default().with_encounter_chance(1.0);
        // Flandal, explore, attack, first target, quit
        let (party, out) = play(&config, &data(), "1\n3\n1\n1\n1\n1\n0\n");
        let party = party.unwrap();
        assert!(out.contains("Brandobaris has been defeated by Flandal_Steelskin!"));
        assert!(out.contains("Victory after 1 round(s)!"));
        assert_eq!(party.members()[0].gold(), 100);
    }

    #[test]
    fn test_quiet_exploration() {
        let config = GameConfig::default().with_encounter_chance(0.0);
        let (_, out) = play(&config, &data(), "1\n3\n1\n1\n0\n");
        assert!(out.contains("Nothing stirs."));
        assert!(!out.contains("A battle begins!"));
    }
}
