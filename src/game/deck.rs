use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;
use super::symbol::Symbol;

/// Fisher–Yates 洗牌：从末尾向前，每个位置与 `[0, i]` 中均匀抽取的位置交换。
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// 每个基础符号恰好出现两次的牌组。反序列化时同样校验成对。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct Deck {
    cards: Vec<Symbol>,
}

impl Deck {
    /// 将基础符号集合复制成对，顺序为集合本身拼接两次，由调用方负责洗牌。
    pub fn build(symbols: &[Symbol]) -> Result<Self, ConfigurationError> {
        validate_symbols(symbols)?;
        let cards = symbols.iter().chain(symbols.iter()).cloned().collect();
        Ok(Self { cards })
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        shuffle(&mut self.cards, rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn pairs(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.cards
    }
}

impl TryFrom<Vec<Symbol>> for Deck {
    type Error = ConfigurationError;

    fn try_from(cards: Vec<Symbol>) -> Result<Self, Self::Error> {
        if cards.is_empty() {
            return Err(ConfigurationError::EmptySymbolSet);
        }
        if let Some((identity, count)) = unpaired(&cards) {
            return Err(ConfigurationError::UnpairedIdentity { identity, count });
        }
        Ok(Self { cards })
    }
}

fn unpaired(cards: &[Symbol]) -> Option<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for card in cards {
        *counts.entry(card.identity.as_str()).or_insert(0) += 1;
    }
    cards
        .iter()
        .map(|card| (card.identity.as_str(), counts[card.identity.as_str()]))
        .find(|(_, count)| *count != 2)
        .map(|(identity, count)| (identity.to_string(), count))
}

impl From<Deck> for Vec<Symbol> {
    fn from(deck: Deck) -> Self {
        deck.cards
    }
}

pub fn validate_symbols(symbols: &[Symbol]) -> Result<(), ConfigurationError> {
    if symbols.is_empty() {
        return Err(ConfigurationError::EmptySymbolSet);
    }
    let mut seen = HashSet::new();
    for symbol in symbols {
        if !seen.insert(symbol.identity.as_str()) {
            return Err(ConfigurationError::DuplicateIdentity {
                identity: symbol.identity.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::symbol::default_symbols;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn identity_counts(cards: &[Symbol]) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for card in cards {
            *counts.entry(card.identity.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn symbols(count: usize) -> Vec<Symbol> {
        (0..count)
            .map(|i| Symbol::new(format!("s{i}"), format!("g{i}")))
            .collect()
    }

    #[test]
    fn every_identity_appears_exactly_twice() {
        for k in 1..=10 {
            let deck = Deck::build(&symbols(k)).expect("unique symbols should build");
            assert_eq!(deck.len(), 2 * k);
            assert_eq!(deck.pairs(), k);
            let counts = identity_counts(deck.as_slice());
            assert_eq!(counts.len(), k);
            assert!(counts.values().all(|count| *count == 2));
        }
    }

    #[test]
    fn unshuffled_deck_is_the_base_set_twice() {
        let base = vec![Symbol::new("A", "a"), Symbol::new("B", "b")];
        let deck = Deck::build(&base).expect("deck should build");
        let identities: Vec<&str> = deck.iter().map(|s| s.identity.as_str()).collect();
        assert_eq!(identities, vec!["A", "B", "A", "B"]);
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let base = vec![
            Symbol::new("A", "a"),
            Symbol::new("B", "b"),
            Symbol::new("A", "other"),
        ];
        assert_eq!(
            Deck::build(&base),
            Err(ConfigurationError::DuplicateIdentity {
                identity: "A".into()
            })
        );
    }

    #[test]
    fn empty_symbol_set_is_rejected() {
        assert_eq!(Deck::build(&[]), Err(ConfigurationError::EmptySymbolSet));
    }

    #[test]
    fn deserialized_deck_must_hold_pairs() {
        let single: Result<Deck, _> =
            serde_json::from_str(r#"[{"identity": "A", "glyph": "a"}]"#);
        let error = single.expect_err("a lone card is not a deck").to_string();
        assert!(error.contains("`A` appears 1 times"), "unexpected error: {error}");

        let tripled: Result<Deck, _> = serde_json::from_str(
            r#"[{"identity": "A", "glyph": "a"}, {"identity": "A", "glyph": "a"}, {"identity": "A", "glyph": "a"}]"#,
        );
        assert!(tripled.is_err());

        let empty: Result<Deck, _> = serde_json::from_str("[]");
        assert!(empty.is_err());
    }

    #[test]
    fn deck_json_round_trips_through_the_pairing_check() {
        let mut deck = Deck::build(&default_symbols()).expect("deck should build");
        deck.shuffle(&mut SmallRng::seed_from_u64(5));
        let json = serde_json::to_string(&deck).expect("deck should serialize");
        let restored: Deck = serde_json::from_str(&json).expect("paired deck should load");
        assert_eq!(restored, deck);
    }

    #[test]
    fn unpaired_cards_are_rejected() {
        let cards = vec![Symbol::new("A", "a"), Symbol::new("A", "a"), Symbol::new("B", "b")];
        assert_eq!(
            Deck::try_from(cards),
            Err(ConfigurationError::UnpairedIdentity {
                identity: "B".into(),
                count: 1
            })
        );
    }

    #[test]
    fn shuffle_preserves_multiset() {
        let mut rng = SmallRng::seed_from_u64(7);
        let unshuffled = Deck::build(&default_symbols()).expect("deck should build");
        let expected = identity_counts(unshuffled.as_slice());
        for _ in 0..200 {
            let mut deck = unshuffled.clone();
            deck.shuffle(&mut rng);
            assert_eq!(deck.len(), unshuffled.len());
            assert_eq!(identity_counts(deck.as_slice()), expected);
        }
    }

    #[test]
    fn shuffle_of_short_sequences_is_a_no_op() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![42];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, vec![42]);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let base = default_symbols();
        let mut first = Deck::build(&base).expect("deck should build");
        let mut second = first.clone();
        first.shuffle(&mut SmallRng::seed_from_u64(99));
        second.shuffle(&mut SmallRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn shuffle_reaches_every_permutation_of_three() {
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut seen = HashSet::new();
        for _ in 0..600 {
            let mut items = [0u8, 1, 2];
            shuffle(&mut items, &mut rng);
            seen.insert(items);
        }
        assert_eq!(seen.len(), 6, "all 3! orderings should occur");
    }
}
