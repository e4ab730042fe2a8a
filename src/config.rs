use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::game::{
    default_symbols, validate_symbols, ConfigurationError, Deck, GameError, Symbol,
};

const DEFAULT_REVERT_DELAY_MS: u32 = 1000;
const DEFAULT_HIDDEN_GLYPH: &str = "❓";

fn default_revert_delay_ms() -> u32 {
    DEFAULT_REVERT_DELAY_MS
}

fn default_hidden_glyph() -> String {
    DEFAULT_HIDDEN_GLYPH.to_string()
}

/// 启动配置，所有字段均可省略。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    #[serde(default = "default_symbols")]
    pub symbols: Vec<Symbol>,
    #[serde(default = "default_revert_delay_ms")]
    pub revert_delay_ms: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_hidden_glyph")]
    pub hidden_glyph: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            revert_delay_ms: DEFAULT_REVERT_DELAY_MS,
            seed: None,
            hidden_glyph: default_hidden_glyph(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: Option<&str>) -> Result<Self, GameError> {
        match json {
            Some(json) => serde_json::from_str(json).map_err(|error| GameError::InvalidConfigJson {
                message: error.to_string(),
            }),
            None => Ok(Self::default()),
        }
    }

    pub fn with_symbols(mut self, symbols: Vec<Symbol>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_revert_delay_ms(mut self, revert_delay_ms: u32) -> Self {
        self.revert_delay_ms = revert_delay_ms;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_symbols(&self.symbols)
    }

    /// 构建并洗好本局使用的牌组；配置不合法时不产生任何副作用。
    pub fn build_deck(&self) -> Result<Deck, GameError> {
        let mut deck = Deck::build(&self.symbols)?;
        deck.shuffle(&mut self.rng());
        Ok(deck)
    }

    pub fn revert_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.revert_delay_ms))
    }

    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}
