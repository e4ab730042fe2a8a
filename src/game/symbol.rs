use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// 可配对的符号：`identity` 用于比较，`glyph` 用于展示。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub identity: String,
    pub glyph: String,
}

impl Symbol {
    pub fn new(identity: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            glyph: glyph.into(),
        }
    }

    pub fn matches(&self, other: &Symbol) -> bool {
        self.identity == other.identity
    }
}

static DEFAULT_SYMBOLS: Lazy<Vec<Symbol>> = Lazy::new(|| {
    vec![
        Symbol::new("html", "🌐"),
        Symbol::new("css", "🎨"),
        Symbol::new("js", "💡"),
        Symbol::new("react", "⚛️"),
        Symbol::new("git", "🌳"),
        Symbol::new("node", "🟢"),
    ]
});

/// 默认的六组符号。
pub fn default_symbols() -> Vec<Symbol> {
    DEFAULT_SYMBOLS.clone()
}
