//! 游戏核心逻辑模块（洗牌、牌组、棋盘、回合状态机）。

pub mod board;
pub mod deck;
pub mod error;
pub mod session;
pub mod symbol;
pub mod tile;
pub mod turn;

pub use board::{Board, Surface};
pub use deck::{shuffle, validate_symbols, Deck};
pub use error::{ConfigurationError, GameError};
pub use session::{GameSession, GameSnapshot, TileActivator};
pub use symbol::{default_symbols, Symbol};
pub use tile::{Activatable, Tile, TileId, TileSnapshot, TileState, TileView};
pub use turn::{PickOutcome, TurnController, TurnEvent, TurnState, DEFAULT_REVERT_DELAY};
