use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::symbol::Symbol;
use super::turn::TurnEvent;

/// 牌面在棋盘中的位置编号。
pub type TileId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TileState {
    #[default]
    Hidden,
    Revealed,
    Matched,
}

/// 渲染层对单张牌的视图，每次状态变化都会同步调用。
pub trait TileView {
    fn render(&self, state: TileState);
}

/// 可被用户输入触发的能力，渲染层只依赖这个接口。
/// 每张牌的输入句柄（`TileActivator`）实现它，相当于牌自身的 `activate`。
pub trait Activatable {
    fn activate(&self) -> Result<Vec<TurnEvent>, GameError>;
}

pub struct Tile {
    id: TileId,
    symbol: Symbol,
    state: TileState,
    responsive: bool,
    view: Box<dyn TileView>,
}

impl Tile {
    pub fn new(id: TileId, symbol: Symbol, view: Box<dyn TileView>) -> Self {
        let tile = Self {
            id,
            symbol,
            state: TileState::Hidden,
            responsive: true,
            view,
        };
        tile.view.render(tile.state);
        tile
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    pub fn is_responsive(&self) -> bool {
        self.responsive
    }

    pub fn is_matched(&self) -> bool {
        self.state == TileState::Matched
    }

    pub fn set_revealed(&mut self) {
        self.transition(TileState::Revealed);
    }

    pub fn set_hidden(&mut self) {
        self.transition(TileState::Hidden);
    }

    /// 配对成功后永久失去响应。
    pub fn set_matched(&mut self) {
        self.responsive = false;
        self.transition(TileState::Matched);
    }

    pub fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            id: self.id,
            identity: self.symbol.identity.clone(),
            glyph: self.symbol.glyph.clone(),
            state: self.state,
            responsive: self.responsive,
        }
    }

    fn transition(&mut self, next: TileState) {
        // matched 是终态
        if self.is_matched() && next != TileState::Matched {
            return;
        }
        self.state = next;
        self.view.render(next);
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("id", &self.id)
            .field("symbol", &self.symbol)
            .field("state", &self.state)
            .field("responsive", &self.responsive)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileSnapshot {
    pub id: TileId,
    pub identity: String,
    pub glyph: String,
    pub state: TileState,
    pub responsive: bool,
}
