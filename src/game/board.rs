use std::rc::Rc;

use super::deck::Deck;
use super::error::GameError;
use super::symbol::Symbol;
use super::tile::{Activatable, Tile, TileId, TileSnapshot, TileState, TileView};
use crate::utils;

/// 外部渲染容器：追加可渲染单元，并为其绑定激活回调。
pub trait Surface {
    fn mount(
        &mut self,
        tile_id: TileId,
        symbol: &Symbol,
        activator: Rc<dyn Activatable>,
    ) -> Result<Box<dyn TileView>, GameError>;

    fn clear(&mut self) -> Result<(), GameError>;
}

#[derive(Debug, Default)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按牌组顺序为每个条目创建一张牌并挂载到渲染容器。重复构建前必须先 `clear`。
    /// 挂载中途失败时会清空渲染容器，棋盘保持未构建。
    pub fn build<F>(
        &mut self,
        deck: &Deck,
        surface: &mut dyn Surface,
        mut activator_for: F,
    ) -> Result<(), GameError>
    where
        F: FnMut(TileId) -> Rc<dyn Activatable>,
    {
        if self.is_built() {
            return Err(GameError::BoardAlreadyBuilt);
        }

        let mut tiles = Vec::with_capacity(deck.len());
        for (index, symbol) in deck.iter().enumerate() {
            let id = index as TileId;
            let view = match surface.mount(id, symbol, activator_for(id)) {
                Ok(view) => view,
                Err(error) => {
                    drop(tiles);
                    if let Err(clear_error) = surface.clear() {
                        utils::warn(&format!("memory: failed to clear surface: {clear_error}"));
                    }
                    return Err(error);
                }
            };
            tiles.push(Tile::new(id, symbol.clone(), view));
        }
        self.tiles = tiles;
        Ok(())
    }

    pub fn clear(&mut self, surface: &mut dyn Surface) -> Result<(), GameError> {
        self.tiles.clear();
        surface.clear()
    }

    pub fn is_built(&self) -> bool {
        !self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id as usize)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id as usize)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn count_in_state(&self, state: TileState) -> usize {
        self.tiles.iter().filter(|tile| tile.state() == state).count()
    }

    pub fn all_matched(&self) -> bool {
        self.is_built() && self.tiles.iter().all(Tile::is_matched)
    }

    pub fn snapshot(&self) -> Vec<TileSnapshot> {
        self.tiles.iter().map(Tile::snapshot).collect()
    }
}
