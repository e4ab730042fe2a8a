use std::cell::RefCell;
use std::rc::Rc;

use crate::game::{Activatable, GameError, Surface, Symbol, TileId, TileState, TileView, TurnEvent};

struct MountedTile {
    identity: String,
    activator: Rc<dyn Activatable>,
}

/// 不依赖浏览器的渲染容器：记录每张牌当前的显示状态，并允许按下标点击。
#[derive(Default)]
pub struct HeadlessSurface {
    mounted: Vec<MountedTile>,
    faces: Rc<RefCell<Vec<TileState>>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    pub fn mounted_identities(&self) -> Vec<&str> {
        self.mounted
            .iter()
            .map(|tile| tile.identity.as_str())
            .collect()
    }

    /// 最近一次渲染出的牌面。
    pub fn face(&self, index: usize) -> Option<TileState> {
        self.faces.borrow().get(index).copied()
    }

    pub fn faces(&self) -> Vec<TileState> {
        self.faces.borrow().clone()
    }

    pub fn click(&self, index: usize) -> Result<Vec<TurnEvent>, GameError> {
        let tile = self.mounted.get(index).ok_or(GameError::TileNotMounted {
            tile_id: index as TileId,
        })?;
        tile.activator.activate()
    }
}

impl Surface for HeadlessSurface {
    fn mount(
        &mut self,
        _tile_id: TileId,
        symbol: &Symbol,
        activator: Rc<dyn Activatable>,
    ) -> Result<Box<dyn TileView>, GameError> {
        let index = self.mounted.len();
        self.mounted.push(MountedTile {
            identity: symbol.identity.clone(),
            activator,
        });
        self.faces.borrow_mut().push(TileState::Hidden);
        Ok(Box::new(HeadlessTileView {
            index,
            faces: self.faces.clone(),
        }))
    }

    fn clear(&mut self) -> Result<(), GameError> {
        self.mounted.clear();
        self.faces.borrow_mut().clear();
        Ok(())
    }
}

struct HeadlessTileView {
    index: usize,
    faces: Rc<RefCell<Vec<TileState>>>,
}

impl TileView for HeadlessTileView {
    fn render(&self, state: TileState) {
        if let Some(face) = self.faces.borrow_mut().get_mut(self.index) {
            *face = state;
        }
    }
}
