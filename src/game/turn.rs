use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::error::GameError;
use super::tile::TileId;
use crate::platform::schedule::TaskHandle;

/// 默认的错配翻回延迟。
pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_millis(1000);

/// 回合状态机。`Locked` 期间所有输入都会被丢弃。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum TurnState {
    #[default]
    AwaitingFirstPick,
    AwaitingSecondPick {
        first: TileId,
    },
    Locked {
        first: TileId,
        second: TileId,
    },
}

/// 回合事件流。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum TurnEvent {
    TileRevealed {
        tile_id: TileId,
    },
    PairMatched {
        first: TileId,
        second: TileId,
        identity: String,
    },
    PairMismatched {
        first: TileId,
        second: TileId,
    },
    TilesHidden {
        first: TileId,
        second: TileId,
    },
    GameCompleted {
        pairs: usize,
    },
}

/// 一次选牌的结果；`revert_after` 存在时调用方需要安排翻回任务。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickOutcome {
    pub events: Vec<TurnEvent>,
    pub revert_after: Option<Duration>,
}

impl PickOutcome {
    fn ignored() -> Self {
        Self::default()
    }
}

#[derive(Debug)]
pub struct TurnController {
    state: TurnState,
    revert_delay: Duration,
    pending_revert: Option<TaskHandle>,
    matched_pairs: usize,
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new(DEFAULT_REVERT_DELAY)
    }
}

impl TurnController {
    pub fn new(revert_delay: Duration) -> Self {
        Self {
            state: TurnState::AwaitingFirstPick,
            revert_delay,
            pending_revert: None,
            matched_pairs: 0,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn revert_delay(&self) -> Duration {
        self.revert_delay
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, TurnState::Locked { .. })
    }

    pub fn first_pick(&self) -> Option<TileId> {
        match self.state {
            TurnState::AwaitingSecondPick { first } => Some(first),
            _ => None,
        }
    }

    pub fn is_pending_first(&self, tile_id: TileId) -> bool {
        self.first_pick() == Some(tile_id)
    }

    pub fn pending_revert(&self) -> Option<&TaskHandle> {
        self.pending_revert.as_ref()
    }

    /// 处理一次已翻开的选牌。锁定期间、重复选择同一张牌或已配对的牌都会被忽略。
    pub fn pick(&mut self, board: &mut Board, tile_id: TileId) -> Result<PickOutcome, GameError> {
        let picked = board
            .tile(tile_id)
            .ok_or(GameError::TileNotMounted { tile_id })?;
        if picked.is_matched() {
            return Ok(PickOutcome::ignored());
        }

        match self.state {
            TurnState::Locked { .. } => Ok(PickOutcome::ignored()),
            TurnState::AwaitingFirstPick => {
                self.state = TurnState::AwaitingSecondPick { first: tile_id };
                Ok(PickOutcome::ignored())
            }
            TurnState::AwaitingSecondPick { first } if first == tile_id => {
                Ok(PickOutcome::ignored())
            }
            TurnState::AwaitingSecondPick { first } => self.resolve(board, first, tile_id),
        }
    }

    fn resolve(
        &mut self,
        board: &mut Board,
        first: TileId,
        second: TileId,
    ) -> Result<PickOutcome, GameError> {
        let first_symbol = board
            .tile(first)
            .ok_or(GameError::TileNotMounted { tile_id: first })?
            .symbol()
            .clone();
        let is_match = board
            .tile(second)
            .map(|tile| tile.symbol().matches(&first_symbol))
            .ok_or(GameError::TileNotMounted { tile_id: second })?;

        if !is_match {
            // 先进入锁定，再由调用方安排翻回任务
            self.state = TurnState::Locked { first, second };
            return Ok(PickOutcome {
                events: vec![TurnEvent::PairMismatched { first, second }],
                revert_after: Some(self.revert_delay),
            });
        }

        for id in [first, second] {
            if let Some(tile) = board.tile_mut(id) {
                tile.set_matched();
            }
        }
        self.matched_pairs += 1;
        self.reset();

        let mut events = vec![TurnEvent::PairMatched {
            first,
            second,
            identity: first_symbol.identity,
        }];
        if board.all_matched() {
            events.push(TurnEvent::GameCompleted {
                pairs: self.matched_pairs,
            });
        }
        Ok(PickOutcome {
            events,
            revert_after: None,
        })
    }

    pub fn attach_revert(&mut self, handle: TaskHandle) {
        self.pending_revert = Some(handle);
    }

    /// 翻回任务的完成回调：把两张错配的牌翻回背面并解除锁定。
    pub fn complete_revert(&mut self, board: &mut Board, task_id: u64) -> Vec<TurnEvent> {
        let TurnState::Locked { first, second } = self.state else {
            return Vec::new();
        };
        if let Some(pending) = &self.pending_revert {
            if pending.id() != task_id {
                return Vec::new();
            }
        }

        for id in [first, second] {
            if let Some(tile) = board.tile_mut(id) {
                tile.set_hidden();
            }
        }
        self.reset();
        vec![TurnEvent::TilesHidden { first, second }]
    }

    fn reset(&mut self) {
        self.state = TurnState::AwaitingFirstPick;
        self.pending_revert = None;
    }
}
