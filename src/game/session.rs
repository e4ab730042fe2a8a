//! 一局游戏的共享句柄：把牌的激活事件路由到回合控制器，并安排错配后的翻回任务。

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::board::{Board, Surface};
use super::deck::Deck;
use super::error::GameError;
use super::tile::{Activatable, TileId, TileSnapshot};
use super::turn::{PickOutcome, TurnController, TurnEvent, TurnState};
use crate::config::GameConfig;
use crate::platform::schedule::{Scheduler, Task};
use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub tiles: Vec<TileSnapshot>,
    pub turn: TurnState,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<TurnEvent>,
}

#[derive(Debug)]
struct GameCore {
    board: Board,
    controller: TurnController,
    event_log: Vec<TurnEvent>,
}

impl GameCore {
    fn new(controller: TurnController) -> Self {
        Self {
            board: Board::new(),
            controller,
            event_log: Vec::new(),
        }
    }

    fn activate(&mut self, tile_id: TileId) -> Result<PickOutcome, GameError> {
        if self.controller.is_locked() {
            return Ok(PickOutcome::default());
        }
        let tile = self
            .board
            .tile_mut(tile_id)
            .ok_or(GameError::TileNotMounted { tile_id })?;
        if !tile.is_responsive() || self.controller.is_pending_first(tile_id) {
            return Ok(PickOutcome::default());
        }

        tile.set_revealed();
        let mut outcome = self.controller.pick(&mut self.board, tile_id)?;
        outcome.events.insert(0, TurnEvent::TileRevealed { tile_id });
        self.event_log.extend(outcome.events.iter().cloned());
        Ok(outcome)
    }

    fn complete_revert(&mut self, task_id: u64) -> Vec<TurnEvent> {
        let events = self.controller.complete_revert(&mut self.board, task_id);
        self.event_log.extend(events.iter().cloned());
        events
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            tiles: self.board.snapshot(),
            turn: self.controller.state(),
            matched_pairs: self.controller.matched_pairs(),
            total_pairs: self.board.len() / 2,
            complete: self.board.all_matched(),
            events: self.event_log.clone(),
        }
    }
}

pub struct GameSession {
    core: Rc<RefCell<GameCore>>,
    scheduler: Rc<dyn Scheduler>,
}

impl GameSession {
    /// 构建牌组、洗牌一次、挂载棋盘。
    pub fn start(
        config: &GameConfig,
        surface: &mut dyn Surface,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self, GameError> {
        let deck = config.build_deck()?;
        Self::with_deck(&deck, config.revert_delay(), surface, scheduler)
    }

    pub fn with_deck(
        deck: &Deck,
        revert_delay: Duration,
        surface: &mut dyn Surface,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self, GameError> {
        let core = Rc::new(RefCell::new(GameCore::new(TurnController::new(revert_delay))));
        let weak = Rc::downgrade(&core);
        core.try_borrow_mut()
            .map_err(|_| GameError::SessionBusy)?
            .board
            .build(deck, surface, |tile| {
                Rc::new(TileActivator {
                    tile,
                    core: weak.clone(),
                    scheduler: scheduler.clone(),
                }) as Rc<dyn Activatable>
            })?;

        utils::log(&format!("memory: board ready with {} pairs", deck.pairs()));
        Ok(Self { core, scheduler })
    }

    pub fn activate(&self, tile_id: TileId) -> Result<Vec<TurnEvent>, GameError> {
        dispatch(&self.core, &self.scheduler, tile_id)
    }

    pub fn activator(&self, tile: TileId) -> TileActivator {
        TileActivator {
            tile,
            core: Rc::downgrade(&self.core),
            scheduler: self.scheduler.clone(),
        }
    }

    pub fn snapshot(&self) -> Result<GameSnapshot, GameError> {
        let core = self.core.try_borrow().map_err(|_| GameError::SessionBusy)?;
        Ok(core.snapshot())
    }

    pub fn turn_state(&self) -> Result<TurnState, GameError> {
        let core = self.core.try_borrow().map_err(|_| GameError::SessionBusy)?;
        Ok(core.controller.state())
    }

    pub fn is_complete(&self) -> Result<bool, GameError> {
        let core = self.core.try_borrow().map_err(|_| GameError::SessionBusy)?;
        Ok(core.board.all_matched())
    }
}

/// 绑定到单张牌的激活入口，渲染层持有它来转发点击。
#[derive(Clone)]
pub struct TileActivator {
    tile: TileId,
    core: Weak<RefCell<GameCore>>,
    scheduler: Rc<dyn Scheduler>,
}

impl TileActivator {
    pub fn tile_id(&self) -> TileId {
        self.tile
    }
}

impl Activatable for TileActivator {
    fn activate(&self) -> Result<Vec<TurnEvent>, GameError> {
        let core = self
            .core
            .upgrade()
            .ok_or(GameError::TileNotMounted { tile_id: self.tile })?;
        dispatch(&core, &self.scheduler, self.tile)
    }
}

fn dispatch(
    core: &Rc<RefCell<GameCore>>,
    scheduler: &Rc<dyn Scheduler>,
    tile_id: TileId,
) -> Result<Vec<TurnEvent>, GameError> {
    let outcome = core
        .try_borrow_mut()
        .map_err(|_| GameError::SessionBusy)?
        .activate(tile_id)?;

    if let Some(delay) = outcome.revert_after {
        schedule_revert(core, scheduler, delay)?;
    }
    log_events(&outcome.events);
    Ok(outcome.events)
}

/// 会话被占用时，翻回任务按此间隔重试。
const REVERT_RETRY_DELAY: Duration = Duration::from_millis(16);

/// 锁定状态已由控制器建立，这里只负责安排翻回任务并登记句柄。
fn schedule_revert(
    core: &Rc<RefCell<GameCore>>,
    scheduler: &Rc<dyn Scheduler>,
    delay: Duration,
) -> Result<(), GameError> {
    let ticket = Rc::new(Cell::new(0u64));
    let task = revert_task(Rc::downgrade(core), scheduler.clone(), ticket.clone());
    let handle = scheduler.schedule(delay, task);

    ticket.set(handle.id());
    core.try_borrow_mut()
        .map_err(|_| GameError::SessionBusy)?
        .controller
        .attach_revert(handle);
    Ok(())
}

/// 翻回任务必须最终执行；会话被占用时重新排队，并沿用最初的句柄编号。
fn revert_task(
    core: Weak<RefCell<GameCore>>,
    scheduler: Rc<dyn Scheduler>,
    ticket: Rc<Cell<u64>>,
) -> Task {
    Box::new(move || {
        let Some(session) = core.upgrade() else {
            return;
        };
        let Ok(mut guard) = session.try_borrow_mut() else {
            utils::warn("memory: session busy, retrying revert");
            let retry = revert_task(core, scheduler.clone(), ticket);
            scheduler.schedule(REVERT_RETRY_DELAY, retry);
            return;
        };
        let events = guard.complete_revert(ticket.get());
        log_events(&events);
    })
}

fn log_events(events: &[TurnEvent]) {
    for event in events {
        match event {
            TurnEvent::TileRevealed { .. } => {}
            TurnEvent::PairMatched { identity, .. } => {
                utils::log(&format!("memory: matched `{identity}`"));
            }
            TurnEvent::PairMismatched { first, second } => {
                utils::log(&format!("memory: tiles {first} and {second} mismatch"));
            }
            TurnEvent::TilesHidden { first, second } => {
                utils::log(&format!("memory: tiles {first} and {second} hidden"));
            }
            TurnEvent::GameCompleted { pairs } => {
                utils::log(&format!("memory: all {pairs} pairs matched"));
            }
        }
    }
}
