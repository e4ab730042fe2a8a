pub mod config;
pub mod game;
pub mod platform;
pub mod utils;

use std::rc::Rc;

use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

pub use config::GameConfig;
pub use game::{
    shuffle, Activatable, Board, ConfigurationError, Deck, GameError, GameSession, GameSnapshot,
    PickOutcome, Surface, Symbol, Tile, TileActivator, TileId, TileSnapshot, TileState, TileView,
    TurnController, TurnEvent, TurnState,
};
pub use platform::{
    BrowserScheduler, DomSurface, HeadlessSurface, ManualScheduler, Scheduler, TaskHandle,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

fn to_js_error(error: GameError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn start_session(
    config: &GameConfig,
    deck: &Deck,
    surface: &mut DomSurface,
) -> Result<GameSession, JsValue> {
    GameSession::with_deck(
        deck,
        config.revert_delay(),
        surface,
        Rc::new(BrowserScheduler::new()),
    )
    .map_err(to_js_error)
}

/// 挂载在页面容器上的一局记忆翻牌游戏。
#[wasm_bindgen]
pub struct MemoryGame {
    session: GameSession,
    surface: DomSurface,
}

#[wasm_bindgen]
impl MemoryGame {
    /// `selector` 缺省为 `.memory-game`；`config_json` 缺省使用默认配置。
    #[wasm_bindgen(constructor)]
    pub fn new(selector: Option<String>, config_json: Option<String>) -> Result<MemoryGame, JsValue> {
        let config = GameConfig::from_json(config_json.as_deref()).map_err(to_js_error)?;
        let selector = selector
            .as_deref()
            .unwrap_or(platform::DEFAULT_CONTAINER_SELECTOR);
        let mut surface =
            DomSurface::new(selector, config.hidden_glyph.clone()).map_err(to_js_error)?;
        let deck = config.build_deck().map_err(to_js_error)?;
        let session = start_session(&config, &deck, &mut surface)?;
        Ok(MemoryGame { session, surface })
    }

    /// 以新配置重新开局。配置不合法时当前对局保持不变。
    pub fn restart(&mut self, config_json: Option<String>) -> Result<(), JsValue> {
        let config = GameConfig::from_json(config_json.as_deref()).map_err(to_js_error)?;
        let deck = config.build_deck().map_err(to_js_error)?;

        self.surface.clear().map_err(to_js_error)?;
        self.surface.set_hidden_glyph(config.hidden_glyph.clone());
        self.session = start_session(&config, &deck, &mut self.surface)?;
        Ok(())
    }

    /// 以编程方式激活一张牌，返回本次产生的事件（JSON）。
    pub fn activate(&self, tile_id: u32) -> Result<String, JsValue> {
        let events = self.session.activate(tile_id).map_err(to_js_error)?;
        serde_json::to_string(&events).map_err(serde_to_js_error)
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        let snapshot = self.session.snapshot().map_err(to_js_error)?;
        serde_json::to_string(&snapshot).map_err(serde_to_js_error)
    }

    #[wasm_bindgen(js_name = "isComplete")]
    pub fn is_complete(&self) -> Result<bool, JsValue> {
        self.session.is_complete().map_err(to_js_error)
    }
}

/// 返回默认配置，方便前端在此基础上修改。
#[wasm_bindgen(js_name = "defaultConfig")]
pub fn default_config() -> Result<JsValue, JsValue> {
    to_value(&GameConfig::default()).map_err(JsValue::from)
}

/// 根据配置构建并洗好一副牌。
#[wasm_bindgen(js_name = "buildDeck")]
pub fn build_deck(config: JsValue) -> Result<JsValue, JsValue> {
    let config: GameConfig = from_value(config).map_err(JsValue::from)?;
    let deck = config.build_deck().map_err(to_js_error)?;
    to_value(&deck).map_err(JsValue::from)
}
