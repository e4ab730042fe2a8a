//! 基于 DOM 的渲染容器。

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

use crate::game::{Activatable, GameError, Surface, Symbol, TileId, TileState, TileView};
use crate::utils;

pub const DEFAULT_CONTAINER_SELECTOR: &str = ".memory-game";

const CARD_CLASS: &str = "memory-card";
const FRONT_FACE_CLASS: &str = "front-face";
const BACK_FACE_CLASS: &str = "back-face";
const FLIP_CLASS: &str = "flip";
const MATCH_CLASS: &str = "match";

fn js_error(error: JsValue) -> GameError {
    GameError::Surface {
        message: error
            .as_string()
            .unwrap_or_else(|| format!("{error:?}")),
    }
}

pub struct DomSurface {
    document: Document,
    container: Element,
    hidden_glyph: String,
}

impl DomSurface {
    /// 通过 CSS 选择器定位容器元素。
    pub fn new(selector: &str, hidden_glyph: impl Into<String>) -> Result<Self, GameError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| GameError::Surface {
                message: "document is not available".into(),
            })?;
        let container = document
            .query_selector(selector)
            .map_err(js_error)?
            .ok_or_else(|| GameError::Surface {
                message: format!("no element matches `{selector}`"),
            })?;
        Ok(Self {
            document,
            container,
            hidden_glyph: hidden_glyph.into(),
        })
    }

    pub fn container(&self) -> &Element {
        &self.container
    }

    pub fn set_hidden_glyph(&mut self, hidden_glyph: impl Into<String>) {
        self.hidden_glyph = hidden_glyph.into();
    }

    fn face(&self, class: &str, glyph: &str) -> Result<Element, GameError> {
        let face = self.document.create_element("div").map_err(js_error)?;
        face.class_list().add_1(class).map_err(js_error)?;
        face.set_text_content(Some(glyph));
        Ok(face)
    }
}

impl Surface for DomSurface {
    fn mount(
        &mut self,
        tile_id: TileId,
        symbol: &Symbol,
        activator: Rc<dyn Activatable>,
    ) -> Result<Box<dyn TileView>, GameError> {
        let card = self.document.create_element("div").map_err(js_error)?;
        card.class_list().add_1(CARD_CLASS).map_err(js_error)?;
        card.set_attribute("data-framework", &symbol.identity).map_err(js_error)?;
        card.set_attribute("data-tile", &tile_id.to_string()).map_err(js_error)?;

        let front = self.face(FRONT_FACE_CLASS, &symbol.glyph)?;
        let back = self.face(BACK_FACE_CLASS, &self.hidden_glyph)?;
        card.append_child(&front).map_err(js_error)?;
        card.append_child(&back).map_err(js_error)?;

        let on_click = Closure::wrap(Box::new(move || {
            if let Err(error) = activator.activate() {
                utils::warn(&format!("memory: tile {tile_id} activation failed: {error}"));
            }
        }) as Box<dyn FnMut()>);
        card.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.container.append_child(&card).map_err(js_error)?;

        Ok(Box::new(DomTileView {
            element: card,
            on_click,
        }))
    }

    fn clear(&mut self) -> Result<(), GameError> {
        self.container.set_inner_html("");
        Ok(())
    }
}

struct DomTileView {
    element: Element,
    on_click: Closure<dyn FnMut()>,
}

impl TileView for DomTileView {
    fn render(&self, state: TileState) {
        let classes = self.element.class_list();
        let result = match state {
            TileState::Hidden => classes.remove_1(FLIP_CLASS),
            TileState::Revealed => classes.add_1(FLIP_CLASS),
            TileState::Matched => classes.add_2(FLIP_CLASS, MATCH_CLASS),
        };
        if let Err(error) = result {
            utils::warn(&format!("memory: failed to render tile: {error:?}"));
        }
    }
}

impl Drop for DomTileView {
    fn drop(&mut self) {
        let _ = self
            .element
            .remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref());
    }
}
