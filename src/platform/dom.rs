//! DOM stage: entities are absolutely positioned `div`s inside the game
//! container, moved with `transform: translateX(..)` and `bottom`.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::{Overlay, Stage, end_screen};
use crate::sim::{Entity, EntityKind, FieldGeometry};

fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

fn set_hidden(el: &HtmlElement, hidden: bool) {
    let _ = el.class_list().toggle_with_force("hidden", hidden);
}

/// First descendant of `parent` matching `selector`
fn child(parent: Option<&HtmlElement>, selector: &str) -> Option<Element> {
    parent?.query_selector(selector).ok().flatten()
}

fn set_style(el: &HtmlElement, name: &str, value: &str) {
    let _ = el.style().set_property(name, value);
}

fn class_for(kind: EntityKind) -> String {
    match kind {
        EntityKind::Obstacle(kind) => format!("obstacle obstacle-{}", kind.name()),
        EntityKind::Collectible(kind) => format!("collectible collectible-{}", kind.name()),
    }
}

/// Stage backed by the game page's elements
pub struct DomStage {
    document: Document,
    container: HtmlElement,
    player: HtmlElement,
    hud: Option<HtmlElement>,
    score_bar: Option<HtmlElement>,
    score_label: Option<HtmlElement>,
    start_overlay: Option<HtmlElement>,
    end_overlay: Option<HtmlElement>,
    end_title: Option<Element>,
    end_message: Option<Element>,
    pause_button: Option<HtmlElement>,
}

impl DomStage {
    /// Bind to the page. Fails if the container or player element is missing.
    pub fn from_document(document: Document) -> Option<Self> {
        let container = html_by_id(&document, "game-container")?;
        let player = html_by_id(&document, "player")?;
        let end_content = html_by_id(&document, "game-over-content");
        Some(Self {
            hud: html_by_id(&document, "score-bar-container"),
            score_bar: html_by_id(&document, "score-bar"),
            score_label: html_by_id(&document, "score-label"),
            start_overlay: html_by_id(&document, "message-overlay"),
            end_overlay: html_by_id(&document, "game-over-overlay"),
            end_title: child(end_content.as_ref(), "h2"),
            end_message: child(end_content.as_ref(), "p"),
            pause_button: html_by_id(&document, "pause-btn"),
            document,
            container,
            player,
        })
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    fn place(el: &HtmlElement, x: f32, bottom: f32) {
        set_style(el, "transform", &format!("translateX({x}px)"));
        set_style(el, "bottom", &format!("{bottom}px"));
    }
}

impl Stage for DomStage {
    type Handle = Option<HtmlElement>;

    fn field_geometry(&self) -> FieldGeometry {
        let mut field = FieldGeometry {
            width: self.container.offset_width() as f32,
            height: self.container.offset_height() as f32,
            ..FieldGeometry::default()
        };
        if let Some(hud) = &self.hud {
            let game_rect = self.container.get_bounding_client_rect();
            let hud_rect = hud.get_bounding_client_rect();
            field.hud_bottom = (hud_rect.bottom() - game_rect.top()) as f32;
            field.hud_height = hud_rect.height() as f32;
        }
        field.sanitized()
    }

    fn create_entity(&mut self, entity: &Entity) -> Self::Handle {
        let el: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
        el.set_class_name(&class_for(entity.kind));
        let _ = el.set_attribute("data-type", entity.kind.name());

        let size = entity.size();
        set_style(&el, "width", &format!("{}px", size.x));
        set_style(&el, "height", &format!("{}px", size.y));
        set_style(&el, "left", "0");
        Self::place(&el, entity.x, entity.bottom);

        if self.container.append_child(&el).is_err() {
            log::warn!("Could not attach {} #{}", entity.kind.name(), entity.id);
            return None;
        }
        Some(el)
    }

    fn set_position(&mut self, handle: &Self::Handle, x: f32, bottom: f32) {
        if let Some(el) = handle {
            Self::place(el, x, bottom);
        }
    }

    fn remove_entity(&mut self, handle: Self::Handle) {
        if let Some(el) = handle {
            el.remove();
        }
    }

    fn set_player(&mut self, bottom: f32, airborne: bool) {
        set_style(&self.player, "bottom", &format!("{bottom}px"));
        let _ = self.player.class_list().toggle_with_force("jump", airborne);
    }

    fn render_score(&mut self, score: u32, win_threshold: u32) {
        let percent = if win_threshold > 0 {
            (score as f32 / win_threshold as f32 * 100.0).min(100.0)
        } else {
            100.0
        };
        if let Some(bar) = &self.score_bar {
            set_style(bar, "width", &format!("{percent}%"));
        }
        if let Some(label) = &self.score_label {
            label.set_text_content(Some(&format!("{score} / {win_threshold}")));
        }
    }

    fn show_overlay(&mut self, overlay: Overlay, final_score: u32) {
        match overlay {
            Overlay::Start => {
                if let Some(el) = &self.start_overlay {
                    set_hidden(el, false);
                }
                if let Some(el) = &self.end_overlay {
                    set_hidden(el, true);
                }
            }
            Overlay::Paused => {
                if let Some(btn) = &self.pause_button {
                    btn.set_text_content(Some("Resume"));
                }
            }
            Overlay::Won | Overlay::Lost => {
                let Some((title, message)) = end_screen(overlay, final_score) else {
                    return;
                };
                if let Some(el) = &self.end_title {
                    el.set_text_content(Some(title));
                }
                if let Some(el) = &self.end_message {
                    el.set_inner_html(&message);
                } else if let Some(el) = self.document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&final_score.to_string()));
                }
                if let Some(el) = &self.end_overlay {
                    set_hidden(el, false);
                }
            }
        }
    }

    fn hide_overlay(&mut self) {
        if let Some(el) = &self.start_overlay {
            set_hidden(el, true);
        }
        if let Some(el) = &self.end_overlay {
            set_hidden(el, true);
        }
        if let Some(btn) = &self.pause_button {
            btn.set_text_content(Some("Pause"));
        }
    }
}
