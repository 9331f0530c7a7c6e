use pane_core::{CardView, Interval, Layout, Theme, QUICK_INTERVALS};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlOptionElement, HtmlSelectElement};

use crate::error::ShellError;
use crate::grid::GridSurface;

pub const GRID_ID: &str = "chartGrid";
pub const INTERVAL_BAR_ID: &str = "intervalBar";
pub const ACTIVE_LAYOUT_ID: &str = "activeLayout";
pub const ACTIVE_CARD_ID: &str = "activeCard";
pub const LAYOUT_SELECT_ID: &str = "layoutSelect";
pub const SYMBOL_INPUT_ID: &str = "symbolInput";
pub const APPLY_SYMBOL_ID: &str = "applySymbol";
pub const SYNC_INTERVALS_ID: &str = "syncIntervals";
pub const THEME_TOGGLE_ID: &str = "themeToggle";

pub(crate) fn required(document: &Document, id: &str) -> Result<Element, ShellError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ShellError::Surface(format!("#{id} not found")))
}

/// The card grid and its labels, addressed by the fixed element ids of `index.html`.
pub struct DomSurface {
    document: Document,
    grid: HtmlElement,
    body: Option<HtmlElement>,
    layout_label: Option<Element>,
    active_label: Option<Element>,
    layout_select: Option<HtmlSelectElement>,
}

impl DomSurface {
    pub fn new(document: &Document) -> Result<Self, ShellError> {
        let grid = required(document, GRID_ID)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ShellError::Surface(format!("#{GRID_ID} is not an HTMLElement")))?;
        let layout_select = document
            .get_element_by_id(LAYOUT_SELECT_ID)
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok());
        Ok(Self {
            document: document.clone(),
            grid,
            body: document.body(),
            layout_label: document.get_element_by_id(ACTIVE_LAYOUT_ID),
            active_label: document.get_element_by_id(ACTIVE_CARD_ID),
            layout_select,
        })
    }

    /// Fill the layout selector when the markup ships it empty.
    pub fn offer_layouts(&self, layouts: &[Layout]) -> Result<(), ShellError> {
        let Some(select) = &self.layout_select else {
            return Ok(());
        };
        if select.length() > 0 {
            return Ok(());
        }
        for layout in layouts {
            let name = layout.to_string();
            let option = HtmlOptionElement::new_with_text_and_value(&name, &name)
                .map_err(ShellError::from_js)?;
            select.append_child(&option).map_err(ShellError::from_js)?;
        }
        Ok(())
    }

    /// Topbar interval buttons, unless the markup already ships some.
    pub fn offer_intervals(&self, buttons: &[(&str, String)]) -> Result<(), ShellError> {
        let Some(bar) = self.document.get_element_by_id(INTERVAL_BAR_ID) else {
            return Ok(());
        };
        if bar.child_element_count() > 0 {
            return Ok(());
        }
        for (raw, label) in buttons {
            let button = self.create("button", "interval")?;
            button
                .set_attribute("data-interval", raw)
                .map_err(ShellError::from_js)?;
            button.set_text_content(Some(label));
            self.append(&bar, &button)?;
        }
        Ok(())
    }

    fn create(&self, tag: &str, class: &str) -> Result<Element, ShellError> {
        let el = self.document.create_element(tag).map_err(ShellError::from_js)?;
        el.set_class_name(class);
        Ok(el)
    }

    fn append(&self, parent: &Element, child: &Element) -> Result<(), ShellError> {
        parent.append_child(child).map_err(ShellError::from_js)?;
        Ok(())
    }

    fn cards(&self) -> Vec<Element> {
        let children = self.grid.children();
        (0..children.length()).filter_map(|i| children.item(i)).collect()
    }

    fn find_card(&self, pane_id: &str) -> Option<Element> {
        self.cards()
            .into_iter()
            .find(|card| card.get_attribute("data-id").as_deref() == Some(pane_id))
    }

    /// Symbol, separator and interval label. Text nodes only; symbols are user input.
    fn fill_meta(&self, meta: &Element, card: &CardView) -> Result<(), ShellError> {
        meta.set_text_content(None);
        for (class, text) in [
            ("symbol", card.symbol.as_str()),
            ("sep", "•"),
            ("interval-label", card.interval_label.as_str()),
        ] {
            let span = self.create("span", class)?;
            span.set_text_content(Some(text));
            self.append(meta, &span)?;
        }
        Ok(())
    }

    fn build_card(&self, card: &CardView) -> Result<Element, ShellError> {
        let section = self.create("section", "card")?;
        section
            .set_attribute("data-id", &card.pane_id)
            .map_err(ShellError::from_js)?;

        let header = self.create("div", "card-header")?;
        let meta = self.create("div", "meta")?;
        self.fill_meta(&meta, card)?;
        self.append(&header, &meta)?;

        let actions = self.create("div", "card-actions")?;
        for raw in QUICK_INTERVALS {
            let chip = self.create("button", "chip")?;
            for (name, value) in [("type", "button"), ("data-action", "set"), ("data-interval", raw)] {
                chip.set_attribute(name, value).map_err(ShellError::from_js)?;
            }
            chip.set_text_content(Some(&Interval::from(raw).label()));
            self.append(&actions, &chip)?;
        }
        self.append(&header, &actions)?;

        let body = self.create("div", "card-body")?;
        body.set_id(&card.container_id);

        self.append(&section, &header)?;
        self.append(&section, &body)?;
        Ok(section)
    }
}

impl GridSurface for DomSurface {
    fn clear_cards(&mut self) -> Result<(), ShellError> {
        self.grid.set_inner_html("");
        Ok(())
    }

    fn append_card(&mut self, card: &CardView) -> Result<(), ShellError> {
        let element = self.build_card(card)?;
        self.grid.append_child(&element).map_err(ShellError::from_js)?;
        Ok(())
    }

    fn update_header(&mut self, card: &CardView) -> Result<bool, ShellError> {
        let Some(meta) = self
            .find_card(&card.pane_id)
            .and_then(|el| el.query_selector(".meta").ok().flatten())
        else {
            return Ok(false);
        };
        self.fill_meta(&meta, card)?;
        Ok(true)
    }

    fn mark_active(&mut self, pane_id: &str) -> Result<(), ShellError> {
        for card in self.cards() {
            let is_active = card.get_attribute("data-id").as_deref() == Some(pane_id);
            card.class_list()
                .toggle_with_force("active", is_active)
                .map_err(ShellError::from_js)?;
        }
        if let Some(label) = &self.active_label {
            label.set_text_content(Some(pane_id));
        }
        Ok(())
    }

    fn apply_layout(&mut self, layout: Layout) -> Result<(), ShellError> {
        self.grid.set_class_name(&format!("grid {}", layout.css_class()));
        let style = self.grid.style();
        style
            .set_property("grid-template-columns", &format!("repeat({}, 1fr)", layout.cols()))
            .map_err(ShellError::from_js)?;
        style
            .set_property("grid-template-rows", &format!("repeat({}, 1fr)", layout.rows()))
            .map_err(ShellError::from_js)?;

        let name = layout.to_string();
        if let Some(label) = &self.layout_label {
            label.set_text_content(Some(&name));
        }
        if let Some(select) = &self.layout_select {
            select.set_value(&name);
        }
        Ok(())
    }

    fn limit_visible(&mut self, capacity: usize) -> Result<(), ShellError> {
        for (index, card) in self.cards().into_iter().enumerate() {
            card.class_list()
                .toggle_with_force("hidden", index >= capacity)
                .map_err(ShellError::from_js)?;
        }
        Ok(())
    }

    fn apply_theme(&mut self, theme: Theme) -> Result<(), ShellError> {
        if let Some(body) = &self.body {
            body.set_class_name(&theme.css_class());
        }
        Ok(())
    }
}
