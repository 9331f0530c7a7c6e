use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlInputElement, HtmlSelectElement};

use super::dom::{
    required, DomSurface, APPLY_SYMBOL_ID, GRID_ID, LAYOUT_SELECT_ID, SYMBOL_INPUT_ID,
    SYNC_INTERVALS_ID, THEME_TOGGLE_ID,
};
use super::tradingview::TradingViewRenderer;
use crate::dashboard::Dashboard;
use crate::error::ShellError;
use crate::storage::LocalStorage;

pub type WebDashboard = Dashboard<LocalStorage, DomSurface, TradingViewRenderer>;
pub type SharedDashboard = Rc<RefCell<WebDashboard>>;

/// Listeners live as long as the page, so the closures are leaked.
fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), ShellError> {
    let cb = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
    target
        .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
        .map_err(ShellError::from_js)?;
    cb.forget();
    Ok(())
}

fn dispatch(
    dashboard: &SharedDashboard,
    action: impl FnOnce(&mut WebDashboard) -> Result<(), ShellError>,
) {
    let Ok(mut dashboard) = dashboard.try_borrow_mut() else {
        log::warn!("event dropped: dashboard busy");
        return;
    };
    if let Err(err) = action(&mut dashboard) {
        log::error!("{err}");
    }
}

fn pane_id_of(element: &Element) -> Option<String> {
    element
        .closest(".card")
        .ok()
        .flatten()
        .and_then(|card| card.get_attribute("data-id"))
}

/// Wire toolbar controls and the card grid to the dashboard.
pub fn bind_controls(document: &Document, dashboard: &SharedDashboard) -> Result<(), ShellError> {
    let buttons = document
        .query_selector_all(".interval")
        .map_err(ShellError::from_js)?;
    for i in 0..buttons.length() {
        let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(interval) = button.get_attribute("data-interval") else {
            continue;
        };
        let d = dashboard.clone();
        listen(&button, "click", move |_| {
            dispatch(&d, |dash| dash.on_topbar_interval(&interval))
        })?;
    }

    let input = required(document, SYMBOL_INPUT_ID)?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| ShellError::Surface(format!("#{SYMBOL_INPUT_ID} is not an input")))?;
    let d = dashboard.clone();
    listen(&required(document, APPLY_SYMBOL_ID)?, "click", move |_| {
        let value = input.value();
        dispatch(&d, |dash| dash.on_apply_symbol(&value))
    })?;

    let d = dashboard.clone();
    listen(&required(document, LAYOUT_SELECT_ID)?, "change", move |event| {
        let Some(select) = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };
        let value = select.value();
        dispatch(&d, |dash| dash.on_layout_change(&value))
    })?;

    let d = dashboard.clone();
    listen(&required(document, SYNC_INTERVALS_ID)?, "click", move |_| {
        dispatch(&d, |dash| dash.on_sync_intervals())
    })?;

    let d = dashboard.clone();
    listen(&required(document, THEME_TOGGLE_ID)?, "click", move |_| {
        dispatch(&d, |dash| dash.on_theme_toggle())
    })?;

    // One delegated listener survives every grid rebuild.
    let d = dashboard.clone();
    listen(&required(document, GRID_ID)?, "click", move |event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        if let Some(chip) = target.closest(".chip").ok().flatten() {
            event.stop_propagation();
            if let (Some(pane_id), Some(interval)) =
                (pane_id_of(&chip), chip.get_attribute("data-interval"))
            {
                dispatch(&d, |dash| dash.on_card_chip(&pane_id, &interval));
            }
            return;
        }
        if let Some(pane_id) = pane_id_of(&target) {
            dispatch(&d, |dash| dash.on_card_click(&pane_id));
        }
    })?;

    Ok(())
}
