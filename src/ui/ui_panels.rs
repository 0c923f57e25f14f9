use eframe::egui::{Color32, Key, RichText, TextEdit, Ui};
use strum::IntoEnumIterator;

use crate::config::{FEED, WATCHLIST, WatchlistItem};
use crate::domain::{ConnectionState, InstrumentClass, MarketTick, MarketType};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{direction_color, format_percent, format_price, format_volume, section_heading};

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

// ============================================================================
// LIVE MARKET
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum MarketEvent {
    Subscribe {
        symbol: String,
        instrument_class: InstrumentClass,
    },
}

/// Symbol search, Live/Simulated toggle, connection dot and the latest tick.
pub struct MarketPanel<'a> {
    symbol_input: &'a mut String,
    instrument_class: InstrumentClass,
    connection: ConnectionState,
    tick: Option<&'a MarketTick>,
}

impl<'a> MarketPanel<'a> {
    pub fn new(
        symbol_input: &'a mut String,
        instrument_class: InstrumentClass,
        connection: ConnectionState,
        tick: Option<&'a MarketTick>,
    ) -> Self {
        Self {
            symbol_input,
            instrument_class,
            connection,
            tick,
        }
    }

    fn render_header(&self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            section_heading(ui, UI_TEXT.market_heading);
            let (dot, color) = match self.connection {
                ConnectionState::Connected => ("●", UI_CONFIG.colors.bull),
                ConnectionState::Connecting => ("●", UI_CONFIG.colors.neutral),
                ConnectionState::Disconnected => ("○", Color32::GRAY),
            };
            ui.label(RichText::new(dot).color(color))
                .on_hover_text(self.connection.to_string());
        });
    }

    fn render_class_toggle(&self, ui: &mut Ui, events: &mut Vec<MarketEvent>) {
        ui.horizontal(|ui| {
            for class in InstrumentClass::iter() {
                let text = match class {
                    InstrumentClass::Live => UI_TEXT.market_live_toggle,
                    InstrumentClass::Simulated => UI_TEXT.market_simulated_toggle,
                };
                if ui.selectable_label(self.instrument_class == class, text).clicked()
                    && self.instrument_class != class
                {
                    let symbol = match class {
                        InstrumentClass::Live => FEED.default_live_symbol,
                        InstrumentClass::Simulated => FEED.default_simulated_symbol,
                    };
                    events.push(MarketEvent::Subscribe {
                        symbol: symbol.to_string(),
                        instrument_class: class,
                    });
                }
            }
        });
    }

    fn render_search(&mut self, ui: &mut Ui, events: &mut Vec<MarketEvent>) {
        let response = ui.add(
            TextEdit::singleline(self.symbol_input)
                .hint_text(UI_TEXT.market_symbol_hint)
                .desired_width(f32::INFINITY),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        let symbol = self.symbol_input.trim().to_uppercase();
        if submitted && !symbol.is_empty() {
            events.push(MarketEvent::Subscribe {
                symbol,
                instrument_class: self.instrument_class,
            });
        }
    }

    fn render_tick(&self, ui: &mut Ui) {
        let Some(tick) = self.tick else {
            ui.label_subdued(UI_TEXT.market_waiting);
            return;
        };

        let color = direction_color(tick.is_up);
        ui.label(RichText::new(&tick.symbol).strong());
        ui.horizontal(|ui| {
            ui.label(RichText::new(format_price(tick.price, tick.instrument_class)).size(22.0).monospace().color(color));
            ui.label(RichText::new(format_percent(tick.change_percent)).color(color));
        });
        ui.metric(UI_TEXT.market_high, &format_price(tick.high, tick.instrument_class), Color32::LIGHT_GRAY);
        ui.metric(UI_TEXT.market_low, &format_price(tick.low, tick.instrument_class), Color32::LIGHT_GRAY);
        ui.metric(UI_TEXT.market_volume, &format_volume(tick.volume), Color32::LIGHT_GRAY);
    }
}

impl<'a> Panel for MarketPanel<'a> {
    type Event = MarketEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        self.render_header(ui);
        self.render_class_toggle(ui, &mut events);
        self.render_search(ui, &mut events);
        ui.add_space(6.0);
        self.render_tick(ui);
        events
    }
}

// ============================================================================
// WATCHLIST
// ============================================================================

/// One-click chart synthesis. Emits the index into `WATCHLIST`.
pub struct WatchlistPanel {
    busy: bool,
}

impl WatchlistPanel {
    pub fn new(busy: bool) -> Self {
        Self { busy }
    }

    fn market_tag(market: MarketType) -> RichText {
        let color = match market {
            MarketType::Crypto => UI_CONFIG.colors.neutral,
            MarketType::Equity => UI_CONFIG.colors.accent,
            MarketType::Forex => Color32::from_rgb(168, 85, 247),
        };
        RichText::new(market.to_string()).small().color(color)
    }

    fn render_item(&self, ui: &mut Ui, item: &WatchlistItem) -> bool {
        let mut clicked = false;
        ui.horizontal(|ui| {
            let button = ui.add_enabled(!self.busy, eframe::egui::Button::new(item.ticker));
            clicked = button.on_hover_text(item.name).clicked();
            ui.label(Self::market_tag(item.market));
        });
        clicked
    }
}

impl Panel for WatchlistPanel {
    type Event = usize;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.watchlist_heading);
        ui.label_subdued(UI_TEXT.watchlist_helper);

        for (index, item) in WATCHLIST.iter().enumerate() {
            if self.render_item(ui, item) {
                events.push(index);
            }
        }

        if self.busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label_warning(UI_TEXT.watchlist_loading);
            });
        }
        events
    }
}
