use eframe::egui::{
    CentralPanel, Color32, Context, Frame, Grid, Image, Margin, RichText, ScrollArea, SidePanel,
    TextEdit, TopBottomPanel, Ui,
};
use strum::IntoEnumIterator;

use crate::config::WATCHLIST;
use crate::domain::{AgentAction, AgentDecision, AnalysisResult};
use crate::engine::AnalysisStatus;
use crate::ui::app::{Page, PatternProApp};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_annotator::{AnnotatorEvent, fit_size};
use crate::ui::ui_panels::{MarketEvent, MarketPanel, Panel, WatchlistPanel};
use crate::ui::ui_plot_view::LevelsPlotView;
use crate::ui::utils::{colored_heading, section_heading, spaced_separator, trend_color};
use crate::utils::epoch_ms_to_utc;

impl PatternProApp {
    pub(super) fn render_top_panel(&mut self, ctx: &Context) {
        TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(colored_heading(UI_TEXT.app_title));
                ui.separator();
                for page in Page::iter() {
                    let text = match page {
                        Page::Analyzer => UI_TEXT.page_analyzer,
                        Page::Agent => UI_TEXT.page_agent,
                    };
                    if ui.selectable_label(self.settings.page == page, text).clicked() {
                        self.set_page(page);
                    }
                }
            });
        });
    }

    pub(super) fn render_side_panel(&mut self, ctx: &Context) {
        let side_panel_frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(Margin::same(8));
        SidePanel::right("right_panel")
            .default_width(UI_CONFIG.side_panel_width)
            .frame(side_panel_frame)
            .show(ctx, |ui| {
                ScrollArea::vertical().id_salt("side_scroll").show(ui, |ui| {
                    let connection = self.engine.connection_state();
                    let class = self.settings.instrument_class;
                    let tick = self.engine.latest_tick().cloned();
                    let market_events =
                        MarketPanel::new(&mut self.symbol_input, class, connection, tick.as_ref())
                            .render(ui);

                    spaced_separator(ui);

                    let busy = self.chart_promise.is_some() || self.engine.analysis.is_analyzing();
                    let watch_events = WatchlistPanel::new(busy).render(ui);

                    for event in market_events {
                        match event {
                            MarketEvent::Subscribe {
                                symbol,
                                instrument_class,
                            } => self.subscribe(symbol, instrument_class),
                        }
                    }
                    for index in watch_events {
                        if let Some(item) = WATCHLIST.get(index) {
                            self.start_chart_synthesis(item);
                        }
                    }
                });
            });
    }

    pub(super) fn render_status_panel(&mut self, ctx: &Context) {
        TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label_subdued(format!("Feed: {}", self.engine.connection_state()));
                if let Some((symbol, class)) = self.engine.subscribed_symbol() {
                    ui.label_subdued(format!("{} ({})", symbol, class));
                }
                ui.separator();
                ui.label_subdued(format!("Analysis: {}", self.engine.analysis.status.label()));
                if let Some(ms) = self.engine.analysis.last_duration_ms {
                    ui.label_subdued(format!("{} ms", ms));
                }
                if !self.engine.has_api_key() {
                    ui.separator();
                    ui.label_warning(UI_TEXT.error_no_api_key);
                }
            });
        });
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let central_panel_frame = Frame::new()
            .fill(UI_CONFIG.colors.central_panel)
            .inner_margin(Margin::same(12));
        CentralPanel::default()
            .frame(central_panel_frame)
            .show(ctx, |ui| {
                ScrollArea::vertical().id_salt("central_scroll").show(ui, |ui| {
                    if let Some(msg) = &self.last_error {
                        ui.label_error(msg);
                    }

                    if self.settings.page == Page::Agent {
                        self.render_agent_context(ui);
                    }

                    match self.engine.analysis.status.clone() {
                        AnalysisStatus::Analyzing => render_analyzing(ui),
                        AnalysisStatus::Failed(msg) => {
                            ui.label_error(msg);
                            self.render_start_over(ui);
                        }
                        AnalysisStatus::Completed => {
                            self.render_outcome(ui);
                            self.render_start_over(ui);
                        }
                        AnalysisStatus::Idle => self.render_input(ui),
                    }
                });
            });
    }

    fn render_agent_context(&mut self, ui: &mut Ui) {
        ui.label_subheader(UI_TEXT.agent_context_heading);
        ui.add(
            TextEdit::multiline(&mut self.settings.agent_context)
                .hint_text(UI_TEXT.agent_context_hint)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(8.0);
    }

    fn render_input(&mut self, ui: &mut Ui) {
        let confirm_label = match self.settings.page {
            Page::Analyzer => UI_TEXT.annotate_confirm_analyzer,
            Page::Agent => UI_TEXT.annotate_confirm_agent,
        };

        let event = match self.annotator.as_mut() {
            Some(view) => view.show(ui, confirm_label),
            None => {
                if render_drop_zone(ui) {
                    self.open_image_dialog();
                }
                None
            }
        };

        match event {
            Some(AnnotatorEvent::Confirm(image)) => self.submit_annotated(image),
            Some(AnnotatorEvent::Cancel) => self.start_over(),
            None => {}
        }
    }

    fn render_start_over(&mut self, ui: &mut Ui) {
        ui.add_space(10.0);
        if ui.button(UI_TEXT.new_analysis).clicked() {
            self.start_over();
        }
    }

    fn render_outcome(&mut self, ui: &mut Ui) {
        if let Some(result) = self.engine.analysis.result.clone() {
            self.render_result_card(ui, &result);
        }
        if let Some(decision) = self.engine.analysis.decision.clone() {
            render_decision_card(ui, &decision);
        }
    }

    fn render_result_card(&mut self, ui: &mut Ui, result: &AnalysisResult) {
        Frame::new()
            .fill(UI_CONFIG.colors.card)
            .inner_margin(Margin::same(12))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new(&result.pattern_name).strong().color(Color32::WHITE));
                    ui.badge(result.trend.to_string(), trend_color(result.trend));
                });
                ui.metric(
                    UI_TEXT.result_confidence,
                    &format!("{:.0}%", result.confidence),
                    Color32::WHITE,
                );
                ui.add(eframe::egui::ProgressBar::new((result.confidence / 100.0) as f32));

                spaced_separator(ui);
                ui.columns(2, |cols| {
                    render_levels(&mut cols[0], UI_TEXT.result_support, &result.support_levels, UI_CONFIG.colors.bull);
                    render_levels(&mut cols[1], UI_TEXT.result_resistance, &result.resistance_levels, UI_CONFIG.colors.bear);
                });

                LevelsPlotView::show(ui, result, self.chart_candles.as_deref());
                if let Some(last) = self.chart_candles.as_ref().and_then(|c| c.last()) {
                    ui.label_subdued(format!(
                        "{} {} UTC",
                        UI_TEXT.result_candles_through,
                        epoch_ms_to_utc(last.open_time_ms)
                    ));
                }

                section_heading(ui, UI_TEXT.result_analysis);
                ui.label(&result.analysis);
                section_heading(ui, UI_TEXT.result_advice);
                ui.label(RichText::new(&result.actionable_advice).color(UI_CONFIG.colors.accent));

                if let Some(source) = &result.source_image {
                    if let Some(texture) = self.result_texture_for(ui.ctx(), source) {
                        section_heading(ui, UI_TEXT.result_source_image);
                        let [w, h] = texture.size();
                        let size = fit_size((w as u32, h as u32), ui.available_width(), UI_CONFIG.max_image_height);
                        ui.add(Image::new(&texture).fit_to_exact_size(size));
                    }
                }
            });
    }
}

fn render_analyzing(ui: &mut Ui) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui| {
        ui.spinner();
        ui.label(RichText::new(UI_TEXT.analyzing).color(UI_CONFIG.colors.accent));
    });
}

/// TRUE when the user asked for the file picker.
fn render_drop_zone(ui: &mut Ui) -> bool {
    let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    let stroke_color = if hovering {
        UI_CONFIG.colors.accent
    } else {
        Color32::from_gray(70)
    };
    Frame::new()
        .stroke(eframe::egui::Stroke::new(1.5, stroke_color))
        .inner_margin(Margin::same(40))
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(UI_TEXT.drop_heading).size(18.0).color(Color32::WHITE));
                ui.label_subdued(UI_TEXT.drop_helper);
                ui.add_space(8.0);
                ui.button(UI_TEXT.open_file_button).clicked()
            })
            .inner
        })
        .inner
}

fn render_levels(ui: &mut Ui, heading: &str, levels: &[String], color: Color32) {
    ui.label_subheader(heading);
    if levels.is_empty() {
        ui.label_subdued("n/a");
    }
    for level in levels {
        ui.label(RichText::new(level).monospace().color(color));
    }
}

fn action_color(action: AgentAction) -> Color32 {
    match action {
        AgentAction::Buy => UI_CONFIG.colors.bull,
        AgentAction::Sell => UI_CONFIG.colors.bear,
        AgentAction::Hold => UI_CONFIG.colors.neutral,
    }
}

fn render_decision_card(ui: &mut Ui, decision: &AgentDecision) {
    Frame::new()
        .fill(UI_CONFIG.colors.card)
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label_subheader(UI_TEXT.agent_action);
                ui.badge(decision.action.to_string(), action_color(decision.action));
                ui.metric(
                    UI_TEXT.result_confidence,
                    &format!("{:.0}%", decision.confidence),
                    Color32::WHITE,
                );
                ui.metric(
                    UI_TEXT.agent_reward_risk,
                    &format!("{:.2}", decision.reward_risk_ratio),
                    Color32::WHITE,
                );
            });

            spaced_separator(ui);
            Grid::new("decision_levels").num_columns(2).striped(true).show(ui, |ui| {
                ui.label_subdued(UI_TEXT.agent_entry);
                ui.label(RichText::new(&decision.suggested_entry).monospace());
                ui.end_row();
                ui.label_subdued(UI_TEXT.agent_stop);
                ui.label(RichText::new(&decision.stop_loss).monospace().color(UI_CONFIG.colors.bear));
                ui.end_row();
                ui.label_subdued(UI_TEXT.agent_target);
                ui.label(RichText::new(&decision.take_profit).monospace().color(UI_CONFIG.colors.bull));
                ui.end_row();
            });

            section_heading(ui, UI_TEXT.agent_reasoning);
            ui.label(&decision.reasoning);

            section_heading(ui, UI_TEXT.agent_state);
            let state = &decision.detected_state;
            ui.metric(UI_TEXT.result_trend, &state.trend, Color32::LIGHT_GRAY);
            ui.metric(UI_TEXT.agent_volatility, &state.volatility, Color32::LIGHT_GRAY);
            ui.metric(UI_TEXT.agent_key_levels, &state.key_levels, Color32::LIGHT_GRAY);
        });
}
