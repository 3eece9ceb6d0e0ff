//! Main application for the renju GUI

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};

use crate::config::{GameMode, GameSettings};
use crate::rules::GameStatus;
use crate::storage::SaveStore;
use crate::strategy::Difficulty;
use crate::Stone;

use super::board_view::BoardView;
use super::game_state::GameState;
use super::theme::*;

/// Main renju application
pub struct RenjuApp {
    state: GameState,
    board_view: BoardView,
    show_debug: bool,
}

impl RenjuApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: GameSettings, store: SaveStore) -> Self {
        Self {
            state: GameState::new(settings, store),
            board_view: BoardView::default(),
            show_debug: false,
        }
    }

    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("New Game (PvE - Black)").clicked() {
                        self.state.new_game_with_mode(GameMode::PvE, Stone::Black);
                        ui.close_menu();
                    }
                    if ui.button("New Game (PvE - White)").clicked() {
                        self.state.new_game_with_mode(GameMode::PvE, Stone::White);
                        ui.close_menu();
                    }
                    if ui.button("New Game (PvP)").clicked() {
                        self.state.new_game_with_mode(GameMode::PvP, Stone::Black);
                        ui.close_menu();
                    }
                    if ui.button("New Game (AI vs AI)").clicked() {
                        self.state.new_game_with_mode(GameMode::EvE, Stone::Black);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Undo (U)").clicked() {
                        self.state.undo();
                        ui.close_menu();
                    }
                    if ui.button("Save").clicked() {
                        self.state.save_game();
                        ui.close_menu();
                    }
                    if ui.button("Load Autosave").clicked() {
                        self.state.load_autosave();
                        ui.close_menu();
                    }
                    if ui.button("Replay").clicked() {
                        self.state.start_replay();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Rules", |ui| {
                    let mut forbidden = self.state.session.settings().forbidden_rules;
                    if ui.checkbox(&mut forbidden, "Forbidden moves (first player)").changed() {
                        self.state.set_forbidden_rules(forbidden);
                    }
                    ui.separator();
                    for player in [Stone::Black, Stone::White] {
                        self.render_difficulty_selector(ui, player);
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Debug Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let settings = self.state.session.settings();
                    let mode_text = match settings.mode {
                        GameMode::PvE => format!("PvE - You: {}", settings.human_player.name()),
                        GameMode::PvP => "PvP - Hotseat".to_string(),
                        GameMode::EvE => "AI vs AI".to_string(),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    fn render_difficulty_selector(&mut self, ui: &mut egui::Ui, player: Stone) {
        let current = self.state.session.difficulty(player);
        let mut selected = current;
        egui::ComboBox::from_label(format!("{} AI", player.name()))
            .selected_text(current.label())
            .show_ui(ui, |ui| {
                for difficulty in Difficulty::ALL {
                    let item = ui.selectable_value(&mut selected, difficulty, difficulty.label());
                    if difficulty == Difficulty::Expert {
                        item.on_hover_text("Slow: a move can take tens of seconds");
                    }
                }
            });
        if selected != current {
            self.state.set_difficulty(player, selected);
        }
    }

    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                self.render_title_card(ui);
                ui.add_space(12.0);

                self.render_turn_card(ui);
                ui.add_space(10.0);

                self.render_timer_card(ui);
                ui.add_space(10.0);

                self.render_actions_card(ui);

                ui.add_space(10.0);
                self.render_ai_card(ui);

                if self.show_debug {
                    ui.add_space(10.0);
                    self.render_debug_card(ui);
                }

                if let Some(msg) = &self.state.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg);
                }
            });
    }

    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_title_card(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("●○").size(20.0).color(TEXT_SECONDARY));
            ui.add_space(4.0);
            ui.label(RichText::new("RENJU").size(22.0).strong().color(TEXT_PRIMARY));
        });
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            let rules = if self.state.session.settings().forbidden_rules {
                "Forbidden moves on"
            } else {
                "Free-style"
            };
            ui.label(RichText::new(rules).size(11.0).color(TEXT_MUTED));
        });
    }

    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let is_black = self.state.session.current_player() == Stone::Black;
            let (stone_char, color_name, accent) = if is_black {
                ("●", "BLACK", egui::Color32::from_rgb(70, 70, 75))
            } else {
                ("○", "WHITE", egui::Color32::from_rgb(220, 220, 225))
            };

            ui.horizontal(|ui| {
                let stone_color = if is_black { TEXT_PRIMARY } else { egui::Color32::from_rgb(30, 30, 35) };

                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, accent);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    stone_char,
                    egui::FontId::proportional(28.0),
                    stone_color,
                );

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new(color_name).size(18.0).strong().color(TEXT_PRIMARY));

                    let session = &self.state.session;
                    let status = if self.state.replay.is_some() {
                        ("Replay", TEXT_SECONDARY)
                    } else if self.state.is_ai_thinking() {
                        ("AI thinking...", TIMER_WARNING)
                    } else if session.status() == GameStatus::Finished {
                        ("Game Over", WIN_HIGHLIGHT)
                    } else if session.is_ai_turn() {
                        ("AI to move", TIMER_NORMAL)
                    } else {
                        ("Your turn", TIMER_NORMAL)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });
        });
    }

    fn render_timer_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TIMER").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            if let Some(elapsed) = self.state.ai_thinking_elapsed() {
                let secs = elapsed.as_secs_f32();
                let color = if secs < 1.0 {
                    TIMER_NORMAL
                } else if secs < 3.0 {
                    TIMER_WARNING
                } else {
                    TIMER_CRITICAL
                };
                ui.label(RichText::new(format!("{:.2}s", secs)).size(28.0).strong().color(color));
            } else {
                let elapsed = self.state.move_timer.elapsed();
                ui.label(RichText::new(format!("{:.1}s", elapsed.as_secs_f32())).size(24.0).color(TEXT_PRIMARY));
            }

            if let Some(ai_time) = self.state.move_timer.ai_thinking_time {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Last AI: {:.3}s", ai_time.as_secs_f32()))
                        .size(10.0)
                        .color(TEXT_SECONDARY),
                );
            }
        });
    }

    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ACTIONS").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            let btn_frame = Frame::new()
                .fill(BUTTON_BG)
                .corner_radius(CornerRadius::same(6))
                .inner_margin(8.0);
            let button = |ui: &mut egui::Ui, text: &str| {
                btn_frame
                    .show(ui, |ui| {
                        ui.add(
                            egui::Label::new(RichText::new(text).size(12.0).color(TEXT_PRIMARY))
                                .sense(egui::Sense::click()),
                        )
                        .clicked()
                    })
                    .inner
            };

            if self.state.replay.is_some() {
                ui.horizontal(|ui| {
                    if button(ui, "◀ Back") {
                        self.state.replay_step(false);
                    }
                    if button(ui, "Next ▶") {
                        self.state.replay_step(true);
                    }
                    if button(ui, "Exit") {
                        self.state.stop_replay();
                    }
                });
                if let Some(replay) = &self.state.replay {
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new(format!("Move {}/{}", replay.position(), replay.len()))
                            .size(11.0)
                            .color(TEXT_SECONDARY),
                    );
                }
                return;
            }

            ui.horizontal(|ui| {
                if button(ui, "↩ Undo") {
                    self.state.undo();
                }
                if button(ui, "Hint") {
                    self.state.request_suggestion();
                }
                if button(ui, "New") {
                    self.state.reset();
                }
            });

            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("Move #{}", self.state.session.history().len()))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    /// Last AI decision: notation, score, time and tier
    fn render_ai_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("AI").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let Some(result) = &self.state.last_ai_result else {
                ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                return;
            };
            ui.horizontal(|ui| {
                ui.label(RichText::new(&result.notation).size(16.0).strong().color(WIN_HIGHLIGHT));
                ui.add_space(8.0);
                ui.label(RichText::new(result.difficulty.label()).size(11.0).color(TIMER_NORMAL));
            });
            let score = if result.score.is_infinite() {
                if result.score > 0.0 { "+inf" } else { "-inf" }.to_string()
            } else {
                format!("{:.0}", result.score)
            };
            ui.label(RichText::new(format!("Score: {score}")).size(10.0).color(TEXT_SECONDARY));
            ui.label(
                RichText::new(format!("{}ms", result.thinking_time_ms))
                    .size(10.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    /// Ranked root candidates from the last AI search
    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Frame::new()
            .fill(egui::Color32::from_rgb(30, 33, 38))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new("CANDIDATES").size(10.0).color(TEXT_MUTED));
                ui.add_space(6.0);
                let size = self.state.session.board().size();
                for candidate in self.state.last_candidates.iter().take(8) {
                    let notation = crate::position_to_notation(
                        candidate.pos.x as i32,
                        candidate.pos.y as i32,
                        size,
                    );
                    ui.label(
                        RichText::new(format!("{notation:>4}  {:.1}", candidate.priority))
                            .size(10.0)
                            .monospace()
                            .color(TEXT_SECONDARY),
                    );
                }
            });
    }

    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            ui.style_mut().visuals.panel_fill = egui::Color32::from_rgb(40, 42, 46);

            let (rules, last_move, winning_line) = match &self.state.replay {
                Some(replay) => {
                    let session = replay.session();
                    (None, session.last_move().map(|m| m.pos), session.win_line().to_vec())
                }
                None => {
                    let session = &self.state.session;
                    let interactive = self.state.is_human_turn() && !self.state.is_ai_thinking();
                    (
                        interactive.then(|| session.rules().clone()),
                        session.last_move().map(|m| m.pos),
                        session.win_line().to_vec(),
                    )
                }
            };

            let clicked = self.board_view.show(
                ui,
                self.state.display_board(),
                rules.as_ref(),
                self.state.session.current_player(),
                last_move,
                self.state.suggested_move,
                &winning_line,
            );

            if let Some(pos) = clicked {
                if let Err(msg) = self.state.try_place_stone(pos) {
                    self.state.message = Some(msg);
                }
            }
        });
    }

    fn handle_input(&mut self, ctx: &Context) {
        ctx.input(|i| {
            // D - Toggle debug panel
            if i.key_pressed(egui::Key::D) {
                self.show_debug = !self.show_debug;
            }
            // H - Hint
            if i.key_pressed(egui::Key::H) {
                self.state.request_suggestion();
            }
            // U - Undo
            if i.key_pressed(egui::Key::U) {
                self.state.undo();
            }
            // N - New game
            if i.key_pressed(egui::Key::N) {
                self.state.reset();
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                self.state.replay_step(true);
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                self.state.replay_step(false);
            }
        });
    }
}

impl eframe::App for RenjuApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        self.state.check_ai_result();
        self.state.start_ai_thinking();

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        // Keep the timer and AI polling alive
        if self.state.is_ai_thinking() || !self.state.session.is_finished() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
