use crate::event::AppEvent;
use crate::flow::FlowService;
use crate::session::dispatch::{self, PendingDispatch, Resolution};
use crate::session::store::Conversation;
use crate::session::{Role, Turn};
use crate::theme::Theme;
use eframe::egui::{self, CornerRadius, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::runtime::Handle;

pub const WINDOW_TITLE: &str = "Sarvodaya Finance Assistant";
const HEADING: &str = "Sarvodaya Development Finance Investor Assistant";
const WELCOME: &str = "Welcome to Sarvodaya Finance's AI Investor Assistant. I'm here to help you with information about our financial and business performance.";
const INPUT_HINT: &str = "How can I help you today?";
const FOOTER: &str = "© 2025 Sarvodaya Development Finance PLC. All rights reserved.\nLicensed by the Monetary Board of the Central Bank of Sri Lanka under the Finance Business Act No. 42 of 2011.";

const DIAGNOSTICS_LIMIT: usize = 200;

pub const SAMPLE_PROMPTS: [&str; 3] = [
    "Give me an overview of loan growth during FY2024",
    "Provide me an analysis of the asset quality",
    "How is the overall profitability of the company",
];

pub struct AssistantApp {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
    flow: Arc<dyn FlowService>,
    runtime: Handle,
    theme: Theme,
    conversation: Conversation,
    pending: Option<PendingDispatch>,
    input_buffer: String,
    last_failure: Option<String>,
    diagnostics_log: Vec<String>,
    scroll_to_bottom: bool,
}

impl AssistantApp {
    pub fn new(
        tx: Sender<AppEvent>,
        rx: Receiver<AppEvent>,
        flow: Arc<dyn FlowService>,
        runtime: Handle,
    ) -> Self {
        Self {
            tx,
            rx,
            flow,
            runtime,
            theme: Theme::default(),
            conversation: Conversation::new(),
            pending: None,
            input_buffer: String::new(),
            last_failure: None,
            diagnostics_log: Vec::new(),
            scroll_to_bottom: false,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        if self.diagnostics_log.len() >= DIAGNOSTICS_LIMIT {
            let overflow = self.diagnostics_log.len() + 1 - DIAGNOSTICS_LIMIT;
            self.diagnostics_log.drain(..overflow);
        }
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn submit(&mut self, input: &str, ctx: Option<&egui::Context>) {
        if self.is_pending() {
            return;
        }
        let Some(pending) = dispatch::begin(&mut self.conversation, input) else {
            return;
        };

        tracing::info!(turns = self.conversation.len(), "dispatching prompt");
        let prompt = pending.prompt().to_string();
        self.pending = Some(pending);
        self.scroll_to_bottom = true;

        let flow = Arc::clone(&self.flow);
        let tx = self.tx.clone();
        let ctx = ctx.cloned();
        self.runtime.spawn(async move {
            let outcome = flow.send(&prompt).await;
            if tx.send(AppEvent::FlowReply(outcome)).is_err() {
                tracing::warn!("window closed before the flow replied");
            }
            if let Some(ctx) = ctx {
                ctx.request_repaint();
            }
        });
    }

    fn clear_conversation(&mut self) {
        if self.is_pending() || self.conversation.is_empty() {
            return;
        }
        let dropped = self.conversation.len();
        self.conversation.clear();
        self.last_failure = None;
        self.scroll_to_bottom = false;
        tracing::info!(dropped, "conversation cleared");
        self.log_diagnostic(format!("conversation cleared ({dropped} turns)"));
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::FlowReply(outcome) => {
                let Some(pending) = self.pending.take() else {
                    self.log_diagnostic("flow reply arrived with no pending prompt");
                    return;
                };

                match dispatch::resolve(&mut self.conversation, pending, outcome) {
                    Resolution::Answered => {
                        self.last_failure = None;
                    }
                    Resolution::Failed { detail } => {
                        self.log_diagnostic(format!("Technical details: {detail}"));
                        self.last_failure = Some(detail);
                    }
                }
                self.scroll_to_bottom = true;
            }
        }
    }

    fn render_side_panel(&mut self, ctx: &egui::Context) {
        let mut clear_now = false;
        egui::SidePanel::left("session_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Session");
                ui.label(format!("{} messages", self.conversation.len()));
                ui.separator();

                clear_now = ui
                    .add_enabled(
                        !self.is_pending() && !self.conversation.is_empty(),
                        egui::Button::new("Clear Conversation"),
                    )
                    .clicked();

                ui.separator();
                egui::CollapsingHeader::new("Diagnostics")
                    .default_open(false)
                    .show(ui, |ui| {
                        ScrollArea::vertical()
                            .id_salt("diagnostics_log")
                            .max_height(240.0)
                            .stick_to_bottom(true)
                            .show(ui, |ui| {
                                if self.diagnostics_log.is_empty() {
                                    ui.label(RichText::new("Nothing logged yet").small());
                                }
                                for entry in &self.diagnostics_log {
                                    ui.label(RichText::new(entry).small().monospace());
                                }
                            });
                    });
            });

        if clear_now {
            self.clear_conversation();
        }
    }

    fn render_footer(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(FOOTER).small().color(self.theme.text_muted));
            });
        });
    }

    fn render_composer(&mut self, ctx: &egui::Context) {
        let mut send_now = false;
        egui::TopBottomPanel::bottom("composer").show(ctx, |ui| {
            ui.add_space(self.theme.spacing_8);
            let enabled = !self.is_pending();
            self.theme.composer_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    let send_width = 80.0;
                    let response = ui.add_enabled(
                        enabled,
                        egui::TextEdit::singleline(&mut self.input_buffer)
                            .desired_width(ui.available_width() - send_width)
                            .hint_text(INPUT_HINT),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        send_now = true;
                    }

                    send_now |= ui
                        .add_enabled(
                            enabled && !self.input_buffer.trim().is_empty(),
                            egui::Button::new("Send"),
                        )
                        .clicked();
                });
            });
            ui.add_space(self.theme.spacing_8);
        });

        if send_now {
            let input = std::mem::take(&mut self.input_buffer);
            self.submit(&input, Some(ctx));
        }
    }

    fn render_prompts(&self, ui: &mut egui::Ui) -> Option<&'static str> {
        ui.label(
            RichText::new("Try asking about:")
                .strong()
                .size(17.0)
                .color(self.theme.accent),
        );

        let enabled = !self.is_pending();
        let mut picked = None;
        ui.columns(SAMPLE_PROMPTS.len(), |columns| {
            for (column, prompt) in columns.iter_mut().zip(SAMPLE_PROMPTS) {
                let button = egui::Button::new(prompt)
                    .wrap()
                    .min_size(egui::vec2(column.available_width(), 56.0));
                if column
                    .add_enabled(enabled, button)
                    .on_hover_text(format!("Click to ask about {prompt}"))
                    .clicked()
                {
                    picked = Some(prompt);
                }
            }
        });
        picked
    }

    fn render_turn(&self, ui: &mut egui::Ui, turn: &Turn) {
        let speaker = match turn.role() {
            Role::User => "You",
            Role::Assistant => "Assistant",
        };
        let response = self
            .theme
            .bubble_frame(turn.role())
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(speaker).small().strong().color(self.theme.text_muted));
                ui.label(turn.content());
            })
            .response;

        if turn.role() == Role::Assistant {
            let rect = response.rect;
            let bar = egui::Rect::from_min_max(
                rect.left_top(),
                egui::pos2(rect.left() + self.theme.accent_bar_width, rect.bottom()),
            );
            ui.painter()
                .rect_filled(bar, CornerRadius::ZERO, self.theme.accent);
        }
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        let mut picked = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .id_salt("chat_transcript")
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading(RichText::new(HEADING).strong().color(self.theme.accent));
                    });
                    ui.add_space(self.theme.spacing_8);
                    self.theme.card_frame().show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(WELCOME);
                    });
                    ui.add_space(self.theme.spacing_16);

                    picked = self.render_prompts(ui);
                    ui.add_space(self.theme.spacing_16);

                    for turn in self.conversation.all() {
                        self.render_turn(ui, turn);
                    }

                    if self.is_pending() {
                        ui.horizontal(|ui| {
                            ui.add(egui::Spinner::new());
                            ui.label(
                                RichText::new("Processing your request...")
                                    .color(self.theme.text_muted),
                            );
                        });
                    }

                    if let Some(detail) = &self.last_failure {
                        ui.label(
                            RichText::new(format!("Technical details: {detail}"))
                                .small()
                                .color(self.theme.danger),
                        );
                    }

                    if self.scroll_to_bottom {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
            self.scroll_to_bottom = false;
        });

        if let Some(prompt) = picked {
            self.submit(prompt, Some(ctx));
        }
    }
}

impl eframe::App for AssistantApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.render_side_panel(ctx);
        self.render_footer(ctx);
        self.render_composer(ctx);
        self.render_center_panel(ctx);
    }
}
