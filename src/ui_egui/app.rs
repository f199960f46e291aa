use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{Context as _, Result};
use chrono::{Duration, NaiveDate, NaiveTime};
use egui_extras::DatePickerButton;

use super::grid_view::{show_day_headers, show_week_grid};
use super::sample_data::sample_week;
use super::theme::{apply_to_context, resolve_theme};
use crate::grid::clock::{Clock, SystemClock};
use crate::grid::day_column::tooltip_text;
use crate::grid::intent::GridIntent;
use crate::grid::interaction::GridInteractionController;
use crate::grid::now_indicator::{LiveTimeIndicator, NowTicker};
use crate::grid::render::WeekRenderer;
use crate::grid::time_axis::time_to_minutes;
use crate::grid::week::WeekNavigator;
use crate::models::appointment::{Appointment, AppointmentId};
use crate::models::settings::GridSettings;
use crate::services::appointment_book::{AppointmentBook, ChangeToken, PendingChange};
use crate::utils::date::local_at_minutes;

/// Round-trip time of the simulated store
const PERSIST_LATENCY: StdDuration = StdDuration::from_millis(600);
/// Width reserved for the vertical scrollbar
const SCROLLBAR_ALLOWANCE: f32 = 14.0;

/// Result of a simulated write
struct PersistOutcome {
    token: ChangeToken,
    result: Result<Appointment, String>,
}

/// New-appointment form opened by a create intent
struct CreateDraft {
    date: NaiveDate,
    time: NaiveTime,
    patient: String,
    duration_minutes: i64,
}

pub struct SchedulerApp {
    settings: GridSettings,
    renderer: WeekRenderer,
    navigator: WeekNavigator,
    controller: GridInteractionController,
    book: AppointmentBook,
    indicator: LiveTimeIndicator,
    runtime: tokio::runtime::Runtime,
    ticker: Option<NowTicker>,
    persist_tx: Sender<PersistOutcome>,
    persist_rx: Receiver<PersistOutcome>,
    /// Make every simulated write fail, to exercise revert
    simulate_failures: bool,
    picked_date: NaiveDate,
    draft: Option<CreateDraft>,
    opened: Option<AppointmentId>,
    status_message: Option<String>,
    scroll_to_now: bool,
    next_id: u64,
}

impl eframe::App for SchedulerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_persist_outcomes();
        self.indicator.refresh();
        ctx.request_repaint_after(self.indicator.next_refresh_in());

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.show_toolbar(ui));
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.show_status_bar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.show_grid(ui, ctx));

        self.show_create_dialog(ctx);
        self.show_details_dialog(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.abort();
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
        log::info!("Clinic scheduler closed");
    }
}

impl SchedulerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: GridSettings) -> Result<Self> {
        let theme = resolve_theme(settings.theme);
        apply_to_context(&theme, &cc.egui_ctx);

        let renderer =
            WeekRenderer::new(settings.clone(), theme).context("Invalid grid settings")?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let indicator = LiveTimeIndicator::from_settings(Arc::clone(&clock), &settings);
        let navigator = WeekNavigator::today(clock.as_ref());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("Failed to start background runtime")?;

        let repaint_ctx = cc.egui_ctx.clone();
        let ticker = NowTicker::spawn(
            runtime.handle(),
            StdDuration::from_secs(settings.now_refresh_seconds),
            move || repaint_ctx.request_repaint(),
        );

        let (persist_tx, persist_rx) = mpsc::channel();
        let book = AppointmentBook::new(sample_week(navigator.anchor()));
        log::info!(
            "Loaded {} sample appointments for {}",
            book.appointments().len(),
            navigator.range_label()
        );

        Ok(Self {
            controller: GridInteractionController::new(&settings),
            picked_date: navigator.anchor(),
            settings,
            renderer,
            navigator,
            book,
            indicator,
            runtime,
            ticker: Some(ticker),
            persist_tx,
            persist_rx,
            simulate_failures: false,
            draft: None,
            opened: None,
            status_message: None,
            scroll_to_now: true,
            next_id: 1,
        })
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut navigated = false;
            if ui.button("◀ Prev").clicked() {
                self.navigator.previous_week();
                navigated = true;
            }
            if ui.button("Today").clicked() {
                self.navigator.go_to(self.indicator.now().date_naive());
                self.scroll_to_now = true;
                navigated = true;
            }
            if ui.button("Next ▶").clicked() {
                self.navigator.next_week();
                navigated = true;
            }
            if navigated {
                // A gesture cannot survive the grid changing under it
                self.controller.abort();
                self.picked_date = self.navigator.anchor();
            }

            ui.separator();
            ui.heading(self.navigator.range_label());
            ui.separator();

            let before = self.picked_date;
            ui.add(DatePickerButton::new(&mut self.picked_date).id_source("week_picker"));
            if self.picked_date != before {
                self.controller.abort();
                self.navigator.go_to(self.picked_date);
            }

            ui.separator();
            ui.checkbox(&mut self.simulate_failures, "Simulate write failures");
        });
    }

    fn show_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("{} pending write(s)", self.book.pending().len()));
            if let Some(message) = &self.status_message {
                ui.separator();
                ui.label(message);
            }
        });
    }

    fn show_grid(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let width = ui.available_width() - SCROLLBAR_ALLOWANCE;
        let model = self.renderer.render_week(
            self.navigator.anchor(),
            self.book.appointments(),
            width,
            self.indicator.now(),
        );

        let diagnostics: Vec<String> = model.diagnostics().map(|d| format!("{:?}", d)).collect();
        if !diagnostics.is_empty() {
            ui.label(format!("{} appointment(s) drawn with fallbacks", diagnostics.len()))
                .on_hover_text(diagnostics.join("\n"));
        }

        show_day_headers(ui, &model);

        let mut scroll = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .drag_to_scroll(false);
        if self.scroll_to_now {
            if let Some(marker) = model.now_marker {
                scroll = scroll.vertical_scroll_offset((marker.offset - 120.0).max(0.0));
            }
            self.scroll_to_now = false;
        }

        let intent = scroll
            .show(ui, |ui| show_week_grid(ui, &model, &mut self.controller))
            .inner;

        if let Some(intent) = intent {
            self.handle_intent(intent, ctx);
        }
    }

    fn handle_intent(&mut self, intent: GridIntent, ctx: &egui::Context) {
        log::info!("Grid intent: {:?}", intent);
        match &intent {
            GridIntent::Create { date, time } => {
                self.draft = Some(CreateDraft {
                    date: *date,
                    time: *time,
                    patient: String::new(),
                    duration_minutes: 30,
                });
            }
            GridIntent::Open { id } => self.opened = Some(id.clone()),
            GridIntent::Move { .. } | GridIntent::Resize { .. } => match self.book.apply(&intent) {
                Ok(Some(change)) => self.persist(change, ctx),
                Ok(None) => {}
                Err(err) => {
                    log::warn!("Could not apply {:?}: {:#}", intent, err);
                    self.status_message = Some(format!("Change rejected: {}", err));
                }
            },
        }
    }

    /// Simulated asynchronous write of an optimistic change
    fn persist(&self, change: PendingChange, ctx: &egui::Context) {
        let tx = self.persist_tx.clone();
        let ctx = ctx.clone();
        let fail = self.simulate_failures;

        self.runtime.spawn(async move {
            tokio::time::sleep(PERSIST_LATENCY).await;
            let result = if fail {
                Err(format!("store rejected update to {}", change.id))
            } else {
                Ok(change.after)
            };
            let _ = tx.send(PersistOutcome {
                token: change.token,
                result,
            });
            ctx.request_repaint();
        });
    }

    fn drain_persist_outcomes(&mut self) {
        loop {
            match self.persist_rx.try_recv() {
                Ok(PersistOutcome { token, result }) => match result {
                    Ok(stored) => {
                        self.book.confirm(token, Some(stored));
                    }
                    Err(err) => {
                        log::warn!("Write failed: {}", err);
                        match self.book.revert(token) {
                            Ok(()) => {
                                self.status_message = Some(format!("Write failed, reverted: {}", err))
                            }
                            Err(revert_err) => {
                                log::error!("Failed to revert {:?}: {:#}", token, revert_err)
                            }
                        }
                    }
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::error!("Persistence channel disconnected");
                    break;
                }
            }
        }
    }

    fn show_create_dialog(&mut self, ctx: &egui::Context) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };

        let mut save = false;
        let mut close = false;
        egui::Window::new("New appointment")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "{} at {}",
                    draft.date.format("%A %-d %B"),
                    draft.time.format("%H:%M")
                ));
                ui.horizontal(|ui| {
                    ui.label("Patient:");
                    ui.text_edit_singleline(&mut draft.patient);
                });
                ui.horizontal(|ui| {
                    ui.label("Duration (min):");
                    ui.add(egui::DragValue::new(&mut draft.duration_minutes).range(5..=480));
                });
                ui.horizontal(|ui| {
                    save = ui
                        .add_enabled(!draft.patient.trim().is_empty(), egui::Button::new("Save"))
                        .clicked();
                    close = ui.button("Cancel").clicked();
                });
            });

        if save {
            self.save_draft();
        } else if close {
            self.draft = None;
        }
    }

    fn save_draft(&mut self) {
        let Some(draft) = self.draft.take() else {
            return;
        };

        let start = local_at_minutes(draft.date, time_to_minutes(draft.time));
        let duration = Duration::minutes(draft.duration_minutes.max(self.settings.min_duration_minutes));
        let id = format!("new-{}", self.next_id);
        self.next_id += 1;

        let result = Appointment::new(id, draft.patient.trim(), start, start + duration)
            .map_err(|e| anyhow::anyhow!(e))
            .and_then(|appointment| self.book.insert(appointment));
        match result {
            Ok(()) => self.status_message = Some("Appointment created".to_string()),
            Err(err) => {
                log::warn!("Failed to create appointment: {:#}", err);
                self.status_message = Some(format!("Create failed: {}", err));
            }
        }
    }

    fn show_details_dialog(&mut self, ctx: &egui::Context) {
        let Some(id) = self.opened.clone() else {
            return;
        };
        let Some(appointment) = self.book.get(&id) else {
            self.opened = None;
            return;
        };

        let mut open = true;
        egui::Window::new("Appointment")
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(tooltip_text(appointment, appointment.start, appointment.end));
                if self.book.is_pending(&id) {
                    ui.weak("Saving…");
                }
            });

        if !open {
            self.opened = None;
        }
    }
}
