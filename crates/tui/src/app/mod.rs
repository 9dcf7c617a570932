use std::{
    future::Future,
    time::{Duration, Instant},
};

use api_types::{auth::Profile, shipment::Shipment};
use chrono::Local;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    session::{self, Route, Session},
    shipments::{
        Applied, Completed, FilterError, FilterField, FilterState, FormPhase, ListController,
        LoadRequest, LoadedPage, Mutation, MutationGateway, MutationJob, ShipmentForm, loader,
    },
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

mod auth;

pub use auth::{
    AuthMode, LoginField, LoginState, OTP_LEN, ResetField, ResetState, ResetStep, VerifyState,
};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    VerifyEmail,
    ResetPassword,
    Shipments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

/// Draft copy of the filters while the filter panel is open. Nothing is
/// sent until the draft is applied.
#[derive(Debug, Clone)]
pub struct FilterEditor {
    pub draft: FilterState,
    pub focus: usize,
    pub error: Option<String>,
}

impl FilterEditor {
    fn new(current: &FilterState) -> Self {
        Self {
            draft: current.clone(),
            focus: 0,
            error: None,
        }
    }

    pub fn focused(&self) -> FilterField {
        FilterField::ALL[self.focus % FilterField::ALL.len()]
    }

    fn move_focus(&mut self, forward: bool) {
        let len = FilterField::ALL.len();
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
    }

    fn input(&mut self, ch: char) {
        let field = self.focused();
        if field.is_selector() {
            if ch == ' ' {
                self.draft.cycle(field);
            }
        } else {
            let mut value = self.draft.get(field).to_string();
            value.push(ch);
            self.draft.set(field, value);
        }
        self.error = None;
    }

    fn backspace(&mut self) {
        let field = self.focused();
        if field.is_selector() {
            self.draft.set(field, "");
        } else {
            let mut value = self.draft.get(field).to_string();
            value.pop();
            self.draft.set(field, value);
        }
        self.error = None;
    }
}

#[derive(Debug)]
pub enum Overlay {
    None,
    Form(ShipmentForm),
    Filters(FilterEditor),
    ConfirmDelete { title: String },
}

/// Results of background work, delivered back to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    SessionRestored(std::result::Result<Option<Profile>, ClientError>),
    LoggedIn(std::result::Result<Profile, ClientError>),
    Registered(std::result::Result<Profile, ClientError>),
    LoggedOut(std::result::Result<(), ClientError>),
    VerifyCodeSent(std::result::Result<(), ClientError>),
    Verified(std::result::Result<Profile, ClientError>),
    ResetCodeSent(std::result::Result<(), ClientError>),
    PasswordReset(std::result::Result<(), ClientError>),
    Loaded {
        generation: u64,
        outcome: std::result::Result<LoadedPage, ClientError>,
    },
    Mutated {
        /// Session the write was started in.
        epoch: u64,
        kind: Mutation,
        outcome: std::result::Result<Mutation, ClientError>,
    },
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    /// True until the stored session has been checked.
    pub restoring: bool,
    pub login: LoginState,
    pub verify: VerifyState,
    pub reset: ResetState,
    pub session: Session,
    pub list: ListController,
    pub gateway: MutationGateway,
    pub overlay: Overlay,
    pub toast: Option<ToastState>,
    pub base_url: String,
}

impl AppState {
    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.expires_at <= now) {
            self.toast = None;
        }
    }
}

pub struct App {
    client: Client,
    /// Bumped on every sign-out.
    session_epoch: u64,
    pub state: AppState,
    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let state = AppState {
            screen: Screen::Login,
            restoring: true,
            login: LoginState::new(config.email.clone()),
            verify: VerifyState::default(),
            reset: ResetState::default(),
            session: Session::default(),
            list: ListController::new(config.page_size, config.stats_page_size),
            gateway: MutationGateway::default(),
            overlay: Overlay::None,
            toast: None,
            base_url: config.base_url.clone(),
        };

        Ok(Self {
            client,
            session_epoch: 0,
            state,
            tx,
            rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.restore_session();
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        ui::restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    _ => {}
                }
            }

            while let Ok(event) = self.rx.try_recv() {
                self.handle_event(event);
            }
            self.state.expire_toast(Instant::now());
        }

        Ok(())
    }

    /// Runs `task` in the background and feeds its result back as an event.
    fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = AppEvent> + Send + 'static,
    {
        let work = task(self.client.clone());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if tx.send(work.await).is_err() {
                tracing::debug!("event loop gone, dropping result");
            }
        });
    }

    fn spawn_load(&self, request: LoadRequest) {
        self.spawn(move |client| async move {
            let outcome = loader::fetch(&client, &request).await;
            AppEvent::Loaded {
                generation: request.generation,
                outcome,
            }
        });
    }

    fn spawn_mutation(&self, job: MutationJob) {
        let kind = job.kind();
        let epoch = self.session_epoch;
        self.spawn(move |client| async move {
            AppEvent::Mutated {
                epoch,
                kind,
                outcome: job.run(&client).await,
            }
        });
    }

    fn restore_session(&self) {
        self.spawn(|client| async move { AppEvent::SessionRestored(session::restore(&client).await) });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if self.state.restoring {
            return;
        }

        match self.state.screen {
            Screen::Login => self.login_key(action),
            Screen::VerifyEmail => self.verify_key(action),
            Screen::ResetPassword => self.reset_key(action),
            Screen::Shipments => self.shipments_key(action),
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SessionRestored(result) => {
                self.state.restoring = false;
                match result {
                    Ok(Some(profile)) => self.enter(profile),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(%err, "could not restore session");
                        self.state.show_toast(
                            ToastLevel::Error,
                            err.user_message("Could not reach the server"),
                        );
                    }
                }
            }
            AppEvent::Loaded {
                generation,
                outcome,
            } => match self.state.list.apply(generation, outcome) {
                Applied::Loaded | Applied::Stale => {}
                Applied::Retarget(request) => self.spawn_load(request),
                Applied::Failed(err) => self.load_failed(err),
            },
            AppEvent::Mutated {
                epoch,
                kind,
                outcome,
            } => {
                if epoch == self.session_epoch {
                    self.mutation_done(kind, outcome);
                } else {
                    tracing::debug!(?kind, "dropping write result from an ended session");
                }
            }
            auth => self.on_auth_event(auth),
        }
    }

    /// Signs in and moves to whatever screen the profile allows.
    fn enter(&mut self, profile: Profile) {
        self.state.session.sign_in(profile);
        self.route();
    }

    fn route(&mut self) {
        self.state.screen = match self.state.session.route() {
            Route::Login => Screen::Login,
            Route::VerifyEmail => Screen::VerifyEmail,
            Route::Shipments => Screen::Shipments,
        };
        if self.state.screen == Screen::Shipments {
            let request = self.state.list.load_page(0, None);
            self.spawn_load(request);
        }
    }

    fn leave_session(&mut self) {
        self.state.session.sign_out();
        self.session_epoch += 1;
        self.state.list.reset();
        self.state.gateway = MutationGateway::default();
        self.state.overlay = Overlay::None;
        self.state.verify = VerifyState::default();
        self.route();
    }

    fn session_expired(&mut self, err: &ClientError) {
        tracing::info!("session rejected by server");
        self.leave_session();
        self.state.login.message = Some(err.to_string());
        self.state
            .show_toast(ToastLevel::Error, "Session expired, please log in again");
    }

    fn load_failed(&mut self, err: ClientError) {
        if matches!(err, ClientError::Unauthorized) {
            self.session_expired(&err);
            return;
        }
        tracing::warn!(%err, "failed to load shipments");
        self.state
            .show_toast(ToastLevel::Error, err.user_message("Failed to load shipments"));
    }

    fn mutation_done(&mut self, kind: Mutation, outcome: std::result::Result<Mutation, ClientError>) {
        match self
            .state
            .gateway
            .complete(kind, outcome, &mut self.state.list)
        {
            Completed::Refresh { message, request } => {
                if let (Overlay::Form(form), Mutation::Created | Mutation::Updated) =
                    (&mut self.state.overlay, kind)
                    && form.phase() == FormPhase::Submitting
                {
                    form.submit_succeeded();
                    self.state.overlay = Overlay::None;
                }
                self.state.show_toast(ToastLevel::Success, message);
                self.spawn_load(request);
            }
            Completed::Failed {
                kind,
                message,
                error,
            } => {
                if matches!(error, ClientError::Unauthorized) {
                    self.session_expired(&error);
                    return;
                }
                if let (Overlay::Form(form), Mutation::Created | Mutation::Updated) =
                    (&mut self.state.overlay, kind)
                {
                    form.submit_failed(message.clone());
                }
                self.state.show_toast(ToastLevel::Error, message);
            }
        }
    }

    fn shipments_key(&mut self, action: AppAction) {
        match self.state.overlay {
            Overlay::Form(_) => self.form_key(action),
            Overlay::Filters(_) => self.filters_key(action),
            Overlay::ConfirmDelete { .. } => self.confirm_key(action),
            Overlay::None => self.list_key(action),
        }
    }

    fn list_key(&mut self, action: AppAction) {
        match action {
            AppAction::Up => self.state.list.select_prev(),
            AppAction::Down => self.state.list.select_next(),
            AppAction::Left => self.step_page(-1),
            AppAction::Right => self.step_page(1),
            AppAction::Submit => self.open_edit(),
            AppAction::Input(ch) => match ch {
                'q' => self.should_quit = true,
                'k' => self.state.list.select_prev(),
                'j' => self.state.list.select_next(),
                'h' | '[' => self.step_page(-1),
                'l' | ']' => self.step_page(1),
                'n' | 'a' => {
                    let today = Local::now().date_naive();
                    self.state.overlay = Overlay::Form(ShipmentForm::new(today));
                }
                'e' => self.open_edit(),
                'd' => self.ask_delete(),
                '/' => {
                    let editor = FilterEditor::new(self.state.list.filters());
                    self.state.overlay = Overlay::Filters(editor);
                }
                't' => {
                    let result = self.state.list.cycle_filter(FilterField::ShipmentType);
                    self.filter_applied(result);
                }
                's' => {
                    let result = self.state.list.cycle_filter(FilterField::IsDelivered);
                    self.filter_applied(result);
                }
                'c' => {
                    let request = self.state.list.clear_filters();
                    self.spawn_load(request);
                }
                'r' => {
                    let request = self.state.list.reload();
                    self.spawn_load(request);
                }
                'L' => self.logout(),
                _ => {}
            },
            _ => {}
        }
    }

    fn step_page(&mut self, delta: i64) {
        let target = i64::from(self.state.list.page().current_page) + delta;
        if let Some(request) = self.state.list.change_page(target) {
            self.spawn_load(request);
        }
    }

    fn filter_applied(&mut self, result: std::result::Result<LoadRequest, FilterError>) {
        match result {
            Ok(request) => self.spawn_load(request),
            Err(err) => self.state.show_toast(ToastLevel::Error, err.to_string()),
        }
    }

    fn selected(&self) -> Option<&Shipment> {
        self.state.list.selected_shipment()
    }

    fn open_edit(&mut self) {
        if let Some(form) = self.selected().map(ShipmentForm::edit) {
            self.state.overlay = Overlay::Form(form);
        }
    }

    fn ask_delete(&mut self) {
        let Some((id, title)) = self
            .selected()
            .map(|s| (s.id, s.shipment_title.clone()))
        else {
            return;
        };
        self.state.gateway.request_delete(id);
        self.state.overlay = Overlay::ConfirmDelete { title };
    }

    fn form_key(&mut self, action: AppAction) {
        let Overlay::Form(form) = &mut self.state.overlay else {
            return;
        };
        match action {
            AppAction::Cancel => {
                if form.phase() != FormPhase::Submitting {
                    self.state.overlay = Overlay::None;
                }
            }
            AppAction::NextField | AppAction::Down => form.next_field(),
            AppAction::PrevField | AppAction::Up => form.prev_field(),
            AppAction::Left | AppAction::Right => form.toggle(),
            AppAction::Backspace => form.backspace(),
            AppAction::Input(ch) => form.input(ch),
            AppAction::Submit => self.submit_form(),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Overlay::Form(form) = &mut self.state.overlay else {
            return;
        };
        let Some(payload) = form.submit() else {
            return;
        };
        let job = match form.editing_id {
            Some(id) => self.state.gateway.update(id, payload),
            None => self.state.gateway.create(payload),
        };
        match job {
            Some(job) => self.spawn_mutation(job),
            None => form.submit_failed("Another change is still being saved".to_string()),
        }
    }

    fn filters_key(&mut self, action: AppAction) {
        let Overlay::Filters(editor) = &mut self.state.overlay else {
            return;
        };
        match action {
            AppAction::Cancel => self.state.overlay = Overlay::None,
            AppAction::NextField | AppAction::Down => editor.move_focus(true),
            AppAction::PrevField | AppAction::Up => editor.move_focus(false),
            AppAction::Left | AppAction::Right => {
                let field = editor.focused();
                if field.is_selector() {
                    editor.draft.cycle(field);
                }
            }
            AppAction::Backspace => editor.backspace(),
            AppAction::Input(ch) => editor.input(ch),
            AppAction::Control('u') => {
                let field = editor.focused();
                editor.draft.set(field, "");
            }
            AppAction::Submit => {
                let draft = editor.draft.clone();
                match self.state.list.replace_filters(draft) {
                    Ok(request) => {
                        self.state.overlay = Overlay::None;
                        self.spawn_load(request);
                    }
                    Err(err) => {
                        if let Overlay::Filters(editor) = &mut self.state.overlay {
                            editor.error = Some(err.to_string());
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn confirm_key(&mut self, action: AppAction) {
        match action {
            AppAction::Input('y' | 'Y') | AppAction::Submit => {
                match self.state.gateway.confirm_delete() {
                    Some(job) => {
                        self.state.overlay = Overlay::None;
                        self.spawn_mutation(job);
                    }
                    None => self
                        .state
                        .show_toast(ToastLevel::Info, "Another change is still being saved"),
                }
            }
            AppAction::Input('n' | 'N') | AppAction::Cancel => {
                self.state.gateway.cancel_delete();
                self.state.overlay = Overlay::None;
            }
            _ => {}
        }
    }
}
