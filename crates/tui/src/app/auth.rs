use crate::{
    session,
    ui::keymap::AppAction,
};

use super::{App, AppEvent, Screen, ToastLevel};

pub const OTP_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Name,
    Email,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
    pub busy: bool,
}

impl LoginState {
    pub fn new(email: String) -> Self {
        Self {
            mode: AuthMode::Login,
            name: String::new(),
            email,
            password: String::new(),
            focus: LoginField::Email,
            message: None,
            busy: false,
        }
    }

    pub fn fields(&self) -> &'static [LoginField] {
        match self.mode {
            AuthMode::Login => &[LoginField::Email, LoginField::Password],
            AuthMode::Register => &[LoginField::Name, LoginField::Email, LoginField::Password],
        }
    }

    fn move_focus(&mut self, step: isize) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let len = fields.len() as isize;
        self.focus = fields[(idx + step).rem_euclid(len) as usize];
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Name => &mut self.name,
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.focus = self.fields()[0];
        self.message = None;
    }
}

#[derive(Debug, Default)]
pub struct VerifyState {
    pub otp: String,
    pub busy: bool,
    pub sending: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetStep {
    #[default]
    Email,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetField {
    #[default]
    Otp,
    Password,
}

#[derive(Debug, Default)]
pub struct ResetState {
    pub step: ResetStep,
    pub email: String,
    pub otp: String,
    pub new_password: String,
    pub focus: ResetField,
    pub busy: bool,
    pub message: Option<String>,
}

impl ResetState {
    fn field_mut(&mut self) -> &mut String {
        match (self.step, self.focus) {
            (ResetStep::Email, _) => &mut self.email,
            (ResetStep::Code, ResetField::Otp) => &mut self.otp,
            (ResetStep::Code, ResetField::Password) => &mut self.new_password,
        }
    }
}

fn is_complete_otp(otp: &str) -> bool {
    otp.len() == OTP_LEN && otp.chars().all(|c| c.is_ascii_digit())
}

impl App {
    pub(super) fn login_key(&mut self, action: AppAction) {
        let login = &mut self.state.login;
        if login.busy {
            return;
        }
        match action {
            AppAction::NextField | AppAction::Down => login.move_focus(1),
            AppAction::PrevField | AppAction::Up => login.move_focus(-1),
            AppAction::Backspace => {
                login.field_mut().pop();
            }
            AppAction::Input(ch) => login.field_mut().push(ch),
            AppAction::Cancel => login.message = None,
            AppAction::Control('r') => login.toggle_mode(),
            AppAction::Control('f') => {
                self.state.reset = ResetState {
                    email: login.email.trim().to_string(),
                    ..Default::default()
                };
                self.state.screen = Screen::ResetPassword;
            }
            AppAction::Submit => self.submit_login(),
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let login = &mut self.state.login;
        let name = login.name.trim().to_string();
        let email = login.email.trim().to_string();
        let password = login.password.clone();

        let missing_name = login.mode == AuthMode::Register && name.is_empty();
        if missing_name || email.is_empty() || password.is_empty() {
            login.message = Some("Please fill in all fields".to_string());
            return;
        }
        login.message = None;
        login.busy = true;

        let mode = login.mode;
        match mode {
            AuthMode::Login => self.spawn(move |client| async move {
                AppEvent::LoggedIn(session::login(&client, &email, &password).await)
            }),
            AuthMode::Register => self.spawn(move |client| async move {
                AppEvent::Registered(client.register(&name, &email, &password).await)
            }),
        }
    }

    pub(super) fn verify_key(&mut self, action: AppAction) {
        match action {
            AppAction::Input(ch) if ch.is_ascii_digit() => {
                if self.state.verify.otp.len() < OTP_LEN {
                    self.state.verify.otp.push(ch);
                }
            }
            AppAction::Backspace => {
                self.state.verify.otp.pop();
            }
            AppAction::Control('s') => self.send_verify_otp(),
            AppAction::Control('l') => self.logout(),
            AppAction::Submit => self.submit_verify(),
            _ => {}
        }
    }

    fn send_verify_otp(&mut self) {
        if self.state.verify.sending {
            return;
        }
        self.state.verify.sending = true;
        self.spawn(|client| async move { AppEvent::VerifyCodeSent(client.send_verify_otp().await) });
    }

    fn submit_verify(&mut self) {
        let verify = &mut self.state.verify;
        if verify.busy {
            return;
        }
        if !is_complete_otp(&verify.otp) {
            verify.message = Some("Please enter all 6 digits of the OTP".to_string());
            return;
        }
        verify.message = None;
        verify.busy = true;
        let otp = verify.otp.clone();
        self.spawn(move |client| async move {
            AppEvent::Verified(session::verify(&client, &otp).await)
        });
    }

    pub(super) fn reset_key(&mut self, action: AppAction) {
        let reset = &mut self.state.reset;
        if reset.busy {
            return;
        }
        match action {
            AppAction::Cancel => {
                self.state.screen = Screen::Login;
            }
            AppAction::NextField | AppAction::PrevField | AppAction::Up | AppAction::Down => {
                reset.focus = match reset.focus {
                    ResetField::Otp => ResetField::Password,
                    ResetField::Password => ResetField::Otp,
                };
            }
            AppAction::Backspace => {
                reset.field_mut().pop();
            }
            AppAction::Input(ch) => {
                let is_otp = reset.step == ResetStep::Code && reset.focus == ResetField::Otp;
                if !is_otp || (ch.is_ascii_digit() && reset.otp.len() < OTP_LEN) {
                    reset.field_mut().push(ch);
                }
            }
            AppAction::Submit => self.submit_reset(),
            _ => {}
        }
    }

    fn submit_reset(&mut self) {
        let reset = &mut self.state.reset;
        let email = reset.email.trim().to_string();
        let step = reset.step;
        match step {
            ResetStep::Email => {
                if email.is_empty() {
                    reset.message = Some("Please enter your email".to_string());
                    return;
                }
                reset.message = None;
                reset.busy = true;
                self.spawn(move |client| async move {
                    AppEvent::ResetCodeSent(client.send_reset_otp(&email).await)
                });
            }
            ResetStep::Code => {
                if !is_complete_otp(&reset.otp) {
                    reset.message = Some("Please enter all 6 digits of the OTP".to_string());
                    return;
                }
                if reset.new_password.is_empty() {
                    reset.message = Some("Please enter a new password".to_string());
                    return;
                }
                reset.message = None;
                reset.busy = true;
                let otp = reset.otp.clone();
                let new_password = reset.new_password.clone();
                self.spawn(move |client| async move {
                    AppEvent::PasswordReset(
                        client.reset_password(&email, &otp, &new_password).await,
                    )
                });
            }
        }
    }

    pub(super) fn logout(&mut self) {
        self.spawn(|client| async move { AppEvent::LoggedOut(client.logout().await) });
    }

    pub(super) fn on_auth_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoggedIn(result) => {
                self.state.login.busy = false;
                match result {
                    Ok(profile) => {
                        self.state.login.password.clear();
                        self.state.show_toast(ToastLevel::Success, "Login successful");
                        self.enter(profile);
                    }
                    Err(err) => {
                        self.state.login.message =
                            Some(err.user_message("Network error, try again"));
                    }
                }
            }
            AppEvent::Registered(result) => {
                self.state.login.busy = false;
                match result {
                    Ok(profile) => {
                        tracing::info!(email = %profile.email, "account registered");
                        self.state.login.toggle_mode();
                        self.state.login.password.clear();
                        self.state
                            .show_toast(ToastLevel::Success, "Account created successfully");
                    }
                    Err(err) => {
                        self.state.login.message = Some(err.user_message("Authentication failed"));
                    }
                }
            }
            AppEvent::LoggedOut(result) => {
                if let Err(err) = result {
                    tracing::warn!(%err, "logout request failed");
                }
                self.leave_session();
                self.state.show_toast(ToastLevel::Info, "Logged out");
            }
            AppEvent::VerifyCodeSent(result) => {
                self.state.verify.sending = false;
                match result {
                    Ok(()) => self.state.show_toast(
                        ToastLevel::Success,
                        "Verification OTP has been sent successfully",
                    ),
                    Err(err) => self.state.show_toast(
                        ToastLevel::Error,
                        err.user_message("Failed to send verification OTP"),
                    ),
                }
            }
            AppEvent::Verified(result) => {
                self.state.verify.busy = false;
                match result {
                    Ok(profile) => {
                        self.state.verify = VerifyState::default();
                        self.state
                            .show_toast(ToastLevel::Success, "Email verified successfully");
                        self.enter(profile);
                    }
                    Err(err) => self.state.verify.message = Some(err.user_message("Invalid OTP")),
                }
            }
            AppEvent::ResetCodeSent(result) => {
                self.state.reset.busy = false;
                match result {
                    Ok(()) => {
                        self.state.reset.step = ResetStep::Code;
                        self.state.reset.focus = ResetField::Otp;
                        self.state
                            .show_toast(ToastLevel::Success, "Reset OTP sent successfully");
                    }
                    Err(err) => {
                        self.state.reset.message = Some(err.user_message("Failed to send OTP"));
                    }
                }
            }
            AppEvent::PasswordReset(result) => {
                self.state.reset.busy = false;
                match result {
                    Ok(()) => {
                        self.state.login.email = self.state.reset.email.trim().to_string();
                        self.state.reset = ResetState::default();
                        self.state.screen = Screen::Login;
                        self.state
                            .show_toast(ToastLevel::Success, "Password reset successfully");
                    }
                    Err(err) => {
                        self.state.reset.message =
                            Some(err.user_message("Password reset failed"));
                    }
                }
            }
            _ => {}
        }
    }
}
