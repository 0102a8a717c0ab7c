//! Client-side form validation
//!
//! Checked before anything goes on the wire; a failing form yields
//! [`ClientError::Validation`] with the message shown to the user.

use shared::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, Role};

use crate::error::{ClientError, ClientResult};

const MIN_PASSWORD_LEN: usize = 6;

fn invalid<T>(message: &str) -> ClientResult<T> {
    Err(ClientError::Validation(message.to_string()))
}

#[derive(Debug, Clone)]
pub struct LoginForm<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl LoginForm<'_> {
    pub fn validate(&self) -> ClientResult<LoginRequest> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return invalid("Please fill in both fields.");
        }
        Ok(LoginRequest {
            email: email.to_string(),
            password: self.password.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationForm<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: Option<Role>,
}

impl RegistrationForm<'_> {
    pub fn validate(&self) -> ClientResult<RegisterRequest> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() {
            return invalid("Name is required.");
        }
        if email.is_empty() || !email.contains('@') {
            return invalid("Please enter a valid email address.");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return invalid("Password must be at least 6 characters long.");
        }
        let Some(role) = self.role.clone() else {
            return invalid("Please select a role.");
        };

        Ok(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.to_string(),
            role,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ForgotPasswordForm<'a> {
    pub email: &'a str,
}

impl ForgotPasswordForm<'_> {
    pub fn validate(&self) -> ClientResult<ForgotPasswordRequest> {
        let email = self.email.trim();
        if email.is_empty() {
            return invalid("Please enter your email address.");
        }
        Ok(ForgotPasswordRequest {
            email: email.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResetPasswordForm<'a> {
    pub reset_token: &'a str,
    pub new_password: &'a str,
}

impl ResetPasswordForm<'_> {
    pub fn validate(&self) -> ClientResult<ResetPasswordRequest> {
        let reset_token = self.reset_token.trim();
        if reset_token.is_empty() || self.new_password.is_empty() {
            return invalid("All fields are required.");
        }
        Ok(ResetPasswordRequest {
            reset_token: reset_token.to_string(),
            new_password: self.new_password.to_string(),
        })
    }
}
