use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

/// Stable error codes shared by the storage, service and HTTP layers.
pub mod codes {
    pub const INTERNAL: &str = "internal_error";
    pub const USER_NOT_FOUND: &str = "user_not_found";
    pub const PREFERENCES_SAVE_FAILED: &str = "preferences_save_failed";
    pub const DB_ERROR: &str = "db_error";
    pub const DB_OPEN_FAILED: &str = "db_open_failed";
    pub const CONFIG_INVALID: &str = "config_invalid";
    pub const LOG_DIR_CREATE_FAILED: &str = "log_dir_create_failed";
    pub const LOG_APPENDER_CREATE_FAILED: &str = "log_appender_create_failed";
    pub const LOG_SUBSCRIBER_INIT_FAILED: &str = "log_subscriber_init_failed";
    pub const LOG_CLEANUP_FAILED: &str = "log_cleanup_failed";
    pub const TEMPLATE_RENDER_FAILED: &str = "template_render_failed";
    pub const INVALID_REQUEST_BODY: &str = "invalid_request_body";
    pub const UNSUPPORTED_FORM_ENCODING: &str = "unsupported_form_encoding";
    pub const HTTP_BIND_FAILED: &str = "http_bind_failed";
    pub const HTTP_SERVER_FAILED: &str = "http_server_failed";
}

#[derive(Debug, Clone)]
struct ErrorDetail {
    code: &'static str,
    message: String,
    context: Vec<(&'static str, String)>,
    causes: Vec<String>,
    request_id: Option<String>,
}

/// A failed operation of the preferences service.
///
/// `code` is one of [`codes`] and decides how the HTTP layer answers.
/// `message` is safe to show to a client. Context pairs and the cause chain
/// only go to the logs.
#[derive(Debug, Clone)]
pub struct AppError(Box<ErrorDetail>);

impl AppError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self(Box::new(ErrorDetail {
            code,
            message: message.into(),
            context: Vec::new(),
            causes: Vec::new(),
            request_id: None,
        }))
    }

    pub fn user_not_found(username: &str) -> Self {
        Self::new(codes::USER_NOT_FOUND, "User not found").with_context("username", username)
    }

    pub fn code(&self) -> &'static str {
        self.0.code
    }

    pub fn message(&self) -> &str {
        &self.0.message
    }

    pub fn is_code(&self, code: &str) -> bool {
        self.0.code == code
    }

    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.0
            .context
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn causes(&self) -> &[String] {
        &self.0.causes
    }

    pub fn request_id(&self) -> Option<&str> {
        self.0.request_id.as_deref()
    }

    /// Re-labels the failure, keeping context and causes.
    pub fn with_code(mut self, code: &'static str, message: impl Into<String>) -> Self {
        self.0.code = code;
        self.0.message = message.into();
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.0.context.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => slot.1 = value,
            None => self.0.context.push((key, value)),
        }
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        push_cause(&mut self.0.causes, cause.into());
        self
    }

    /// Records `error` and everything it was caused by.
    pub fn with_source<E>(mut self, error: E) -> Self
    where
        E: StdError + 'static,
    {
        let root: &(dyn StdError + 'static) = &error;
        for cause in std::iter::successors(Some(root), |&current| current.source()) {
            push_cause(&mut self.0.causes, cause.to_string());
        }
        self
    }

    pub fn with_request_id(mut self, request_id: &str) -> Self {
        if !request_id.trim().is_empty() {
            self.0.request_id = Some(request_id.to_string());
        }
        self
    }
}

// blank links and immediate repeats are dropped
fn push_cause(causes: &mut Vec<String>, cause: String) {
    if cause.trim().is_empty() || causes.last() == Some(&cause) {
        return;
    }
    causes.push(cause);
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.0.code, self.0.message)?;
        if let Some(cause) = self.0.causes.first() {
            write!(f, " ({cause})")?;
        }
        Ok(())
    }
}

impl StdError for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<AppError>() {
            Ok(app_error) => app_error,
            Err(other) => {
                let mut app_error = AppError::new(codes::INTERNAL, "Internal server error");
                for cause in other.chain() {
                    push_cause(&mut app_error.0.causes, cause.to_string());
                }
                app_error
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Turns a foreign failure into an [`AppError`] with the given code.
pub trait ResultExt<T> {
    fn with_code(self, code: &'static str, message: impl Into<String>) -> AppResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn with_code(self, code: &'static str, message: impl Into<String>) -> AppResult<T> {
        self.map_err(|error| {
            let error: anyhow::Error = error.into();
            AppError::from(error).with_code(code, message)
        })
    }
}

/// Attaches a log-only key/value to an error already in the service's shape.
pub trait ErrorContextExt<T> {
    fn with_ctx(self, key: &'static str, value: impl Into<String>) -> AppResult<T>;
}

impl<T> ErrorContextExt<T> for AppResult<T> {
    fn with_ctx(self, key: &'static str, value: impl Into<String>) -> AppResult<T> {
        self.map_err(|error| error.with_context(key, value))
    }
}

#[cfg(test)]
#[path = "../tests/core/errors_tests.rs"]
mod tests;
