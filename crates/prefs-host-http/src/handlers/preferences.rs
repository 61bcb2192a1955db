use crate::request_runtime::run_request;
use crate::state::AppState;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, web};
use prefs_app::RequestContext;
use prefs_contracts::models::{PreferenceUpdateInputDto, resolve_username};
use prefs_contracts::{AppError, AppResult, codes};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const REQUEST_ID_HEADER: &str = "x-request-id";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const USER_NOT_FOUND_MESSAGE: &str = "User not found";
const SAVE_FAILED_MESSAGE: &str = "Failed to save preferences";
const LOAD_FAILED_MESSAGE: &str = "Failed to load preferences";
const INVALID_JSON_MESSAGE: &str = "Invalid JSON body";
const INVALID_FORM_MESSAGE: &str = "Invalid form body";
const UNSUPPORTED_FORM_MESSAGE: &str = "Unsupported form encoding";

#[derive(Debug, Deserialize)]
pub struct ViewPrefsQuery {
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SavePrefsForm {
    pub username: Option<String>,
    pub font_size: Option<String>,
    pub theme: Option<String>,
    pub base_font: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SavePrefsApiBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(flatten)]
    prefs: PreferenceUpdateInputDto,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            ok: false,
            error: Some(message.to_string()),
        }
    }
}

fn request_context(req: &HttpRequest, route: &str) -> RequestContext {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    RequestContext::new(request_id, route)
}

fn with_request_id(mut response: HttpResponse, context: &RequestContext) -> HttpResponse {
    if let Ok(value) = HeaderValue::from_str(context.request_id()) {
        response
            .headers_mut()
            .insert(header::HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

fn text_response(status: StatusCode, body: &'static str) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(TEXT_CONTENT_TYPE)
        .body(body)
}

fn json_response(status: StatusCode, body: SaveResponse) -> HttpResponse {
    HttpResponse::build(status).json(body)
}

fn is_not_found(error: &AppError) -> bool {
    error.is_code(codes::USER_NOT_FOUND)
}

/// GET /?username=NAME
pub async fn view_prefs(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ViewPrefsQuery>,
) -> HttpResponse {
    let context = request_context(&req, "view_prefs");
    let username = resolve_username(query.username.as_deref());

    let result: AppResult<String> = run_request(&context, async {
        let prefs = state.preferences.fetch(&context, &username).await?;
        state.views.render_index(&username, &prefs)
    })
    .await;

    let response = match result {
        Ok(html) => HttpResponse::Ok().content_type(HTML_CONTENT_TYPE).body(html),
        Err(error) if is_not_found(&error) => {
            text_response(StatusCode::NOT_FOUND, USER_NOT_FOUND_MESSAGE)
        }
        Err(_) => text_response(StatusCode::INTERNAL_SERVER_ERROR, LOAD_FAILED_MESSAGE),
    };
    with_request_id(response, &context)
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("multipart/"))
}

/// Decodes the save form whatever the declared content type. A missing or
/// empty body is an empty form; a non-empty multipart body is refused.
fn parse_form_body(req: &HttpRequest, body: &[u8]) -> AppResult<SavePrefsForm> {
    if body.is_empty() {
        return Ok(SavePrefsForm::default());
    }
    if is_multipart(req) {
        return Err(AppError::new(
            codes::UNSUPPORTED_FORM_ENCODING,
            UNSUPPORTED_FORM_MESSAGE,
        ));
    }
    serde_urlencoded::from_bytes(body).map_err(|error| {
        AppError::new(codes::INVALID_REQUEST_BODY, INVALID_FORM_MESSAGE)
            .with_cause(error.to_string())
    })
}

/// POST /save_prefs (form encoded). Redirects back to the page on success.
pub async fn save_prefs_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> HttpResponse {
    let context = request_context(&req, "save_prefs_form");

    let result = run_request(&context, async {
        let form = parse_form_body(&req, &body)?;
        let username = resolve_username(form.username.as_deref());
        let input = PreferenceUpdateInputDto {
            font_size: form.font_size,
            theme: form.theme,
            base_font: form.base_font,
        };
        state.preferences.update(&context, &username, &input).await?;
        Ok(username)
    })
    .await;

    let response = match result {
        Ok(username) => HttpResponse::Found()
            .insert_header((
                header::LOCATION,
                format!("/?username={}", urlencoding::encode(&username)),
            ))
            .finish(),
        Err(error) if is_not_found(&error) => {
            text_response(StatusCode::NOT_FOUND, USER_NOT_FOUND_MESSAGE)
        }
        Err(error) if error.is_code(codes::UNSUPPORTED_FORM_ENCODING) => text_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UNSUPPORTED_FORM_MESSAGE,
        ),
        Err(error) if error.is_code(codes::INVALID_REQUEST_BODY) => {
            text_response(StatusCode::BAD_REQUEST, INVALID_FORM_MESSAGE)
        }
        Err(_) => text_response(StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED_MESSAGE),
    };
    with_request_id(response, &context)
}

fn invalid_json(error: serde_json::Error) -> AppError {
    AppError::new(codes::INVALID_REQUEST_BODY, INVALID_JSON_MESSAGE).with_cause(error.to_string())
}

// null, false, 0, "", [] and {} all count as "no fields supplied"
fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn parse_api_body(body: &[u8]) -> AppResult<SavePrefsApiBody> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SavePrefsApiBody::default());
    }
    let value: Value = serde_json::from_slice(body).map_err(invalid_json)?;
    if is_empty_json(&value) {
        return Ok(SavePrefsApiBody::default());
    }
    serde_json::from_value(value).map_err(invalid_json)
}

/// POST /api/save_prefs (JSON). Same semantics as the form route with JSON
/// status bodies instead of a redirect.
pub async fn save_prefs_api(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> HttpResponse {
    let context = request_context(&req, "save_prefs_api");

    let result = run_request(&context, async {
        let payload = parse_api_body(&body)?;
        let username = resolve_username(payload.username.as_deref());
        state
            .preferences
            .update(&context, &username, &payload.prefs)
            .await
    })
    .await;

    let response = match result {
        Ok(_) => json_response(StatusCode::OK, SaveResponse::success()),
        Err(error) if is_not_found(&error) => json_response(
            StatusCode::NOT_FOUND,
            SaveResponse::failure(USER_NOT_FOUND_MESSAGE),
        ),
        Err(error) if error.is_code(codes::INVALID_REQUEST_BODY) => json_response(
            StatusCode::BAD_REQUEST,
            SaveResponse::failure(INVALID_JSON_MESSAGE),
        ),
        Err(_) => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            SaveResponse::failure(SAVE_FAILED_MESSAGE),
        ),
    };
    with_request_id(response, &context)
}

#[cfg(test)]
#[path = "../../tests/handlers/preferences_tests.rs"]
mod tests;
