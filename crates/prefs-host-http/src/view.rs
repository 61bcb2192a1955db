//! HTML rendering for the preferences page.

use handlebars::Handlebars;
use prefs_contracts::models::PreferenceDto;
use prefs_contracts::{AppError, AppResult, codes};
use serde_json::json;

const INDEX_TEMPLATE_NAME: &str = "index";

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en" data-theme="{{theme}}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Accessibility preferences for {{username}}</title>
  <style>
    body { font-size: {{font_size}}; font-family: {{base_font}}; margin: 2rem; }
    html[data-theme="dark"] body { background: #121212; color: #f5f5f5; }
    html[data-theme="light"] body { background: #ffffff; color: #1a1a1a; }
    label { display: block; margin-top: 1rem; }
  </style>
</head>
<body>
  <main>
    <h1>Display preferences</h1>
    <p>Signed in as <strong>{{username}}</strong></p>
    <dl>
      <dt>Font size</dt><dd id="font-size">{{font_size}}</dd>
      <dt>Theme</dt><dd id="theme">{{theme}}</dd>
      <dt>Base font</dt><dd id="base-font">{{base_font}}</dd>
    </dl>
    <form method="post" action="/save_prefs">
      <input type="hidden" name="username" value="{{username}}">
      <label for="font_size">Font size</label>
      <input id="font_size" name="font_size" value="{{font_size}}">
      <label for="theme">Theme</label>
      <select id="theme" name="theme">
        <option value="light"{{#if (eq theme "light")}} selected{{/if}}>Light</option>
        <option value="dark"{{#if (eq theme "dark")}} selected{{/if}}>Dark</option>
      </select>
      <label for="base_font">Base font</label>
      <input id="base_font" name="base_font" value="{{base_font}}">
      <button type="submit">Save</button>
    </form>
  </main>
</body>
</html>
"#;

/// Compiled page templates. Built once at startup and shared by all workers.
#[derive(Debug)]
pub struct ViewRenderer {
    registry: Handlebars<'static>,
}

impl ViewRenderer {
    pub fn new() -> AppResult<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)
            .map_err(|error| {
                AppError::new(codes::TEMPLATE_RENDER_FAILED, "Failed to compile page template")
                    .with_cause(error.to_string())
                    .with_context("template", INDEX_TEMPLATE_NAME)
            })?;
        Ok(Self { registry })
    }

    pub fn render_index(&self, username: &str, prefs: &PreferenceDto) -> AppResult<String> {
        let data = json!({
            "username": username,
            "font_size": prefs.font_size,
            "theme": prefs.theme,
            "base_font": prefs.base_font,
        });

        self.registry
            .render(INDEX_TEMPLATE_NAME, &data)
            .map_err(|error| {
                AppError::new(codes::TEMPLATE_RENDER_FAILED, "Failed to render page")
                    .with_cause(error.to_string())
                    .with_context("template", INDEX_TEMPLATE_NAME)
            })
    }
}
