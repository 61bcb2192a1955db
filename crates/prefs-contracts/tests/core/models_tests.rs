use super::*;

#[test]
fn resolve_should_keep_supplied_values() {
    let input = PreferenceUpdateInputDto {
        font_size: Some("20px".to_string()),
        theme: Some("dark".to_string()),
        base_font: Some("Georgia, serif".to_string()),
    };

    assert_eq!(
        input.resolve(),
        PreferenceDto {
            font_size: "20px".to_string(),
            theme: "dark".to_string(),
            base_font: "Georgia, serif".to_string(),
        }
    );
}

#[test]
fn resolve_should_reset_omitted_fields_to_defaults() {
    let input = PreferenceUpdateInputDto {
        theme: Some("dark".to_string()),
        ..Default::default()
    };

    let resolved = input.resolve();
    assert_eq!(resolved.theme, "dark");
    assert_eq!(resolved.font_size, DEFAULT_FONT_SIZE);
    assert_eq!(resolved.base_font, DEFAULT_BASE_FONT);
}

#[test]
fn resolve_should_treat_empty_values_as_omitted() {
    let input = PreferenceUpdateInputDto {
        font_size: Some(String::new()),
        theme: Some(String::new()),
        base_font: None,
    };

    assert_eq!(input.resolve(), PreferenceDto::default());
}

#[test]
fn resolve_should_store_whitespace_values_verbatim() {
    let input = PreferenceUpdateInputDto {
        theme: Some("   ".to_string()),
        ..Default::default()
    };

    let resolved = input.resolve();
    assert_eq!(resolved.theme, "   ");
    assert_eq!(resolved.font_size, DEFAULT_FONT_SIZE);
}

#[test]
fn resolve_username_should_default_only_when_absent() {
    assert_eq!(resolve_username(None), "demo");
    assert_eq!(resolve_username(Some("")), "");
    assert_eq!(resolve_username(Some("  ")), "  ");
    assert_eq!(resolve_username(Some("alice")), "alice");
}

#[test]
fn update_input_should_deserialize_from_partial_json() {
    let input: PreferenceUpdateInputDto =
        serde_json::from_str(r#"{"theme":"dark","font_size":null}"#).expect("parse input");
    assert_eq!(input.theme.as_deref(), Some("dark"));
    assert!(input.font_size.is_none());
    assert!(input.base_font.is_none());
}
