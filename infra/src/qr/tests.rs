use base64::{engine::general_purpose::STANDARD, Engine as _};

use qr_core::services::client::{QrFormat, QrRenderer};

use super::{SvgQrRenderer, TerminalQrRenderer};

#[test]
fn test_svg_render() {
    let rendered = SvgQrRenderer::new().render("ABC123").unwrap();

    assert_eq!(rendered.payload, "ABC123");
    assert_eq!(rendered.format, QrFormat::Svg);
    assert!(rendered.body.contains("<svg"));
    assert!(rendered.body.contains("#000000"));
}

#[test]
fn test_svg_colors_are_configurable() {
    let rendered = SvgQrRenderer::new()
        .with_colors("#112233", "#fafafa")
        .render("ABC123")
        .unwrap();

    assert!(rendered.body.contains("#112233"));
    assert!(rendered.body.contains("#fafafa"));
}

#[test]
fn test_data_url_wraps_svg() {
    let renderer = SvgQrRenderer::new().with_size(128);
    let url = renderer.data_url("K7Q2M9X4P1R8T5W3Z6N0").unwrap();

    let encoded = url.strip_prefix("data:image/svg+xml;base64,").unwrap();
    let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
    assert!(decoded.contains("<svg"));
}

#[test]
fn test_different_payloads_render_differently() {
    let renderer = SvgQrRenderer::new();
    let first = renderer.render("ABC123").unwrap();
    let second = renderer.render("DEF456").unwrap();

    assert_ne!(first.body, second.body);
}

#[test]
fn test_terminal_render_uses_half_blocks() {
    let rendered = TerminalQrRenderer::new().render("ABC123").unwrap();

    assert_eq!(rendered.format, QrFormat::Text);
    assert!(rendered.body.lines().count() > 10);
    assert!(rendered.body.chars().any(|c| matches!(c, '█' | '▀' | '▄')));
}

#[test]
fn test_empty_payload_is_rejected() {
    assert!(SvgQrRenderer::new().render("").is_err());
    assert!(TerminalQrRenderer::new().render("").is_err());
}

#[test]
fn test_oversized_payload_is_rejected() {
    let payload = "X".repeat(8000);
    let error = SvgQrRenderer::new().render(&payload).unwrap_err();
    assert!(!error.message.is_empty());
}
