//! QR code renderers backed by the `qrcode` crate.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::render::{svg, unicode};
use qrcode::{EcLevel, QrCode};

use qr_core::services::client::{QrFormat, QrRenderer, RenderError, RenderedQr};

fn encode(payload: &str, ec_level: EcLevel) -> Result<QrCode, RenderError> {
    if payload.is_empty() {
        return Err(RenderError {
            message: "empty payload".to_string(),
        });
    }

    QrCode::with_error_correction_level(payload.as_bytes(), ec_level).map_err(|e| RenderError {
        message: e.to_string(),
    })
}

/// Renders token values as SVG documents for a projector or browser
#[derive(Debug, Clone)]
pub struct SvgQrRenderer {
    size: u32,
    dark: String,
    light: String,
    ec_level: EcLevel,
}

impl Default for SvgQrRenderer {
    fn default() -> Self {
        Self {
            size: 256,
            dark: "#000000".to_string(),
            light: "#ffffff".to_string(),
            ec_level: EcLevel::M,
        }
    }
}

impl SvgQrRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum width and height of the image in pixels
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.max(21);
        self
    }

    pub fn with_colors(mut self, dark: impl Into<String>, light: impl Into<String>) -> Self {
        self.dark = dark.into();
        self.light = light.into();
        self
    }

    pub fn with_error_correction(mut self, ec_level: EcLevel) -> Self {
        self.ec_level = ec_level;
        self
    }

    /// Render a payload straight to a `data:` URL usable as an image source
    pub fn data_url(&self, payload: &str) -> Result<String, RenderError> {
        let rendered = self.render(payload)?;
        Ok(Self::to_data_url(&rendered.body))
    }

    /// Wrap an SVG document in a base64 `data:` URL
    pub fn to_data_url(svg: &str) -> String {
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
    }
}

impl QrRenderer for SvgQrRenderer {
    fn render(&self, payload: &str) -> Result<RenderedQr, RenderError> {
        let code = encode(payload, self.ec_level)?;
        let body = code
            .render::<svg::Color>()
            .min_dimensions(self.size, self.size)
            .dark_color(svg::Color(&self.dark))
            .light_color(svg::Color(&self.light))
            .build();

        Ok(RenderedQr {
            payload: payload.to_string(),
            format: QrFormat::Svg,
            body,
        })
    }
}

/// Renders token values as Unicode half-block text for terminals
#[derive(Debug, Clone)]
pub struct TerminalQrRenderer {
    /// Swap colours for light-on-dark terminals
    inverted: bool,
    quiet_zone: bool,
}

impl Default for TerminalQrRenderer {
    fn default() -> Self {
        Self {
            inverted: true,
            quiet_zone: true,
        }
    }
}

impl TerminalQrRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn with_quiet_zone(mut self, quiet_zone: bool) -> Self {
        self.quiet_zone = quiet_zone;
        self
    }
}

impl QrRenderer for TerminalQrRenderer {
    fn render(&self, payload: &str) -> Result<RenderedQr, RenderError> {
        let code = encode(payload, EcLevel::L)?;
        let (dark, light) = if self.inverted {
            (unicode::Dense1x2::Light, unicode::Dense1x2::Dark)
        } else {
            (unicode::Dense1x2::Dark, unicode::Dense1x2::Light)
        };

        let body = code
            .render::<unicode::Dense1x2>()
            .dark_color(dark)
            .light_color(light)
            .quiet_zone(self.quiet_zone)
            .build();

        Ok(RenderedQr {
            payload: payload.to_string(),
            format: QrFormat::Text,
            body,
        })
    }
}
