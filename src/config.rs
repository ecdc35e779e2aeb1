use chrono::{DateTime, Local};

use crate::model::Color;

/// Page geometry in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width: 210.0,
        height: 297.0,
        margin_top: 20.0,
        margin_bottom: 25.0,
        margin_left: 15.0,
        margin_right: 15.0,
    };

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest y a block may reach before a page break is due.
    pub fn usable_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

pub struct RenderOptions {
    pub geometry: PageGeometry,
    /// Label used in the banner title, footer and output filename.
    pub report_label: String,
    pub brand: String,
    pub currency_symbol: String,
    pub confidentiality_notice: String,
    pub validity_days: i64,
    /// Font family to embed from the system font directories. Falls back to
    /// Helvetica (WinAnsi only) when `None` or not found.
    pub font_family: Option<String>,
    /// Fixed generation time; `None` means "now". Set it for reproducible output.
    pub generated_at: Option<DateTime<Local>>,
    pub brand_color: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::A4,
            report_label: "Credit Report".to_string(),
            brand: "CreditView".to_string(),
            currency_symbol: "\u{20A6}".to_string(),
            confidentiality_notice: "Confidential: for the named subject and authorised users only"
                .to_string(),
            validity_days: 30,
            font_family: None,
            generated_at: None,
            brand_color: Color::BRAND,
        }
    }
}

impl RenderOptions {
    pub(crate) fn generation_time(&self) -> DateTime<Local> {
        self.generated_at.unwrap_or_else(Local::now)
    }
}
