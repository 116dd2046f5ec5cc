//! Hook that appends a generated bar chart to the assistant message

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use prism_config::ChartHookConfig;
use rand::Rng;

use super::ResponseHook;
use crate::error::LlmError;
use crate::types::{ChatCompletionResponse, ContentPart, MessageContent};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const Y_TICKS: u32 = 5;
const PALETTE: [&str; 4] = ["#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A"];

/// Appends a bar chart of sample data as an `image_url` content part
///
/// Values are drawn uniformly from `50..=100`, one per category. String
/// content becomes `[text, image]`; array content gets the image appended.
#[derive(Debug, Clone)]
pub struct ChartHook {
    title: String,
    categories: Vec<String>,
}

impl Default for ChartHook {
    fn default() -> Self {
        Self::from_config(&ChartHookConfig::default())
    }
}

impl ChartHook {
    pub fn new(title: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            title: title.into(),
            categories,
        }
    }

    pub fn from_config(config: &ChartHookConfig) -> Self {
        Self::new(config.title.clone(), config.categories.clone())
    }

    fn sample_values(&self) -> Vec<u32> {
        let mut rng = rand::rng();
        self.categories.iter().map(|_| rng.random_range(50..=100)).collect()
    }

    /// Render a bar chart for `values` as an SVG document
    ///
    /// Values pair with categories by position; extra values are ignored.
    #[allow(clippy::cast_precision_loss)]
    pub fn render_svg(&self, values: &[u32]) -> String {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let baseline = MARGIN_TOP + plot_height;

        let max_value = values.iter().copied().max().unwrap_or(0).max(1);
        let y_max = f64::from(max_value) * 1.2;
        let scale = |value: f64| plot_height * value / y_max;

        let mut elements = vec![
            format!(r##"<rect width="{WIDTH}" height="{HEIGHT}" fill="#FFFFFF"/>"##),
            format!(
                r#"<text x="{x}" y="{y}" font-size="20" font-weight="bold" text-anchor="middle">{title}</text>"#,
                x = WIDTH / 2.0,
                y = MARGIN_TOP / 2.0,
                title = escape(&self.title),
            ),
        ];

        for tick in 0..=Y_TICKS {
            let value = y_max * f64::from(tick) / f64::from(Y_TICKS);
            let y = baseline - scale(value);
            elements.push(format!(
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="#E0E0E0"/>"##,
                x2 = WIDTH - MARGIN_RIGHT,
            ));
            elements.push(format!(
                r#"<text x="{x}" y="{y:.1}" font-size="12" text-anchor="end" dominant-baseline="middle">{value:.0}</text>"#,
                x = MARGIN_LEFT - 8.0,
            ));
        }

        let slot = plot_width / self.categories.len().max(1) as f64;
        let bar_width = slot * 0.8;

        for (i, (category, value)) in self.categories.iter().zip(values).enumerate() {
            let height = scale(f64::from(*value));
            let x = (i as f64).mul_add(slot, MARGIN_LEFT) + (slot - bar_width) / 2.0;
            let y = baseline - height;
            let center = x + bar_width / 2.0;

            elements.push(format!(
                r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{color}"/>"#,
                color = PALETTE[i % PALETTE.len()],
            ));
            elements.push(format!(
                r#"<text x="{center:.1}" y="{label_y:.1}" font-size="13" text-anchor="middle">{value}</text>"#,
                label_y = y - 6.0,
            ));
            elements.push(format!(
                r#"<text x="{center:.1}" y="{label_y:.1}" font-size="13" text-anchor="middle">{category}</text>"#,
                label_y = baseline + 20.0,
                category = escape(category),
            ));
        }

        elements.push(format!(
            r##"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{baseline}" stroke="#333333"/>"##
        ));
        elements.push(format!(
            r##"<line x1="{MARGIN_LEFT}" y1="{baseline}" x2="{x2}" y2="{baseline}" stroke="#333333"/>"##,
            x2 = WIDTH - MARGIN_RIGHT,
        ));
        elements.push(format!(
            r#"<text x="{x}" y="{y}" font-size="15" text-anchor="middle">Quarter</text>"#,
            x = MARGIN_LEFT + plot_width / 2.0,
            y = HEIGHT - 20.0,
        ));
        elements.push(format!(
            r#"<text x="20" y="{y}" font-size="15" text-anchor="middle" transform="rotate(-90 20 {y})">Sales (thousands)</text>"#,
            y = MARGIN_TOP + plot_height / 2.0,
        ));

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">{}</svg>"#,
            elements.concat()
        )
    }
}

/// Wrap an SVG document in a base64 `data:` URL
pub fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl ResponseHook for ChartHook {
    fn name(&self) -> &str {
        "chart"
    }

    fn apply(&self, mut response: ChatCompletionResponse) -> Result<ChatCompletionResponse, LlmError> {
        let Some(message) = response.first_message_mut() else {
            return Ok(response);
        };

        let values = self.sample_values();
        let image = ContentPart::image_url(svg_data_url(&self.render_svg(&values)));

        let parts = match message.content.take().flatten() {
            Some(MessageContent::Parts(mut parts)) => {
                parts.push(image);
                parts
            }
            Some(MessageContent::Text(text)) => vec![ContentPart::text(text), image],
            None => vec![ContentPart::text(""), image],
        };

        message.content = Some(Some(MessageContent::Parts(parts)));
        tracing::debug!(?values, "appended chart to response");

        Ok(response)
    }
}
