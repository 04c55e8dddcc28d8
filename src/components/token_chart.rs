use leptos::prelude::*;

use crate::api::TokenBar;

const WIDTH: f64 = 400.0;
const HEIGHT: f64 = 250.0;
const AXIS_GAP: f64 = 24.0;
const BAR_FILL: &str = "#15803d";

#[derive(Debug, Clone, PartialEq)]
struct BarRect {
    label: &'static str,
    tokens: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Lay bars out left to right, scaled so the tallest fills the plot area.
fn layout(series: &[TokenBar]) -> Vec<BarRect> {
    if series.is_empty() {
        return Vec::new();
    }
    let max = series.iter().map(|b| b.tokens).fold(0.0, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };
    let plot_height = HEIGHT - AXIS_GAP;
    let slot = WIDTH / series.len() as f64;
    let bar_width = slot * 0.6;

    series
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let height = plot_height * bar.tokens.max(0.0) / max;
            BarRect {
                label: bar.name,
                tokens: bar.tokens,
                x: i as f64 * slot + (slot - bar_width) / 2.0,
                y: plot_height - height,
                width: bar_width,
                height,
            }
        })
        .collect()
}

/// Bar chart comparing token counts.
#[component]
pub fn TokenChart(series: Vec<TokenBar>) -> impl IntoView {
    let bars = layout(&series);

    view! {
        <svg class="token-chart" viewBox=format!("0 0 {} {}", WIDTH, HEIGHT) role="img">
            {bars
                .into_iter()
                .map(|bar| {
                    let center = bar.x + bar.width / 2.0;
                    let value_y = (bar.y - 4.0).max(12.0);
                    let label_y = HEIGHT - 6.0;
                    view! {
                        <g>
                            <title>{format!("{}: {} tokens", bar.label, bar.tokens)}</title>
                            <rect
                                x=bar.x
                                y=bar.y
                                width=bar.width
                                height=bar.height
                                fill=BAR_FILL
                            />
                            <text x=center y=value_y text-anchor="middle">
                                {bar.tokens}
                            </text>
                            <text x=center y=label_y text-anchor="middle">
                                {bar.label}
                            </text>
                        </g>
                    }
                })
                .collect::<Vec<_>>()}
        </svg>
    }
}
