//! TUI Rendering
//!
//! Pure views over the application state: the step form, the loading
//! screen, and the prediction result. Nothing here mutates anything.

use super::app::App;
use crate::client::PredictionResult;
use crate::schema::{self, FieldKind};
use crate::wizard::Submission;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

const BRAND_BLUE: Color = Color::Rgb(70, 130, 180);
const RISK_RED: Color = Color::Rgb(220, 80, 80);
const SAFE_GREEN: Color = Color::Rgb(80, 180, 120);

const SPINNER_FRAMES: &[&str] = &["|", "/", "-", "\\"];

/// Structured summary of a prediction, ready for display. Pure mapping —
/// the only place the high-risk classification is decided for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskSummary {
    pub high_risk: bool,
    /// "High Risk" / "Low Risk"
    pub direction: &'static str,
    /// "Churn" / "Not Churn"
    pub label: &'static str,
    /// e.g. "87%"
    pub probability: String,
}

/// Classify a prediction for display
pub fn risk_summary(result: &PredictionResult) -> RiskSummary {
    let high_risk = result.is_high_risk();
    RiskSummary {
        high_risk,
        direction: if high_risk { "High Risk" } else { "Low Risk" },
        label: result.prediction.as_str(),
        probability: format_percent(result.probability),
    }
}

/// Render a probability without a trailing `.0`
fn format_percent(p: f64) -> String {
    if p.fract() == 0.0 {
        format!("{}%", p as i64)
    } else {
        format!("{:.2}%", p)
    }
}

/// Render the entire UI
pub fn render(f: &mut Frame, app: &App) {
    let area = centered_panel(f.area());

    match app.wizard.submission() {
        Submission::Loading => render_loading(f, area, app),
        Submission::Succeeded(result) => render_result(f, area, result),
        Submission::Idle | Submission::Failed(_) => render_form(f, area, app),
    }
}

/// Center a fixed-size panel in the terminal
fn centered_panel(area: Rect) -> Rect {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(26.min(area.height.saturating_sub(2))),
            Constraint::Min(0),
        ])
        .split(area);

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(64.min(area.width.saturating_sub(2))),
            Constraint::Min(0),
        ])
        .split(v_chunks[1]);

    h_chunks[1]
}

/// Render the form for the current step
fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let step = app.wizard.current_step();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Progress bar
            Constraint::Min(5),    // Fields
        ])
        .split(area);

    // Continuous progress: 0% on step 1, 100% on the final step
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Step {} of {} ", step, schema::TOTAL_STEPS)),
        )
        .gauge_style(Style::default().fg(BRAND_BLUE))
        .ratio(app.wizard.progress())
        .label(format!("{:.0}%", app.wizard.progress() * 100.0));
    f.render_widget(gauge, chunks[0]);

    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(Span::styled(
        schema::step_title(step).to_string(),
        Style::default()
            .fg(BRAND_BLUE)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for (idx, field) in app.current_fields().iter().enumerate() {
        let focused = idx == app.focused_field;
        let marker = if focused { "> " } else { "  " };
        let value = app.display_value(field);
        let value_text = match field.kind {
            FieldKind::Select(_) | FieldKind::Flag(_) => {
                // Show the option label, not the wire value
                let label = option_label(field, &value);
                if focused {
                    format!("< {} >", label)
                } else {
                    label
                }
            }
            FieldKind::Numeric => {
                if focused {
                    format!("{}_", value)
                } else {
                    value
                }
            }
        };

        let label_style = if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value_style = if focused {
            Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<22}", marker, field.label), label_style),
            Span::styled(value_text, value_style),
        ]));
    }

    // Failed submission shows as a banner over the form; the user retries
    // from here or keeps editing
    if let Submission::Failed(message) = app.wizard.submission() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  ! {}", message),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(""));
    let submit_hint = if app.wizard.on_final_step() {
        "Get Prediction"
    } else {
        "Next"
    };
    lines.push(Line::from(vec![
        Span::styled("[↑/↓] ", Style::default().fg(BRAND_BLUE)),
        Span::raw("Field  "),
        Span::styled("[←/→] ", Style::default().fg(BRAND_BLUE)),
        Span::raw("Change  "),
        Span::styled("[Esc] ", Style::default().fg(BRAND_BLUE)),
        Span::raw("Previous  "),
        Span::styled("[Enter] ", Style::default().fg(BRAND_BLUE)),
        Span::raw(submit_hint),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Churn Prediction Form "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[1]);
}

/// Render the in-flight screen
fn render_loading(f: &mut Frame, area: Rect, app: &App) {
    let frame = SPINNER_FRAMES[app.tick_count % SPINNER_FRAMES.len()];
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Analyzing data and making prediction...", frame),
            Style::default().fg(BRAND_BLUE),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Churn Prediction "),
        );
    f.render_widget(paragraph, area);
}

/// Render the prediction result screen
fn render_result(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let summary = risk_summary(result);
    let accent = if summary.high_risk { RISK_RED } else { SAFE_GREEN };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Prediction Result",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            summary.direction,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("The model predicts that the customer will:"),
        Line::from(Span::styled(
            summary.label,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("With a probability of:"),
        Line::from(Span::styled(
            summary.probability.clone(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[R] ", Style::default().fg(BRAND_BLUE)),
            Span::raw("Make Another Prediction  "),
            Span::styled("[Ctrl+C] ", Style::default().fg(BRAND_BLUE)),
            Span::raw("Quit"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Churn Prediction "),
        );
    f.render_widget(paragraph, area);
}

/// Display label for a select field's current wire value
fn option_label(field: &schema::FieldSpec, value: &str) -> String {
    if let FieldKind::Select(options) | FieldKind::Flag(options) = field.kind {
        options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.to_string())
            .unwrap_or_else(|| value.to_string())
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChurnLabel;

    #[test]
    fn test_high_risk_summary() {
        let result = PredictionResult {
            prediction: ChurnLabel::Churn,
            probability: 87.0,
        };
        let summary = risk_summary(&result);
        assert!(summary.high_risk);
        assert_eq!(summary.direction, "High Risk");
        assert_eq!(summary.label, "Churn");
        assert_eq!(summary.probability, "87%");
    }

    #[test]
    fn test_low_risk_summary() {
        let result = PredictionResult {
            prediction: ChurnLabel::NotChurn,
            probability: 12.0,
        };
        let summary = risk_summary(&result);
        assert!(!summary.high_risk);
        assert_eq!(summary.direction, "Low Risk");
        assert_eq!(summary.label, "Not Churn");
        assert_eq!(summary.probability, "12%");
    }

    #[test]
    fn test_fractional_probability_formatting() {
        assert_eq!(format_percent(66.67), "66.67%");
        assert_eq!(format_percent(100.0), "100%");
    }

    #[test]
    fn test_option_label_falls_back_to_value() {
        let spec = schema::field_spec("SeniorCitizen").unwrap();
        assert_eq!(option_label(spec, "0"), "No");
        assert_eq!(option_label(spec, "1"), "Yes");
        assert_eq!(option_label(spec, "7"), "7");
    }
}
