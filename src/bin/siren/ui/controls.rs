//! Control panel widget - every engine control with a bar for its position

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use siren_dsp::engine::controls::{ControlId, ControlValues};

const BAR_WIDTH: usize = 20;

/// Render the control panel, highlighting the selected control
pub fn render_controls(frame: &mut Frame, area: Rect, values: &ControlValues, selected: ControlId) {
    let block = Block::default().title(" Controls ").borders(Borders::ALL);

    let lines: Vec<Line> = ControlId::ALL
        .iter()
        .map(|&id| control_line(id, values, id == selected))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn control_line(id: ControlId, values: &ControlValues, selected: bool) -> Line<'static> {
    let value = values.get(id);
    let (min, max) = id.range();
    let position = if max > min { (value - min) / (max - min) } else { 0.0 };
    let filled = ((position * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    let bar = format!("{}{}", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled));

    let text = match id {
        ControlId::Mod1Target => values.mod1_target.label().to_string(),
        ControlId::Mod2Target => values.mod2_target.label().to_string(),
        ControlId::CarrierRate | ControlId::Mod1Rate | ControlId::Mod2Rate => format!("{value:.2} Hz"),
        ControlId::DelayTime => format!("{:.0} ms", value * 1000.0),
        _ => format!("{value:.2}"),
    };

    let (marker, label_style) = if selected {
        (
            "▶ ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(Color::White))
    };

    Line::from(vec![
        Span::styled(format!("{marker}{:<15}", id.label()), label_style),
        Span::styled(bar, Style::default().fg(Color::Cyan)),
        Span::styled(format!("  {text}"), Style::default().fg(Color::DarkGray)),
    ])
}
