//! Status panel - envelope stage, note, pitch, LFOs and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use siren_dsp::dsp::EnvelopeState;

use super::state::VoiceStatus;

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[note as usize % 12], octave)
}

fn stage_style(stage: EnvelopeState) -> (&'static str, Color) {
    match stage {
        EnvelopeState::Idle => ("Idle", Color::DarkGray),
        EnvelopeState::Attack => ("Attack", Color::LightRed),
        EnvelopeState::Decay => ("Decay", Color::LightYellow),
        EnvelopeState::Sustain => ("Sustain", Color::LightGreen),
        EnvelopeState::Release => ("Release", Color::LightBlue),
    }
}

/// Render the voice status panel
pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    status: &VoiceStatus,
    octave: i32,
    sample_rate: f32,
    buffer: &[f32],
) {
    let block = Block::default().title(" siren ").borders(Borders::ALL);

    let (stage, stage_color) = stage_style(status.stage);
    let note = status.note.map(note_name).unwrap_or_else(|| "-".to_string());

    let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let rms = if buffer.is_empty() {
        0.0
    } else {
        (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt()
    };

    let meter_width = 20usize;
    let filled = ((status.envelope_level * meter_width as f32).round() as usize).min(meter_width);

    let lines = vec![
        Line::from(vec![
            Span::raw(" Stage:    "),
            Span::styled(stage, Style::default().fg(stage_color)),
        ]),
        Line::from(vec![
            Span::raw(" Envelope: "),
            Span::styled("█".repeat(filled), Style::default().fg(stage_color)),
            Span::styled(
                format!("{}  {:.2}", "·".repeat(meter_width - filled), status.envelope_level),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(format!(" Note:     {note}   (octave {octave})")),
        Line::from(format!(" Carrier:  {:.1} Hz", status.carrier_hz)),
        Line::from(format!(" LFO1:     {:+.3}", status.mod1)),
        Line::from(format!(" LFO2:     {:+.3}", status.mod2)),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Peak: {peak:.2}  RMS: {rms:.2}"),
            Style::default().fg(Color::Magenta),
        )),
        Line::from(Span::styled(
            format!(" {:.1}kHz", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
