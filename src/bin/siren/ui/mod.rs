//! TUI module for siren
//!
//! Keyboard playing, control editing and real-time visualization.

mod controls;
mod spectrum;
pub mod state;
mod status;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::{sync::Arc, time::Duration};

use siren_dsp::{
    dsp::modulate::{Mod1Target, Mod2Target},
    engine::controls::ControlId,
    patch::Patch,
    synth::message::NoteEvent,
    Controls,
};

use controls::render_controls;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::{EngineCommand, VoiceStatus};
use status::render_status;
use waveform::render_waveform;

/// Analysis window for scope and spectrum
pub const VIS_BLOCK_LEN: usize = 1024;

/// Chromatic keyboard, lowest note first
const NOTE_KEYS: [char; 13] = ['z', 's', 'x', 'd', 'c', 'v', 'g', 'b', 'h', 'n', 'j', 'm', ','];
const MIN_OCTAVE: i32 = 0;
const MAX_OCTAVE: i32 = 8;

/// UI application state
pub struct UiApp {
    sample_rate: f32,
    controls: Arc<Controls>,
    note_tx: Producer<NoteEvent>,
    command_tx: Producer<EngineCommand>,
    audio_rx: Consumer<f32>,
    status_rx: Consumer<VoiceStatus>,

    status: VoiceStatus,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,

    /// Index into `ControlId::ALL`
    selected: usize,
    octave: i32,
    held_note: Option<u8>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        sample_rate: f32,
        controls: Arc<Controls>,
        note_tx: Producer<NoteEvent>,
        command_tx: Producer<EngineCommand>,
        audio_rx: Consumer<f32>,
        status_rx: Consumer<VoiceStatus>,
    ) -> Self {
        Self {
            sample_rate,
            controls,
            note_tx,
            command_tx,
            audio_rx,
            status_rx,
            status: VoiceStatus::default(),
            audio_buffer: vec![0.0; VIS_BLOCK_LEN],
            spectrum: SpectrumAnalyzer::new(VIS_BLOCK_LEN, sample_rate),
            selected: 0,
            octave: 4,
            held_note: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_status();

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        if let Some(note) = self.held_note.take() {
            let _ = self.note_tx.push(NoteEvent::off(0, note));
        }
        Ok(())
    }

    /// Pull samples from the audio ring, keeping the most recent window
    fn poll_audio(&mut self) {
        let mut received = 0;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received += 1;
        }

        if self.audio_buffer.len() > VIS_BLOCK_LEN {
            let excess = self.audio_buffer.len() - VIS_BLOCK_LEN;
            self.audio_buffer.drain(0..excess);
        }
        if received > 0 {
            self.spectrum.update(&self.audio_buffer);
        }
    }

    /// Keep only the latest voice status
    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.release(),
            KeyCode::Char('[') => self.octave = (self.octave - 1).max(MIN_OCTAVE),
            KeyCode::Char(']') => self.octave = (self.octave + 1).min(MAX_OCTAVE),
            KeyCode::Char('1') => {
                let next = (self.controls.mod1_target().index() + 1) % Mod1Target::ALL.len() as u8;
                self.controls.set_mod1_target(Mod1Target::from_index(next));
            }
            KeyCode::Char('2') => {
                let next = (self.controls.mod2_target().index() + 1) % Mod2Target::ALL.len() as u8;
                self.controls.set_mod2_target(Mod2Target::from_index(next));
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                Patch::default().apply(&self.controls);
                self.held_note = None;
                let _ = self.command_tx.push(EngineCommand::Reset);
            }
            KeyCode::Char('a') => {
                self.held_note = None;
                let _ = self.command_tx.push(EngineCommand::AllNotesOff);
            }
            KeyCode::Up => {
                self.selected = (self.selected + ControlId::ALL.len() - 1) % ControlId::ALL.len();
            }
            KeyCode::Down => self.selected = (self.selected + 1) % ControlId::ALL.len(),
            KeyCode::Left => self.nudge(-1),
            KeyCode::Right => self.nudge(1),
            KeyCode::Char(c) => {
                if let Some(semitone) = NOTE_KEYS.iter().position(|&k| k == c) {
                    self.play(semitone as i32);
                }
            }
            _ => {}
        }
    }

    fn play(&mut self, semitone: i32) {
        let note = (self.octave + 1) * 12 + semitone;
        let Ok(note) = u8::try_from(note) else {
            return;
        };
        if note > 127 {
            return;
        }

        // Monophonic: the engine hands the gate to the newest note
        if self.note_tx.push(NoteEvent::on(0, note, 1.0)).is_ok() {
            self.held_note = Some(note);
        }
    }

    fn release(&mut self) {
        if let Some(note) = self.held_note.take() {
            let _ = self.note_tx.push(NoteEvent::off(0, note));
        }
    }

    fn nudge(&mut self, direction: i32) {
        let id = ControlId::ALL[self.selected];
        let value = self.controls.get(id);
        let (min, max) = id.range();

        let next = match id {
            _ if id.is_selector() => value + direction as f32,
            // Rates and times feel better in ratios
            ControlId::CarrierRate | ControlId::Mod1Rate | ControlId::Mod2Rate | ControlId::DelayTime => {
                value * 1.05f32.powi(direction)
            }
            _ => value + (max - min) * 0.02 * direction as f32,
        };
        self.controls.set(id, next);
    }

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(13), // Controls + status
                Constraint::Min(8),     // Scope + spectrum
                Constraint::Length(1),  // Help bar
            ])
            .split(frame.area());

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        let values = self.controls.snapshot();
        render_controls(frame, top[0], &values, ControlId::ALL[self.selected]);
        render_status(
            frame,
            top[1],
            &self.status,
            self.octave,
            self.sample_rate,
            &self.audio_buffer,
        );
        render_waveform(frame, bottom[0], &self.audio_buffer);
        render_spectrum(frame, bottom[1], self.spectrum.data());

        let help = Paragraph::new(
            " [Z..,] Play  [Space] Release  [[/]] Octave  [↑↓] Select  [←→] Adjust  [1/2] Targets  [A] All off  [R] Reset  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }
}
