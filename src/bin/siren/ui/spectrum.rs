//! Spectrum analyzer widget
//!
//! Hann-windowed FFT of the scope window, folded into log-spaced bands. Each
//! band shows the loudest FFT bin it covers, with a slow fall so the siren's
//! harmonics stay readable while the pitch sweeps.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::{f32::consts::TAU, sync::Arc};

const BANDS: usize = 64;
const LOWEST_HZ: f32 = 20.0;
const FLOOR_DB: f64 = -100.0;
/// dB a band may fall per update
const FALL_DB: f64 = 3.0;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin range `[start, end)` covered by each band
    bands: Vec<(usize, usize)>,
    /// (log10 Hz, dB) per band
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_len: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(fft_len);

        let window = (0..fft_len)
            .map(|i| 0.5 - 0.5 * (TAU * i as f32 / (fft_len.max(2) - 1) as f32).cos())
            .collect();

        let nyquist = (sample_rate / 2.0).max(LOWEST_HZ * 2.0);
        let half = (fft_len / 2).max(1);
        let hz_per_bin = sample_rate / fft_len.max(1) as f32;
        let edge = |band: usize| LOWEST_HZ * (nyquist / LOWEST_HZ).powf(band as f32 / BANDS as f32);

        let mut bands = Vec::with_capacity(BANDS);
        let mut spectrum = Vec::with_capacity(BANDS);
        for band in 0..BANDS {
            let (lo, hi) = (edge(band), edge(band + 1));
            let start = ((lo / hz_per_bin) as usize).min(half - 1);
            let end = ((hi / hz_per_bin).ceil() as usize).clamp(start + 1, half);
            bands.push((start, end));
            spectrum.push((((lo * hi).sqrt() as f64).log10(), FLOOR_DB));
        }

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_len],
            bands,
            spectrum,
        }
    }

    /// Analyse a window of samples. Ignored unless it matches the FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = 2.0 / self.window.len() as f32;
        for (&(start, end), (_, db)) in self.bands.iter().zip(self.spectrum.iter_mut()) {
            let peak = self.scratch[start..end]
                .iter()
                .fold(0.0f32, |acc, c| acc.max(c.norm() * norm));
            let level = (20.0 * (peak.max(1e-6) as f64).log10()).max(FLOOR_DB);
            *db = level.max(*db - FALL_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the spectrum analyzer widget on a log-frequency axis
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let lo = spectrum.first().map_or(1.0, |(f, _)| *f);
    let hi = spectrum.last().map_or(4.3, |(f, _)| *f).max(lo + 0.1);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
