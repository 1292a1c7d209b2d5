//! Audio setup: builds the engine on the device's sample rate and wires the
//! rings between the cpal callback and the UI.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ratatui::DefaultTerminal;
use rtrb::RingBuffer;
use std::sync::Arc;

use siren_dsp::{
    patch::Patch, synth::message::NoteEvent, Controls, EngineConfig, SirenEngine, MAX_BLOCK_SIZE,
};

use super::ui::{
    state::{EngineCommand, VoiceStatus},
    UiApp, VIS_BLOCK_LEN,
};

const NOTE_QUEUE_LEN: usize = 64;
const COMMAND_QUEUE_LEN: usize = 16;
const STATUS_QUEUE_LEN: usize = 32;
/// Capacity in analysis blocks for the audio→UI sample ring
const AUDIO_RING_BLOCKS: usize = 16;

pub fn run(mut terminal: DefaultTerminal) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let patch = Patch::default();
    let controls = Arc::new(Controls::new());
    patch.apply(&controls);

    let engine_config = EngineConfig::new(sample_rate).with_envelope(patch.envelope);
    let mut engine = SirenEngine::with_controls(engine_config, Arc::clone(&controls))
        .wrap_err("failed to build siren engine")?;
    log::info!("audio out: {sample_rate} Hz, {channels} channel(s)");

    // --- Cross-thread rings ---
    let (note_tx, mut note_rx) = RingBuffer::<NoteEvent>::new(NOTE_QUEUE_LEN);
    let (command_tx, mut command_rx) = RingBuffer::<EngineCommand>::new(COMMAND_QUEUE_LEN);
    let (mut audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BLOCK_LEN * AUDIO_RING_BLOCKS);
    let (mut status_tx, status_rx) = RingBuffer::<VoiceStatus>::new(STATUS_QUEUE_LEN);

    // Buffer reused by audio callback
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                while let Ok(command) = command_rx.pop() {
                    match command {
                        EngineCommand::Reset => engine.reset(),
                        EngineCommand::AllNotesOff => engine.all_notes_off(),
                    }
                }

                let total_frames = data.len() / channels;
                let mut frames_written = 0;
                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                    let block = &mut render_buf[..frames_to_render];
                    engine.render_from(block, &mut note_rx);

                    // Duplicate mono to all channels
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    // Feed the scope, dropping the remainder if the UI is behind
                    for &s in block.iter() {
                        if audio_tx.push(s).is_err() {
                            break;
                        }
                    }

                    frames_written += frames_to_render;
                }

                let _ = status_tx.push(VoiceStatus::capture(&engine));
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    let mut app = UiApp::new(
        sample_rate,
        controls,
        note_tx,
        command_tx,
        audio_rx,
        status_rx,
    );
    app.run(&mut terminal)
}
