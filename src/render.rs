//! Offline rendering - drive the engine without an audio device
//!
//! Repeatedly invokes `process_block` the way a hardware callback would and
//! collects the interleaved result, optionally writing it to a 16-bit WAV
//! file. Useful for bouncing, regression testing, and any headless use of
//! the engine.

use crate::engine::AudioEngine;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;
use tracing::info;

/// Render `seconds` of audio into an interleaved stereo buffer.
pub fn render_interleaved(engine: &mut AudioEngine, seconds: f32) -> Vec<f32> {
    let sample_rate = engine.config().sample_rate;
    let block = engine.config().buffer_size;
    let total_frames = (seconds * sample_rate as f32) as usize;

    let mut left = vec![0.0f32; block];
    let mut right = vec![0.0f32; block];
    let mut out = Vec::with_capacity(total_frames * 2);

    let mut rendered = 0;
    while rendered < total_frames {
        engine.process_block(&mut left, &mut right);
        let take = block.min(total_frames - rendered);
        for i in 0..take {
            out.push(left[i]);
            out.push(right[i]);
        }
        rendered += take;
    }
    out
}

/// Render `seconds` of audio and write a 16-bit stereo WAV file.
pub fn render_wav<P: AsRef<Path>>(
    engine: &mut AudioEngine,
    seconds: f32,
    path: P,
) -> Result<(), hound::Error> {
    let samples = render_interleaved(engine, seconds);

    let spec = WavSpec {
        channels: 2,
        sample_rate: engine.config().sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(&path, spec)?;
    for sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;

    info!(
        seconds = seconds,
        path = %path.as_ref().display(),
        "rendered WAV"
    );
    Ok(())
}
