use crate::engine::{SamplerController, SamplerEngine};
use crate::error::AudioError;
use crate::loader::SampleBank;
use crate::pitch::parse_note_id;
use crate::sampler::{Sampler, SamplerOptions};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use keybed_core::SamplerBackend;

/// Largest callback buffer handled without reallocating (interleaved samples)
const CONVERSION_BUFFER_SIZE: usize = 16384;

/// A sampler connected to the default audio output
///
/// Lives on the UI thread. The sampler itself is owned by the cpal callback
/// and driven through the command queue.
pub struct AudioSystem {
    stream: cpal::Stream,
    controller: SamplerController,
    pub sample_rate: u32,
    pub channels: u16,
    disposed: bool,
}

impl AudioSystem {
    /// Open the default output device and start the stream
    pub fn to_destination(bank: SampleBank, options: SamplerOptions) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let default_config = device.default_output_config()?;
        let sample_format = default_config.sample_format();
        let config: cpal::StreamConfig = default_config.into();
        let sample_rate = config.sample_rate.0;
        let channels = config.channels;

        log::info!(
            "Audio output: {} Hz, {} channels, {:?}",
            sample_rate,
            channels,
            sample_format
        );

        let zones = bank.len();
        let sampler = Sampler::new(bank, options);
        let (engine, controller) =
            SamplerEngine::with_controller(sampler, sample_rate, channels as usize);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, engine)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, engine)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, engine)?,
            other => return Err(AudioError::UnsupportedFormat(other)),
        };
        stream.play()?;

        log::info!("Sampler ready with {} zones", zones);

        Ok(Self {
            stream,
            controller,
            sample_rate,
            channels,
            disposed: false,
        })
    }

}

impl SamplerBackend for AudioSystem {
    fn trigger_attack(&mut self, note_id: &str) {
        match parse_note_id(note_id) {
            Some(note) => self.controller.note_on(note),
            None => log::warn!("Cannot play unknown note {}", note_id),
        }
    }

    fn trigger_release(&mut self, note_id: &str) {
        if let Some(note) = parse_note_id(note_id) {
            self.controller.note_off(note);
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.controller.all_notes_off();
        if let Err(e) = self.stream.pause() {
            log::warn!("Failed to pause audio stream: {}", e);
        }
        self.disposed = true;
        log::debug!("Audio system disposed");
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut engine: SamplerEngine,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let err_fn = |err: cpal::StreamError| log::error!("Audio stream error: {}", err);

    let mut conversion_buffer = vec![0.0f32; CONVERSION_BUFFER_SIZE];

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            if conversion_buffer.len() < data.len() {
                // Only on the first oversized callback
                conversion_buffer.resize(data.len(), 0.0);
            }

            let buffer = &mut conversion_buffer[..data.len()];
            engine.process(buffer);

            for (out, sample) in data.iter_mut().zip(buffer.iter()) {
                *out = cpal::Sample::from_sample(*sample);
            }
        },
        err_fn,
        None,
    )
}
