use crate::asset_pool::SoundAsset;
use crate::device_speaker::interface::DeviceSpeaker;
use crate::library::logger::interface::Logger;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

const TONE_HZ: f32 = 880.0;

/// Plays on the default output device. Sound bytes are raw 16-bit
/// little-endian mono PCM at the device rate. An empty sound plays a tone.
///
/// Each playback owns its stream on a dedicated thread, since cpal streams
/// are not `Send` on every host.
pub struct DeviceSpeakerCpal {
    tone_duration: Duration,
    playing: Arc<AtomicBool>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceSpeakerCpal {
    pub fn new(tone_duration: Duration, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            tone_duration,
            playing: Arc::new(AtomicBool::new(false)),
            logger: logger.with_namespace("speaker").with_namespace("cpal"),
        }
    }
}

fn samples_for(sound: &SoundAsset, sample_rate: u32, tone_duration: Duration) -> Vec<f32> {
    if sound.bytes.is_empty() {
        let count = (tone_duration.as_secs_f32() * sample_rate as f32) as usize;
        return (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * TONE_HZ * t).sin() * 0.5
            })
            .collect();
    }

    sound
        .bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / i16::MAX as f32)
        .collect()
}

fn build_stream<T: SizedSample + FromSample<f32>>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    samples: Arc<Vec<f32>>,
    cursor: Arc<AtomicUsize>,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let channels = config.channels as usize;

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let value = samples.get(index).copied().unwrap_or(0.0);
                for sample in frame.iter_mut() {
                    *sample = T::from_sample(value);
                }
            }
        },
        move |e| {
            let _ = logger.error(&format!("output stream error: {}", e));
        },
        None,
    )
}

type OpenStream = (cpal::Stream, Arc<AtomicUsize>, usize);

fn open_stream(
    sound: &SoundAsset,
    tone_duration: Duration,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<OpenStream, Box<dyn std::error::Error + Send + Sync>> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("no default output device")?;
    let supported = device.default_output_config()?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    let samples = Arc::new(samples_for(sound, config.sample_rate.0, tone_duration));
    let len = samples.len();
    let cursor = Arc::new(AtomicUsize::new(0));

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &config, samples, cursor.clone(), logger)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &config, samples, cursor.clone(), logger)?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &config, samples, cursor.clone(), logger)?
        }
        other => return Err(format!("unsupported sample format {:?}", other).into()),
    };
    stream.play()?;

    Ok((stream, cursor, len))
}

impl DeviceSpeaker for DeviceSpeakerCpal {
    fn play(&self, sound: &SoundAsset) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.playing.swap(true, Ordering::SeqCst) {
            return Err("speaker is already playing".into());
        }

        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
        let sound_clone = sound.clone();
        let tone_duration = self.tone_duration;
        let playing = Arc::clone(&self.playing);
        let logger = self.logger.clone();

        std::thread::spawn(move || match open_stream(&sound_clone, tone_duration, logger) {
            Ok((stream, cursor, len)) => {
                let _ = ready_tx.send(Ok(()));
                while cursor.load(Ordering::Relaxed) < len {
                    std::thread::sleep(Duration::from_millis(10));
                }
                drop(stream);
                playing.store(false, Ordering::SeqCst);
            }
            Err(e) => {
                playing.store(false, Ordering::SeqCst);
                let _ = ready_tx.send(Err(e.to_string()));
            }
        });

        match ready_rx.recv() {
            Ok(Ok(())) => {
                self.logger.info(&format!("Playing {}", sound.name))?;
                Ok(())
            }
            Ok(Err(message)) => Err(format!("could not play {}: {}", sound.name, message).into()),
            Err(_) => {
                self.playing.store(false, Ordering::SeqCst);
                Err(format!("playback thread for {} exited", sound.name).into())
            }
        }
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}
