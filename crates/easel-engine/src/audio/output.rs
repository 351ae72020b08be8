use anyhow::{Context, Result, anyhow, bail};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use ringbuf::HeapRb;
use ringbuf::traits::{Consumer, Observer, Producer, Split};

/// Device stream fed from a ring of interleaved stereo `f32` samples.
///
/// The main thread mixes ahead into the ring; the device callback drains it
/// and pads with silence when it runs dry.
pub struct AudioOutput {
    producer: ringbuf::HeapProd<f32>,
    _stream: cpal::Stream,
    sample_rate: u32,
}

impl AudioOutput {
    /// Opens the default output device with a ring of `buffer_frames` stereo frames.
    pub fn open(buffer_frames: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no audio output device available"))?;
        let supported = device
            .default_output_config()
            .context("failed to query default output config")?;

        let sample_rate = supported.sample_rate().0;
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        let (producer, consumer) = HeapRb::<f32>::new(buffer_frames.max(1) * 2).split();

        let stream = match format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, consumer)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, consumer)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, consumer)?,
            other => bail!("unsupported output sample format {other:?}"),
        };
        stream.play().context("failed to start audio stream")?;

        log::info!(
            "audio output: {} Hz, {} channels, {format:?}",
            sample_rate,
            config.channels
        );

        Ok(Self {
            producer,
            _stream: stream,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Stereo frames that can be pushed without overflowing the ring.
    pub fn vacant_frames(&self) -> usize {
        self.producer.vacant_len() / 2
    }

    /// Pushes interleaved stereo samples; anything that does not fit is dropped.
    pub fn push(&mut self, samples: &[f32]) {
        let pushed = self.producer.push_slice(samples);
        if pushed < samples.len() {
            log::debug!("audio ring full, dropped {} samples", samples.len() - pushed);
        }
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut consumer: ringbuf::HeapCons<f32>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut stereo: Vec<f32> = vec![0.0; 4096];

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let frames = data.len() / channels.max(1);
                if stereo.len() < frames * 2 {
                    stereo.resize(frames * 2, 0.0);
                }
                let popped = consumer.pop_slice(&mut stereo[..frames * 2]);
                stereo[popped..frames * 2].fill(0.0);

                for (out, lr) in data.chunks_mut(channels.max(1)).zip(stereo.chunks_exact(2)) {
                    match out {
                        [mono] => *mono = T::from_sample((lr[0] + lr[1]) * 0.5),
                        [l, r, rest @ ..] => {
                            *l = T::from_sample(lr[0]);
                            *r = T::from_sample(lr[1]);
                            rest.fill(T::EQUILIBRIUM);
                        }
                        [] => {}
                    }
                }
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .context("failed to build audio output stream")?;

    Ok(stream)
}
