use super::error::TtsError;
use super::format::{concatenates_cleanly, file_extension};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;

/// Audio produced by joining per-chunk payloads
#[derive(Debug)]
pub struct MergedAudio {
    pub bytes: Vec<u8>,
    /// False when the pieces were glued byte-wise in a framed format, so
    /// some players may stop after the first piece
    pub framing_intact: bool,
}

/// Join the payloads of sequential synthesis calls into a single file.
///
/// A single payload is returned untouched. wav payloads are decoded and
/// re-encoded under one RIFF header, raw pcm is appended byte-wise, and
/// anything else is appended byte-wise with `framing_intact` cleared.
pub fn merge_chunks(format: &str, parts: Vec<Vec<u8>>) -> Result<MergedAudio, TtsError> {
    if parts.len() <= 1 {
        return Ok(MergedAudio {
            bytes: parts.into_iter().flatten().collect(),
            framing_intact: true,
        });
    }

    if file_extension(format) == "wav" {
        return Ok(MergedAudio {
            bytes: concatenate_wav(&parts)?,
            framing_intact: true,
        });
    }

    Ok(MergedAudio {
        bytes: parts.concat(),
        framing_intact: concatenates_cleanly(format),
    })
}

fn concatenate_wav(parts: &[Vec<u8>]) -> Result<Vec<u8>, TtsError> {
    let spec = WavReader::new(Cursor::new(&parts[0]))
        .map_err(|e| wav_error(0, e))?
        .spec();

    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => concatenate_typed::<f32>(parts, spec),
        (SampleFormat::Int, 8) => concatenate_typed::<i8>(parts, spec),
        (SampleFormat::Int, 16) => concatenate_typed::<i16>(parts, spec),
        (SampleFormat::Int, 24 | 32) => concatenate_typed::<i32>(parts, spec),
        (format, bits) => Err(TtsError::AudioMerge(format!(
            "unsupported wav sample layout: {:?} at {} bits",
            format, bits
        ))),
    }
}

fn concatenate_typed<T>(parts: &[Vec<u8>], spec: WavSpec) -> Result<Vec<u8>, TtsError>
where
    T: hound::Sample + Copy,
{
    let mut output = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut output, spec).map_err(|e| TtsError::AudioMerge(e.to_string()))?;

        for (index, part) in parts.iter().enumerate() {
            let reader = WavReader::new(Cursor::new(part)).map_err(|e| wav_error(index, e))?;
            if reader.spec() != spec {
                return Err(TtsError::AudioMerge(format!(
                    "chunk {} has a different wav spec: {:?} vs {:?}",
                    index,
                    reader.spec(),
                    spec
                )));
            }

            for sample in reader.into_samples::<T>() {
                let sample = sample.map_err(|e| wav_error(index, e))?;
                writer
                    .write_sample(sample)
                    .map_err(|e| TtsError::AudioMerge(e.to_string()))?;
            }
        }

        writer
            .finalize()
            .map_err(|e| TtsError::AudioMerge(e.to_string()))?;
    }

    Ok(output.into_inner())
}

fn wav_error(index: usize, err: hound::Error) -> TtsError {
    TtsError::AudioMerge(format!("chunk {} is not valid wav: {}", index, err))
}
