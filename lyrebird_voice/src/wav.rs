// WAV file output for rendered performances.
//
// The engine's PCM sink hands buffers to whatever audio collaborator is
// attached; this module is the file-shaped one. Mono 16-bit integer WAV via
// the `hound` crate — used by the `perform` demo binary and by session
// export.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// Write mono 16-bit PCM samples to a WAV file at the given sample rate.
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}
