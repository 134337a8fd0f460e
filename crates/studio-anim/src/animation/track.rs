//! Run-length compressed channel tracks
//!
//! A channel track stores one signed 16-bit sample per frame, compressed as a
//! list of runs. Each run covers `total` frames and stores `valid` explicit
//! samples; frames past the explicit samples repeat the last one. Samples are
//! deltas that the decoder scales and adds to the bone's rest value.

/// Maximum number of frames a single run can cover (one byte on disk)
pub const MAX_RUN_FRAMES: usize = 255;

/// One run of a compressed track
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AnimRun {
    /// Number of frames covered by this run
    pub total: u8,
    /// Explicit samples; `1 <= samples.len() <= total`
    pub samples: Vec<i16>,
}

impl AnimRun {
    /// Sample at `offset` frames into this run
    fn sample(&self, offset: usize) -> i16 {
        let last = self.samples.len() - 1;
        self.samples[offset.min(last)]
    }
}

/// Compressed animation data for one bone channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<AnimRun>", into = "Vec<AnimRun>")
)]
pub struct ChannelTrack {
    runs: Vec<AnimRun>,
}

impl ChannelTrack {
    /// Build a track from runs, dropping runs that cover no frames or carry no samples
    pub fn from_runs(runs: Vec<AnimRun>) -> Self {
        let runs = runs
            .into_iter()
            .filter(|run| run.total > 0 && !run.samples.is_empty())
            .map(|mut run| {
                run.samples.truncate(run.total as usize);
                run
            })
            .collect();
        Self { runs }
    }

    /// Run-length encode dense per-frame samples
    ///
    /// Consecutive repeats at the tail of a run are folded into its frame
    /// count instead of being stored.
    pub fn from_samples(samples: &[i16]) -> Self {
        let mut runs = Vec::new();

        for chunk in samples.chunks(MAX_RUN_FRAMES) {
            let mut explicit = chunk.len();
            while explicit > 1 && chunk[explicit - 1] == chunk[explicit - 2] {
                explicit -= 1;
            }
            runs.push(AnimRun {
                total: chunk.len() as u8,
                samples: chunk[..explicit].to_vec(),
            });
        }

        Self { runs }
    }

    /// Read the packed word stream used by the on-disk layout
    ///
    /// Each run starts with a header word whose low byte is the explicit
    /// sample count and whose high byte is the frame count, followed by the
    /// explicit samples. A truncated stream keeps the runs read so far.
    pub fn from_packed(words: &[i16]) -> Self {
        let mut runs = Vec::new();
        let mut cursor = 0;

        while cursor < words.len() {
            let header = words[cursor] as u16;
            let valid = (header & 0xff) as usize;
            let total = (header >> 8) as u8;
            cursor += 1;

            if total == 0 || valid == 0 {
                log::trace!("Packed track ends at word {}", cursor - 1);
                break;
            }

            let Some(samples) = words.get(cursor..cursor + valid) else {
                log::warn!(
                    "Packed track truncated: run at word {} needs {} samples",
                    cursor - 1,
                    valid
                );
                break;
            };
            cursor += valid;

            runs.push(AnimRun {
                total,
                samples: samples.to_vec(),
            });
        }

        Self::from_runs(runs)
    }

    /// Runs of this track
    pub fn runs(&self) -> &[AnimRun] {
        &self.runs
    }

    /// Number of frames covered by all runs
    pub fn frame_count(&self) -> usize {
        self.runs.iter().map(|run| run.total as usize).sum()
    }

    /// Check if the track carries any samples
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Decode the sample at an integer frame
    ///
    /// Scans runs until the one covering `frame` is found. Frames past the
    /// end of the track hold the final explicit sample; an empty track
    /// yields 0.
    pub fn sample(&self, frame: usize) -> i16 {
        let mut remaining = frame;

        for run in &self.runs {
            let total = run.total as usize;
            if remaining < total {
                return run.sample(remaining);
            }
            remaining -= total;
        }

        self.runs
            .last()
            .and_then(|run| run.samples.last())
            .copied()
            .unwrap_or(0)
    }
}

impl From<Vec<AnimRun>> for ChannelTrack {
    fn from(runs: Vec<AnimRun>) -> Self {
        Self::from_runs(runs)
    }
}

impl From<ChannelTrack> for Vec<AnimRun> {
    fn from(track: ChannelTrack) -> Self {
        track.runs
    }
}
