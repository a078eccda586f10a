use anyhow::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Bytes the fake synthesizer writes as its "wav" output
pub const FAKE_WAV: &str = "RIFF-fake-wav";
/// Suffix the fake encoder appends to the wav it was given
pub const FAKE_MP3_SUFFIX: &str = "ID3-encoded";

/// How a fake external tool behaves when invoked
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FakeTool {
    /// Writes a small output file and exits 0
    Working,
    /// Writes a large (16 MiB) output file and exits 0
    Large,
    /// Prints to stderr and exits with the given code
    Failing(i32),
    /// Never finishes on its own
    Hanging,
    /// Not installed at all
    Missing,
}

/// Directory layout for one test: fake binaries, their logs, and the audio temp dir
pub struct FakeTools {
    root: TempDir,
    pub synthesizer_bin: PathBuf,
    pub encoder_bin: PathBuf,
}

impl FakeTools {
    pub fn install(synthesizer: FakeTool, encoder: FakeTool) -> Result<Self> {
        let root = tempfile::tempdir()?;
        for sub in ["bin", "log", "audio"] {
            fs::create_dir(root.path().join(sub))?;
        }

        let log = root.path().join("log");
        let synthesizer_bin = root.path().join("bin").join("fake-espeak");
        let encoder_bin = root.path().join("bin").join("fake-lame");

        write_script(&synthesizer_bin, synthesizer, &synthesizer_script(&log, synthesizer))?;
        write_script(&encoder_bin, encoder, &encoder_script(&log, encoder))?;

        Ok(Self {
            root,
            synthesizer_bin,
            encoder_bin,
        })
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.path().join("audio")
    }

    fn log_file(&self, name: &str) -> PathBuf {
        self.root.path().join("log").join(name)
    }

    fn read_lines(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.log_file(name))
            .map(|content| content.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Tool names in invocation order
    pub fn calls(&self) -> Vec<String> {
        self.read_lines("calls")
    }

    /// Arguments of the most recent synthesizer run, one per line
    pub fn synthesizer_args(&self) -> Vec<String> {
        self.read_lines("synth_args")
    }

    /// Arguments of the most recent encoder run
    pub fn encoder_args(&self) -> Vec<String> {
        self.read_lines("encoder_args")
    }

    /// Output paths given to the synthesizer across all runs
    pub fn synthesizer_outputs(&self) -> Vec<String> {
        self.read_lines("outputs")
    }

    /// Number of files in the audio dir while the last synthesizer ran
    pub fn files_during_synthesis(&self) -> Option<usize> {
        fs::read_to_string(self.log_file("files_during_synthesis"))
            .ok()
            .and_then(|count| count.trim().parse().ok())
    }

    pub fn audio_files(&self) -> Vec<PathBuf> {
        fs::read_dir(self.audio_dir())
            .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
            .unwrap_or_default()
    }

    /// Cleanup runs when the server drops the response body, which can trail
    /// the client receiving the last byte; poll briefly.
    pub async fn wait_for_empty_audio_dir(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.audio_files().is_empty() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

fn write_script(path: &Path, tool: FakeTool, body: &str) -> Result<()> {
    if tool == FakeTool::Missing {
        return Ok(());
    }
    fs::write(path, format!("#!/bin/sh\n{}\n", body))?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

fn synthesizer_script(log: &Path, tool: FakeTool) -> String {
    let log = log.display();
    let record = format!(
        "echo synthesizer >> '{log}/calls'\n\
         printf '%s\\n' \"$@\" > '{log}/synth_args'\n\
         echo \"$2\" >> '{log}/outputs'\n\
         ls \"$(dirname \"$2\")\" | wc -l > '{log}/files_during_synthesis'",
        log = log
    );

    match tool {
        FakeTool::Working | FakeTool::Missing => {
            format!("{}\nprintf '{}' > \"$2\"", record, FAKE_WAV)
        }
        FakeTool::Large => format!(
            "{}\ndd if=/dev/zero of=\"$2\" bs=1048576 count=16 2>/dev/null",
            record
        ),
        FakeTool::Failing(code) => format!(
            "{}\necho 'unknown voice' >&2\nexit {}",
            record, code
        ),
        FakeTool::Hanging => format!("{}\nexec sleep 30", record),
    }
}

fn encoder_script(log: &Path, tool: FakeTool) -> String {
    let log = log.display();
    let record = format!(
        "echo encoder >> '{log}/calls'\n\
         printf '%s\\n' \"$@\" > '{log}/encoder_args'",
        log = log
    );

    match tool {
        FakeTool::Working | FakeTool::Large | FakeTool::Missing => format!(
            "{}\ncat \"$2\" > \"$3\"\nprintf '{}' >> \"$3\"",
            record, FAKE_MP3_SUFFIX
        ),
        FakeTool::Failing(code) => format!(
            "{}\necho 'not a wav file' >&2\nexit {}",
            record, code
        ),
        FakeTool::Hanging => format!("{}\nexec sleep 30", record),
    }
}
