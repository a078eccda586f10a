use axum::body::Bytes;
use futures::Stream;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use uuid::Uuid;

/// Size of each chunk read from disk while streaming
const CHUNK_SIZE: usize = 64 * 1024;

/// A temporary audio file owned by a single request.
///
/// The file is created empty (exclusively) when the artifact is allocated and
/// removed when the artifact is dropped, whatever the outcome of the request.
#[derive(Debug)]
pub struct TempAudioArtifact {
    path: PathBuf,
}

impl TempAudioArtifact {
    /// Create `<dir>/<prefix><token>.<extension>`; fails if the path already exists
    pub async fn create(
        dir: &Path,
        prefix: &str,
        token: Uuid,
        extension: &str,
    ) -> io::Result<Self> {
        let path = dir.join(format!("{}{}.{}", prefix, token, extension));

        tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        tracing::debug!(path = %path.display(), "Temporary audio file created");

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudioArtifact {
    fn drop(&mut self) {
        let path = std::mem::take(&mut self.path);

        // Inside the runtime the unlink goes to the blocking pool
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_artifact(&path));
            }
            Err(_) => remove_artifact(&path),
        }
    }
}

fn remove_artifact(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Temporary audio file removed");
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove temporary audio file"
            );
        }
    }
}

/// Poll until `dir` has no entries; removal runs off the calling task
#[cfg(test)]
pub(crate) async fn wait_until_empty(dir: &Path) -> bool {
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        if std::fs::read_dir(dir).map(|e| e.count() == 0).unwrap_or(false) {
            return true;
        }
        if std::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}

/// Stream the last artifact's bytes.
///
/// All artifacts travel with the stream and are deleted once it finishes, fails
/// or is dropped before completion (e.g. the client disconnects). Deletion is
/// handed to the blocking pool and never awaited by the stream.
pub async fn stream_last(
    artifacts: Vec<TempAudioArtifact>,
) -> io::Result<impl Stream<Item = io::Result<Bytes>> + Send + 'static> {
    let output = artifacts
        .last()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no audio artifact to stream"))?;
    let file = tokio::fs::File::open(output.path()).await?;

    Ok(futures::stream::unfold(
        Some((file, artifacts)),
        |state| async move {
            let (mut file, artifacts) = state?;
            let mut buf = vec![0u8; CHUNK_SIZE];

            match file.read(&mut buf).await {
                Ok(0) => {
                    drop(file);
                    drop(artifacts);
                    None
                }
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(Bytes::from(buf)), Some((file, artifacts))))
                }
                Err(e) => {
                    drop(file);
                    drop(artifacts);
                    Some((Err(e), None))
                }
            }
        },
    ))
}
