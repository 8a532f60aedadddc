use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use super::{Upload, sanitize_filename};

/// Directory holding uploads between receipt and forwarding.
#[derive(Debug)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: PathBuf) -> io::Result<Self> {
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
        }
        Ok(Self { root })
    }

    /// Writes the upload under a fresh unique name.
    ///
    /// The returned guard owns the file; it is removed when the guard goes out
    /// of scope unless [`ScratchFile::remove`] already did so.
    pub async fn stage(&self, upload: &Upload) -> io::Result<ScratchFile> {
        self.stage_with(upload, |file| file).await
    }

    async fn stage_with<W, F>(&self, upload: &Upload, writer: F) -> io::Result<ScratchFile>
    where
        F: FnOnce(File) -> W,
        W: AsyncWrite + Unpin,
    {
        let name = scratch_name(&upload.filename);
        let path = self.root.join(&name);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        // From here on the file exists and belongs to this request.
        let guard = ScratchFile { path: Some(path) };

        let mut out = writer(file);
        out.write_all(&upload.bytes).await?;
        out.flush().await?;

        tracing::debug!(
            path = %guard.path().display(),
            size = upload.bytes.len(),
            "staged upload"
        );
        Ok(guard)
    }
}

fn scratch_name(original: &str) -> String {
    let token = Uuid::new_v4();
    match sanitize_filename(original) {
        safe if safe.is_empty() => token.to_string(),
        safe => format!("{token}_{safe}"),
    }
}

/// A staged upload that is deleted on every exit path.
#[derive(Debug)]
pub struct ScratchFile {
    path: Option<PathBuf>,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Deletes the file now and reports failures. A file that is already
    /// gone counts as removed.
    pub async fn remove(mut self) -> io::Result<()> {
        let Some(path) = self.path.take() else {
            return Ok(());
        };
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed scratch file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed scratch file on drop"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to remove scratch file"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::TempDir;

    /// Accepts nothing, as if the disk filled up right after the file was created.
    struct FullDisk(#[allow(dead_code)] File);

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::other("no space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn upload(name: &str) -> Upload {
        Upload {
            bytes: b"\x89PNG fake".to_vec(),
            content_type: Some(mime::IMAGE_PNG),
            filename: name.to_string(),
        }
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn creates_missing_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("nested").join("uploads");

        ScratchDir::new(root.clone()).unwrap();

        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn staged_file_holds_the_bytes_and_is_removed_on_drop() {
        let tmp = TempDir::new().unwrap();
        let scratch = ScratchDir::new(tmp.path().to_path_buf()).unwrap();

        let staged = scratch.stage(&upload("cat.png")).await.unwrap();
        let path = staged.path().to_path_buf();

        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG fake");
        assert!(path.file_name().unwrap().to_str().unwrap().ends_with("_cat.png"));

        drop(staged);
        assert!(!path.exists());
        assert_eq!(entries(tmp.path()), 0);
    }

    #[tokio::test]
    async fn failed_write_removes_the_partial_file() {
        let tmp = TempDir::new().unwrap();
        let scratch = ScratchDir::new(tmp.path().to_path_buf()).unwrap();

        let err = scratch
            .stage_with(&upload("cat.png"), FullDisk)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "no space left on device");
        assert_eq!(entries(tmp.path()), 0);
    }

    #[tokio::test]
    async fn identical_names_never_collide() {
        let tmp = TempDir::new().unwrap();
        let scratch = ScratchDir::new(tmp.path().to_path_buf()).unwrap();

        let first = scratch.stage(&upload("same.png")).await.unwrap();
        let second = scratch.stage(&upload("same.png")).await.unwrap();
        assert_ne!(first.path(), second.path());
        assert_eq!(entries(tmp.path()), 2);

        let second_path = second.path().to_path_buf();
        first.remove().await.unwrap();
        assert!(second_path.exists());

        drop(second);
        assert_eq!(entries(tmp.path()), 0);
    }

    #[tokio::test]
    async fn remove_tolerates_a_file_that_is_already_gone() {
        let tmp = TempDir::new().unwrap();
        let scratch = ScratchDir::new(tmp.path().to_path_buf()).unwrap();

        let staged = scratch.stage(&upload("gone.png")).await.unwrap();
        std::fs::remove_file(staged.path()).unwrap();

        assert!(staged.remove().await.is_ok());
    }

    #[tokio::test]
    async fn traversal_names_stay_inside_the_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("uploads");
        let scratch = ScratchDir::new(root.clone()).unwrap();

        let staged = scratch.stage(&upload("../../escape.png")).await.unwrap();

        assert_eq!(staged.path().parent().unwrap(), root);
        assert_eq!(entries(tmp.path()), 1);
    }

    #[tokio::test]
    async fn unsafe_only_names_fall_back_to_the_token() {
        let tmp = TempDir::new().unwrap();
        let scratch = ScratchDir::new(tmp.path().to_path_buf()).unwrap();

        let staged = scratch.stage(&upload("..")).await.unwrap();
        let name = staged.path().file_name().unwrap().to_str().unwrap();

        assert!(Uuid::parse_str(name).is_ok());
    }
}
