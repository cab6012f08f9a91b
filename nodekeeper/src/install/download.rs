//! HTTP archive downloader.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use super::traits::{ArtifactDownloader, ProgressCallback};
use super::{InstallError, InstallResult};

/// Release archives are tens of megabytes; allow slow links.
const DEFAULT_TIMEOUT_SECS: u64 = 600;

const CHUNK_SIZE: usize = 64 * 1024;

/// Blocking `reqwest` downloader writing through a `.partial` file.
#[derive(Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl std::fmt::Debug for HttpDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDownloader").finish_non_exhaustive()
    }
}

impl HttpDownloader {
    pub fn new() -> InstallResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> InstallResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nodekeeper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InstallError::DownloadFailure {
                url: String::new(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    fn fetch(&self, url: &str, dest: &Path, on_progress: Option<ProgressCallback>) -> InstallResult<u64> {
        let failure = |reason: String| InstallError::DownloadFailure {
            url: url.to_string(),
            reason,
        };

        let mut response = self.client.get(url).send().map_err(|e| failure(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failure(format!("HTTP {}", status.as_u16())));
        }
        let total = response.content_length().unwrap_or(0);

        let partial = partial_path(dest);
        let file = File::create(&partial).map_err(|e| InstallError::io(&partial, e))?;
        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut downloaded = 0u64;

        let copied: InstallResult<()> = loop {
            let n = match response.read(&mut buffer) {
                Ok(0) => break Ok(()),
                Ok(n) => n,
                Err(e) => break Err(failure(e.to_string())),
            };
            if let Err(e) = writer.write_all(&buffer[..n]) {
                break Err(InstallError::io(&partial, e));
            }
            downloaded += n as u64;
            if let Some(callback) = &on_progress {
                callback(downloaded, total);
            }
        };

        let finished = copied.and_then(|()| {
            writer
                .flush()
                .map_err(|e| InstallError::io(&partial, e))?;
            if total > 0 && downloaded != total {
                return Err(failure(format!(
                    "truncated body: {downloaded} of {total} bytes"
                )));
            }
            fs::rename(&partial, dest).map_err(|e| InstallError::io(dest, e))
        });

        if let Err(e) = finished {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }

        info!(url, bytes = downloaded, dest = %dest.display(), "Downloaded archive");
        Ok(downloaded)
    }
}

impl ArtifactDownloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> InstallResult<u64> {
        debug!(url, "Starting download");
        self.fetch(url, dest, None)
    }

    fn download_with_progress(
        &self,
        url: &str,
        dest: &Path,
        on_progress: ProgressCallback,
    ) -> InstallResult<u64> {
        debug!(url, "Starting download with progress");
        self.fetch(url, dest, Some(on_progress))
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn serve_once(status: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/v1.1.0/node.tar.gz", listener.local_addr().unwrap());

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let header = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let stream = reader.get_mut();
            stream.write_all(header.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });

        url
    }

    #[test]
    fn test_download_writes_file() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("node.tar.gz");
        let url = serve_once("200 OK", b"archive-bytes");

        let progress = Arc::new(AtomicU64::new(0));
        let seen = progress.clone();
        let bytes = HttpDownloader::with_timeout(Duration::from_secs(5))
            .unwrap()
            .download_with_progress(
                &url,
                &dest,
                Box::new(move |done, _| seen.store(done, Ordering::SeqCst)),
            )
            .unwrap();

        assert_eq!(bytes, 13);
        assert_eq!(fs::read(&dest).unwrap(), b"archive-bytes");
        assert_eq!(progress.load(Ordering::SeqCst), 13);
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn test_not_found_is_download_failure() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("node.tar.gz");
        let url = serve_once("404 Not Found", b"");

        let err = HttpDownloader::with_timeout(Duration::from_secs(5))
            .unwrap()
            .download(&url, &dest)
            .unwrap_err();

        assert!(matches!(err, InstallError::DownloadFailure { ref reason, .. } if reason == "HTTP 404"));
        assert!(!dest.exists());
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/tmp/a.tar.gz")),
            PathBuf::from("/tmp/a.tar.gz.partial")
        );
    }
}
