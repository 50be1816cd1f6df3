//! ファイルI/Oユーティリティ（gzip / stdin / stdout 対応）

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

const READER_BUF_CAP: usize = 128 * 1024; // 128 KiB

fn is_stdio(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).unwrap_or_default().eq_ignore_ascii_case("gz")
}

pub fn open_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let p = path.as_ref();
    if is_stdio(p) {
        return Ok(Box::new(BufReader::with_capacity(READER_BUF_CAP, io::stdin())));
    }
    let f = File::open(p)?;
    if is_gzip(p) {
        let dec = flate2::read::GzDecoder::new(f);
        return Ok(Box::new(BufReader::with_capacity(READER_BUF_CAP, dec)));
    }
    Ok(Box::new(BufReader::with_capacity(READER_BUF_CAP, f)))
}

/// 入力全体を UTF-8 文字列として読み込む（不正な UTF-8 は InvalidData）
pub fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut reader = open_reader(path)?;
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(content)
}

/// Writer wrapper that stages file output and publishes it on close.
///
/// File outputs are written to a temporary file next to the destination and
/// renamed into place by [`Writer::close`]. Dropping the writer without
/// closing it leaves the destination untouched.
#[must_use = "call .close() to publish the output and propagate IO errors"]
pub enum Writer {
    Plain { inner: BufWriter<NamedTempFile>, target: PathBuf },
    Stdout(io::Stdout),
    Gz { inner: flate2::write::GzEncoder<NamedTempFile>, target: PathBuf },
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Writer::Plain { inner, .. } => inner.write(buf),
            Writer::Stdout(s) => s.write(buf),
            Writer::Gz { inner, .. } => inner.write(buf),
        }
    }
    fn flush(&mut self) -> io::Result<()> {
        match self {
            Writer::Plain { inner, .. } => inner.flush(),
            Writer::Stdout(s) => s.flush(),
            Writer::Gz { inner, .. } => inner.flush(),
        }
    }
}

impl Writer {
    pub fn is_stdout(&self) -> bool {
        matches!(self, Writer::Stdout(_))
    }

    /// Finalize the stream and move staged output to its destination.
    pub fn close(self) -> io::Result<()> {
        match self {
            Writer::Plain { inner, target } => {
                let tmp = inner.into_inner().map_err(|e| e.into_error())?;
                publish(tmp, &target)
            }
            Writer::Stdout(mut s) => s.flush(),
            Writer::Gz { inner, target } => {
                let tmp = inner.finish()?;
                publish(tmp, &target)
            }
        }
    }
}

fn publish(mut tmp: NamedTempFile, target: &Path) -> io::Result<()> {
    tmp.flush()?;
    // 既存ファイルの権限を引き継ぐ（NamedTempFile は 0600 で作られる）
    match fs::metadata(target) {
        Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                tmp.as_file().set_permissions(fs::Permissions::from_mode(0o644))?;
            }
        }
        Err(e) => return Err(e),
    }
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

pub fn open_writer<P: AsRef<Path>>(path: P) -> io::Result<Writer> {
    let p = path.as_ref();
    if is_stdio(p) {
        return Ok(Writer::Stdout(io::stdout()));
    }
    let dir = match p.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;
    let target = p.to_path_buf();
    if is_gzip(p) {
        let enc = flate2::write::GzEncoder::new(tmp, flate2::Compression::default());
        return Ok(Writer::Gz { inner: enc, target });
    }
    Ok(Writer::Plain { inner: BufWriter::new(tmp), target })
}
