use std::fs::File;
use std::io::{self, Read, Write};
use std::num::IntErrorKind;
use std::path::Path;

use tracing::debug;

use crate::config::{TransformMode, WriteStrategy};
use crate::error::{ParseFailure, PipelineError, PipelineResult};

/// Increment decimal counter text by one.
///
/// Surrounding whitespace is ignored. The result has none. The counter is a
/// signed 64-bit integer; `i64::MAX` cannot be incremented and is reported as
/// [`ParseFailure::Overflow`] rather than wrapping.
pub fn increment_counter(content: &[u8]) -> Result<String, ParseFailure> {
    let text = std::str::from_utf8(content).map_err(|_| ParseFailure::InvalidUtf8)?;
    let trimmed = text.trim();
    let value: i64 = trimmed.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::Empty => ParseFailure::Empty,
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ParseFailure::Overflow,
        _ => ParseFailure::NotAnInteger(trimmed.to_string()),
    })?;
    let next = value.checked_add(1).ok_or(ParseFailure::Overflow)?;
    Ok(next.to_string())
}

/// Consume `body` and write the derived artifact to `path`.
///
/// The whole body is read before the artifact is touched, so a failed read or
/// a [`ParseFailure`] never creates or truncates the artifact. Returns the
/// number of bytes written.
pub fn transform(
    body: &mut dyn Read,
    path: &Path,
    mode: TransformMode,
    strategy: WriteStrategy,
) -> PipelineResult<u64> {
    let mut content = Vec::new();
    body.read_to_end(&mut content)
        .map_err(PipelineError::StreamRead)?;

    let output = match mode {
        TransformMode::Increment => increment_counter(&content)?.into_bytes(),
        TransformMode::Copy => content,
    };

    write_artifact(path, &output, strategy).map_err(|source| PipelineError::LocalIo {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), %mode, len = output.len(), "artifact written");
    Ok(output.len() as u64)
}

fn write_artifact(path: &Path, data: &[u8], strategy: WriteStrategy) -> io::Result<()> {
    match strategy {
        WriteStrategy::Truncate => {
            let mut file = File::create(path)?;
            file.write_all(data)?;
            file.flush()
        }
        WriteStrategy::Atomic => {
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            let mut staged = tempfile::NamedTempFile::new_in(dir)?;
            staged.write_all(data)?;
            staged.as_file().sync_all()?;
            set_readable(staged.as_file())?;
            staged.persist(path).map_err(|e| e.error)?;
            Ok(())
        }
    }
}

// Temp files are created owner-only; match what `File::create` would give.
#[cfg(unix)]
fn set_readable(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_readable(_file: &File) -> io::Result<()> {
    Ok(())
}
