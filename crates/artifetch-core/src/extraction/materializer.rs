//! Turns a stream of decoded entries into a file tree.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ArtifactError;
use crate::ExtractOptions;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::formats::EntryReader;
use crate::report::NoopProgress;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryKind;
use crate::types::SafePath;

use super::write::create_directory;
use super::write::write_file;

/// Writes archive entries below a destination root, in archive order.
///
/// Every entry name goes through [`SafePath::resolve`] before anything
/// touches the disk. Directories and regular files are written; any other
/// entry kind is skipped with a warning. The first error aborts extraction
/// and leaves whatever was already written in place.
///
/// # Examples
///
/// ```no_run
/// use artifetch_core::ExtractOptions;
/// use artifetch_core::extraction::Materializer;
/// use artifetch_core::formats::ArchiveFormat;
/// use artifetch_core::formats::ArchiveReader;
/// use artifetch_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("/tmp/out")?;
/// let options = ExtractOptions::default();
/// let reader = ArchiveReader::open("/tmp/128.tar", ArchiveFormat::TarGz)?;
///
/// let report = Materializer::new(&dest, &options).materialize(reader)?;
/// println!("{} entries written", report.entries_written());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Materializer<'a> {
    dest: &'a DestDir,
    options: &'a ExtractOptions,
    buffer: CopyBuffer,
}

impl<'a> Materializer<'a> {
    /// Creates a materializer writing below `dest`.
    #[must_use]
    pub fn new(dest: &'a DestDir, options: &'a ExtractOptions) -> Self {
        Self {
            dest,
            options,
            buffer: CopyBuffer::new(),
        }
    }

    /// Materializes every entry of `reader`.
    ///
    /// The reader is consumed and its archive handle released before this
    /// returns, on success and on error.
    ///
    /// # Errors
    ///
    /// Returns the first path traversal, decode, write or cancellation error.
    pub fn materialize<R: EntryReader>(&mut self, reader: R) -> Result<ExtractionReport> {
        self.materialize_with_progress(reader, &mut NoopProgress)
    }

    /// Materializes every entry of `reader`, reporting progress.
    ///
    /// # Errors
    ///
    /// Returns the first path traversal, decode, write or cancellation error.
    pub fn materialize_with_progress<R: EntryReader>(
        &mut self,
        mut reader: R,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();
        let mut report = ExtractionReport::new();
        let mut index = 0;

        let dest = self.dest;
        let options = self.options;
        let buffer = &mut self.buffer;

        reader.read_entries(&mut |entry| {
            index += 1;
            materialize_entry(entry, index, dest, options, buffer, &mut report, progress)
        })?;
        drop(reader);

        report.duration = start.elapsed();
        progress.on_complete();

        info!(
            dest = %dest.as_path().display(),
            files = report.files_extracted,
            directories = report.directories_created,
            skipped = report.entries_skipped,
            bytes = report.bytes_written,
            "extraction complete"
        );

        Ok(report)
    }
}

fn materialize_entry(
    entry: ArchiveEntry<'_>,
    index: usize,
    dest: &DestDir,
    options: &ExtractOptions,
    buffer: &mut CopyBuffer,
    report: &mut ExtractionReport,
    progress: &mut dyn ProgressCallback,
) -> Result<()> {
    if options.is_cancelled() {
        return Err(ArtifactError::Cancelled);
    }

    let ArchiveEntry {
        name,
        kind,
        mode,
        content,
        ..
    } = entry;

    let safe_path = SafePath::resolve(&name, dest)?;
    let target = dest.join(&safe_path);
    let entry_path = Path::new(&name);

    progress.on_entry_start(entry_path, index);

    match kind {
        EntryKind::Directory => {
            create_directory(&target)?;
            report.directories_created += 1;
            debug!(entry = %name, "created directory");
        }
        EntryKind::RegularFile => {
            let mut empty = std::io::empty();
            let content: &mut dyn Read = match content {
                Some(content) => content,
                None => &mut empty,
            };
            let bytes = write_file(
                content,
                &name,
                &target,
                options.effective_mode(mode),
                buffer,
            )?;
            report.files_extracted += 1;
            report.bytes_written = report.bytes_written.saturating_add(bytes);
            progress.on_bytes_written(bytes);
            debug!(entry = %name, bytes, mode = format_args!("{mode:o}"), "wrote file");
        }
        EntryKind::Other { raw_type } => {
            warn!(entry = %name, kind = %raw_type, "skipping unsupported entry type");
            report.add_warning(format!("skipped {raw_type} entry: {name}"));
            report.entries_skipped += 1;
        }
    }

    progress.on_entry_complete(entry_path);
    Ok(())
}
