use crate::engine::code_table::CodeTable;
use crate::engine::packer::row_len;
use crate::engine::quantizer::{quantize_with, ThresholdMode};
use crate::format::{
    write_binary_with, write_compressed_with, write_text_with, BinaryVectorReader, OutputFormat,
};
use crate::storage::VectorSet;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One file-to-file conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: ThresholdMode,
    pub format: OutputFormat,
    pub show_progress: bool,
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Vocabulary size declared in the input header
    pub declared_words: usize,
    /// Words actually held after duplicate tokens overwrote earlier ones
    pub distinct_words: usize,
    pub dim: usize,
    pub mode: ThresholdMode,
    pub format: OutputFormat,
    /// Bits per code, compressed output only
    pub bit_width: Option<u32>,
    pub codebook_size: Option<usize>,
    pub row_bytes: Option<usize>,
    pub bytes_written: u64,
}

pub struct ConversionPipeline {
    request: ConversionRequest,
}

impl ConversionPipeline {
    pub fn new(request: ConversionRequest) -> Self {
        Self { request }
    }

    /// Reads, quantizes and writes. The output file only appears once every
    /// stage has succeeded.
    pub fn run(&self) -> Result<ConversionReport> {
        let req = &self.request;

        let (mut vectors, declared_words) = self.read_input()?;
        self.quantize(&mut vectors)?;

        let table = match req.format {
            OutputFormat::Compressed => Some(
                CodeTable::build(&vectors)
                    .context("Failed to build codebook from quantized vectors")?,
            ),
            _ => None,
        };

        let bytes_written = self.write_output(&vectors, table.as_ref())?;

        Ok(ConversionReport {
            declared_words,
            distinct_words: vectors.len(),
            dim: vectors.dim(),
            mode: req.mode,
            format: req.format,
            bit_width: table.as_ref().map(|t| t.width()),
            codebook_size: table.as_ref().map(|t| t.len()),
            row_bytes: table.as_ref().map(|t| row_len(vectors.dim(), t.width())),
            bytes_written,
        })
    }

    fn read_input(&self) -> Result<(VectorSet, usize)> {
        let path = &self.request.input;
        let file = File::open(path).with_context(|| format!("Failed to open input: {:?}", path))?;
        let reader = BinaryVectorReader::new(BufReader::new(file))
            .with_context(|| format!("Failed to read header of {:?}", path))?;

        let declared = reader.vocab_size();
        let pb = self.stage_bar(declared, "Reading")?;
        let vectors = reader
            .read_all_with(|| pb.inc(1))
            .with_context(|| format!("Failed to read vectors from {:?}", path))?;
        pb.finish_with_message("Read complete");

        Ok((vectors, declared))
    }

    fn quantize(&self, vectors: &mut VectorSet) -> Result<()> {
        let mode = self.request.mode;
        if mode == ThresholdMode::None {
            return Ok(());
        }
        let pb = self.stage_bar(vectors.len(), "Thresholding")?;
        quantize_with(vectors, mode, || pb.inc(1));
        pb.finish_with_message("Thresholding complete");
        Ok(())
    }

    fn write_output(&self, vectors: &VectorSet, table: Option<&CodeTable>) -> Result<u64> {
        let output = &self.request.output;
        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

        let pb = self.stage_bar(vectors.len(), "Writing")?;
        {
            let mut out = BufWriter::new(tmp.as_file_mut());
            write_vectors(vectors, self.request.format, table, &mut out, &pb)?;
            out.flush()?;
        }
        pb.finish_with_message("Write complete");

        let bytes_written = tmp.as_file().metadata()?.len();
        tmp.persist(output)
            .with_context(|| format!("Failed to move output into place: {:?}", output))?;
        Ok(bytes_written)
    }

    fn stage_bar(&self, len: usize, msg: &'static str) -> Result<ProgressBar> {
        if !self.request.show_progress {
            return Ok(ProgressBar::hidden());
        }
        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} words")?
                .progress_chars("=>-"),
        );
        pb.set_message(msg);
        Ok(pb)
    }
}

/// Serializes an in-memory vocabulary. `table` is required for compressed output.
pub fn write_vectors<W: Write>(
    vectors: &VectorSet,
    format: OutputFormat,
    table: Option<&CodeTable>,
    out: &mut W,
    progress: &ProgressBar,
) -> Result<()> {
    let tick = || progress.inc(1);
    match format {
        OutputFormat::Compressed => {
            let table = table.context("Compressed output requires a codebook")?;
            write_compressed_with(vectors, table, out, tick)?;
        }
        OutputFormat::Text => write_text_with(vectors, out, tick)?,
        OutputFormat::Binary => write_binary_with(vectors, out, tick)?,
    }
    Ok(())
}
