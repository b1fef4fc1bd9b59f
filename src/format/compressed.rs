use crate::engine::code_table::CodeTable;
use crate::engine::packer::{pack, row_len};
use crate::error::Result;
use crate::storage::VectorSet;
use std::io::Write;

/// Emits the compressed format against an already-built [`CodeTable`].
///
/// Layout: `"V D n\n"`, one codebook value per line in code order, then
/// per word the token, a space, the packed row bytes and `\n`.
pub struct CompressedWriter<'a, W: Write> {
    out: W,
    table: &'a CodeTable,
    dim: usize,
}

impl<'a, W: Write> CompressedWriter<'a, W> {
    /// Writes the header and codebook.
    pub fn start(mut out: W, table: &'a CodeTable, vocab_size: usize, dim: usize) -> Result<Self> {
        writeln!(out, "{} {} {}", vocab_size, dim, table.width())?;
        for value in table.codebook() {
            writeln!(out, "{}", value)?;
        }
        Ok(Self { out, table, dim })
    }

    /// Packed length of every row.
    pub fn row_len(&self) -> usize {
        row_len(self.dim, self.table.width())
    }

    pub fn write_row(&mut self, word: &[u8], vector: &[f32]) -> Result<()> {
        let codes = self.table.encode(vector)?;
        let row = pack(&codes, self.table.width());
        debug_assert_eq!(row.len(), self.row_len());

        self.out.write_all(word)?;
        self.out.write_all(b" ")?;
        self.out.write_all(&row)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Writes a whole vocabulary in compressed form.
pub fn write_compressed<W: Write>(vectors: &VectorSet, table: &CodeTable, out: W) -> Result<W> {
    write_compressed_with(vectors, table, out, || {})
}

/// Like [`write_compressed`], calling `on_row` after each row.
pub fn write_compressed_with<W: Write, F: FnMut()>(
    vectors: &VectorSet,
    table: &CodeTable,
    out: W,
    mut on_row: F,
) -> Result<W> {
    let mut writer = CompressedWriter::start(out, table, vectors.len(), vectors.dim())?;
    for (word, vector) in vectors.iter() {
        writer.write_row(word, vector)?;
        on_row();
    }
    writer.finish()
}
