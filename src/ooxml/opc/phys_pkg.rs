//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! This module handles the low-level reading and writing of the ZIP
//! container. Members are read eagerly in archive order and written back in
//! the same order, so a package round-trips without reshuffling its parts.

use crate::ooxml::opc::error::Result;
use std::io::{Cursor, Read, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Upper bound on the buffer reserved from a member's declared size.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// A single member of the ZIP container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysMember {
    /// ZIP member name (no leading slash)
    pub name: String,
    /// Decompressed content; empty for directory entries
    pub data: Vec<u8>,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

/// Physical package reader for ZIP-based OPC packages.
pub struct PhysPkgReader;

impl PhysPkgReader {
    /// Read every member of the archive, in archive order.
    ///
    /// # Errors
    /// Returns an error if the data is not a valid ZIP archive or a member
    /// cannot be decompressed.
    pub fn read_members<R: Read + Seek>(reader: R) -> Result<Vec<PhysMember>> {
        let mut archive = ZipArchive::new(reader)?;
        let mut members = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let name = file.name().to_string();
            let is_dir = file.is_dir();
            // The declared size is untrusted; cap the up-front allocation
            let mut data = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
            if !is_dir {
                file.read_to_end(&mut data)?;
            }
            members.push(PhysMember { name, data, is_dir });
        }

        Ok(members)
    }
}

/// Physical package writer that builds a ZIP archive in memory.
pub struct PhysPkgWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PhysPkgWriter {
    /// Create a writer that deflates every member.
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Write a file member.
    pub fn write(&mut self, membername: &str, data: &[u8]) -> Result<()> {
        self.zip.start_file(membername, self.options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    /// Write a directory entry.
    pub fn add_directory(&mut self, membername: &str) -> Result<()> {
        self.zip.add_directory(membername, self.options)?;
        Ok(())
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.zip.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}
