//! The leave request submitted by a student.

use crate::letter::error::{LetterError, Result};
use serde::Deserialize;
use std::path::Path;

/// A leave-of-absence request.
///
/// Field names on the wire follow the submission form (`namaMataKuliah`,
/// `nomorHP`, ...). Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    /// Course name
    pub nama_mata_kuliah: String,
    /// Course class
    pub kelas_mata_kuliah: String,
    /// Day the course meets
    pub hari_mata_kuliah: String,
    /// Course time slot
    pub jam_mata_kuliah: String,
    /// Course room
    pub ruang_mata_kuliah: String,
    /// Lecturer name
    pub nama_dosen: String,
    /// Student full name
    pub nama_lengkap: String,
    /// Study program
    pub prodi: String,
    /// Student ID number
    pub nim: String,
    /// Phone number
    #[serde(rename = "nomorHP")]
    pub nomor_hp: String,
    /// Period of the requested leave
    pub waktu_izin: String,
    /// Reason
    pub alasan: String,
    /// When the request was made
    pub waktu_permohonan: String,
}

impl LeaveRequest {
    /// Parse a request from YAML. JSON input is accepted as well.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_saphyr::from_str(text).map_err(|e| LetterError::Request(e.to_string()))
    }

    /// Load a request from a YAML or JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text).map_err(|e| match e {
            LetterError::Request(msg) => LetterError::Request(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }
}
