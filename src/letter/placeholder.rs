//! Template placeholders and the order they are filled in.

use crate::letter::request::LeaveRequest;
use std::fmt;

/// A placeholder in the leave letter template.
///
/// Each variant corresponds to one [`LeaveRequest`] field and one literal
/// token in the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    CourseName,
    CourseClass,
    CourseDay,
    CourseTime,
    CourseRoom,
    Lecturer,
    StudentName,
    StudyProgram,
    StudentId,
    PhoneNumber,
    LeavePeriod,
    Reason,
    RequestTime,
}

impl Placeholder {
    /// Every placeholder, in field order.
    pub const ALL: [Placeholder; 13] = [
        Placeholder::CourseName,
        Placeholder::CourseClass,
        Placeholder::CourseDay,
        Placeholder::CourseTime,
        Placeholder::CourseRoom,
        Placeholder::Lecturer,
        Placeholder::StudentName,
        Placeholder::StudyProgram,
        Placeholder::StudentId,
        Placeholder::PhoneNumber,
        Placeholder::LeavePeriod,
        Placeholder::Reason,
        Placeholder::RequestTime,
    ];

    /// Placeholders filled once, in this order.
    pub const SINGLE_PASS: [Placeholder; 9] = [
        Placeholder::CourseName,
        Placeholder::CourseClass,
        Placeholder::CourseTime,
        Placeholder::CourseRoom,
        Placeholder::Lecturer,
        Placeholder::StudentName,
        Placeholder::PhoneNumber,
        Placeholder::LeavePeriod,
        Placeholder::RequestTime,
    ];

    /// Placeholders filled after [`Placeholder::SINGLE_PASS`], repeated
    /// [`Placeholder::REPEATED_PASSES`] times.
    pub const REPEATED: [Placeholder; 4] = [
        Placeholder::CourseDay,
        Placeholder::StudyProgram,
        Placeholder::StudentId,
        Placeholder::Reason,
    ];

    pub const REPEATED_PASSES: usize = 2;

    /// The literal token as written in the template.
    pub const fn token(self) -> &'static str {
        match self {
            Placeholder::CourseName => "nama_mata_kuliah",
            Placeholder::CourseClass => "kelas_mata_kuliah",
            Placeholder::CourseDay => "day",
            Placeholder::CourseTime => "jam_mata_kuliah",
            Placeholder::CourseRoom => "ruang_mata_kuliah",
            Placeholder::Lecturer => "nama_dosen",
            Placeholder::StudentName => "nmhs",
            Placeholder::StudyProgram => "prdi",
            Placeholder::StudentId => "nims",
            Placeholder::PhoneNumber => "nomor_hp",
            Placeholder::LeavePeriod => "waktu_izin",
            Placeholder::Reason => "ala_san",
            Placeholder::RequestTime => "waktu_permohonan",
        }
    }

    /// The request field that fills this placeholder.
    pub fn value(self, request: &LeaveRequest) -> &str {
        match self {
            Placeholder::CourseName => &request.nama_mata_kuliah,
            Placeholder::CourseClass => &request.kelas_mata_kuliah,
            Placeholder::CourseDay => &request.hari_mata_kuliah,
            Placeholder::CourseTime => &request.jam_mata_kuliah,
            Placeholder::CourseRoom => &request.ruang_mata_kuliah,
            Placeholder::Lecturer => &request.nama_dosen,
            Placeholder::StudentName => &request.nama_lengkap,
            Placeholder::StudyProgram => &request.prodi,
            Placeholder::StudentId => &request.nim,
            Placeholder::PhoneNumber => &request.nomor_hp,
            Placeholder::LeavePeriod => &request.waktu_izin,
            Placeholder::Reason => &request.alasan,
            Placeholder::RequestTime => &request.waktu_permohonan,
        }
    }

    /// The substitution plan: every placeholder in application order.
    pub fn plan() -> impl Iterator<Item = Placeholder> {
        Self::SINGLE_PASS.into_iter().chain(
            std::iter::repeat_n(Self::REPEATED, Self::REPEATED_PASSES).flatten(),
        )
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
