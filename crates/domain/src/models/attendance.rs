//! Attendance record ("presensi") domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Attendance status of one student in one session.
///
/// Serialized with the Indonesian labels lecturers see on the roster;
/// English names are accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[default]
    #[serde(rename = "Hadir", alias = "present", alias = "Present")]
    Present,
    #[serde(rename = "Izin", alias = "excused", alias = "Excused")]
    Excused,
    #[serde(rename = "Sakit", alias = "sick", alias = "Sick")]
    Sick,
    #[serde(rename = "Alpha", alias = "absent", alias = "Absent")]
    Absent,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Excused,
        AttendanceStatus::Sick,
        AttendanceStatus::Absent,
    ];

    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Excused => "excused",
            AttendanceStatus::Sick => "sick",
            AttendanceStatus::Absent => "absent",
        }
    }

    /// Parses from database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "excused" => Some(AttendanceStatus::Excused),
            "sick" => Some(AttendanceStatus::Sick),
            "absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }
}

/// One student's check-in against a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub session_id: i64,
    pub student_id: String,
    pub student_name: String,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting an attendance record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendanceRecord {
    pub session_id: i64,
    pub student_id: String,
    pub student_name: String,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: AttendanceStatus,
}

/// Student check-in payload, submitted after scanning a session token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckInRequest {
    #[validate(
        length(min = 1, max = 128, message = "token_qr must be 1-128 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub token_qr: String,

    #[validate(
        length(min = 1, max = 32, message = "nim must be 1-32 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub nim: String,

    #[validate(
        length(min = 1, max = 150, message = "nama_mahasiswa must be 1-150 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub nama_mahasiswa: String,

    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: Option<f64>,
}

/// Lecturer override of a roster entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AttendanceStatus,
}

/// Attendance record as returned over the wire.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceResponse {
    pub presensi_id: i64,
    pub jadwal_id: i64,
    pub nim: String,
    pub nama_mahasiswa: String,
    pub waktu: Option<DateTime<Utc>>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub status: AttendanceStatus,
}

impl From<AttendanceRecord> for AttendanceResponse {
    fn from(r: AttendanceRecord) -> Self {
        Self {
            presensi_id: r.id,
            jadwal_id: r.session_id,
            nim: r.student_id,
            nama_mahasiswa: r.student_name,
            waktu: r.checked_in_at,
            lat: r.latitude,
            lng: r.longitude,
            status: r.status,
        }
    }
}
