//! Roster aggregation for a single session.

use serde::Serialize;

use crate::models::{AttendanceRecord, AttendanceStatus, Session};

/// Per-status head count of a session roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterSummary {
    pub jadwal_id: i64,
    /// Expected headcount configured on the session.
    pub jumlah: i32,
    /// Number of attendance records on the roster.
    pub total: usize,
    pub hadir: usize,
    pub izin: usize,
    pub sakit: usize,
    pub alpha: usize,
}

impl RosterSummary {
    pub fn count(&self, status: AttendanceStatus) -> usize {
        match status {
            AttendanceStatus::Present => self.hadir,
            AttendanceStatus::Excused => self.izin,
            AttendanceStatus::Sick => self.sakit,
            AttendanceStatus::Absent => self.alpha,
        }
    }
}

/// Counts the records of `session` by status.
///
/// Records belonging to another session are ignored.
pub fn summarize(session: &Session, records: &[AttendanceRecord]) -> RosterSummary {
    let mut summary = RosterSummary {
        jadwal_id: session.id,
        jumlah: session.headcount,
        total: 0,
        hadir: 0,
        izin: 0,
        sakit: 0,
        alpha: 0,
    };

    for record in records.iter().filter(|r| r.session_id == session.id) {
        summary.total += 1;
        match record.status {
            AttendanceStatus::Present => summary.hadir += 1,
            AttendanceStatus::Excused => summary.izin += 1,
            AttendanceStatus::Sick => summary.sakit += 1,
            AttendanceStatus::Absent => summary.alpha += 1,
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn session(id: i64) -> Session {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        Session {
            id,
            course_code: "TIK201".into(),
            course_name: "Basis Data".into(),
            instructor_id: Uuid::new_v4(),
            start,
            end: start + chrono::Duration::hours(2),
            description: None,
            headcount: 30,
            token: "QR-1-abc123".into(),
            closed_at: None,
            created_at: start,
            updated_at: start,
        }
    }

    fn record(id: i64, session_id: i64, status: AttendanceStatus) -> AttendanceRecord {
        let now = Utc::now();
        AttendanceRecord {
            id,
            session_id,
            student_id: format!("S{id}"),
            student_name: "Mahasiswa".into(),
            checked_in_at: Some(now),
            latitude: None,
            longitude: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summarize_counts_by_status() {
        let records = vec![
            record(1, 1, AttendanceStatus::Present),
            record(2, 1, AttendanceStatus::Present),
            record(3, 1, AttendanceStatus::Sick),
            record(4, 1, AttendanceStatus::Absent),
            record(5, 2, AttendanceStatus::Excused),
        ];

        let summary = summarize(&session(1), &records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.jumlah, 30);
        assert_eq!(summary.count(AttendanceStatus::Present), 2);
        assert_eq!(summary.count(AttendanceStatus::Excused), 0);
        assert_eq!(summary.count(AttendanceStatus::Sick), 1);
        assert_eq!(summary.count(AttendanceStatus::Absent), 1);
    }

    #[test]
    fn test_summarize_empty_roster() {
        let summary = summarize(&session(9), &[]);
        assert_eq!(summary.jadwal_id, 9);
        assert_eq!(summary.total, 0);
    }
}
