use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An extracurricular activity: description, schedule, roster,
/// and a per-date attendance ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
    pub category: String,
    pub duration_per_session: f64,
    pub attendance_records: BTreeMap<String, Vec<String>>,
}

impl Activity {
    pub fn is_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    /// Number of distinct dates this student was recorded present
    pub fn sessions_attended(&self, email: &str) -> usize {
        self.attendance_records
            .values()
            .filter(|attendees| attendees.iter().any(|a| a == email))
            .count()
    }
}

/// Query parameters carrying a required student email
#[derive(Debug, Deserialize)]
pub struct EmailParams {
    pub email: String,
}

/// Query parameters for recording attendance
#[derive(Debug, Deserialize)]
pub struct AttendanceParams {
    pub email: String,
    pub date: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct CategoryFilter {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AttendanceQuery {
    pub email: Option<String>,
}

/// Confirmation payload for write operations
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

/// Attendance summary for one student in one activity
#[derive(Debug, Serialize)]
pub struct StudentAttendance {
    pub student: String,
    pub activity: String,
    pub attended_dates: Vec<String>,
    pub total_sessions: usize,
    pub total_hours: f64,
}

/// Full per-date attendance ledger for one activity
#[derive(Debug, Serialize)]
pub struct ActivityAttendance {
    pub activity: String,
    pub attendance_records: BTreeMap<String, Vec<String>>,
    pub session_duration: f64,
}

#[derive(Debug, Serialize)]
pub struct ActivityReportEntry {
    pub category: String,
    pub attended_sessions: usize,
    pub hours: f64,
}

/// Cross-activity hours report for one student
#[derive(Debug, Serialize)]
pub struct StudentReport {
    pub student: String,
    pub activities: BTreeMap<String, ActivityReportEntry>,
    pub total_activities: usize,
    pub total_hours: f64,
}
