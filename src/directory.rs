use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::models::{
    Activity, ActivityAttendance, ActivityReportEntry, StudentAttendance, StudentReport,
};


/// Failures surfaced to the caller. Unknown activity maps to 404,
/// everything else is a 400 state conflict.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Activity not found")]
    ActivityNotFound,
    #[error("Student is already signed up")]
    AlreadySignedUp,
    #[error("Student is not signed up for this activity")]
    NotSignedUp,
    #[error("Student attendance already recorded for this date")]
    AttendanceAlreadyRecorded,
}

/// The in-memory activity registry
/// Seeded once at startup; activities are never created or deleted at runtime
pub struct ActivityDirectory {
    activities: BTreeMap<String, Activity>,
}

impl ActivityDirectory {
    /// The fixed Mergington High School roster
    pub fn seeded() -> Self {
        let mut activities = BTreeMap::new();
        activities.insert(
            "Chess Club".to_string(),
            activity(
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
                &["michael@mergington.edu", "daniel@mergington.edu"],
                "Games",
                1.5,
            ),
        );
        activities.insert(
            "Programming Class".to_string(),
            activity(
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
                &["emma@mergington.edu", "sophia@mergington.edu"],
                "Academic",
                1.0,
            ),
        );
        activities.insert(
            "Gym Class".to_string(),
            activity(
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
                &["john@mergington.edu", "olivia@mergington.edu"],
                "Sports",
                1.0,
            ),
        );
        activities.insert(
            "Soccer Team".to_string(),
            activity(
                "Join the school soccer team and compete in matches",
                "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
                22,
                &["liam@mergington.edu", "noah@mergington.edu"],
                "Sports",
                1.5,
            ),
        );
        activities.insert(
            "Basketball Team".to_string(),
            activity(
                "Practice and play basketball with the school team",
                "Wednesdays and Fridays, 3:30 PM - 5:00 PM",
                15,
                &["ava@mergington.edu", "mia@mergington.edu"],
                "Sports",
                1.5,
            ),
        );
        activities.insert(
            "Art Club".to_string(),
            activity(
                "Explore your creativity through painting and drawing",
                "Thursdays, 3:30 PM - 5:00 PM",
                15,
                &["amelia@mergington.edu", "harper@mergington.edu"],
                "Arts",
                1.5,
            ),
        );
        activities.insert(
            "Drama Club".to_string(),
            activity(
                "Act, direct, and produce plays and performances",
                "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
                20,
                &["ella@mergington.edu", "scarlett@mergington.edu"],
                "Arts",
                1.5,
            ),
        );
        activities.insert(
            "Math Club".to_string(),
            activity(
                "Solve challenging problems and participate in math competitions",
                "Tuesdays, 3:30 PM - 4:30 PM",
                10,
                &["james@mergington.edu", "benjamin@mergington.edu"],
                "Academic",
                1.0,
            ),
        );
        activities.insert(
            "Debate Team".to_string(),
            activity(
                "Develop public speaking and argumentation skills",
                "Fridays, 4:00 PM - 5:30 PM",
                12,
                &["charlotte@mergington.edu", "henry@mergington.edu"],
                "Academic",
                1.5,
            ),
        );

        Self { activities }
    }

    pub fn all(&self) -> &BTreeMap<String, Activity> {
        &self.activities
    }

    fn get(&self, name: &str) -> Result<&Activity, DirectoryError> {
        self.activities.get(name).ok_or(DirectoryError::ActivityNotFound)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Activity, DirectoryError> {
        self.activities
            .get_mut(name)
            .ok_or(DirectoryError::ActivityNotFound)
    }

    /// Distinct category values, sorted
    pub fn categories(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .activities
            .values()
            .map(|a| a.category.as_str())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    /// Exact case-sensitive category match. `None` and the "All" sentinel
    /// both return the whole directory; an unmatched category yields an
    /// empty map rather than an error.
    pub fn filter_by_category(&self, category: Option<&str>) -> BTreeMap<String, Activity> {
        match category {
            None | Some("All") => self.activities.clone(),
            Some(cat) => self
                .activities
                .iter()
                .filter(|(_, a)| a.category == cat)
                .map(|(name, a)| (name.clone(), a.clone()))
                .collect(),
        }
    }

    /// Append the student to the roster. Capacity (`max_participants`) is
    /// stored but intentionally not checked here, matching the original
    /// service contract.
    pub fn sign_up(&mut self, name: &str, email: &str) -> Result<(), DirectoryError> {
        let activity = self.get_mut(name)?;
        if activity.is_participant(email) {
            return Err(DirectoryError::AlreadySignedUp);
        }
        activity.participants.push(email.to_string());
        Ok(())
    }

    /// Remove the student from the roster only; attendance history is
    /// deliberately left in place.
    pub fn unregister(&mut self, name: &str, email: &str) -> Result<(), DirectoryError> {
        let activity = self.get_mut(name)?;
        let idx = activity
            .participants
            .iter()
            .position(|p| p == email)
            .ok_or(DirectoryError::NotSignedUp)?;
        activity.participants.remove(idx);
        Ok(())
    }

    pub fn record_attendance(
        &mut self,
        name: &str,
        email: &str,
        date: &str,
    ) -> Result<(), DirectoryError> {
        let activity = self.get_mut(name)?;
        if !activity.is_participant(email) {
            return Err(DirectoryError::NotSignedUp);
        }
        let attendees = activity
            .attendance_records
            .entry(date.to_string())
            .or_default();
        if attendees.iter().any(|a| a == email) {
            return Err(DirectoryError::AttendanceAlreadyRecorded);
        }
        attendees.push(email.to_string());
        Ok(())
    }

    pub fn student_attendance(
        &self,
        name: &str,
        email: &str,
    ) -> Result<StudentAttendance, DirectoryError> {
        let activity = self.get(name)?;
        if !activity.is_participant(email) {
            return Err(DirectoryError::NotSignedUp);
        }

        let attended_dates: Vec<String> = activity
            .attendance_records
            .iter()
            .filter(|(_, attendees)| attendees.iter().any(|a| a == email))
            .map(|(date, _)| date.clone())
            .collect();

        let total_sessions = attended_dates.len();
        Ok(StudentAttendance {
            student: email.to_string(),
            activity: name.to_string(),
            attended_dates,
            total_sessions,
            total_hours: total_sessions as f64 * activity.duration_per_session,
        })
    }

    pub fn activity_attendance(&self, name: &str) -> Result<ActivityAttendance, DirectoryError> {
        let activity = self.get(name)?;
        Ok(ActivityAttendance {
            activity: name.to_string(),
            attendance_records: activity.attendance_records.clone(),
            session_duration: activity.duration_per_session,
        })
    }

    /// Per-activity session counts and hours for every activity the student
    /// is currently enrolled in. Attendance left behind after an unregister
    /// does not count.
    pub fn student_report(&self, email: &str) -> StudentReport {
        let mut entries = BTreeMap::new();
        let mut total_hours = 0.0;

        for (name, activity) in &self.activities {
            if !activity.is_participant(email) {
                continue;
            }
            let attended_sessions = activity.sessions_attended(email);
            let hours = attended_sessions as f64 * activity.duration_per_session;
            total_hours += hours;
            entries.insert(
                name.clone(),
                ActivityReportEntry {
                    category: activity.category.clone(),
                    attended_sessions,
                    hours,
                },
            );
        }

        StudentReport {
            student: email.to_string(),
            total_activities: entries.len(),
            activities: entries,
            total_hours,
        }
    }
}

fn activity(
    description: &str,
    schedule: &str,
    max_participants: u32,
    participants: &[&str],
    category: &str,
    duration_per_session: f64,
) -> Activity {
    Activity {
        description: description.to_string(),
        schedule: schedule.to_string(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
        category: category.to_string(),
        duration_per_session,
        attendance_records: BTreeMap::new(),
    }
}
