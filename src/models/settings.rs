use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMAIL_SUBJECT: &str = "Prašau apmokėti už viršvalandžius";

pub const DEFAULT_EMAIL_TEMPLATE: &str = r#"<html>
<body>
    <h2>Darbo viršvalandžių ataskaita</h2>
    <p><strong>Data:</strong> {date}</p>
    <p><strong>Darbo pradžia:</strong> {start_time}</p>
    <p><strong>Darbo pabaiga:</strong> {end_time}</p>
    <p><strong>Viršvalandžiai:</strong> {overtime_hours} val. ({overtime_minutes} min.)</p>
    <br>
    <p>Prašau apmokėti už viršvalandžius.</p>
    <p>Pridėtos {photo_count} darbo nuotraukos.</p>
</body>
</html>"#;

/// Workplace coordinates. Stored only, no geofence logic runs server-side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_radius", alias = "radius", alias = "radius_meters")]
    pub radius_meters: f64,
}

fn default_radius() -> f64 {
    100.0
}

/// Singleton application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub reminder_interval_min: i64,
    pub reminder_duration_sec: i64,
    pub work_location: Option<WorkLocation>,
    pub recipient_email: String,
    pub email_subject: String,
    pub email_body_template: String,
    pub overtime_threshold_minutes: i64,
    pub auto_send_on_geofence: bool,
    pub timezone_offset_hours: i32,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reminder_interval_min: 15,
            reminder_duration_sec: 10,
            work_location: None,
            recipient_email: String::new(),
            email_subject: DEFAULT_EMAIL_SUBJECT.to_string(),
            email_body_template: DEFAULT_EMAIL_TEMPLATE.to_string(),
            overtime_threshold_minutes: 5,
            auto_send_on_geofence: false,
            timezone_offset_hours: 2,
            updated_at: None,
        }
    }
}

/// Partial update: only `Some` fields overwrite.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(alias = "reminder_interval", alias = "reminder_interval_min")]
    pub reminder_interval_min: Option<i64>,
    #[serde(alias = "reminder_duration", alias = "reminder_duration_sec")]
    pub reminder_duration_sec: Option<i64>,
    #[serde(alias = "work_location")]
    pub work_location: Option<WorkLocation>,
    #[serde(alias = "recipient_email")]
    pub recipient_email: Option<String>,
    #[serde(alias = "email_subject")]
    pub email_subject: Option<String>,
    #[serde(alias = "email_body_template")]
    pub email_body_template: Option<String>,
    #[serde(alias = "overtime_threshold_minutes")]
    pub overtime_threshold_minutes: Option<i64>,
    #[serde(alias = "auto_send_on_geofence", alias = "auto_send_email_on_geofence")]
    pub auto_send_on_geofence: Option<bool>,
    #[serde(alias = "timezone_offset_hours")]
    pub timezone_offset_hours: Option<i32>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.reminder_interval_min.is_none()
            && self.reminder_duration_sec.is_none()
            && self.work_location.is_none()
            && self.recipient_email.is_none()
            && self.email_subject.is_none()
            && self.email_body_template.is_none()
            && self.overtime_threshold_minutes.is_none()
            && self.auto_send_on_geofence.is_none()
            && self.timezone_offset_hours.is_none()
    }

    pub fn apply(self, s: &mut Settings) {
        if let Some(v) = self.reminder_interval_min {
            s.reminder_interval_min = v;
        }
        if let Some(v) = self.reminder_duration_sec {
            s.reminder_duration_sec = v;
        }
        if let Some(v) = self.work_location {
            s.work_location = Some(v);
        }
        if let Some(v) = self.recipient_email {
            s.recipient_email = v;
        }
        if let Some(v) = self.email_subject {
            s.email_subject = v;
        }
        if let Some(v) = self.email_body_template {
            s.email_body_template = v;
        }
        if let Some(v) = self.overtime_threshold_minutes {
            s.overtime_threshold_minutes = v;
        }
        if let Some(v) = self.auto_send_on_geofence {
            s.auto_send_on_geofence = v;
        }
        if let Some(v) = self.timezone_offset_hours {
            s.timezone_offset_hours = v;
        }
    }
}
