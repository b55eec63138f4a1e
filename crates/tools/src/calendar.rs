//! Calendar tools: Google Calendar v3 over REST.
//!
//! `setup_credentials` loads a stored OAuth access token for the student and
//! must run before the other calendar tools; until then they report that the
//! service is not initialized. Every outcome, failures included, is returned
//! as a `{success, message, ..}` object for the model to read.

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use switchyard_config::CalendarConfig;
use switchyard_core::error::ToolError;
use switchyard_core::tool::{ParamSpec, Tool, ToolOutput};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Hours covered by `get_events` when no upper bound is given.
const DEFAULT_WINDOW_HOURS: i64 = 3;

/// The signed-in student.
#[derive(Debug, Clone)]
struct CalendarSession {
    user: String,
    access_token: String,
}

/// Shared state of the calendar tools.
pub struct CalendarService {
    client: reqwest::Client,
    api_url: String,
    calendar_id: String,
    credentials_dir: PathBuf,
    default_timezone: String,
    session: Mutex<Option<CalendarSession>>,
}

impl CalendarService {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
            credentials_dir: config.credentials_dir.clone(),
            default_timezone: config.default_timezone.clone(),
            session: Mutex::new(None),
        }
    }

    /// Path of the stored token for an email address: `<dir>/<local-part>_token.json`.
    pub fn token_path(&self, email: &str) -> PathBuf {
        let local = email.split('@').next().unwrap_or(email);
        self.credentials_dir.join(format!("{local}_token.json"))
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.api_url, self.calendar_id)
    }

    /// URL of one event. The id comes from the model, so it is pushed as a
    /// single escaped path segment.
    fn event_url(&self, event_id: &str) -> Result<reqwest::Url, String> {
        let base = self.events_url();
        let mut url = reqwest::Url::parse(&base).map_err(|e| format!("invalid calendar URL '{base}': {e}"))?;
        url.path_segments_mut()
            .map_err(|()| format!("calendar URL '{base}' cannot take a path"))?
            .push(event_id);
        Ok(url)
    }

    async fn current(&self) -> Option<CalendarSession> {
        self.session.lock().await.clone()
    }

    pub async fn setup_credentials(&self, email: &str) -> Value {
        let path = self.token_path(email);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                return json!({
                    "success": false,
                    "message": format!("No stored token for {email} at {}: {e}", path.display()),
                });
            }
        };

        let token: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                return json!({
                    "success": false,
                    "message": format!("Error setting up credentials: {e}"),
                });
            }
        };

        // Google's authorized-user files call it "token"
        let Some(access_token) = token["access_token"]
            .as_str()
            .or_else(|| token["token"].as_str())
        else {
            return json!({
                "success": false,
                "message": format!("Token file {} has no access token", path.display()),
            });
        };

        *self.session.lock().await = Some(CalendarSession {
            user: email.to_string(),
            access_token: access_token.to_string(),
        });
        info!(user = %email, "Calendar credentials loaded");

        json!({
            "success": true,
            "message": format!("Successfully set up credentials for {email}"),
        })
    }

    pub async fn create_event(&self, event: NewEvent) -> Value {
        let Some(session) = self.current().await else {
            return not_initialized();
        };

        let mut body = json!({
            "summary": event.summary,
            "start": { "dateTime": event.start, "timeZone": event.timezone },
            "end": { "dateTime": event.end, "timeZone": event.timezone },
        });
        if let Some(description) = &event.description {
            body["description"] = json!(description);
        }
        if let Some(location) = &event.location {
            body["location"] = json!(location);
        }
        if let Some(rule) = &event.recurrence {
            body["recurrence"] = json!([rule]);
        }

        let result = self
            .client
            .post(self.events_url())
            .bearer_auth(&session.access_token)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let created: Value = match result {
            Ok(response) => match response.json().await {
                Ok(created) => created,
                Err(e) => {
                    warn!(error = %e, "Calendar returned an unreadable event body");
                    return json!({
                        "success": false,
                        "error": "event_creation_failed",
                        "message": format!(
                            "Event '{}' may have been created, but the calendar response could not be read: {e}",
                            event.summary
                        ),
                    });
                }
            },
            Err(e) => {
                warn!(error = %e, "Calendar event creation failed");
                return json!({
                    "success": false,
                    "error": "event_creation_failed",
                    "message": format!("Failed to create event '{}': {e}", event.summary),
                });
            }
        };

        debug!(summary = %event.summary, "Calendar event created");
        json!({
            "success": true,
            "event_id": created["id"],
            "user": session.user,
            "summary": event.summary,
            "start_time": event.start,
            "end_time": event.end,
            "timezone": event.timezone,
            "message": format!(
                "Successfully created event '{}' from {} to {}",
                event.summary, event.start, event.end
            ),
        })
    }

    pub async fn delete_event(&self, event_id: &str, delete_series: bool) -> Value {
        let Some(session) = self.current().await else {
            return not_initialized();
        };
        let deletion_failed = |reason: String| {
            json!({
                "success": false,
                "error": "event_deletion_failed",
                "message": format!("Failed to delete event '{event_id}': {reason}"),
            })
        };
        let lookup_url = match self.event_url(event_id) {
            Ok(url) => url,
            Err(e) => return deletion_failed(e),
        };

        // Look the event up first for a friendlier message and its series id
        let existing: Value = match self
            .client
            .get(lookup_url)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response.json().await.unwrap_or(Value::Null),
            Err(_) => Value::Null,
        };
        let summary = existing["summary"].as_str().unwrap_or("Unknown Event").to_string();
        let start = existing["start"]["dateTime"]
            .as_str()
            .unwrap_or("Unknown time")
            .to_string();

        let target = match existing["recurringEventId"].as_str() {
            Some(parent) if delete_series => parent.to_string(),
            _ => event_id.to_string(),
        };

        let target_url = match self.event_url(&target) {
            Ok(url) => url,
            Err(e) => return deletion_failed(e),
        };

        let response = match self
            .client
            .delete(target_url)
            .bearer_auth(&session.access_token)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return deletion_failed(e.to_string()),
        };

        let status = response.status();
        if status.as_u16() == 404 || status.as_u16() == 410 {
            return json!({
                "success": false,
                "error": "event_not_found",
                "message": format!("Event with ID '{event_id}' not found or already deleted"),
            });
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, "Calendar event deletion failed");
            return deletion_failed(format!("{status} {detail}"));
        }

        json!({
            "success": true,
            "event_id": target,
            "user": session.user,
            "deleted_event": summary,
            "start_time": start,
            "message": format!("Successfully deleted event '{summary}' (ID: {target})"),
        })
    }

    pub async fn get_events(&self, time_min: Option<String>, time_max: Option<String>) -> Value {
        let Some(session) = self.current().await else {
            return not_initialized();
        };

        let now = Utc::now();
        let time_min = time_min.unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Secs, true));
        let time_max = time_max.unwrap_or_else(|| {
            (now + Duration::hours(DEFAULT_WINDOW_HOURS)).to_rfc3339_opts(SecondsFormat::Secs, true)
        });

        let result = self
            .client
            .get(self.events_url())
            .bearer_auth(&session.access_token)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let listing: Value = match result {
            Ok(response) => match response.json().await {
                Ok(v) => v,
                Err(e) => return fetch_failed(e),
            },
            Err(e) => return fetch_failed(e),
        };

        let events: Vec<Value> = listing["items"]
            .as_array()
            .map(|items| items.iter().map(format_event).collect())
            .unwrap_or_default();

        let message = if events.is_empty() {
            "No events found".to_string()
        } else {
            format!("Found {} events", events.len())
        };
        json!({
            "success": true,
            "user": session.user,
            "events_count": events.len(),
            "events": events,
            "message": message,
        })
    }
}

/// Arguments of `create_event`.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub summary: String,
    pub start: String,
    pub end: String,
    pub timezone: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub recurrence: Option<String>,
}

fn not_initialized() -> Value {
    json!({
        "success": false,
        "error": "service_not_initialized",
        "message": "Service not initialized. Call setup_credentials first.",
    })
}

fn fetch_failed(e: reqwest::Error) -> Value {
    warn!(error = %e, "Calendar listing failed");
    json!({
        "success": false,
        "error": "events_fetch_failed",
        "message": format!("Failed to fetch events: {e}"),
    })
}

fn format_event(event: &Value) -> Value {
    let when = |key: &str, missing: &str| {
        event[key]["dateTime"]
            .as_str()
            .or_else(|| event[key]["date"].as_str())
            .unwrap_or(missing)
            .to_string()
    };
    json!({
        "id": event["id"],
        "summary": event["summary"].as_str().unwrap_or("No title"),
        "start": when("start", "No start time"),
        "end": when("end", "No end time"),
        "description": event["description"].as_str().unwrap_or(""),
        "location": event["location"].as_str().unwrap_or(""),
        "recurrence": event.get("recurrence").cloned().unwrap_or_else(|| json!([])),
        "recurringEventId": event["recurringEventId"],
    })
}

fn required_str<'a>(arguments: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    arguments[key]
        .as_str()
        .ok_or_else(|| ToolError::InvalidArguments(format!("Missing '{key}' argument")))
}

fn optional_str(arguments: &Value, key: &str) -> Option<String> {
    arguments[key]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// `setup_credentials(email: str)`
pub struct SetupCredentialsTool {
    service: Arc<CalendarService>,
}

impl SetupCredentialsTool {
    pub fn new(service: Arc<CalendarService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SetupCredentialsTool {
    fn name(&self) -> &str {
        "setup_credentials"
    }

    fn description(&self) -> &str {
        "Sign in to the student's Google Calendar. Must be called once with the \
         student's email address before any other calendar tool."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required("email", "str")]
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let email = required_str(&arguments, "email")?;
        Ok(ToolOutput::Data(self.service.setup_credentials(email).await))
    }
}

/// `create_event(summary, start, end, timezone, description, location, recurrence)`
pub struct CreateEventTool {
    service: Arc<CalendarService>,
}

impl CreateEventTool {
    pub fn new(service: Arc<CalendarService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for CreateEventTool {
    fn name(&self) -> &str {
        "create_event"
    }

    fn description(&self) -> &str {
        "Create an event in the student's calendar. start and end are RFC 3339 \
         date-times without offset (e.g. 2025-01-15T09:30:00), interpreted in \
         timezone. recurrence is an RRULE line such as \
         RRULE:FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=20250501T000000Z."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("summary", "str"),
            ParamSpec::required("start", "str"),
            ParamSpec::required("end", "str"),
            ParamSpec::optional("timezone", "str", json!(self.service.default_timezone)),
            ParamSpec::optional("description", "Option<str>", Value::Null),
            ParamSpec::optional("location", "Option<str>", Value::Null),
            ParamSpec::optional("recurrence", "Option<str>", Value::Null),
        ]
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let event = NewEvent {
            summary: required_str(&arguments, "summary")?.to_string(),
            start: required_str(&arguments, "start")?.to_string(),
            end: required_str(&arguments, "end")?.to_string(),
            timezone: optional_str(&arguments, "timezone")
                .unwrap_or_else(|| self.service.default_timezone.clone()),
            description: optional_str(&arguments, "description"),
            location: optional_str(&arguments, "location"),
            recurrence: optional_str(&arguments, "recurrence"),
        };
        Ok(ToolOutput::Data(self.service.create_event(event).await))
    }
}

/// `delete_event(event_id: str, delete_series: bool = False)`
pub struct DeleteEventTool {
    service: Arc<CalendarService>,
}

impl DeleteEventTool {
    pub fn new(service: Arc<CalendarService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for DeleteEventTool {
    fn name(&self) -> &str {
        "delete_event"
    }

    fn description(&self) -> &str {
        "Delete an event from the student's calendar by id. With delete_series, an \
         occurrence of a recurring event removes the whole series."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("event_id", "str"),
            ParamSpec::optional("delete_series", "bool", json!(false)),
        ]
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let event_id = required_str(&arguments, "event_id")?;
        let delete_series = arguments["delete_series"].as_bool().unwrap_or(false);
        Ok(ToolOutput::Data(
            self.service.delete_event(event_id, delete_series).await,
        ))
    }
}

/// `get_events(time_min: Optional[str] = None, time_max: Optional[str] = None)`
pub struct GetEventsTool {
    service: Arc<CalendarService>,
}

impl GetEventsTool {
    pub fn new(service: Arc<CalendarService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetEventsTool {
    fn name(&self) -> &str {
        "get_events"
    }

    fn description(&self) -> &str {
        "List events in the student's calendar between time_min and time_max \
         (RFC 3339 with offset, e.g. 2025-01-15T00:00:00Z). Defaults to the next \
         three hours."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::optional("time_min", "Option<str>", Value::Null),
            ParamSpec::optional("time_max", "Option<str>", Value::Null),
        ]
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::Data(
            self.service
                .get_events(
                    optional_str(&arguments, "time_min"),
                    optional_str(&arguments, "time_max"),
                )
                .await,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Fixture {
        _creds: tempfile::TempDir,
        server: MockServer,
        service: Arc<CalendarService>,
    }

    async fn fixture() -> Fixture {
        let creds = tempfile::tempdir().unwrap();
        std::fs::write(
            creds.path().join("gburdell3_token.json"),
            r#"{"access_token": "ya29.test", "refresh_token": "r"}"#,
        )
        .unwrap();
        let server = MockServer::start().await;
        let service = Arc::new(CalendarService::new(&CalendarConfig {
            credentials_dir: creds.path().to_path_buf(),
            calendar_id: "primary".into(),
            default_timezone: "America/New_York".into(),
            api_url: server.uri(),
        }));
        Fixture {
            _creds: creds,
            server,
            service,
        }
    }

    async fn signed_in() -> Fixture {
        let fx = fixture().await;
        let out = fx.service.setup_credentials("gburdell3@gatech.edu").await;
        assert_eq!(out["success"], true);
        fx
    }

    #[tokio::test]
    async fn tools_require_setup() {
        let fx = fixture().await;
        let out = GetEventsTool::new(fx.service.clone())
            .execute(json!({}))
            .await
            .unwrap();
        assert_eq!(
            out,
            ToolOutput::Data(json!({
                "success": false,
                "error": "service_not_initialized",
                "message": "Service not initialized. Call setup_credentials first.",
            }))
        );
        let out = fx.service.delete_event("abc", false).await;
        assert_eq!(out["error"], "service_not_initialized");
    }

    #[tokio::test]
    async fn setup_reads_token_by_local_part() {
        let fx = fixture().await;
        assert!(fx.service.token_path("gburdell3@gatech.edu").ends_with("gburdell3_token.json"));

        let out = SetupCredentialsTool::new(fx.service.clone())
            .execute(json!({"email": "gburdell3@gatech.edu"}))
            .await
            .unwrap();
        let ToolOutput::Data(out) = out else { panic!() };
        assert_eq!(out["success"], true);
        assert_eq!(out["message"], "Successfully set up credentials for gburdell3@gatech.edu");

        let missing = fx.service.setup_credentials("nobody@gatech.edu").await;
        assert_eq!(missing["success"], false);
    }

    #[tokio::test]
    async fn create_event_posts_body() {
        let fx = signed_in().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header("Authorization", "Bearer ya29.test"))
            .and(body_partial_json(json!({
                "summary": "CS 6515 study group",
                "start": {"dateTime": "2025-01-15T09:30:00", "timeZone": "America/New_York"},
                "recurrence": ["RRULE:FREQ=WEEKLY;COUNT=4"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "evt123"})))
            .expect(1)
            .mount(&fx.server)
            .await;

        let out = CreateEventTool::new(fx.service.clone())
            .execute(json!({
                "summary": "CS 6515 study group",
                "start": "2025-01-15T09:30:00",
                "end": "2025-01-15T10:30:00",
                "recurrence": "RRULE:FREQ=WEEKLY;COUNT=4",
            }))
            .await
            .unwrap();
        let ToolOutput::Data(out) = out else { panic!() };
        assert_eq!(out["success"], true);
        assert_eq!(out["event_id"], "evt123");
        assert_eq!(out["timezone"], "America/New_York");
        assert_eq!(out["user"], "gburdell3@gatech.edu");
    }

    #[tokio::test]
    async fn create_event_failure_is_data() {
        let fx = signed_in().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&fx.server)
            .await;
        let out = fx
            .service
            .create_event(NewEvent {
                summary: "x".into(),
                start: "bad".into(),
                end: "bad".into(),
                timezone: "UTC".into(),
                description: None,
                location: None,
                recurrence: None,
            })
            .await;
        assert_eq!(out["success"], false);
        assert_eq!(out["error"], "event_creation_failed");
    }

    #[tokio::test]
    async fn delete_series_targets_parent() {
        let fx = signed_in().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/occ_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "occ_1",
                "summary": "Office hours",
                "start": {"dateTime": "2025-01-15T09:30:00-05:00"},
                "recurringEventId": "series_9",
            })))
            .mount(&fx.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/series_9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&fx.server)
            .await;

        let out = DeleteEventTool::new(fx.service.clone())
            .execute(json!({"event_id": "occ_1", "delete_series": true}))
            .await
            .unwrap();
        let ToolOutput::Data(out) = out else { panic!() };
        assert_eq!(out["success"], true);
        assert_eq!(out["event_id"], "series_9");
        assert_eq!(out["deleted_event"], "Office hours");
    }

    #[tokio::test]
    async fn create_event_with_unreadable_body_is_failure() {
        let fx = signed_in().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&fx.server)
            .await;
        let out = fx
            .service
            .create_event(NewEvent {
                summary: "Advising".into(),
                start: "2025-01-15T09:30:00".into(),
                end: "2025-01-15T10:00:00".into(),
                timezone: "UTC".into(),
                description: None,
                location: None,
                recurrence: None,
            })
            .await;
        assert_eq!(out["success"], false);
        assert_eq!(out["error"], "event_creation_failed");
        assert!(out["message"].as_str().unwrap().contains("Advising"));
    }

    #[tokio::test]
    async fn event_id_is_a_single_path_segment() {
        let fx = signed_in().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/a%2Fb%3Fc%23d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "a/b?c#d",
                "summary": "Odd id",
            })))
            .expect(1)
            .mount(&fx.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/a%2Fb%3Fc%23d"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&fx.server)
            .await;

        let out = fx.service.delete_event("a/b?c#d", false).await;
        assert_eq!(out["success"], true);
        assert_eq!(out["deleted_event"], "Odd id");
    }

    #[test]
    fn event_url_escapes_reserved_characters() {
        let service = CalendarService::new(&CalendarConfig {
            api_url: "https://calendar.example/v3/".into(),
            ..CalendarConfig::default()
        });
        let url = service.event_url("x/../y").unwrap();
        assert_eq!(url.path(), "/v3/calendars/primary/events/x%2F..%2Fy");
    }

    #[tokio::test]
    async fn delete_missing_event() {
        let fx = signed_in().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&fx.server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&fx.server)
            .await;

        let out = fx.service.delete_event("gone", false).await;
        assert_eq!(out["success"], false);
        assert_eq!(out["error"], "event_not_found");
    }

    #[tokio::test]
    async fn get_events_formats_items() {
        let fx = signed_in().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("orderBy", "startTime"))
            .and(query_param("timeMin", "2025-01-15T00:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "a", "summary": "Lecture", "start": {"dateTime": "2025-01-15T09:30:00-05:00"},
                     "end": {"dateTime": "2025-01-15T10:45:00-05:00"}},
                    {"id": "b", "start": {"date": "2025-01-16"}, "end": {"date": "2025-01-17"}}
                ]
            })))
            .mount(&fx.server)
            .await;

        let out = fx
            .service
            .get_events(Some("2025-01-15T00:00:00Z".into()), Some("2025-01-18T00:00:00Z".into()))
            .await;
        assert_eq!(out["success"], true);
        assert_eq!(out["events_count"], 2);
        assert_eq!(out["events"][0]["summary"], "Lecture");
        assert_eq!(out["events"][1]["summary"], "No title");
        assert_eq!(out["events"][1]["start"], "2025-01-16");
        assert_eq!(out["events"][1]["recurrence"], json!([]));
    }

    #[tokio::test]
    async fn get_events_empty() {
        let fx = signed_in().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&fx.server)
            .await;
        let out = fx.service.get_events(None, None).await;
        assert_eq!(out["events_count"], 0);
        assert_eq!(out["message"], "No events found");
    }

    #[test]
    fn optional_parameters_have_defaults() {
        let service = Arc::new(CalendarService::new(&CalendarConfig::default()));
        let schema = switchyard_core::derive_schema(&CreateEventTool::new(service)).unwrap();
        assert_eq!(schema.required(), vec!["summary", "start", "end"]);
    }
}
