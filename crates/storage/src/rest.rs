//! REST client
//!
//! All data is owned by the backend. Requests other than login and registration carry the bearer
//! token stored by the credential repository. A rejected token is discarded, so that the session
//! must be requested again.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::json;

use gymlog_domain as domain;

use crate::local_storage::Token;

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    /// Send a request and return the response.
    ///
    /// An error is returned only if no response could be received.
    async fn send_request(&self, request: Request) -> Result<Response, String>;
}

pub trait CredentialRepository {
    fn read_token(&self) -> Option<String>;
    fn write_token(&self, token: &str) -> Result<(), String>;
    fn delete_token(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub token: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl Response {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The error message provided by the backend, if any.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct ErrorBody {
            detail: serde_json::Value,
        }

        match serde_json::from_str::<ErrorBody>(&self.body).ok()?.detail {
            serde_json::Value::String(detail) => Some(detail),
            serde_json::Value::Null => None,
            detail => Some(detail.to_string()),
        }
    }

    fn error_message(&self) -> String {
        self.detail()
            .unwrap_or_else(|| format!("{} {}", self.status, self.status_text))
    }
}

#[derive(Clone, Copy, Default)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, String> {
        let builder = match request.method {
            Method::Get => gloo_net::http::Request::get(&request.url),
            Method::Post => gloo_net::http::Request::post(&request.url),
            Method::Patch => gloo_net::http::Request::patch(&request.url),
            Method::Delete => gloo_net::http::Request::delete(&request.url),
        };
        let builder = match request.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        };
        let request = match request.body {
            Some(body) => builder.json(&body),
            None => builder.build(),
        }
        .map_err(|err| err.to_string())?;
        let response = request.send().await.map_err(|err| err.to_string())?;
        Ok(Response {
            status: response.status(),
            status_text: response.status_text(),
            body: response.text().await.map_err(|err| err.to_string())?,
        })
    }
}

pub struct REST<S: SendRequest, C: CredentialRepository> {
    pub sender: S,
    pub credentials: C,
    pub base_url: String,
}

impl REST<GlooNetSendRequest, Token> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url("api")
    }

    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            sender: GlooNetSendRequest,
            credentials: Token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for REST<GlooNetSendRequest, Token> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SendRequest, C: CredentialRepository> domain::SessionRepository for REST<S, C> {
    async fn request_session(
        &self,
        credentials: domain::Credentials,
    ) -> Result<domain::User, domain::ReadError> {
        let response = self
            .send(
                Method::Post,
                "auth/login",
                Some(json!({
                    "email": credentials.email.as_ref(),
                    "password": credentials.password.expose(),
                })),
                false,
            )
            .await?;
        if !response.ok() {
            return Err(domain::ReadError::Other(response.error_message().into()));
        }
        let token = parse::<AccessToken>(&response)?;
        self.credentials
            .write_token(&token.access_token)
            .map_err(|err| domain::StorageError::Other(err.into()))?;
        self.initialize_session().await
    }

    async fn initialize_session(&self) -> Result<domain::User, domain::ReadError> {
        if self.credentials.read_token().is_none() {
            return Err(domain::StorageError::NoSession.into());
        }
        let user = self
            .fetch::<User, domain::ReadError>(Method::Get, "auth/me", None)
            .await?;
        Ok(domain::User::try_from(user)?)
    }

    async fn delete_session(&self) -> Result<(), domain::DeleteError> {
        self.credentials.delete_token();
        Ok(())
    }

    async fn register_user(
        &self,
        registration: domain::Registration,
    ) -> Result<domain::User, domain::CreateError> {
        let response = self
            .send(
                Method::Post,
                "auth/register",
                Some(json!({
                    "email": registration.credentials.email.as_ref(),
                    "password": registration.credentials.password.expose(),
                    "name": registration.name,
                })),
                false,
            )
            .await?;
        if !response.ok() {
            return Err(create_error(&response));
        }
        Ok(domain::User::try_from(parse::<User>(&response)?)?)
    }
}

impl<S: SendRequest, C: CredentialRepository> domain::ExerciseRepository for REST<S, C> {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        let exercises = self
            .fetch::<Vec<Exercise>, domain::ReadError>(Method::Get, "exercises", None)
            .await?;
        Ok(exercises
            .into_iter()
            .filter_map(|exercise| {
                let id = exercise.id;
                domain::Exercise::try_from(exercise)
                    .inspect_err(|err| warn!("ignoring exercise {id}: {err}"))
                    .ok()
            })
            .collect())
    }

    async fn create_exercise(
        &self,
        name: domain::Name,
        muscle_group: domain::MuscleGroup,
        description: Option<String>,
    ) -> Result<domain::Exercise, domain::CreateError> {
        let response = self
            .send(
                Method::Post,
                "exercises",
                Some(to_json(&NewExercise {
                    name: name.to_string(),
                    description,
                    muscle_group: muscle_group.to_string(),
                })?),
                true,
            )
            .await?;
        if !response.ok() {
            return Err(create_error(&response));
        }
        Ok(domain::Exercise::try_from(parse::<Exercise>(&response)?)?)
    }
}

impl<S: SendRequest, C: CredentialRepository> domain::WorkoutRepository for REST<S, C> {
    async fn read_workouts(&self) -> Result<Vec<domain::Workout>, domain::ReadError> {
        let workouts = self
            .fetch::<Vec<Workout>, domain::ReadError>(Method::Get, "workouts", None)
            .await?;
        Ok(workouts.into_iter().map(domain::Workout::from).collect())
    }

    async fn create_workout(
        &self,
        exercise_id: domain::ExerciseID,
        date: Option<NaiveDateTime>,
        metrics: domain::Metrics,
        notes: Option<String>,
    ) -> Result<domain::Workout, domain::CreateError> {
        let response = self
            .send(
                Method::Post,
                "workouts",
                Some(to_json(&NewWorkout {
                    exercise_id: *exercise_id,
                    date,
                    notes,
                    metrics: MetricValues::from(metrics),
                })?),
                true,
            )
            .await?;
        if !response.ok() {
            return Err(create_error(&response));
        }
        Ok(parse::<Workout>(&response)?.into())
    }

    async fn modify_workout(
        &self,
        id: domain::WorkoutID,
        metrics: Option<domain::Metrics>,
        notes: Option<String>,
    ) -> Result<domain::Workout, domain::UpdateError> {
        let response = self
            .send(
                Method::Patch,
                &format!("workouts/{}", *id),
                Some(to_json(&WorkoutChanges {
                    notes,
                    metrics: metrics.map(MetricValues::from).unwrap_or_default(),
                })?),
                true,
            )
            .await?;
        if !response.ok() {
            return Err(domain::UpdateError::Other(response.error_message().into()));
        }
        Ok(parse::<Workout>(&response)?.into())
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        self.fetch_no_content(Method::Delete, &format!("workouts/{}", *id), None, id)
            .await
    }

    async fn read_progress(
        &self,
        exercise_id: domain::ExerciseID,
    ) -> Result<domain::Progress, domain::ReadError> {
        let progress = self
            .fetch::<Progress, domain::ReadError>(
                Method::Get,
                &format!("progress/{}", *exercise_id),
                None,
            )
            .await?;
        Ok(progress.into())
    }
}

impl<S: SendRequest, C: CredentialRepository> REST<S, C> {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        authenticated: bool,
    ) -> Result<Response, domain::StorageError> {
        let token = if authenticated {
            Some(
                self.credentials
                    .read_token()
                    .ok_or(domain::StorageError::NoSession)?,
            )
        } else {
            None
        };
        let response = self
            .sender
            .send_request(Request {
                method,
                url: format!("{}/{path}", self.base_url),
                token,
                body,
            })
            .await
            .map_err(|_| domain::StorageError::NoConnection)?;
        if authenticated && response.status == 401 {
            warn!("session rejected: {}", response.error_message());
            self.credentials.delete_token();
            return Err(domain::StorageError::NoSession);
        }
        Ok(response)
    }

    async fn fetch<T, E>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, E>
    where
        T: DeserializeOwned,
        E: From<domain::StorageError> + From<Box<dyn std::error::Error>>,
    {
        let response = self.send(method, path, body, true).await?;
        if response.ok() {
            Ok(parse(&response)?)
        } else {
            Err(E::from(Box::<dyn std::error::Error>::from(
                response.error_message(),
            )))
        }
    }

    async fn fetch_no_content<T, E>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        result: T,
    ) -> Result<T, E>
    where
        E: From<domain::StorageError> + From<Box<dyn std::error::Error>>,
    {
        let response = self.send(method, path, body, true).await?;
        if response.ok() {
            Ok(result)
        } else {
            Err(E::from(Box::<dyn std::error::Error>::from(
                response.error_message(),
            )))
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, domain::StorageError> {
    serde_json::to_value(value).map_err(|err| {
        domain::StorageError::Other(format!("serialization failed: {err}").into())
    })
}

fn parse<T: DeserializeOwned>(response: &Response) -> Result<T, domain::StorageError> {
    serde_json::from_str(&response.body).map_err(|err| {
        domain::StorageError::Other(format!("deserialization failed: {err}").into())
    })
}

fn create_error(response: &Response) -> domain::CreateError {
    let detail = response.detail();
    let conflict = response.status == 409
        || (response.status == 400
            && detail
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains("already")));
    if conflict {
        domain::CreateError::Conflict
    } else {
        domain::CreateError::Other(response.error_message().into())
    }
}

fn deserialize_date_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_date_time(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {value}")))
}

fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    value
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|d| d.naive_utc())
        })
        .or_else(|| {
            value
                .parse::<NaiveDate>()
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[derive(Deserialize)]
struct AccessToken {
    access_token: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u32,
    pub email: String,
    pub name: String,
}

impl From<domain::User> for User {
    fn from(value: domain::User) -> Self {
        Self {
            id: *value.id,
            email: value.email.to_string(),
            name: value.name,
        }
    }
}

impl TryFrom<User> for domain::User {
    type Error = domain::StorageError;

    fn try_from(value: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            email: domain::Email::new(&value.email)
                .map_err(|err| domain::StorageError::Other(err.into()))?,
            name: value.name,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: String,
    #[serde(default)]
    pub user_id: Option<u32>,
}

impl From<domain::Exercise> for Exercise {
    fn from(value: domain::Exercise) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            description: value.description,
            muscle_group: value.muscle_group.to_string(),
            user_id: value.owner.map(|o| *o),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = domain::StorageError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        let muscle_group = value.muscle_group.parse().unwrap_or_else(|_| {
            warn!(
                "unknown muscle group \"{}\" of exercise {}",
                value.muscle_group, value.id
            );
            domain::MuscleGroup::Other
        });
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::from_stored(&value.name)
                .map_err(|err| domain::StorageError::Other(err.into()))?,
            muscle_group,
            description: value.description.filter(|d| !d.trim().is_empty()),
            owner: value.user_id.map(domain::UserID::from),
        })
    }
}

#[derive(Serialize)]
struct NewExercise {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    muscle_group: String,
}

/// Metric values as transferred over the wire.
///
/// Absent values are omitted.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "reps")]
    pub repetitions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f32>,
}

impl From<domain::Metrics> for MetricValues {
    fn from(value: domain::Metrics) -> Self {
        Self {
            weight: value.weight.map(f32::from),
            repetitions: value.reps.map(u32::from),
            sets: value.sets.map(u32::from),
            time_minutes: value.time.map(f32::from),
            distance_km: value.distance.map(f32::from),
        }
    }
}

impl From<MetricValues> for domain::Metrics {
    fn from(value: MetricValues) -> Self {
        macro_rules! checked {
            ($value: expr, $type: ident) => {
                $value.and_then(|v| match domain::$type::from_stored(v) {
                    Ok(v) => Some(v),
                    Err(err) => {
                        warn!("ignoring invalid value: {err}");
                        None
                    }
                })
            };
        }

        Self {
            weight: checked!(value.weight, Weight),
            reps: value.repetitions.map(domain::Reps::from_stored),
            sets: value.sets.map(domain::Sets::from_stored),
            time: checked!(value.time_minutes, Time),
            distance: checked!(value.distance_km, Distance),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: u32,
    pub exercise_id: u32,
    #[serde(deserialize_with = "deserialize_date_time")]
    pub date: NaiveDateTime,
    #[serde(flatten)]
    pub metrics: MetricValues,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<domain::Workout> for Workout {
    fn from(value: domain::Workout) -> Self {
        Self {
            id: *value.id,
            exercise_id: *value.exercise_id,
            date: value.date,
            metrics: value.metrics.into(),
            notes: value.notes,
        }
    }
}

impl From<Workout> for domain::Workout {
    fn from(value: Workout) -> Self {
        Self {
            id: value.id.into(),
            exercise_id: value.exercise_id.into(),
            date: value.date,
            metrics: value.metrics.into(),
            notes: value.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Serialize)]
struct NewWorkout {
    exercise_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(flatten)]
    metrics: MetricValues,
}

#[derive(Serialize)]
struct WorkoutChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(flatten)]
    metrics: MetricValues,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Progress {
    #[serde(default, alias = "max_weight")]
    pub max_value: Option<f32>,
    #[serde(default, alias = "avg_weight")]
    pub avg_value: Option<f32>,
    #[serde(default, alias = "last_weight")]
    pub last_value: Option<f32>,
    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default)]
    pub progress_data: Vec<ProgressPoint>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressPoint {
    #[serde(deserialize_with = "deserialize_date_time")]
    pub date: NaiveDateTime,
    #[serde(flatten)]
    pub metrics: MetricValues,
}

impl From<Progress> for domain::Progress {
    fn from(value: Progress) -> Self {
        let sessions = value.total_sessions;
        let aggregate = |v: Option<f32>| v.filter(|_| sessions > 0);
        Self {
            max_value: aggregate(value.max_value),
            avg_value: aggregate(value.avg_value),
            last_value: aggregate(value.last_value),
            total_sessions: sessions,
            points: value
                .progress_data
                .into_iter()
                .map(|p| domain::ProgressPoint {
                    date: p.date,
                    metrics: p.metrics.into(),
                })
                .collect(),
        }
    }
}
