use serde::{Deserialize, Serialize};

/// An offered camp activity with a difficulty rating.
///
/// This is the only projection an activity is ever rendered as, whether
/// listed on its own or embedded inside a signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub name: String,
    pub difficulty: i64,
}

/// A camp participant.
///
/// The summary projection used for list, create, and update responses.
/// It never embeds signups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camper {
    pub id: i64,
    pub name: String,
    pub age: i64,
}

/// Full camper view returned by the single-camper endpoint, with the
/// camper's signups expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CamperDetail {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub signups: Vec<SignupWithActivity>,
}

/// A signup as embedded in a camper view.
///
/// Carries the activity side of the join only. There is no camper
/// back-reference, so nested rendering cannot recurse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupWithActivity {
    pub id: i64,
    pub time: i64,
    pub camper_id: i64,
    pub activity_id: i64,
    pub activity: Activity,
}

/// A newly created signup with both sides of the join expanded.
///
/// The nested camper is the summary projection, so it cannot pull its
/// signups back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupDetail {
    pub id: i64,
    pub time: i64,
    pub camper_id: i64,
    pub activity_id: i64,
    pub camper: Camper,
    pub activity: Activity,
}

/// Request body for creating a camper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCamperRequest {
    pub name: String,
    pub age: i64,
}

/// Partial camper update.
///
/// Only name and age may be patched. Any other key in the body,
/// including `id`, is rejected at deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCamperRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
}

/// Request body for signing a camper up for an activity at a given hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSignupRequest {
    pub time: i64,
    pub camper_id: i64,
    pub activity_id: i64,
}
