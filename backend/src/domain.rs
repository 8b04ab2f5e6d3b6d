use tracing::{info, warn};

use crate::db::DbConnection;
use crate::error::{ApiError, ApiResult};
use shared::{
    Activity, Camper, CamperDetail, CreateCamperRequest, CreateSignupRequest, SignupDetail,
    UpdateCamperRequest,
};

/// Inclusive age range a camper must fall in.
pub const MIN_CAMPER_AGE: i64 = 8;
pub const MAX_CAMPER_AGE: i64 = 18;

/// Inclusive hour-of-day range a signup may occupy.
pub const MIN_SIGNUP_HOUR: i64 = 0;
pub const MAX_SIGNUP_HOUR: i64 = 23;

fn validate_name(name: &str) -> ApiResult<()> {
    if name.is_empty() {
        return Err(ApiError::validation("name", "Camper must have a name"));
    }
    Ok(())
}

fn validate_age(age: i64) -> ApiResult<()> {
    if !(MIN_CAMPER_AGE..=MAX_CAMPER_AGE).contains(&age) {
        return Err(ApiError::validation(
            "age",
            format!("Camper age must be between {MIN_CAMPER_AGE} and {MAX_CAMPER_AGE}"),
        ));
    }
    Ok(())
}

fn validate_time(time: i64) -> ApiResult<()> {
    if !(MIN_SIGNUP_HOUR..=MAX_SIGNUP_HOUR).contains(&time) {
        return Err(ApiError::validation(
            "time",
            format!("Time must be between {MIN_SIGNUP_HOUR} and {MAX_SIGNUP_HOUR}"),
        ));
    }
    Ok(())
}

/// Service for managing campers
#[derive(Clone)]
pub struct CamperService {
    db: DbConnection,
}

impl CamperService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ApiResult<Vec<Camper>> {
        info!("Listing campers");
        Ok(self.db.list_campers().await?)
    }

    /// Full camper view with signups and their activities expanded
    pub async fn get_detail(&self, id: i64) -> ApiResult<CamperDetail> {
        let camper = self.db.get_camper(id).await?.ok_or_else(|| {
            warn!("Camper not found: {id}");
            ApiError::NotFound { entity: "Camper" }
        })?;

        let signups = self.db.signups_for_camper(id).await?;

        Ok(CamperDetail {
            id: camper.id,
            name: camper.name,
            age: camper.age,
            signups,
        })
    }

    /// Validate and persist a new camper
    pub async fn create(&self, request: CreateCamperRequest) -> ApiResult<Camper> {
        info!("Creating camper: name={}, age={}", request.name, request.age);

        validate_name(&request.name)?;
        validate_age(request.age)?;

        let camper = self.db.insert_camper(&request.name, request.age).await?;

        info!("Created camper {} with id {}", camper.name, camper.id);
        Ok(camper)
    }

    /// Apply a partial update, re-running each provided field's validator
    /// before anything is written
    pub async fn update(&self, id: i64, request: UpdateCamperRequest) -> ApiResult<Camper> {
        info!("Updating camper: {id}");

        let mut camper = self.db.get_camper(id).await?.ok_or_else(|| {
            warn!("Camper not found: {id}");
            ApiError::NotFound { entity: "Camper" }
        })?;

        if let Some(name) = request.name {
            validate_name(&name)?;
            camper.name = name;
        }
        if let Some(age) = request.age {
            validate_age(age)?;
            camper.age = age;
        }

        self.db.update_camper(&camper).await?;

        info!("Updated camper {id}");
        Ok(camper)
    }
}

/// Service for managing activities
#[derive(Clone)]
pub struct ActivityService {
    db: DbConnection,
}

impl ActivityService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ApiResult<Vec<Activity>> {
        info!("Listing activities");
        Ok(self.db.list_activities().await?)
    }

    /// Delete an activity. Its signups are removed with it.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        info!("Deleting activity: {id}");

        let deleted = self.db.delete_activity(id).await?;
        if !deleted {
            warn!("Activity not found: {id}");
            return Err(ApiError::NotFound { entity: "Activity" });
        }

        info!("Deleted activity {id}");
        Ok(())
    }
}

/// Service for signing campers up for activities
#[derive(Clone)]
pub struct SignupService {
    db: DbConnection,
}

impl SignupService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Validate and persist a new signup, returning it with both parents
    /// expanded.
    ///
    /// Both parents are looked up first so a dangling id gets a specific
    /// message; the foreign key constraint remains as the backstop.
    pub async fn create(&self, request: CreateSignupRequest) -> ApiResult<SignupDetail> {
        info!(
            "Creating signup: time={}, camper_id={}, activity_id={}",
            request.time, request.camper_id, request.activity_id
        );

        validate_time(request.time)?;

        let camper = self.db.get_camper(request.camper_id).await?.ok_or_else(|| {
            warn!("Signup references missing camper: {}", request.camper_id);
            ApiError::ForeignKey(format!("camper {} does not exist", request.camper_id))
        })?;
        let activity = self.db.get_activity(request.activity_id).await?.ok_or_else(|| {
            warn!("Signup references missing activity: {}", request.activity_id);
            ApiError::ForeignKey(format!("activity {} does not exist", request.activity_id))
        })?;

        let id = self
            .db
            .insert_signup(request.time, camper.id, activity.id)
            .await?;

        info!("Created signup {id}");
        Ok(SignupDetail {
            id,
            time: request.time,
            camper_id: camper.id,
            activity_id: activity.id,
            camper,
            activity,
        })
    }
}
