use axum::{extract::State, response::Json};
use chrono::Utc;
use log::info;
use serde::Serialize;

use super::AppState;
use crate::{
    database::{self, SeedWrite},
    error::AppError,
    seed::{self, SeedCounts},
};

#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeedResponse {
    Seeded {
        success: bool,
        message: String,
        counts: SeedCounts,
    },
    #[serde(rename_all = "camelCase")]
    AlreadySeeded { message: String, user_count: i64 },
}

impl SeedResponse {
    fn already_seeded(user_count: i64) -> Self {
        SeedResponse::AlreadySeeded {
            message: "Data already seeded".to_string(),
            user_count,
        }
    }
}

/// Response for a store that already holds `existing` users, or `None` when
/// it is empty and should be seeded.
pub fn seed_plan(existing: i64) -> Option<SeedResponse> {
    (existing > 0).then(|| SeedResponse::already_seeded(existing))
}

/// Response for a finished write. A writer that lost the race reports the
/// winner's user count rather than its own generated counts.
pub fn seed_outcome(write: SeedWrite, counts: SeedCounts) -> SeedResponse {
    match write {
        SeedWrite::Inserted => SeedResponse::Seeded {
            success: true,
            message: "Data seeded successfully".to_string(),
            counts,
        },
        SeedWrite::AlreadySeeded(existing) => SeedResponse::already_seeded(existing),
    }
}

/// `POST /seed-data`: fills an empty store with generated data. A store
/// that already has users is left untouched.
pub async fn seed_data(State(state): State<AppState>) -> Result<Json<SeedResponse>, AppError> {
    info!("Starting data seed...");

    let user_count = database::count_users(&state.db).await?;
    if let Some(response) = seed_plan(user_count) {
        info!("Data already seeded ({} users), skipping", user_count);
        return Ok(Json(response));
    }

    let dataset = {
        let mut rng = rand::thread_rng();
        seed::generate(&mut rng, Utc::now(), state.seed_user_count)?
    };
    let write = database::insert_dataset(&state.db, &dataset).await?;

    let counts = dataset.counts();
    if write == SeedWrite::Inserted {
        info!("Seed complete: {:?}", counts);
    }

    Ok(Json(seed_outcome(write, counts)))
}
