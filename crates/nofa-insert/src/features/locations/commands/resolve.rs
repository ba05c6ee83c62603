//! Resolve location command
//!
//! Maps one [`LocationInput`] to the id of a stored location:
//!
//! - identifier: the id must parse and exist; returned unchanged
//! - coordinates, create new: the point is reprojected to the storage SRID
//!   and inserted as a new location together with its log row
//! - coordinates, use nearest: the nearest stored location within the
//!   configured distance
//! - legacy code: the location carrying that `no_vatn_lnr`
//!
//! Only the create-new path writes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::AuditStamp;
use crate::features::locations::types::{
    CoordinateMode, Crs, LocationInput, Point, ResolverSettings,
};
use crate::features::shared::validation::{parse_location_id, IdentifierValidationError};
use crate::store::{NewLocation, NofaStore, StoreError};

/// Command to resolve one location input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveLocationCommand {
    pub input: LocationInput,
    /// Recorded on a newly created location
    pub stamp: AuditStamp,
}

/// How the location id was obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// An existing location, by id or legacy code
    Matched,
    /// A location inserted by this call
    Created,
    /// The nearest existing location to the given coordinates
    Nearest { distance: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveLocationResponse {
    pub location_id: Uuid,
    #[serde(flatten)]
    pub outcome: ResolutionOutcome,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveLocationError {
    #[error("Location ID is required")]
    EmptyIdentifier,

    #[error("'{0}' is not a valid location ID")]
    MalformedIdentifier(String),

    #[error("Location with ID '{0}' does not exist")]
    IdentifierNotFound(Uuid),

    #[error("Both X and Y coordinates are required")]
    MissingCoordinate,

    #[error("{}", no_nearby_message(.x, .y, .crs, .max_distance))]
    NoNearbyLocation {
        x: f64,
        y: f64,
        crs: Crs,
        max_distance: Option<f64>,
    },

    #[error("Legacy location code is required")]
    MissingCode,

    #[error("No location with legacy code {0}")]
    CodeNotFound(i32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn no_nearby_message(x: &f64, y: &f64, crs: &Crs, max_distance: &Option<f64>) -> String {
    match max_distance {
        Some(distance) => format!("No location within {distance} m of ({x}, {y}) in {crs}"),
        None => format!("No location near ({x}, {y}) in {crs} (no distance limit)"),
    }
}

impl ResolveLocationError {
    /// Whether the fault lies in the input itself rather than in stored data
    pub fn is_input_fault(&self) -> bool {
        matches!(
            self,
            Self::EmptyIdentifier
                | Self::MalformedIdentifier(_)
                | Self::MissingCoordinate
                | Self::MissingCode
        )
    }
}

impl From<IdentifierValidationError> for ResolveLocationError {
    fn from(err: IdentifierValidationError) -> Self {
        match err {
            IdentifierValidationError::Empty => Self::EmptyIdentifier,
            IdentifierValidationError::Malformed(raw) => Self::MalformedIdentifier(raw),
        }
    }
}

impl ResolveLocationCommand {
    pub fn new(input: LocationInput, stamp: AuditStamp) -> Self {
        Self { input, stamp }
    }

    /// Check the shape of the input without touching storage
    pub fn validate(&self) -> Result<(), ResolveLocationError> {
        match &self.input {
            LocationInput::Identifier { location_id } => {
                parse_location_id(location_id.as_deref())?;
            },
            LocationInput::Coordinates { x, y, .. } => {
                if x.is_none() || y.is_none() {
                    return Err(ResolveLocationError::MissingCoordinate);
                }
            },
            LocationInput::LegacyCode { code } => {
                if code.is_none() {
                    return Err(ResolveLocationError::MissingCode);
                }
            },
        }
        Ok(())
    }
}

/// Handler for resolving a location input
#[tracing::instrument(
    skip(store, settings, command),
    fields(method = command.input.method())
)]
pub async fn handle<S: NofaStore + ?Sized>(
    store: &S,
    settings: &ResolverSettings,
    command: ResolveLocationCommand,
) -> Result<ResolveLocationResponse, ResolveLocationError> {
    command.validate()?;

    match command.input {
        LocationInput::Identifier { location_id } => {
            let location_id = parse_location_id(location_id.as_deref())?;
            if !store.location_exists(location_id).await? {
                return Err(ResolveLocationError::IdentifierNotFound(location_id));
            }
            tracing::debug!(%location_id, "Location matched by ID");
            Ok(ResolveLocationResponse {
                location_id,
                outcome: ResolutionOutcome::Matched,
            })
        },
        LocationInput::Coordinates {
            x,
            y,
            crs,
            mode,
            name,
        } => {
            let (Some(x), Some(y)) = (x, y) else {
                return Err(ResolveLocationError::MissingCoordinate);
            };
            let point = store
                .transform_point(Point::new(x, y), crs.srid(), settings.storage_srid)
                .await?;

            match mode {
                CoordinateMode::CreateNew => {
                    let location = NewLocation {
                        location_id: Uuid::new_v4(),
                        point,
                        srid: settings.storage_srid,
                        location_type: settings.location_type.clone(),
                        verbatim_locality: name,
                    };
                    store.insert_location(&location, &command.stamp).await?;

                    tracing::info!(
                        location_id = %location.location_id,
                        x = point.x,
                        y = point.y,
                        "Location created"
                    );
                    Ok(ResolveLocationResponse {
                        location_id: location.location_id,
                        outcome: ResolutionOutcome::Created,
                    })
                },
                CoordinateMode::UseNearest => {
                    let nearest = store
                        .nearest_location(point, settings.storage_srid, settings.nearest_max_distance)
                        .await?
                        .ok_or(ResolveLocationError::NoNearbyLocation {
                            x,
                            y,
                            crs,
                            max_distance: settings.nearest_max_distance,
                        })?;

                    tracing::debug!(
                        location_id = %nearest.location_id,
                        distance = nearest.distance,
                        "Nearest location matched"
                    );
                    Ok(ResolveLocationResponse {
                        location_id: nearest.location_id,
                        outcome: ResolutionOutcome::Nearest {
                            distance: nearest.distance,
                        },
                    })
                },
            }
        },
        LocationInput::LegacyCode { code } => {
            let code = code.ok_or(ResolveLocationError::MissingCode)?;
            let location_id = store
                .location_by_legacy_code(code)
                .await?
                .ok_or(ResolveLocationError::CodeNotFound(code))?;

            tracing::debug!(%location_id, code, "Location matched by legacy code");
            Ok(ResolveLocationResponse {
                location_id,
                outcome: ResolutionOutcome::Matched,
            })
        },
    }
}
