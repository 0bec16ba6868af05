//! Wire shape of the comparison service response.
//!
//! Payloads are deserialized into these structs first and only become a
//! [`DamageReport`] through [`TryFrom`], which rejects anything the renderer
//! could not draw.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{BoundingBox, DamageRecord, DamageReport, DomainError, ImageReference};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

/// `null` and a missing list both mean "no new damage".
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<DamagePayload>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<DamagePayload>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub after_image: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub new_damages: Vec<DamagePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost_estimate: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamagePayload {
    #[serde(rename = "type")]
    pub damage_type: String,
    pub coordinates: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(
        default,
        alias = "cost_estimate",
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_cost: Option<i64>,
}

impl DamagePayload {
    fn into_record(self, index: usize) -> Result<DamageRecord, DomainError> {
        let corners: [f64; 4] =
            self.coordinates
                .as_slice()
                .try_into()
                .map_err(|_| DomainError::CoordinateCount {
                    index,
                    len: self.coordinates.len(),
                })?;
        let bounds = BoundingBox::from_corners(corners)
            .ok_or(DomainError::NonFiniteCoordinates { index })?;

        Ok(DamageRecord {
            label: self.damage_type,
            bounds,
            severity: self.severity,
            confidence: self.confidence,
            estimated_cost: self.estimated_cost,
        })
    }
}

impl TryFrom<ReportPayload> for DamageReport {
    type Error = DomainError;

    fn try_from(payload: ReportPayload) -> Result<Self, Self::Error> {
        if payload.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(DomainError::UnsupportedSchemaVersion {
                found: payload.schema_version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        let after_image = ImageReference::parse(&payload.after_image)?;
        let new_damages = payload
            .new_damages
            .into_iter()
            .enumerate()
            .map(|(index, damage)| damage.into_record(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            after_image,
            new_damages,
            session_id: payload.session_id,
            before_image: payload.before_image,
            total_cost_estimate: payload.total_cost_estimate,
            summary: payload.summary,
        })
    }
}
