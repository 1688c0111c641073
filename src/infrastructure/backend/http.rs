//! HTTP client for the reservation service
//!
//! Owns the wire shapes and their normalization into the canonical
//! `Reservation`. The upstream service spells its fields in camelCase
//! with a few historical inconsistencies (`cost` / `totalCost` /
//! `finalCost`); the aliases live here and nowhere else, so business
//! logic only ever sees one shape.
//!
//! Every call is bounded by the client timeout — a timed-out call is a
//! failure, never an "unknown success". Idempotent reads retry once
//! with backoff; create is only retried by the caller, reusing its
//! idempotency key.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::api::{NewReservation, ReservationApi};
use crate::domain::{DomainError, DomainResult, Reservation, StoredStatus};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// Reservation record as the service sends it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationWire {
    id: String,
    #[serde(alias = "user_id")]
    user_id: String,
    #[serde(alias = "station_id")]
    station_id: String,
    #[serde(alias = "connector_id")]
    connector_id: String,
    #[serde(alias = "start_time")]
    start_time: DateTime<Utc>,
    #[serde(alias = "end_time")]
    end_time: DateTime<Utc>,
    status: String,
    #[serde(alias = "created_at")]
    created_at: DateTime<Utc>,
    /// Final cost in major currency units; the field name drifted
    /// across backend revisions
    #[serde(default, alias = "totalCost", alias = "finalCost")]
    cost: Option<f64>,
}

impl ReservationWire {
    fn into_domain(self) -> DomainResult<Reservation> {
        let stored_status = StoredStatus::from_str(&self.status).ok_or_else(|| {
            DomainError::Validation(format!("unknown reservation status '{}'", self.status))
        })?;
        Ok(Reservation {
            id: self.id,
            user_id: self.user_id,
            station_id: self.station_id,
            connector_id: self.connector_id,
            start_time: self.start_time,
            end_time: self.end_time,
            stored_status,
            created_at: self.created_at,
            final_cost_cents: self.cost.map(|c| (c * 100.0).round() as i64),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateReservationBody<'a> {
    user_id: &'a str,
    vehicle_id: &'a str,
    station_id: &'a str,
    connector_id: &'a str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    idempotency_key: Uuid,
}

#[derive(Debug, Serialize)]
struct CancelBody {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        })
}

/// Reservation-service client over HTTP
pub struct HttpReservationApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReservationApi {
    /// Build a client with the given request timeout
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse_reservation(response: reqwest::Response) -> DomainResult<Reservation> {
        let wire: ReservationWire = response.json().await.map_err(map_transport)?;
        wire.into_domain()
    }
}

fn map_transport(err: reqwest::Error) -> DomainError {
    if err.is_timeout() {
        DomainError::Transport("request timed out".into())
    } else {
        DomainError::Transport(err.to_string())
    }
}

#[async_trait::async_trait]
impl ReservationApi for HttpReservationApi {
    async fn create(&self, new: NewReservation) -> DomainResult<Reservation> {
        let body = CreateReservationBody {
            user_id: &new.user_id,
            vehicle_id: &new.vehicle_id,
            station_id: &new.station_id,
            connector_id: &new.connector_id,
            start_time: new.start_time,
            end_time: new.end_time,
            idempotency_key: new.idempotency_key,
        };

        debug!(
            connector_id = %new.connector_id,
            idempotency_key = %new.idempotency_key,
            "POST /reservations"
        );

        let response = self
            .client
            .post(self.url("/reservations"))
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK => Self::parse_reservation(response).await,
            StatusCode::CONFLICT => Err(DomainError::SlotConflict {
                connector_id: new.connector_id,
            }),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                Err(DomainError::Validation(error_message(status, &text)))
            }
            status => {
                let text = response.text().await.unwrap_or_default();
                Err(DomainError::Backend {
                    status: status.as_u16(),
                    message: error_message(status, &text),
                })
            }
        }
    }

    async fn cancel(&self, id: &str) -> DomainResult<Reservation> {
        let response = self
            .client
            .patch(self.url(&format!("/reservations/{}", id)))
            .json(&CancelBody {
                status: "Cancelled",
            })
            .send()
            .await
            .map_err(map_transport)?;

        match response.status() {
            StatusCode::OK => Self::parse_reservation(response).await,
            StatusCode::CONFLICT => Err(DomainError::AlreadyFinalized {
                id: id.to_string(),
                refreshed: None,
            }),
            StatusCode::NOT_FOUND => Err(DomainError::NotFound {
                entity: "reservation",
                id: id.to_string(),
            }),
            status => {
                let text = response.text().await.unwrap_or_default();
                Err(DomainError::Backend {
                    status: status.as_u16(),
                    message: error_message(status, &text),
                })
            }
        }
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Reservation>> {
        retry_with_backoff(
            RetryConfig::single_retry(),
            || async move {
                let response = self
                    .client
                    .get(self.url(&format!("/reservations/{}", id)))
                    .send()
                    .await
                    .map_err(map_transport)?;

                match response.status() {
                    StatusCode::OK => Self::parse_reservation(response).await.map(Some),
                    StatusCode::NOT_FOUND => Ok(None),
                    status => {
                        let text = response.text().await.unwrap_or_default();
                        Err(DomainError::Backend {
                            status: status.as_u16(),
                            message: error_message(status, &text),
                        })
                    }
                }
            },
            DomainError::is_transient,
            "get_reservation",
        )
        .await
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        retry_with_backoff(
            RetryConfig::single_retry(),
            || async move {
                let response = self
                    .client
                    .get(self.url("/reservations"))
                    .query(&[("userId", user_id)])
                    .send()
                    .await
                    .map_err(map_transport)?;

                if response.status() != StatusCode::OK {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(DomainError::Backend {
                        status: status.as_u16(),
                        message: error_message(status, &text),
                    });
                }

                let wires: Vec<ReservationWire> =
                    response.json().await.map_err(map_transport)?;
                wires.into_iter().map(ReservationWire::into_domain).collect()
            },
            DomainError::is_transient,
            "list_reservations",
        )
        .await
    }
}

// ── Tests ──────────────────────────────────────────────────────
