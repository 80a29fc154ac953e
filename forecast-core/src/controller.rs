use tracing::{debug, warn};

use crate::client::{FetchError, ForecastSource};
use crate::model::{DisplayModel, ForecastPayload, TempUnit, present};

/// The one message users ever see for a failed query. The actual cause is
/// logged for diagnostics and must not leak into this string.
pub const QUERY_ERROR_MESSAGE: &str = "Failed to load weather data. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// View state owned by the controller, mutated only through its transitions.
///
/// `payload` is `Some` once any query has succeeded and is retained across
/// later failures, so a stale-but-valid result stays displayable. It is
/// only ever replaced whole, never patched field by field.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    status: QueryStatus,
    payload: Option<ForecastPayload>,
    error_message: Option<String>,
    unit: TempUnit,
}

impl QueryState {
    pub fn status(&self) -> QueryStatus {
        self.status
    }

    pub fn payload(&self) -> Option<&ForecastPayload> {
        self.payload.as_ref()
    }

    /// Present iff `status == Error`.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn unit(&self) -> TempUnit {
        self.unit
    }
}

/// Handle for one issued query. Completing the controller with a ticket
/// that is no longer the latest is a no-op.
#[derive(Debug)]
pub struct QueryTicket {
    generation: u64,
    city: String,
}

impl QueryTicket {
    pub fn city(&self) -> &str {
        &self.city
    }
}

/// Drives the query lifecycle: Idle -> Loading -> Success | Error, every
/// state re-enterable.
///
/// Single-flight policy is last-issued-wins: issuing a new query while one
/// is outstanding supersedes it, and the superseded completion is dropped
/// when it eventually arrives. Only the most recently issued query can
/// reach [`WeatherQueryController::complete`] with effect, so a slow stale
/// response never overwrites newer state.
#[derive(Debug, Default)]
pub struct WeatherQueryController {
    state: QueryState,
    generation: u64,
}

impl WeatherQueryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Start a query for `city` (trimmed). Empty input is a no-op and
    /// returns `None`: no state change, no request to make.
    ///
    /// On non-empty input the status becomes Loading, the previous error
    /// is cleared and the previous payload is kept as-is. The returned
    /// ticket must be handed back to [`Self::complete`].
    pub fn issue_query(&mut self, city: &str) -> Option<QueryTicket> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }

        self.generation += 1;
        self.state.status = QueryStatus::Loading;
        self.state.error_message = None;

        Some(QueryTicket { generation: self.generation, city: city.to_owned() })
    }

    /// Apply the outcome of an issued query. Every completion, success or
    /// failure, goes through here so ordering is enforced in one place.
    ///
    /// A payload with no forecast days counts as a malformed response, not
    /// a success: the stored payload must always be presentable.
    pub fn complete(&mut self, ticket: QueryTicket, result: Result<ForecastPayload, FetchError>) {
        if ticket.generation != self.generation {
            debug!(city = %ticket.city, "dropping completion of a superseded query");
            return;
        }

        match result {
            Ok(payload) if payload.forecast.forecastday.is_empty() => {
                let cause = FetchError::Malformed("forecast.forecastday is empty".to_string());
                self.fail(&ticket.city, &cause);
            }
            Ok(payload) => {
                self.state.payload = Some(payload);
                self.state.status = QueryStatus::Success;
            }
            Err(cause) => self.fail(&ticket.city, &cause),
        }
    }

    /// Issue, fetch and complete in one go, for sequential callers like
    /// the CLI. Empty input returns without touching the source.
    pub async fn run_query<S: ForecastSource + ?Sized>(&mut self, source: &S, city: &str) {
        let Some(ticket) = self.issue_query(city) else {
            return;
        };

        let result = source.fetch(ticket.city()).await;
        self.complete(ticket, result);
    }

    /// Flip the display unit. Touches nothing else: no re-query, payload
    /// and status stay as they are.
    pub fn toggle_unit(&mut self) {
        self.state.unit = self.state.unit.toggle();
    }

    /// Display values for the stored payload in the current unit, or
    /// `None` when no query has succeeded yet.
    pub fn display(&self) -> Option<DisplayModel> {
        self.state.payload.as_ref().and_then(|p| present(p, self.state.unit))
    }

    fn fail(&mut self, city: &str, cause: &FetchError) {
        warn!(city = %city, error = %cause, "weather query failed");
        self.state.error_message = Some(QUERY_ERROR_MESSAGE.to_owned());
        self.state.status = QueryStatus::Error;
    }
}
