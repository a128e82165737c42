//! API client for the kas backend REST interface.

use gloo::net::http::{Request, RequestBuilder};
use shared::{ApiListResponse, PaymentDto, ScheduleDto};

use super::session::Session;

/// Read-only client for the two calendar data sources: the schedule
/// directory (`GET /schedules`) and the member's payment ledger
/// (`GET /payments`). Fetch failures surface as `Err(String)` and the
/// caller decides how to degrade.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new(session: Session) -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            session,
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String, session: Session) -> Self {
        Self { base_url, session }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let mut request = Request::get(&format!("{}{}", self.base_url, path));
        if let Some(token) = self.session.auth_token() {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }
        request
    }

    /// Fetch the admin-defined schedule windows, ordered by start date
    /// ascending as the backend returns them
    pub async fn list_schedules(&self) -> Result<Vec<ScheduleDto>, String> {
        match self.get("/schedules").send().await {
            Ok(response) => {
                if response.ok() {
                    match response.json::<ApiListResponse<ScheduleDto>>().await {
                        Ok(body) => Ok(body.data),
                        Err(e) => Err(format!("Failed to parse schedules: {}", e)),
                    }
                } else {
                    Err(format!("Schedules request failed: HTTP {}", response.status()))
                }
            }
            Err(e) => Err(format!("Failed to fetch schedules: {}", e)),
        }
    }

    /// Fetch the signed-in member's payment records
    pub async fn list_payments(&self) -> Result<Vec<PaymentDto>, String> {
        match self.get("/payments").send().await {
            Ok(response) => {
                if response.ok() {
                    match response.json::<ApiListResponse<PaymentDto>>().await {
                        Ok(body) => Ok(body.data),
                        Err(e) => Err(format!("Failed to parse payments: {}", e)),
                    }
                } else {
                    Err(format!("Payments request failed: HTTP {}", response.status()))
                }
            }
            Err(e) => Err(format!("Failed to fetch payments: {}", e)),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(Session::new())
    }
}
