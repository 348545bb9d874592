use crate::dto::HealthRes;

/// Simple health service backing the REST `/health` endpoint.
///
/// This service provides a standardised way to check the health status of the registry.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Patient registry is alive".into(),
        }
    }
}
