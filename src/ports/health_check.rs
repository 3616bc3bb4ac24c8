//! Readiness check for the backing store.

use async_trait::async_trait;

#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// True when the store answers a trivial query.
    async fn database_ok(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_is_object_safe() {
        fn _accepts_dyn(_check: &dyn HealthCheck) {}
    }
}
