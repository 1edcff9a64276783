use std::sync::Arc;

use crate::service::MedicalService;

/// Shared state for every route and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<MedicalService>,
}

impl ApiContext {
    pub fn new(service: Arc<MedicalService>) -> Self {
        Self { service }
    }
}
