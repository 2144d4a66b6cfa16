// Domain-layer modules and shared errors/models
pub mod orchestrator {
    pub use crate::orchestrator::*;
}

pub mod validation {
    pub use crate::validation::*;
}

pub mod idempotency {
    pub use crate::idempotency::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
