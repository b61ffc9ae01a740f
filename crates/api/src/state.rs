use doh_gateway_application::use_cases::ResolveQueryUseCase;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub resolve: Arc<ResolveQueryUseCase>,
}
