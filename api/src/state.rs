use crate::schema::EngineStatus;
use paper_rag::{AnswerEngine, EngineConfig, EngineError, RagEngine};
use std::sync::Arc;

/// Outcome of engine construction, fixed for the lifetime of the process.
pub enum EngineSlot {
    Ready(Arc<dyn AnswerEngine>),
    Unavailable(EngineError),
}

/// Shared router state. Built once before the listener is bound.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<EngineSlot>,
}

impl AppState {
    pub fn ready(engine: Arc<dyn AnswerEngine>) -> Self {
        Self {
            engine: Arc::new(EngineSlot::Ready(engine)),
        }
    }

    pub fn unavailable(error: EngineError) -> Self {
        Self {
            engine: Arc::new(EngineSlot::Unavailable(error)),
        }
    }

    /// Loads the engine from `config`. A failure is logged and kept; the service
    /// still starts and reports the engine as uninitialised.
    pub async fn initialise(config: EngineConfig) -> Self {
        Self::from_startup(RagEngine::load(config).await)
    }

    pub fn from_startup(result: Result<RagEngine, EngineError>) -> Self {
        match result {
            Ok(engine) => {
                let document = engine.document();
                log::info!(
                    "System initialised successfully ({} chunks from {}).",
                    document.chunks.len(),
                    document.filename
                );
                Self::ready(Arc::new(engine))
            }
            Err(err) => {
                log::error!("Failed to initialise system: {}", err);
                Self::unavailable(err)
            }
        }
    }

    pub fn engine(&self) -> Option<&Arc<dyn AnswerEngine>> {
        match self.engine.as_ref() {
            EngineSlot::Ready(engine) => Some(engine),
            EngineSlot::Unavailable(_) => None,
        }
    }

    pub fn startup_error(&self) -> Option<&EngineError> {
        match self.engine.as_ref() {
            EngineSlot::Ready(_) => None,
            EngineSlot::Unavailable(err) => Some(err),
        }
    }

    pub fn engine_status(&self) -> EngineStatus {
        match self.engine.as_ref() {
            EngineSlot::Ready(_) => EngineStatus::Ready,
            EngineSlot::Unavailable(_) => EngineStatus::Uninitialised,
        }
    }
}
