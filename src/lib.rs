pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod generator;
pub mod glyphs;
pub mod logger;
pub mod models;
pub mod results;
pub mod session;
pub mod stats_worker;
pub mod store;
pub mod teacher;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use app::App;
pub use auth::{sign_in, sign_up, validate_credentials, AuthError, SignUpOutcome};
pub use config::{AppConfig, ConfigError};
pub use db::SqliteStore;
pub use generator::{
    DifficultyParams, DistractorPolicy, GeneratorError, OperandRange, OperationRanges,
    QuestionGenerator, TierPlan,
};
pub use models::{AppState, Operation, Question, Role, Stats, Tier, UserSession};
pub use results::{Performance, ResultsSummary};
pub use session::{AnswerOutcome, QuizSession, Score, SessionError, SessionEvent, SessionState};
pub use stats_worker::{spawn_stats_worker, StatsRecorder, StatsRequest, StatsResponse};
pub use store::{AccountStore, StoreError};
