//! Model training
//!
//! Candidate regressors (linear, random forest, gradient boosting), the
//! selection engine that ranks them by held-out RMSE, and the persisted
//! model artifact used at prediction time.

mod config;
mod engine;
mod models;
pub mod decision_tree;
pub mod gradient_boosting;
pub mod linear_models;
pub mod random_forest;

pub use config::TrainingConfig;
pub use decision_tree::{DecisionTreeRegressor, TreeNode};
pub use engine::{LeaderboardEntry, ModelArtifact, TrainEngine};
pub use gradient_boosting::{GradientBoostingConfig, GradientBoostingRegressor};
pub use linear_models::LinearRegression;
pub use models::{ModelMetrics, TrainedModel};
pub use random_forest::{MaxFeatures, RandomForestConfig, RandomForestRegressor};
