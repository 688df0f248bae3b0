pub mod artifacts;
pub mod bundle;
pub mod predictor;

pub use artifacts::ModelArtifacts;
pub use bundle::MomentumFeatureBundle;
pub use predictor::{LinearPredictor, MomentumPredictor, RemotePredictor};
