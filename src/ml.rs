//! Machine learning components of the sentiment workflow.
//!
//! - [`featurizer`]: hashed word and character n-gram features
//! - [`sdca`]: L2-regularized logistic regression fitted with stochastic dual
//!   coordinate ascent
//! - [`linear`]: the fitted linear scorer and its probability calibration
//! - [`evaluation`]: accuracy, AUC, F1 and related binary metrics
//! - [`model`]: the trained, immutable [`SentimentModel`] used for prediction

pub mod evaluation;
pub mod featurizer;
pub mod linear;
pub mod model;
pub mod sdca;
pub mod sparse;

pub use evaluation::{BinaryClassificationMetrics, ConfusionMatrix};
pub use featurizer::{FeaturizerOptions, TextFeaturizer};
pub use linear::LinearBinaryModel;
pub use model::{ModelOptions, SentimentModel, SentimentPrediction};
pub use sdca::{SdcaLogisticRegression, SdcaOptions, TrainingStats};
pub use sparse::SparseVector;
