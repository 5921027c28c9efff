pub mod decode;
pub mod model;
pub mod normalize;
pub mod scalar;

pub use decode::{RawRecord, RawValue, decode_records};
pub use model::{Model, ModelFiles, ModelMetrics, ModelStatus, filter_models};
pub use normalize::{json_to_record, normalize};
pub use scalar::Scalar;
