pub mod profile;
pub mod template;

pub use profile::{build_frames, GaitGenerator, GeneratorConfig};
