mod detector_state;
mod diagnostics;

pub use detector_state::DetectorState;
pub use diagnostics::Diagnostics;
