mod segmented;

pub use segmented::{SegmentedTranscriber, SegmentedTranscriberConfig};
