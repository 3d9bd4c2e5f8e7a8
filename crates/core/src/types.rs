/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Capture time of a frame as reported by the review tool.
///
/// Unit-agnostic (usually milliseconds), but consistent across a session.
pub type FrameTime = i64;
