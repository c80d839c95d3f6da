/// Data layer: log parsing, unit conversion, display bounds.
///
/// Architecture:
/// ```text
///  vibFftAcf_<axis>_<window>.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  one pass → VibrationLog (µs, m/s²)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ convert   │  → Spectrogram (s, g)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  scale    │  color limit, frequency limits
///   └──────────┘
/// ```

pub mod convert;
pub mod error;
pub mod loader;
pub mod model;
pub mod scale;
