pub mod config; // YAML settings with ${VAR} substitution
pub mod logging; // tracing subscriber setup
pub mod watermark; // Font loading, text overlay, compositing and image I/O
