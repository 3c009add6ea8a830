//! Loading and playback end to end

pub mod loading;
