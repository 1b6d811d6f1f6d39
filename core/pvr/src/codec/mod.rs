pub mod layout;
pub mod pvrtc;
