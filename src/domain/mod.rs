pub mod asset;
pub mod scene;
pub mod story;
pub mod text;
