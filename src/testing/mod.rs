//! Testing utilities for the photo booth
//!
//! Synthetic photos and scripted capability fakes, so sessions and exports
//! can run offline without a camera or a photo library.

pub mod fakes;
pub mod synthetic_data;

pub use fakes::{
    FailingFileStore, FailingGallery, MemoryGallery, MemoryRasterizer, ScriptedCamera, ShutterOutcome,
};
pub use synthetic_data::{synthetic_frame, synthetic_photo, SYNTHETIC_PHOTO_SIZE};
