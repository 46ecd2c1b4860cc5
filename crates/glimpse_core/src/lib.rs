//! Glimpse Core Domain Logic
//!
//! This crate contains:
//! - Error types
//! - Application configuration
//! - Image ordering strategies
//! - The navigation/history engine
//! - The auto-advance timer
//! - Cosmetic image operations

pub mod config;
pub mod error;
pub mod image_ops;
pub mod navigation;
pub mod ordering;
pub mod timer;

pub use config::{AppConfig, BackgroundMode, GeneralConfig, TimerConfig, ViewerConfig};
pub use error::AppError;
pub use image_ops::{dominant_color, dominant_color_of_file, load_for_display, Transforms, Zoom};
pub use navigation::NavigationSession;
pub use ordering::{order_images, SortMethod};
pub use timer::{AutoAdvanceTimer, Tick, TimerState, DEFAULT_INTERVAL_SECS};
