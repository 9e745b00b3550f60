//! Data types for Slidecast

mod presentation;

pub use presentation::PresentationState;
