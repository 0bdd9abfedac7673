//! Flashcards for learning PyTorch API functions.
//!
//! Cards come from a [`source::CardSource`] (the bundled dataset or Gemini)
//! and are served one at a time by the [`core::QueueController`], which keeps
//! a small prefetched queue and remembers which functions were learned.

pub mod cards;
pub mod core;
pub mod gui;
pub mod persistence;
pub mod source;
