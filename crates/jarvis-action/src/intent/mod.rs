//! Intent detection from user utterances.

pub mod classifier;
