//! Wire codecs for patches.

pub mod json;
