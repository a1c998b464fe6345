pub mod bodyweight;
pub mod canonicalizer;
pub mod cell_parser;
pub mod derivation;
pub mod normalizer;
pub mod output_formatter;
pub mod pipeline;
pub mod resample;
