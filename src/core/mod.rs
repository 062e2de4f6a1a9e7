pub mod assembler;
pub mod extractor;
pub mod navigation;
pub mod normalizer;
pub mod selectors;
pub mod session;
pub mod text;
