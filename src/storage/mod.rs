pub mod vector_set;

pub use vector_set::{VectorSet, Word, PREALLOC_LIMIT};
