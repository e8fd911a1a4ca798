//! Text normalization shared by indexing, scope classification and retrieval.
//!
//! Every component that compares query text against document text goes through
//! [`tokenize`] and [`normalize_term`], so the two sides always agree on what a
//! term is.

pub mod distance;
pub mod stopwords;
pub mod tokenizer;


pub use distance::{osa_distance, within_one_edit};
pub use stopwords::{is_filler, is_stopword};
pub use tokenizer::{Token, contains_numeral, normalize_term, split_sentences, terms, tokenize};
