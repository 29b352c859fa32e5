mod common;

mod distinct_values;
mod find_and_modify;
mod keys;
mod like_patterns;
mod querying;
