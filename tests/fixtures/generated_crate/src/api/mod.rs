pub mod error;
mod zz_generated_thaterror;
