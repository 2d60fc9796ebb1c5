pub mod dielectron;
pub mod selection;
