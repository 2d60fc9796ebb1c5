pub mod export;
pub mod processer;
