pub mod errors;
pub mod db;
pub mod geometry;
pub mod partner;

#[cfg(test)]
mod tests;
